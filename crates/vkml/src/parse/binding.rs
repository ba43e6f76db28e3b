//! Parsers for descriptor pools, sets and write infos.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::Result;

use super::{structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_descriptor_pool(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DescriptorPool {
        base: NodeBase::default(),
        max_sets: b.attr_u32_or(el, "maxSets", 1)?,
        sizes: Vec::new(),
    };
    Ok(Parsed::Node(
        b.layout.nodes.descriptor_pools.push(node).into(),
    ))
}

pub(super) fn parse_descriptor_pool_size(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pool = structural_parent::<DescriptorPool>(el, parent)?;
    let node = DescriptorPoolSize {
        base: NodeBase::default(),
        pool,
        descriptor_type: b.req_enum(el, "type")?,
        count: b.req_u32(el, "count")?,
    };
    let handle = b.layout.nodes.descriptor_pool_sizes.push(node);
    b.layout.nodes.descriptor_pools[pool].sizes.push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_descriptor_set(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DescriptorSet {
        base: NodeBase::default(),
        pool: b.req_reference(el, "pool")?,
        layout: b.req_reference(el, "layout")?,
        descriptors: Vec::new(),
    };
    Ok(Parsed::Node(b.layout.nodes.descriptor_sets.push(node).into()))
}

pub(super) fn parse_descriptor(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let set = structural_parent::<DescriptorSet>(el, parent)?;
    let node = Descriptor {
        base: NodeBase::default(),
        set,
        binding: b.req_u32(el, "binding")?,
        descriptor_type: b.req_enum(el, "type")?,
        count: b.attr_u32(el, "count")?,
        image_infos: Vec::new(),
        buffer_infos: Vec::new(),
    };
    let handle = b.layout.nodes.descriptors.push(node);
    b.layout.nodes.descriptor_sets[set].descriptors.push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_image_info(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let descriptor = structural_parent::<Descriptor>(el, parent)?;
    let node = ImageInfo {
        base: NodeBase::default(),
        descriptor,
        sampler: b.reference(el, "sampler"),
        image_view: b.reference(el, "imageView"),
        layout: b.attr_enum_or(el, "layout", ImageLayout::ShaderReadOnlyOptimal)?,
    };
    let handle = b.layout.nodes.image_infos.push(node);
    b.layout.nodes.descriptors[descriptor]
        .image_infos
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_buffer_info(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let descriptor = structural_parent::<Descriptor>(el, parent)?;
    let node = BufferInfo {
        base: NodeBase::default(),
        descriptor,
        buffer: b.req_reference(el, "buffer")?,
        offset: b.attr_u64_or(el, "offset", 0)?,
        range: b.attr_u64(el, "range")?,
    };
    let handle = b.layout.nodes.buffer_infos.push(node);
    b.layout.nodes.descriptors[descriptor]
        .buffer_infos
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}
