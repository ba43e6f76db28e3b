//! Parsers for memory objects.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::Result;

use super::{Builder, Parsed, XmlNode};

pub(super) fn parse_buffer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Buffer {
        base: NodeBase::default(),
        size: b.req_u64(el, "size")?,
        usage: b.attr_flags(el, "usage")?,
        memory: b.attr_flags(el, "memory")?,
        sharing_mode: b.attr_enum_or(el, "sharingMode", SharingMode::Exclusive)?,
    };
    Ok(Parsed::Node(b.layout.nodes.buffers.push(node).into()))
}

pub(super) fn parse_buffer_loader(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BufferLoader {
        base: NodeBase::default(),
        buffer: b.req_reference(el, "buffer")?,
        path: b.req_string(el, "path")?,
        offset: b.attr_u64_or(el, "offset", 0)?,
    };
    Ok(Parsed::Node(b.layout.nodes.buffer_loaders.push(node).into()))
}

pub(super) fn parse_image(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Image {
        base: NodeBase::default(),
        image_type: b.attr_enum_or(el, "type", ImageType::D2)?,
        format: b.req_enum(el, "format")?,
        width: b.req_u32(el, "width")?,
        height: b.attr_u32_or(el, "height", 1)?,
        depth: b.attr_u32_or(el, "depth", 1)?,
        mip_levels: b.attr_u32_or(el, "mipLevels", 1)?,
        array_layers: b.attr_u32_or(el, "arrayLayers", 1)?,
        samples: b.attr_u32_or(el, "samples", 1)?,
        tiling: b.attr_enum_or(el, "tiling", ImageTiling::Optimal)?,
        usage: b.attr_flags(el, "usage")?,
        memory: b.attr_flags(el, "memory")?,
        initial_layout: b.attr_enum_or(el, "initialLayout", ImageLayout::Undefined)?,
    };
    Ok(Parsed::Node(b.layout.nodes.images.push(node).into()))
}

pub(super) fn parse_image_loader(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ImageLoader {
        base: NodeBase::default(),
        image: b.req_reference(el, "image")?,
        path: b.req_string(el, "path")?,
        generate_mipmaps: b.attr_bool_or(el, "generateMipmaps", false)?,
    };
    Ok(Parsed::Node(b.layout.nodes.image_loaders.push(node).into()))
}

pub(super) fn parse_image_view(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let mut aspect_mask = b.attr_flags(el, "aspectMask")?;
    if aspect_mask.is_empty() {
        aspect_mask.push(ImageAspect::Color);
    }
    let node = ImageView {
        base: NodeBase::default(),
        image: b.req_reference(el, "image")?,
        view_type: b.attr_enum_or(el, "viewType", ImageViewType::D2)?,
        format: b.attr_enum(el, "format")?,
        aspect_mask,
        base_mip_level: b.attr_u32_or(el, "baseMipLevel", 0)?,
        level_count: b.attr_u32_or(el, "levelCount", 1)?,
        base_array_layer: b.attr_u32_or(el, "baseArrayLayer", 0)?,
        layer_count: b.attr_u32_or(el, "layerCount", 1)?,
    };
    Ok(Parsed::Node(b.layout.nodes.image_views.push(node).into()))
}

pub(super) fn parse_sampler(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let address_mode = b.attr_enum_or(el, "addressMode", SamplerAddressMode::Repeat)?;
    let node = Sampler {
        base: NodeBase::default(),
        mag_filter: b.attr_enum_or(el, "magFilter", Filter::Linear)?,
        min_filter: b.attr_enum_or(el, "minFilter", Filter::Linear)?,
        mipmap_mode: b.attr_enum_or(el, "mipmapMode", SamplerMipmapMode::Linear)?,
        address_mode_u: b.attr_enum_or(el, "addressModeU", address_mode)?,
        address_mode_v: b.attr_enum_or(el, "addressModeV", address_mode)?,
        address_mode_w: b.attr_enum_or(el, "addressModeW", address_mode)?,
        mip_lod_bias: b.attr_f32_or(el, "mipLodBias", 0.0)?,
        anisotropy_enable: b.attr_bool_or(el, "anisotropy", false)?,
        max_anisotropy: b.attr_f32_or(el, "maxAnisotropy", 1.0)?,
        compare_enable: b.attr_bool_or(el, "compare", false)?,
        compare_op: b.attr_enum_or(el, "compareOp", CompareOp::Always)?,
        min_lod: b.attr_f32_or(el, "minLod", 0.0)?,
        max_lod: b.attr_f32_or(el, "maxLod", 0.0)?,
        border_color: b.attr_enum_or(el, "borderColor", BorderColor::FloatOpaqueBlack)?,
        unnormalized_coordinates: b.attr_bool_or(el, "unnormalizedCoordinates", false)?,
    };
    Ok(Parsed::Node(b.layout.nodes.samplers.push(node).into()))
}

pub(super) fn parse_swapchain(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let mut usage = b.attr_flags(el, "usage")?;
    if usage.is_empty() {
        usage.push(ImageUsage::ColorAttachment);
    }
    let node = Swapchain {
        base: NodeBase::default(),
        window: b.reference(el, "window"),
        min_image_count: b.attr_u32_or(el, "minImageCount", 2)?,
        format: b.attr_enum_or(el, "format", Format::B8G8R8A8Srgb)?,
        color_space: b.attr_enum_or(el, "colorSpace", ColorSpace::SrgbNonlinear)?,
        present_mode: b.attr_enum_or(el, "presentMode", PresentMode::Fifo)?,
        usage,
        composite_alpha: b.attr_enum_or(el, "compositeAlpha", CompositeAlpha::Opaque)?,
        width: b.attr_u32(el, "width")?,
        height: b.attr_u32(el, "height")?,
    };
    Ok(Parsed::Node(b.layout.nodes.swapchains.push(node).into()))
}
