//! Parsers for the device/queue graph.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::Result;

use super::{claim_singleton, structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_renderer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Renderer {
        base: NodeBase::default(),
        application_name: b.attr_string(el, "applicationName"),
        engine_name: b.attr_string(el, "engineName"),
        api_version: b.attr_string(el, "apiVersion"),
        validation: b.attr_bool_or(el, "validation", false)?,
        windows: Vec::new(),
        devices: Vec::new(),
    };
    let handle = b.layout.nodes.renderers.push(node);
    claim_singleton(&mut b.layout.renderer, handle)?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_window(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Window {
        base: NodeBase::default(),
        title: b
            .attr_string(el, "title")
            .unwrap_or_else(|| "VKML".to_string()),
        width: b.attr_u32_or(el, "width", 1280)?,
        height: b.attr_u32_or(el, "height", 720)?,
        resizable: b.attr_bool_or(el, "resizable", true)?,
        fullscreen: b.attr_bool_or(el, "fullscreen", false)?,
    };
    let handle = b.layout.nodes.windows.push(node);
    if let Some(renderer) = parent.and_then(AnyHandle::downcast::<Renderer>) {
        b.layout.nodes.renderers[renderer].windows.push(handle);
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_device(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let renderer = parent.and_then(AnyHandle::downcast::<Renderer>);
    let extensions = b
        .attr_string(el, "extensions")
        .map(|text| text.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let node = Device {
        base: NodeBase::default(),
        renderer,
        device_index: b.attr_u32(el, "deviceIndex")?,
        device_type: b.attr_enum(el, "deviceType")?,
        extensions,
        queues: Vec::new(),
    };
    let handle = b.layout.nodes.devices.push(node);
    claim_singleton(&mut b.layout.device, handle)?;
    if let Some(renderer) = renderer {
        b.layout.nodes.renderers[renderer].devices.push(handle);
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_queue(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let device = structural_parent::<Device>(el, parent)?;
    let node = Queue {
        base: NodeBase::default(),
        device,
        capabilities: b.attr_flags(el, "capabilities")?,
        family: b.attr_u32(el, "family")?,
        index: b.attr_u32_or(el, "index", 0)?,
        priority: b.attr_f32_or(el, "priority", 1.0)?,
    };
    let handle = b.layout.nodes.queues.push(node);
    b.layout.nodes.devices[device].queues.push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_resource_loader(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ResourceLoader {
        base: NodeBase::default(),
        queue: b.reference(el, "queue"),
        threads: b.attr_u32_or(el, "threads", 1)?,
    };
    let handle = b.layout.nodes.resource_loaders.push(node);
    claim_singleton(&mut b.layout.resource_loader, handle)?;
    Ok(Parsed::Node(handle.into()))
}
