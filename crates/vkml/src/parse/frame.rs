//! Parsers for frame and synchronization objects.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::{NodeKind, Result};

use super::{Builder, Parsed, XmlNode};

pub(super) fn parse_frame(
    b: &mut Builder,
    _el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let viewer = parent.filter(|p| {
        matches!(p.kind, NodeKind::WindowViewer | NodeKind::RealityViewer)
    });
    let node = Frame {
        base: NodeBase::default(),
        viewer,
        steps: Vec::new(),
    };
    let handle = b.layout.nodes.frames.push(node);

    if let Some(viewer) = viewer {
        let index = viewer.index as usize;
        match viewer.kind {
            NodeKind::WindowViewer => b.layout.nodes.window_viewers[index].frames.push(handle),
            NodeKind::RealityViewer => b.layout.nodes.reality_viewers[index].frames.push(handle),
            _ => unreachable!(),
        }
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_framebuffer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Framebuffer {
        base: NodeBase::default(),
        render_pass: b.req_reference(el, "renderPass")?,
        attachments: b.reference_list(el, "attachments"),
        width: b.req_u32(el, "width")?,
        height: b.req_u32(el, "height")?,
        layers: b.attr_u32_or(el, "layers", 1)?,
    };
    Ok(Parsed::Node(b.layout.nodes.framebuffers.push(node).into()))
}

pub(super) fn parse_semaphore(
    b: &mut Builder,
    _el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Semaphore {
        base: NodeBase::default(),
    };
    Ok(Parsed::Node(b.layout.nodes.semaphores.push(node).into()))
}

pub(super) fn parse_fence(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Fence {
        base: NodeBase::default(),
        signaled: b.attr_bool_or(el, "signaled", false)?,
    };
    Ok(Parsed::Node(b.layout.nodes.fences.push(node).into()))
}

pub(super) fn parse_event(
    b: &mut Builder,
    _el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Event {
        base: NodeBase::default(),
    };
    Ok(Parsed::Node(b.layout.nodes.events.push(node).into()))
}

pub(super) fn parse_query_pool(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = QueryPool {
        base: NodeBase::default(),
        query_type: b.req_enum(el, "type")?,
        count: b.req_u32(el, "count")?,
    };
    Ok(Parsed::Node(b.layout.nodes.query_pools.push(node).into()))
}

pub(super) fn parse_command_pool(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CommandPool {
        base: NodeBase::default(),
        queue: b.req_reference(el, "queue")?,
        transient: b.attr_bool_or(el, "transient", false)?,
        reset_command_buffer: b.attr_bool_or(el, "resetCommandBuffer", false)?,
    };
    Ok(Parsed::Node(b.layout.nodes.command_pools.push(node).into()))
}

pub(super) fn parse_command_buffer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CommandBuffer {
        base: NodeBase::default(),
        pool: b.req_reference(el, "pool")?,
        level: b.attr_enum_or(el, "level", CommandBufferLevel::Primary)?,
        usage: b.attr_flags(el, "usage")?,
        commands: Vec::new(),
    };
    Ok(Parsed::Node(
        b.layout.nodes.command_buffers.push(node).into(),
    ))
}
