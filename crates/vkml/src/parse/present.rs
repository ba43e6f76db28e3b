//! Parsers for presentation: viewers, submission and per-window helpers.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::{LayoutError, Result};

use super::{attach_step, structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_overlay(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Overlay {
        base: NodeBase::default(),
        window: b.req_reference(el, "window")?,
        render_pass: b.reference(el, "renderPass"),
        scale: b.attr_f32_or(el, "scale", 1.0)?,
    };
    Ok(Parsed::Node(b.layout.nodes.overlays.push(node).into()))
}

pub(super) fn parse_window_viewer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = WindowViewer {
        base: NodeBase::default(),
        window: b.req_reference(el, "window")?,
        swapchain: b.req_reference(el, "swapchain")?,
        frames: Vec::new(),
    };
    Ok(Parsed::Node(b.layout.nodes.window_viewers.push(node).into()))
}

pub(super) fn parse_acquire_next_image(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = AcquireNextImage {
        base: NodeBase::default(),
        swapchain: b.req_reference(el, "swapchain")?,
        semaphore: b.reference(el, "semaphore"),
        fence: b.reference(el, "fence"),
        timeout: b.attr_u64_or(el, "timeout", u64::MAX)?,
    };
    let handle = b.layout.nodes.acquire_next_images.push(node);
    attach_step(b, parent, handle.into());
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_queue_submit(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = QueueSubmit {
        base: NodeBase::default(),
        queue: b.req_reference(el, "queue")?,
        fence: b.reference(el, "fence"),
        submits: Vec::new(),
    };
    let handle = b.layout.nodes.queue_submits.push(node);
    attach_step(b, parent, handle.into());
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_submit(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let queue_submit = structural_parent::<QueueSubmit>(el, parent)?;
    let wait_semaphores = b.reference_list(el, "waitSemaphores");
    let wait_stages = b.attr_flags(el, "waitStages")?;
    if !wait_stages.is_empty() && wait_stages.len() != wait_semaphores.len() {
        return Err(LayoutError::InvalidStructure(format!(
            "<Submit> has {} wait semaphores but {} wait stages",
            wait_semaphores.len(),
            wait_stages.len()
        )));
    }
    let node = Submit {
        base: NodeBase::default(),
        queue_submit,
        wait_semaphores,
        wait_stages,
        command_buffers: b.reference_list(el, "commandBuffers"),
        signal_semaphores: b.reference_list(el, "signalSemaphores"),
    };
    let handle = b.layout.nodes.submits.push(node);
    b.layout.nodes.queue_submits[queue_submit]
        .submits
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_queue_present(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = QueuePresent {
        base: NodeBase::default(),
        queue: b.req_reference(el, "queue")?,
        swapchains: b.reference_list(el, "swapchains"),
        wait_semaphores: b.reference_list(el, "waitSemaphores"),
    };
    let handle = b.layout.nodes.queue_presents.push(node);
    attach_step(b, parent, handle.into());
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_resizer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Resizer {
        base: NodeBase::default(),
        swapchain: b.req_reference(el, "swapchain")?,
        targets: b.any_reference_list(el, "targets"),
    };
    Ok(Parsed::Node(b.layout.nodes.resizers.push(node).into()))
}

pub(super) fn parse_updater(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Updater {
        base: NodeBase::default(),
        functions: b.reference_list(el, "functions"),
    };
    Ok(Parsed::Node(b.layout.nodes.updaters.push(node).into()))
}
