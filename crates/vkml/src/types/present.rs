//! Presentation nodes: viewers, queue submission/presentation and the
//! per-window helpers.

use crate::document::{AnyRef, Handle, NodeBase, Ref};

use super::command::Function;
use super::device::{Queue, Window};
use super::enums::PipelineStage;
use super::frame::{CommandBuffer, Fence, Frame, Semaphore};
use super::memory::Swapchain;
use super::pipeline::RenderPass;

/// Overlay (debug UI) configuration for a window.
#[derive(Debug, Default)]
pub struct Overlay {
    pub base: NodeBase,
    pub window: Ref<Window>,
    pub render_pass: Ref<RenderPass>,
    pub scale: f32,
}

/// Drives the per-window frame loop over its Frame children.
#[derive(Debug, Default)]
pub struct WindowViewer {
    pub base: NodeBase,
    pub window: Ref<Window>,
    pub swapchain: Ref<Swapchain>,
    pub frames: Vec<Handle<Frame>>,
}

#[derive(Debug, Default)]
pub struct AcquireNextImage {
    pub base: NodeBase,
    pub swapchain: Ref<Swapchain>,
    pub semaphore: Ref<Semaphore>,
    pub fence: Ref<Fence>,
    /// Nanoseconds; defaults to no timeout.
    pub timeout: u64,
}

#[derive(Debug, Default)]
pub struct QueueSubmit {
    pub base: NodeBase,
    pub queue: Ref<Queue>,
    pub fence: Ref<Fence>,
    pub submits: Vec<Handle<Submit>>,
}

/// One batch of a QueueSubmit. `wait_stages` is parallel to
/// `wait_semaphores`.
#[derive(Debug)]
pub struct Submit {
    pub base: NodeBase,
    pub queue_submit: Handle<QueueSubmit>,
    pub wait_semaphores: Vec<Ref<Semaphore>>,
    pub wait_stages: Vec<PipelineStage>,
    pub command_buffers: Vec<Ref<CommandBuffer>>,
    pub signal_semaphores: Vec<Ref<Semaphore>>,
}

#[derive(Debug, Default)]
pub struct QueuePresent {
    pub base: NodeBase,
    pub queue: Ref<Queue>,
    pub swapchains: Vec<Ref<Swapchain>>,
    pub wait_semaphores: Vec<Ref<Semaphore>>,
}

/// Re-realizes its targets when the window surface changes size.
#[derive(Debug, Default)]
pub struct Resizer {
    pub base: NodeBase,
    pub swapchain: Ref<Swapchain>,
    pub targets: Vec<AnyRef>,
}

/// Runs host-side functions once per frame.
#[derive(Debug, Default)]
pub struct Updater {
    pub base: NodeBase,
    pub functions: Vec<Ref<Function>>,
}
