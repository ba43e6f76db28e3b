//! Frame and synchronization nodes.

use crate::document::{AnyHandle, AnyRef, NodeBase, Ref};

use super::device::Queue;
use super::enums::{CommandBufferLevel, CommandBufferUsage, QueryType};
use super::memory::ImageView;
use super::pipeline::RenderPass;

/// Per-frame step sequence of a viewer: acquire, submit, present (and, for
/// XR, end-frame) nodes in document order.
#[derive(Debug, Default)]
pub struct Frame {
    pub base: NodeBase,
    /// Owning WindowViewer or RealityViewer, when nested in one.
    pub viewer: Option<AnyHandle>,
    pub steps: Vec<AnyHandle>,
}

#[derive(Debug, Default)]
pub struct Framebuffer {
    pub base: NodeBase,
    pub render_pass: Ref<RenderPass>,
    pub attachments: Vec<Ref<ImageView>>,
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

#[derive(Debug, Default)]
pub struct Semaphore {
    pub base: NodeBase,
}

#[derive(Debug, Default)]
pub struct Fence {
    pub base: NodeBase,
    /// Create in the signaled state.
    pub signaled: bool,
}

#[derive(Debug, Default)]
pub struct Event {
    pub base: NodeBase,
}

#[derive(Debug, Default)]
pub struct QueryPool {
    pub base: NodeBase,
    pub query_type: QueryType,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct CommandPool {
    pub base: NodeBase,
    pub queue: Ref<Queue>,
    pub transient: bool,
    pub reset_command_buffer: bool,
}

/// Command buffer with its recorded command sequence. Entries are command
/// nodes declared inline or CommandGroup references.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub base: NodeBase,
    pub pool: Ref<CommandPool>,
    pub level: CommandBufferLevel,
    pub usage: Vec<CommandBufferUsage>,
    pub commands: Vec<AnyRef>,
}
