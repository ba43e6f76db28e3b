//! Recorded-command nodes and their containers.

use crate::document::{AnyRef, Handle, NodeBase, Ref};

use super::binding::DescriptorSet;
use super::enums::{
    Access, DependencyFlag, Filter, ImageAspect, ImageLayout, IndexType, PipelineBindPoint,
    PipelineStage, ShaderStage, SubpassContents,
};
use super::frame::{CommandBuffer, Event, Framebuffer, QueryPool};
use super::memory::{Buffer, Image};
use super::pipeline::{PipelineLayout, RenderPass, Scissor, Viewport};
use super::present::Overlay;

/// Reusable named command sequence. Other lists reference it with
/// `<CommandGroup ref="..."/>`, which records an unresolved entry and
/// produces no node.
#[derive(Debug, Default)]
pub struct CommandGroup {
    pub base: NodeBase,
    pub commands: Vec<AnyRef>,
}

/// Inline command sequence.
#[derive(Debug, Default)]
pub struct CommandList {
    pub base: NodeBase,
    pub commands: Vec<AnyRef>,
}

/// Binds a command sequence to a command buffer for recording.
#[derive(Debug, Default)]
pub struct CommandContext {
    pub base: NodeBase,
    pub command_buffer: Ref<CommandBuffer>,
    pub commands: Vec<AnyRef>,
}

/// Named command sequence invoked by the host application.
#[derive(Debug, Default)]
pub struct Function {
    pub base: NodeBase,
    pub name: String,
    pub commands: Vec<AnyRef>,
}

#[derive(Debug, Default)]
pub struct PipelineBarrier {
    pub base: NodeBase,
    pub src_stage_mask: Vec<PipelineStage>,
    pub dst_stage_mask: Vec<PipelineStage>,
    pub flags: Vec<DependencyFlag>,
    pub buffer_barriers: Vec<Handle<BufferMemoryBarrier>>,
    pub image_barriers: Vec<Handle<ImageMemoryBarrier>>,
}

#[derive(Debug)]
pub struct BufferMemoryBarrier {
    pub base: NodeBase,
    pub barrier: Handle<PipelineBarrier>,
    pub src_access_mask: Vec<Access>,
    pub dst_access_mask: Vec<Access>,
    pub src_queue_family: Option<u32>,
    pub dst_queue_family: Option<u32>,
    pub buffer: Ref<Buffer>,
    pub offset: u64,
    /// `None` means the whole remaining buffer.
    pub size: Option<u64>,
}

#[derive(Debug)]
pub struct ImageMemoryBarrier {
    pub base: NodeBase,
    pub barrier: Handle<PipelineBarrier>,
    pub src_access_mask: Vec<Access>,
    pub dst_access_mask: Vec<Access>,
    pub old_layout: ImageLayout,
    pub new_layout: ImageLayout,
    pub src_queue_family: Option<u32>,
    pub dst_queue_family: Option<u32>,
    pub image: Ref<Image>,
    pub aspect_mask: Vec<ImageAspect>,
    pub base_mip_level: u32,
    pub level_count: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

/// Buffer-to-buffer copy. A CopyBuffer without explicit regions gets one
/// implicit whole-buffer region at parse time.
#[derive(Debug, Default)]
pub struct CopyBuffer {
    pub base: NodeBase,
    pub src: Ref<Buffer>,
    pub dst: Ref<Buffer>,
    pub regions: Vec<Handle<BufferCopy>>,
}

/// One copy region. An absent `size` defaults to
/// `min(src.size, dst.size)` during resolution.
#[derive(Debug)]
pub struct BufferCopy {
    pub base: NodeBase,
    pub copy: Handle<CopyBuffer>,
    pub src_offset: u64,
    pub dst_offset: u64,
    pub size: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Dispatch {
    pub base: NodeBase,
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

#[derive(Debug, Default)]
pub struct BeginRenderPass {
    pub base: NodeBase,
    pub render_pass: Ref<RenderPass>,
    pub framebuffer: Ref<Framebuffer>,
    pub x: i32,
    pub y: i32,
    /// Render-area extent; `None` covers the whole framebuffer.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub clear_color: Option<[f32; 4]>,
    pub clear_depth: f32,
    pub clear_stencil: u32,
    pub contents: SubpassContents,
}

#[derive(Debug, Default)]
pub struct EndRenderPass {
    pub base: NodeBase,
}

#[derive(Debug, Default)]
pub struct SetViewport {
    pub base: NodeBase,
    pub first: u32,
    pub viewports: Vec<Handle<Viewport>>,
}

#[derive(Debug, Default)]
pub struct SetScissor {
    pub base: NodeBase,
    pub first: u32,
    pub scissors: Vec<Handle<Scissor>>,
}

#[derive(Debug, Default)]
pub struct BindDescriptorSets {
    pub base: NodeBase,
    pub bind_point: PipelineBindPoint,
    pub layout: Ref<PipelineLayout>,
    pub first_set: u32,
    pub sets: Vec<Ref<DescriptorSet>>,
    pub dynamic_offsets: Vec<u32>,
}

/// Binds a graphics or compute pipeline; the target kind is checked during
/// resolution.
#[derive(Debug)]
pub struct BindPipeline {
    pub base: NodeBase,
    pub bind_point: PipelineBindPoint,
    pub pipeline: AnyRef,
}

#[derive(Debug, Default)]
pub struct BindVertexBuffers {
    pub base: NodeBase,
    pub first_binding: u32,
    pub buffers: Vec<Ref<Buffer>>,
    /// Byte offsets, parallel to `buffers`; missing entries mean 0.
    pub offsets: Vec<u64>,
}

#[derive(Debug, Default)]
pub struct BindIndexBuffer {
    pub base: NodeBase,
    pub buffer: Ref<Buffer>,
    pub offset: u64,
    pub index_type: IndexType,
}

#[derive(Debug, Default)]
pub struct Draw {
    pub base: NodeBase,
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

#[derive(Debug, Default)]
pub struct DrawIndexed {
    pub base: NodeBase,
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}

#[derive(Debug, Default)]
pub struct DrawIndexedIndirect {
    pub base: NodeBase,
    pub buffer: Ref<Buffer>,
    pub offset: u64,
    pub draw_count: u32,
    pub stride: u32,
}

#[derive(Debug, Default)]
pub struct BlitImage {
    pub base: NodeBase,
    pub src_image: Ref<Image>,
    pub src_layout: ImageLayout,
    pub dst_image: Ref<Image>,
    pub dst_layout: ImageLayout,
    pub filter: Filter,
    /// Source corners as `x0 y0 z0 x1 y1 z1`; `None` covers the whole image.
    pub src_region: Option<[i32; 6]>,
    pub dst_region: Option<[i32; 6]>,
}

#[derive(Debug, Default)]
pub struct PushConstants {
    pub base: NodeBase,
    pub layout: Ref<PipelineLayout>,
    pub stages: Vec<ShaderStage>,
    pub offset: u32,
    pub values: Vec<f32>,
}

#[derive(Debug, Default)]
pub struct ResetQueryPool {
    pub base: NodeBase,
    pub pool: Ref<QueryPool>,
    pub first_query: u32,
    /// `None` resets through the end of the pool.
    pub query_count: Option<u32>,
}

#[derive(Debug, Default)]
pub struct SetEvent {
    pub base: NodeBase,
    pub event: Ref<Event>,
    pub stage_mask: Vec<PipelineStage>,
}

#[derive(Debug, Default)]
pub struct ResetEvent {
    pub base: NodeBase,
    pub event: Ref<Event>,
    pub stage_mask: Vec<PipelineStage>,
}

#[derive(Debug, Default)]
pub struct NextSubpass {
    pub base: NodeBase,
    pub contents: SubpassContents,
}

#[derive(Debug, Default)]
pub struct DrawOverlay {
    pub base: NodeBase,
    pub overlay: Ref<Overlay>,
}
