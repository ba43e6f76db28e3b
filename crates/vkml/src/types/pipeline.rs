//! Pipeline-description nodes: render passes, shader stages and the
//! fixed-function state blocks.

use crate::document::{AnyHandle, Handle, NodeBase, Ref};

use super::enums::{
    Access, AttachmentLoadOp, AttachmentStoreOp, BlendFactor, BlendOp, ColorComponent, CompareOp,
    CullMode, DependencyFlag, DescriptorType, DynamicStateKind, Format, FrontFace, ImageLayout,
    LogicOp, PipelineBindPoint, PipelineStage, PolygonMode, PrimitiveTopology, ShaderStage,
    VertexInputRate,
};

#[derive(Debug, Default)]
pub struct RenderPass {
    pub base: NodeBase,
    /// Attachment order defines the indices recorded on
    /// ColorAttachment/DepthStencilAttachment nodes during resolution.
    pub attachments: Vec<Handle<Attachment>>,
    pub subpasses: Vec<Handle<Subpass>>,
    pub dependencies: Vec<Handle<Dependency>>,
    pub multiview: Option<Handle<Multiview>>,
}

/// Multiview masks for the owning render pass.
#[derive(Debug)]
pub struct Multiview {
    pub base: NodeBase,
    pub render_pass: Handle<RenderPass>,
    pub view_masks: Vec<u32>,
    pub correlation_masks: Vec<u32>,
}

#[derive(Debug)]
pub struct Attachment {
    pub base: NodeBase,
    pub render_pass: Handle<RenderPass>,
    pub format: Format,
    pub samples: u32,
    pub load_op: AttachmentLoadOp,
    pub store_op: AttachmentStoreOp,
    pub stencil_load_op: AttachmentLoadOp,
    pub stencil_store_op: AttachmentStoreOp,
    pub initial_layout: ImageLayout,
    pub final_layout: ImageLayout,
}

#[derive(Debug)]
pub struct Subpass {
    pub base: NodeBase,
    pub render_pass: Handle<RenderPass>,
    pub bind_point: PipelineBindPoint,
    pub color_attachments: Vec<Handle<ColorAttachment>>,
    pub depth_stencil: Option<Handle<DepthStencilAttachment>>,
}

/// A subpass's use of a color attachment. `index` is derived during
/// resolution from the attachment's position in the render pass.
#[derive(Debug)]
pub struct ColorAttachment {
    pub base: NodeBase,
    pub subpass: Handle<Subpass>,
    pub attachment: Ref<Attachment>,
    pub layout: ImageLayout,
    pub index: Option<u32>,
}

#[derive(Debug)]
pub struct DepthStencilAttachment {
    pub base: NodeBase,
    pub subpass: Handle<Subpass>,
    pub attachment: Ref<Attachment>,
    pub layout: ImageLayout,
    pub index: Option<u32>,
}

/// Execution/memory dependency between two subpasses of the owning render
/// pass. An absent src/dst reference means the external scope; its derived
/// index stays `None`.
#[derive(Debug)]
pub struct Dependency {
    pub base: NodeBase,
    pub render_pass: Handle<RenderPass>,
    pub src: Ref<Subpass>,
    pub dst: Ref<Subpass>,
    pub src_subpass: Option<u32>,
    pub dst_subpass: Option<u32>,
    pub src_stage_mask: Vec<PipelineStage>,
    pub dst_stage_mask: Vec<PipelineStage>,
    pub src_access_mask: Vec<Access>,
    pub dst_access_mask: Vec<Access>,
    pub flags: Vec<DependencyFlag>,
}

/// SPIR-V module loaded from a file at realization.
#[derive(Debug, Default)]
pub struct ShaderModule {
    pub base: NodeBase,
    pub path: String,
}

#[derive(Debug, Default)]
pub struct DescriptorSetLayout {
    pub base: NodeBase,
    pub bindings: Vec<Handle<DescriptorSetLayoutBinding>>,
}

#[derive(Debug)]
pub struct DescriptorSetLayoutBinding {
    pub base: NodeBase,
    pub layout: Handle<DescriptorSetLayout>,
    pub binding: u32,
    pub descriptor_type: DescriptorType,
    pub count: u32,
    pub stages: Vec<ShaderStage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushConstantRange {
    pub stages: Vec<ShaderStage>,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Default)]
pub struct PipelineLayout {
    pub base: NodeBase,
    pub set_layouts: Vec<Ref<DescriptorSetLayout>>,
    pub push_constants: Option<PushConstantRange>,
}

/// Graphics pipeline. `subpass_index` is derived during resolution from the
/// subpass's position in its render pass.
#[derive(Debug, Default)]
pub struct GraphicsPipeline {
    pub base: NodeBase,
    pub layout: Ref<PipelineLayout>,
    pub render_pass: Ref<RenderPass>,
    pub subpass: Ref<Subpass>,
    pub subpass_index: Option<u32>,
    pub stages: Vec<Handle<Stage>>,
    pub vertex_input: Option<Handle<VertexInputState>>,
    pub input_assembly: Option<Handle<InputAssemblyState>>,
    pub viewport_state: Option<Handle<ViewportState>>,
    pub rasterization: Option<Handle<RasterizationState>>,
    pub multisample: Option<Handle<MultisampleState>>,
    pub depth_stencil: Option<Handle<DepthStencilState>>,
    pub color_blend: Option<Handle<ColorBlendState>>,
    pub dynamic: Option<Handle<DynamicState>>,
}

#[derive(Debug, Default)]
pub struct ComputePipeline {
    pub base: NodeBase,
    pub layout: Ref<PipelineLayout>,
    pub stage: Option<Handle<Stage>>,
}

/// One shader stage of a graphics or compute pipeline.
#[derive(Debug)]
pub struct Stage {
    pub base: NodeBase,
    /// Owning GraphicsPipeline or ComputePipeline.
    pub pipeline: AnyHandle,
    pub stage: ShaderStage,
    pub module: Ref<ShaderModule>,
    pub entry: String,
    pub specialization: Option<Handle<SpecializationInfo>>,
}

/// Specialization constants for the owning stage; `constant_ids` and
/// `values` are parallel lists.
#[derive(Debug, Default)]
pub struct SpecializationInfo {
    pub base: NodeBase,
    pub constant_ids: Vec<u32>,
    pub values: Vec<f32>,
}

#[derive(Debug, Default)]
pub struct VertexInputState {
    pub base: NodeBase,
    pub bindings: Vec<Handle<VertexBindingDescription>>,
    pub attributes: Vec<Handle<VertexAttributeDescription>>,
}

#[derive(Debug)]
pub struct VertexBindingDescription {
    pub base: NodeBase,
    pub input_state: Handle<VertexInputState>,
    pub binding: u32,
    pub stride: u32,
    pub input_rate: VertexInputRate,
}

#[derive(Debug)]
pub struct VertexAttributeDescription {
    pub base: NodeBase,
    pub input_state: Handle<VertexInputState>,
    pub location: u32,
    pub binding: u32,
    pub format: Format,
    pub offset: u32,
}

#[derive(Debug, Default)]
pub struct InputAssemblyState {
    pub base: NodeBase,
    pub topology: PrimitiveTopology,
    pub primitive_restart: bool,
}

#[derive(Debug, Default)]
pub struct ViewportState {
    pub base: NodeBase,
    pub viewports: Vec<Handle<Viewport>>,
    pub scissors: Vec<Handle<Scissor>>,
}

/// Viewport rectangle; child of a ViewportState or a SetViewport command.
#[derive(Debug)]
pub struct Viewport {
    pub base: NodeBase,
    pub parent: AnyHandle,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Scissor rectangle; child of a ViewportState or a SetScissor command.
#[derive(Debug)]
pub struct Scissor {
    pub base: NodeBase,
    pub parent: AnyHandle,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
pub struct RasterizationState {
    pub base: NodeBase,
    pub depth_clamp: bool,
    pub rasterizer_discard: bool,
    pub polygon_mode: PolygonMode,
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub depth_bias: bool,
    pub depth_bias_constant: f32,
    pub depth_bias_clamp: f32,
    pub depth_bias_slope: f32,
    pub line_width: f32,
}

#[derive(Debug, Default)]
pub struct MultisampleState {
    pub base: NodeBase,
    pub samples: u32,
    pub sample_shading: bool,
    pub min_sample_shading: f32,
}

#[derive(Debug, Default)]
pub struct DepthStencilState {
    pub base: NodeBase,
    pub depth_test: bool,
    pub depth_write: bool,
    pub compare_op: CompareOp,
    pub depth_bounds_test: bool,
    pub stencil_test: bool,
    pub min_depth_bounds: f32,
    pub max_depth_bounds: f32,
}

/// Blend state applied uniformly to every color attachment of the subpass.
#[derive(Debug, Default)]
pub struct ColorBlendState {
    pub base: NodeBase,
    pub logic_op: Option<LogicOp>,
    pub blend_constants: [f32; 4],
    pub blend_enable: bool,
    pub src_color_blend_factor: BlendFactor,
    pub dst_color_blend_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_blend_factor: BlendFactor,
    pub dst_alpha_blend_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: Vec<ColorComponent>,
}

#[derive(Debug, Default)]
pub struct DynamicState {
    pub base: NodeBase,
    pub states: Vec<DynamicStateKind>,
}
