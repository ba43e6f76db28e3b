//! Parsers for render passes, pipelines and fixed-function state.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::{LayoutError, NodeKind, Result};

use super::{fill_slot, structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_render_pass(
    b: &mut Builder,
    _el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = RenderPass {
        base: NodeBase::default(),
        attachments: Vec::new(),
        subpasses: Vec::new(),
        dependencies: Vec::new(),
        multiview: None,
    };
    Ok(Parsed::Node(b.layout.nodes.render_passes.push(node).into()))
}

pub(super) fn parse_multiview(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let render_pass = structural_parent::<RenderPass>(el, parent)?;
    let node = Multiview {
        base: NodeBase::default(),
        render_pass,
        view_masks: b.attr_u32_list(el, "viewMasks")?,
        correlation_masks: b.attr_u32_list(el, "correlationMasks")?,
    };
    let handle = b.layout.nodes.multiviews.push(node);
    fill_slot(
        &mut b.layout.nodes.render_passes[render_pass].multiview,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_attachment(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let render_pass = structural_parent::<RenderPass>(el, parent)?;
    let node = Attachment {
        base: NodeBase::default(),
        render_pass,
        format: b.req_enum(el, "format")?,
        samples: b.attr_u32_or(el, "samples", 1)?,
        load_op: b.attr_enum_or(el, "loadOp", AttachmentLoadOp::DontCare)?,
        store_op: b.attr_enum_or(el, "storeOp", AttachmentStoreOp::DontCare)?,
        stencil_load_op: b.attr_enum_or(el, "stencilLoadOp", AttachmentLoadOp::DontCare)?,
        stencil_store_op: b.attr_enum_or(el, "stencilStoreOp", AttachmentStoreOp::DontCare)?,
        initial_layout: b.attr_enum_or(el, "initialLayout", ImageLayout::Undefined)?,
        final_layout: b.req_enum(el, "finalLayout")?,
    };
    let handle = b.layout.nodes.attachments.push(node);
    b.layout.nodes.render_passes[render_pass]
        .attachments
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_subpass(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let render_pass = structural_parent::<RenderPass>(el, parent)?;
    let node = Subpass {
        base: NodeBase::default(),
        render_pass,
        bind_point: b.attr_enum_or(el, "bindPoint", PipelineBindPoint::Graphics)?,
        color_attachments: Vec::new(),
        depth_stencil: None,
    };
    let handle = b.layout.nodes.subpasses.push(node);
    b.layout.nodes.render_passes[render_pass]
        .subpasses
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_color_attachment(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let subpass = structural_parent::<Subpass>(el, parent)?;
    let node = ColorAttachment {
        base: NodeBase::default(),
        subpass,
        attachment: b.req_reference(el, "attachment")?,
        layout: b.attr_enum_or(el, "layout", ImageLayout::ColorAttachmentOptimal)?,
        index: None,
    };
    let handle = b.layout.nodes.color_attachments.push(node);
    b.layout.nodes.subpasses[subpass]
        .color_attachments
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_depth_stencil_attachment(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let subpass = structural_parent::<Subpass>(el, parent)?;
    let node = DepthStencilAttachment {
        base: NodeBase::default(),
        subpass,
        attachment: b.req_reference(el, "attachment")?,
        layout: b.attr_enum_or(el, "layout", ImageLayout::DepthStencilAttachmentOptimal)?,
        index: None,
    };
    let handle = b.layout.nodes.depth_stencil_attachments.push(node);
    fill_slot(
        &mut b.layout.nodes.subpasses[subpass].depth_stencil,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_dependency(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let render_pass = structural_parent::<RenderPass>(el, parent)?;
    let node = Dependency {
        base: NodeBase::default(),
        render_pass,
        src: b.reference(el, "src"),
        dst: b.reference(el, "dst"),
        src_subpass: None,
        dst_subpass: None,
        src_stage_mask: b.attr_flags(el, "srcStageMask")?,
        dst_stage_mask: b.attr_flags(el, "dstStageMask")?,
        src_access_mask: b.attr_flags(el, "srcAccessMask")?,
        dst_access_mask: b.attr_flags(el, "dstAccessMask")?,
        flags: b.attr_flags(el, "flags")?,
    };
    let handle = b.layout.nodes.dependencies.push(node);
    b.layout.nodes.render_passes[render_pass]
        .dependencies
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_shader_module(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ShaderModule {
        base: NodeBase::default(),
        path: b.req_string(el, "path")?,
    };
    Ok(Parsed::Node(b.layout.nodes.shader_modules.push(node).into()))
}

pub(super) fn parse_descriptor_set_layout(
    b: &mut Builder,
    _el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DescriptorSetLayout {
        base: NodeBase::default(),
        bindings: Vec::new(),
    };
    Ok(Parsed::Node(
        b.layout.nodes.descriptor_set_layouts.push(node).into(),
    ))
}

pub(super) fn parse_descriptor_set_layout_binding(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let layout = structural_parent::<DescriptorSetLayout>(el, parent)?;
    let node = DescriptorSetLayoutBinding {
        base: NodeBase::default(),
        layout,
        binding: b.req_u32(el, "binding")?,
        descriptor_type: b.req_enum(el, "type")?,
        count: b.attr_u32_or(el, "count", 1)?,
        stages: b.attr_flags(el, "stages")?,
    };
    let handle = b.layout.nodes.descriptor_set_layout_bindings.push(node);
    b.layout.nodes.descriptor_set_layouts[layout]
        .bindings
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_pipeline_layout(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let push_constants = match b.attr_u32(el, "pushConstantSize")? {
        Some(size) => Some(PushConstantRange {
            stages: b.attr_flags(el, "pushConstantStages")?,
            offset: b.attr_u32_or(el, "pushConstantOffset", 0)?,
            size,
        }),
        None => None,
    };
    let node = PipelineLayout {
        base: NodeBase::default(),
        set_layouts: b.reference_list(el, "setLayouts"),
        push_constants,
    };
    Ok(Parsed::Node(
        b.layout.nodes.pipeline_layouts.push(node).into(),
    ))
}

pub(super) fn parse_graphics_pipeline(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = GraphicsPipeline {
        base: NodeBase::default(),
        layout: b.req_reference(el, "layout")?,
        render_pass: b.reference(el, "renderPass"),
        subpass: b.reference(el, "subpass"),
        subpass_index: None,
        stages: Vec::new(),
        vertex_input: None,
        input_assembly: None,
        viewport_state: None,
        rasterization: None,
        multisample: None,
        depth_stencil: None,
        color_blend: None,
        dynamic: None,
    };
    Ok(Parsed::Node(
        b.layout.nodes.graphics_pipelines.push(node).into(),
    ))
}

pub(super) fn parse_compute_pipeline(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ComputePipeline {
        base: NodeBase::default(),
        layout: b.req_reference(el, "layout")?,
        stage: None,
    };
    Ok(Parsed::Node(
        b.layout.nodes.compute_pipelines.push(node).into(),
    ))
}

pub(super) fn parse_stage(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let Some(pipeline) = parent.filter(|p| {
        matches!(
            p.kind,
            NodeKind::GraphicsPipeline | NodeKind::ComputePipeline
        )
    }) else {
        return Err(LayoutError::InvalidStructure(
            "<Stage> must be declared inside a pipeline".to_string(),
        ));
    };

    let node = Stage {
        base: NodeBase::default(),
        pipeline,
        stage: b.req_enum(el, "stage")?,
        module: b.req_reference(el, "module")?,
        entry: b
            .attr_string(el, "entry")
            .unwrap_or_else(|| "main".to_string()),
        specialization: None,
    };
    let handle = b.layout.nodes.stages.push(node);

    let index = pipeline.index as usize;
    match pipeline.kind {
        NodeKind::GraphicsPipeline => {
            b.layout.nodes.graphics_pipelines[index].stages.push(handle)
        }
        NodeKind::ComputePipeline => {
            fill_slot(
                &mut b.layout.nodes.compute_pipelines[index].stage,
                handle,
                el,
            )?;
        }
        _ => unreachable!(),
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_specialization_info(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let stage = structural_parent::<Stage>(el, parent)?;
    let constant_ids = b.attr_u32_list(el, "constantIds")?;
    let values = b.attr_f32_list(el, "values")?;
    if constant_ids.len() != values.len() {
        return Err(LayoutError::InvalidStructure(format!(
            "<SpecializationInfo> has {} constant ids but {} values",
            constant_ids.len(),
            values.len()
        )));
    }
    let node = SpecializationInfo {
        base: NodeBase::default(),
        constant_ids,
        values,
    };
    let handle = b.layout.nodes.specialization_infos.push(node);
    fill_slot(&mut b.layout.nodes.stages[stage].specialization, handle, el)?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_vertex_input_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = VertexInputState {
        base: NodeBase::default(),
        bindings: Vec::new(),
        attributes: Vec::new(),
    };
    let handle = b.layout.nodes.vertex_input_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].vertex_input,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_vertex_binding_description(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let input_state = structural_parent::<VertexInputState>(el, parent)?;
    let node = VertexBindingDescription {
        base: NodeBase::default(),
        input_state,
        binding: b.attr_u32_or(el, "binding", 0)?,
        stride: b.req_u32(el, "stride")?,
        input_rate: b.attr_enum_or(el, "inputRate", VertexInputRate::Vertex)?,
    };
    let handle = b.layout.nodes.vertex_binding_descriptions.push(node);
    b.layout.nodes.vertex_input_states[input_state]
        .bindings
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_vertex_attribute_description(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let input_state = structural_parent::<VertexInputState>(el, parent)?;
    let node = VertexAttributeDescription {
        base: NodeBase::default(),
        input_state,
        location: b.req_u32(el, "location")?,
        binding: b.attr_u32_or(el, "binding", 0)?,
        format: b.req_enum(el, "format")?,
        offset: b.attr_u32_or(el, "offset", 0)?,
    };
    let handle = b.layout.nodes.vertex_attribute_descriptions.push(node);
    b.layout.nodes.vertex_input_states[input_state]
        .attributes
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_input_assembly_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = InputAssemblyState {
        base: NodeBase::default(),
        topology: b.attr_enum_or(el, "topology", PrimitiveTopology::TriangleList)?,
        primitive_restart: b.attr_bool_or(el, "primitiveRestart", false)?,
    };
    let handle = b.layout.nodes.input_assembly_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].input_assembly,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_viewport_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = ViewportState {
        base: NodeBase::default(),
        viewports: Vec::new(),
        scissors: Vec::new(),
    };
    let handle = b.layout.nodes.viewport_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].viewport_state,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_viewport(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let Some(parent) = parent.filter(|p| {
        matches!(p.kind, NodeKind::ViewportState | NodeKind::SetViewport)
    }) else {
        return Err(LayoutError::InvalidStructure(
            "<Viewport> must be declared inside <ViewportState> or <SetViewport>".to_string(),
        ));
    };

    let node = Viewport {
        base: NodeBase::default(),
        parent,
        x: b.attr_f32_or(el, "x", 0.0)?,
        y: b.attr_f32_or(el, "y", 0.0)?,
        width: b.attr_f32_or(el, "width", 0.0)?,
        height: b.attr_f32_or(el, "height", 0.0)?,
        min_depth: b.attr_f32_or(el, "minDepth", 0.0)?,
        max_depth: b.attr_f32_or(el, "maxDepth", 1.0)?,
    };
    let handle = b.layout.nodes.viewports.push(node);

    let index = parent.index as usize;
    match parent.kind {
        NodeKind::ViewportState => b.layout.nodes.viewport_states[index]
            .viewports
            .push(handle),
        NodeKind::SetViewport => b.layout.nodes.set_viewports[index].viewports.push(handle),
        _ => unreachable!(),
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_scissor(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let Some(parent) = parent.filter(|p| {
        matches!(p.kind, NodeKind::ViewportState | NodeKind::SetScissor)
    }) else {
        return Err(LayoutError::InvalidStructure(
            "<Scissor> must be declared inside <ViewportState> or <SetScissor>".to_string(),
        ));
    };

    let node = Scissor {
        base: NodeBase::default(),
        parent,
        x: b.attr_i32_or(el, "x", 0)?,
        y: b.attr_i32_or(el, "y", 0)?,
        width: b.attr_u32_or(el, "width", 0)?,
        height: b.attr_u32_or(el, "height", 0)?,
    };
    let handle = b.layout.nodes.scissors.push(node);

    let index = parent.index as usize;
    match parent.kind {
        NodeKind::ViewportState => b.layout.nodes.viewport_states[index]
            .scissors
            .push(handle),
        NodeKind::SetScissor => b.layout.nodes.set_scissors[index].scissors.push(handle),
        _ => unreachable!(),
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_rasterization_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = RasterizationState {
        base: NodeBase::default(),
        depth_clamp: b.attr_bool_or(el, "depthClamp", false)?,
        rasterizer_discard: b.attr_bool_or(el, "rasterizerDiscard", false)?,
        polygon_mode: b.attr_enum_or(el, "polygonMode", PolygonMode::Fill)?,
        cull_mode: b.attr_enum_or(el, "cullMode", CullMode::None)?,
        front_face: b.attr_enum_or(el, "frontFace", FrontFace::CounterClockwise)?,
        depth_bias: b.attr_bool_or(el, "depthBias", false)?,
        depth_bias_constant: b.attr_f32_or(el, "depthBiasConstant", 0.0)?,
        depth_bias_clamp: b.attr_f32_or(el, "depthBiasClamp", 0.0)?,
        depth_bias_slope: b.attr_f32_or(el, "depthBiasSlope", 0.0)?,
        line_width: b.attr_f32_or(el, "lineWidth", 1.0)?,
    };
    let handle = b.layout.nodes.rasterization_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].rasterization,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_multisample_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = MultisampleState {
        base: NodeBase::default(),
        samples: b.attr_u32_or(el, "samples", 1)?,
        sample_shading: b.attr_bool_or(el, "sampleShading", false)?,
        min_sample_shading: b.attr_f32_or(el, "minSampleShading", 0.0)?,
    };
    let handle = b.layout.nodes.multisample_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].multisample,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_depth_stencil_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = DepthStencilState {
        base: NodeBase::default(),
        depth_test: b.attr_bool_or(el, "depthTest", false)?,
        depth_write: b.attr_bool_or(el, "depthWrite", false)?,
        compare_op: b.attr_enum_or(el, "compareOp", CompareOp::Less)?,
        depth_bounds_test: b.attr_bool_or(el, "depthBoundsTest", false)?,
        stencil_test: b.attr_bool_or(el, "stencilTest", false)?,
        min_depth_bounds: b.attr_f32_or(el, "minDepthBounds", 0.0)?,
        max_depth_bounds: b.attr_f32_or(el, "maxDepthBounds", 1.0)?,
    };
    let handle = b.layout.nodes.depth_stencil_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].depth_stencil,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_color_blend_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let mut color_write_mask = b.attr_flags(el, "colorWriteMask")?;
    if color_write_mask.is_empty() {
        color_write_mask = vec![
            ColorComponent::R,
            ColorComponent::G,
            ColorComponent::B,
            ColorComponent::A,
        ];
    }
    let node = ColorBlendState {
        base: NodeBase::default(),
        logic_op: b.attr_enum(el, "logicOp")?,
        blend_constants: b
            .attr_f32_array(el, "blendConstants")?
            .unwrap_or([0.0; 4]),
        blend_enable: b.attr_bool_or(el, "blend", false)?,
        src_color_blend_factor: b.attr_enum_or(el, "srcColorBlendFactor", BlendFactor::One)?,
        dst_color_blend_factor: b.attr_enum_or(el, "dstColorBlendFactor", BlendFactor::Zero)?,
        color_blend_op: b.attr_enum_or(el, "colorBlendOp", BlendOp::Add)?,
        src_alpha_blend_factor: b.attr_enum_or(el, "srcAlphaBlendFactor", BlendFactor::One)?,
        dst_alpha_blend_factor: b.attr_enum_or(el, "dstAlphaBlendFactor", BlendFactor::Zero)?,
        alpha_blend_op: b.attr_enum_or(el, "alphaBlendOp", BlendOp::Add)?,
        color_write_mask,
    };
    let handle = b.layout.nodes.color_blend_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].color_blend,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_dynamic_state(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = structural_parent::<GraphicsPipeline>(el, parent)?;
    let node = DynamicState {
        base: NodeBase::default(),
        states: b.attr_flags(el, "states")?,
    };
    let handle = b.layout.nodes.dynamic_states.push(node);
    fill_slot(
        &mut b.layout.nodes.graphics_pipelines[pipeline].dynamic,
        handle,
        el,
    )?;
    Ok(Parsed::Node(handle.into()))
}
