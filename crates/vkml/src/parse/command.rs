//! Parsers for recorded commands and their containers.

use crate::document::{AnyHandle, AnyRef, NodeBase};
use crate::types::*;
use crate::Result;

use super::{attach_step, invalid, missing, record, structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_command_group(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    // A reference-only element records an unresolved entry in the parent's
    // list and produces no node; the group itself may be declared later.
    if let Some(id) = el.attribute("ref") {
        if id.is_empty() {
            return Err(invalid(el, "ref", id));
        }
        record(b, el, parent, AnyRef::Unresolved(id.to_string()))?;
        return Ok(Parsed::Skip);
    }

    let node = CommandGroup {
        base: NodeBase::default(),
        commands: Vec::new(),
    };
    let handle = b.layout.nodes.command_groups.push(node);
    if parent.is_some() {
        record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_command_list(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CommandList {
        base: NodeBase::default(),
        commands: Vec::new(),
    };
    let handle = b.layout.nodes.command_lists.push(node);
    if parent.is_some() {
        record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_command_context(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CommandContext {
        base: NodeBase::default(),
        command_buffer: b.req_reference(el, "commandBuffer")?,
        commands: Vec::new(),
    };
    let handle = b.layout.nodes.command_contexts.push(node);
    attach_step(b, parent, handle.into());
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_function(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Function {
        base: NodeBase::default(),
        name: b.req_string(el, "name")?,
        commands: Vec::new(),
    };
    Ok(Parsed::Node(b.layout.nodes.functions.push(node).into()))
}

pub(super) fn parse_pipeline_barrier(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = PipelineBarrier {
        base: NodeBase::default(),
        src_stage_mask: b.attr_flags(el, "srcStageMask")?,
        dst_stage_mask: b.attr_flags(el, "dstStageMask")?,
        flags: b.attr_flags(el, "flags")?,
        buffer_barriers: Vec::new(),
        image_barriers: Vec::new(),
    };
    let handle = b.layout.nodes.pipeline_barriers.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_buffer_memory_barrier(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let barrier = structural_parent::<PipelineBarrier>(el, parent)?;
    let node = BufferMemoryBarrier {
        base: NodeBase::default(),
        barrier,
        src_access_mask: b.attr_flags(el, "srcAccessMask")?,
        dst_access_mask: b.attr_flags(el, "dstAccessMask")?,
        src_queue_family: b.attr_u32(el, "srcQueueFamily")?,
        dst_queue_family: b.attr_u32(el, "dstQueueFamily")?,
        buffer: b.req_reference(el, "buffer")?,
        offset: b.attr_u64_or(el, "offset", 0)?,
        size: b.attr_u64(el, "size")?,
    };
    let handle = b.layout.nodes.buffer_memory_barriers.push(node);
    b.layout.nodes.pipeline_barriers[barrier]
        .buffer_barriers
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_image_memory_barrier(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let barrier = structural_parent::<PipelineBarrier>(el, parent)?;
    let mut aspect_mask = b.attr_flags(el, "aspectMask")?;
    if aspect_mask.is_empty() {
        aspect_mask.push(ImageAspect::Color);
    }
    let node = ImageMemoryBarrier {
        base: NodeBase::default(),
        barrier,
        src_access_mask: b.attr_flags(el, "srcAccessMask")?,
        dst_access_mask: b.attr_flags(el, "dstAccessMask")?,
        old_layout: b.attr_enum_or(el, "oldLayout", ImageLayout::Undefined)?,
        new_layout: b.req_enum(el, "newLayout")?,
        src_queue_family: b.attr_u32(el, "srcQueueFamily")?,
        dst_queue_family: b.attr_u32(el, "dstQueueFamily")?,
        image: b.req_reference(el, "image")?,
        aspect_mask,
        base_mip_level: b.attr_u32_or(el, "baseMipLevel", 0)?,
        level_count: b.attr_u32_or(el, "levelCount", 1)?,
        base_array_layer: b.attr_u32_or(el, "baseArrayLayer", 0)?,
        layer_count: b.attr_u32_or(el, "layerCount", 1)?,
    };
    let handle = b.layout.nodes.image_memory_barriers.push(node);
    b.layout.nodes.pipeline_barriers[barrier]
        .image_barriers
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_copy_buffer(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CopyBuffer {
        base: NodeBase::default(),
        src: b.req_reference(el, "src")?,
        dst: b.req_reference(el, "dst")?,
        regions: Vec::new(),
    };
    let handle = b.layout.nodes.copy_buffers.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;

    // A region-less copy gets one implicit region from the element's own
    // offset/size attributes; its size defaults during resolution.
    let has_regions = el
        .children()
        .any(|child| child.is_element() && child.tag_name().name() == "BufferCopy");
    if !has_regions {
        let region = BufferCopy {
            base: NodeBase::default(),
            copy: handle,
            src_offset: b.attr_u64_or(el, "srcOffset", 0)?,
            dst_offset: b.attr_u64_or(el, "dstOffset", 0)?,
            size: b.attr_u64(el, "size")?,
        };
        let region_handle = b.layout.nodes.buffer_copies.push(region);
        b.layout.nodes.copy_buffers[handle].regions.push(region_handle);
    }
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_buffer_copy(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let copy = structural_parent::<CopyBuffer>(el, parent)?;
    let node = BufferCopy {
        base: NodeBase::default(),
        copy,
        src_offset: b.attr_u64_or(el, "srcOffset", 0)?,
        dst_offset: b.attr_u64_or(el, "dstOffset", 0)?,
        size: b.attr_u64(el, "size")?,
    };
    let handle = b.layout.nodes.buffer_copies.push(node);
    b.layout.nodes.copy_buffers[copy].regions.push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_dispatch(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Dispatch {
        base: NodeBase::default(),
        x: b.attr_u32_or(el, "x", 1)?,
        y: b.attr_u32_or(el, "y", 1)?,
        z: b.attr_u32_or(el, "z", 1)?,
    };
    let handle = b.layout.nodes.dispatches.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_begin_render_pass(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BeginRenderPass {
        base: NodeBase::default(),
        render_pass: b.req_reference(el, "renderPass")?,
        framebuffer: b.req_reference(el, "framebuffer")?,
        x: b.attr_i32_or(el, "x", 0)?,
        y: b.attr_i32_or(el, "y", 0)?,
        width: b.attr_u32(el, "width")?,
        height: b.attr_u32(el, "height")?,
        clear_color: b.attr_f32_array(el, "clearColor")?,
        clear_depth: b.attr_f32_or(el, "clearDepth", 1.0)?,
        clear_stencil: b.attr_u32_or(el, "clearStencil", 0)?,
        contents: b.attr_enum_or(el, "contents", SubpassContents::Inline)?,
    };
    let handle = b.layout.nodes.begin_render_passes.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_end_render_pass(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = EndRenderPass {
        base: NodeBase::default(),
    };
    let handle = b.layout.nodes.end_render_passes.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_set_viewport(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = SetViewport {
        base: NodeBase::default(),
        first: b.attr_u32_or(el, "first", 0)?,
        viewports: Vec::new(),
    };
    let handle = b.layout.nodes.set_viewports.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_set_scissor(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = SetScissor {
        base: NodeBase::default(),
        first: b.attr_u32_or(el, "first", 0)?,
        scissors: Vec::new(),
    };
    let handle = b.layout.nodes.set_scissors.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_bind_descriptor_sets(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BindDescriptorSets {
        base: NodeBase::default(),
        bind_point: b.attr_enum_or(el, "bindPoint", PipelineBindPoint::Graphics)?,
        layout: b.req_reference(el, "layout")?,
        first_set: b.attr_u32_or(el, "firstSet", 0)?,
        sets: b.reference_list(el, "sets"),
        dynamic_offsets: b.attr_u32_list(el, "dynamicOffsets")?,
    };
    let handle = b.layout.nodes.bind_descriptor_sets.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_bind_pipeline(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let pipeline = el
        .attribute("pipeline")
        .filter(|id| !id.is_empty())
        .map(|id| AnyRef::Unresolved(id.to_string()))
        .ok_or_else(|| missing(el, "pipeline"))?;
    let node = BindPipeline {
        base: NodeBase::default(),
        bind_point: b.attr_enum_or(el, "bindPoint", PipelineBindPoint::Graphics)?,
        pipeline,
    };
    let handle = b.layout.nodes.bind_pipelines.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_bind_vertex_buffers(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BindVertexBuffers {
        base: NodeBase::default(),
        first_binding: b.attr_u32_or(el, "firstBinding", 0)?,
        buffers: b.reference_list(el, "buffers"),
        offsets: b.attr_u64_list(el, "offsets")?,
    };
    let handle = b.layout.nodes.bind_vertex_buffers.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_bind_index_buffer(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BindIndexBuffer {
        base: NodeBase::default(),
        buffer: b.req_reference(el, "buffer")?,
        offset: b.attr_u64_or(el, "offset", 0)?,
        index_type: b.attr_enum_or(el, "indexType", IndexType::Uint32)?,
    };
    let handle = b.layout.nodes.bind_index_buffers.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_draw(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Draw {
        base: NodeBase::default(),
        vertex_count: b.req_u32(el, "vertexCount")?,
        instance_count: b.attr_u32_or(el, "instanceCount", 1)?,
        first_vertex: b.attr_u32_or(el, "firstVertex", 0)?,
        first_instance: b.attr_u32_or(el, "firstInstance", 0)?,
    };
    let handle = b.layout.nodes.draws.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_draw_indexed(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DrawIndexed {
        base: NodeBase::default(),
        index_count: b.req_u32(el, "indexCount")?,
        instance_count: b.attr_u32_or(el, "instanceCount", 1)?,
        first_index: b.attr_u32_or(el, "firstIndex", 0)?,
        vertex_offset: b.attr_i32_or(el, "vertexOffset", 0)?,
        first_instance: b.attr_u32_or(el, "firstInstance", 0)?,
    };
    let handle = b.layout.nodes.draw_indexed.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_draw_indexed_indirect(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DrawIndexedIndirect {
        base: NodeBase::default(),
        buffer: b.req_reference(el, "buffer")?,
        offset: b.attr_u64_or(el, "offset", 0)?,
        draw_count: b.attr_u32_or(el, "drawCount", 1)?,
        stride: b.attr_u32_or(el, "stride", 0)?,
    };
    let handle = b.layout.nodes.draw_indexed_indirects.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_blit_image(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = BlitImage {
        base: NodeBase::default(),
        src_image: b.req_reference(el, "src")?,
        src_layout: b.attr_enum_or(el, "srcLayout", ImageLayout::TransferSrcOptimal)?,
        dst_image: b.req_reference(el, "dst")?,
        dst_layout: b.attr_enum_or(el, "dstLayout", ImageLayout::TransferDstOptimal)?,
        filter: b.attr_enum_or(el, "filter", Filter::Linear)?,
        src_region: b.attr_i32_array(el, "srcRegion")?,
        dst_region: b.attr_i32_array(el, "dstRegion")?,
    };
    let handle = b.layout.nodes.blit_images.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_push_constants(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = PushConstants {
        base: NodeBase::default(),
        layout: b.req_reference(el, "layout")?,
        stages: b.attr_flags(el, "stages")?,
        offset: b.attr_u32_or(el, "offset", 0)?,
        values: b.attr_f32_list(el, "values")?,
    };
    let handle = b.layout.nodes.push_constants.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_reset_query_pool(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ResetQueryPool {
        base: NodeBase::default(),
        pool: b.req_reference(el, "pool")?,
        first_query: b.attr_u32_or(el, "firstQuery", 0)?,
        query_count: b.attr_u32(el, "queryCount")?,
    };
    let handle = b.layout.nodes.reset_query_pools.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_set_event(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = SetEvent {
        base: NodeBase::default(),
        event: b.req_reference(el, "event")?,
        stage_mask: b.attr_flags(el, "stageMask")?,
    };
    let handle = b.layout.nodes.set_events.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_reset_event(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ResetEvent {
        base: NodeBase::default(),
        event: b.req_reference(el, "event")?,
        stage_mask: b.attr_flags(el, "stageMask")?,
    };
    let handle = b.layout.nodes.reset_events.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_next_subpass(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = NextSubpass {
        base: NodeBase::default(),
        contents: b.attr_enum_or(el, "contents", SubpassContents::Inline)?,
    };
    let handle = b.layout.nodes.next_subpasses.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_draw_overlay(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = DrawOverlay {
        base: NodeBase::default(),
        overlay: b.req_reference(el, "overlay")?,
    };
    let handle = b.layout.nodes.draw_overlays.push(node);
    record(b, el, parent, AnyRef::Resolved(handle.into()))?;
    Ok(Parsed::Node(handle.into()))
}
