//! Build phase: the tree walker, the element dispatcher and the shared
//! attribute helpers used by every per-kind parser.

mod binding;
mod command;
mod device;
mod frame;
mod memory;
mod pipeline;
mod present;
mod xr;

use std::str::FromStr;

use crate::document::{AnyHandle, AnyRef, Handle, NodeType, Ref};
use crate::{CompileOptions, Layout, LayoutError, NodeKind, Result};

use vkml_expr::Evaluator;

pub(crate) type XmlNode<'a, 'input> = roxmltree::Node<'a, 'input>;

/// Per-parse context threaded through the walker and every parser.
pub(crate) struct Builder<'c> {
    pub layout: &'c mut Layout,
    pub evaluator: &'c mut Evaluator,
    pub options: &'c CompileOptions,
}

/// Outcome of one dispatched element.
pub(crate) enum Parsed {
    /// A node was constructed; the walker descends into the element's
    /// children with this node as their structural parent.
    Node(AnyHandle),
    /// No node was produced (constant definition or reference-only
    /// element); the subtree, if any, is skipped.
    Skip,
}

/// Iterative preorder walk over the document, bounded by an explicit frame
/// stack so nesting depth never grows the machine stack. The next sibling
/// is pushed before the first child, which preserves exact document order
/// and lets `Parsed::Skip` short-circuit a subtree uniformly.
pub(crate) fn walk(b: &mut Builder, root: XmlNode) -> Result<()> {
    struct StackFrame<'a, 'input> {
        element: XmlNode<'a, 'input>,
        parent: Option<AnyHandle>,
    }

    let mut stack = Vec::new();
    if let Some(first) = root.first_element_child() {
        stack.push(StackFrame {
            element: first,
            parent: None,
        });
    }

    while let Some(frame) = stack.pop() {
        if let Some(sibling) = frame.element.next_sibling_element() {
            stack.push(StackFrame {
                element: sibling,
                parent: frame.parent,
            });
        }

        log::trace!("element <{}>", frame.element.tag_name().name());
        match dispatch(b, frame.element, frame.parent)? {
            Parsed::Node(handle) => {
                apply_base(b, frame.element, handle)?;
                if let Some(child) = frame.element.first_element_child() {
                    stack.push(StackFrame {
                        element: child,
                        parent: Some(handle),
                    });
                }
            }
            Parsed::Skip => {}
        }
    }
    Ok(())
}

const XR_TAGS: &[&str] = &[
    "Reality",
    "Session",
    "ReferenceSpace",
    "CompositionLayerProjection",
    "RealityViewer",
    "View",
    "EndFrame",
];

/// Total map from tag name to per-kind parser. Every supported tag is
/// enumerated; anything else rejects the whole document.
fn dispatch(b: &mut Builder, el: XmlNode, parent: Option<AnyHandle>) -> Result<Parsed> {
    let name = el.tag_name().name();
    if !b.options.reality && XR_TAGS.contains(&name) {
        return Err(LayoutError::UnknownElement(name.to_string()));
    }

    match name {
        "Engine" => Err(LayoutError::InvalidStructure(
            "<Engine> is only valid as the document root".to_string(),
        )),
        "Constant" => parse_constant(b, el),

        // Device/queue graph
        "Renderer" => device::parse_renderer(b, el, parent),
        "Window" => device::parse_window(b, el, parent),
        "Device" => device::parse_device(b, el, parent),
        "Queue" => device::parse_queue(b, el, parent),
        "ResourceLoader" => device::parse_resource_loader(b, el, parent),

        // Memory objects
        "Buffer" => memory::parse_buffer(b, el, parent),
        "BufferLoader" => memory::parse_buffer_loader(b, el, parent),
        "Image" => memory::parse_image(b, el, parent),
        "ImageLoader" => memory::parse_image_loader(b, el, parent),
        "ImageView" => memory::parse_image_view(b, el, parent),
        "Sampler" => memory::parse_sampler(b, el, parent),
        "Swapchain" => memory::parse_swapchain(b, el, parent),

        // Pipeline description
        "RenderPass" => pipeline::parse_render_pass(b, el, parent),
        "Multiview" => pipeline::parse_multiview(b, el, parent),
        "Attachment" => pipeline::parse_attachment(b, el, parent),
        "Subpass" => pipeline::parse_subpass(b, el, parent),
        "ColorAttachment" => pipeline::parse_color_attachment(b, el, parent),
        "DepthStencilAttachment" => pipeline::parse_depth_stencil_attachment(b, el, parent),
        "Dependency" => pipeline::parse_dependency(b, el, parent),
        "ShaderModule" => pipeline::parse_shader_module(b, el, parent),
        "DescriptorSetLayout" => pipeline::parse_descriptor_set_layout(b, el, parent),
        "DescriptorSetLayoutBinding" => {
            pipeline::parse_descriptor_set_layout_binding(b, el, parent)
        }
        "PipelineLayout" => pipeline::parse_pipeline_layout(b, el, parent),
        "GraphicsPipeline" => pipeline::parse_graphics_pipeline(b, el, parent),
        "ComputePipeline" => pipeline::parse_compute_pipeline(b, el, parent),
        "Stage" => pipeline::parse_stage(b, el, parent),
        "SpecializationInfo" => pipeline::parse_specialization_info(b, el, parent),
        "VertexInputState" => pipeline::parse_vertex_input_state(b, el, parent),
        "VertexBindingDescription" => pipeline::parse_vertex_binding_description(b, el, parent),
        "VertexAttributeDescription" => {
            pipeline::parse_vertex_attribute_description(b, el, parent)
        }
        "InputAssemblyState" => pipeline::parse_input_assembly_state(b, el, parent),
        "ViewportState" => pipeline::parse_viewport_state(b, el, parent),
        "Viewport" => pipeline::parse_viewport(b, el, parent),
        "Scissor" => pipeline::parse_scissor(b, el, parent),
        "RasterizationState" => pipeline::parse_rasterization_state(b, el, parent),
        "MultisampleState" => pipeline::parse_multisample_state(b, el, parent),
        "DepthStencilState" => pipeline::parse_depth_stencil_state(b, el, parent),
        "ColorBlendState" => pipeline::parse_color_blend_state(b, el, parent),
        "DynamicState" => pipeline::parse_dynamic_state(b, el, parent),

        // Binding resources
        "DescriptorPool" => binding::parse_descriptor_pool(b, el, parent),
        "DescriptorPoolSize" => binding::parse_descriptor_pool_size(b, el, parent),
        "DescriptorSet" => binding::parse_descriptor_set(b, el, parent),
        "Descriptor" => binding::parse_descriptor(b, el, parent),
        "ImageInfo" => binding::parse_image_info(b, el, parent),
        "BufferInfo" => binding::parse_buffer_info(b, el, parent),

        // Frame/sync objects
        "Frame" => frame::parse_frame(b, el, parent),
        "Framebuffer" => frame::parse_framebuffer(b, el, parent),
        "Semaphore" => frame::parse_semaphore(b, el, parent),
        "Fence" => frame::parse_fence(b, el, parent),
        "Event" => frame::parse_event(b, el, parent),
        "QueryPool" => frame::parse_query_pool(b, el, parent),
        "CommandPool" => frame::parse_command_pool(b, el, parent),
        "CommandBuffer" => frame::parse_command_buffer(b, el, parent),

        // Recorded commands
        "CommandGroup" => command::parse_command_group(b, el, parent),
        "CommandList" => command::parse_command_list(b, el, parent),
        "CommandContext" => command::parse_command_context(b, el, parent),
        "Function" => command::parse_function(b, el, parent),
        "PipelineBarrier" => command::parse_pipeline_barrier(b, el, parent),
        "BufferMemoryBarrier" => command::parse_buffer_memory_barrier(b, el, parent),
        "ImageMemoryBarrier" => command::parse_image_memory_barrier(b, el, parent),
        "CopyBuffer" => command::parse_copy_buffer(b, el, parent),
        "BufferCopy" => command::parse_buffer_copy(b, el, parent),
        "Dispatch" => command::parse_dispatch(b, el, parent),
        "BeginRenderPass" => command::parse_begin_render_pass(b, el, parent),
        "EndRenderPass" => command::parse_end_render_pass(b, el, parent),
        "SetViewport" => command::parse_set_viewport(b, el, parent),
        "SetScissor" => command::parse_set_scissor(b, el, parent),
        "BindDescriptorSets" => command::parse_bind_descriptor_sets(b, el, parent),
        "BindPipeline" => command::parse_bind_pipeline(b, el, parent),
        "BindVertexBuffers" => command::parse_bind_vertex_buffers(b, el, parent),
        "BindIndexBuffer" => command::parse_bind_index_buffer(b, el, parent),
        "Draw" => command::parse_draw(b, el, parent),
        "DrawIndexed" => command::parse_draw_indexed(b, el, parent),
        "DrawIndexedIndirect" => command::parse_draw_indexed_indirect(b, el, parent),
        "BlitImage" => command::parse_blit_image(b, el, parent),
        "PushConstants" => command::parse_push_constants(b, el, parent),
        "ResetQueryPool" => command::parse_reset_query_pool(b, el, parent),
        "SetEvent" => command::parse_set_event(b, el, parent),
        "ResetEvent" => command::parse_reset_event(b, el, parent),
        "NextSubpass" => command::parse_next_subpass(b, el, parent),
        "DrawOverlay" => command::parse_draw_overlay(b, el, parent),

        // Presentation
        "Overlay" => present::parse_overlay(b, el, parent),
        "WindowViewer" => present::parse_window_viewer(b, el, parent),
        "AcquireNextImage" => present::parse_acquire_next_image(b, el, parent),
        "QueueSubmit" => present::parse_queue_submit(b, el, parent),
        "Submit" => present::parse_submit(b, el, parent),
        "QueuePresent" => present::parse_queue_present(b, el, parent),
        "Resizer" => present::parse_resizer(b, el, parent),
        "Updater" => present::parse_updater(b, el, parent),

        // XR extension
        "Reality" => xr::parse_reality(b, el, parent),
        "Session" => xr::parse_session(b, el, parent),
        "ReferenceSpace" => xr::parse_reference_space(b, el, parent),
        "CompositionLayerProjection" => xr::parse_composition_layer_projection(b, el, parent),
        "RealityViewer" => xr::parse_reality_viewer(b, el, parent),
        "View" => xr::parse_view(b, el, parent),
        "EndFrame" => xr::parse_end_frame(b, el, parent),

        other => Err(LayoutError::UnknownElement(other.to_string())),
    }
}

/// Base step shared by every node kind: `realize`, `id` and id registration.
fn apply_base(b: &mut Builder, el: XmlNode, handle: AnyHandle) -> Result<()> {
    let realize = b.attr_bool_or(el, "realize", true)?;
    b.layout.nodes.base_mut(handle).realize = realize;

    if let Some(id) = el.attribute("id").filter(|id| !id.is_empty()) {
        b.layout.nodes.base_mut(handle).id = Some(id.to_string());
        b.layout.register(id, handle)?;
    }
    Ok(())
}

/// `<Constant name value>` extends the evaluator's table; later attribute
/// expressions anywhere in the document may use it.
fn parse_constant(b: &mut Builder, el: XmlNode) -> Result<Parsed> {
    let name = b.req_string(el, "name")?;
    let text = el
        .attribute("value")
        .ok_or_else(|| missing(el, "value"))?;
    let value = b.eval(el, "value", text)?;
    b.evaluator.define(&name, value);
    Ok(Parsed::Skip)
}

pub(crate) fn tag(el: XmlNode) -> String {
    el.tag_name().name().to_string()
}

pub(crate) fn missing(el: XmlNode, attr: &'static str) -> LayoutError {
    LayoutError::MissingAttribute {
        element: tag(el),
        attr,
    }
}

pub(crate) fn invalid(el: XmlNode, attr: &'static str, value: &str) -> LayoutError {
    LayoutError::InvalidAttribute {
        element: tag(el),
        attr,
        value: value.to_string(),
    }
}

/// Downcast the walker-provided parent to the structural parent kind the
/// element requires.
pub(crate) fn structural_parent<T: NodeType>(
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Handle<T>> {
    parent
        .and_then(AnyHandle::downcast::<T>)
        .ok_or_else(|| {
            LayoutError::InvalidStructure(format!(
                "<{}> must be declared inside <{}>",
                el.tag_name().name(),
                T::KIND.name()
            ))
        })
}

/// Populate a singleton slot, rejecting a second declaration.
pub(crate) fn claim_singleton<T: NodeType>(
    slot: &mut Option<Handle<T>>,
    handle: Handle<T>,
) -> Result<()> {
    if slot.is_some() {
        return Err(LayoutError::DuplicateSingleton(T::KIND));
    }
    *slot = Some(handle);
    Ok(())
}

/// Fill a unique child slot, rejecting a second declaration.
pub(crate) fn fill_slot<T>(
    slot: &mut Option<Handle<T>>,
    handle: Handle<T>,
    el: XmlNode,
) -> Result<()> {
    if slot.is_some() {
        return Err(LayoutError::InvalidStructure(format!(
            "<{}> declared twice for the same parent",
            el.tag_name().name()
        )));
    }
    *slot = Some(handle);
    Ok(())
}

/// Append an entry to the parent's recorded command list. Every command
/// parser goes through here; a command outside a container is an error.
pub(crate) fn record(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
    entry: AnyRef,
) -> Result<()> {
    let Some(parent) = parent else {
        return Err(LayoutError::InvalidStructure(format!(
            "<{}> must be recorded inside a command container",
            el.tag_name().name()
        )));
    };
    let nodes = &mut b.layout.nodes;
    let index = parent.index as usize;
    match parent.kind {
        NodeKind::CommandGroup => nodes.command_groups[index].commands.push(entry),
        NodeKind::CommandList => nodes.command_lists[index].commands.push(entry),
        NodeKind::CommandContext => nodes.command_contexts[index].commands.push(entry),
        NodeKind::Function => nodes.functions[index].commands.push(entry),
        NodeKind::CommandBuffer => nodes.command_buffers[index].commands.push(entry),
        other => {
            return Err(LayoutError::InvalidStructure(format!(
                "<{}> cannot be recorded inside <{}>",
                el.tag_name().name(),
                other.name()
            )))
        }
    }
    Ok(())
}

/// Append a frame-loop step when the element is nested inside a Frame;
/// top-level declarations are left free-standing.
pub(crate) fn attach_step(b: &mut Builder, parent: Option<AnyHandle>, handle: AnyHandle) {
    if let Some(parent) = parent {
        if parent.kind == NodeKind::Frame {
            b.layout.nodes.frames[parent.index as usize].steps.push(handle);
        }
    }
}

impl Builder<'_> {
    pub(crate) fn eval(&self, el: XmlNode, attr: &'static str, text: &str) -> Result<f64> {
        self.evaluator
            .evaluate(text)
            .map_err(|source| LayoutError::Expression {
                element: tag(el),
                attr,
                source,
            })
    }

    pub(crate) fn attr_f64(&self, el: XmlNode, attr: &'static str) -> Result<Option<f64>> {
        el.attribute(attr)
            .map(|text| self.eval(el, attr, text))
            .transpose()
    }

    pub(crate) fn attr_f32_or(&self, el: XmlNode, attr: &'static str, default: f32) -> Result<f32> {
        Ok(self
            .attr_f64(el, attr)?
            .map(|value| value as f32)
            .unwrap_or(default))
    }

    pub(crate) fn attr_u32(&self, el: XmlNode, attr: &'static str) -> Result<Option<u32>> {
        Ok(self.attr_f64(el, attr)?.map(|value| value as u32))
    }

    pub(crate) fn attr_u32_or(&self, el: XmlNode, attr: &'static str, default: u32) -> Result<u32> {
        Ok(self.attr_u32(el, attr)?.unwrap_or(default))
    }

    pub(crate) fn req_u32(&self, el: XmlNode, attr: &'static str) -> Result<u32> {
        self.attr_u32(el, attr)?.ok_or_else(|| missing(el, attr))
    }

    pub(crate) fn attr_u64(&self, el: XmlNode, attr: &'static str) -> Result<Option<u64>> {
        Ok(self.attr_f64(el, attr)?.map(|value| value as u64))
    }

    pub(crate) fn attr_u64_or(&self, el: XmlNode, attr: &'static str, default: u64) -> Result<u64> {
        Ok(self.attr_u64(el, attr)?.unwrap_or(default))
    }

    pub(crate) fn req_u64(&self, el: XmlNode, attr: &'static str) -> Result<u64> {
        self.attr_u64(el, attr)?.ok_or_else(|| missing(el, attr))
    }

    pub(crate) fn attr_i32_or(&self, el: XmlNode, attr: &'static str, default: i32) -> Result<i32> {
        Ok(self
            .attr_f64(el, attr)?
            .map(|value| value as i32)
            .unwrap_or(default))
    }

    pub(crate) fn attr_bool_or(
        &self,
        el: XmlNode,
        attr: &'static str,
        default: bool,
    ) -> Result<bool> {
        match el.attribute(attr) {
            None => Ok(default),
            Some("true") | Some("1") => Ok(true),
            Some("false") | Some("0") => Ok(false),
            Some(other) => Err(invalid(el, attr, other)),
        }
    }

    pub(crate) fn attr_string(&self, el: XmlNode, attr: &'static str) -> Option<String> {
        el.attribute(attr).map(str::to_string)
    }

    pub(crate) fn req_string(&self, el: XmlNode, attr: &'static str) -> Result<String> {
        self.attr_string(el, attr).ok_or_else(|| missing(el, attr))
    }

    pub(crate) fn attr_enum<T: FromStr>(
        &self,
        el: XmlNode,
        attr: &'static str,
    ) -> Result<Option<T>> {
        match el.attribute(attr) {
            None => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|_| invalid(el, attr, text)),
        }
    }

    pub(crate) fn attr_enum_or<T: FromStr>(
        &self,
        el: XmlNode,
        attr: &'static str,
        default: T,
    ) -> Result<T> {
        Ok(self.attr_enum(el, attr)?.unwrap_or(default))
    }

    pub(crate) fn req_enum<T: FromStr>(&self, el: XmlNode, attr: &'static str) -> Result<T> {
        self.attr_enum(el, attr)?.ok_or_else(|| missing(el, attr))
    }

    /// Space-separated enum token list (flag sets).
    pub(crate) fn attr_flags<T: FromStr>(&self, el: XmlNode, attr: &'static str) -> Result<Vec<T>> {
        let mut flags = Vec::new();
        if let Some(text) = el.attribute(attr) {
            for token in text.split_whitespace() {
                flags.push(token.parse().map_err(|_| invalid(el, attr, token))?);
            }
        }
        Ok(flags)
    }

    /// Space-separated list of evaluated integers.
    pub(crate) fn attr_u32_list(&self, el: XmlNode, attr: &'static str) -> Result<Vec<u32>> {
        let mut values = Vec::new();
        if let Some(text) = el.attribute(attr) {
            for token in text.split_whitespace() {
                values.push(self.eval(el, attr, token)? as u32);
            }
        }
        Ok(values)
    }

    /// Space-separated list of evaluated 64-bit integers.
    pub(crate) fn attr_u64_list(&self, el: XmlNode, attr: &'static str) -> Result<Vec<u64>> {
        let mut values = Vec::new();
        if let Some(text) = el.attribute(attr) {
            for token in text.split_whitespace() {
                values.push(self.eval(el, attr, token)? as u64);
            }
        }
        Ok(values)
    }

    /// Space-separated list of evaluated floats.
    pub(crate) fn attr_f32_list(&self, el: XmlNode, attr: &'static str) -> Result<Vec<f32>> {
        let mut values = Vec::new();
        if let Some(text) = el.attribute(attr) {
            for token in text.split_whitespace() {
                values.push(self.eval(el, attr, token)? as f32);
            }
        }
        Ok(values)
    }

    /// Fixed-length float vector attribute ("0 0 0 1").
    pub(crate) fn attr_f32_array<const N: usize>(
        &self,
        el: XmlNode,
        attr: &'static str,
    ) -> Result<Option<[f32; N]>> {
        let Some(text) = el.attribute(attr) else {
            return Ok(None);
        };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != N {
            return Err(invalid(el, attr, text));
        }
        let mut values = [0.0f32; N];
        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = self.eval(el, attr, token)? as f32;
        }
        Ok(Some(values))
    }

    /// Fixed-length integer vector attribute ("0 0 0 w h 1").
    pub(crate) fn attr_i32_array<const N: usize>(
        &self,
        el: XmlNode,
        attr: &'static str,
    ) -> Result<Option<[i32; N]>> {
        let Some(text) = el.attribute(attr) else {
            return Ok(None);
        };
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != N {
            return Err(invalid(el, attr, text));
        }
        let mut values = [0i32; N];
        for (slot, token) in values.iter_mut().zip(&tokens) {
            *slot = self.eval(el, attr, token)? as i32;
        }
        Ok(Some(values))
    }

    /// Optional reference attribute.
    pub(crate) fn reference<T>(&self, el: XmlNode, attr: &'static str) -> Ref<T> {
        Ref::parse(el.attribute(attr))
    }

    /// Required reference attribute.
    pub(crate) fn req_reference<T>(&self, el: XmlNode, attr: &'static str) -> Result<Ref<T>> {
        match el.attribute(attr) {
            Some(id) if !id.is_empty() => Ok(Ref::Unresolved(id.to_string())),
            _ => Err(missing(el, attr)),
        }
    }

    /// Space-separated id list into same-kind references.
    pub(crate) fn reference_list<T>(&self, el: XmlNode, attr: &'static str) -> Vec<Ref<T>> {
        el.attribute(attr)
            .map(|text| {
                text.split_whitespace()
                    .map(|id| Ref::Unresolved(id.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Space-separated id list into kind-erased references.
    pub(crate) fn any_reference_list(&self, el: XmlNode, attr: &'static str) -> Vec<AnyRef> {
        el.attribute(attr)
            .map(|text| {
                text.split_whitespace()
                    .map(|id| AnyRef::Unresolved(id.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
