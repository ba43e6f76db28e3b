//! Resolve phase: swap recorded id strings for typed handles and compute
//! the derived indices that only exist once every sibling list is complete.
//!
//! Passes run per collection in document order. Structural pipeline links
//! (attachment and subpass positions) resolve before anything that indexes
//! into them (dependencies, graphics pipelines). Every pass is idempotent:
//! already-resolved fields and already-defaulted values are left untouched,
//! so re-running the resolver on a resolved Layout is a no-op.

use std::collections::HashMap;

use crate::document::{AnyHandle, AnyRef, NodeType, Nodes, Ref};
use crate::types::*;
use crate::{Layout, LayoutError, NodeKind, Result};

pub(crate) fn resolve(layout: &mut Layout) -> Result<()> {
    // The name map is read-only during resolution; taking it out of the
    // Layout lets the resolver hold it while mutating the pools.
    let names = layout.take_names();
    let resolver = Resolver { names: &names };
    let result = resolver.run(layout);
    layout.restore_names(names);
    result
}

struct Resolver<'a> {
    names: &'a HashMap<String, AnyHandle>,
}

/// Diagnostic name for a node: its id when it has one, its pool position
/// otherwise.
fn describe<T: NodeType>(nodes: &Nodes, index: usize) -> String {
    match &T::pool(nodes)[index].base().id {
        Some(id) => format!("{} '{}'", T::KIND.name(), id),
        None => format!("{} #{}", T::KIND.name(), index),
    }
}

impl Resolver<'_> {
    fn resolve_ref<T: NodeType>(
        &self,
        field: &mut Ref<T>,
        owner: &str,
        name: &'static str,
    ) -> Result<()> {
        let id = match field {
            Ref::Unresolved(id) => id.clone(),
            Ref::None | Ref::Resolved(_) => return Ok(()),
        };
        let handle = self.names.get(&id).copied().ok_or_else(|| {
            LayoutError::UnresolvedReference {
                id: id.clone(),
                node: owner.to_string(),
                field: name,
            }
        })?;
        let typed = handle.downcast::<T>().ok_or(LayoutError::WrongNodeKind {
            id,
            node: owner.to_string(),
            field: name,
            expected: T::KIND.name(),
            found: handle.kind,
        })?;
        *field = Ref::Resolved(typed);
        Ok(())
    }

    fn resolve_ref_list<T: NodeType>(
        &self,
        fields: &mut [Ref<T>],
        owner: &str,
        name: &'static str,
    ) -> Result<()> {
        for field in fields {
            self.resolve_ref(field, owner, name)?;
        }
        Ok(())
    }

    fn resolve_any(
        &self,
        field: &mut AnyRef,
        owner: &str,
        name: &'static str,
        expected: &'static str,
        accept: impl Fn(NodeKind) -> bool,
    ) -> Result<()> {
        let id = match field {
            AnyRef::Unresolved(id) => id.clone(),
            AnyRef::Resolved(_) => return Ok(()),
        };
        let handle = self.names.get(&id).copied().ok_or_else(|| {
            LayoutError::UnresolvedReference {
                id: id.clone(),
                node: owner.to_string(),
                field: name,
            }
        })?;
        if !accept(handle.kind) {
            return Err(LayoutError::WrongNodeKind {
                id,
                node: owner.to_string(),
                field: name,
                expected,
                found: handle.kind,
            });
        }
        *field = AnyRef::Resolved(handle);
        Ok(())
    }

    /// Resolve a recorded command list; entries must be command kinds or
    /// command containers.
    fn resolve_commands(&self, list: &mut [AnyRef], owner: &str) -> Result<()> {
        for entry in list {
            self.resolve_any(
                entry,
                owner,
                "commands",
                "a recordable command",
                NodeKind::is_recordable,
            )?;
        }
        Ok(())
    }

    fn run(&self, layout: &mut Layout) -> Result<()> {
        let nodes = &mut layout.nodes;

        // Device graph
        for i in 0..nodes.resource_loaders.len() {
            let owner = describe::<ResourceLoader>(nodes, i);
            self.resolve_ref(&mut nodes.resource_loaders[i].queue, &owner, "queue")?;
        }

        // Memory objects
        for i in 0..nodes.buffer_loaders.len() {
            let owner = describe::<BufferLoader>(nodes, i);
            self.resolve_ref(&mut nodes.buffer_loaders[i].buffer, &owner, "buffer")?;
        }
        for i in 0..nodes.image_loaders.len() {
            let owner = describe::<ImageLoader>(nodes, i);
            self.resolve_ref(&mut nodes.image_loaders[i].image, &owner, "image")?;
        }
        for i in 0..nodes.image_views.len() {
            let owner = describe::<ImageView>(nodes, i);
            self.resolve_ref(&mut nodes.image_views[i].image, &owner, "image")?;
        }
        for i in 0..nodes.swapchains.len() {
            let owner = describe::<Swapchain>(nodes, i);
            self.resolve_ref(&mut nodes.swapchains[i].window, &owner, "window")?;
        }

        // Structural pipeline links: attachment positions first, then the
        // links that index into the completed sibling lists.
        for i in 0..nodes.color_attachments.len() {
            let owner = describe::<ColorAttachment>(nodes, i);
            self.resolve_ref(&mut nodes.color_attachments[i].attachment, &owner, "attachment")?;
            let Some(attachment) = nodes.color_attachments[i].attachment.handle() else {
                continue;
            };
            let subpass = nodes.color_attachments[i].subpass;
            let render_pass = nodes.subpasses[subpass].render_pass;
            let position = nodes.render_passes[render_pass]
                .attachments
                .iter()
                .position(|&handle| handle == attachment);
            match position {
                Some(index) => nodes.color_attachments[i].index = Some(index as u32),
                None => {
                    return Err(LayoutError::InvalidStructure(format!(
                        "{owner} references an attachment outside its render pass"
                    )))
                }
            }
        }
        for i in 0..nodes.depth_stencil_attachments.len() {
            let owner = describe::<DepthStencilAttachment>(nodes, i);
            self.resolve_ref(
                &mut nodes.depth_stencil_attachments[i].attachment,
                &owner,
                "attachment",
            )?;
            let Some(attachment) = nodes.depth_stencil_attachments[i].attachment.handle() else {
                continue;
            };
            let subpass = nodes.depth_stencil_attachments[i].subpass;
            let render_pass = nodes.subpasses[subpass].render_pass;
            let position = nodes.render_passes[render_pass]
                .attachments
                .iter()
                .position(|&handle| handle == attachment);
            match position {
                Some(index) => nodes.depth_stencil_attachments[i].index = Some(index as u32),
                None => {
                    return Err(LayoutError::InvalidStructure(format!(
                        "{owner} references an attachment outside its render pass"
                    )))
                }
            }
        }
        for i in 0..nodes.dependencies.len() {
            let owner = describe::<Dependency>(nodes, i);
            self.resolve_ref(&mut nodes.dependencies[i].src, &owner, "src")?;
            self.resolve_ref(&mut nodes.dependencies[i].dst, &owner, "dst")?;
            let render_pass = nodes.dependencies[i].render_pass;
            // An absent endpoint is the external scope; its index stays None.
            if let Some(src) = nodes.dependencies[i].src.handle() {
                let position = nodes.render_passes[render_pass]
                    .subpasses
                    .iter()
                    .position(|&handle| handle == src)
                    .ok_or_else(|| {
                        LayoutError::InvalidStructure(format!(
                            "{owner} references a subpass outside its render pass"
                        ))
                    })?;
                nodes.dependencies[i].src_subpass = Some(position as u32);
            }
            if let Some(dst) = nodes.dependencies[i].dst.handle() {
                let position = nodes.render_passes[render_pass]
                    .subpasses
                    .iter()
                    .position(|&handle| handle == dst)
                    .ok_or_else(|| {
                        LayoutError::InvalidStructure(format!(
                            "{owner} references a subpass outside its render pass"
                        ))
                    })?;
                nodes.dependencies[i].dst_subpass = Some(position as u32);
            }
        }
        for i in 0..nodes.stages.len() {
            let owner = describe::<Stage>(nodes, i);
            self.resolve_ref(&mut nodes.stages[i].module, &owner, "module")?;
        }
        for i in 0..nodes.pipeline_layouts.len() {
            let owner = describe::<PipelineLayout>(nodes, i);
            self.resolve_ref_list(&mut nodes.pipeline_layouts[i].set_layouts, &owner, "setLayouts")?;
        }
        for i in 0..nodes.graphics_pipelines.len() {
            let owner = describe::<GraphicsPipeline>(nodes, i);
            self.resolve_ref(&mut nodes.graphics_pipelines[i].layout, &owner, "layout")?;
            self.resolve_ref(&mut nodes.graphics_pipelines[i].render_pass, &owner, "renderPass")?;
            self.resolve_ref(&mut nodes.graphics_pipelines[i].subpass, &owner, "subpass")?;
            let Some(subpass) = nodes.graphics_pipelines[i].subpass.handle() else {
                continue;
            };
            let owning_pass = nodes.subpasses[subpass].render_pass;
            match nodes.graphics_pipelines[i].render_pass.handle() {
                Some(render_pass) if render_pass != owning_pass => {
                    return Err(LayoutError::InvalidStructure(format!(
                        "{owner} references a subpass of a different render pass"
                    )))
                }
                Some(_) => {}
                // Derive the render pass from the subpass's parent.
                None => {
                    nodes.graphics_pipelines[i].render_pass = Ref::Resolved(owning_pass);
                }
            }
            let position = nodes.render_passes[owning_pass]
                .subpasses
                .iter()
                .position(|&handle| handle == subpass)
                .ok_or_else(|| {
                    LayoutError::InvalidStructure(format!(
                        "{owner} references a subpass missing from its render pass"
                    ))
                })?;
            nodes.graphics_pipelines[i].subpass_index = Some(position as u32);
        }
        for i in 0..nodes.compute_pipelines.len() {
            let owner = describe::<ComputePipeline>(nodes, i);
            self.resolve_ref(&mut nodes.compute_pipelines[i].layout, &owner, "layout")?;
        }

        // Binding resources
        for i in 0..nodes.descriptor_sets.len() {
            let owner = describe::<DescriptorSet>(nodes, i);
            self.resolve_ref(&mut nodes.descriptor_sets[i].pool, &owner, "pool")?;
            self.resolve_ref(&mut nodes.descriptor_sets[i].layout, &owner, "layout")?;
        }
        for i in 0..nodes.descriptors.len() {
            if nodes.descriptors[i].count.is_none() {
                let descriptor = &nodes.descriptors[i];
                let count = if descriptor.descriptor_type.uses_image_info() {
                    descriptor.image_infos.len()
                } else {
                    descriptor.buffer_infos.len()
                };
                nodes.descriptors[i].count = Some(count as u32);
            }
        }
        for i in 0..nodes.image_infos.len() {
            let owner = describe::<ImageInfo>(nodes, i);
            self.resolve_ref(&mut nodes.image_infos[i].sampler, &owner, "sampler")?;
            self.resolve_ref(&mut nodes.image_infos[i].image_view, &owner, "imageView")?;
        }
        for i in 0..nodes.buffer_infos.len() {
            let owner = describe::<BufferInfo>(nodes, i);
            self.resolve_ref(&mut nodes.buffer_infos[i].buffer, &owner, "buffer")?;
        }

        // Frame/sync objects
        for i in 0..nodes.framebuffers.len() {
            let owner = describe::<Framebuffer>(nodes, i);
            self.resolve_ref(&mut nodes.framebuffers[i].render_pass, &owner, "renderPass")?;
            self.resolve_ref_list(&mut nodes.framebuffers[i].attachments, &owner, "attachments")?;
        }
        for i in 0..nodes.command_pools.len() {
            let owner = describe::<CommandPool>(nodes, i);
            self.resolve_ref(&mut nodes.command_pools[i].queue, &owner, "queue")?;
        }
        for i in 0..nodes.command_buffers.len() {
            let owner = describe::<CommandBuffer>(nodes, i);
            self.resolve_ref(&mut nodes.command_buffers[i].pool, &owner, "pool")?;
            self.resolve_commands(&mut nodes.command_buffers[i].commands, &owner)?;
        }

        // Recorded commands
        for i in 0..nodes.command_groups.len() {
            let owner = describe::<CommandGroup>(nodes, i);
            self.resolve_commands(&mut nodes.command_groups[i].commands, &owner)?;
        }
        for i in 0..nodes.command_lists.len() {
            let owner = describe::<CommandList>(nodes, i);
            self.resolve_commands(&mut nodes.command_lists[i].commands, &owner)?;
        }
        for i in 0..nodes.command_contexts.len() {
            let owner = describe::<CommandContext>(nodes, i);
            self.resolve_ref(&mut nodes.command_contexts[i].command_buffer, &owner, "commandBuffer")?;
            self.resolve_commands(&mut nodes.command_contexts[i].commands, &owner)?;
        }
        for i in 0..nodes.functions.len() {
            let owner = describe::<Function>(nodes, i);
            self.resolve_commands(&mut nodes.functions[i].commands, &owner)?;
        }
        for i in 0..nodes.buffer_memory_barriers.len() {
            let owner = describe::<BufferMemoryBarrier>(nodes, i);
            self.resolve_ref(&mut nodes.buffer_memory_barriers[i].buffer, &owner, "buffer")?;
        }
        for i in 0..nodes.image_memory_barriers.len() {
            let owner = describe::<ImageMemoryBarrier>(nodes, i);
            self.resolve_ref(&mut nodes.image_memory_barriers[i].image, &owner, "image")?;
        }
        for i in 0..nodes.copy_buffers.len() {
            let owner = describe::<CopyBuffer>(nodes, i);
            self.resolve_ref(&mut nodes.copy_buffers[i].src, &owner, "src")?;
            self.resolve_ref(&mut nodes.copy_buffers[i].dst, &owner, "dst")?;
        }
        for i in 0..nodes.buffer_copies.len() {
            if nodes.buffer_copies[i].size.is_some() {
                continue;
            }
            let copy = nodes.buffer_copies[i].copy;
            let (Some(src), Some(dst)) = (
                nodes.copy_buffers[copy].src.handle(),
                nodes.copy_buffers[copy].dst.handle(),
            ) else {
                continue;
            };
            let size = nodes.buffers[src].size.min(nodes.buffers[dst].size);
            nodes.buffer_copies[i].size = Some(size);
        }
        for i in 0..nodes.bind_descriptor_sets.len() {
            let owner = describe::<BindDescriptorSets>(nodes, i);
            self.resolve_ref(&mut nodes.bind_descriptor_sets[i].layout, &owner, "layout")?;
            self.resolve_ref_list(&mut nodes.bind_descriptor_sets[i].sets, &owner, "sets")?;
        }
        for i in 0..nodes.bind_pipelines.len() {
            let owner = describe::<BindPipeline>(nodes, i);
            self.resolve_any(
                &mut nodes.bind_pipelines[i].pipeline,
                &owner,
                "pipeline",
                "GraphicsPipeline or ComputePipeline",
                |kind| matches!(kind, NodeKind::GraphicsPipeline | NodeKind::ComputePipeline),
            )?;
        }
        for i in 0..nodes.bind_vertex_buffers.len() {
            let owner = describe::<BindVertexBuffers>(nodes, i);
            self.resolve_ref_list(&mut nodes.bind_vertex_buffers[i].buffers, &owner, "buffers")?;
        }
        for i in 0..nodes.bind_index_buffers.len() {
            let owner = describe::<BindIndexBuffer>(nodes, i);
            self.resolve_ref(&mut nodes.bind_index_buffers[i].buffer, &owner, "buffer")?;
        }
        for i in 0..nodes.draw_indexed_indirects.len() {
            let owner = describe::<DrawIndexedIndirect>(nodes, i);
            self.resolve_ref(&mut nodes.draw_indexed_indirects[i].buffer, &owner, "buffer")?;
        }
        for i in 0..nodes.blit_images.len() {
            let owner = describe::<BlitImage>(nodes, i);
            self.resolve_ref(&mut nodes.blit_images[i].src_image, &owner, "src")?;
            self.resolve_ref(&mut nodes.blit_images[i].dst_image, &owner, "dst")?;
        }
        for i in 0..nodes.push_constants.len() {
            let owner = describe::<PushConstants>(nodes, i);
            self.resolve_ref(&mut nodes.push_constants[i].layout, &owner, "layout")?;
        }
        for i in 0..nodes.reset_query_pools.len() {
            let owner = describe::<ResetQueryPool>(nodes, i);
            self.resolve_ref(&mut nodes.reset_query_pools[i].pool, &owner, "pool")?;
        }
        for i in 0..nodes.set_events.len() {
            let owner = describe::<SetEvent>(nodes, i);
            self.resolve_ref(&mut nodes.set_events[i].event, &owner, "event")?;
        }
        for i in 0..nodes.reset_events.len() {
            let owner = describe::<ResetEvent>(nodes, i);
            self.resolve_ref(&mut nodes.reset_events[i].event, &owner, "event")?;
        }
        for i in 0..nodes.draw_overlays.len() {
            let owner = describe::<DrawOverlay>(nodes, i);
            self.resolve_ref(&mut nodes.draw_overlays[i].overlay, &owner, "overlay")?;
        }

        // Presentation
        for i in 0..nodes.overlays.len() {
            let owner = describe::<Overlay>(nodes, i);
            self.resolve_ref(&mut nodes.overlays[i].window, &owner, "window")?;
            self.resolve_ref(&mut nodes.overlays[i].render_pass, &owner, "renderPass")?;
        }
        for i in 0..nodes.window_viewers.len() {
            let owner = describe::<WindowViewer>(nodes, i);
            self.resolve_ref(&mut nodes.window_viewers[i].window, &owner, "window")?;
            self.resolve_ref(&mut nodes.window_viewers[i].swapchain, &owner, "swapchain")?;
        }
        for i in 0..nodes.acquire_next_images.len() {
            let owner = describe::<AcquireNextImage>(nodes, i);
            self.resolve_ref(&mut nodes.acquire_next_images[i].swapchain, &owner, "swapchain")?;
            self.resolve_ref(&mut nodes.acquire_next_images[i].semaphore, &owner, "semaphore")?;
            self.resolve_ref(&mut nodes.acquire_next_images[i].fence, &owner, "fence")?;
        }
        for i in 0..nodes.queue_submits.len() {
            let owner = describe::<QueueSubmit>(nodes, i);
            self.resolve_ref(&mut nodes.queue_submits[i].queue, &owner, "queue")?;
            self.resolve_ref(&mut nodes.queue_submits[i].fence, &owner, "fence")?;
        }
        for i in 0..nodes.submits.len() {
            let owner = describe::<Submit>(nodes, i);
            self.resolve_ref_list(&mut nodes.submits[i].wait_semaphores, &owner, "waitSemaphores")?;
            self.resolve_ref_list(&mut nodes.submits[i].command_buffers, &owner, "commandBuffers")?;
            self.resolve_ref_list(
                &mut nodes.submits[i].signal_semaphores,
                &owner,
                "signalSemaphores",
            )?;
        }
        for i in 0..nodes.queue_presents.len() {
            let owner = describe::<QueuePresent>(nodes, i);
            self.resolve_ref(&mut nodes.queue_presents[i].queue, &owner, "queue")?;
            self.resolve_ref_list(&mut nodes.queue_presents[i].swapchains, &owner, "swapchains")?;
            self.resolve_ref_list(
                &mut nodes.queue_presents[i].wait_semaphores,
                &owner,
                "waitSemaphores",
            )?;
        }
        for i in 0..nodes.resizers.len() {
            let owner = describe::<Resizer>(nodes, i);
            self.resolve_ref(&mut nodes.resizers[i].swapchain, &owner, "swapchain")?;
            for j in 0..nodes.resizers[i].targets.len() {
                self.resolve_any(
                    &mut nodes.resizers[i].targets[j],
                    &owner,
                    "targets",
                    "any node",
                    |_| true,
                )?;
            }
        }
        for i in 0..nodes.updaters.len() {
            let owner = describe::<Updater>(nodes, i);
            self.resolve_ref_list(&mut nodes.updaters[i].functions, &owner, "functions")?;
        }

        // XR extension
        for i in 0..nodes.sessions.len() {
            let owner = describe::<Session>(nodes, i);
            self.resolve_ref(&mut nodes.sessions[i].device, &owner, "device")?;
            self.resolve_ref(&mut nodes.sessions[i].queue, &owner, "queue")?;
        }
        for i in 0..nodes.reference_spaces.len() {
            let owner = describe::<ReferenceSpace>(nodes, i);
            self.resolve_ref(&mut nodes.reference_spaces[i].session, &owner, "session")?;
        }
        for i in 0..nodes.composition_layer_projections.len() {
            let owner = describe::<CompositionLayerProjection>(nodes, i);
            self.resolve_ref(
                &mut nodes.composition_layer_projections[i].space,
                &owner,
                "space",
            )?;
        }
        for i in 0..nodes.views.len() {
            let owner = describe::<View>(nodes, i);
            self.resolve_ref(&mut nodes.views[i].swapchain, &owner, "swapchain")?;
        }
        for i in 0..nodes.reality_viewers.len() {
            let owner = describe::<RealityViewer>(nodes, i);
            self.resolve_ref(&mut nodes.reality_viewers[i].session, &owner, "session")?;
        }
        for i in 0..nodes.end_frames.len() {
            let owner = describe::<EndFrame>(nodes, i);
            self.resolve_ref(&mut nodes.end_frames[i].session, &owner, "session")?;
            self.resolve_ref_list(&mut nodes.end_frames[i].layers, &owner, "layers")?;
        }

        log::debug!("resolved {} nodes", nodes.total());
        Ok(())
    }
}
