//! Link-phase properties: reference resolution, derived indices and
//! defaulting rules.

mod test_helpers;

use test_helpers::{compile, compile_err};
use vkml::{AnyRef, LayoutError, NodeKind, Queue, Ref};

#[test]
fn command_pool_queue_resolves_to_the_exact_node() {
    let layout = compile(
        r#"
        <Engine>
            <Renderer>
                <Device>
                    <Queue id="q" capabilities="Graphics"/>
                </Device>
            </Renderer>
            <CommandPool id="pool" queue="q"/>
        </Engine>
        "#,
    );

    let queue = layout.lookup_as::<Queue>("q").expect("queue is registered");
    assert_eq!(layout.nodes.command_pools[0].queue.handle(), Some(queue));
}

#[test]
fn forward_references_resolve() {
    // The set is declared before the layout it references.
    let layout = compile(
        r#"
        <Engine>
            <DescriptorPool id="pool" maxSets="4">
                <DescriptorPoolSize type="UniformBuffer" count="4"/>
            </DescriptorPool>
            <DescriptorSet id="set" pool="pool" layout="dsl"/>
            <DescriptorSetLayout id="dsl">
                <DescriptorSetLayoutBinding binding="0" type="UniformBuffer" stages="Vertex"/>
            </DescriptorSetLayout>
        </Engine>
        "#,
    );

    let dsl = layout
        .lookup_as::<vkml::DescriptorSetLayout>("dsl")
        .unwrap();
    assert_eq!(layout.nodes.descriptor_sets[0].layout.handle(), Some(dsl));
}

#[test]
fn unresolved_reference_names_node_and_field() {
    let err = compile_err(r#"<Engine><CommandPool id="pool" queue="missing"/></Engine>"#);
    match err {
        LayoutError::UnresolvedReference { id, node, field } => {
            assert_eq!(id, "missing");
            assert_eq!(node, "CommandPool 'pool'");
            assert_eq!(field, "queue");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn wrong_kind_reference_is_rejected() {
    let err = compile_err(
        r#"
        <Engine>
            <Buffer id="b" size="16"/>
            <CommandPool id="pool" queue="b"/>
        </Engine>
        "#,
    );
    match err {
        LayoutError::WrongNodeKind {
            id,
            field,
            expected,
            found,
            ..
        } => {
            assert_eq!(id, "b");
            assert_eq!(field, "queue");
            assert_eq!(expected, "Queue");
            assert_eq!(found, NodeKind::Buffer);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

const RENDER_PASS: &str = r#"
    <Engine>
        <RenderPass id="rp">
            <Attachment id="color" format="B8G8R8A8Srgb" loadOp="Clear"
                        storeOp="Store" finalLayout="PresentSrc"/>
            <Attachment id="depth" format="D32Sfloat" loadOp="Clear"
                        finalLayout="DepthStencilAttachmentOptimal"/>
            <Attachment id="resolve" format="B8G8R8A8Srgb" storeOp="Store"
                        finalLayout="ShaderReadOnlyOptimal"/>
            <Subpass id="main">
                <ColorAttachment attachment="resolve"/>
                <ColorAttachment attachment="color"/>
                <DepthStencilAttachment attachment="depth"/>
            </Subpass>
            <Subpass id="post">
                <ColorAttachment attachment="color"/>
            </Subpass>
            <Dependency dst="main" srcStageMask="ColorAttachmentOutput"
                        dstStageMask="ColorAttachmentOutput"
                        dstAccessMask="ColorAttachmentWrite"/>
            <Dependency src="main" dst="post"
                        srcStageMask="ColorAttachmentOutput"
                        dstStageMask="FragmentShader"/>
        </RenderPass>
    </Engine>
"#;

#[test]
fn attachment_indices_follow_document_order() {
    let layout = compile(RENDER_PASS);

    // Subpass "main": resolve -> position 2, color -> position 0.
    assert_eq!(layout.nodes.color_attachments[0].index, Some(2));
    assert_eq!(layout.nodes.color_attachments[1].index, Some(0));
    // Subpass "post" reuses the first attachment.
    assert_eq!(layout.nodes.color_attachments[2].index, Some(0));
    // Depth attachment sits between them in the attachment list.
    assert_eq!(layout.nodes.depth_stencil_attachments[0].index, Some(1));
}

#[test]
fn dependency_subpass_indices() {
    let layout = compile(RENDER_PASS);

    // External -> main: src stays unresolved, dst is position 0.
    assert_eq!(layout.nodes.dependencies[0].src_subpass, None);
    assert!(layout.nodes.dependencies[0].src.is_none());
    assert_eq!(layout.nodes.dependencies[0].dst_subpass, Some(0));
    // main -> post.
    assert_eq!(layout.nodes.dependencies[1].src_subpass, Some(0));
    assert_eq!(layout.nodes.dependencies[1].dst_subpass, Some(1));
}

#[test]
fn resolving_twice_is_idempotent() {
    let mut layout = compile(RENDER_PASS);

    let indices: Vec<_> = layout
        .nodes
        .color_attachments
        .iter()
        .map(|attachment| attachment.index)
        .collect();

    layout.resolve().expect("second resolve succeeds");

    let again: Vec<_> = layout
        .nodes
        .color_attachments
        .iter()
        .map(|attachment| attachment.index)
        .collect();
    assert_eq!(indices, again);
    assert_eq!(layout.nodes.dependencies[1].src_subpass, Some(0));
}

#[test]
fn graphics_pipeline_subpass_index_and_derived_render_pass() {
    let layout = compile(
        r#"
        <Engine>
            <RenderPass id="rp">
                <Attachment id="color" format="B8G8R8A8Srgb" finalLayout="PresentSrc"/>
                <Subpass id="first">
                    <ColorAttachment attachment="color"/>
                </Subpass>
                <Subpass id="second">
                    <ColorAttachment attachment="color"/>
                </Subpass>
            </RenderPass>
            <PipelineLayout id="pl"/>
            <ShaderModule id="vs" path="shaders/tri.vert.spv"/>
            <ShaderModule id="fs" path="shaders/tri.frag.spv"/>
            <GraphicsPipeline id="pipe" layout="pl" subpass="second">
                <Stage stage="Vertex" module="vs"/>
                <Stage stage="Fragment" module="fs"/>
                <InputAssemblyState topology="TriangleList"/>
            </GraphicsPipeline>
        </Engine>
        "#,
    );

    let pipeline = &layout.nodes.graphics_pipelines[0];
    assert_eq!(pipeline.subpass_index, Some(1));
    // The render pass was derived from the subpass's parent.
    let rp = layout.lookup_as::<vkml::RenderPass>("rp").unwrap();
    assert_eq!(pipeline.render_pass.handle(), Some(rp));
    assert_eq!(pipeline.stages.len(), 2);
}

#[test]
fn subpass_of_another_render_pass_is_rejected() {
    let err = compile_err(
        r#"
        <Engine>
            <RenderPass id="a">
                <Attachment id="color" format="B8G8R8A8Srgb" finalLayout="PresentSrc"/>
                <Subpass id="sub"/>
            </RenderPass>
            <RenderPass id="b"/>
            <PipelineLayout id="pl"/>
            <GraphicsPipeline id="pipe" layout="pl" renderPass="b" subpass="sub"/>
        </Engine>
        "#,
    );
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn attachment_of_another_render_pass_is_rejected() {
    let err = compile_err(
        r#"
        <Engine>
            <RenderPass id="a">
                <Attachment id="color" format="B8G8R8A8Srgb" finalLayout="PresentSrc"/>
            </RenderPass>
            <RenderPass id="b">
                <Subpass id="sub">
                    <ColorAttachment attachment="color"/>
                </Subpass>
            </RenderPass>
        </Engine>
        "#,
    );
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn buffer_copy_size_defaults_to_smaller_buffer() {
    let layout = compile(
        r#"
        <Engine>
            <Buffer id="src" size="256" usage="TransferSrc"/>
            <Buffer id="dst" size="128" usage="TransferDst"/>
            <CommandGroup id="upload">
                <CopyBuffer src="src" dst="dst"/>
            </CommandGroup>
        </Engine>
        "#,
    );
    assert_eq!(layout.nodes.buffer_copies[0].size, Some(128));
}

#[test]
fn explicit_buffer_copy_regions_keep_their_size() {
    let layout = compile(
        r#"
        <Engine>
            <Buffer id="src" size="256" usage="TransferSrc"/>
            <Buffer id="dst" size="128" usage="TransferDst"/>
            <CommandGroup id="upload">
                <CopyBuffer src="src" dst="dst">
                    <BufferCopy srcOffset="0" dstOffset="64" size="32"/>
                    <BufferCopy srcOffset="32" dstOffset="0"/>
                </CopyBuffer>
            </CommandGroup>
        </Engine>
        "#,
    );
    assert_eq!(layout.nodes.buffer_copies[0].size, Some(32));
    // The second region still gets the min-size default.
    assert_eq!(layout.nodes.buffer_copies[1].size, Some(128));
}

#[test]
fn descriptor_count_defaults_to_info_list_length() {
    let layout = compile(
        r#"
        <Engine>
            <Buffer id="ubo" size="64" usage="UniformBuffer"/>
            <Image id="img" format="R8G8B8A8Unorm" width="4" height="4" usage="Sampled"/>
            <ImageView id="view" image="img"/>
            <Sampler id="smp"/>
            <DescriptorSetLayout id="dsl"/>
            <DescriptorPool id="pool" maxSets="1"/>
            <DescriptorSet id="set" pool="pool" layout="dsl">
                <Descriptor binding="0" type="CombinedImageSampler">
                    <ImageInfo sampler="smp" imageView="view"/>
                    <ImageInfo sampler="smp" imageView="view"/>
                </Descriptor>
                <Descriptor binding="1" type="UniformBuffer">
                    <BufferInfo buffer="ubo"/>
                </Descriptor>
                <Descriptor binding="2" type="UniformBuffer" count="7"/>
            </DescriptorSet>
        </Engine>
        "#,
    );
    assert_eq!(layout.nodes.descriptors[0].count, Some(2));
    assert_eq!(layout.nodes.descriptors[1].count, Some(1));
    // An explicit count is never overwritten.
    assert_eq!(layout.nodes.descriptors[2].count, Some(7));
}

#[test]
fn command_group_reference_resolves_forward() {
    let layout = compile(
        r#"
        <Engine>
            <Renderer>
                <Device><Queue id="q"/></Device>
            </Renderer>
            <CommandPool id="pool" queue="q"/>
            <CommandBuffer id="cb" pool="pool">
                <CommandGroup ref="setup"/>
                <Draw vertexCount="3"/>
            </CommandBuffer>
            <CommandGroup id="setup">
                <Dispatch x="8" y="8"/>
            </CommandGroup>
        </Engine>
        "#,
    );

    let group = layout.lookup("setup").unwrap();
    let commands = &layout.nodes.command_buffers[0].commands;
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], AnyRef::Resolved(group));
    match commands[1] {
        AnyRef::Resolved(handle) => assert_eq!(handle.kind, NodeKind::Draw),
        ref other => panic!("unexpected entry: {other:?}"),
    }
    // The group's own command survived.
    assert_eq!(layout.nodes.command_groups[0].commands.len(), 1);
}

#[test]
fn command_list_entries_must_be_recordable() {
    let err = compile_err(
        r#"
        <Engine>
            <Buffer id="b" size="16"/>
            <CommandGroup id="g">
                <CommandGroup ref="b"/>
            </CommandGroup>
        </Engine>
        "#,
    );
    match err {
        LayoutError::WrongNodeKind { found, field, .. } => {
            assert_eq!(found, NodeKind::Buffer);
            assert_eq!(field, "commands");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bind_pipeline_accepts_only_pipelines() {
    let err = compile_err(
        r#"
        <Engine>
            <Buffer id="b" size="16"/>
            <CommandGroup id="g">
                <BindPipeline pipeline="b"/>
            </CommandGroup>
        </Engine>
        "#,
    );
    match err {
        LayoutError::WrongNodeKind { expected, found, .. } => {
            assert_eq!(expected, "GraphicsPipeline or ComputePipeline");
            assert_eq!(found, NodeKind::Buffer);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn frame_steps_preserve_document_order() {
    let layout = compile(
        r#"
        <Engine>
            <Renderer>
                <Window id="win"/>
                <Device><Queue id="q"/></Device>
            </Renderer>
            <Swapchain id="sc" window="win"/>
            <Semaphore id="acquired"/>
            <Semaphore id="rendered"/>
            <CommandPool id="pool" queue="q"/>
            <CommandBuffer id="cb" pool="pool"/>
            <WindowViewer window="win" swapchain="sc">
                <Frame>
                    <AcquireNextImage swapchain="sc" semaphore="acquired"/>
                    <QueueSubmit queue="q">
                        <Submit waitSemaphores="acquired" waitStages="ColorAttachmentOutput"
                                commandBuffers="cb" signalSemaphores="rendered"/>
                    </QueueSubmit>
                    <QueuePresent queue="q" swapchains="sc" waitSemaphores="rendered"/>
                </Frame>
            </WindowViewer>
        </Engine>
        "#,
    );

    let viewer = &layout.nodes.window_viewers[0];
    assert_eq!(viewer.frames.len(), 1);

    let steps = &layout.nodes.frames[0].steps;
    let kinds: Vec<NodeKind> = steps.iter().map(|step| step.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::AcquireNextImage,
            NodeKind::QueueSubmit,
            NodeKind::QueuePresent
        ]
    );

    // The submit batch linked everything up.
    let submit = &layout.nodes.submits[0];
    assert_eq!(submit.wait_semaphores.len(), 1);
    assert!(submit.wait_semaphores[0].is_resolved());
    assert!(submit.command_buffers[0].is_resolved());
    assert!(submit.signal_semaphores[0].is_resolved());
}

#[test]
fn resolved_references_compare_by_target() {
    let layout = compile(
        r#"
        <Engine>
            <Renderer>
                <Device><Queue id="q"/></Device>
            </Renderer>
            <CommandPool id="a" queue="q"/>
            <CommandPool id="b" queue="q"/>
        </Engine>
        "#,
    );
    let first: &Ref<Queue> = &layout.nodes.command_pools[0].queue;
    let second: &Ref<Queue> = &layout.nodes.command_pools[1].queue;
    assert_eq!(first, second);
}
