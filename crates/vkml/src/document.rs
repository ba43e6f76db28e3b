//! The Layout document: typed node pools, handles, reference states and the
//! id registry.
//!
//! Nodes are owned exclusively by per-kind [`Pool`]s inside [`Nodes`];
//! everything else (parent back-links, cross-references, the name map) uses
//! plain `Copy` indices, so the graph can contain cycles without shared
//! ownership.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::types::*;
use crate::{LayoutError, Result};

/// Typed index into the [`Pool`] holding nodes of kind `T`.
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: u32::try_from(index).expect("pool index overflow"),
            _marker: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: `derive` would demand `T: Clone` etc. even though the
// handle never holds a `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Kind-erased handle, stored in the name map and in heterogeneous lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyHandle {
    pub kind: NodeKind,
    pub index: u32,
}

impl AnyHandle {
    /// Recover the typed handle, if the kinds agree.
    pub fn downcast<T: NodeType>(self) -> Option<Handle<T>> {
        (self.kind == T::KIND).then(|| Handle::new(self.index as usize))
    }
}

impl<T: NodeType> From<Handle<T>> for AnyHandle {
    fn from(handle: Handle<T>) -> Self {
        Self {
            kind: T::KIND,
            index: handle.index,
        }
    }
}

/// A cross-node reference field.
///
/// `Unresolved` holds the id string copied verbatim from the XML attribute;
/// the resolve phase swaps it for a typed handle. `None` means the attribute
/// was absent, which is legal wherever the schema allows it.
pub enum Ref<T> {
    None,
    Unresolved(String),
    Resolved(Handle<T>),
}

impl<T> Ref<T> {
    /// Build the build-phase state straight from an optional attribute.
    pub fn parse(attr: Option<&str>) -> Self {
        match attr {
            Some(id) if !id.is_empty() => Ref::Unresolved(id.to_string()),
            _ => Ref::None,
        }
    }

    pub fn handle(&self) -> Option<Handle<T>> {
        match self {
            Ref::Resolved(handle) => Some(*handle),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Ref::None)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Ref::Resolved(_))
    }
}

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Ref::None
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        match self {
            Ref::None => Ref::None,
            Ref::Unresolved(id) => Ref::Unresolved(id.clone()),
            Ref::Resolved(handle) => Ref::Resolved(*handle),
        }
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ref::None, Ref::None) => true,
            (Ref::Unresolved(a), Ref::Unresolved(b)) => a == b,
            (Ref::Resolved(a), Ref::Resolved(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::None => write!(f, "Ref::None"),
            Ref::Unresolved(id) => write!(f, "Ref::Unresolved({id:?})"),
            Ref::Resolved(handle) => write!(f, "Ref::Resolved({})", handle.index),
        }
    }
}

/// Kind-erased reference, used for ordered lists whose members may be any
/// recordable kind (command lists, resize target lists).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyRef {
    Unresolved(String),
    Resolved(AnyHandle),
}

impl AnyRef {
    pub fn handle(&self) -> Option<AnyHandle> {
        match self {
            AnyRef::Resolved(handle) => Some(*handle),
            AnyRef::Unresolved(_) => None,
        }
    }
}

/// Insertion-ordered arena for one node kind.
///
/// Order equals document encounter order; several derived indices depend on
/// it, so the pool never reorders or removes.
#[derive(Debug)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn push(&mut self, item: T) -> Handle<T> {
        let handle = Handle::new(self.items.len());
        self.items.push(item);
        handle
    }

    pub fn get(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index()]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> {
        (0..self.items.len()).map(Handle::new)
    }
}

impl<T> std::ops::Index<Handle<T>> for Pool<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }
}

impl<T> std::ops::IndexMut<Handle<T>> for Pool<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index()]
    }
}

impl<T> std::ops::Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

/// Fields shared by every node kind.
pub struct NodeBase {
    /// Document-unique id, when the element carried one.
    pub id: Option<String>,
    /// Whether the backend factory must instantiate this node.
    pub realize: bool,
    /// Native object slot, filled by the backend factory after realization.
    /// This is the only field a consumer writes after resolution.
    pub instance: Option<Arc<dyn Any + Send + Sync>>,
}

impl Default for NodeBase {
    fn default() -> Self {
        Self {
            id: None,
            realize: true,
            instance: None,
        }
    }
}

impl fmt::Debug for NodeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBase")
            .field("id", &self.id)
            .field("realize", &self.realize)
            .field("instance", &self.instance.is_some())
            .finish()
    }
}

/// Implemented for every node struct; ties it to its `NodeKind` discriminant
/// and its pool inside [`Nodes`].
pub trait NodeType: Sized {
    const KIND: NodeKind;

    fn pool(nodes: &Nodes) -> &Pool<Self>;
    fn pool_mut(nodes: &mut Nodes) -> &mut Pool<Self>;
    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;
}

/// Declares the closed set of node kinds: the `NodeKind` discriminant, the
/// per-kind pools in [`Nodes`], the [`NodeType`] impls and the kind-erased
/// base accessors all come from this one table.
macro_rules! nodes {
    ($( $field:ident: $ty:ident, )+) => {
        /// Discriminant for the closed set of node kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $( $ty, )+
        }

        impl NodeKind {
            /// The XML tag spelling, which equals the type name.
            pub fn name(self) -> &'static str {
                match self {
                    $( NodeKind::$ty => stringify!($ty), )+
                }
            }
        }

        impl fmt::Display for NodeKind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        /// One insertion-ordered pool per node kind.
        #[derive(Debug, Default)]
        pub struct Nodes {
            $( pub $field: Pool<$ty>, )+
        }

        impl Nodes {
            /// Total node count across every pool.
            pub fn total(&self) -> usize {
                0 $( + self.$field.len() )+
            }

            pub fn base(&self, handle: AnyHandle) -> &NodeBase {
                match handle.kind {
                    $( NodeKind::$ty => self.$field[handle.index as usize].base(), )+
                }
            }

            pub fn base_mut(&mut self, handle: AnyHandle) -> &mut NodeBase {
                match handle.kind {
                    $( NodeKind::$ty => self.$field[handle.index as usize].base_mut(), )+
                }
            }
        }

        $(
            impl NodeType for $ty {
                const KIND: NodeKind = NodeKind::$ty;

                fn pool(nodes: &Nodes) -> &Pool<Self> {
                    &nodes.$field
                }

                fn pool_mut(nodes: &mut Nodes) -> &mut Pool<Self> {
                    &mut nodes.$field
                }

                fn base(&self) -> &NodeBase {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut NodeBase {
                    &mut self.base
                }
            }
        )+
    };
}

nodes! {
    // Device/queue graph
    renderers: Renderer,
    windows: Window,
    devices: Device,
    queues: Queue,
    resource_loaders: ResourceLoader,
    // Memory objects
    buffers: Buffer,
    buffer_loaders: BufferLoader,
    images: Image,
    image_loaders: ImageLoader,
    image_views: ImageView,
    samplers: Sampler,
    swapchains: Swapchain,
    // Pipeline description
    render_passes: RenderPass,
    multiviews: Multiview,
    attachments: Attachment,
    subpasses: Subpass,
    color_attachments: ColorAttachment,
    depth_stencil_attachments: DepthStencilAttachment,
    dependencies: Dependency,
    shader_modules: ShaderModule,
    descriptor_set_layouts: DescriptorSetLayout,
    descriptor_set_layout_bindings: DescriptorSetLayoutBinding,
    pipeline_layouts: PipelineLayout,
    graphics_pipelines: GraphicsPipeline,
    compute_pipelines: ComputePipeline,
    stages: Stage,
    specialization_infos: SpecializationInfo,
    vertex_input_states: VertexInputState,
    vertex_binding_descriptions: VertexBindingDescription,
    vertex_attribute_descriptions: VertexAttributeDescription,
    input_assembly_states: InputAssemblyState,
    viewport_states: ViewportState,
    viewports: Viewport,
    scissors: Scissor,
    rasterization_states: RasterizationState,
    multisample_states: MultisampleState,
    depth_stencil_states: DepthStencilState,
    color_blend_states: ColorBlendState,
    dynamic_states: DynamicState,
    // Binding resources
    descriptor_pools: DescriptorPool,
    descriptor_pool_sizes: DescriptorPoolSize,
    descriptor_sets: DescriptorSet,
    descriptors: Descriptor,
    image_infos: ImageInfo,
    buffer_infos: BufferInfo,
    // Frame/sync objects
    frames: Frame,
    framebuffers: Framebuffer,
    semaphores: Semaphore,
    fences: Fence,
    events: Event,
    query_pools: QueryPool,
    command_pools: CommandPool,
    command_buffers: CommandBuffer,
    // Recorded commands
    command_groups: CommandGroup,
    command_lists: CommandList,
    command_contexts: CommandContext,
    functions: Function,
    pipeline_barriers: PipelineBarrier,
    buffer_memory_barriers: BufferMemoryBarrier,
    image_memory_barriers: ImageMemoryBarrier,
    copy_buffers: CopyBuffer,
    buffer_copies: BufferCopy,
    dispatches: Dispatch,
    begin_render_passes: BeginRenderPass,
    end_render_passes: EndRenderPass,
    set_viewports: SetViewport,
    set_scissors: SetScissor,
    bind_descriptor_sets: BindDescriptorSets,
    bind_pipelines: BindPipeline,
    bind_vertex_buffers: BindVertexBuffers,
    bind_index_buffers: BindIndexBuffer,
    draws: Draw,
    draw_indexed: DrawIndexed,
    draw_indexed_indirects: DrawIndexedIndirect,
    blit_images: BlitImage,
    push_constants: PushConstants,
    reset_query_pools: ResetQueryPool,
    set_events: SetEvent,
    reset_events: ResetEvent,
    next_subpasses: NextSubpass,
    draw_overlays: DrawOverlay,
    // Presentation
    overlays: Overlay,
    window_viewers: WindowViewer,
    acquire_next_images: AcquireNextImage,
    queue_submits: QueueSubmit,
    submits: Submit,
    queue_presents: QueuePresent,
    resizers: Resizer,
    updaters: Updater,
    // XR extension
    realities: Reality,
    sessions: Session,
    reference_spaces: ReferenceSpace,
    composition_layer_projections: CompositionLayerProjection,
    reality_viewers: RealityViewer,
    views: View,
    end_frames: EndFrame,
}

impl NodeKind {
    /// Whether nodes of this kind may appear as entries of a recorded
    /// command list (directly, or by CommandGroup/CommandList reference).
    pub fn is_recordable(self) -> bool {
        matches!(
            self,
            NodeKind::CommandGroup
                | NodeKind::CommandList
                | NodeKind::PipelineBarrier
                | NodeKind::CopyBuffer
                | NodeKind::Dispatch
                | NodeKind::BeginRenderPass
                | NodeKind::EndRenderPass
                | NodeKind::SetViewport
                | NodeKind::SetScissor
                | NodeKind::BindDescriptorSets
                | NodeKind::BindPipeline
                | NodeKind::BindVertexBuffers
                | NodeKind::BindIndexBuffer
                | NodeKind::Draw
                | NodeKind::DrawIndexed
                | NodeKind::DrawIndexedIndirect
                | NodeKind::BlitImage
                | NodeKind::PushConstants
                | NodeKind::ResetQueryPool
                | NodeKind::SetEvent
                | NodeKind::ResetEvent
                | NodeKind::NextSubpass
                | NodeKind::DrawOverlay
        )
    }
}

/// The compiled document: every node, the id registry and the singleton
/// slots. Produced by [`Compiler::compile`](crate::Compiler::compile);
/// consumed read-only by a backend factory (which fills `instance` slots).
#[derive(Debug, Default)]
pub struct Layout {
    pub nodes: Nodes,
    names: HashMap<String, AnyHandle>,
    pub renderer: Option<Handle<Renderer>>,
    pub device: Option<Handle<Device>>,
    pub resource_loader: Option<Handle<ResourceLoader>>,
    pub reality: Option<Handle<Reality>>,
    pub session: Option<Handle<Session>>,
}

impl Layout {
    /// Shared access to a node by typed handle.
    pub fn get<T: NodeType>(&self, handle: Handle<T>) -> &T {
        T::pool(&self.nodes).get(handle)
    }

    pub fn get_mut<T: NodeType>(&mut self, handle: Handle<T>) -> &mut T {
        T::pool_mut(&mut self.nodes).get_mut(handle)
    }

    /// Look up a registered id.
    pub fn lookup(&self, id: &str) -> Option<AnyHandle> {
        self.names.get(id).copied()
    }

    /// Look up a registered id, requiring a specific kind.
    pub fn lookup_as<T: NodeType>(&self, id: &str) -> Option<Handle<T>> {
        self.lookup(id).and_then(AnyHandle::downcast)
    }

    /// Register a node under a document-unique id.
    pub(crate) fn register(&mut self, id: &str, handle: AnyHandle) -> Result<()> {
        if let Some(existing) = self.names.get(id) {
            return Err(LayoutError::DuplicateId {
                id: id.to_string(),
                first: existing.kind,
                second: handle.kind,
            });
        }
        self.names.insert(id.to_string(), handle);
        Ok(())
    }

    pub(crate) fn take_names(&mut self) -> HashMap<String, AnyHandle> {
        std::mem::take(&mut self.names)
    }

    pub(crate) fn restore_names(&mut self, names: HashMap<String, AnyHandle>) {
        self.names = names;
    }

    /// Run (or re-run) the resolve phase. Resolution is idempotent: calling
    /// this on an already-resolved Layout succeeds and changes nothing.
    pub fn resolve(&mut self) -> Result<()> {
        crate::resolve::resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_preserves_insertion_order() {
        let mut pool = Pool::default();
        let a = pool.push(Semaphore::default());
        let b = pool.push(Semaphore::default());
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.handles().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut layout = Layout::default();
        let a = layout.nodes.buffers.push(Buffer::default());
        let b = layout.nodes.images.push(Image::default());
        layout.register("x", a.into()).unwrap();
        let err = layout.register("x", b.into()).unwrap_err();
        match err {
            LayoutError::DuplicateId { id, first, second } => {
                assert_eq!(id, "x");
                assert_eq!(first, NodeKind::Buffer);
                assert_eq!(second, NodeKind::Image);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn downcast_checks_kind() {
        let mut layout = Layout::default();
        let buffer = layout.nodes.buffers.push(Buffer::default());
        let any = AnyHandle::from(buffer);
        assert_eq!(any.downcast::<Buffer>(), Some(buffer));
        assert_eq!(any.downcast::<Image>(), None);
    }

    #[test]
    fn ref_states() {
        let absent = Ref::<Buffer>::parse(None);
        assert!(absent.is_none());
        let empty = Ref::<Buffer>::parse(Some(""));
        assert!(empty.is_none());
        let pending = Ref::<Buffer>::parse(Some("staging"));
        assert_eq!(pending, Ref::Unresolved("staging".to_string()));
        assert_eq!(pending.handle(), None);
    }
}
