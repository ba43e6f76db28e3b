//! XR extension nodes, recognized only when the compiler's `reality`
//! option is set.

use crate::document::{Handle, NodeBase, Ref};

use super::device::{Device, Queue};
use super::enums::{EnvironmentBlendMode, FormFactor, ReferenceSpaceType};
use super::frame::Frame;
use super::memory::Swapchain;

/// XR runtime/system description; at most one per document.
#[derive(Debug, Default)]
pub struct Reality {
    pub base: NodeBase,
    pub application_name: Option<String>,
    pub form_factor: FormFactor,
    pub blend_mode: EnvironmentBlendMode,
}

/// XR session bound to a device and queue; at most one per document.
#[derive(Debug, Default)]
pub struct Session {
    pub base: NodeBase,
    pub device: Ref<Device>,
    pub queue: Ref<Queue>,
}

#[derive(Debug, Default)]
pub struct ReferenceSpace {
    pub base: NodeBase,
    pub session: Ref<Session>,
    pub space_type: ReferenceSpaceType,
    pub position: [f32; 3],
    pub orientation: [f32; 4],
}

#[derive(Debug, Default)]
pub struct CompositionLayerProjection {
    pub base: NodeBase,
    pub space: Ref<ReferenceSpace>,
    pub views: Vec<Handle<View>>,
}

/// One projected eye view of a composition layer.
#[derive(Debug)]
pub struct View {
    pub base: NodeBase,
    pub layer: Handle<CompositionLayerProjection>,
    pub swapchain: Ref<Swapchain>,
}

/// Drives the XR frame loop over its Frame children.
#[derive(Debug, Default)]
pub struct RealityViewer {
    pub base: NodeBase,
    pub session: Ref<Session>,
    pub frames: Vec<Handle<Frame>>,
}

/// Frame step that submits composition layers to the XR runtime.
#[derive(Debug, Default)]
pub struct EndFrame {
    pub base: NodeBase,
    pub session: Ref<Session>,
    pub layers: Vec<Ref<CompositionLayerProjection>>,
}
