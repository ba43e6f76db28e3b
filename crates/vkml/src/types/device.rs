//! Device/queue graph nodes.

use crate::document::{Handle, NodeBase, Ref};

use super::enums::{PhysicalDeviceType, QueueCapability};

/// Root of the device graph; at most one per document.
#[derive(Debug, Default)]
pub struct Renderer {
    pub base: NodeBase,
    pub application_name: Option<String>,
    pub engine_name: Option<String>,
    /// Requested API version, e.g. "1.2".
    pub api_version: Option<String>,
    /// Enable validation layers when realized.
    pub validation: bool,
    pub windows: Vec<Handle<Window>>,
    pub devices: Vec<Handle<Device>>,
}

#[derive(Debug, Default)]
pub struct Window {
    pub base: NodeBase,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub fullscreen: bool,
}

/// Logical device; at most one per document.
#[derive(Debug, Default)]
pub struct Device {
    pub base: NodeBase,
    pub renderer: Option<Handle<Renderer>>,
    /// Explicit physical-device index, when the document pins one.
    pub device_index: Option<u32>,
    /// Preferred physical-device type, used when no index is pinned.
    pub device_type: Option<PhysicalDeviceType>,
    pub extensions: Vec<String>,
    pub queues: Vec<Handle<Queue>>,
}

#[derive(Debug)]
pub struct Queue {
    pub base: NodeBase,
    pub device: Handle<Device>,
    pub capabilities: Vec<QueueCapability>,
    /// Explicit queue family, overriding capability-based selection.
    pub family: Option<u32>,
    pub index: u32,
    pub priority: f32,
}

/// Asynchronous resource-loader configuration; at most one per document.
#[derive(Debug, Default)]
pub struct ResourceLoader {
    pub base: NodeBase,
    pub queue: Ref<Queue>,
    pub threads: u32,
}
