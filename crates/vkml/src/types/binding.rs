//! Binding-resource nodes: descriptor pools, sets and their write infos.

use crate::document::{Handle, NodeBase, Ref};

use super::enums::{DescriptorType, ImageLayout};
use super::memory::{Buffer, ImageView, Sampler};
use super::pipeline::DescriptorSetLayout;

#[derive(Debug, Default)]
pub struct DescriptorPool {
    pub base: NodeBase,
    pub max_sets: u32,
    pub sizes: Vec<Handle<DescriptorPoolSize>>,
}

#[derive(Debug)]
pub struct DescriptorPoolSize {
    pub base: NodeBase,
    pub pool: Handle<DescriptorPool>,
    pub descriptor_type: DescriptorType,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct DescriptorSet {
    pub base: NodeBase,
    pub pool: Ref<DescriptorPool>,
    pub layout: Ref<DescriptorSetLayout>,
    pub descriptors: Vec<Handle<Descriptor>>,
}

/// One write into the owning descriptor set. An absent `count` defaults to
/// the length of the matching info list during resolution.
#[derive(Debug)]
pub struct Descriptor {
    pub base: NodeBase,
    pub set: Handle<DescriptorSet>,
    pub binding: u32,
    pub descriptor_type: DescriptorType,
    pub count: Option<u32>,
    pub image_infos: Vec<Handle<ImageInfo>>,
    pub buffer_infos: Vec<Handle<BufferInfo>>,
}

#[derive(Debug)]
pub struct ImageInfo {
    pub base: NodeBase,
    pub descriptor: Handle<Descriptor>,
    pub sampler: Ref<Sampler>,
    pub image_view: Ref<ImageView>,
    pub layout: ImageLayout,
}

#[derive(Debug)]
pub struct BufferInfo {
    pub base: NodeBase,
    pub descriptor: Handle<Descriptor>,
    pub buffer: Ref<Buffer>,
    pub offset: u64,
    /// `None` means the whole remaining buffer.
    pub range: Option<u64>,
}
