//! Memory-object nodes: buffers, images, views, samplers, swapchains and
//! their file loaders.

use crate::document::{NodeBase, Ref};

use super::device::Window;
use super::enums::{
    BorderColor, ColorSpace, CompareOp, CompositeAlpha, Filter, Format, ImageAspect, ImageLayout,
    ImageTiling, ImageType, ImageUsage, ImageViewType, MemoryProperty, PresentMode,
    SamplerAddressMode, SamplerMipmapMode, SharingMode, BufferUsage,
};

#[derive(Debug, Default)]
pub struct Buffer {
    pub base: NodeBase,
    /// Size in bytes.
    pub size: u64,
    pub usage: Vec<BufferUsage>,
    pub memory: Vec<MemoryProperty>,
    pub sharing_mode: SharingMode,
}

/// Fills a buffer from a file through the resource-loader pool.
#[derive(Debug, Default)]
pub struct BufferLoader {
    pub base: NodeBase,
    pub buffer: Ref<Buffer>,
    pub path: String,
    /// Byte offset into the destination buffer.
    pub offset: u64,
}

#[derive(Debug, Default)]
pub struct Image {
    pub base: NodeBase,
    pub image_type: ImageType,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub samples: u32,
    pub tiling: ImageTiling,
    pub usage: Vec<ImageUsage>,
    pub memory: Vec<MemoryProperty>,
    pub initial_layout: ImageLayout,
}

/// Fills an image from a file through the resource-loader pool.
#[derive(Debug, Default)]
pub struct ImageLoader {
    pub base: NodeBase,
    pub image: Ref<Image>,
    pub path: String,
    pub generate_mipmaps: bool,
}

#[derive(Debug, Default)]
pub struct ImageView {
    pub base: NodeBase,
    pub image: Ref<Image>,
    pub view_type: ImageViewType,
    /// Format override; `None` inherits the image format.
    pub format: Option<Format>,
    pub aspect_mask: Vec<ImageAspect>,
    pub base_mip_level: u32,
    pub level_count: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

#[derive(Debug, Default)]
pub struct Sampler {
    pub base: NodeBase,
    pub mag_filter: Filter,
    pub min_filter: Filter,
    pub mipmap_mode: SamplerMipmapMode,
    pub address_mode_u: SamplerAddressMode,
    pub address_mode_v: SamplerAddressMode,
    pub address_mode_w: SamplerAddressMode,
    pub mip_lod_bias: f32,
    pub anisotropy_enable: bool,
    pub max_anisotropy: f32,
    pub compare_enable: bool,
    pub compare_op: CompareOp,
    pub min_lod: f32,
    pub max_lod: f32,
    pub border_color: BorderColor,
    pub unnormalized_coordinates: bool,
}

#[derive(Debug, Default)]
pub struct Swapchain {
    pub base: NodeBase,
    /// Presenting window; absent for XR swapchains.
    pub window: Ref<Window>,
    pub min_image_count: u32,
    pub format: Format,
    pub color_space: ColorSpace,
    pub present_mode: PresentMode,
    pub usage: Vec<ImageUsage>,
    pub composite_alpha: CompositeAlpha,
    /// Explicit extent; `None` tracks the window surface.
    pub width: Option<u32>,
    pub height: Option<u32>,
}
