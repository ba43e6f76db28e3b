//! Enum token tables for attribute values.
//!
//! Attribute tokens are spelled exactly like the variant (`loadOp="Clear"`,
//! `usage="TransferSrc VertexBuffer"`). The first variant of each table is
//! the default used when the attribute may be omitted.

/// Declares an enum whose `FromStr` tokens are the variant names and whose
/// `Default` is the first variant.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $first:ident $(, $rest:ident)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $first,
            $( $rest, )*
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    Self::$first => stringify!($first),
                    $( Self::$rest => stringify!($rest), )*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    _ if s == stringify!($first) => Ok(Self::$first),
                    $( _ if s == stringify!($rest) => Ok(Self::$rest), )*
                    _ => Err(()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(PhysicalDeviceType {
    DiscreteGpu,
    IntegratedGpu,
    VirtualGpu,
    Cpu,
    Other,
});

string_enum!(QueueCapability {
    Graphics,
    Compute,
    Transfer,
    SparseBinding,
    Present,
});

string_enum!(Format {
    Undefined,
    R8Unorm,
    R8G8Unorm,
    R8G8B8A8Unorm,
    R8G8B8A8Srgb,
    B8G8R8A8Unorm,
    B8G8R8A8Srgb,
    A2B10G10R10UnormPack32,
    R16G16Sfloat,
    R16G16B16A16Sfloat,
    R32Uint,
    R32Sint,
    R32Sfloat,
    R32G32Sfloat,
    R32G32B32Sfloat,
    R32G32B32A32Sfloat,
    D16Unorm,
    D32Sfloat,
    D24UnormS8Uint,
    D32SfloatS8Uint,
    S8Uint,
});

string_enum!(ImageLayout {
    Undefined,
    General,
    ColorAttachmentOptimal,
    DepthStencilAttachmentOptimal,
    DepthStencilReadOnlyOptimal,
    ShaderReadOnlyOptimal,
    TransferSrcOptimal,
    TransferDstOptimal,
    Preinitialized,
    PresentSrc,
});

string_enum!(AttachmentLoadOp {
    DontCare,
    Load,
    Clear,
});

string_enum!(AttachmentStoreOp {
    DontCare,
    Store,
});

string_enum!(PipelineBindPoint {
    Graphics,
    Compute,
});

string_enum!(ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
    AllGraphics,
    All,
});

string_enum!(PipelineStage {
    TopOfPipe,
    DrawIndirect,
    VertexInput,
    VertexShader,
    TessellationControlShader,
    TessellationEvaluationShader,
    GeometryShader,
    FragmentShader,
    EarlyFragmentTests,
    LateFragmentTests,
    ColorAttachmentOutput,
    ComputeShader,
    Transfer,
    BottomOfPipe,
    Host,
    AllGraphics,
    AllCommands,
});

string_enum!(Access {
    IndirectCommandRead,
    IndexRead,
    VertexAttributeRead,
    UniformRead,
    InputAttachmentRead,
    ShaderRead,
    ShaderWrite,
    ColorAttachmentRead,
    ColorAttachmentWrite,
    DepthStencilAttachmentRead,
    DepthStencilAttachmentWrite,
    TransferRead,
    TransferWrite,
    HostRead,
    HostWrite,
    MemoryRead,
    MemoryWrite,
});

string_enum!(DependencyFlag {
    ByRegion,
    DeviceGroup,
    ViewLocal,
});

string_enum!(BufferUsage {
    TransferSrc,
    TransferDst,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    IndexBuffer,
    VertexBuffer,
    IndirectBuffer,
});

string_enum!(ImageUsage {
    TransferSrc,
    TransferDst,
    Sampled,
    Storage,
    ColorAttachment,
    DepthStencilAttachment,
    TransientAttachment,
    InputAttachment,
});

string_enum!(MemoryProperty {
    DeviceLocal,
    HostVisible,
    HostCoherent,
    HostCached,
    LazilyAllocated,
});

string_enum!(ImageTiling {
    Optimal,
    Linear,
});

string_enum!(SharingMode {
    Exclusive,
    Concurrent,
});

string_enum!(ImageAspect {
    Color,
    Depth,
    Stencil,
    Metadata,
});

string_enum!(Filter {
    Nearest,
    Linear,
});

string_enum!(SamplerMipmapMode {
    Nearest,
    Linear,
});

string_enum!(SamplerAddressMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
    MirrorClampToEdge,
});

string_enum!(BorderColor {
    FloatTransparentBlack,
    IntTransparentBlack,
    FloatOpaqueBlack,
    IntOpaqueBlack,
    FloatOpaqueWhite,
    IntOpaqueWhite,
});

string_enum!(CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
});

string_enum!(PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    TriangleFan,
    PointList,
    LineList,
    LineStrip,
});

string_enum!(PolygonMode {
    Fill,
    Line,
    Point,
});

string_enum!(CullMode {
    None,
    Front,
    Back,
    FrontAndBack,
});

string_enum!(FrontFace {
    CounterClockwise,
    Clockwise,
});

string_enum!(BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
});

string_enum!(BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
});

string_enum!(LogicOp {
    Copy,
    Clear,
    And,
    Or,
    Xor,
    NoOp,
    Equivalent,
    Set,
});

string_enum!(ColorComponent {
    R,
    G,
    B,
    A,
});

string_enum!(DynamicStateKind {
    Viewport,
    Scissor,
    LineWidth,
    DepthBias,
    BlendConstants,
    DepthBounds,
    StencilCompareMask,
    StencilWriteMask,
    StencilReference,
});

string_enum!(VertexInputRate {
    Vertex,
    Instance,
});

string_enum!(DescriptorType {
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
    UniformTexelBuffer,
    StorageTexelBuffer,
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    InputAttachment,
});

impl DescriptorType {
    /// Descriptors of these types are written through image-info entries.
    pub fn uses_image_info(self) -> bool {
        matches!(
            self,
            DescriptorType::Sampler
                | DescriptorType::CombinedImageSampler
                | DescriptorType::SampledImage
                | DescriptorType::StorageImage
                | DescriptorType::InputAttachment
        )
    }

    /// Descriptors of these types are written through buffer-info entries.
    pub fn uses_buffer_info(self) -> bool {
        !self.uses_image_info()
    }
}

string_enum!(CommandBufferLevel {
    Primary,
    Secondary,
});

string_enum!(CommandBufferUsage {
    OneTimeSubmit,
    RenderPassContinue,
    SimultaneousUse,
});

string_enum!(QueryType {
    Occlusion,
    PipelineStatistics,
    Timestamp,
});

string_enum!(IndexType {
    Uint32,
    Uint16,
});

string_enum!(SubpassContents {
    Inline,
    SecondaryCommandBuffers,
});

string_enum!(PresentMode {
    Fifo,
    FifoRelaxed,
    Mailbox,
    Immediate,
});

string_enum!(ColorSpace {
    SrgbNonlinear,
    DisplayP3Nonlinear,
    ExtendedSrgbLinear,
});

string_enum!(CompositeAlpha {
    Opaque,
    PreMultiplied,
    PostMultiplied,
    Inherit,
});

string_enum!(FormFactor {
    HeadMountedDisplay,
    HandheldDisplay,
});

string_enum!(ReferenceSpaceType {
    Local,
    View,
    Stage,
});

string_enum!(EnvironmentBlendMode {
    Opaque,
    Additive,
    AlphaBlend,
});

/// Image dimensionality. Tokens are the schema spellings "1D"/"2D"/"3D",
/// which are not valid variant names, so the table is written out by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    D1,
    #[default]
    D2,
    D3,
}

impl ImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::D1 => "1D",
            ImageType::D2 => "2D",
            ImageType::D3 => "3D",
        }
    }
}

impl std::str::FromStr for ImageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(ImageType::D1),
            "2D" => Ok(ImageType::D2),
            "3D" => Ok(ImageType::D3),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image view dimensionality, hand-written for the same reason as
/// [`ImageType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageViewType {
    D1,
    #[default]
    D2,
    D3,
    Cube,
    D1Array,
    D2Array,
    CubeArray,
}

impl ImageViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageViewType::D1 => "1D",
            ImageViewType::D2 => "2D",
            ImageViewType::D3 => "3D",
            ImageViewType::Cube => "Cube",
            ImageViewType::D1Array => "1DArray",
            ImageViewType::D2Array => "2DArray",
            ImageViewType::CubeArray => "CubeArray",
        }
    }
}

impl std::str::FromStr for ImageViewType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(ImageViewType::D1),
            "2D" => Ok(ImageViewType::D2),
            "3D" => Ok(ImageViewType::D3),
            "Cube" => Ok(ImageViewType::Cube),
            "1DArray" => Ok(ImageViewType::D1Array),
            "2DArray" => Ok(ImageViewType::D2Array),
            "CubeArray" => Ok(ImageViewType::CubeArray),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ImageViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        assert_eq!("TransferSrc".parse(), Ok(BufferUsage::TransferSrc));
        assert_eq!(BufferUsage::TransferSrc.as_str(), "TransferSrc");
        assert_eq!("2DArray".parse(), Ok(ImageViewType::D2Array));
        assert_eq!("B8G8R8A8Srgb".parse(), Ok(Format::B8G8R8A8Srgb));
        assert!("NotAFormat".parse::<Format>().is_err());
    }

    #[test]
    fn descriptor_type_categories() {
        assert!(DescriptorType::CombinedImageSampler.uses_image_info());
        assert!(!DescriptorType::CombinedImageSampler.uses_buffer_info());
        assert!(DescriptorType::UniformBuffer.uses_buffer_info());
        assert!(DescriptorType::StorageBufferDynamic.uses_buffer_info());
    }
}
