/// Device primitives the bind helper drives
///
/// `BindingDevice` is the seam between the backend-agnostic helper and a
/// concrete graphics API. Each backend implements it once (see
/// `imr_bind_vulkan::VulkanDevice`); tests use a recording mock.

use std::fmt::Debug;
use crate::error::Result;
use crate::binding::{
    DescriptorKind, DescriptorPoolSize, Image, ImageLayout, ImageViewDesc, ReflectedLayout,
};

/// Pipeline bind point a helper records its sets under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindPoint {
    Compute,
    Graphics,
}

/// Description of the descriptor pool backing one helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorPoolDesc {
    /// Maximum number of sets allocated from the pool
    pub max_sets: u32,
    /// Per-kind descriptor capacity
    pub pool_sizes: Vec<DescriptorPoolSize>,
    /// Sets may be freed individually (VK_DESCRIPTOR_POOL_CREATE_FREE_DESCRIPTOR_SET_BIT)
    pub free_individual_sets: bool,
}

/// Resource written into one descriptor slot
pub enum DescriptorResource<'a, D: BindingDevice> {
    StorageImage {
        view: D::ImageView,
        layout: ImageLayout,
    },
    CombinedImageSampler {
        view: D::ImageView,
        sampler: D::Sampler,
        layout: ImageLayout,
    },
    UniformBuffer {
        buffer: &'a D::Buffer,
        offset: u64,
        range: u64,
    },
    StorageBuffer {
        buffer: &'a D::Buffer,
        offset: u64,
        range: u64,
    },
}

impl<D: BindingDevice> DescriptorResource<'_, D> {
    /// Descriptor kind this resource is written as
    pub fn kind(&self) -> DescriptorKind {
        match self {
            DescriptorResource::StorageImage { .. } => DescriptorKind::StorageImage,
            DescriptorResource::CombinedImageSampler { .. } => DescriptorKind::CombinedImageSampler,
            DescriptorResource::UniformBuffer { .. } => DescriptorKind::UniformBuffer,
            DescriptorResource::StorageBuffer { .. } => DescriptorKind::StorageBuffer,
        }
    }
}

/// One descriptor update: `resource` goes into array element 0 of `binding` in `set`
pub struct DescriptorWrite<'a, D: BindingDevice> {
    pub set: D::DescriptorSet,
    pub binding: u32,
    pub resource: DescriptorResource<'a, D>,
}

/// Descriptor-related device primitives
///
/// Handle types are plain copyable values; ownership of the objects they name
/// is tracked by the caller (the bind helper for pools and views).
pub trait BindingDevice: Sized {
    type DescriptorPool: Copy + Debug;
    type DescriptorSet: Copy + Debug + PartialEq;
    type SetLayout: Copy + Debug;
    type PipelineLayout: Copy + Debug;
    type ImageView: Copy + Debug + PartialEq;
    type Sampler: Copy + Debug;
    type Image: Image;
    type Buffer;
    /// Recording target for bind commands
    type CommandStream;

    fn create_descriptor_pool(&self, desc: &DescriptorPoolDesc) -> Result<Self::DescriptorPool>;

    /// Destroy a pool, implicitly freeing every set allocated from it
    fn destroy_descriptor_pool(&self, pool: Self::DescriptorPool);

    fn allocate_descriptor_set(
        &self,
        pool: Self::DescriptorPool,
        layout: Self::SetLayout,
    ) -> Result<Self::DescriptorSet>;

    fn create_image_view(&self, image: &Self::Image, desc: &ImageViewDesc) -> Result<Self::ImageView>;

    fn destroy_image_view(&self, view: Self::ImageView);

    fn update_descriptor_set(&self, write: &DescriptorWrite<'_, Self>);

    /// Record a bind of `set` at `set_index` into `stream`
    fn cmd_bind_descriptor_set(
        &self,
        stream: &mut Self::CommandStream,
        bind_point: BindPoint,
        layout: Self::PipelineLayout,
        set_index: u32,
        set: Self::DescriptorSet,
    );
}

/// Pipeline binding layout: the pipeline layout and one set layout per set index
pub struct PipelineBindingLayout<D: BindingDevice> {
    pub pipeline_layout: D::PipelineLayout,
    pub set_layouts: Vec<D::SetLayout>,
}

impl<D: BindingDevice> PipelineBindingLayout<D> {
    pub fn new(pipeline_layout: D::PipelineLayout, set_layouts: Vec<D::SetLayout>) -> Self {
        Self { pipeline_layout, set_layouts }
    }
}

impl<D: BindingDevice> Clone for PipelineBindingLayout<D> {
    fn clone(&self) -> Self {
        Self {
            pipeline_layout: self.pipeline_layout,
            set_layouts: self.set_layouts.clone(),
        }
    }
}

/// A built pipeline that can hand its binding inputs to a bind helper
///
/// Compute pipelines expose their single reflected layout; graphics
/// pipelines expose the layout merged across their stages.
pub trait BindablePipeline {
    type Device: BindingDevice;

    fn device(&self) -> &Self::Device;
    fn binding_layout(&self) -> &PipelineBindingLayout<Self::Device>;
    fn reflected_layout(&self) -> &ReflectedLayout;
    fn bind_point(&self) -> BindPoint;
}
