/// VulkanComputePipeline / VulkanGraphicsPipeline - built pipelines a bind helper can target

use ash::vk;
use imr_bind::imr::binding::{BindPoint, BindablePipeline, PipelineBindingLayout, ReflectedLayout};
use imr_bind::imr::{DescriptorBindHelper, Result};

use imr_bind::imr_error;

use crate::vulkan_device::VulkanDevice;

const LOG_SOURCE: &str = "imr::vulkan";

/// Compute pipeline with its binding layout and reflected descriptor layout
///
/// Takes ownership of the pipeline, the pipeline layout and the set layouts.
pub struct VulkanComputePipeline {
    pub(crate) pipeline: vk::Pipeline,
    binding_layout: PipelineBindingLayout<VulkanDevice>,
    reflected: ReflectedLayout,
    pub(crate) device: VulkanDevice,
}

impl VulkanComputePipeline {
    pub fn new(
        device: &VulkanDevice,
        pipeline: vk::Pipeline,
        binding_layout: PipelineBindingLayout<VulkanDevice>,
        reflected: ReflectedLayout,
    ) -> Self {
        Self {
            pipeline,
            binding_layout,
            reflected,
            device: device.clone(),
        }
    }

    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }

    pub fn create_bind_helper(&self) -> Result<DescriptorBindHelper<'_, VulkanDevice>> {
        DescriptorBindHelper::for_pipeline(self)
    }
}

impl BindablePipeline for VulkanComputePipeline {
    type Device = VulkanDevice;

    fn device(&self) -> &VulkanDevice {
        &self.device
    }

    fn binding_layout(&self) -> &PipelineBindingLayout<VulkanDevice> {
        &self.binding_layout
    }

    fn reflected_layout(&self) -> &ReflectedLayout {
        &self.reflected
    }

    fn bind_point(&self) -> BindPoint {
        BindPoint::Compute
    }
}

impl Drop for VulkanComputePipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_pipeline(self.pipeline, None);
        }
        self.device.destroy_pipeline_binding_layout(&self.binding_layout);
    }
}

/// Graphics pipeline whose descriptor layout is merged across its shader stages
pub struct VulkanGraphicsPipeline {
    pub(crate) pipeline: vk::Pipeline,
    binding_layout: PipelineBindingLayout<VulkanDevice>,
    final_layout: ReflectedLayout,
    pub(crate) device: VulkanDevice,
}

impl VulkanGraphicsPipeline {
    /// Wrap a graphics pipeline built from `stage_layouts`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if two stages declare the same slot
    /// with different descriptor kinds. The pipeline and its layouts are
    /// owned either way: on failure they are destroyed before returning.
    pub fn new(
        device: &VulkanDevice,
        pipeline: vk::Pipeline,
        binding_layout: PipelineBindingLayout<VulkanDevice>,
        stage_layouts: &[ReflectedLayout],
    ) -> Result<Self> {
        let final_layout = match ReflectedLayout::merged(stage_layouts) {
            Ok(layout) => layout,
            Err(e) => {
                imr_error!(LOG_SOURCE, "Conflicting stage layouts, destroying pipeline: {}", e);
                unsafe {
                    device.device.destroy_pipeline(pipeline, None);
                }
                device.destroy_pipeline_binding_layout(&binding_layout);
                return Err(e);
            }
        };
        Ok(Self {
            pipeline,
            binding_layout,
            final_layout,
            device: device.clone(),
        })
    }

    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }

    /// Descriptor layout merged across all stages
    pub fn final_layout(&self) -> &ReflectedLayout {
        &self.final_layout
    }

    pub fn create_bind_helper(&self) -> Result<DescriptorBindHelper<'_, VulkanDevice>> {
        DescriptorBindHelper::for_pipeline(self)
    }
}

impl BindablePipeline for VulkanGraphicsPipeline {
    type Device = VulkanDevice;

    fn device(&self) -> &VulkanDevice {
        &self.device
    }

    fn binding_layout(&self) -> &PipelineBindingLayout<VulkanDevice> {
        &self.binding_layout
    }

    fn reflected_layout(&self) -> &ReflectedLayout {
        &self.final_layout
    }

    fn bind_point(&self) -> BindPoint {
        BindPoint::Graphics
    }
}

impl Drop for VulkanGraphicsPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.device.destroy_pipeline(self.pipeline, None);
        }
        self.device.destroy_pipeline_binding_layout(&self.binding_layout);
    }
}
