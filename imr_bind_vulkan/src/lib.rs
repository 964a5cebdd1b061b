/*!
# IMR Bind - Vulkan Backend

Vulkan implementation of the `imr_bind` device seam, using the Ash library
for Vulkan bindings.

[`VulkanDevice`] creates descriptor pools, allocates sets, creates image
views and records `vkCmdBindDescriptorSets`. [`VulkanComputePipeline`] and
[`VulkanGraphicsPipeline`] wrap built pipelines so a
[`DescriptorBindHelper`](imr_bind::imr::DescriptorBindHelper) can be created
straight from them.

# Example

```no_run
use ash::vk;
use imr_bind::imr::{DescriptorBindHelper, Result};
use imr_bind_vulkan::{VulkanBuffer, VulkanComputePipeline, VulkanDevice, VulkanImage};

// The returned helper must be kept until the command buffer has finished executing
fn record<'a>(
    pipeline: &'a VulkanComputePipeline,
    image: &VulkanImage,
    params: &VulkanBuffer,
    cmd: &mut vk::CommandBuffer,
) -> Result<DescriptorBindHelper<'a, VulkanDevice>> {
    let mut helper = pipeline.create_bind_helper()?;
    helper.set_storage_image(0, 0, image, None, None)?;
    helper.set_uniform_buffer(1, 0, params, 0, params.size())?;
    helper.commit(cmd);
    Ok(helper)
}
```
*/

mod vulkan_convert;
mod vulkan_device;
mod vulkan_image;
mod vulkan_buffer;
mod vulkan_pipeline;

pub use vulkan_device::VulkanDevice;
pub use vulkan_image::VulkanImage;
pub use vulkan_buffer::VulkanBuffer;
pub use vulkan_pipeline::{VulkanComputePipeline, VulkanGraphicsPipeline};

// Main imr namespace module for the Vulkan backend
pub mod imr {
    pub use crate::vulkan_device::VulkanDevice;
    pub use crate::vulkan_image::VulkanImage;
    pub use crate::vulkan_buffer::VulkanBuffer;
    pub use crate::vulkan_pipeline::{VulkanComputePipeline, VulkanGraphicsPipeline};
}
