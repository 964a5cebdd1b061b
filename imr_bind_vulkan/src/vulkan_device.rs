/// VulkanDevice - Vulkan implementation of the BindingDevice trait

use ash::vk;
use imr_bind::imr::binding::{
    BindPoint, BindingDevice, DescriptorPoolDesc, DescriptorResource, DescriptorWrite,
    ImageViewDesc, PipelineBindingLayout, ReflectedLayout,
};
use imr_bind::imr::{Error, Result};
use imr_bind::{imr_debug, imr_err, imr_trace};

use crate::vulkan_buffer::VulkanBuffer;
use crate::vulkan_convert::{
    bind_point_to_vk, descriptor_kind_to_vk, image_layout_to_vk, stage_flags_to_vk,
    subresource_range_to_vk, view_kind_to_vk,
};
use crate::vulkan_image::VulkanImage;

const LOG_SOURCE: &str = "imr::vulkan";

/// Descriptor primitives over a logical device
///
/// Holds a clone of the `ash::Device` dispatch table. The logical device
/// itself is owned by the caller and must outlive this value.
#[derive(Clone)]
pub struct VulkanDevice {
    pub(crate) device: ash::Device,
}

impl VulkanDevice {
    pub fn new(device: ash::Device) -> Self {
        Self { device }
    }

    pub fn raw(&self) -> &ash::Device {
        &self.device
    }

    /// Create one descriptor set layout per reflected set and a pipeline layout over them
    ///
    /// The returned layout is typically handed to `VulkanComputePipeline::new`
    /// or `VulkanGraphicsPipeline::new`, which take ownership of it.
    pub fn create_pipeline_binding_layout(
        &self,
        reflected: &ReflectedLayout,
    ) -> Result<PipelineBindingLayout<VulkanDevice>> {
        let mut set_layouts: Vec<vk::DescriptorSetLayout> = Vec::with_capacity(reflected.set_count());

        for bindings in reflected.sets() {
            let vk_bindings: Vec<vk::DescriptorSetLayoutBinding> = bindings
                .iter()
                .map(|binding| {
                    vk::DescriptorSetLayoutBinding::default()
                        .binding(binding.binding)
                        .descriptor_type(descriptor_kind_to_vk(binding.kind))
                        .descriptor_count(binding.count)
                        .stage_flags(stage_flags_to_vk(binding.stages))
                })
                .collect();

            let layout_create = vk::DescriptorSetLayoutCreateInfo::default().bindings(&vk_bindings);

            match unsafe { self.device.create_descriptor_set_layout(&layout_create, None) } {
                Ok(layout) => set_layouts.push(layout),
                Err(e) => {
                    self.destroy_set_layouts(&set_layouts);
                    return Err(imr_err!(LOG_SOURCE,
                        "Failed to create descriptor set layout: {:?}", e));
                }
            }
        }

        let layout_create_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);
        let pipeline_layout = match unsafe { self.device.create_pipeline_layout(&layout_create_info, None) } {
            Ok(layout) => layout,
            Err(e) => {
                self.destroy_set_layouts(&set_layouts);
                return Err(imr_err!(LOG_SOURCE,
                    "Failed to create pipeline layout: {:?}", e));
            }
        };

        imr_debug!(LOG_SOURCE, "Created pipeline layout with {} set layouts", set_layouts.len());
        Ok(PipelineBindingLayout::new(pipeline_layout, set_layouts))
    }

    /// Destroy a layout created by `create_pipeline_binding_layout`
    pub fn destroy_pipeline_binding_layout(&self, layout: &PipelineBindingLayout<VulkanDevice>) {
        unsafe {
            self.device.destroy_pipeline_layout(layout.pipeline_layout, None);
        }
        self.destroy_set_layouts(&layout.set_layouts);
    }

    fn destroy_set_layouts(&self, set_layouts: &[vk::DescriptorSetLayout]) {
        for set_layout in set_layouts {
            unsafe {
                self.device.destroy_descriptor_set_layout(*set_layout, None);
            }
        }
    }
}

impl BindingDevice for VulkanDevice {
    type DescriptorPool = vk::DescriptorPool;
    type DescriptorSet = vk::DescriptorSet;
    type SetLayout = vk::DescriptorSetLayout;
    type PipelineLayout = vk::PipelineLayout;
    type ImageView = vk::ImageView;
    type Sampler = vk::Sampler;
    type Image = VulkanImage;
    type Buffer = VulkanBuffer;
    type CommandStream = vk::CommandBuffer;

    fn create_descriptor_pool(&self, desc: &DescriptorPoolDesc) -> Result<vk::DescriptorPool> {
        // A layout without descriptors never allocates a set
        if desc.pool_sizes.is_empty() {
            imr_debug!(LOG_SOURCE, "No descriptors declared, skipping descriptor pool creation");
            return Ok(vk::DescriptorPool::null());
        }

        let pool_sizes: Vec<vk::DescriptorPoolSize> = desc
            .pool_sizes
            .iter()
            .map(|size| vk::DescriptorPoolSize {
                ty: descriptor_kind_to_vk(size.kind),
                descriptor_count: size.count,
            })
            .collect();

        let flags = if desc.free_individual_sets {
            vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET
        } else {
            vk::DescriptorPoolCreateFlags::empty()
        };

        let info = vk::DescriptorPoolCreateInfo::default()
            .flags(flags)
            .max_sets(desc.max_sets.max(1))
            .pool_sizes(&pool_sizes);

        unsafe {
            self.device
                .create_descriptor_pool(&info, None)
                .map_err(|e| Error::PoolCreationFailed(format!("{:?}", e)))
        }
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        unsafe {
            self.device.destroy_descriptor_pool(pool, None);
        }
    }

    fn allocate_descriptor_set(
        &self,
        pool: vk::DescriptorPool,
        layout: vk::DescriptorSetLayout,
    ) -> Result<vk::DescriptorSet> {
        let layouts = [layout];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(pool)
            .set_layouts(&layouts);

        let sets = unsafe {
            self.device
                .allocate_descriptor_sets(&allocate_info)
                .map_err(|e| Error::SetAllocationFailed(format!("{:?}", e)))?
        };
        sets.first().copied().ok_or_else(|| {
            Error::SetAllocationFailed("driver returned no descriptor set".to_string())
        })
    }

    fn create_image_view(&self, image: &VulkanImage, desc: &ImageViewDesc) -> Result<vk::ImageView> {
        let create_info = vk::ImageViewCreateInfo::default()
            .image(image.image)
            .view_type(view_kind_to_vk(desc.view_kind))
            .format(image.format)
            .components(vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            })
            .subresource_range(subresource_range_to_vk(&desc.range));

        unsafe {
            self.device.create_image_view(&create_info, None).map_err(|e| {
                Error::ViewCreationFailed(format!("{:?} view of {:?} image: {:?}", desc.view_kind, image.format, e))
            })
        }
    }

    fn destroy_image_view(&self, view: vk::ImageView) {
        unsafe {
            self.device.destroy_image_view(view, None);
        }
    }

    fn update_descriptor_set(&self, write: &DescriptorWrite<'_, Self>) {
        let base = vk::WriteDescriptorSet::default()
            .dst_set(write.set)
            .dst_binding(write.binding)
            .dst_array_element(0)
            .descriptor_type(descriptor_kind_to_vk(write.resource.kind()));

        match &write.resource {
            DescriptorResource::StorageImage { view, layout } => {
                let image_info = vk::DescriptorImageInfo::default()
                    .image_view(*view)
                    .image_layout(image_layout_to_vk(*layout));
                let vk_write = base.image_info(std::slice::from_ref(&image_info));
                unsafe { self.device.update_descriptor_sets(&[vk_write], &[]) };
            }
            DescriptorResource::CombinedImageSampler { view, sampler, layout } => {
                let image_info = vk::DescriptorImageInfo::default()
                    .sampler(*sampler)
                    .image_view(*view)
                    .image_layout(image_layout_to_vk(*layout));
                let vk_write = base.image_info(std::slice::from_ref(&image_info));
                unsafe { self.device.update_descriptor_sets(&[vk_write], &[]) };
            }
            DescriptorResource::UniformBuffer { buffer, offset, range }
            | DescriptorResource::StorageBuffer { buffer, offset, range } => {
                let buffer_info = vk::DescriptorBufferInfo::default()
                    .buffer(buffer.buffer)
                    .offset(*offset)
                    .range(*range);
                let vk_write = base.buffer_info(std::slice::from_ref(&buffer_info));
                unsafe { self.device.update_descriptor_sets(&[vk_write], &[]) };
            }
        }

        imr_trace!(LOG_SOURCE,
            "Wrote {:?} into binding {} of {:?}", write.resource.kind(), write.binding, write.set);
    }

    fn cmd_bind_descriptor_set(
        &self,
        stream: &mut vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        set_index: u32,
        set: vk::DescriptorSet,
    ) {
        unsafe {
            self.device.cmd_bind_descriptor_sets(
                *stream,
                bind_point_to_vk(bind_point),
                layout,
                set_index,
                &[set],
                &[],
            );
        }
    }
}
