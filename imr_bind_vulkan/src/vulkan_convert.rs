/// Conversions from the backend-agnostic binding types to Vulkan enums

use ash::vk;
use imr_bind::imr::binding::{
    BindPoint, DescriptorKind, ImageAspects, ImageKind, ImageLayout, ImageViewKind,
    ShaderStages, SubresourceRange,
};
use imr_bind::imr::{Error, Result};

pub(crate) fn descriptor_kind_to_vk(kind: DescriptorKind) -> vk::DescriptorType {
    match kind {
        DescriptorKind::Sampler => vk::DescriptorType::SAMPLER,
        DescriptorKind::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        DescriptorKind::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        DescriptorKind::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        DescriptorKind::UniformTexelBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
        DescriptorKind::StorageTexelBuffer => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
        DescriptorKind::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorKind::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorKind::UniformBufferDynamic => vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
        DescriptorKind::StorageBufferDynamic => vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
        DescriptorKind::InputAttachment => vk::DescriptorType::INPUT_ATTACHMENT,
    }
}

pub(crate) fn view_kind_to_vk(kind: ImageViewKind) -> vk::ImageViewType {
    match kind {
        ImageViewKind::D1 => vk::ImageViewType::TYPE_1D,
        ImageViewKind::D2 => vk::ImageViewType::TYPE_2D,
        ImageViewKind::D3 => vk::ImageViewType::TYPE_3D,
        ImageViewKind::Cube => vk::ImageViewType::CUBE,
        ImageViewKind::D1Array => vk::ImageViewType::TYPE_1D_ARRAY,
        ImageViewKind::D2Array => vk::ImageViewType::TYPE_2D_ARRAY,
        ImageViewKind::CubeArray => vk::ImageViewType::CUBE_ARRAY,
    }
}

/// Unknown image types are rejected rather than guessed
pub(crate) fn image_kind_from_vk(image_type: vk::ImageType) -> Result<ImageKind> {
    match image_type {
        vk::ImageType::TYPE_1D => Ok(ImageKind::D1),
        vk::ImageType::TYPE_2D => Ok(ImageKind::D2),
        vk::ImageType::TYPE_3D => Ok(ImageKind::D3),
        other => Err(Error::InvalidResource(format!("unknown image type {:?}", other))),
    }
}

pub(crate) fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::General => vk::ImageLayout::GENERAL,
        ImageLayout::ShaderReadOnlyOptimal => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
    }
}

pub(crate) fn aspects_to_vk(aspects: ImageAspects) -> vk::ImageAspectFlags {
    let mut flags = vk::ImageAspectFlags::empty();
    if aspects.contains(ImageAspects::COLOR) { flags |= vk::ImageAspectFlags::COLOR; }
    if aspects.contains(ImageAspects::DEPTH) { flags |= vk::ImageAspectFlags::DEPTH; }
    if aspects.contains(ImageAspects::STENCIL) { flags |= vk::ImageAspectFlags::STENCIL; }
    flags
}

/// Aspects present in a format
pub(crate) fn aspects_for_format(format: vk::Format) -> ImageAspects {
    match format {
        vk::Format::D16_UNORM | vk::Format::X8_D24_UNORM_PACK32 | vk::Format::D32_SFLOAT => {
            ImageAspects::DEPTH
        }
        vk::Format::S8_UINT => ImageAspects::STENCIL,
        vk::Format::D16_UNORM_S8_UINT
        | vk::Format::D24_UNORM_S8_UINT
        | vk::Format::D32_SFLOAT_S8_UINT => ImageAspects::DEPTH | ImageAspects::STENCIL,
        _ => ImageAspects::COLOR,
    }
}

pub(crate) fn subresource_range_to_vk(range: &SubresourceRange) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: aspects_to_vk(range.aspects),
        base_mip_level: range.base_mip_level,
        level_count: range.level_count,
        base_array_layer: range.base_array_layer,
        layer_count: range.layer_count,
    }
}

pub(crate) fn bind_point_to_vk(bind_point: BindPoint) -> vk::PipelineBindPoint {
    match bind_point {
        BindPoint::Compute => vk::PipelineBindPoint::COMPUTE,
        BindPoint::Graphics => vk::PipelineBindPoint::GRAPHICS,
    }
}

/// Bindings without recorded stages are visible to every stage
pub(crate) fn stage_flags_to_vk(stages: ShaderStages) -> vk::ShaderStageFlags {
    if stages.is_empty() {
        return vk::ShaderStageFlags::ALL;
    }
    let mut flags = vk::ShaderStageFlags::empty();
    if stages.contains(ShaderStages::VERTEX) { flags |= vk::ShaderStageFlags::VERTEX; }
    if stages.contains(ShaderStages::FRAGMENT) { flags |= vk::ShaderStageFlags::FRAGMENT; }
    if stages.contains(ShaderStages::COMPUTE) { flags |= vk::ShaderStageFlags::COMPUTE; }
    flags
}

#[cfg(test)]
#[path = "vulkan_convert_tests.rs"]
mod tests;
