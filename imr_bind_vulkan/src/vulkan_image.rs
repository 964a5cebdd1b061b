/// VulkanImage - image resource handed to the bind helper

use ash::vk;
use imr_bind::imr::binding::{Image, ImageInfo};
use imr_bind::imr::Result;
use crate::vulkan_convert::{aspects_for_format, image_kind_from_vk};

/// Vulkan image reference
///
/// Does not own the image or its memory; the bind helper only creates views
/// over it. The image must outlive every helper that binds it.
#[derive(Debug, Clone)]
pub struct VulkanImage {
    pub(crate) image: vk::Image,
    pub(crate) format: vk::Format,
    info: ImageInfo,
}

impl VulkanImage {
    pub fn new(image: vk::Image, format: vk::Format, info: ImageInfo) -> Self {
        Self { image, format, info }
    }

    /// Describe an image from the create info it was built with
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` for an unknown image type.
    pub fn from_create_info(image: vk::Image, create_info: &vk::ImageCreateInfo) -> Result<Self> {
        let info = ImageInfo {
            kind: image_kind_from_vk(create_info.image_type)?,
            width: create_info.extent.width,
            height: create_info.extent.height,
            depth: create_info.extent.depth,
            mip_levels: create_info.mip_levels,
            array_layers: create_info.array_layers,
            aspects: aspects_for_format(create_info.format),
        };
        Ok(Self::new(image, create_info.format, info))
    }

    pub fn handle(&self) -> vk::Image {
        self.image
    }

    pub fn format(&self) -> vk::Format {
        self.format
    }
}

impl Image for VulkanImage {
    fn info(&self) -> &ImageInfo {
        &self.info
    }
}
