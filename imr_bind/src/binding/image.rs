/// Image model consumed by the bind helper
///
/// Only what is needed to derive auxiliary views: dimensionality, aspects,
/// mip and layer counts. Handles and formats stay inside the backend's image
/// type, which exposes this description through the [`Image`] trait.

use bitflags::bitflags;

/// Dimensionality of an image resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    D1,
    D2,
    D3,
}

impl ImageKind {
    /// View kind matching the image's own dimensionality
    pub fn default_view_kind(&self) -> ImageViewKind {
        match self {
            ImageKind::D1 => ImageViewKind::D1,
            ImageKind::D2 => ImageViewKind::D2,
            ImageKind::D3 => ImageViewKind::D3,
        }
    }

    /// Array view kind for this dimensionality (3D images have no array form)
    pub fn default_array_view_kind(&self) -> ImageViewKind {
        match self {
            ImageKind::D1 => ImageViewKind::D1Array,
            ImageKind::D2 => ImageViewKind::D2Array,
            ImageKind::D3 => ImageViewKind::D3,
        }
    }
}

/// Kind of view created over an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageViewKind {
    D1,
    D2,
    D3,
    Cube,
    D1Array,
    D2Array,
    CubeArray,
}

bitflags! {
    /// Image aspects addressed by a subresource range
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageAspects: u32 {
        const COLOR = 0x01;
        const DEPTH = 0x02;
        const STENCIL = 0x04;
    }
}

/// Range of mip levels and array layers of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceRange {
    pub aspects: ImageAspects,
    pub base_mip_level: u32,
    pub level_count: u32,
    pub base_array_layer: u32,
    pub layer_count: u32,
}

/// Layout an image is expected to be in when a descriptor is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    /// Read/write access (storage images)
    General,
    /// Sampled access
    ShaderReadOnlyOptimal,
}

/// Read-only properties of an image resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub aspects: ImageAspects,
}

impl ImageInfo {
    /// Every mip level and layer of every aspect
    pub fn whole_subresource_range(&self) -> SubresourceRange {
        SubresourceRange {
            aspects: self.aspects,
            base_mip_level: 0,
            level_count: self.mip_levels,
            base_array_layer: 0,
            layer_count: self.array_layers,
        }
    }

    /// Range used for sampled views: the top mip level and all layers
    ///
    /// A sampled view may only address one aspect; depth wins over stencil.
    pub fn sampled_subresource_range(&self) -> SubresourceRange {
        let aspects = if self.aspects.contains(ImageAspects::COLOR) {
            ImageAspects::COLOR
        } else if self.aspects.contains(ImageAspects::DEPTH) {
            ImageAspects::DEPTH
        } else {
            self.aspects
        };

        SubresourceRange {
            aspects,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: self.array_layers,
        }
    }
}

/// Parameters of an auxiliary view the helper asks the device to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageViewDesc {
    pub view_kind: ImageViewKind,
    pub range: SubresourceRange,
}

/// Image resource trait
///
/// Implemented by backend image types (e.g., `VulkanImage`).
pub trait Image {
    fn info(&self) -> &ImageInfo;
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
