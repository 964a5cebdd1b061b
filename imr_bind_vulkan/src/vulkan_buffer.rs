/// VulkanBuffer - buffer resource handed to the bind helper

use ash::vk;

/// Vulkan buffer reference (not owned)
#[derive(Debug, Clone, Copy)]
pub struct VulkanBuffer {
    pub(crate) buffer: vk::Buffer,
    pub(crate) size: u64,
}

impl VulkanBuffer {
    pub fn new(buffer: vk::Buffer, size: u64) -> Self {
        Self { buffer, size }
    }

    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}
