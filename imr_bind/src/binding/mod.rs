/// Binding module - descriptor binding helper and the types it consumes

pub mod reflected_layout;
pub mod image;
pub mod device;
pub mod bind_helper;

pub use reflected_layout::*;
pub use image::*;
pub use device::*;
pub use bind_helper::*;

// Recording device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
