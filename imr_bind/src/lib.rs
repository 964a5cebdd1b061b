/*!
# IMR Bind

Descriptor binding helper for compute and graphics pipelines.

A [`DescriptorBindHelper`](crate::binding::DescriptorBindHelper) takes a
pipeline's reflected binding layout and lets the caller attach images,
buffers and samplers to named slots. It sizes and owns a descriptor pool,
allocates each descriptor set on first use, owns the image views it creates
for image descriptors, and records the set binds into a command stream.

## Architecture

- **BindingDevice**: device primitives a backend implements (pool, set, view, write, bind)
- **BindablePipeline**: adapter exposing a built pipeline's binding inputs
- **ReflectedLayout**: per-set, per-slot descriptor kinds and counts
- **DescriptorBindHelper**: the helper itself

The Vulkan backend lives in the `imr_bind_vulkan` crate.
*/

mod error;
pub mod log;
pub mod binding;

// Main imr namespace module
pub mod imr {
    // Error types
    pub use crate::error::{Error, Result};

    // Bind helper
    pub use crate::binding::DescriptorBindHelper;

    // Logging sub-module (types and logger control)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, log, log_detailed,
        };
    }

    // Binding sub-module with all layout, image and device types
    pub mod binding {
        pub use crate::binding::*;
    }
}
