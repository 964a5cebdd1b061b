/// Mock binding device for unit tests (no GPU required)
///
/// Hands out increasing integer handles, records every primitive call in
/// order, and can be told to fail pool creation, set allocation or view
/// creation. Pools enforce their `max_sets` capacity so sizing bugs surface
/// as allocation failures, like on a real driver.

use std::sync::Mutex;
use crate::error::{Error, Result};
use crate::binding::{
    BindPoint, BindablePipeline, BindingDevice, DescriptorKind, DescriptorPoolDesc,
    DescriptorResource, DescriptorWrite, Image, ImageAspects, ImageInfo, ImageKind,
    ImageLayout, ImageViewDesc, PipelineBindingLayout, ReflectedLayout,
};

// ============================================================================
// Mock resources
// ============================================================================

#[derive(Debug)]
pub struct MockImage {
    pub name: String,
    pub info: ImageInfo,
}

impl MockImage {
    pub fn new_2d(name: &str, width: u32, height: u32, mip_levels: u32, array_layers: u32) -> Self {
        Self {
            name: name.to_string(),
            info: ImageInfo {
                kind: ImageKind::D2,
                width,
                height,
                depth: 1,
                mip_levels,
                array_layers,
                aspects: ImageAspects::COLOR,
            },
        }
    }

    pub fn new_3d(name: &str, width: u32, height: u32, depth: u32) -> Self {
        Self {
            name: name.to_string(),
            info: ImageInfo {
                kind: ImageKind::D3,
                width,
                height,
                depth,
                mip_levels: 1,
                array_layers: 1,
                aspects: ImageAspects::COLOR,
            },
        }
    }
}

impl Image for MockImage {
    fn info(&self) -> &ImageInfo {
        &self.info
    }
}

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub size: u64,
}

impl MockBuffer {
    pub fn new(name: &str, size: u64) -> Self {
        Self { name: name.to_string(), size }
    }
}

// ============================================================================
// Recorded calls
// ============================================================================

/// A descriptor write as seen by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockWrite {
    pub set: u64,
    pub binding: u32,
    pub kind: DescriptorKind,
    pub view: Option<u64>,
    pub sampler: Option<u64>,
    pub image_layout: Option<ImageLayout>,
    pub buffer: Option<String>,
    pub offset: u64,
    pub range: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateDescriptorPool { pool: u64, desc: DescriptorPoolDesc },
    DestroyDescriptorPool { pool: u64 },
    AllocateDescriptorSet { pool: u64, layout: u64, set: u64 },
    CreateImageView { image: String, view: u64, desc: ImageViewDesc },
    DestroyImageView { view: u64 },
    UpdateDescriptorSet(MockWrite),
}

/// A bind command recorded into a MockCommandStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBindCommand {
    pub bind_point: BindPoint,
    pub pipeline_layout: u64,
    pub set_index: u32,
    pub set: u64,
}

#[derive(Debug, Default)]
pub struct MockCommandStream {
    pub commands: Vec<MockBindCommand>,
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug, Default)]
struct MockState {
    next_handle: u64,
    calls: Vec<MockCall>,
    /// (pool, max_sets, allocated)
    pools: Vec<(u64, u32, u32)>,
}

impl MockState {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

#[derive(Debug, Default)]
pub struct MockBindingDevice {
    state: Mutex<MockState>,
    pub fail_pool_creation: bool,
    pub fail_set_allocation: bool,
    pub fail_view_creation: bool,
}

impl MockBindingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every primitive call so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn pool_descs(&self) -> Vec<DescriptorPoolDesc> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::CreateDescriptorPool { desc, .. } => Some(desc),
                _ => None,
            })
            .collect()
    }

    pub fn created_views(&self) -> Vec<(u64, ImageViewDesc)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::CreateImageView { view, desc, .. } => Some((view, desc)),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed_views(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::DestroyImageView { view } => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<MockWrite> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::UpdateDescriptorSet(write) => Some(write),
                _ => None,
            })
            .collect()
    }

    /// Set layouts are opaque to the mock; hand out fresh handles for them
    pub fn create_binding_layout(&self, set_count: usize) -> PipelineBindingLayout<Self> {
        let mut state = self.state.lock().unwrap();
        let pipeline_layout = state.next();
        let set_layouts = (0..set_count).map(|_| state.next()).collect();
        PipelineBindingLayout::new(pipeline_layout, set_layouts)
    }
}

impl BindingDevice for MockBindingDevice {
    type DescriptorPool = u64;
    type DescriptorSet = u64;
    type SetLayout = u64;
    type PipelineLayout = u64;
    type ImageView = u64;
    type Sampler = u64;
    type Image = MockImage;
    type Buffer = MockBuffer;
    type CommandStream = MockCommandStream;

    fn create_descriptor_pool(&self, desc: &DescriptorPoolDesc) -> Result<u64> {
        if self.fail_pool_creation {
            return Err(Error::BackendError("mock pool creation failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let pool = state.next();
        state.pools.push((pool, desc.max_sets, 0));
        state.calls.push(MockCall::CreateDescriptorPool { pool, desc: desc.clone() });
        Ok(pool)
    }

    fn destroy_descriptor_pool(&self, pool: u64) {
        let mut state = self.state.lock().unwrap();
        state.pools.retain(|(p, _, _)| *p != pool);
        state.calls.push(MockCall::DestroyDescriptorPool { pool });
    }

    fn allocate_descriptor_set(&self, pool: u64, layout: u64) -> Result<u64> {
        if self.fail_set_allocation {
            return Err(Error::BackendError("mock set allocation failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let entry = match state.pools.iter_mut().find(|(p, _, _)| *p == pool) {
            Some(entry) => entry,
            None => return Err(Error::SetAllocationFailed(format!("unknown pool {}", pool))),
        };
        if entry.2 >= entry.1 {
            return Err(Error::SetAllocationFailed("out of pool memory".to_string()));
        }
        entry.2 += 1;
        let set = state.next();
        state.calls.push(MockCall::AllocateDescriptorSet { pool, layout, set });
        Ok(set)
    }

    fn create_image_view(&self, image: &MockImage, desc: &ImageViewDesc) -> Result<u64> {
        if self.fail_view_creation {
            return Err(Error::ViewCreationFailed("mock view creation failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let view = state.next();
        state.calls.push(MockCall::CreateImageView {
            image: image.name.clone(),
            view,
            desc: *desc,
        });
        Ok(view)
    }

    fn destroy_image_view(&self, view: u64) {
        self.state.lock().unwrap().calls.push(MockCall::DestroyImageView { view });
    }

    fn update_descriptor_set(&self, write: &DescriptorWrite<'_, Self>) {
        let mut recorded = MockWrite {
            set: write.set,
            binding: write.binding,
            kind: write.resource.kind(),
            view: None,
            sampler: None,
            image_layout: None,
            buffer: None,
            offset: 0,
            range: 0,
        };
        match &write.resource {
            DescriptorResource::StorageImage { view, layout } => {
                recorded.view = Some(*view);
                recorded.image_layout = Some(*layout);
            }
            DescriptorResource::CombinedImageSampler { view, sampler, layout } => {
                recorded.view = Some(*view);
                recorded.sampler = Some(*sampler);
                recorded.image_layout = Some(*layout);
            }
            DescriptorResource::UniformBuffer { buffer, offset, range }
            | DescriptorResource::StorageBuffer { buffer, offset, range } => {
                recorded.buffer = Some(buffer.name.clone());
                recorded.offset = *offset;
                recorded.range = *range;
            }
        }
        self.state.lock().unwrap().calls.push(MockCall::UpdateDescriptorSet(recorded));
    }

    fn cmd_bind_descriptor_set(
        &self,
        stream: &mut MockCommandStream,
        bind_point: BindPoint,
        layout: u64,
        set_index: u32,
        set: u64,
    ) {
        stream.commands.push(MockBindCommand {
            bind_point,
            pipeline_layout: layout,
            set_index,
            set,
        });
    }
}

// ============================================================================
// Mock pipelines
// ============================================================================

/// Compute pipeline adapter over the mock device
pub struct MockComputePipeline {
    pub device: MockBindingDevice,
    pub layout: PipelineBindingLayout<MockBindingDevice>,
    pub reflected: ReflectedLayout,
}

impl MockComputePipeline {
    pub fn new(reflected: ReflectedLayout) -> Self {
        let device = MockBindingDevice::new();
        let layout = device.create_binding_layout(reflected.set_count());
        Self { device, layout, reflected }
    }
}

impl BindablePipeline for MockComputePipeline {
    type Device = MockBindingDevice;

    fn device(&self) -> &MockBindingDevice {
        &self.device
    }

    fn binding_layout(&self) -> &PipelineBindingLayout<MockBindingDevice> {
        &self.layout
    }

    fn reflected_layout(&self) -> &ReflectedLayout {
        &self.reflected
    }

    fn bind_point(&self) -> BindPoint {
        BindPoint::Compute
    }
}
