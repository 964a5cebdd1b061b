/// DescriptorBindHelper - attaches resources to a pipeline's binding slots
///
/// One helper describes the bindings of one pipeline activation:
///
/// 1. construct it (sizes and creates a private descriptor pool),
/// 2. call setters in any order (each lazily allocates its target set and,
///    for image kinds, creates an image view the helper keeps alive),
/// 3. `commit` once into a command stream (`commit_frame` re-records the same
///    binds into further streams),
/// 4. drop it after the GPU has finished every stream it was recorded into.
///
/// Dropping releases the pool (and with it every set) and then destroys the
/// image views in creation order. Nothing here waits for the GPU: the caller
/// owns that ordering.

use crate::error::{Error, Result};
use crate::binding::{
    BindPoint, BindablePipeline, BindingDevice, DescriptorKind, DescriptorPoolDesc,
    DescriptorResource, DescriptorWrite, Image, ImageLayout, ImageViewDesc, ImageViewKind,
    PipelineBindingLayout, ReflectedLayout, SubresourceRange,
};
use crate::{imr_debug, imr_error, imr_trace};

const LOG_SOURCE: &str = "imr::bind_helper";

pub struct DescriptorBindHelper<'a, D: BindingDevice> {
    device: &'a D,
    layout: &'a PipelineBindingLayout<D>,
    reflected: &'a ReflectedLayout,
    bind_point: BindPoint,

    pool: D::DescriptorPool,
    /// One entry per reflected set; `None` until a setter targets it
    sets: Box<[Option<D::DescriptorSet>]>,
    /// Views created by setters, destroyed in order on drop
    views: Vec<D::ImageView>,
    committed: bool,
}

impl<'a, D: BindingDevice> DescriptorBindHelper<'a, D> {
    /// Create a helper for an explicit {binding layout, reflected layout, bind point}
    ///
    /// The descriptor pool holds exactly the descriptors the reflected layout
    /// declares, summed per kind, and at most one set per set layout.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the reflected layout has more sets than
    ///   the pipeline layout has set layouts
    /// - `Error::PoolCreationFailed` if the device cannot create the pool
    pub fn new(
        device: &'a D,
        layout: &'a PipelineBindingLayout<D>,
        reflected: &'a ReflectedLayout,
        bind_point: BindPoint,
    ) -> Result<Self> {
        let set_count = reflected.set_count();
        if set_count > layout.set_layouts.len() {
            imr_error!(LOG_SOURCE,
                "Reflected layout has {} sets but the pipeline layout only {}",
                set_count, layout.set_layouts.len());
            return Err(Error::InvalidResource(format!(
                "reflected layout has {} sets, pipeline layout has {}",
                set_count,
                layout.set_layouts.len()
            )));
        }

        let desc = DescriptorPoolDesc {
            max_sets: layout.set_layouts.len() as u32,
            pool_sizes: reflected.descriptor_counts(),
            free_individual_sets: true,
        };

        let pool = device.create_descriptor_pool(&desc).map_err(|e| {
            imr_error!(LOG_SOURCE, "Failed to create descriptor pool: {}", e);
            match e {
                Error::PoolCreationFailed(_) => e,
                other => Error::PoolCreationFailed(other.to_string()),
            }
        })?;

        imr_debug!(LOG_SOURCE,
            "Created descriptor pool ({:?}): {} sets, {} descriptor kinds",
            bind_point, desc.max_sets, desc.pool_sizes.len());

        Ok(Self {
            device,
            layout,
            reflected,
            bind_point,
            pool,
            sets: vec![None; set_count].into_boxed_slice(),
            views: Vec::new(),
            committed: false,
        })
    }

    /// Create a helper from an already-built pipeline
    pub fn for_pipeline<P>(pipeline: &'a P) -> Result<Self>
    where
        P: BindablePipeline<Device = D>,
    {
        Self::new(
            pipeline.device(),
            pipeline.binding_layout(),
            pipeline.reflected_layout(),
            pipeline.bind_point(),
        )
    }

    // ===== SETTERS =====

    /// Bind `image` as a storage image at `(set, slot)`
    ///
    /// The view covers `range` (default: the whole image) with `view_kind`
    /// (default: the image's own dimensionality). The image must be in the
    /// GENERAL layout when the GPU uses the descriptor.
    ///
    /// # Panics
    ///
    /// If the helper is committed or `(set, slot)` is not a storage image slot.
    pub fn set_storage_image(
        &mut self,
        set: u32,
        slot: u32,
        image: &D::Image,
        range: Option<SubresourceRange>,
        view_kind: Option<ImageViewKind>,
    ) -> Result<()> {
        self.check_slot(set, slot, DescriptorKind::StorageImage);

        let info = image.info();
        let desc = ImageViewDesc {
            view_kind: view_kind.unwrap_or_else(|| info.kind.default_view_kind()),
            range: range.unwrap_or_else(|| info.whole_subresource_range()),
        };
        let view = self.create_view(image, &desc)?;
        let dst_set = self.get_or_create_set(set)?;

        self.device.update_descriptor_set(&DescriptorWrite {
            set: dst_set,
            binding: slot,
            resource: DescriptorResource::StorageImage {
                view,
                layout: ImageLayout::General,
            },
        });
        Ok(())
    }

    /// Bind `image` with `sampler` as a combined image sampler at `(set, slot)`
    ///
    /// Defaults: array view of the image's dimensionality, top mip level,
    /// every layer. The image must be in SHADER_READ_ONLY_OPTIMAL when used.
    ///
    /// # Panics
    ///
    /// If the helper is committed or `(set, slot)` is not a combined image sampler slot.
    pub fn set_combined_image_sampler(
        &mut self,
        set: u32,
        slot: u32,
        image: &D::Image,
        sampler: D::Sampler,
        range: Option<SubresourceRange>,
        view_kind: Option<ImageViewKind>,
    ) -> Result<()> {
        self.check_slot(set, slot, DescriptorKind::CombinedImageSampler);

        let info = image.info();
        let desc = ImageViewDesc {
            view_kind: view_kind.unwrap_or_else(|| info.kind.default_array_view_kind()),
            range: range.unwrap_or_else(|| info.sampled_subresource_range()),
        };
        let view = self.create_view(image, &desc)?;
        let dst_set = self.get_or_create_set(set)?;

        self.device.update_descriptor_set(&DescriptorWrite {
            set: dst_set,
            binding: slot,
            resource: DescriptorResource::CombinedImageSampler {
                view,
                sampler,
                layout: ImageLayout::ShaderReadOnlyOptimal,
            },
        });
        Ok(())
    }

    /// Bind `range` bytes of `buffer` starting at `offset` as a uniform buffer
    ///
    /// # Panics
    ///
    /// If the helper is committed or `(set, slot)` is not a uniform buffer slot.
    pub fn set_uniform_buffer(
        &mut self,
        set: u32,
        slot: u32,
        buffer: &D::Buffer,
        offset: u64,
        range: u64,
    ) -> Result<()> {
        self.check_slot(set, slot, DescriptorKind::UniformBuffer);
        let dst_set = self.get_or_create_set(set)?;

        self.device.update_descriptor_set(&DescriptorWrite {
            set: dst_set,
            binding: slot,
            resource: DescriptorResource::UniformBuffer { buffer, offset, range },
        });
        Ok(())
    }

    /// Bind `range` bytes of `buffer` starting at `offset` as a storage buffer
    ///
    /// # Panics
    ///
    /// If the helper is committed or `(set, slot)` is not a storage buffer slot.
    pub fn set_storage_buffer(
        &mut self,
        set: u32,
        slot: u32,
        buffer: &D::Buffer,
        offset: u64,
        range: u64,
    ) -> Result<()> {
        self.check_slot(set, slot, DescriptorKind::StorageBuffer);
        let dst_set = self.get_or_create_set(set)?;

        self.device.update_descriptor_set(&DescriptorWrite {
            set: dst_set,
            binding: slot,
            resource: DescriptorResource::StorageBuffer { buffer, offset, range },
        });
        Ok(())
    }

    // ===== COMMIT =====

    /// Record one bind per allocated set into `stream` and latch the helper
    ///
    /// Sets no setter targeted are skipped.
    ///
    /// # Panics
    ///
    /// If called a second time.
    pub fn commit(&mut self, stream: &mut D::CommandStream) {
        assert!(!self.committed, "DescriptorBindHelper::commit called twice");
        self.record_binds(stream);
        self.committed = true;
    }

    /// Record the same binds as `commit` into another stream
    ///
    /// Does not latch and may be called any number of times, before or after `commit`.
    pub fn commit_frame(&self, stream: &mut D::CommandStream) {
        self.record_binds(stream);
    }

    fn record_binds(&self, stream: &mut D::CommandStream) {
        let mut bound = 0;
        for (index, set) in self.sets.iter().enumerate() {
            if let Some(set) = set {
                self.device.cmd_bind_descriptor_set(
                    stream,
                    self.bind_point,
                    self.layout.pipeline_layout,
                    index as u32,
                    *set,
                );
                bound += 1;
            }
        }
        imr_trace!(LOG_SOURCE, "Recorded {} of {} descriptor sets", bound, self.sets.len());
    }

    // ===== INTROSPECTION =====

    /// Number of sets in the reflected layout
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn bind_point(&self) -> BindPoint {
        self.bind_point
    }

    pub fn pool(&self) -> D::DescriptorPool {
        self.pool
    }

    /// Set allocated for `set`, if any setter has targeted it
    pub fn allocated_set(&self, set: u32) -> Option<D::DescriptorSet> {
        self.sets.get(set as usize).copied().flatten()
    }

    pub fn allocated_set_count(&self) -> usize {
        self.sets.iter().filter(|s| s.is_some()).count()
    }

    /// Image views that will be destroyed when the helper is dropped
    pub fn pending_view_count(&self) -> usize {
        self.views.len()
    }

    // ===== INTERNALS =====

    /// Panics unless the helper is open and `(set, slot)` is declared as `kind`
    fn check_slot(&self, set: u32, slot: u32, kind: DescriptorKind) {
        assert!(!self.committed, "DescriptorBindHelper: setter called after commit");
        assert!(
            (set as usize) < self.sets.len(),
            "DescriptorBindHelper: set {} out of range ({} sets)",
            set,
            self.sets.len()
        );
        let declared = match self.reflected.binding(set, slot) {
            Some(binding) => binding,
            None => panic!("DescriptorBindHelper: set {} has no binding {}", set, slot),
        };
        assert_eq!(
            declared.kind, kind,
            "DescriptorBindHelper: binding {} in set {} is {:?}, not {:?}",
            slot, set, declared.kind, kind
        );
        // The pool holds no descriptors for an empty binding
        assert!(
            declared.count > 0,
            "DescriptorBindHelper: binding {} in set {} declares no descriptors",
            slot, set
        );
    }

    /// Allocate the set on first use, otherwise return the existing one
    fn get_or_create_set(&mut self, set: u32) -> Result<D::DescriptorSet> {
        let index = set as usize;
        assert!(index < self.sets.len(), "DescriptorBindHelper: set {} out of range", set);

        if let Some(existing) = self.sets[index] {
            return Ok(existing);
        }

        let allocated = self
            .device
            .allocate_descriptor_set(self.pool, self.layout.set_layouts[index])
            .map_err(|e| {
                imr_error!(LOG_SOURCE, "Failed to allocate descriptor set {}: {}", set, e);
                match e {
                    Error::SetAllocationFailed(_) => e,
                    other => Error::SetAllocationFailed(other.to_string()),
                }
            })?;

        imr_trace!(LOG_SOURCE, "Allocated descriptor set {}: {:?}", set, allocated);
        self.sets[index] = Some(allocated);
        Ok(allocated)
    }

    /// Create a view and queue it for destruction
    fn create_view(&mut self, image: &D::Image, desc: &ImageViewDesc) -> Result<D::ImageView> {
        let view = self.device.create_image_view(image, desc).map_err(|e| {
            imr_error!(LOG_SOURCE, "Failed to create {:?} image view: {}", desc.view_kind, e);
            match e {
                Error::ViewCreationFailed(_) => e,
                other => Error::ViewCreationFailed(other.to_string()),
            }
        })?;
        self.views.push(view);
        Ok(view)
    }
}

impl<D: BindingDevice> Drop for DescriptorBindHelper<'_, D> {
    fn drop(&mut self) {
        // Sets are freed with the pool
        self.device.destroy_descriptor_pool(self.pool);

        let view_count = self.views.len();
        for view in self.views.drain(..) {
            self.device.destroy_image_view(view);
        }

        imr_debug!(LOG_SOURCE,
            "Released descriptor pool and {} image views", view_count);
    }
}

#[cfg(test)]
#[path = "bind_helper_tests.rs"]
mod tests;
