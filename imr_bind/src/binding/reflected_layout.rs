/// Reflected binding layout: per-set, per-slot descriptor kind and count
///
/// This is the shape the shader declares. The bind helper sizes its
/// descriptor pool from it and checks every setter call against it.

use rustc_hash::FxHashMap;
use bitflags::bitflags;
use crate::error::{Error, Result};

// ============================================================================
// Descriptor kinds and stage visibility
// ============================================================================

/// Resource category a descriptor slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKind {
    Sampler,
    /// Texture + sampler in one binding
    CombinedImageSampler,
    SampledImage,
    /// Read/write image (imageLoad / imageStore)
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    /// Read-only structured data
    UniformBuffer,
    /// Read/write structured data
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
    InputAttachment,
}

bitflags! {
    /// Shader stages that access a binding
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX = 0x01;
        const FRAGMENT = 0x02;
        const COMPUTE = 0x04;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

// ============================================================================
// Reflected bindings
// ============================================================================

/// A single reflected binding slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedBinding {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Resource category
    pub kind: DescriptorKind,
    /// Number of descriptors (>1 for arrays)
    pub count: u32,
    /// Stages that access this binding
    pub stages: ShaderStages,
}

impl ReflectedBinding {
    pub fn new(binding: u32, kind: DescriptorKind, count: u32, stages: ShaderStages) -> Self {
        Self { binding, kind, count, stages }
    }
}

/// Capacity for one descriptor kind in a descriptor pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorPoolSize {
    pub kind: DescriptorKind,
    pub count: u32,
}

/// Reflected layout of a whole pipeline
///
/// Set indices are contiguous from 0 (index into `sets()`); binding numbers
/// are unique within a set. A set may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectedLayout {
    sets: Vec<Vec<ReflectedBinding>>,
}

impl ReflectedLayout {
    /// Build a layout from per-set binding lists
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if a binding number appears twice in one set.
    pub fn new(sets: Vec<Vec<ReflectedBinding>>) -> Result<Self> {
        for (set_index, bindings) in sets.iter().enumerate() {
            for (i, binding) in bindings.iter().enumerate() {
                if bindings[..i].iter().any(|b| b.binding == binding.binding) {
                    return Err(Error::InvalidResource(format!(
                        "duplicate binding {} in set {}",
                        binding.binding, set_index
                    )));
                }
            }
        }
        Ok(Self { sets })
    }

    /// Number of descriptor sets
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn sets(&self) -> &[Vec<ReflectedBinding>] {
        &self.sets
    }

    /// Bindings of one set (empty if the set does not exist)
    pub fn set_bindings(&self, set: u32) -> &[ReflectedBinding] {
        self.sets.get(set as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up the binding declared at `(set, slot)`
    pub fn binding(&self, set: u32, slot: u32) -> Option<&ReflectedBinding> {
        self.set_bindings(set).iter().find(|b| b.binding == slot)
    }

    /// Aggregate descriptor count per kind across every set and binding
    ///
    /// Kinds with a zero total are omitted. The result is sorted by kind so
    /// identical layouts always produce identical pool descriptions.
    pub fn descriptor_counts(&self) -> Vec<DescriptorPoolSize> {
        let mut counts: FxHashMap<DescriptorKind, u32> = FxHashMap::default();
        for binding in self.sets.iter().flatten() {
            *counts.entry(binding.kind).or_insert(0) += binding.count;
        }

        let mut sizes: Vec<DescriptorPoolSize> = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(kind, count)| DescriptorPoolSize { kind, count })
            .collect();
        sizes.sort_by_key(|size| size.kind);
        sizes
    }

    /// Merge another stage's layout into this one
    ///
    /// Used to build the final layout of a graphics pipeline from its
    /// vertex and fragment reflections. A slot present in both must have the
    /// same kind; counts take the maximum and stage flags are combined.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` on a kind conflict. `self` is left
    /// unchanged in that case.
    pub fn merge(&mut self, other: &ReflectedLayout) -> Result<()> {
        let mut merged = self.sets.clone();
        if merged.len() < other.sets.len() {
            merged.resize(other.sets.len(), Vec::new());
        }

        for (set_index, bindings) in other.sets.iter().enumerate() {
            let target = &mut merged[set_index];
            for incoming in bindings {
                if let Some(existing) = target.iter_mut().find(|b| b.binding == incoming.binding) {
                    if existing.kind != incoming.kind {
                        return Err(Error::InvalidResource(format!(
                            "binding {} in set {} is {:?} in one stage and {:?} in another",
                            incoming.binding, set_index, existing.kind, incoming.kind
                        )));
                    }
                    existing.count = existing.count.max(incoming.count);
                    existing.stages |= incoming.stages;
                } else {
                    target.push(incoming.clone());
                }
            }
            target.sort_by_key(|b| b.binding);
        }

        self.sets = merged;
        Ok(())
    }

    /// Merge a sequence of per-stage layouts into one
    pub fn merged<'a>(stages: impl IntoIterator<Item = &'a ReflectedLayout>) -> Result<Self> {
        let mut layout = ReflectedLayout::default();
        for stage in stages {
            layout.merge(stage)?;
        }
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "reflected_layout_tests.rs"]
mod tests;
