//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("vkUpdateDescriptorSets unavailable".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("vkUpdateDescriptorSets unavailable"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("duplicate binding 2 in set 0".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("duplicate binding 2 in set 0"));
}

#[test]
fn test_pool_creation_failed_display() {
    let err = Error::PoolCreationFailed("ERROR_OUT_OF_HOST_MEMORY".to_string());
    let display = format!("{}", err);
    assert_eq!(display, "Descriptor pool creation failed: ERROR_OUT_OF_HOST_MEMORY");
}

#[test]
fn test_set_allocation_failed_display() {
    let err = Error::SetAllocationFailed("ERROR_OUT_OF_POOL_MEMORY".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Descriptor set allocation failed"));
    assert!(display.contains("ERROR_OUT_OF_POOL_MEMORY"));
}

#[test]
fn test_view_creation_failed_display() {
    let err = Error::ViewCreationFailed("format not supported".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Image view creation failed"));
    assert!(display.contains("format not supported"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::BackendError("test".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug1 = format!("{:?}", Error::BackendError("test".to_string()));
    assert!(debug1.contains("BackendError"));

    let debug2 = format!("{:?}", Error::PoolCreationFailed("pool".to_string()));
    assert!(debug2.contains("PoolCreationFailed"));

    let debug3 = format!("{:?}", Error::SetAllocationFailed("set".to_string()));
    assert!(debug3.contains("SetAllocationFailed"));

    let debug4 = format!("{:?}", Error::ViewCreationFailed("view".to_string()));
    assert!(debug4.contains("ViewCreationFailed"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::SetAllocationFailed("exhausted".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE
// ============================================================================

#[test]
fn test_result_propagation() {
    fn fails() -> Result<u32> {
        Err(Error::ViewCreationFailed("bad range".to_string()))
    }

    fn propagates() -> Result<u32> {
        let value = fails()?;
        Ok(value + 1)
    }

    match propagates() {
        Err(Error::ViewCreationFailed(msg)) => assert_eq!(msg, "bad range"),
        other => panic!("unexpected result: {:?}", other),
    }
}
