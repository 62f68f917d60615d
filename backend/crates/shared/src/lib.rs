//! Shared Kernel
//!
//! Vocabulary shared by every backend crate of the storefront:
//! - The unified error type and its HTTP classification
//! - Typed identifiers for the storefront entities
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
