//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API. They are
//! separate from the internal domain models in `src/models/` and handle
//! serialization, deserialization, and domain-model conversion.

pub mod admin;
pub mod history;
pub mod scan;

// Re-export all public types for convenient access via `dto::*`.
pub use admin::*;
pub use history::*;
pub use scan::*;
