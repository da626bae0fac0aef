//! Validation functionality
//!
//! Provides validation logic for:
//! - Relationship validation (empty names, self references, circular dependencies)

pub mod relationships;

pub use relationships::{RelationshipValidationResult, RelationshipValidator};
