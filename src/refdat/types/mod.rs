//! Record descriptors, field type mapping, and error types.

pub mod error;
pub mod field_type;
pub mod models;
