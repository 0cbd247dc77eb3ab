//! Core reference data loading module
//!
//! # Module Organization
//!
//! - [`types`]: record descriptors, field type mapping and error types
//! - [`convert`]: the token to field value converter
//! - [`scan`]: line counting, blank-line policy and decoding
//! - `fixed` / `var_tail`: the two record loaders, as methods on [`RefLoader`]
//!
//! # Flow
//!
//! ```text
//! file ─► LineScanner ─► split_line ─► convert (per field) ─► Record::set_field ─► Vec<T>
//! ```

pub mod convert;
mod fixed;
mod loader;
pub mod record;
pub mod scan;
pub mod types;
pub mod utils;
mod var_tail;

pub use fixed::load;
pub use loader::{RefLoader, DEFAULT_SEPARATOR};
pub use types::error::{ConvertError, LoadError, RefdatError, Result};
pub use var_tail::load_var_tail;
