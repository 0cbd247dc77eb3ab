//! # refdat-loader
//!
//! Loads delimited flat-text reference files into `Vec`s of typed records.
//! The record's declared field layout drives how every token is converted.
//!
//! Two line shapes are supported:
//! - fixed records, one line to one struct of N scalar fields ([`load`]);
//! - variable-tail records, leading fields plus a repeated nested record whose
//!   group count is written on the line ([`load_var_tail`]).
//!
//! Record types are declared with the [`record!`] macro.
pub mod refdat;

// Re-export the main types for convenience
pub use refdat::{
    convert::convert,
    load, load_var_tail,
    scan::{Line, LineScanner},
    types::{
        field_type::FieldType,
        models::{FieldDescriptor, FieldKind, FieldValue, IntWidth, Record},
    },
    utils::{parse_encoding, split_line},
    ConvertError, LoadError, RefLoader, RefdatError, Result, DEFAULT_SEPARATOR,
};
