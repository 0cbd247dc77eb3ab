//! Custom error types for the refdat-loader crate.

use std::num::ParseIntError;

use thiserror::Error;

use super::models::FieldKind;

/// An error produced while turning a single token into a field value.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The token is not a base-10 integer in the 64-bit parse range.
    #[error("{token:?} can not convert to type {kind}: {source}")]
    Parse {
        token: String,
        kind: FieldKind,
        #[source]
        source: ParseIntError,
    },

    /// The target field kind has no conversion from text.
    #[error("{token:?} can not convert to unsupported type {kind}")]
    Unsupported { token: String, kind: FieldKind },

    /// A converted value was routed to a field of a different kind.
    #[error("value of kind {found} can not be stored in a field of type {expected}")]
    ValueMismatch {
        expected: FieldKind,
        found: &'static str,
    },

    /// A record was asked to store a value at an index it does not have.
    #[error("record has no field at index {index} ({field_count} fields declared)")]
    NoSuchField { index: usize, field_count: usize },
}

/// The primary error type for all loader operations.
#[derive(Debug, Error)]
pub enum RefdatError {
    /// The destination record type or the call arguments do not have the
    /// shape the loader requires. Reported before any file I/O.
    #[error("Invalid destination shape: {0}")]
    ArgumentShape(String),

    /// The requested text encoding cannot be split on newline bytes.
    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fixed-record line did not split into the declared number of fields.
    #[error("[line:{line}] line seg num {actual} != struct field num {expected}")]
    FieldCount {
        line: usize,
        actual: usize,
        expected: usize,
    },

    /// A variable-tail line ended before its control field.
    #[error("[line:{line}] line seg num {actual} has no control field at index {control_index}")]
    MissingControlField {
        line: usize,
        actual: usize,
        control_index: usize,
    },

    /// A token on the line could not be converted into its field.
    #[error("[line:{line}] {source}")]
    Conversion {
        line: usize,
        #[source]
        source: ConvertError,
    },
}

impl RefdatError {
    /// The 1-based line number the error refers to, if it is tied to a line.
    pub fn line(&self) -> Option<usize> {
        match self {
            RefdatError::FieldCount { line, .. }
            | RefdatError::MissingControlField { line, .. }
            | RefdatError::Conversion { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A failed load: the cause plus how many records were assembled before it.
///
/// `loaded` counts the records assembled *before* the failing line, not every
/// good record in the file. The destination `Vec` holds exactly those records.
#[derive(Debug, Error)]
#[error("{kind} ({loaded} records loaded)")]
pub struct LoadError {
    pub loaded: usize,
    #[source]
    pub kind: RefdatError,
}

impl LoadError {
    pub(crate) fn new(loaded: usize, kind: impl Into<RefdatError>) -> Self {
        Self {
            loaded,
            kind: kind.into(),
        }
    }

    /// Shorthand for the 1-based line number of the underlying error.
    pub fn line(&self) -> Option<usize> {
        self.kind.line()
    }
}

/// A convenience `Result` type alias using the crate's `RefdatError` type.
pub type Result<T> = std::result::Result<T, RefdatError>;
