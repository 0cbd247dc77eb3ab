//! Record type descriptors and the values the converter produces.

use std::fmt;

use super::error::ConvertError;

/// Integer width of a signed or unsigned field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Platform pointer width (`isize` / `usize`).
    Size,
}

impl IntWidth {
    fn suffix(&self) -> &'static str {
        match self {
            IntWidth::W8 => "8",
            IntWidth::W16 => "16",
            IntWidth::W32 => "32",
            IntWidth::W64 => "64",
            IntWidth::Size => "size",
        }
    }
}

/// Semantic type of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Signed(IntWidth),
    Unsigned(IntWidth),
    /// One raw byte of the token, NUL when the token is empty.
    Byte,
    Text,
    /// Floating point fields can be declared but never converted.
    Float,
    /// A dynamically-sized list of a nested record. Only valid as the tail
    /// field of a variable-tail record.
    Sequence(&'static [FieldDescriptor]),
}

impl FieldKind {
    /// Whether a single token can map onto this kind.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldKind::Sequence(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Signed(w) => write!(f, "i{}", w.suffix()),
            FieldKind::Unsigned(w) => write!(f, "u{}", w.suffix()),
            FieldKind::Byte => f.write_str("byte"),
            FieldKind::Text => f.write_str("string"),
            FieldKind::Float => f.write_str("float"),
            FieldKind::Sequence(nested) => write!(f, "sequence<{} fields>", nested.len()),
        }
    }
}

/// A named, typed slot in a record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A converted token, tagged with the concrete type it was narrowed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    Byte(u8),
    Text(String),
    /// Tail groups, each holding one value per nested field in order.
    Sequence(Vec<Vec<FieldValue>>),
}

impl FieldValue {
    /// Short variant name used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::I8(_) => "i8",
            FieldValue::I16(_) => "i16",
            FieldValue::I32(_) => "i32",
            FieldValue::I64(_) => "i64",
            FieldValue::Isize(_) => "isize",
            FieldValue::U8(_) => "u8",
            FieldValue::U16(_) => "u16",
            FieldValue::U32(_) => "u32",
            FieldValue::U64(_) => "u64",
            FieldValue::Usize(_) => "usize",
            FieldValue::Byte(_) => "byte",
            FieldValue::Text(_) => "string",
            FieldValue::Sequence(_) => "sequence",
        }
    }
}

/// A record type whose layout is declared once and drives loading.
///
/// `FIELDS` lists the fields in line order. `set_field` stores a converted
/// value into the field at `index`. Implementations are normally generated
/// with the [`record!`](crate::record) macro.
pub trait Record: Default {
    const FIELDS: &'static [FieldDescriptor];

    fn set_field(&mut self, index: usize, value: FieldValue) -> Result<(), ConvertError>;
}
