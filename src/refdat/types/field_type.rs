//! Mapping between Rust field types and their semantic [`FieldKind`].

use super::error::ConvertError;
use super::models::{FieldKind, FieldValue, IntWidth, Record};

/// A Rust type that can appear as a field of a [`Record`].
///
/// `KIND` is what the converter targets, `from_value` unwraps the converter's
/// output back into the Rust type.
pub trait FieldType: Sized {
    const KIND: FieldKind;

    fn from_value(value: FieldValue) -> Result<Self, ConvertError>;
}

fn mismatch<T>(expected: FieldKind, value: &FieldValue) -> Result<T, ConvertError> {
    Err(ConvertError::ValueMismatch {
        expected,
        found: value.kind_name(),
    })
}

macro_rules! int_field_type {
    ($($ty:ty => $kind:expr, $variant:ident;)*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = $kind;

                fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
                    match value {
                        FieldValue::$variant(v) => Ok(v),
                        other => mismatch(Self::KIND, &other),
                    }
                }
            }
        )*
    };
}

int_field_type! {
    i8 => FieldKind::Signed(IntWidth::W8), I8;
    i16 => FieldKind::Signed(IntWidth::W16), I16;
    i32 => FieldKind::Signed(IntWidth::W32), I32;
    i64 => FieldKind::Signed(IntWidth::W64), I64;
    isize => FieldKind::Signed(IntWidth::Size), Isize;
    u8 => FieldKind::Unsigned(IntWidth::W8), U8;
    u16 => FieldKind::Unsigned(IntWidth::W16), U16;
    u32 => FieldKind::Unsigned(IntWidth::W32), U32;
    u64 => FieldKind::Unsigned(IntWidth::W64), U64;
    usize => FieldKind::Unsigned(IntWidth::Size), Usize;
}

/// Single-byte character fields. The byte is widened as Latin-1.
impl FieldType for char {
    const KIND: FieldKind = FieldKind::Byte;

    fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Byte(b) => Ok(char::from(b)),
            other => mismatch(Self::KIND, &other),
        }
    }
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => mismatch(Self::KIND, &other),
        }
    }
}

// Floats can be declared so a layout mirrors the file, but the converter
// rejects them before any value reaches `from_value`.
impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
        mismatch(Self::KIND, &value)
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
        mismatch(Self::KIND, &value)
    }
}

/// The tail field of a variable-tail record.
impl<R: Record> FieldType for Vec<R> {
    const KIND: FieldKind = FieldKind::Sequence(R::FIELDS);

    fn from_value(value: FieldValue) -> Result<Self, ConvertError> {
        let groups = match value {
            FieldValue::Sequence(groups) => groups,
            other => return mismatch(Self::KIND, &other),
        };

        groups
            .into_iter()
            .map(|group| -> Result<R, ConvertError> {
                let mut item = R::default();
                for (index, v) in group.into_iter().enumerate() {
                    item.set_field(index, v)?;
                }
                Ok(item)
            })
            .collect()
    }
}
