//! Text token to typed field value conversion.
//!
//! Integers are parsed at 64-bit width and then narrowed with `as`, so an
//! out-of-range value for a narrow field truncates silently instead of
//! failing.

use crate::refdat::types::error::ConvertError;
use crate::refdat::types::models::{FieldKind, FieldValue, IntWidth};

/// Converts one (already trimmed) token into a value of `kind`.
///
/// - Integer kinds: an empty token is `0`, anything else is base-10.
/// - `Byte`: an empty token is NUL, otherwise only the first byte is kept.
/// - `Text`: the token verbatim.
/// - `Float` and `Sequence`: always an error.
pub fn convert(token: &str, kind: FieldKind) -> Result<FieldValue, ConvertError> {
    match kind {
        FieldKind::Signed(width) => {
            let v = parse_signed(token, kind)?;
            Ok(match width {
                IntWidth::W8 => FieldValue::I8(v as i8),
                IntWidth::W16 => FieldValue::I16(v as i16),
                IntWidth::W32 => FieldValue::I32(v as i32),
                IntWidth::W64 => FieldValue::I64(v),
                IntWidth::Size => FieldValue::Isize(v as isize),
            })
        }
        FieldKind::Unsigned(width) => {
            let v = parse_unsigned(token, kind)?;
            Ok(match width {
                IntWidth::W8 => FieldValue::U8(v as u8),
                IntWidth::W16 => FieldValue::U16(v as u16),
                IntWidth::W32 => FieldValue::U32(v as u32),
                IntWidth::W64 => FieldValue::U64(v),
                IntWidth::Size => FieldValue::Usize(v as usize),
            })
        }
        FieldKind::Byte => Ok(FieldValue::Byte(
            token.as_bytes().first().copied().unwrap_or(0),
        )),
        FieldKind::Text => Ok(FieldValue::Text(token.to_owned())),
        FieldKind::Float | FieldKind::Sequence(_) => Err(ConvertError::Unsupported {
            token: token.to_owned(),
            kind,
        }),
    }
}

pub(crate) fn parse_signed(token: &str, kind: FieldKind) -> Result<i64, ConvertError> {
    if token.is_empty() {
        return Ok(0);
    }
    token.parse::<i64>().map_err(|source| ConvertError::Parse {
        token: token.to_owned(),
        kind,
        source,
    })
}

fn parse_unsigned(token: &str, kind: FieldKind) -> Result<u64, ConvertError> {
    if token.is_empty() {
        return Ok(0);
    }
    token.parse::<u64>().map_err(|source| ConvertError::Parse {
        token: token.to_owned(),
        kind,
        source,
    })
}
