//! Variable-tail record loading.
//!
//! Line shape: `K` leading tokens, one count token at `control_index`, then
//! groups of `M` tokens, `M` being the field count of the nested tail record.
//!
//! ```text
//! lead_0 | ... | lead_K-1 | count | g0_f0 | ... | g0_fM-1 | g1_f0 | ...
//! ```
//!
//! The number of groups is derived from the token count,
//! `(tokens - control_index - 1) / M`, truncating. The count token is only
//! compared against it and a disagreement is logged.

use std::path::Path;

use log::{debug, info, trace, warn};

use crate::refdat::convert::parse_signed;
use crate::refdat::loader::{collect_records, field_value, store_field, RefLoader};
use crate::refdat::scan::{Line, LineScanner};
use crate::refdat::types::error::{LoadError, RefdatError, Result};
use crate::refdat::types::models::{FieldDescriptor, FieldKind, FieldValue, IntWidth, Record};
use crate::refdat::utils::split_line_spans;

const COUNT_KIND: FieldKind = FieldKind::Signed(IntWidth::W64);

/// Where the parts of a variable-tail record live in `Record::FIELDS`.
#[derive(Debug, Clone, Copy)]
struct TailLayout {
    control_index: usize,
    /// Field receiving the converted count token, if the record keeps it.
    count_field: Option<usize>,
    tail_field: usize,
    nested: &'static [FieldDescriptor],
}

impl TailLayout {
    fn of<T: Record>(control_index: usize) -> Result<Self> {
        let fields = T::FIELDS;
        let (tail_field, nested) = match fields.last() {
            Some(FieldDescriptor {
                kind: FieldKind::Sequence(nested),
                ..
            }) => (fields.len() - 1, *nested),
            _ => {
                return Err(RefdatError::ArgumentShape(
                    "the last field of a variable-tail record must be a sequence of a nested record"
                        .to_string(),
                ))
            }
        };

        let count_field = if tail_field == control_index {
            None
        } else if tail_field == control_index + 1 {
            Some(control_index)
        } else {
            return Err(RefdatError::ArgumentShape(format!(
                "control field index {} does not fit a record with {} fields before its tail",
                control_index, tail_field
            )));
        };

        if let Some(field) = fields[..tail_field].iter().find(|f| !f.kind.is_scalar()) {
            return Err(RefdatError::ArgumentShape(format!(
                "leading field '{}' is a {}, only the tail may be a sequence",
                field.name, field.kind
            )));
        }
        if nested.is_empty() {
            return Err(RefdatError::ArgumentShape(
                "the nested tail record declares no fields".to_string(),
            ));
        }
        if let Some(field) = nested.iter().find(|f| !f.kind.is_scalar()) {
            return Err(RefdatError::ArgumentShape(format!(
                "nested tail field '{}' is a {}, tail records may only hold scalar fields",
                field.name, field.kind
            )));
        }

        debug!(
            "Variable-tail layout: {} leading fields, count stored: {}, {} fields per tail group",
            control_index,
            count_field.is_some(),
            nested.len()
        );
        Ok(Self {
            control_index,
            count_field,
            tail_field,
            nested,
        })
    }
}

impl RefLoader {
    /// Load variable-tail records from `path` into `out`.
    ///
    /// Fields `0..control_index` of `T` are the leading fields. The last
    /// field of `T` must be a `Vec` of a nested record and sits either at
    /// `control_index` or, when `T` also stores the count token, at
    /// `control_index + 1`.
    ///
    /// Result and side effects are those of [`RefLoader::load`].
    ///
    /// # Errors
    /// - `ArgumentShape` if the separator is empty or `T` does not match the
    ///   layout above (checked before the file is opened)
    /// - `Io` if the file can not be opened or read
    /// - `MissingControlField` if a line ends before `control_index`
    /// - `Conversion` if any leading, count or tail token does not convert
    pub fn load_var_tail<T: Record>(
        &self,
        path: impl AsRef<Path>,
        control_index: usize,
        out: &mut Vec<T>,
    ) -> std::result::Result<usize, LoadError> {
        let layout = self
            .check_separator()
            .and_then(|_| TailLayout::of::<T>(control_index))
            .map_err(|e| LoadError::new(0, e))?;

        let path = path.as_ref();
        let scanner = LineScanner::open(path, self.encoding).map_err(|e| LoadError::new(0, e))?;

        let loaded =
            collect_records(scanner, out, |line| self.parse_var_tail::<T>(line, &layout))?;

        info!("Loaded {} variable-tail records from {}", loaded, path.display());
        Ok(loaded)
    }

    fn parse_var_tail<T: Record>(&self, line: &Line, layout: &TailLayout) -> Result<T> {
        trace!("Parsing line {}: {}", line.number, line.text);
        let tokens = split_line_spans(&line.text, &self.separator);
        let control_index = layout.control_index;
        if tokens.len() <= control_index {
            return Err(RefdatError::MissingControlField {
                line: line.number,
                actual: tokens.len(),
                control_index,
            });
        }

        let mut record = T::default();
        for (index, field) in T::FIELDS[..control_index].iter().enumerate() {
            store_field(&mut record, index, line, tokens[index], field.kind)?;
        }

        let count_token = tokens[control_index];
        let declared =
            parse_signed(count_token.1, COUNT_KIND).map_err(|source| RefdatError::Conversion {
                line: line.number,
                source,
            })?;
        if let Some(index) = layout.count_field {
            store_field(&mut record, index, line, count_token, T::FIELDS[index].kind)?;
        }

        let tail_tokens = &tokens[control_index + 1..];
        let width = layout.nested.len();
        let groups = tail_tokens.len() / width;
        if declared != groups as i64 {
            warn!(
                "[line:{}] count field says {} tail groups, line holds {}",
                line.number, declared, groups
            );
        }
        let leftover = tail_tokens.len() % width;
        if leftover != 0 {
            debug!(
                "[line:{}] ignoring {} trailing tokens that do not fill a {}-field group",
                line.number, leftover, width
            );
        }

        tail_tokens
            .chunks_exact(width)
            .map(|group| {
                group
                    .iter()
                    .zip(layout.nested)
                    .map(|(&(offset, token), field)| {
                        field_value(line, offset, token, field.kind)
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .and_then(|groups| record.set_field(layout.tail_field, FieldValue::Sequence(groups)))
            .map_err(|source| RefdatError::Conversion {
                line: line.number,
                source,
            })?;

        Ok(record)
    }
}

/// Load variable-tail records from `path` using UTF-8 text and `separator`.
///
/// Shorthand for `RefLoader::new(separator).load_var_tail(path, control_index, out)`.
pub fn load_var_tail<T: Record>(
    path: impl AsRef<Path>,
    separator: &str,
    control_index: usize,
    out: &mut Vec<T>,
) -> std::result::Result<usize, LoadError> {
    RefLoader::new(separator).load_var_tail(path, control_index, out)
}
