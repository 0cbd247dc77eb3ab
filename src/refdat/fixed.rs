//! Fixed-width record loading: one line, one record, N fields.

use std::path::Path;

use log::{debug, info, trace};

use crate::refdat::loader::{collect_records, store_field, RefLoader};
use crate::refdat::scan::{Line, LineScanner};
use crate::refdat::types::error::{LoadError, RefdatError, Result};
use crate::refdat::types::models::{FieldDescriptor, Record};
use crate::refdat::utils::split_line_spans;

impl RefLoader {
    /// Load every line of `path` into `out`, one `T` per line.
    ///
    /// `out` is cleared once the file is open, then filled in file order.
    /// On success the number of records loaded is returned. On failure the
    /// error carries the count of records assembled before the bad line, and
    /// `out` holds exactly those records.
    ///
    /// # Errors
    /// - `ArgumentShape` if the separator is empty or `T` has a sequence
    ///   field (checked before the file is opened)
    /// - `Io` if the file can not be opened or read
    /// - `FieldCount` if a line does not have exactly `T::FIELDS.len()` tokens
    /// - `Conversion` if a token does not convert into its field
    pub fn load<T: Record>(
        &self,
        path: impl AsRef<Path>,
        out: &mut Vec<T>,
    ) -> std::result::Result<usize, LoadError> {
        self.check_separator()
            .and_then(|_| check_fixed_layout(T::FIELDS))
            .map_err(|e| LoadError::new(0, e))?;

        let path = path.as_ref();
        let scanner = LineScanner::open(path, self.encoding).map_err(|e| LoadError::new(0, e))?;

        let loaded = collect_records(scanner, out, |line| self.parse_fixed::<T>(line))?;

        info!("Loaded {} records from {}", loaded, path.display());
        Ok(loaded)
    }

    fn parse_fixed<T: Record>(&self, line: &Line) -> Result<T> {
        trace!("Parsing line {}: {}", line.number, line.text);
        let tokens = split_line_spans(&line.text, &self.separator);
        if tokens.len() != T::FIELDS.len() {
            return Err(RefdatError::FieldCount {
                line: line.number,
                actual: tokens.len(),
                expected: T::FIELDS.len(),
            });
        }

        let mut record = T::default();
        for (index, (&span, field)) in tokens.iter().zip(T::FIELDS).enumerate() {
            store_field(&mut record, index, line, span, field.kind)?;
        }
        Ok(record)
    }
}

/// Load fixed records from `path` using UTF-8 text and `separator`.
///
/// Shorthand for `RefLoader::new(separator).load(path, out)`.
pub fn load<T: Record>(
    path: impl AsRef<Path>,
    separator: &str,
    out: &mut Vec<T>,
) -> std::result::Result<usize, LoadError> {
    RefLoader::new(separator).load(path, out)
}

fn check_fixed_layout(fields: &[FieldDescriptor]) -> Result<()> {
    if let Some(field) = fields.iter().find(|f| !f.kind.is_scalar()) {
        return Err(RefdatError::ArgumentShape(format!(
            "field '{}' is a {}, fixed records may only hold scalar fields",
            field.name, field.kind
        )));
    }
    debug!("Fixed layout: {} fields", fields.len());
    Ok(())
}
