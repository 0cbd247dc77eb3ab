//! Loader options shared by the fixed and variable-tail loaders.

use std::io::{BufRead, Seek};

use encoding_rs::Encoding;

use crate::refdat::convert::convert;
use crate::refdat::scan::{Line, LineScanner};
use crate::refdat::types::error::{ConvertError, LoadError, RefdatError, Result};
use crate::refdat::types::models::{FieldKind, FieldValue, Record};
use crate::refdat::utils::parse_encoding;

/// Default field separator of reference files.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Loads reference files with a given separator and text encoding.
///
/// ```no_run
/// use refdat_loader::{record, RefLoader};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Security {
///         pub code: String,
///         pub lot_size: u32,
///     }
/// }
///
/// let mut securities: Vec<Security> = Vec::new();
/// let loaded = RefLoader::new("|")
///     .with_encoding("GBK")
///     .load("securities.txt", &mut securities)?;
/// assert_eq!(loaded, securities.len());
/// # Ok::<(), refdat_loader::LoadError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RefLoader {
    pub(crate) separator: String,
    pub(crate) encoding: &'static Encoding,
}

impl RefLoader {
    /// A UTF-8 loader splitting lines on `separator`.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Decode lines with the encoding named by `label` (e.g. `"GBK"`).
    pub fn with_encoding(self, label: &str) -> Self {
        self.with_text_encoding(parse_encoding(label))
    }

    /// Decode lines with `encoding`. It must be ASCII-compatible, which is
    /// checked when a load starts.
    pub fn with_text_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub(crate) fn check_separator(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(RefdatError::ArgumentShape(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RefLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

/// Parse every line of `scanner` into `out`, stopping at the first error.
///
/// `out` is cleared first. A failure reports how many records were
/// assembled before it.
pub(crate) fn collect_records<T, R, F>(
    scanner: LineScanner<R>,
    out: &mut Vec<T>,
    mut parse: F,
) -> std::result::Result<usize, LoadError>
where
    R: BufRead + Seek,
    F: FnMut(&Line) -> Result<T>,
{
    out.clear();
    out.reserve(scanner.total_lines());

    for line in scanner {
        let line = line.map_err(|e| LoadError::new(out.len(), e))?;
        let record = parse(&line).map_err(|e| LoadError::new(out.len(), e))?;
        out.push(record);
    }
    Ok(out.len())
}

/// Convert the token at byte `offset` of `line` and store it in field
/// `index` of `record`.
pub(crate) fn store_field<T: Record>(
    record: &mut T,
    index: usize,
    line: &Line,
    (offset, token): (usize, &str),
    kind: FieldKind,
) -> Result<()> {
    field_value(line, offset, token, kind)
        .and_then(|value| record.set_field(index, value))
        .map_err(|source| RefdatError::Conversion {
            line: line.number,
            source,
        })
}

/// Convert one token of `line`. A byte field takes the file's own first
/// byte of the token, not the first byte of its decoded text.
pub(crate) fn field_value(
    line: &Line,
    offset: usize,
    token: &str,
    kind: FieldKind,
) -> std::result::Result<FieldValue, ConvertError> {
    match kind {
        FieldKind::Byte if !token.is_empty() => match line.raw_byte(offset) {
            Some(byte) => Ok(FieldValue::Byte(byte)),
            None => convert(token, kind),
        },
        _ => convert(token, kind),
    }
}
