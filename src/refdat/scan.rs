//! Line scanning for reference files.
//!
//! The scanner makes two passes over the input: one to count newline bytes,
//! which sizes the output collection and drives the blank-line policy, and
//! one to yield decoded, trimmed lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use encoding_rs::{DecoderResult, Encoding};
use log::{debug, info, trace, warn};

use crate::refdat::types::error::{RefdatError, Result};

const READ_CHUNK: usize = 32 * 1024;

/// One retained line of a reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line number in the file.
    pub number: usize,
    /// Decoded line content with surrounding whitespace removed.
    pub text: String,
    raw: Vec<u8>,
    origins: Origins,
}

/// Where each byte of `Line::text` came from in `Line::raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origins {
    /// `text` is `raw[lead..]` byte for byte.
    Verbatim { lead: usize },
    /// Raw offset of the character each text byte belongs to.
    Mapped(Vec<usize>),
}

impl Line {
    /// The file's byte at the start of the character found at byte
    /// `offset` of `text`, before any decoding.
    pub fn raw_byte(&self, offset: usize) -> Option<u8> {
        let index = match &self.origins {
            Origins::Verbatim { lead } => lead + offset,
            Origins::Mapped(origins) => *origins.get(offset)?,
        };
        self.raw.get(index).copied()
    }
}

/// Iterator over the lines of a reference file that a loader should consume.
///
/// A blank line is skipped only while `retained + 1 < total_lines`. Because
/// `total_lines` counts newline bytes, a blank last line is yielded and must
/// pass normal validation, unless earlier blanks were skipped.
#[derive(Debug)]
pub struct LineScanner<R> {
    reader: R,
    encoding: &'static Encoding,
    total_lines: usize,
    retained: usize,
    line_number: usize,
    buf: Vec<u8>,
}

impl LineScanner<BufReader<File>> {
    /// Open `path` and count its lines.
    pub fn open(path: impl AsRef<Path>, encoding: &'static Encoding) -> Result<Self> {
        check_encoding(encoding)?;
        let path = path.as_ref();
        info!("Opening reference file: {}", path.display());
        let file = File::open(path)?;
        Self::new(BufReader::with_capacity(READ_CHUNK, file), encoding)
    }
}

impl<R: BufRead + Seek> LineScanner<R> {
    /// Count the lines of `reader`, then rewind it for scanning.
    pub fn new(mut reader: R, encoding: &'static Encoding) -> Result<Self> {
        check_encoding(encoding)?;
        let total_lines = count_lines(&mut reader)?;
        reader.seek(SeekFrom::Start(0))?;
        debug!("Counted {} lines ({})", total_lines, encoding.name());

        Ok(Self {
            reader,
            encoding,
            total_lines,
            retained: 0,
            line_number: 0,
            buf: Vec::new(),
        })
    }

    /// Number of newline bytes in the input. A final line without a
    /// trailing newline is not included.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    fn read_line(&mut self) -> io::Result<Option<Line>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let mut raw = std::mem::take(&mut self.buf);
        if self.line_number == 1 {
            if let Some((bom_encoding, bom_len)) = Encoding::for_bom(&raw) {
                if bom_encoding == self.encoding {
                    raw.drain(..bom_len);
                }
            }
        }

        let verbatim = if raw.is_ascii() || self.encoding == encoding_rs::UTF_8 {
            std::str::from_utf8(&raw).ok().map(str::to_owned)
        } else {
            None
        };
        let (decoded, origins) = match verbatim {
            Some(decoded) => (decoded, None),
            None => {
                let (decoded, origins, had_errors) = decode_mapped(self.encoding, &raw);
                if had_errors {
                    warn!(
                        "Line {} is not valid {}, malformed bytes replaced",
                        self.line_number,
                        self.encoding.name()
                    );
                }
                (decoded, Some(origins))
            }
        };

        let lead = decoded.len() - decoded.trim_start().len();
        let end = decoded.trim_end().len().max(lead);
        let origins = match origins {
            Some(origins) => Origins::Mapped(origins[lead..end].to_vec()),
            None => Origins::Verbatim { lead },
        };
        let line = Line {
            number: self.line_number,
            text: decoded[lead..end].to_owned(),
            raw,
            origins,
        };
        Ok(Some(line))
    }
}

/// Decode `raw` one byte at a time, recording for each byte of the result
/// the offset in `raw` where its character starts. Malformed sequences
/// become U+FFFD pointing at their first byte.
fn decode_mapped(encoding: &'static Encoding, raw: &[u8]) -> (String, Vec<usize>, bool) {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut text = String::with_capacity(raw.len() * 3);
    let mut origins = Vec::with_capacity(raw.len() * 3);
    let mut had_errors = false;
    // `start` is the first byte of the character still pending in the decoder.
    let (mut pos, mut start) = (0, 0);

    while pos < raw.len() {
        let last = pos + 1 == raw.len();
        text.reserve(16);
        let written_from = text.len();
        let (result, read) =
            decoder.decode_to_string_without_replacement(&raw[pos..pos + 1], &mut text, last);
        pos += read;
        if text.len() > written_from {
            origins.resize(text.len(), start);
            start = pos;
        }
        if let DecoderResult::Malformed(_, consumed_after) = result {
            had_errors = true;
            text.push(char::REPLACEMENT_CHARACTER);
            origins.resize(text.len(), start);
            start = pos.saturating_sub(usize::from(consumed_after));
        }
    }
    (text, origins, had_errors)
}

impl<R: BufRead + Seek> Iterator for LineScanner<R> {
    type Item = io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            };

            if line.text.is_empty() && self.retained + 1 < self.total_lines {
                trace!("Skipping blank line {}", line.number);
                continue;
            }

            self.retained += 1;
            return Some(Ok(line));
        }
    }
}

fn check_encoding(encoding: &'static Encoding) -> Result<()> {
    if encoding.is_ascii_compatible() {
        Ok(())
    } else {
        Err(RefdatError::UnsupportedEncoding(format!(
            "{} is not ASCII-compatible, lines can not be split on newline bytes",
            encoding.name()
        )))
    }
}

/// Count newline bytes from the current position to the end of `reader`.
pub fn count_lines<R: BufRead>(reader: &mut R) -> io::Result<usize> {
    let mut count = 0;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            return Ok(count);
        }
        count += chunk.iter().filter(|&&b| b == b'\n').count();
        let len = chunk.len();
        reader.consume(len);
    }
}
