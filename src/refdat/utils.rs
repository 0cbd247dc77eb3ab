//! Line tokenizing and text encoding helpers

use encoding_rs::Encoding;
use log::warn;

/// Split a trimmed line on `separator`, trimming every segment.
///
/// An empty line yields a single empty token.
pub fn split_line<'a>(line: &'a str, separator: &str) -> Vec<&'a str> {
    split_line_spans(line, separator)
        .into_iter()
        .map(|(_, token)| token)
        .collect()
}

/// Like [`split_line`], also returning the byte offset of each trimmed
/// token within `line`.
pub fn split_line_spans<'a>(line: &'a str, separator: &str) -> Vec<(usize, &'a str)> {
    let mut start = 0;
    line.split(separator)
        .map(|segment| {
            let lead = segment.len() - segment.trim_start().len();
            let offset = start + lead;
            start += segment.len() + separator.len();
            (offset, segment.trim())
        })
        .collect()
}

/// Resolve an encoding label, normalizing GBK/GB2312 to GB18030.
///
/// Unknown labels fall back to UTF-8.
pub fn parse_encoding(label: &str) -> &'static Encoding {
    let label = label.trim();
    let normalized = if label.eq_ignore_ascii_case("GBK") || label.eq_ignore_ascii_case("GB2312") {
        "GB18030"
    } else {
        label
    };
    Encoding::for_label(normalized.as_bytes()).unwrap_or_else(|| {
        warn!("Unknown text encoding '{}', falling back to UTF-8", label);
        encoding_rs::UTF_8
    })
}
