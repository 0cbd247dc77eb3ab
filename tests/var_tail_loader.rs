use refdat_loader::{load, load_var_tail, record, ConvertError, RefLoader, RefdatError};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct TailStruct {
        f1: u32,
        f2: u64,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct FileLine {
        f1: String,
        f2: String,
        f3: String,
        f4: String,
        tail: Vec<TailStruct>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Level {
        price: u32,
        volume: u64,
    }
}

// Keeps the count token in its own field.
record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Quote {
        code: String,
        name: String,
        declared: u32,
        levels: Vec<Level>,
    }
}

record! {
    #[derive(Debug, Default)]
    struct NoTail {
        a: String,
        b: String,
    }
}

record! {
    #[derive(Debug, Default)]
    struct Nothing {}
}

record! {
    #[derive(Debug, Default)]
    struct EmptyTail {
        a: String,
        tail: Vec<Nothing>,
    }
}

record! {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Side {
        flag: char,
        qty: u32,
    }
}

record! {
    #[derive(Debug, Default)]
    struct Order {
        code: String,
        sides: Vec<Side>,
    }
}

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    for part in parts {
        p.push(part);
    }
    p
}

fn write_temp(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn tail(pairs: &[(u32, u64)]) -> Vec<TailStruct> {
    pairs.iter().map(|&(f1, f2)| TailStruct { f1, f2 }).collect()
}

fn levels(pairs: &[(u32, u64)]) -> Vec<Level> {
    pairs
        .iter()
        .map(|&(price, volume)| Level { price, volume })
        .collect()
}

#[test]
fn groups_trailing_tokens_by_nested_width() {
    let file = write_temp(b"a|b|c|d|3|1|10|2|20|3|30\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let loaded = load_var_tail(file.path(), "|", 4, &mut lines).expect("load var tail");

    assert_eq!(loaded, 1);
    let line = &lines[0];
    assert_eq!(
        (line.f1.as_str(), line.f2.as_str(), line.f3.as_str(), line.f4.as_str()),
        ("a", "b", "c", "d")
    );
    assert_eq!(line.tail, tail(&[(1, 10), (2, 20), (3, 30)]));
}

#[test]
fn uneven_tail_is_truncated_by_integer_division() {
    // 7 trailing tokens with 2 fields per group: 3 groups, the 7th token is dropped.
    let file = write_temp(b"a|b|c|d|3|1|10|2|20|3|30|99\n");
    let mut lines: Vec<FileLine> = Vec::new();
    load_var_tail(file.path(), "|", 4, &mut lines).expect("truncation is not an error");

    assert_eq!(lines[0].tail, tail(&[(1, 10), (2, 20), (3, 30)]));
}

#[test]
fn declared_count_is_only_a_hint() {
    let file = write_temp(b"a|b|c|d|5|1|10\na|b|c|d|0|7|70|8|80\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let loaded =
        load_var_tail(file.path(), "|", 4, &mut lines).expect("hint mismatch is not an error");

    assert_eq!(loaded, 2);
    assert_eq!(lines[0].tail, tail(&[(1, 10)]));
    assert_eq!(lines[1].tail, tail(&[(7, 70), (8, 80)]));
}

#[test]
fn count_field_can_be_kept_in_the_record() {
    let mut quotes: Vec<Quote> = Vec::new();
    let loaded = RefLoader::new("|")
        .load_var_tail(fixture_path(&["tests", "fixtures", "quotes.dat"]), 2, &mut quotes)
        .expect("load quotes");

    assert_eq!(loaded, 3);
    assert_eq!(
        quotes[0],
        Quote {
            code: "600000".to_string(),
            name: "ABC Corp".to_string(),
            declared: 4,
            levels: levels(&[(1, 10), (2, 20), (3, 30), (4, 40)]),
        }
    );
    assert_eq!(quotes[1].declared, 2);
    assert_eq!(quotes[1].levels, levels(&[(5, 50), (6, 60)]));
    assert_eq!(quotes[2].declared, 0);
    assert!(quotes[2].levels.is_empty());
}

#[test]
fn tail_conversion_failure_reports_line_and_prior_records() {
    let file = write_temp(b"a|b|c|d|1|1|10\na|b|c|d|2|2|20|x|30\na|b|c|d|1|3|30\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let err = load_var_tail(file.path(), "|", 4, &mut lines).expect_err("x is not a u32");

    assert_eq!(err.loaded, 1);
    assert_eq!(lines.len(), 1);
    match &err.kind {
        RefdatError::Conversion {
            line,
            source: ConvertError::Parse { token, .. },
        } => {
            assert_eq!(*line, 2);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn non_numeric_count_token_is_a_conversion_error() {
    let file = write_temp(b"a|b|c|d|two|1|10|2|20\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let err = load_var_tail(file.path(), "|", 4, &mut lines).expect_err("count must be numeric");

    assert_eq!(err.loaded, 0);
    assert!(matches!(err.kind, RefdatError::Conversion { line: 1, .. }));
}

#[test]
fn line_without_control_field_fails() {
    let file = write_temp(b"a|b|c|d|1|1|10\na|b|c\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let err = load_var_tail(file.path(), "|", 4, &mut lines).expect_err("line 2 is short");

    assert_eq!(err.loaded, 1);
    assert!(matches!(
        err.kind,
        RefdatError::MissingControlField {
            line: 2,
            actual: 3,
            control_index: 4
        }
    ));
}

#[test]
fn blank_lines_follow_the_fixed_loader_policy() {
    // Both blanks are skipped: after the middle one is dropped, the counted
    // lines still outnumber the records assembled.
    let file = write_temp(b"a|b|c|d|1|1|10\n\na|b|c|d|1|2|20\n\n");
    let mut lines: Vec<FileLine> = Vec::new();
    let loaded = load_var_tail(file.path(), "|", 4, &mut lines).expect("blank lines skipped");
    assert_eq!(loaded, 2);

    // Without an earlier blank, the final blank line reaches validation.
    let file = write_temp(b"a|b|c|d|1|1|10\na|b|c|d|1|2|20\n\n");
    let err = load_var_tail(file.path(), "|", 4, &mut lines).expect_err("blank last line is kept");
    assert_eq!(err.loaded, 2);
    assert!(matches!(err.kind, RefdatError::MissingControlField { line: 3, .. }));
}

#[test]
fn control_index_must_match_the_record_layout() {
    let mut lines: Vec<FileLine> = Vec::new();
    let missing = fixture_path(&["tests", "fixtures", "no_such_file.dat"]);
    let err = load_var_tail(missing, "|", 2, &mut lines).expect_err("four leading fields, not two");

    assert_eq!(err.loaded, 0);
    assert!(matches!(err.kind, RefdatError::ArgumentShape(_)), "got {:?}", err.kind);
}

#[test]
fn record_without_sequence_tail_is_rejected() {
    let mut rows: Vec<NoTail> = Vec::new();
    let missing = fixture_path(&["tests", "fixtures", "no_such_file.dat"]);
    let err = load_var_tail(missing, "|", 1, &mut rows).expect_err("no tail field");

    assert!(matches!(err.kind, RefdatError::ArgumentShape(_)), "got {:?}", err.kind);
}

#[test]
fn nested_record_without_fields_is_rejected() {
    let mut rows: Vec<EmptyTail> = Vec::new();
    let missing = fixture_path(&["tests", "fixtures", "no_such_file.dat"]);
    let err = load_var_tail(missing, "|", 1, &mut rows).expect_err("nested record has no fields");

    assert!(matches!(err.kind, RefdatError::ArgumentShape(_)), "got {:?}", err.kind);
}

#[test]
fn fixed_loader_rejects_variable_tail_records() {
    let mut lines: Vec<FileLine> = Vec::new();
    let err = load(fixture_path(&["tests", "fixtures", "no_such_file.dat"]), "|", &mut lines)
        .expect_err("tail records need load_var_tail");

    assert!(matches!(err.kind, RefdatError::ArgumentShape(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let mut lines: Vec<FileLine> = Vec::new();
    let missing = fixture_path(&["tests", "fixtures", "no_such_file.dat"]);
    let err = load_var_tail(missing, "|", 4, &mut lines).expect_err("file is missing");

    assert!(matches!(err.kind, RefdatError::Io(_)));
}

#[test]
fn tail_byte_fields_take_the_raw_byte() {
    let (bytes, _, _) = encoding_rs::GB18030.encode("浦发|2|买|100|S|200\n");
    let file = write_temp(&bytes);
    let mut orders: Vec<Order> = Vec::new();
    RefLoader::new("|")
        .with_encoding("GBK")
        .load_var_tail(file.path(), 1, &mut orders)
        .expect("load gbk tail");

    assert_eq!(orders[0].code, "浦发");
    assert_eq!(
        orders[0].sides,
        vec![
            Side {
                flag: char::from(bytes[7]),
                qty: 100
            },
            Side {
                flag: 'S',
                qty: 200
            },
        ]
    );
}
