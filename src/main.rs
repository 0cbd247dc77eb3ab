use refdat_loader::{parse_encoding, split_line, LineScanner, DEFAULT_SEPARATOR};
use std::collections::BTreeMap;
use std::env;

const SAMPLE_LINES: usize = 10;

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <path-to-reference-file> [--sep <SEP>] [--encoding <LABEL>] [--fields <N>]",
        program
    );
    std::process::exit(1);
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|arg| arg == flag)?;
    match args.get(idx + 1) {
        Some(value) => Some(value.as_str()),
        None => {
            eprintln!("ERROR: {} flag requires an argument.", flag);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1].starts_with("--") {
        usage(&args[0]);
    }

    let path = &args[1];
    let separator = flag_value(&args, "--sep").unwrap_or(DEFAULT_SEPARATOR);
    let encoding = parse_encoding(flag_value(&args, "--encoding").unwrap_or("utf-8"));
    let expected_fields = match flag_value(&args, "--fields").map(str::parse::<usize>) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            eprintln!("ERROR: Invalid --fields value: {}", e);
            std::process::exit(1);
        }
    };
    if separator.is_empty() {
        eprintln!("ERROR: --sep must not be empty.");
        std::process::exit(1);
    }

    println!("Inspecting reference file: {}", path);
    println!("Separator: {:?}  Encoding: {}", separator, encoding.name());
    println!("{}", "=".repeat(60));

    let scanner = match LineScanner::open(path, encoding) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("\nERROR: Failed to open reference file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    let total_lines = scanner.total_lines();

    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    let mut samples = Vec::new();
    let mut mismatches = Vec::new();
    let mut retained = 0;

    for line in scanner {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("\nERROR: Read failed after {} lines", retained);
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        };
        retained += 1;

        let tokens = split_line(&line.text, separator);
        *histogram.entry(tokens.len()).or_insert(0) += 1;
        if let Some(n) = expected_fields {
            if tokens.len() != n {
                mismatches.push((line.number, tokens.len()));
            }
        }
        if samples.len() < SAMPLE_LINES {
            samples.push((line.number, tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>()));
        }
    }

    println!("\nStatistics:");
    println!("  Newline-terminated lines: {}", total_lines);
    println!("  Lines a loader would consume: {}", retained);

    println!("\nFields per line:");
    for (fields, count) in &histogram {
        println!("  {:>4} fields: {} lines", fields, count);
    }

    println!("\nSample lines (first {}):", SAMPLE_LINES);
    for (number, tokens) in &samples {
        println!("  [line:{}] {:?}", number, tokens);
    }

    if let Some(n) = expected_fields {
        if mismatches.is_empty() {
            println!("\nAll {} lines have {} fields.", retained, n);
        } else {
            println!("\nLines without {} fields:", n);
            for (number, actual) in &mismatches {
                println!("  [line:{}] {} fields", number, actual);
            }
            std::process::exit(1);
        }
    }
}
