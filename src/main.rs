use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use exprparse::{
    config::{ParserConfig, DEFAULT_MAX_DEPTH},
    display_error,
    lexer::lexer::tokenize,
    parser::{lookups::DEFAULT_GRAMMAR, parser::parse_with},
};

/// Parses a file of expressions and prints one tree per statement.
#[derive(Parser, Debug)]
#[command(name = "exprparse")]
struct Args {
    file: PathBuf,

    /// Reject juxtaposed operands instead of multiplying them
    #[arg(long)]
    no_implicit: bool,

    /// Let left-associative operators win equal-precedence ties
    #[arg(long)]
    assoc_to_left: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print S-expressions instead of source text
    #[arg(long)]
    sexp: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("input"));

    let source = match read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let config = ParserConfig::default()
        .with_implicit_multiplication(!args.no_implicit)
        .with_assoc_to_left(args.assoc_to_left)
        .with_max_depth(args.max_depth);

    let start = Instant::now();
    let parsed = tokenize(source.clone(), Some(file_name)).and_then(|tokens| parse_with(tokens, &DEFAULT_GRAMMAR, config));
    log::debug!("Parsed in {:?}", start.elapsed());

    match parsed {
        Ok(statements) => {
            for statement in statements {
                if args.sexp {
                    println!("{}", statement.sexp());
                } else {
                    println!("{}", statement);
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprint!("{}", display_error(&error, &source));
            ExitCode::FAILURE
        }
    }
}
