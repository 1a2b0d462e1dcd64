//! Toylet CLI - command-line interface for the Toylet scripting language.
//!
//! Prints the token stream for a file, a snippet, or each line typed at the
//! prompt. Lexical errors are reported on stdout; a file or snippet with any
//! error exits with status 65.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line usage error (sysexits `EX_USAGE`).
const EXIT_USAGE: u8 = 64;
/// Input data was malformed (sysexits `EX_DATAERR`).
const EXIT_DATA_ERROR: u8 = 65;

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Run(#[from] toylet::Error),

    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// What the invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Help,
    Version,
    Eval(String),
    File(String),
    Repl,
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Run(toylet::Error::Lex(diagnostics))) => {
            if let Err(e) = diagnostics.render(&mut io::stdout().lock()) {
                eprintln!("Error: failed to write diagnostics: {}", e);
            }
            ExitCode::from(EXIT_DATA_ERROR)
        }
        Err(CliError::Usage(message)) => {
            eprintln!("Error: {}", message);
            print_usage();
            ExitCode::from(EXIT_USAGE)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr log subscriber when `RUST_LOG` is set.
///
/// Enable with `RUST_LOG=toylet_lexer=debug` or `RUST_LOG=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn parse_args(args: &[String]) -> Result<Mode, CliError> {
    let mut eval_code: Option<String> = None;
    let mut file: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        match arg.as_str() {
            "-h" | "--help" => return Ok(Mode::Help),
            "-v" | "--version" => return Ok(Mode::Version),
            "-e" | "--eval" => {
                i += 1;
                let code = args
                    .get(i)
                    .ok_or_else(|| CliError::Usage("-e requires an argument".to_string()))?;
                eval_code = Some(code.clone());
            }
            arg if arg.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option: {}", arg)));
            }
            _ => {
                if file.is_some() {
                    return Err(CliError::Usage(format!("Unexpected argument: {}", arg)));
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    match (eval_code, file) {
        (Some(_), Some(_)) => Err(CliError::Usage(
            "-e cannot be combined with a file".to_string(),
        )),
        (Some(code), None) => Ok(Mode::Eval(code)),
        (None, Some(path)) => Ok(Mode::File(path)),
        (None, None) => Ok(Mode::Repl),
    }
}

fn run(args: Vec<String>) -> Result<(), CliError> {
    let mode = parse_args(&args)?;
    tracing::debug!(?mode, "starting");

    match mode {
        Mode::Help => print_usage(),
        Mode::Version => print_version(),
        Mode::Eval(code) => {
            toylet::run_snippet(&code, &mut io::stdout().lock())?;
        }
        Mode::File(path) => {
            toylet::run_file(&path, &mut io::stdout().lock())?;
        }
        Mode::Repl => start_repl()?,
    }

    Ok(())
}

fn print_usage() {
    println!(
        r#"
Toylet v{} - token printer for the Toylet scripting language

Usage:
  toylet [options] [file]

Options:
  -h, --help      Show this help message
  -v, --version   Show version
  -e, --eval      Scan code from the command line

Examples:
  toylet                    Start interactive prompt
  toylet script.toy         Print the tokens of a script file
  toylet -e "print 1 + 2;"  Print the tokens of a snippet
"#,
        VERSION
    );
}

fn print_version() {
    println!("Toylet {}", VERSION);
}

/// Interactive prompt. Every line is scanned with its own collector, so the
/// errors shown after a line belong to that line only.
fn start_repl() -> Result<(), CliError> {
    println!("Toylet v{} - Type 'exit' or Ctrl+D to quit", VERSION);
    println!();

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "exit" || trimmed == "quit" {
                    println!("Goodbye!");
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed).ok(); // Ignore history errors

                let mut out = io::stdout().lock();
                scan_line(&line, &mut out)?;
                out.flush()?;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Print the tokens of one prompt line followed by its diagnostics.
fn scan_line<W: Write + ?Sized>(line: &str, out: &mut W) -> Result<usize, CliError> {
    match toylet::run_snippet(line, out) {
        Ok(_) => Ok(0),
        Err(toylet::Error::Lex(diagnostics)) => {
            diagnostics.render(out)?;
            Ok(diagnostics.count())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_starts_repl() {
        assert_eq!(parse_args(&[]).unwrap(), Mode::Repl);
    }

    #[test]
    fn test_file_argument() {
        assert_eq!(
            parse_args(&args(&["main.toy"])).unwrap(),
            Mode::File("main.toy".to_string())
        );
    }

    #[test]
    fn test_eval_argument() {
        assert_eq!(
            parse_args(&args(&["-e", "print 1;"])).unwrap(),
            Mode::Eval("print 1;".to_string())
        );
        assert!(matches!(
            parse_args(&args(&["--eval"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), Mode::Help);
        assert_eq!(parse_args(&args(&["-v", "main.toy"])).unwrap(), Mode::Version);
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(
            parse_args(&args(&["a.toy", "b.toy"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--frobnicate"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["-e", "1", "a.toy"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn test_scan_line_prints_tokens() {
        let mut out = Vec::new();
        let errors = scan_line("1 + 2", &mut out).unwrap();
        assert_eq!(errors, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Token: NUMBER 1 1\nToken: PLUS +\nToken: NUMBER 2 2\nToken: END_OF_FILE \n"
        );
    }

    #[test]
    fn test_scan_line_reports_only_its_own_errors() {
        let mut out = Vec::new();
        assert_eq!(scan_line("@", &mut out).unwrap(), 1);

        let mut out = Vec::new();
        assert_eq!(scan_line("x ~", &mut out).unwrap(), 1);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.ends_with("1:3 error: Unexpected character.\n    x ~\n      ^\n"));
    }
}
