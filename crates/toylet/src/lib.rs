//! Toylet - lexical front end for the Toylet scripting language.
//!
//! This crate ties the lexer and the diagnostics collector together and
//! provides the small driver used by the `toylet` binary: scan some source,
//! print every token, and hand back the diagnostics when the input was
//! malformed.
//!
//! # Example
//!
//! ```
//! use toylet::{run, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::new();
//! let mut out = Vec::new();
//! run("print 1;", &mut diagnostics, &mut out).unwrap();
//!
//! let printed = String::from_utf8(out).unwrap();
//! assert!(printed.starts_with("Token: PRINT print\n"));
//! assert_eq!(diagnostics.count(), 0);
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

pub use toylet_diagnostics as diagnostics;
pub use toylet_lexer as lexer;

// Re-export commonly used types
pub use toylet_diagnostics::{Diagnostic, Diagnostics, Position};
pub use toylet_lexer::{scan, tokenize, LexError, Lexer, Literal, Token, TokenKind};

/// Error type for the driver helpers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The input scanned, but some of it was malformed.
    #[error("{} lexical error(s) in {}", .0.count(), .0.filename().unwrap_or("<input>"))]
    Lex(Diagnostics),
}

impl Error {
    /// The collected diagnostics, if this is a lexical failure.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::Lex(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}

/// Scan `source` and write one `Token: ...` line per token to `out`.
///
/// Problems in the source are added to `diagnostics`; deciding whether they
/// are fatal is up to the caller.
pub fn run<W: Write + ?Sized>(
    source: &str,
    diagnostics: &mut Diagnostics,
    out: &mut W,
) -> io::Result<Vec<Token>> {
    let tokens = scan(source, diagnostics);
    for token in &tokens {
        writeln!(out, "Token: {}", token)?;
    }
    Ok(tokens)
}

/// Scan a snippet with a fresh, unnamed collector.
pub fn run_snippet<W: Write + ?Sized>(source: &str, out: &mut W) -> Result<Vec<Token>, Error> {
    let mut diagnostics = Diagnostics::new();
    let tokens = run(source, &mut diagnostics, out)?;
    finish(tokens, diagnostics)
}

/// Read a whole file, scan it and print its tokens.
///
/// Diagnostics are prefixed with the file's path when rendered.
pub fn run_file<W: Write + ?Sized>(path: impl AsRef<Path>, out: &mut W) -> Result<Vec<Token>, Error> {
    let path = path.as_ref();
    let name = path.display().to_string();
    tracing::debug!(path = %name, "reading source file");

    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: name.clone(),
        source,
    })?;

    let mut diagnostics = Diagnostics::with_filename(name);
    let tokens = run(&source, &mut diagnostics, out)?;
    finish(tokens, diagnostics)
}

fn finish(tokens: Vec<Token>, diagnostics: Diagnostics) -> Result<Vec<Token>, Error> {
    if diagnostics.is_empty() {
        Ok(tokens)
    } else {
        Err(Error::Lex(diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn source_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn printed(source: &str) -> String {
        let mut diagnostics = Diagnostics::new();
        let mut out = Vec::new();
        run(source, &mut diagnostics, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_prints_every_token() {
        assert_eq!(
            printed("var x = \"hi\";"),
            "Token: VAR var\n\
             Token: IDENTIFIER x\n\
             Token: EQUAL =\n\
             Token: STRING \"hi\" hi\n\
             Token: SEMICOLON ;\n\
             Token: END_OF_FILE \n"
        );
    }

    #[test]
    fn test_run_prints_numbers() {
        assert_eq!(printed("2.50"), "Token: NUMBER 2.50 2.5\nToken: END_OF_FILE \n");
    }

    #[test]
    fn test_run_keeps_going_after_errors() {
        let mut diagnostics = Diagnostics::new();
        let mut out = Vec::new();
        let tokens = run("1 # 2", &mut diagnostics, &mut out).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(diagnostics.count(), 1);
    }

    #[test]
    fn test_run_snippet_ok() {
        let mut out = Vec::new();
        let tokens = run_snippet("while (true) {}", &mut out).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::While);
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_run_snippet_error() {
        let mut out = Vec::new();
        let err = run_snippet("\"open", &mut out).unwrap_err();
        let diagnostics = err.diagnostics().unwrap();
        assert_eq!(diagnostics.count(), 1);
        assert_eq!(diagnostics.filename(), None);
        assert_eq!(err.to_string(), "1 lexical error(s) in <input>");
    }

    #[test]
    fn test_run_file() {
        let file = source_file("fn main() {\n  print 1;\n}\n");
        let mut out = Vec::new();
        let tokens = run_file(file.path(), &mut out).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Fn);
        assert_eq!(tokens.last().unwrap().offset, 25);
        assert!(String::from_utf8(out).unwrap().starts_with("Token: FN fn\n"));
    }

    #[test]
    fn test_run_file_reports_with_filename() {
        let file = source_file("var a = 1;\nvar b = @;\n");
        let mut out = Vec::new();
        let err = run_file(file.path(), &mut out).unwrap_err();

        let mut report = Vec::new();
        err.diagnostics().unwrap().render(&mut report).unwrap();
        let expected = format!(
            "{}:2:9 error: Unexpected character.\n    var b = @;\n            ^\n",
            file.path().display()
        );
        assert_eq!(String::from_utf8(report).unwrap(), expected);
    }

    #[test]
    fn test_run_file_missing() {
        let mut out = Vec::new();
        let err = run_file("/definitely/not/here.toy", &mut out).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.diagnostics().is_none());
        assert!(out.is_empty());
    }
}
