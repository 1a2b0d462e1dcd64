//! Toylet diagnostics - positioned error collection for the Toylet toolchain.
//!
//! The lexer records every malformed construct it meets into a [`Diagnostics`]
//! collector instead of failing. The caller decides what a non-zero
//! [`Diagnostics::count`] means and renders the report when it needs to.
//!
//! # Example
//!
//! ```
//! use toylet_diagnostics::{Diagnostics, Position};
//!
//! let source = "var x = @;";
//! let location = Position::resolve(source, 8);
//!
//! let mut diagnostics = Diagnostics::with_filename("demo.toy");
//! diagnostics.add_with_context(location.position, "Unexpected character.", location.line_text);
//!
//! let mut out = Vec::new();
//! diagnostics.render(&mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "demo.toy:1:9 error: Unexpected character.\n    var x = @;\n            ^\n"
//! );
//! ```

use std::fmt;
use std::io::{self, Write};

use thiserror::Error;

/// Line and column of a diagnostic, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new Position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset into a line/column position and the text of the
    /// line that contains it.
    ///
    /// Offsets past the end of `source` are clamped to its length, which
    /// resolves to the end of the last line. Columns count bytes.
    pub fn resolve(source: &str, offset: usize) -> SourceLocation<'_> {
        let bytes = source.as_bytes();
        let offset = offset.min(bytes.len());
        let before = &bytes[..offset];

        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let line_end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| offset + i);
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;

        SourceLocation {
            position: Position::new(line, offset - line_start + 1),
            line_text: &source[line_start..line_end],
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A resolved position together with the source line it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation<'src> {
    pub position: Position,
    /// The full line containing the position, without its line break.
    pub line_text: &'src str,
}

/// A single positioned error record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{position} error: {message}")]
pub struct Diagnostic {
    pub position: Position,
    pub message: String,
    /// The line of code the error points into, shown with a caret beneath.
    pub context: Option<String>,
}

/// Ordered collection of diagnostics for one or more scan sessions.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    filename: Option<String>,
}

impl Diagnostics {
    /// Create an empty collector whose report carries no filename prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector whose report lines start with `<filename>:`.
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            filename: Some(filename.into()),
        }
    }

    /// Record an error with no source context.
    pub fn add(&mut self, position: Position, message: impl Into<String>) {
        self.records.push(Diagnostic {
            position,
            message: message.into(),
            context: None,
        });
    }

    /// Record an error along with the source line it occurred on.
    pub fn add_with_context(
        &mut self,
        position: Position,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.records.push(Diagnostic {
            position,
            message: message.into(),
            context: Some(context.into()),
        });
    }

    /// Number of recorded diagnostics.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Iterate over the diagnostics in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    /// Write every diagnostic to `out` in insertion order.
    ///
    /// Each record is a `[<filename>:]<line>:<column> error: <message>` line.
    /// When a context line is present it follows, indented by four spaces,
    /// with a caret line underneath pointing at the column.
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.records {
            if let Some(filename) = &self.filename {
                write!(out, "{}:", filename)?;
            }
            writeln!(out, "{}", diagnostic)?;

            if let Some(context) = &diagnostic.context {
                writeln!(out, "    {}", context)?;
                writeln!(out, "    {:>width$}", "^", width = diagnostic.position.column)?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
