//! Error types for the Stator parser.
//!
//! Parsing is fail-fast: the first violation aborts the parse and is returned
//! as a single [`ParserError`].  Exactly two error kinds exist, matching the
//! language: [`ErrorKind::SyntaxError`] for malformed tokens, grammar
//! violations and static-semantics violations, and
//! [`ErrorKind::ReferenceError`] for invalid simple-assignment targets.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::MessageKey;

/// The JavaScript error constructor a [`ParserError`] maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A JavaScript SyntaxError.
    SyntaxError,
    /// A JavaScript ReferenceError.
    ReferenceError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError => f.write_str("SyntaxError"),
            ErrorKind::ReferenceError => f.write_str("ReferenceError"),
        }
    }
}

/// A located parse diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {source_name}:{line}:{column}: {message}")]
pub struct ParserError {
    /// SyntaxError or ReferenceError.
    pub kind: ErrorKind,
    /// Name of the source the error was found in.
    pub source_name: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// The message template.
    pub key: MessageKey,
    /// Template arguments.
    pub args: Vec<String>,
    /// Rendered English message.
    pub message: String,
    /// `true` when input ended before a token or literal could complete.
    pub premature_eof: bool,
}

impl ParserError {
    /// Create a SyntaxError.
    pub fn syntax(
        source_name: &str,
        line: u32,
        column: u32,
        key: MessageKey,
        args: Vec<String>,
    ) -> Self {
        Self::new(ErrorKind::SyntaxError, source_name, line, column, key, args)
    }

    /// Create a ReferenceError.
    pub fn reference(
        source_name: &str,
        line: u32,
        column: u32,
        key: MessageKey,
        args: Vec<String>,
    ) -> Self {
        Self::new(ErrorKind::ReferenceError, source_name, line, column, key, args)
    }

    /// Create the "input ended early" SyntaxError subtype.
    pub fn premature_eof(source_name: &str, line: u32, column: u32, key: MessageKey) -> Self {
        let mut err = Self::syntax(source_name, line, column, key, Vec::new());
        err.premature_eof = true;
        err
    }

    fn new(
        kind: ErrorKind,
        source_name: &str,
        line: u32,
        column: u32,
        key: MessageKey,
        args: Vec<String>,
    ) -> Self {
        let message = key.format(&args);
        Self {
            kind,
            source_name: source_name.to_string(),
            line,
            column,
            key,
            args,
            message,
            premature_eof: false,
        }
    }

    /// Returns `true` if more input could have made the source valid.
    pub fn is_premature_eof(&self) -> bool {
        self.premature_eof
    }
}

/// Convenient `Result` alias for fallible parser operations.
pub type ParseResult<T> = Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_and_kind() {
        let err = ParserError::syntax(
            "main.js",
            3,
            7,
            MessageKey::DuplicateLabel,
            vec!["outer".into()],
        );
        assert_eq!(
            err.to_string(),
            "SyntaxError: main.js:3:7: duplicate label 'outer'"
        );
        assert!(!err.is_premature_eof());
    }

    #[test]
    fn test_reference_error_kind() {
        let err = ParserError::reference("a.js", 1, 1, MessageKey::InvalidAssignmentTarget, vec![]);
        assert_eq!(err.kind, ErrorKind::ReferenceError);
        assert!(err.to_string().starts_with("ReferenceError"));
    }

    #[test]
    fn test_premature_eof_is_syntax_error() {
        let err = ParserError::premature_eof("a.js", 1, 5, MessageKey::UnterminatedString);
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert!(err.is_premature_eof());
    }

    #[test]
    fn test_error_serializes_to_json() {
        let err = ParserError::syntax("x.js", 2, 4, MessageKey::StrictWith, vec![]);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"kind\":\"SyntaxError\""));
        assert!(json.contains("\"key\":\"StrictWith\""));
    }
}
