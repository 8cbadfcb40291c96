//! `stator_syntax`: the ECMAScript front end of the Stator JavaScript engine.
//!
//! # Crate layout
//!
//! - [`parser`]: lexer, syntax tree, scope model and the recursive-descent
//!   driver.
//! - [`regexp`]: validation of regular-expression literals.
//! - [`options`]: parse configuration and feature switches.
//! - [`error`] and [`messages`]: the diagnostic a failed parse returns.
//!
//! The free functions below cover the common entry points.  Construct a
//! [`Parser`] directly to supply a custom [`RegExpValidator`].

/// Parse diagnostics.
pub mod error;
/// Diagnostic message catalogue.
pub mod messages;
/// Parse configuration.
pub mod options;
/// The parser and its data model.
pub mod parser;
/// Regular-expression literal validation.
pub mod regexp;

pub use error::{ErrorKind, ParseResult, ParserError};
pub use messages::MessageKey;
pub use options::{EvalContext, EvalFlags, Features, ParseOptions};
pub use parser::Parser;
pub use parser::ast::{FunctionKind, Program, SourceType, StandaloneFunction};
pub use parser::scope::ScopeTree;
pub use regexp::{PatternValidator, RegExpFlags, RegExpValidator};

/// Parse `source` as a classic script, or as eval code when
/// `options.eval` is set.
pub fn parse_script(source: &str, options: &ParseOptions) -> ParseResult<Program> {
    Parser::new(source, options).parse_script()
}

/// Parse `source` as an ES module.
pub fn parse_module(source: &str, options: &ParseOptions) -> ParseResult<Program> {
    Parser::new(source, options).parse_module()
}

/// Parse the parameter and body texts of a dynamically created function.
pub fn parse_function(
    params: &str,
    body: &str,
    kind: FunctionKind,
    options: &ParseOptions,
) -> ParseResult<StandaloneFunction> {
    Parser::new(params, options).parse_standalone_function(body, kind)
}
