//! ECMAScript parser.
//!
//! - [`scanner`]: context-sensitive lexer with explicit re-lexing entry
//!   points for regular expressions, template continuations and private
//!   names.
//! - [`ast`]: tagged-variant syntax tree.
//! - [`scope`]: arena of scopes, bindings and references.
//! - [`context`]: parse-context stack: strictness, contextual-keyword
//!   capabilities, labels and class accumulators.
//!
//! [`Parser`] is a recursive-descent driver with one routine per grammar
//! production.  The routines live in one `impl` block per grammar family
//! (`statements`, `expressions`, `patterns`, `functions`, `classes`,
//! `modules`) and share the state defined here.  Early errors that need a
//! finished construct are checked in `early_errors` at the construct's
//! completion point.
//!
//! Parenthesised arrow heads and `async (…)` heads are parsed speculatively
//! as expressions.  When `=>` follows, the parser restores a [`Checkpoint`]
//! and re-parses the same text as a parameter list.

/// Syntax tree node types.
pub mod ast;
/// Parse contexts and class accumulators.
pub mod context;
/// ES2025 JavaScript lexer.
pub mod scanner;
/// Scope arena and identifier resolution.
pub mod scope;

mod classes;
mod early_errors;
mod expressions;
mod functions;
mod modules;
mod patterns;
mod statements;

#[cfg(test)]
mod tests;

use rustc_hash::FxHashSet;

use crate::error::{ParseResult, ParserError};
use crate::messages::MessageKey;
use crate::options::{EvalFlags, Features, ParseOptions};
use crate::regexp::{PatternValidator, RegExpValidator};

use self::ast::{Program, ProgramItem, SourceType};
use self::context::{ClassParseContext, ContextFlags, ContextStack, ParseContext, PrivateReference};
use self::modules::ModuleState;
use self::scanner::{Position, Scanner, ScannerCheckpoint, Span, Token, TokenKind};
use self::scope::{ScopeId, ScopeKind, ScopeTree, ScopeTreeCheckpoint};

/// Remaining stack below which a nested production moves to a new segment.
const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// An object literal whose validity depends on whether it is later
/// reinterpreted as an assignment pattern.
#[derive(Debug, Clone)]
pub(crate) struct PendingObjectError {
    /// Start offset of the literal.
    pub literal: usize,
    pub error: ParserError,
}

/// Everything a speculative parse may change, captured before it starts.
pub(crate) struct Checkpoint {
    scanner: ScannerCheckpoint,
    scopes: ScopeTreeCheckpoint,
    scope: ScopeId,
    pending_objects: usize,
    strict_error_pending: bool,
    class_references: usize,
    unresolved_private: usize,
    depth: u32,
    no_in: bool,
}

/// Recursive-descent ECMAScript parser.
///
/// A parser is consumed by one of its entry points; it is not reusable.
///
/// ```
/// use stator_syntax::{ParseOptions, Parser};
///
/// let program = Parser::new("let answer = 42;", &ParseOptions::default())
///     .parse_script()
///     .unwrap();
/// assert_eq!(program.body.len(), 1);
/// ```
pub struct Parser<'src> {
    pub(crate) scanner: Scanner<'src>,
    pub(crate) options: ParseOptions,
    pub(crate) contexts: ContextStack,
    pub(crate) scopes: ScopeTree,
    /// Innermost open scope.
    pub(crate) scope: ScopeId,
    /// Class bodies being parsed, innermost last.
    pub(crate) classes: Vec<ClassParseContext>,
    /// Private references not declared by any enclosing class body.
    pub(crate) unresolved_private: Vec<PrivateReference>,
    pub(crate) pending_objects: Vec<PendingObjectError>,
    /// Array literals with a trailing comma after a spread element.
    pub(crate) spread_trailing_commas: FxHashSet<usize>,
    /// First duplicate in the parameter list being parsed.
    pub(crate) duplicate_parameter: Option<(String, Span)>,
    pub(crate) module: ModuleState,
    pub(crate) depth: u32,
    /// Offset at which an arrow function may start (the start of the
    /// current assignment expression).
    pub(crate) arrow_start: Option<usize>,
    /// The `in` operator is excluded (for-statement heads).
    pub(crate) no_in: bool,
    pub(crate) regexp: Box<dyn RegExpValidator>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: &ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(source, options, false),
            options: options.clone(),
            contexts: ContextStack::default(),
            scopes: ScopeTree::new(),
            scope: 0,
            classes: Vec::new(),
            unresolved_private: Vec::new(),
            pending_objects: Vec::new(),
            spread_trailing_commas: FxHashSet::default(),
            duplicate_parameter: None,
            module: ModuleState::default(),
            depth: 0,
            arrow_start: None,
            no_in: false,
            regexp: Box::new(PatternValidator::new(options.regexp_max_depth)),
        }
    }

    /// Replace the regular-expression validator.
    pub fn with_regexp_validator(mut self, validator: Box<dyn RegExpValidator>) -> Self {
        self.regexp = validator;
        self
    }

    /// Parse the source as a classic script (or as eval code when the
    /// options carry an [`crate::EvalContext`]).
    pub fn parse_script(mut self) -> ParseResult<Program> {
        tracing::debug!(source = %self.options.source_name, "parse script");
        let eval = self.options.eval_flags();
        let mut inherited = ContextFlags::empty();
        if !eval.contains(EvalFlags::ARGUMENTS_RESTRICTED) {
            inherited |= ContextFlags::ARGUMENTS;
        }
        if eval.contains(EvalFlags::NEW_TARGET) {
            inherited |= ContextFlags::NEW_TARGET;
        }
        if eval.contains(EvalFlags::SUPER_CALL) {
            inherited |= ContextFlags::SUPER_CALL;
        }
        if eval.contains(EvalFlags::SUPER_PROPERTY) {
            inherited |= ContextFlags::SUPER_PROPERTY;
        }
        self.contexts = ContextStack::new(ParseContext::script(
            eval.contains(EvalFlags::STRICT),
            inherited,
        ));
        let start = self.scanner.current().span.start;
        self.scope = self
            .scopes
            .push_scope(ScopeKind::Script, None, Span::new(start, start));
        self.scanner.advance()?;

        let (directives, _) = self.parse_directive_prologue()?;
        let mut body: Vec<ProgramItem> = directives.into_iter().map(ProgramItem::Stmt).collect();
        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Export)
                || (self.at(TokenKind::Import)
                    && !matches!(self.peek_kind()?, TokenKind::LeftParen | TokenKind::Dot))
            {
                return Err(self.error_here(MessageKey::ModuleItemOutsideModule, vec![]));
            }
            body.push(ProgramItem::Stmt(self.parse_statement_list_item()?));
        }
        self.finish_program(SourceType::Script, body, start)
    }

    /// Parse the source as an ES module.
    pub fn parse_module(mut self) -> ParseResult<Program> {
        tracing::debug!(source = %self.options.source_name, "parse module");
        self.scanner = Scanner::new(self.scanner.source(), &self.options, true);
        self.contexts = ContextStack::new(ParseContext::module(
            self.has_feature(Features::TOP_LEVEL_AWAIT),
        ));
        let start = self.scanner.current().span.start;
        self.scope = self
            .scopes
            .push_scope(ScopeKind::Module, None, Span::new(start, start));
        self.scanner.advance()?;

        let (directives, _) = self.parse_directive_prologue()?;
        let mut body: Vec<ProgramItem> = directives.into_iter().map(ProgramItem::Stmt).collect();
        while !self.at(TokenKind::Eof) {
            body.push(self.parse_module_item()?);
        }
        self.check_module_exports()?;
        self.finish_program(SourceType::Module, body, start)
    }

    fn finish_program(
        mut self,
        source_type: SourceType,
        body: Vec<ProgramItem>,
        start: Position,
    ) -> ParseResult<Program> {
        self.check_unresolved_private_names()?;
        let end = self.scanner.current().span.end;
        let loc = Span::new(start, end);
        let root = self.scope;
        self.scopes.close_scope(root, loc);
        self.scopes
            .resolve_all(self.options.eval_flags().caller_scope_is_dynamic());
        let strict = self.contexts.is_strict();
        tracing::debug!(?source_type, strict, items = body.len(), "parse complete");
        Ok(Program {
            loc,
            source_type,
            body,
            strict,
            scope: root,
            scopes: self.scopes,
        })
    }

    // ── Token helpers ───────────────────────────────────────────────────────

    pub(crate) fn tok(&self) -> &Token {
        self.scanner.current()
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.scanner.current().kind
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.tok().is_contextual(word)
    }

    pub(crate) fn advance(&mut self) -> ParseResult<()> {
        self.scanner.advance()
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.at(kind) {
            return self.advance();
        }
        if self.at(TokenKind::Eof) {
            return Err(self.unexpected());
        }
        let found = self.scanner.token_text(self.tok());
        Err(self.error_here(
            MessageKey::ExpectedToken,
            vec![kind.as_str().to_string(), found],
        ))
    }

    pub(crate) fn peek_kind(&mut self) -> ParseResult<TokenKind> {
        Ok(self.scanner.peek()?.kind)
    }

    /// The lookahead token, and whether a line break separates it from the
    /// current one.
    pub(crate) fn peek_token(&mut self) -> ParseResult<(TokenKind, bool)> {
        let tok = self.scanner.peek()?;
        Ok((tok.kind, tok.had_line_terminator_before))
    }

    pub(crate) fn start(&self) -> Position {
        self.tok().span.start
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.scanner.prev_end())
    }

    pub(crate) fn token_name(&self) -> String {
        self.scanner.token_text(self.tok())
    }

    /// Automatic semicolon insertion.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(TokenKind::Semicolon)? {
            return Ok(());
        }
        let tok = self.tok();
        if tok.had_line_terminator_before
            || matches!(tok.kind, TokenKind::RightBrace | TokenKind::Eof)
        {
            return Ok(());
        }
        Err(self.unexpected())
    }

    // ── Diagnostics ─────────────────────────────────────────────────────────

    pub(crate) fn error_at(&self, at: Position, key: MessageKey, args: Vec<String>) -> ParserError {
        ParserError::syntax(&self.options.source_name, at.line, at.column, key, args)
    }

    pub(crate) fn reference_error_at(&self, at: Position, key: MessageKey) -> ParserError {
        ParserError::reference(&self.options.source_name, at.line, at.column, key, vec![])
    }

    pub(crate) fn error_here(&self, key: MessageKey, args: Vec<String>) -> ParserError {
        self.error_at(self.start(), key, args)
    }

    /// "Unexpected token" for the current token, or the premature-EOF error
    /// at end of input.
    pub(crate) fn unexpected(&self) -> ParserError {
        let tok = self.tok();
        if tok.kind == TokenKind::Eof {
            let at = tok.span.start;
            return ParserError::premature_eof(
                &self.options.source_name,
                at.line,
                at.column,
                MessageKey::UnexpectedEndOfInput,
            );
        }
        self.error_here(MessageKey::UnexpectedToken, vec![self.token_name()])
    }

    /// Raise `key` in strict code, buffer it while strictness is unknown.
    pub(crate) fn report_strict(
        &mut self,
        at: Position,
        key: MessageKey,
        args: Vec<String>,
    ) -> ParseResult<()> {
        let err = self.error_at(at, key, args);
        self.contexts.report_strict_violation(err)
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.contexts.is_strict()
    }

    pub(crate) fn has_flag(&self, flag: ContextFlags) -> bool {
        self.contexts.current().has(flag)
    }

    pub(crate) fn has_feature(&self, feature: Features) -> bool {
        self.options.has(feature)
    }

    pub(crate) fn require_feature(&self, feature: Features, syntax: &str) -> ParseResult<()> {
        if self.has_feature(feature) {
            Ok(())
        } else {
            Err(self.error_here(MessageKey::FeatureNotEnabled, vec![syntax.to_string()]))
        }
    }

    // ── Recursion guard ─────────────────────────────────────────────────────

    /// Run `f` one grammar level deeper, failing once the configured
    /// nesting ceiling is exceeded.  The native stack is extended on demand,
    /// so the ceiling holds on small thread stacks too.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.options.max_nesting_depth {
            return Err(self.error_here(MessageKey::NestingTooDeep, vec![]));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || f(self));
        self.depth -= 1;
        result
    }

    /// Run `f` with the `in` operator allowed (inside brackets, parentheses
    /// and bodies).
    pub(crate) fn allow_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    // ── Scopes ──────────────────────────────────────────────────────────────

    /// Open a scope below the current one and make it current.
    pub(crate) fn enter_scope(&mut self, kind: ScopeKind, start: Position) -> ScopeId {
        let id = self
            .scopes
            .push_scope(kind, Some(self.scope), Span::new(start, start));
        self.scope = id;
        id
    }

    /// Close `id` and return to its parent.
    pub(crate) fn leave_scope(&mut self, id: ScopeId) {
        let end = self.scanner.prev_end();
        self.scopes.close_scope(id, Span::new(end, end));
        self.scope = self.scopes.scope(id).parent.unwrap_or(id);
    }

    // ── Backtracking ────────────────────────────────────────────────────────

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            scanner: self.scanner.checkpoint(),
            scopes: self.scopes.checkpoint(self.scope),
            scope: self.scope,
            pending_objects: self.pending_objects.len(),
            strict_error_pending: self.contexts.current().pending_strict_error.is_some(),
            class_references: self.classes.last().map_or(0, |c| c.references.len()),
            unresolved_private: self.unresolved_private.len(),
            depth: self.depth,
            no_in: self.no_in,
        }
    }

    /// Undo every effect of the parse since `cp` was taken.
    pub(crate) fn restore(&mut self, cp: Checkpoint) {
        tracing::trace!(offset = cp.scanner_offset(), "backtrack: restore checkpoint");
        self.scanner.reset(cp.scanner);
        self.scopes.rollback(&cp.scopes);
        self.scope = cp.scope;
        self.pending_objects.truncate(cp.pending_objects);
        if !cp.strict_error_pending {
            self.contexts.current_mut().pending_strict_error = None;
        }
        if let Some(class) = self.classes.last_mut() {
            class.references.truncate(cp.class_references);
        }
        self.unresolved_private.truncate(cp.unresolved_private);
        self.depth = cp.depth;
        self.no_in = cp.no_in;
    }

    /// Report the first object-literal error recorded since `mark`, or
    /// commit the literals as plain expressions.
    pub(crate) fn commit_pending_objects(&mut self, mark: usize) -> ParseResult<()> {
        if self.pending_objects.len() > mark {
            let first = self.pending_objects.swap_remove(mark);
            return Err(first.error);
        }
        Ok(())
    }
}

impl Checkpoint {
    fn scanner_offset(&self) -> usize {
        self.scanner.offset()
    }
}
