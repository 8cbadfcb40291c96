//! Parse contexts: strictness, contextual-keyword capabilities and labels.
//!
//! A [`ParseContext`] exists for every script, module, function-like
//! construct, class field initializer and class static block.  Contexts are
//! kept on a [`ContextStack`]; each new context derives its capabilities
//! from its parent according to the construct kind.
//!
//! Strict mode is resolved lazily.  A context starts as
//! [`Strictness::Unknown`] unless its parent is already strict.  While
//! unknown, the first strict-mode-only violation is stored instead of
//! raised.  When the directive prologue has been read the buffered error is
//! either raised (the code is strict) or dropped (it is not).  A context
//! popped while still unknown hands its buffer to the parent.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::error::{ParseResult, ParserError};
use crate::parser::scanner::Span;

/// Three-valued strict-mode status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Unknown,
    Strict,
    NonStrict,
}

/// The construct a [`ParseContext`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Script,
    Module,
    Function,
    Arrow,
    /// Object-literal or class method, accessor or constructor.
    Method,
    ClassField,
    ClassStaticBlock,
}

bitflags! {
    /// What the code of a context may contain.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ContextFlags: u16 {
        /// `yield` may not be used as an identifier.
        const YIELD_RESERVED = 1 << 0;
        /// `yield` expressions are allowed.
        const YIELD_ALLOWED  = 1 << 1;
        /// `await` may not be used as an identifier.
        const AWAIT_RESERVED = 1 << 2;
        /// `await` expressions are allowed.
        const AWAIT_ALLOWED  = 1 << 3;
        const RETURN         = 1 << 4;
        const SUPER_CALL     = 1 << 5;
        const SUPER_PROPERTY = 1 << 6;
        const NEW_TARGET     = 1 << 7;
        /// `arguments` may be referenced.
        const ARGUMENTS      = 1 << 8;
        /// Currently inside the formal parameter list.
        const IN_PARAMETERS  = 1 << 9;
        const GENERATOR      = 1 << 10;
        const ASYNC          = 1 << 11;
    }
}

/// Shape of a function-like construct being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionTraits {
    pub kind: ContextKind,
    pub generator: bool,
    pub is_async: bool,
    pub super_call: bool,
    pub super_property: bool,
}

impl FunctionTraits {
    pub fn function(generator: bool, is_async: bool) -> Self {
        Self {
            kind: ContextKind::Function,
            generator,
            is_async,
            super_call: false,
            super_property: false,
        }
    }

    pub fn arrow(is_async: bool) -> Self {
        Self {
            kind: ContextKind::Arrow,
            generator: false,
            is_async,
            super_call: false,
            super_property: false,
        }
    }

    pub fn method(generator: bool, is_async: bool, super_call: bool) -> Self {
        Self {
            kind: ContextKind::Method,
            generator,
            is_async,
            super_call,
            super_property: true,
        }
    }
}

/// A statement label visible in the current function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    /// The label is attached to an iteration statement.
    pub iteration: bool,
}

/// Per-construct parser state.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub kind: ContextKind,
    pub strictness: Strictness,
    /// First strict-mode violation seen while strictness was unknown.
    pub pending_strict_error: Option<ParserError>,
    pub flags: ContextFlags,
    /// Labels in scope, innermost last.  Rarely more than a couple.
    pub labels: SmallVec<[Label; 4]>,
    /// Labels directly attached to the statement about to be parsed.
    pub pending_labels: usize,
    pub iteration_depth: u32,
    pub breakable_depth: u32,
    /// Number of class bodies entered within this context; class code is
    /// always strict.
    pub class_depth: u32,
}

impl ParseContext {
    fn new(kind: ContextKind, strictness: Strictness, flags: ContextFlags) -> Self {
        Self {
            kind,
            strictness,
            pending_strict_error: None,
            flags,
            labels: SmallVec::new(),
            pending_labels: 0,
            iteration_depth: 0,
            breakable_depth: 0,
            class_depth: 0,
        }
    }

    /// Top-level context of a script or eval code.
    pub fn script(strict: bool, inherited: ContextFlags) -> Self {
        let strictness = if strict {
            Strictness::Strict
        } else {
            Strictness::Unknown
        };
        Self::new(ContextKind::Script, strictness, inherited)
    }

    /// Top-level context of a module.
    pub fn module(top_level_await: bool) -> Self {
        let mut flags = ContextFlags::AWAIT_RESERVED | ContextFlags::ARGUMENTS;
        if top_level_await {
            flags |= ContextFlags::AWAIT_ALLOWED | ContextFlags::ASYNC;
        }
        Self::new(ContextKind::Module, Strictness::Strict, flags)
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict || self.class_depth > 0
    }

    pub fn has(&self, flag: ContextFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Returns `true` for contexts that own a `return`-able body.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            ContextKind::Function | ContextKind::Arrow | ContextKind::Method
        )
    }

    pub fn find_label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().rev().find(|l| l.name == name)
    }
}

/// Stack of [`ParseContext`]s, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    contexts: Vec<ParseContext>,
    /// Code of every context is module code (`await` is always reserved).
    module: bool,
}

impl ContextStack {
    pub fn new(root: ParseContext) -> Self {
        let module = root.kind == ContextKind::Module;
        Self {
            contexts: vec![root],
            module,
        }
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn current(&self) -> &ParseContext {
        // The root context is never popped while parsing.
        &self.contexts[self.contexts.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut ParseContext {
        let last = self.contexts.len() - 1;
        &mut self.contexts[last]
    }

    pub fn is_strict(&self) -> bool {
        self.current().is_strict()
    }

    pub fn is_module(&self) -> bool {
        self.module
    }

    /// Kind of the innermost context that is not an arrow function.  Arrows
    /// see `arguments` and `new.target` of that context.
    pub fn non_arrow_kind(&self) -> ContextKind {
        self.contexts
            .iter()
            .rev()
            .map(|c| c.kind)
            .find(|&kind| kind != ContextKind::Arrow)
            .unwrap_or(ContextKind::Script)
    }

    /// Enter a function-like construct.
    pub fn push_function(&mut self, traits: FunctionTraits) {
        let parent = self.current();
        let strictness = if parent.is_strict() {
            Strictness::Strict
        } else {
            Strictness::Unknown
        };
        let mut flags = match traits.kind {
            ContextKind::Arrow => {
                let inherited = parent.flags
                    & (ContextFlags::YIELD_RESERVED
                        | ContextFlags::AWAIT_RESERVED
                        | ContextFlags::SUPER_CALL
                        | ContextFlags::SUPER_PROPERTY
                        | ContextFlags::NEW_TARGET
                        | ContextFlags::ARGUMENTS);
                inherited | ContextFlags::RETURN
            }
            ContextKind::ClassField => {
                (parent.flags & ContextFlags::AWAIT_RESERVED)
                    | ContextFlags::NEW_TARGET
                    | ContextFlags::SUPER_PROPERTY
            }
            ContextKind::ClassStaticBlock => {
                ContextFlags::AWAIT_RESERVED
                    | ContextFlags::NEW_TARGET
                    | ContextFlags::SUPER_PROPERTY
            }
            _ => ContextFlags::RETURN | ContextFlags::NEW_TARGET | ContextFlags::ARGUMENTS,
        };
        if traits.generator {
            flags |= ContextFlags::YIELD_RESERVED
                | ContextFlags::YIELD_ALLOWED
                | ContextFlags::GENERATOR;
        }
        if traits.is_async {
            flags |= ContextFlags::AWAIT_RESERVED
                | ContextFlags::AWAIT_ALLOWED
                | ContextFlags::ASYNC;
        }
        if traits.super_call {
            flags |= ContextFlags::SUPER_CALL;
        }
        if traits.super_property {
            flags |= ContextFlags::SUPER_PROPERTY;
        }
        if self.module {
            flags |= ContextFlags::AWAIT_RESERVED;
        }
        tracing::trace!(kind = ?traits.kind, ?strictness, "enter parse context");
        self.contexts.push(ParseContext::new(traits.kind, strictness, flags));
    }

    /// Leave the innermost context.  An unresolved pending strict error is
    /// handed to the parent.
    pub fn pop(&mut self) -> Option<ParseContext> {
        if self.contexts.len() <= 1 {
            return None;
        }
        let mut ctx = self.contexts.pop()?;
        if ctx.strictness == Strictness::Unknown
            && let Some(err) = ctx.pending_strict_error.take()
        {
            let parent = self.current_mut();
            if parent.strictness == Strictness::Unknown && parent.pending_strict_error.is_none() {
                tracing::trace!(
                    message = %err.message,
                    "defer strict-mode error to enclosing context"
                );
                parent.pending_strict_error = Some(err);
            }
        }
        Some(ctx)
    }

    /// Report a violation that is only an error in strict code.
    pub fn report_strict_violation(&mut self, err: ParserError) -> ParseResult<()> {
        let ctx = self.current_mut();
        if ctx.is_strict() {
            return Err(err);
        }
        if ctx.strictness == Strictness::Unknown && ctx.pending_strict_error.is_none() {
            tracing::trace!(message = %err.message, "buffer strict-mode error");
            ctx.pending_strict_error = Some(err);
        }
        Ok(())
    }

    /// Fix the current context's strictness once its directive prologue has
    /// been read.  `use_strict` is `true` when a `"use strict"` directive was
    /// found.
    pub fn resolve_strictness(&mut self, use_strict: bool) -> ParseResult<()> {
        let parent_unknown = self.contexts.len() > 1
            && self.contexts[self.contexts.len() - 2].strictness == Strictness::Unknown;
        let ctx = self.current_mut();
        if use_strict {
            ctx.strictness = Strictness::Strict;
            tracing::trace!(kind = ?ctx.kind, "context resolved strict");
            if let Some(err) = ctx.pending_strict_error.take() {
                return Err(err);
            }
        } else if ctx.strictness == Strictness::Unknown && !parent_unknown {
            ctx.strictness = Strictness::NonStrict;
            ctx.pending_strict_error = None;
            tracing::trace!(kind = ?ctx.kind, "context resolved non-strict");
        }
        Ok(())
    }

    /// Mark `flag` on the current context for the duration of a parameter
    /// list or similar region; returns the previous flags for restoring.
    pub fn set_flag(&mut self, flag: ContextFlags, on: bool) -> ContextFlags {
        let ctx = self.current_mut();
        let previous = ctx.flags;
        ctx.flags.set(flag, on);
        previous
    }

    pub fn restore_flags(&mut self, flags: ContextFlags) {
        self.current_mut().flags = flags;
    }

    /// Find `name` among the labels visible in the current function.
    pub fn find_label(&self, name: &str) -> Option<&Label> {
        self.current().find_label(name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Class accumulator
// ─────────────────────────────────────────────────────────────────────────────

/// How a private name was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateNameKind {
    Field,
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateDeclaration {
    pub name: String,
    pub kind: PrivateNameKind,
    pub is_static: bool,
    pub loc: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateReference {
    pub name: String,
    pub loc: Span,
}

/// Members and private names collected while a class body is parsed.
#[derive(Debug, Clone, Default)]
pub struct ClassParseContext {
    /// The class has an `extends` clause.
    pub derived: bool,
    pub declarations: Vec<PrivateDeclaration>,
    /// Private names used but not (yet) known to be declared.
    pub references: Vec<PrivateReference>,
    pub constructors: Vec<Span>,
    pub call_constructors: Vec<Span>,
}

impl ClassParseContext {
    pub fn new(derived: bool) -> Self {
        Self {
            derived,
            ..Self::default()
        }
    }

    pub fn declares(&self, name: &str) -> bool {
        self.declarations.iter().any(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageKey;

    fn violation(line: u32) -> ParserError {
        ParserError::syntax("t.js", line, 1, MessageKey::StrictWith, vec![])
    }

    fn sloppy_script() -> ContextStack {
        ContextStack::new(ParseContext::script(false, ContextFlags::ARGUMENTS))
    }

    #[test]
    fn test_violation_buffered_then_raised_on_use_strict() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::function(false, false));
        stack.report_strict_violation(violation(1)).unwrap();
        let err = stack.resolve_strictness(true).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_violation_discarded_when_non_strict() {
        let mut stack = sloppy_script();
        stack.resolve_strictness(false).unwrap();
        stack.push_function(FunctionTraits::function(false, false));
        stack.report_strict_violation(violation(1)).unwrap();
        stack.resolve_strictness(false).unwrap();
        assert_eq!(stack.current().strictness, Strictness::NonStrict);
        assert!(stack.current().pending_strict_error.is_none());
    }

    #[test]
    fn test_only_first_pending_violation_is_kept() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::function(false, false));
        stack.report_strict_violation(violation(1)).unwrap();
        stack.report_strict_violation(violation(2)).unwrap();
        let err = stack.resolve_strictness(true).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_unresolved_violation_handed_to_parent() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::function(false, false));
        // An arrow in the parameter list of a function whose strictness is
        // still unknown cannot resolve on its own.
        stack.push_function(FunctionTraits::arrow(false));
        stack.report_strict_violation(violation(3)).unwrap();
        stack.resolve_strictness(false).unwrap();
        assert_eq!(stack.current().strictness, Strictness::Unknown);
        stack.pop();
        let err = stack.resolve_strictness(true).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_strict_context_raises_immediately() {
        let mut stack = ContextStack::new(ParseContext::module(true));
        assert!(stack.report_strict_violation(violation(1)).is_err());
        stack.push_function(FunctionTraits::function(false, false));
        assert_eq!(stack.current().strictness, Strictness::Strict);
    }

    #[test]
    fn test_class_depth_makes_code_strict() {
        let mut stack = sloppy_script();
        stack.resolve_strictness(false).unwrap();
        stack.current_mut().class_depth += 1;
        assert!(stack.is_strict());
        assert!(stack.report_strict_violation(violation(1)).is_err());
    }

    #[test]
    fn test_generator_and_async_capabilities() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::function(true, true));
        let ctx = stack.current();
        assert!(ctx.has(ContextFlags::YIELD_ALLOWED));
        assert!(ctx.has(ContextFlags::AWAIT_ALLOWED));
        assert!(ctx.has(ContextFlags::RETURN));
        assert!(!ctx.has(ContextFlags::SUPER_PROPERTY));
    }

    #[test]
    fn test_arrow_inherits_reservation_but_not_yield_expressions() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::method(true, false, true));
        stack.push_function(FunctionTraits::arrow(false));
        let ctx = stack.current();
        assert!(ctx.has(ContextFlags::YIELD_RESERVED));
        assert!(!ctx.has(ContextFlags::YIELD_ALLOWED));
        assert!(ctx.has(ContextFlags::SUPER_CALL));
        assert!(ctx.has(ContextFlags::SUPER_PROPERTY));
    }

    #[test]
    fn test_nested_function_resets_capabilities() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits::function(true, true));
        stack.push_function(FunctionTraits::function(false, false));
        let ctx = stack.current();
        assert!(!ctx.has(ContextFlags::YIELD_RESERVED));
        assert!(!ctx.has(ContextFlags::AWAIT_RESERVED));
    }

    #[test]
    fn test_class_field_disallows_arguments_and_return() {
        let mut stack = sloppy_script();
        stack.push_function(FunctionTraits {
            kind: ContextKind::ClassField,
            generator: false,
            is_async: false,
            super_call: false,
            super_property: true,
        });
        let ctx = stack.current();
        assert!(!ctx.has(ContextFlags::ARGUMENTS));
        assert!(!ctx.has(ContextFlags::RETURN));
        assert!(ctx.has(ContextFlags::NEW_TARGET));

        stack.push_function(FunctionTraits::arrow(false));
        assert!(!stack.current().has(ContextFlags::ARGUMENTS));
        assert_eq!(stack.non_arrow_kind(), ContextKind::ClassField);
    }

    #[test]
    fn test_module_reserves_await_everywhere() {
        let mut stack = ContextStack::new(ParseContext::module(false));
        stack.push_function(FunctionTraits::function(false, false));
        assert!(stack.current().has(ContextFlags::AWAIT_RESERVED));
        assert!(!stack.current().has(ContextFlags::AWAIT_ALLOWED));
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut stack = sloppy_script();
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 1);
    }
}
