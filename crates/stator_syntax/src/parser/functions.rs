//! Functions, methods and arrow functions.
//!
//! Every function-like construct pushes a parse context and two scopes: the
//! parameter scope and, below it, the body scope.  The early errors that
//! need the whole function are checked in `early_errors` before the context
//! is popped.

use crate::error::ParseResult;
use crate::messages::MessageKey;
use crate::options::Features;

use super::Parser;
use super::ast::{
    BindingIdent, Expr, Function, FunctionBody, FunctionKind, FunctionSyntax, Param, Pat,
    RestElement, SourceText, StandaloneFunction, Stmt,
};
use super::context::{ContextFlags, ContextStack, FunctionTraits, ParseContext};
use super::patterns::{BindingKind, IdentUse, is_identifier_kind};
use super::scanner::{Position, Scanner, Span, TokenKind};
use super::scope::{DeclarationKind, NameId, ScopeId, ScopeKind};

impl<'src> Parser<'src> {
    // ── Declarations and expressions ────────────────────────────────────────

    /// `function` declaration.  The current token is `function` (any
    /// `async` has been consumed).  `anonymous_ok` is set for
    /// `export default function () {}`.
    pub(crate) fn parse_function_declaration(
        &mut self,
        start: Position,
        is_async: bool,
        anonymous_ok: bool,
    ) -> ParseResult<Function> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let kind = FunctionKind::new(is_async, is_generator);
        let id = if is_identifier_kind(self.kind()) {
            let (name, loc) = self.parse_identifier(IdentUse::Binding)?;
            let binding = self.declare_function_name(&name, loc, kind)?;
            Some(BindingIdent { loc, name, binding })
        } else if anonymous_ok {
            None
        } else {
            return Err(self.unexpected());
        };

        self.contexts
            .push_function(FunctionTraits::function(is_generator, is_async));
        let result = self.parse_function_after_name(start, id, kind, FunctionSyntax::Declaration);
        self.contexts.pop();
        result
    }

    /// `function` expression.  The current token is `function`.
    pub(crate) fn parse_function_literal(
        &mut self,
        start: Position,
        is_async: bool,
        syntax: FunctionSyntax,
    ) -> ParseResult<Function> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let kind = FunctionKind::new(is_async, is_generator);
        self.contexts
            .push_function(FunctionTraits::function(is_generator, is_async));
        let result = self.parse_function_after_name(start, None, kind, syntax);
        self.contexts.pop();
        result
    }

    fn parse_function_after_name(
        &mut self,
        start: Position,
        declared: Option<BindingIdent>,
        kind: FunctionKind,
        syntax: FunctionSyntax,
    ) -> ParseResult<Function> {
        let param_scope = self.enter_scope(ScopeKind::Parameter, start);
        let id = match declared {
            Some(id) => {
                self.check_function_name_strictness(&id.name, id.loc.start)?;
                Some(id)
            }
            None if is_identifier_kind(self.kind()) => {
                // An expression's name is bound inside the function and
                // checked against the function's own yield/await rules.
                let (name, loc) = self.parse_identifier(IdentUse::Binding)?;
                let binding = self.scopes.declare_self_binding(param_scope, &name, loc);
                Some(BindingIdent { loc, name, binding })
            }
            None => None,
        };
        self.parse_function_tail(start, id, kind, syntax, param_scope)
    }

    /// Declare a function declaration's name in the enclosing scope: as a
    /// `var` at the top level of scripts and functions, lexically elsewhere.
    fn declare_function_name(
        &mut self,
        name: &str,
        loc: Span,
        kind: FunctionKind,
    ) -> ParseResult<NameId> {
        let scope = self.scope;
        let declared = match self.scopes.scope(scope).kind {
            ScopeKind::Script | ScopeKind::Function => {
                self.scopes
                    .declare_var(scope, name, loc, DeclarationKind::Function)
            }
            _ => {
                let sloppy_duplicate = !self.is_strict()
                    && kind == FunctionKind::Normal
                    && self.has_feature(Features::ANNEX_B);
                self.scopes.declare_lexical(
                    scope,
                    name,
                    loc,
                    DeclarationKind::Function,
                    sloppy_duplicate,
                )
            }
        };
        declared.map_err(|_| self.redeclaration(name, loc))
    }

    /// Object-literal or class method, accessor or constructor.  The current
    /// token is the `(` of the parameter list.
    pub(crate) fn parse_method(
        &mut self,
        start: Position,
        kind: FunctionKind,
        syntax: FunctionSyntax,
        super_call: bool,
    ) -> ParseResult<Function> {
        self.contexts.push_function(FunctionTraits::method(
            kind.is_generator(),
            kind.is_async(),
            super_call,
        ));
        let param_scope = self.enter_scope(ScopeKind::Parameter, self.start());
        let result = self.parse_function_tail(start, None, kind, syntax, param_scope);
        self.contexts.pop();
        result
    }

    /// Parameters and block body of a function whose context and parameter
    /// scope are already set up.
    fn parse_function_tail(
        &mut self,
        start: Position,
        id: Option<BindingIdent>,
        kind: FunctionKind,
        syntax: FunctionSyntax,
        parameter_scope: ScopeId,
    ) -> ParseResult<Function> {
        let saved_duplicate = self.duplicate_parameter.take();
        let params_start = self.start();
        self.expect(TokenKind::LeftParen)?;
        let params = self.parse_parameter_list(TokenKind::RightParen)?;
        self.expect(TokenKind::RightParen)?;
        self.check_accessor_arity(params_start, syntax, &params)?;

        let simple_parameters = is_simple_parameter_list(&params);
        let (body, body_scope) = self.parse_function_body(simple_parameters)?;
        self.leave_scope(parameter_scope);

        let function = Function {
            loc: self.span_from(start),
            id,
            kind,
            syntax,
            params,
            body: FunctionBody::Block(body),
            strict: self.is_strict(),
            simple_parameters,
            parameter_scope,
            body_scope,
            source: SourceText::Span(self.span_from(start)),
        };
        let duplicate = std::mem::replace(&mut self.duplicate_parameter, saved_duplicate);
        self.check_function(&function, duplicate)?;
        Ok(function)
    }

    fn check_accessor_arity(
        &self,
        at: Position,
        syntax: FunctionSyntax,
        params: &[Param],
    ) -> ParseResult<()> {
        match syntax {
            FunctionSyntax::Getter if !params.is_empty() => {
                Err(self.error_at(at, MessageKey::GetterArity, vec![]))
            }
            FunctionSyntax::Setter
                if params.len() != 1 || matches!(params[0].pat, Pat::Rest(_)) =>
            {
                Err(self.error_at(at, MessageKey::SetterArity, vec![]))
            }
            _ => Ok(()),
        }
    }

    /// Formal parameters up to (not including) `close`.
    pub(crate) fn parse_parameter_list(&mut self, close: TokenKind) -> ParseResult<Vec<Param>> {
        let saved = self.contexts.set_flag(ContextFlags::IN_PARAMETERS, true);
        let result = self.allow_in(|p| {
            let mut params = Vec::new();
            while !p.at(close) {
                let param_start = p.start();
                if p.eat(TokenKind::DotDotDot)? {
                    let argument = p.parse_binding_target(BindingKind::Parameter)?;
                    let loc = p.span_from(param_start);
                    params.push(Param {
                        loc,
                        pat: Pat::Rest(Box::new(RestElement {
                            loc,
                            argument: Box::new(argument),
                        })),
                        default: None,
                    });
                    if !p.at(close) {
                        return Err(p.rest_not_last(close)?);
                    }
                    break;
                }
                let pat = p.parse_binding_target(BindingKind::Parameter)?;
                let default = if p.eat(TokenKind::Equal)? {
                    Some(p.parse_assignment()?)
                } else {
                    None
                };
                params.push(Param {
                    loc: p.span_from(param_start),
                    pat,
                    default,
                });
                if !p.at(close) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            Ok(params)
        });
        self.contexts.restore_flags(saved);
        result
    }

    /// `{ FunctionBody }` in a new function-body scope.
    fn parse_function_body(
        &mut self,
        simple_parameters: bool,
    ) -> ParseResult<(Vec<Stmt>, ScopeId)> {
        let body_start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let body_scope = self.enter_scope(ScopeKind::Function, body_start);
        let body = self.allow_in(|p| {
            p.parse_body_statements(body_start, simple_parameters, TokenKind::RightBrace)
        })?;
        self.expect(TokenKind::RightBrace)?;
        self.leave_scope(body_scope);
        Ok((body, body_scope))
    }

    /// Directive prologue and statements up to `close`.
    fn parse_body_statements(
        &mut self,
        body_start: Position,
        simple_parameters: bool,
        close: TokenKind,
    ) -> ParseResult<Vec<Stmt>> {
        let (mut body, use_strict) = self.parse_directive_prologue()?;
        if use_strict && !simple_parameters {
            return Err(self.error_at(body_start, MessageKey::UseStrictNonSimpleParameters, vec![]));
        }
        while !self.at(close) {
            body.push(self.parse_statement_list_item()?);
        }
        Ok(body)
    }

    // ── Arrow functions ─────────────────────────────────────────────────────

    /// Arrow function starting at `start`: `x => …`, `(…) => …`, or the
    /// same preceded by `async`.
    pub(crate) fn parse_arrow_function(
        &mut self,
        start: Position,
        is_async: bool,
    ) -> ParseResult<Expr> {
        if is_async {
            self.advance()?;
        }
        self.contexts.push_function(FunctionTraits::arrow(is_async));
        let result = self.parse_arrow_inner(start, FunctionKind::new(is_async, false));
        self.contexts.pop();
        Ok(Expr::Arrow(Box::new(result?)))
    }

    fn parse_arrow_inner(&mut self, start: Position, kind: FunctionKind) -> ParseResult<Function> {
        let parameter_scope = self.enter_scope(ScopeKind::Parameter, start);
        let saved_duplicate = self.duplicate_parameter.take();
        let params = if self.eat(TokenKind::LeftParen)? {
            let params = self.parse_parameter_list(TokenKind::RightParen)?;
            self.expect(TokenKind::RightParen)?;
            params
        } else {
            let saved = self.contexts.set_flag(ContextFlags::IN_PARAMETERS, true);
            let id = self.parse_binding_identifier(BindingKind::Parameter);
            self.contexts.restore_flags(saved);
            let id = id?;
            vec![Param {
                loc: id.loc,
                pat: Pat::Ident(id),
                default: None,
            }]
        };
        if !self.at(TokenKind::Arrow) {
            return Err(self.unexpected());
        }
        if self.tok().had_line_terminator_before {
            return Err(self.error_here(MessageKey::NewlineBeforeArrow, vec![]));
        }
        self.advance()?;

        let simple_parameters = is_simple_parameter_list(&params);
        let (body, body_scope) = if self.at(TokenKind::LeftBrace) {
            let (body, scope) = self.parse_function_body(simple_parameters)?;
            (FunctionBody::Block(body), scope)
        } else {
            let body_scope = self.enter_scope(ScopeKind::Function, self.start());
            self.contexts.resolve_strictness(false)?;
            let expr = self.parse_assignment()?;
            self.leave_scope(body_scope);
            (FunctionBody::Expr(Box::new(expr)), body_scope)
        };
        self.leave_scope(parameter_scope);

        let function = Function {
            loc: self.span_from(start),
            id: None,
            kind,
            syntax: FunctionSyntax::Arrow,
            params,
            body,
            strict: self.is_strict(),
            simple_parameters,
            parameter_scope,
            body_scope,
            source: SourceText::Span(self.span_from(start)),
        };
        let duplicate = std::mem::replace(&mut self.duplicate_parameter, saved_duplicate);
        self.check_function(&function, duplicate)?;
        Ok(function)
    }

    // ── Function constructor ────────────────────────────────────────────────

    /// Parse the parameter text this parser was created over together with
    /// `body` as the pieces of a dynamically created function
    /// (`new Function(params, body)`).
    ///
    /// The two texts are scanned separately, so neither can close the other
    /// early.
    pub fn parse_standalone_function(
        mut self,
        body: &'src str,
        kind: FunctionKind,
    ) -> ParseResult<StandaloneFunction> {
        tracing::debug!(source = %self.options.source_name, ?kind, "parse standalone function");
        let params_text = self.scanner.source();
        self.contexts = ContextStack::new(ParseContext::script(false, ContextFlags::ARGUMENTS));
        let origin = self.scanner.current().span.start;
        let root = self
            .scopes
            .push_scope(ScopeKind::Script, None, Span::new(origin, origin));
        self.scope = root;
        self.contexts.push_function(FunctionTraits::function(
            kind.is_generator(),
            kind.is_async(),
        ));
        let result = self.parse_standalone_inner(body, kind);
        self.contexts.pop();
        let function = result?;

        self.check_unresolved_private_names()?;
        let end = self.scanner.current().span.end;
        self.scopes.close_scope(root, Span::new(end, end));
        self.scopes.resolve_all(false);
        let keyword = match kind {
            FunctionKind::Normal => "function",
            FunctionKind::Generator => "function*",
            FunctionKind::Async => "async function",
            FunctionKind::AsyncGenerator => "async function*",
        };
        Ok(StandaloneFunction {
            function: Function {
                source: SourceText::Synthetic(format!(
                    "{keyword} anonymous({params_text}\n) {{\n{body}\n}}"
                )),
                ..function
            },
            scopes: self.scopes,
        })
    }

    fn parse_standalone_inner(
        &mut self,
        body: &'src str,
        kind: FunctionKind,
    ) -> ParseResult<Function> {
        let start = self.scanner.current().span.start;
        let parameter_scope = self.enter_scope(ScopeKind::Parameter, start);
        self.advance()?;
        let params = self.parse_parameter_list(TokenKind::Eof)?;
        let simple_parameters = is_simple_parameter_list(&params);

        self.scanner = Scanner::new(body, &self.options, false);
        self.advance()?;
        let body_start = self.start();
        let body_scope = self.enter_scope(ScopeKind::Function, body_start);
        let statements = self.parse_body_statements(body_start, simple_parameters, TokenKind::Eof)?;
        self.leave_scope(body_scope);
        self.leave_scope(parameter_scope);

        let function = Function {
            loc: self.span_from(body_start),
            id: None,
            kind,
            syntax: FunctionSyntax::Standalone,
            params,
            body: FunctionBody::Block(statements),
            strict: self.is_strict(),
            simple_parameters,
            parameter_scope,
            body_scope,
            source: SourceText::Synthetic(String::new()),
        };
        let duplicate = self.duplicate_parameter.take();
        self.check_function(&function, duplicate)?;
        Ok(function)
    }
}

fn is_simple_parameter_list(params: &[Param]) -> bool {
    params.iter().all(|p| p.default.is_none() && p.pat.is_simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::NullLit;

    fn param(pat: Pat, default: bool) -> Param {
        Param {
            loc: Span::default(),
            pat,
            default: default.then(|| Expr::Null(NullLit { loc: Span::default() })),
        }
    }

    fn ident(name: &str) -> Pat {
        Pat::Ident(BindingIdent {
            loc: Span::default(),
            name: name.to_string(),
            binding: 0,
        })
    }

    #[test]
    fn test_simple_parameter_list() {
        assert!(is_simple_parameter_list(&[]));
        assert!(is_simple_parameter_list(&[param(ident("a"), false), param(ident("b"), false)]));
        assert!(!is_simple_parameter_list(&[param(ident("a"), true)]));
        let rest = Pat::Rest(Box::new(RestElement {
            loc: Span::default(),
            argument: Box::new(ident("r")),
        }));
        assert!(!is_simple_parameter_list(&[param(rest, false)]));
    }
}
