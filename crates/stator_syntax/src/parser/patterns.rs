//! Identifiers, bindings and patterns.
//!
//! Binding patterns (`var [a, {b}] = …`, parameters, catch parameters) are
//! parsed directly and declare their names as they go.  Assignment patterns
//! (`[a, b.c] = …`) are first parsed as array/object literals and converted
//! here once the `=` (or a for-in/of keyword) shows that a pattern was meant.

use crate::error::ParseResult;
use crate::messages::MessageKey;

use super::Parser;
use super::ast::{
    ArrayPat, AssignOp, AssignPat, AssignPatProp, AssignTarget, BindingIdent, Expr, Ident,
    KeyValuePatProp, ObjectPat, ObjectPatProp, ObjectProp, Pat, PropKey, PropValue, RestElement,
};
use super::context::{ContextFlags, ContextKind};
use super::scanner::{Position, Span, TokenKind, keyword_kind};
use super::scope::{DeclarationKind, NameId};

/// How a binding pattern's names are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Var,
    Let,
    Const,
    Parameter,
    CatchParameter,
}

impl BindingKind {
    fn is_lexical(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Const)
    }
}

/// The role an identifier occurrence plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdentUse {
    Reference,
    Binding,
    Label,
}

/// Tokens that can spell an identifier (possibly one that is reserved in
/// the current context).
pub(crate) fn is_identifier_kind(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Let
            | TokenKind::Static
            | TokenKind::Yield
            | TokenKind::Await
            | TokenKind::EscapedKeyword
    )
}

const STRICT_RESERVED: &[&str] = &[
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
];

impl Parser<'_> {
    // ── Identifiers ─────────────────────────────────────────────────────────

    /// Consume an identifier token and validate it for `usage`.
    pub(crate) fn parse_identifier(&mut self, usage: IdentUse) -> ParseResult<(String, Span)> {
        let tok = self.tok();
        if !is_identifier_kind(tok.kind) {
            return Err(self.unexpected());
        }
        let name = tok.text().to_string();
        let span = tok.span;
        if tok.kind == TokenKind::EscapedKeyword {
            return Err(self.error_here(MessageKey::InvalidEscapedKeyword, vec![name]));
        }
        self.check_identifier(&name, span.start, usage)?;
        self.advance()?;
        Ok((name, span))
    }

    /// Validate `name` as an identifier in the current context.
    pub(crate) fn check_identifier(
        &mut self,
        name: &str,
        at: Position,
        usage: IdentUse,
    ) -> ParseResult<()> {
        match name {
            "yield" => {
                if self.has_flag(ContextFlags::YIELD_RESERVED) {
                    let key = if self.has_flag(ContextFlags::IN_PARAMETERS) {
                        MessageKey::YieldInParameter
                    } else {
                        MessageKey::InvalidYield
                    };
                    return Err(self.error_at(at, key, vec![]));
                }
                self.report_strict(at, MessageKey::StrictReservedWord, vec![name.to_string()])
            }
            "await" => {
                if self.has_flag(ContextFlags::AWAIT_RESERVED) {
                    let key = if self.has_flag(ContextFlags::IN_PARAMETERS)
                        && self.has_flag(ContextFlags::ASYNC)
                    {
                        MessageKey::AwaitInParameter
                    } else {
                        MessageKey::InvalidAwait
                    };
                    return Err(self.error_at(at, key, vec![]));
                }
                Ok(())
            }
            "eval" | "arguments" => {
                if usage == IdentUse::Binding {
                    return self.report_strict(
                        at,
                        MessageKey::StrictEvalArguments,
                        vec![name.to_string()],
                    );
                }
                if name == "arguments"
                    && usage == IdentUse::Reference
                    && !self.has_flag(ContextFlags::ARGUMENTS)
                {
                    let key = match self.contexts.non_arrow_kind() {
                        ContextKind::ClassField | ContextKind::ClassStaticBlock => {
                            MessageKey::ArgumentsNotAllowed
                        }
                        _ => MessageKey::ArgumentsInFieldEval,
                    };
                    return Err(self.error_at(at, key, vec![]));
                }
                Ok(())
            }
            _ if STRICT_RESERVED.contains(&name) => {
                self.report_strict(at, MessageKey::StrictReservedWord, vec![name.to_string()])
            }
            _ if keyword_kind(name).is_some() => {
                Err(self.error_at(at, MessageKey::ReservedWord, vec![name.to_string()]))
            }
            _ => Ok(()),
        }
    }

    /// Re-check a function's own name once the function's strictness is
    /// known: only the strict-mode restrictions apply.
    pub(crate) fn check_function_name_strictness(
        &mut self,
        name: &str,
        at: Position,
    ) -> ParseResult<()> {
        match name {
            "eval" | "arguments" => {
                self.report_strict(at, MessageKey::StrictEvalArguments, vec![name.to_string()])
            }
            "yield" => {
                self.report_strict(at, MessageKey::StrictReservedWord, vec![name.to_string()])
            }
            _ if STRICT_RESERVED.contains(&name) => {
                self.report_strict(at, MessageKey::StrictReservedWord, vec![name.to_string()])
            }
            _ => Ok(()),
        }
    }

    // ── Declarations ────────────────────────────────────────────────────────

    /// Declare `name` in the current scope.
    pub(crate) fn declare_binding(
        &mut self,
        name: &str,
        loc: Span,
        kind: BindingKind,
    ) -> ParseResult<NameId> {
        if kind.is_lexical() && name == "let" {
            return Err(self.error_at(loc.start, MessageKey::LetLexicallyBound, vec![]));
        }
        let scope = self.scope;
        let declared = match kind {
            BindingKind::Var => self
                .scopes
                .declare_var(scope, name, loc, DeclarationKind::Var),
            BindingKind::Let => {
                self.scopes
                    .declare_lexical(scope, name, loc, DeclarationKind::Let, false)
            }
            BindingKind::Const => {
                self.scopes
                    .declare_lexical(scope, name, loc, DeclarationKind::Const, false)
            }
            BindingKind::CatchParameter => self.scopes.declare_lexical(
                scope,
                name,
                loc,
                DeclarationKind::CatchParameter,
                false,
            ),
            BindingKind::Parameter => {
                let (id, previous) = self.scopes.declare_parameter(scope, name, loc);
                if previous.is_some() && self.duplicate_parameter.is_none() {
                    self.duplicate_parameter = Some((name.to_string(), loc));
                }
                Ok(id)
            }
        };
        declared.map_err(|_| self.redeclaration(name, loc))
    }

    pub(crate) fn redeclaration(&self, name: &str, loc: Span) -> crate::error::ParserError {
        self.error_at(
            loc.start,
            MessageKey::VariableRedeclaration,
            vec![name.to_string()],
        )
    }

    /// Parse and declare a single binding identifier.
    pub(crate) fn parse_binding_identifier(
        &mut self,
        kind: BindingKind,
    ) -> ParseResult<BindingIdent> {
        let (name, loc) = self.parse_identifier(IdentUse::Binding)?;
        let binding = self.declare_binding(&name, loc, kind)?;
        Ok(BindingIdent { loc, name, binding })
    }

    // ── Binding patterns ────────────────────────────────────────────────────

    /// `BindingIdentifier | ArrayBindingPattern | ObjectBindingPattern`
    pub(crate) fn parse_binding_target(&mut self, kind: BindingKind) -> ParseResult<Pat> {
        self.nested(|p| match p.kind() {
            TokenKind::LeftBracket => p.parse_array_binding(kind),
            TokenKind::LeftBrace => p.parse_object_binding(kind),
            _ => Ok(Pat::Ident(p.parse_binding_identifier(kind)?)),
        })
    }

    /// A binding target with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self, kind: BindingKind) -> ParseResult<Pat> {
        let start = self.start();
        let target = self.parse_binding_target(kind)?;
        if self.eat(TokenKind::Equal)? {
            let right = self.allow_in(|p| p.parse_assignment())?;
            return Ok(Pat::Assign(Box::new(AssignPat {
                loc: self.span_from(start),
                left: Box::new(target),
                right: Box::new(right),
            })));
        }
        Ok(target)
    }

    /// Error for anything but the closing token after a rest element.
    pub(crate) fn rest_not_last(
        &mut self,
        close: TokenKind,
    ) -> ParseResult<crate::error::ParserError> {
        if self.at(TokenKind::Comma) && self.peek_kind()? == close {
            return Ok(self.error_here(MessageKey::RestTrailingComma, vec![]));
        }
        if self.at(TokenKind::Equal) {
            return Ok(self.error_here(MessageKey::RestInitializer, vec![]));
        }
        Ok(self.error_here(MessageKey::RestElementNotLast, vec![]))
    }

    fn parse_array_binding(&mut self, kind: BindingKind) -> ParseResult<Pat> {
        let start = self.start();
        self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        loop {
            if self.eat(TokenKind::RightBracket)? {
                break;
            }
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                let rest_start = self.start();
                self.advance()?;
                let argument = self.parse_binding_target(kind)?;
                elements.push(Some(Pat::Rest(Box::new(RestElement {
                    loc: self.span_from(rest_start),
                    argument: Box::new(argument),
                }))));
                if !self.at(TokenKind::RightBracket) {
                    return Err(self.rest_not_last(TokenKind::RightBracket)?);
                }
                self.advance()?;
                break;
            }
            elements.push(Some(self.parse_binding_element(kind)?));
            if !self.at(TokenKind::RightBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Array(Box::new(ArrayPat {
            loc: self.span_from(start),
            elements,
        })))
    }

    fn parse_object_binding(&mut self, kind: BindingKind) -> ParseResult<Pat> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        loop {
            if self.eat(TokenKind::RightBrace)? {
                break;
            }
            let prop_start = self.start();
            if self.eat(TokenKind::DotDotDot)? {
                let id = self.parse_binding_identifier(kind)?;
                properties.push(ObjectPatProp::Rest(RestElement {
                    loc: self.span_from(prop_start),
                    argument: Box::new(Pat::Ident(id)),
                }));
                if !self.at(TokenKind::RightBrace) {
                    return Err(self.rest_not_last(TokenKind::RightBrace)?);
                }
                self.advance()?;
                break;
            }
            let key_kind = self.kind();
            let key = self.parse_property_key()?;
            if self.eat(TokenKind::Colon)? {
                let value = self.parse_binding_element(kind)?;
                properties.push(ObjectPatProp::KeyValue(KeyValuePatProp {
                    loc: self.span_from(prop_start),
                    key,
                    value,
                }));
            } else {
                let PropKey::Ident(key) = key else {
                    return Err(self.unexpected());
                };
                if !is_identifier_kind(key_kind) || key_kind == TokenKind::EscapedKeyword {
                    return Err(self.error_at(
                        key.loc.start,
                        MessageKey::ReservedWord,
                        vec![key.name.clone()],
                    ));
                }
                self.check_identifier(&key.name, key.loc.start, IdentUse::Binding)?;
                let binding = self.declare_binding(&key.name, key.loc, kind)?;
                let target = Pat::Ident(BindingIdent {
                    loc: key.loc,
                    name: key.name.clone(),
                    binding,
                });
                let value = if self.eat(TokenKind::Equal)? {
                    Some(Box::new(self.allow_in(|p| p.parse_assignment())?))
                } else {
                    None
                };
                properties.push(ObjectPatProp::Assign(AssignPatProp {
                    loc: self.span_from(prop_start),
                    key,
                    target: Box::new(target),
                    value,
                }));
            }
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Object(Box::new(ObjectPat {
            loc: self.span_from(start),
            properties,
        })))
    }

    // ── Assignment targets ──────────────────────────────────────────────────

    /// Check that `expr` is a valid simple assignment target.
    ///
    /// `eval` and `arguments` are strict-mode violations; anything that is
    /// not a reference is a ReferenceError.
    pub(crate) fn validate_simple_target(
        &mut self,
        expr: &Expr,
        key: MessageKey,
    ) -> ParseResult<()> {
        match expr {
            Expr::Ident(id) => {
                if id.name == "eval" || id.name == "arguments" {
                    self.report_strict(
                        id.loc.start,
                        MessageKey::StrictEvalArguments,
                        vec![id.name.clone()],
                    )?;
                }
                Ok(())
            }
            Expr::Member(_) | Expr::SuperMember(_) => Ok(()),
            Expr::Paren(p) => match &p.expr {
                Expr::Ident(_) | Expr::Member(_) | Expr::SuperMember(_) | Expr::Paren(_) => {
                    self.validate_simple_target(&p.expr, key)
                }
                _ => Err(self.reference_error_at(expr.loc().start, key)),
            },
            Expr::OptionalChain(_) => Err(self.error_at(expr.loc().start, key, vec![])),
            _ => Err(self.reference_error_at(expr.loc().start, key)),
        }
    }

    /// Reinterpret the left operand of `=` as an assignment target.
    pub(crate) fn to_assign_target(&mut self, expr: Expr) -> ParseResult<AssignTarget> {
        match expr {
            Expr::Array(_) | Expr::Object(_) => {
                Ok(AssignTarget::Pat(self.to_assignment_pattern(expr)?))
            }
            other => {
                self.validate_simple_target(&other, MessageKey::InvalidAssignmentTarget)?;
                Ok(AssignTarget::Expr(Box::new(other)))
            }
        }
    }

    /// Reinterpret an array or object literal as a destructuring pattern.
    pub(crate) fn to_assignment_pattern(&mut self, expr: Expr) -> ParseResult<Pat> {
        match expr {
            Expr::Array(array) => {
                let trailing_comma_after_spread =
                    self.spread_trailing_commas.contains(&array.loc.start.offset);
                let count = array.elements.len();
                let mut elements = Vec::with_capacity(count);
                for (index, element) in array.elements.into_iter().enumerate() {
                    let Some(element) = element else {
                        elements.push(None);
                        continue;
                    };
                    if let Expr::Spread(spread) = element {
                        if index + 1 != count || trailing_comma_after_spread {
                            let key = if index + 1 == count {
                                MessageKey::RestTrailingComma
                            } else {
                                MessageKey::RestElementNotLast
                            };
                            return Err(self.error_at(spread.loc.start, key, vec![]));
                        }
                        let argument = self.to_rest_target(*spread.argument, true)?;
                        elements.push(Some(Pat::Rest(Box::new(RestElement {
                            loc: spread.loc,
                            argument: Box::new(argument),
                        }))));
                    } else {
                        elements.push(Some(self.to_pattern_element(element)?));
                    }
                }
                Ok(Pat::Array(Box::new(ArrayPat {
                    loc: array.loc,
                    elements,
                })))
            }
            Expr::Object(object) => {
                let literal = object.loc.start.offset;
                self.pending_objects.retain(|p| p.literal != literal);
                let count = object.properties.len();
                let mut properties = Vec::with_capacity(count);
                for (index, prop) in object.properties.into_iter().enumerate() {
                    match prop {
                        ObjectProp::Spread(spread) => {
                            if index + 1 != count {
                                return Err(self.error_at(
                                    spread.loc.start,
                                    MessageKey::RestElementNotLast,
                                    vec![],
                                ));
                            }
                            let argument = self.to_rest_target(*spread.argument, false)?;
                            properties.push(ObjectPatProp::Rest(RestElement {
                                loc: spread.loc,
                                argument: Box::new(argument),
                            }));
                        }
                        ObjectProp::Prop(prop) => {
                            let prop = *prop;
                            let converted = match prop.value {
                                PropValue::Value(value) => ObjectPatProp::KeyValue(KeyValuePatProp {
                                    loc: prop.loc,
                                    key: prop.key,
                                    value: self.to_pattern_element(*value)?,
                                }),
                                PropValue::Shorthand(target) => {
                                    let target = Expr::Ident(target);
                                    self.validate_simple_target(
                                        &target,
                                        MessageKey::InvalidDestructuringTarget,
                                    )?;
                                    ObjectPatProp::Assign(AssignPatProp {
                                        loc: prop.loc,
                                        key: shorthand_key(&prop.key, &target),
                                        target: Box::new(Pat::Expr(Box::new(target))),
                                        value: None,
                                    })
                                }
                                PropValue::CoverInitialized { target, default } => {
                                    let target = Expr::Ident(target);
                                    self.validate_simple_target(
                                        &target,
                                        MessageKey::InvalidDestructuringTarget,
                                    )?;
                                    ObjectPatProp::Assign(AssignPatProp {
                                        loc: prop.loc,
                                        key: shorthand_key(&prop.key, &target),
                                        target: Box::new(Pat::Expr(Box::new(target))),
                                        value: Some(default),
                                    })
                                }
                                PropValue::Get(_) | PropValue::Set(_) | PropValue::Method(_) => {
                                    return Err(self.error_at(
                                        prop.loc.start,
                                        MessageKey::InvalidDestructuringTarget,
                                        vec![],
                                    ));
                                }
                            };
                            properties.push(converted);
                        }
                    }
                }
                Ok(Pat::Object(Box::new(ObjectPat {
                    loc: object.loc,
                    properties,
                })))
            }
            other => self.to_nested_target(other),
        }
    }

    /// An element of an array pattern or a property value of an object
    /// pattern: a target with an optional default.
    fn to_pattern_element(&mut self, expr: Expr) -> ParseResult<Pat> {
        match expr {
            Expr::Assign(assign) if assign.op == AssignOp::Assign => {
                let assign = *assign;
                let left = match assign.left {
                    AssignTarget::Pat(pat) => pat,
                    AssignTarget::Expr(target) => Pat::Expr(target),
                };
                Ok(Pat::Assign(Box::new(AssignPat {
                    loc: assign.loc,
                    left: Box::new(left),
                    right: assign.right,
                })))
            }
            Expr::Assign(assign) => Err(self.error_at(
                assign.loc.start,
                MessageKey::InvalidDestructuringTarget,
                vec![],
            )),
            other => self.to_nested_target(other),
        }
    }

    fn to_nested_target(&mut self, expr: Expr) -> ParseResult<Pat> {
        match expr {
            Expr::Array(_) | Expr::Object(_) => self.to_assignment_pattern(expr),
            Expr::Ident(_) | Expr::Member(_) | Expr::SuperMember(_) | Expr::Paren(_) => {
                self.validate_destructuring_target(&expr)?;
                Ok(Pat::Expr(Box::new(expr)))
            }
            other => Err(self.error_at(
                other.loc().start,
                MessageKey::InvalidDestructuringTarget,
                vec![],
            )),
        }
    }

    fn to_rest_target(&mut self, expr: Expr, allow_pattern: bool) -> ParseResult<Pat> {
        match expr {
            Expr::Assign(assign) => Err(self.error_at(
                assign.loc.start,
                MessageKey::RestInitializer,
                vec![],
            )),
            Expr::Array(_) | Expr::Object(_) if !allow_pattern => Err(self.error_at(
                expr.loc().start,
                MessageKey::InvalidDestructuringTarget,
                vec![],
            )),
            other => self.to_nested_target(other),
        }
    }

    /// Like [`Parser::validate_simple_target`], but every failure is a
    /// SyntaxError: destructuring targets are checked statically.
    fn validate_destructuring_target(&mut self, expr: &Expr) -> ParseResult<()> {
        match expr {
            Expr::Paren(p) => match &p.expr {
                Expr::Ident(_) | Expr::Member(_) | Expr::SuperMember(_) | Expr::Paren(_) => {
                    self.validate_destructuring_target(&p.expr)
                }
                _ => Err(self.error_at(
                    expr.loc().start,
                    MessageKey::InvalidDestructuringTarget,
                    vec![],
                )),
            },
            _ => self.validate_simple_target(expr, MessageKey::InvalidDestructuringTarget),
        }
    }

    /// Reinterpret the head of a for-in/of loop as an assignment target.
    pub(crate) fn to_for_target(&mut self, expr: Expr, keyword: &str) -> ParseResult<Pat> {
        match expr {
            Expr::Array(_) | Expr::Object(_) => self.to_assignment_pattern(expr),
            Expr::Ident(_) | Expr::Member(_) | Expr::SuperMember(_) | Expr::Paren(_) => {
                if let Expr::Paren(p) = &expr
                    && !matches!(p.expr, Expr::Ident(_) | Expr::Member(_) | Expr::SuperMember(_))
                {
                    return Err(self.error_at(
                        expr.loc().start,
                        MessageKey::InvalidForInOfTarget,
                        vec![keyword.to_string()],
                    ));
                }
                self.validate_simple_target(&expr, MessageKey::InvalidForInOfTarget)?;
                Ok(Pat::Expr(Box::new(expr)))
            }
            other => Err(self.error_at(
                other.loc().start,
                MessageKey::InvalidForInOfTarget,
                vec![keyword.to_string()],
            )),
        }
    }
}

fn shorthand_key(key: &PropKey, target: &Expr) -> Ident {
    match key {
        PropKey::Ident(ident) => ident.clone(),
        _ => Ident {
            loc: target.loc(),
            name: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_kinds() {
        assert!(is_identifier_kind(TokenKind::Identifier));
        assert!(is_identifier_kind(TokenKind::Yield));
        assert!(is_identifier_kind(TokenKind::Let));
        assert!(!is_identifier_kind(TokenKind::Var));
        assert!(!is_identifier_kind(TokenKind::PrivateIdentifier));
    }

    #[test]
    fn test_strict_reserved_words_are_not_keywords() {
        for word in STRICT_RESERVED {
            match *word {
                "let" => assert_eq!(keyword_kind(word), Some(TokenKind::Let)),
                "static" => assert_eq!(keyword_kind(word), Some(TokenKind::Static)),
                _ => assert_eq!(keyword_kind(word), None, "{word}"),
            }
        }
    }
}
