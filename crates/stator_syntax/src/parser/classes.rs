//! Class declarations and expressions.
//!
//! Class code is strict from the `class` keyword on.  Each class body gets a
//! [`ClassParseContext`] on `Parser::classes` that collects constructors and
//! private-name declarations and uses; the body is validated when it closes.
//! A class without a constructor receives one parsed from a fixed source
//! fragment, so the synthesized method is checked like a written one.

use crate::error::ParseResult;
use crate::messages::MessageKey;
use crate::options::Features;

use super::Parser;
use super::ast::{
    BindingIdent, CallExpr, Class, ClassBody, ClassMember, Expr, FunctionKind, FunctionSyntax,
    Ident, MemberExpr, MethodDef, MethodKind, ParenExpr, PrivateIdent, PropKey, PropertyDef,
    SourceText, StaticBlock, Stmt,
};
use super::context::{
    ClassParseContext, ContextKind, FunctionTraits, PrivateDeclaration, PrivateNameKind,
};
use super::expressions::starts_property_key;
use super::patterns::{IdentUse, is_identifier_kind};
use super::scanner::{Position, Scanner, Span, TokenKind};
use super::scope::{DeclarationKind, NameId, ScopeId, ScopeKind};

const DEFAULT_CONSTRUCTOR: &str = "constructor() {}";
const DERIVED_DEFAULT_CONSTRUCTOR: &str = "constructor(...args) { super(...args); }";

/// How the class appears in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassForm {
    Declaration,
    Expression,
    /// `export default class …`, where the name is optional.
    DefaultExport,
}

/// Modifiers read before a member's key.
#[derive(Debug, Default)]
struct MemberHead {
    is_static: bool,
    is_async: bool,
    is_generator: bool,
    accessor: Option<FunctionSyntax>,
}

fn member_kind_word(head: &MemberHead) -> Option<&'static str> {
    if head.is_generator {
        return Some("a generator");
    }
    if head.is_async {
        return Some("an async method");
    }
    match head.accessor {
        Some(FunctionSyntax::Getter) => Some("a getter"),
        Some(FunctionSyntax::Setter) => Some("a setter"),
        _ => None,
    }
}

impl Parser<'_> {
    /// `class` declaration or expression.  The current token is `class`;
    /// `decorators` were read before it.
    pub(crate) fn parse_class(
        &mut self,
        start: Position,
        decorators: Vec<Expr>,
        is_declaration: bool,
    ) -> ParseResult<Class> {
        let form = if is_declaration {
            ClassForm::Declaration
        } else {
            ClassForm::Expression
        };
        self.parse_class_in_form(start, decorators, form)
    }

    /// `export default class [name] …`
    pub(crate) fn parse_default_class(
        &mut self,
        start: Position,
        decorators: Vec<Expr>,
    ) -> ParseResult<Class> {
        self.parse_class_in_form(start, decorators, ClassForm::DefaultExport)
    }

    fn parse_class_in_form(
        &mut self,
        start: Position,
        decorators: Vec<Expr>,
        form: ClassForm,
    ) -> ParseResult<Class> {
        self.expect(TokenKind::Class)?;
        self.contexts.current_mut().class_depth += 1;
        let result = self.parse_class_after_keyword(start, decorators, form);
        self.contexts.current_mut().class_depth -= 1;
        result
    }

    fn parse_class_after_keyword(
        &mut self,
        start: Position,
        decorators: Vec<Expr>,
        form: ClassForm,
    ) -> ParseResult<Class> {
        let name = if is_identifier_kind(self.kind()) {
            Some(self.parse_identifier(IdentUse::Binding)?)
        } else if form == ClassForm::Declaration {
            return Err(self.unexpected());
        } else {
            None
        };

        let outer = match (&name, form) {
            (Some((text, loc)), ClassForm::Declaration | ClassForm::DefaultExport) => {
                if text == "let" {
                    return Err(self.error_at(loc.start, MessageKey::LetLexicallyBound, vec![]));
                }
                Some(self.declare_class_name(text, *loc)?)
            }
            _ => None,
        };

        // The class scope binds the name a second time, visible to the
        // heritage and the body only.
        let scope = self.enter_scope(ScopeKind::Block, start);
        let mut inner_binding = None;
        let mut id = None;
        if let Some((text, loc)) = name {
            let inner = self
                .scopes
                .declare_lexical(scope, &text, loc, DeclarationKind::ClassName, false)
                .map_err(|_| self.redeclaration(&text, loc))?;
            inner_binding = Some(inner);
            id = Some(BindingIdent {
                loc,
                name: text,
                binding: outer.unwrap_or(inner),
            });
        }

        let super_class = if self.eat(TokenKind::Extends)? {
            Some(Box::new(self.parse_class_heritage()?))
        } else {
            None
        };
        let body = self.parse_class_body(super_class.is_some());
        self.leave_scope(scope);
        Ok(Class {
            loc: self.span_from(start),
            id,
            inner_binding,
            super_class,
            body: body?,
            decorators,
            scope,
        })
    }

    fn declare_class_name(&mut self, name: &str, loc: Span) -> ParseResult<NameId> {
        self.scopes
            .declare_lexical(self.scope, name, loc, DeclarationKind::Class, false)
            .map_err(|_| self.redeclaration(name, loc))
    }

    fn parse_class_body(&mut self, derived: bool) -> ParseResult<ClassBody> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        self.classes.push(ClassParseContext::new(derived));
        let members = self.allow_in(|p| p.parse_class_members());
        let class = self.classes.pop().unwrap_or_default();
        let mut members = members?;
        let has_constructor = !class.constructors.is_empty();
        self.finish_class_body(class)?;
        if !has_constructor {
            members.push(ClassMember::Method(self.synthesize_constructor(derived)?));
        }
        Ok(ClassBody {
            loc: self.span_from(start),
            body: members,
        })
    }

    fn parse_class_members(&mut self) -> ParseResult<Vec<ClassMember>> {
        let mut members = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            members.push(self.parse_class_member()?);
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(members)
    }

    // ── Members ─────────────────────────────────────────────────────────────

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        let start = self.start();
        let decorators = if self.at(TokenKind::At) {
            self.require_feature(Features::DECORATORS, "decorators")?;
            self.parse_decorators()?
        } else {
            Vec::new()
        };

        let mut head = MemberHead::default();
        if self.at(TokenKind::Static) && self.modifier_applies()? {
            self.advance()?;
            if self.at(TokenKind::LeftBrace) {
                self.require_feature(Features::STATIC_BLOCKS, "class static blocks")?;
                return Ok(ClassMember::StaticBlock(self.parse_static_block(start)?));
            }
            head.is_static = true;
        }
        if !head.is_static
            && self.has_feature(Features::CALL_CONSTRUCTORS)
            && self.at_contextual("call")
            && let Some(member) = self.try_parse_call_constructor(start, &decorators)?
        {
            return Ok(member);
        }
        if self.at_contextual("async") {
            let (next, newline) = self.peek_token()?;
            if !newline && starts_property_key(next) {
                self.advance()?;
                head.is_async = true;
            }
        }
        if self.eat(TokenKind::Star)? {
            head.is_generator = true;
        }
        if !head.is_async
            && !head.is_generator
            && (self.at_contextual("get") || self.at_contextual("set"))
            && starts_property_key(self.peek_kind()?)
            && self.peek_kind()? != TokenKind::Star
        {
            head.accessor = Some(if self.at_contextual("get") {
                FunctionSyntax::Getter
            } else {
                FunctionSyntax::Setter
            });
            self.advance()?;
        }

        let key = self.parse_member_key()?;
        let is_method = head.is_async
            || head.is_generator
            || head.accessor.is_some()
            || self.at(TokenKind::LeftParen);
        if is_method {
            self.parse_class_method(start, head, key, decorators)
        } else {
            self.parse_class_field(start, head.is_static, key, decorators)
        }
    }

    /// `static` is a modifier unless it is itself the member's name.
    fn modifier_applies(&mut self) -> ParseResult<bool> {
        let next = self.peek_kind()?;
        Ok(!matches!(
            next,
            TokenKind::LeftParen | TokenKind::Equal | TokenKind::Semicolon | TokenKind::RightBrace
        ))
    }

    /// A property key, or a private name being declared.
    fn parse_member_key(&mut self) -> ParseResult<PropKey> {
        if !self.at(TokenKind::Hash) {
            return self.parse_property_key();
        }
        self.scanner.read_private_name()?;
        let tok = self.tok();
        let ident = PrivateIdent {
            loc: tok.span,
            name: tok.text().to_string(),
        };
        if ident.name == "constructor" {
            return Err(self.error_here(MessageKey::PrivateConstructor, vec![]));
        }
        self.advance()?;
        Ok(PropKey::Private(ident))
    }

    fn declare_private(&mut self, key: &PropKey, kind: PrivateNameKind, is_static: bool) {
        let PropKey::Private(ident) = key else {
            return;
        };
        if let Some(class) = self.classes.last_mut() {
            class.declarations.push(PrivateDeclaration {
                name: ident.name.clone(),
                kind,
                is_static,
                loc: ident.loc,
            });
        }
    }

    fn parse_class_method(
        &mut self,
        start: Position,
        head: MemberHead,
        key: PropKey,
        decorators: Vec<Expr>,
    ) -> ParseResult<ClassMember> {
        let private = matches!(key, PropKey::Private(_));
        let name = key.static_name();
        if head.is_static && name == Some("prototype") {
            return Err(self.error_at(key.loc().start, MessageKey::StaticPrototype, vec![]));
        }
        let is_constructor = !head.is_static && name == Some("constructor");
        if is_constructor && let Some(word) = member_kind_word(&head) {
            return Err(self.error_at(
                key.loc().start,
                MessageKey::InvalidConstructor,
                vec![word.to_string()],
            ));
        }
        if private {
            self.require_feature(Features::PRIVATE_METHODS, "private methods")?;
        }

        let (method_kind, syntax, private_kind) = match head.accessor {
            Some(FunctionSyntax::Getter) => {
                (MethodKind::Get, FunctionSyntax::Getter, PrivateNameKind::Getter)
            }
            Some(_) => (MethodKind::Set, FunctionSyntax::Setter, PrivateNameKind::Setter),
            None if is_constructor => {
                (MethodKind::Constructor, FunctionSyntax::Constructor, PrivateNameKind::Method)
            }
            None => (MethodKind::Method, FunctionSyntax::Method, PrivateNameKind::Method),
        };
        self.declare_private(&key, private_kind, head.is_static);

        let derived = self.classes.last().is_some_and(|c| c.derived);
        if is_constructor && let Some(class) = self.classes.last_mut() {
            class.constructors.push(key.loc());
        }
        let kind = FunctionKind::new(head.is_async, head.is_generator);
        let value = self.parse_method(start, kind, syntax, is_constructor && derived)?;
        Ok(ClassMember::Method(MethodDef {
            loc: self.span_from(start),
            is_static: head.is_static,
            kind: method_kind,
            key,
            value: Box::new(value),
            decorators,
        }))
    }

    /// `call constructor(…) { … }`.  Returns `None`, with nothing consumed,
    /// when `call` is an ordinary member name.
    fn try_parse_call_constructor(
        &mut self,
        start: Position,
        decorators: &[Expr],
    ) -> ParseResult<Option<ClassMember>> {
        let cp = self.checkpoint();
        self.advance()?;
        if !self.at_contextual("constructor") || self.tok().had_line_terminator_before {
            self.restore(cp);
            return Ok(None);
        }
        let key_tok = self.tok();
        let key = PropKey::Ident(Ident {
            loc: key_tok.span,
            name: key_tok.text().to_string(),
        });
        self.advance()?;
        if let Some(class) = self.classes.last_mut() {
            class.call_constructors.push(key.loc());
        }
        let value =
            self.parse_method(start, FunctionKind::Normal, FunctionSyntax::CallConstructor, false)?;
        Ok(Some(ClassMember::Method(MethodDef {
            loc: self.span_from(start),
            is_static: false,
            kind: MethodKind::CallConstructor,
            key,
            value: Box::new(value),
            decorators: decorators.to_vec(),
        })))
    }

    fn parse_class_field(
        &mut self,
        start: Position,
        is_static: bool,
        key: PropKey,
        decorators: Vec<Expr>,
    ) -> ParseResult<ClassMember> {
        self.require_feature(Features::CLASS_FIELDS, "class fields")?;
        match key.static_name() {
            Some("constructor") => {
                return Err(self.error_at(
                    key.loc().start,
                    MessageKey::FieldNamedConstructor,
                    vec![],
                ));
            }
            Some("prototype") if is_static => {
                return Err(self.error_at(key.loc().start, MessageKey::StaticPrototype, vec![]));
            }
            _ => {}
        }
        self.declare_private(&key, PrivateNameKind::Field, is_static);

        let (value, scope) = if self.eat(TokenKind::Equal)? {
            let (value, scope) = self.parse_field_initializer()?;
            (Some(Box::new(value)), Some(scope))
        } else {
            (None, None)
        };
        self.consume_semicolon()?;
        Ok(ClassMember::Property(PropertyDef {
            loc: self.span_from(start),
            is_static,
            key,
            value,
            decorators,
            scope,
        }))
    }

    /// The initializer runs as its own function-like context: `arguments`
    /// and `await` are unavailable, `super.x` and `new.target` are.
    fn parse_field_initializer(&mut self) -> ParseResult<(Expr, ScopeId)> {
        self.contexts.push_function(FunctionTraits {
            kind: ContextKind::ClassField,
            generator: false,
            is_async: false,
            super_call: false,
            super_property: true,
        });
        let scope = self.enter_scope(ScopeKind::ClassFieldInitializer, self.start());
        let value = self.parse_assignment();
        self.leave_scope(scope);
        self.contexts.pop();
        Ok((value?, scope))
    }

    /// `static { … }`; the current token is `{`.
    fn parse_static_block(&mut self, start: Position) -> ParseResult<StaticBlock> {
        self.contexts.push_function(FunctionTraits {
            kind: ContextKind::ClassStaticBlock,
            generator: false,
            is_async: false,
            super_call: false,
            super_property: true,
        });
        let scope = self.enter_scope(ScopeKind::Function, self.start());
        let body = self.parse_static_block_body();
        self.leave_scope(scope);
        self.contexts.pop();
        Ok(StaticBlock {
            loc: self.span_from(start),
            body: body?,
            scope,
        })
    }

    fn parse_static_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            body.push(self.parse_statement_list_item()?);
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(body)
    }

    // ── Default constructor ─────────────────────────────────────────────────

    /// Parse the implicit constructor from its source form with a scanner of
    /// its own, then return to the class source.
    fn synthesize_constructor(&mut self, derived: bool) -> ParseResult<MethodDef> {
        let text = if derived {
            DERIVED_DEFAULT_CONSTRUCTOR
        } else {
            DEFAULT_CONSTRUCTOR
        };
        tracing::trace!(derived, "synthesize default constructor");
        // Anchor the generated nodes on the closing `}` just consumed.
        let end = self.scanner.prev_end();
        let at = Position {
            offset: end.offset.saturating_sub(1),
            line: end.line,
            column: end.column.saturating_sub(1).max(1),
        };
        let fragment = Scanner::synthetic(text, &self.options, self.contexts.is_module(), at);
        let saved = std::mem::replace(&mut self.scanner, fragment);
        let saved_scope = self.scope;
        let method = self.parse_synthetic_constructor(derived);
        self.scanner = saved;
        self.scope = saved_scope;
        let mut method = method?;
        method.value.source = SourceText::Synthetic(text.to_string());
        Ok(method)
    }

    fn parse_synthetic_constructor(&mut self, derived: bool) -> ParseResult<MethodDef> {
        self.scanner.advance()?;
        let start = self.start();
        let key = self.parse_property_key()?;
        let value =
            self.parse_method(start, FunctionKind::Normal, FunctionSyntax::Constructor, derived)?;
        Ok(MethodDef {
            loc: value.loc,
            is_static: false,
            kind: MethodKind::Constructor,
            key,
            value: Box::new(value),
            decorators: Vec::new(),
        })
    }

    // ── Decorators ──────────────────────────────────────────────────────────

    /// `@decorator` list.  Each decorator is an identifier path, optionally
    /// called, or a parenthesized expression.
    pub(crate) fn parse_decorators(&mut self) -> ParseResult<Vec<Expr>> {
        let mut decorators = Vec::new();
        while self.eat(TokenKind::At)? {
            decorators.push(self.parse_decorator()?);
        }
        Ok(decorators)
    }

    fn parse_decorator(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let mut expr = if self.eat(TokenKind::LeftParen)? {
            let inner = self.allow_in(|p| p.parse_expression())?;
            self.expect(TokenKind::RightParen)?;
            Expr::Paren(Box::new(ParenExpr {
                loc: self.span_from(start),
                expr: inner,
            }))
        } else {
            let mut expr = Expr::Ident(self.parse_identifier_reference()?);
            while self.eat(TokenKind::Dot)? {
                let property = self.parse_member_property(true)?;
                expr = Expr::Member(Box::new(MemberExpr {
                    loc: self.span_from(start),
                    object: Box::new(expr),
                    property,
                }));
            }
            expr
        };
        if self.at(TokenKind::LeftParen) {
            let arguments = self.parse_argument_list(false)?;
            expr = Expr::Call(Box::new(CallExpr {
                loc: self.span_from(start),
                callee: Box::new(expr),
                arguments,
                direct_eval: false,
            }));
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_kind_words() {
        let generator = MemberHead {
            is_generator: true,
            ..MemberHead::default()
        };
        assert_eq!(member_kind_word(&generator), Some("a generator"));
        let getter = MemberHead {
            accessor: Some(FunctionSyntax::Getter),
            ..MemberHead::default()
        };
        assert_eq!(member_kind_word(&getter), Some("a getter"));
        let is_async = MemberHead {
            is_async: true,
            ..MemberHead::default()
        };
        assert_eq!(member_kind_word(&is_async), Some("an async method"));
        assert_eq!(member_kind_word(&MemberHead::default()), None);
    }
}
