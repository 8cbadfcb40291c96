//! Expressions.
//!
//! Precedence climbing for binary operators, a single routine per level for
//! everything above it.  Object and array literals are parsed in "cover"
//! mode when they may still turn out to be assignment patterns; errors that
//! only apply to literals (`{a = 1}`, duplicate `__proto__`) are parked in
//! [`Parser::pending_objects`] until the enclosing assignment expression
//! decides which reading applies.

use crate::error::ParseResult;
use crate::messages::MessageKey;
use crate::options::Features;

use super::ast::{
    ArrayExpr, AssignExpr, AssignOp, AssignTarget, AwaitExpr, BigIntLit, BinaryExpr, BinaryOp,
    BoolLit, CallExpr, ComprehensionClause, ComprehensionExpr, ConditionalExpr, DoExpr, Expr,
    FunctionKind, FunctionSyntax, Ident, IdentRef, ImportExpr, LogicalExpr, LogicalOp,
    MemberExpr, MemberProp, MetaPropExpr, MetaPropKind, NativeCallExpr, NewExpr, NullLit, NumLit,
    ObjectExpr, ObjectProp, OptionalCallExpr, OptionalChainExpr, OptionalMemberExpr, ParenExpr,
    PrivateIdent, PrivateInExpr, Prop, PropKey, PropValue, RegExpLit, SequenceExpr,
    SpreadElement, StringLit, SuperCallExpr, SuperMemberExpr, TaggedTemplateExpr,
    TemplateElement, TemplateLit, ThisExpr, ThrowExpr, UnaryExpr, UnaryOp, UpdateExpr, UpdateOp,
    YieldExpr,
};
use super::context::{ContextFlags, PrivateReference};
use super::patterns::{BindingKind, IdentUse, is_identifier_kind};
use super::scanner::{Position, TokenFlags, TokenKind, TokenValue};
use super::scope::ScopeKind;
use super::{Parser, PendingObjectError};

/// Precedence of the relational operators (`<`, `in`, `instanceof`).
const RELATIONAL: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// Binding power of a binary operator token.  `in` is excluded while
/// parsing a for-statement head.
fn binary_operator(kind: TokenKind, no_in: bool) -> Option<(u8, Operator)> {
    use Operator::{Binary, Logical};
    use TokenKind::*;
    let entry = match kind {
        QuestionQuestion => (1, Logical(LogicalOp::NullishCoalesce)),
        PipePipe => (2, Logical(LogicalOp::Or)),
        AmpersandAmpersand => (3, Logical(LogicalOp::And)),
        Pipe => (4, Binary(BinaryOp::BitOr)),
        Caret => (5, Binary(BinaryOp::BitXor)),
        Ampersand => (6, Binary(BinaryOp::BitAnd)),
        EqualEqual => (7, Binary(BinaryOp::Eq)),
        BangEqual => (7, Binary(BinaryOp::NotEq)),
        EqualEqualEqual => (7, Binary(BinaryOp::StrictEq)),
        BangEqualEqual => (7, Binary(BinaryOp::StrictNotEq)),
        Less => (RELATIONAL, Binary(BinaryOp::Lt)),
        Greater => (RELATIONAL, Binary(BinaryOp::Gt)),
        LessEqual => (RELATIONAL, Binary(BinaryOp::LtEq)),
        GreaterEqual => (RELATIONAL, Binary(BinaryOp::GtEq)),
        Instanceof => (RELATIONAL, Binary(BinaryOp::Instanceof)),
        In if !no_in => (RELATIONAL, Binary(BinaryOp::In)),
        LessLess => (9, Binary(BinaryOp::Shl)),
        GreaterGreater => (9, Binary(BinaryOp::Shr)),
        GreaterGreaterGreater => (9, Binary(BinaryOp::UShr)),
        Plus => (10, Binary(BinaryOp::Add)),
        Minus => (10, Binary(BinaryOp::Sub)),
        Star => (11, Binary(BinaryOp::Mul)),
        Slash => (11, Binary(BinaryOp::Div)),
        Percent => (11, Binary(BinaryOp::Rem)),
        StarStar => (12, Binary(BinaryOp::Exp)),
        _ => return None,
    };
    Some(entry)
}

fn assign_operator(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    Some(match kind {
        Equal => AssignOp::Assign,
        PlusEqual => AssignOp::AddAssign,
        MinusEqual => AssignOp::SubAssign,
        StarEqual => AssignOp::MulAssign,
        SlashEqual => AssignOp::DivAssign,
        PercentEqual => AssignOp::RemAssign,
        StarStarEqual => AssignOp::ExpAssign,
        LessLessEqual => AssignOp::ShlAssign,
        GreaterGreaterEqual => AssignOp::ShrAssign,
        GreaterGreaterGreaterEqual => AssignOp::UShrAssign,
        PipeEqual => AssignOp::BitOrAssign,
        CaretEqual => AssignOp::BitXorAssign,
        AmpersandEqual => AssignOp::BitAndAssign,
        AmpersandAmpersandEqual => AssignOp::LogicalAndAssign,
        PipePipeEqual => AssignOp::LogicalOrAssign,
        QuestionQuestionEqual => AssignOp::NullishAssign,
        _ => return None,
    })
}

fn unary_operator(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Minus => UnaryOp::Minus,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::Typeof => UnaryOp::Typeof,
        TokenKind::Void => UnaryOp::Void,
        TokenKind::Delete => UnaryOp::Delete,
        _ => return None,
    })
}

/// Tokens after which a `yield` has no operand.
fn ends_yield_operand(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RightParen
            | TokenKind::RightBracket
            | TokenKind::RightBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::Question
            | TokenKind::In
            | TokenKind::Eof
    )
}

/// Tokens that may follow `get`, `set` or `async` when those words are
/// modifiers rather than property names.
pub(crate) fn starts_property_key(kind: TokenKind) -> bool {
    kind.is_identifier_name()
        || matches!(
            kind,
            TokenKind::StringLiteral
                | TokenKind::NumericLiteral
                | TokenKind::LeftBracket
                | TokenKind::Hash
                | TokenKind::Star
        )
}

fn is_arrow(expr: &Expr) -> bool {
    matches!(expr, Expr::Arrow(_))
}

fn is_and_or(expr: &Expr) -> bool {
    matches!(expr, Expr::Logical(l) if l.op != LogicalOp::NullishCoalesce)
}

fn is_coalesce(expr: &Expr) -> bool {
    matches!(expr, Expr::Logical(l) if l.op == LogicalOp::NullishCoalesce)
}

fn unparenthesized(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(p) => unparenthesized(&p.expr),
        other => other,
    }
}

/// `expr` is `a.#x`, `a?.#x` or a chain ending in one.
fn is_private_member(expr: &Expr) -> bool {
    match unparenthesized(expr) {
        Expr::Member(m) => matches!(m.property, MemberProp::Private(_)),
        Expr::OptionalMember(m) => matches!(m.property, MemberProp::Private(_)),
        Expr::OptionalChain(c) => is_private_member(&c.expression),
        _ => false,
    }
}

/// A numeric token as either kind of literal.
pub(crate) enum NumericLiteral {
    Number(NumLit),
    BigInt(BigIntLit),
}

impl Parser<'_> {
    // ── Comma and assignment ────────────────────────────────────────────────

    /// `Expression : AssignmentExpression ( , AssignmentExpression )*`
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expression_with(false)
    }

    pub(crate) fn parse_expression_with(&mut self, cover: bool) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.parse_assignment_with(cover)?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_assignment_with(cover)?);
        }
        Ok(Expr::Sequence(Box::new(SequenceExpr {
            loc: self.span_from(start),
            expressions,
        })))
    }

    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Expr> {
        self.parse_assignment_with(false)
    }

    /// `AssignmentExpression`.  With `cover` set, object-literal errors stay
    /// pending for an enclosing literal that may become a pattern.
    pub(crate) fn parse_assignment_with(&mut self, cover: bool) -> ParseResult<Expr> {
        self.nested(|p| {
            let start = p.start();
            if p.at(TokenKind::Yield) && p.has_flag(ContextFlags::YIELD_ALLOWED) {
                return p.parse_yield();
            }
            let mark = p.pending_objects.len();
            let saved_arrow = p.arrow_start.replace(start.offset);
            let lhs = p.parse_conditional();
            p.arrow_start = saved_arrow;
            let lhs = lhs?;
            if is_arrow(&lhs) {
                return Ok(lhs);
            }

            let Some(op) = assign_operator(p.kind()) else {
                if !cover {
                    p.commit_pending_objects(mark)?;
                }
                return Ok(lhs);
            };
            let left = if op == AssignOp::Assign {
                p.to_assign_target(lhs)?
            } else {
                p.validate_simple_target(&lhs, MessageKey::InvalidAssignmentTarget)?;
                AssignTarget::Expr(Box::new(lhs))
            };
            p.advance()?;
            let right = p.parse_assignment()?;
            if !cover {
                p.commit_pending_objects(mark)?;
            }
            Ok(Expr::Assign(Box::new(AssignExpr {
                loc: p.span_from(start),
                op,
                left,
                right: Box::new(right),
            })))
        })
    }

    fn parse_yield(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        if self.has_flag(ContextFlags::IN_PARAMETERS) {
            return Err(self.error_here(MessageKey::YieldInParameter, vec![]));
        }
        self.advance()?;
        let mut delegate = false;
        let mut argument = None;
        if !self.tok().had_line_terminator_before {
            if self.eat(TokenKind::Star)? {
                delegate = true;
                argument = Some(Box::new(self.parse_assignment()?));
            } else if !ends_yield_operand(self.kind()) {
                argument = Some(Box::new(self.parse_assignment()?));
            }
        }
        Ok(Expr::Yield(Box::new(YieldExpr {
            loc: self.span_from(start),
            delegate,
            argument,
        })))
    }

    // ── Conditional and binary ──────────────────────────────────────────────

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let test = self.parse_binary(0)?;
        if is_arrow(&test) || !self.at(TokenKind::Question) {
            return Ok(test);
        }
        self.advance()?;
        let consequent = self.allow_in(|p| p.parse_assignment())?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment()?;
        Ok(Expr::Conditional(Box::new(ConditionalExpr {
            loc: self.span_from(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })))
    }

    /// Operators binding at least as tightly as `min`.
    fn parse_binary(&mut self, min: u8) -> ParseResult<Expr> {
        let start = self.start();
        let mut left = if self.at(TokenKind::Hash) {
            self.parse_private_in(min)?
        } else {
            self.parse_unary()?
        };
        if is_arrow(&left) {
            return Ok(left);
        }
        while let Some((precedence, op)) = binary_operator(self.kind(), self.no_in) {
            if precedence < min {
                break;
            }
            if op == Operator::Binary(BinaryOp::Exp)
                && matches!(left, Expr::Unary(_) | Expr::Await(_) | Expr::Throw(_))
            {
                return Err(self.error_here(MessageKey::UnparenthesizedUnaryExponent, vec![]));
            }
            self.advance()?;
            // `**` is right-associative.
            let right = if op == Operator::Binary(BinaryOp::Exp) {
                self.nested(|p| p.parse_binary(precedence))?
            } else {
                self.parse_binary(precedence + 1)?
            };
            left = self.combine(start, op, left, right)?;
        }
        Ok(left)
    }

    fn combine(&self, start: Position, op: Operator, left: Expr, right: Expr) -> ParseResult<Expr> {
        let loc = self.span_from(start);
        match op {
            Operator::Logical(op) => {
                let mixed = if op == LogicalOp::NullishCoalesce {
                    is_and_or(&left) || is_and_or(&right)
                } else {
                    is_coalesce(&left) || is_coalesce(&right)
                };
                if mixed {
                    return Err(self.error_at(start, MessageKey::MixedCoalesce, vec![]));
                }
                Ok(Expr::Logical(Box::new(LogicalExpr {
                    loc,
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })))
            }
            Operator::Binary(op) => Ok(Expr::Binary(Box::new(BinaryExpr {
                loc,
                op,
                left: Box::new(left),
                right: Box::new(right),
            }))),
        }
    }

    /// `#x in obj`
    fn parse_private_in(&mut self, min: u8) -> ParseResult<Expr> {
        let start = self.start();
        let name = self.parse_private_name()?;
        if !self.at(TokenKind::In) || self.no_in || min > RELATIONAL {
            return Err(self.error_at(
                start,
                MessageKey::UnexpectedToken,
                vec![format!("#{}", name.name)],
            ));
        }
        self.require_feature(Features::PRIVATE_IN, "#x in obj")?;
        self.advance()?;
        let right = self.parse_binary(RELATIONAL + 1)?;
        Ok(Expr::PrivateIn(Box::new(PrivateInExpr {
            loc: self.span_from(start),
            name,
            right: Box::new(right),
        })))
    }

    /// Re-read the current `#` as a private name, record the use and
    /// consume it.
    pub(crate) fn parse_private_name(&mut self) -> ParseResult<PrivateIdent> {
        self.scanner.read_private_name()?;
        let tok = self.tok();
        let ident = PrivateIdent {
            loc: tok.span,
            name: tok.text().to_string(),
        };
        self.advance()?;
        self.record_private_reference(&ident);
        Ok(ident)
    }

    pub(crate) fn record_private_reference(&mut self, ident: &PrivateIdent) {
        let reference = PrivateReference {
            name: ident.name.clone(),
            loc: ident.loc,
        };
        match self.classes.last_mut() {
            Some(class) => class.references.push(reference),
            None => self.unresolved_private.push(reference),
        }
    }

    // ── Unary and update ────────────────────────────────────────────────────

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        self.nested(|p| {
            let start = p.start();
            match p.kind() {
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if p.at(TokenKind::PlusPlus) {
                        UpdateOp::Increment
                    } else {
                        UpdateOp::Decrement
                    };
                    p.advance()?;
                    let argument = p.parse_unary()?;
                    p.validate_simple_target(&argument, MessageKey::InvalidUpdateTarget)?;
                    return Ok(Expr::Update(Box::new(UpdateExpr {
                        loc: p.span_from(start),
                        op,
                        prefix: true,
                        argument: Box::new(argument),
                    })));
                }
                TokenKind::Await if p.has_flag(ContextFlags::AWAIT_ALLOWED) => {
                    if p.has_flag(ContextFlags::IN_PARAMETERS) {
                        return Err(p.error_here(MessageKey::AwaitInParameter, vec![]));
                    }
                    p.advance()?;
                    let argument = p.parse_unary()?;
                    return Ok(Expr::Await(Box::new(AwaitExpr {
                        loc: p.span_from(start),
                        argument: Box::new(argument),
                    })));
                }
                TokenKind::Throw if p.has_feature(Features::THROW_EXPRESSIONS) => {
                    p.advance()?;
                    let argument = p.parse_unary()?;
                    return Ok(Expr::Throw(Box::new(ThrowExpr {
                        loc: p.span_from(start),
                        argument: Box::new(argument),
                    })));
                }
                _ => {}
            }
            let Some(op) = unary_operator(p.kind()) else {
                return p.parse_postfix();
            };
            p.advance()?;
            let argument = p.parse_unary()?;
            if op == UnaryOp::Delete {
                if let Expr::Ident(id) = unparenthesized(&argument) {
                    p.report_strict(id.loc.start, MessageKey::StrictDelete, vec![])?;
                }
                if is_private_member(&argument) {
                    return Err(p.error_at(start, MessageKey::DeletePrivateName, vec![]));
                }
            }
            Ok(Expr::Unary(Box::new(UnaryExpr {
                loc: p.span_from(start),
                op,
                argument: Box::new(argument),
            })))
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let expr = self.parse_lhs()?;
        if is_arrow(&expr) {
            return Ok(expr);
        }
        let op = match self.kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        if self.tok().had_line_terminator_before {
            return Ok(expr);
        }
        self.validate_simple_target(&expr, MessageKey::InvalidUpdateTarget)?;
        self.advance()?;
        Ok(Expr::Update(Box::new(UpdateExpr {
            loc: self.span_from(start),
            op,
            prefix: false,
            argument: Box::new(expr),
        })))
    }

    // ── Left-hand-side expressions ──────────────────────────────────────────

    fn parse_lhs(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let expr = match self.kind() {
            TokenKind::New => self.parse_new()?,
            TokenKind::Super => self.parse_super(true)?,
            TokenKind::Import => self.parse_import_expression()?,
            _ => self.parse_primary()?,
        };
        if is_arrow(&expr) {
            return Ok(expr);
        }
        self.parse_call_tail(start, expr, true)
    }

    /// Heritage of a class: a left-hand-side expression.
    pub(crate) fn parse_class_heritage(&mut self) -> ParseResult<Expr> {
        self.nested(|p| p.parse_lhs())
    }

    /// Member accesses, calls, optional chains and tagged templates after
    /// `expr`.  Calls are not consumed for a `new` callee.
    fn parse_call_tail(
        &mut self,
        start: Position,
        mut expr: Expr,
        allow_call: bool,
    ) -> ParseResult<Expr> {
        let mut in_chain = false;
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.advance()?;
                    let property = self.parse_member_property(true)?;
                    expr = Expr::Member(Box::new(MemberExpr {
                        loc: self.span_from(start),
                        object: Box::new(expr),
                        property,
                    }));
                }
                TokenKind::LeftBracket => {
                    let property = self.parse_computed_member()?;
                    expr = Expr::Member(Box::new(MemberExpr {
                        loc: self.span_from(start),
                        object: Box::new(expr),
                        property,
                    }));
                }
                TokenKind::QuestionDot => {
                    if !allow_call {
                        return Err(self.error_here(MessageKey::OptionalChainNew, vec![]));
                    }
                    self.advance()?;
                    in_chain = true;
                    expr = match self.kind() {
                        TokenKind::LeftParen => {
                            let arguments = self.parse_argument_list(false)?;
                            Expr::OptionalCall(Box::new(OptionalCallExpr {
                                loc: self.span_from(start),
                                callee: Box::new(expr),
                                arguments,
                            }))
                        }
                        TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                            return Err(self.error_here(MessageKey::OptionalChainTemplate, vec![]));
                        }
                        TokenKind::LeftBracket => {
                            let property = self.parse_computed_member()?;
                            Expr::OptionalMember(Box::new(OptionalMemberExpr {
                                loc: self.span_from(start),
                                object: Box::new(expr),
                                property,
                            }))
                        }
                        _ => {
                            let property = self.parse_member_property(true)?;
                            Expr::OptionalMember(Box::new(OptionalMemberExpr {
                                loc: self.span_from(start),
                                object: Box::new(expr),
                                property,
                            }))
                        }
                    };
                }
                TokenKind::LeftParen if allow_call => {
                    let direct_eval =
                        !in_chain && matches!(&expr, Expr::Ident(id) if id.name == "eval");
                    let arguments = self.parse_argument_list(false)?;
                    if direct_eval {
                        tracing::trace!(scope = self.scope, "direct eval call");
                        let strict = self.is_strict();
                        self.scopes.mark_direct_eval(self.scope, strict);
                    }
                    expr = Expr::Call(Box::new(CallExpr {
                        loc: self.span_from(start),
                        callee: Box::new(expr),
                        arguments,
                        direct_eval,
                    }));
                }
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                    if in_chain {
                        return Err(self.error_here(MessageKey::OptionalChainTemplate, vec![]));
                    }
                    let quasi = self.parse_template(true)?;
                    expr = Expr::TaggedTemplate(Box::new(TaggedTemplateExpr {
                        loc: self.span_from(start),
                        tag: Box::new(expr),
                        quasi,
                    }));
                }
                _ => break,
            }
        }
        if in_chain {
            expr = Expr::OptionalChain(Box::new(OptionalChainExpr {
                loc: self.span_from(start),
                expression: expr,
            }));
        }
        Ok(expr)
    }

    /// The name after `.` or `?.`: any identifier name, or a private name.
    pub(crate) fn parse_member_property(&mut self, allow_private: bool) -> ParseResult<MemberProp> {
        if self.at(TokenKind::Hash) && allow_private {
            return Ok(MemberProp::Private(self.parse_private_name()?));
        }
        if !self.kind().is_identifier_name() {
            return Err(self.unexpected());
        }
        let tok = self.tok();
        let ident = Ident {
            loc: tok.span,
            name: tok.text().to_string(),
        };
        self.advance()?;
        Ok(MemberProp::Ident(ident))
    }

    fn parse_computed_member(&mut self) -> ParseResult<MemberProp> {
        self.expect(TokenKind::LeftBracket)?;
        let property = self.allow_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RightBracket)?;
        Ok(MemberProp::Computed(Box::new(property)))
    }

    /// `( ArgumentList? )`, allowing spread elements and a trailing comma.
    pub(crate) fn parse_argument_list(&mut self, cover: bool) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        self.allow_in(|p| {
            let mut arguments = Vec::new();
            while !p.at(TokenKind::RightParen) {
                let arg_start = p.start();
                let argument = if p.eat(TokenKind::DotDotDot)? {
                    let argument = p.parse_assignment_with(cover)?;
                    Expr::Spread(Box::new(SpreadElement {
                        loc: p.span_from(arg_start),
                        argument: Box::new(argument),
                    }))
                } else {
                    p.parse_assignment_with(cover)?
                };
                arguments.push(argument);
                if !p.at(TokenKind::RightParen) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            p.advance()?;
            Ok(arguments)
        })
    }

    fn parse_new(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        if self.eat(TokenKind::Dot)? {
            if !self.at_contextual("target") {
                return Err(self.unexpected());
            }
            self.advance()?;
            if !self.has_flag(ContextFlags::NEW_TARGET) {
                return Err(self.error_at(start, MessageKey::InvalidNewTarget, vec![]));
            }
            return Ok(Expr::MetaProp(MetaPropExpr {
                loc: self.span_from(start),
                kind: MetaPropKind::NewTarget,
            }));
        }
        let callee_start = self.start();
        let callee = match self.kind() {
            TokenKind::New => self.nested(|p| p.parse_new())?,
            TokenKind::Super => self.parse_super(false)?,
            TokenKind::Import => return Err(self.unexpected()),
            _ => self.parse_primary()?,
        };
        let callee = self.parse_call_tail(callee_start, callee, false)?;
        let arguments = if self.at(TokenKind::LeftParen) {
            self.parse_argument_list(false)?
        } else {
            Vec::new()
        };
        Ok(Expr::New(Box::new(NewExpr {
            loc: self.span_from(start),
            callee: Box::new(callee),
            arguments,
        })))
    }

    fn parse_super(&mut self, allow_call: bool) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        match self.kind() {
            TokenKind::LeftParen if allow_call => {
                if !self.has_flag(ContextFlags::SUPER_CALL) {
                    return Err(self.error_at(start, MessageKey::InvalidSuperCall, vec![]));
                }
                let arguments = self.parse_argument_list(false)?;
                Ok(Expr::SuperCall(Box::new(SuperCallExpr {
                    loc: self.span_from(start),
                    arguments,
                })))
            }
            TokenKind::Dot | TokenKind::LeftBracket => {
                if !self.has_flag(ContextFlags::SUPER_PROPERTY) {
                    return Err(self.error_at(start, MessageKey::InvalidSuperProperty, vec![]));
                }
                let property = if self.eat(TokenKind::Dot)? {
                    self.parse_member_property(false)?
                } else {
                    self.parse_computed_member()?
                };
                Ok(Expr::SuperMember(Box::new(SuperMemberExpr {
                    loc: self.span_from(start),
                    property,
                })))
            }
            _ => Err(self.error_at(start, MessageKey::InvalidSuperProperty, vec![])),
        }
    }

    /// `import(…)` and `import.meta`.
    fn parse_import_expression(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        if self.eat(TokenKind::Dot)? {
            if !self.at_contextual("meta") {
                return Err(self.unexpected());
            }
            if !self.contexts.is_module() || !self.has_feature(Features::IMPORT_META) {
                return Err(self.error_at(start, MessageKey::InvalidImportMeta, vec![]));
            }
            self.advance()?;
            return Ok(Expr::MetaProp(MetaPropExpr {
                loc: self.span_from(start),
                kind: MetaPropKind::ImportMeta,
            }));
        }
        if !self.at(TokenKind::LeftParen) {
            return Err(self.unexpected());
        }
        self.require_feature(Features::DYNAMIC_IMPORT, "import()")?;
        self.advance()?;
        let (source, options) = self.allow_in(|p| {
            let source = p.parse_assignment()?;
            let mut options = None;
            if p.eat(TokenKind::Comma)? && !p.at(TokenKind::RightParen) {
                options = Some(Box::new(p.parse_assignment()?));
                p.eat(TokenKind::Comma)?;
            }
            Ok((source, options))
        })?;
        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Import(Box::new(ImportExpr {
            loc: self.span_from(start),
            source: Box::new(source),
            options,
        })))
    }

    // ── Primary expressions ─────────────────────────────────────────────────

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let loc = self.tok().span;
        match self.kind() {
            TokenKind::This => {
                self.advance()?;
                Ok(Expr::This(ThisExpr { loc }))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(Expr::Null(NullLit { loc }))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.at(TokenKind::True);
                self.advance()?;
                Ok(Expr::Bool(BoolLit { loc, value }))
            }
            TokenKind::NumericLiteral => Ok(match self.parse_numeric_literal()? {
                NumericLiteral::Number(n) => Expr::Num(n),
                NumericLiteral::BigInt(b) => Expr::BigInt(b),
            }),
            TokenKind::StringLiteral => Ok(Expr::Str(self.parse_string_literal()?)),
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                Ok(Expr::Template(Box::new(self.parse_template(false)?)))
            }
            TokenKind::Slash | TokenKind::SlashEqual => self.parse_regexp(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::LeftParen => self.parse_paren_or_arrow(start),
            TokenKind::Function => {
                if self.has_feature(Features::FUNCTION_SENT) && self.peek_kind()? == TokenKind::Dot
                {
                    return self.parse_function_sent();
                }
                let function =
                    self.parse_function_literal(start, false, FunctionSyntax::Expression)?;
                Ok(Expr::Fn(Box::new(function)))
            }
            TokenKind::Class => {
                Ok(Expr::Class(Box::new(self.parse_class(start, Vec::new(), false)?)))
            }
            TokenKind::At => {
                self.require_feature(Features::DECORATORS, "decorators")?;
                let decorators = self.parse_decorators()?;
                if !self.at(TokenKind::Class) {
                    return Err(self.unexpected());
                }
                Ok(Expr::Class(Box::new(self.parse_class(start, decorators, false)?)))
            }
            TokenKind::Percent if self.has_feature(Features::NATIVE_CALLS) => {
                self.parse_native_call()
            }
            TokenKind::Do if self.has_feature(Features::DO_EXPRESSIONS) => {
                self.parse_do_expression()
            }
            kind if is_identifier_kind(kind) => self.parse_identifier_expression(start),
            _ => Err(self.unexpected()),
        }
    }

    /// An identifier reference, or the head of an arrow function or async
    /// function that starts with one.
    fn parse_identifier_expression(&mut self, start: Position) -> ParseResult<Expr> {
        let at_arrow_start = self.arrow_start == Some(start.offset);
        if self.at_contextual("async") {
            let (next, newline) = self.peek_token()?;
            if !newline {
                if next == TokenKind::Function {
                    self.advance()?;
                    let function =
                        self.parse_function_literal(start, true, FunctionSyntax::Expression)?;
                    return Ok(Expr::Fn(Box::new(function)));
                }
                if at_arrow_start && is_identifier_kind(next) {
                    return self.parse_arrow_function(start, true);
                }
                if at_arrow_start && next == TokenKind::LeftParen {
                    return self.parse_async_call_or_arrow(start);
                }
            }
        }
        if at_arrow_start && self.peek_kind()? == TokenKind::Arrow {
            return self.parse_arrow_function(start, false);
        }
        Ok(Expr::Ident(self.parse_identifier_reference()?))
    }

    pub(crate) fn parse_identifier_reference(&mut self) -> ParseResult<IdentRef> {
        let (name, loc) = self.parse_identifier(IdentUse::Reference)?;
        let reference = self.scopes.add_reference(self.scope, &name, loc);
        Ok(IdentRef { loc, name, reference })
    }

    /// `async ( … )`: a call of a function named `async`, or the head of an
    /// async arrow function.
    fn parse_async_call_or_arrow(&mut self, start: Position) -> ParseResult<Expr> {
        let cp = self.checkpoint();
        let callee = self.parse_identifier_reference()?;
        let mark = self.pending_objects.len();
        let arguments = self.parse_argument_list(true)?;
        if self.at(TokenKind::Arrow) {
            if self.tok().had_line_terminator_before {
                return Err(self.error_here(MessageKey::NewlineBeforeArrow, vec![]));
            }
            self.restore(cp);
            return self.parse_arrow_function(start, true);
        }
        self.commit_pending_objects(mark)?;
        Ok(Expr::Call(Box::new(CallExpr {
            loc: self.span_from(start),
            callee: Box::new(Expr::Ident(callee)),
            arguments,
            direct_eval: false,
        })))
    }

    /// `( Expression )`, or the parameter list of an arrow function when
    /// `=>` follows the closing parenthesis.
    fn parse_paren_or_arrow(&mut self, start: Position) -> ParseResult<Expr> {
        if self.has_feature(Features::COMPREHENSIONS) && self.peek_kind()? == TokenKind::For {
            self.advance()?;
            return self.parse_comprehension(start, true);
        }
        if self.arrow_start != Some(start.offset) {
            self.advance()?;
            let expr = self.allow_in(|p| p.parse_expression())?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expr::Paren(Box::new(ParenExpr {
                loc: self.span_from(start),
                expr,
            })));
        }

        let cp = self.checkpoint();
        let mark = self.pending_objects.len();
        self.advance()?;
        let inner_start = self.start();
        // First construct that is only valid as an arrow parameter list.
        let mut not_expression = None;
        let items = self.allow_in(|p| {
            let mut items = Vec::new();
            if p.at(TokenKind::RightParen) {
                not_expression = Some(p.unexpected());
            }
            while !p.at(TokenKind::RightParen) {
                if p.at(TokenKind::DotDotDot) {
                    let rest_start = p.start();
                    not_expression.get_or_insert_with(|| p.unexpected());
                    p.advance()?;
                    let argument = p.parse_assignment_with(true)?;
                    items.push(Expr::Spread(Box::new(SpreadElement {
                        loc: p.span_from(rest_start),
                        argument: Box::new(argument),
                    })));
                    break;
                }
                items.push(p.parse_assignment_with(true)?);
                if !p.eat(TokenKind::Comma)? {
                    break;
                }
                if p.at(TokenKind::RightParen) {
                    not_expression.get_or_insert_with(|| p.unexpected());
                }
            }
            Ok(items)
        })?;
        let inner_loc = self.span_from(inner_start);
        self.expect(TokenKind::RightParen)?;

        if self.at(TokenKind::Arrow) {
            if self.tok().had_line_terminator_before {
                return Err(self.error_here(MessageKey::NewlineBeforeArrow, vec![]));
            }
            self.restore(cp);
            return self.parse_arrow_function(start, false);
        }
        if let Some(err) = not_expression {
            return Err(err);
        }
        self.commit_pending_objects(mark)?;
        let mut items = items;
        let expr = if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Sequence(Box::new(SequenceExpr {
                loc: inner_loc,
                expressions: items,
            }))
        };
        Ok(Expr::Paren(Box::new(ParenExpr {
            loc: self.span_from(start),
            expr,
        })))
    }

    // ── Literals ────────────────────────────────────────────────────────────

    pub(crate) fn parse_numeric_literal(&mut self) -> ParseResult<NumericLiteral> {
        let tok = self.tok();
        let loc = tok.span;
        let legacy = tok.flags.contains(TokenFlags::LEGACY_OCTAL);
        let value = tok.value.clone();
        if legacy {
            self.report_strict(loc.start, MessageKey::StrictOctalLiteral, vec![])?;
        }
        let raw = self.scanner.slice(loc).to_string();
        self.advance()?;
        match value {
            TokenValue::BigInt(value) => Ok(NumericLiteral::BigInt(BigIntLit { loc, value })),
            TokenValue::Number(value) => Ok(NumericLiteral::Number(NumLit { loc, value, raw })),
            _ => Err(self.error_at(loc.start, MessageKey::InvalidNumber, vec![])),
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> ParseResult<StringLit> {
        if !self.at(TokenKind::StringLiteral) {
            return Err(self.unexpected());
        }
        let tok = self.tok();
        let loc = tok.span;
        let value = tok.text().to_string();
        if tok.flags.contains(TokenFlags::OCTAL_ESCAPE) {
            self.report_strict(loc.start, MessageKey::StrictOctalEscape, vec![])?;
        }
        self.advance()?;
        Ok(StringLit { loc, value })
    }

    fn parse_regexp(&mut self) -> ParseResult<Expr> {
        self.scanner.read_regular_expression()?;
        let tok = self.tok();
        let loc = tok.span;
        let TokenValue::RegExp { pattern, flags } = &tok.value else {
            return Err(self.unexpected());
        };
        let (pattern, flags) = (pattern.clone(), flags.clone());
        self.regexp.validate(
            &pattern,
            &flags,
            &self.options.source_name,
            loc.start.line,
            loc.start.column,
        )?;
        self.advance()?;
        Ok(Expr::Regexp(RegExpLit { loc, pattern, flags }))
    }

    /// A template literal starting at the current template token.  Invalid
    /// escapes are only allowed in tagged templates.
    pub(crate) fn parse_template(&mut self, tagged: bool) -> ParseResult<TemplateLit> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let tok = self.tok();
            let kind = tok.kind;
            let loc = tok.span;
            let TokenValue::Template { cooked, raw } = &tok.value else {
                return Err(self.unexpected());
            };
            let (cooked, raw) = (cooked.clone(), raw.clone());
            if cooked.is_none() && !tagged {
                return Err(self.error_at(loc.start, MessageKey::InvalidTemplateEscape, vec![]));
            }
            let tail = matches!(kind, TokenKind::NoSubstitutionTemplate | TokenKind::TemplateTail);
            quasis.push(TemplateElement { loc, raw, cooked, tail });
            self.advance()?;
            if tail {
                break;
            }
            expressions.push(self.allow_in(|p| p.parse_expression())?);
            if !self.at(TokenKind::RightBrace) {
                return Err(self.unexpected());
            }
            self.scanner.read_template_continuation()?;
        }
        Ok(TemplateLit {
            loc: self.span_from(start),
            quasis,
            expressions,
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::LeftBracket)?;
        if self.has_feature(Features::COMPREHENSIONS) && self.at(TokenKind::For) {
            return self.parse_comprehension(start, false);
        }
        let mut trailing_comma_after_spread = false;
        let elements = self.allow_in(|p| {
            let mut elements = Vec::new();
            loop {
                if p.eat(TokenKind::RightBracket)? {
                    break;
                }
                if p.eat(TokenKind::Comma)? {
                    elements.push(None);
                    continue;
                }
                let element_start = p.start();
                let element = if p.eat(TokenKind::DotDotDot)? {
                    let argument = p.parse_assignment_with(true)?;
                    if p.at(TokenKind::Comma) && p.peek_kind()? == TokenKind::RightBracket {
                        trailing_comma_after_spread = true;
                    }
                    Expr::Spread(Box::new(SpreadElement {
                        loc: p.span_from(element_start),
                        argument: Box::new(argument),
                    }))
                } else {
                    p.parse_assignment_with(true)?
                };
                elements.push(Some(element));
                if !p.at(TokenKind::RightBracket) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            Ok(elements)
        })?;
        if trailing_comma_after_spread {
            self.spread_trailing_commas.insert(start.offset);
        }
        Ok(Expr::Array(Box::new(ArrayExpr {
            loc: self.span_from(start),
            elements,
        })))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let properties = self.allow_in(|p| {
            let mut properties = Vec::new();
            let mut has_proto = false;
            loop {
                if p.eat(TokenKind::RightBrace)? {
                    break;
                }
                properties.push(p.parse_object_member(start.offset, &mut has_proto)?);
                if !p.at(TokenKind::RightBrace) {
                    p.expect(TokenKind::Comma)?;
                }
            }
            Ok(properties)
        })?;
        Ok(Expr::Object(Box::new(ObjectExpr {
            loc: self.span_from(start),
            properties,
        })))
    }

    fn parse_object_member(
        &mut self,
        literal: usize,
        has_proto: &mut bool,
    ) -> ParseResult<ObjectProp> {
        let start = self.start();
        if self.eat(TokenKind::DotDotDot)? {
            let argument = self.parse_assignment_with(true)?;
            return Ok(ObjectProp::Spread(SpreadElement {
                loc: self.span_from(start),
                argument: Box::new(argument),
            }));
        }

        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor = None;
        if self.at_contextual("async") {
            let (next, newline) = self.peek_token()?;
            if !newline && starts_property_key(next) {
                self.advance()?;
                is_async = true;
            }
        }
        if self.eat(TokenKind::Star)? {
            is_generator = true;
        }
        if !is_async && !is_generator && (self.at_contextual("get") || self.at_contextual("set")) {
            let syntax = if self.at_contextual("get") {
                FunctionSyntax::Getter
            } else {
                FunctionSyntax::Setter
            };
            if starts_property_key(self.peek_kind()?) {
                self.advance()?;
                accessor = Some(syntax);
            }
        }

        let key_kind = self.kind();
        let key = self.parse_property_key()?;
        if is_async || is_generator || accessor.is_some() || self.at(TokenKind::LeftParen) {
            let syntax = accessor.unwrap_or(FunctionSyntax::Method);
            let kind = FunctionKind::new(is_async, is_generator);
            let function = Box::new(self.parse_method(start, kind, syntax, false)?);
            let value = match syntax {
                FunctionSyntax::Getter => PropValue::Get(function),
                FunctionSyntax::Setter => PropValue::Set(function),
                _ => PropValue::Method(function),
            };
            return Ok(ObjectProp::Prop(Box::new(Prop {
                loc: self.span_from(start),
                key,
                value,
            })));
        }

        if self.eat(TokenKind::Colon)? {
            let value = self.parse_assignment_with(true)?;
            if key.static_name() == Some("__proto__") {
                if *has_proto {
                    let error = self.error_at(key.loc().start, MessageKey::DuplicateProto, vec![]);
                    self.pending_objects.push(PendingObjectError { literal, error });
                }
                *has_proto = true;
            }
            return Ok(ObjectProp::Prop(Box::new(Prop {
                loc: self.span_from(start),
                key,
                value: PropValue::Value(Box::new(value)),
            })));
        }

        // Shorthand `{ name }` or cover-initialized `{ name = value }`.
        let PropKey::Ident(ident) = &key else {
            return Err(self.unexpected());
        };
        if key_kind == TokenKind::EscapedKeyword {
            return Err(self.error_at(
                ident.loc.start,
                MessageKey::InvalidEscapedKeyword,
                vec![ident.name.clone()],
            ));
        }
        if !is_identifier_kind(key_kind) {
            return Err(self.error_at(
                ident.loc.start,
                MessageKey::ReservedWord,
                vec![ident.name.clone()],
            ));
        }
        self.check_identifier(&ident.name, ident.loc.start, IdentUse::Reference)?;
        let reference = self.scopes.add_reference(self.scope, &ident.name, ident.loc);
        let target = IdentRef {
            loc: ident.loc,
            name: ident.name.clone(),
            reference,
        };
        let value = if self.at(TokenKind::Equal) {
            let error = self.error_here(MessageKey::CoverInitializedName, vec![]);
            self.pending_objects.push(PendingObjectError { literal, error });
            self.advance()?;
            let default = self.parse_assignment()?;
            PropValue::CoverInitialized {
                target,
                default: Box::new(default),
            }
        } else {
            PropValue::Shorthand(target)
        };
        Ok(ObjectProp::Prop(Box::new(Prop {
            loc: self.span_from(start),
            key,
            value,
        })))
    }

    /// `PropertyName`: identifier name, string, number or `[ computed ]`.
    pub(crate) fn parse_property_key(&mut self) -> ParseResult<PropKey> {
        match self.kind() {
            TokenKind::StringLiteral => Ok(PropKey::Str(self.parse_string_literal()?)),
            TokenKind::NumericLiteral => Ok(match self.parse_numeric_literal()? {
                NumericLiteral::Number(n) => PropKey::Num(n),
                NumericLiteral::BigInt(b) => PropKey::BigInt(b),
            }),
            TokenKind::LeftBracket => {
                self.advance()?;
                let expr = self.allow_in(|p| p.parse_assignment())?;
                self.expect(TokenKind::RightBracket)?;
                Ok(PropKey::Computed(Box::new(expr)))
            }
            kind if kind.is_identifier_name() => {
                let tok = self.tok();
                let ident = Ident {
                    loc: tok.span,
                    name: tok.text().to_string(),
                };
                self.advance()?;
                Ok(PropKey::Ident(ident))
            }
            _ => Err(self.unexpected()),
        }
    }

    // ── Staged extensions ───────────────────────────────────────────────────

    /// `function.sent`
    fn parse_function_sent(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        self.expect(TokenKind::Dot)?;
        if !self.at_contextual("sent") {
            return Err(self.unexpected());
        }
        self.advance()?;
        if !self.has_flag(ContextFlags::GENERATOR) {
            return Err(self.error_at(start, MessageKey::InvalidFunctionSent, vec![]));
        }
        Ok(Expr::MetaProp(MetaPropExpr {
            loc: self.span_from(start),
            kind: MetaPropKind::FunctionSent,
        }))
    }

    /// `%Name(arguments)`
    fn parse_native_call(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        if !self.at(TokenKind::Identifier) || self.tok().span.start.offset != start.offset + 1 {
            return Err(self.unexpected());
        }
        let tok = self.tok();
        let name = Ident {
            loc: tok.span,
            name: tok.text().to_string(),
        };
        self.advance()?;
        let arguments = self.parse_argument_list(false)?;
        Ok(Expr::NativeCall(Box::new(NativeCallExpr {
            loc: self.span_from(start),
            name,
            arguments,
        })))
    }

    /// `do { StatementList }`
    fn parse_do_expression(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.advance()?;
        let block_start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let scope = self.enter_scope(ScopeKind::Block, block_start);
        let body = self.allow_in(|p| {
            let mut body = Vec::new();
            while !p.at(TokenKind::RightBrace) {
                body.push(p.parse_statement_list_item()?);
            }
            Ok(body)
        })?;
        self.expect(TokenKind::RightBrace)?;
        self.leave_scope(scope);
        Ok(Expr::Do(Box::new(DoExpr {
            loc: self.span_from(start),
            body,
            scope,
        })))
    }

    /// `[for (x of xs) if (c) body]` or `(for (x of xs) body)`; the current
    /// token is the first `for`.
    fn parse_comprehension(&mut self, start: Position, generator: bool) -> ParseResult<Expr> {
        let mut clauses = Vec::new();
        let mut scopes = Vec::new();
        let result = self.allow_in(|p| {
            while p.at(TokenKind::For) {
                let clause_start = p.start();
                p.advance()?;
                p.expect(TokenKind::LeftParen)?;
                let scope = p.enter_scope(ScopeKind::Block, clause_start);
                scopes.push(scope);
                let left = p.parse_binding_target(BindingKind::Let)?;
                if !p.at_contextual("of") {
                    let found = p.token_name();
                    return Err(p.error_here(
                        MessageKey::ExpectedToken,
                        vec!["of".to_string(), found],
                    ));
                }
                p.advance()?;
                let right = p.parse_assignment()?;
                p.expect(TokenKind::RightParen)?;
                clauses.push(ComprehensionClause::For {
                    loc: p.span_from(clause_start),
                    left,
                    right,
                    scope,
                });
            }
            while p.at(TokenKind::If) {
                let clause_start = p.start();
                p.advance()?;
                p.expect(TokenKind::LeftParen)?;
                let test = p.parse_expression()?;
                p.expect(TokenKind::RightParen)?;
                clauses.push(ComprehensionClause::If {
                    loc: p.span_from(clause_start),
                    test,
                });
            }
            let body = p.parse_assignment()?;
            p.expect(if generator {
                TokenKind::RightParen
            } else {
                TokenKind::RightBracket
            })?;
            Ok(body)
        });
        let body = result?;
        for scope in scopes.into_iter().rev() {
            self.leave_scope(scope);
        }
        Ok(Expr::Comprehension(Box::new(ComprehensionExpr {
            loc: self.span_from(start),
            generator,
            clauses,
            body: Box::new(body),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let (add, _) = binary_operator(TokenKind::Plus, false).unwrap();
        let (mul, _) = binary_operator(TokenKind::Star, false).unwrap();
        let (exp, _) = binary_operator(TokenKind::StarStar, false).unwrap();
        assert!(mul > add);
        assert!(exp > mul);
    }

    #[test]
    fn test_in_excluded_from_for_heads() {
        assert!(binary_operator(TokenKind::In, false).is_some());
        assert!(binary_operator(TokenKind::In, true).is_none());
        assert!(binary_operator(TokenKind::Instanceof, true).is_some());
    }

    #[test]
    fn test_coalesce_is_loosest() {
        let (coalesce, op) = binary_operator(TokenKind::QuestionQuestion, false).unwrap();
        let (or, _) = binary_operator(TokenKind::PipePipe, false).unwrap();
        assert_eq!(op, Operator::Logical(LogicalOp::NullishCoalesce));
        assert!(coalesce < or);
    }

    #[test]
    fn test_assign_operator_table() {
        assert_eq!(assign_operator(TokenKind::Equal), Some(AssignOp::Assign));
        assert_eq!(
            assign_operator(TokenKind::QuestionQuestionEqual),
            Some(AssignOp::NullishAssign)
        );
        assert_eq!(assign_operator(TokenKind::EqualEqual), None);
    }

    #[test]
    fn test_yield_operand_terminators() {
        assert!(ends_yield_operand(TokenKind::RightParen));
        assert!(ends_yield_operand(TokenKind::Colon));
        assert!(!ends_yield_operand(TokenKind::Identifier));
        assert!(!ends_yield_operand(TokenKind::LeftBracket));
    }
}
