//! Statements and declarations.

use crate::error::ParseResult;
use crate::messages::MessageKey;
use crate::options::Features;

use super::Parser;
use super::ast::{
    BlockStmt, BreakStmt, CatchClause, ContinueStmt, DebuggerStmt, DoWhileStmt, EmptyStmt, Expr,
    ExprStmt, ForInOfLeft, ForInStmt, ForInit, ForOfStmt, ForStmt, FunctionKind, Ident, IfStmt,
    LabeledStmt, Pat, ReturnStmt, Stmt, SwitchCase, SwitchStmt, ThrowStmt, TryStmt, VarDecl,
    VarDeclarator, VarKind, WhileStmt, WithStmt,
};
use super::context::{ContextFlags, Label};
use super::patterns::{BindingKind, IdentUse, is_identifier_kind};
use super::scanner::{Position, TokenKind};
use super::scope::{ScopeId, ScopeKind};

/// Where a statement appears.  Declarations are only allowed in statement
/// lists; Annex B admits a function declaration as the body of an `if`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementPosition {
    List,
    Body,
    IfBody,
}

impl Parser<'_> {
    // ── Statement lists ─────────────────────────────────────────────────────

    /// Leading string-literal statements.  Returns the statements read and
    /// whether one of them was a `"use strict"` directive; the current
    /// context's strictness is resolved either way.
    pub(crate) fn parse_directive_prologue(&mut self) -> ParseResult<(Vec<Stmt>, bool)> {
        let mut statements = Vec::new();
        let mut use_strict = false;
        while self.at(TokenKind::StringLiteral) {
            let token_loc = self.tok().span;
            let quoted = self.scanner.slice(token_loc);
            let raw = quoted
                .get(1..quoted.len().saturating_sub(1))
                .unwrap_or_default()
                .to_string();
            let mut stmt = self.parse_statement(StatementPosition::List)?;
            let Stmt::Expr(expr_stmt) = &mut stmt else {
                statements.push(stmt);
                break;
            };
            if !matches!(&*expr_stmt.expr, Expr::Str(lit) if lit.loc == token_loc) {
                statements.push(stmt);
                break;
            }
            let strict_directive = raw == "use strict";
            expr_stmt.directive = Some(raw);
            statements.push(stmt);
            if strict_directive && !use_strict {
                use_strict = true;
                self.contexts.resolve_strictness(true)?;
            }
        }
        if !use_strict {
            self.contexts.resolve_strictness(false)?;
        }
        Ok((statements, use_strict))
    }

    /// `StatementListItem`: a declaration or a statement.
    pub(crate) fn parse_statement_list_item(&mut self) -> ParseResult<Stmt> {
        self.nested(|p| {
            let start = p.start();
            match p.kind() {
                TokenKind::Function => Ok(Stmt::FnDecl(Box::new(
                    p.parse_function_declaration(start, false, false)?,
                ))),
                TokenKind::Class => {
                    Ok(Stmt::ClassDecl(Box::new(p.parse_class(start, Vec::new(), true)?)))
                }
                TokenKind::At => {
                    p.require_feature(Features::DECORATORS, "decorators")?;
                    let decorators = p.parse_decorators()?;
                    if !p.at(TokenKind::Class) {
                        return Err(p.unexpected());
                    }
                    Ok(Stmt::ClassDecl(Box::new(p.parse_class(start, decorators, true)?)))
                }
                TokenKind::Const => p.parse_lexical_statement(VarKind::Const),
                TokenKind::Let if p.let_starts_declaration()? => {
                    p.parse_lexical_statement(VarKind::Let)
                }
                TokenKind::Identifier if p.at_async_function()? => {
                    p.advance()?;
                    Ok(Stmt::FnDecl(Box::new(p.parse_function_declaration(start, true, false)?)))
                }
                _ => p.parse_statement(StatementPosition::List),
            }
        })
    }

    /// `let` followed by something that can only continue a declaration.
    pub(crate) fn let_starts_declaration(&mut self) -> ParseResult<bool> {
        let next = self.peek_kind()?;
        Ok(is_identifier_kind(next)
            || matches!(next, TokenKind::LeftBracket | TokenKind::LeftBrace))
    }

    /// `async function` with no line break between the two words.
    pub(crate) fn at_async_function(&mut self) -> ParseResult<bool> {
        if !self.at_contextual("async") {
            return Ok(false);
        }
        let (next, newline) = self.peek_token()?;
        Ok(next == TokenKind::Function && !newline)
    }

    fn parse_lexical_statement(&mut self, kind: VarKind) -> ParseResult<Stmt> {
        let decl = self.parse_variable_declaration(kind, false)?;
        self.consume_semicolon()?;
        Ok(Stmt::VarDecl(decl))
    }

    // ── Statements ──────────────────────────────────────────────────────────

    pub(crate) fn parse_statement(&mut self, position: StatementPosition) -> ParseResult<Stmt> {
        self.nested(|p| {
            let attached = std::mem::take(&mut p.contexts.current_mut().pending_labels);
            let start = p.start();
            match p.kind() {
                TokenKind::LeftBrace => Ok(Stmt::Block(p.parse_block()?)),
                TokenKind::Semicolon => {
                    p.advance()?;
                    Ok(Stmt::Empty(EmptyStmt { loc: p.span_from(start) }))
                }
                TokenKind::Var => {
                    let decl = p.parse_variable_declaration(VarKind::Var, false)?;
                    p.consume_semicolon()?;
                    Ok(Stmt::VarDecl(decl))
                }
                TokenKind::If => p.parse_if(),
                TokenKind::For => p.parse_for(attached),
                TokenKind::While => p.parse_while(attached),
                TokenKind::Do => p.parse_do_while(attached),
                TokenKind::Continue => p.parse_continue(),
                TokenKind::Break => p.parse_break(),
                TokenKind::Return => p.parse_return(),
                TokenKind::With => p.parse_with(),
                TokenKind::Switch => p.parse_switch(),
                TokenKind::Throw => p.parse_throw(),
                TokenKind::Try => p.parse_try(),
                TokenKind::Debugger => {
                    p.advance()?;
                    p.consume_semicolon()?;
                    Ok(Stmt::Debugger(DebuggerStmt { loc: p.span_from(start) }))
                }
                TokenKind::Function => p.parse_function_in_body(start, position),
                TokenKind::Class | TokenKind::Const => {
                    Err(p.error_here(MessageKey::LexicalDeclarationNotAllowed, vec![]))
                }
                TokenKind::At if p.has_feature(Features::DECORATORS) => {
                    Err(p.error_here(MessageKey::LexicalDeclarationNotAllowed, vec![]))
                }
                TokenKind::Let => {
                    let (next, newline) = p.peek_token()?;
                    if next == TokenKind::LeftBracket {
                        return Err(p.error_here(MessageKey::LetBracket, vec![]));
                    }
                    if !newline && (is_identifier_kind(next) || next == TokenKind::LeftBrace) {
                        return Err(p.error_here(MessageKey::LexicalDeclarationNotAllowed, vec![]));
                    }
                    p.parse_expression_statement()
                }
                TokenKind::Identifier if p.at_async_function()? => Err(p.error_here(
                    MessageKey::FunctionDeclarationNotAllowed,
                    vec!["async function".to_string()],
                )),
                kind if is_identifier_kind(kind) && p.peek_kind()? == TokenKind::Colon => {
                    p.parse_labeled(attached, position)
                }
                _ => p.parse_expression_statement(),
            }
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        let expr = self.allow_in(|p| p.parse_expression())?;
        self.consume_semicolon()?;
        Ok(Stmt::Expr(ExprStmt {
            loc: self.span_from(start),
            expr: Box::new(expr),
            directive: None,
        }))
    }

    /// `function` where only a statement is allowed.
    fn parse_function_in_body(
        &mut self,
        start: Position,
        position: StatementPosition,
    ) -> ParseResult<Stmt> {
        let annex_b_if = position == StatementPosition::IfBody
            && !self.is_strict()
            && self.has_feature(Features::ANNEX_B)
            && self.peek_kind()? != TokenKind::Star;
        if !annex_b_if {
            return Err(self.error_here(
                MessageKey::FunctionDeclarationNotAllowed,
                vec!["function".to_string()],
            ));
        }
        // The function is scoped as if wrapped in a block.
        let scope = self.enter_scope(ScopeKind::Block, start);
        let function = self.parse_function_declaration(start, false, false)?;
        self.leave_scope(scope);
        Ok(Stmt::Block(BlockStmt {
            loc: self.span_from(start),
            body: vec![Stmt::FnDecl(Box::new(function))],
            scope,
        }))
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<BlockStmt> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let scope = self.enter_scope(ScopeKind::Block, start);
        let body = self.parse_block_body()?;
        self.leave_scope(scope);
        Ok(BlockStmt {
            loc: self.span_from(start),
            body,
            scope,
        })
    }

    /// Statements up to and including the closing `}`.
    fn parse_block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        let body = self.allow_in(|p| {
            let mut body = Vec::new();
            while !p.at(TokenKind::RightBrace) {
                body.push(p.parse_statement_list_item()?);
            }
            Ok(body)
        })?;
        self.expect(TokenKind::RightBrace)?;
        Ok(body)
    }

    // ── Declarations ────────────────────────────────────────────────────────

    /// `var`, `let` or `const` declaration list, without the terminating
    /// semicolon.  In a for-statement head the initializer checks are left
    /// to the caller, which knows whether the loop is for-in/of.
    pub(crate) fn parse_variable_declaration(
        &mut self,
        kind: VarKind,
        in_for: bool,
    ) -> ParseResult<VarDecl> {
        let start = self.start();
        self.advance()?;
        let binding_kind = match kind {
            VarKind::Var => BindingKind::Var,
            VarKind::Let => BindingKind::Let,
            VarKind::Const => BindingKind::Const,
        };
        let mut declarators = Vec::new();
        loop {
            let declarator_start = self.start();
            let id = self.parse_binding_target(binding_kind)?;
            let init = if self.eat(TokenKind::Equal)? {
                Some(Box::new(self.parse_assignment()?))
            } else {
                None
            };
            let declarator = VarDeclarator {
                loc: self.span_from(declarator_start),
                id,
                init,
            };
            if !in_for {
                self.check_initializer(kind, &declarator)?;
            }
            declarators.push(declarator);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(VarDecl {
            loc: self.span_from(start),
            kind,
            declarators,
        })
    }

    fn check_initializer(&self, kind: VarKind, declarator: &VarDeclarator) -> ParseResult<()> {
        if declarator.init.is_some() {
            return Ok(());
        }
        let at = declarator.loc.start;
        if kind == VarKind::Const {
            return Err(self.error_at(at, MessageKey::ConstWithoutInitializer, vec![]));
        }
        if !matches!(declarator.id, Pat::Ident(_)) {
            return Err(self.error_at(at, MessageKey::DestructuringWithoutInitializer, vec![]));
        }
        Ok(())
    }

    // ── Control flow ────────────────────────────────────────────────────────

    fn parse_paren_expression(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::LeftParen)?;
        let expr = self.allow_in(|p| p.parse_expression())?;
        self.expect(TokenKind::RightParen)?;
        Ok(expr)
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement(StatementPosition::IfBody)?;
        let alternate = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_statement(StatementPosition::IfBody)?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            loc: self.span_from(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate,
        }))
    }

    /// Labels directly attached to a loop may be targeted by `continue`.
    fn mark_iteration_labels(&mut self, attached: usize) {
        let labels = &mut self.contexts.current_mut().labels;
        let first = labels.len().saturating_sub(attached);
        for label in &mut labels[first..] {
            label.iteration = true;
        }
    }

    fn parse_loop_body(&mut self, attached: usize) -> ParseResult<Stmt> {
        self.mark_iteration_labels(attached);
        let ctx = self.contexts.current_mut();
        ctx.iteration_depth += 1;
        ctx.breakable_depth += 1;
        let body = self.parse_statement(StatementPosition::Body);
        let ctx = self.contexts.current_mut();
        ctx.iteration_depth -= 1;
        ctx.breakable_depth -= 1;
        body
    }

    fn parse_while(&mut self, attached: usize) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let test = self.parse_paren_expression()?;
        let body = self.parse_loop_body(attached)?;
        Ok(Stmt::While(WhileStmt {
            loc: self.span_from(start),
            test: Box::new(test),
            body: Box::new(body),
        }))
    }

    fn parse_do_while(&mut self, attached: usize) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let body = self.parse_loop_body(attached)?;
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression()?;
        // A semicolon is inserted after do-while even on the same line.
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile(DoWhileStmt {
            loc: self.span_from(start),
            body: Box::new(body),
            test: Box::new(test),
        }))
    }

    fn parse_for(&mut self, attached: usize) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let mut is_await = false;
        if self.at(TokenKind::Await) {
            if !self.has_flag(ContextFlags::AWAIT_ALLOWED) {
                return Err(self.error_here(MessageKey::ForAwaitNotAllowed, vec![]));
            }
            self.advance()?;
            is_await = true;
        }
        self.expect(TokenKind::LeftParen)?;
        let lexical = match self.kind() {
            TokenKind::Const => Some(VarKind::Const),
            TokenKind::Let if self.let_starts_declaration()? => Some(VarKind::Let),
            _ => None,
        };
        let scope = lexical.map(|_| self.enter_scope(ScopeKind::Block, start));
        let result = self.parse_for_head(start, attached, is_await, lexical, scope);
        if let Some(scope) = scope {
            self.leave_scope(scope);
        }
        result
    }

    fn parse_for_head(
        &mut self,
        start: Position,
        attached: usize,
        is_await: bool,
        lexical: Option<VarKind>,
        scope: Option<ScopeId>,
    ) -> ParseResult<Stmt> {
        if self.at(TokenKind::Semicolon) {
            if is_await {
                return Err(self.unexpected());
            }
            return self.parse_for_rest(start, None, attached, scope);
        }

        let declaration_kind = lexical.or(self.at(TokenKind::Var).then_some(VarKind::Var));
        if let Some(kind) = declaration_kind {
            let saved_no_in = std::mem::replace(&mut self.no_in, true);
            let decl = self.parse_variable_declaration(kind, true);
            self.no_in = saved_no_in;
            let decl = decl?;
            if let Some(keyword) = self.for_in_of_keyword(is_await)? {
                self.check_for_in_of_declaration(&decl, keyword)?;
                let left = ForInOfLeft::VarDecl(decl);
                return self.parse_for_in_of(start, left, keyword, is_await, attached, scope);
            }
            if is_await {
                return Err(self.unexpected());
            }
            for declarator in &decl.declarators {
                self.check_initializer(kind, declarator)?;
            }
            return self.parse_for_rest(start, Some(ForInit::VarDecl(decl)), attached, scope);
        }

        let head_start = self.start();
        let starts_with_let = self.at(TokenKind::Let);
        let starts_with_async = self.at_contextual("async");
        let mark = self.pending_objects.len();
        let saved_no_in = std::mem::replace(&mut self.no_in, true);
        let expr = self.parse_expression_with(true);
        self.no_in = saved_no_in;
        let expr = expr?;

        if let Some(keyword) = self.for_in_of_keyword(is_await)? {
            if keyword == "of" {
                if starts_with_let {
                    return Err(self.error_at(
                        head_start,
                        MessageKey::InvalidForInOfTarget,
                        vec![keyword.to_string()],
                    ));
                }
                if starts_with_async
                    && !is_await
                    && matches!(&expr, Expr::Ident(id) if id.name == "async")
                {
                    return Err(self.error_at(head_start, MessageKey::ForAsyncOf, vec![]));
                }
            }
            let target = self.to_for_target(expr, keyword)?;
            self.commit_pending_objects(mark)?;
            let left = ForInOfLeft::Pat(target);
            return self.parse_for_in_of(start, left, keyword, is_await, attached, scope);
        }
        self.commit_pending_objects(mark)?;
        if is_await {
            return Err(self.unexpected());
        }
        self.parse_for_rest(start, Some(ForInit::Expr(Box::new(expr))), attached, scope)
    }

    /// `in` or `of` after a for-statement head, if present.  `for await`
    /// only admits `of`.
    fn for_in_of_keyword(&self, is_await: bool) -> ParseResult<Option<&'static str>> {
        if self.at(TokenKind::In) {
            if is_await {
                return Err(self.unexpected());
            }
            return Ok(Some("in"));
        }
        if self.at_contextual("of") {
            return Ok(Some("of"));
        }
        Ok(None)
    }

    fn check_for_in_of_declaration(&self, decl: &VarDecl, keyword: &str) -> ParseResult<()> {
        if decl.declarators.len() != 1 {
            return Err(self.error_at(
                decl.loc.start,
                MessageKey::ForInOfMultipleBindings,
                vec![keyword.to_string()],
            ));
        }
        let declarator = &decl.declarators[0];
        if declarator.init.is_some() {
            // Annex B: `for (var x = init in obj)` in sloppy code.
            let legacy = keyword == "in"
                && decl.kind == VarKind::Var
                && !self.is_strict()
                && self.has_feature(Features::ANNEX_B)
                && matches!(declarator.id, Pat::Ident(_));
            if !legacy {
                return Err(self.error_at(
                    declarator.loc.start,
                    MessageKey::ForInOfInitializer,
                    vec![keyword.to_string()],
                ));
            }
        }
        Ok(())
    }

    fn parse_for_in_of(
        &mut self,
        start: Position,
        left: ForInOfLeft,
        keyword: &str,
        is_await: bool,
        attached: usize,
        scope: Option<ScopeId>,
    ) -> ParseResult<Stmt> {
        self.advance()?;
        let right = if keyword == "in" {
            self.allow_in(|p| p.parse_expression())?
        } else {
            self.allow_in(|p| p.parse_assignment())?
        };
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_loop_body(attached)?;
        let loc = self.span_from(start);
        if keyword == "in" {
            return Ok(Stmt::ForIn(ForInStmt {
                loc,
                left,
                right: Box::new(right),
                body: Box::new(body),
                scope,
            }));
        }
        Ok(Stmt::ForOf(ForOfStmt {
            loc,
            is_await,
            left,
            right: Box::new(right),
            body: Box::new(body),
            scope,
        }))
    }

    /// `; test ; update ) body` of a C-style for statement.
    fn parse_for_rest(
        &mut self,
        start: Position,
        init: Option<ForInit>,
        attached: usize,
        scope: Option<ScopeId>,
    ) -> ParseResult<Stmt> {
        self.expect(TokenKind::Semicolon)?;
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.allow_in(|p| p.parse_expression())?))
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.allow_in(|p| p.parse_expression())?))
        };
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_loop_body(attached)?;
        Ok(Stmt::For(ForStmt {
            loc: self.span_from(start),
            init,
            test,
            update,
            body: Box::new(body),
            scope,
        }))
    }

    fn parse_label_operand(&mut self) -> ParseResult<Option<Ident>> {
        if self.tok().had_line_terminator_before || !is_identifier_kind(self.kind()) {
            return Ok(None);
        }
        let (name, loc) = self.parse_identifier(IdentUse::Label)?;
        Ok(Some(Ident { loc, name }))
    }

    fn parse_continue(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let label = self.parse_label_operand()?;
        let ctx = self.contexts.current();
        match &label {
            Some(label) => match ctx.find_label(&label.name) {
                None => {
                    return Err(self.error_at(
                        label.loc.start,
                        MessageKey::UndefinedLabel,
                        vec![label.name.clone()],
                    ));
                }
                Some(found) if !found.iteration => {
                    return Err(self.error_at(
                        label.loc.start,
                        MessageKey::ContinueNonIterationLabel,
                        vec![label.name.clone()],
                    ));
                }
                Some(_) => {}
            },
            None if ctx.iteration_depth == 0 => {
                return Err(self.error_at(start, MessageKey::IllegalContinue, vec![]));
            }
            None => {}
        }
        self.consume_semicolon()?;
        Ok(Stmt::Continue(ContinueStmt {
            loc: self.span_from(start),
            label,
        }))
    }

    fn parse_break(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let label = self.parse_label_operand()?;
        let ctx = self.contexts.current();
        match &label {
            Some(label) if ctx.find_label(&label.name).is_none() => {
                return Err(self.error_at(
                    label.loc.start,
                    MessageKey::UndefinedLabel,
                    vec![label.name.clone()],
                ));
            }
            None if ctx.breakable_depth == 0 => {
                return Err(self.error_at(start, MessageKey::IllegalBreak, vec![]));
            }
            _ => {}
        }
        self.consume_semicolon()?;
        Ok(Stmt::Break(BreakStmt {
            loc: self.span_from(start),
            label,
        }))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        if !self.has_flag(ContextFlags::RETURN) {
            return Err(self.error_here(MessageKey::ReturnOutsideFunction, vec![]));
        }
        self.advance()?;
        let tok = self.tok();
        let argument = if tok.had_line_terminator_before
            || matches!(tok.kind, TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof)
        {
            None
        } else {
            Some(Box::new(self.allow_in(|p| p.parse_expression())?))
        };
        self.consume_semicolon()?;
        Ok(Stmt::Return(ReturnStmt {
            loc: self.span_from(start),
            argument,
        }))
    }

    fn parse_throw(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        if self.tok().had_line_terminator_before {
            return Err(self.error_here(MessageKey::NewlineAfterThrow, vec![]));
        }
        let argument = self.allow_in(|p| p.parse_expression())?;
        self.consume_semicolon()?;
        Ok(Stmt::Throw(ThrowStmt {
            loc: self.span_from(start),
            argument: Box::new(argument),
        }))
    }

    fn parse_with(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.report_strict(start, MessageKey::StrictWith, vec![])?;
        self.advance()?;
        let object = self.parse_paren_expression()?;
        let scope = self.enter_scope(ScopeKind::With, self.start());
        let body = self.parse_statement(StatementPosition::Body);
        self.leave_scope(scope);
        Ok(Stmt::With(WithStmt {
            loc: self.span_from(start),
            object: Box::new(object),
            body: Box::new(body?),
            scope,
        }))
    }

    fn parse_switch(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let discriminant = self.parse_paren_expression()?;
        let block_start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let scope = self.enter_scope(ScopeKind::Block, block_start);
        self.contexts.current_mut().breakable_depth += 1;
        let cases = self.allow_in(|p| p.parse_switch_cases());
        self.contexts.current_mut().breakable_depth -= 1;
        let cases = cases?;
        self.expect(TokenKind::RightBrace)?;
        self.leave_scope(scope);
        Ok(Stmt::Switch(SwitchStmt {
            loc: self.span_from(start),
            discriminant: Box::new(discriminant),
            cases,
            scope,
        }))
    }

    fn parse_switch_cases(&mut self) -> ParseResult<Vec<SwitchCase>> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(TokenKind::RightBrace) {
            let case_start = self.start();
            let test = match self.kind() {
                TokenKind::Case => {
                    self.advance()?;
                    Some(self.parse_expression()?)
                }
                TokenKind::Default if !seen_default => {
                    seen_default = true;
                    self.advance()?;
                    None
                }
                _ => return Err(self.unexpected()),
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
            ) {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(SwitchCase {
                loc: self.span_from(case_start),
                test,
                consequent,
            });
        }
        Ok(cases)
    }

    fn parse_try(&mut self) -> ParseResult<Stmt> {
        let start = self.start();
        self.advance()?;
        let block = self.parse_block()?;
        let handler = if self.at(TokenKind::Catch) {
            Some(self.parse_catch()?)
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected());
        }
        Ok(Stmt::Try(TryStmt {
            loc: self.span_from(start),
            block,
            handler,
            finalizer,
        }))
    }

    /// `catch (param) { … }`.  The parameter and the block's declarations
    /// share one scope, so a lexical redeclaration of the parameter fails.
    fn parse_catch(&mut self) -> ParseResult<CatchClause> {
        let start = self.start();
        self.advance()?;
        let scope = self.enter_scope(ScopeKind::Catch, start);
        let param = if self.eat(TokenKind::LeftParen)? {
            let param = self.parse_binding_target(BindingKind::CatchParameter)?;
            if matches!(param, Pat::Ident(_)) {
                self.scopes.mark_simple_catch_parameter(scope);
            }
            self.expect(TokenKind::RightParen)?;
            Some(param)
        } else {
            self.require_feature(Features::OPTIONAL_CATCH, "catch without binding")?;
            None
        };
        let body_start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let body = self.parse_block_body()?;
        let body = BlockStmt {
            loc: self.span_from(body_start),
            body,
            scope,
        };
        self.leave_scope(scope);
        Ok(CatchClause {
            loc: self.span_from(start),
            param,
            body,
        })
    }

    /// `label: statement`
    fn parse_labeled(&mut self, attached: usize, position: StatementPosition) -> ParseResult<Stmt> {
        let start = self.start();
        let (name, loc) = self.parse_identifier(IdentUse::Label)?;
        self.expect(TokenKind::Colon)?;
        if self.contexts.find_label(&name).is_some() {
            return Err(self.error_at(loc.start, MessageKey::DuplicateLabel, vec![name]));
        }
        let ctx = self.contexts.current_mut();
        ctx.labels.push(Label {
            name: name.clone(),
            iteration: false,
        });

        let body = if self.at(TokenKind::Function) {
            self.contexts.current_mut().pending_labels = 0;
            self.parse_labelled_function(position)
        } else {
            self.contexts.current_mut().pending_labels = attached + 1;
            let inner = if position == StatementPosition::List {
                StatementPosition::List
            } else {
                StatementPosition::Body
            };
            self.parse_statement(inner)
        };
        self.contexts.current_mut().labels.pop();
        Ok(Stmt::Labeled(LabeledStmt {
            loc: self.span_from(start),
            label: Ident { loc, name },
            body: Box::new(body?),
        }))
    }

    /// Annex B labelled function declarations: sloppy code, statement-list
    /// position, plain functions only.
    fn parse_labelled_function(&mut self, position: StatementPosition) -> ParseResult<Stmt> {
        let start = self.start();
        let allowed = position == StatementPosition::List
            && !self.is_strict()
            && self.has_feature(Features::ANNEX_B)
            && self.peek_kind()? != TokenKind::Star;
        if !allowed {
            return Err(self.error_here(MessageKey::InvalidLabelledFunction, vec![]));
        }
        let function = self.parse_function_declaration(start, false, false)?;
        debug_assert_eq!(function.kind, FunctionKind::Normal);
        Ok(Stmt::FnDecl(Box::new(function)))
    }
}
