//! Import and export declarations.
//!
//! Import bindings are lexical declarations of the module scope.  Exported
//! names are collected as they are parsed; names exported from local
//! bindings (`export { x }`) can only be checked once the whole module has
//! been read, in [`Parser::check_module_exports`].

use indexmap::IndexMap;

use crate::error::ParseResult;
use crate::messages::MessageKey;
use crate::options::Features;

use super::Parser;
use super::ast::{
    BindingIdent, ExportAllDecl, ExportDefaultDecl, ExportDefaultExpr, ExportNamedDecl,
    ExportSpecifier, Expr, Ident, ImportAttribute, ImportDecl, ImportDefaultSpecifier,
    ImportNamedSpecifier, ImportNamespaceSpecifier, ImportSpecifier, ModuleDecl,
    ModuleExportName, ObjectPatProp, Pat, ProgramItem, Stmt, StringLit,
};
use super::patterns::{IdentUse, is_identifier_kind};
use super::scanner::{Position, Span, TokenKind};
use super::scope::{DeclarationKind, NameId};

/// Export bookkeeping for the module being parsed.
#[derive(Debug, Default)]
pub(crate) struct ModuleState {
    /// Every exported name, in source order.
    exported: IndexMap<String, Span>,
    /// Local bindings named by `export { … }` clauses without `from`.
    local_exports: Vec<(String, Span)>,
}

/// Names bound by a binding pattern, in source order.
fn collect_bound_names(pat: &Pat, out: &mut Vec<(String, Span)>) {
    match pat {
        Pat::Ident(id) => out.push((id.name.clone(), id.loc)),
        Pat::Expr(_) => {}
        Pat::Array(array) => {
            for element in array.elements.iter().flatten() {
                collect_bound_names(element, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.properties {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_bound_names(&kv.value, out),
                    ObjectPatProp::Assign(shorthand) => collect_bound_names(&shorthand.target, out),
                    ObjectPatProp::Rest(rest) => collect_bound_names(&rest.argument, out),
                }
            }
        }
        Pat::Rest(rest) => collect_bound_names(&rest.argument, out),
        Pat::Assign(assign) => collect_bound_names(&assign.left, out),
    }
}

/// Names a declaration statement binds, or `None` for a statement that is
/// not a declaration.
fn declared_names(stmt: &Stmt) -> Option<Vec<(String, Span)>> {
    let mut names = Vec::new();
    match stmt {
        Stmt::VarDecl(decl) => {
            for declarator in &decl.declarators {
                collect_bound_names(&declarator.id, &mut names);
            }
        }
        Stmt::FnDecl(function) => {
            names.extend(function.id.iter().map(|id| (id.name.clone(), id.loc)))
        }
        Stmt::ClassDecl(class) => names.extend(class.id.iter().map(|id| (id.name.clone(), id.loc))),
        _ => return None,
    }
    Some(names)
}

impl Parser<'_> {
    /// `ModuleItem`: an import or export declaration, or a statement.
    pub(crate) fn parse_module_item(&mut self) -> ParseResult<ProgramItem> {
        match self.kind() {
            TokenKind::Import
                if !matches!(self.peek_kind()?, TokenKind::LeftParen | TokenKind::Dot) =>
            {
                Ok(ProgramItem::ModuleDecl(ModuleDecl::Import(self.parse_import_declaration()?)))
            }
            TokenKind::Export => {
                Ok(ProgramItem::ModuleDecl(self.parse_export_declaration(Vec::new())?))
            }
            TokenKind::At if self.has_feature(Features::DECORATORS) => {
                let start = self.start();
                let decorators = self.parse_decorators()?;
                if self.at(TokenKind::Export) {
                    return Ok(ProgramItem::ModuleDecl(self.parse_export_declaration(decorators)?));
                }
                if !self.at(TokenKind::Class) {
                    return Err(self.unexpected());
                }
                let class = self.parse_class(start, decorators, true)?;
                Ok(ProgramItem::Stmt(Stmt::ClassDecl(Box::new(class))))
            }
            _ => Ok(ProgramItem::Stmt(self.parse_statement_list_item()?)),
        }
    }

    /// Fail on the first `export { name }` whose local binding the module
    /// never declares.
    pub(crate) fn check_module_exports(&mut self) -> ParseResult<()> {
        let root = self.scope;
        for (name, loc) in &self.module.local_exports {
            let declared = self.scopes.lexical_names(root).contains_text(name)
                || self.scopes.var_names(root).contains_text(name);
            if !declared {
                return Err(self.error_at(
                    loc.start,
                    MessageKey::UndeclaredExport,
                    vec![name.clone()],
                ));
            }
        }
        tracing::trace!(exports = self.module.exported.len(), "module exports checked");
        Ok(())
    }

    fn add_export(&mut self, name: &str, loc: Span) -> ParseResult<()> {
        if self.module.exported.contains_key(name) {
            return Err(self.error_at(
                loc.start,
                MessageKey::DuplicateExport,
                vec![name.to_string()],
            ));
        }
        self.module.exported.insert(name.to_string(), loc);
        Ok(())
    }

    // ── Imports ─────────────────────────────────────────────────────────────

    fn parse_import_declaration(&mut self) -> ParseResult<ImportDecl> {
        let start = self.start();
        self.expect(TokenKind::Import)?;
        let mut specifiers = Vec::new();
        if !self.at(TokenKind::StringLiteral) {
            if is_identifier_kind(self.kind()) {
                let spec_start = self.start();
                let local = self.parse_import_binding()?;
                specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                    loc: self.span_from(spec_start),
                    local,
                }));
                if self.eat(TokenKind::Comma)? {
                    self.parse_import_clause_rest(&mut specifiers)?;
                }
            } else {
                self.parse_import_clause_rest(&mut specifiers)?;
            }
            self.expect_contextual("from")?;
        }
        let source = self.parse_string_literal()?;
        let attributes = self.parse_import_attributes()?;
        self.consume_semicolon()?;
        Ok(ImportDecl {
            loc: self.span_from(start),
            specifiers,
            source,
            attributes,
        })
    }

    /// `* as ns` or `{ … }` after the optional default binding.
    fn parse_import_clause_rest(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> ParseResult<()> {
        let start = self.start();
        if self.eat(TokenKind::Star)? {
            self.expect_contextual("as")?;
            let local = self.parse_import_binding()?;
            specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                loc: self.span_from(start),
                local,
            }));
            return Ok(());
        }
        self.expect(TokenKind::LeftBrace)?;
        while !self.at(TokenKind::RightBrace) {
            specifiers.push(self.parse_import_specifier()?);
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBrace)
    }

    fn parse_import_specifier(&mut self) -> ParseResult<ImportSpecifier> {
        let start = self.start();
        let kind = self.kind();
        let imported = self.parse_module_export_name()?;
        let local = if self.at_contextual("as") {
            self.advance()?;
            self.parse_import_binding()?
        } else {
            // `{ name }` binds the imported name itself.
            let ModuleExportName::Ident(id) = &imported else {
                return Err(self.unexpected());
            };
            if kind == TokenKind::EscapedKeyword {
                return Err(self.error_at(
                    id.loc.start,
                    MessageKey::InvalidEscapedKeyword,
                    vec![id.name.clone()],
                ));
            }
            if !is_identifier_kind(kind) {
                return Err(self.error_at(
                    id.loc.start,
                    MessageKey::ReservedWord,
                    vec![id.name.clone()],
                ));
            }
            self.check_identifier(&id.name, id.loc.start, IdentUse::Binding)?;
            let binding = self.declare_import(&id.name, id.loc)?;
            BindingIdent {
                loc: id.loc,
                name: id.name.clone(),
                binding,
            }
        };
        Ok(ImportSpecifier::Named(ImportNamedSpecifier {
            loc: self.span_from(start),
            imported,
            local,
        }))
    }

    fn parse_import_binding(&mut self) -> ParseResult<BindingIdent> {
        let (name, loc) = self.parse_identifier(IdentUse::Binding)?;
        let binding = self.declare_import(&name, loc)?;
        Ok(BindingIdent { loc, name, binding })
    }

    fn declare_import(&mut self, name: &str, loc: Span) -> ParseResult<NameId> {
        if name == "let" {
            return Err(self.error_at(loc.start, MessageKey::LetLexicallyBound, vec![]));
        }
        self.scopes
            .declare_lexical(self.scope, name, loc, DeclarationKind::Import, false)
            .map_err(|_| self.redeclaration(name, loc))
    }

    /// `with { key: "value", … }` after a module specifier.
    fn parse_import_attributes(&mut self) -> ParseResult<Vec<ImportAttribute>> {
        let mut attributes = Vec::new();
        if !self.eat(TokenKind::With)? {
            return Ok(attributes);
        }
        self.expect(TokenKind::LeftBrace)?;
        while !self.at(TokenKind::RightBrace) {
            let start = self.start();
            let key = self.parse_module_export_name()?;
            if attributes
                .iter()
                .any(|a: &ImportAttribute| a.key.value() == key.value())
            {
                return Err(self.error_at(
                    start,
                    MessageKey::DuplicateImportAttribute,
                    vec![key.value().to_string()],
                ));
            }
            self.expect(TokenKind::Colon)?;
            let value = self.parse_string_literal()?;
            attributes.push(ImportAttribute {
                loc: self.span_from(start),
                key,
                value,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(attributes)
    }

    /// An identifier name or string literal naming an import or export.
    fn parse_module_export_name(&mut self) -> ParseResult<ModuleExportName> {
        if self.at(TokenKind::StringLiteral) {
            return Ok(ModuleExportName::Str(self.parse_string_literal()?));
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
        Ok(ModuleExportName::Ident(ident))
    }

    fn expect_contextual(&mut self, word: &str) -> ParseResult<()> {
        if !self.at_contextual(word) {
            return Err(self.unexpected());
        }
        self.advance()
    }

    fn parse_from_clause(&mut self) -> ParseResult<(StringLit, Vec<ImportAttribute>)> {
        self.expect_contextual("from")?;
        let source = self.parse_string_literal()?;
        let attributes = self.parse_import_attributes()?;
        Ok((source, attributes))
    }

    // ── Exports ─────────────────────────────────────────────────────────────

    fn parse_export_declaration(&mut self, mut decorators: Vec<Expr>) -> ParseResult<ModuleDecl> {
        let start = self.start();
        self.expect(TokenKind::Export)?;
        if self.at(TokenKind::At) {
            self.require_feature(Features::DECORATORS, "decorators")?;
            decorators.extend(self.parse_decorators()?);
            if !matches!(self.kind(), TokenKind::Class | TokenKind::Default) {
                return Err(self.unexpected());
            }
        }
        match self.kind() {
            TokenKind::Default => self.parse_export_default(start, decorators),
            TokenKind::Star => self.parse_export_all(start),
            TokenKind::LeftBrace => self.parse_export_clause(start),
            _ => self.parse_export_statement(start, decorators),
        }
    }

    /// `export default …`
    fn parse_export_default(
        &mut self,
        start: Position,
        mut decorators: Vec<Expr>,
    ) -> ParseResult<ModuleDecl> {
        let default_loc = self.tok().span;
        self.advance()?;
        if self.at(TokenKind::At) {
            self.require_feature(Features::DECORATORS, "decorators")?;
            decorators.extend(self.parse_decorators()?);
            if !self.at(TokenKind::Class) {
                return Err(self.unexpected());
            }
        }
        let item_start = self.start();
        let declaration = match self.kind() {
            TokenKind::Function => {
                let function = self.parse_function_declaration(item_start, false, true)?;
                ExportDefaultExpr::Fn(Box::new(function))
            }
            TokenKind::Class => {
                let class = self.parse_default_class(item_start, decorators)?;
                ExportDefaultExpr::Class(Box::new(class))
            }
            TokenKind::Identifier if self.at_async_function()? => {
                self.advance()?;
                let function = self.parse_function_declaration(item_start, true, true)?;
                ExportDefaultExpr::Fn(Box::new(function))
            }
            _ => {
                let expr = self.allow_in(|p| p.parse_assignment())?;
                self.consume_semicolon()?;
                ExportDefaultExpr::Expr(Box::new(expr))
            }
        };
        self.add_export("default", default_loc)?;
        Ok(ModuleDecl::ExportDefault(ExportDefaultDecl {
            loc: self.span_from(start),
            declaration,
        }))
    }

    /// `export * from "m"` or `export * as name from "m"`
    fn parse_export_all(&mut self, start: Position) -> ParseResult<ModuleDecl> {
        self.expect(TokenKind::Star)?;
        let exported = if self.at_contextual("as") {
            self.advance()?;
            let name = self.parse_module_export_name()?;
            self.add_export(name.value(), name.loc())?;
            Some(name)
        } else {
            None
        };
        let (source, attributes) = self.parse_from_clause()?;
        self.consume_semicolon()?;
        Ok(ModuleDecl::ExportAll(ExportAllDecl {
            loc: self.span_from(start),
            exported,
            source,
            attributes,
        }))
    }

    /// `export { a, b as c } [from "m"]`
    fn parse_export_clause(&mut self, start: Position) -> ParseResult<ModuleDecl> {
        self.expect(TokenKind::LeftBrace)?;
        let mut specifiers = Vec::new();
        // Reserved words are only valid as local names of a re-export,
        // which is not known until `from` is seen.
        let mut reserved_local = None;
        while !self.at(TokenKind::RightBrace) {
            let spec_start = self.start();
            let local_kind = self.kind();
            let local = self.parse_module_export_name()?;
            if reserved_local.is_none()
                && let ModuleExportName::Ident(id) = &local
                && !is_identifier_kind(local_kind)
            {
                reserved_local = Some((id.name.clone(), id.loc));
            }
            let exported = if self.at_contextual("as") {
                self.advance()?;
                self.parse_module_export_name()?
            } else {
                local.clone()
            };
            specifiers.push(ExportSpecifier {
                loc: self.span_from(spec_start),
                local,
                exported,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBrace)?;

        let (source, attributes) = if self.at_contextual("from") {
            let (source, attributes) = self.parse_from_clause()?;
            (Some(source), attributes)
        } else {
            (None, Vec::new())
        };
        self.consume_semicolon()?;

        if source.is_none() {
            if let Some((name, loc)) = reserved_local {
                return Err(self.error_at(loc.start, MessageKey::ReservedWord, vec![name]));
            }
            for spec in &specifiers {
                match &spec.local {
                    ModuleExportName::Str(s) => {
                        return Err(self.error_at(
                            s.loc.start,
                            MessageKey::StringExportWithoutFrom,
                            vec![s.value.clone()],
                        ));
                    }
                    ModuleExportName::Ident(id) => {
                        self.module.local_exports.push((id.name.clone(), id.loc));
                    }
                }
            }
        }
        for spec in &specifiers {
            self.add_export(spec.exported.value(), spec.exported.loc())?;
        }
        Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
            loc: self.span_from(start),
            specifiers,
            source,
            declaration: None,
            attributes,
        }))
    }

    /// `export var|let|const|function|async function|class …`
    fn parse_export_statement(
        &mut self,
        start: Position,
        decorators: Vec<Expr>,
    ) -> ParseResult<ModuleDecl> {
        let is_declaration = match self.kind() {
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class => true,
            TokenKind::Let => self.let_starts_declaration()?,
            TokenKind::Identifier => self.at_async_function()?,
            _ => false,
        };
        if !is_declaration {
            return Err(self.unexpected());
        }
        let stmt = if self.at(TokenKind::Class) {
            let class_start = self.start();
            Stmt::ClassDecl(Box::new(self.parse_class(class_start, decorators, true)?))
        } else {
            self.parse_statement_list_item()?
        };
        let names = declared_names(&stmt).ok_or_else(|| self.unexpected())?;
        for (name, loc) in names {
            self.add_export(&name, loc)?;
        }
        Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
            loc: self.span_from(start),
            specifiers: Vec::new(),
            source: None,
            declaration: Some(Box::new(stmt)),
            attributes: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{ArrayPat, AssignPat, NullLit, RestElement};

    fn ident(name: &str) -> Pat {
        Pat::Ident(BindingIdent {
            loc: Span::default(),
            name: name.to_string(),
            binding: 0,
        })
    }

    #[test]
    fn test_bound_names_of_nested_pattern() {
        let pat = Pat::Array(Box::new(ArrayPat {
            loc: Span::default(),
            elements: vec![
                Some(ident("a")),
                None,
                Some(Pat::Assign(Box::new(AssignPat {
                    loc: Span::default(),
                    left: Box::new(ident("b")),
                    right: Box::new(Expr::Null(NullLit { loc: Span::default() })),
                }))),
                Some(Pat::Rest(Box::new(RestElement {
                    loc: Span::default(),
                    argument: Box::new(ident("c")),
                }))),
            ],
        }));
        let mut names = Vec::new();
        collect_bound_names(&pat, &mut names);
        let names: Vec<_> = names.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
