//! Early errors checked when a construct is complete.
//!
//! Most early errors are raised while parsing.  The ones here need the
//! whole construct first: a duplicate parameter is only an error once the
//! function is known to be strict or to have a non-simple parameter list,
//! and a private name may be used before the member declaring it.

use crate::error::ParseResult;
use crate::messages::MessageKey;

use super::Parser;
use super::ast::{Function, FunctionSyntax};
use super::context::{ClassParseContext, PrivateDeclaration, PrivateNameKind};
use super::scanner::Span;

/// Two declarations of one private name are allowed only as a getter and
/// setter pair with the same placement.
fn is_accessor_pair(a: &PrivateDeclaration, b: &PrivateDeclaration) -> bool {
    a.is_static == b.is_static
        && matches!(
            (a.kind, b.kind),
            (PrivateNameKind::Getter, PrivateNameKind::Setter)
                | (PrivateNameKind::Setter, PrivateNameKind::Getter)
        )
}

/// First declaration that clashes with an earlier one.
fn find_private_duplicate(declarations: &[PrivateDeclaration]) -> Option<&PrivateDeclaration> {
    declarations.iter().enumerate().find_map(|(i, decl)| {
        declarations[..i]
            .iter()
            .any(|prev| prev.name == decl.name && !is_accessor_pair(prev, decl))
            .then_some(decl)
    })
}

impl Parser<'_> {
    /// Parameter-list checks for a finished function, run while the
    /// function's context is still current.
    pub(crate) fn check_function(
        &mut self,
        function: &Function,
        duplicate: Option<(String, Span)>,
    ) -> ParseResult<()> {
        if let Some((name, loc)) = duplicate {
            let always = !function.simple_parameters
                || matches!(
                    function.syntax,
                    FunctionSyntax::Arrow
                        | FunctionSyntax::Method
                        | FunctionSyntax::Getter
                        | FunctionSyntax::Setter
                        | FunctionSyntax::Constructor
                        | FunctionSyntax::CallConstructor
                );
            if always || function.strict {
                return Err(self.error_at(loc.start, MessageKey::DuplicateParameter, vec![name]));
            }
            self.report_strict(loc.start, MessageKey::DuplicateParameter, vec![name])?;
        }

        let parameters = self.scopes.var_names(function.parameter_scope);
        let clash = self
            .scopes
            .lexical_names(function.body_scope)
            .iter()
            .find(|(text, _)| parameters.contains_text(text))
            .map(|(_, id)| id);
        if let Some(id) = clash {
            let name = self.scopes.name(id);
            return Err(self.error_at(
                name.loc.start,
                MessageKey::ParameterRedeclaration,
                vec![name.text.clone()],
            ));
        }
        Ok(())
    }

    /// Checks for a finished class body.  Private names the body uses but
    /// does not declare move to the enclosing class body, or to the
    /// program-level list when there is none.
    pub(crate) fn finish_class_body(&mut self, class: ClassParseContext) -> ParseResult<()> {
        if let Some(decl) = find_private_duplicate(&class.declarations) {
            return Err(self.error_at(
                decl.loc.start,
                MessageKey::DuplicatePrivateName,
                vec![decl.name.clone()],
            ));
        }
        if let Some(loc) = class.constructors.get(1) {
            return Err(self.error_at(loc.start, MessageKey::DuplicateConstructor, vec![]));
        }
        if let Some(loc) = class.call_constructors.get(1) {
            return Err(self.error_at(loc.start, MessageKey::DuplicateCallConstructor, vec![]));
        }

        let ClassParseContext {
            declarations,
            references,
            ..
        } = class;
        let unresolved = references
            .into_iter()
            .filter(|r| !declarations.iter().any(|d| d.name == r.name));
        match self.classes.last_mut() {
            Some(outer) => outer.references.extend(unresolved),
            None => self.unresolved_private.extend(unresolved),
        }
        Ok(())
    }

    /// Private names used outside every class body must be visible to the
    /// eval call site.
    pub(crate) fn check_unresolved_private_names(&self) -> ParseResult<()> {
        let visible: &[String] = self
            .options
            .eval
            .as_ref()
            .map(|eval| eval.private_names.as_slice())
            .unwrap_or_default();
        match self
            .unresolved_private
            .iter()
            .find(|r| !visible.contains(&r.name))
        {
            Some(r) => Err(self.error_at(
                r.loc.start,
                MessageKey::UndeclaredPrivateName,
                vec![r.name.clone()],
            )),
            None => Ok(()),
        }
    }
}
