//! Scope model: binding identities, name sets and the scope arena.
//!
//! # Overview
//!
//! The parser declares names into a [`ScopeTree`] while it descends the
//! grammar, so hoisting, shadowing and redeclaration rules are enforced as
//! soon as a declaration is seen rather than in a separate pass.
//!
//! - Every binding occurrence creates a fresh [`Name`] (addressed by
//!   [`NameId`]).  Two names with the same text are distinct bindings.
//! - Each [`ScopeContext`] keeps an insertion-ordered [`NameSet`] of its
//!   lexically-declared names and one of the `var` names that were declared
//!   in it or passed through it.
//! - `var` names declared in a block are merged into the parent when the
//!   block closes, until they reach a var-hosting scope (script, module,
//!   function, parameter list, class field initializer).
//! - Identifier references are recorded as they are parsed and resolved by
//!   [`ScopeTree::resolve_all`] once the whole program is known.
//!
//! Scopes live in a flat arena and link to their parent by index.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::parser::scanner::Span;

// ─────────────────────────────────────────────────────────────────────────────
// Public identifier types
// ─────────────────────────────────────────────────────────────────────────────

/// Index of a [`ScopeContext`] in the [`ScopeTree`].
pub type ScopeId = usize;

/// Index of a [`Name`] in the [`ScopeTree`].
pub type NameId = usize;

/// Index of a [`Reference`] in the [`ScopeTree`].
pub type ReferenceId = usize;

// ─────────────────────────────────────────────────────────────────────────────
// Scope kind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic construct a scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top level of a classic script (or eval code).
    Script,
    /// Top level of an ES module.
    Module,
    /// A function body.
    Function,
    /// A `{ … }` block, loop head, `switch` body or class body.
    Block,
    /// A `catch (param) { … }` clause including its block.
    Catch,
    /// The body of a `with (obj) …` statement.
    With,
    /// A function's formal parameter list.
    Parameter,
    /// A class field initializer or static block.
    ClassFieldInitializer,
}

impl ScopeKind {
    /// Returns `true` if `var` declarations stop here instead of propagating
    /// to the parent.
    pub fn hosts_var(self) -> bool {
        matches!(
            self,
            ScopeKind::Script
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::Parameter
                | ScopeKind::ClassFieldInitializer
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Name
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic origin of a [`Name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Class,
    /// A function declaration (var-scoped or block-scoped by position).
    Function,
    Parameter,
    CatchParameter,
    Import,
    /// The self-binding of a named function expression.
    FunctionName,
    /// The inner binding of a class name, visible inside its body.
    ClassName,
}

impl DeclarationKind {
    /// Returns `true` for bindings that occupy a scope's lexical set.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            DeclarationKind::Let
                | DeclarationKind::Const
                | DeclarationKind::Class
                | DeclarationKind::Import
                | DeclarationKind::CatchParameter
                | DeclarationKind::ClassName
        )
    }
}

/// A binding identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// The identifier text.
    pub text: String,
    /// Source location of the binding occurrence.
    pub loc: Span,
    /// What kind of declaration introduced the binding.
    pub kind: DeclarationKind,
    /// The scope the binding was declared in.
    pub scope: ScopeId,
}

// ─────────────────────────────────────────────────────────────────────────────
// NameSet
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered map from identifier text to the live [`Name`] for it.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    map: IndexMap<String, NameId, FxBuildHasher>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<NameId> {
        self.map.get(text).copied()
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.map.contains_key(text)
    }

    /// Returns `true` if `text` maps to exactly the binding `id`.
    pub fn contains_name(&self, text: &str, id: NameId) -> bool {
        self.map.get(text) == Some(&id)
    }

    /// Insert `text → id` unless `text` is already present.  Returns the
    /// binding that is live afterwards.
    pub fn insert(&mut self, text: &str, id: NameId) -> NameId {
        *self.map.entry(text.to_string()).or_insert(id)
    }

    /// Add every entry of `other` whose text is not yet present.
    pub fn merge(&mut self, other: &NameSet) {
        for (text, &id) in &other.map {
            self.map.entry(text.clone()).or_insert(id);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NameId)> {
        self.map.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn forget_from(&mut self, first: NameId) {
        self.map.retain(|_, id| *id < first);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopeContext / Reference
// ─────────────────────────────────────────────────────────────────────────────

/// One syntactic scope.
#[derive(Debug, Clone)]
pub struct ScopeContext {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Enclosing scope, `None` for the root.
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Nearest var-hosting scope (this scope if it hosts `var` itself).
    pub var_scope: ScopeId,
    /// `var` names declared in or hoisted through this scope.
    pub var_names: NameSet,
    /// `let` / `const` / `class` / block-function / import names.
    pub lexical_names: NameSet,
    /// Lexical declarations in source order, for binding instantiation.
    pub lexical_declarations: Vec<NameId>,
    /// Function declarations hoisted to this scope.
    pub function_declarations: Vec<NameId>,
    /// Self-binding of a named function expression, visible below the
    /// parameter list.
    pub self_binding: Option<NameId>,
    /// A direct `eval` call appears in this scope or a descendant.
    pub has_direct_eval: bool,
    /// A non-strict direct `eval` may add `var` bindings to this scope.
    pub sloppy_eval: bool,
    /// The catch parameter is a single identifier (Annex B `var` rule).
    pub simple_catch_parameter: bool,
    pub loc: Span,
}

impl ScopeContext {
    fn new(
        id: ScopeId,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        var_scope: ScopeId,
        loc: Span,
    ) -> Self {
        Self {
            id,
            kind,
            parent,
            children: Vec::new(),
            var_scope,
            var_names: NameSet::new(),
            lexical_names: NameSet::new(),
            lexical_declarations: Vec::new(),
            function_declarations: Vec::new(),
            self_binding: None,
            has_direct_eval: false,
            sloppy_eval: false,
            simple_catch_parameter: false,
            loc,
        }
    }
}

/// Outcome of resolving one identifier reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Statically bound to a declared name.
    Binding(NameId),
    /// Not declared anywhere in the program: a global lookup.
    Unresolved,
    /// Decided at runtime.  A `with` object or a non-strict direct `eval`
    /// may intercept the lookup; in direct eval code so may the caller.
    Dynamic,
}

/// An identifier reference recorded while parsing.
#[derive(Debug, Clone)]
pub struct Reference {
    pub text: String,
    pub scope: ScopeId,
    pub loc: Span,
    pub resolution: Resolution,
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopeTree
// ─────────────────────────────────────────────────────────────────────────────

/// Arena sizes and flags captured before a speculative parse.
#[derive(Debug, Clone)]
pub struct ScopeTreeCheckpoint {
    scopes: usize,
    names: usize,
    references: usize,
    /// `(scope, has_direct_eval, sloppy_eval)` along the current chain.
    flags: Vec<(ScopeId, bool, bool)>,
}

/// All scopes, names and references of one parse.
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<ScopeContext>,
    names: Vec<Name>,
    references: Vec<Reference>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn scope(&self, id: ScopeId) -> &ScopeContext {
        &self.scopes[id]
    }

    pub fn name(&self, id: NameId) -> &Name {
        &self.names[id]
    }

    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id]
    }

    /// The resolution of reference `id`, valid once [`ScopeTree::resolve_all`]
    /// has run.
    pub fn resolve(&self, id: ReferenceId) -> Resolution {
        self.references[id].resolution
    }

    pub fn var_names(&self, id: ScopeId) -> &NameSet {
        &self.scopes[id].var_names
    }

    pub fn lexical_names(&self, id: ScopeId) -> &NameSet {
        &self.scopes[id].lexical_names
    }

    pub fn enclosing_var_scope(&self, id: ScopeId) -> ScopeId {
        self.scopes[id].var_scope
    }

    pub fn scopes(&self) -> &[ScopeContext] {
        &self.scopes
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Iterate `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &ScopeContext> {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let scope = &self.scopes[next?];
            next = scope.parent;
            Some(scope)
        })
    }

    // ── Construction ─────────────────────────────────────────────────────────

    /// Open a new scope below `parent`.
    pub fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, loc: Span) -> ScopeId {
        let id = self.scopes.len();
        let var_scope = match parent {
            Some(p) if !kind.hosts_var() => self.scopes[p].var_scope,
            _ => id,
        };
        self.scopes.push(ScopeContext::new(id, kind, parent, var_scope, loc));
        if let Some(p) = parent {
            self.scopes[p].children.push(id);
        }
        id
    }

    /// Close scope `id`: hoist its `var` names into the parent unless it
    /// hosts them itself.
    pub fn close_scope(&mut self, id: ScopeId, end: Span) {
        self.scopes[id].loc.end = end.end;
        let scope = &self.scopes[id];
        if scope.kind.hosts_var() {
            return;
        }
        let Some(parent) = scope.parent else {
            return;
        };
        if scope.var_names.is_empty() {
            return;
        }
        let hoisted = scope.var_names.clone();
        tracing::trace!(scope = id, parent, count = hoisted.len(), "hoist var names");
        self.scopes[parent].var_names.merge(&hoisted);
    }

    pub fn new_name(
        &mut self,
        text: &str,
        loc: Span,
        kind: DeclarationKind,
        scope: ScopeId,
    ) -> NameId {
        let id = self.names.len();
        self.names.push(Name {
            text: text.to_string(),
            loc,
            kind,
            scope,
        });
        id
    }

    /// Declare a `var` (or var-scoped function) name in `scope`.
    ///
    /// Walks outward to the hosting scope; fails with the conflicting
    /// lexical binding if any scope on the way lexically declares the same
    /// text.  A simple catch parameter does not conflict.
    pub fn declare_var(
        &mut self,
        scope: ScopeId,
        text: &str,
        loc: Span,
        kind: DeclarationKind,
    ) -> Result<NameId, NameId> {
        let mut cur = scope;
        loop {
            let s = &self.scopes[cur];
            if let Some(existing) = s.lexical_names.get(text) {
                let catch_exception = s.kind == ScopeKind::Catch
                    && s.simple_catch_parameter
                    && self.names[existing].kind == DeclarationKind::CatchParameter;
                if !catch_exception {
                    return Err(existing);
                }
            }
            if s.kind.hosts_var() {
                break;
            }
            match s.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        let id = self.new_name(text, loc, kind, scope);
        self.scopes[scope].var_names.insert(text, id);
        if kind == DeclarationKind::Function {
            let host = self.scopes[scope].var_scope;
            self.scopes[host].function_declarations.push(id);
        }
        Ok(id)
    }

    /// Declare a lexical name in `scope`.  Fails with the existing binding on
    /// a duplicate, except that two function declarations may share a name
    /// when `allow_function_duplicate` is set (sloppy-mode blocks).
    pub fn declare_lexical(
        &mut self,
        scope: ScopeId,
        text: &str,
        loc: Span,
        kind: DeclarationKind,
        allow_function_duplicate: bool,
    ) -> Result<NameId, NameId> {
        let s = &self.scopes[scope];
        if let Some(existing) = s.lexical_names.get(text) {
            let both_functions = kind == DeclarationKind::Function
                && self.names[existing].kind == DeclarationKind::Function;
            if !(both_functions && allow_function_duplicate) {
                return Err(existing);
            }
        }
        if let Some(existing) = s.var_names.get(text) {
            return Err(existing);
        }
        let id = self.new_name(text, loc, kind, scope);
        let s = &mut self.scopes[scope];
        s.lexical_names.insert(text, id);
        s.lexical_declarations.push(id);
        if kind == DeclarationKind::Function {
            s.function_declarations.push(id);
        }
        Ok(id)
    }

    /// Declare a formal parameter.  Returns the new binding and, for a
    /// repeated parameter name, the earlier binding.
    pub fn declare_parameter(
        &mut self,
        scope: ScopeId,
        text: &str,
        loc: Span,
    ) -> (NameId, Option<NameId>) {
        let previous = self.scopes[scope].var_names.get(text);
        let id = self.new_name(text, loc, DeclarationKind::Parameter, scope);
        self.scopes[scope].var_names.insert(text, id);
        (id, previous)
    }

    /// Declare the self-binding of a named function expression.
    pub fn declare_self_binding(&mut self, scope: ScopeId, text: &str, loc: Span) -> NameId {
        let id = self.new_name(text, loc, DeclarationKind::FunctionName, scope);
        self.scopes[scope].self_binding = Some(id);
        id
    }

    /// Record a direct `eval` call in `scope`.
    pub fn mark_direct_eval(&mut self, scope: ScopeId, strict: bool) {
        if !strict {
            let host = self.scopes[scope].var_scope;
            self.scopes[host].sloppy_eval = true;
        }
        let mut next = Some(scope);
        while let Some(id) = next {
            if self.scopes[id].has_direct_eval {
                break;
            }
            self.scopes[id].has_direct_eval = true;
            next = self.scopes[id].parent;
        }
    }

    pub fn mark_simple_catch_parameter(&mut self, scope: ScopeId) {
        self.scopes[scope].simple_catch_parameter = true;
    }

    pub fn add_reference(&mut self, scope: ScopeId, text: &str, loc: Span) -> ReferenceId {
        let id = self.references.len();
        self.references.push(Reference {
            text: text.to_string(),
            scope,
            loc,
            resolution: Resolution::Unresolved,
        });
        id
    }

    // ── Speculation support ──────────────────────────────────────────────────

    /// Capture arena sizes and the eval flags along `current`'s chain.
    pub fn checkpoint(&self, current: ScopeId) -> ScopeTreeCheckpoint {
        ScopeTreeCheckpoint {
            scopes: self.scopes.len(),
            names: self.names.len(),
            references: self.references.len(),
            flags: self
                .ancestors(current)
                .map(|s| (s.id, s.has_direct_eval, s.sloppy_eval))
                .collect(),
        }
    }

    /// Discard everything created after `checkpoint`.
    ///
    /// Speculative parses only create scopes below `current` and only hoist
    /// names into `current`'s chain, so only that chain needs repair.
    pub fn rollback(&mut self, checkpoint: &ScopeTreeCheckpoint) {
        self.scopes.truncate(checkpoint.scopes);
        self.names.truncate(checkpoint.names);
        self.references.truncate(checkpoint.references);
        for &(id, has_direct_eval, sloppy_eval) in &checkpoint.flags {
            let first_name = checkpoint.names;
            let first_scope = checkpoint.scopes;
            let s = &mut self.scopes[id];
            s.has_direct_eval = has_direct_eval;
            s.sloppy_eval = sloppy_eval;
            s.children.retain(|&c| c < first_scope);
            s.var_names.forget_from(first_name);
            s.lexical_names.forget_from(first_name);
            s.lexical_declarations.retain(|&n| n < first_name);
            s.function_declarations.retain(|&n| n < first_name);
            if s.self_binding.is_some_and(|n| n >= first_name) {
                s.self_binding = None;
            }
        }
    }

    // ── Resolution ───────────────────────────────────────────────────────────

    /// Find the binding `text` refers to from `scope`.
    pub fn lookup(&self, scope: ScopeId, text: &str, enclosing_dynamic: bool) -> Resolution {
        let mut dynamic = false;
        for s in self.ancestors(scope) {
            let found = s.lexical_names.get(text).or_else(|| {
                if s.kind.hosts_var() {
                    s.var_names.get(text)
                } else {
                    None
                }
            });
            let found = found.or_else(|| {
                s.self_binding
                    .filter(|&n| self.names[n].text == text)
            });
            if let Some(id) = found {
                return if dynamic {
                    Resolution::Dynamic
                } else {
                    Resolution::Binding(id)
                };
            }
            if s.kind == ScopeKind::With || s.sloppy_eval {
                dynamic = true;
            }
        }
        if dynamic || enclosing_dynamic {
            Resolution::Dynamic
        } else {
            Resolution::Unresolved
        }
    }

    /// Resolve every recorded reference.  `enclosing_dynamic` is set for
    /// direct eval code whose caller may bind names this tree cannot see;
    /// names left unbound then resolve to [`Resolution::Dynamic`].
    pub fn resolve_all(&mut self, enclosing_dynamic: bool) {
        for i in 0..self.references.len() {
            let r = &self.references[i];
            let resolution = self.lookup(r.scope, &r.text, enclosing_dynamic);
            self.references[i].resolution = resolution;
        }
        tracing::debug!(
            scopes = self.scopes.len(),
            names = self.names.len(),
            references = self.references.len(),
            "resolved identifier references"
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
