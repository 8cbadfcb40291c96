//! Syntax tree produced by the parser.
//!
//! Nodes are plain owned data.  Each one records where it came from in a
//! `loc` span, and the enums over nodes ([`Stmt`], [`Expr`], [`Pat`],
//! [`ModuleDecl`]) expose that span through `loc()`.
//!
//! Names are linked into the [`ScopeTree`] rather than resolved in place:
//!
//! - a [`BindingIdent`] carries the [`NameId`] it declares,
//! - an [`IdentRef`] carries a [`ReferenceId`]; look the resolution up with
//!   [`ScopeTree::resolve`],
//! - nodes that open a scope store its [`ScopeId`].
//!
//! [`Program`] and [`StandaloneFunction`] own the tree together with the
//! scope data it points into.

use crate::parser::scanner::Span;
use crate::parser::scope::{NameId, ReferenceId, ScopeId, ScopeTree};

/// Span of a node, `start` inclusive and `end` exclusive.
pub type SourceLocation = Span;

/// Gives an enum over node types a `loc()` that forwards to the wrapped
/// node.
macro_rules! located {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $ty {
            pub fn loc(&self) -> SourceLocation {
                match self {
                    $($ty::$variant(node) => node.loc,)*
                }
            }
        }
    };
}

// Program

/// Goal symbol the source was parsed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub loc: SourceLocation,
    pub source_type: SourceType,
    pub body: Vec<ProgramItem>,
    /// Strictness of the top-level code.  Always `true` for modules.
    pub strict: bool,
    pub scope: ScopeId,
    /// Scope data for the whole tree, with every reference resolved.
    pub scopes: ScopeTree,
}

impl Program {
    /// Raw text of each directive in the prologue, quotes stripped.
    pub fn directives(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .map_while(|item| match item {
                ProgramItem::Stmt(Stmt::Expr(s)) => s.directive.as_deref(),
                _ => None,
            })
    }
}

/// Statements may appear anywhere; `import` and `export` only at module top
/// level.
#[derive(Debug, Clone)]
pub enum ProgramItem {
    Stmt(Stmt),
    ModuleDecl(ModuleDecl),
}

/// A function built from separate parameter and body strings, as done for
/// `new Function(...)`.
#[derive(Debug, Clone)]
pub struct StandaloneFunction {
    /// `function.source` is the synthesized text the engine reports for
    /// `toString()`.
    pub function: Function,
    pub scopes: ScopeTree,
}

// Names

/// Identifier that neither declares nor references a binding, e.g. a label
/// or a property name.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub loc: SourceLocation,
    /// Escape sequences already decoded.
    pub name: String,
}

/// Declaring occurrence of a name.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingIdent {
    pub loc: SourceLocation,
    pub name: String,
    pub binding: NameId,
}

/// Use of a name that the scope analysis resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentRef {
    pub loc: SourceLocation,
    pub name: String,
    pub reference: ReferenceId,
}

/// `#name` inside a class body or in `#name in obj`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateIdent {
    pub loc: SourceLocation,
    /// Stored without the `#`.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub loc: SourceLocation,
    /// `...rest` arrives here as [`Pat::Rest`].
    pub pat: Pat,
    pub default: Option<Expr>,
}

// Statements

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    VarDecl(VarDecl),
    FnDecl(Box<Function>),
    ClassDecl(Box<Class>),
    /// Also used for prologue directives; see [`ExprStmt::directive`].
    Expr(ExprStmt),
    If(IfStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    ForOf(ForOfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Labeled(LabeledStmt),
    Debugger(DebuggerStmt),
    /// Rejected in strict code.
    With(WithStmt),
    Empty(EmptyStmt),
}

located!(Stmt {
    Block, VarDecl, FnDecl, ClassDecl, Expr, If, For, ForIn, ForOf, While, DoWhile, Switch, Try,
    Return, Throw, Break, Continue, Labeled, Debugger, With, Empty,
});

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub loc: SourceLocation,
    pub body: Vec<Stmt>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub loc: SourceLocation,
    pub expr: Box<Expr>,
    /// Set for statements of the directive prologue, holding the literal's
    /// raw text between the quotes.
    pub directive: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub consequent: Box<Stmt>,
    pub alternate: Option<Box<Stmt>>,
}

/// Three-clause `for (init; test; update)`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub loc: SourceLocation,
    pub init: Option<ForInit>,
    pub test: Option<Box<Expr>>,
    pub update: Option<Box<Expr>>,
    pub body: Box<Stmt>,
    /// Present when the head declares with `let` or `const`.
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct ForInStmt {
    pub loc: SourceLocation,
    pub left: ForInOfLeft,
    pub right: Box<Expr>,
    pub body: Box<Stmt>,
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone)]
pub struct ForOfStmt {
    pub loc: SourceLocation,
    /// `for await (... of ...)`.
    pub is_await: bool,
    pub left: ForInOfLeft,
    pub right: Box<Expr>,
    pub body: Box<Stmt>,
    pub scope: Option<ScopeId>,
}

/// Head target of `for-in`/`for-of`: a declaration, or any valid
/// assignment target reinterpreted as a pattern.
#[derive(Debug, Clone)]
pub enum ForInOfLeft {
    VarDecl(VarDecl),
    Pat(Pat),
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub loc: SourceLocation,
    pub body: Box<Stmt>,
    pub test: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub loc: SourceLocation,
    pub discriminant: Box<Expr>,
    pub cases: Vec<SwitchCase>,
    /// One block scope spans all clauses.
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub loc: SourceLocation,
    /// `None` marks the `default:` clause.
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
}

/// At least one of `handler` and `finalizer` is present.
#[derive(Debug, Clone)]
pub struct TryStmt {
    pub loc: SourceLocation,
    pub block: BlockStmt,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStmt>,
}

/// The catch parameter is declared in `body.scope`, so a `let` in the
/// block that repeats a parameter name is a redeclaration.
#[derive(Debug, Clone)]
pub struct CatchClause {
    pub loc: SourceLocation,
    /// `None` for `catch { ... }` without a binding.
    pub param: Option<Pat>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub loc: SourceLocation,
    pub argument: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub loc: SourceLocation,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub loc: SourceLocation,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub loc: SourceLocation,
    pub label: Ident,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct DebuggerStmt {
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct WithStmt {
    pub loc: SourceLocation,
    pub object: Box<Expr>,
    pub body: Box<Stmt>,
    /// Names referenced under this scope resolve dynamically.
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub loc: SourceLocation,
}

// Declarations

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub loc: SourceLocation,
    pub kind: VarKind,
    /// Never empty.
    pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Hoisted to the nearest function, eval or script scope.
    Var,
    Let,
    /// Requires an initializer outside `for-in`/`for-of` heads.
    Const,
}

#[derive(Debug, Clone)]
pub struct VarDeclarator {
    pub loc: SourceLocation,
    pub id: Pat,
    pub init: Option<Box<Expr>>,
}

// Functions

/// Whether a function is async, a generator, both, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Normal,
    Generator,
    Async,
    AsyncGenerator,
}

impl FunctionKind {
    pub fn new(is_async: bool, is_generator: bool) -> Self {
        match (is_async, is_generator) {
            (false, false) => FunctionKind::Normal,
            (false, true) => FunctionKind::Generator,
            (true, false) => FunctionKind::Async,
            (true, true) => FunctionKind::AsyncGenerator,
        }
    }

    pub fn is_async(self) -> bool {
        matches!(self, FunctionKind::Async | FunctionKind::AsyncGenerator)
    }

    pub fn is_generator(self) -> bool {
        matches!(self, FunctionKind::Generator | FunctionKind::AsyncGenerator)
    }
}

/// How a [`Function`] appeared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionSyntax {
    Declaration,
    Expression,
    Arrow,
    Method,
    Getter,
    Setter,
    Constructor,
    CallConstructor,
    /// Built from separate parameter and body text.
    Standalone,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// `x => expr`.
    Expr(Box<Expr>),
}

/// Text reported for a function's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceText {
    Span(Span),
    /// Not present verbatim in the input: synthesized default constructors
    /// and standalone functions.
    Synthetic(String),
}

/// Shared node for declarations, expressions, arrows, methods, accessors
/// and constructors.  `syntax` tells them apart.
#[derive(Debug, Clone)]
pub struct Function {
    pub loc: SourceLocation,
    /// Declarations and named function expressions only.
    pub id: Option<BindingIdent>,
    pub kind: FunctionKind,
    pub syntax: FunctionSyntax,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    /// Inherited from the enclosing code or switched on by the function's
    /// own `"use strict"`.
    pub strict: bool,
    /// No defaults, no destructuring, no rest.
    pub simple_parameters: bool,
    /// Declares the parameters, and the own name of a function expression.
    pub parameter_scope: ScopeId,
    /// Where `var` declarations in the body land.
    pub body_scope: ScopeId,
    pub source: SourceText,
}

// Classes

#[derive(Debug, Clone)]
pub struct Class {
    pub loc: SourceLocation,
    /// Outer binding for a declaration; own name for a named expression.
    pub id: Option<BindingIdent>,
    /// The immutable name binding visible inside the class body, separate
    /// from `id`.
    pub inner_binding: Option<NameId>,
    /// `extends` clause.
    pub super_class: Option<Box<Expr>>,
    pub body: ClassBody,
    pub decorators: Vec<Expr>,
    /// Covers the heritage and the body.
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct ClassBody {
    pub loc: SourceLocation,
    pub body: Vec<ClassMember>,
}

#[derive(Debug, Clone)]
pub enum ClassMember {
    Method(MethodDef),
    /// Field, public or private.
    Property(PropertyDef),
    StaticBlock(StaticBlock),
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub loc: SourceLocation,
    pub is_static: bool,
    pub kind: MethodKind,
    pub key: PropKey,
    pub value: Box<Function>,
    pub decorators: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    /// `call constructor() {}`, behind the call-constructors feature.
    CallConstructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub loc: SourceLocation,
    pub is_static: bool,
    pub key: PropKey,
    pub value: Option<Box<Expr>>,
    pub decorators: Vec<Expr>,
    /// Initializers run as if in a method body: `this` is the instance and
    /// `arguments` is an error.
    pub scope: Option<ScopeId>,
}

/// `static { ... }`.
#[derive(Debug, Clone)]
pub struct StaticBlock {
    pub loc: SourceLocation,
    pub body: Vec<Stmt>,
    pub scope: ScopeId,
}

// Expressions

#[derive(Debug, Clone)]
pub enum Expr {
    Null(NullLit),
    Bool(BoolLit),
    Num(NumLit),
    Str(StringLit),
    BigInt(BigIntLit),
    Regexp(RegExpLit),
    Template(Box<TemplateLit>),

    Ident(IdentRef),
    This(ThisExpr),
    Array(Box<ArrayExpr>),
    Object(Box<ObjectExpr>),
    /// Kept in the tree so that `(a) = 1` and `(a, b) => 0` can be told
    /// apart from their unparenthesized forms.
    Paren(Box<ParenExpr>),

    Fn(Box<Function>),
    Arrow(Box<Function>),
    Class(Box<Class>),

    Unary(Box<UnaryExpr>),
    Update(Box<UpdateExpr>),
    Binary(Box<BinaryExpr>),
    Logical(Box<LogicalExpr>),
    Conditional(Box<ConditionalExpr>),
    Assign(Box<AssignExpr>),
    Sequence(Box<SequenceExpr>),
    PrivateIn(Box<PrivateInExpr>),

    Member(Box<MemberExpr>),
    SuperMember(Box<SuperMemberExpr>),
    SuperCall(Box<SuperCallExpr>),
    /// Root of a chain containing `?.`; the links inside are
    /// [`Expr::OptionalMember`] and [`Expr::OptionalCall`].
    OptionalChain(Box<OptionalChainExpr>),
    OptionalMember(Box<OptionalMemberExpr>),
    Call(Box<CallExpr>),
    OptionalCall(Box<OptionalCallExpr>),
    New(Box<NewExpr>),
    TaggedTemplate(Box<TaggedTemplateExpr>),

    /// Only valid as an array element or call argument.
    Spread(Box<SpreadElement>),

    Yield(Box<YieldExpr>),
    Await(Box<AwaitExpr>),
    Import(Box<ImportExpr>),
    MetaProp(MetaPropExpr),

    // Staged features, each parsed only when its flag is on.
    Do(Box<DoExpr>),
    Throw(Box<ThrowExpr>),
    Comprehension(Box<ComprehensionExpr>),
    /// `%Name(args)`, for engine-internal sources.
    NativeCall(Box<NativeCallExpr>),
}

located!(Expr {
    Null, Bool, Num, Str, BigInt, Regexp, Template, Ident, This, Array, Object, Paren, Fn, Arrow,
    Class, Unary, Update, Binary, Logical, Conditional, Assign, Sequence, PrivateIn, Member,
    SuperMember, SuperCall, OptionalChain, OptionalMember, Call, OptionalCall, New,
    TaggedTemplate, Spread, Yield, Await, Import, MetaProp, Do, Throw, Comprehension, NativeCall,
});

#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    /// Includes both parentheses.
    pub loc: SourceLocation,
    pub expr: Expr,
}

#[derive(Debug, Clone)]
pub struct ArrayExpr {
    pub loc: SourceLocation,
    /// Holes are `None`.
    pub elements: Vec<Option<Expr>>,
}

#[derive(Debug, Clone)]
pub struct ObjectExpr {
    pub loc: SourceLocation,
    pub properties: Vec<ObjectProp>,
}

#[derive(Debug, Clone)]
pub enum ObjectProp {
    Prop(Box<Prop>),
    Spread(SpreadElement),
}

#[derive(Debug, Clone)]
pub struct Prop {
    pub loc: SourceLocation,
    pub key: PropKey,
    pub value: PropValue,
}

/// Property name of an object literal entry, class member or object
/// pattern entry.
#[derive(Debug, Clone)]
pub enum PropKey {
    Ident(Ident),
    /// Class members only.
    Private(PrivateIdent),
    Str(StringLit),
    Num(NumLit),
    BigInt(BigIntLit),
    Computed(Box<Expr>),
}

impl PropKey {
    /// Name known without evaluation.  Numeric keys are left out since
    /// their canonical string form is computed by the engine.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropKey::Ident(i) => Some(&i.name),
            PropKey::Str(s) => Some(&s.value),
            _ => None,
        }
    }

    pub fn loc(&self) -> SourceLocation {
        match self {
            PropKey::Ident(k) => k.loc,
            PropKey::Private(k) => k.loc,
            PropKey::Str(k) => k.loc,
            PropKey::Num(k) => k.loc,
            PropKey::BigInt(k) => k.loc,
            PropKey::Computed(k) => k.loc(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PropValue {
    Value(Box<Expr>),
    /// `{ a }`.
    Shorthand(IdentRef),
    /// `{ a = 1 }`.  An error unless the literal turns out to be an
    /// assignment pattern.
    CoverInitialized {
        target: IdentRef,
        default: Box<Expr>,
    },
    Get(Box<Function>),
    Set(Box<Function>),
    Method(Box<Function>),
}

#[derive(Debug, Clone)]
pub struct SpreadElement {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub loc: SourceLocation,
    pub op: UnaryOp,
    pub argument: Box<Expr>,
}

/// Prefix operators other than `++`/`--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone)]
pub struct UpdateExpr {
    pub loc: SourceLocation,
    pub op: UpdateOp,
    pub prefix: bool,
    /// An identifier or member expression.
    pub argument: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub loc: SourceLocation,
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Infix operators that neither assign nor short-circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// Right-associative; an unparenthesized unary operand is an error.
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    Instanceof,
}

#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub loc: SourceLocation,
    pub op: LogicalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// `&&`, `||` and `??`.  Mixing `??` with either of the others requires
/// parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    NullishCoalesce,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub loc: SourceLocation,
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub loc: SourceLocation,
    pub op: AssignOp,
    pub left: AssignTarget,
    pub right: Box<Expr>,
}

/// Only a plain `=` takes a destructuring pattern.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    Expr(Box<Expr>),
    Pat(Pat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ExpAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishAssign,
}

#[derive(Debug, Clone)]
pub struct SequenceExpr {
    pub loc: SourceLocation,
    /// At least two.
    pub expressions: Vec<Expr>,
}

/// Brand check `#x in obj`.
#[derive(Debug, Clone)]
pub struct PrivateInExpr {
    pub loc: SourceLocation,
    pub name: PrivateIdent,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub loc: SourceLocation,
    pub object: Box<Expr>,
    pub property: MemberProp,
}

#[derive(Debug, Clone)]
pub struct SuperMemberExpr {
    pub loc: SourceLocation,
    pub property: MemberProp,
}

#[derive(Debug, Clone)]
pub struct SuperCallExpr {
    pub loc: SourceLocation,
    pub arguments: Vec<Expr>,
}

/// A nullish base anywhere in `expression` short-circuits the whole chain.
#[derive(Debug, Clone)]
pub struct OptionalChainExpr {
    pub loc: SourceLocation,
    pub expression: Expr,
}

/// `a?.b` or `a?.[b]`.
#[derive(Debug, Clone)]
pub struct OptionalMemberExpr {
    pub loc: SourceLocation,
    pub object: Box<Expr>,
    pub property: MemberProp,
}

#[derive(Debug, Clone)]
pub enum MemberProp {
    Ident(Ident),
    Private(PrivateIdent),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    /// `eval(...)` with an unparenthesized `eval` callee.  Such a call can
    /// see every enclosing binding.
    pub direct_eval: bool,
}

/// `f?.(args)`.
#[derive(Debug, Clone)]
pub struct OptionalCallExpr {
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    pub loc: SourceLocation,
    pub callee: Box<Expr>,
    /// Empty both for `new F()` and `new F`.
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct TaggedTemplateExpr {
    pub loc: SourceLocation,
    pub tag: Box<Expr>,
    pub quasi: TemplateLit,
}

#[derive(Debug, Clone)]
pub struct YieldExpr {
    pub loc: SourceLocation,
    /// `yield*`.
    pub delegate: bool,
    pub argument: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct AwaitExpr {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

/// `import(specifier)` and `import(specifier, options)`.
#[derive(Debug, Clone)]
pub struct ImportExpr {
    pub loc: SourceLocation,
    pub source: Box<Expr>,
    pub options: Option<Box<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaPropKind {
    NewTarget,
    /// Modules only.
    ImportMeta,
    /// Generators only, behind the function-sent feature.
    FunctionSent,
}

#[derive(Debug, Clone)]
pub struct MetaPropExpr {
    pub loc: SourceLocation,
    pub kind: MetaPropKind,
}

#[derive(Debug, Clone)]
pub struct DoExpr {
    pub loc: SourceLocation,
    pub body: Vec<Stmt>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct ThrowExpr {
    pub loc: SourceLocation,
    pub argument: Box<Expr>,
}

/// `[for (x of xs) if (c) f(x)]`, or with parentheses instead of brackets
/// for the generator form.
#[derive(Debug, Clone)]
pub struct ComprehensionExpr {
    pub loc: SourceLocation,
    pub generator: bool,
    /// In source order.
    pub clauses: Vec<ComprehensionClause>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone)]
pub enum ComprehensionClause {
    /// `scope` declares the names bound by `left`.
    For {
        loc: SourceLocation,
        left: Pat,
        right: Expr,
        scope: ScopeId,
    },
    If { loc: SourceLocation, test: Expr },
}

#[derive(Debug, Clone)]
pub struct NativeCallExpr {
    pub loc: SourceLocation,
    /// Without the leading `%`.
    pub name: Ident,
    pub arguments: Vec<Expr>,
}

// Literals

#[derive(Debug, Clone)]
pub struct NullLit {
    pub loc: SourceLocation,
}

#[derive(Debug, Clone)]
pub struct BoolLit {
    pub loc: SourceLocation,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct NumLit {
    pub loc: SourceLocation,
    pub value: f64,
    /// Source text as written, separators and prefix included.
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct BigIntLit {
    pub loc: SourceLocation,
    /// Digits keep their radix prefix; separators and the `n` suffix are
    /// removed.
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct StringLit {
    pub loc: SourceLocation,
    /// Cooked value with escapes applied.
    pub value: String,
}

/// Pattern and flags have passed the configured
/// [`RegExpValidator`](crate::regexp::RegExpValidator).
#[derive(Debug, Clone)]
pub struct RegExpLit {
    pub loc: SourceLocation,
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone)]
pub struct TemplateLit {
    pub loc: SourceLocation,
    /// `quasis.len() == expressions.len() + 1`.
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct TemplateElement {
    pub loc: SourceLocation,
    pub raw: String,
    /// `None` only in tagged templates, where a malformed escape is
    /// allowed.
    pub cooked: Option<String>,
    pub tail: bool,
}

// Patterns

/// Target of a binding or of a destructuring assignment.
#[derive(Debug, Clone)]
pub enum Pat {
    Ident(BindingIdent),
    /// An identifier reference or member expression, for assignment
    /// patterns that write to existing places.
    Expr(Box<Expr>),
    Array(Box<ArrayPat>),
    Object(Box<ObjectPat>),
    Rest(Box<RestElement>),
    /// `target = default`.
    Assign(Box<AssignPat>),
}

impl Pat {
    pub fn loc(&self) -> SourceLocation {
        match self {
            Pat::Ident(p) => p.loc,
            Pat::Expr(p) => p.loc(),
            Pat::Array(p) => p.loc,
            Pat::Object(p) => p.loc,
            Pat::Rest(p) => p.loc,
            Pat::Assign(p) => p.loc,
        }
    }

    /// A bare identifier, the only form allowed in a simple parameter list.
    pub fn is_simple(&self) -> bool {
        matches!(self, Pat::Ident(_))
    }
}

#[derive(Debug, Clone)]
pub struct ArrayPat {
    pub loc: SourceLocation,
    /// Holes are `None`.  A rest element can only come last.
    pub elements: Vec<Option<Pat>>,
}

#[derive(Debug, Clone)]
pub struct ObjectPat {
    pub loc: SourceLocation,
    pub properties: Vec<ObjectPatProp>,
}

#[derive(Debug, Clone)]
pub enum ObjectPatProp {
    /// `key: target`.
    KeyValue(KeyValuePatProp),
    /// `name` or `name = default`.
    Assign(AssignPatProp),
    Rest(RestElement),
}

#[derive(Debug, Clone)]
pub struct KeyValuePatProp {
    pub loc: SourceLocation,
    pub key: PropKey,
    /// Defaults appear as [`Pat::Assign`].
    pub value: Pat,
}

#[derive(Debug, Clone)]
pub struct AssignPatProp {
    pub loc: SourceLocation,
    pub key: Ident,
    /// The name as a binding, or as a reference inside an assignment
    /// pattern.
    pub target: Box<Pat>,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone)]
pub struct RestElement {
    pub loc: SourceLocation,
    pub argument: Box<Pat>,
}

#[derive(Debug, Clone)]
pub struct AssignPat {
    pub loc: SourceLocation,
    pub left: Box<Pat>,
    pub right: Box<Expr>,
}

// Module items

#[derive(Debug, Clone)]
pub enum ModuleDecl {
    Import(ImportDecl),
    /// `export { ... }`, `export { ... } from`, or an exported declaration.
    ExportNamed(ExportNamedDecl),
    ExportDefault(ExportDefaultDecl),
    /// `export * from` and `export * as ns from`.
    ExportAll(ExportAllDecl),
}

located!(ModuleDecl {
    Import,
    ExportNamed,
    ExportDefault,
    ExportAll,
});

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub loc: SourceLocation,
    /// Empty for a bare `import "mod"`.
    pub specifiers: Vec<ImportSpecifier>,
    pub source: StringLit,
    /// Entries of a `with { ... }` clause.
    pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Clone)]
pub enum ImportSpecifier {
    Named(ImportNamedSpecifier),
    Default(ImportDefaultSpecifier),
    Namespace(ImportNamespaceSpecifier),
}

/// `{ imported as local }`, or `{ local }` when both names coincide.
#[derive(Debug, Clone)]
pub struct ImportNamedSpecifier {
    pub loc: SourceLocation,
    pub imported: ModuleExportName,
    pub local: BindingIdent,
}

#[derive(Debug, Clone)]
pub struct ImportDefaultSpecifier {
    pub loc: SourceLocation,
    pub local: BindingIdent,
}

/// `* as local`.
#[derive(Debug, Clone)]
pub struct ImportNamespaceSpecifier {
    pub loc: SourceLocation,
    pub local: BindingIdent,
}

#[derive(Debug, Clone)]
pub struct ImportAttribute {
    pub loc: SourceLocation,
    pub key: ModuleExportName,
    pub value: StringLit,
}

/// Exactly one of `declaration` and a specifier list is used; `source` and
/// `attributes` only accompany the list.
#[derive(Debug, Clone)]
pub struct ExportNamedDecl {
    pub loc: SourceLocation,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StringLit>,
    pub declaration: Option<Box<Stmt>>,
    pub attributes: Vec<ImportAttribute>,
}

#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub loc: SourceLocation,
    /// A local binding, or a name of the source module when re-exporting.
    pub local: ModuleExportName,
    pub exported: ModuleExportName,
}

#[derive(Debug, Clone)]
pub struct ExportDefaultDecl {
    pub loc: SourceLocation,
    pub declaration: ExportDefaultExpr,
}

/// Function and class forms may be anonymous and are hoisted as
/// declarations; anything else is an expression binding `*default*`.
#[derive(Debug, Clone)]
pub enum ExportDefaultExpr {
    Fn(Box<Function>),
    Class(Box<Class>),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct ExportAllDecl {
    pub loc: SourceLocation,
    /// `as name`.
    pub exported: Option<ModuleExportName>,
    pub source: StringLit,
    pub attributes: Vec<ImportAttribute>,
}

/// Import and export names may be identifiers or well-formed string
/// literals.
#[derive(Debug, Clone)]
pub enum ModuleExportName {
    Ident(Ident),
    Str(StringLit),
}

impl ModuleExportName {
    pub fn value(&self) -> &str {
        match self {
            ModuleExportName::Ident(i) => &i.name,
            ModuleExportName::Str(s) => &s.value,
        }
    }

    pub fn loc(&self) -> SourceLocation {
        match self {
            ModuleExportName::Ident(i) => i.loc,
            ModuleExportName::Str(s) => s.loc,
        }
    }
}

// Teardown
//
// Operator and member chains are built by loops, not by nested productions,
// so they can be far deeper than the nesting ceiling.  Their nodes move the
// chain-forming operands onto a work list when dropped instead of recursing.

fn is_chain_link(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Binary(_)
            | Expr::Logical(_)
            | Expr::Member(_)
            | Expr::OptionalMember(_)
            | Expr::Call(_)
            | Expr::OptionalCall(_)
            | Expr::TaggedTemplate(_)
            | Expr::OptionalChain(_)
    )
}

fn chain_slots(expr: &mut Expr) -> [Option<&mut Expr>; 2] {
    match expr {
        Expr::Binary(e) => [Some(&mut *e.left), Some(&mut *e.right)],
        Expr::Logical(e) => [Some(&mut *e.left), Some(&mut *e.right)],
        Expr::Member(e) => [Some(&mut *e.object), None],
        Expr::OptionalMember(e) => [Some(&mut *e.object), None],
        Expr::Call(e) => [Some(&mut *e.callee), None],
        Expr::OptionalCall(e) => [Some(&mut *e.callee), None],
        Expr::TaggedTemplate(e) => [Some(&mut *e.tag), None],
        Expr::OptionalChain(e) => [Some(&mut e.expression), None],
        _ => [None, None],
    }
}

fn detach_links(slots: [Option<&mut Expr>; 2], pending: &mut Vec<Expr>) {
    for slot in slots.into_iter().flatten() {
        if is_chain_link(slot) {
            let placeholder = Expr::Null(NullLit {
                loc: SourceLocation::default(),
            });
            pending.push(std::mem::replace(slot, placeholder));
        }
    }
}

fn drop_chain(slots: [Option<&mut Expr>; 2]) {
    let mut pending = Vec::new();
    detach_links(slots, &mut pending);
    while let Some(mut link) = pending.pop() {
        detach_links(chain_slots(&mut link), &mut pending);
    }
}

impl Drop for BinaryExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.left), Some(&mut *self.right)]);
    }
}

impl Drop for LogicalExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.left), Some(&mut *self.right)]);
    }
}

impl Drop for MemberExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.object), None]);
    }
}

impl Drop for OptionalMemberExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.object), None]);
    }
}

impl Drop for CallExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.callee), None]);
    }
}

impl Drop for OptionalCallExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.callee), None]);
    }
}

impl Drop for TaggedTemplateExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut *self.tag), None]);
    }
}

impl Drop for OptionalChainExpr {
    fn drop(&mut self) {
        drop_chain([Some(&mut self.expression), None]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::Position;

    fn span_at(offset: usize) -> SourceLocation {
        let at = Position {
            offset,
            line: 1,
            column: offset as u32 + 1,
        };
        Span::new(at, at)
    }

    #[test]
    fn test_function_kind_from_flags() {
        assert_eq!(FunctionKind::new(false, false), FunctionKind::Normal);
        assert_eq!(FunctionKind::new(false, true), FunctionKind::Generator);
        assert_eq!(FunctionKind::new(true, true), FunctionKind::AsyncGenerator);
        assert!(FunctionKind::Async.is_async());
        assert!(!FunctionKind::Async.is_generator());
        assert!(FunctionKind::AsyncGenerator.is_generator());
    }

    #[test]
    fn test_statement_loc_forwards_to_node() {
        let empty = Stmt::Empty(EmptyStmt { loc: span_at(3) });
        assert_eq!(empty.loc().start.offset, 3);
        let block = Stmt::Block(BlockStmt {
            loc: span_at(7),
            body: vec![empty],
            scope: 0,
        });
        assert_eq!(block.loc().start.offset, 7);
    }

    #[test]
    fn test_expression_loc_forwards_through_boxes() {
        let inner = Expr::Bool(BoolLit {
            loc: span_at(2),
            value: true,
        });
        let paren = Expr::Paren(Box::new(ParenExpr {
            loc: span_at(1),
            expr: inner,
        }));
        assert_eq!(paren.loc().start.offset, 1);
        let meta = Expr::MetaProp(MetaPropExpr {
            loc: span_at(5),
            kind: MetaPropKind::NewTarget,
        });
        assert_eq!(meta.loc().start.offset, 5);
    }

    #[test]
    fn test_rest_pattern_is_not_simple() {
        let name = Pat::Ident(BindingIdent {
            loc: span_at(4),
            name: "a".into(),
            binding: 0,
        });
        assert!(name.is_simple());
        let rest = Pat::Rest(Box::new(RestElement {
            loc: span_at(1),
            argument: Box::new(name),
        }));
        assert!(!rest.is_simple());
        assert_eq!(rest.loc().start.offset, 1);
    }

    #[test]
    fn test_static_name_of_keys() {
        let key = PropKey::Str(StringLit {
            loc: span_at(0),
            value: "__proto__".into(),
        });
        assert_eq!(key.static_name(), Some("__proto__"));
        let computed = PropKey::Computed(Box::new(Expr::This(ThisExpr { loc: span_at(1) })));
        assert_eq!(computed.static_name(), None);
        assert_eq!(computed.loc().start.offset, 1);
    }

    #[test]
    fn test_string_export_name() {
        let name = ModuleExportName::Str(StringLit {
            loc: span_at(6),
            value: "a-b".into(),
        });
        assert_eq!(name.value(), "a-b");
        assert_eq!(name.loc().start.offset, 6);
    }

    #[test]
    fn test_module_decl_loc() {
        let decl = ModuleDecl::ExportAll(ExportAllDecl {
            loc: span_at(9),
            exported: None,
            source: StringLit {
                loc: span_at(23),
                value: "./m.js".into(),
            },
            attributes: Vec::new(),
        });
        assert_eq!(decl.loc().start.offset, 9);
    }
}
