//! End-to-end parser tests: whole sources in, programs or diagnostics out.

use crate::error::{ErrorKind, ParseResult, ParserError};
use crate::messages::MessageKey;
use crate::options::{EvalContext, EvalFlags, Features, ParseOptions};
use crate::regexp::RegExpValidator;
use crate::{parse_function, parse_module, parse_script};

use super::Parser;
use super::ast::{
    AssignTarget, BlockStmt, Class, ClassMember, ComprehensionClause, ExportDefaultExpr, Expr,
    ForInOfLeft, ForInit, Function, FunctionBody, FunctionKind, ImportSpecifier, MemberProp,
    MethodKind, ModuleDecl, ObjectPatProp, ObjectProp, Pat, Program, ProgramItem, PropKey,
    PropValue, SourceText, SourceType, Stmt, TemplateLit, VarDecl,
};
use super::scanner::Span;
use super::scope::{DeclarationKind, Resolution};

fn script(src: &str) -> Program {
    parse_script(src, &ParseOptions::default()).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn module(src: &str) -> Program {
    parse_module(src, &ParseOptions::default()).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn script_error(src: &str) -> ParserError {
    match parse_script(src, &ParseOptions::default()) {
        Ok(_) => panic!("expected an error for {src:?}"),
        Err(e) => e,
    }
}

fn module_error(src: &str) -> ParserError {
    match parse_module(src, &ParseOptions::default()) {
        Ok(_) => panic!("expected an error for {src:?}"),
        Err(e) => e,
    }
}

fn script_with(src: &str, options: &ParseOptions) -> ParseResult<Program> {
    parse_script(src, options)
}

fn assert_script_error(src: &str, key: MessageKey) {
    let err = script_error(src);
    assert_eq!(err.key, key, "{src}: {err}");
}

fn assert_module_error(src: &str, key: MessageKey) {
    let err = module_error(src);
    assert_eq!(err.key, key, "{src}: {err}");
}

fn first_stmt(program: &Program) -> &Stmt {
    match &program.body[0] {
        ProgramItem::Stmt(stmt) => stmt,
        ProgramItem::ModuleDecl(_) => panic!("expected a statement"),
    }
}

fn resolution_of(program: &Program, text: &str) -> Resolution {
    let reference = program
        .scopes
        .references()
        .iter()
        .find(|r| r.text == text)
        .unwrap_or_else(|| panic!("no reference to {text}"));
    reference.resolution
}

// ── Programs and directives ─────────────────────────────────────────────────

#[test]
fn test_empty_script() {
    let program = script("");
    assert!(program.body.is_empty());
    assert_eq!(program.source_type, SourceType::Script);
    assert!(!program.strict);
}

#[test]
fn test_use_strict_directive() {
    let program = script("'use strict'; x;");
    assert!(program.strict);
    assert_eq!(program.directives().collect::<Vec<_>>(), vec!["use strict"]);
}

#[test]
fn test_directive_prologue_stops_at_first_non_string() {
    let program = script("'a'; x; 'use strict';");
    assert!(!program.strict);
    assert_eq!(program.directives().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_parenthesised_string_is_not_directive() {
    let program = script("('use strict'); with (a) {}");
    assert!(!program.strict);
}

#[test]
fn test_octal_escape_before_use_strict_is_error() {
    assert_script_error(
        "function f() { '\\07'; 'use strict'; }",
        MessageKey::StrictOctalEscape,
    );
}

#[test]
fn test_legacy_octal_literal() {
    script("010;");
    assert_script_error("'use strict'; 010;", MessageKey::StrictOctalLiteral);
}

#[test]
fn test_module_is_strict() {
    let program = module("x;");
    assert!(program.strict);
    assert_eq!(program.source_type, SourceType::Module);
    assert_module_error("with (a) {}", MessageKey::StrictWith);
}

#[test]
fn test_hashbang_and_html_comments() {
    script("#!/usr/bin/env node\nx;");
    script("<!-- old\nx;");
    assert!(parse_module("<!-- old\nx;", &ParseOptions::default()).is_err());
}

// ── Statements ──────────────────────────────────────────────────────────────

#[test]
fn test_with_statement_strictness() {
    script("with (a) {}");
    assert_script_error("'use strict'; with (a) {}", MessageKey::StrictWith);
}

#[test]
fn test_single_statement_bodies() {
    assert_script_error("if (a) let [b] = c;", MessageKey::LetBracket);
    assert_script_error("if (a) let b = 1;", MessageKey::LexicalDeclarationNotAllowed);
    assert_script_error("while (a) const b = 1;", MessageKey::LexicalDeclarationNotAllowed);
    assert_script_error("while (a) class C {}", MessageKey::LexicalDeclarationNotAllowed);
    assert_script_error("while (a) function f() {}", MessageKey::FunctionDeclarationNotAllowed);
    script("if (a) function f() {}");
    script("if (a) let\nb = 1;");
}

#[test]
fn test_labels() {
    script("a: while (x) { b: { continue a; } }");
    script("a: { break a; }");
    assert_script_error("a: a: ;", MessageKey::DuplicateLabel);
    assert_script_error("break foo;", MessageKey::UndefinedLabel);
    assert_script_error("a: { continue a; }", MessageKey::ContinueNonIterationLabel);
    assert_script_error("break;", MessageKey::IllegalBreak);
    assert_script_error("continue;", MessageKey::IllegalContinue);
    assert_script_error("a: function* g() {}", MessageKey::InvalidLabelledFunction);
    assert_script_error(
        "'use strict'; a: function f() {}",
        MessageKey::InvalidLabelledFunction,
    );
}

#[test]
fn test_label_scope_ends_with_function() {
    assert_script_error(
        "a: while (x) { (function () { break a; }); }",
        MessageKey::UndefinedLabel,
    );
}

#[test]
fn test_break_inside_switch() {
    script("switch (x) { case 1: break; default: break; }");
    assert!(parse_script("switch (x) { default: default: }", &ParseOptions::default()).is_err());
}

#[test]
fn test_return_and_throw() {
    assert_script_error("return 1;", MessageKey::ReturnOutsideFunction);
    assert_script_error("throw\nx;", MessageKey::NewlineAfterThrow);
    script("function f() { return\n1; }");
}

#[test]
fn test_const_requires_initializer() {
    assert_script_error("const a;", MessageKey::ConstWithoutInitializer);
    assert_script_error("let [a];", MessageKey::DestructuringWithoutInitializer);
    script("for (const a of b) {}");
    script("for (const a in b) {}");
}

#[test]
fn test_for_in_of_heads() {
    script("for (var a = 1 in b) {}");
    script("for (let [a, b] of c) {}");
    script("for (a.b of c) {}");
    assert_script_error("for (let a, b of c) {}", MessageKey::ForInOfMultipleBindings);
    assert_script_error("for (let a = 1 in b) {}", MessageKey::ForInOfInitializer);
    assert_script_error("for (async of x) {}", MessageKey::ForAsyncOf);
    assert_script_error("for await (x of y) {}", MessageKey::ForAwaitNotAllowed);
    script("async function f() { for await (x of y) {} }");
}

#[test]
fn test_for_head_excludes_in_operator() {
    script("for (var i = 0, n = (a in b); i < n; i++) {}");
    let program = script("for (x in y) {}");
    assert!(matches!(first_stmt(&program), Stmt::ForIn(_)));
}

#[test]
fn test_catch_binding() {
    script("try {} catch (e) { var e; }");
    script("try {} catch {}");
    assert_script_error("try {} catch (e) { let e; }", MessageKey::VariableRedeclaration);
}

#[test]
fn test_lexical_redeclaration() {
    script("var a; var a;");
    assert_script_error("let a; var a;", MessageKey::VariableRedeclaration);
    assert_script_error("let a; let a;", MessageKey::VariableRedeclaration);
    assert_script_error("const a = 1; function a() {}", MessageKey::VariableRedeclaration);
    assert_script_error("const let = 1;", MessageKey::LetLexicallyBound);
}

// ── Functions ───────────────────────────────────────────────────────────────

#[test]
fn test_duplicate_parameters() {
    script("function f(a, a) {}");
    assert_script_error("'use strict'; function f(a, a) {}", MessageKey::DuplicateParameter);
    assert_script_error("function f(a, a) { 'use strict'; }", MessageKey::DuplicateParameter);
    assert_script_error("function f(a, [a]) {}", MessageKey::DuplicateParameter);
    assert_script_error("(a, a) => 1;", MessageKey::DuplicateParameter);
}

#[test]
fn test_use_strict_with_non_simple_parameters() {
    assert_script_error(
        "function f(a = 1) { 'use strict'; }",
        MessageKey::UseStrictNonSimpleParameters,
    );
    script("function f(a = 1) { 'use loose'; }");
}

#[test]
fn test_parameter_clashes_with_lexical_body_name() {
    assert_script_error("function f(a) { let a; }", MessageKey::ParameterRedeclaration);
    script("function f(a) { var a; }");
}

#[test]
fn test_function_name_strictness_is_retroactive() {
    script("function eval() {}");
    assert_script_error("function eval() { 'use strict'; }", MessageKey::StrictEvalArguments);
}

#[test]
fn test_accessor_arity() {
    script("({ get a() { return 1; }, set a(v) {} });");
    assert_script_error("({ get a(x) {} });", MessageKey::GetterArity);
    assert_script_error("({ set a() {} });", MessageKey::SetterArity);
}

#[test]
fn test_await_and_yield_contexts() {
    script("async function f() { await x; }");
    script("function f() { var await; }");
    script("function* g() { yield 1; yield* h(); }");
    assert_script_error("async function f() { var await; }", MessageKey::InvalidAwait);
    assert!(parse_script("function* g(a = yield) {}", &ParseOptions::default()).is_err());
    assert!(parse_script("async function f(a = await x) {}", &ParseOptions::default()).is_err());
}

#[test]
fn test_arrow_functions() {
    script("(a, b) => a + b;");
    script("async (a) => await a;");
    script("([a], {b}) => a + b;");
    script("x = a => b => a + b;");
    assert_script_error("(a, b)\n=> a;", MessageKey::NewlineBeforeArrow);
    assert!(parse_script("(a + b) => 1;", &ParseOptions::default()).is_err());
}

#[test]
fn test_arrow_parameters_rebound_after_backtracking() {
    let program = script("var a; (a) => a;");
    let a = program
        .scopes
        .references()
        .iter()
        .filter(|r| r.text == "a")
        .map(|r| r.resolution)
        .collect::<Vec<_>>();
    // Only the body reference survives the re-parse, bound to the parameter.
    assert_eq!(a.len(), 1);
    let Resolution::Binding(id) = a[0] else {
        panic!("unresolved arrow parameter reference");
    };
    assert_eq!(program.scopes.name(id).kind, DeclarationKind::Parameter);
}

#[test]
fn test_new_target_placement() {
    script("function f() { return () => new.target; }");
    assert_script_error("new.target;", MessageKey::InvalidNewTarget);
}

// ── Expressions ─────────────────────────────────────────────────────────────

#[test]
fn test_exponent_and_coalesce_rules() {
    script("(-1) ** 2;");
    script("(a ?? b) || c;");
    assert_script_error("-1 ** 2;", MessageKey::UnparenthesizedUnaryExponent);
    assert_script_error("a ?? b || c;", MessageKey::MixedCoalesce);
}

#[test]
fn test_assignment_targets() {
    let err = script_error("1 = 2;");
    assert_eq!(err.kind, ErrorKind::ReferenceError);
    assert_eq!(err.key, MessageKey::InvalidAssignmentTarget);

    let err = script_error("a?.b = 1;");
    assert_eq!(err.kind, ErrorKind::SyntaxError);

    let err = script_error("++f();");
    assert_eq!(err.kind, ErrorKind::ReferenceError);
    assert_eq!(err.key, MessageKey::InvalidUpdateTarget);

    script("[a, {b: c.d}] = e;");
    script("({a = 1} = b);");
}

#[test]
fn test_cover_initialized_name_outside_pattern() {
    assert_script_error("({a = 1});", MessageKey::CoverInitializedName);
}

#[test]
fn test_strict_delete_and_eval_assignment() {
    script("delete x;");
    assert_script_error("'use strict'; delete x;", MessageKey::StrictDelete);
    assert_script_error("'use strict'; eval = 1;", MessageKey::StrictEvalArguments);
}

#[test]
fn test_optional_chains() {
    script("a?.b.c?.(d)?.[e];");
    assert_script_error("a?.b`c`;", MessageKey::OptionalChainTemplate);
    assert_script_error("new a?.b();", MessageKey::OptionalChainNew);
}

#[test]
fn test_template_escapes() {
    script("tag`\\unicode`;");
    assert!(parse_script("`\\unicode`;", &ParseOptions::default()).is_err());
}

#[test]
fn test_super_placement() {
    script("({ m() { return super.x; } });");
    assert_script_error("super.x;", MessageKey::InvalidSuperProperty);
    assert_script_error(
        "class A { constructor() { super(); } }",
        MessageKey::InvalidSuperCall,
    );
    script("class A extends B { constructor() { (() => super())(); } }");
}

#[test]
fn test_import_meta_only_in_modules() {
    module("import.meta.url;");
    assert_script_error("import.meta;", MessageKey::InvalidImportMeta);
    script("import('./m.js');");
}

// ── Classes ─────────────────────────────────────────────────────────────────

#[test]
fn test_class_members() {
    assert_script_error(
        "class A { constructor() {} constructor() {} }",
        MessageKey::DuplicateConstructor,
    );
    assert_script_error("class A { static prototype() {} }", MessageKey::StaticPrototype);
    assert_script_error("class A { get constructor() {} }", MessageKey::InvalidConstructor);
    assert_script_error("class A { *constructor() {} }", MessageKey::InvalidConstructor);
    assert_script_error("class A { constructor = 1; }", MessageKey::FieldNamedConstructor);
    script("class A { static constructor() {} prototype() {} }");
}

#[test]
fn test_class_body_is_strict() {
    assert_script_error("class A { m() { with (a) {} } }", MessageKey::StrictWith);
    assert_script_error("class A extends (010) {}", MessageKey::StrictOctalLiteral);
}

#[test]
fn test_private_names() {
    script("class A { #x; get #y() {} set #y(v) {} m() { return this.#x + this.#y; } }");
    script("class A { #x; static has(o) { return #x in o; } }");
    script("class A { #x; m() { class B { n(o) { return o.#x; } } } }");
    assert_script_error("class A { #x; #x; }", MessageKey::DuplicatePrivateName);
    assert_script_error(
        "class A { static get #y() {} set #y(v) {} }",
        MessageKey::DuplicatePrivateName,
    );
    assert_script_error("class A { m() { this.#y; } }", MessageKey::UndeclaredPrivateName);
    assert_script_error("class A { #constructor; }", MessageKey::PrivateConstructor);
}

#[test]
fn test_private_name_used_before_declaration() {
    script("class A { m() { return this.#later; } #later = 1; }");
}

#[test]
fn test_field_initializer_context() {
    script("class A { x = this.y; static z = 1; }");
    assert_script_error("class A { x = arguments; }", MessageKey::ArgumentsNotAllowed);
    script("class A { static { var x = 1; } }");
}

#[test]
fn test_default_constructor_synthesis() {
    let program = script("class A extends B {}");
    let Stmt::ClassDecl(class) = first_stmt(&program) else {
        panic!("expected a class declaration");
    };
    let constructor = class
        .body
        .body
        .iter()
        .find_map(|m| match m {
            ClassMember::Method(m) if m.kind == MethodKind::Constructor => Some(m),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no synthesized constructor"));
    let SourceText::Synthetic(text) = &constructor.value.source else {
        panic!("constructor source should be synthetic");
    };
    assert!(text.contains("super(...args)"));

    let program = script("class A { constructor() {} }");
    let Stmt::ClassDecl(class) = first_stmt(&program) else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.body.body.len(), 1);
}

#[test]
fn test_class_name_has_inner_binding() {
    let program = script("class A { m() { return A; } }");
    let Stmt::ClassDecl(class) = first_stmt(&program) else {
        panic!("expected a class declaration");
    };
    let inner = class.inner_binding.unwrap_or_else(|| panic!("no inner binding"));
    assert_eq!(program.scopes.name(inner).kind, DeclarationKind::ClassName);
    assert_eq!(resolution_of(&program, "A"), Resolution::Binding(inner));
}

#[test]
fn test_class_name_binding_outside_class_is_outer() {
    let program = script("class A { m() { return A; } } A;");
    let Stmt::ClassDecl(class) = first_stmt(&program) else {
        panic!("expected a class declaration");
    };
    let (Some(id), Some(inner)) = (&class.id, class.inner_binding) else {
        panic!("class should bind its name twice");
    };
    assert_ne!(id.binding, inner);
    let resolved: Vec<Resolution> = program
        .scopes
        .references()
        .iter()
        .filter(|r| r.text == "A")
        .map(|r| r.resolution)
        .collect();
    assert_eq!(
        resolved,
        vec![Resolution::Binding(inner), Resolution::Binding(id.binding)]
    );
}

#[test]
fn test_synthesized_constructor_spans_sit_inside_class() {
    let src = "var q;\n\n   class A extends B { m() {} }";
    let program = script(src);
    let ProgramItem::Stmt(Stmt::ClassDecl(class)) = &program.body[1] else {
        panic!("expected a class declaration");
    };
    let constructor = class
        .body
        .body
        .iter()
        .find_map(|m| match m {
            ClassMember::Method(m) if m.kind == MethodKind::Constructor => Some(m),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no synthesized constructor"));
    assert!(class.body.loc.contains(&constructor.loc), "{:?}", constructor.loc);
    assert!(class.body.loc.contains(&constructor.value.loc));
    assert_eq!(constructor.loc.start.line, 3);
    assert_eq!(constructor.loc.start.offset, src.len() - 1);
    SpanWalk::new(src).program(&program);
}

// ── Modules ─────────────────────────────────────────────────────────────────

#[test]
fn test_module_items_outside_modules() {
    assert_script_error("export var a;", MessageKey::ModuleItemOutsideModule);
    assert_script_error("import a from 'm';", MessageKey::ModuleItemOutsideModule);
}

#[test]
fn test_exports() {
    module("export const a = 1; export { a as b }; export default function () {}");
    module("export * as ns from 'm'; export { 'x' as y } from 'm';");
    module("var a; export { a as 'string name' };");
    assert_module_error("export { a };", MessageKey::UndeclaredExport);
    assert_module_error("export const a = 1; export { a };", MessageKey::DuplicateExport);
    assert_module_error("export default 1; export default 2;", MessageKey::DuplicateExport);
    assert_module_error("export { 'x' };", MessageKey::StringExportWithoutFrom);
}

#[test]
fn test_export_may_precede_declaration() {
    module("export { later }; let later = 1;");
}

#[test]
fn test_imports() {
    let program = module("import a, { b as c } from 'm'; import * as ns from 'n'; a; c; ns;");
    let Resolution::Binding(id) = resolution_of(&program, "c") else {
        panic!("import binding unresolved");
    };
    assert_eq!(program.scopes.name(id).kind, DeclarationKind::Import);
    assert_module_error("import { a } from 'm'; let a;", MessageKey::VariableRedeclaration);
    assert!(parse_module("import { let } from 'm';", &ParseOptions::default()).is_err());
    assert_module_error(
        "import a from 'm' with { type: 'json', type: 'json' };",
        MessageKey::DuplicateImportAttribute,
    );
    module("import a from 'm' with { type: 'json' };");
}

#[test]
fn test_top_level_await_in_modules() {
    module("await x;");
    assert!(parse_script("await x;", &ParseOptions::default()).is_err());
}

#[test]
fn test_module_functions_are_lexical() {
    assert_module_error("function f() {} var f;", MessageKey::VariableRedeclaration);
    script("function f() {} var f;");
}

// ── Identifier resolution ───────────────────────────────────────────────────

#[test]
fn test_reference_resolution() {
    let program = script("var a; a; b;");
    assert!(matches!(resolution_of(&program, "a"), Resolution::Binding(_)));
    assert_eq!(resolution_of(&program, "b"), Resolution::Unresolved);
}

#[test]
fn test_with_makes_references_dynamic() {
    let program = script("with (o) { a; }");
    assert_eq!(resolution_of(&program, "a"), Resolution::Dynamic);
}

#[test]
fn test_block_binding_shadows_outer() {
    let program = script("let a; { let a; a; }");
    let Resolution::Binding(id) = resolution_of(&program, "a") else {
        panic!("unresolved");
    };
    assert_ne!(program.scopes.name(id).scope, program.scope);
}

// ── Eval code ───────────────────────────────────────────────────────────────

#[test]
fn test_eval_context_inherits_capabilities() {
    let strict = ParseOptions::default().with_eval(EvalContext::new(EvalFlags::STRICT));
    let err = script_with("with (a) {}", &strict).unwrap_err();
    assert_eq!(err.key, MessageKey::StrictWith);

    let in_function = ParseOptions::default().with_eval(EvalContext::new(EvalFlags::NEW_TARGET));
    assert!(script_with("new.target;", &in_function).is_ok());

    let in_field =
        ParseOptions::default().with_eval(EvalContext::new(EvalFlags::ARGUMENTS_RESTRICTED));
    let err = script_with("arguments;", &in_field).unwrap_err();
    assert_eq!(err.key, MessageKey::ArgumentsInFieldEval);
}

#[test]
fn test_arguments_in_field_eval_has_own_message() {
    let in_field =
        ParseOptions::default().with_eval(EvalContext::new(EvalFlags::ARGUMENTS_RESTRICTED));
    let err = script_with("() => arguments;", &in_field).unwrap_err();
    assert_eq!(err.key, MessageKey::ArgumentsInFieldEval);
    assert!(err.message.contains("eval"), "{}", err.message);
    assert!(script_with("function f() { return arguments; }", &in_field).is_ok());

    assert_script_error("class A { x = () => arguments; }", MessageKey::ArgumentsNotAllowed);
    assert_script_error("class A { static { arguments; } }", MessageKey::ArgumentsNotAllowed);
}

#[test]
fn test_eval_code_unbound_names_follow_caller_scope() {
    let resolve = |flags: EvalFlags| {
        let options = ParseOptions::default().with_eval(EvalContext::new(flags));
        let program = script_with("let y; x; y;", &options).unwrap_or_else(|e| panic!("{e}"));
        (resolution_of(&program, "x"), resolution_of(&program, "y"))
    };
    assert_eq!(resolve(EvalFlags::empty()).0, Resolution::Unresolved);
    assert_eq!(resolve(EvalFlags::DIRECT | EvalFlags::GLOBAL_CODE).0, Resolution::Unresolved);
    for caller in [
        EvalFlags::FUNCTION_CODE,
        EvalFlags::GLOBAL_CODE | EvalFlags::ENCLOSING_CATCH,
        EvalFlags::GLOBAL_CODE | EvalFlags::ENCLOSING_LEXICAL,
        EvalFlags::GLOBAL_CODE | EvalFlags::ENCLOSING_WITH,
    ] {
        let (x, y) = resolve(EvalFlags::DIRECT | caller);
        assert_eq!(x, Resolution::Dynamic, "{caller:?}");
        assert!(matches!(y, Resolution::Binding(_)), "{caller:?}");
    }
    // Indirect eval only sees the global scope.
    let indirect = EvalFlags::FUNCTION_CODE | EvalFlags::ENCLOSING_LEXICAL;
    assert_eq!(resolve(indirect).0, Resolution::Unresolved);
}

#[test]
fn test_eval_context_private_names() {
    let options = ParseOptions::default()
        .with_eval(EvalContext::new(EvalFlags::DIRECT).with_private_names(["x"]));
    assert!(script_with("this.#x;", &options).is_ok());
    let err = script_with("this.#y;", &options).unwrap_err();
    assert_eq!(err.key, MessageKey::UndeclaredPrivateName);
}

// ── Regular expressions ─────────────────────────────────────────────────────

#[test]
fn test_regexp_errors_carry_literal_position() {
    let err = script_error("x = /(/;");
    assert_eq!(err.key, MessageKey::InvalidRegExp);
    assert_eq!((err.line, err.column), (1, 5));

    assert_script_error("/[b-a]/;", MessageKey::InvalidRegExp);
    assert_script_error("/a**/;", MessageKey::InvalidRegExp);
    assert_script_error("/a/gg;", MessageKey::InvalidRegExpFlags);
    script("/[/]/.test(x);");
}

#[test]
fn test_unterminated_class_fails_in_lexer() {
    let err = script_error("/[/;");
    assert!(err.is_premature_eof());
    assert_eq!((err.line, err.column), (1, 1));
}

struct RejectAll;

impl RegExpValidator for RejectAll {
    fn validate(
        &self,
        pattern: &str,
        _flags: &str,
        source_name: &str,
        line: u32,
        column: u32,
    ) -> ParseResult<()> {
        Err(ParserError::syntax(
            source_name,
            line,
            column,
            MessageKey::InvalidRegExp,
            vec![pattern.to_string(), "rejected".to_string()],
        ))
    }
}

#[test]
fn test_custom_regexp_validator() {
    let options = ParseOptions::default();
    let err = Parser::new("\n  /a/;", &options)
        .with_regexp_validator(Box::new(RejectAll))
        .parse_script()
        .unwrap_err();
    assert_eq!(err.args, vec!["a".to_string(), "rejected".to_string()]);
    assert_eq!((err.line, err.column), (2, 3));
}

// ── Standalone functions ────────────────────────────────────────────────────

#[test]
fn test_standalone_function() {
    let options = ParseOptions::default();
    let parsed = parse_function("a, b", "return a + b;", FunctionKind::Normal, &options).unwrap();
    assert_eq!(parsed.function.params.len(), 2);
    let SourceText::Synthetic(text) = &parsed.function.source else {
        panic!("standalone function source should be synthetic");
    };
    assert!(text.starts_with("function anonymous(a, b\n) {"));

    assert!(parse_function("", "await x;", FunctionKind::Async, &options).is_ok());
    assert!(parse_function("", "yield 1;", FunctionKind::Generator, &options).is_ok());
}

#[test]
fn test_standalone_function_texts_are_independent() {
    let options = ParseOptions::default();
    assert!(parse_function("a) {", "", FunctionKind::Normal, &options).is_err());
    assert!(parse_function("a", "}", FunctionKind::Normal, &options).is_err());
    let err = parse_function("a = 1", "'use strict';", FunctionKind::Normal, &options).unwrap_err();
    assert_eq!(err.key, MessageKey::UseStrictNonSimpleParameters);
}

// ── Staged features ─────────────────────────────────────────────────────────

fn staged() -> ParseOptions {
    ParseOptions::default().with_features(
        Features::standard()
            | Features::DECORATORS
            | Features::DO_EXPRESSIONS
            | Features::THROW_EXPRESSIONS
            | Features::CALL_CONSTRUCTORS,
    )
}

#[test]
fn test_staged_features_are_off_by_default() {
    assert_script_error("@dec class A {}", MessageKey::FeatureNotEnabled);
    assert!(parse_script("x = do { 1; };", &ParseOptions::default()).is_err());
}

#[test]
fn test_staged_features_when_enabled() {
    let options = staged();
    assert!(script_with("@dec @ns.other(1) class A { @field x = 1; }", &options).is_ok());
    assert!(script_with("x = do { 1; };", &options).is_ok());
    assert!(script_with("f(a || throw new Error());", &options).is_ok());
    let err = script_with(
        "class A { call constructor() {} call constructor() {} }",
        &options,
    )
    .unwrap_err();
    assert_eq!(err.key, MessageKey::DuplicateCallConstructor);
}

// ── Diagnostics and limits ──────────────────────────────────────────────────

#[test]
fn test_error_display() {
    let err = script_error("a b;");
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert!(err.to_string().starts_with("SyntaxError: <anonymous>:1:3:"), "{err}");
}

#[test]
fn test_source_name_and_start_line() {
    let options = ParseOptions {
        start_line: 10,
        ..ParseOptions::default().with_source_name("app.js")
    };
    let err = script_with("\n)", &options).unwrap_err();
    assert_eq!(err.source_name, "app.js");
    assert_eq!(err.line, 11);
}

#[test]
fn test_premature_eof() {
    assert!(script_error("function f(").is_premature_eof());
    assert!(!script_error("a b;").is_premature_eof());
}

#[test]
fn test_deep_nesting_is_rejected() {
    let deep = [
        format!("{}{}", "[".repeat(5000), "]".repeat(5000)),
        format!("{}1{}", "(".repeat(5000), ")".repeat(5000)),
        format!("1{}", "**1".repeat(5000)),
        format!("{}{}", "{".repeat(5000), "}".repeat(5000)),
        format!("{}1", "!".repeat(5000)),
    ];
    for src in &deep {
        let err = script_error(src);
        assert_eq!(err.key, MessageKey::NestingTooDeep, "{}", &src[..8]);
    }

    let nested = format!("x = {}1{};", "(".repeat(50), ")".repeat(50));
    script(&nested);
}

#[test]
fn test_raised_nesting_ceiling_parses_on_default_stack() {
    let options = ParseOptions {
        max_nesting_depth: 100_000,
        ..ParseOptions::default()
    };
    let src = format!("{}{}", "[".repeat(1000), "]".repeat(1000));
    assert!(script_with(&src, &options).is_ok());
}

#[test]
fn test_exponent_chain_counts_toward_nesting() {
    let options = ParseOptions {
        max_nesting_depth: 16,
        ..ParseOptions::default()
    };
    let long = format!("1{};", "**1".repeat(40));
    let err = script_with(&long, &options).unwrap_err();
    assert_eq!(err.key, MessageKey::NestingTooDeep);

    let short = format!("1{};", "**1".repeat(4));
    assert!(script_with(&short, &options).is_ok());
}

#[test]
fn test_long_operator_chains_drop_without_recursion() {
    let chains = [
        format!("1{};", "+1".repeat(100_000)),
        format!("a{};", " || b".repeat(100_000)),
        format!("a{};", ".b".repeat(100_000)),
        format!("f{};", "()".repeat(50_000)),
        format!("a{};", "?.b".repeat(50_000)),
    ];
    for src in &chains {
        let program = script(src);
        assert_eq!(program.body.len(), 1);
        drop(program);
    }
}

#[test]
fn test_expression_statement_shape() {
    let program = script("a + b;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected an expression statement");
    };
    assert!(matches!(*stmt.expr, Expr::Binary(_)));
    assert!(stmt.directive.is_none());
}

#[test]
fn test_var_hoists_to_function_scope() {
    let program = script("function f() { { var x; } return typeof x; }");
    let Stmt::FnDecl(f) = first_stmt(&program) else {
        panic!("expected a function declaration");
    };
    assert!(program.scopes.var_names(f.body_scope).contains_text("x"));
    let Resolution::Binding(id) = resolution_of(&program, "x") else {
        panic!("x should resolve");
    };
    assert_eq!(program.scopes.enclosing_var_scope(program.scopes.name(id).scope), f.body_scope);
}

#[test]
fn test_async_cover_grammar() {
    let program = script("async(x);");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected an expression statement");
    };
    let Expr::Call(call) = &*stmt.expr else {
        panic!("async(x) should be a call");
    };
    assert!(matches!(&*call.callee, Expr::Ident(id) if id.name == "async"));

    let program = script("async (x) => x;");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected an expression statement");
    };
    let Expr::Arrow(arrow) = &*stmt.expr else {
        panic!("expected an async arrow");
    };
    assert_eq!(arrow.kind, FunctionKind::Async);

    let program = script("(a);");
    let Stmt::Expr(stmt) = first_stmt(&program) else {
        panic!("expected an expression statement");
    };
    assert!(matches!(&*stmt.expr, Expr::Paren(_)));
}

#[test]
fn test_numeric_values() {
    for (src, expected) in [("0x1F;", 31.0), ("0b101;", 5.0), ("1_000;", 1000.0), ("0o17;", 15.0)] {
        let program = script(src);
        let Stmt::Expr(stmt) = first_stmt(&program) else {
            panic!("expected an expression statement");
        };
        let Expr::Num(lit) = &*stmt.expr else {
            panic!("{src} should be a number literal");
        };
        assert_eq!(lit.value, expected, "{src}");
    }
}

// ── Source spans ────────────────────────────────────────────────────────────

const SPAN_SCRIPT: &str = r#"var a = 1, [b, , ...c] = d, {e, f: {g = 2}, ...h} = i;
function outer(p, q = 3, ...r) {
  label: for (let j = 0; j < 10; j++) { if (j) continue label; else break; }
  for (const k of [1, 2]) {}
  for (var m in {n: 1}) {}
  while (a) a--;
  do a--; while (a);
  switch (p) { case 1: q = p ? `t${p}x` : tag`u${q}`; break; default: }
  try { throw new Error('x'); } catch ({message}) {} finally {}
  with (o) { p; }
  debugger;
  return () => ({ get x() { return this; }, set x(v) {}, [q]: 1, m() {}, ...r });
}
function s() { 'use strict'; return 1; }
// classes
class A extends Object {
  #p = 1;
  static s;
  static { this.s = 2; }
  constructor(a) { super(a); }
  get v() { return this.#p; }
  m() { return #p in this && super.m?.(); }
}
class B extends A {}
async function* gen() { yield* gen(); await null; }
x = a?.b.c?.[d](e) ?? (f, g);
[a, b] = [b, a];
({ a, b: [c] } = o);
x++; --x; delete o.p, typeof a, void 0;
(-a) ** 2 ** 3;
/re+/g.test(s);
"#;

const SPAN_MODULE: &str = r#"import def, { a as b, c } from 'm';
import * as ns from 'n';
export const x = 1;
export function f() { return import.meta; }
export default class extends Base { m() {} }
export { x as y, b as z };
export * as all from 'o';
export * from 'p';
"#;

/// Walks a program and asserts every node's span lies inside its parent's.
struct SpanWalk<'a> {
    source: &'a str,
}

impl<'a> SpanWalk<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn within(&self, parent: Span, child: Span, what: &str) {
        assert!(child.start.offset <= child.end.offset, "{what}: inverted span {child:?}");
        assert!(child.end.offset <= self.source.len(), "{what}: past the end {child:?}");
        assert!(
            parent.contains(&child),
            "{what} at {}..{} escapes its parent {}..{}",
            child.start.offset,
            child.end.offset,
            parent.start.offset,
            parent.end.offset
        );
    }

    fn program(&self, program: &Program) {
        assert_eq!(program.loc.end.offset, self.source.len());
        for item in &program.body {
            match item {
                ProgramItem::Stmt(stmt) => self.stmt(program.loc, stmt),
                ProgramItem::ModuleDecl(decl) => self.module_decl(program.loc, decl),
            }
        }
    }

    fn stmts(&self, parent: Span, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(parent, stmt);
        }
    }

    fn block(&self, parent: Span, block: &BlockStmt) {
        self.within(parent, block.loc, "block");
        self.stmts(block.loc, &block.body);
    }

    fn stmt(&self, parent: Span, stmt: &Stmt) {
        let loc = stmt.loc();
        self.within(parent, loc, "statement");
        match stmt {
            Stmt::Block(b) => self.stmts(loc, &b.body),
            Stmt::VarDecl(d) => self.var_decl(loc, d),
            Stmt::FnDecl(f) => self.function(loc, f),
            Stmt::ClassDecl(c) => self.class(loc, c),
            Stmt::Expr(s) => self.expr(loc, &s.expr),
            Stmt::If(s) => {
                self.expr(loc, &s.test);
                self.stmt(loc, &s.consequent);
                if let Some(alternate) = &s.alternate {
                    self.stmt(loc, alternate);
                }
            }
            Stmt::For(s) => {
                match &s.init {
                    Some(ForInit::VarDecl(d)) => self.var_decl(loc, d),
                    Some(ForInit::Expr(e)) => self.expr(loc, e),
                    None => {}
                }
                for e in s.test.iter().chain(&s.update) {
                    self.expr(loc, e);
                }
                self.stmt(loc, &s.body);
            }
            Stmt::ForIn(s) => {
                self.for_left(loc, &s.left);
                self.expr(loc, &s.right);
                self.stmt(loc, &s.body);
            }
            Stmt::ForOf(s) => {
                self.for_left(loc, &s.left);
                self.expr(loc, &s.right);
                self.stmt(loc, &s.body);
            }
            Stmt::While(s) => {
                self.expr(loc, &s.test);
                self.stmt(loc, &s.body);
            }
            Stmt::DoWhile(s) => {
                self.stmt(loc, &s.body);
                self.expr(loc, &s.test);
            }
            Stmt::Switch(s) => {
                self.expr(loc, &s.discriminant);
                for case in &s.cases {
                    self.within(loc, case.loc, "case");
                    if let Some(test) = &case.test {
                        self.expr(case.loc, test);
                    }
                    self.stmts(case.loc, &case.consequent);
                }
            }
            Stmt::Try(s) => {
                self.block(loc, &s.block);
                if let Some(handler) = &s.handler {
                    self.within(loc, handler.loc, "catch clause");
                    if let Some(param) = &handler.param {
                        self.pat(handler.loc, param);
                    }
                    self.block(handler.loc, &handler.body);
                }
                if let Some(finalizer) = &s.finalizer {
                    self.block(loc, finalizer);
                }
            }
            Stmt::Return(s) => {
                if let Some(argument) = &s.argument {
                    self.expr(loc, argument);
                }
            }
            Stmt::Throw(s) => self.expr(loc, &s.argument),
            Stmt::Break(s) => {
                if let Some(label) = &s.label {
                    self.within(loc, label.loc, "label");
                }
            }
            Stmt::Continue(s) => {
                if let Some(label) = &s.label {
                    self.within(loc, label.loc, "label");
                }
            }
            Stmt::Labeled(s) => {
                self.within(loc, s.label.loc, "label");
                self.stmt(loc, &s.body);
            }
            Stmt::With(s) => {
                self.expr(loc, &s.object);
                self.stmt(loc, &s.body);
            }
            Stmt::Debugger(_) | Stmt::Empty(_) => {}
        }
    }

    fn var_decl(&self, parent: Span, decl: &VarDecl) {
        self.within(parent, decl.loc, "declaration");
        for declarator in &decl.declarators {
            self.within(decl.loc, declarator.loc, "declarator");
            self.pat(declarator.loc, &declarator.id);
            if let Some(init) = &declarator.init {
                self.expr(declarator.loc, init);
            }
        }
    }

    fn for_left(&self, parent: Span, left: &ForInOfLeft) {
        match left {
            ForInOfLeft::VarDecl(d) => self.var_decl(parent, d),
            ForInOfLeft::Pat(p) => self.pat(parent, p),
        }
    }

    fn function(&self, parent: Span, function: &Function) {
        let loc = function.loc;
        self.within(parent, loc, "function");
        if let Some(id) = &function.id {
            self.within(loc, id.loc, "function name");
        }
        for param in &function.params {
            self.within(loc, param.loc, "parameter");
            self.pat(param.loc, &param.pat);
            if let Some(default) = &param.default {
                self.expr(param.loc, default);
            }
        }
        match &function.body {
            FunctionBody::Block(body) => self.stmts(loc, body),
            FunctionBody::Expr(body) => self.expr(loc, body),
        }
    }

    fn class(&self, parent: Span, class: &Class) {
        let loc = class.loc;
        self.within(parent, loc, "class");
        if let Some(id) = &class.id {
            self.within(loc, id.loc, "class name");
        }
        if let Some(super_class) = &class.super_class {
            self.expr(loc, super_class);
        }
        let body = class.body.loc;
        self.within(loc, body, "class body");
        for member in &class.body.body {
            match member {
                ClassMember::Method(m) => {
                    self.within(body, m.loc, "method");
                    self.prop_key(m.loc, &m.key);
                    self.function(m.loc, &m.value);
                }
                ClassMember::Property(p) => {
                    self.within(body, p.loc, "field");
                    self.prop_key(p.loc, &p.key);
                    if let Some(value) = &p.value {
                        self.expr(p.loc, value);
                    }
                }
                ClassMember::StaticBlock(b) => {
                    self.within(body, b.loc, "static block");
                    self.stmts(b.loc, &b.body);
                }
            }
        }
    }

    fn prop_key(&self, parent: Span, key: &PropKey) {
        match key {
            PropKey::Computed(e) => self.expr(parent, e),
            _ => self.within(parent, key.loc(), "property key"),
        }
    }

    fn member_prop(&self, parent: Span, prop: &MemberProp) {
        match prop {
            MemberProp::Ident(i) => self.within(parent, i.loc, "property name"),
            MemberProp::Private(i) => self.within(parent, i.loc, "private name"),
            MemberProp::Computed(e) => self.expr(parent, e),
        }
    }

    fn template(&self, parent: Span, template: &TemplateLit) {
        self.within(parent, template.loc, "template");
        for quasi in &template.quasis {
            self.within(template.loc, quasi.loc, "template element");
        }
        self.exprs(template.loc, &template.expressions);
    }

    fn exprs(&self, parent: Span, exprs: &[Expr]) {
        for e in exprs {
            self.expr(parent, e);
        }
    }

    fn expr(&self, parent: Span, expr: &Expr) {
        let loc = expr.loc();
        self.within(parent, loc, "expression");
        match expr {
            Expr::Null(_)
            | Expr::Bool(_)
            | Expr::Num(_)
            | Expr::Str(_)
            | Expr::BigInt(_)
            | Expr::Regexp(_)
            | Expr::Ident(_)
            | Expr::This(_)
            | Expr::MetaProp(_) => {}
            Expr::Template(t) => self.template(loc, t),
            Expr::Array(a) => {
                for element in a.elements.iter().flatten() {
                    self.expr(loc, element);
                }
            }
            Expr::Object(o) => {
                for prop in &o.properties {
                    match prop {
                        ObjectProp::Prop(p) => {
                            self.within(loc, p.loc, "property");
                            self.prop_key(p.loc, &p.key);
                            match &p.value {
                                PropValue::Value(v) => self.expr(p.loc, v),
                                PropValue::Shorthand(id) => self.within(p.loc, id.loc, "shorthand"),
                                PropValue::CoverInitialized { target, default } => {
                                    self.within(p.loc, target.loc, "shorthand");
                                    self.expr(p.loc, default);
                                }
                                PropValue::Get(f) | PropValue::Set(f) | PropValue::Method(f) => {
                                    self.function(p.loc, f)
                                }
                            }
                        }
                        ObjectProp::Spread(s) => {
                            self.within(loc, s.loc, "spread");
                            self.expr(s.loc, &s.argument);
                        }
                    }
                }
            }
            Expr::Paren(p) => self.expr(loc, &p.expr),
            Expr::Fn(f) | Expr::Arrow(f) => self.function(loc, f),
            Expr::Class(c) => self.class(loc, c),
            Expr::Unary(u) => self.expr(loc, &u.argument),
            Expr::Update(u) => self.expr(loc, &u.argument),
            Expr::Binary(b) => {
                self.expr(loc, &b.left);
                self.expr(loc, &b.right);
            }
            Expr::Logical(l) => {
                self.expr(loc, &l.left);
                self.expr(loc, &l.right);
            }
            Expr::Conditional(c) => {
                self.expr(loc, &c.test);
                self.expr(loc, &c.consequent);
                self.expr(loc, &c.alternate);
            }
            Expr::Assign(a) => {
                match &a.left {
                    AssignTarget::Expr(e) => self.expr(loc, e),
                    AssignTarget::Pat(p) => self.pat(loc, p),
                }
                self.expr(loc, &a.right);
            }
            Expr::Sequence(s) => self.exprs(loc, &s.expressions),
            Expr::PrivateIn(p) => {
                self.within(loc, p.name.loc, "private name");
                self.expr(loc, &p.right);
            }
            Expr::Member(m) => {
                self.expr(loc, &m.object);
                self.member_prop(loc, &m.property);
            }
            Expr::SuperMember(m) => self.member_prop(loc, &m.property),
            Expr::SuperCall(c) => self.exprs(loc, &c.arguments),
            Expr::OptionalChain(c) => self.expr(loc, &c.expression),
            Expr::OptionalMember(m) => {
                self.expr(loc, &m.object);
                self.member_prop(loc, &m.property);
            }
            Expr::Call(c) => {
                self.expr(loc, &c.callee);
                self.exprs(loc, &c.arguments);
            }
            Expr::OptionalCall(c) => {
                self.expr(loc, &c.callee);
                self.exprs(loc, &c.arguments);
            }
            Expr::New(n) => {
                self.expr(loc, &n.callee);
                self.exprs(loc, &n.arguments);
            }
            Expr::TaggedTemplate(t) => {
                self.expr(loc, &t.tag);
                self.template(loc, &t.quasi);
            }
            Expr::Spread(s) => self.expr(loc, &s.argument),
            Expr::Yield(y) => {
                if let Some(argument) = &y.argument {
                    self.expr(loc, argument);
                }
            }
            Expr::Await(a) => self.expr(loc, &a.argument),
            Expr::Import(i) => {
                self.expr(loc, &i.source);
                if let Some(options) = &i.options {
                    self.expr(loc, options);
                }
            }
            Expr::Do(d) => self.stmts(loc, &d.body),
            Expr::Throw(t) => self.expr(loc, &t.argument),
            Expr::Comprehension(c) => {
                for clause in &c.clauses {
                    match clause {
                        ComprehensionClause::For { loc: at, left, right, .. } => {
                            self.within(loc, *at, "comprehension clause");
                            self.pat(*at, left);
                            self.expr(*at, right);
                        }
                        ComprehensionClause::If { loc: at, test } => {
                            self.within(loc, *at, "comprehension clause");
                            self.expr(*at, test);
                        }
                    }
                }
                self.expr(loc, &c.body);
            }
            Expr::NativeCall(n) => {
                self.within(loc, n.name.loc, "intrinsic name");
                self.exprs(loc, &n.arguments);
            }
        }
    }

    fn pat(&self, parent: Span, pat: &Pat) {
        let loc = pat.loc();
        self.within(parent, loc, "pattern");
        match pat {
            Pat::Ident(_) => {}
            Pat::Expr(e) => self.expr(loc, e),
            Pat::Array(a) => {
                for element in a.elements.iter().flatten() {
                    self.pat(loc, element);
                }
            }
            Pat::Object(o) => {
                for prop in &o.properties {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.within(loc, kv.loc, "pattern property");
                            self.prop_key(kv.loc, &kv.key);
                            self.pat(kv.loc, &kv.value);
                        }
                        ObjectPatProp::Assign(a) => {
                            self.within(loc, a.loc, "pattern property");
                            self.within(a.loc, a.key.loc, "pattern key");
                            self.pat(a.loc, &a.target);
                            if let Some(value) = &a.value {
                                self.expr(a.loc, value);
                            }
                        }
                        ObjectPatProp::Rest(r) => {
                            self.within(loc, r.loc, "rest element");
                            self.pat(r.loc, &r.argument);
                        }
                    }
                }
            }
            Pat::Rest(r) => self.pat(loc, &r.argument),
            Pat::Assign(a) => {
                self.pat(loc, &a.left);
                self.expr(loc, &a.right);
            }
        }
    }

    fn module_decl(&self, parent: Span, decl: &ModuleDecl) {
        let loc = decl.loc();
        self.within(parent, loc, "module item");
        match decl {
            ModuleDecl::Import(i) => {
                for specifier in &i.specifiers {
                    let (at, local) = match specifier {
                        ImportSpecifier::Named(s) => {
                            self.within(s.loc, s.imported.loc(), "imported name");
                            (s.loc, s.local.loc)
                        }
                        ImportSpecifier::Default(s) => (s.loc, s.local.loc),
                        ImportSpecifier::Namespace(s) => (s.loc, s.local.loc),
                    };
                    self.within(loc, at, "import specifier");
                    self.within(at, local, "local name");
                }
                self.within(loc, i.source.loc, "module specifier");
            }
            ModuleDecl::ExportNamed(e) => {
                for specifier in &e.specifiers {
                    self.within(loc, specifier.loc, "export specifier");
                    self.within(specifier.loc, specifier.local.loc(), "local name");
                    self.within(specifier.loc, specifier.exported.loc(), "exported name");
                }
                if let Some(source) = &e.source {
                    self.within(loc, source.loc, "module specifier");
                }
                if let Some(declaration) = &e.declaration {
                    self.stmt(loc, declaration);
                }
            }
            ModuleDecl::ExportDefault(e) => match &e.declaration {
                ExportDefaultExpr::Fn(f) => self.function(loc, f),
                ExportDefaultExpr::Class(c) => self.class(loc, c),
                ExportDefaultExpr::Expr(x) => self.expr(loc, x),
            },
            ModuleDecl::ExportAll(e) => {
                if let Some(exported) = &e.exported {
                    self.within(loc, exported.loc(), "exported name");
                }
                self.within(loc, e.source.loc, "module specifier");
            }
        }
    }
}

#[test]
fn test_script_spans_nest() {
    let program = script(SPAN_SCRIPT);
    assert_eq!(program.body.len(), 14);
    SpanWalk::new(SPAN_SCRIPT).program(&program);
}

#[test]
fn test_module_spans_nest() {
    let program = module(SPAN_MODULE);
    assert_eq!(program.body.len(), 8);
    SpanWalk::new(SPAN_MODULE).program(&program);
}

#[test]
fn test_reparse_is_structurally_identical() {
    let first = format!("{:?}", script(SPAN_SCRIPT));
    let second = format!("{:?}", script(SPAN_SCRIPT));
    assert_eq!(first, second);

    let first = format!("{:?}", module(SPAN_MODULE));
    let second = format!("{:?}", module(SPAN_MODULE));
    assert_eq!(first, second);
}
