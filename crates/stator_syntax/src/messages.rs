//! Diagnostic message catalogue.
//!
//! Every error raised by the parser names a [`MessageKey`] plus a list of
//! string arguments.  The key selects an English template in which `{0}`,
//! `{1}`, … are replaced by the arguments in order.  Keeping the key separate
//! from the rendered text lets embedders localise diagnostics without parsing
//! the English message.

use serde::{Deserialize, Serialize};

/// Identifies one diagnostic message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    // ── Lexical ───────────────────────────────────────────────────────────
    UnexpectedCharacter,
    UnexpectedEndOfInput,
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedRegExp,
    UnterminatedComment,
    InvalidUnicodeEscape,
    InvalidHexEscape,
    InvalidIdentifierEscape,
    InvalidEscapedKeyword,
    InvalidNumber,
    InvalidNumericSeparator,
    IdentifierAfterNumber,
    InvalidBigInt,

    // ── Grammar ───────────────────────────────────────────────────────────
    UnexpectedToken,
    ExpectedToken,
    NestingTooDeep,
    NewlineAfterThrow,
    NewlineBeforeArrow,
    LetBracket,
    LexicalDeclarationNotAllowed,
    FunctionDeclarationNotAllowed,
    InvalidLabelledFunction,
    ForAsyncOf,
    ForAwaitNotAllowed,
    ConstWithoutInitializer,
    DestructuringWithoutInitializer,
    InvalidArrowParameters,
    UnparenthesizedUnaryExponent,
    MixedCoalesce,
    OptionalChainTemplate,
    OptionalChainNew,
    InvalidTemplateEscape,
    FeatureNotEnabled,

    // ── Identifiers and bindings ──────────────────────────────────────────
    ReservedWord,
    StrictReservedWord,
    StrictEvalArguments,
    LetLexicallyBound,
    DuplicateParameter,
    ParameterRedeclaration,
    VariableRedeclaration,
    InvalidYield,
    YieldInParameter,
    InvalidAwait,
    AwaitInParameter,
    ArgumentsNotAllowed,
    ArgumentsInFieldEval,

    // ── Strict mode ───────────────────────────────────────────────────────
    StrictWith,
    StrictDelete,
    StrictOctalLiteral,
    StrictOctalEscape,
    StrictFunctionDeclaration,
    UseStrictNonSimpleParameters,

    // ── Control flow ──────────────────────────────────────────────────────
    ReturnOutsideFunction,
    IllegalBreak,
    IllegalContinue,
    UndefinedLabel,
    DuplicateLabel,
    ContinueNonIterationLabel,

    // ── Targets and patterns ──────────────────────────────────────────────
    InvalidAssignmentTarget,
    InvalidUpdateTarget,
    InvalidDestructuringTarget,
    InvalidForInOfTarget,
    ForInOfInitializer,
    ForInOfMultipleBindings,
    CoverInitializedName,
    DuplicateProto,
    RestElementNotLast,
    RestInitializer,
    RestTrailingComma,

    // ── Functions and meta properties ─────────────────────────────────────
    GetterArity,
    SetterArity,
    InvalidSuperProperty,
    InvalidSuperCall,
    InvalidNewTarget,
    InvalidImportMeta,
    InvalidFunctionSent,

    // ── Classes ───────────────────────────────────────────────────────────
    DuplicateConstructor,
    DuplicateCallConstructor,
    InvalidConstructor,
    StaticPrototype,
    FieldNamedConstructor,
    DuplicatePrivateName,
    PrivateConstructor,
    UndeclaredPrivateName,
    DeletePrivateName,

    // ── Modules ───────────────────────────────────────────────────────────
    ModuleItemOutsideModule,
    DuplicateExport,
    UndeclaredExport,
    StringExportWithoutFrom,
    DuplicateImportAttribute,

    // ── Regular expressions ───────────────────────────────────────────────
    InvalidRegExp,
    InvalidRegExpFlags,
    RegExpTooComplex,
}

impl MessageKey {
    /// The English message template for this key.
    pub fn template(self) -> &'static str {
        use MessageKey::*;
        match self {
            UnexpectedCharacter => "unexpected character '{0}'",
            UnexpectedEndOfInput => "unexpected end of input",
            UnterminatedString => "unterminated string literal",
            UnterminatedTemplate => "unterminated template literal",
            UnterminatedRegExp => "unterminated regular expression literal",
            UnterminatedComment => "unterminated block comment",
            InvalidUnicodeEscape => "invalid Unicode escape sequence",
            InvalidHexEscape => "invalid hexadecimal escape sequence",
            InvalidIdentifierEscape => "invalid escape sequence in identifier",
            InvalidEscapedKeyword => "keyword '{0}' must not contain escaped characters",
            InvalidNumber => "invalid numeric literal",
            InvalidNumericSeparator => "numeric separators are not allowed here",
            IdentifierAfterNumber => "identifier starts immediately after numeric literal",
            InvalidBigInt => "invalid BigInt literal",

            UnexpectedToken => "unexpected token '{0}'",
            ExpectedToken => "expected '{0}' but found '{1}'",
            NestingTooDeep => "nesting too deep",
            NewlineAfterThrow => "no line break is allowed between 'throw' and its expression",
            NewlineBeforeArrow => "no line break is allowed before '=>'",
            LetBracket => "an expression statement cannot start with 'let ['",
            LexicalDeclarationNotAllowed => {
                "lexical declaration cannot appear in a single-statement context"
            }
            FunctionDeclarationNotAllowed => {
                "{0} declarations cannot appear in a single-statement context"
            }
            InvalidLabelledFunction => "functions cannot be labelled here",
            ForAsyncOf => "the left-hand side of a for-of loop may not be 'async'",
            ForAwaitNotAllowed => "for await is only valid in async functions and modules",
            ConstWithoutInitializer => "missing initializer in const declaration",
            DestructuringWithoutInitializer => "missing initializer in destructuring declaration",
            InvalidArrowParameters => "invalid arrow function parameters",
            UnparenthesizedUnaryExponent => {
                "unary operator used immediately before '**'; parentheses are required"
            }
            MixedCoalesce => "cannot mix '??' with '&&' or '||' without parentheses",
            OptionalChainTemplate => "tagged template cannot be used in an optional chain",
            OptionalChainNew => "invalid optional chain from new expression",
            InvalidTemplateEscape => "invalid escape sequence in template literal",
            FeatureNotEnabled => "'{0}' syntax is not enabled",

            ReservedWord => "'{0}' is a reserved word",
            StrictReservedWord => "'{0}' is a reserved word in strict mode",
            StrictEvalArguments => "'{0}' cannot be bound or assigned in strict mode",
            LetLexicallyBound => "'let' cannot be a lexically bound name",
            DuplicateParameter => "duplicate parameter name '{0}'",
            ParameterRedeclaration => "'{0}' is declared both as a parameter and a lexical binding",
            VariableRedeclaration => "redeclaration of '{0}'",
            InvalidYield => "yield expression not allowed here",
            YieldInParameter => "yield expression not allowed in formal parameters",
            InvalidAwait => "await is only valid in async functions and the top level of modules",
            AwaitInParameter => "await expression not allowed in formal parameters",
            ArgumentsNotAllowed => {
                "'arguments' is not allowed in class field initializers or static blocks"
            }
            ArgumentsInFieldEval => "'arguments' is not allowed in eval code run by a class field",

            StrictWith => "strict mode code may not contain 'with' statements",
            StrictDelete => "cannot delete an unqualified identifier in strict mode",
            StrictOctalLiteral => "octal literals are not allowed in strict mode",
            StrictOctalEscape => "octal escape sequences are not allowed in strict mode",
            StrictFunctionDeclaration => {
                "in strict mode code, functions can only be declared at top level or inside a block"
            }
            UseStrictNonSimpleParameters => {
                "'use strict' not allowed in function with non-simple parameters"
            }

            ReturnOutsideFunction => "return statement outside of function",
            IllegalBreak => "unlabeled break must be inside a loop or switch",
            IllegalContinue => "continue must be inside a loop",
            UndefinedLabel => "undefined label '{0}'",
            DuplicateLabel => "duplicate label '{0}'",
            ContinueNonIterationLabel => "'{0}' does not label an iteration statement",

            InvalidAssignmentTarget => "invalid assignment target",
            InvalidUpdateTarget => "invalid increment/decrement operand",
            InvalidDestructuringTarget => "invalid destructuring assignment target",
            InvalidForInOfTarget => "invalid left-hand side in for-{0} loop",
            ForInOfInitializer => "for-{0} loop variable declaration may not have an initializer",
            ForInOfMultipleBindings => "only a single binding is allowed in a for-{0} loop",
            CoverInitializedName => "invalid shorthand property initializer",
            DuplicateProto => "duplicate __proto__ fields are not allowed in object literals",
            RestElementNotLast => "rest element must be the last element",
            RestInitializer => "rest element may not have a default initializer",
            RestTrailingComma => "rest element may not be followed by a trailing comma",

            GetterArity => "getter functions must have no parameters",
            SetterArity => "setter functions must have exactly one parameter",
            InvalidSuperProperty => "'super' keyword unexpected here",
            InvalidSuperCall => "'super()' is only valid in derived class constructors",
            InvalidNewTarget => "new.target expression is not allowed here",
            InvalidImportMeta => "import.meta may only appear in module code",
            InvalidFunctionSent => "function.sent is only valid in generators",

            DuplicateConstructor => "a class may only have one constructor",
            DuplicateCallConstructor => "a class may only have one call constructor",
            InvalidConstructor => "class constructor may not be {0}",
            StaticPrototype => "classes may not have a static member named 'prototype'",
            FieldNamedConstructor => "classes may not have a field named 'constructor'",
            DuplicatePrivateName => "redeclaration of private name #{0}",
            PrivateConstructor => "'#constructor' is not a valid private name",
            UndeclaredPrivateName => "private name #{0} is not defined",
            DeletePrivateName => "private fields cannot be deleted",

            ModuleItemOutsideModule => {
                "import and export declarations may only appear at the top level of a module"
            }
            DuplicateExport => "duplicate export of '{0}'",
            UndeclaredExport => "export '{0}' is not defined in module",
            StringExportWithoutFrom => "string export name '{0}' requires a 'from' clause",
            DuplicateImportAttribute => "duplicate import attribute '{0}'",

            InvalidRegExp => "invalid regular expression /{0}/: {1}",
            InvalidRegExpFlags => "invalid regular expression flags '{0}'",
            RegExpTooComplex => "regular expression is too complex",
        }
    }

    /// Renders the template with `args` substituted for its placeholders.
    ///
    /// Placeholders without a matching argument are left untouched.
    pub fn format(self, args: &[String]) -> String {
        let template = self.template();
        let mut out = String::with_capacity(template.len() + 16);
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                let arg = args.get(index)?;
                Some((arg, close))
            });
            match substituted {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
