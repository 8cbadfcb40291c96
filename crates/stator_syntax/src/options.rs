//! Parser configuration.
//!
//! [`ParseOptions`] bundles everything a caller can tune about a single parse:
//! the source name used in diagnostics, the grammar extensions that are
//! switched on, the inherited context of an `eval` splice, and the explicit
//! recursion ceilings.  The struct is `serde`-serialisable so embedders can
//! load it from a JSON configuration file.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Independently switchable grammar extensions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Features: u32 {
        /// Public and private instance/static class fields.
        const CLASS_FIELDS          = 1 << 0;
        /// Private methods and accessors (`#m() {}`).
        const PRIVATE_METHODS       = 1 << 1;
        /// `static { … }` blocks in class bodies.
        const STATIC_BLOCKS         = 1 << 2;
        /// `1_000_000`.
        const NUMERIC_SEPARATORS    = 1 << 3;
        /// `123n`.
        const BIGINT                = 1 << 4;
        /// `try {} catch {}`.
        const OPTIONAL_CATCH        = 1 << 5;
        /// `import(specifier)`.
        const DYNAMIC_IMPORT        = 1 << 6;
        /// `import.meta`.
        const IMPORT_META           = 1 << 7;
        /// `await` at the top level of modules.
        const TOP_LEVEL_AWAIT       = 1 << 8;
        /// `#x in obj`.
        const PRIVATE_IN            = 1 << 9;
        /// Annex B web-compatibility grammar.
        const ANNEX_B               = 1 << 10;
        /// `@decorator` before classes and class members.
        const DECORATORS            = 1 << 16;
        /// `do { … }` in expression position.
        const DO_EXPRESSIONS        = 1 << 17;
        /// `throw expr` in expression position.
        const THROW_EXPRESSIONS     = 1 << 18;
        /// `[for (x of xs) x]` and `(for (x of xs) x)`.
        const COMPREHENSIONS        = 1 << 19;
        /// `call constructor() {}` in class bodies.
        const CALL_CONSTRUCTORS     = 1 << 20;
        /// `%Name(args)` engine intrinsics.
        const NATIVE_CALLS          = 1 << 21;
        /// `function.sent` inside generators.
        const FUNCTION_SENT         = 1 << 22;
    }
}

impl Features {
    /// The finished-proposal feature set enabled by default.
    pub fn standard() -> Self {
        Features::CLASS_FIELDS
            | Features::PRIVATE_METHODS
            | Features::STATIC_BLOCKS
            | Features::NUMERIC_SEPARATORS
            | Features::BIGINT
            | Features::OPTIONAL_CATCH
            | Features::DYNAMIC_IMPORT
            | Features::IMPORT_META
            | Features::TOP_LEVEL_AWAIT
            | Features::PRIVATE_IN
            | Features::ANNEX_B
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::standard()
    }
}

bitflags! {
    /// Context inherited by code parsed as the body of an `eval` call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EvalFlags: u32 {
        /// The calling code is strict.
        const STRICT               = 1 << 0;
        /// The eval is a direct call.  Without it the code only sees the
        /// global scope and the `ENCLOSING_*` and `*_CODE` flags are ignored.
        const DIRECT               = 1 << 1;
        /// The eval happens inside function code.
        const FUNCTION_CODE        = 1 << 2;
        /// `new.target` is available to the caller.
        const NEW_TARGET           = 1 << 3;
        /// `super()` is available to the caller.
        const SUPER_CALL           = 1 << 4;
        /// `super.x` is available to the caller.
        const SUPER_PROPERTY       = 1 << 5;
        /// A `with` statement encloses the call site.
        const ENCLOSING_WITH       = 1 << 6;
        /// A `catch` clause encloses the call site.
        const ENCLOSING_CATCH      = 1 << 7;
        /// A lexical declaration scope encloses the call site.
        const ENCLOSING_LEXICAL    = 1 << 8;
        /// `arguments` is forbidden (class field initializer).
        const ARGUMENTS_RESTRICTED = 1 << 9;
        /// The eval runs in global code.
        const GLOBAL_CODE          = 1 << 10;
    }
}

impl EvalFlags {
    /// Whether a name the eval code leaves unbound may still bind to a
    /// local of the calling code.  Only global code with no enclosing
    /// `catch`, `with` or lexical scope has nothing but globals around it.
    pub fn caller_scope_is_dynamic(self) -> bool {
        self.contains(EvalFlags::DIRECT)
            && (self.intersects(
                EvalFlags::FUNCTION_CODE
                    | EvalFlags::ENCLOSING_WITH
                    | EvalFlags::ENCLOSING_CATCH
                    | EvalFlags::ENCLOSING_LEXICAL,
            ) || !self.contains(EvalFlags::GLOBAL_CODE))
    }
}

/// Inherited context for code parsed inside an `eval` splice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalContext {
    /// Inherited capability flags.
    pub flags: EvalFlags,
    /// Private names visible at the call site (without the leading `#`).
    #[serde(default)]
    pub private_names: Vec<String>,
}

impl EvalContext {
    pub fn new(flags: EvalFlags) -> Self {
        Self {
            flags,
            private_names: Vec::new(),
        }
    }

    pub fn with_private_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.private_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Name reported in diagnostics.
    pub source_name: String,
    /// Line number of the first source line.
    pub start_line: u32,
    /// Enabled grammar extensions.
    pub features: Features,
    /// Present when parsing `eval` code.
    pub eval: Option<EvalContext>,
    /// Ceiling on grammar recursion before a "nesting too deep" error.
    pub max_nesting_depth: u32,
    /// Ceiling on regular-expression group/class nesting.
    pub regexp_max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: "<anonymous>".to_string(),
            start_line: 1,
            features: Features::standard(),
            eval: None,
            max_nesting_depth: 256,
            regexp_max_depth: 256,
        }
    }
}

impl ParseOptions {
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_eval(mut self, eval: EvalContext) -> Self {
        self.eval = Some(eval);
        self
    }

    /// Returns `true` if `feature` is fully enabled.
    pub fn has(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }

    pub(crate) fn eval_flags(&self) -> EvalFlags {
        self.eval.as_ref().map(|e| e.flags).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ParseOptions::default();
        assert_eq!(opts.source_name, "<anonymous>");
        assert_eq!(opts.start_line, 1);
        assert!(opts.has(Features::CLASS_FIELDS));
        assert!(opts.has(Features::ANNEX_B));
        assert!(!opts.has(Features::DECORATORS));
        assert!(!opts.has(Features::DO_EXPRESSIONS));
        assert!(opts.eval.is_none());
    }

    #[test]
    fn test_standard_excludes_staged_features() {
        let staged = Features::DECORATORS
            | Features::DO_EXPRESSIONS
            | Features::THROW_EXPRESSIONS
            | Features::COMPREHENSIONS
            | Features::CALL_CONSTRUCTORS
            | Features::NATIVE_CALLS
            | Features::FUNCTION_SENT;
        assert!(!Features::standard().intersects(staged));
    }

    #[test]
    fn test_options_from_json_uses_defaults_for_missing_fields() {
        let opts: ParseOptions =
            serde_json::from_str(r#"{ "source_name": "app.js", "max_nesting_depth": 32 }"#)
                .unwrap();
        assert_eq!(opts.source_name, "app.js");
        assert_eq!(opts.max_nesting_depth, 32);
        assert_eq!(opts.regexp_max_depth, 256);
        assert_eq!(opts.features, Features::standard());
    }

    #[test]
    fn test_eval_context_builder() {
        let eval = EvalContext::new(EvalFlags::STRICT | EvalFlags::DIRECT)
            .with_private_names(["x", "y"]);
        let opts = ParseOptions::default().with_eval(eval);
        assert!(opts.eval_flags().contains(EvalFlags::STRICT));
        assert_eq!(opts.eval.unwrap().private_names, vec!["x", "y"]);
    }

    #[test]
    fn test_caller_scope_is_dynamic() {
        let global = EvalFlags::DIRECT | EvalFlags::GLOBAL_CODE;
        assert!(!global.caller_scope_is_dynamic());
        assert!((global | EvalFlags::ENCLOSING_CATCH).caller_scope_is_dynamic());
        assert!((global | EvalFlags::ENCLOSING_LEXICAL).caller_scope_is_dynamic());
        assert!((global | EvalFlags::ENCLOSING_WITH).caller_scope_is_dynamic());
        assert!((EvalFlags::DIRECT | EvalFlags::FUNCTION_CODE).caller_scope_is_dynamic());
        assert!(EvalFlags::DIRECT.caller_scope_is_dynamic());

        // Indirect eval runs in the global scope whatever surrounds the call.
        let indirect = EvalFlags::FUNCTION_CODE | EvalFlags::ENCLOSING_LEXICAL;
        assert!(!indirect.caller_scope_is_dynamic());
        assert!(!EvalFlags::empty().caller_scope_is_dynamic());
    }
}
