//! Tokenizer for ECMAScript source text.
//!
//! The scanner never guesses at context-sensitive token shapes.  A `/` is
//! always produced as [`TokenKind::Slash`] (or `/=`), a `}` is always
//! [`TokenKind::RightBrace`], and `#` is [`TokenKind::Hash`].  When the
//! grammar knows better, the parser asks the scanner to re-read the current
//! token through [`Scanner::read_regular_expression`],
//! [`Scanner::read_template_continuation`] or [`Scanner::read_private_name`].

use bitflags::bitflags;

use crate::error::{ParseResult, ParserError};
use crate::messages::MessageKey;
use crate::options::{Features, ParseOptions};

/// A point in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset into the source text.
    pub offset: usize,
    /// 1-based line; `\r\n` counts as one terminator.
    pub line: u32,
    /// 1-based column in Unicode scalar values, not bytes.
    pub column: u32,
}

/// Region of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First position covered.
    pub start: Position,
    /// Position just past the region; exclusive.
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `other` lies entirely within `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }
}

/// Token categories.  Punctuators and reserved words are spelled out by
/// [`TokenKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Decimal, hex, binary, octal, legacy octal or BigInt numeric literal.
    NumericLiteral,
    StringLiteral,
    /// `` `text` `` with no `${`.
    NoSubstitutionTemplate,
    /// From the opening backtick up to the first `${`.
    TemplateHead,
    /// Between a `}` closing a substitution and the next `${`.
    TemplateMiddle,
    /// From the last `}` to the closing backtick.
    TemplateTail,
    /// Only produced by [`Scanner::read_regular_expression`].
    RegExpLiteral,

    // Identifiers
    /// Includes contextual words such as `async`, `of` and `get`.
    Identifier,
    /// A private identifier `#name`.
    PrivateIdentifier,
    /// A reserved word spelled with Unicode escapes, e.g. `var`.
    EscapedKeyword,

    // Reserved words
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Static,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,

    // Punctuators
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DotDotDot,
    Semicolon,
    Comma,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    BangEqual,
    EqualEqualEqual,
    BangEqualEqual,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,
    Ampersand,
    Pipe,
    Caret,
    Bang,
    Tilde,
    AmpersandAmpersand,
    PipePipe,
    QuestionQuestion,
    Question,
    Colon,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    StarStarEqual,
    SlashEqual,
    PercentEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    GreaterGreaterGreaterEqual,
    AmpersandEqual,
    PipeEqual,
    CaretEqual,
    AmpersandAmpersandEqual,
    PipePipeEqual,
    QuestionQuestionEqual,
    Arrow,
    QuestionDot,
    /// `#` (re-read as a private name by the parser)
    Hash,
    At,

    Eof,
}

impl TokenKind {
    /// Source spelling of punctuators and reserved words.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            NumericLiteral => "number",
            StringLiteral => "string",
            NoSubstitutionTemplate | TemplateHead | TemplateMiddle | TemplateTail => "template",
            RegExpLiteral => "regular expression",
            Identifier | EscapedKeyword => "identifier",
            PrivateIdentifier => "private name",
            Await => "await",
            Break => "break",
            Case => "case",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Debugger => "debugger",
            Default => "default",
            Delete => "delete",
            Do => "do",
            Else => "else",
            Enum => "enum",
            Export => "export",
            Extends => "extends",
            False => "false",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            Import => "import",
            In => "in",
            Instanceof => "instanceof",
            Let => "let",
            New => "new",
            Null => "null",
            Return => "return",
            Static => "static",
            Super => "super",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Typeof => "typeof",
            Var => "var",
            Void => "void",
            While => "while",
            With => "with",
            Yield => "yield",
            LeftBrace => "{",
            RightBrace => "}",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            Dot => ".",
            DotDotDot => "...",
            Semicolon => ";",
            Comma => ",",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            EqualEqual => "==",
            BangEqual => "!=",
            EqualEqualEqual => "===",
            BangEqualEqual => "!==",
            Plus => "+",
            Minus => "-",
            Star => "*",
            StarStar => "**",
            Slash => "/",
            Percent => "%",
            PlusPlus => "++",
            MinusMinus => "--",
            LessLess => "<<",
            GreaterGreater => ">>",
            GreaterGreaterGreater => ">>>",
            Ampersand => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            AmpersandAmpersand => "&&",
            PipePipe => "||",
            QuestionQuestion => "??",
            Question => "?",
            Colon => ":",
            Equal => "=",
            PlusEqual => "+=",
            MinusEqual => "-=",
            StarEqual => "*=",
            StarStarEqual => "**=",
            SlashEqual => "/=",
            PercentEqual => "%=",
            LessLessEqual => "<<=",
            GreaterGreaterEqual => ">>=",
            GreaterGreaterGreaterEqual => ">>>=",
            AmpersandEqual => "&=",
            PipeEqual => "|=",
            CaretEqual => "^=",
            AmpersandAmpersandEqual => "&&=",
            PipePipeEqual => "||=",
            QuestionQuestionEqual => "??=",
            Arrow => "=>",
            QuestionDot => "?.",
            Hash => "#",
            At => "@",
            Eof => "end of input",
        }
    }

    /// Returns `true` for every reserved-word kind, including the contextual
    /// `let`, `static`, `yield` and `await`.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Await
                | Break
                | Case
                | Catch
                | Class
                | Const
                | Continue
                | Debugger
                | Default
                | Delete
                | Do
                | Else
                | Enum
                | Export
                | Extends
                | False
                | Finally
                | For
                | Function
                | If
                | Import
                | In
                | Instanceof
                | Let
                | New
                | Null
                | Return
                | Static
                | Super
                | Switch
                | This
                | Throw
                | True
                | Try
                | Typeof
                | Var
                | Void
                | While
                | With
                | Yield
        )
    }

    /// Returns `true` for tokens that may name a property (`IdentifierName`).
    pub fn is_identifier_name(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::EscapedKeyword) || self.is_keyword()
    }

    /// Returns `true` for `=` and every compound assignment operator.
    pub fn is_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | StarStarEqual
                | SlashEqual
                | PercentEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
                | AmpersandEqual
                | PipeEqual
                | CaretEqual
                | AmpersandAmpersandEqual
                | PipePipeEqual
                | QuestionQuestionEqual
        )
    }
}

// TokenValue / Token

bitflags! {
    /// Lexical facts about a token that later grammar checks depend on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TokenFlags: u8 {
        /// The identifier or keyword contained a `\u` escape.
        const ESCAPED       = 1 << 0;
        /// Legacy octal (`017`) or leading-zero decimal (`08`) literal.
        const LEGACY_OCTAL  = 1 << 1;
        /// String contained a legacy octal escape (`\01`) or `\8` / `\9`.
        const OCTAL_ESCAPE  = 1 << 2;
    }
}

/// Decoded payload of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No semantic value (punctuators, EOF, …).
    None,
    /// Decoded text of identifiers, keywords, private names and strings.
    Str(String),
    /// Numeric value of a [`TokenKind::NumericLiteral`].
    Number(f64),
    /// Digits of a BigInt literal, radix prefix kept, separators and `n` removed.
    BigInt(String),
    /// Template span; `cooked` is `None` when it contains an invalid escape.
    Template { cooked: Option<String>, raw: String },
    /// Regular-expression body and flags.
    RegExp { pattern: String, flags: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
    /// Escape / legacy-literal facts.
    pub flags: TokenFlags,
    /// A line break separates this token from the previous one.  Drives
    /// automatic semicolon insertion and the no-line-break restrictions.
    pub had_line_terminator_before: bool,
}

impl Token {
    fn placeholder(at: Position) -> Self {
        Token {
            kind: TokenKind::Eof,
            value: TokenValue::None,
            span: Span::new(at, at),
            flags: TokenFlags::empty(),
            had_line_terminator_before: false,
        }
    }

    /// Decoded text for identifier-like and string tokens, `""` otherwise.
    pub fn text(&self) -> &str {
        match &self.value {
            TokenValue::Str(s) => s,
            _ => "",
        }
    }

    pub fn is_escaped(&self) -> bool {
        self.flags.contains(TokenFlags::ESCAPED)
    }

    /// Returns `true` if this is the unescaped contextual keyword `word`
    /// (`async`, `of`, `get`, …), which the scanner produces as identifiers.
    pub fn is_contextual(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && !self.is_escaped() && self.text() == word
    }
}

pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace other than line terminators.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'                      // CHARACTER TABULATION
        | '\x0B'                  // LINE TABULATION
        | '\x0C'                  // FORM FEED
        | ' '                     // SPACE
        | '\u{00A0}'              // NO-BREAK SPACE
        | '\u{FEFF}'              // ZERO WIDTH NO-BREAK SPACE (BOM)
        | '\u{1680}'              // OGHAM SPACE MARK
        | '\u{2000}'
            ..='\u{200A}' // EN QUAD … HAIR SPACE
        | '\u{202F}'              // NARROW NO-BREAK SPACE
        | '\u{205F}'              // MEDIUM MATHEMATICAL SPACE
        | '\u{3000}' // IDEOGRAPHIC SPACE
    )
}

pub(crate) fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

/// ZWNJ and ZWJ may continue, but never start, a name.
pub(crate) fn is_id_continue(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || unicode_ident::is_xid_continue(c)
}

/// Map an identifier string to a reserved-word [`TokenKind`], or return
/// `None` for plain identifiers.
pub(crate) fn keyword_kind(s: &str) -> Option<TokenKind> {
    let kind = match s {
        "await" => TokenKind::Await,
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "debugger" => TokenKind::Debugger,
        "default" => TokenKind::Default,
        "delete" => TokenKind::Delete,
        "do" => TokenKind::Do,
        "else" => TokenKind::Else,
        "enum" => TokenKind::Enum,
        "export" => TokenKind::Export,
        "extends" => TokenKind::Extends,
        "false" => TokenKind::False,
        "finally" => TokenKind::Finally,
        "for" => TokenKind::For,
        "function" => TokenKind::Function,
        "if" => TokenKind::If,
        "import" => TokenKind::Import,
        "in" => TokenKind::In,
        "instanceof" => TokenKind::Instanceof,
        "let" => TokenKind::Let,
        "new" => TokenKind::New,
        "null" => TokenKind::Null,
        "return" => TokenKind::Return,
        "static" => TokenKind::Static,
        "super" => TokenKind::Super,
        "switch" => TokenKind::Switch,
        "this" => TokenKind::This,
        "throw" => TokenKind::Throw,
        "true" => TokenKind::True,
        "try" => TokenKind::Try,
        "typeof" => TokenKind::Typeof,
        "var" => TokenKind::Var,
        "void" => TokenKind::Void,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        "yield" => TokenKind::Yield,
        _ => return None,
    };
    Some(kind)
}

/// Punctuators, longest spelling first so a prefix scan finds the maximal munch.
const PUNCTUATORS: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::GreaterGreaterGreaterEqual),
    ("...", TokenKind::DotDotDot),
    ("===", TokenKind::EqualEqualEqual),
    ("!==", TokenKind::BangEqualEqual),
    ("**=", TokenKind::StarStarEqual),
    ("<<=", TokenKind::LessLessEqual),
    (">>=", TokenKind::GreaterGreaterEqual),
    (">>>", TokenKind::GreaterGreaterGreater),
    ("&&=", TokenKind::AmpersandAmpersandEqual),
    ("||=", TokenKind::PipePipeEqual),
    ("??=", TokenKind::QuestionQuestionEqual),
    ("=>", TokenKind::Arrow),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("**", TokenKind::StarStar),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("<<", TokenKind::LessLess),
    (">>", TokenKind::GreaterGreater),
    ("&&", TokenKind::AmpersandAmpersand),
    ("||", TokenKind::PipePipe),
    ("??", TokenKind::QuestionQuestion),
    ("?.", TokenKind::QuestionDot),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::StarEqual),
    ("/=", TokenKind::SlashEqual),
    ("%=", TokenKind::PercentEqual),
    ("&=", TokenKind::AmpersandEqual),
    ("|=", TokenKind::PipeEqual),
    ("^=", TokenKind::CaretEqual),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    (".", TokenKind::Dot),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("=", TokenKind::Equal),
    ("#", TokenKind::Hash),
    ("@", TokenKind::At),
];

/// Result of decoding one escape sequence in a string or template.
enum Escape {
    Char(char),
    /// Line continuation: contributes nothing to the value.
    Nothing,
    Invalid(MessageKey),
}

/// Saved lexer state for speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerCheckpoint {
    position: Position,
    prev_end: Position,
    current: Token,
    peeked: Option<Token>,
}

impl ScannerCheckpoint {
    /// Start offset of the token that was current when the checkpoint was
    /// taken.
    pub fn offset(&self) -> usize {
        self.current.span.start.offset
    }
}

/// Context-free tokenizer with re-lexing hooks for the parser.
///
/// The scanner holds one *current* token and memoizes at most one token of
/// lookahead.  Call [`Scanner::advance`] to step forward.
///
/// ```
/// use stator_syntax::parser::scanner::{Scanner, TokenKind};
/// use stator_syntax::ParseOptions;
///
/// let mut sc = Scanner::new("let x = 42;", &ParseOptions::default(), false);
/// sc.advance().unwrap();
/// assert_eq!(sc.current().kind, TokenKind::Let);
/// ```
pub struct Scanner<'src> {
    source: &'src str,
    /// Name used when reporting errors.
    source_name: String,
    features: Features,
    /// HTML-like comments are recognised (scripts with Annex B only).
    html_comments: bool,
    /// Position just past the last scanned token.
    pos: Position,
    /// End of the token that preceded `current`.
    prev_end: Position,
    current: Token,
    peeked: Option<Token>,
    /// Reported position of every token when scanning generated text.
    pinned: Option<Position>,
}

impl<'src> Scanner<'src> {
    /// Create a scanner positioned before the first token.
    pub fn new(source: &'src str, options: &ParseOptions, module: bool) -> Self {
        let start = Position {
            offset: 0,
            line: options.start_line.max(1),
            column: 1,
        };
        Self {
            source,
            source_name: options.source_name.clone(),
            features: options.features,
            html_comments: options.features.contains(Features::ANNEX_B) && !module,
            pos: start,
            prev_end: start,
            current: Token::placeholder(start),
            peeked: None,
            pinned: None,
        }
    }

    /// Scanner over text the parser generated itself.  Every token reports
    /// the zero-width position `at` of the real source, so nodes built from
    /// the text stay inside the construct that asked for it.
    pub fn synthetic(
        source: &'src str,
        options: &ParseOptions,
        module: bool,
        at: Position,
    ) -> Self {
        let mut scanner = Self::new(source, options, module);
        scanner.pinned = Some(at);
        scanner.prev_end = at;
        scanner.current = Token::placeholder(at);
        scanner
    }

    /// The complete source text.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The source text covered by `span`.
    pub fn slice(&self, span: Span) -> &'src str {
        self.source
            .get(span.start.offset..span.end.offset)
            .unwrap_or_default()
    }

    /// Spelling of `tok` used in diagnostics.
    pub fn token_text(&self, tok: &Token) -> String {
        match tok.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::PrivateIdentifier => format!("#{}", tok.text()),
            _ => self.slice(tok.span).to_string(),
        }
    }

    /// The token the parser is looking at.
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// End position of the token before [`Scanner::current`].
    pub fn prev_end(&self) -> Position {
        self.prev_end
    }

    /// One-token lookahead, memoized until the current token is consumed.
    pub fn peek(&mut self) -> ParseResult<&Token> {
        if self.peeked.is_none() {
            let tok = self.scan_token()?;
            self.peeked = Some(tok);
        }
        match &self.peeked {
            Some(tok) => Ok(tok),
            None => Ok(&self.current),
        }
    }

    /// Step to the next token.
    pub fn advance(&mut self) -> ParseResult<()> {
        let next = match self.peeked.take() {
            Some(tok) => tok,
            None => self.scan_token()?,
        };
        self.prev_end = self.current.span.end;
        self.current = next;
        Ok(())
    }

    /// Record the lexer state so it can later be restored by [`Scanner::reset`].
    pub fn checkpoint(&self) -> ScannerCheckpoint {
        ScannerCheckpoint {
            position: self.pos,
            prev_end: self.prev_end,
            current: self.current.clone(),
            peeked: self.peeked.clone(),
        }
    }

    /// Rewind to a state captured by [`Scanner::checkpoint`].
    pub fn reset(&mut self, checkpoint: ScannerCheckpoint) {
        self.pos = checkpoint.position;
        self.prev_end = checkpoint.prev_end;
        self.current = checkpoint.current;
        self.peeked = checkpoint.peeked;
    }

    // Errors

    fn error(&self, at: Position, key: MessageKey, args: Vec<String>) -> ParserError {
        ParserError::syntax(&self.source_name, at.line, at.column, key, args)
    }

    fn eof_error(&self, at: Position, key: MessageKey) -> ParserError {
        ParserError::premature_eof(&self.source_name, at.line, at.column, key)
    }

    /// A malformed escape is a premature end of input when the source ran
    /// out inside it.
    fn escape_error(&self, at: Position, key: MessageKey) -> ParserError {
        if self.peek_char().is_none() {
            self.eof_error(at, key)
        } else {
            self.error(at, key, vec![])
        }
    }

    // Low-level character helpers

    fn rest(&self) -> &'src str {
        self.source.get(self.pos.offset..).unwrap_or_default()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char2(&self) -> Option<char> {
        let mut it = self.rest().chars();
        it.next();
        it.next()
    }

    /// Consumes one character.  A `\r\n` pair is consumed whole and counts
    /// as one line break.
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos.offset += ch.len_utf8();
        match ch {
            '\r' => {
                if self.rest().starts_with('\n') {
                    self.pos.offset += 1;
                }
                self.pos.line += 1;
                self.pos.column = 1;
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.pos.line += 1;
                self.pos.column = 1;
            }
            _ => {
                self.pos.column += 1;
            }
        }
        Some(ch)
    }

    fn token(&self, kind: TokenKind, value: TokenValue, start: Position) -> Token {
        Token {
            kind,
            value,
            span: Span::new(start, self.pos),
            flags: TokenFlags::empty(),
            had_line_terminator_before: false,
        }
    }

    // Whitespace and comments

    /// Consume whitespace and comments; returns `true` if a line terminator
    /// was crossed.
    fn skip_trivia(&mut self) -> ParseResult<bool> {
        let mut had_lt = false;
        let mut line_start = self.pos.offset == 0;
        if self.pos.offset == 0 && self.rest().starts_with("#!") {
            self.skip_line_comment();
        }
        loop {
            match self.peek_char() {
                Some(c) if is_line_terminator(c) => {
                    had_lt = true;
                    line_start = true;
                    self.bump();
                }
                Some(c) if is_js_whitespace(c) => {
                    self.bump();
                }
                Some('/') => match self.peek_char2() {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => {
                        if self.skip_block_comment()? {
                            had_lt = true;
                            line_start = true;
                        }
                    }
                    _ => break,
                },
                Some('<') if self.html_comments && self.rest().starts_with("<!--") => {
                    self.skip_line_comment();
                }
                Some('-') if self.html_comments && line_start && self.rest().starts_with("-->") => {
                    self.skip_line_comment();
                }
                _ => break,
            }
        }
        Ok(had_lt)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek_char() {
            if is_line_terminator(c) {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> ParseResult<bool> {
        let start = self.pos;
        self.bump();
        self.bump();
        let mut had_lt = false;
        loop {
            match self.bump() {
                None => return Err(self.eof_error(start, MessageKey::UnterminatedComment)),
                Some('*') if self.peek_char() == Some('/') => {
                    self.bump();
                    return Ok(had_lt);
                }
                Some(c) if is_line_terminator(c) => had_lt = true,
                Some(_) => {}
            }
        }
    }

    // Main dispatch

    fn scan_token(&mut self) -> ParseResult<Token> {
        let had_lt = self.skip_trivia()?;
        let start = self.pos;
        let mut tok = match self.peek_char() {
            None => self.token(TokenKind::Eof, TokenValue::None, start),
            Some(q @ ('"' | '\'')) => self.scan_string(q, start)?,
            Some('`') => {
                self.bump();
                self.scan_template_span(start, true)?
            }
            Some('0'..='9') => self.scan_numeric(start)?,
            Some('.') if matches!(self.peek_char2(), Some('0'..='9')) => self.scan_numeric(start)?,
            Some(c) if is_id_start(c) || c == '\\' => self.scan_identifier(start)?,
            Some(c) => self.scan_punctuator(c, start)?,
        };
        tok.had_line_terminator_before = had_lt;
        if let Some(at) = self.pinned {
            tok.span = Span::new(at, at);
        }
        Ok(tok)
    }

    fn scan_punctuator(&mut self, c: char, start: Position) -> ParseResult<Token> {
        let rest = self.rest();
        for &(text, kind) in PUNCTUATORS {
            if !rest.starts_with(text) {
                continue;
            }
            // `a?.5:b` is a conditional, not an optional chain.
            if kind == TokenKind::QuestionDot
                && rest[2..].starts_with(|d: char| d.is_ascii_digit())
            {
                continue;
            }
            for _ in 0..text.len() {
                self.bump();
            }
            return Ok(self.token(kind, TokenValue::None, start));
        }
        Err(self.error(start, MessageKey::UnexpectedCharacter, vec![c.to_string()]))
    }

    // Escapes

    /// Read `count` hex digits, or return `None` leaving the bad digit unread.
    fn read_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let d = self.peek_char()?.to_digit(16)?;
            self.bump();
            value = value * 16 + d;
        }
        Some(value)
    }

    /// Read the body of a `\u` escape after the `u`: `XXXX` or `{X…}`.
    fn read_unicode_escape(&mut self) -> Option<u32> {
        if self.peek_char() != Some('{') {
            return self.read_hex_digits(4);
        }
        self.bump();
        let mut value = 0u32;
        let mut digits = 0;
        while let Some(d) = self.peek_char().and_then(|c| c.to_digit(16)) {
            self.bump();
            value = value.saturating_mul(16).saturating_add(d);
            digits += 1;
        }
        if digits == 0 || value > 0x10FFFF || self.peek_char() != Some('}') {
            return None;
        }
        self.bump();
        Some(value)
    }

    /// After a high surrogate, consume a following `\uDC00`–`\uDFFF` escape.
    fn read_low_surrogate(&mut self) -> Option<u32> {
        if !self.rest().starts_with("\\u") {
            return None;
        }
        let saved = self.pos;
        self.bump();
        self.bump();
        match self.read_unicode_escape() {
            Some(low @ 0xDC00..=0xDFFF) => Some(low),
            _ => {
                self.pos = saved;
                None
            }
        }
    }

    /// Decode one escape after its `\`.  The caller guarantees a character
    /// follows.
    fn scan_escape(&mut self, template: bool, flags: &mut TokenFlags) -> Escape {
        let Some(c) = self.bump() else {
            return Escape::Invalid(MessageKey::UnterminatedString);
        };
        match c {
            'n' => Escape::Char('\n'),
            't' => Escape::Char('\t'),
            'r' => Escape::Char('\r'),
            'b' => Escape::Char('\u{8}'),
            'f' => Escape::Char('\u{C}'),
            'v' => Escape::Char('\u{B}'),
            c if is_line_terminator(c) => Escape::Nothing,
            '0' if !matches!(self.peek_char(), Some('0'..='9')) => Escape::Char('\0'),
            '0'..='7' if template => Escape::Invalid(MessageKey::InvalidTemplateEscape),
            '0'..='7' => {
                flags.insert(TokenFlags::OCTAL_ESCAPE);
                let mut value = c as u32 - '0' as u32;
                let max_extra = if c <= '3' { 2 } else { 1 };
                for _ in 0..max_extra {
                    match self.peek_char() {
                        Some(d @ '0'..='7') => {
                            self.bump();
                            value = value * 8 + (d as u32 - '0' as u32);
                        }
                        _ => break,
                    }
                }
                Escape::Char(char::from_u32(value).unwrap_or('\u{FFFD}'))
            }
            '8' | '9' if template => Escape::Invalid(MessageKey::InvalidTemplateEscape),
            '8' | '9' => {
                flags.insert(TokenFlags::OCTAL_ESCAPE);
                Escape::Char(c)
            }
            'x' => match self.read_hex_digits(2) {
                Some(v) => Escape::Char(char::from_u32(v).unwrap_or('\u{FFFD}')),
                None => Escape::Invalid(MessageKey::InvalidHexEscape),
            },
            'u' => match self.read_unicode_escape() {
                Some(high @ 0xD800..=0xDBFF) => match self.read_low_surrogate() {
                    Some(low) => {
                        let cp = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        Escape::Char(char::from_u32(cp).unwrap_or('\u{FFFD}'))
                    }
                    None => Escape::Char('\u{FFFD}'),
                },
                Some(v) => Escape::Char(char::from_u32(v).unwrap_or('\u{FFFD}')),
                None => Escape::Invalid(MessageKey::InvalidUnicodeEscape),
            },
            other => Escape::Char(other),
        }
    }

    // String literal

    fn scan_string(&mut self, quote: char, start: Position) -> ParseResult<Token> {
        self.bump();
        let mut value = String::new();
        let mut flags = TokenFlags::empty();
        loop {
            match self.peek_char() {
                None => return Err(self.eof_error(start, MessageKey::UnterminatedString)),
                Some('\n' | '\r') => {
                    return Err(self.error(start, MessageKey::UnterminatedString, vec![]));
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    let esc_start = self.pos;
                    self.bump();
                    if self.peek_char().is_none() {
                        return Err(self.eof_error(start, MessageKey::UnterminatedString));
                    }
                    match self.scan_escape(false, &mut flags) {
                        Escape::Char(c) => value.push(c),
                        Escape::Nothing => {}
                        Escape::Invalid(key) => return Err(self.escape_error(esc_start, key)),
                    }
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
        let mut tok = self.token(TokenKind::StringLiteral, TokenValue::Str(value), start);
        tok.flags = flags;
        Ok(tok)
    }

    // Template literal

    /// Scan template characters after the opening `` ` `` (`head == true`) or
    /// after the `}` that closes a substitution.
    fn scan_template_span(&mut self, start: Position, head: bool) -> ParseResult<Token> {
        let body_start = self.pos.offset;
        let mut cooked = Some(String::new());
        let mut ignored = TokenFlags::empty();
        let (body_end, substitution) = loop {
            match self.peek_char() {
                None => return Err(self.eof_error(start, MessageKey::UnterminatedTemplate)),
                Some('`') => {
                    let end = self.pos.offset;
                    self.bump();
                    break (end, false);
                }
                Some('$') if self.peek_char2() == Some('{') => {
                    let end = self.pos.offset;
                    self.bump();
                    self.bump();
                    break (end, true);
                }
                Some('\\') => {
                    self.bump();
                    if self.peek_char().is_none() {
                        return Err(self.eof_error(start, MessageKey::UnterminatedTemplate));
                    }
                    match self.scan_escape(true, &mut ignored) {
                        Escape::Char(c) => {
                            if let Some(s) = cooked.as_mut() {
                                s.push(c);
                            }
                        }
                        Escape::Nothing => {}
                        Escape::Invalid(_) => cooked = None,
                    }
                }
                Some(c) => {
                    self.bump();
                    if let Some(s) = cooked.as_mut() {
                        // CR and CRLF are normalised to LF in both values.
                        s.push(if c == '\r' { '\n' } else { c });
                    }
                }
            }
        };
        let raw = self.source[body_start..body_end]
            .replace("\r\n", "\n")
            .replace('\r', "\n");
        let kind = match (head, substitution) {
            (true, false) => TokenKind::NoSubstitutionTemplate,
            (true, true) => TokenKind::TemplateHead,
            (false, true) => TokenKind::TemplateMiddle,
            (false, false) => TokenKind::TemplateTail,
        };
        Ok(self.token(kind, TokenValue::Template { cooked, raw }, start))
    }

    // Numeric literal

    fn separator_error(&self, at: Position) -> ParserError {
        self.error(at, MessageKey::InvalidNumericSeparator, vec![])
    }

    /// Append the digits of `radix` to `buf`, validating `_` separators.
    /// Returns the number of digits read.
    fn scan_digits_into(&mut self, buf: &mut String, radix: u32) -> ParseResult<usize> {
        let mut count = 0;
        let mut last_was_separator = false;
        loop {
            match self.peek_char() {
                Some(c) if c.is_digit(radix) => {
                    self.bump();
                    buf.push(c);
                    count += 1;
                    last_was_separator = false;
                }
                Some('_') => {
                    let at = self.pos;
                    if !self.features.contains(Features::NUMERIC_SEPARATORS)
                        || count == 0
                        || last_was_separator
                    {
                        return Err(self.separator_error(at));
                    }
                    self.bump();
                    last_was_separator = true;
                }
                _ => break,
            }
        }
        if last_was_separator {
            return Err(self.separator_error(self.pos));
        }
        Ok(count)
    }

    /// A numeric literal may not be directly followed by a digit or an
    /// identifier character.
    fn check_after_numeric(&self) -> ParseResult<()> {
        match self.peek_char() {
            Some(c) if c.is_ascii_digit() => {
                Err(self.error(self.pos, MessageKey::InvalidNumber, vec![]))
            }
            Some(c) if is_id_start(c) || c == '\\' => {
                Err(self.error(self.pos, MessageKey::IdentifierAfterNumber, vec![]))
            }
            _ => Ok(()),
        }
    }

    fn bigint_suffix(&self) -> bool {
        self.features.contains(Features::BIGINT) && self.peek_char() == Some('n')
    }

    fn scan_numeric(&mut self, start: Position) -> ParseResult<Token> {
        if self.peek_char() == Some('.') {
            return self.scan_decimal(start, String::from("0"));
        }
        if self.peek_char() != Some('0') {
            let mut digits = String::new();
            self.scan_digits_into(&mut digits, 10)?;
            return self.scan_decimal(start, digits);
        }
        self.bump();
        let radix = match self.peek_char() {
            Some('x' | 'X') => 16,
            Some('o' | 'O') => 8,
            Some('b' | 'B') => 2,
            Some('0'..='9') => return self.scan_legacy_octal(start),
            Some('_') => return Err(self.separator_error(self.pos)),
            _ => return self.scan_decimal(start, String::from("0")),
        };
        self.bump();
        let mut digits = String::new();
        if self.scan_digits_into(&mut digits, radix)? == 0 {
            if self.peek_char().is_none() {
                return Err(self.eof_error(start, MessageKey::InvalidNumber));
            }
            return Err(self.error(start, MessageKey::InvalidNumber, vec![]));
        }
        if self.bigint_suffix() {
            self.bump();
            self.check_after_numeric()?;
            let prefix = match radix {
                16 => "0x",
                8 => "0o",
                _ => "0b",
            };
            let value = TokenValue::BigInt(format!("{prefix}{digits}"));
            return Ok(self.token(TokenKind::NumericLiteral, value, start));
        }
        self.check_after_numeric()?;
        let value = digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0f64, |acc, d| acc * radix as f64 + d as f64);
        Ok(self.token(TokenKind::NumericLiteral, TokenValue::Number(value), start))
    }

    /// `0` followed by decimal digits: legacy octal (`017`) when every digit
    /// is octal, otherwise a leading-zero decimal (`089`, `08.5`).
    fn scan_legacy_octal(&mut self, start: Position) -> ParseResult<Token> {
        let mut digits = String::from("0");
        while let Some(c) = self.peek_char() {
            if c == '_' {
                return Err(self.separator_error(self.pos));
            }
            if !c.is_ascii_digit() {
                break;
            }
            self.bump();
            digits.push(c);
        }
        let mut tok = if digits.chars().all(|c| matches!(c, '0'..='7')) {
            if self.peek_char() == Some('n') {
                return Err(self.error(start, MessageKey::InvalidBigInt, vec![]));
            }
            self.check_after_numeric()?;
            let value = digits
                .chars()
                .filter_map(|c| c.to_digit(8))
                .fold(0f64, |acc, d| acc * 8.0 + d as f64);
            self.token(TokenKind::NumericLiteral, TokenValue::Number(value), start)
        } else {
            let tok = self.scan_decimal(start, digits)?;
            if matches!(tok.value, TokenValue::BigInt(_)) {
                return Err(self.error(start, MessageKey::InvalidBigInt, vec![]));
            }
            tok
        };
        tok.flags.insert(TokenFlags::LEGACY_OCTAL);
        Ok(tok)
    }

    /// Continue a decimal literal whose integer digits are already in `digits`.
    fn scan_decimal(&mut self, start: Position, mut digits: String) -> ParseResult<Token> {
        let mut is_integer = true;
        if self.peek_char() == Some('.') {
            self.bump();
            is_integer = false;
            if self.peek_char() == Some('_') {
                return Err(self.separator_error(self.pos));
            }
            let mut fraction = String::new();
            if self.scan_digits_into(&mut fraction, 10)? > 0 {
                digits.push('.');
                digits.push_str(&fraction);
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.bump();
            is_integer = false;
            digits.push('e');
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                self.bump();
                digits.push(sign);
            }
            if self.peek_char() == Some('_') {
                return Err(self.separator_error(self.pos));
            }
            if self.scan_digits_into(&mut digits, 10)? == 0 {
                if self.peek_char().is_none() {
                    return Err(self.eof_error(start, MessageKey::InvalidNumber));
                }
                return Err(self.error(start, MessageKey::InvalidNumber, vec![]));
            }
        }
        if self.bigint_suffix() {
            if !is_integer {
                return Err(self.error(start, MessageKey::InvalidBigInt, vec![]));
            }
            self.bump();
            self.check_after_numeric()?;
            return Ok(self.token(TokenKind::NumericLiteral, TokenValue::BigInt(digits), start));
        }
        self.check_after_numeric()?;
        let value: f64 = digits
            .parse()
            .map_err(|_| self.error(start, MessageKey::InvalidNumber, vec![]))?;
        Ok(self.token(TokenKind::NumericLiteral, TokenValue::Number(value), start))
    }

    // Identifier / keyword

    /// Read an identifier name, decoding `\u` escapes.  Returns the decoded
    /// text and whether any escape was present.
    fn read_identifier_name(&mut self) -> ParseResult<(String, bool)> {
        let mut text = String::new();
        let mut escaped = false;
        loop {
            let first = text.is_empty();
            match self.peek_char() {
                Some('\\') => {
                    let esc_start = self.pos;
                    self.bump();
                    if self.bump() != Some('u') {
                        return Err(self.escape_error(
                            esc_start,
                            MessageKey::InvalidIdentifierEscape,
                        ));
                    }
                    let Some(code) = self.read_unicode_escape() else {
                        return Err(self.escape_error(
                            esc_start,
                            MessageKey::InvalidIdentifierEscape,
                        ));
                    };
                    match char::from_u32(code) {
                        Some(c) if (first && is_id_start(c)) || (!first && is_id_continue(c)) => {
                            text.push(c);
                            escaped = true;
                        }
                        _ => {
                            return Err(self.error(
                                esc_start,
                                MessageKey::InvalidIdentifierEscape,
                                vec![],
                            ));
                        }
                    }
                }
                Some(c) if (first && is_id_start(c)) || (!first && is_id_continue(c)) => {
                    self.bump();
                    text.push(c);
                }
                _ => break,
            }
        }
        Ok((text, escaped))
    }

    fn scan_identifier(&mut self, start: Position) -> ParseResult<Token> {
        let (text, escaped) = self.read_identifier_name()?;
        let kind = match keyword_kind(&text) {
            // Escaped contextual keywords stay usable as identifiers.
            Some(TokenKind::Let | TokenKind::Static | TokenKind::Yield | TokenKind::Await)
                if escaped =>
            {
                TokenKind::Identifier
            }
            Some(_) if escaped => TokenKind::EscapedKeyword,
            Some(kind) => kind,
            None => TokenKind::Identifier,
        };
        let mut tok = self.token(kind, TokenValue::Str(text), start);
        if escaped {
            tok.flags.insert(TokenFlags::ESCAPED);
        }
        Ok(tok)
    }

    // Re-lexing entry points

    /// Drop any lookahead and move the read position back to `to`.
    fn rewind(&mut self, to: Position) {
        self.peeked = None;
        self.pos = to;
    }

    /// Re-read the current `/` or `/=` token as a regular-expression literal.
    pub fn read_regular_expression(&mut self) -> ParseResult<()> {
        let start = self.current.span.start;
        let had_lt = self.current.had_line_terminator_before;
        self.rewind(start);
        self.bump();
        let mut pattern = String::new();
        let mut in_class = false;
        loop {
            match self.peek_char() {
                None => return Err(self.eof_error(start, MessageKey::UnterminatedRegExp)),
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error(start, MessageKey::UnterminatedRegExp, vec![]));
                }
                Some('\\') => {
                    self.bump();
                    pattern.push('\\');
                    match self.peek_char() {
                        None => return Err(self.eof_error(start, MessageKey::UnterminatedRegExp)),
                        Some(c) if is_line_terminator(c) => {
                            return Err(self.error(start, MessageKey::UnterminatedRegExp, vec![]));
                        }
                        Some(c) => {
                            self.bump();
                            pattern.push(c);
                        }
                    }
                }
                Some('/') if !in_class => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    if c == '[' {
                        in_class = true;
                    } else if c == ']' {
                        in_class = false;
                    }
                    self.bump();
                    pattern.push(c);
                }
            }
        }
        let mut flags = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                return Err(self.error(self.pos, MessageKey::InvalidRegExpFlags, vec![flags]));
            }
            if !is_id_continue(c) {
                break;
            }
            self.bump();
            flags.push(c);
        }
        let mut tok = self.token(
            TokenKind::RegExpLiteral,
            TokenValue::RegExp { pattern, flags },
            start,
        );
        tok.had_line_terminator_before = had_lt;
        self.current = tok;
        Ok(())
    }

    /// Re-read the current `}` as the continuation of a template literal,
    /// producing [`TokenKind::TemplateMiddle`] or [`TokenKind::TemplateTail`].
    pub fn read_template_continuation(&mut self) -> ParseResult<()> {
        let start = self.current.span.start;
        let had_lt = self.current.had_line_terminator_before;
        self.rewind(self.current.span.end);
        let mut tok = self.scan_template_span(start, false)?;
        tok.had_line_terminator_before = had_lt;
        self.current = tok;
        Ok(())
    }

    /// Re-read the current `#` together with the identifier that immediately
    /// follows it as a [`TokenKind::PrivateIdentifier`].
    pub fn read_private_name(&mut self) -> ParseResult<()> {
        let start = self.current.span.start;
        let had_lt = self.current.had_line_terminator_before;
        self.rewind(self.current.span.end);
        match self.peek_char() {
            Some(c) if is_id_start(c) || c == '\\' => {}
            Some(c) => {
                return Err(self.error(
                    self.pos,
                    MessageKey::UnexpectedCharacter,
                    vec![c.to_string()],
                ));
            }
            None => return Err(self.eof_error(start, MessageKey::UnexpectedEndOfInput)),
        }
        let (text, escaped) = self.read_identifier_name()?;
        let mut tok = self.token(TokenKind::PrivateIdentifier, TokenValue::Str(text), start);
        if escaped {
            tok.flags.insert(TokenFlags::ESCAPED);
        }
        tok.had_line_terminator_before = had_lt;
        self.current = tok;
        Ok(())
    }

    /// Scan every token of `source` as a script with default options.
    ///
    /// `/` is always produced as a punctuator; this is a convenience for
    /// tests and tooling, not a substitute for parsing.
    pub fn tokenize_all(source: &'src str) -> ParseResult<Vec<Token>> {
        let mut sc = Scanner::new(source, &ParseOptions::default(), false);
        let mut tokens = Vec::new();
        loop {
            sc.advance()?;
            let done = sc.current.kind == TokenKind::Eof;
            tokens.push(sc.current.clone());
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::tokenize_all(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn tokens(src: &str) -> Vec<Token> {
        Scanner::tokenize_all(src).unwrap()
    }

    fn first(src: &str) -> Token {
        tokens(src).remove(0)
    }

    fn number(src: &str) -> f64 {
        match first(src).value {
            TokenValue::Number(n) => n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    fn scan_err(src: &str) -> ParserError {
        Scanner::tokenize_all(src).unwrap_err()
    }

    fn scanner_at(src: &str) -> Scanner<'_> {
        let mut sc = Scanner::new(src, &ParseOptions::default(), false);
        sc.advance().unwrap();
        sc
    }

    // Keywords

    #[test]
    fn test_keywords_reserved() {
        let toks = kinds("break case class const let static yield await");
        assert_eq!(
            toks,
            vec![
                TokenKind::Break,
                TokenKind::Case,
                TokenKind::Class,
                TokenKind::Const,
                TokenKind::Let,
                TokenKind::Static,
                TokenKind::Yield,
                TokenKind::Await,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_contextual_words_are_identifiers() {
        let toks = tokens("async of get set from as target meta");
        for tok in &toks[..8] {
            assert_eq!(tok.kind, TokenKind::Identifier);
        }
        assert!(toks[0].is_contextual("async"));
        assert!(toks[1].is_contextual("of"));
    }

    #[test]
    fn test_escaped_keyword() {
        let tok = first("v\\u0061r");
        assert_eq!(tok.kind, TokenKind::EscapedKeyword);
        assert_eq!(tok.text(), "var");
        assert!(tok.is_escaped());
    }

    #[test]
    fn test_escaped_contextual_keyword_is_identifier() {
        let tok = first("l\\u0065t");
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text(), "let");
        let tok = first("\\u0061sync");
        assert!(!tok.is_contextual("async"));
    }

    // Identifiers

    #[test]
    fn test_identifier_unicode() {
        let tok = first("café_$1");
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert_eq!(tok.text(), "café_$1");
    }

    #[test]
    fn test_identifier_braced_escape() {
        assert_eq!(first("\\u{61}bc").text(), "abc");
    }

    #[test]
    fn test_identifier_invalid_escape() {
        let err = scan_err("a\\u0020b");
        assert_eq!(err.key, MessageKey::InvalidIdentifierEscape);
    }

    #[test]
    fn test_identifier_escape_cut_by_eof() {
        for src in ["a\\u00", "a\\u{1", "a\\"] {
            let err = scan_err(src);
            assert_eq!(err.key, MessageKey::InvalidIdentifierEscape, "{src}");
            assert!(err.is_premature_eof(), "{src}");
        }
        // A complete escape naming a non-identifier character stays a plain error.
        assert!(!scan_err("a\\u0020").is_premature_eof());
        assert!(!scan_err("a\\u00G0").is_premature_eof());
    }

    // Numeric literals

    #[test]
    fn test_numeric_radix_forms() {
        assert_eq!(number("0x1F"), 31.0);
        assert_eq!(number("0b101"), 5.0);
        assert_eq!(number("0o17"), 15.0);
        assert_eq!(number("017"), 15.0);
    }

    #[test]
    fn test_numeric_decimal_forms() {
        assert_eq!(number("42"), 42.0);
        assert_eq!(number("3.25"), 3.25);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("1e3"), 1000.0);
        assert_eq!(number("2.5E-1"), 0.25);
        assert_eq!(number("5."), 5.0);
    }

    #[test]
    fn test_numeric_separator() {
        assert_eq!(number("1_000"), 1000.0);
        assert_eq!(number("0xFF_FF"), 65535.0);
        assert_eq!(scan_err("1__0").key, MessageKey::InvalidNumericSeparator);
        assert_eq!(scan_err("1_").key, MessageKey::InvalidNumericSeparator);
        assert_eq!(scan_err("0_1").key, MessageKey::InvalidNumericSeparator);
        assert_eq!(scan_err("1._5").key, MessageKey::InvalidNumericSeparator);
    }

    #[test]
    fn test_numeric_separator_disabled() {
        let opts = ParseOptions::default()
            .with_features(Features::standard() - Features::NUMERIC_SEPARATORS);
        let mut sc = Scanner::new("1_000", &opts, false);
        assert_eq!(
            sc.advance().unwrap_err().key,
            MessageKey::InvalidNumericSeparator
        );
    }

    #[test]
    fn test_numeric_legacy_octal_flag() {
        let tok = first("010");
        assert!(tok.flags.contains(TokenFlags::LEGACY_OCTAL));
        assert_eq!(tok.value, TokenValue::Number(8.0));
        let tok = first("089");
        assert!(tok.flags.contains(TokenFlags::LEGACY_OCTAL));
        assert_eq!(tok.value, TokenValue::Number(89.0));
    }

    #[test]
    fn test_numeric_bigint() {
        assert_eq!(first("123n").value, TokenValue::BigInt("123".into()));
        assert_eq!(first("0x1Fn").value, TokenValue::BigInt("0x1F".into()));
        assert_eq!(scan_err("1.5n").key, MessageKey::InvalidBigInt);
        assert_eq!(scan_err("017n").key, MessageKey::InvalidBigInt);
    }

    #[test]
    fn test_identifier_after_number_is_error() {
        assert_eq!(scan_err("3in x").key, MessageKey::IdentifierAfterNumber);
        assert_eq!(scan_err("0b12").key, MessageKey::InvalidNumber);
    }

    // String literals

    #[test]
    fn test_string_escape_sequences() {
        assert_eq!(first(r#""a\nb\t\x41B\u{43}""#).text(), "a\nb\tABC");
        assert_eq!(first("'it\\'s'").text(), "it's");
    }

    #[test]
    fn test_string_line_continuation() {
        assert_eq!(first("'a\\\nb'").text(), "ab");
    }

    #[test]
    fn test_string_surrogates() {
        assert_eq!(first(r#""\uD83D\uDE00""#).text(), "😀");
        assert_eq!(first(r#""\uD83D""#).text(), "\u{FFFD}");
    }

    #[test]
    fn test_string_octal_escape_flag() {
        let tok = first(r#""\101""#);
        assert_eq!(tok.text(), "A");
        assert!(tok.flags.contains(TokenFlags::OCTAL_ESCAPE));
        assert!(first(r#""\8""#).flags.contains(TokenFlags::OCTAL_ESCAPE));
        assert!(!first(r#""\0""#).flags.contains(TokenFlags::OCTAL_ESCAPE));
    }

    #[test]
    fn test_string_unterminated_is_premature_eof() {
        let err = scan_err("'abc");
        assert_eq!(err.key, MessageKey::UnterminatedString);
        assert!(err.is_premature_eof());
    }

    #[test]
    fn test_string_escape_cut_by_eof() {
        assert_eq!(scan_err(r"'\u00").key, MessageKey::InvalidUnicodeEscape);
        assert_eq!(scan_err(r"'\x").key, MessageKey::InvalidHexEscape);
        for src in [r"'\u00", r"'\x", r"'\u{1", r"'\x4"] {
            assert!(scan_err(src).is_premature_eof(), "{src}");
        }
        assert!(!scan_err(r"'\u00'").is_premature_eof());
    }

    #[test]
    fn test_string_newline_is_plain_error() {
        let err = scan_err("'abc\n'");
        assert_eq!(err.key, MessageKey::UnterminatedString);
        assert!(!err.is_premature_eof());
    }

    #[test]
    fn test_string_invalid_hex_escape() {
        assert_eq!(scan_err(r#""\xZZ""#).key, MessageKey::InvalidHexEscape);
    }

    // Template literals

    #[test]
    fn test_template_no_substitution() {
        let tok = first("`hello\\n`");
        assert_eq!(tok.kind, TokenKind::NoSubstitutionTemplate);
        assert_eq!(
            tok.value,
            TokenValue::Template {
                cooked: Some("hello\n".into()),
                raw: "hello\\n".into()
            }
        );
    }

    #[test]
    fn test_template_invalid_escape_keeps_raw() {
        let tok = first("`\\unicode`");
        assert_eq!(
            tok.value,
            TokenValue::Template {
                cooked: None,
                raw: "\\unicode".into()
            }
        );
    }

    #[test]
    fn test_template_continuation() {
        let mut sc = scanner_at("`a${x}b${y}c`");
        assert_eq!(sc.current().kind, TokenKind::TemplateHead);
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Identifier);
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::RightBrace);
        sc.read_template_continuation().unwrap();
        assert_eq!(sc.current().kind, TokenKind::TemplateMiddle);
        sc.advance().unwrap();
        sc.advance().unwrap();
        sc.read_template_continuation().unwrap();
        assert_eq!(sc.current().kind, TokenKind::TemplateTail);
        assert_eq!(
            sc.current().value,
            TokenValue::Template {
                cooked: Some("c".into()),
                raw: "c".into()
            }
        );
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Eof);
    }

    #[test]
    fn test_template_crlf_normalised() {
        let tok = first("`a\r\nb`");
        assert_eq!(
            tok.value,
            TokenValue::Template {
                cooked: Some("a\nb".into()),
                raw: "a\nb".into()
            }
        );
    }

    #[test]
    fn test_template_unterminated() {
        let err = scan_err("`abc");
        assert_eq!(err.key, MessageKey::UnterminatedTemplate);
        assert!(err.is_premature_eof());
    }

    // Regular expressions

    #[test]
    fn test_slash_is_punctuator_until_relexed() {
        assert_eq!(kinds("a / b")[1], TokenKind::Slash);
        let mut sc = scanner_at("/ab+c/gi;");
        assert_eq!(sc.current().kind, TokenKind::Slash);
        sc.read_regular_expression().unwrap();
        assert_eq!(sc.current().kind, TokenKind::RegExpLiteral);
        assert_eq!(
            sc.current().value,
            TokenValue::RegExp {
                pattern: "ab+c".into(),
                flags: "gi".into()
            }
        );
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_regexp_class_may_contain_slash() {
        let mut sc = scanner_at("/[/]/");
        sc.read_regular_expression().unwrap();
        assert_eq!(
            sc.current().value,
            TokenValue::RegExp {
                pattern: "[/]".into(),
                flags: "".into()
            }
        );
    }

    #[test]
    fn test_regexp_relex_after_peek() {
        let mut sc = scanner_at("/=a/");
        assert_eq!(sc.current().kind, TokenKind::SlashEqual);
        assert_eq!(sc.peek().unwrap().kind, TokenKind::Identifier);
        sc.read_regular_expression().unwrap();
        assert_eq!(sc.current().kind, TokenKind::RegExpLiteral);
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Eof);
    }

    #[test]
    fn test_regexp_unterminated_class_reports_literal_position() {
        let mut sc = scanner_at("x = /[/;");
        sc.advance().unwrap();
        sc.advance().unwrap();
        let err = sc.read_regular_expression().unwrap_err();
        assert_eq!(err.key, MessageKey::UnterminatedRegExp);
        assert!(err.is_premature_eof());
        assert_eq!((err.line, err.column), (1, 5));
    }

    // Private names

    #[test]
    fn test_private_name_relex() {
        let mut sc = scanner_at("#field = 1");
        assert_eq!(sc.current().kind, TokenKind::Hash);
        sc.read_private_name().unwrap();
        assert_eq!(sc.current().kind, TokenKind::PrivateIdentifier);
        assert_eq!(sc.current().text(), "field");
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Equal);
    }

    #[test]
    fn test_private_name_requires_adjacent_identifier() {
        let mut sc = scanner_at("# x");
        assert!(sc.read_private_name().is_err());
    }

    // Comments

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n/* block */ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_block_comment_with_line_terminator_sets_flag() {
        let toks = tokens("a /* x\n */ b");
        assert!(toks[1].had_line_terminator_before);
    }

    #[test]
    fn test_html_comments_in_script() {
        assert_eq!(
            kinds("a <!-- hidden\n--> also hidden\nb"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_html_comments_not_in_module() {
        let mut sc = Scanner::new("a <!-- b", &ParseOptions::default(), true);
        sc.advance().unwrap();
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Less);
    }

    #[test]
    fn test_hashbang() {
        assert_eq!(
            kinds("#!/usr/bin/env node\nx"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = scan_err("/* never closed");
        assert_eq!(err.key, MessageKey::UnterminatedComment);
        assert!(err.is_premature_eof());
    }

    // Punctuators

    #[test]
    fn test_punctuators_maximal_munch() {
        assert_eq!(
            kinds(">>>= ... ?? ?. ** =>"),
            vec![
                TokenKind::GreaterGreaterGreaterEqual,
                TokenKind::DotDotDot,
                TokenKind::QuestionQuestion,
                TokenKind::QuestionDot,
                TokenKind::StarStar,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            kinds("a?.5:b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Question,
                TokenKind::NumericLiteral,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = scan_err("a ¬ b");
        assert_eq!(err.key, MessageKey::UnexpectedCharacter);
        assert_eq!(err.args, vec!["¬".to_string()]);
    }

    // Line tracking / ASI flag

    #[test]
    fn test_line_column_tracking() {
        let toks = tokens("a\n  bb\r\nc");
        assert_eq!((toks[1].span.start.line, toks[1].span.start.column), (2, 3));
        assert_eq!((toks[2].span.start.line, toks[2].span.start.column), (3, 1));
        assert!(toks[1].had_line_terminator_before);
        assert!(!toks[0].had_line_terminator_before);
    }

    #[test]
    fn test_start_line_option() {
        let opts = ParseOptions {
            start_line: 10,
            ..ParseOptions::default()
        };
        let mut sc = Scanner::new("\nx", &opts, false);
        sc.advance().unwrap();
        assert_eq!(sc.current().span.start.line, 11);
    }

    // Checkpoints

    #[test]
    fn test_checkpoint_and_reset() {
        let mut sc = scanner_at("(a, b) => c");
        let cp = sc.checkpoint();
        sc.advance().unwrap();
        sc.advance().unwrap();
        assert_eq!(sc.current().kind, TokenKind::Comma);
        sc.reset(cp);
        assert_eq!(sc.current().kind, TokenKind::LeftParen);
        sc.advance().unwrap();
        assert_eq!(sc.current().text(), "a");
    }

    #[test]
    fn test_peek_is_memoized() {
        let mut sc = scanner_at("a b c");
        assert_eq!(sc.peek().unwrap().text(), "b");
        assert_eq!(sc.peek().unwrap().text(), "b");
        sc.advance().unwrap();
        assert_eq!(sc.current().text(), "b");
        assert_eq!(sc.peek().unwrap().text(), "c");
    }
}
