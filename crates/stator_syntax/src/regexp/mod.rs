//! Regular-expression literal validation.
//!
//! The parser hands every regex literal to a [`RegExpValidator`] together
//! with the literal's own position.  [`PatternValidator`] is the default: a
//! recursive-descent check of the pattern grammar that builds nothing.  In
//! Unicode mode (`u` or `v`) the full grammar applies; otherwise the legacy
//! web-compatibility grammar is accepted (lone `{`, `]`, identity escapes,
//! octal-style back references).

use bitflags::bitflags;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::error::{ParseResult, ParserError};
use crate::messages::MessageKey;

/// Validates regular-expression literals for the parser.
pub trait RegExpValidator {
    /// Check `pattern` with `flags`.  Errors must be reported at
    /// `source_name:line:column`, the literal's own position.
    fn validate(
        &self,
        pattern: &str,
        flags: &str,
        source_name: &str,
        line: u32,
        column: u32,
    ) -> ParseResult<()>;
}

bitflags! {
    /// Flags of a regular-expression literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RegExpFlags: u8 {
        const HAS_INDICES  = 1 << 0;
        const GLOBAL       = 1 << 1;
        const IGNORE_CASE  = 1 << 2;
        const MULTILINE    = 1 << 3;
        const DOT_ALL      = 1 << 4;
        const UNICODE      = 1 << 5;
        const UNICODE_SETS = 1 << 6;
        const STICKY       = 1 << 7;
    }
}

impl RegExpFlags {
    /// Parse a flags string.  Unknown or repeated flags, and `u` together
    /// with `v`, are rejected.
    pub fn parse(flags: &str) -> Option<Self> {
        let mut parsed = Self::empty();
        for c in flags.chars() {
            let flag = match c {
                'd' => Self::HAS_INDICES,
                'g' => Self::GLOBAL,
                'i' => Self::IGNORE_CASE,
                'm' => Self::MULTILINE,
                's' => Self::DOT_ALL,
                'u' => Self::UNICODE,
                'v' => Self::UNICODE_SETS,
                'y' => Self::STICKY,
                _ => return None,
            };
            if parsed.contains(flag) {
                return None;
            }
            parsed |= flag;
        }
        if parsed.contains(Self::UNICODE | Self::UNICODE_SETS) {
            return None;
        }
        Some(parsed)
    }

    fn unicode_mode(self) -> bool {
        self.intersects(Self::UNICODE | Self::UNICODE_SETS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum PatternError {
    #[error("{0}")]
    Syntax(&'static str),
    #[error("pattern nesting too deep")]
    TooDeep,
}

type PatternResult<T> = Result<T, PatternError>;

/// The default validator.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    max_depth: u32,
}

impl PatternValidator {
    /// A validator that rejects group or class nesting deeper than
    /// `max_depth`.
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl Default for PatternValidator {
    fn default() -> Self {
        Self::new(256)
    }
}

impl RegExpValidator for PatternValidator {
    fn validate(
        &self,
        pattern: &str,
        flags: &str,
        source_name: &str,
        line: u32,
        column: u32,
    ) -> ParseResult<()> {
        let Some(parsed) = RegExpFlags::parse(flags) else {
            return Err(ParserError::syntax(
                source_name,
                line,
                column,
                MessageKey::InvalidRegExpFlags,
                vec![flags.to_string()],
            ));
        };
        let result = PatternChecker::new(pattern, parsed, self.max_depth).check();
        tracing::trace!(pattern, flags, ok = result.is_ok(), "validate regexp");
        match result {
            Ok(()) => Ok(()),
            Err(PatternError::TooDeep) => Err(ParserError::syntax(
                source_name,
                line,
                column,
                MessageKey::RegExpTooComplex,
                vec![],
            )),
            Err(err @ PatternError::Syntax(_)) => Err(ParserError::syntax(
                source_name,
                line,
                column,
                MessageKey::InvalidRegExp,
                vec![pattern.to_string(), err.to_string()],
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern grammar
// ─────────────────────────────────────────────────────────────────────────────

/// Capturing groups found by a pre-scan, needed before the pattern is
/// checked because back references may precede their group.
#[derive(Debug, Default)]
struct GroupInfo {
    count: u32,
    names: FxHashSet<String>,
}

/// What a term turned out to be, for deciding whether it may be quantified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    Atom,
    Lookahead,
    Assertion,
}

/// A single class member, for range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassAtom {
    Char(u32),
    /// `\d`, `\w`, a nested class and the like.
    Set,
}

struct PatternChecker {
    chars: Vec<char>,
    pos: usize,
    unicode: bool,
    unicode_sets: bool,
    max_depth: u32,
    depth: u32,
    groups: GroupInfo,
}

fn is_syntax_char(c: char) -> bool {
    matches!(
        c,
        '^' | '$' | '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '/'
    )
}

fn is_group_name_char(c: char, first: bool) -> bool {
    if first {
        c == '$' || c == '_' || unicode_ident::is_xid_start(c)
    } else {
        c == '$' || c == '\u{200C}' || c == '\u{200D}' || unicode_ident::is_xid_continue(c)
    }
}

impl PatternChecker {
    fn new(pattern: &str, flags: RegExpFlags, max_depth: u32) -> Self {
        Self {
            chars: pattern.chars().collect(),
            pos: 0,
            unicode: flags.unicode_mode(),
            unicode_sets: flags.contains(RegExpFlags::UNICODE_SETS),
            max_depth,
            depth: 0,
            groups: GroupInfo::default(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn looking_at(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn check(mut self) -> PatternResult<()> {
        self.groups = self.scan_groups()?;
        self.disjunction()?;
        match self.peek() {
            None => Ok(()),
            Some(')') => Err(PatternError::Syntax("unmatched ')'")),
            Some(_) => Err(PatternError::Syntax("unexpected character")),
        }
    }

    /// Count capturing groups and collect group names without validating.
    fn scan_groups(&self) -> PatternResult<GroupInfo> {
        let mut info = GroupInfo::default();
        let mut i = 0;
        let mut in_class = false;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 1,
                '[' => in_class = true,
                ']' => in_class = false,
                '(' if !in_class => {
                    if self.chars.get(i + 1) != Some(&'?') {
                        info.count += 1;
                    } else if self.chars.get(i + 2) == Some(&'<')
                        && !matches!(self.chars.get(i + 3), Some('=') | Some('!'))
                    {
                        info.count += 1;
                        let name: String = self.chars[i + 3..]
                            .iter()
                            .take_while(|&&c| c != '>')
                            .collect();
                        if !info.names.insert(name) {
                            return Err(PatternError::Syntax("duplicate capture group name"));
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Ok(info)
    }

    fn enter(&mut self) -> PatternResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(PatternError::TooDeep);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn disjunction(&mut self) -> PatternResult<()> {
        loop {
            self.alternative()?;
            if !self.eat('|') {
                return Ok(());
            }
        }
    }

    fn alternative(&mut self) -> PatternResult<()> {
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let term = self.term()?;
            self.quantifier(term)?;
        }
        Ok(())
    }

    fn term(&mut self) -> PatternResult<Term> {
        let Some(c) = self.bump() else {
            return Err(PatternError::Syntax("unexpected end of pattern"));
        };
        match c {
            '^' | '$' => Ok(Term::Assertion),
            '\\' => self.atom_escape(),
            '(' => self.group(),
            '[' => {
                self.class()?;
                Ok(Term::Atom)
            }
            '*' | '+' | '?' => Err(PatternError::Syntax("nothing to repeat")),
            '{' => {
                if self.unicode {
                    return Err(PatternError::Syntax("lone quantifier brackets"));
                }
                // Legacy grammar: `{` is literal unless it forms a quantifier.
                self.pos -= 1;
                if self.read_braced_quantifier()?.is_some() {
                    return Err(PatternError::Syntax("nothing to repeat"));
                }
                self.pos += 1;
                Ok(Term::Atom)
            }
            '}' | ']' if self.unicode => Err(PatternError::Syntax("lone quantifier brackets")),
            _ => Ok(Term::Atom),
        }
    }

    fn quantifier(&mut self, term: Term) -> PatternResult<()> {
        let quantified = match self.peek() {
            Some('*' | '+' | '?') => {
                self.pos += 1;
                true
            }
            Some('{') => match self.read_braced_quantifier()? {
                Some((min, Some(max))) if min > max => {
                    return Err(PatternError::Syntax("numbers out of order in {} quantifier"));
                }
                Some(_) => true,
                None if self.unicode => return Err(PatternError::Syntax("incomplete quantifier")),
                None => false,
            },
            _ => false,
        };
        if !quantified {
            return Ok(());
        }
        match term {
            Term::Assertion => return Err(PatternError::Syntax("nothing to repeat")),
            Term::Lookahead if self.unicode => {
                return Err(PatternError::Syntax("invalid quantifier"));
            }
            _ => {}
        }
        self.eat('?');
        Ok(())
    }

    /// `{n}`, `{n,}` or `{n,m}` at the cursor.  Consumes it and returns the
    /// bounds, or leaves the cursor and returns `None`.
    fn read_braced_quantifier(&mut self) -> PatternResult<Option<(u64, Option<u64>)>> {
        let start = self.pos;
        if !self.eat('{') {
            return Ok(None);
        }
        let Some(min) = self.read_decimal() else {
            self.pos = start;
            return Ok(None);
        };
        let max = if self.eat(',') {
            self.read_decimal()
        } else {
            Some(min)
        };
        if !self.eat('}') {
            self.pos = start;
            return Ok(None);
        }
        Ok(Some((min, max)))
    }

    fn read_decimal(&mut self) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(u64::from(d));
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn group(&mut self) -> PatternResult<Term> {
        self.enter()?;
        let term = if self.eat('?') {
            match self.bump() {
                Some(':') => Term::Atom,
                Some('=' | '!') => Term::Lookahead,
                Some('<') if self.eat('=') || self.eat('!') => Term::Assertion,
                Some('<') => {
                    self.group_name()?;
                    Term::Atom
                }
                Some(c) if matches!(c, 'i' | 'm' | 's' | '-') => {
                    self.pos -= 1;
                    self.modifiers()?;
                    Term::Atom
                }
                _ => return Err(PatternError::Syntax("invalid group")),
            }
        } else {
            Term::Atom
        };
        self.disjunction()?;
        if !self.eat(')') {
            return Err(PatternError::Syntax("unterminated group"));
        }
        self.leave();
        Ok(term)
    }

    /// `(?ims-ims:` flag modifiers, up to and including the `:`.
    fn modifiers(&mut self) -> PatternResult<()> {
        let mut seen = FxHashSet::default();
        let mut added = 0;
        let mut removed = 0;
        let mut removing = false;
        loop {
            match self.bump() {
                Some(':') => break,
                Some('-') if !removing => removing = true,
                Some(c @ ('i' | 'm' | 's')) => {
                    if !seen.insert(c) {
                        return Err(PatternError::Syntax("repeated flag in modifiers"));
                    }
                    if removing {
                        removed += 1;
                    } else {
                        added += 1;
                    }
                }
                _ => return Err(PatternError::Syntax("invalid group")),
            }
        }
        if added + removed == 0 {
            return Err(PatternError::Syntax("invalid group"));
        }
        Ok(())
    }

    /// `name>` after `(?<` or `\k<`.
    fn group_name(&mut self) -> PatternResult<String> {
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('>') if !name.is_empty() => return Ok(name),
                Some(c) if is_group_name_char(c, name.is_empty()) => name.push(c),
                _ => return Err(PatternError::Syntax("invalid capture group name")),
            }
        }
    }

    // ── Escapes ─────────────────────────────────────────────────────────────

    fn atom_escape(&mut self) -> PatternResult<Term> {
        let Some(c) = self.bump() else {
            return Err(PatternError::Syntax("\\ at end of pattern"));
        };
        match c {
            'b' | 'B' => Ok(Term::Assertion),
            '1'..='9' => {
                self.pos -= 1;
                let start = self.pos;
                let index = self.read_decimal().unwrap_or(0);
                if index > u64::from(self.groups.count) {
                    if self.unicode {
                        return Err(PatternError::Syntax("invalid escape"));
                    }
                    // Legacy octal escape or identity escape.
                    self.pos = start + 1;
                }
                Ok(Term::Atom)
            }
            'k' => {
                if self.unicode || !self.groups.names.is_empty() {
                    if !self.eat('<') {
                        return Err(PatternError::Syntax("invalid named reference"));
                    }
                    let name = self.group_name()?;
                    if !self.groups.names.contains(&name) {
                        return Err(PatternError::Syntax("invalid named capture referenced"));
                    }
                }
                Ok(Term::Atom)
            }
            _ => {
                self.pos -= 1;
                self.character_escape(false)?;
                Ok(Term::Atom)
            }
        }
    }

    /// Escapes shared by atoms and class members, after the `\`.  Returns
    /// the code point, or `None` for a character-class escape.
    fn character_escape(&mut self, in_class: bool) -> PatternResult<Option<u32>> {
        let Some(c) = self.bump() else {
            return Err(PatternError::Syntax("\\ at end of pattern"));
        };
        let value = match c {
            'd' | 'D' | 's' | 'S' | 'w' | 'W' => return Ok(None),
            'p' | 'P' if self.unicode => {
                self.property_escape()?;
                return Ok(None);
            }
            'f' => 0x0C,
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'v' => 0x0B,
            'b' if in_class => 0x08,
            '-' if in_class && self.unicode => u32::from('-'),
            'c' => match self.peek() {
                Some(l) if l.is_ascii_alphabetic() => {
                    self.pos += 1;
                    u32::from(l) % 32
                }
                Some(d) if in_class && !self.unicode && (d.is_ascii_digit() || d == '_') => {
                    self.pos += 1;
                    u32::from(d) % 32
                }
                _ if self.unicode => return Err(PatternError::Syntax("invalid unicode escape")),
                // `\c` without a control letter is a literal backslash.
                _ => {
                    self.pos -= 1;
                    u32::from('\\')
                }
            },
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => 0,
            '0'..='9' => {
                if self.unicode {
                    return Err(PatternError::Syntax("invalid class escape"));
                }
                self.legacy_octal(c)
            }
            'x' => match self.read_hex(2) {
                Some(v) => v,
                None if self.unicode => return Err(PatternError::Syntax("invalid escape")),
                None => u32::from('x'),
            },
            'u' => match self.unicode_escape()? {
                Some(v) => v,
                None if self.unicode => return Err(PatternError::Syntax("invalid unicode escape")),
                None => u32::from('u'),
            },
            c if self.unicode && !is_syntax_char(c) => {
                return Err(PatternError::Syntax("invalid escape"));
            }
            c => u32::from(c),
        };
        Ok(Some(value))
    }

    fn legacy_octal(&mut self, first: char) -> u32 {
        let mut value = first.to_digit(8).unwrap_or(u32::from(first));
        if first.to_digit(8).is_none() {
            return value;
        }
        for _ in 0..2 {
            match self.peek().and_then(|d| d.to_digit(8)) {
                Some(d) if value * 8 + d <= 0o377 => {
                    value = value * 8 + d;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        value
    }

    fn read_hex(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for i in 0..count {
            let d = self.peek_at(i)?.to_digit(16)?;
            value = value * 16 + d;
        }
        self.pos += count;
        Some(value)
    }

    /// `XXXX`, a surrogate pair `XXXX\uXXXX` or, in Unicode mode, `{X…}`,
    /// after `\u`.
    fn unicode_escape(&mut self) -> PatternResult<Option<u32>> {
        if self.unicode && self.peek() == Some('{') {
            let start = self.pos;
            self.pos += 1;
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.pos += 1;
            }
            if digits == 0 || !self.eat('}') || value > 0x10FFFF {
                self.pos = start;
                return Err(PatternError::Syntax("invalid unicode escape"));
            }
            return Ok(Some(value));
        }
        let Some(lead) = self.read_hex(4) else {
            return Ok(None);
        };
        if self.unicode && (0xD800..0xDC00).contains(&lead) && self.looking_at("\\u") {
            let save = self.pos;
            self.pos += 2;
            match self.read_hex(4) {
                Some(trail) if (0xDC00..0xE000).contains(&trail) => {
                    return Ok(Some(0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00)));
                }
                _ => self.pos = save,
            }
        }
        Ok(Some(lead))
    }

    /// `{Name}` or `{Name=Value}` after `\p` / `\P`.  Property names are
    /// checked for shape only.
    fn property_escape(&mut self) -> PatternResult<()> {
        if !self.eat('{') {
            return Err(PatternError::Syntax("invalid property name"));
        }
        let mut len = 0;
        loop {
            match self.bump() {
                Some('}') if len > 0 => return Ok(()),
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '=' => len += 1,
                _ => return Err(PatternError::Syntax("invalid property name")),
            }
        }
    }

    // ── Character classes ───────────────────────────────────────────────────

    /// Class contents after `[`, up to and including `]`.
    fn class(&mut self) -> PatternResult<()> {
        self.enter()?;
        self.eat('^');
        if self.unicode_sets {
            self.class_set_contents()?;
        } else {
            self.class_ranges()?;
        }
        self.leave();
        Ok(())
    }

    fn class_ranges(&mut self) -> PatternResult<()> {
        loop {
            match self.peek() {
                None => return Err(PatternError::Syntax("unterminated character class")),
                Some(']') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => {}
            }
            let from = self.class_atom()?;
            if self.peek() == Some('-') && !matches!(self.peek_at(1), Some(']') | None) {
                self.pos += 1;
                let to = self.class_atom()?;
                match (from, to) {
                    (ClassAtom::Char(a), ClassAtom::Char(b)) if a > b => {
                        return Err(PatternError::Syntax("range out of order in character class"));
                    }
                    (ClassAtom::Set, _) | (_, ClassAtom::Set) if self.unicode => {
                        return Err(PatternError::Syntax("invalid character class"));
                    }
                    _ => {}
                }
            }
        }
    }

    fn class_atom(&mut self) -> PatternResult<ClassAtom> {
        match self.bump() {
            None => Err(PatternError::Syntax("unterminated character class")),
            Some('\\') => Ok(match self.character_escape(true)? {
                Some(v) => ClassAtom::Char(v),
                None => ClassAtom::Set,
            }),
            Some(c) => Ok(ClassAtom::Char(u32::from(c))),
        }
    }

    /// `v`-mode class: nested classes, `&&` intersection, `--` subtraction
    /// and `\q{…}` string alternatives.
    fn class_set_contents(&mut self) -> PatternResult<()> {
        let mut previous: Option<ClassAtom> = None;
        loop {
            let Some(c) = self.peek() else {
                return Err(PatternError::Syntax("unterminated character class"));
            };
            match c {
                ']' => {
                    self.pos += 1;
                    return Ok(());
                }
                '[' => {
                    self.pos += 1;
                    self.class()?;
                    previous = Some(ClassAtom::Set);
                }
                '&' if self.looking_at("&&") => {
                    self.pos += 2;
                    if self.peek() == Some('&') {
                        return Err(PatternError::Syntax(
                            "invalid set operation in character class",
                        ));
                    }
                    previous = None;
                }
                '-' if self.looking_at("--") => {
                    self.pos += 2;
                    previous = None;
                }
                '-' => {
                    self.pos += 1;
                    let Some(ClassAtom::Char(from)) = previous else {
                        return Err(PatternError::Syntax("invalid character class"));
                    };
                    match self.class_set_operand()? {
                        ClassAtom::Char(to) if from > to => {
                            return Err(PatternError::Syntax(
                                "range out of order in character class",
                            ));
                        }
                        ClassAtom::Char(_) => {}
                        ClassAtom::Set => {
                            return Err(PatternError::Syntax("invalid character class"));
                        }
                    }
                    previous = None;
                }
                '(' | ')' | '{' | '}' | '/' | '|' => {
                    return Err(PatternError::Syntax("invalid character in character class"));
                }
                _ => previous = Some(self.class_set_operand()?),
            }
        }
    }

    fn class_set_operand(&mut self) -> PatternResult<ClassAtom> {
        if self.looking_at("\\q{") {
            self.pos += 3;
            while !self.eat('}') {
                match self.bump() {
                    None => {
                        return Err(PatternError::Syntax("unterminated class string disjunction"));
                    }
                    Some('\\') => {
                        self.character_escape(true)?;
                    }
                    Some(_) => {}
                }
            }
            return Ok(ClassAtom::Set);
        }
        self.class_atom()
    }
}
