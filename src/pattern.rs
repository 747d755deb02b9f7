//! # Ignore Pattern Rule Sets
//!
//! A self-contained implementation of the gitignore pattern language used to
//! decide which entries are left out of an archive.
//!
//! ## Syntax
//!
//! One rule per line. Blank lines and lines starting with `#` are skipped.
//!
//! - `!pattern` negates the rule: a match re-includes the path.
//! - `pattern/` only matches directories.
//! - A pattern without a `/` matches the final path segment at any depth.
//! - A pattern with a `/` is anchored at the root (a leading `/` just forces
//!   anchoring) unless it starts with `**/`.
//! - `**` matches zero or more whole segments, `*` any run within a segment,
//!   `?` one character, `[...]` a character class (`[!...]` or `[^...]` to
//!   negate). `\` escapes the next character, so `\#` and `\!` start literal
//!   patterns and `\ ` keeps a trailing space. Only trailing spaces are
//!   trimmed; tabs are part of the pattern.
//!
//! ## Precedence
//!
//! Rules are kept in source order. For a given path the last matching rule
//! decides; an earlier, more specific rule never beats a later one.
//! [`RuleSet::is_excluded`] additionally treats a path as excluded when any of
//! its ancestor directories is excluded, which is what a walker that prunes
//! excluded directories observes.

use crate::error::{Error, Result};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// A named block of ignore-pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Where the text came from, used in diagnostics.
    pub origin: String,
    pub text: String,
}

impl Source {
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }
}

/// Outcome of matching a path against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Included,
    Excluded,
}

impl Decision {
    pub fn is_excluded(self) -> bool {
        self == Decision::Excluded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    /// `*`
    AnyRun,
    /// `?`
    AnyChar,
    Class { negated: bool, items: Vec<ClassItem> },
}

impl Token {
    fn matches(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::AnyRun | Token::AnyChar => true,
            Token::Class { negated, items } => {
                let hit = items.iter().any(|item| match item {
                    ClassItem::Char(x) => *x == c,
                    ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
                });
                hit != *negated
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    Any,
    Glob(Vec<Token>),
}

/// A single compiled ignore rule.
#[derive(Debug, Clone)]
pub struct Rule {
    raw: String,
    origin: String,
    line: usize,
    negated: bool,
    anchored: bool,
    dir_only: bool,
    segments: Vec<Segment>,
}

impl Rule {
    /// Compile one line. Returns `Ok(None)` for blank lines and comments.
    pub fn parse(origin: &str, line: usize, text: &str) -> Result<Option<Rule>> {
        let raw = text.strip_suffix('\r').unwrap_or(text);
        if raw.is_empty() || raw.starts_with('#') {
            return Ok(None);
        }

        let syntax_error = |message: &str| Error::PatternSyntax {
            origin: origin.to_string(),
            line,
            pattern: raw.to_string(),
            message: message.to_string(),
        };

        let mut pattern = trim_unescaped_trailing_spaces(raw);
        if pattern.is_empty() {
            return Ok(None);
        }

        let negated = pattern.starts_with('!');
        if negated {
            pattern = &pattern[1..];
        }

        let dir_only = pattern.ends_with('/');
        pattern = pattern.trim_end_matches('/');

        let rooted = pattern.starts_with('/');
        if rooted {
            pattern = &pattern[1..];
        }

        if pattern.is_empty() {
            return Ok(None);
        }

        let anchored = rooted || (pattern.contains('/') && !pattern.starts_with("**/"));

        let mut segments: Vec<Segment> = Vec::new();
        for part in split_segments(pattern) {
            if part == "**" {
                if segments.last() != Some(&Segment::Any) {
                    segments.push(Segment::Any);
                }
                continue;
            }
            let tokens = compile_segment(part).map_err(|message| syntax_error(message))?;
            segments.push(Segment::Glob(tokens));
        }

        Ok(Some(Rule {
            raw: raw.to_string(),
            origin: origin.to_string(),
            line,
            negated,
            anchored,
            dir_only,
            segments,
        }))
    }

    /// The rule text exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 1-based line number within the origin.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// Whether this rule applies to `path`, ignoring negation.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        self.matches_segments(&split_path(path), is_dir)
    }

    fn matches_segments(&self, path: &[Vec<char>], is_dir: bool) -> bool {
        if path.is_empty() || (self.dir_only && !is_dir) {
            return false;
        }
        if !self.anchored && self.segments.len() == 1 {
            return match_segments(&self.segments, &path[path.len() - 1..]);
        }
        match_segments(&self.segments, path)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.origin, self.line, self.raw)
    }
}

/// An ordered, immutable list of ignore rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    sources: Vec<Source>,
}

impl RuleSet {
    /// An empty rule set; it includes everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse sources in order. Any syntax error fails the whole set.
    pub fn parse(sources: Vec<Source>) -> Result<Self> {
        let mut rules = Vec::new();
        for source in &sources {
            for (index, line) in source.text.lines().enumerate() {
                if let Some(rule) = Rule::parse(&source.origin, index + 1, line)? {
                    rules.push(rule);
                }
            }
        }
        Ok(Self { rules, sources })
    }

    /// Parse a single block of pattern text.
    pub fn from_patterns(origin: &str, text: &str) -> Result<Self> {
        Self::parse(vec![Source::new(origin, text)])
    }

    /// Parse pattern text from a reader.
    pub fn from_reader<R: Read>(origin: &str, mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::io(origin, e))?;
        Self::from_patterns(origin, &text)
    }

    /// Load and combine ignore files in order, skipping any that do not exist.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::parse(read_sources(paths)?)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The last rule matching `path`, if any. This is the rule that decides.
    pub fn explain(&self, path: &str, is_dir: bool) -> Option<&Rule> {
        self.deciding_rule(&split_path(path), is_dir)
    }

    /// Last-match-wins decision for `path` alone, without looking at its
    /// ancestors.
    pub fn decide(&self, path: &str, is_dir: bool) -> Decision {
        decision_of(self.explain(path, is_dir))
    }

    /// Whether `path` is excluded, either by its own decision or because one
    /// of its ancestor directories is excluded.
    pub fn is_excluded(&self, path: &str, is_dir: bool) -> bool {
        let segments = split_path(path);
        if segments.is_empty() || self.rules.is_empty() {
            return false;
        }
        for depth in 1..segments.len() {
            if decision_of(self.deciding_rule(&segments[..depth], true)).is_excluded() {
                return true;
            }
        }
        decision_of(self.deciding_rule(&segments, is_dir)).is_excluded()
    }

    fn deciding_rule(&self, path: &[Vec<char>], is_dir: bool) -> Option<&Rule> {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches_segments(path, is_dir))
    }
}

/// Renders the combined pattern text, each source introduced by a
/// `# <origin>` comment line.
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for source in &self.sources {
            writeln!(f, "# {}", source.origin)?;
            write!(f, "{}", source.text)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read ignore files in order into sources. Missing files are skipped; any
/// other read failure is returned.
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => sources.push(Source::new(path.display().to_string(), text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("ignore file {} not found, skipping", path.display());
            }
            Err(e) => return Err(Error::io(path, e)),
        }
    }
    Ok(sources)
}

fn decision_of(rule: Option<&Rule>) -> Decision {
    match rule {
        Some(rule) if !rule.negated => Decision::Excluded,
        _ => Decision::Included,
    }
}

fn split_path(path: &str) -> Vec<Vec<char>> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.chars().collect())
        .collect()
}

/// Split a pattern at the `/` separators that are neither escaped nor inside
/// a character class.
fn split_segments(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_class = false;
    let mut chars = pattern.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => {
                in_class = true;
                if matches!(chars.peek(), Some((_, '!' | '^'))) {
                    chars.next();
                }
                // a leading `]` is a member, not the end of the class
                if matches!(chars.peek(), Some((_, ']'))) {
                    chars.next();
                }
            }
            ']' if in_class => in_class = false,
            '/' if !in_class => {
                parts.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&pattern[start..]);
    parts.retain(|p| !p.is_empty());
    parts
}

fn trim_unescaped_trailing_spaces(line: &str) -> &str {
    let mut end = line.len();
    while end > 0 {
        let bytes = line.as_bytes();
        if bytes[end - 1] != b' ' {
            break;
        }
        let backslashes = bytes[..end - 1]
            .iter()
            .rev()
            .take_while(|b| **b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &line[..end]
}

fn compile_segment(segment: &str) -> std::result::Result<Vec<Token>, &'static str> {
    let mut tokens = Vec::new();
    let mut chars = segment.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => tokens.push(Token::Literal(escaped)),
                None => return Err("trailing backslash escapes nothing"),
            },
            '*' => {
                if tokens.last() != Some(&Token::AnyRun) {
                    tokens.push(Token::AnyRun);
                }
            }
            '?' => tokens.push(Token::AnyChar),
            '[' => {
                let negated = matches!(chars.peek(), Some('!') | Some('^'));
                if negated {
                    chars.next();
                }

                let mut items = Vec::new();
                let mut closed = false;
                let mut first = true;
                while let Some(c) = chars.next() {
                    let c = match c {
                        ']' if !first => {
                            closed = true;
                            break;
                        }
                        '\\' => chars.next().ok_or("unclosed character class")?,
                        c => c,
                    };
                    first = false;

                    let is_range = chars.peek() == Some(&'-');
                    if is_range {
                        let mut lookahead = chars.clone();
                        lookahead.next();
                        match lookahead.peek() {
                            Some(']') | None => items.push(ClassItem::Char(c)),
                            Some(_) => {
                                chars.next();
                                let hi = match chars.next() {
                                    Some('\\') => chars.next().ok_or("unclosed character class")?,
                                    Some(hi) => hi,
                                    None => return Err("unclosed character class"),
                                };
                                if hi < c {
                                    return Err("invalid character range");
                                }
                                items.push(ClassItem::Range(c, hi));
                            }
                        }
                    } else {
                        items.push(ClassItem::Char(c));
                    }
                }

                if !closed {
                    return Err("unclosed character class");
                }
                tokens.push(Token::Class { negated, items });
            }
            c => tokens.push(Token::Literal(c)),
        }
    }

    Ok(tokens)
}

fn match_segments(pattern: &[Segment], path: &[Vec<char>]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Any, rest)) => {
            // a trailing `**` matches everything inside, not the directory itself
            if rest.is_empty() {
                return !path.is_empty();
            }
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Glob(tokens), rest)) => match path.split_first() {
            Some((first, tail)) => match_tokens(tokens, first) && match_segments(rest, tail),
            None => false,
        },
    }
}

fn match_tokens(tokens: &[Token], text: &[char]) -> bool {
    let (mut t, mut s) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while s < text.len() {
        match tokens.get(t) {
            Some(Token::AnyRun) => {
                star = Some((t, s));
                t += 1;
                continue;
            }
            Some(token) if token.matches(text[s]) => {
                t += 1;
                s += 1;
                continue;
            }
            _ => {}
        }
        match star {
            Some((star_t, star_s)) => {
                t = star_t + 1;
                s = star_s + 1;
                star = Some((star_t, star_s + 1));
            }
            None => return false,
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyRun)
}
