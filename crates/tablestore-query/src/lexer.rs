//! `$filter` lexer using logos
//!
//! Tokens are produced on demand: every `peek` re-scans from the cursor, so
//! no token buffer is ever materialised. Logos finds the raw lexeme (a paren,
//! a quoted string or a bare word) and the word is then classified here,
//! because whether `guid` is a type hint depends on the character after it.

use logos::Logos;
use std::borrow::Cow;
use std::fmt;

const LOGIC_OPERATORS: &[&str] = &["and", "or"];
const UNARY_OPERATORS: &[&str] = &["not"];
const COMPARISON_OPERATORS: &[&str] = &["eq", "ne", "gt", "ge", "lt", "le"];
const TYPE_HINTS: &[&str] = &["datetime", "guid", "binary", "x"];

/// Raw lexemes, before keyword classification
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum Lexeme {
    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[regex(r"'([^']|'')*'")]
    SingleQuoted,

    #[regex(r#""([^"]|"")*""#)]
    DoubleQuoted,

    #[regex(r#"[^\s()'"]+"#)]
    Word,
}

/// The kind of a filter token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Bool,
    Number,
    TypeHint,
    String,
    OpenParen,
    CloseParen,
    UnaryOperator,
    ComparisonOperator,
    LogicOperator,
    EndOfQuery,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Bool => "bool",
            TokenKind::Number => "number",
            TokenKind::TypeHint => "type-hint",
            TokenKind::String => "string",
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::UnaryOperator => "unary-operator",
            TokenKind::ComparisonOperator => "comparison-operator",
            TokenKind::LogicOperator => "logic-operator",
            TokenKind::EndOfQuery => "end-of-query",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token of a filter string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte offset of the token in the filter string
    pub position: usize,
    /// Length of the token in bytes, including string delimiters
    pub length: usize,
    /// Token text; for strings the content with escaping collapsed
    pub value: Option<Cow<'a, str>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, position: usize, length: usize, value: Option<Cow<'a, str>>) -> Self {
        Self {
            kind,
            position,
            length,
            value,
        }
    }

    /// Token text, if the token carries any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns true for the given kind whose text matches `word` case-insensitively
    pub fn is_word(&self, kind: TokenKind, word: &str) -> bool {
        self.kind == kind && self.value().is_some_and(|v| v.eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{} '{}'", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Cursor over a filter string
#[derive(Debug, Clone)]
pub struct QueryLexer<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> QueryLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Current byte offset of the cursor
    pub fn position(&self) -> usize {
        self.position
    }

    /// The next token, without advancing
    pub fn peek(&self) -> Token<'a> {
        let rest = &self.source[self.position..];
        let mut lexemes = Lexeme::lexer(rest);

        let Some(lexeme) = lexemes.next() else {
            return Token::new(TokenKind::EndOfQuery, self.source.len(), 0, None);
        };

        let span = lexemes.span();
        let start = self.position + span.start;

        match lexeme {
            Ok(Lexeme::OpenParen) => Token::new(TokenKind::OpenParen, start, 1, None),
            Ok(Lexeme::CloseParen) => Token::new(TokenKind::CloseParen, start, 1, None),
            Ok(Lexeme::SingleQuoted) | Ok(Lexeme::DoubleQuoted) => {
                self.string_token(start, span.len(), true)
            }
            Ok(Lexeme::Word) => self.word_token(start, span.len()),
            Err(()) => {
                // Only an unterminated string fails to scan; it runs to the end
                let start = self.position + (rest.len() - rest.trim_start_matches(char::is_whitespace).len());
                if self.source[start..].starts_with(['\'', '"']) {
                    self.string_token(start, self.source.len() - start, false)
                } else {
                    let length = self.source[start..].chars().next().map_or(0, char::len_utf8);
                    self.word_token(start, length)
                }
            }
        }
    }

    /// Consume and return the next token
    pub fn next_token(&mut self) -> Token<'a> {
        let token = self.peek();
        self.position = token.position + token.length;
        token
    }

    /// Consume the next token only if it satisfies the predicate
    pub fn next_if<F>(&mut self, predicate: F) -> Option<Token<'a>>
    where
        F: FnOnce(&Token<'a>) -> bool,
    {
        let token = self.peek();
        if predicate(&token) {
            self.position = token.position + token.length;
            Some(token)
        } else {
            None
        }
    }

    fn string_token(&self, start: usize, length: usize, terminated: bool) -> Token<'a> {
        let raw = &self.source[start..start + length];
        let quote = if raw.starts_with('"') { "\"" } else { "'" };
        let inner = if terminated {
            &raw[1..raw.len() - 1]
        } else {
            &raw[1..]
        };

        let escaped = quote.repeat(2);
        let value = if inner.contains(&escaped) {
            Cow::Owned(inner.replace(&escaped, quote))
        } else {
            Cow::Borrowed(inner)
        };

        Token::new(TokenKind::String, start, length, Some(value))
    }

    fn word_token(&self, start: usize, length: usize) -> Token<'a> {
        let word = &self.source[start..start + length];
        let lower = word.to_ascii_lowercase();
        let followed_by_quote = self.source[start + length..].starts_with(['\'', '"']);

        let kind = if LOGIC_OPERATORS.contains(&lower.as_str()) {
            TokenKind::LogicOperator
        } else if UNARY_OPERATORS.contains(&lower.as_str()) {
            TokenKind::UnaryOperator
        } else if COMPARISON_OPERATORS.contains(&lower.as_str()) {
            TokenKind::ComparisonOperator
        } else if lower == "true" || lower == "false" {
            TokenKind::Bool
        } else if TYPE_HINTS.contains(&lower.as_str()) && followed_by_quote {
            TokenKind::TypeHint
        } else if is_number(word) {
            TokenKind::Number
        } else {
            TokenKind::Identifier
        };

        Token::new(kind, start, length, Some(Cow::Borrowed(word)))
    }
}

/// `-?[0-9]+(\.[0-9]+)?L?`
fn is_number(word: &str) -> bool {
    let body = word.strip_prefix('-').unwrap_or(word);
    let body = body.strip_suffix('L').unwrap_or(body);
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match body.split_once('.') {
        Some((integer, fraction)) => digits(integer) && digits(fraction),
        None => digits(body),
    }
}

/// Tokenize a filter string, up to and including the end-of-query token
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut lexer = QueryLexer::new(input);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndOfQuery;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
