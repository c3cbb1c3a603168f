//! Scanner for the query language.

use std::fmt;

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::opt;
use winnow::prelude::*;
use winnow::token::take_while;

use super::error::ParseError;

/// Token classes produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,  // bare word
    String, // "double quoted"
    Number, // -12, 3.5
    Time,   // 'single quoted'
    Operator,
    Link, // & && | || and or
    Not,  // not
    Eof,
    Illegal,
}

/// A scanned token with its unescaped text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub pos: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of query"),
            TokenKind::String => write!(f, "\"{}\"", self.literal),
            TokenKind::Time => write!(f, "'{}'", self.literal),
            _ => write!(f, "`{}`", self.literal),
        }
    }
}

// Manually define PResult for resilience against winnow version changes
type PResult<T> = Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn is_link_char(c: char) -> bool {
    matches!(c, '&' | '|')
}

fn skip_whitespace(input: &mut &str) -> PResult<()> {
    multispace0.void().parse_next(input)
}

/// Recognize `-?[0-9]+`.
pub(crate) fn integer_literal<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (opt('-'), digit1).take().parse_next(input)
}

/// Recognize `-?[0-9]+\.[0-9]+`.
pub(crate) fn float_literal<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (opt('-'), digit1, '.', digit1).take().parse_next(input)
}

/// True when `parser` consumes all of `text`.
pub(crate) fn matches_fully(
    mut parser: impl for<'i> FnMut(&mut &'i str) -> PResult<&'i str>,
    text: &str,
) -> bool {
    let mut rest = text;
    parser(&mut rest).is_ok() && rest.is_empty()
}

/// Single-pass scanner over a query string.
pub struct Scanner<'a> {
    input: &'a str,
    remaining: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            remaining: input,
        }
    }

    fn offset(&self) -> usize {
        self.input.len() - self.remaining.len()
    }

    fn token(&self, kind: TokenKind, literal: impl Into<String>, pos: usize) -> Token {
        Token {
            kind,
            literal: literal.into(),
            pos,
        }
    }

    /// Scan the next token. Once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        // multispace0 cannot fail
        let _ = skip_whitespace(&mut self.remaining);
        let pos = self.offset();

        let Some(c) = self.remaining.chars().next() else {
            return Ok(self.token(TokenKind::Eof, "", pos));
        };

        let tok = match c {
            '"' => self.lex_double_quoted(pos)?,
            '\'' => self.lex_single_quoted(pos)?,
            c if is_operator_char(c) => {
                let sym = self.take_run(is_operator_char);
                self.token(TokenKind::Operator, sym, pos)
            }
            c if is_link_char(c) => {
                let sym = self.take_run(is_link_char);
                self.token(TokenKind::Link, sym, pos)
            }
            c if is_word_char(c) => {
                let word = self.take_run(is_word_char);
                self.token(classify_word(word), word, pos)
            }
            c => {
                self.remaining = &self.remaining[c.len_utf8()..];
                self.token(TokenKind::Illegal, c, pos)
            }
        };
        Ok(tok)
    }

    fn take_run(&mut self, pred: fn(char) -> bool) -> &'a str {
        let run: PResult<&'a str> = take_while(1.., pred).parse_next(&mut self.remaining);
        run.unwrap_or_default()
    }

    /// Lex `"..."`, resolving backslash escapes.
    fn lex_double_quoted(&mut self, pos: usize) -> Result<Token, ParseError> {
        let src = self.remaining;
        let mut chars = src.char_indices().skip(1);
        let mut value = String::new();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.remaining = &src[i + 1..];
                    return Ok(self.token(TokenKind::String, value, pos));
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                c => value.push(c),
            }
        }

        Err(ParseError::UnterminatedString { pos })
    }

    /// Lex `'...'` verbatim; no escapes.
    fn lex_single_quoted(&mut self, pos: usize) -> Result<Token, ParseError> {
        let src = self.remaining;
        let body = &src[1..];
        match body.find('\'') {
            Some(end) => {
                let tok = self.token(TokenKind::Time, &body[..end], pos);
                self.remaining = &body[end + 1..];
                Ok(tok)
            }
            None => Err(ParseError::UnterminatedString { pos }),
        }
    }
}

fn classify_word(word: &str) -> TokenKind {
    if matches_fully(float_literal, word) || matches_fully(integer_literal, word) {
        TokenKind::Number
    } else if word.eq_ignore_ascii_case("not") {
        TokenKind::Not
    } else if word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or") {
        TokenKind::Link
    } else {
        TokenKind::Ident
    }
}

/// Scan the whole input, including the trailing `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();

    loop {
        let tok = scanner.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }

    Ok(tokens)
}
