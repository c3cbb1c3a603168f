//! Parser for the query language.
//!
//! Grammar (in rough EBNF):
//!
//! query     = condition (link condition)* EOF
//! condition = ["not"] key operator value
//! key       = IDENT
//! operator  = "==" | "!=" | ">" | "<" | ">=" | "<="
//! value     = STRING | NUMBER | TIME | IDENT
//! link      = "&" | "&&" | "and" | "|" | "||" | "or"
//!
//! There is no precedence and no grouping; links fold left to right.

use super::ast::{Condition, Link, Operator, PredicateChain};
use super::classify::{Quoting, classify};
use super::error::ParseError;
use super::lexer::{Scanner, Token, TokenKind};

/// Parser state.
struct Parser<'a> {
    scanner: Scanner<'a>,
    // one token of pushback
    buf: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(input),
            buf: None,
        }
    }

    fn scan(&mut self) -> Result<Token, ParseError> {
        match self.buf.take() {
            Some(tok) => Ok(tok),
            None => self.scanner.next_token(),
        }
    }

    fn unscan(&mut self, tok: Token) {
        self.buf = Some(tok);
    }

    fn unexpected(tok: Token, expected: &'static str) -> ParseError {
        match tok.kind {
            TokenKind::Illegal => ParseError::Illegal {
                pos: tok.pos,
                ch: tok.literal.chars().next().unwrap_or_default(),
            },
            _ => ParseError::Syntax {
                pos: tok.pos,
                expected,
                found: tok.to_string(),
            },
        }
    }

    /// Parse the whole query.
    fn parse_query(&mut self) -> Result<PredicateChain, ParseError> {
        let first = self.scan()?;
        if first.kind == TokenKind::Eof {
            return Err(ParseError::Empty);
        }
        self.unscan(first);

        let mut conditions = vec![self.parse_condition()?];

        loop {
            let tok = self.scan()?;
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Link => {
                    let link = Link::from_symbol(&tok.literal).ok_or(
                        ParseError::UnsupportedLink {
                            pos: tok.pos,
                            symbol: tok.literal,
                        },
                    )?;
                    if let Some(last) = conditions.last_mut() {
                        last.link = link;
                    }
                    conditions.push(self.parse_condition()?);
                }
                _ => return Err(Self::unexpected(tok, "link or end of query")),
            }
        }

        Ok(PredicateChain::new(conditions))
    }

    /// Parse condition: ["not"] key operator value
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let mut tok = self.scan()?;
        let negated = tok.kind == TokenKind::Not;
        if negated {
            tok = self.scan()?;
        }

        let key = match tok.kind {
            TokenKind::Ident => tok.literal,
            _ => return Err(Self::unexpected(tok, "field name")),
        };

        let tok = self.scan()?;
        let operator = match tok.kind {
            TokenKind::Operator => {
                Operator::from_symbol(&tok.literal).ok_or(ParseError::UnsupportedOperator {
                    pos: tok.pos,
                    symbol: tok.literal,
                })?
            }
            _ => return Err(Self::unexpected(tok, "comparison operator")),
        };

        let tok = self.scan()?;
        let quoting = match tok.kind {
            TokenKind::String => Quoting::Double,
            TokenKind::Time => Quoting::Single,
            TokenKind::Number | TokenKind::Ident => Quoting::Bare,
            _ => return Err(Self::unexpected(tok, "value")),
        };

        Ok(Condition {
            key,
            operator,
            expr_type: classify(&tok.literal, quoting),
            expression: tok.literal,
            link: Link::Eof,
            negated,
        })
    }
}

/// Parse a query string into a predicate chain.
pub fn parse_query(input: &str) -> Result<PredicateChain, ParseError> {
    let chain = Parser::new(input).parse_query()?;
    tracing::debug!("Parsed query into {} condition(s): {}", chain.len(), chain);
    Ok(chain)
}
