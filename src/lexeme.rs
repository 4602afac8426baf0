//! A small lexical analysis utility implementing the [ILexer] contract the
//! driver consumes.
//!
//! The engine itself is lexer-agnostic; any token source can feed it. This
//! module covers the common case of regex-driven tokenization for tests,
//! examples and simple languages.

use crate::{Code, ILexer, ParseError, Token, TokenImpl};
use regex::bytes::Regex;
use std::collections::VecDeque;

/// A lexeme matching an anchored regular expression and tagging the matched
/// span with a token type.
///
/// Patterns must be anchored with `^`; a match anywhere else in the remaining
/// input is ignored.
pub struct Pattern<TL> {
    token: TL,
    regexp: Regex,
}

impl<TL: TokenImpl> Pattern<TL> {
    /// Create a new [Pattern].
    /// ## Arguments
    /// * `token` - The token type assigned to matched spans.
    /// * `pattern` - An anchored regular expression.
    pub fn new(token: TL, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            token,
            regexp: Regex::new(pattern)?,
        })
    }
}

/// Splits input text into a token stream by running its lexemes sequentially at
/// each position; the first lexeme with a non-empty anchored match wins.
pub struct Tokenizer<TL> {
    lexemes: Vec<Pattern<TL>>,
    skip: Vec<TL>,
}

impl<TL: TokenImpl> Tokenizer<TL> {
    pub fn new(lexemes: Vec<Pattern<TL>>) -> Self {
        Self {
            lexemes,
            skip: Vec::new(),
        }
    }

    /// Drop tokens of the given type from the produced stream. Useful for
    /// whitespace and other tokens without grammatical meaning.
    pub fn skip(mut self, token: TL) -> Self {
        self.skip.push(token);
        self
    }

    pub fn tokenize(&self, code: &Code) -> Result<Vec<Token<TL>>, ParseError<TL>> {
        let mut tokens = Vec::new();
        let mut pointer = 0;

        while pointer < code.value.len() {
            let mut matched: Option<Token<TL>> = None;

            for lexeme in &self.lexemes {
                if let Some(m) = lexeme.regexp.find(&code.value[pointer..]) {
                    if m.start() != 0 || m.end() == 0 {
                        continue;
                    }

                    matched = Some(Token::new(lexeme.token, pointer, pointer + m.end()));
                    break;
                }
            }

            match matched {
                Some(t) => {
                    pointer = t.end;
                    if !self.skip.contains(&t.token) {
                        tokens.push(t);
                    }
                }
                None => {
                    return Err(ParseError::Lexical {
                        pointer,
                        message: format!(
                            "unrecognized input at {}",
                            code.obtain_position(pointer)
                        ),
                    });
                }
            }
        }

        Ok(tokens)
    }
}

/// An [ILexer] over an already collected token stream.
pub struct TokenIter<TL> {
    tokens: VecDeque<Token<TL>>,
}

impl<TL: TokenImpl> TokenIter<TL> {
    pub fn new(tokens: Vec<Token<TL>>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl<TL: TokenImpl> ILexer<TL> for TokenIter<TL> {
    fn next(&mut self) -> Result<Option<Token<TL>>, ParseError<TL>> {
        Ok(self.tokens.pop_front())
    }
}
