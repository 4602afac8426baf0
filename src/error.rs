use crate::{GrammarError, ParseError};
use std::fmt::{Debug, Display, Formatter};

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UnspecifiedProduction(name) => {
                write!(f, "unspecified production: {}", name)
            }
            GrammarError::OptionalContainingSelf(name) => {
                write!(f, "optional containing self: {}", name)
            }
            GrammarError::SequenceContainingSelf(name) => {
                write!(f, "sequence containing self: {}", name)
            }
            GrammarError::GroupWithoutItems(name) => {
                write!(f, "group without items: {}", name)
            }
            GrammarError::UnionWithoutElements(name) => {
                write!(f, "union without elements: {}", name)
            }
        }
    }
}

impl<TL: Debug> Display for ParseError<TL> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidRootProduction => write!(f, "invalid root production"),
            ParseError::UnexpectedEof => write!(f, "unexpected end of file"),
            ParseError::UnexpectedToken { scope, token } => {
                write!(
                    f,
                    "unexpected token {:?} at {}..{} in {}",
                    token.token, token.start, token.end, scope
                )
            }
            ParseError::Lexical { pointer, message } => {
                write!(f, "{} at byte {}", message, pointer)
            }
            ParseError::Grammar(err) => write!(f, "{}", err),
        }
    }
}

impl<TL> From<GrammarError> for ParseError<TL> {
    fn from(err: GrammarError) -> Self {
        ParseError::Grammar(err)
    }
}
