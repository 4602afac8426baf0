use crate::{Token, TokenImpl};
use std::fmt::{Debug, Display, Formatter};

impl<TL: Debug> Display for Token<TL> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("")
            .field(&self.token)
            .field(&self.start)
            .field(&self.end)
            .finish()
    }
}

impl<TL> Token<TL> {
    pub fn new(token: TL, start: usize, end: usize) -> Self {
        Self { token, start, end }
    }
}

impl<TL: TokenImpl> Token<TL> {
    /// The end-of-file sentinel, fed to the root parser exactly once.
    pub fn eof(pointer: usize) -> Self {
        Token::new(TL::eof(), pointer, pointer)
    }

    /// The placeholder carried by nodes which cover no input.
    pub fn none() -> Self {
        Token::new(TL::no_token(), 0, 0)
    }

    pub fn is_eof(&self) -> bool {
        self.token == TL::eof()
    }
}
