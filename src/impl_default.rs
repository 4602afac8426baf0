use crate::TokenImpl;

impl TokenImpl for i8 {
    fn eof() -> Self {
        Self::MAX
    }
    fn no_token() -> Self {
        Self::MIN
    }
}
impl TokenImpl for i16 {
    fn eof() -> Self {
        Self::MAX
    }
    fn no_token() -> Self {
        Self::MIN
    }
}
impl TokenImpl for isize {
    fn eof() -> Self {
        Self::MAX
    }
    fn no_token() -> Self {
        Self::MIN
    }
}
