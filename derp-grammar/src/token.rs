use std::fmt::{Debug, Display, Formatter};

/// A single symbol of the alphabet, or one of the two sentinels.
///
/// Sentinels are told apart from user values by their tag: `Token::Epsilon` is never
/// equal to any `Token::Value`, whatever the value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token<T> {
    /// Matches the empty sequence.
    Epsilon,
    /// Matches nothing, ever.
    Null,
    Value(T),
}

impl<T: PartialEq> Token<T> {
    /// Derivative of a one-token language.
    ///
    /// A terminal consumes exactly one matching token, leaving the empty string;
    /// anything else leaves nothing.
    pub fn derive(&self, value: &T) -> Token<T> {
        match self {
            Token::Value(v) if v == value => Token::Epsilon,
            _ => Token::Null,
        }
    }
}

impl<T> Token<T> {
    pub fn is_nullable(&self) -> bool {
        self.is_epsilon()
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Token::Epsilon)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Token::Null)
    }

}

impl<T> From<T> for Token<T> {
    fn from(value: T) -> Self {
        Token::Value(value)
    }
}

impl<T: Debug> Display for Token<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Epsilon => write!(f, "e"),
            Token::Null => write!(f, "0"),
            Token::Value(v) => write!(f, "{v:?}"),
        }
    }
}
