use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) text: String,
    pub(crate) value: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Unknown,
    Number,
    OpenBracket, CloseBracket,
    Add, Sub, Mul, Div,
}

impl Token {
    pub fn number<S: Into<String>>(text: S) -> Token {
        let text = text.into();
        let value = parse_leading_decimal(&text);
        Token { kind: TokenKind::Number, text, value }
    }

    /// Builds a single-character operator or bracket token.
    pub fn symbol(kind: TokenKind, c: char) -> Token {
        Token { kind, text: c.to_string(), value: 0.0 }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl TokenKind {
    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(self, Add | Sub | Mul | Div)
    }

    pub fn is_bracket(self) -> bool {
        matches!(self, TokenKind::OpenBracket | TokenKind::CloseBracket)
    }

    /// `Mul`/`Div` bind tighter than `Add`/`Sub`. Anything else has no
    /// precedence at all.
    pub fn precedence(self) -> Option<u8> {
        use TokenKind::*;
        match self {
            Add | Sub => Some(10),
            Mul | Div => Some(20),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Reads the longest `digits [. digits]` prefix of `text`, the way C's
/// `atof` does. An empty prefix is zero.
pub(crate) fn parse_leading_decimal(text: &str) -> f64 {
    let mut seen_point = false;
    let end = text
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_point {
                seen_point = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map(|(i, _)| i)
        .unwrap_or_else(|| text.len());

    text[..end].parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_number() {
        assert_eq!(42.0, parse_leading_decimal("42"));
    }

    #[test]
    fn fraction_without_leading_digits() {
        assert_eq!(0.5, parse_leading_decimal(".5"));
        assert_eq!(5.0, parse_leading_decimal("5."));
    }

    #[test]
    fn second_decimal_point_truncates() {
        assert_eq!(1.2, parse_leading_decimal("1.2.3"));
    }

    #[test]
    fn lone_points_are_zero() {
        assert_eq!(0.0, parse_leading_decimal("."));
        assert_eq!(0.0, parse_leading_decimal("..5"));
        assert_eq!(0.0, parse_leading_decimal(""));
    }

    #[test]
    fn precedence_table() {
        assert!(TokenKind::Mul.precedence() > TokenKind::Add.precedence());
        assert_eq!(TokenKind::Div.precedence(), TokenKind::Mul.precedence());
        assert_eq!(None, TokenKind::OpenBracket.precedence());
    }
}
