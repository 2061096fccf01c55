use std::result;
use std::fmt::{self, Display};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StructuralErrorKind {
    UnknownToken,
    UnbalancedBrackets,
    OperandCount,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EvalErrorKind {
    UnexpectedToken,
    BracketInOutput,
    StackUnderflow,
    StackImbalance,
}

#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    Lexical { position: usize, character: char },
    Structural { kind: StructuralErrorKind },
    Evaluation { kind: EvalErrorKind },
    Io(std::io::Error),
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn lexical(position: usize, character: char) -> Error {
        let kind = ErrorKind::Lexical { position, character };
        Error { kind, message: format!("Unexpected character '{}'", character) }
    }

    pub fn structural(kind: StructuralErrorKind) -> Error {
        use StructuralErrorKind::*;
        let message = match kind {
            UnknownToken => "Unrecognized token in expression.",
            UnbalancedBrackets => "Opening and closing brackets do not match up.",
            OperandCount => "Expected exactly one more number than operators.",
        };
        Error { kind: ErrorKind::Structural { kind }, message: message.into() }
    }

    pub fn evaluation(kind: EvalErrorKind) -> Error {
        use EvalErrorKind::*;
        let message = match kind {
            UnexpectedToken => "Unexpected token while evaluating.",
            BracketInOutput => "Brackets left over after reordering to postfix.",
            StackUnderflow => "Operator is missing an operand.",
            StackImbalance => "Expression did not reduce to a single value.",
        };
        Error { kind: ErrorKind::Evaluation { kind }, message: message.into() }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Lexical and structural errors both come out of the tokenizer.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Lexical { .. } | ErrorKind::Structural { .. }
        )
    }

    pub fn is_evaluation_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Evaluation { .. })
    }

    // Needed because io::Error isn't Clone, and both stages hand errors
    // back out of shared references.
    pub(crate) fn duplicate(&self) -> Error {
        let kind = match &self.kind {
            ErrorKind::Lexical { position, character } => {
                ErrorKind::Lexical { position: *position, character: *character }
            },
            ErrorKind::Structural { kind } => ErrorKind::Structural { kind: *kind },
            ErrorKind::Evaluation { kind } => ErrorKind::Evaluation { kind: *kind },
            ErrorKind::Io(e) => ErrorKind::Io(std::io::Error::new(e.kind(), e.to_string())),
        };
        Error { kind, message: self.message.clone() }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ErrorKind::Lexical { position, .. } => {
                write!(f, "[col {}] Error: {}", position + 1, self.message)
            },
            _ => write!(f, "Error: {}", self.message),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        use std::io::ErrorKind::*;
        std::io::Error::new(Other, e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        let message = e.to_string();
        Error { kind: ErrorKind::Io(e), message }
    }
}
