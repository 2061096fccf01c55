use crate::{
    error::{Error, Result, StructuralErrorKind},
    token::{Token, TokenKind},
};
use log::{debug, trace};
use peekmore::{PeekMore, PeekMoreIterator};
use phf::phf_map;
use std::{iter::Enumerate, mem, str::Chars};

static SYMBOLS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Add,
    '-' => TokenKind::Sub,
    '*' => TokenKind::Mul,
    '/' => TokenKind::Div,
    '(' => TokenKind::OpenBracket,
    ')' => TokenKind::CloseBracket,
};

/// Turns one line of source text into a token sequence and checks that
/// the sequence is at least plausible as a binary infix expression.
pub struct Tokenizer {
    src: String,
    tokens: Vec<Token>,
    error: Option<Error>,
    parsed: bool,
}

impl Tokenizer {
    pub fn new<S: Into<String>>(src: S) -> Self {
        Self {
            src: src.into(),
            tokens: Vec::new(),
            error: None,
            parsed: false,
        }
    }

    /// Scans the whole source once. Calling this again hands back the
    /// first outcome without rescanning.
    pub fn parse(&mut self) -> Result<()> {
        if !self.parsed {
            self.parsed = true;
            let outcome = Lexer::new(&self.src)
                .collect::<Result<Vec<Token>>>()
                .and_then(|tokens| verify(&tokens).map(|()| tokens));

            match outcome {
                Ok(tokens) => self.tokens = tokens,
                Err(e) => {
                    debug!("rejected {:?}: {}", self.src, e);
                    self.error = Some(e);
                },
            }
        }

        match &self.error {
            Some(e) => Err(e.duplicate()),
            None => Ok(()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.src
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.clone()
    }
}

/// Counts tokens by kind. Brackets have to pair up, and there has to be
/// exactly one more number than operators. Order is never looked at.
pub fn verify(tokens: &[Token]) -> Result<()> {
    let mut numbers = 0usize;
    let mut operators = 0usize;
    let mut open_brackets = 0usize;
    let mut close_brackets = 0usize;

    use TokenKind::*;
    for token in tokens {
        match token.kind {
            Number => numbers += 1,
            OpenBracket => open_brackets += 1,
            CloseBracket => close_brackets += 1,
            Add | Sub | Mul | Div => operators += 1,
            Unknown => return Err(Error::structural(StructuralErrorKind::UnknownToken)),
        }
    }

    if open_brackets != close_brackets {
        return Err(Error::structural(StructuralErrorKind::UnbalancedBrackets));
    }
    if numbers != operators + 1 {
        return Err(Error::structural(StructuralErrorKind::OperandCount));
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Pending {
    Empty,
    Number(String),
}

impl Pending {
    fn push(&mut self, c: char) {
        match self {
            Pending::Empty => *self = Pending::Number(c.to_string()),
            Pending::Number(text) => text.push(c),
        }
    }

    fn finish(&mut self) -> Option<Token> {
        match mem::replace(self, Pending::Empty) {
            Pending::Empty => None,
            Pending::Number(text) => Some(Token::number(text)),
        }
    }
}

struct Lexer<'a> {
    src: PeekMoreIterator<Enumerate<Chars<'a>>>,
    pending: Pending,
    halted: bool,
}

impl <'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        if self.halted {
            return None;
        }

        let next = self.next_token();
        if let Some(Ok(token)) = &next {
            trace!("token {:?} {:?}", token.kind, token.text);
        }
        next
    }
}

impl <'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.chars().enumerate().peekmore(),
            pending: Pending::Empty,
            halted: false,
        }
    }

    fn next_token(&mut self) -> Option<Result<Token>> {
        while let Some(&(position, c)) = self.src.peek() {
            if is_space(c) {
                self.src.next();
                continue;
            }

            if is_value(c) {
                self.src.next();
                self.pending.push(c);
                continue;
            }

            if let Some(kind) = SYMBOLS.get(&c) {
                // the symbol stays in the stream until the number before it is out
                if let Some(number) = self.pending.finish() {
                    return Some(Ok(number));
                }
                self.src.next();
                return Some(Ok(Token::symbol(*kind, c)));
            }

            self.pending = Pending::Empty;
            self.halted = true;
            return Some(Err(Error::lexical(position, c)));
        }

        self.pending.finish().map(Ok)
    }
}

/// ASCII whitespace including vertical tab. Other Unicode spaces are not
/// skipped.
pub fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

fn is_value(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}
