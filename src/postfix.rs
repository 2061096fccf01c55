use crate::{
    error::{Error, EvalErrorKind, Result},
    token::{Token, TokenKind},
};
use log::trace;

/// How an incoming operator treats operators already on the stack when it
/// does not outrank the one on top.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RewriteMode {
    /// Empty the whole stack into the output, brackets included. A bracket
    /// that escapes this way makes the rewrite fail.
    FlushAll,
    /// Textbook shunting-yard for left-associative operators: only pop
    /// operators of higher or equal precedence, and never past a bracket.
    Standard,
}

impl Default for RewriteMode {
    fn default() -> Self {
        RewriteMode::FlushAll
    }
}

/// Reorders an infix sequence into postfix order.
pub fn to_postfix(tokens: &[Token], mode: RewriteMode) -> Result<Vec<Token>> {
    let output = rewrite(tokens, mode)?;
    check_no_brackets(&output)?;
    Ok(output)
}

/// The reordering step on its own. Brackets that leak out of the stack are
/// left in the returned sequence.
pub fn rewrite(tokens: &[Token], mode: RewriteMode) -> Result<Vec<Token>> {
    Rewriter::new(mode).rewrite(tokens)
}

pub fn check_no_brackets(tokens: &[Token]) -> Result<()> {
    if tokens.iter().any(|t| t.kind.is_bracket()) {
        trace!("bracket survived the rewrite");
        return Err(Error::evaluation(EvalErrorKind::BracketInOutput));
    }
    Ok(())
}

struct Rewriter {
    mode: RewriteMode,
    output: Vec<Token>,
    stack: Vec<Token>,
}

impl Rewriter {
    fn new(mode: RewriteMode) -> Self {
        Rewriter { mode, output: Vec::new(), stack: Vec::new() }
    }

    fn rewrite(mut self, tokens: &[Token]) -> Result<Vec<Token>> {
        use TokenKind::*;
        for token in tokens.iter().cloned() {
            match token.kind {
                Number => self.output.push(token),
                Add | Sub | Mul | Div => self.operator(token),
                OpenBracket => self.stack.push(token),
                CloseBracket => self.close_bracket(),
                Unknown => return Err(Error::evaluation(EvalErrorKind::UnexpectedToken)),
            }
        }

        while let Some(top) = self.stack.pop() {
            self.output.push(top);
        }
        Ok(self.output)
    }

    fn operator(&mut self, token: Token) {
        match self.mode {
            RewriteMode::FlushAll => self.flush_all_before(&token),
            RewriteMode::Standard => self.pop_outranking(&token),
        }
        self.stack.push(token);
    }

    fn flush_all_before(&mut self, token: &Token) {
        let top = match self.stack.last() {
            Some(top) if !top.kind.is_bracket() => top,
            _ => return,
        };

        if token.kind.precedence() > top.kind.precedence() {
            return;
        }

        while let Some(top) = self.stack.pop() {
            self.output.push(top);
        }
    }

    fn pop_outranking(&mut self, token: &Token) {
        let outranks = |top: &Token| match (top.kind.precedence(), token.kind.precedence()) {
            (Some(top), Some(current)) => top >= current,
            _ => false,
        };

        while self.stack.last().map_or(false, |top| outranks(top)) {
            if let Some(top) = self.stack.pop() {
                self.output.push(top);
            }
        }
    }

    fn close_bracket(&mut self) {
        while let Some(top) = self.stack.pop() {
            match top.kind {
                TokenKind::OpenBracket => break,
                kind if kind.is_bracket() => continue,
                _ => self.output.push(top),
            }
        }
    }
}
