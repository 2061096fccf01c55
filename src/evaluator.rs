use crate::{
    error::{Error, EvalErrorKind, Result},
    postfix::{self, RewriteMode},
    printer,
    token::{Token, TokenKind},
    tokenizer::Tokenizer,
};
use log::{debug, trace};

/// Owns a copy of an infix token sequence and reduces it to a number.
pub struct Evaluator {
    tokens: Vec<Token>,
    mode: RewriteMode,
    error: Option<Error>,
    result: Option<f64>,
}

impl Evaluator {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_mode(tokens, RewriteMode::default())
    }

    pub fn with_mode(tokens: Vec<Token>, mode: RewriteMode) -> Self {
        Evaluator {
            tokens,
            mode,
            error: None,
            result: None,
        }
    }

    /// Rewrites the owned tokens into postfix order, then evaluates them.
    /// Only the first call does any work; later calls repeat its outcome.
    pub fn solve(&mut self) -> Result<f64> {
        if let Some(e) = &self.error {
            return Err(e.duplicate());
        }
        if let Some(value) = self.result {
            return Ok(value);
        }

        match self.rewrite_and_evaluate() {
            Ok(value) => {
                self.result = Some(value);
                Ok(value)
            },
            Err(e) => {
                debug!("evaluation failed: {}", e);
                let reported = e.duplicate();
                self.error = Some(e);
                Err(reported)
            },
        }
    }

    fn rewrite_and_evaluate(&mut self) -> Result<f64> {
        self.tokens = postfix::rewrite(&self.tokens, self.mode)?;
        debug!("postfix: {}", printer::print(&self.tokens));
        postfix::check_no_brackets(&self.tokens)?;
        evaluate_postfix(&self.tokens)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    /// The infix tokens before `solve`, their postfix order after it.
    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.clone()
    }
}

impl From<&Tokenizer> for Evaluator {
    fn from(tokenizer: &Tokenizer) -> Self {
        Evaluator::new(tokenizer.tokens())
    }
}

/// Runs a postfix sequence on an operand stack. The first pop is the right
/// hand operand.
pub fn evaluate_postfix(tokens: &[Token]) -> Result<f64> {
    let mut operands: Vec<f64> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.kind {
            TokenKind::Number => operands.push(token.value),
            kind if kind.is_operator() => {
                let right = pop_operand(&mut operands)?;
                let left = pop_operand(&mut operands)?;
                let value = apply(kind, left, right)?;
                trace!("{} {} {} = {}", left, token.text, right, value);
                operands.push(value);
            },
            _ => return Err(Error::evaluation(EvalErrorKind::UnexpectedToken)),
        }
    }

    match operands.as_slice() {
        [value] => Ok(*value),
        _ => Err(Error::evaluation(EvalErrorKind::StackImbalance)),
    }
}

fn pop_operand(operands: &mut Vec<f64>) -> Result<f64> {
    operands.pop().ok_or_else(|| Error::evaluation(EvalErrorKind::StackUnderflow))
}

// Division follows IEEE 754, so dividing by zero yields an infinity or NaN.
fn apply(op: TokenKind, left: f64, right: f64) -> Result<f64> {
    use TokenKind::*;
    match op {
        Add => Ok(left + right),
        Sub => Ok(left - right),
        Mul => Ok(left * right),
        Div => Ok(left / right),
        _ => Err(Error::evaluation(EvalErrorKind::UnexpectedToken)),
    }
}
