pub mod error;
pub mod evaluator;
pub mod logging;
pub mod postfix;
pub mod printer;
pub mod token;
pub mod tokenizer;

pub use crate::{
    error::{Error, ErrorKind, Result},
    evaluator::Evaluator,
    postfix::RewriteMode,
    tokenizer::Tokenizer,
};

/// Tokenizes and evaluates one line with the default rewrite mode.
pub fn evaluate(line: &str) -> Result<f64> {
    evaluate_with(line, RewriteMode::default())
}

pub fn evaluate_with(line: &str, mode: RewriteMode) -> Result<f64> {
    let mut tokenizer = Tokenizer::new(line);
    tokenizer.parse()?;
    Evaluator::with_mode(tokenizer.tokens(), mode).solve()
}
