//! JSON codec error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    /// Input bytes do not form a valid JSON document. The wrapped
    /// parse error carries line/column context.
    #[error("malformed JSON input: {0}")]
    Malformed(#[from] serde_json::Error),
    /// NaN and infinities have no JSON literal.
    #[error("number {0} is not finite and has no JSON representation")]
    NonFiniteNumber(f64),
}
