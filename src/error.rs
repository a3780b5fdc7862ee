//! Rejection kinds surfaced by the matching kernel.
//!
//! Every error is returned to the caller; the kernel never retries or logs.
//! `PoolExhausted` and `LevelOverflow` can occur after trades were already
//! executed against the incoming order; those trades stand, and the variants
//! carry the filled quantity so the caller sees the partial acceptance.

use thiserror::Error;

/// A rejected kernel operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("price index {idx} outside the ladder [0, {levels})")]
    InvalidPrice { idx: i32, levels: i32 },

    #[error("quantity {qty} must be positive")]
    InvalidQuantity { qty: i64 },

    #[error("order pool exhausted while resting residual ({filled} filled)")]
    PoolExhausted { filled: i64 },

    #[error("price level full while resting residual ({filled} filled)")]
    LevelOverflow { filled: i64 },

    #[error("fill-or-kill unfillable: {available} available of {requested}")]
    KilledByFok { available: i64, requested: i64 },
}
