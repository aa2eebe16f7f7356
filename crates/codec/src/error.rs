use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Action codes live in `[0, 7 * 64 * 64)`.
    #[error("invalid action code {0}")]
    InvalidActionCode(u32),
    #[error("square {0} is off the board")]
    SquareOutOfRange(u8),
    #[error("invalid promotion code {0}")]
    InvalidPromotionCode(u8),
    #[error("expected a distribution over {expected} squares, got {actual}")]
    DistributionShape { expected: usize, actual: usize },
    #[error("invalid compact state key: {0}")]
    CompactKey(String),
}
