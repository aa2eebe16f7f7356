use thiserror::Error;

/// Errors raised while parsing Forsyth-Edwards Notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 FEN fields, got {0}")]
    MissingFields(usize),
    #[error("expected 8 ranks in FEN board, got {0}")]
    RankCount(usize),
    #[error("invalid piece character '{0}' in FEN")]
    PieceChar(char),
    #[error("rank {0} of FEN board does not cover exactly 8 files")]
    RankWidth(usize),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling character '{0}'")]
    Castling(char),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move counter '{0}'")]
    Counter(String),
}

/// Errors raised while resolving move text (UCI or SAN) against a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("cannot parse move text '{0}'")]
    Syntax(String),
    #[error("no legal move matches '{0}'")]
    Illegal(String),
    #[error("move '{0}' is ambiguous")]
    Ambiguous(String),
}
