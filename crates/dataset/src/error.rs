use chess_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// Missing or inconsistent metadata, or moves that cannot be replayed.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// Forfeited, abandoned or unfinished games.
    #[error("incomplete game: {0}")]
    IncompleteGame(String),
    #[error("PGN syntax error on line {line}: {message}")]
    Pgn { line: usize, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
