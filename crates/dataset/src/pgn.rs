//! PGN game records
//!
//! Only the mainline is kept. Variations, NAGs and move numbers are skipped;
//! the comment that follows the last mainline move is kept because it is where
//! servers record forfeits.
//!
//! A syntax error never aborts the file: the record it occurs in is kept but
//! flagged as malformed, and lexing resumes on the next line.

use chess_core::{parse_san, Color, Move, Position};
use tracing::debug;

use crate::error::DatasetError;
use crate::outcome::GameOutcome;

/// Words in a final comment or `Termination` tag that mark a game as not
/// played to its end.
const INCOMPLETE_MARKERS: [&str; 4] = ["forfeit", "abandon", "disconnect", "unterminated"];

/// One game from a PGN file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    /// Tag pairs in file order
    pub headers: Vec<(String, String)>,
    /// Mainline moves in SAN
    pub moves: Vec<String>,
    /// Comment after the last mainline move
    pub final_comment: Option<String>,
    /// Game termination marker from the movetext
    pub termination: Option<String>,
    /// First syntax error met while reading this record
    pub malformed: Option<String>,
}

/// Positions reached while replaying a record.
#[derive(Debug, Clone)]
pub struct Replay {
    /// The position before each move, paired with the move played
    pub plies: Vec<(Position, Move)>,
    /// Position after the last replayed move
    pub final_position: Position,
}

impl GameRecord {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        format!(
            "{} - {} ({})",
            self.header("White").unwrap_or("?"),
            self.header("Black").unwrap_or("?"),
            self.header("Date").unwrap_or("?"),
        )
    }

    /// `Err` when the record could not be read cleanly.
    pub fn check_syntax(&self) -> Result<(), DatasetError> {
        match &self.malformed {
            Some(reason) => Err(DatasetError::MalformedRecord(reason.clone())),
            None => Ok(()),
        }
    }

    /// Number of plies in the game.
    ///
    /// Read from the `PlyCount` tag. Without it the record is malformed unless
    /// `infer` is set, in which case the parsed mainline length is used. A
    /// mainline shorter than the declared count is malformed.
    pub fn ply_count(&self, infer: bool) -> Result<usize, DatasetError> {
        let declared = match self.header("PlyCount") {
            Some(text) => text.trim().parse::<usize>().map_err(|_| {
                DatasetError::MalformedRecord(format!("PlyCount '{text}' is not a number"))
            })?,
            None if infer => self.moves.len(),
            None => {
                return Err(DatasetError::MalformedRecord(
                    "missing PlyCount tag".to_string(),
                ))
            }
        };
        if self.moves.len() < declared {
            return Err(DatasetError::MalformedRecord(format!(
                "truncated: {} of {declared} plies present",
                self.moves.len()
            )));
        }
        Ok(declared)
    }

    /// Result from the `Result` tag, or the movetext terminator when the tag is
    /// missing.
    pub fn outcome(&self) -> Result<GameOutcome, DatasetError> {
        match self.header("Result").or(self.termination.as_deref()) {
            Some(result) => GameOutcome::from_result(result),
            None => Err(DatasetError::MalformedRecord("missing result".to_string())),
        }
    }

    /// False when the final comment or the `Termination` tag reports a
    /// forfeit or abandonment.
    pub fn is_complete(&self) -> bool {
        let mentions_marker = |text: &str| {
            let lower = text.to_lowercase();
            INCOMPLETE_MARKERS.iter().any(|m| lower.contains(m))
        };
        !(self.final_comment.as_deref().is_some_and(mentions_marker)
            || self.header("Termination").is_some_and(mentions_marker))
    }

    /// Start position: the `FEN` tag when `SetUp` allows it, else the standard
    /// start.
    pub fn start_position(&self) -> Result<Position, DatasetError> {
        match (self.header("FEN"), self.header("SetUp")) {
            (Some(fen), setup) if setup != Some("0") => Position::from_fen(fen)
                .map_err(|e| DatasetError::MalformedRecord(format!("bad FEN tag: {e}"))),
            _ => Ok(Position::startpos()),
        }
    }

    /// Side to move in the start position.
    pub fn first_mover(&self) -> Result<Color, DatasetError> {
        Ok(self.start_position()?.side_to_move)
    }

    /// Replay the first `plies` mainline moves.
    pub fn replay_to(&self, plies: usize) -> Result<Replay, DatasetError> {
        let mut pos = self.start_position()?;
        let mut out = Vec::with_capacity(plies);
        for (i, san) in self.moves.iter().take(plies).enumerate() {
            let mv = parse_san(&pos, san).map_err(|e| {
                DatasetError::MalformedRecord(format!("ply {}: {e}", i + 1))
            })?;
            out.push((pos.clone(), mv));
            pos.make_move(mv);
        }
        Ok(Replay {
            plies: out,
            final_position: pos,
        })
    }

    pub fn replay(&self) -> Result<Replay, DatasetError> {
        self.replay_to(self.moves.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Tag(String, String),
    Comment(String),
    OpenVariation,
    CloseVariation,
    Nag,
    Symbol(String),
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            at_line_start: true,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.at_line_start = true;
        } else {
            self.at_line_start = false;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> DatasetError {
        DatasetError::Pgn {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Drop the rest of the current line after an error.
    fn resync(&mut self) {
        if !self.at_line_start {
            self.skip_line();
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, DatasetError> {
        loop {
            let line_start = self.at_line_start;
            let Some(&c) = self.chars.peek() else {
                return Ok(None);
            };
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '%' if line_start => self.skip_line(),
                ';' => self.skip_line(),
                '{' => {
                    self.bump();
                    return self.comment().map(Some);
                }
                '[' => {
                    self.bump();
                    return self.tag().map(Some);
                }
                '(' => {
                    self.bump();
                    return Ok(Some(Token::OpenVariation));
                }
                ')' => {
                    self.bump();
                    return Ok(Some(Token::CloseVariation));
                }
                '$' => {
                    self.bump();
                    while self.chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                    return Ok(Some(Token::Nag));
                }
                '}' | ']' => {
                    self.bump();
                    return Err(self.error(format!("unexpected '{c}'")));
                }
                _ => return Ok(Some(Token::Symbol(self.symbol()))),
            }
        }
    }

    fn comment(&mut self) -> Result<Token, DatasetError> {
        let start = self.line;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('}') => return Ok(Token::Comment(text.trim().to_string())),
                Some(c) => text.push(c),
                None => {
                    return Err(DatasetError::Pgn {
                        line: start,
                        message: "unterminated comment".to_string(),
                    })
                }
            }
        }
    }

    fn tag(&mut self) -> Result<Token, DatasetError> {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == '"' || c == ']' {
                break;
            }
            name.push(c);
            self.bump();
        }
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
        if self.bump() != Some('"') {
            return Err(self.error(format!("tag '{name}' has no quoted value")));
        }
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated tag value")),
                },
                Some('"') => break,
                Some('\n') | None => return Err(self.error("unterminated tag value")),
                Some(c) => value.push(c),
            }
        }
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.bump();
        }
        if self.bump() != Some(']') {
            return Err(self.error(format!("tag '{name}' is not closed")));
        }
        if name.is_empty() {
            return Err(self.error("tag without a name"));
        }
        Ok(Token::Tag(name, value))
    }

    fn symbol(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || "{}()[];$".contains(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }
}

fn is_termination(symbol: &str) -> bool {
    matches!(symbol, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// Strip a leading move number (`12.`, `12...`). `None` when nothing is left.
fn strip_move_number(symbol: &str) -> Option<&str> {
    let digits = symbol.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || !symbol[digits..].starts_with('.') {
        return Some(symbol);
    }
    let rest = symbol[digits..].trim_start_matches('.');
    (!rest.is_empty()).then_some(rest)
}

/// Parse every game in a PGN text.
///
/// Records with syntax errors are returned with [`GameRecord::malformed`] set.
pub fn parse_pgn(text: &str) -> Vec<GameRecord> {
    let mut lexer = Lexer::new(text);
    let mut games = Vec::new();
    let mut current = GameRecord::default();
    let mut in_movetext = false;
    let mut depth = 0usize;

    loop {
        let token = match lexer.next_token() {
            Ok(Some(token)) => token,
            Ok(None) => break,
            Err(e) => {
                flag_malformed(&mut current, e);
                lexer.resync();
                continue;
            }
        };
        match token {
            Token::Tag(name, value) => {
                if in_movetext {
                    games.push(std::mem::take(&mut current));
                    in_movetext = false;
                    depth = 0;
                }
                current.headers.push((name, value));
            }
            Token::Comment(text) => {
                in_movetext = true;
                if depth == 0 {
                    current.final_comment = Some(text);
                }
            }
            Token::OpenVariation => {
                in_movetext = true;
                depth += 1;
            }
            Token::CloseVariation => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => flag_malformed(&mut current, lexer.error("unbalanced ')'")),
            },
            Token::Nag => {}
            Token::Symbol(symbol) => {
                in_movetext = true;
                if depth > 0 {
                    continue;
                }
                if is_termination(&symbol) {
                    current.termination = Some(symbol);
                    games.push(std::mem::take(&mut current));
                    in_movetext = false;
                    continue;
                }
                if let Some(san) = strip_move_number(&symbol) {
                    current.moves.push(san.to_string());
                    current.final_comment = None;
                }
            }
        }
    }

    if depth > 0 {
        flag_malformed(&mut current, lexer.error("unterminated variation"));
    }
    if in_movetext || !current.headers.is_empty() || current.malformed.is_some() {
        games.push(current);
    }
    games
}

fn flag_malformed(record: &mut GameRecord, error: DatasetError) {
    debug!(error = %error, "malformed record");
    record.malformed.get_or_insert_with(|| error.to_string());
}

#[cfg(test)]
#[path = "pgn_tests.rs"]
mod pgn_tests;
