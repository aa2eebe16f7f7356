use crate::{board::Position, error::MoveParseError, movegen::legal_moves, types::*};

/// Long algebraic (UCI) text for a move, e.g. `e2e4` or `e7e8q`.
pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.letter().to_ascii_lowercase());
    }
    s
}

/// Resolve UCI move text against the legal moves of `pos`, so that castle and
/// en-passant flags come out right.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Result<Move, MoveParseError> {
    let syntax = || MoveParseError::Syntax(txt.to_string());
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return Err(syntax());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(syntax)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(syntax)?;
    let promo = match txt[4..].chars().next() {
        Some(ch) => Some(PieceKind::from_letter(ch).ok_or_else(syntax)?),
        None => None,
    };

    legal_moves(pos)
        .into_iter()
        .find(|m| m.from == from && m.to == to && m.promo == promo)
        .ok_or_else(|| MoveParseError::Illegal(txt.to_string()))
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
