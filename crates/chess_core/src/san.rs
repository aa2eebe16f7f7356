//! Standard algebraic notation (SAN) move resolution.
//!
//! SAN only names the moving piece, the destination and as much of the origin
//! as needed to disambiguate, so every move is resolved against the legal
//! moves of the position it is played in.

use crate::{board::Position, error::MoveParseError, movegen::legal_moves, types::*};

/// Resolve SAN text such as `Nbd7`, `exd5`, `e8=Q+` or `O-O-O` to a legal move.
pub fn parse_san(pos: &Position, text: &str) -> Result<Move, MoveParseError> {
    let syntax = || MoveParseError::Syntax(text.to_string());
    let san = text.trim().trim_end_matches(['+', '#', '!', '?']);
    if san.is_empty() || !san.is_ascii() {
        return Err(syntax());
    }

    let legal = legal_moves(pos);

    let castle_to = match san {
        "O-O" | "0-0" => Some(2i8),
        "O-O-O" | "0-0-0" => Some(-2i8),
        _ => None,
    };
    if let Some(delta) = castle_to {
        return legal
            .into_iter()
            .find(|m| m.is_castle && file_of(m.to) - file_of(m.from) == delta)
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()));
    }

    let (body, promo) = split_promotion(san).ok_or_else(syntax)?;

    let mut chars = body.chars();
    let kind = match chars.clone().next() {
        Some(ch) if ch.is_ascii_uppercase() => {
            chars.next();
            PieceKind::from_letter(ch).ok_or_else(syntax)?
        }
        Some(_) => PieceKind::Pawn,
        None => return Err(syntax()),
    };

    let rest: Vec<char> = chars.filter(|&c| c != 'x' && c != '-').collect();
    if rest.len() < 2 || rest.len() > 4 {
        return Err(syntax());
    }
    let (hint, dest) = rest.split_at(rest.len() - 2);
    let dest: String = dest.iter().collect();
    let to = coord_to_sq(&dest).ok_or_else(syntax)?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in hint {
        match c {
            'a'..='h' => from_file = Some((c as u8 - b'a') as i8),
            '1'..='8' => from_rank = Some((c as u8 - b'1') as i8),
            _ => return Err(syntax()),
        }
    }

    let mut candidates = legal.into_iter().filter(|m| {
        m.to == to
            && m.promo == promo
            && pos.piece_at(m.from).map(|p| p.kind) == Some(kind)
            && from_file.is_none_or(|f| file_of(m.from) == f)
            && from_rank.is_none_or(|r| rank_of(m.from) == r)
    });

    match (candidates.next(), candidates.next()) {
        (Some(mv), None) => Ok(mv),
        (None, _) => Err(MoveParseError::Illegal(text.to_string())),
        (Some(_), Some(_)) => Err(MoveParseError::Ambiguous(text.to_string())),
    }
}

/// Split off a promotion suffix: `e8=Q` and `e8Q` both promote to a queen.
fn split_promotion(san: &str) -> Option<(&str, Option<PieceKind>)> {
    if let Some((body, piece)) = san.split_once('=') {
        let mut it = piece.chars();
        let kind = PieceKind::from_letter(it.next()?)?;
        if it.next().is_some() {
            return None;
        }
        return Some((body, Some(kind)));
    }

    let bytes = san.as_bytes();
    if bytes.len() >= 3 {
        let last = bytes[bytes.len() - 1] as char;
        let before = bytes[bytes.len() - 2] as char;
        if matches!(last, 'N' | 'B' | 'R' | 'Q') && matches!(before, '1' | '8') {
            return Some((&san[..san.len() - 1], PieceKind::from_letter(last)));
        }
    }
    Some((san, None))
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod san_tests;
