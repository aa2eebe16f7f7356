use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

/// Piece types in the conventional order pawn..king.
///
/// `idx()` is the zero-based array index, `ordinal()` the one-based number
/// used by action codes (pawn = 1, king = 6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn ordinal(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_ordinal(ordinal: u8) -> Option<PieceKind> {
        match ordinal {
            1..=6 => Some(Self::ALL[(ordinal - 1) as usize]),
            _ => None,
        }
    }

    /// Upper-case letter used by FEN and SAN (`P` for pawns).
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
    pub promo: Option<PieceKind>,
    pub is_en_passant: bool,
    pub is_castle: bool,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            is_en_passant: false,
            is_castle: false,
        }
    }

    pub fn with_promo(from: u8, to: u8, promo: PieceKind) -> Self {
        Self {
            promo: Some(promo),
            ..Self::new(from, to)
        }
    }
}

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq % 8) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    (sq / 8) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    let file = f - b'a';
    let rank = r - b'1';
    Some(rank * 8 + file)
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
