use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::movegen::{BISHOP_DIRECTIONS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRECTIONS};
use crate::types::*;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        wk: false,
        wq: false,
        bk: false,
        bq: false,
    };
}

/// Per-(color, kind) occupancy sets, kept in sync with the mailbox board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitboards {
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
}

impl Bitboards {
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.colors[color.idx()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    fn put(&mut self, sq: u8, pc: Piece) {
        self.pieces[pc.color.idx()][pc.kind.idx()].set(sq);
        self.colors[pc.color.idx()].set(sq);
    }

    fn remove(&mut self, sq: u8, pc: Piece) {
        self.pieces[pc.color.idx()][pc.kind.idx()].clear(sq);
        self.colors[pc.color.idx()].clear(sq);
    }
}

#[derive(Clone, Debug)]
pub struct Position {
    board: [Option<Piece>; 64],
    pub bitboards: Bitboards,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// State restored by [`Position::unmake_move`].
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    /// Where the captured piece stood; differs from the target on en passant
    pub capture_sq: Option<u8>,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved: Piece,
    pub rook_move: Option<(u8, u8)>,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    /// A board with no pieces, White to move and no castling rights.
    pub fn empty() -> Self {
        Position {
            board: [None; 64],
            bitboards: Bitboards::default(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn startpos() -> Self {
        let mut p = Position::empty();
        p.castling = CastlingRights {
            wk: true,
            wq: true,
            bk: true,
            bq: true,
        };

        for f in 0..8u8 {
            p.set_piece(8 + f, Some(Piece::new(Color::White, PieceKind::Pawn)));
            p.set_piece(48 + f, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.set_piece(f as u8, Some(Piece::new(Color::White, kind)));
            p.set_piece(56 + f as u8, Some(Piece::new(Color::Black, kind)));
        }
        p
    }

    /// Parse a position from Forsyth-Edwards Notation.
    ///
    /// The halfmove clock and fullmove number are optional and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let board_part = parts[0];
        let stm_part = parts[1];
        let castle_part = parts[2];
        let ep_part = parts[3];
        let halfmove_part = parts.get(4).copied().unwrap_or("0");
        let fullmove_part = parts.get(5).copied().unwrap_or("1");

        let mut pos = Position::empty();
        let ranks: Vec<&str> = board_part.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file: i8 = 0;
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = PieceKind::from_letter(ch).ok_or(FenError::PieceChar(ch))?;
                    let s = sq(file, rank).ok_or(FenError::RankWidth(rank as usize + 1))?;
                    pos.set_piece(s, Some(Piece::new(color, kind)));
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankWidth(rank as usize + 1));
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth(rank as usize + 1));
            }
        }

        pos.side_to_move = match stm_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenError::SideToMove(stm_part.to_string())),
        };

        if castle_part != "-" {
            for c in castle_part.chars() {
                match c {
                    'K' => pos.castling.wk = true,
                    'Q' => pos.castling.wq = true,
                    'k' => pos.castling.bk = true,
                    'q' => pos.castling.bq = true,
                    _ => return Err(FenError::Castling(c)),
                }
            }
        }

        pos.en_passant = if ep_part == "-" {
            None
        } else {
            Some(coord_to_sq(ep_part).ok_or_else(|| FenError::EnPassant(ep_part.to_string()))?)
        };

        pos.halfmove_clock = halfmove_part
            .parse()
            .map_err(|_| FenError::Counter(halfmove_part.to_string()))?;
        pos.fullmove_number = fullmove_part
            .parse()
            .map_err(|_| FenError::Counter(fullmove_part.to_string()))?;

        Ok(pos)
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.bitboards.pieces(c, PieceKind::King).lsb()
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        if let Some(old) = self.board[sq as usize] {
            self.bitboards.remove(sq, old);
        }
        if let Some(new) = pc {
            self.bitboards.put(sq, new);
        }
        self.board[sq as usize] = pc;
    }

    pub fn in_check(&self, c: Color) -> bool {
        let ksq = match self.king_sq(c) {
            Some(s) => s,
            None => return false,
        };
        self.is_square_attacked(ksq, c.other())
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        // Pawn attacks
        let tf = file_of(target);
        let tr = rank_of(target);
        let pawn_dirs: &[(i8, i8)] = match by {
            Color::White => &[(-1, -1), (1, -1)], // white pawns attack upward in rank, but target attacked from below
            Color::Black => &[(-1, 1), (1, 1)],
        };
        for (df, dr) in pawn_dirs {
            if let Some(s) = sq(tf + df, tr + dr)
                && let Some(pc) = self.piece_at(s)
                && pc.color == by
                && pc.kind == PieceKind::Pawn
            {
                return true;
            }
        }

        // Knight attacks
        for (df, dr) in KNIGHT_DELTAS {
            if let Some(s) = sq(tf + df, tr + dr)
                && let Some(pc) = self.piece_at(s)
                && pc.color == by
                && pc.kind == PieceKind::Knight
            {
                return true;
            }
        }

        // King adjacency
        for (df, dr) in KING_DELTAS {
            if let Some(s) = sq(tf + df, tr + dr)
                && let Some(pc) = self.piece_at(s)
                && pc.color == by
                && pc.kind == PieceKind::King
            {
                return true;
            }
        }

        // Sliding: the first piece on each ray decides
        let rays = BISHOP_DIRECTIONS
            .iter()
            .map(|&d| (d, PieceKind::Bishop))
            .chain(ROOK_DIRECTIONS.iter().map(|&d| (d, PieceKind::Rook)));
        for ((df, dr), slider) in rays {
            let mut f = tf + df;
            let mut r = tr + dr;
            while let Some(sq2) = sq(f, r) {
                if let Some(pc) = self.piece_at(sq2) {
                    if pc.color == by && (pc.kind == slider || pc.kind == PieceKind::Queen) {
                        return true;
                    }
                    break;
                }
                f += df;
                r += dr;
            }
        }

        false
    }

    /// Play a move produced by the legal move generator.
    ///
    /// # Panics
    /// Panics if there is no piece on the move's origin square.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let moved = match self.piece_at(mv.from) {
            Some(pc) => pc,
            None => panic!("make_move: {} has no piece", sq_to_coord(mv.from)),
        };
        let capture_sq = if mv.is_en_passant {
            sq(file_of(mv.to), rank_of(mv.from))
        } else {
            Some(mv.to)
        };
        let captured = capture_sq.and_then(|s| self.piece_at(s));
        let undo = Undo {
            captured,
            capture_sq,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            moved,
            rook_move: if mv.is_castle { castle_rook_squares(mv.to) } else { None },
        };

        if let Some(s) = capture_sq {
            self.set_piece(s, None);
        }
        let placed = match mv.promo {
            Some(kind) if moved.kind == PieceKind::Pawn => Piece::new(moved.color, kind),
            _ if moved.kind == PieceKind::Pawn && is_back_rank(mv.to) => {
                Piece::new(moved.color, PieceKind::Queen)
            }
            _ => moved,
        };
        self.set_piece(mv.from, None);
        self.set_piece(mv.to, Some(placed));
        if let Some((rook_from, rook_to)) = undo.rook_move {
            let rook = self.piece_at(rook_from);
            self.set_piece(rook_from, None);
            self.set_piece(rook_to, rook);
        }

        self.castling.revoke(mv.from);
        self.castling.revoke(mv.to);

        let double_push = moved.kind == PieceKind::Pawn && rank_of(mv.from).abs_diff(rank_of(mv.to)) == 2;
        self.en_passant = if double_push {
            sq(file_of(mv.from), (rank_of(mv.from) + rank_of(mv.to)) / 2)
        } else {
            None
        };

        if moved.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();
        undo
    }

    /// Take back `mv`, which must be the last move played with `undo`.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rook_from, rook_to)) = undo.rook_move {
            let rook = self.piece_at(rook_to);
            self.set_piece(rook_to, None);
            self.set_piece(rook_from, rook);
        }
        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved));
        if let Some(s) = undo.capture_sq {
            self.set_piece(s, undo.captured);
        }
    }
}

impl CastlingRights {
    /// Drop the rights tied to a king or rook home square.
    fn revoke(&mut self, square: u8) {
        match square {
            0 => self.wq = false,
            4 => (self.wk, self.wq) = (false, false),
            7 => self.wk = false,
            56 => self.bq = false,
            60 => (self.bk, self.bq) = (false, false),
            63 => self.bk = false,
            _ => {}
        }
    }
}

/// Rook (from, to) for a castling king landing on `king_to`.
fn castle_rook_squares(king_to: u8) -> Option<(u8, u8)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}

fn is_back_rank(square: u8) -> bool {
    matches!(rank_of(square), 0 | 7)
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
