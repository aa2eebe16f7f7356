use crate::{board::Position, types::*};

/// Leaper offsets as (file delta, rank delta).
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Orthogonal ray directions: north, south, east, west.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Diagonal ray directions: north-east, south-east, south-west, north-west.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Rook directions followed by bishop directions.
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

/// True if `mv` (matched on from, to and promotion) is legal in `pos`.
pub fn is_legal(pos: &Position, mv: Move) -> bool {
    legal_moves(pos)
        .iter()
        .any(|m| m.from == mv.from && m.to == mv.to && m.promo == mv.promo)
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    let us = pos.side_to_move;
    for from in pos.bitboards.occupied_by(us) {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, us, out),
            PieceKind::Knight => gen_steps(pos, from, us, out, &KNIGHT_DELTAS),
            PieceKind::Bishop => gen_slider(pos, from, us, out, &BISHOP_DIRECTIONS),
            PieceKind::Rook => gen_slider(pos, from, us, out, &ROOK_DIRECTIONS),
            PieceKind::Queen => gen_slider(pos, from, us, out, &QUEEN_DIRECTIONS),
            PieceKind::King => {
                gen_steps(pos, from, us, out, &KING_DELTAS);
                gen_castle(pos, from, us, out);
            }
        }
    }
}

fn push_pawn_move(from: u8, to: u8, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(to) == promo_rank {
        out.extend(PROMOTION_KINDS.iter().map(|&pk| Move::with_promo(from, to, pk)));
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    // forward 1, then 2 from the start rank
    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(from, to, promo_rank, out);
        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(tpc) if tpc.color != c => push_pawn_move(from, to, promo_rank, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_steps(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, deltas: &[(i8, i8)]) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                Some(pc) if pc.color == c => {}
                _ => out.push(Move::new(from, to)),
            }
        }
    }
}

fn gen_slider(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, dirs: &[(i8, i8)]) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::new(from, to));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    // (king square, king-side right, queen-side right)
    let (home, king_side, queen_side) = match c {
        Color::White => (4u8, pos.castling.wk, pos.castling.wq),
        Color::Black => (60u8, pos.castling.bk, pos.castling.bq),
    };
    if from != home || pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| pos.piece_at(home - 4 + s).is_none());
    let safe = |squares: &[u8]| {
        squares
            .iter()
            .all(|&s| !pos.is_square_attacked(home - 4 + s, enemy))
    };

    // Offsets are relative to the a-file corner of the back rank.
    if king_side && empty(&[5, 6]) && safe(&[5, 6]) {
        let mut mv = Move::new(home, home + 2);
        mv.is_castle = true;
        out.push(mv);
    }
    if queen_side && empty(&[1, 2, 3]) && safe(&[2, 3]) {
        let mut mv = Move::new(home, home - 2);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
