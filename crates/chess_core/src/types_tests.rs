use super::*;

#[test]
fn test_piece_kind_ordinals() {
    assert_eq!(PieceKind::Pawn.ordinal(), 1);
    assert_eq!(PieceKind::King.ordinal(), 6);
    for kind in PieceKind::ALL {
        assert_eq!(PieceKind::from_ordinal(kind.ordinal()), Some(kind));
    }
    assert_eq!(PieceKind::from_ordinal(0), None);
    assert_eq!(PieceKind::from_ordinal(7), None);
}

#[test]
fn test_piece_letters() {
    assert_eq!(PieceKind::from_letter('n'), Some(PieceKind::Knight));
    assert_eq!(PieceKind::from_letter('Q'), Some(PieceKind::Queen));
    assert_eq!(PieceKind::from_letter('x'), None);
    assert_eq!(PieceKind::Rook.letter(), 'R');
}

#[test]
fn test_square_helpers() {
    assert_eq!(sq(0, 0), Some(0));
    assert_eq!(sq(7, 7), Some(63));
    assert_eq!(sq(-1, 0), None);
    assert_eq!(sq(0, 8), None);
    assert_eq!(file_of(10), 2);
    assert_eq!(rank_of(10), 1);
    assert_eq!(sq_to_coord(28), "e4");
    assert_eq!(coord_to_sq("h8"), Some(63));
    assert_eq!(coord_to_sq("i1"), None);
}
