use super::*;

#[test]
fn test_row_col_round_trip() {
    for square in 0..NUM_SQUARES as u8 {
        assert_eq!(square_of(row_of(square), col_of(square)), square);
    }
    assert_eq!((row_of(8), col_of(8)), (1, 0)); // a2
    assert_eq!((row_of(63), col_of(63)), (7, 7)); // h8
}

#[test]
fn test_square_at_bounds() {
    assert_eq!(square_at(0, 0), Some(0));
    assert_eq!(square_at(2, 1), Some(17));
    assert_eq!(square_at(-1, 3), None);
    assert_eq!(square_at(3, 8), None);
}

#[test]
fn test_occupancy_layers() {
    assert_eq!(occupancy_layer(Color::White, PieceKind::Pawn), 0);
    assert_eq!(occupancy_layer(Color::White, PieceKind::Rook), 3);
    assert_eq!(occupancy_layer(Color::Black, PieceKind::Pawn), 6);
    assert_eq!(occupancy_layer(Color::Black, PieceKind::King), 11);
}
