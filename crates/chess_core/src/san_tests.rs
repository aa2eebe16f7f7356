use super::*;

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

#[test]
fn test_pawn_and_piece_moves() {
    let pos = Position::startpos();
    assert_eq!(parse_san(&pos, "e4").unwrap(), Move::new(12, 28));
    assert_eq!(parse_san(&pos, "Nf3").unwrap(), Move::new(6, 21));
    assert_eq!(parse_san(&pos, "Nc3+").unwrap(), Move::new(1, 18));
}

#[test]
fn test_pawn_capture() {
    // 1. e4 d5
    let pos = fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2");
    let mv = parse_san(&pos, "exd5").unwrap();
    assert_eq!(mv, Move::new(28, 35));
}

#[test]
fn test_disambiguation_by_file_and_rank() {
    // Knights on b1 and f3 can both reach d2; rooks on a1 and a5 can both reach a3.
    let pos = fen("4k3/8/8/R7/8/5N2/8/RN2K3 w - - 0 1");
    assert!(matches!(
        parse_san(&pos, "Nd2"),
        Err(MoveParseError::Ambiguous(_))
    ));
    assert_eq!(parse_san(&pos, "Nbd2").unwrap().from, 1);
    assert_eq!(parse_san(&pos, "Nfd2").unwrap().from, 21);
    assert_eq!(parse_san(&pos, "R1a3").unwrap().from, 0);
    assert_eq!(parse_san(&pos, "R5a3").unwrap().from, 32);
}

#[test]
fn test_castling() {
    let pos = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let short = parse_san(&pos, "O-O").unwrap();
    assert!(short.is_castle);
    assert_eq!(short.to, 6);
    let long = parse_san(&pos, "0-0-0").unwrap();
    assert_eq!(long.to, 2);
}

#[test]
fn test_promotion_forms() {
    let pos = fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1");
    let a = parse_san(&pos, "a8=Q").unwrap();
    let b = parse_san(&pos, "a8Q").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.promo, Some(PieceKind::Queen));
    let c = parse_san(&pos, "axb8=N#").unwrap();
    assert_eq!(c.to, 57);
    assert_eq!(c.promo, Some(PieceKind::Knight));
}

#[test]
fn test_errors() {
    let pos = Position::startpos();
    assert!(matches!(parse_san(&pos, ""), Err(MoveParseError::Syntax(_))));
    assert!(matches!(parse_san(&pos, "Zf3"), Err(MoveParseError::Syntax(_))));
    assert!(matches!(parse_san(&pos, "e5"), Err(MoveParseError::Illegal(_))));
    assert!(matches!(parse_san(&pos, "O-O"), Err(MoveParseError::Illegal(_))));
}
