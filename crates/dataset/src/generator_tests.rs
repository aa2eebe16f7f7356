use super::*;
use crate::outcome::GAMMA;
use crate::pgn::parse_pgn;
use chess_codec::{encode_dense, Planes};
use chess_core::Position;

const SCHOLARS_MATE: &str = r#"[White "w"]
[Black "b"]
[Result "1-0"]
[PlyCount "7"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0
"#;

const SHORT_DRAW: &str = r#"[Result "1/2-1/2"]
[PlyCount "4"]

1. Nf3 Nf6 2. Ng1 Ng8 1/2-1/2
"#;

const FORFEIT: &str = r#"[Result "0-1"]
[PlyCount "6"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 {White forfeits by disconnection} 0-1
"#;

const NO_PLY_COUNT: &str = r#"[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1
"#;

const UNFINISHED: &str = r#"[Result "*"]
[PlyCount "6"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 *
"#;

fn records(texts: &[&str]) -> Vec<GameRecord> {
    texts
        .iter()
        .flat_map(|t| parse_pgn(t))
        .collect()
}

fn config(seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        seed: Some(seed),
        shuffle: false,
        ..GeneratorConfig::default()
    }
}

fn supervised(samples: Samples) -> Vec<Sample> {
    match samples {
        Samples::Supervised(s) => s,
        Samples::Sarsa(_) => panic!("expected supervised samples"),
    }
}

fn sarsa(samples: Samples) -> Vec<SarsaSample> {
    match samples {
        Samples::Sarsa(s) => s,
        Samples::Supervised(_) => panic!("expected SARSA samples"),
    }
}

fn code(from: u8, to: u8) -> Action {
    chess_codec::encode_action(from, to, None).unwrap()
}

#[test]
fn test_white_state_action_in_order() {
    let mut gen = SampleGenerator::new(config(1));
    let samples = supervised(gen.generate(GeneratorKind::WhiteStateAction, &records(&[SCHOLARS_MATE])));
    assert_eq!(samples.len(), 4);
    let actions: Vec<Action> = samples.iter().filter_map(|s| s.action).collect();
    assert_eq!(actions, vec![code(12, 28), code(5, 26), code(3, 39), code(39, 53)]);
    assert!(samples.iter().all(|s| s.reward == 1.0));
    assert_eq!(
        samples[0].state.as_planes(),
        Some(&encode_dense(&Position::startpos()))
    );
}

#[test]
fn test_white_state_action_shuffle_keeps_pairs() {
    let ordered = supervised(
        SampleGenerator::new(config(1))
            .generate(GeneratorKind::WhiteStateAction, &records(&[SCHOLARS_MATE])),
    );
    let mut cfg = config(3);
    cfg.shuffle = true;
    let mut shuffled = supervised(
        SampleGenerator::new(cfg).generate(GeneratorKind::WhiteStateAction, &records(&[SCHOLARS_MATE])),
    );
    shuffled.sort_by_key(|s| ordered.iter().position(|o| o.action == s.action));
    assert_eq!(shuffled, ordered);
}

#[test]
fn test_filters_and_counts() {
    let recs = records(&[SCHOLARS_MATE, SHORT_DRAW, FORFEIT, NO_PLY_COUNT, UNFINISHED]);
    let mut gen = SampleGenerator::new(config(1));
    gen.generate(GeneratorKind::WhiteStateAction, &recs);
    let stats = gen.stats();
    assert_eq!(stats.games, 5);
    assert_eq!(stats.used, 1);
    assert_eq!(stats.too_short, 1);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.samples, 4);
}

#[test]
fn test_random_white_state_needs_a_later_white_move() {
    let mut gen = SampleGenerator::new(config(1));
    let samples = supervised(gen.generate(GeneratorKind::RandomWhiteState, &records(&[SHORT_DRAW])));
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].action, Some(code(21, 6)));
}

#[test]
fn test_malformed_record_is_skipped() {
    let broken = "[Result \"1-0\"]\n[PlyCount \"7\"]\n\n1. e4 e5 ] 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0\n";
    let recs = records(&[SCHOLARS_MATE, broken, SCHOLARS_MATE]);
    assert_eq!(recs.len(), 3);
    let mut gen = SampleGenerator::new(config(1));
    let samples = supervised(gen.generate(GeneratorKind::WhiteStateAction, &recs));
    assert_eq!(samples.len(), 8);
    assert_eq!(gen.stats().skipped, 1);
    assert_eq!(gen.stats().used, 2);
}

#[test]
fn test_infer_ply_count_accepts_untagged_games() {
    let mut cfg = config(1);
    cfg.infer_ply_count = true;
    let mut gen = SampleGenerator::new(cfg);
    let samples = supervised(gen.generate(GeneratorKind::RandomWhiteState, &records(&[NO_PLY_COUNT])));
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].reward, -1.0);
}

#[test]
fn test_min_plies_override() {
    let mut cfg = config(1);
    cfg.min_plies = Some(2);
    let mut gen = SampleGenerator::new(cfg);
    let samples = supervised(gen.generate(GeneratorKind::WhiteStateAction, &records(&[SHORT_DRAW])));
    assert_eq!(samples.len(), 2);
    assert!(samples.iter().all(|s| s.reward == 0.0));
}

#[test]
fn test_random_white_state_picks_white_move() {
    // e2e4 from the start position is never picked.
    let white_moves = [code(5, 26), code(3, 39), code(39, 53)];
    for seed in 0..10 {
        let mut gen = SampleGenerator::new(config(seed));
        let samples =
            supervised(gen.generate(GeneratorKind::RandomWhiteState, &records(&[SCHOLARS_MATE])));
        assert_eq!(samples.len(), 1);
        let action = samples[0].action.unwrap();
        assert!(white_moves.contains(&action));
        assert_eq!(samples[0].reward, 1.0);
    }
}

#[test]
fn test_random_black_state_reward_is_discounted() {
    let allowed = [GAMMA.powi(3), GAMMA.powi(2), GAMMA];
    for seed in 0..10 {
        let mut gen = SampleGenerator::new(config(seed));
        let samples =
            supervised(gen.generate(GeneratorKind::RandomBlackState, &records(&[SCHOLARS_MATE])));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].action, None);
        assert!(allowed.iter().any(|r| (r - samples[0].reward).abs() < 1e-6));
    }
}

#[test]
fn test_featurized_encoding() {
    let mut cfg = config(1);
    cfg.encoding = EncodeMode::Featurized;
    let mut gen = SampleGenerator::new(cfg);
    let samples = supervised(gen.generate(GeneratorKind::RandomBlackState, &records(&[SCHOLARS_MATE])));
    assert_eq!(samples[0].state.as_planes().map(Planes::layers), Some(29));
}

#[test]
fn test_white_sarsa_chain() {
    let mut gen = SampleGenerator::new(config(1));
    let recs = records(&[SCHOLARS_MATE]);
    let tuples = sarsa(gen.generate(GeneratorKind::WhiteSarsa, &recs));
    assert_eq!(tuples.len(), 4);

    assert!(tuples[0].new_game);
    assert!(tuples[1..].iter().all(|t| !t.new_game));
    assert_eq!(tuples[0].state, encode_compact(&Position::startpos()));
    assert_eq!(tuples[0].action, 12 * 64 + 28);
    assert_eq!(tuples[0].next_action, Some(5 * 64 + 26));

    for pair in tuples.windows(2) {
        assert_eq!(pair[0].next_state, pair[1].state);
        assert_eq!(pair[0].next_action, Some(pair[1].action));
        assert_eq!(pair[0].reward, 0.0);
    }

    let last = &tuples[3];
    assert_eq!(last.reward, 1.0);
    assert_eq!(last.next_action, None);
    let final_position = recs[0].replay().unwrap().final_position;
    assert_eq!(last.next_state, encode_compact(&final_position));
}

#[test]
fn test_seeded_runs_repeat() {
    let recs = records(&[SCHOLARS_MATE, SCHOLARS_MATE, SCHOLARS_MATE]);
    let a = SampleGenerator::new(config(9)).generate(GeneratorKind::RandomBlackState, &recs);
    let b = SampleGenerator::new(config(9)).generate(GeneratorKind::RandomBlackState, &recs);
    assert_eq!(a, b);
}

#[test]
fn test_generator_names() {
    for kind in GeneratorKind::ALL {
        assert_eq!(kind.name().parse::<GeneratorKind>(), Ok(kind));
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            format!("\"{}\"", kind.name())
        );
    }
    assert!("white_sarsa".parse::<GeneratorKind>().is_err());
}

#[test]
fn test_sarsa_always_compact() {
    let cfg = GeneratorConfig {
        encoding: EncodeMode::Featurized,
        ..GeneratorConfig::default()
    };
    assert_eq!(encoding_for(GeneratorKind::WhiteSarsa, &cfg), EncodeMode::Compact);
    assert_eq!(
        encoding_for(GeneratorKind::RandomBlackState, &cfg),
        EncodeMode::Featurized
    );
}
