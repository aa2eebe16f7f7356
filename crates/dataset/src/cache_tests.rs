use super::*;
use crate::generator::{Sample, SampleGenerator, SarsaSample};
use crate::pgn::parse_pgn;
use chess_codec::{encode, encode_action, encode_compact};
use chess_core::Position;
use std::cell::Cell;

fn supervised_samples() -> Samples {
    Samples::Supervised(vec![Sample {
        state: encode(&Position::startpos(), EncodeMode::Featurized),
        action: Some(encode_action(12, 28, None).unwrap()),
        reward: 0.5,
    }])
}

fn sarsa_samples() -> Samples {
    let s = encode_compact(&Position::startpos());
    Samples::Sarsa(vec![SarsaSample {
        state: s,
        action: 12 * 64 + 28,
        reward: -1.0,
        next_state: s,
        next_action: None,
        new_game: true,
    }])
}

fn settings(encoding: EncodeMode) -> GeneratorConfig {
    GeneratorConfig {
        encoding,
        seed: Some(5),
        ..GeneratorConfig::default()
    }
}

fn key() -> CacheKey {
    CacheKey::new(
        "games.pgn",
        GeneratorKind::RandomWhiteState,
        &settings(EncodeMode::Featurized),
    )
}

#[test]
fn test_file_name() {
    assert_eq!(key().file_name(), "games.pgn.random-white-state.featurized.json");
    let from_path = CacheKey::for_path(
        Path::new("/data/pgn/games.pgn"),
        GeneratorKind::RandomWhiteState,
        &settings(EncodeMode::Featurized),
    );
    assert_eq!(from_path, key());
}

#[test]
fn test_sarsa_key_ignores_configured_encoding() {
    let dense = CacheKey::new("g.pgn", GeneratorKind::WhiteSarsa, &settings(EncodeMode::Dense));
    let featurized =
        CacheKey::new("g.pgn", GeneratorKind::WhiteSarsa, &settings(EncodeMode::Featurized));
    assert_eq!(dense, featurized);
    assert_eq!(dense.encoding(), EncodeMode::Compact);
    assert_eq!(dense.file_name(), "g.pgn.white-sarsa.compact.json");
}

#[test]
fn test_save_then_load() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path().join("nested"));
    for samples in [supervised_samples(), sarsa_samples()] {
        cache.save(&key(), &samples).unwrap();
        assert_eq!(cache.load(&key()), Some(samples));
    }
}

#[test]
fn test_missing_file_is_a_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    assert_eq!(cache.load(&key()), None);
}

#[test]
fn test_corrupt_file_is_a_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    std::fs::write(cache.path(&key()), "{ not json").unwrap();
    assert_eq!(cache.load(&key()), None);
}

#[test]
fn test_encodings_use_separate_files() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    let dense_key = CacheKey::new(
        "games.pgn",
        GeneratorKind::RandomWhiteState,
        &settings(EncodeMode::Dense),
    );
    assert_ne!(cache.path(&dense_key), cache.path(&key()));

    cache.save(&key(), &supervised_samples()).unwrap();
    assert_eq!(cache.load(&dense_key), None);
    cache.save(&dense_key, &sarsa_samples()).unwrap();
    assert_eq!(cache.load(&key()), Some(supervised_samples()));
}

#[test]
fn test_changed_settings_rebuild() {
    let text = "[Result \"1-0\"]\n[PlyCount \"7\"]\n\n1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0\n";
    let records = parse_pgn(text);
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    let run = |gamma: f32| {
        let config = GeneratorConfig {
            gamma,
            ..settings(EncodeMode::Dense)
        };
        let key = CacheKey::new("mate.pgn", GeneratorKind::RandomBlackState, &config);
        cache
            .load_or_build(&key, false, || {
                Ok(SampleGenerator::new(config.clone())
                    .generate(GeneratorKind::RandomBlackState, &records))
            })
            .unwrap()
    };
    let reward = |samples: Samples| match samples {
        Samples::Supervised(s) => s[0].reward,
        Samples::Sarsa(_) => panic!("expected supervised samples"),
    };

    let slow = reward(run(0.99));
    let fast = reward(run(0.5));
    assert!(slow > fast);
    assert_eq!(reward(run(0.5)), fast);

    let key = CacheKey::new(
        "mate.pgn",
        GeneratorKind::RandomBlackState,
        &GeneratorConfig {
            gamma: 0.5,
            ..settings(EncodeMode::Dense)
        },
    );
    assert_eq!(cache.load(&key).map(reward), Some(fast));
}

#[test]
fn test_old_encoder_version_is_a_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    let file = CacheFile {
        encoder_version: ENCODER_VERSION + 1,
        key: key(),
        samples: supervised_samples(),
    };
    std::fs::write(cache.path(&key()), serde_json::to_string(&file).unwrap()).unwrap();
    assert_eq!(cache.load(&key()), None);
}

#[test]
fn test_load_or_build_reuses_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    let builds = Cell::new(0);
    let build = || {
        builds.set(builds.get() + 1);
        Ok(supervised_samples())
    };

    let first = cache.load_or_build(&key(), false, build).unwrap();
    let second = cache.load_or_build(&key(), false, build).unwrap();
    assert_eq!(first, second);
    assert_eq!(builds.get(), 1);

    cache.load_or_build(&key(), true, build).unwrap();
    assert_eq!(builds.get(), 2);
}

#[test]
fn test_build_error_propagates() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = SampleCache::new(tmp.path());
    let err = cache
        .load_or_build(&key(), false, || {
            Err(DatasetError::MalformedRecord("boom".to_string()))
        })
        .unwrap_err();
    assert!(matches!(err, DatasetError::MalformedRecord(_)));
    assert!(!cache.path(&key()).exists());
}
