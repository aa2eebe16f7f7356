//! Sample generators
//!
//! Each generator walks validated game records and turns plies into training
//! samples through the codec. Every state is encoded in the absolute
//! White-first layer convention, so rewards are always White's score.
//!
//! Records that fail validation (missing `PlyCount`, truncated movetext,
//! unreplayable moves, forfeits) are logged and skipped.

use std::fmt;
use std::str::FromStr;

use chess_codec::{encode, encode_compact, Action, CompactState, EncodeMode, EncodedState};
use chess_core::{Color, Move, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::DatasetError;
use crate::outcome::{discounted, GameOutcome};
use crate::pgn::{GameRecord, Replay};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// Every White move of each game, with the game result
    #[default]
    WhiteStateAction,
    /// One random White-to-move position per game, with its move and result
    RandomWhiteState,
    /// One random Black-to-move position per game, with a discounted result
    RandomBlackState,
    /// Compact-key (s, a, r, s', a') tuples from White's moves
    WhiteSarsa,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::WhiteStateAction,
        GeneratorKind::RandomWhiteState,
        GeneratorKind::RandomBlackState,
        GeneratorKind::WhiteSarsa,
    ];

    /// Name used on the command line and in cache file names.
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::WhiteStateAction => "white-state-action",
            GeneratorKind::RandomWhiteState => "random-white-state",
            GeneratorKind::RandomBlackState => "random-black-state",
            GeneratorKind::WhiteSarsa => "white-sarsa",
        }
    }

    /// Shortest game this generator accepts.
    pub fn min_plies(self) -> usize {
        match self {
            GeneratorKind::WhiteStateAction | GeneratorKind::WhiteSarsa => 5,
            GeneratorKind::RandomWhiteState | GeneratorKind::RandomBlackState => 2,
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown generator '{s}'"))
    }
}

/// A supervised sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub state: EncodedState,
    /// Move played from `state`; absent for value-only samples
    pub action: Option<Action>,
    pub reward: f32,
}

/// One SARSA transition over White's moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarsaSample {
    pub state: CompactState,
    /// `from * 64 + to` of White's move
    pub action: u32,
    pub reward: f32,
    /// Position after Black's reply
    pub next_state: CompactState,
    /// White's next move, absent at the end of the game
    pub next_action: Option<u32>,
    pub new_game: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "samples", rename_all = "kebab-case")]
pub enum Samples {
    Supervised(Vec<Sample>),
    Sarsa(Vec<SarsaSample>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Supervised(s) => s.len(),
            Samples::Sarsa(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A record that passed validation, replayed up to its ply count.
struct ValidGame {
    replay: Replay,
    outcome: GameOutcome,
}

impl ValidGame {
    fn plies(&self) -> usize {
        self.replay.plies.len()
    }

    fn white_score(&self) -> f32 {
        self.outcome.score(Color::White)
    }
}

/// Counters reported after a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub games: usize,
    pub used: usize,
    pub too_short: usize,
    pub skipped: usize,
    pub samples: usize,
}

pub struct SampleGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    stats: GenerationStats,
}

impl SampleGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            stats: GenerationStats::default(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Counters from the last call to [`SampleGenerator::generate`].
    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// Validate a record and replay its plies. `Ok(None)` for games shorter
    /// than the generator accepts.
    fn prepare(
        &self,
        record: &GameRecord,
        kind: GeneratorKind,
    ) -> Result<Option<ValidGame>, DatasetError> {
        record.check_syntax()?;
        let plies = record.ply_count(self.config.infer_ply_count)?;
        if plies < self.config.min_plies.unwrap_or_else(|| kind.min_plies()) {
            return Ok(None);
        }
        if !record.is_complete() {
            return Err(DatasetError::IncompleteGame(
                record.final_comment.clone().unwrap_or_default(),
            ));
        }
        let outcome = record.outcome()?;
        if !outcome.is_decided() {
            return Err(DatasetError::IncompleteGame("no result".to_string()));
        }
        let replay = record.replay_to(plies)?;
        Ok(Some(ValidGame { replay, outcome }))
    }

    /// Run `kind` over `records`.
    pub fn generate(&mut self, kind: GeneratorKind, records: &[GameRecord]) -> Samples {
        self.stats = GenerationStats {
            games: records.len(),
            ..GenerationStats::default()
        };
        let mut supervised = Vec::new();
        let mut sarsa = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let game = match self.prepare(record, kind) {
                Ok(Some(game)) => game,
                Ok(None) => {
                    self.stats.too_short += 1;
                    continue;
                }
                Err(e) => {
                    warn!(game = index, record = %record.describe(), error = %e, "skipping record");
                    self.stats.skipped += 1;
                    continue;
                }
            };
            let produced = match kind {
                GeneratorKind::WhiteStateAction => {
                    self.white_state_action(&game).map(|s| extend(&mut supervised, s))
                }
                GeneratorKind::RandomWhiteState => {
                    self.random_white_state(&game).map(|s| extend(&mut supervised, s))
                }
                GeneratorKind::RandomBlackState => {
                    self.random_black_state(&game).map(|s| extend(&mut supervised, s))
                }
                GeneratorKind::WhiteSarsa => self.white_sarsa(&game).map(|s| extend(&mut sarsa, s)),
            };
            match produced {
                Ok(0) => debug!(game = index, "no samples for this game"),
                Ok(_) => self.stats.used += 1,
                Err(e) => {
                    warn!(game = index, record = %record.describe(), error = %e, "skipping record");
                    self.stats.skipped += 1;
                }
            }
        }

        let samples = match kind {
            GeneratorKind::WhiteSarsa => Samples::Sarsa(sarsa),
            _ => Samples::Supervised(supervised),
        };
        self.stats.samples = samples.len();
        info!(
            generator = %kind,
            games = self.stats.games,
            used = self.stats.used,
            too_short = self.stats.too_short,
            skipped = self.stats.skipped,
            samples = self.stats.samples,
            "generation finished"
        );
        samples
    }

    fn encode_state(&self, pos: &Position) -> EncodedState {
        encode(pos, self.config.encoding)
    }

    fn white_state_action(&mut self, game: &ValidGame) -> Result<Vec<Sample>, DatasetError> {
        let reward = game.white_score();
        let mut samples = game
            .replay
            .plies
            .iter()
            .filter(|(pos, _)| pos.side_to_move == Color::White)
            .map(|(pos, mv)| {
                Ok(Sample {
                    state: self.encode_state(pos),
                    action: Some(Action::from_move(*mv)?),
                    reward,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;
        if self.config.shuffle {
            samples.shuffle(&mut self.rng);
        }
        Ok(samples)
    }

    fn random_white_state(&mut self, game: &ValidGame) -> Result<Vec<Sample>, DatasetError> {
        let Some((pos, mv)) = pick_later_ply(&game.replay, Color::White, &mut self.rng) else {
            return Ok(Vec::new());
        };
        Ok(vec![Sample {
            state: self.encode_state(pos),
            action: Some(Action::from_move(*mv)?),
            reward: game.white_score(),
        }])
    }

    fn random_black_state(&mut self, game: &ValidGame) -> Result<Vec<Sample>, DatasetError> {
        let candidates: Vec<usize> = (0..game.plies())
            .filter(|&i| game.replay.plies[i].0.side_to_move == Color::Black)
            .collect();
        let Some(&index) = candidates.choose(&mut self.rng) else {
            return Ok(Vec::new());
        };
        let moves_remaining = ((game.plies() - index) / 2) as u32;
        Ok(vec![Sample {
            state: self.encode_state(&game.replay.plies[index].0),
            action: None,
            reward: discounted(game.white_score(), moves_remaining, self.config.gamma),
        }])
    }

    fn white_sarsa(&mut self, game: &ValidGame) -> Result<Vec<SarsaSample>, DatasetError> {
        let plies = &game.replay.plies;
        if plies
            .first()
            .is_some_and(|(pos, _)| pos.side_to_move != Color::White)
        {
            return Err(DatasetError::MalformedRecord(
                "game starts with Black to move".to_string(),
            ));
        }

        let mut samples = Vec::new();
        let mut idx = 0;
        while idx < plies.len() {
            let (pos, white_move) = &plies[idx];
            let state = encode_compact(pos);
            let action = from_to(*white_move)?;
            let new_game = idx == 0;
            // White's move, then Black's reply if there is one.
            idx += 2;

            let next_state = match plies.get(idx) {
                Some((next, _)) => encode_compact(next),
                None => encode_compact(&game.replay.final_position),
            };
            let next_action = plies.get(idx).map(|(_, mv)| from_to(*mv)).transpose()?;
            let reward = if idx >= plies.len() {
                game.white_score()
            } else {
                0.0
            };
            samples.push(SarsaSample {
                state,
                action,
                reward,
                next_state,
                next_action,
                new_game,
            });
        }
        Ok(samples)
    }
}

fn extend<T>(out: &mut Vec<T>, items: Vec<T>) -> usize {
    let n = items.len();
    out.extend(items);
    n
}

fn from_to(mv: Move) -> Result<u32, DatasetError> {
    Ok(Action::from_move(mv)?.from_to_index() as u32)
}

/// Uniformly chosen ply with `color` to move, never the start position.
fn pick_later_ply<'a>(
    replay: &'a Replay,
    color: Color,
    rng: &mut StdRng,
) -> Option<&'a (Position, Move)> {
    let candidates: Vec<&(Position, Move)> = replay
        .plies
        .iter()
        .skip(1)
        .filter(|(pos, _)| pos.side_to_move == color)
        .collect();
    candidates.choose(rng).copied()
}

/// Default encoding for a generator: SARSA always uses compact keys.
pub fn encoding_for(kind: GeneratorKind, config: &GeneratorConfig) -> EncodeMode {
    match kind {
        GeneratorKind::WhiteSarsa => EncodeMode::Compact,
        _ => config.encoding,
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod generator_tests;
