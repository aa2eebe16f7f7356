//! Dataset CLI
//!
//! Generate training samples from PGN files and inspect the codec.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_codec::{
    decode_action, encode, EncodedState, EncodeMode, Family, Planes, Relation,
    NUM_OCCUPANCY_LAYERS,
};
use chess_core::{move_to_uci, sq_to_coord, Color, PieceKind, Position};
use chess_dataset::{
    parse_pgn, CacheKey, DatasetConfig, DatasetError, GeneratorKind, SampleCache, SampleGenerator,
    Samples,
};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess_dataset", about = "Chess position and move tensor datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates training samples from a PGN file, through the sample cache
    Generate(GenerateArgs),
    /// Prints the encoding of a FEN position
    Encode(EncodeArgs),
    /// Prints the parts of an action code
    Decode(DecodeArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// PGN file with the game records
    #[arg(long)]
    pgn: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// white-state-action, random-white-state, random-black-state or white-sarsa
    #[arg(long)]
    generator: Option<GeneratorKind>,
    /// dense or featurized
    #[arg(long)]
    encoding: Option<EncodeMode>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Skip the cache entirely
    #[arg(long)]
    no_cache: bool,
    /// Regenerate even when a matching cache file exists
    #[arg(long)]
    refresh: bool,
}

#[derive(Args)]
struct EncodeArgs {
    #[arg(long)]
    fen: String,
    #[arg(long, default_value_t = EncodeMode::Dense)]
    mode: EncodeMode,
}

#[derive(Args)]
struct DecodeArgs {
    code: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Encode(args) => run_encode(args),
        Commands::Decode(args) => run_decode(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => DatasetConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DatasetConfig::default(),
    };
    if let Some(kind) = args.generator {
        config.kind = kind;
    }
    if let Some(encoding) = args.encoding {
        config.generator.encoding = encoding;
    }
    if let Some(seed) = args.seed {
        config.generator.seed = Some(seed);
    }
    if let Some(dir) = args.cache_dir {
        config.cache.dir = dir;
    }
    if args.no_cache {
        config.cache.enabled = false;
    }

    let kind = config.kind;
    let build = || -> Result<Samples, DatasetError> {
        let text = std::fs::read_to_string(&args.pgn)?;
        let records = parse_pgn(&text);
        let malformed = records.iter().filter(|r| r.malformed.is_some()).count();
        info!(path = %args.pgn.display(), games = records.len(), malformed, "parsed game records");
        Ok(SampleGenerator::new(config.generator.clone()).generate(kind, &records))
    };

    let samples = if config.cache.enabled {
        let key = CacheKey::for_path(&args.pgn, kind, &config.generator);
        SampleCache::new(&config.cache.dir).load_or_build(&key, args.refresh, build)
    } else {
        build()
    }
    .with_context(|| format!("failed to generate samples from {}", args.pgn.display()))?;

    println!("{}: {} samples", kind, samples.len());
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let pos = Position::from_fen(&args.fen).with_context(|| format!("bad FEN '{}'", args.fen))?;
    match encode(&pos, args.mode) {
        EncodedState::Compact(state) => println!("{state}"),
        EncodedState::Planes(planes) => print_planes(&planes),
    }
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let decoded = decode_action(args.code)?;
    let promotion = decoded
        .promotion_kind()
        .map_or("none".to_string(), |k| format!("{k:?}").to_lowercase());
    println!(
        "promotion={} from={} to={} uci={}",
        promotion,
        sq_to_coord(decoded.from),
        sq_to_coord(decoded.to),
        move_to_uci(decoded.to_move())
    );
    Ok(())
}

fn layer_name(layer: usize) -> String {
    if layer < NUM_OCCUPANCY_LAYERS {
        let color = Color::ALL[layer / PieceKind::ALL.len()];
        let kind = PieceKind::ALL[layer % PieceKind::ALL.len()];
        return format!("{color:?} {kind:?}").to_lowercase();
    }
    let influence = layer - NUM_OCCUPANCY_LAYERS;
    match (Family::ALL.get(influence / 4), influence % 4) {
        (Some(family), rem) => {
            let color = Color::ALL[rem / 2];
            let relation = if rem % 2 == 0 {
                Relation::Attacks
            } else {
                Relation::Defends
            };
            format!("{family:?} {color:?} {relation:?}").to_lowercase()
        }
        (None, _) => "free squares".to_string(),
    }
}

/// Non-zero layers as 8x8 grids, rank 8 at the top.
fn print_planes(planes: &Planes) {
    println!("shape {:?}", planes.shape());
    for layer in planes.nonzero_layers() {
        println!("\n[{layer}] {}", layer_name(layer));
        for row in (0..8).rev() {
            let line: Vec<String> = (0..8)
                .map(|col| match planes.get(layer, row, col) {
                    v if v == 0.0 => ".".to_string(),
                    v => format!("{v}"),
                })
                .collect();
            println!("  {} {}", row + 1, line.join(" "));
        }
        println!("    a b c d e f g h");
    }
}
