use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use gravity_grid_cli::*;
use gravity_grid_core::{Board, LevelPack, Position, Progress, Settings};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay taps against a level and print the board after each one
    Play {
        /// JSON level pack
        #[arg(short, long)]
        levels: PathBuf,

        /// Zero-based level index, defaults to the saved current level
        #[arg(long)]
        level: Option<usize>,

        /// Cell to tap, as an index or `row,col`
        #[arg(short, long = "tap", value_name = "POS", value_parser = parse_tap)]
        taps: Vec<Position>,

        /// TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to keep the session between runs
        #[arg(long)]
        save: Option<PathBuf>,

        /// Force a seed instead of random
        #[arg(short, long)]
        seed: Option<u64>,

        /// Read unknown tile codes as empty cells
        #[arg(long)]
        lenient: bool,
    },
    /// Parse a level pack and summarize every level
    Validate {
        /// JSON level pack
        #[arg(short, long)]
        levels: PathBuf,

        /// Read unknown tile codes as empty cells
        #[arg(long)]
        lenient: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Play {
            levels,
            level,
            taps,
            config,
            save,
            seed,
            lenient,
        } => {
            let pack = load_level_pack(&levels, lenient)?;
            let mut store = match save {
                Some(path) => FileStore::open(&path)?,
                None => FileStore::in_memory(),
            };
            let mut settings = load_settings(config.as_deref())?;
            if seed.is_some() {
                settings.seed = seed;
            }
            play(&pack, level, &taps, &settings, &mut store)?;
            store.flush()
        }
        Command::Validate { levels, lenient } => {
            let pack = load_level_pack(&levels, lenient)?;
            validate(&pack);
            Ok(())
        }
    }
}

fn play(
    pack: &LevelPack,
    level: Option<usize>,
    taps: &[Position],
    settings: &Settings,
    store: &mut FileStore,
) -> anyhow::Result<()> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    let (mut session, mut engine) = start(pack, level, settings, &*store, seed, Utc::now())?;

    println!("{}", render_board(engine.board()));
    println!("{}", render_hud(&engine, &session));

    for &tap in taps {
        let Some(events) = replay_tap(&mut engine, pack, &mut session, tap)? else {
            log::warn!("Out of lives, ignoring remaining taps");
            break;
        };
        println!();
        println!("tap {tap}");
        for event in &events {
            println!("  {}", describe_event(event));
        }
        println!("{}", render_board(engine.board()));
        println!("{}", render_hud(&engine, &session));
    }

    save(&session, store, Utc::now())
}

fn validate(pack: &LevelPack) {
    println!("{} levels", pack.len());
    for (index, level) in pack.iter().enumerate() {
        let board = Board::new(level, 1, 0);
        let progress = Progress::new(&board, level.targets());
        let targets = level.targets();
        let planets = board.iter().filter(|cell| cell.kind().planet().is_some()).count();
        print!(
            "level {}: {} planets, targets red {} blue {} green {}, {} moves",
            index + 1,
            planets,
            targets.red,
            targets.blue,
            targets.green,
            targets.max_moves
        );
        if progress.is_won() {
            print!(" (already solved on load)");
        }
        println!();
    }
}
