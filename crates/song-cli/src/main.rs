use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use contracts::{Scenario, SongId};
use song_core::{SongCatalog, SongEngine, SongWorld, Stage, StepOutcome};
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Stage bard performances from scenario files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the song table
    Catalog,
    /// List the songs the scenario's performer can play, with failure odds
    Menu {
        #[arg(long, value_name = "PATH")]
        scenario: PathBuf,
    },
    /// Play a song against the scenario's actors until it ends
    Perform {
        #[arg(long, value_name = "PATH")]
        scenario: PathBuf,

        /// sleep, confusion, slow, fear, tame or courage
        #[arg(long, value_parser = parse_song)]
        song: SongId,

        /// Stop after this many turns even if the song is still playing
        #[arg(long)]
        turns: Option<u32>,

        /// Interrupt the performer before playing this turn (0-based)
        #[arg(long, value_name = "TURN")]
        interrupt_at: Option<u64>,

        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,

        /// Emit a JSON report instead of narration lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn parse_song(raw: &str) -> Result<SongId, String> {
    SongId::parse(raw).ok_or_else(|| format!("unknown song: {raw}"))
}

fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("parse scenario {}", path.display()))?;
    debug!(
        path = %path.display(),
        actors = scenario.actors.len(),
        seed = scenario.config.seed,
        "scenario loaded"
    );
    Ok(scenario)
}

fn print_catalog() -> anyhow::Result<()> {
    for song in SongCatalog::songs() {
        println!(
            "{:<10} {:<16} level={} turns={} primary={} bonus={}",
            song.id, song.name, song.level, song.turns, song.primary, song.bonus
        );
    }
    Ok(())
}

fn print_menu(path: &Path) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let entries = SongCatalog::menu(&scenario.instrument, &scenario.knowledge, &scenario.performer);
    if entries.is_empty() {
        println!("You don't know any songs you can play on {}.", scenario.instrument.display_name());
        return Ok(());
    }
    for entry in entries {
        let marker = if entry.bonus { "*" } else { " " };
        println!(
            "{marker} {:<16} level={} turns={} fail={}%",
            entry.name, entry.level, entry.turns, entry.fail_percent
        );
    }
    Ok(())
}

struct PerformOptions {
    song: SongId,
    turns: Option<u32>,
    interrupt_at: Option<u64>,
    seed: Option<u64>,
    json: bool,
}

fn perform(path: &Path, options: PerformOptions) -> anyhow::Result<()> {
    let mut scenario = load_scenario(path)?;
    if let Some(seed) = options.seed {
        scenario.config.seed = seed;
    }

    let mut stage = Stage::from_scenario(&scenario);
    let mut engine = SongEngine::new(scenario.config.clone());
    let start = engine
        .begin_song(&mut stage, options.song, &scenario.instrument, &scenario.knowledge)
        .with_context(|| format!("begin {}", options.song))?;

    let limit = options.turns.unwrap_or(u32::MAX);
    let mut outcomes = Vec::new();
    if start.started {
        for played in 0..limit {
            if options.interrupt_at == Some(u64::from(played)) && stage.interrupt_performer() {
                info!(turn = stage.turn(), "performer interrupted");
            }
            let outcome = stage.play_turn(&mut engine);
            outcomes.push(outcome);
            if outcome != StepOutcome::Continue {
                break;
            }
        }
    }

    if options.json {
        let report = serde_json::json!({
            "start": start,
            "outcomes": outcomes,
            "narration": stage.narration(),
            "performer": stage.performer(),
            "actors": stage.actors().collect::<Vec<_>>(),
        });
        let encoded = serde_json::to_string_pretty(&report).context("encode report")?;
        println!("{encoded}");
        return Ok(());
    }

    for line in stage.narration() {
        println!("[turn {}] {}", line.turn, line);
    }
    if start.started && outcomes.last() == Some(&StepOutcome::Continue) {
        info!(limit, "stopped with the song still playing");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Catalog => print_catalog(),
        Command::Menu { scenario } => print_menu(&scenario),
        Command::Perform {
            scenario,
            song,
            turns,
            interrupt_at,
            seed,
            json,
        } => perform(
            &scenario,
            PerformOptions {
                song,
                turns,
                interrupt_at,
                seed,
                json,
            },
        ),
    }
}
