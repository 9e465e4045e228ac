#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Cartography session.

mod log_transfer;
mod moves;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use cartography_catalog::Catalog;
use cartography_core::{Event, RejectionReason};
use cartography_system_explorer::{DragInput, ExplorationPreview, Explorer};
use cartography_system_scoring::STANDARD_CHALLENGES;
use cartography_world::{apply, query, World};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use self::{
    log_transfer::SessionRecord,
    moves::PlannedMove,
    settings::{LayoutArg, Overrides},
};

#[derive(Debug, Parser)]
#[command(name = "cartography", version, about = "Place explorations on a Cartography map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every exploration in the standard catalog.
    Catalog,
    /// Play a sequence of moves and print the resulting session.
    Play(PlayArgs),
    /// Rebuild a session from an exported log string.
    Replay {
        /// String printed by `play` after `log:`.
        log: String,
    },
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// TOML file with `layout`, `time_budget` and `seed` keys.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Starting map, overriding the settings file.
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Time budget, overriding the settings file.
    #[arg(long, allow_negative_numbers = true)]
    time: Option<i32>,
    /// Seed for the offered-piece draw, overriding the settings file.
    #[arg(long)]
    seed: Option<u64>,
    /// Moves written as NAME@ROW,COL[/ROTATION].
    #[arg(value_name = "MOVE")]
    moves: Vec<PlannedMove>,
}

/// Entry point for the Cartography command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog => {
            let catalog = Catalog::standard().context("failed to load catalog")?;
            print!("{}", render::catalog(&catalog));
        }
        Commands::Play(args) => play(args)?,
        Commands::Replay { log } => replay(&log)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn play(args: PlayArgs) -> Result<()> {
    let config = settings::resolve(
        args.config.as_deref(),
        Overrides {
            layout: args.layout,
            time_budget: args.time,
            seed: args.seed,
        },
    )?;
    let mut world = World::new(config).context("failed to start session")?;
    let mut explorer = Explorer::new();
    let mut events = Vec::new();
    let mut commands = Vec::new();

    println!("{}", query::welcome_banner(&world));
    for planned in &args.moves {
        let piece = query::catalog(&world)
            .resolve(&planned.piece)
            .with_context(|| format!("unknown piece '{}'", planned.piece))?;
        let preview = query::preview(&world, piece, planned.rotation, planned.anchor)
            .map(|errors| ExplorationPreview::new(piece, planned.rotation, planned.anchor, errors));

        let pending = std::mem::take(&mut events);
        explorer.handle(
            &pending,
            preview.as_ref(),
            DragInput::new(Some(planned.anchor), planned.rotation, true),
            &mut commands,
        );

        if commands.is_empty() {
            report_dropped(planned, preview.as_ref(), explorer.is_accepting());
            continue;
        }

        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }
        report_events(planned, &events);
    }

    print_session(&world)
}

fn replay(log: &str) -> Result<()> {
    let record = SessionRecord::decode(log).context("failed to decode log string")?;
    debug!(entries = record.entries.len(), "decoded session record");
    let world = World::from_log(record.config, record.entries).context("log does not replay")?;
    print_session(&world)
}

fn report_dropped(planned: &PlannedMove, preview: Option<&ExplorationPreview>, accepting: bool) {
    if !accepting {
        println!("{}: ignored, time is up", describe(planned));
    } else if let Some(preview) = preview {
        println!(
            "{}: {} conflicting cell(s)",
            describe(planned),
            preview.errors.conflict_count()
        );
        print!("{}", render::errors(&preview.errors));
    }
}

fn report_events(planned: &PlannedMove, events: &[Event]) {
    for event in events {
        match event {
            Event::PiecePlaced { time_left, .. } => {
                println!("{}: placed, {time_left} time left", describe(planned));
            }
            Event::PlacementRejected { reason, .. } => match reason {
                RejectionReason::GameOver => println!("{}: rejected, time is up", describe(planned)),
                RejectionReason::UnknownPiece => {
                    println!("{}: rejected, unknown piece", describe(planned));
                }
                RejectionReason::Conflicts(errors) => {
                    println!("{}: rejected", describe(planned));
                    print!("{}", render::errors(errors));
                }
            },
            Event::TimeExpired { .. } => println!("time is up"),
            Event::Restarted => println!("session restarted"),
        }
    }
}

fn describe(planned: &PlannedMove) -> String {
    format!(
        "{} at ({}, {}) turned {}",
        planned.piece,
        planned.anchor.row(),
        planned.anchor.column(),
        planned.rotation
    )
}

fn print_session(world: &World) -> Result<()> {
    let state = query::game_state(world);
    let catalog = query::catalog(world);

    println!();
    print!("{}", render::grid(state.grid()));
    println!("time left: {}", state.time_left());
    println!("game over: {}", query::is_game_over(world));
    for challenge in &STANDARD_CHALLENGES {
        println!("{}: {}", challenge.name, query::score(world, challenge));
    }
    if let Some(offered) = catalog.get(query::offered_piece(world)) {
        println!("offered: {}", offered.name());
    }

    let record = SessionRecord {
        config: *query::config(world),
        entries: query::log_snapshot(world).entries().to_vec(),
    };
    println!("log: {}", record.encode().context("failed to export log")?);
    Ok(())
}
