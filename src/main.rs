use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use long_backgammon::{
    config::SimulationConfig,
    simulation::{SimulationSummary, simulate_batch},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "long-backgammon", about = "Run self-play games with the long backgammon rule engine")]
struct Args {
    /// JSON file with simulation settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to play
    #[arg(long)]
    games: Option<u32>,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Actions after which a game is abandoned
    #[arg(long)]
    max_plies: Option<u32>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(games) = args.games {
        config.games = games;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_plies) = args.max_plies {
        config.max_plies = max_plies;
    }
    Ok(config)
}

fn print_summary(summary: &SimulationSummary) {
    let games = summary.games.max(1) as f32;
    println!("============================================");
    println!(
        "Games: {}, White Wins: {}, Black Wins: {}, Unfinished: {}",
        summary.games, summary.white_wins, summary.black_wins, summary.unfinished
    );
    println!(
        "White Win Rate: {:.2}%, Black Win Rate: {:.2}%",
        summary.white_wins as f32 / games * 100.0,
        summary.black_wins as f32 / games * 100.0
    );
    println!(
        "Average plies per game: {:.1}",
        summary.total_plies as f32 / games
    );
    let stats = &summary.statistics;
    println!(
        "{:?}: {} wins / {} losses, average {} moves, longest streak {}",
        summary.perspective, stats.wins, stats.losses, stats.average_moves_per_game, stats.longest_win_streak
    );
    println!("============================================");
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = load_config(&args)?;
    tracing::info!(?config, "starting self-play");

    let start = std::time::Instant::now();
    let summary = simulate_batch(&config);
    tracing::info!(elapsed = ?start.elapsed(), "self-play done");

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}
