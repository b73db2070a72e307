use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser, ValueEnum};
use plotters::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use catchbot::{
    Action, Bot, CatchGame, EpisodeStats, GameError, create_bot_from_spec, label_for_spec,
};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

/// Output format for the generated chart. Currently only PNG is supported.
#[derive(Clone, Debug, ValueEnum)]
enum ChartFormat {
    Png,
}

impl ChartFormat {
    fn from_path(path: &PathBuf) -> Option<Self> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
        {
            Some(ext) if ext == "png" => Some(Self::Png),
            _ => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "catchrate",
    about = "Run many Catch episodes per bot and plot catch rates."
)]
struct Args {
    /// Number of episodes to simulate per bot
    #[arg(short = 'e', long = "episodes", default_value_t = 500)]
    episodes: usize,

    /// Base RNG seed (chance node + bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Board rows
    #[arg(long = "rows", default_value_t = catchbot::DEFAULT_ROWS)]
    rows: usize,

    /// Board columns
    #[arg(long = "columns", default_value_t = catchbot::DEFAULT_COLUMNS)]
    columns: usize,

    /// Output chart file (png)
    #[arg(short = 'o', long = "out", default_value = "catchrates.png")]
    out: PathBuf,

    /// Explicit output format (inferred from --out when omitted)
    #[arg(long = "format", value_enum)]
    format: Option<ChartFormat>,

    /// Show a textual summary only (no chart)
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// Bot specs: e.g., tracker random (1 or more)
    bots: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.bots.is_empty() {
        return Err("please provide at least one bot spec (e.g., tracker random)".into());
    }

    // Interactive bots would block waiting for input in batch runs.
    if args
        .bots
        .iter()
        .any(|s| s.to_ascii_lowercase().starts_with("human"))
    {
        return Err("human players are not supported in catchrate runs".into());
    }

    let game = CatchGame::with_dimensions(args.rows, args.columns)?;

    let mut stats_per_label: HashMap<String, EpisodeStats> = HashMap::new();
    let mut decision_time_ns: HashMap<String, u128> = HashMap::new();
    let mut decision_counts: HashMap<String, usize> = HashMap::new();

    for (bot_index, spec) in args.bots.iter().enumerate() {
        let label = label_for_spec(spec);
        for episode in 0..args.episodes {
            let bot_seed = mix_seed(args.seed, bot_index as u64, episode as u64);
            let mut bot = create_bot_from_spec(spec, bot_index, bot_seed)?;
            let mut chance_rng =
                StdRng::seed_from_u64(mix_seed(args.seed, episode as u64, 0x5EED_15));
            let mut state = game.new_initial_state();
            while !state.is_terminal() {
                let outcomes = state.chance_outcomes();
                let action = if outcomes.is_empty() {
                    let legal = state.legal_actions();
                    if legal.is_empty() {
                        return Err(GameError::InvalidConfiguration(
                            "no legal actions available in a live state",
                        )
                        .into());
                    }
                    let t0 = Instant::now();
                    let action = bot.select_action(&state, &legal);
                    let dt = t0.elapsed();
                    *decision_time_ns.entry(label.clone()).or_default() += dt.as_nanos();
                    *decision_counts.entry(label.clone()).or_default() += 1;
                    action
                } else {
                    sample_outcome(&outcomes, &mut chance_rng)
                };
                state.apply_action(action)?;
            }
            stats_per_label.entry(label.clone()).or_default().record(&state);
        }
    }

    // Sort by catch rate desc, then by label.
    let mut results: Vec<(String, EpisodeStats)> = stats_per_label.into_iter().collect();
    results.sort_by(|a, b| {
        b.1.catch_rate()
            .partial_cmp(&a.1.catch_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    println!(
        "Catch rates over {} episode(s) on a {}x{} board:",
        args.episodes, args.rows, args.columns
    );
    for (label, stats) in &results {
        println!(
            "  {label:<12}  {}/{}  ({:.2}%)   mean return: {:+.3}",
            stats.caught,
            stats.episodes,
            stats.catch_rate() * 100.0,
            stats.mean_return()
        );
    }

    if !args.no_chart {
        let format = args
            .format
            .or_else(|| ChartFormat::from_path(&args.out))
            .unwrap_or(ChartFormat::Png);
        if !matches!(format, ChartFormat::Png) {
            return Err("only PNG output is supported currently; use --out with .png".into());
        }
        render_bar_chart(&args.out, &results)?;
        println!("\nChart written to {}", args.out.display());
    }

    if !decision_counts.is_empty() {
        println!("\nDecision time (per bot label):");
        for (label, _) in &results {
            let Some(&count) = decision_counts.get(label) else {
                continue;
            };
            let total_ns = *decision_time_ns.get(label).unwrap_or(&0u128);
            let total_ms = (total_ns as f64) / 1.0e6;
            let avg_us = if count > 0 {
                (total_ns as f64) / 1.0e3 / (count as f64)
            } else {
                0.0
            };
            println!(
                "  {label:<12}  decisions: {count:<8}  total: {total_ms:.3} ms  avg: {avg_us:.3} us"
            );
        }
    }

    Ok(())
}

fn sample_outcome<R: Rng>(outcomes: &[(Action, f64)], rng: &mut R) -> Action {
    let mut draw: f64 = rng.gen_range(0.0..1.0);
    for (action, probability) in outcomes {
        if draw < *probability {
            return *action;
        }
        draw -= probability;
    }
    outcomes[outcomes.len() - 1].0
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    // Simple reversible mixer (xorshift-like mix).
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}

fn render_bar_chart(
    out: &PathBuf,
    data: &[(String, EpisodeStats)],
) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = data.iter().map(|(_, s)| s.catch_rate() * 100.0).collect();

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Catch Bot Catch Rates", ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), 0.0f64..100.0f64)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Catch rate (%)")
        .x_desc("Bot type")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| {
            if *idx < labels.len() {
                labels[*idx].clone()
            } else {
                idx.to_string()
            }
        })
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    for (i, value) in values.iter().enumerate() {
        let rect = Rectangle::new([(i, 0.0), (i, *value)], BLUE.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
