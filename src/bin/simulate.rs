use std::env;
use std::error::Error;
use std::process;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use catchbot::{
    Action, Bot, CatchGame, EpisodeStats, create_bot_from_spec, describe_action, describe_state,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut visualize = false;
    let mut seed = DEFAULT_SEED;
    let mut episodes = 1usize;
    let mut rows: Option<usize> = None;
    let mut columns: Option<usize> = None;
    let mut bot_spec: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--visualize" => visualize = true,
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--episodes" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--episodes requires a value".to_string())?;
                episodes = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid episodes value: {value}"))?;
            }
            "--rows" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--rows requires a value".to_string())?;
                rows = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid rows value: {value}"))?,
                );
            }
            "--columns" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--columns requires a value".to_string())?;
                columns = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid columns value: {value}"))?,
                );
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            other if bot_spec.is_none() => bot_spec = Some(other.to_string()),
            other => return Err(format!("unexpected argument: {other}").into()),
        }
    }

    let game = match (rows, columns) {
        (None, None) => CatchGame::default(),
        (r, c) => CatchGame::with_dimensions(
            r.unwrap_or(catchbot::DEFAULT_ROWS),
            c.unwrap_or(catchbot::DEFAULT_COLUMNS),
        )?,
    };
    let bot_spec = bot_spec.unwrap_or_else(|| String::from("human"));
    let mut bot = create_bot_from_spec(&bot_spec, 0, seed)?;
    let mut chance_rng = StdRng::seed_from_u64(seed ^ 0x5EED_CAFE);

    println!(
        "Starting Catch simulation: {} episode(s) on a {}x{} board, bot '{bot_spec}'.\n",
        episodes,
        game.num_rows(),
        game.num_columns()
    );

    let mut stats = EpisodeStats::new();
    for episode in 0..episodes {
        let mut state = game.new_initial_state();
        while !state.is_terminal() {
            let outcomes = state.chance_outcomes();
            let action = if outcomes.is_empty() {
                let legal = state.legal_actions();
                bot.select_action(&state, &legal)
            } else {
                sample_outcome(&outcomes, &mut chance_rng)
            };
            if visualize {
                println!("{}", describe_state(&state));
                println!("Chosen action: {}\n", describe_action(&action));
            }
            state.apply_action(action)?;
        }
        let outcome = if state.caught() { "caught" } else { "missed" };
        println!(
            "Episode {}: {} (return {:+.0})",
            episode + 1,
            outcome,
            state.returns().first().copied().unwrap_or(0.0)
        );
        if visualize {
            println!("{}", describe_state(&state));
        }
        stats.record(&state);
    }

    println!(
        "\nFinished: {}/{} caught ({:.1}%), mean return {:+.3}.",
        stats.caught,
        stats.episodes,
        stats.catch_rate() * 100.0,
        stats.mean_return()
    );
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

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [BOT]");
    println!("  --visualize           Show the board and chosen actions each turn");
    println!("  --seed <u64>          Seed for the chance node and bot RNGs (default: {DEFAULT_SEED:#x})");
    println!("  --episodes <usize>    Number of episodes to play (default: 1)");
    println!("  --rows <usize>        Board rows (default: {})", catchbot::DEFAULT_ROWS);
    println!("  --columns <usize>     Board columns (default: {})", catchbot::DEFAULT_COLUMNS);
    println!("  --help                Show this help message");
    println!("Bot specs:");
    println!("  human[:name]          Interactive human-controlled paddle");
    println!("  random[:seed]         Random bot with optional per-bot seed");
    println!("  tracker               Paddle follows the ball's column");
    println!("If no bot is provided, defaults to an interactive human.");
}
