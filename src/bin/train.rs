use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use burn::module::{AutodiffModule, Module};
use burn::optim::AdamConfig;
use burn::record::{BinBytesRecorder, FullPrecisionSettings, Recorder};
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use catchbot::ml::{PolicyDataset, PolicySample, PolicyTrainer, TrainingLoopConfig};
use catchbot::{
    Action, Bot, CatchGame, DEFAULT_HIDDEN, DEFAULT_STACK, EpisodeStats, PolicyBot, PolicyNetwork,
    TrackerBot,
};

type TrainBackend = Autodiff<NdArray<f32>>;
type InferenceBackend = NdArray<f32>;

#[derive(Parser, Debug)]
#[command(
    about = "Train a Catch policy bot on tracker demonstrations using the Burn framework",
    version,
    author
)]
struct TrainArgs {
    /// Board rows.
    #[arg(long, default_value_t = catchbot::DEFAULT_ROWS)]
    rows: usize,
    /// Board columns.
    #[arg(long, default_value_t = catchbot::DEFAULT_COLUMNS)]
    columns: usize,
    /// Number of demonstration episodes to collect.
    #[arg(long = "episodes", default_value_t = 512)]
    episodes: usize,
    /// Mini-batch size used during optimization.
    #[arg(long, default_value_t = 64)]
    batch_size: usize,
    /// Number of training epochs.
    #[arg(long, default_value_t = 20)]
    epochs: usize,
    /// Hidden layer width for the policy network.
    #[arg(long, default_value_t = DEFAULT_HIDDEN)]
    hidden: usize,
    /// Number of hidden layers (stack depth) for the policy network.
    #[arg(long, default_value_t = DEFAULT_STACK)]
    depth: usize,
    /// Learning rate passed to the Adam optimizer.
    #[arg(long, default_value_t = 1.0e-3)]
    learning_rate: f64,
    /// Fraction of the dataset to hold out for validation (0.0 - 0.5).
    #[arg(long, default_value_t = 0.1)]
    validation_split: f32,
    /// Exploration probability applied during data collection.
    #[arg(long, default_value_t = 0.05)]
    exploration: f32,
    /// Episodes used to evaluate the trained bot.
    #[arg(long, default_value_t = 500)]
    eval_episodes: usize,
    /// Base RNG seed.
    #[arg(long, default_value_t = 0x7EAC_4E55_EED5_u64)]
    seed: u64,
    /// File where the trained policy checkpoint will be written.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Serialized form of a trained policy plus the geometry it was trained for.
#[derive(Serialize, Deserialize)]
struct PolicyCheckpoint {
    rows: usize,
    columns: usize,
    hidden: usize,
    depth: usize,
    weights: Vec<u8>,
}

fn main() {
    let args = TrainArgs::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    if !(0.0..=0.5).contains(&args.validation_split) {
        return Err("validation-split must be between 0.0 and 0.5".into());
    }
    if !(0.0..=1.0).contains(&args.exploration) {
        return Err("exploration must be between 0.0 and 1.0".into());
    }

    let game = CatchGame::with_dimensions(args.rows, args.columns)?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    println!(
        "Collecting {} demonstration episode(s) on a {}x{} board...",
        args.episodes, args.rows, args.columns
    );
    let dataset = collect_demonstrations(&game, args.episodes, args.exploration, &mut rng)?;
    println!("Collected {} samples.", dataset.len());

    let (mut train_set, validation_set) = dataset.split(args.validation_split, &mut rng);
    let validation = (!validation_set.is_empty()).then_some(&validation_set);

    let model = PolicyNetwork::<TrainBackend>::new(game.settings(), args.hidden, args.depth);
    let mut trainer = PolicyTrainer::with_config(model, AdamConfig::new(), args.learning_rate);

    let history = trainer.fit(
        &mut train_set,
        validation,
        TrainingLoopConfig {
            epochs: args.epochs,
            batch_size: args.batch_size,
        },
        &mut rng,
    );
    for metrics in &history {
        match metrics.validation_loss {
            Some(validation_loss) => println!(
                "epoch {:>3}  train loss {:.5}  validation loss {:.5}  ({} batches, {} samples)",
                metrics.epoch, metrics.train_loss, validation_loss, metrics.batches, metrics.samples
            ),
            None => println!(
                "epoch {:>3}  train loss {:.5}  ({} batches, {} samples)",
                metrics.epoch, metrics.train_loss, metrics.batches, metrics.samples
            ),
        }
    }

    let inference_model: PolicyNetwork<InferenceBackend> = trainer.model().valid();
    let eval_seed = args.seed ^ 0xE7A1_5EED;
    let policy_stats = evaluate(
        &game,
        &mut PolicyBot::new(inference_model.clone()),
        args.eval_episodes,
        eval_seed,
    )?;
    let tracker_stats = evaluate(&game, &mut TrackerBot::new(), args.eval_episodes, eval_seed)?;
    println!(
        "\nEvaluation over {} episode(s): policy {:.2}% caught, tracker {:.2}% caught.",
        args.eval_episodes,
        policy_stats.catch_rate() * 100.0,
        tracker_stats.catch_rate() * 100.0
    );

    if let Some(path) = args.output {
        let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
        let weights = recorder.record(inference_model.into_record(), ())?;
        let checkpoint = PolicyCheckpoint {
            rows: args.rows,
            columns: args.columns,
            hidden: args.hidden,
            depth: args.depth,
            weights,
        };
        let bytes = bincode::serde::encode_to_vec(&checkpoint, bincode::config::standard())?;
        fs::write(&path, bytes)?;
        println!("Checkpoint written to {}", path.display());
    }

    Ok(())
}

/// Plays episodes with the tracker demonstrator, labelling every visited
/// player node with the tracker's choice. With probability `exploration` the
/// executed move is random so off-path states also appear in the dataset.
fn collect_demonstrations(
    game: &CatchGame,
    episodes: usize,
    exploration: f32,
    rng: &mut StdRng,
) -> Result<PolicyDataset, Box<dyn Error>> {
    let mut dataset = PolicyDataset::new();
    let mut tracker = TrackerBot::new();
    for _ in 0..episodes {
        let mut state = game.new_initial_state();
        while !state.is_terminal() {
            let outcomes = state.chance_outcomes();
            if !outcomes.is_empty() {
                let action = sample_outcome(&outcomes, rng);
                state.apply_action(action)?;
                continue;
            }
            let legal = state.legal_actions();
            let expert = tracker.select_action(&state, &legal);
            dataset.push(PolicySample::from_transition(&state, &legal, &[expert], 1.0));
            let executed = if rng.gen_range(0.0..1.0) < exploration {
                *legal.choose(rng).unwrap_or(&expert)
            } else {
                expert
            };
            state.apply_action(executed)?;
        }
    }
    Ok(dataset)
}

fn evaluate(
    game: &CatchGame,
    bot: &mut dyn Bot,
    episodes: usize,
    seed: u64,
) -> Result<EpisodeStats, Box<dyn Error>> {
    let mut stats = EpisodeStats::new();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..episodes {
        let mut state = game.new_initial_state();
        while !state.is_terminal() {
            let outcomes = state.chance_outcomes();
            let action = if outcomes.is_empty() {
                let legal = state.legal_actions();
                bot.select_action(&state, &legal)
            } else {
                sample_outcome(&outcomes, &mut rng)
            };
            state.apply_action(action)?;
        }
        stats.record(&state);
    }
    Ok(stats)
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
