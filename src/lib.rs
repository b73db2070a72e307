//! Catch environment engine tailored for reinforcement learning workloads and bot experimentation.

pub mod action;
pub mod bot;
pub mod bots;
pub mod env;
pub mod error;
pub mod game;
pub mod ml;
pub mod state;
pub mod stats;
pub mod visualize;

pub use crate::action::{Action, PaddleMove, PlayerId};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, label_for_spec};
pub use crate::bots::{HumanBot, PolicyBot, RandomBot, TrackerBot};
pub use crate::env::{Game, GameState};
pub use crate::error::{GameError, ProtocolViolation};
pub use crate::game::{
    BoardSettings, CatchGame, DEFAULT_COLUMNS, DEFAULT_ROWS, NUM_ACTIONS, NUM_PLAYERS,
};
pub use crate::ml::{ActionSpace, DEFAULT_HIDDEN, DEFAULT_STACK, PolicyNetwork, StateEncoder};
pub use crate::state::{Actor, CatchState, CellState};
pub use crate::stats::EpisodeStats;
pub use crate::visualize::{describe_action, describe_state, render_state};
