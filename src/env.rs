//! Generic turn-based environment abstraction.
//!
//! Drivers that step many environment kinds (policy evaluation, rollout
//! collection, search) program against these traits; the Catch types are one
//! conforming implementation.

use crate::error::GameError;
use crate::game::CatchGame;
use crate::ml::StateEncoder;
use crate::state::{Actor, CatchState};
use crate::visualize::render_state;

/// Immutable environment definition and factory for fresh episodes.
pub trait Game {
    type State: GameState;

    fn num_distinct_actions(&self) -> usize;
    fn max_chance_outcomes(&self) -> usize;
    fn num_players(&self) -> usize;
    fn min_utility(&self) -> f64;
    fn max_utility(&self) -> f64;
    fn max_game_length(&self) -> usize;
    fn new_initial_state(&self) -> Self::State;
}

/// Mutable per-episode state behind the uniform step protocol: query legal
/// actions or the chance distribution, apply one action, query
/// terminal/returns, repeat.
pub trait GameState: Clone {
    type Action: Clone;

    fn current_actor(&self) -> Actor;
    fn legal_actions(&self) -> Vec<Self::Action>;
    fn chance_outcomes(&self) -> Vec<(Self::Action, f64)>;
    fn apply_action(&mut self, action: Self::Action) -> Result<(), GameError>;
    fn undo_action(&mut self, action: Self::Action) -> Result<(), GameError>;
    fn is_terminal(&self) -> bool;
    fn returns(&self) -> Vec<f64>;
    fn observation_vector(&self) -> Vec<f32>;
    fn information_state_vector(&self) -> Vec<f32>;
    fn render(&self) -> String;
}

impl Game for CatchGame {
    type State = CatchState;

    fn num_distinct_actions(&self) -> usize {
        CatchGame::num_distinct_actions(self)
    }

    fn max_chance_outcomes(&self) -> usize {
        CatchGame::max_chance_outcomes(self)
    }

    fn num_players(&self) -> usize {
        CatchGame::num_players(self)
    }

    fn min_utility(&self) -> f64 {
        CatchGame::min_utility(self)
    }

    fn max_utility(&self) -> f64 {
        CatchGame::max_utility(self)
    }

    fn max_game_length(&self) -> usize {
        CatchGame::max_game_length(self)
    }

    fn new_initial_state(&self) -> CatchState {
        CatchGame::new_initial_state(self)
    }
}

impl GameState for CatchState {
    type Action = crate::action::Action;

    fn current_actor(&self) -> Actor {
        CatchState::current_actor(self)
    }

    fn legal_actions(&self) -> Vec<Self::Action> {
        CatchState::legal_actions(self)
    }

    fn chance_outcomes(&self) -> Vec<(Self::Action, f64)> {
        CatchState::chance_outcomes(self)
    }

    fn apply_action(&mut self, action: Self::Action) -> Result<(), GameError> {
        CatchState::apply_action(self, action)
    }

    fn undo_action(&mut self, action: Self::Action) -> Result<(), GameError> {
        CatchState::undo_action(self, action)
    }

    fn is_terminal(&self) -> bool {
        CatchState::is_terminal(self)
    }

    fn returns(&self) -> Vec<f64> {
        CatchState::returns(self)
    }

    fn observation_vector(&self) -> Vec<f32> {
        StateEncoder::observation(self)
    }

    fn information_state_vector(&self) -> Vec<f32> {
        StateEncoder::information_state(self)
    }

    fn render(&self) -> String {
        render_state(self)
    }
}
