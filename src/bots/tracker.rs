use std::cmp::Ordering;

use crate::action::{Action, PaddleMove};
use crate::bot::Bot;
use crate::state::CatchState;

/// Rule-based bot that walks the paddle toward the ball's column.
///
/// Starting from the center the paddle reaches any column before the ball
/// lands on the default board, making this the expert demonstrator for
/// policy training.
#[derive(Default)]
pub struct TrackerBot;

impl TrackerBot {
    pub fn new() -> Self {
        Self
    }
}

impl Bot for TrackerBot {
    fn select_action(&mut self, state: &CatchState, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "at least one legal action must be available"
        );
        let Some(ball_col) = state.ball_col() else {
            // Chance node: nothing to track yet.
            return legal_actions[0];
        };
        let mv = match ball_col.cmp(&state.paddle_col()) {
            Ordering::Less => PaddleMove::Left,
            Ordering::Equal => PaddleMove::Stay,
            Ordering::Greater => PaddleMove::Right,
        };
        let preferred = Action::Paddle(mv);
        if legal_actions.contains(&preferred) {
            preferred
        } else {
            legal_actions[0]
        }
    }
}
