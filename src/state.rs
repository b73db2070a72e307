use serde::{Deserialize, Serialize};

use crate::action::{Action, PaddleMove, PlayerId};
use crate::error::{GameError, ProtocolViolation};
use crate::game::BoardSettings;

/// Occupant of a single board cell. The ball wins when it shares the last
/// row with the paddle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Ball,
    Paddle,
}

/// Who is to act at the current node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    /// The ball's starting column has not been drawn yet.
    Chance,
    Player(PlayerId),
    Terminal,
}

/// Mutable per-episode state: ball and paddle positions plus the move log
/// consumed by the information-state encoding.
///
/// An episode starts at a chance node. The first applied action drops the
/// ball into its starting column; every later action shifts the paddle and
/// advances the ball one row. The episode is terminal once the ball reaches
/// the last row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatchState {
    settings: BoardSettings,
    initialized: bool,
    ball_row: Option<usize>,
    ball_col: Option<usize>,
    paddle_col: usize,
    moves: Vec<PaddleMove>,
}

impl CatchState {
    /// The paddle always starts at the horizontal center, independent of the
    /// chance outcome.
    pub(crate) fn new(settings: BoardSettings) -> Self {
        Self {
            settings,
            initialized: false,
            ball_row: None,
            ball_col: None,
            paddle_col: settings.columns / 2,
            moves: Vec::with_capacity(settings.rows),
        }
    }

    pub fn settings(&self) -> BoardSettings {
        self.settings
    }

    pub fn ball_row(&self) -> Option<usize> {
        self.ball_row
    }

    pub fn ball_col(&self) -> Option<usize> {
        self.ball_col
    }

    pub fn paddle_col(&self) -> usize {
        self.paddle_col
    }

    /// Paddle moves applied so far, one per row the ball has left behind.
    pub fn moves(&self) -> &[PaddleMove] {
        &self.moves
    }

    pub fn current_actor(&self) -> Actor {
        if self.is_terminal() {
            Actor::Terminal
        } else if !self.initialized {
            Actor::Chance
        } else {
            Actor::Player(0)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.initialized && self.ball_row == Some(self.settings.rows - 1)
    }

    /// Chance node: every starting column. Player node: all three paddle
    /// moves, edges included (clamping happens on application, not here).
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.current_actor() {
            Actor::Terminal => Vec::new(),
            Actor::Chance => (0..self.settings.columns)
                .map(|column| Action::Drop { column })
                .collect(),
            Actor::Player(_) => PaddleMove::ALL.iter().copied().map(Action::Paddle).collect(),
        }
    }

    /// Discrete uniform distribution over the starting columns; empty when
    /// not at the chance node.
    pub fn chance_outcomes(&self) -> Vec<(Action, f64)> {
        if !matches!(self.current_actor(), Actor::Chance) {
            return Vec::new();
        }
        let probability = 1.0 / self.settings.columns as f64;
        (0..self.settings.columns)
            .map(|column| (Action::Drop { column }, probability))
            .collect()
    }

    pub fn apply_action(&mut self, action: Action) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::EpisodeOver);
        }
        match action {
            Action::Drop { column } => {
                if self.initialized {
                    return Err(ProtocolViolation::BallAlreadyDropped.into());
                }
                if column >= self.settings.columns {
                    return Err(ProtocolViolation::ColumnOutOfRange(column).into());
                }
                self.ball_row = Some(0);
                self.ball_col = Some(column);
                self.initialized = true;
            }
            Action::Paddle(mv) => {
                let Some(row) = self.ball_row else {
                    return Err(ProtocolViolation::ChanceNodePending.into());
                };
                self.paddle_col = shift_clamped(self.paddle_col, mv.delta(), self.settings.columns);
                self.ball_row = Some(row + 1);
                self.moves.push(mv);
            }
        }
        Ok(())
    }

    /// Exactly inverts the most recent transition, deriving the restoration
    /// from the action value alone. A paddle move that was clamped at an edge
    /// cannot recover the prior column and re-clamps instead.
    pub fn undo_action(&mut self, action: Action) -> Result<(), GameError> {
        match action {
            Action::Drop { column } => {
                if !self.initialized
                    || self.ball_row != Some(0)
                    || self.ball_col != Some(column)
                    || !self.moves.is_empty()
                {
                    return Err(ProtocolViolation::UndoMismatch.into());
                }
                self.initialized = false;
                self.ball_row = None;
                self.ball_col = None;
            }
            Action::Paddle(mv) => {
                let Some(row) = self.ball_row else {
                    return Err(ProtocolViolation::UndoMismatch.into());
                };
                if row == 0 || self.moves.last() != Some(&mv) {
                    return Err(ProtocolViolation::UndoMismatch.into());
                }
                self.ball_row = Some(row - 1);
                self.paddle_col = shift_clamped(self.paddle_col, -mv.delta(), self.settings.columns);
                self.moves.pop();
            }
        }
        Ok(())
    }

    /// Single-entry return vector: zero while live, +1/-1 at termination.
    pub fn returns(&self) -> Vec<f64> {
        if !self.is_terminal() {
            return vec![0.0];
        }
        vec![if self.caught() { 1.0 } else { -1.0 }]
    }

    /// True once the episode ended with the paddle under the ball.
    pub fn caught(&self) -> bool {
        self.is_terminal() && self.ball_col == Some(self.paddle_col)
    }

    pub fn cell(&self, row: usize, column: usize) -> Result<CellState, GameError> {
        if row >= self.settings.rows || column >= self.settings.columns {
            return Err(ProtocolViolation::CellOutOfRange { row, column }.into());
        }
        if self.ball_row == Some(row) && self.ball_col == Some(column) {
            Ok(CellState::Ball)
        } else if row == self.settings.rows - 1 && column == self.paddle_col {
            Ok(CellState::Paddle)
        } else {
            Ok(CellState::Empty)
        }
    }
}

fn shift_clamped(column: usize, delta: isize, columns: usize) -> usize {
    (column as isize + delta).clamp(0, columns as isize - 1) as usize
}
