use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::state::CatchState;

pub const NUM_PLAYERS: usize = 1;
pub const NUM_ACTIONS: usize = 3;
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLUMNS: usize = 5;

/// Validated board geometry. Every state spawned from one game shares it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSettings {
    pub rows: usize,
    pub columns: usize,
}

impl BoardSettings {
    pub fn new(rows: usize, columns: usize) -> Result<Self, GameError> {
        if rows == 0 {
            return Err(GameError::InvalidConfiguration("rows must be positive"));
        }
        if columns == 0 {
            return Err(GameError::InvalidConfiguration("columns must be positive"));
        }
        Ok(Self { rows, columns })
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// Catch game definition: immutable geometry, the derived constants a driver
/// needs, and the factory for fresh episode states.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatchGame {
    settings: BoardSettings,
}

impl CatchGame {
    pub fn new(settings: BoardSettings) -> Self {
        Self { settings }
    }

    pub fn with_dimensions(rows: usize, columns: usize) -> Result<Self, GameError> {
        Ok(Self::new(BoardSettings::new(rows, columns)?))
    }

    pub fn settings(&self) -> BoardSettings {
        self.settings
    }

    pub fn num_rows(&self) -> usize {
        self.settings.rows
    }

    pub fn num_columns(&self) -> usize {
        self.settings.columns
    }

    pub fn num_distinct_actions(&self) -> usize {
        NUM_ACTIONS
    }

    /// The ball's starting column ranges over every column.
    pub fn max_chance_outcomes(&self) -> usize {
        self.settings.columns
    }

    pub fn num_players(&self) -> usize {
        NUM_PLAYERS
    }

    pub fn min_utility(&self) -> f64 {
        -1.0
    }

    pub fn max_utility(&self) -> f64 {
        1.0
    }

    /// The ball descends one row per player turn and terminates on the last.
    pub fn max_game_length(&self) -> usize {
        self.settings.rows
    }

    pub fn observation_len(&self) -> usize {
        self.settings.rows * self.settings.columns
    }

    pub fn information_state_len(&self) -> usize {
        self.settings.columns + NUM_ACTIONS * self.settings.rows
    }

    /// Produces a fresh, independent, uninitialized episode state.
    pub fn new_initial_state(&self) -> CatchState {
        CatchState::new(self.settings)
    }
}
