//! Episode outcome aggregation for batch simulations.

use serde::{Deserialize, Serialize};

use crate::state::CatchState;

/// Running tally over finished episodes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EpisodeStats {
    pub episodes: usize,
    pub caught: usize,
    pub total_return: f64,
}

impl EpisodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a terminal state's outcome. Recording a live state is a
    /// caller bug and is skipped.
    pub fn record(&mut self, state: &CatchState) {
        debug_assert!(state.is_terminal(), "only terminal episodes are recorded");
        if !state.is_terminal() {
            return;
        }
        self.record_return(state.returns().first().copied().unwrap_or(0.0));
    }

    pub fn record_return(&mut self, final_return: f64) {
        self.episodes += 1;
        if final_return > 0.0 {
            self.caught += 1;
        }
        self.total_return += final_return;
    }

    pub fn catch_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.caught as f64 / self.episodes as f64
        }
    }

    pub fn mean_return(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_return / self.episodes as f64
        }
    }
}
