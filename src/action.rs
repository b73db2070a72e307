use serde::{Deserialize, Serialize};

/// Zero-based index of a player within the game. Catch has exactly one.
pub type PlayerId = usize;

/// Horizontal paddle move applied on a player turn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PaddleMove {
    Left,
    Stay,
    Right,
}

impl PaddleMove {
    /// All moves, ordered by their flat action index.
    pub const ALL: [PaddleMove; 3] = [PaddleMove::Left, PaddleMove::Stay, PaddleMove::Right];

    /// Column delta requested by the move, before edge clamping.
    #[inline]
    pub fn delta(self) -> isize {
        match self {
            PaddleMove::Left => -1,
            PaddleMove::Stay => 0,
            PaddleMove::Right => 1,
        }
    }

    /// Stable index used by the flat action space.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PaddleMove::Left => 0,
            PaddleMove::Stay => 1,
            PaddleMove::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Transition available to an environment driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Chance outcome that drops the ball into its starting column.
    Drop { column: usize },
    /// Paddle move on a player turn.
    Paddle(PaddleMove),
}

impl Action {
    /// Returns the paddle move when the action is a player move.
    pub fn paddle_move(&self) -> Option<PaddleMove> {
        match self {
            Action::Paddle(mv) => Some(*mv),
            Action::Drop { .. } => None,
        }
    }

    /// Returns true when the action resolves the chance node.
    pub fn is_chance(&self) -> bool {
        matches!(self, Action::Drop { .. })
    }
}
