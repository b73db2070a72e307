use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::action::{Action, PaddleMove};
use crate::game::{BoardSettings, NUM_ACTIONS};
use crate::state::CatchState;

/// Fixed-length numeric encodings derived from an episode state, intended as
/// direct input to a learning agent. Both are pure functions of the state.
pub struct StateEncoder;

impl StateEncoder {
    pub fn observation_len(settings: BoardSettings) -> usize {
        settings.rows * settings.columns
    }

    pub fn information_state_len(settings: BoardSettings) -> usize {
        settings.columns + NUM_ACTIONS * settings.rows
    }

    /// Row-major grid with 1.0 at the ball's and the paddle's cells. For
    /// valid initialized states the position pair and the vector determine
    /// each other.
    pub fn observation(state: &CatchState) -> Vec<f32> {
        let settings = state.settings();
        let mut out = vec![0.0; Self::observation_len(settings)];
        out[(settings.rows - 1) * settings.columns + state.paddle_col()] = 1.0;
        if let (Some(row), Some(column)) = (state.ball_row(), state.ball_col()) {
            out[row * settings.columns + column] = 1.0;
        }
        out
    }

    /// One-hot of the ball's starting column, then a one-hot per row of the
    /// paddle move taken at that row. Rows not yet reached stay all-zero.
    pub fn information_state(state: &CatchState) -> Vec<f32> {
        let settings = state.settings();
        let mut out = vec![0.0; Self::information_state_len(settings)];
        if let Some(column) = state.ball_col() {
            out[column] = 1.0;
        }
        for (row, mv) in state.moves().iter().enumerate() {
            out[settings.columns + row * NUM_ACTIONS + mv.index()] = 1.0;
        }
        out
    }

    pub fn observation_tensor<B>(state: &CatchState) -> Tensor<B, 2>
    where
        B: Backend,
        B::Device: Default,
    {
        let observation = Self::observation(state);
        let len = observation.len();
        Tensor::<B, 2>::from_data(TensorData::new(observation, [1, len]), &B::Device::default())
    }
}

/// Flat index space over the paddle moves, used for network outputs.
pub struct ActionSpace;

impl ActionSpace {
    pub const MAX: usize = NUM_ACTIONS;

    /// Chance actions have no index; the network only scores paddle moves.
    pub fn action_index(action: &Action) -> Option<usize> {
        action.paddle_move().map(PaddleMove::index)
    }

    pub fn index_to_action(index: usize) -> Option<Action> {
        PaddleMove::from_index(index).map(Action::Paddle)
    }

    pub fn mask(legal: &[Action]) -> [f32; Self::MAX] {
        const NEGATIVE: f32 = -1.0e9;
        let mut mask = [NEGATIVE; Self::MAX];
        for action in legal {
            if let Some(index) = Self::action_index(action) {
                mask[index] = 0.0;
            }
        }
        mask
    }

    pub fn mask_tensor<B>(legal: &[Action]) -> Tensor<B, 2>
    where
        B: Backend,
        B::Device: Default,
    {
        let mask = Self::mask(legal);
        Tensor::<B, 2>::from_data(TensorData::from([mask]), &B::Device::default())
    }

    pub fn targets_from_indices(indices: &[usize]) -> [f32; Self::MAX] {
        let mut target = [0.0f32; Self::MAX];
        if indices.is_empty() {
            return target;
        }
        let weight = 1.0 / indices.len() as f32;
        for &idx in indices {
            if idx < Self::MAX {
                target[idx] = weight;
            }
        }
        target
    }

    pub fn target_tensor<B>(indices: &[usize]) -> Tensor<B, 2>
    where
        B: Backend,
        B::Device: Default,
    {
        let target = Self::targets_from_indices(indices);
        Tensor::<B, 2>::from_data(TensorData::from([target]), &B::Device::default())
    }
}
