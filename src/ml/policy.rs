use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::Tensor;
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;

use crate::game::BoardSettings;
use crate::state::CatchState;

use super::encoding::{ActionSpace, StateEncoder};

pub const DEFAULT_HIDDEN: usize = 32;
pub const DEFAULT_STACK: usize = 2;

/// Feed-forward policy over the observation encoding, one logit per paddle
/// move.
#[derive(Module, Debug)]
pub struct PolicyNetwork<B: Backend> {
    stack: Vec<Linear<B>>,
    output: Linear<B>,
}

impl<B> PolicyNetwork<B>
where
    B: Backend,
    B::Device: Default,
{
    pub fn new(settings: BoardSettings, hidden: usize, stack_depth: usize) -> Self {
        assert!(stack_depth > 0, "stack depth must be positive");
        let mut stack = Vec::with_capacity(stack_depth);
        let device = B::Device::default();
        let mut input_size = StateEncoder::observation_len(settings);
        for _ in 0..stack_depth {
            let layer = LinearConfig::new(input_size, hidden).init(&device);
            stack.push(layer);
            input_size = hidden;
        }
        let output = LinearConfig::new(input_size, ActionSpace::MAX).init(&device);
        Self { stack, output }
    }

    pub fn with_defaults(settings: BoardSettings) -> Self {
        Self::new(settings, DEFAULT_HIDDEN, DEFAULT_STACK)
    }

    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut activations = input;
        for layer in &self.stack {
            activations = layer.forward(activations);
            activations = relu(activations);
        }
        self.output.forward(activations)
    }

    pub fn forward_state(&self, state: &CatchState) -> Tensor<B, 1> {
        let batch = StateEncoder::observation_tensor::<B>(state);
        self.forward(batch).reshape([ActionSpace::MAX])
    }
}
