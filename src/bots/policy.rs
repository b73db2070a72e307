use burn::tensor::backend::Backend;

use crate::action::Action;
use crate::bot::Bot;
use crate::ml::{ActionSpace, PolicyNetwork};
use crate::state::CatchState;

/// Policy-driven bot backed by a Burn neural network.
pub struct PolicyBot<B: Backend> {
    policy: PolicyNetwork<B>,
}

impl<B: Backend> PolicyBot<B>
where
    B::Device: Default,
{
    pub fn new(policy: PolicyNetwork<B>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyNetwork<B> {
        &self.policy
    }
}

impl<B: Backend> Bot for PolicyBot<B>
where
    B::Device: Default,
{
    fn select_action(&mut self, state: &CatchState, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "policy bot requires at least one legal action"
        );
        let logits = self.policy.forward_state(state);
        let values: Vec<f32> = logits
            .into_data()
            .to_vec::<f32>()
            .expect("tensor conversion");
        let mut best: Option<(f32, Action)> = None;
        for action in legal_actions {
            let Some(index) = ActionSpace::action_index(action) else {
                continue;
            };
            let value = values[index];
            match &mut best {
                Some((best_value, best_action)) => {
                    if value > *best_value {
                        *best_value = value;
                        *best_action = *action;
                    }
                }
                None => best = Some((value, *action)),
            }
        }
        // Chance actions carry no logit; fall back to the first legal one.
        best.map(|(_, action)| action)
            .unwrap_or_else(|| legal_actions[0])
    }
}
