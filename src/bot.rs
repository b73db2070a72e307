use crate::action::Action;
use crate::state::CatchState;

/// Interface for defining custom Catch bots.
pub trait Bot {
    fn select_action(&mut self, state: &CatchState, legal_actions: &[Action]) -> Action;
}
