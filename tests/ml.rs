use burn_ndarray::NdArray;

use catchbot::ml::{ActionSpace, StateEncoder};
use catchbot::{Action, Bot, CatchGame, GameState, PaddleMove, PolicyBot, PolicyNetwork};

type Backend = NdArray<f32>;

#[test]
fn encoders_output_expected_lengths() {
    let game = CatchGame::default();
    let mut state = game.new_initial_state();
    state.apply_action(Action::Drop { column: 2 }).expect("drop");
    assert_eq!(StateEncoder::observation(&state).len(), 50);
    assert_eq!(StateEncoder::information_state(&state).len(), 35);
}

#[test]
fn trait_encodings_match_the_encoder() {
    let game = CatchGame::default();
    let mut state = game.new_initial_state();
    state.apply_action(Action::Drop { column: 1 }).expect("drop");
    state
        .apply_action(Action::Paddle(PaddleMove::Left))
        .expect("left");
    assert_eq!(state.observation_vector(), StateEncoder::observation(&state));
    assert_eq!(
        state.information_state_vector(),
        StateEncoder::information_state(&state)
    );
}

#[test]
fn observation_tracks_the_descending_ball() {
    let game = CatchGame::with_dimensions(3, 3).expect("game");
    let mut state = game.new_initial_state();
    state.apply_action(Action::Drop { column: 0 }).expect("drop");
    let columns = game.num_columns();
    let before = StateEncoder::observation(&state);
    assert_eq!(before[0], 1.0);
    state
        .apply_action(Action::Paddle(PaddleMove::Stay))
        .expect("stay");
    let after = StateEncoder::observation(&state);
    assert_eq!(after[0], 0.0);
    assert_eq!(after[columns], 1.0);
}

#[test]
fn policy_network_and_bot_return_legal_action() {
    let game = CatchGame::default();
    let mut state = game.new_initial_state();
    state.apply_action(Action::Drop { column: 4 }).expect("drop");
    let mut bot = PolicyBot::<Backend>::new(PolicyNetwork::<Backend>::with_defaults(
        game.settings(),
    ));
    let legal_actions = state.legal_actions();
    let action = bot.select_action(&state, &legal_actions);
    assert!(legal_actions.contains(&action));
    let index = ActionSpace::action_index(&action).expect("mapped index");
    assert!(index < ActionSpace::MAX);
}

#[test]
fn policy_bot_plays_full_episodes() {
    let game = CatchGame::default();
    let mut bot = PolicyBot::<Backend>::new(PolicyNetwork::<Backend>::with_defaults(
        game.settings(),
    ));
    let mut state = game.new_initial_state();
    state.apply_action(Action::Drop { column: 0 }).expect("drop");
    while !state.is_terminal() {
        let legal = state.legal_actions();
        let action = bot.select_action(&state, &legal);
        state.apply_action(action).expect("legal action applies");
    }
    let returns = state.returns();
    assert_eq!(returns.len(), 1);
    assert!(returns[0] == 1.0 || returns[0] == -1.0);
}
