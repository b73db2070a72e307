use std::fmt::Write;

use crate::action::{Action, PaddleMove};
use crate::state::{CatchState, CellState};

const EMPTY_MARKER: char = '.';
const BALL_MARKER: char = 'b';
const PADDLE_MARKER: char = 'x';
/// Last-row cell where ball and paddle coincide.
const CAUGHT_MARKER: char = '*';

/// Renders the board as one text row per grid row.
pub fn render_state(state: &CatchState) -> String {
    let settings = state.settings();
    let mut out = String::with_capacity((settings.columns + 1) * settings.rows);
    for row in 0..settings.rows {
        for column in 0..settings.columns {
            let on_paddle = row == settings.rows - 1 && column == state.paddle_col();
            let marker = match state.cell(row, column) {
                Ok(CellState::Ball) if on_paddle => CAUGHT_MARKER,
                Ok(CellState::Ball) => BALL_MARKER,
                Ok(CellState::Paddle) => PADDLE_MARKER,
                _ => EMPTY_MARKER,
            };
            out.push(marker);
        }
        out.push('\n');
    }
    out
}

/// Human-readable summary of an episode for CLI output.
pub fn describe_state(state: &CatchState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Actor: {:?}", state.current_actor());
    match (state.ball_row(), state.ball_col()) {
        (Some(row), Some(column)) => {
            let _ = writeln!(out, "Ball: row {row}, column {column}");
        }
        _ => {
            let _ = writeln!(out, "Ball: not dropped yet");
        }
    }
    let _ = writeln!(out, "Paddle: column {}", state.paddle_col());
    out.push_str(&render_state(state));
    out
}

pub fn describe_action(action: &Action) -> String {
    match action {
        Action::Drop { column } => format!("Drop ball into column {column}"),
        Action::Paddle(PaddleMove::Left) => String::from("Move paddle left"),
        Action::Paddle(PaddleMove::Stay) => String::from("Keep paddle in place"),
        Action::Paddle(PaddleMove::Right) => String::from("Move paddle right"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, PaddleMove};
    use crate::game::CatchGame;

    #[test]
    fn render_marks_ball_and_paddle() {
        let game = CatchGame::with_dimensions(3, 3).expect("game");
        let mut state = game.new_initial_state();
        state.apply_action(Action::Drop { column: 0 }).expect("drop");
        let text = render_state(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["b..", "...", ".x."]);
    }

    #[test]
    fn render_combines_markers_when_caught() {
        let game = CatchGame::with_dimensions(2, 3).expect("game");
        let mut state = game.new_initial_state();
        state.apply_action(Action::Drop { column: 1 }).expect("drop");
        state
            .apply_action(Action::Paddle(PaddleMove::Stay))
            .expect("stay");
        assert!(state.caught());
        let text = render_state(&state);
        assert_eq!(text.lines().last(), Some(".*."));
    }

    #[test]
    fn describe_action_covers_all_kinds() {
        assert_eq!(
            describe_action(&Action::Drop { column: 2 }),
            "Drop ball into column 2"
        );
        assert_eq!(
            describe_action(&Action::Paddle(PaddleMove::Left)),
            "Move paddle left"
        );
        assert_eq!(
            describe_action(&Action::Paddle(PaddleMove::Stay)),
            "Keep paddle in place"
        );
    }
}
