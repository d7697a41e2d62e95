use crate::game::{Action, AgentId, State, EMPTY};

/// Symbol for the querying agent's own marks.
pub const OWN_MARK: char = 'X';
/// Symbol for any other agent's marks.
pub const OTHER_MARK: char = 'O';
/// Symbol for an empty cell.
pub const EMPTY_MARK: char = '-';

/// Encode a state as a value-table key, from `agent`'s point of view.
///
/// One symbol per cell, row-major. When `action` is given its cell is always
/// rendered as [`OWN_MARK`], so the key describes the state after the move.
/// Numeric ids never leak into the key: every agent sees its own pieces as
/// `X`.
pub fn marshal_state(agent: AgentId, state: &State, action: Option<Action>) -> String {
    let mut key = String::with_capacity(state.cells().len());
    for (y, row) in state.rows().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let forced = action.is_some_and(|a| a.x == x && a.y == y);
            let symbol = if forced || cell == agent {
                OWN_MARK
            } else if cell == EMPTY {
                EMPTY_MARK
            } else {
                OTHER_MARK
            };
            key.push(symbol);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> State {
        State::from_rows(&[vec![1, 0, 2], vec![0, 2, 0], vec![0, 0, 1]]).unwrap()
    }

    #[test]
    fn test_marshal_without_action() {
        assert_eq!(marshal_state(1, &sample_state(), None), "X-O-O---X");
    }

    #[test]
    fn test_marshal_forces_action_cell() {
        let state = sample_state();
        assert_eq!(
            marshal_state(1, &state, Some(Action::new(1, 0))),
            "XXO-O---X"
        );
        // An occupied cell is still rendered as the agent's own mark
        assert_eq!(
            marshal_state(1, &state, Some(Action::new(1, 1))),
            "X-O-X---X"
        );
    }

    #[test]
    fn test_marshal_is_agent_symmetric() {
        let ones = State::from_rows(&[vec![1, 2], vec![0, 0]]).unwrap();
        let twos = State::from_rows(&[vec![2, 1], vec![0, 0]]).unwrap();
        assert_eq!(
            marshal_state(1, &ones, Some(Action::new(0, 1))),
            marshal_state(2, &twos, Some(Action::new(0, 1)))
        );
    }

    #[test]
    fn test_marshal_ignores_out_of_grid_action() {
        let state = sample_state();
        assert_eq!(
            marshal_state(2, &state, Some(Action::new(5, 5))),
            "O-X-X---O"
        );
    }
}
