//! Plain-text output shared by the binaries: board frames, scoreboards and
//! exploration statistics.

mod board_view;

pub use board_view::BoardView;
