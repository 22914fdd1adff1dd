pub use self::{board::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Grid width in cells.
pub const BOARD_COLS: usize = 10;
/// Grid height in cells. Row 0 is the spawn row.
pub const BOARD_ROWS: usize = 20;
