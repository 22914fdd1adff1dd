use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{BOARD_COLS, BOARD_ROWS, piece::ActivePiece, shape::PieceKind};

/// A single cell of the settled grid.
///
/// A filled cell remembers the kind of the piece that locked into it, which
/// doubles as the color token for rendering collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Empty cell (no settled piece).
    #[default]
    Empty,
    /// Cell occupied by a locked piece of the given kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The kind of the piece occupying this cell, if any.
    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }

    const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(kind) => kind.as_char(),
        }
    }
}

/// The fixed 20×10 occupancy grid holding settled cells.
///
/// Row 0 is the spawn row at the top; rows are ordered top to bottom. The
/// dimensions never change after construction. The board holds no knowledge
/// of the falling piece - the session owns that and consults [`Board::collides`]
/// before committing any movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [[Cell; BOARD_COLS]; BOARD_ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: rows as piece-char strings joined by commas,
        // e.g. "..........,..........,...,....IIII.."
        let mut s = String::with_capacity(BOARD_ROWS * (BOARD_COLS + 1));
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                s.push(',');
            }
            for cell in row {
                let _ = write!(&mut s, "{}", cell.as_char());
            }
        }
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_ROWS {
            return Err(Error::custom(format!(
                "expected {BOARD_ROWS} comma-separated rows, got {}",
                parts.len()
            )));
        }

        let mut rows = [[Cell::Empty; BOARD_COLS]; BOARD_ROWS];
        for (y, part) in parts.iter().enumerate() {
            let chars: Vec<char> = part.chars().collect();
            if chars.len() != BOARD_COLS {
                return Err(Error::custom(format!(
                    "row {y} must have {BOARD_COLS} cells, got {}",
                    chars.len()
                )));
            }
            for (x, &c) in chars.iter().enumerate() {
                rows[y][x] = match c {
                    '.' => Cell::Empty,
                    _ => Cell::Filled(PieceKind::from_char(c).ok_or_else(|| {
                        Error::custom(format!("invalid cell '{c}' at ({x}, {y})"))
                    })?),
                };
            }
        }
        Ok(Board { rows })
    }
}

impl Board {
    pub const COLS: usize = BOARD_COLS;
    pub const ROWS: usize = BOARD_ROWS;

    pub const EMPTY: Self = Self {
        rows: [[Cell::Empty; BOARD_COLS]; BOARD_ROWS],
    };

    /// Returns the cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_COLS]> {
        self.rows.iter()
    }

    /// Checks whether the piece overlaps settled cells or the boundaries.
    ///
    /// A cell collides when it is out of bounds horizontally, at or below the
    /// bottom row, or on an occupied cell at a non-negative row. Rows above
    /// the visible top (`y < 0`) are never checked against board contents, so
    /// a piece may extend above the grid.
    #[must_use]
    pub fn collides(&self, piece: &ActivePiece) -> bool {
        #[expect(clippy::cast_possible_wrap)]
        const COLS: i16 = BOARD_COLS as i16;
        #[expect(clippy::cast_possible_wrap)]
        const ROWS: i16 = BOARD_ROWS as i16;

        piece.cells().into_iter().any(|(x, y)| {
            if x < 0 || x >= COLS || y >= ROWS {
                return true;
            }
            #[expect(clippy::cast_sign_loss)]
            let occupied = y >= 0 && !self.rows[y as usize][x as usize].is_empty();
            occupied
        })
    }

    /// Writes the piece's occupied cells into the grid with its kind token.
    ///
    /// Called exactly once per piece, when a downward move is rejected and
    /// the piece locks. Cells above the visible top are dropped.
    pub fn merge(&mut self, piece: &ActivePiece) {
        for (x, y) in piece.cells() {
            if (0..Self::cols_i16()).contains(&x) && (0..Self::rows_i16()).contains(&y) {
                #[expect(clippy::cast_sign_loss)]
                {
                    self.rows[y as usize][x as usize] = Cell::Filled(piece.kind());
                }
            }
        }
    }

    /// Removes every full row, shifts the rows above it down, and prepends
    /// empty rows at the top. Returns the number of rows cleared.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_ROWS).rev() {
            if self.rows[y].iter().all(|cell| !cell.is_empty()) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill([Cell::Empty; BOARD_COLS]);
        count
    }

    /// Empties the entire grid. Used by restart and the clear-all ability.
    pub fn clear_all(&mut self) {
        self.rows = [[Cell::Empty; BOARD_COLS]; BOARD_ROWS];
    }

    /// Creates a `Board` from ASCII art for testing.
    ///
    /// `.` is an empty cell; a piece-kind character (`I`, `O`, `T`, `L`,
    /// `J`, `S`, `Z`) or `#` (stored as the I kind) is an occupied cell.
    /// Rows are listed top to bottom and each must be 10 cells wide; missing
    /// trailing rows are left empty.
    ///
    /// # Panics
    ///
    /// Panics on malformed art (wrong width, too many rows, unknown chars).
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_ROWS,
            "at most {BOARD_ROWS} rows, got {}",
            lines.len()
        );

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.trim().chars().collect();
            assert_eq!(
                chars.len(),
                BOARD_COLS,
                "each row must have exactly {BOARD_COLS} cells, got {} at row {y}",
                chars.len()
            );
            for (x, &c) in chars.iter().enumerate() {
                board.rows[y][x] = match c {
                    '.' => Cell::Empty,
                    '#' => Cell::Filled(PieceKind::I),
                    _ => Cell::Filled(
                        PieceKind::from_char(c)
                            .unwrap_or_else(|| panic!("invalid cell '{c}' at ({x}, {y})")),
                    ),
                };
            }
        }
        board
    }

    #[expect(clippy::cast_possible_wrap)]
    const fn cols_i16() -> i16 {
        BOARD_COLS as i16
    }

    #[expect(clippy::cast_possible_wrap)]
    const fn rows_i16() -> i16 {
        BOARD_ROWS as i16
    }
}
