use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// The discriminant order matches the catalog order of the shape table, and
/// each kind doubles as the color token for cells it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::L,
            4 => PieceKind::J,
            5 => PieceKind::S,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Returns the shape grid for this kind in the given rotation state.
    #[must_use]
    pub fn shape(self, rotation: Rotation) -> ShapeGrid {
        SHAPE_TABLE[self as usize][rotation.as_usize()]
    }

    /// Returns the CSS hex color associated with this piece kind.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            PieceKind::I => "#00f0f0",
            PieceKind::O => "#f0f000",
            PieceKind::T => "#a000f0",
            PieceKind::L => "#f0a000",
            PieceKind::J => "#0000f0",
            PieceKind::S => "#00f000",
            PieceKind::Z => "#f00000",
        }
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Rotation state of a piece.
///
/// One of four states; `0` is the catalog (spawn) orientation and each step
/// is 90° clockwise. Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u8);

impl Rotation {
    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: u8) -> Self {
        Rotation(index % 4)
    }

    pub(crate) const fn index(self) -> u8 {
        self.0
    }
}

/// A piece shape as a tight boolean matrix embedded in a 4×4 grid.
///
/// `width`/`height` give the tight bounding box of the shape in this rotation
/// state; cells outside it are always empty. All rotation states are
/// precomputed at compile time by the clockwise transform (transpose, then
/// reverse each row), so the catalog entries are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeGrid {
    cells: [[bool; 4]; 4],
    width: u8,
    height: u8,
}

impl ShapeGrid {
    /// Width of the tight bounding box.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Height of the tight bounding box.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Whether the cell at `(x, y)` inside the bounding box is occupied.
    #[must_use]
    pub const fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width as usize && y < self.height as usize && self.cells[y][x]
    }

    /// Relative coordinates of the four occupied cells, row-major.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(usize, usize), 4> {
        let mut cells = ArrayVec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.cells[y][x] {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// Equivalent to transposing the tight matrix and reversing each
    /// resulting row; the bounding box dimensions swap.
    #[must_use]
    pub const fn rotated_cw(self) -> Self {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut cells = [[false; 4]; 4];
        let mut y = 0;
        while y < w {
            let mut x = 0;
            while x < h {
                cells[y][x] = self.cells[h - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        Self {
            cells,
            width: self.height,
            height: self.width,
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn grid<const W: usize, const H: usize>(rows: [[bool; W]; H]) -> ShapeGrid {
    assert!(W <= 4 && H <= 4);
    let mut cells = [[false; 4]; 4];
    let mut y = 0;
    while y < H {
        let mut x = 0;
        while x < W {
            cells[y][x] = rows[y][x];
            x += 1;
        }
        y += 1;
    }
    ShapeGrid {
        cells,
        width: W as u8,
        height: H as u8,
    }
}

const fn rotations(base: ShapeGrid) -> [ShapeGrid; 4] {
    let r1 = base.rotated_cw();
    let r2 = r1.rotated_cw();
    let r3 = r2.rotated_cw();
    [base, r1, r2, r3]
}

const SHAPE_TABLE: [[ShapeGrid; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    [
        // I-piece
        rotations(grid([[C, C, C, C]])),
        // O-piece
        rotations(grid([[C, C], [C, C]])),
        // T-piece
        rotations(grid([[C, C, C], [E, C, E]])),
        // L-piece
        rotations(grid([[C, C, C], [C, E, E]])),
        // J-piece
        rotations(grid([[C, C, C], [E, E, C]])),
        // S-piece
        rotations(grid([[C, C, E], [E, C, C]])),
        // Z-piece
        rotations(grid([[E, C, C], [C, C, E]])),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    #[test]
    fn every_shape_has_four_cells() {
        for kind in ALL_KINDS {
            let mut rotation = Rotation::default();
            for _ in 0..4 {
                assert_eq!(kind.shape(rotation).cells().len(), 4, "{kind:?}");
                rotation = rotation.rotated_cw();
            }
        }
    }

    #[test]
    fn four_rotations_return_to_catalog_shape() {
        for kind in ALL_KINDS {
            let base = kind.shape(Rotation::default());
            let full_turn = base
                .rotated_cw()
                .rotated_cw()
                .rotated_cw()
                .rotated_cw();
            assert_eq!(full_turn, base, "{kind:?}");
        }
    }

    #[test]
    fn table_matches_dynamic_rotation_bit_for_bit() {
        // The precomputed states must equal repeated application of the
        // transpose-then-reverse transform to the catalog entry.
        for kind in ALL_KINDS {
            let mut expected = kind.shape(Rotation::default());
            let mut rotation = Rotation::default();
            for _ in 0..4 {
                assert_eq!(kind.shape(rotation), expected, "{kind:?}");
                expected = expected.rotated_cw();
                rotation = rotation.rotated_cw();
            }
        }
    }

    #[test]
    fn rotation_swaps_bounding_box() {
        let i = PieceKind::I.shape(Rotation::default());
        assert_eq!((i.width(), i.height()), (4, 1));
        let i_cw = i.rotated_cw();
        assert_eq!((i_cw.width(), i_cw.height()), (1, 4));
        assert!(i_cw.cells().iter().all(|&(x, _)| x == 0));
    }

    #[test]
    fn t_piece_clockwise_rotation() {
        // T catalog shape:      rotated clockwise:
        //   ###                   .#
        //   .#.                   ##
        //                         .#
        let t = PieceKind::T.shape(Rotation::default().rotated_cw());
        assert_eq!((t.width(), t.height()), (2, 3));
        let cells: Vec<_> = t.cells().into_iter().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn o_piece_rotation_is_identity() {
        let o = PieceKind::O.shape(Rotation::default());
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn kind_char_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
    }

    #[test]
    fn colors_are_distinct() {
        for a in ALL_KINDS {
            for b in ALL_KINDS {
                if a != b {
                    assert_ne!(a.color(), b.color());
                }
            }
        }
    }
}
