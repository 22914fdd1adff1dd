use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    BOARD_COLS,
    shape::{PieceKind, Rotation, ShapeGrid},
};

/// The currently falling piece: shape kind, rotation state, and position.
///
/// Pieces are immutable values - movement and rotation return new candidate
/// `ActivePiece` instances which the session tests against the board and
/// either commits or discards.
///
/// # Coordinate System
///
/// - The origin is the top-left corner of the shape's tight bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Coordinates are signed: a piece may sit partially above row 0 without
///   colliding, and horizontal candidates may step outside the grid (the
///   collision check rejects them)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    rotation: Rotation,
    x: i16,
    y: i16,
}

impl Serialize for ActivePiece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "T#1@4,0")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.index(),
            self.x,
            self.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for ActivePiece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        let err = || Error::custom(format!("expected format 'kind#rotation@x,y', got '{s}'"));

        let (kind_str, rest) = s.split_once('#').ok_or_else(err)?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(err)?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(err)?;

        let mut kind_chars = kind_str.chars();
        let kind = kind_chars
            .next()
            .filter(|_| kind_chars.next().is_none())
            .and_then(PieceKind::from_char)
            .ok_or_else(|| Error::custom(format!("invalid piece kind: '{kind_str}'")))?;

        let rotation_num = rotation_str
            .parse::<u8>()
            .ok()
            .filter(|n| *n < 4)
            .ok_or_else(|| Error::custom(format!("rotation must be 0-3, got '{rotation_str}'")))?;

        let x = x_str
            .parse::<i16>()
            .map_err(|e| Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i16>()
            .map_err(|e| Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(ActivePiece {
            kind,
            rotation: Rotation::from_index(rotation_num),
            x,
            y,
        })
    }
}

impl ActivePiece {
    /// Creates a piece at the spawn position: horizontally centered on the
    /// grid, with its top row at row 0.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let width = kind.shape(Rotation::default()).width();
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let x = ((BOARD_COLS - width) / 2) as i16;
        Self {
            kind,
            rotation: Rotation::default(),
            x,
            y: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn x(&self) -> i16 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i16 {
        self.y
    }

    /// The shape grid for the current rotation state.
    #[must_use]
    pub fn shape(&self) -> ShapeGrid {
        self.kind.shape(self.rotation)
    }

    /// The color token of this piece.
    #[must_use]
    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    /// Absolute board coordinates of the four occupied cells.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cells(&self) -> ArrayVec<(i16, i16), 4> {
        self.shape()
            .cells()
            .into_iter()
            .map(|(dx, dy)| (self.x + dx as i16, self.y + dy as i16))
            .collect()
    }

    #[must_use]
    pub fn left(&self) -> Self {
        Self {
            x: self.x - 1,
            ..*self
        }
    }

    #[must_use]
    pub fn right(&self) -> Self {
        Self {
            x: self.x + 1,
            ..*self
        }
    }

    #[must_use]
    pub fn down(&self) -> Self {
        Self {
            y: self.y + 1,
            ..*self
        }
    }

    /// Returns the piece in its next clockwise rotation state, position
    /// unchanged. No kick offsets are applied; a colliding rotation is
    /// rejected outright by the caller.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_cw(),
            ..*self
        }
    }
}
