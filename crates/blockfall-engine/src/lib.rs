//! Deterministic game-state engine for a falling-block puzzle game.
//!
//! The engine models one game per [`GameSession`]: a fixed 20×10 [`Board`] of
//! settled cells, a falling [`ActivePiece`], a one-ahead [`PieceQueue`], and
//! score/level [`Progression`] driving the automatic drop cadence. It holds
//! no rendering, input, or timing of its own - a host feeds commands and
//! elapsed wall-clock time into the session and reads the state back out.
//!
//! All piece randomness flows through a seedable RNG ([`PieceSeed`]), so a
//! seeded session replays the same piece sequence every run.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameConfig, GameSession, SoftDropOutcome};
//!
//! let mut session = GameSession::new(GameConfig::default());
//! let _ = session.try_move_left();
//! loop {
//!     if let SoftDropOutcome::Locked { cleared_lines } = session.soft_drop().unwrap() {
//!         println!("locked, cleared {cleared_lines} lines");
//!         break;
//!     }
//! }
//! ```

pub use self::{core::*, engine::*};

pub(crate) mod core;
pub(crate) mod engine;

/// A candidate piece state overlaps settled cells or the grid boundary.
///
/// Returned by the movement and rotation commands when the transition is
/// rejected; the piece keeps its previous state. Hosts typically map the
/// `Ok`/`Err` distinction to movement feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece collides with settled cells or the grid boundary")]
pub struct PieceCollisionError;

/// Why an explicit level-up command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LevelUpError {
    /// The session levels automatically; the command is not accepted.
    #[display("level advances automatically in this mode")]
    AutomaticMode,
    /// The score has not reached the gate for the next level.
    #[display("score too low for the next level")]
    ScoreTooLow,
    /// Already at the configured maximum level.
    #[display("already at the maximum level")]
    MaxLevel,
    /// The session is over.
    #[display("the session is over")]
    GameOver,
}

/// Why the clear-all ability did not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AbilityError {
    /// The session configuration does not enable the ability.
    #[display("clear-all ability is not enabled")]
    NotEnabled,
    /// The score threshold has not been crossed yet.
    #[display("clear-all ability is not charged yet")]
    NotCharged,
    /// The ability already fired this session.
    #[display("clear-all ability was already used")]
    AlreadyUsed,
    /// The session is over.
    #[display("the session is over")]
    GameOver,
}
