use rand::Rng as _;

use crate::{
    AbilityError, LevelUpError, PieceCollisionError,
    core::{ActivePiece, Board, PieceKind},
};

use super::{
    gravity::DropScheduler,
    piece_queue::{PieceQueue, PieceSeed},
    progression::{Progression, ProgressionConfig},
};

/// Whether the session is still accepting gameplay commands.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// Lifecycle of the one-shot clear-all ability within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum AbilityState {
    /// The session configuration does not expose the ability.
    Disabled,
    /// Enabled but the score threshold has not been crossed yet.
    Charging,
    /// Armed; the next invocation fires.
    Ready,
    /// Used; unavailable until the session restarts.
    Spent,
}

/// Configuration of the optional clear-all ability.
#[derive(Debug, Clone, Copy)]
pub struct ClearAllConfig {
    /// Cumulative score at which the ability arms.
    pub score_threshold: u32,
    /// Fixed bonus granted when the ability fires.
    pub bonus_points: u32,
}

impl Default for ClearAllConfig {
    fn default() -> Self {
        Self {
            score_threshold: 3000,
            bonus_points: 500,
        }
    }
}

/// Per-session configuration: progression policy plus variant capabilities.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub progression: ProgressionConfig,
    /// `Some` enables the clear-all ability for this session.
    pub clear_all: Option<ClearAllConfig>,
}

/// What a downward step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDropOutcome {
    /// The piece moved down one row and keeps falling.
    Moved,
    /// The piece could not move down and locked into the board.
    Locked {
        /// Rows cleared by this lock (0 when no row filled up).
        cleared_lines: usize,
    },
}

/// One independent falling-block game.
///
/// The session owns the board, the falling piece, the piece queue, and the
/// progression state; collaborators observe them through the read accessors
/// and drive the game through the command and tick methods. Everything is
/// synchronous and single-threaded - a host running several sessions must
/// serialize commands per instance.
///
/// Invalid transitions (a move into a wall, a colliding rotation) restore the
/// prior state and report [`PieceCollisionError`]; hosts typically use the
/// `Ok`/`Err` distinction to drive movement sounds. The only terminal
/// condition is game over, after which every gameplay command is rejected
/// until [`GameSession::restart`].
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    falling_piece: ActivePiece,
    queue: PieceQueue,
    progression: Progression,
    scheduler: DropScheduler,
    session_state: SessionState,
    ability_state: AbilityState,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameSession {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Self {
        let mut queue = PieceQueue::with_seed(seed);
        let falling_piece = ActivePiece::spawn(queue.pop_next());
        let progression = Progression::new(config.progression.clone());
        let ability_state = Self::initial_ability(&config);
        Self {
            config,
            board: Board::EMPTY,
            falling_piece,
            queue,
            progression,
            scheduler: DropScheduler::new(),
            session_state: SessionState::Playing,
            ability_state,
        }
    }

    fn initial_ability(config: &GameConfig) -> AbilityState {
        if config.clear_all.is_some() {
            AbilityState::Charging
        } else {
            AbilityState::Disabled
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &ActivePiece {
        &self.falling_piece
    }

    /// The next piece kind, for preview rendering.
    #[must_use]
    pub fn pending_kind(&self) -> PieceKind {
        self.queue.pending()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.progression.score()
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> u32 {
        self.progression.total_cleared_lines()
    }

    #[must_use]
    pub fn drop_interval_ms(&self) -> u32 {
        self.progression.drop_interval_ms()
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn ability_state(&self) -> AbilityState {
        self.ability_state
    }

    /// Advances the simulation by `elapsed_ms` of wall-clock time.
    ///
    /// Drives the drop scheduler; returns the outcome of the automatic
    /// downward step when one fired. Inert once the session is over.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<SoftDropOutcome> {
        if self.session_state.is_game_over() {
            return None;
        }
        if self
            .scheduler
            .advance(elapsed_ms, self.progression.drop_interval_ms())
        {
            return self.soft_drop().ok();
        }
        None
    }

    /// Shifts the piece one column left; `Ok` doubles as the "moved" signal.
    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        let candidate = self.falling_piece.left();
        self.try_set_falling_piece(candidate)
    }

    /// Shifts the piece one column right; `Ok` doubles as the "moved" signal.
    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        let candidate = self.falling_piece.right();
        self.try_set_falling_piece(candidate)
    }

    /// Rotates the piece 90° clockwise, rejecting the whole rotation if the
    /// rotated shape collides. No kick offsets are searched.
    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let candidate = self.falling_piece.rotated();
        self.try_set_falling_piece(candidate)
    }

    /// Moves the piece one row down, locking it when it cannot move.
    ///
    /// This is the single transition point between "falling" and "settled":
    /// on a rejected downward move the piece merges into the board, full
    /// rows clear, scoring applies, and the next piece spawns. A spawn that
    /// immediately collides ends the session.
    pub fn soft_drop(&mut self) -> Result<SoftDropOutcome, PieceCollisionError> {
        if self.session_state.is_game_over() {
            return Err(PieceCollisionError);
        }
        let candidate = self.falling_piece.down();
        if !self.board.collides(&candidate) {
            self.falling_piece = candidate;
            return Ok(SoftDropOutcome::Moved);
        }
        let cleared_lines = self.lock_piece();
        Ok(SoftDropOutcome::Locked { cleared_lines })
    }

    /// Explicit level-up command, accepted only in manual leveling mode.
    pub fn try_level_up(&mut self) -> Result<(), LevelUpError> {
        if self.session_state.is_game_over() {
            return Err(LevelUpError::GameOver);
        }
        self.progression.try_level_up()
    }

    /// Fires the one-shot clear-all ability: empties the board, grants the
    /// configured bonus, and disarms until restart.
    pub fn try_clear_all(&mut self) -> Result<(), AbilityError> {
        if self.session_state.is_game_over() {
            return Err(AbilityError::GameOver);
        }
        let Some(ability) = self.config.clear_all else {
            return Err(AbilityError::NotEnabled);
        };
        match self.ability_state {
            AbilityState::Ready => {
                self.board.clear_all();
                self.progression.add_points(ability.bonus_points);
                self.ability_state = AbilityState::Spent;
                Ok(())
            }
            AbilityState::Spent => Err(AbilityError::AlreadyUsed),
            AbilityState::Disabled | AbilityState::Charging => Err(AbilityError::NotCharged),
        }
    }

    /// Reinitializes the board, progression, scheduler, and ability, and
    /// spawns a fresh piece. The piece RNG keeps its stream.
    pub fn restart(&mut self) {
        self.board.clear_all();
        self.progression.reset();
        self.scheduler.reset();
        self.session_state = SessionState::Playing;
        self.ability_state = Self::initial_ability(&self.config);
        self.falling_piece = ActivePiece::spawn(self.queue.pop_next());
    }

    fn try_set_falling_piece(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        if self.session_state.is_game_over() || self.board.collides(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    fn lock_piece(&mut self) -> usize {
        self.board.merge(&self.falling_piece);
        let cleared_lines = self.board.clear_lines();
        self.progression.record_clear(cleared_lines);
        self.refresh_ability();

        let next = ActivePiece::spawn(self.queue.pop_next());
        if self.board.collides(&next) {
            self.session_state = SessionState::GameOver;
        }
        self.falling_piece = next;
        cleared_lines
    }

    fn refresh_ability(&mut self) {
        if let Some(ability) = self.config.clear_all {
            if self.ability_state.is_charging()
                && self.progression.score() >= ability.score_threshold
            {
                self.ability_state = AbilityState::Ready;
            }
        }
    }
}
