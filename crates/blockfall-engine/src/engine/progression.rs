use crate::LevelUpError;

/// Base score values for clearing 1-4 lines in one lock event (classic
/// guideline scoring). Multiplied by the current level in automatic mode, or
/// by a flat multiplier in manual mode.
pub const BASE_POINTS: [u32; 4] = [40, 100, 300, 1200];

/// How the level advances and how the drop interval follows it.
///
/// Both policies clamp the drop interval to
/// `[min_interval_ms, base_interval_ms]` and the level to `[1, max_level]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelingMode {
    /// Level steps up when `score > level * 1000`; the drop interval follows
    /// a logarithmically damped curve so speed growth tapers at high levels.
    Automatic,
    /// Level advances only through the explicit level-up command, accepted
    /// when `score >= level * 100`; the drop interval shrinks linearly.
    Manual {
        /// Level-independent score multiplier applied to the base points.
        flat_multiplier: u32,
        /// Drop interval decrease per level gained, in milliseconds.
        interval_step_ms: u32,
    },
}

impl LevelingMode {
    /// Manual leveling with the default multiplier and interval step.
    #[must_use]
    pub const fn manual() -> Self {
        Self::Manual {
            flat_multiplier: 1,
            interval_step_ms: 50,
        }
    }
}

/// Constants for score and level progression.
#[derive(Debug, Clone)]
pub struct ProgressionConfig {
    pub mode: LevelingMode,
    pub base_points: [u32; 4],
    /// Score saturates here instead of overflowing or wrapping.
    pub max_score: u32,
    pub max_level: u32,
    pub base_interval_ms: u32,
    pub min_interval_ms: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            mode: LevelingMode::Automatic,
            base_points: BASE_POINTS,
            max_score: 999_999,
            max_level: 99,
            base_interval_ms: 1000,
            min_interval_ms: 100,
        }
    }
}

/// Score, level, and drop-interval state for one session.
///
/// Score and level are monotonically non-decreasing until [`Progression::reset`].
#[derive(Debug, Clone)]
pub struct Progression {
    config: ProgressionConfig,
    score: u32,
    level: u32,
    total_cleared_lines: u32,
    drop_interval_ms: u32,
}

impl Progression {
    #[must_use]
    pub fn new(config: ProgressionConfig) -> Self {
        let drop_interval_ms = config.base_interval_ms;
        Self {
            config,
            score: 0,
            level: 1,
            total_cleared_lines: 0,
            drop_interval_ms,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> u32 {
        self.total_cleared_lines
    }

    /// Milliseconds between automatic downward steps at the current level.
    #[must_use]
    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    #[must_use]
    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Records a line-clear event and applies scoring and leveling.
    ///
    /// Clearing more lines than the table covers scores as the table's last
    /// entry. In automatic mode the level steps up at most once per event.
    pub fn record_clear(&mut self, lines: usize) {
        if lines == 0 {
            return;
        }
        let index = lines.min(self.config.base_points.len()) - 1;
        let multiplier = match self.config.mode {
            LevelingMode::Automatic => self.level,
            LevelingMode::Manual {
                flat_multiplier, ..
            } => flat_multiplier,
        };
        let points = self.config.base_points[index].saturating_mul(multiplier);
        self.add_points(points);
        self.total_cleared_lines += u32::try_from(lines).unwrap_or(u32::MAX);

        if self.config.mode == LevelingMode::Automatic
            && self.score > self.level * 1000
            && self.level < self.config.max_level
        {
            self.level += 1;
            self.drop_interval_ms = self.automatic_interval();
        }
    }

    /// Explicit level-up command; only meaningful in manual mode.
    pub fn try_level_up(&mut self) -> Result<(), LevelUpError> {
        let LevelingMode::Manual {
            interval_step_ms, ..
        } = self.config.mode
        else {
            return Err(LevelUpError::AutomaticMode);
        };
        if self.level >= self.config.max_level {
            return Err(LevelUpError::MaxLevel);
        }
        if self.score < self.level.saturating_mul(100) {
            return Err(LevelUpError::ScoreTooLow);
        }
        self.level += 1;
        self.drop_interval_ms = self
            .config
            .base_interval_ms
            .saturating_sub(interval_step_ms.saturating_mul(self.level - 1))
            .max(self.config.min_interval_ms);
        Ok(())
    }

    /// Adds bonus points (e.g. the clear-all ability), saturating at the cap.
    pub fn add_points(&mut self, points: u32) {
        self.score = self.config.max_score.min(self.score.saturating_add(points));
    }

    /// Reinitializes score, level, lines, and drop interval.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.total_cleared_lines = 0;
        self.drop_interval_ms = self.config.base_interval_ms;
    }

    /// `max(min, base - log10(level + 9) * 100)`, additionally capped at the
    /// base interval.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn automatic_interval(&self) -> u32 {
        let damped = f64::from(self.level + 9).log10() * 100.0;
        let interval = f64::from(self.config.base_interval_ms) - damped;
        interval.clamp(
            f64::from(self.config.min_interval_ms),
            f64::from(self.config.base_interval_ms),
        ) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_clear_scores_base_points_times_level() {
        let mut progression = Progression::new(ProgressionConfig::default());
        progression.record_clear(1);
        assert_eq!(progression.score(), 40);
        assert_eq!(progression.total_cleared_lines(), 1);
    }

    #[test]
    fn all_clear_counts_use_their_table_entry() {
        for (lines, expected) in [(1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut progression = Progression::new(ProgressionConfig::default());
            progression.record_clear(lines);
            assert_eq!(progression.score(), expected);
        }
    }

    #[test]
    fn clear_beyond_table_scores_as_quad() {
        let mut progression = Progression::new(ProgressionConfig::default());
        progression.record_clear(5);
        assert_eq!(progression.score(), 1200);
        assert_eq!(progression.total_cleared_lines(), 5);
    }

    #[test]
    fn automatic_level_steps_when_score_passes_threshold() {
        let mut progression = Progression::new(ProgressionConfig::default());
        assert_eq!(progression.level(), 1);
        // 40 * level accumulates slowly; a quad at level 1 is 1200 > 1000.
        progression.record_clear(4);
        assert_eq!(progression.level(), 2);
        // Not yet past 2000.
        progression.record_clear(1);
        assert_eq!(progression.level(), 2);
    }

    #[test]
    fn automatic_interval_follows_damped_curve() {
        let mut progression = Progression::new(ProgressionConfig::default());
        assert_eq!(progression.drop_interval_ms(), 1000);
        progression.record_clear(4);
        assert_eq!(progression.level(), 2);
        // 1000 - log10(11) * 100 = 895.85... truncated.
        assert_eq!(progression.drop_interval_ms(), 895);
    }

    #[test]
    fn score_multiplies_by_current_level_in_automatic_mode() {
        let mut progression = Progression::new(ProgressionConfig::default());
        progression.record_clear(4); // 1200, level -> 2
        progression.record_clear(2); // + 100 * 2
        assert_eq!(progression.score(), 1400);
    }

    #[test]
    fn score_saturates_at_cap() {
        let mut progression = Progression::new(ProgressionConfig {
            max_score: 2000,
            ..ProgressionConfig::default()
        });
        progression.record_clear(4);
        progression.record_clear(4);
        assert_eq!(progression.score(), 2000);
    }

    #[test]
    fn level_is_capped() {
        let config = ProgressionConfig {
            max_level: 2,
            ..ProgressionConfig::default()
        };
        let mut progression = Progression::new(config);
        for _ in 0..10 {
            progression.record_clear(4);
        }
        assert_eq!(progression.level(), 2);
    }

    #[test]
    fn manual_level_up_requires_score() {
        let mut progression = Progression::new(ProgressionConfig {
            mode: LevelingMode::manual(),
            ..ProgressionConfig::default()
        });
        assert_eq!(progression.try_level_up(), Err(LevelUpError::ScoreTooLow));
        progression.record_clear(2); // 100 >= 1 * 100
        assert_eq!(progression.try_level_up(), Ok(()));
        assert_eq!(progression.level(), 2);
        // Next gate is 200.
        assert_eq!(progression.try_level_up(), Err(LevelUpError::ScoreTooLow));
    }

    #[test]
    fn manual_interval_decreases_linearly_with_floor() {
        let mut progression = Progression::new(ProgressionConfig {
            mode: LevelingMode::Manual {
                flat_multiplier: 1,
                interval_step_ms: 400,
            },
            min_interval_ms: 300,
            ..ProgressionConfig::default()
        });
        progression.add_points(10_000);
        progression.try_level_up().unwrap();
        assert_eq!(progression.drop_interval_ms(), 600);
        progression.try_level_up().unwrap();
        // 1000 - 2 * 400 = 200, floored at 300.
        assert_eq!(progression.drop_interval_ms(), 300);
    }

    #[test]
    fn manual_mode_uses_flat_multiplier() {
        let mut progression = Progression::new(ProgressionConfig {
            mode: LevelingMode::Manual {
                flat_multiplier: 3,
                interval_step_ms: 50,
            },
            ..ProgressionConfig::default()
        });
        progression.record_clear(2);
        assert_eq!(progression.score(), 300);
        // Level does not move on its own in manual mode.
        progression.record_clear(4);
        assert_eq!(progression.level(), 1);
    }

    #[test]
    fn level_up_rejected_in_automatic_mode() {
        let mut progression = Progression::new(ProgressionConfig::default());
        progression.add_points(10_000);
        assert_eq!(progression.try_level_up(), Err(LevelUpError::AutomaticMode));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut progression = Progression::new(ProgressionConfig::default());
        progression.record_clear(4);
        progression.record_clear(4);
        progression.reset();
        assert_eq!(progression.score(), 0);
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.total_cleared_lines(), 0);
        assert_eq!(progression.drop_interval_ms(), 1000);
    }

    #[test]
    fn score_never_decreases_over_random_events() {
        let mut progression = Progression::new(ProgressionConfig::default());
        let mut last = 0;
        for lines in [1, 0, 4, 2, 0, 3, 4, 4, 1] {
            progression.record_clear(lines);
            assert!(progression.score() >= last);
            last = progression.score();
        }
    }
}
