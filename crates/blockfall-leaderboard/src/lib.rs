//! Leaderboard model and persistence format for the falling-block engine.
//!
//! A leaderboard is a list of [`ScoreRecord`]s kept sorted by score,
//! highest first. The persisted form is a JSON array; dates serialize as
//! ISO-8601 timestamps so files stay readable and portable across hosts.
//! Storage itself (file, browser storage, database) is left to the host -
//! this crate only defines the records and the JSON codec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At most this many records survive a save.
pub const SAVE_LIMIT: usize = 50;

/// How many records a display surface shows.
pub const DISPLAY_LIMIT: usize = 10;

/// One finished game's result.
///
/// `level` and `lines` are optional so files written by older hosts, which
/// recorded only name, score, and date, still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
    pub date: DateTime<Utc>,
}

impl ScoreRecord {
    /// A record stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
            level: None,
            lines: None,
            date: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_lines(mut self, lines: u32) -> Self {
        self.lines = Some(lines);
        self
    }
}

/// Score records ordered best-first.
///
/// The invariant (sorted descending by score, at most [`SAVE_LIMIT`] entries)
/// holds after every [`Leaderboard::submit`] and after loading from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    records: Vec<ScoreRecord>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, re-sorts best-first, and drops everything past the
    /// save limit. Ties keep their insertion order (stable sort), so an
    /// earlier record outranks a later one with the same score.
    pub fn submit(&mut self, record: ScoreRecord) {
        self.records.push(record);
        self.records.sort_by(|a, b| b.score.cmp(&a.score));
        self.records.truncate(SAVE_LIMIT);
    }

    /// The records a display surface shows: the best [`DISPLAY_LIMIT`].
    #[must_use]
    pub fn top(&self) -> &[ScoreRecord] {
        &self.records[..self.records.len().min(DISPLAY_LIMIT)]
    }

    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Loads a leaderboard from its JSON array form, restoring the ordering
    /// and size invariants regardless of what the file contained.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut board: Self = serde_json::from_str(json)?;
        board.records.sort_by(|a, b| b.score.cmp(&a.score));
        board.records.truncate(SAVE_LIMIT);
        Ok(board)
    }

    /// Serializes to the JSON array persistence form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn record(name: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            name: name.to_owned(),
            score,
            level: None,
            lines: None,
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn submit_keeps_records_sorted_descending() {
        let mut board = Leaderboard::new();
        board.submit(record("a", 100));
        board.submit(record("b", 300));
        board.submit(record("c", 200));
        let scores: Vec<u32> = board.records().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![300, 200, 100]);
    }

    #[test]
    fn ties_preserve_insertion_order() {
        let mut board = Leaderboard::new();
        board.submit(record("first", 100));
        board.submit(record("second", 100));
        assert_eq!(board.records()[0].name, "first");
        assert_eq!(board.records()[1].name, "second");
    }

    #[test]
    fn save_limit_drops_the_worst_records() {
        let mut board = Leaderboard::new();
        for score in 0..60 {
            board.submit(record("p", score));
        }
        assert_eq!(board.len(), SAVE_LIMIT);
        assert_eq!(board.records().first().map(|r| r.score), Some(59));
        assert_eq!(board.records().last().map(|r| r.score), Some(10));
    }

    #[test]
    fn top_shows_at_most_the_display_limit() {
        let mut board = Leaderboard::new();
        assert!(board.top().is_empty());
        for score in 0..15 {
            board.submit(record("p", score));
        }
        assert_eq!(board.top().len(), DISPLAY_LIMIT);
        assert_eq!(board.top()[0].score, 14);
    }

    #[test]
    fn json_round_trip() {
        let mut board = Leaderboard::new();
        board.submit(record("ada", 1200).with_level(3).with_lines(14));
        board.submit(record("bob", 400));
        let json = board.to_json().unwrap();
        let back = Leaderboard::from_json(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn dates_serialize_as_iso_8601() {
        let mut board = Leaderboard::new();
        board.submit(record("ada", 100));
        let json = board.to_json().unwrap();
        assert!(json.contains("\"2024-05-01T12:00:00Z\""), "{json}");
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let json = Leaderboard {
            records: vec![record("ada", 100)],
        }
        .to_json()
        .unwrap();
        assert!(!json.contains("level"), "{json}");
        assert!(!json.contains("lines"), "{json}");
    }

    #[test]
    fn loads_legacy_records_without_level_and_lines() {
        let json = r#"[{"name":"ada","score":700,"date":"2023-01-02T03:04:05Z"}]"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.records()[0].score, 700);
        assert_eq!(board.records()[0].level, None);
    }

    #[test]
    fn load_restores_ordering_from_unsorted_files() {
        let json = r#"[
            {"name":"low","score":10,"date":"2023-01-01T00:00:00Z"},
            {"name":"high","score":900,"date":"2023-01-01T00:00:00Z"}
        ]"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.records()[0].name, "high");
    }

    #[test]
    fn empty_leaderboard_serializes_to_empty_array() {
        assert_eq!(Leaderboard::new().to_json().unwrap(), "[]");
    }
}
