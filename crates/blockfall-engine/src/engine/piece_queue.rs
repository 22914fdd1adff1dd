use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the piece RNG. The same seed produces the same piece
/// sequence, which keeps gameplay scenarios reproducible in tests and lets a
/// host replay a single session. Serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy)]
pub struct PieceSeed([u8; 16]);

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:032x}", u128::from_be_bytes(self.0)))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parsed = (s.len() == 32)
            .then(|| u128::from_str_radix(&s, 16).ok())
            .flatten();
        let Some(num) = parsed else {
            return Err(serde::de::Error::custom(format!(
                "piece seed must be 32 hex characters, got '{s}'"
            )));
        };
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows drawing a fresh seed with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        PieceSeed(rng.random::<u128>().to_be_bytes())
    }
}

/// Supplies pieces by independent uniform draws, one piece ahead.
///
/// Each kind is drawn uniformly at random, independent of earlier draws (no
/// bag balancing). The queue always holds the next piece before the current
/// one is consumed, so preview variants can render it without disturbing the
/// draw order.
#[derive(Debug, Clone)]
pub struct PieceQueue {
    rng: Pcg32,
    pending: PieceKind,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceQueue {
    /// Creates a piece queue with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but seeded for a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let pending = rng.random();
        Self { rng, pending }
    }

    /// The upcoming piece kind, without consuming it.
    #[must_use]
    pub fn pending(&self) -> PieceKind {
        self.pending
    }

    /// Consumes the pending piece and draws a new one to replace it.
    pub fn pop_next(&mut self) -> PieceKind {
        let next = self.rng.random();
        std::mem::replace(&mut self.pending, next)
    }
}
