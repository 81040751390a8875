use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Operand for the ledger's arithmetic operations: a fixed number, or an
/// inclusive integer range resolved to a single uniform draw at call time.
///
/// Deserializes from a bare JSON number (`5`, `2.5`) or a range object
/// (`{"min": 1, "max": 6}`). A range is never persisted; only the drawn
/// value reaches the store.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Fixed(f64),
    Range { min: i64, max: i64 },
}

impl Amount {
    /// Collapse the operand to a concrete number, drawing from `rng` when it
    /// is a range.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Amount::Fixed(value) => value,
            Amount::Range { min, max } => draw(rng, min, max) as f64,
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Fixed(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Fixed(value as f64)
    }
}

impl From<RangeInclusive<i64>> for Amount {
    fn from(range: RangeInclusive<i64>) -> Self {
        Amount::Range {
            min: *range.start(),
            max: *range.end(),
        }
    }
}

/// Uniform integer in `[min, max]`, both ends inclusive, drawn from the
/// thread-local generator.
pub fn randomize(min: i64, max: i64) -> i64 {
    draw(&mut rand::thread_rng(), min, max)
}

fn draw<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    // Reversed bounds describe the same range.
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}
