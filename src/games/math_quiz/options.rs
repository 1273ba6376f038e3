//! Answer option generation.
//!
//! Values are kept in tenths so that geometry answers such as `22.5` compare
//! exactly.

use rand::{Rng, seq::SliceRandom};
use std::collections::HashSet;

pub const OPTION_COUNT: usize = 4;

/// Widen the perturbation range after this many rejected candidates.
const ATTEMPTS_PER_SPREAD: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perturbation {
    /// Whole-unit offset in `low..high`.
    Whole { low: i64, high: i64 },
    /// Offset in `-spread..spread` units, rounded to the answer's precision.
    Spread { spread: i64 },
}

impl Perturbation {
    /// Geometry answers scale the spread with the size of the answer.
    pub fn for_geometry(correct_tenths: i64) -> Self {
        let spread = if correct_tenths < 100 {
            3
        } else if correct_tenths < 500 {
            10
        } else {
            20
        };
        Perturbation::Spread { spread }
    }

    fn widened(self) -> Self {
        match self {
            Perturbation::Whole { low, high } => Perturbation::Whole {
                low: low * 2,
                high: high * 2 + 1,
            },
            Perturbation::Spread { spread } => Perturbation::Spread { spread: spread * 2 },
        }
    }

    fn sample<R: Rng + ?Sized>(&self, correct_tenths: i64, rng: &mut R) -> i64 {
        let whole = is_whole(correct_tenths);
        match *self {
            Perturbation::Whole { low, high } => correct_tenths + rng.random_range(low..high) * 10,
            Perturbation::Spread { spread } => {
                let candidate = correct_tenths + rng.random_range(-spread * 10..spread * 10);
                if whole {
                    round_to_whole(candidate)
                } else {
                    candidate
                }
            }
        }
    }
}

/// Shuffled options plus the index of the correct one.
pub fn build_options<R: Rng + ?Sized>(
    correct_tenths: i64,
    perturbation: Perturbation,
    rng: &mut R,
) -> (Vec<String>, usize) {
    let mut values = vec![correct_tenths];
    let mut seen = HashSet::from([correct_tenths]);
    let mut perturbation = perturbation;
    let mut attempts = 0;

    while values.len() < OPTION_COUNT {
        let candidate = perturbation.sample(correct_tenths, rng);
        if candidate > 0 && seen.insert(candidate) {
            values.push(candidate);
        }

        attempts += 1;
        if attempts % ATTEMPTS_PER_SPREAD == 0 {
            perturbation = perturbation.widened();
        }
    }

    values.shuffle(rng);
    let correct_index = values
        .iter()
        .position(|&v| v == correct_tenths)
        .unwrap_or_default();

    (values.into_iter().map(format_tenths).collect(), correct_index)
}

pub fn is_whole(tenths: i64) -> bool {
    tenths % 10 == 0
}

fn round_to_whole(tenths: i64) -> i64 {
    (tenths + 5).div_euclid(10) * 10
}

pub fn format_tenths(tenths: i64) -> String {
    if is_whole(tenths) {
        format!("{}", tenths / 10)
    } else {
        format!("{}.{}", tenths / 10, (tenths % 10).abs())
    }
}
