use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SequenceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CueSide {
    Left,
    Right,
}

impl CueSide {
    /// Glyph shown at fixation during the cue phase.
    pub fn glyph(self) -> char {
        match self {
            CueSide::Left => '<',
            CueSide::Right => '>',
        }
    }

    pub fn opposite(self) -> CueSide {
        match self {
            CueSide::Left => CueSide::Right,
            CueSide::Right => CueSide::Left,
        }
    }

    /// Classification label used during preprocessing: right = 1.
    pub fn label(self) -> u8 {
        match self {
            CueSide::Left => 0,
            CueSide::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CueSide::Left => "LEFT",
            CueSide::Right => "RIGHT",
        }
    }

    pub fn parse(value: &str) -> Result<CueSide> {
        match value.trim().trim_matches('"').to_ascii_lowercase().as_str() {
            "left" => Ok(CueSide::Left),
            "right" => Ok(CueSide::Right),
            other => Err(SequenceError::MalformedMarkers(format!(
                "unknown cue side '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CueSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shuffled run in which the two sides differ by at most one trial.
pub fn balanced_run<R: Rng + ?Sized>(n_trials: usize, rng: &mut R) -> Vec<CueSide> {
    let mut run: Vec<CueSide> = (0..n_trials)
        .map(|i| if i % 2 == 0 { CueSide::Left } else { CueSide::Right })
        .collect();
    run.shuffle(rng);
    run
}

/// Cue sides for every run; each run is a reshuffle of the previous one.
pub fn cue_schedule<R: Rng + ?Sized>(
    n_trials: usize,
    n_runs: usize,
    rng: &mut R,
) -> Vec<Vec<CueSide>> {
    let mut runs: Vec<Vec<CueSide>> = Vec::with_capacity(n_runs);
    for _ in 0..n_runs {
        let run = match runs.last() {
            Some(previous) => {
                let mut run = previous.clone();
                run.shuffle(rng);
                run
            }
            None => balanced_run(n_trials, rng),
        };
        runs.push(run);
    }
    runs
}
