use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cue::{cue_schedule, CueSide};
use crate::config::{ExperimentConfig, SequenceParameters};
use crate::error::{Result, Role, SequenceError};
use crate::sequencing::{
    draw_non_cued_count, SequenceBuilder, SequencePair, Shape, TargetCountAllocator,
};

/// Everything the display loop needs to run one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialPlan {
    /// 1-based run number.
    pub run: usize,
    /// 1-based trial number within the run.
    pub trial: usize,
    pub cued_side: CueSide,
    pub cued_target_count: u32,
    pub non_cued_target_count: u32,
    pub sequences: SequencePair<Shape>,
}

impl TrialPlan {
    /// Sequence shown on the given physical side of the screen.
    pub fn side_sequence(&self, side: CueSide) -> &[Shape] {
        if side == self.cued_side {
            self.sequences.sequence(Role::Cued)
        } else {
            self.sequences.sequence(Role::NonCued)
        }
    }

    /// Shapes on the (left, right) circles at `frame`.
    pub fn shapes_at_frame(&self, frame: usize, frames_per_shape: usize) -> Option<(Shape, Shape)> {
        let role = |side: CueSide| {
            if side == self.cued_side {
                Role::Cued
            } else {
                Role::NonCued
            }
        };
        let left = self
            .sequences
            .symbol_at_frame(role(CueSide::Left), frame, frames_per_shape)?;
        let right = self
            .sequences
            .symbol_at_frame(role(CueSide::Right), frame, frames_per_shape)?;
        Some((left, right))
    }
}

// SESSION PLANNER -------------------------------------------------------------

pub struct SessionPlanner {
    parameters: SequenceParameters,
    n_trials: usize,
    n_runs: usize,
    builder: SequenceBuilder<Shape>,
    allocator: TargetCountAllocator,
}

impl SessionPlanner {
    pub fn new(config: &ExperimentConfig) -> Result<Self> {
        if config.session.n_trials == 0 {
            return Err(SequenceError::invalid("a run needs at least one trial"));
        }
        Ok(Self {
            parameters: config.sequence_parameters()?,
            n_trials: config.session.n_trials,
            n_runs: config.session.n_runs,
            builder: config.sequence_builder()?,
            allocator: config.allocator()?,
        })
    }

    pub fn parameters(&self) -> &SequenceParameters {
        &self.parameters
    }

    /// Plans one run. Left-cued trials take their cued count from the
    /// allocator's `cued` pool and right-cued trials from `non_cued`, so the
    /// attended-target load is equal for both cue directions.
    pub fn plan_run<R: Rng + ?Sized>(
        &self,
        run: usize,
        cue_sides: &[CueSide],
        rng: &mut R,
    ) -> Result<Vec<TrialPlan>> {
        let mut counts = self.allocator.allocate(cue_sides.len(), rng)?;
        let (min_targets, max_targets) = self.allocator.range();

        cue_sides
            .iter()
            .enumerate()
            .map(|(index, &cued_side)| {
                let pool = match cued_side {
                    CueSide::Left => Role::Cued,
                    CueSide::Right => Role::NonCued,
                };
                let cued_target_count = counts.pop(pool).ok_or_else(|| {
                    SequenceError::invalid(format!(
                        "run {} cues {} more often than its pool allows",
                        run, cued_side
                    ))
                })?;
                let non_cued_target_count =
                    draw_non_cued_count(cued_target_count, min_targets, max_targets, rng)?;

                let sequences = self.builder.generate(
                    cued_target_count as usize,
                    non_cued_target_count as usize,
                    rng,
                )?;

                Ok(TrialPlan {
                    run,
                    trial: index + 1,
                    cued_side,
                    cued_target_count,
                    non_cued_target_count,
                    sequences,
                })
            })
            .collect()
    }

    pub fn plan_session<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Vec<TrialPlan>>> {
        cue_schedule(self.n_trials, self.n_runs, rng)
            .iter()
            .enumerate()
            .map(|(index, sides)| self.plan_run(index + 1, sides, rng))
            .collect()
    }
}
