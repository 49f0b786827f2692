use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, Role, SequenceError};

pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Two equal-sum pools of per-trial target counts for one block.
///
/// Values are consumed from the end, one per trial of the matching role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCounts {
    pub cued: Vec<u32>,
    pub non_cued: Vec<u32>,
}

impl TargetCounts {
    pub fn pool(&self, role: Role) -> &[u32] {
        match role {
            Role::Cued => &self.cued,
            Role::NonCued => &self.non_cued,
        }
    }

    pub fn pop(&mut self, role: Role) -> Option<u32> {
        match role {
            Role::Cued => self.cued.pop(),
            Role::NonCued => self.non_cued.pop(),
        }
    }

    pub fn sum(&self, role: Role) -> u32 {
        self.pool(role).iter().sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.sum(Role::Cued) == self.sum(Role::NonCued)
    }
}

/// Rejection sampler for balanced target-count pools.
#[derive(Debug, Clone)]
pub struct TargetCountAllocator {
    min_targets: u32,
    max_targets: u32,
    max_attempts: usize,
}

impl TargetCountAllocator {
    /// Counts are drawn from `[min_targets, max_targets)`.
    pub fn new(min_targets: u32, max_targets: u32) -> Result<Self> {
        if min_targets >= max_targets {
            return Err(SequenceError::invalid(format!(
                "target range {}..{} is empty",
                min_targets, max_targets
            )));
        }
        Ok(Self {
            min_targets,
            max_targets,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min_targets, self.max_targets)
    }

    /// Pool length for a block: half the trials, rounded up.
    pub fn pool_size(n_trials: usize) -> usize {
        (n_trials + 1) / 2
    }

    pub fn allocate<R: Rng + ?Sized>(&self, n_trials: usize, rng: &mut R) -> Result<TargetCounts> {
        if n_trials == 0 {
            return Err(SequenceError::invalid("a block needs at least one trial"));
        }

        let size = Self::pool_size(n_trials);
        for _ in 0..self.max_attempts {
            let cued = self.draw(size, rng);
            let non_cued = self.draw(size, rng);
            if cued.iter().sum::<u32>() == non_cued.iter().sum::<u32>() {
                return Ok(TargetCounts { cued, non_cued });
            }
        }

        Err(SequenceError::AllocationStarvation {
            attempts: self.max_attempts,
            min_targets: self.min_targets,
            max_targets: self.max_targets,
            size,
        })
    }

    fn draw<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<u32> {
        (0..size)
            .map(|_| rng.gen_range(self.min_targets..self.max_targets))
            .collect()
    }
}

pub fn allocate_target_counts<R: Rng + ?Sized>(
    n_trials: usize,
    min_targets: u32,
    max_targets: u32,
    rng: &mut R,
) -> Result<TargetCounts> {
    TargetCountAllocator::new(min_targets, max_targets)?.allocate(n_trials, rng)
}

/// Draws the non-cued count for a trial from `[min_targets, max_targets]`
/// (inclusive), resampling until it differs from the cued count.
pub fn draw_non_cued_count<R: Rng + ?Sized>(
    cued_target_count: u32,
    min_targets: u32,
    max_targets: u32,
    rng: &mut R,
) -> Result<u32> {
    if min_targets >= max_targets {
        return Err(SequenceError::invalid(format!(
            "cannot draw a non-cued count different from {} in {}..={}",
            cued_target_count, min_targets, max_targets
        )));
    }
    loop {
        let count = rng.gen_range(min_targets..=max_targets);
        if count != cued_target_count {
            return Ok(count);
        }
    }
}
