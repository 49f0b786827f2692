use rand::Rng;
use serde::{Deserialize, Serialize};

use super::alphabet::{Alphabet, Symbol};
use super::conjugate::ConjugateMap;
use crate::error::{Result, Role, SequenceError};

pub const DEFAULT_MIN_TARGET_SPACING: usize = 5;

// Jitter applied to the cued side is always drawn from [0, 5), independent of
// the configured minimum spacing.
const CUED_JITTER_BOUND: usize = 5;

// Index of the first target on each side. The non-cued side starts one
// position later than the cued side.
const CUED_FIRST_TARGET: usize = 1;
const NON_CUED_FIRST_TARGET: usize = 2;

/// How adjacent duplicates in the raw draw are repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// One left-to-right pass. The replacement must differ from both left
    /// neighbours; when no symbol qualifies the duplicate is left in place.
    #[default]
    SinglePass,
    /// Like `SinglePass`, but also avoids the right neighbour and falls back
    /// to any symbol differing from the left neighbour. Leaves no duplicates.
    LookAhead,
}

/// What to do when fewer targets fit than were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderflowPolicy {
    /// Reject, before drawing, counts that could fall short or crowd targets
    /// below the minimum spacing. Fail with `TargetUnderflow` if insertion
    /// still falls short.
    #[default]
    Reject,
    /// Place what fits and report the achieved counts on the result.
    Report,
}

/// The cued and non-cued sequences for one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePair<S> {
    pub cued: Vec<S>,
    pub non_cued: Vec<S>,
    pub target: S,
    pub cued_requested: usize,
    pub non_cued_requested: usize,
    /// Target occurrences actually present in `cued`.
    pub cued_placed: usize,
    /// Target occurrences actually present in `non_cued`.
    pub non_cued_placed: usize,
}

impl<S: Symbol> SequencePair<S> {
    pub fn sequence(&self, role: Role) -> &[S] {
        match role {
            Role::Cued => &self.cued,
            Role::NonCued => &self.non_cued,
        }
    }

    pub fn requested(&self, role: Role) -> usize {
        match role {
            Role::Cued => self.cued_requested,
            Role::NonCued => self.non_cued_requested,
        }
    }

    pub fn placed(&self, role: Role) -> usize {
        match role {
            Role::Cued => self.cued_placed,
            Role::NonCued => self.non_cued_placed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cued_placed == self.cued_requested && self.non_cued_placed == self.non_cued_requested
    }

    pub fn len(&self) -> usize {
        self.cued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cued.is_empty()
    }

    pub fn target_positions(&self, role: Role) -> Vec<usize> {
        self.sequence(role)
            .iter()
            .enumerate()
            .filter(|(_, symbol)| **symbol == self.target)
            .map(|(index, _)| index)
            .collect()
    }

    /// Symbol shown at `frame` when the shape changes every `frames_per_symbol` frames.
    pub fn symbol_at_frame(&self, role: Role, frame: usize, frames_per_symbol: usize) -> Option<S> {
        if frames_per_symbol == 0 {
            return None;
        }
        self.sequence(role).get(frame / frames_per_symbol).copied()
    }

    /// Adjacent equal non-target pairs left in the cued sequence.
    pub fn residual_repeats(&self) -> usize {
        count_repeats(&self.cued, Some(self.target))
    }

    pub fn into_parts(self) -> (Vec<S>, Vec<S>) {
        (self.cued, self.non_cued)
    }
}

/// Counts positions `i` with `sequence[i] == sequence[i + 1]`, ignoring `skip`.
pub fn count_repeats<S: Symbol>(sequence: &[S], skip: Option<S>) -> usize {
    sequence
        .windows(2)
        .filter(|pair| pair[0] == pair[1] && Some(pair[0]) != skip)
        .count()
}

// SEQUENCE BUILDER ------------------------------------------------------------

/// Builds cued/non-cued sequence pairs for one block.
///
/// The alphabet, sequence length and spacing are fixed for the block; target
/// counts change per trial and are passed to [`SequenceBuilder::generate`].
#[derive(Debug, Clone)]
pub struct SequenceBuilder<S> {
    alphabet: Alphabet<S>,
    conjugate: ConjugateMap<S>,
    sequence_length: usize,
    min_target_spacing: usize,
    repair: RepairStrategy,
    underflow: UnderflowPolicy,
}

impl<S: Symbol> SequenceBuilder<S> {
    pub fn new(alphabet: Alphabet<S>, sequence_length: usize) -> Result<Self> {
        let conjugate = ConjugateMap::rotate(alphabet.non_targets())?;
        Ok(Self {
            alphabet,
            conjugate,
            sequence_length,
            min_target_spacing: DEFAULT_MIN_TARGET_SPACING,
            repair: RepairStrategy::default(),
            underflow: UnderflowPolicy::default(),
        })
    }

    pub fn min_target_spacing(mut self, spacing: usize) -> Self {
        self.min_target_spacing = spacing;
        self
    }

    pub fn repair(mut self, strategy: RepairStrategy) -> Self {
        self.repair = strategy;
        self
    }

    pub fn underflow(mut self, policy: UnderflowPolicy) -> Self {
        self.underflow = policy;
        self
    }

    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    pub fn conjugate(&self) -> &ConjugateMap<S> {
        &self.conjugate
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn spacing(&self) -> usize {
        self.min_target_spacing
    }

    pub fn underflow_policy(&self) -> UnderflowPolicy {
        self.underflow
    }

    /// Upper bound on the count whose targets fit with `min_target_spacing`
    /// between them, ignoring rounding. `validate` also checks the rounded
    /// spacing insertion actually steps by.
    pub fn capacity(&self, role: Role) -> usize {
        let first_index = first_target_index(role);
        if self.sequence_length <= first_index || self.min_target_spacing == 0 {
            return 0;
        }
        (self.sequence_length - 2) / self.min_target_spacing + 1
    }

    pub fn validate(&self, cued_target_count: usize, non_cued_target_count: usize) -> Result<()> {
        if self.sequence_length == 0 {
            return Err(SequenceError::invalid("sequence length must be positive"));
        }
        if self.min_target_spacing == 0 {
            return Err(SequenceError::invalid("minimum target spacing must be positive"));
        }

        for (role, count) in [
            (Role::Cued, cued_target_count),
            (Role::NonCued, non_cued_target_count),
        ] {
            if count > self.sequence_length {
                return Err(SequenceError::invalid(format!(
                    "{} target count {} exceeds sequence length {}",
                    role, count, self.sequence_length
                )));
            }
            if count > 0 && first_target_index(role) >= self.sequence_length {
                return Err(SequenceError::invalid(format!(
                    "{} targets start at index {}, past sequence length {}",
                    role,
                    first_target_index(role),
                    self.sequence_length
                )));
            }
            if self.underflow == UnderflowPolicy::Reject && count > self.capacity(role) {
                return Err(SequenceError::invalid(format!(
                    "{} target count {} does not fit {} positions with spacing {} (at most {})",
                    role,
                    count,
                    self.sequence_length,
                    self.min_target_spacing,
                    self.capacity(role)
                )));
            }
            if self.underflow == UnderflowPolicy::Reject && count > 1 {
                let spacing = target_spacing(self.sequence_length, count);
                if spacing < self.required_spacing(role) {
                    return Err(SequenceError::invalid(format!(
                        "{} target count {} spaces targets {} apart, {} needs at least {}",
                        role,
                        count,
                        spacing,
                        role,
                        self.required_spacing(role)
                    )));
                }
                if self.furthest_target(count) >= self.sequence_length {
                    return Err(SequenceError::invalid(format!(
                        "{} target count {} may need index {}, past sequence length {}",
                        role,
                        count,
                        self.furthest_target(count),
                        self.sequence_length
                    )));
                }
            }
        }
        Ok(())
    }

    /// Smallest rounded spacing that keeps every gap at `min_target_spacing`.
    /// The first advance is `step + 1` from index 0, so a later first target
    /// shortens the first gap by the difference.
    fn required_spacing(&self, role: Role) -> usize {
        self.min_target_spacing + first_target_index(role) - CUED_FIRST_TARGET
    }

    // Index of the last of `count >= 2` targets when no step is shortened by
    // jitter. Both sides reach their second target at `step + 1`.
    fn furthest_target(&self, count: usize) -> usize {
        1 + (count - 1) * target_spacing(self.sequence_length, count)
    }

    /// Draws the non-target base sequence and repairs adjacent duplicates.
    pub fn draw_base<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<S> {
        let non_targets = self.alphabet.non_targets();
        let mut sequence: Vec<S> = (0..self.sequence_length)
            .map(|_| non_targets[rng.gen_range(0..non_targets.len())])
            .collect();
        self.repair_adjacent(&mut sequence);
        sequence
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        cued_target_count: usize,
        non_cued_target_count: usize,
        rng: &mut R,
    ) -> Result<SequencePair<S>> {
        self.validate(cued_target_count, non_cued_target_count)?;

        let mut cued = self.draw_base(rng);
        let mut non_cued = self.conjugate.apply(&cued)?;

        let cued_placed = self.insert_targets(
            &mut cued,
            cued_target_count,
            CUED_FIRST_TARGET,
            CUED_JITTER_BOUND,
            rng,
        );
        let non_cued_placed = self.insert_targets(
            &mut non_cued,
            non_cued_target_count,
            NON_CUED_FIRST_TARGET,
            self.min_target_spacing,
            rng,
        );

        let pair = SequencePair {
            cued,
            non_cued,
            target: self.alphabet.target(),
            cued_requested: cued_target_count,
            non_cued_requested: non_cued_target_count,
            cued_placed,
            non_cued_placed,
        };

        if self.underflow == UnderflowPolicy::Reject {
            for role in [Role::Cued, Role::NonCued] {
                if pair.placed(role) < pair.requested(role) {
                    return Err(SequenceError::TargetUnderflow {
                        role,
                        requested: pair.requested(role),
                        placed: pair.placed(role),
                    });
                }
            }
        }

        Ok(pair)
    }

    fn repair_adjacent(&self, sequence: &mut [S]) {
        let non_targets = self.alphabet.non_targets();
        for i in 0..sequence.len().saturating_sub(1) {
            let current = sequence[i];
            if current != sequence[i + 1] {
                continue;
            }
            let previous = if i > 0 { Some(sequence[i - 1]) } else { None };
            let differs = |symbol: S| symbol != current && Some(symbol) != previous;

            let replacement = match self.repair {
                RepairStrategy::SinglePass => non_targets.iter().copied().find(|&s| differs(s)),
                RepairStrategy::LookAhead => {
                    let next = sequence.get(i + 2).copied();
                    non_targets
                        .iter()
                        .copied()
                        .find(|&s| differs(s) && Some(s) != next)
                        .or_else(|| {
                            non_targets
                                .iter()
                                .copied()
                                .find(|&s| s != current && Some(s) != next)
                        })
                        .or_else(|| non_targets.iter().copied().find(|&s| s != current))
                }
            };

            if let Some(symbol) = replacement {
                sequence[i + 1] = symbol;
            }
        }
    }

    /// Writes the target into `sequence` and returns how many target
    /// occurrences the sequence ends up with.
    fn insert_targets<R: Rng + ?Sized>(
        &self,
        sequence: &mut [S],
        count: usize,
        first_index: usize,
        jitter_bound: usize,
        rng: &mut R,
    ) -> usize {
        let target = self.alphabet.target();
        if count == 0 {
            return 0;
        }

        let len = sequence.len();
        let spacing = target_spacing(len, count);

        let mut index = 0;
        let mut placements = 0;
        while placements != count && index < len {
            let jitter = rng.gen_range(0..jitter_bound);
            // jitter may not pull the step down to the minimum spacing
            let step = if spacing <= self.min_target_spacing + jitter {
                spacing
            } else {
                spacing - jitter
            };

            if index == 0 {
                if first_index >= len {
                    break;
                }
                sequence[first_index] = target;
                index += step + 1;
            } else {
                sequence[index] = target;
                index += step;
            }
            placements += 1;
        }

        sequence.iter().filter(|&&symbol| symbol == target).count()
    }
}

// Nominal gap between targets, rounded half to even.
fn target_spacing(len: usize, count: usize) -> usize {
    (len as f64 / count as f64).round_ties_even() as usize
}

fn first_target_index(role: Role) -> usize {
    match role {
        Role::Cued => CUED_FIRST_TARGET,
        Role::NonCued => NON_CUED_FIRST_TARGET,
    }
}

/// One-call form of [`SequenceBuilder`] with the default repair and underflow
/// policies. Returns `(cued, non_cued)`.
pub fn generate_sequence<S: Symbol, R: Rng + ?Sized>(
    alphabet: &[S],
    target: S,
    sequence_length: usize,
    cued_target_count: usize,
    non_cued_target_count: usize,
    min_target_spacing: usize,
    rng: &mut R,
) -> Result<(Vec<S>, Vec<S>)> {
    let alphabet = Alphabet::new(alphabet.to_vec(), target)?;
    let builder =
        SequenceBuilder::new(alphabet, sequence_length)?.min_target_spacing(min_target_spacing);
    builder
        .generate(cued_target_count, non_cued_target_count, rng)
        .map(SequencePair::into_parts)
}
