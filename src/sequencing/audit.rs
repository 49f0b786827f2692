use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;

use super::alphabet::Symbol;
use super::builder::{count_repeats, SequenceBuilder, SequencePair, UnderflowPolicy};
use crate::error::Role;

/// Aggregate over many generated pairs, one seed per pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub sequences: usize,
    pub with_residual_repeats: usize,
    pub cued_underflows: usize,
    pub non_cued_underflows: usize,
    pub failures: usize,
    pub min_target_gap: Option<usize>,
}

impl AuditReport {
    fn observe<S: Symbol>(pair: &SequencePair<S>) -> Self {
        let gap = [Role::Cued, Role::NonCued]
            .into_iter()
            .filter_map(|role| {
                pair.target_positions(role)
                    .windows(2)
                    .map(|w| w[1] - w[0])
                    .min()
            })
            .min();

        Self {
            sequences: 1,
            with_residual_repeats: usize::from(count_repeats(&pair.cued, Some(pair.target)) > 0),
            cued_underflows: usize::from(pair.cued_placed < pair.cued_requested),
            non_cued_underflows: usize::from(pair.non_cued_placed < pair.non_cued_requested),
            failures: 0,
            min_target_gap: gap,
        }
    }

    fn failed() -> Self {
        Self {
            sequences: 1,
            failures: 1,
            ..Self::default()
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sequences: self.sequences + other.sequences,
            with_residual_repeats: self.with_residual_repeats + other.with_residual_repeats,
            cued_underflows: self.cued_underflows + other.cued_underflows,
            non_cued_underflows: self.non_cued_underflows + other.non_cued_underflows,
            failures: self.failures + other.failures,
            min_target_gap: match (self.min_target_gap, other.min_target_gap) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Generates one pair per seed in parallel and tallies residual repeats,
/// under-placement and the tightest target gap. Underflows are reported
/// rather than raised.
pub fn audit<S: Symbol + Send + Sync>(
    builder: &SequenceBuilder<S>,
    cued_target_count: usize,
    non_cued_target_count: usize,
    seeds: Range<u64>,
) -> AuditReport {
    let builder = builder.clone().underflow(UnderflowPolicy::Report);
    seeds
        .into_par_iter()
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            match builder.generate(cued_target_count, non_cued_target_count, &mut rng) {
                Ok(pair) => AuditReport::observe(&pair),
                Err(_) => AuditReport::failed(),
            }
        })
        .reduce(AuditReport::default, AuditReport::merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::alphabet::Alphabet;
    use crate::sequencing::builder::RepairStrategy;

    #[test]
    fn lab_alphabet_audits_clean() {
        let alphabet = Alphabet::new(vec!['r', 'c', 'i', 't', 'h'], 'h').unwrap();
        let builder = SequenceBuilder::new(alphabet, 40).unwrap();
        let report = audit(&builder, 6, 4, 0..200);
        assert_eq!(report.sequences, 200);
        assert_eq!(report.with_residual_repeats, 0);
        assert_eq!(report.cued_underflows, 0);
        assert_eq!(report.non_cued_underflows, 0);
        assert_eq!(report.failures, 0);
        assert!(report.min_target_gap.unwrap() >= 5);
    }

    #[test]
    fn audit_is_independent_of_scheduling() {
        let alphabet = Alphabet::new(vec!['a', 'b', 'h'], 'h').unwrap();
        let builder = SequenceBuilder::new(alphabet, 30)
            .unwrap()
            .repair(RepairStrategy::SinglePass);
        assert_eq!(audit(&builder, 3, 2, 0..100), audit(&builder, 3, 2, 0..100));
    }

    #[test]
    fn invalid_requests_count_as_failures() {
        let alphabet = Alphabet::new(vec!['a', 'b', 'h'], 'h').unwrap();
        let builder = SequenceBuilder::new(alphabet, 10).unwrap();
        let report = audit(&builder, 11, 0, 0..4);
        assert_eq!(report.failures, 4);
        assert_eq!(report.min_target_gap, None);
    }
}
