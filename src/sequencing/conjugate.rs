use super::alphabet::Symbol;
use crate::error::{Result, SequenceError};

/// Bijection over the non-target symbols used to derive the non-cued sequence.
///
/// Symbol `i` maps to symbol `(i + len / 2) % len`. A mapping that sends any
/// symbol to itself is rejected, so the two sides can never show the same
/// non-target symbol at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjugateMap<S> {
    pairs: Vec<(S, S)>,
}

impl<S: Symbol> ConjugateMap<S> {
    pub fn rotate(non_targets: &[S]) -> Result<Self> {
        let len = non_targets.len();
        if len < 2 {
            return Err(SequenceError::invalid(format!(
                "conjugate map needs at least 2 non-target symbols, got {}",
                len
            )));
        }

        let shift = len / 2;
        let pairs: Vec<(S, S)> = non_targets
            .iter()
            .enumerate()
            .map(|(index, &symbol)| (symbol, non_targets[(index + shift) % len]))
            .collect();

        if let Some((symbol, _)) = pairs.iter().find(|(from, to)| from == to) {
            return Err(SequenceError::invalid(format!(
                "conjugate map sends {:?} to itself",
                symbol
            )));
        }

        Ok(Self { pairs })
    }

    pub fn image(&self, symbol: S) -> Option<S> {
        self.pairs
            .iter()
            .find(|(from, _)| *from == symbol)
            .map(|&(_, to)| to)
    }

    /// Maps every symbol of `sequence`; fails on symbols outside the map.
    pub fn apply(&self, sequence: &[S]) -> Result<Vec<S>> {
        sequence
            .iter()
            .map(|&symbol| {
                self.image(symbol).ok_or_else(|| {
                    SequenceError::invalid(format!("{:?} has no conjugate", symbol))
                })
            })
            .collect()
    }

    pub fn pairs(&self) -> &[(S, S)] {
        &self.pairs
    }
}
