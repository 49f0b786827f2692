use crate::error::SequenceError;
use crate::sequencing;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn to_py_err(error: SequenceError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Cued and non-cued shape sequences for one trial.
///
/// Shapes are passed as single-character strings, e.g. `['r', 'c', 'i', 't', 'h']`.
#[pyfunction]
#[pyo3(signature = (
    all_shapes,
    sequence_size,
    target_shape,
    targets_in_trial_cued,
    targets_in_trial_non_cued,
    min_target_key_distance = sequencing::DEFAULT_MIN_TARGET_SPACING,
    seed = None
))]
pub fn generate_sequence(
    all_shapes: Vec<char>,
    sequence_size: usize,
    target_shape: char,
    targets_in_trial_cued: usize,
    targets_in_trial_non_cued: usize,
    min_target_key_distance: usize,
    seed: Option<u64>,
) -> PyResult<(Vec<char>, Vec<char>)> {
    let mut rng = rng_from(seed);
    sequencing::generate_sequence(
        &all_shapes,
        target_shape,
        sequence_size,
        targets_in_trial_cued,
        targets_in_trial_non_cued,
        min_target_key_distance,
        &mut rng,
    )
    .map_err(to_py_err)
}

/// Balanced per-block target counts, `(cued, non_cued)`.
#[pyfunction]
#[pyo3(signature = (n_trials, min_targets, max_targets, seed = None))]
pub fn allocate_target_counts(
    n_trials: usize,
    min_targets: u32,
    max_targets: u32,
    seed: Option<u64>,
) -> PyResult<(Vec<u32>, Vec<u32>)> {
    let mut rng = rng_from(seed);
    sequencing::allocate_target_counts(n_trials, min_targets, max_targets, &mut rng)
        .map(|counts| (counts.cued, counts.non_cued))
        .map_err(to_py_err)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(generate_sequence, m)?)?;
    m.add_function(wrap_pyfunction!(allocate_target_counts, m)?)?;
    Ok(())
}
