//! Stimulus sequence generation for a covert-attention c-VEP paradigm.
//!
//! Two streams of shapes flicker side by side; the subject attends the cued
//! side and counts its target shape. [`sequencing`] builds the paired shape
//! sequences and balances per-trial target counts, [`session`] turns them
//! into cued runs with the markers needed to rebuild labels offline.

pub mod bindings;
pub mod config;
pub mod error;
pub mod local;
pub mod sequencing;
pub mod session;
pub mod utils;

pub use config::{load_config, save_config, ExperimentConfig, SequenceParameters};
pub use error::{Result, Role, SequenceError};
pub use sequencing::{
    allocate_target_counts, generate_sequence, Alphabet, SequenceBuilder, SequencePair, Shape,
    TargetCountAllocator, TargetCounts,
};
pub use session::{CueSide, SessionPlanner, TrialPlan};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn cvep_attention(m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::python::register(m)
}
