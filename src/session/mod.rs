//! Run-level planning around the sequence generator: which side is cued,
//! how many targets each side gets, and the event markers that let the EEG
//! preprocessing rebuild trial labels.

pub mod cue;
pub mod export;
pub mod labels;
pub mod markers;
pub mod planner;
pub mod scoring;

pub use cue::{balanced_run, cue_schedule, CueSide};
pub use export::write_plan_csv;
pub use labels::{cue_labels, reconstruct_trials, TrialRecord};
pub use markers::{
    emit_experiment_start, emit_experiment_stop, emit_response, emit_run_accuracy,
    emit_run_start, emit_run_stop, emit_trial_markers, emit_trial_stop, read_marker_log,
    FileMarkerLog, Marker, MarkerKind, MarkerSink, MemoryMarkerLog,
};
pub use planner::{SessionPlanner, TrialPlan};
pub use scoring::{run_accuracy, score_response};
