//! Shape-sequence generation for the cued / non-cued sides of a trial.
//!
//! [`SequenceBuilder`] produces the two per-trial sequences and
//! [`TargetCountAllocator`] the balanced per-block target counts they are
//! built from.

pub mod alphabet;
pub mod allocator;
pub mod audit;
pub mod builder;
pub mod conjugate;

pub use alphabet::{Alphabet, Shape, ShapeTable, Symbol};
pub use allocator::{
    allocate_target_counts, draw_non_cued_count, TargetCountAllocator, TargetCounts,
};
pub use audit::{audit, AuditReport};
pub use builder::{
    generate_sequence, RepairStrategy, SequenceBuilder, SequencePair, UnderflowPolicy,
    DEFAULT_MIN_TARGET_SPACING,
};
pub use conjugate::ConjugateMap;
