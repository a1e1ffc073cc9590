//! Balance scoring.
//!
//! Pure functions computing a 0-100 balance score for one section along
//! each factor (gender, academic level, behavioral level, special-needs
//! density) plus a weighted aggregate, and a whole-partition score used by
//! the optimizer's acceptance rule. No state: the optimizer calls these on
//! hypothetical partitions thousands of times per run, so every function
//! here is deterministic for a given input multiset.

mod metrics;
mod profile;

pub use metrics::{
    academic_balance, behavioral_balance, gender_balance, partition_score, section_scores,
    special_needs_density, SectionScores,
};
pub use profile::{
    ScoringProfile, DEFAULT_ACADEMIC_IDEAL, DEFAULT_BEHAVIORAL_IDEAL, DEFAULT_BEHAVIORAL_WEIGHTS,
    DEFAULT_OVER_DENSITY_SPAN, DEFAULT_SIZE_PENALTY, DEFAULT_SPECIAL_NEEDS_WINDOW,
    EVEN_ACADEMIC_IDEAL,
};
