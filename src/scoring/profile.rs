//! Scoring profile: the tunable targets behind the balance metrics.
//!
//! Every ideal vector, window, and penalty rate the metric functions use
//! lives here as a named constant with a builder override — never a
//! literal buried in scoring logic.

use serde::{Deserialize, Serialize};

/// Default ideal academic distribution: advanced / proficient /
/// developing / needs-support.
pub const DEFAULT_ACADEMIC_IDEAL: [f64; 4] = [0.25, 0.50, 0.20, 0.05];

/// Flat academic distribution for schools that prefer even spread.
pub const EVEN_ACADEMIC_IDEAL: [f64; 4] = [0.25, 0.25, 0.25, 0.25];

/// Default ideal behavioral distribution: low / medium / high needs.
pub const DEFAULT_BEHAVIORAL_IDEAL: [f64; 3] = [0.60, 0.30, 0.10];

/// Per-bucket deviation weights for the behavioral metric. The high-needs
/// bucket is weighted hardest: concentrating high-need students in one
/// section is worse than concentrating low-need students.
pub const DEFAULT_BEHAVIORAL_WEIGHTS: [f64; 3] = [0.75, 1.0, 1.5];

/// Target special-needs proportion window (inclusive bounds).
pub const DEFAULT_SPECIAL_NEEDS_WINDOW: (f64, f64) = (0.10, 0.25);

/// Proportion span above the window over which the special-needs score
/// decays from 100 to 0. Steeper than the below-window decay, which only
/// falls to 50: over-concentration is the more harmful direction.
pub const DEFAULT_OVER_DENSITY_SPAN: f64 = 0.15;

/// Aggregate-score penalty per student of section-size spread.
pub const DEFAULT_SIZE_PENALTY: f64 = 0.1;

/// Tunable targets for the balance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    /// Ideal academic bucket proportions (sums to 1).
    pub academic_ideal: [f64; 4],
    /// Ideal behavioral bucket proportions (sums to 1).
    pub behavioral_ideal: [f64; 3],
    /// Per-bucket deviation weights for the behavioral metric.
    pub behavioral_weights: [f64; 3],
    /// Inclusive (low, high) target window for special-needs proportion.
    pub special_needs_window: (f64, f64),
    /// Proportion span above the window over which the score reaches 0.
    pub over_density_span: f64,
    /// Penalty per student of size spread, subtracted from the
    /// whole-partition score.
    pub size_penalty_per_student: f64,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            academic_ideal: DEFAULT_ACADEMIC_IDEAL,
            behavioral_ideal: DEFAULT_BEHAVIORAL_IDEAL,
            behavioral_weights: DEFAULT_BEHAVIORAL_WEIGHTS,
            special_needs_window: DEFAULT_SPECIAL_NEEDS_WINDOW,
            over_density_span: DEFAULT_OVER_DENSITY_SPAN,
            size_penalty_per_student: DEFAULT_SIZE_PENALTY,
        }
    }
}

impl ScoringProfile {
    /// Creates the default profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ideal academic distribution. The vector is normalized to
    /// sum to 1 (ignored if it sums to zero).
    pub fn with_academic_ideal(mut self, ideal: [f64; 4]) -> Self {
        if let Some(normalized) = normalize(&ideal) {
            self.academic_ideal.copy_from_slice(&normalized);
        }
        self
    }

    /// Sets the ideal behavioral distribution, normalized to sum to 1.
    pub fn with_behavioral_ideal(mut self, ideal: [f64; 3]) -> Self {
        if let Some(normalized) = normalize(&ideal) {
            self.behavioral_ideal.copy_from_slice(&normalized);
        }
        self
    }

    /// Sets the behavioral deviation weights.
    pub fn with_behavioral_weights(mut self, weights: [f64; 3]) -> Self {
        self.behavioral_weights = weights;
        self
    }

    /// Sets the special-needs target window. Bounds are clamped to [0, 1]
    /// and reordered if given backwards.
    pub fn with_special_needs_window(mut self, low: f64, high: f64) -> Self {
        let low = low.clamp(0.0, 1.0);
        let high = high.clamp(0.0, 1.0);
        self.special_needs_window = if low <= high { (low, high) } else { (high, low) };
        self
    }

    /// Sets the over-density decay span.
    pub fn with_over_density_span(mut self, span: f64) -> Self {
        self.over_density_span = span.max(f64::EPSILON);
        self
    }

    /// Sets the size-spread penalty rate.
    pub fn with_size_penalty(mut self, per_student: f64) -> Self {
        self.size_penalty_per_student = per_student.max(0.0);
        self
    }
}

fn normalize<const N: usize>(values: &[f64; N]) -> Option<[f64; N]> {
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    let mut out = [0.0; N];
    for (o, v) in out.iter_mut().zip(values) {
        *o = v / sum;
    }
    Some(out)
}
