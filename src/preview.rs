//! Delta-impact evaluation for single-student moves.
//!
//! Answers "what happens if this one student moves over there?" without
//! committing anything: recomputes only the two affected sections, reports
//! full before/after sub-score vectors plus the overall score delta, and
//! runs the constraint validator on the hypothetical result. A positive
//! score delta does not imply the move is constraint-legal — the two
//! signals are reported side by side, never merged.
//!
//! This is the scoring path for interactive manual adjustment and for
//! moves proposed by an external advisory service; suggestions get no
//! shortcut around validation.

use serde::{Deserialize, Serialize};

use crate::models::{Constraint, Partition, Roster, WeightSet};
use crate::scoring::{self, ScoringProfile, SectionScores};
use crate::validation::{validate, Violation};
use crate::RosterError;

/// Before/after scores for one section touched by a move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionDelta {
    /// Section index.
    pub section: usize,
    /// Scores before the move.
    pub before: SectionScores,
    /// Scores after the move.
    pub after: SectionScores,
}

impl SectionDelta {
    /// Aggregate change for this section.
    pub fn aggregate_delta(&self) -> f64 {
        self.after.aggregate - self.before.aggregate
    }
}

/// The full impact of one hypothetical single-student move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePreview {
    /// Moved student's ID.
    pub student: String,
    /// The section the student would leave.
    pub source: SectionDelta,
    /// The section the student would join.
    pub target: SectionDelta,
    /// Whole-partition score before the move.
    pub overall_before: f64,
    /// Whole-partition score after the move (size penalty included —
    /// unlike a swap, a move changes section sizes).
    pub overall_after: f64,
    /// Violations the move would introduce that the current partition
    /// does not already have. Empty does NOT mean the partition is
    /// violation-free — only that this move makes nothing worse.
    pub new_violations: Vec<Violation>,
}

impl MovePreview {
    /// Overall score change.
    pub fn overall_delta(&self) -> f64 {
        self.overall_after - self.overall_before
    }

    /// Whether the move introduces no new violations.
    pub fn is_constraint_safe(&self) -> bool {
        self.new_violations.is_empty()
    }
}

/// Evaluates a hypothetical move of `student` from section `from` to
/// section `to`. Read-only: the given partition is never mutated.
///
/// # Errors
/// Structural problems only: out-of-range indices, `from == to`, a
/// student not actually in `from`, a degenerate weight set, or section
/// membership referencing unknown students.
#[allow(clippy::too_many_arguments)]
pub fn preview_move(
    partition: &Partition,
    roster: &Roster,
    student: &str,
    from: usize,
    to: usize,
    weights: &WeightSet,
    profile: &ScoringProfile,
    constraints: &[Constraint],
) -> Result<MovePreview, RosterError> {
    weights.validate()?;
    let count = partition.section_count();
    for index in [from, to] {
        if index >= count {
            return Err(RosterError::SectionOutOfRange { index, count });
        }
    }
    if from == to {
        return Err(RosterError::InvalidMove(format!(
            "student '{student}' would stay in section {from}"
        )));
    }
    if !partition.sections()[from].contains(student) {
        return Err(RosterError::StudentNotInSection {
            student: student.to_string(),
            section: from,
        });
    }

    let before_source =
        scoring::section_scores(&partition.sections()[from], roster, weights, profile)?;
    let before_target =
        scoring::section_scores(&partition.sections()[to], roster, weights, profile)?;
    let overall_before = scoring::partition_score(partition, roster, weights, profile)?;
    let baseline = validate(partition, constraints);

    let mut hypothetical = partition.clone();
    hypothetical.move_student(student, from, to)?;

    let after_source =
        scoring::section_scores(&hypothetical.sections()[from], roster, weights, profile)?;
    let after_target =
        scoring::section_scores(&hypothetical.sections()[to], roster, weights, profile)?;
    let overall_after = scoring::partition_score(&hypothetical, roster, weights, profile)?;
    let new_violations = validate(&hypothetical, constraints).new_violations(&baseline);

    Ok(MovePreview {
        student: student.to_string(),
        source: SectionDelta {
            section: from,
            before: before_source,
            after: after_source,
        },
        target: SectionDelta {
            section: to,
            before: before_target,
            after: after_target,
        },
        overall_before,
        overall_after,
        new_violations,
    })
}
