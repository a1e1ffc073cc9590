//! Constraint validation.
//!
//! Checks a candidate partition against the full constraint list and
//! reports which constraints are violated and why. Violations are values,
//! not errors: real constraint sets are frequently over-subscribed
//! (conflicting keep-together and keep-apart requests), and the caller —
//! an administrator weighing trade-offs — needs the whole picture, not an
//! exception.
//!
//! The validator runs once after distribution and once per candidate swap
//! inside the optimizer's inner loop, so a call stays O(students): the
//! student → section lookup is built in one pass and every per-constraint
//! check touches only the students that constraint lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Constraint, ConstraintKind, Partition, Priority};

/// Maximum allowed difference between the largest and smallest section
/// for the equal-class-size constraint.
pub const SIZE_TOLERANCE: usize = 2;

/// A violated constraint with a generated explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The constraint that failed.
    pub constraint: Constraint,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl Violation {
    fn new(constraint: &Constraint, message: impl Into<String>) -> Self {
        Self {
            constraint: constraint.clone(),
            message: message.into(),
        }
    }

    /// The violated constraint's priority.
    pub fn priority(&self) -> Priority {
        self.constraint.priority
    }
}

/// Result of validating one partition against a constraint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every constraint is satisfied.
    pub satisfied: bool,
    /// All detected violations, in constraint order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Violations at a given priority.
    pub fn violations_at(&self, priority: Priority) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.priority() == priority)
    }

    /// Violations present here but absent from `baseline`. Used to judge
    /// whether a candidate change makes things worse than they already were.
    pub fn new_violations(&self, baseline: &ValidationReport) -> Vec<Violation> {
        self.violations
            .iter()
            .filter(|v| !baseline.violations.contains(v))
            .cloned()
            .collect()
    }
}

/// Validates a partition against every constraint.
///
/// Never mutates the partition. Students a constraint lists that are not
/// placed anywhere are reported as violations of that constraint —
/// membership cannot be confirmed — rather than skipped.
pub fn validate(partition: &Partition, constraints: &[Constraint]) -> ValidationReport {
    let lookup = partition.section_lookup();
    let mut violations = Vec::new();

    for constraint in constraints {
        match &constraint.kind {
            ConstraintKind::KeepTogether { students } => {
                let unplaced: Vec<&str> = students
                    .iter()
                    .filter(|id| !lookup.contains_key(id.as_str()))
                    .map(String::as_str)
                    .collect();
                let first = students
                    .first()
                    .and_then(|id| lookup.get(id.as_str()).copied());
                if !unplaced.is_empty() {
                    violations.push(Violation::new(
                        constraint,
                        format!("students not placed anywhere: {}", unplaced.join(", ")),
                    ));
                } else if students
                    .iter()
                    .any(|id| lookup.get(id.as_str()).copied() != first)
                {
                    violations.push(Violation::new(
                        constraint,
                        format!(
                            "students {} are split across sections",
                            students.join(", ")
                        ),
                    ));
                }
            }

            ConstraintKind::KeepApart { students } => {
                let mut seen = HashSet::new();
                let mut clash = None;
                let mut unplaced = Vec::new();
                for id in students {
                    match lookup.get(id.as_str()) {
                        Some(&section) => {
                            if !seen.insert(section) {
                                clash = Some((id.as_str(), section));
                            }
                        }
                        None => unplaced.push(id.as_str()),
                    }
                }
                if !unplaced.is_empty() {
                    violations.push(Violation::new(
                        constraint,
                        format!("students not placed anywhere: {}", unplaced.join(", ")),
                    ));
                } else if let Some((id, section)) = clash {
                    violations.push(Violation::new(
                        constraint,
                        format!("student '{id}' shares section {section} with another listed student"),
                    ));
                }
            }

            ConstraintKind::PreferredTeacher { student, teacher } => {
                match placed_teacher(partition, &lookup, student) {
                    Placement::Unplaced => violations.push(Violation::new(
                        constraint,
                        format!("student '{student}' is not placed anywhere"),
                    )),
                    Placement::With(assigned) if assigned.as_deref() == Some(teacher) => {}
                    Placement::With(assigned) => violations.push(Violation::new(
                        constraint,
                        format!(
                            "student '{student}' is with teacher {} instead of '{teacher}'",
                            assigned.as_deref().unwrap_or("<none>")
                        ),
                    )),
                }
            }

            ConstraintKind::AvoidTeacher { student, teacher } => {
                match placed_teacher(partition, &lookup, student) {
                    Placement::Unplaced => violations.push(Violation::new(
                        constraint,
                        format!("student '{student}' is not placed anywhere"),
                    )),
                    Placement::With(assigned) if assigned.as_deref() == Some(teacher) => {
                        violations.push(Violation::new(
                            constraint,
                            format!("student '{student}' is placed with avoided teacher '{teacher}'"),
                        ));
                    }
                    Placement::With(_) => {}
                }
            }

            // Advisory: balance quality lives in the aggregate score, so
            // there is no pass/fail check here. The arm is explicit so the
            // match stays exhaustive over every constraint kind.
            ConstraintKind::BalancedDistribution { .. } => {}

            ConstraintKind::EqualClassSize => {
                let spread = partition.size_spread();
                if spread > SIZE_TOLERANCE {
                    violations.push(Violation::new(
                        constraint,
                        format!(
                            "section sizes differ by {spread} (max allowed {SIZE_TOLERANCE})"
                        ),
                    ));
                }
            }
        }
    }

    ValidationReport {
        satisfied: violations.is_empty(),
        violations,
    }
}

enum Placement {
    Unplaced,
    With(Option<String>),
}

fn placed_teacher(
    partition: &Partition,
    lookup: &std::collections::HashMap<&str, usize>,
    student: &str,
) -> Placement {
    match lookup.get(student) {
        None => Placement::Unplaced,
        Some(&section) => Placement::With(
            partition
                .section(section)
                .and_then(|s| s.teacher.clone()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn partition_of(memberships: &[&[&str]]) -> Partition {
        let sections = memberships
            .iter()
            .map(|ids| {
                let mut section = Section::new();
                for id in *ids {
                    section.add_student(*id);
                }
                section
            })
            .collect();
        Partition::from_sections(sections)
    }

    #[test]
    fn test_keep_together_satisfied_and_split() {
        let together = [Constraint::keep_together(["S1", "S2"])];

        let good = partition_of(&[&["S1", "S2"], &["S3"]]);
        assert!(validate(&good, &together).satisfied);

        let split = partition_of(&[&["S1", "S3"], &["S2"]]);
        let report = validate(&split, &together);
        assert!(!report.satisfied);
        assert_eq!(report.violation_count(), 1);
        assert!(report.violations[0].message.contains("split across sections"));
    }

    #[test]
    fn test_keep_apart_detects_sharing() {
        let apart = [Constraint::keep_apart(["S1", "S2", "S3"])];

        let good = partition_of(&[&["S1"], &["S2"], &["S3"]]);
        assert!(validate(&good, &apart).satisfied);

        let shared = partition_of(&[&["S1", "S3"], &["S2"]]);
        let report = validate(&shared, &apart);
        assert!(!report.satisfied);
        assert!(report.violations[0].message.contains("shares section"));
    }

    #[test]
    fn test_unplaced_student_is_a_violation() {
        let together = [Constraint::keep_together(["S1", "MISSING"])];
        let partition = partition_of(&[&["S1"], &[]]);
        let report = validate(&partition, &together);
        assert!(!report.satisfied);
        assert!(report.violations[0].message.contains("not placed"));
    }

    #[test]
    fn test_teacher_affinity() {
        let mut partition = partition_of(&[&["S1"], &["S2"]]);
        partition.section_mut(0).unwrap().set_teacher(Some("T1".into()));
        partition.section_mut(1).unwrap().set_teacher(Some("T2".into()));

        let constraints = [
            Constraint::preferred_teacher("S1", "T1"),
            Constraint::avoid_teacher("S2", "T1"),
        ];
        assert!(validate(&partition, &constraints).satisfied);

        let wrong = [
            Constraint::preferred_teacher("S1", "T2"),
            Constraint::avoid_teacher("S2", "T2"),
        ];
        let report = validate(&partition, &wrong);
        assert_eq!(report.violation_count(), 2);
        assert!(report.violations[0].message.contains("instead of"));
        assert!(report.violations[1].message.contains("avoided teacher"));
    }

    #[test]
    fn test_preferred_teacher_unassigned_section() {
        // Section has no teacher at all: preference cannot hold.
        let partition = partition_of(&[&["S1"]]);
        let constraints = [Constraint::preferred_teacher("S1", "T1")];
        let report = validate(&partition, &constraints);
        assert!(!report.satisfied);
        assert!(report.violations[0].message.contains("<none>"));
    }

    #[test]
    fn test_equal_class_size_tolerance_boundary() {
        let constraints = [Constraint::equal_class_size()];

        // Spread of exactly 2 is allowed.
        let at_limit = partition_of(&[&["S1", "S2", "S3"], &["S4"]]);
        assert!(validate(&at_limit, &constraints).satisfied);

        // Spread of 3 is not.
        let over = partition_of(&[&["S1", "S2", "S3", "S4"], &["S5"]]);
        let report = validate(&over, &constraints);
        assert!(!report.satisfied);
        assert!(report.violations[0].message.contains("differ by 3"));
    }

    #[test]
    fn test_balanced_distribution_is_advisory() {
        use crate::models::BalanceFactor;
        // Grossly unbalanced on gender, but the advisory kind never fails.
        let partition = partition_of(&[&["S1", "S2"], &[]]);
        let constraints = [Constraint::balanced_distribution(BalanceFactor::Gender)];
        assert!(validate(&partition, &constraints).satisfied);
    }

    #[test]
    fn test_new_violations_diff() {
        let apart = [Constraint::keep_apart(["S1", "S2"])];
        let clean = validate(&partition_of(&[&["S1"], &["S2"]]), &apart);
        let broken = validate(&partition_of(&[&["S1", "S2"], &[]]), &apart);

        assert!(clean.new_violations(&broken).is_empty());
        assert_eq!(broken.new_violations(&clean).len(), 1);
    }

    #[test]
    fn test_violation_priority_accessor() {
        use crate::models::Priority;
        let apart = [Constraint::keep_apart(["S1", "S2"]).with_priority(Priority::Low)];
        let report = validate(&partition_of(&[&["S1", "S2"]]), &apart);
        assert_eq!(report.violations[0].priority(), Priority::Low);
        assert_eq!(report.violations_at(Priority::Low).count(), 1);
        assert_eq!(report.violations_at(Priority::Required).count(), 0);
    }

    #[test]
    fn test_empty_constraint_list() {
        let report = validate(&partition_of(&[&["S1"], &[]]), &[]);
        assert!(report.satisfied);
        assert_eq!(report.violation_count(), 0);
    }
}
