//! Constraint-aware initial distribution.
//!
//! Builds a feasible (not yet optimized) starting partition:
//!
//! 1. Merge keep-together constraints into placement groups. A student
//!    belongs to at most one group; the first constraint seen wins and
//!    every overlap is reported as a warning, never absorbed silently.
//! 2. Every remaining student becomes a singleton group.
//! 3. Sort groups by descending size and place each into the currently
//!    smallest section (first-fit-decreasing; large groups first so they
//!    are not left without a home).
//! 4. Post-pass: relocate keep-apart offenders to the smallest
//!    conflict-free section; offenders with no legal target stay put and
//!    surface later through the validator.
//!
//! This is a heuristic, not a solver: it always succeeds, and balance
//! quality is the optimizer's job, not this module's.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (greedy
//! longest-first placement)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::models::{Constraint, ConstraintKind, Partition, Roster};
use crate::RosterError;

/// A non-fatal condition noticed during distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionWarning {
    /// Warning category.
    pub kind: DistributionWarningKind,
    /// Affected student ID.
    pub student: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of distribution warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionWarningKind {
    /// A student appears in more than one keep-together constraint; the
    /// first constraint seen keeps the student.
    AmbiguousGrouping,
    /// A constraint lists a student the roster does not contain.
    UnknownStudent,
}

impl DistributionWarning {
    fn new(kind: DistributionWarningKind, student: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            student: student.to_string(),
            message: message.into(),
        }
    }
}

/// The distributor's output: a complete partition plus any warnings.
#[derive(Debug, Clone)]
pub struct DistributionOutcome {
    /// The starting partition (every roster student placed exactly once).
    pub partition: Partition,
    /// Grouping ambiguities and unknown references noticed along the way.
    pub warnings: Vec<DistributionWarning>,
}

/// Distributes a roster into `section_count` sections.
///
/// Always produces a complete partition; constraint conflicts are left for
/// the validator to report. An empty roster yields an all-empty partition.
///
/// # Errors
/// [`RosterError::InvalidSectionCount`] if `section_count` is zero.
pub fn distribute(
    roster: &Roster,
    constraints: &[Constraint],
    section_count: usize,
) -> Result<DistributionOutcome, RosterError> {
    if section_count == 0 {
        return Err(RosterError::InvalidSectionCount);
    }

    let mut warnings = Vec::new();
    let (groups, bound) = build_groups(roster, constraints, &mut warnings);

    // Descending size; the sort is stable, so equally-sized groups keep
    // their creation order and runs are reproducible for identical input.
    let mut ordered: Vec<&Vec<usize>> = groups.iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut partition = Partition::new(section_count);
    for group in ordered {
        let target = smallest_section(&partition);
        if let Some(section) = partition.section_mut(target) {
            for &pos in group {
                section.add_student(roster.students()[pos].id.clone());
            }
        }
    }

    separate_keep_apart(&mut partition, constraints, &bound)?;

    Ok(DistributionOutcome {
        partition,
        warnings,
    })
}

/// Builds placement groups from keep-together constraints plus singletons.
/// Returns the groups (roster positions) and the set of students bound
/// into a multi-member group.
fn build_groups(
    roster: &Roster,
    constraints: &[Constraint],
    warnings: &mut Vec<DistributionWarning>,
) -> (Vec<Vec<usize>>, HashSet<String>) {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut grouped: Vec<bool> = vec![false; roster.len()];

    for constraint in constraints {
        let ConstraintKind::KeepTogether { students } = &constraint.kind else {
            continue;
        };
        let mut members = Vec::new();
        for id in students {
            match roster.position(id) {
                None => {
                    warn!(student = %id, "keep-together lists a student missing from the roster");
                    warnings.push(DistributionWarning::new(
                        DistributionWarningKind::UnknownStudent,
                        id,
                        format!("keep-together lists unknown student '{id}'"),
                    ));
                }
                Some(pos) if grouped[pos] => {
                    warn!(student = %id, "student already grouped; first keep-together wins");
                    warnings.push(DistributionWarning::new(
                        DistributionWarningKind::AmbiguousGrouping,
                        id,
                        format!(
                            "student '{id}' appears in multiple keep-together constraints; \
                             keeping the first grouping"
                        ),
                    ));
                }
                Some(pos) => {
                    grouped[pos] = true;
                    members.push(pos);
                }
            }
        }
        if !members.is_empty() {
            groups.push(members);
        }
    }

    let bound: HashSet<String> = groups
        .iter()
        .filter(|g| g.len() > 1)
        .flatten()
        .map(|&pos| roster.students()[pos].id.clone())
        .collect();

    for pos in 0..roster.len() {
        if !grouped[pos] {
            groups.push(vec![pos]);
        }
    }

    (groups, bound)
}

/// Relocates keep-apart offenders. For each section holding two or more
/// students of one constraint, the first listed student stays; the rest
/// move to the smallest section free of conflicting students. Students
/// bound into a keep-together group are never relocated — trading one
/// hard violation for another is not an improvement.
fn separate_keep_apart(
    partition: &mut Partition,
    constraints: &[Constraint],
    bound: &HashSet<String>,
) -> Result<(), RosterError> {
    for constraint in constraints {
        let ConstraintKind::KeepApart { students } = &constraint.kind else {
            continue;
        };

        let moves: Vec<(String, usize)> = {
            let lookup = partition.section_lookup();
            let mut per_section: Vec<Vec<&String>> = vec![Vec::new(); partition.section_count()];
            for id in students {
                if let Some(&section) = lookup.get(id.as_str()) {
                    per_section[section].push(id);
                }
            }
            per_section
                .into_iter()
                .enumerate()
                .flat_map(|(section, members)| {
                    members
                        .into_iter()
                        .skip(1)
                        .map(move |id| (id.clone(), section))
                })
                .collect()
        };

        for (id, from) in moves {
            if bound.contains(id.as_str()) {
                debug!(student = %id, "offender is keep-together bound; leaving in place");
                continue;
            }
            let occupied: HashSet<usize> = students
                .iter()
                .filter(|other| **other != id)
                .filter_map(|other| partition.section_of(other))
                .collect();
            let target = (0..partition.section_count())
                .filter(|index| !occupied.contains(index))
                .min_by_key(|&index| {
                    (
                        partition.section(index).map_or(usize::MAX, |s| s.len()),
                        index,
                    )
                });
            match target {
                Some(to) if to != from => partition.move_student(&id, from, to)?,
                _ => {
                    debug!(student = %id, "no conflict-free section; violation left for the validator");
                }
            }
        }
    }
    Ok(())
}

fn smallest_section(partition: &Partition) -> usize {
    let mut best = 0;
    let mut best_len = usize::MAX;
    for (index, section) in partition.sections().iter().enumerate() {
        if section.len() < best_len {
            best = index;
            best_len = section.len();
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, Student};
    use crate::validation::validate;

    fn roster_of(n: usize) -> Roster {
        let students = (0..n)
            .map(|i| {
                let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
                Student::new(format!("S{i}"), gender)
            })
            .collect();
        Roster::from_students(students).unwrap()
    }

    #[test]
    fn test_even_spread_without_constraints() {
        let roster = roster_of(9);
        let outcome = distribute(&roster, &[], 3).unwrap();
        assert!(outcome.partition.is_consistent_with(&roster));
        for section in outcome.partition.sections() {
            assert_eq!(section.len(), 3);
        }
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_uneven_population_spread_stays_tight() {
        let roster = roster_of(10);
        let outcome = distribute(&roster, &[], 3).unwrap();
        assert!(outcome.partition.is_consistent_with(&roster));
        assert!(outcome.partition.size_spread() <= 1);
    }

    #[test]
    fn test_keep_together_group_placed_whole() {
        let roster = roster_of(8);
        let constraints = [Constraint::keep_together(["S0", "S1", "S2"])];
        let outcome = distribute(&roster, &constraints, 2).unwrap();

        let section = outcome.partition.section_of("S0").unwrap();
        assert_eq!(outcome.partition.section_of("S1"), Some(section));
        assert_eq!(outcome.partition.section_of("S2"), Some(section));
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_overlapping_groups_warn_first_seen_wins() {
        let roster = roster_of(6);
        let constraints = [
            Constraint::keep_together(["S0", "S1"]),
            Constraint::keep_together(["S1", "S2"]),
        ];
        let outcome = distribute(&roster, &constraints, 2).unwrap();

        let ambiguous: Vec<_> = outcome
            .warnings
            .iter()
            .filter(|w| w.kind == DistributionWarningKind::AmbiguousGrouping)
            .collect();
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(ambiguous[0].student, "S1");

        // First grouping honored.
        assert_eq!(
            outcome.partition.section_of("S0"),
            outcome.partition.section_of("S1")
        );
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_unknown_student_in_constraint_warns() {
        let roster = roster_of(4);
        let constraints = [Constraint::keep_together(["S0", "GHOST"])];
        let outcome = distribute(&roster, &constraints, 2).unwrap();
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.kind == DistributionWarningKind::UnknownStudent && w.student == "GHOST"));
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_keep_apart_post_pass_separates() {
        // Singleton placement alternates sections, so S0 and S2 both land
        // in section 0; the post-pass must pull one of them out.
        let roster = roster_of(6);
        let constraints = [Constraint::keep_apart(["S0", "S2"])];
        let outcome = distribute(&roster, &constraints, 2).unwrap();

        assert_ne!(
            outcome.partition.section_of("S0"),
            outcome.partition.section_of("S2")
        );
        let report = validate(&outcome.partition, &constraints);
        assert!(report.satisfied, "violations: {:?}", report.violations);
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_keep_apart_impossible_left_for_validator() {
        // Three students to separate, one section: two must stay together.
        let roster = roster_of(3);
        let constraints = [Constraint::keep_apart(["S0", "S1", "S2"])];
        let outcome = distribute(&roster, &constraints, 1).unwrap();

        assert!(outcome.partition.is_consistent_with(&roster));
        let report = validate(&outcome.partition, &constraints);
        assert!(!report.satisfied);
    }

    #[test]
    fn test_together_bound_offender_not_relocated() {
        // S0 and S1 are both kept together and kept apart: the post-pass
        // must not break the group, so the keep-apart surfaces as a
        // violation instead.
        let roster = roster_of(4);
        let constraints = [
            Constraint::keep_together(["S0", "S1"]),
            Constraint::keep_apart(["S0", "S1"]),
        ];
        let outcome = distribute(&roster, &constraints, 2).unwrap();

        assert_eq!(
            outcome.partition.section_of("S0"),
            outcome.partition.section_of("S1")
        );
        let report = validate(&outcome.partition, &constraints);
        assert_eq!(report.violation_count(), 1);
    }

    #[test]
    fn test_empty_roster_yields_empty_partition() {
        let roster = Roster::new();
        let outcome = distribute(&roster, &[], 4).unwrap();
        assert_eq!(outcome.partition.section_count(), 4);
        assert_eq!(outcome.partition.total_students(), 0);
    }

    #[test]
    fn test_zero_sections_rejected() {
        let roster = roster_of(2);
        assert!(matches!(
            distribute(&roster, &[], 0),
            Err(RosterError::InvalidSectionCount)
        ));
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let roster = roster_of(12);
        let constraints = [
            Constraint::keep_together(["S0", "S5"]),
            Constraint::keep_apart(["S1", "S2"]),
        ];
        let a = distribute(&roster, &constraints, 3).unwrap();
        let b = distribute(&roster, &constraints, 3).unwrap();
        for (left, right) in a.partition.sections().iter().zip(b.partition.sections()) {
            assert_eq!(left.student_ids(), right.student_ids());
        }
    }
}
