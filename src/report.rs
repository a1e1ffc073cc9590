//! Partition quality summary.
//!
//! Computes the indicators an administrator reviews after a run: size and
//! full balance scores per section, the whole-partition score, and the
//! violation picture broken down by priority.

use serde::{Deserialize, Serialize};

use crate::models::{Constraint, Partition, Priority, Roster, WeightSet};
use crate::scoring::{self, ScoringProfile, SectionScores};
use crate::validation::{validate, ValidationReport};
use crate::RosterError;

/// Quality indicators for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    /// Section index within the partition.
    pub index: usize,
    /// Section name (may be empty).
    pub name: String,
    /// Number of students.
    pub size: usize,
    /// Full balance scores.
    pub scores: SectionScores,
}

/// Quality indicators for a whole partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    /// Per-section indicators, in section order.
    pub sections: Vec<SectionSummary>,
    /// Whole-partition score (mean section aggregate minus size penalty).
    pub overall_score: f64,
    /// Largest minus smallest section size.
    pub size_spread: usize,
    /// The full validation report.
    pub report: ValidationReport,
}

impl PartitionSummary {
    /// Computes a summary from a partition and its inputs.
    pub fn calculate(
        partition: &Partition,
        roster: &Roster,
        weights: &WeightSet,
        profile: &ScoringProfile,
        constraints: &[Constraint],
    ) -> Result<Self, RosterError> {
        let mut sections = Vec::with_capacity(partition.section_count());
        for (index, section) in partition.sections().iter().enumerate() {
            let scores = scoring::section_scores(section, roster, weights, profile)?;
            sections.push(SectionSummary {
                index,
                name: section.name.clone(),
                size: section.len(),
                scores,
            });
        }

        Ok(Self {
            sections,
            overall_score: scoring::partition_score(partition, roster, weights, profile)?,
            size_spread: partition.size_spread(),
            report: validate(partition, constraints),
        })
    }

    /// Number of violations at a given priority.
    pub fn violations_at(&self, priority: Priority) -> usize {
        self.report.violations_at(priority).count()
    }

    /// Whether every section's aggregate meets a minimum score and no
    /// required-priority constraint is violated.
    pub fn meets_threshold(&self, min_section_score: f64) -> bool {
        self.sections
            .iter()
            .all(|s| s.scores.aggregate >= min_section_score)
            && self.violations_at(Priority::Required) == 0
    }
}
