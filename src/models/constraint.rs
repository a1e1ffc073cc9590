//! Placement constraints.
//!
//! Defines the rules that restrict legal student-to-section assignments:
//! keep-together, keep-apart, teacher affinity, size equality, and advisory
//! balance requests. Constraints are created by administrators before a
//! run and are read-only inputs to every component; they outlive any
//! single partition.

use serde::{Deserialize, Serialize};

use super::BalanceFactor;

/// How strongly a constraint should be honored.
///
/// The shipped search treats every priority as hard (any violation rejects
/// a candidate swap); the priority still matters for reporting and for
/// alternative acceptance policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Required,
    High,
    Medium,
    Low,
}

/// A placement rule restricting legal assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// All listed students must share one section.
    KeepTogether { students: Vec<String> },

    /// No two listed students may share a section.
    KeepApart { students: Vec<String> },

    /// The student's section must be the one led by the given teacher.
    PreferredTeacher { student: String, teacher: String },

    /// The student's section must NOT be the one led by the given teacher.
    AvoidTeacher { student: String, teacher: String },

    /// Advisory request to balance one factor across sections. Balance
    /// quality is captured by the aggregate score rather than a pass/fail
    /// check, so the validator treats this kind as always satisfied.
    BalancedDistribution { factor: BalanceFactor },

    /// Section sizes may differ by at most the size tolerance.
    EqualClassSize,
}

/// An administrator-defined placement constraint: a rule plus priority and
/// an optional human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// The rule itself.
    pub kind: ConstraintKind,
    /// How strongly to honor the rule.
    pub priority: Priority,
    /// Why this constraint exists ("parents requested...", ...).
    pub reason: Option<String>,
}

impl Constraint {
    fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            priority: Priority::Required,
            reason: None,
        }
    }

    /// Creates a keep-together constraint over two or more students.
    pub fn keep_together<I, S>(students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ConstraintKind::KeepTogether {
            students: students.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a keep-apart constraint over two or more students.
    pub fn keep_apart<I, S>(students: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ConstraintKind::KeepApart {
            students: students.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates a preferred-teacher constraint.
    pub fn preferred_teacher(student: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self::new(ConstraintKind::PreferredTeacher {
            student: student.into(),
            teacher: teacher.into(),
        })
    }

    /// Creates an avoid-teacher constraint.
    pub fn avoid_teacher(student: impl Into<String>, teacher: impl Into<String>) -> Self {
        Self::new(ConstraintKind::AvoidTeacher {
            student: student.into(),
            teacher: teacher.into(),
        })
    }

    /// Creates an advisory balanced-distribution constraint.
    pub fn balanced_distribution(factor: BalanceFactor) -> Self {
        Self::new(ConstraintKind::BalancedDistribution { factor })
    }

    /// Creates an equal-class-size constraint.
    pub fn equal_class_size() -> Self {
        Self::new(ConstraintKind::EqualClassSize)
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the human-readable reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Short kind label for reports and log lines.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ConstraintKind::KeepTogether { .. } => "keep-together",
            ConstraintKind::KeepApart { .. } => "keep-apart",
            ConstraintKind::PreferredTeacher { .. } => "preferred-teacher",
            ConstraintKind::AvoidTeacher { .. } => "avoid-teacher",
            ConstraintKind::BalancedDistribution { .. } => "balanced-distribution",
            ConstraintKind::EqualClassSize => "equal-class-size",
        }
    }
}
