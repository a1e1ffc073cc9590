//! Section (classroom) model.
//!
//! A section is one classroom within a partition: a set of student IDs,
//! an optional assigned teacher, and a cached balance score. The cache is
//! derived state: any structural mutation invalidates it, and reads
//! recompute only when stale.

use serde::{Deserialize, Serialize};

use crate::models::{Roster, WeightSet};
use crate::scoring::{self, ScoringProfile, SectionScores};
use crate::RosterError;

/// One classroom section within a partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    /// Human-readable section name (e.g. "3-A").
    pub name: String,
    /// Assigned teacher ID, if any. Teacher assignment is a downstream
    /// concern; the balance metrics never read it, only the
    /// teacher-affinity constraints do.
    pub teacher: Option<String>,
    students: Vec<String>,
    /// Cached balance scores. `None` means stale.
    #[serde(skip)]
    cache: Option<SectionScores>,
}

impl Section {
    /// Creates an empty, unnamed section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the section name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the assigned teacher.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    /// Assigns or clears the teacher.
    pub fn set_teacher(&mut self, teacher: Option<String>) {
        self.teacher = teacher;
    }

    /// Adds a student to this section.
    pub fn add_student(&mut self, id: impl Into<String>) {
        self.students.push(id.into());
        self.cache = None;
    }

    /// Removes a student by ID. Returns `true` if the student was present.
    pub fn remove_student(&mut self, id: &str) -> bool {
        match self.students.iter().position(|s| s == id) {
            Some(pos) => {
                self.students.remove(pos);
                self.cache = None;
                true
            }
            None => false,
        }
    }

    /// Replaces the student at a membership position, returning the
    /// previous occupant. Used by the partition swap primitive.
    pub(crate) fn replace_at(&mut self, pos: usize, id: String) -> String {
        let old = std::mem::replace(&mut self.students[pos], id);
        self.cache = None;
        old
    }

    /// Whether the section contains the given student.
    pub fn contains(&self, id: &str) -> bool {
        self.students.iter().any(|s| s == id)
    }

    /// Student IDs in membership order.
    pub fn student_ids(&self) -> &[String] {
        &self.students
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the section has no students.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Returns the balance scores, recomputing them only if a structural
    /// mutation occurred since the last computation.
    ///
    /// # Errors
    /// Propagates [`RosterError::InvalidWeights`] and
    /// [`RosterError::UnknownStudent`] from the scoring layer.
    pub fn balance(
        &mut self,
        roster: &Roster,
        weights: &WeightSet,
        profile: &ScoringProfile,
    ) -> Result<SectionScores, RosterError> {
        if let Some(scores) = self.cache {
            return Ok(scores);
        }
        let scores = scoring::section_scores(self, roster, weights, profile)?;
        self.cache = Some(scores);
        Ok(scores)
    }

    /// The cached scores, if current. `None` after any mutation.
    pub fn cached_balance(&self) -> Option<SectionScores> {
        self.cache
    }
}
