//! Partition (solution) model.
//!
//! A partition is the complete assignment of a roster to a fixed number of
//! sections: every student appears in exactly one section, and the section
//! count never changes during a run. The move and swap primitives here are
//! the only mutation paths used by the optimizer, the manual-adjustment
//! workflow, and externally suggested moves alike.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::RosterError;

use super::{Roster, Section};

/// A complete assignment of students to sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    sections: Vec<Section>,
}

impl Partition {
    /// Creates a partition of `section_count` empty sections.
    pub fn new(section_count: usize) -> Self {
        Self {
            sections: (0..section_count).map(|_| Section::new()).collect(),
        }
    }

    /// Creates a partition from prebuilt sections.
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// All sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// A section by index.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Mutable access to a section (e.g. for teacher assignment).
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of placed students.
    pub fn total_students(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Builds a student-id → section-index lookup in one O(n) pass.
    pub fn section_lookup(&self) -> HashMap<&str, usize> {
        let mut lookup = HashMap::with_capacity(self.total_students());
        for (index, section) in self.sections.iter().enumerate() {
            for id in section.student_ids() {
                lookup.insert(id.as_str(), index);
            }
        }
        lookup
    }

    /// The section index holding a student, if placed.
    pub fn section_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.contains(id))
    }

    /// Difference between the largest and smallest section size.
    pub fn size_spread(&self) -> usize {
        let sizes = self.sections.iter().map(Section::len);
        match (sizes.clone().max(), sizes.min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Moves a student from one section to another.
    ///
    /// # Errors
    /// Fails on out-of-range indices, `from == to`, or a student not
    /// actually placed in `from`. Constraint legality is NOT checked here;
    /// callers preview moves through the validator first.
    pub fn move_student(&mut self, id: &str, from: usize, to: usize) -> Result<(), RosterError> {
        let count = self.sections.len();
        for index in [from, to] {
            if index >= count {
                return Err(RosterError::SectionOutOfRange { index, count });
            }
        }
        if from == to {
            return Err(RosterError::InvalidMove(format!(
                "student '{id}' is already in section {from}"
            )));
        }
        if !self.sections[from].remove_student(id) {
            return Err(RosterError::StudentNotInSection {
                student: id.to_string(),
                section: from,
            });
        }
        self.sections[to].add_student(id);
        Ok(())
    }

    /// Swaps two students between their sections.
    ///
    /// # Errors
    /// Fails if either student is unplaced or both share a section.
    pub fn swap_students(&mut self, a: &str, b: &str) -> Result<(), RosterError> {
        let (sec_a, pos_a) = self
            .locate(a)
            .ok_or_else(|| RosterError::UnknownStudent(a.to_string()))?;
        let (sec_b, pos_b) = self
            .locate(b)
            .ok_or_else(|| RosterError::UnknownStudent(b.to_string()))?;
        if sec_a == sec_b {
            return Err(RosterError::InvalidMove(format!(
                "students '{a}' and '{b}' share section {sec_a}"
            )));
        }
        self.swap_at(sec_a, pos_a, sec_b, pos_b);
        Ok(())
    }

    /// Finds a student's (section, membership position).
    fn locate(&self, id: &str) -> Option<(usize, usize)> {
        for (index, section) in self.sections.iter().enumerate() {
            if let Some(pos) = section.student_ids().iter().position(|s| s == id) {
                return Some((index, pos));
            }
        }
        None
    }

    /// Swaps the students at two membership positions. Positions must be
    /// in-range and the sections distinct.
    pub(crate) fn swap_at(&mut self, sec_a: usize, pos_a: usize, sec_b: usize, pos_b: usize) {
        debug_assert_ne!(sec_a, sec_b);
        let a_id = self.sections[sec_a].student_ids()[pos_a].clone();
        let b_id = self.sections[sec_b].student_ids()[pos_b].clone();
        self.sections[sec_a].replace_at(pos_a, b_id);
        self.sections[sec_b].replace_at(pos_b, a_id);
    }

    /// Whether this partition places every roster student exactly once and
    /// nothing else: sections are pairwise disjoint, their union equals the
    /// roster, and no section holds a foreign ID.
    pub fn is_consistent_with(&self, roster: &Roster) -> bool {
        let mut seen = HashSet::with_capacity(roster.len());
        for section in &self.sections {
            for id in section.student_ids() {
                if !roster.contains(id) || !seen.insert(id.as_str()) {
                    return false;
                }
            }
        }
        seen.len() == roster.len()
    }
}
