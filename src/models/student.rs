//! Student model.
//!
//! A student is the unit being placed: identity plus the attributes the
//! balance metrics read (gender, academic level, behavioral level, special
//! needs). Students are immutable for the duration of one balancing run;
//! the roster provider owns them, the optimizer references them by ID.

use serde::{Deserialize, Serialize};

/// Gender category used by the gender-balance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Academic performance level (ordinal, four buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcademicLevel {
    /// Performing above grade level.
    Advanced,
    /// Performing at grade level.
    Proficient,
    /// Approaching grade level.
    Developing,
    /// Requires additional academic support.
    NeedsSupport,
}

/// Behavioral support level (ordinal, three buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehavioralLevel {
    /// Rarely needs intervention.
    Low,
    /// Occasional intervention.
    Medium,
    /// Frequent, structured support.
    High,
}

impl AcademicLevel {
    /// Histogram bucket index (0 = Advanced .. 3 = NeedsSupport).
    #[inline]
    pub fn bucket(self) -> usize {
        match self {
            AcademicLevel::Advanced => 0,
            AcademicLevel::Proficient => 1,
            AcademicLevel::Developing => 2,
            AcademicLevel::NeedsSupport => 3,
        }
    }

    /// Number of academic buckets.
    pub const COUNT: usize = 4;
}

impl BehavioralLevel {
    /// Histogram bucket index (0 = Low .. 2 = High).
    #[inline]
    pub fn bucket(self) -> usize {
        match self {
            BehavioralLevel::Low => 0,
            BehavioralLevel::Medium => 1,
            BehavioralLevel::High => 2,
        }
    }

    /// Number of behavioral buckets.
    pub const COUNT: usize = 3;
}

/// A student to be placed into a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Gender category.
    pub gender: Gender,
    /// Academic performance level.
    pub academic_level: AcademicLevel,
    /// Behavioral support level.
    pub behavioral_level: BehavioralLevel,
    /// Whether the student has special needs.
    pub special_needs: bool,
    /// Optional description of the special need (IEP, 504 plan, ...).
    pub special_needs_detail: Option<String>,
}

impl Student {
    /// Creates a new student with default attribute levels
    /// (Proficient / Low, no special needs).
    pub fn new(id: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            gender,
            academic_level: AcademicLevel::Proficient,
            behavioral_level: BehavioralLevel::Low,
            special_needs: false,
            special_needs_detail: None,
        }
    }

    /// Sets the student name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the academic level.
    pub fn with_academic(mut self, level: AcademicLevel) -> Self {
        self.academic_level = level;
        self
    }

    /// Sets the behavioral level.
    pub fn with_behavioral(mut self, level: BehavioralLevel) -> Self {
        self.behavioral_level = level;
        self
    }

    /// Marks the student as having special needs.
    pub fn with_special_needs(mut self) -> Self {
        self.special_needs = true;
        self
    }

    /// Marks the student as having special needs with a detail note.
    pub fn with_special_needs_detail(mut self, detail: impl Into<String>) -> Self {
        self.special_needs = true;
        self.special_needs_detail = Some(detail.into());
        self
    }
}
