//! Balance metric functions.
//!
//! Four pure sub-scores on the 0-100 scale plus their weighted aggregate.
//! An empty section scores 100 on every factor: a section with nobody in
//! it is vacuously balanced, by policy rather than accident.

use serde::{Deserialize, Serialize};

use crate::models::{
    AcademicLevel, BalanceFactor, BehavioralLevel, Gender, Partition, Roster, Section, Student,
    WeightSet,
};
use crate::RosterError;

use super::ScoringProfile;

/// The four sub-scores and weighted aggregate for one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub gender: f64,
    pub academic: f64,
    pub behavioral: f64,
    pub special_needs: f64,
    /// Weighted mean of the four sub-scores.
    pub aggregate: f64,
}

impl SectionScores {
    /// The sub-score for a factor.
    pub fn get(&self, factor: BalanceFactor) -> f64 {
        match factor {
            BalanceFactor::Gender => self.gender,
            BalanceFactor::Academic => self.academic,
            BalanceFactor::Behavioral => self.behavioral,
            BalanceFactor::SpecialNeeds => self.special_needs,
        }
    }
}

/// Gender balance: `min(male, female) / max(male, female) × 100`.
///
/// An empty section scores 100; a non-empty single-gender section scores 0.
pub fn gender_balance(students: &[&Student]) -> f64 {
    if students.is_empty() {
        return 100.0;
    }
    let male = students.iter().filter(|s| s.gender == Gender::Male).count();
    let female = students.len() - male;
    let (min, max) = (male.min(female), male.max(female));
    min as f64 / max as f64 * 100.0
}

/// Academic balance: 100 × (1 − normalized L1 deviation of the observed
/// bucket proportions from `ideal`), floored at 0.
pub fn academic_balance(students: &[&Student], ideal: &[f64; AcademicLevel::COUNT]) -> f64 {
    if students.is_empty() {
        return 100.0;
    }
    let mut counts = [0usize; AcademicLevel::COUNT];
    for s in students {
        counts[s.academic_level.bucket()] += 1;
    }
    let total = students.len() as f64;
    let deviation: f64 = counts
        .iter()
        .zip(ideal)
        .map(|(&count, &target)| (count as f64 / total - target).abs())
        .sum();
    // L1 distance between two distributions is at most 2.
    (100.0 * (1.0 - deviation / 2.0)).max(0.0)
}

/// Behavioral balance: deviation-from-ideal over three buckets with
/// per-bucket weights, so a pile-up of high-needs students costs more than
/// the same pile-up of low-needs students. Floored at 0.
pub fn behavioral_balance(
    students: &[&Student],
    ideal: &[f64; BehavioralLevel::COUNT],
    weights: &[f64; BehavioralLevel::COUNT],
) -> f64 {
    if students.is_empty() {
        return 100.0;
    }
    let mut counts = [0usize; BehavioralLevel::COUNT];
    for s in students {
        counts[s.behavioral_level.bucket()] += 1;
    }
    let total = students.len() as f64;
    let deviation: f64 = counts
        .iter()
        .zip(ideal.iter().zip(weights))
        .map(|(&count, (&target, &weight))| weight * (count as f64 / total - target).abs())
        .sum();
    (100.0 * (1.0 - deviation / 2.0)).max(0.0)
}

/// Special-needs density: 100 inside the target window; below it the score
/// decays linearly toward 50 at proportion 0; above it the score decays to
/// 0 over `over_span` — the steeper side, since over-concentration harms
/// more than under-concentration.
pub fn special_needs_density(students: &[&Student], window: (f64, f64), over_span: f64) -> f64 {
    if students.is_empty() {
        return 100.0;
    }
    let (low, high) = window;
    let proportion =
        students.iter().filter(|s| s.special_needs).count() as f64 / students.len() as f64;

    if proportion >= low && proportion <= high {
        100.0
    } else if proportion < low {
        if low == 0.0 {
            100.0
        } else {
            50.0 + 50.0 * (proportion / low)
        }
    } else {
        (100.0 * (1.0 - (proportion - high) / over_span)).max(0.0)
    }
}

/// Computes all sub-scores and the weighted aggregate for one section.
///
/// # Errors
/// [`RosterError::InvalidWeights`] for a degenerate weight set (checked
/// before anything is scored, so the aggregate never divides by zero);
/// [`RosterError::UnknownStudent`] if the section references an ID the
/// roster does not hold.
pub fn section_scores(
    section: &Section,
    roster: &Roster,
    weights: &WeightSet,
    profile: &ScoringProfile,
) -> Result<SectionScores, RosterError> {
    weights.validate()?;
    let students = resolve(section.student_ids(), roster)?;
    Ok(score_students(&students, weights, profile))
}

/// Whole-partition score: the arithmetic mean of per-section aggregates
/// minus `size_penalty_per_student × size_spread`.
///
/// Not bounded to 0-100 — the size penalty can push it below any
/// per-section floor, so callers must not assume a fixed range when
/// comparing runs.
pub fn partition_score(
    partition: &Partition,
    roster: &Roster,
    weights: &WeightSet,
    profile: &ScoringProfile,
) -> Result<f64, RosterError> {
    weights.validate()?;
    if partition.section_count() == 0 {
        return Ok(0.0);
    }
    let mut sum = 0.0;
    for section in partition.sections() {
        let students = resolve(section.student_ids(), roster)?;
        sum += score_students(&students, weights, profile).aggregate;
    }
    let mean = sum / partition.section_count() as f64;
    Ok(mean - profile.size_penalty_per_student * partition.size_spread() as f64)
}

pub(crate) fn score_students(
    students: &[&Student],
    weights: &WeightSet,
    profile: &ScoringProfile,
) -> SectionScores {
    let gender = gender_balance(students);
    let academic = academic_balance(students, &profile.academic_ideal);
    let behavioral = behavioral_balance(
        students,
        &profile.behavioral_ideal,
        &profile.behavioral_weights,
    );
    let special_needs = special_needs_density(
        students,
        profile.special_needs_window,
        profile.over_density_span,
    );

    let aggregate = (gender * weights.gender
        + academic * weights.academic
        + behavioral * weights.behavioral
        + special_needs * weights.special_needs)
        / weights.total();

    SectionScores {
        gender,
        academic,
        behavioral,
        special_needs,
        aggregate,
    }
}

pub(crate) fn resolve<'a>(
    ids: &[String],
    roster: &'a Roster,
) -> Result<Vec<&'a Student>, RosterError> {
    ids.iter()
        .map(|id| {
            roster
                .get(id)
                .ok_or_else(|| RosterError::UnknownStudent(id.clone()))
        })
        .collect()
}
