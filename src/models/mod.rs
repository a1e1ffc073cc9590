//! Roster balancing domain models.
//!
//! Provides the core data types for representing balancing problems and
//! solutions: the students being placed, the sections receiving them, the
//! partition tying the two together, and the constraints and weights that
//! shape what "good" means.

mod constraint;
mod partition;
mod roster;
mod section;
mod student;
mod weights;

pub use constraint::{Constraint, ConstraintKind, Priority};
pub use partition::Partition;
pub use roster::Roster;
pub use section::Section;
pub use student::{AcademicLevel, BehavioralLevel, Gender, Student};
pub use weights::{BalanceFactor, WeightSet};
