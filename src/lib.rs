//! Classroom roster balancing framework.
//!
//! Assigns students to a fixed number of classroom sections so that
//! competing fairness objectives — gender mix, academic-level mix,
//! behavioral-need mix, and special-needs density — stay balanced across
//! sections, while honoring administrator-, teacher-, and parent-supplied
//! placement constraints (keep-together, keep-apart, teacher affinity,
//! size equality).
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Student`, `Roster`, `Section`,
//!   `Partition`, `Constraint`, `WeightSet`
//! - **`scoring`**: Pure balance metrics and the tunable `ScoringProfile`
//! - **`validation`**: Constraint validator (violations as values)
//! - **`distributor`**: Constraint-aware first-fit-decreasing placement
//! - **`optimizer`**: Pairwise-swap local search with a pluggable
//!   acceptance policy
//! - **`preview`**: Delta-impact evaluation for single-student moves
//! - **`report`**: Partition quality summary
//!
//! # Pipeline
//!
//! `distribute` → `optimize` → optional manual adjustment through
//! `preview_move` → `PartitionSummary` for review. The [`Balancer`] facade
//! runs the first two stages and always returns the final validation
//! report alongside the partition: constraint conflicts are reported, not
//! thrown, because real constraint sets are routinely over-subscribed and
//! an administrator needs to see the trade-offs.
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Aarts & Lenstra (1997), "Local Search in Combinatorial Optimization"

pub mod distributor;
pub mod models;
pub mod optimizer;
pub mod preview;
pub mod report;
pub mod scoring;
pub mod validation;

pub use distributor::{
    distribute, DistributionOutcome, DistributionWarning, DistributionWarningKind,
};
pub use models::{
    AcademicLevel, BalanceFactor, BehavioralLevel, Constraint, ConstraintKind, Gender, Partition,
    Priority, Roster, Section, Student, WeightSet,
};
pub use optimizer::{
    AcceptancePolicy, HardConstraintFilter, OptimizationOutcome, Optimizer, OptimizerConfig,
};
pub use preview::{preview_move, MovePreview, SectionDelta};
pub use report::PartitionSummary;
pub use scoring::{ScoringProfile, SectionScores};
pub use validation::{validate, ValidationReport, Violation};

/// Structural input errors.
///
/// Constraint conflicts are deliberately NOT here: they surface as
/// [`Violation`] values from the validator so callers can inspect and
/// decide on trade-offs instead of losing the whole run.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// A negative weight, or every weight zero.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// Distribution requested into zero sections.
    #[error("section count must be at least 1")]
    InvalidSectionCount,

    /// An ID with no matching student in the roster.
    #[error("unknown student '{0}'")]
    UnknownStudent(String),

    /// Two roster students share an ID.
    #[error("duplicate student ID '{0}'")]
    DuplicateStudent(String),

    /// A section index past the end of the partition.
    #[error("section index {index} out of range ({count} sections)")]
    SectionOutOfRange { index: usize, count: usize },

    /// A move named a source section that does not hold the student.
    #[error("student '{student}' is not in section {section}")]
    StudentNotInSection { student: String, section: usize },

    /// A move that cannot be expressed (e.g. source equals target).
    #[error("invalid move: {0}")]
    InvalidMove(String),
}

/// One-call entry point: distribute, optimize, validate.
///
/// # Example
///
/// ```
/// use u_roster::{Balancer, Constraint, Gender, Roster, Student};
///
/// let roster = Roster::from_students(vec![
///     Student::new("S1", Gender::Male),
///     Student::new("S2", Gender::Female),
///     Student::new("S3", Gender::Male),
///     Student::new("S4", Gender::Female),
/// ]).unwrap();
/// let constraints = [Constraint::keep_together(["S1", "S2"])];
///
/// let plan = Balancer::new().plan(&roster, &constraints, 2).unwrap();
/// assert!(plan.partition.is_consistent_with(&roster));
/// assert!(plan.report.satisfied);
/// ```
#[derive(Debug, Default)]
pub struct Balancer {
    weights: WeightSet,
    profile: ScoringProfile,
    config: OptimizerConfig,
}

/// Everything a run produces, bundled for review and persistence.
#[derive(Debug, Clone)]
pub struct BalancePlan {
    /// The final partition.
    pub partition: Partition,
    /// Achieved whole-partition score.
    pub score: f64,
    /// Optimizer scans performed.
    pub iterations: usize,
    /// Swaps the optimizer committed.
    pub accepted_swaps: usize,
    /// Validation of the final partition. Always present: the surrounding
    /// application must be able to show post-run violations.
    pub report: ValidationReport,
    /// Warnings from the distribution phase.
    pub warnings: Vec<DistributionWarning>,
}

impl Balancer {
    /// Creates a balancer with default weights, profile, and search budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance-factor weights.
    pub fn with_weights(mut self, weights: WeightSet) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the scoring profile.
    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the optimizer configuration.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the full pipeline on a roster.
    ///
    /// # Errors
    /// Fails fast on degenerate weights (before any section is built) and
    /// on a zero section count. Constraint conflicts end up in the
    /// returned report, never in an error.
    pub fn plan(
        &self,
        roster: &Roster,
        constraints: &[Constraint],
        section_count: usize,
    ) -> Result<BalancePlan, RosterError> {
        self.weights.validate()?;

        let distribution = distribute(roster, constraints, section_count)?;
        let outcome = Optimizer::new()
            .with_config(self.config)
            .with_profile(self.profile.clone())
            .optimize(distribution.partition, roster, &self.weights, constraints)?;
        let report = validate(&outcome.partition, constraints);

        Ok(BalancePlan {
            partition: outcome.partition,
            score: outcome.score,
            iterations: outcome.iterations,
            accepted_swaps: outcome.accepted_swaps,
            report,
            warnings: distribution.warnings,
        })
    }

    /// Previews a single-student move with this balancer's weights and
    /// profile. Used for manual adjustment and for scoring externally
    /// suggested moves — suggestions go through the same validation as
    /// everything else.
    pub fn preview(
        &self,
        partition: &Partition,
        roster: &Roster,
        student: &str,
        from: usize,
        to: usize,
        constraints: &[Constraint],
    ) -> Result<MovePreview, RosterError> {
        preview_move(
            partition,
            roster,
            student,
            from,
            to,
            &self.weights,
            &self.profile,
            constraints,
        )
    }

    /// Summarizes a partition with this balancer's weights and profile.
    pub fn summarize(
        &self,
        partition: &Partition,
        roster: &Roster,
        constraints: &[Constraint],
    ) -> Result<PartitionSummary, RosterError> {
        PartitionSummary::calculate(partition, roster, &self.weights, &self.profile, constraints)
    }
}
