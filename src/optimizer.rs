//! Pairwise-swap local search.
//!
//! Improves a partition by repeatedly swapping one student between two
//! sections. Each scan enumerates every unordered section pair and every
//! student pair across them in index order (runs are reproducible for
//! identical input order); a candidate swap is validated against the full
//! constraint list and scored by recomputing only the two touched
//! sections. The first admitted improvement is committed and the scan
//! restarts; a scan with no admitted swap means a local optimum and the
//! search stops. First-improvement favors throughput over per-scan
//! optimality — this is a heuristic for an interactive tool, not an exact
//! solver.
//!
//! The search never fails on an over-subscribed constraint set: it simply
//! admits fewer swaps, down to returning its input unchanged.
//!
//! # Reference
//! Aarts & Lenstra (1997), "Local Search in Combinatorial Optimization"

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Constraint, Partition, Roster, WeightSet};
use crate::scoring::{self, ScoringProfile};
use crate::validation::{validate, ValidationReport};
use crate::RosterError;

/// Decides whether a candidate partition may be committed.
///
/// The shipped policy filters every constraint as hard. Alternative
/// policies (e.g. admitting low-priority violations in exchange for large
/// balance gains) plug in here without touching the search loop.
pub trait AcceptancePolicy: std::fmt::Debug + Send + Sync {
    /// Policy name for logs and reports.
    fn name(&self) -> &'static str;

    /// Whether a candidate with the given validation report and
    /// aggregate-score delta may replace the current partition.
    fn admits(&self, report: &ValidationReport, score_delta: f64) -> bool;
}

/// Rejects any candidate with a violation, of any priority, and requires
/// a strictly better aggregate score.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardConstraintFilter;

impl AcceptancePolicy for HardConstraintFilter {
    fn name(&self) -> &'static str {
        "hard-constraint-filter"
    }

    fn admits(&self, report: &ValidationReport, score_delta: f64) -> bool {
        report.satisfied && score_delta > 0.0
    }
}

/// Search budget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum number of scans (each ends in one committed swap or in
    /// termination). The only stop mechanism besides reaching a local
    /// optimum — there is no wall-clock timeout.
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl OptimizerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of one optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// The improved partition (possibly identical to the input).
    pub partition: Partition,
    /// Achieved whole-partition score (mean section aggregate minus the
    /// size penalty; not bounded to 0-100).
    pub score: f64,
    /// Scans actually performed.
    pub iterations: usize,
    /// Swaps committed.
    pub accepted_swaps: usize,
}

/// The local-search optimizer.
#[derive(Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    profile: ScoringProfile,
    policy: Box<dyn AcceptancePolicy>,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    /// Creates an optimizer with the default configuration, scoring
    /// profile, and hard-filter acceptance policy.
    pub fn new() -> Self {
        Self {
            config: OptimizerConfig::default(),
            profile: ScoringProfile::default(),
            policy: Box::new(HardConstraintFilter),
        }
    }

    /// Sets the search budget.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the scoring profile.
    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the acceptance policy.
    pub fn with_policy(mut self, policy: Box<dyn AcceptancePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// The scoring profile in use.
    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Runs the search on a partition.
    ///
    /// # Errors
    /// Only structural input problems fail: a degenerate weight set or a
    /// section referencing a student missing from the roster. Constraint
    /// conflicts never fail a run.
    pub fn optimize(
        &self,
        partition: Partition,
        roster: &Roster,
        weights: &WeightSet,
        constraints: &[Constraint],
    ) -> Result<OptimizationOutcome, RosterError> {
        weights.validate()?;
        let mut partition = partition;
        let section_count = partition.section_count();

        let mut aggregates = Vec::with_capacity(section_count);
        for section in partition.sections() {
            aggregates.push(
                scoring::section_scores(section, roster, weights, &self.profile)?.aggregate,
            );
        }
        // Swaps preserve section sizes, so the penalty is constant for the
        // whole run.
        let penalty =
            self.profile.size_penalty_per_student * partition.size_spread() as f64;
        let mut score = whole_score(&aggregates, penalty);

        let mut iterations = 0;
        let mut accepted_swaps = 0;
        while iterations < self.config.max_iterations {
            iterations += 1;
            match self.first_improvement(
                &mut partition,
                roster,
                weights,
                constraints,
                &mut aggregates,
                penalty,
                score,
            )? {
                Some(new_score) => {
                    score = new_score;
                    accepted_swaps += 1;
                }
                None => break,
            }
        }

        // Refresh every section's cached balance for downstream readers.
        for index in 0..section_count {
            if let Some(section) = partition.section_mut(index) {
                section.balance(roster, weights, &self.profile)?;
            }
        }

        debug!(
            iterations,
            accepted_swaps,
            score,
            policy = self.policy.name(),
            "local search finished"
        );

        Ok(OptimizationOutcome {
            partition,
            score,
            iterations,
            accepted_swaps,
        })
    }

    /// Scans all section/student pairs in index order and commits the
    /// first admitted improving swap. Returns the new score, or `None`
    /// after an exhaustive scan without improvement (local optimum).
    #[allow(clippy::too_many_arguments)]
    fn first_improvement(
        &self,
        partition: &mut Partition,
        roster: &Roster,
        weights: &WeightSet,
        constraints: &[Constraint],
        aggregates: &mut [f64],
        penalty: f64,
        score: f64,
    ) -> Result<Option<f64>, RosterError> {
        let section_count = partition.section_count();
        for i in 0..section_count {
            for j in (i + 1)..section_count {
                let len_i = partition.sections()[i].len();
                let len_j = partition.sections()[j].len();
                for a in 0..len_i {
                    for b in 0..len_j {
                        partition.swap_at(i, a, j, b);
                        let report = validate(partition, constraints);
                        let new_i = scoring::section_scores(
                            &partition.sections()[i],
                            roster,
                            weights,
                            &self.profile,
                        )?
                        .aggregate;
                        let new_j = scoring::section_scores(
                            &partition.sections()[j],
                            roster,
                            weights,
                            &self.profile,
                        )?
                        .aggregate;

                        let mut candidate = aggregates.to_vec();
                        candidate[i] = new_i;
                        candidate[j] = new_j;
                        let candidate_score = whole_score(&candidate, penalty);

                        if self.policy.admits(&report, candidate_score - score) {
                            aggregates[i] = new_i;
                            aggregates[j] = new_j;
                            return Ok(Some(candidate_score));
                        }
                        // Not admitted: undo and keep scanning.
                        partition.swap_at(i, a, j, b);
                    }
                }
            }
        }
        Ok(None)
    }
}

fn whole_score(aggregates: &[f64], penalty: f64) -> f64 {
    if aggregates.is_empty() {
        return 0.0;
    }
    aggregates.iter().sum::<f64>() / aggregates.len() as f64 - penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributor::distribute;
    use crate::models::{AcademicLevel, BehavioralLevel, Gender, Student};
    use crate::scoring::partition_score;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn alternating_roster(n: usize) -> Roster {
        let students = (0..n)
            .map(|i| {
                let gender = if i % 2 == 0 { Gender::Male } else { Gender::Female };
                Student::new(format!("S{i}"), gender)
            })
            .collect();
        Roster::from_students(students).unwrap()
    }

    fn random_roster(n: usize, seed: u64) -> Roster {
        let mut rng = SmallRng::seed_from_u64(seed);
        let students = (0..n)
            .map(|i| {
                let gender = if rng.random_range(0..2) == 0 {
                    Gender::Male
                } else {
                    Gender::Female
                };
                let academic = match rng.random_range(0..4) {
                    0 => AcademicLevel::Advanced,
                    1 => AcademicLevel::Proficient,
                    2 => AcademicLevel::Developing,
                    _ => AcademicLevel::NeedsSupport,
                };
                let behavioral = match rng.random_range(0..3) {
                    0 => BehavioralLevel::Low,
                    1 => BehavioralLevel::Medium,
                    _ => BehavioralLevel::High,
                };
                let mut student = Student::new(format!("S{i}"), gender)
                    .with_academic(academic)
                    .with_behavioral(behavioral);
                if rng.random_range(0..100) < 15 {
                    student = student.with_special_needs();
                }
                student
            })
            .collect();
        Roster::from_students(students).unwrap()
    }

    #[test]
    fn test_finds_perfect_gender_mix() {
        // Alternating placement piles all boys into one section and all
        // girls into the other; two swaps reach a perfect mix.
        let roster = alternating_roster(8);
        let start = distribute(&roster, &[], 2).unwrap().partition;

        let outcome = Optimizer::new()
            .optimize(start, &roster, &WeightSet::default(), &[])
            .unwrap();

        for index in 0..2 {
            let scores = outcome.partition.sections()[index].cached_balance().unwrap();
            assert_eq!(scores.gender, 100.0, "section {index} not mixed");
        }
        assert!(outcome.accepted_swaps >= 2);
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_score_never_decreases() {
        let roster = random_roster(24, 7);
        let start = distribute(&roster, &[], 3).unwrap().partition;
        let weights = WeightSet::default();
        let profile = ScoringProfile::default();

        let initial = partition_score(&start, &roster, &weights, &profile).unwrap();
        let outcome = Optimizer::new()
            .optimize(start, &roster, &weights, &[])
            .unwrap();

        assert!(outcome.score >= initial);
        let recomputed =
            partition_score(&outcome.partition, &roster, &weights, &profile).unwrap();
        assert!((outcome.score - recomputed).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent_at_local_optimum() {
        let roster = random_roster(20, 11);
        let start = distribute(&roster, &[], 2).unwrap().partition;
        let weights = WeightSet::default();
        // Budget far above what convergence needs, so the first run is
        // guaranteed to stop at a local optimum rather than on the budget.
        let config = OptimizerConfig::new().with_max_iterations(1000);

        let first = Optimizer::new()
            .with_config(config)
            .optimize(start, &roster, &weights, &[])
            .unwrap();
        let second = Optimizer::new()
            .with_config(config)
            .optimize(first.partition.clone(), &roster, &weights, &[])
            .unwrap();

        assert_eq!(second.accepted_swaps, 0);
        assert_eq!(second.iterations, 1);
        for (left, right) in first
            .partition
            .sections()
            .iter()
            .zip(second.partition.sections())
        {
            assert_eq!(left.student_ids(), right.student_ids());
        }
    }

    #[test]
    fn test_constraints_filtered_hard_during_search() {
        let roster = alternating_roster(8);
        let constraints = [
            Constraint::keep_together(["S0", "S2"]),
            Constraint::keep_apart(["S1", "S3"]),
        ];
        let start = distribute(&roster, &constraints, 2).unwrap().partition;
        let before = validate(&start, &constraints);
        assert!(before.satisfied);

        let outcome = Optimizer::new()
            .optimize(start, &roster, &WeightSet::default(), &constraints)
            .unwrap();

        // No accepted swap may introduce a violation.
        let after = validate(&outcome.partition, &constraints);
        assert!(after.new_violations(&before).is_empty());
        assert_eq!(
            outcome.partition.section_of("S0"),
            outcome.partition.section_of("S2")
        );
        assert!(outcome.partition.is_consistent_with(&roster));
    }

    #[test]
    fn test_infeasible_set_returns_input_unchanged() {
        // Three mutually-separated students in two sections: every
        // candidate carries a violation, so the hard filter admits nothing.
        let roster = alternating_roster(6);
        let constraints = [Constraint::keep_apart(["S0", "S1", "S2"])];
        let start = distribute(&roster, &constraints, 2).unwrap().partition;
        let start_ids: Vec<Vec<String>> = start
            .sections()
            .iter()
            .map(|s| s.student_ids().to_vec())
            .collect();

        let outcome = Optimizer::new()
            .optimize(start, &roster, &WeightSet::default(), &constraints)
            .unwrap();

        assert_eq!(outcome.accepted_swaps, 0);
        for (section, ids) in outcome.partition.sections().iter().zip(&start_ids) {
            assert_eq!(section.student_ids(), ids.as_slice());
        }
    }

    #[test]
    fn test_iteration_budget_respected() {
        let roster = random_roster(30, 3);
        let start = distribute(&roster, &[], 3).unwrap().partition;
        let config = OptimizerConfig::new().with_max_iterations(2);

        let outcome = Optimizer::new()
            .with_config(config)
            .optimize(start, &roster, &WeightSet::default(), &[])
            .unwrap();

        assert!(outcome.iterations <= 2);
    }

    #[test]
    fn test_zero_weights_fail_before_search() {
        let roster = alternating_roster(4);
        let start = distribute(&roster, &[], 2).unwrap().partition;
        let zero = WeightSet::new()
            .with_gender(0.0)
            .with_academic(0.0)
            .with_behavioral(0.0)
            .with_special_needs(0.0);

        let result = Optimizer::new().optimize(start, &roster, &zero, &[]);
        assert!(matches!(result, Err(RosterError::InvalidWeights(_))));
    }

    #[test]
    fn test_custom_policy_plugs_in() {
        // A policy that ignores violations entirely: swaps are admitted on
        // score alone, so a keep-apart pair no longer blocks mixing.
        #[derive(Debug)]
        struct ScoreOnly;
        impl AcceptancePolicy for ScoreOnly {
            fn name(&self) -> &'static str {
                "score-only"
            }
            fn admits(&self, _report: &ValidationReport, score_delta: f64) -> bool {
                score_delta > 0.0
            }
        }

        let roster = alternating_roster(8);
        let start = distribute(&roster, &[], 2).unwrap().partition;
        let outcome = Optimizer::new()
            .with_policy(Box::new(ScoreOnly))
            .optimize(start, &roster, &WeightSet::default(), &[])
            .unwrap();

        assert!(outcome.partition.is_consistent_with(&roster));
        for section in outcome.partition.sections() {
            assert_eq!(section.cached_balance().unwrap().gender, 100.0);
        }
    }

    #[test]
    fn test_integrity_preserved_on_random_rosters() {
        for seed in [1, 2, 3] {
            let roster = random_roster(25, seed);
            let start = distribute(&roster, &[], 4).unwrap().partition;
            let outcome = Optimizer::new()
                .optimize(start, &roster, &WeightSet::default(), &[])
                .unwrap();
            assert!(outcome.partition.is_consistent_with(&roster));
        }
    }
}
