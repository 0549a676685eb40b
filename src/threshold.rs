//! Time budgets keyed by scenario kind and scale

use std::collections::HashMap;

use serde::Serialize;

use crate::clock::Elapsed;
use crate::runner::{Measurement, RunOutcome};
use crate::scenario::ScenarioKind;

pub const NO_TARGET_NOTE: &str = "no explicit target";

#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub note: String,
    /// `None` when the scenario has no budget.
    pub limit: Option<Elapsed>,
}

/// Outcome of one scenario after evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub measurement: Measurement,
    pub passed: bool,
    pub note: String,
    pub limit: Option<Elapsed>,
}

impl BenchmarkResult {
    pub fn name(&self) -> &str {
        &self.measurement.scenario.name
    }

    /// Only results with a budget count towards the overall verdict.
    pub fn is_thresholded(&self) -> bool {
        self.limit.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThresholdPolicy {
    limits: HashMap<(ScenarioKind, u64), Elapsed>,
}

impl ThresholdPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Budgets the standard suite is held to.
    pub fn default_targets() -> Self {
        Self::new()
            .with_limit(ScenarioKind::TieredBatch, 1_000_000, Elapsed::from_millis(20.0))
            .with_limit(ScenarioKind::BulkBatch, 100_000, Elapsed::from_millis(20.0))
    }

    pub fn with_limit(mut self, kind: ScenarioKind, scale: u64, limit: Elapsed) -> Self {
        self.set_limit(kind, scale, limit);
        self
    }

    pub fn set_limit(&mut self, kind: ScenarioKind, scale: u64, limit: Elapsed) {
        self.limits.insert((kind, scale), limit);
    }

    pub fn limit(&self, kind: ScenarioKind, scale: u64) -> Option<Elapsed> {
        self.limits.get(&(kind, scale)).copied()
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// Exact `(kind, scale)` lookup. Landing exactly on the limit passes.
    pub fn evaluate(&self, kind: ScenarioKind, scale: u64, total: Elapsed) -> Verdict {
        match self.limit(kind, scale) {
            None => Verdict {
                passed: true,
                note: NO_TARGET_NOTE.to_string(),
                limit: None,
            },
            Some(limit) => {
                let passed = total <= limit;
                let note = if passed {
                    format!("within {limit} target")
                } else {
                    format!("exceeds {limit} target")
                };
                Verdict {
                    passed,
                    note,
                    limit: Some(limit),
                }
            }
        }
    }

    /// Turn a runner outcome into a result. A construction failure is
    /// always a failed result, carrying the error as its note.
    pub fn judge(&self, outcome: RunOutcome) -> BenchmarkResult {
        match outcome {
            RunOutcome::Completed(measurement) => {
                let scenario = &measurement.scenario;
                let verdict = self.evaluate(scenario.kind, scenario.scale, measurement.total);
                BenchmarkResult {
                    measurement,
                    passed: verdict.passed,
                    note: verdict.note,
                    limit: verdict.limit,
                }
            }
            RunOutcome::ConstructionFailed { measurement, error } => {
                let scenario = &measurement.scenario;
                let limit = self.limit(scenario.kind, scenario.scale);
                BenchmarkResult {
                    measurement,
                    passed: false,
                    note: error.to_string(),
                    limit,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use crate::subject::SubjectError;

    #[test]
    fn test_unmatched_entry_always_passes() {
        let policy = ThresholdPolicy::new().with_limit(
            ScenarioKind::BulkBatch,
            1_000,
            Elapsed::from_millis(1.0),
        );

        let verdict = policy.evaluate(ScenarioKind::BulkBatch, 2_000, Elapsed::from_millis(1e6));
        assert!(verdict.passed);
        assert_eq!(verdict.note, NO_TARGET_NOTE);
        assert_eq!(verdict.limit, None);

        let verdict = policy.evaluate(ScenarioKind::TieredBatch, 1_000, Elapsed::from_millis(1e6));
        assert!(verdict.passed);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let limit_ns = 5_000_000;
        let policy = ThresholdPolicy::new().with_limit(
            ScenarioKind::BulkBatch,
            1_000,
            Elapsed::from_nanos(limit_ns),
        );

        let at = policy.evaluate(ScenarioKind::BulkBatch, 1_000, Elapsed::from_nanos(limit_ns));
        assert!(at.passed);

        let over = policy.evaluate(
            ScenarioKind::BulkBatch,
            1_000,
            Elapsed::from_nanos(limit_ns + 1),
        );
        assert!(!over.passed);
        assert_eq!(over.limit, Some(Elapsed::from_millis(5.0)));
    }

    #[test]
    fn test_default_targets() {
        let policy = ThresholdPolicy::default_targets();
        assert_eq!(policy.len(), 2);
        assert_eq!(
            policy.limit(ScenarioKind::TieredBatch, 1_000_000),
            Some(Elapsed::from_millis(20.0))
        );
        assert_eq!(policy.limit(ScenarioKind::SingleRepeated, 1), None);
    }

    #[test]
    fn test_construction_failure_is_failed_result() {
        let scenario = Scenario::new("bulk_1k", ScenarioKind::BulkBatch, 1_000);
        let policy = ThresholdPolicy::new().with_limit(
            ScenarioKind::BulkBatch,
            1_000,
            Elapsed::from_millis(5.0),
        );
        let result = policy.judge(RunOutcome::ConstructionFailed {
            measurement: Measurement::unmeasured(&scenario),
            error: SubjectError::Allocation("arena exhausted".into()),
        });

        assert!(!result.passed);
        assert!(result.is_thresholded());
        assert_eq!(result.note, "allocation failed: arena exhausted");
        assert_eq!(result.measurement.total, Elapsed::ZERO);
        assert_eq!(result.measurement.operation_count, 1_000);
    }
}
