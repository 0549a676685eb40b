use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Execution pattern of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Construct and destruct one instance at a time.
    SingleRepeated,
    /// Construct every instance into one collection, then release it.
    BulkBatch,
    /// Bulk batches of bounded size, summed.
    TieredBatch,
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScenarioKind::SingleRepeated => "single_repeated",
            ScenarioKind::BulkBatch => "bulk_batch",
            ScenarioKind::TieredBatch => "tiered_batch",
        };
        f.pad(label)
    }
}

/// Where each instance lives while the scenario holds it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Stored by value in the owning collection.
    #[default]
    Inline,
    /// One heap allocation per instance.
    Boxed,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Placement::Inline => "inline",
            Placement::Boxed => "boxed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub kind: ScenarioKind,
    pub scale: u64,
    pub placement: Placement,
    /// Repetitions; the reported duration is the mean across them.
    pub runs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario must define a name")]
    MissingName,
    #[error("scenario '{0}' must have a scale greater than zero")]
    ZeroScale(String),
    #[error("scenario '{0}' must run at least once")]
    ZeroRuns(String),
}

impl Scenario {
    pub fn new(name: impl Into<String>, kind: ScenarioKind, scale: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            scale,
            placement: Placement::Inline,
            runs: 1,
        }
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn boxed(mut self) -> Self {
        self.placement = Placement::Boxed;
        self
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::MissingName);
        }
        if self.scale == 0 {
            return Err(ScenarioError::ZeroScale(self.name.clone()));
        }
        if self.runs == 0 {
            return Err(ScenarioError::ZeroRuns(self.name.clone()));
        }
        Ok(())
    }
}

/// The compiled-in test plan, in reporting order.
pub fn default_suite() -> Vec<Scenario> {
    use ScenarioKind::*;

    vec![
        Scenario::new("world_ctor_dtor", SingleRepeated, 1).with_runs(5),
        Scenario::new("world_ctor_dtor_heap", SingleRepeated, 1)
            .boxed()
            .with_runs(5),
        Scenario::new("single_1k", SingleRepeated, 1_000).with_runs(3),
        Scenario::new("single_100k", SingleRepeated, 100_000).with_runs(3),
        Scenario::new("bulk_1k", BulkBatch, 1_000).with_runs(3),
        Scenario::new("bulk_10k", BulkBatch, 10_000).with_runs(3),
        Scenario::new("bulk_heap_1k", BulkBatch, 1_000).boxed().with_runs(3),
        Scenario::new("bulk_heap_10k", BulkBatch, 10_000).boxed().with_runs(3),
        Scenario::new("bulk_heap_100k", BulkBatch, 100_000).boxed().with_runs(3),
        Scenario::new("tiered_heap_1m", TieredBatch, 1_000_000).boxed(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suite_is_valid() {
        let suite = default_suite();
        assert_eq!(suite.len(), 10);
        for scenario in &suite {
            scenario.validate().unwrap();
        }
        assert_eq!(suite.last().map(|s| s.kind), Some(ScenarioKind::TieredBatch));
    }

    #[test]
    fn test_default_suite_names_are_unique() {
        let suite = default_suite();
        let mut names: Vec<&str> = suite.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), suite.len());
    }

    #[test]
    fn test_default_suite_covers_heap_placement() {
        let suite = default_suite();
        for kind in [
            ScenarioKind::SingleRepeated,
            ScenarioKind::BulkBatch,
            ScenarioKind::TieredBatch,
        ] {
            assert!(
                suite
                    .iter()
                    .any(|s| s.kind == kind && s.placement == Placement::Boxed),
                "no boxed {kind} scenario"
            );
        }
        let heap_ctor = suite
            .iter()
            .find(|s| s.name == "world_ctor_dtor_heap")
            .unwrap();
        assert_eq!(heap_ctor.scale, 1);
        assert_eq!(heap_ctor.runs, 5);
    }

    #[test]
    fn test_validation_rejects_degenerate_scenarios() {
        let zero_scale = Scenario::new("empty", ScenarioKind::BulkBatch, 0);
        assert_eq!(
            zero_scale.validate(),
            Err(ScenarioError::ZeroScale("empty".into()))
        );

        let zero_runs = Scenario::new("never", ScenarioKind::BulkBatch, 10).with_runs(0);
        assert_eq!(
            zero_runs.validate(),
            Err(ScenarioError::ZeroRuns("never".into()))
        );

        let unnamed = Scenario::new("  ", ScenarioKind::SingleRepeated, 10);
        assert_eq!(unnamed.validate(), Err(ScenarioError::MissingName));
    }

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ScenarioKind::TieredBatch).unwrap();
        assert_eq!(json, "\"tiered_batch\"");
        assert_eq!(ScenarioKind::BulkBatch.to_string(), "bulk_batch");
    }

    #[test]
    fn test_new_scenarios_run_once_inline() {
        let scenario = Scenario::new("bulk_1k", ScenarioKind::BulkBatch, 1_000);
        assert_eq!(scenario.runs, 1);
        assert_eq!(scenario.placement, Placement::Inline);
        assert_eq!(scenario.boxed().placement, Placement::Boxed);
    }
}
