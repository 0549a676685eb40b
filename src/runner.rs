//! Scenario runner - executes lifecycle operations under the clock

use std::hint::black_box;
use std::ops::{Add, Div};

use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::{Clock, Elapsed};
use crate::scenario::{Placement, Scenario, ScenarioKind};
use crate::subject::{Subject, SubjectError};

/// Instances live at once in one tier of a `TieredBatch` scenario.
pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    pub batch_size: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Construction and destruction measured separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub construct: Elapsed,
    pub destruct: Elapsed,
}

impl PhaseTimings {
    pub fn total(&self) -> Elapsed {
        self.construct + self.destruct
    }
}

impl Add for PhaseTimings {
    type Output = PhaseTimings;

    fn add(self, rhs: PhaseTimings) -> PhaseTimings {
        PhaseTimings {
            construct: self.construct + rhs.construct,
            destruct: self.destruct + rhs.destruct,
        }
    }
}

impl Div<u64> for PhaseTimings {
    type Output = PhaseTimings;

    fn div(self, count: u64) -> PhaseTimings {
        PhaseTimings {
            construct: self.construct / count,
            destruct: self.destruct / count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub scenario: Scenario,
    pub total: Elapsed,
    /// Always equal to the scenario scale.
    pub operation_count: u64,
    /// Present for the batched kinds.
    pub phases: Option<PhaseTimings>,
}

impl Measurement {
    /// A zero-duration measurement, recorded when the scenario could not run.
    pub fn unmeasured(scenario: &Scenario) -> Self {
        Self {
            scenario: scenario.clone(),
            total: Elapsed::ZERO,
            operation_count: scenario.scale,
            phases: None,
        }
    }

    pub fn average(&self) -> Elapsed {
        self.total / self.operation_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(Measurement),
    ConstructionFailed {
        measurement: Measurement,
        error: SubjectError,
    },
}

impl RunOutcome {
    pub fn measurement(&self) -> &Measurement {
        match self {
            RunOutcome::Completed(measurement) => measurement,
            RunOutcome::ConstructionFailed { measurement, .. } => measurement,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Result of one repetition of a scenario
struct Sample {
    total: Elapsed,
    phases: Option<PhaseTimings>,
}

impl From<PhaseTimings> for Sample {
    fn from(phases: PhaseTimings) -> Self {
        Sample {
            total: phases.total(),
            phases: Some(phases),
        }
    }
}

pub struct ScenarioRunner<C: Clock> {
    clock: C,
    settings: RunnerSettings,
}

impl<C: Clock> ScenarioRunner<C> {
    pub fn new(clock: C, settings: RunnerSettings) -> Self {
        Self { clock, settings }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn settings(&self) -> RunnerSettings {
        self.settings
    }

    /// Run every repetition of `scenario`. Subject failures are turned into
    /// [`RunOutcome::ConstructionFailed`] and never propagate further.
    pub fn execute<S: Subject>(&self, scenario: &Scenario) -> RunOutcome {
        let runs = u64::from(scenario.runs.max(1));
        let mut total = Elapsed::ZERO;
        let mut phases: Option<PhaseTimings> = None;

        for run in 0..runs {
            match self.execute_once::<S>(scenario) {
                Ok(sample) => {
                    total = total + sample.total;
                    phases = match (phases, sample.phases) {
                        (Some(acc), Some(next)) => Some(acc + next),
                        (None, next) => next,
                        (acc, None) => acc,
                    };
                }
                Err(error) => {
                    warn!(
                        scenario = %scenario.name,
                        run,
                        %error,
                        "subject construction failed; scenario recorded as unmeasured"
                    );
                    return RunOutcome::ConstructionFailed {
                        measurement: Measurement::unmeasured(scenario),
                        error,
                    };
                }
            }
        }

        let measurement = Measurement {
            scenario: scenario.clone(),
            total: total / runs,
            operation_count: scenario.scale,
            phases: phases.map(|p| p / runs),
        };
        debug!(
            scenario = %scenario.name,
            kind = %scenario.kind,
            placement = %scenario.placement,
            total_ms = measurement.total.as_millis(),
            runs,
            "scenario measured"
        );
        RunOutcome::Completed(measurement)
    }

    fn execute_once<S: Subject>(&self, scenario: &Scenario) -> Result<Sample, SubjectError> {
        match scenario.placement {
            Placement::Inline => self.execute_kind::<S>(scenario),
            Placement::Boxed => self.execute_kind::<Box<S>>(scenario),
        }
    }

    fn execute_kind<S: Subject>(&self, scenario: &Scenario) -> Result<Sample, SubjectError> {
        match scenario.kind {
            ScenarioKind::SingleRepeated => {
                let total = self.single_repeated::<S>(scenario.scale)?;
                Ok(Sample {
                    total,
                    phases: None,
                })
            }
            ScenarioKind::BulkBatch => self.bulk_batch::<S>(scenario.scale).map(Sample::from),
            ScenarioKind::TieredBatch => self.tiered_batch::<S>(scenario.scale).map(Sample::from),
        }
    }

    /// At most one live instance at any time.
    fn single_repeated<S: Subject>(&self, scale: u64) -> Result<Elapsed, SubjectError> {
        let start = self.clock.now();
        for _ in 0..scale {
            let instance = S::construct()?;
            drop(black_box(instance));
        }
        let end = self.clock.now();
        Ok(self.clock.elapsed(start, end))
    }

    fn bulk_batch<S: Subject>(&self, count: u64) -> Result<PhaseTimings, SubjectError> {
        let len = usize::try_from(count)
            .map_err(|_| SubjectError::Allocation(format!("{count} instances exceed usize")))?;
        let mut instances: Vec<S> = Vec::new();
        instances
            .try_reserve_exact(len)
            .map_err(|err| SubjectError::Allocation(err.to_string()))?;

        // On error the partially filled batch is released by the early
        // return, after the construction window has already been abandoned.
        let start = self.clock.now();
        for _ in 0..count {
            instances.push(S::construct()?);
        }
        let built = self.clock.now();
        drop(black_box(instances));
        let end = self.clock.now();

        Ok(PhaseTimings {
            construct: self.clock.elapsed(start, built),
            destruct: self.clock.elapsed(built, end),
        })
    }

    fn tiered_batch<S: Subject>(&self, scale: u64) -> Result<PhaseTimings, SubjectError> {
        let batch_size = self.settings.batch_size.max(1);
        let mut remaining = scale;
        let mut phases = PhaseTimings::default();
        while remaining > 0 {
            let batch = remaining.min(batch_size);
            phases = phases + self.bulk_batch::<S>(batch)?;
            remaining -= batch;
        }
        Ok(phases)
    }
}
