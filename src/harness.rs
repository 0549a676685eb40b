//! Suite driver - runs the scenario table in order and feeds the reporter

use std::io::Write;

use thiserror::Error;
use tracing::{info, info_span, trace};

use crate::clock::{Clock, MonotonicClock};
use crate::report::{ReportError, Reporter, Summary};
use crate::runner::{RunnerSettings, ScenarioRunner};
use crate::scenario::{default_suite, Scenario, ScenarioError};
use crate::subject::Subject;
use crate::threshold::ThresholdPolicy;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid scenario table: {0}")]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

pub struct HarnessBuilder<C: Clock> {
    clock: C,
    settings: RunnerSettings,
    scenarios: Vec<Scenario>,
    policy: ThresholdPolicy,
}

impl<C: Clock> HarnessBuilder<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            settings: RunnerSettings::default(),
            scenarios: Vec::new(),
            policy: ThresholdPolicy::new(),
        }
    }

    pub fn with_settings(mut self, settings: RunnerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Harness<C> {
        Harness {
            runner: ScenarioRunner::new(self.clock, self.settings),
            scenarios: self.scenarios,
            policy: self.policy,
        }
    }
}

pub struct Harness<C: Clock> {
    runner: ScenarioRunner<C>,
    scenarios: Vec<Scenario>,
    policy: ThresholdPolicy,
}

impl Harness<MonotonicClock> {
    /// The compiled-in suite and budgets against the wall clock.
    pub fn standard() -> Self {
        HarnessBuilder::new(MonotonicClock)
            .with_scenarios(default_suite())
            .with_policy(ThresholdPolicy::default_targets())
            .build()
    }
}

impl<C: Clock> Harness<C> {
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    pub fn runner(&self) -> &ScenarioRunner<C> {
        &self.runner
    }

    /// Run every scenario in definition order against `S`.
    ///
    /// The table is validated before anything is printed. Subject failures
    /// become failed rows; only reporter failures abort the run.
    pub fn run<S: Subject, W: Write>(
        &self,
        reporter: &mut Reporter<W>,
    ) -> Result<Summary, HarnessError> {
        for scenario in &self.scenarios {
            scenario.validate()?;
        }

        info!(scenarios = self.scenarios.len(), "benchmark suite starting");
        reporter.begin()?;
        for scenario in &self.scenarios {
            let span = info_span!("scenario", name = %scenario.name, kind = %scenario.kind);
            let _guard = span.enter();

            trace!("measuring");
            let outcome = self.runner.execute::<S>(scenario);
            trace!("evaluating");
            let result = self.policy.judge(outcome);
            reporter.record(result)?;
            trace!("reported");
        }
        let summary = reporter.finish()?;
        info!(
            passed = summary.passed,
            total = summary.total,
            regressions = summary.regressions,
            "benchmark suite finished"
        );
        Ok(summary)
    }
}
