pub mod clock;
pub mod ecs;
pub mod harness;
pub mod logging;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod subject;
pub mod threshold;

pub use clock::{Clock, Elapsed, ManualClock, MonotonicClock};
pub use harness::{Harness, HarnessBuilder, HarnessError};
pub use report::{Reporter, Summary};
pub use runner::{Measurement, RunOutcome, RunnerSettings, ScenarioRunner};
pub use scenario::{Placement, Scenario, ScenarioKind};
pub use subject::{Subject, SubjectError};
pub use threshold::{BenchmarkResult, ThresholdPolicy};
