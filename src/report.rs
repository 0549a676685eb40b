//! Result table, summary and exit status

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::threshold::BenchmarkResult;

pub const EXIT_SUCCESS: u8 = 0;
/// At least one scenario with a target missed it.
pub const EXIT_REGRESSION: u8 = 1;
/// The harness itself failed; no partial report can be trusted.
pub const EXIT_HARNESS_ERROR: u8 = 2;

const TITLE: &str = "=== SimplyECS Benchmark Results ===";
const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    NotStarted,
    Running,
    Finished,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report output failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reporter is {actual:?}, expected {expected:?}")]
    State {
        expected: ReporterState,
        actual: ReporterState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub total: usize,
    /// Results that had an explicit target.
    pub thresholded: usize,
    /// Thresholded results that failed.
    pub regressions: usize,
    /// No thresholded result failed.
    pub all_passed: bool,
}

impl Summary {
    pub fn from_results(results: &[BenchmarkResult]) -> Self {
        let thresholded = results.iter().filter(|r| r.is_thresholded());
        let regressions = thresholded.clone().filter(|r| !r.passed).count();
        Self {
            passed: results.iter().filter(|r| r.passed).count(),
            total: results.len(),
            thresholded: thresholded.count(),
            regressions,
            all_passed: regressions == 0,
        }
    }

    pub fn exit_status(&self) -> u8 {
        if self.all_passed {
            EXIT_SUCCESS
        } else {
            EXIT_REGRESSION
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub results: &'a [BenchmarkResult],
}

/// Prints each result as it arrives and keeps it for the summary.
pub struct Reporter<W: Write> {
    out: W,
    state: ReporterState,
    results: Vec<BenchmarkResult>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: ReporterState::NotStarted,
            results: Vec::new(),
        }
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Results in arrival order.
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn begin(&mut self) -> Result<(), ReportError> {
        self.expect(ReporterState::NotStarted)?;
        writeln!(self.out, "\n{TITLE}")?;
        writeln!(
            self.out,
            "{:<25}{:<12}{:<15}{:<15}{:<8}{}",
            "Test", "Scale", "Total (ms)", "Avg/op (ns)", "Status", "Note"
        )?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        self.out.flush()?;
        self.state = ReporterState::Running;
        Ok(())
    }

    pub fn record(&mut self, result: BenchmarkResult) -> Result<(), ReportError> {
        self.expect(ReporterState::Running)?;
        let measurement = &result.measurement;
        writeln!(
            self.out,
            "{:<25}{:<12}{:<15.3}{:<15.1}{:<8}{}",
            measurement.scenario.name,
            measurement.operation_count,
            measurement.total.as_millis(),
            measurement.average().as_nanos(),
            if result.passed { "PASS" } else { "FAIL" },
            result.note
        )?;
        self.out.flush()?;
        self.results.push(result);
        Ok(())
    }

    pub fn finish(&mut self) -> Result<Summary, ReportError> {
        self.expect(ReporterState::Running)?;
        let summary = self.summary();
        writeln!(self.out, "\nSummary:")?;
        writeln!(self.out, "{} / {} passed", summary.passed, summary.total)?;
        if summary.all_passed {
            writeln!(
                self.out,
                "All {} thresholded benchmarks PASSED their performance targets.",
                summary.thresholded
            )?;
        } else {
            writeln!(
                self.out,
                "{} of {} thresholded benchmarks FAILED their performance targets!",
                summary.regressions, summary.thresholded
            )?;
        }
        self.out.flush()?;
        self.state = ReporterState::Finished;
        Ok(summary)
    }

    pub fn json_report(&self) -> JsonReport<'_> {
        JsonReport {
            generated_at: Utc::now(),
            summary: self.summary(),
            results: &self.results,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.json_report())?;
        writer.flush()?;
        Ok(())
    }

    fn expect(&self, expected: ReporterState) -> Result<(), ReportError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReportError::State {
                expected,
                actual: self.state,
            })
        }
    }
}
