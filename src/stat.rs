//! Benchmark-mode timing aggregation. Grounded on `original_source/MS_Project/main.cpp`'s
//! `test_stats`/`catch_failure` (mean, population standard deviation, 95% CI
//! via `1.96 * sdev / sqrt(n)`), written the way the teacher's `stat.rs`
//! appends one line per run to an output file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tracing::error;

use crate::error::PlannerError;

#[derive(Debug, Clone, Default)]
pub struct BenchmarkStats {
    pub case_times: Vec<f64>,
    pub failures: usize,
    pub depth_exceeded: usize,
}

/// Summary statistics over one case's solve time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseSummary {
    pub mean: f64,
    pub sdev: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl BenchmarkStats {
    pub fn record_success(&mut self, elapsed: Duration) {
        self.case_times.push(elapsed.as_secs_f64());
    }

    pub fn record_failure(&mut self, error: &PlannerError) {
        match error {
            PlannerError::SearchDepthExceeded { .. } => self.depth_exceeded += 1,
            _ => self.failures += 1,
        }
    }

    /// Mean, population standard deviation, and 95% CI over every recorded
    /// case time so far — `test_stats` in the original, ported verbatim.
    pub fn summary(&self) -> Option<CaseSummary> {
        let n = self.case_times.len();
        if n == 0 {
            return None;
        }
        let mean = self.case_times.iter().sum::<f64>() / n as f64;
        let mean_sq = self
            .case_times
            .iter()
            .map(|t| (t - mean) * (t - mean))
            .sum::<f64>()
            / n as f64;
        let sdev = mean_sq.sqrt();
        let margin = 1.96 * (sdev / (n as f64).sqrt());
        Some(CaseSummary {
            mean,
            sdev,
            ci_low: mean - margin,
            ci_high: mean + margin,
        })
    }

    pub fn write_report(&self, path: impl AsRef<Path>) {
        let Some(summary) = self.summary() else {
            return;
        };
        let total = self.case_times.len() + self.failures + self.depth_exceeded;
        let report = format!(
            "cases completed: {} took {:.6}s on average (sdev {:.6}, 95% CI [{:.6},{:.6}])\r\n\
             {} failures out of {} total cases.\r\n\
             {} cases exceeded the configured search depth out of {} total cases.\r\n",
            self.case_times.len(),
            summary.mean,
            summary.sdev,
            summary.ci_low,
            summary.ci_high,
            self.failures,
            total,
            self.depth_exceeded,
            total,
        );

        let mut file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
        {
            Ok(f) => f,
            Err(e) => {
                error!("failed to open stats output file: {e}");
                return;
            }
        };
        if let Err(e) = file.write_all(report.as_bytes()) {
            error!("failed to write stats output file: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_hand_computed_values() {
        let mut stats = BenchmarkStats::default();
        stats.record_success(Duration::from_secs_f64(1.0));
        stats.record_success(Duration::from_secs_f64(2.0));
        stats.record_success(Duration::from_secs_f64(3.0));

        let summary = stats.summary().unwrap();
        assert!((summary.mean - 2.0).abs() < 1e-9);
        let expected_sdev = (2.0_f64 / 3.0).sqrt();
        assert!((summary.sdev - expected_sdev).abs() < 1e-9);
    }

    #[test]
    fn empty_stats_have_no_summary() {
        assert!(BenchmarkStats::default().summary().is_none());
    }
}
