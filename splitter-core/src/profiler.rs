use std::time::{Duration, Instant};
use tracing::info;

/// One timed pipeline step. `rows` is what the step produced, when that is
/// a row count (rows read, rows kept by a segment rule).
#[derive(Debug, Clone, PartialEq)]
pub struct StepTiming {
    pub step: String,
    pub elapsed: Duration,
    pub rows: Option<usize>,
}

/// Collects per-step timings for one upload when `--profile` is on.
/// Disabled profilers run the closures and record nothing.
#[derive(Debug, Default)]
pub struct StepProfiler {
    enabled: bool,
    steps: Vec<StepTiming>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            steps: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time_step<F, R>(&mut self, step: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.record(step, f, |_| None)
    }

    /// Like [`StepProfiler::time_step`], also noting how many rows came out.
    pub fn time_rows<F, R>(&mut self, step: &str, f: F, rows: impl FnOnce(&R) -> usize) -> R
    where
        F: FnOnce() -> R,
    {
        self.record(step, f, |result| Some(rows(result)))
    }

    fn record<F, R>(&mut self, step: &str, f: F, rows: impl FnOnce(&R) -> Option<usize>) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        self.steps.push(StepTiming {
            step: step.to_string(),
            elapsed: start.elapsed(),
            rows: rows(&result),
        });
        result
    }

    pub fn timings(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.elapsed).sum()
    }

    pub fn log_summary(&self) {
        if self.steps.is_empty() {
            return;
        }

        info!("📊 {} steps in {}µs", self.steps.len(), self.total().as_micros());
        for timing in &self.steps {
            match timing.rows {
                Some(rows) => info!("   {:.<30} {:>8}µs  {} rows", timing.step, timing.elapsed.as_micros(), rows),
                None => info!("   {:.<30} {:>8}µs", timing.step, timing.elapsed.as_micros()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_profiler_records_nothing() {
        let mut profiler = StepProfiler::disabled();
        let value = profiler.time_rows("read", || vec![1, 2, 3], Vec::len);
        assert_eq!(value.len(), 3);
        assert!(profiler.timings().is_empty());
        assert_eq!(profiler.total(), Duration::ZERO);
    }

    #[test]
    fn test_row_counts_are_recorded() {
        let mut profiler = StepProfiler::new(true);
        profiler.time_step("digest", || ());
        profiler.time_rows("segment QLD", || vec!["a", "b"], Vec::len);

        let steps: Vec<(&str, Option<usize>)> = profiler
            .timings()
            .iter()
            .map(|t| (t.step.as_str(), t.rows))
            .collect();
        assert_eq!(steps, vec![("digest", None), ("segment QLD", Some(2))]);
    }
}
