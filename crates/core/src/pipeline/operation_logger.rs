use std::collections::HashMap;
use std::time::Instant;

use crate::shared::constants::PROGRESS_LOG_STEP;

/// Observer for long-running operation events.
///
/// Keeps the use cases free of any particular output mechanism; console
/// results are written separately and never go through this trait.
pub trait OperationLogger {
    /// Report the service-side completion percentage of an operation.
    fn progress(&mut self, operation: &str, percent: u32);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullOperationLogger;

impl OperationLogger for NullOperationLogger {
    fn progress(&mut self, _operation: &str, _percent: u32) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards events to the `log` crate.
///
/// Progress is throttled: a line is emitted only when the percentage has
/// advanced by at least `step` points since the last one for that
/// operation, or reaches 100.
pub struct LogOperationLogger {
    step: u32,
    last_progress: HashMap<String, u32>,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    messages: Vec<String>,
}

impl LogOperationLogger {
    pub fn new(step: u32) -> Self {
        Self {
            step: step.max(1),
            last_progress: HashMap::new(),
            timings: HashMap::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no stage was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Run summary ({:.1}s total):", elapsed_ms / 1000.0)];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            lines.push(format!(
                "  {stage:22}: {:>3} run(s)  total {:8.1}s",
                durations.len(),
                total_ms / 1000.0
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Last progress value that was actually logged for `operation`.
    pub fn last_logged_progress(&self, operation: &str) -> Option<u32> {
        self.last_progress.get(operation).copied()
    }
}

impl Default for LogOperationLogger {
    fn default() -> Self {
        Self::new(PROGRESS_LOG_STEP)
    }
}

impl OperationLogger for LogOperationLogger {
    fn progress(&mut self, operation: &str, percent: u32) {
        let should_log = match self.last_progress.get(operation) {
            None => true,
            Some(&last) => percent >= last + self.step || (percent == 100 && last != 100),
        };
        if should_log {
            self.last_progress.insert(operation.to_string(), percent);
            log::info!("Operation {operation}: {percent}% complete");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
