use crate::service::batch::BatchSummary;
use tracing::{debug, info};

/// Sink for run progress events, passed explicitly to whatever emits them.
pub trait Reporter {
    fn initialized(&self);
    fn line_started(&self, line: &str);
    fn rows_selected(&self, line: &str, count: usize);
    /// Only ever called when the run is not a dry run.
    fn rows_updated(&self, line: &str, count: u64);
    fn line_finished(&self, line: &str);
    fn finished(&self, summary: &BatchSummary);
}

/// Emits every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn initialized(&self) {
        info!("Initialization finished.");
    }

    fn line_started(&self, line: &str) {
        info!("Processing line {}", line);
    }

    fn rows_selected(&self, line: &str, count: usize) {
        debug!(line, count, "selected device rows");
    }

    fn rows_updated(&self, _line: &str, count: u64) {
        info!("Updated records {}", count);
    }

    fn line_finished(&self, line: &str) {
        info!("Finished processing line {}", line);
    }

    fn finished(&self, summary: &BatchSummary) {
        info!(
            lines = summary.lines,
            rows_selected = summary.rows_selected,
            rows_updated = summary.rows_updated,
            "Processing finished."
        );
    }
}
