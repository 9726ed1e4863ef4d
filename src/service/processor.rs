use crate::api::ServiceApi;
use crate::db::DeviceStore;
use crate::error::Result;
use crate::service::reporter::Reporter;

/// What one input line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// Service response rendered as a single output line (no terminator).
    pub output: String,
    pub rows_selected: usize,
    /// `None` in dry-run mode: no update was executed.
    pub rows_updated: Option<u64>,
}

/// Runs the per-line pipeline: service call, device select, optional update.
pub struct LineProcessor<'a, R: Reporter> {
    api: &'a ServiceApi,
    store: &'a mut DeviceStore,
    reporter: &'a R,
    dry_run: bool,
}

impl<'a, R: Reporter> LineProcessor<'a, R> {
    pub fn new(
        api: &'a ServiceApi,
        store: &'a mut DeviceStore,
        reporter: &'a R,
        dry_run: bool,
    ) -> Self {
        Self {
            api,
            store,
            reporter,
            dry_run,
        }
    }

    /// Process one identifier to completion. Errors abort the line and are
    /// meant to abort the run.
    pub async fn process(&mut self, line: &str) -> Result<LineOutcome> {
        self.reporter.line_started(line);

        let output = self.api.fetch(line).await?.to_line()?;

        let devices = self.store.find_devices(line).await?;
        self.reporter.rows_selected(line, devices.len());

        let rows_updated = if self.dry_run {
            None
        } else {
            let count = self.store.activate(line).await?;
            self.reporter.rows_updated(line, count);
            Some(count)
        };

        self.reporter.line_finished(line);

        Ok(LineOutcome {
            output,
            rows_selected: devices.len(),
            rows_updated,
        })
    }
}
