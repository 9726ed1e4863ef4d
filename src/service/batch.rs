use crate::api::ServiceApi;
use crate::config::Config;
use crate::db::DeviceStore;
use crate::error::Result;
use crate::service::processor::LineProcessor;
use crate::service::reporter::Reporter;
use tokio::fs::{self, File};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub lines: usize,
    pub rows_selected: usize,
    pub rows_updated: u64,
}

/// Feed every line of `input` through `processor`, writing one result line
/// per input line. Each line is flushed once written; the first error stops
/// the batch and nothing is written for the failing line.
pub async fn run_batch<R, W>(
    processor: &mut LineProcessor<'_, R>,
    input: &str,
    output: &mut W,
) -> Result<BatchSummary>
where
    R: Reporter,
    W: AsyncWrite + Unpin,
{
    let mut summary = BatchSummary::default();

    for line in input.lines() {
        let outcome = processor.process(line).await?;

        output.write_all(outcome.output.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        summary.lines += 1;
        summary.rows_selected += outcome.rows_selected;
        summary.rows_updated += outcome.rows_updated.unwrap_or(0);
    }

    Ok(summary)
}

/// Whole run: open the session, process the input file into the output file,
/// close the session.
pub async fn run<R: Reporter>(cfg: &Config, reporter: &R) -> Result<BatchSummary> {
    let api = ServiceApi::new(cfg)?;
    let mut store = DeviceStore::connect(&cfg.database).await?;
    debug!(backend = store.backend_name(), "device store ready");
    reporter.initialized();

    let input = fs::read_to_string(&cfg.input_file).await?;
    let mut output = File::create(&cfg.output_file).await?;

    let summary = {
        let mut processor = LineProcessor::new(&api, &mut store, reporter, cfg.dry_run);
        run_batch(&mut processor, &input, &mut output).await?
    };

    store.close().await?;
    reporter.finished(&summary);
    Ok(summary)
}
