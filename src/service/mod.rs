pub mod batch;
pub mod processor;
pub mod reporter;

pub use batch::{BatchSummary, run, run_batch};
pub use processor::{LineOutcome, LineProcessor};
pub use reporter::{Reporter, TracingReporter};
