/*!
 * Bytepump - work-unit aligned streaming batch pipeline
 *
 * Connects a readable byte source to a writable byte sink through a
 * caller-supplied batch transform, with:
 * - Concurrent read, transform, and write stages
 * - Batches aligned to a configurable work-unit size
 * - Bounded queues as the sole backpressure mechanism
 * - Strict in-order delivery to the sink
 * - A prefetch hook for speculative preparation of the next batch
 */

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;

mod reader;
mod writer;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::run_pipeline;
pub use report::PipelineReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
