/*!
 * Error types for bytepump
 */

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures a pipeline run can produce.
///
/// Read and write failures are terminal for their pump but never abort the
/// pipeline call; they are collected into the [`PipelineReport`] returned to
/// the caller. Only `Config` is returned as an `Err` from
/// [`run_pipeline`](crate::run_pipeline).
///
/// [`PipelineReport`]: crate::report::PipelineReport
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Rejected pipeline configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The source stream failed, including a failed alignment fill
    #[error("source read failed: {0}")]
    Read(#[source] io::Error),

    /// The sink stream failed
    #[error("sink write failed: {0}")]
    Write(#[source] io::Error),

    /// The batch factory panicked before any batch was processed
    #[error("batch factory panicked: {0}")]
    FactoryPanic(String),

    /// A pump thread panicked (a misbehaving source or sink implementation)
    #[error("{stage} pump panicked: {message}")]
    PumpPanic {
        stage: &'static str,
        message: String,
    },
}
