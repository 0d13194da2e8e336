/*!
 * Pipeline outcome reporting
 */

use crate::error::PipelineError;

/// Summary of a single pipeline run.
///
/// Pump-level failures close their side of the pipeline and are collected
/// here rather than aborting the run; inspect [`is_clean`](Self::is_clean)
/// or the individual fields to find out how the run ended.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Batches that went through the transform
    pub batches_processed: u64,

    /// Bytes handed to the transform
    pub bytes_in: u64,

    /// Bytes produced by the transform and enqueued for writing
    pub bytes_out: u64,

    /// Bytes the write pump delivered to the sink; only meaningful when
    /// `write_error` is `None`
    pub bytes_written: u64,

    /// Why the read pump stopped, if not clean end-of-stream
    pub read_error: Option<PipelineError>,

    /// Why the write pump stopped, if not a clean drain
    pub write_error: Option<PipelineError>,

    /// Set when the batch factory panicked; no batch was processed
    pub factory_error: Option<PipelineError>,
}

impl PipelineReport {
    /// True when every stage terminated cleanly
    pub fn is_clean(&self) -> bool {
        self.factory_error.is_none() && self.read_error.is_none() && self.write_error.is_none()
    }

    /// First recorded failure, in pipeline order
    pub fn first_error(&self) -> Option<&PipelineError> {
        self.factory_error
            .as_ref()
            .or(self.read_error.as_ref())
            .or(self.write_error.as_ref())
    }
}
