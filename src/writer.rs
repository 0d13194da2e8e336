/*!
 * Write pump: drains transformed batches to the sink stream
 */

use std::io::Write;

use bytes::Bytes;
use crossbeam_channel::Receiver;
use tracing::{debug, error};

use crate::error::PipelineError;

/// Write each batch from `rx` to the sink in arrival order, skipping empty
/// batches. On a write error the pump stops consuming immediately; batches
/// still queued are never written. Normal termination happens only once the
/// channel is closed and fully drained, at which point the sink is flushed.
///
/// Returns the number of bytes written, or the write error that stopped
/// the pump.
pub(crate) fn write_pump<W: Write>(mut sink: W, rx: Receiver<Bytes>) -> Result<u64, PipelineError> {
    let mut total = 0u64;

    for batch in rx {
        if batch.is_empty() {
            continue;
        }
        if let Err(e) = sink.write_all(&batch) {
            error!("write pump terminating: {}", e);
            return Err(PipelineError::Write(e));
        }
        total += batch.len() as u64;
    }

    if let Err(e) = sink.flush() {
        error!("sink flush failed: {}", e);
        return Err(PipelineError::Write(e));
    }

    debug!(total_bytes = total, "output queue drained, write pump done");
    Ok(total)
}
