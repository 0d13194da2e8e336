/*!
 * Read pump: fills work-unit aligned batches from the source stream
 */

use std::io::{self, Read};

use bytes::Bytes;
use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Pull bytes from `source` in `batch_size` chunks and push them onto `tx`.
///
/// When a read lands off a work-unit boundary, a supplemental fill read
/// pads the batch up to the next boundary before it is delivered, so that
/// every batch (short of a genuine end-of-stream truncation) is
/// unit-aligned. Any non-empty batch is pushed before the terminal
/// condition is acted on.
///
/// Returns the total bytes read on clean end-of-stream, or the read error
/// that stopped the pump. Dropping `tx` on return is the end-of-stream
/// signal for the coordinator.
pub(crate) fn read_pump<R: Read>(
    mut source: R,
    tx: Sender<Bytes>,
    config: PipelineConfig,
) -> Result<u64, PipelineError> {
    let batch_size = config.batch_size;
    let work = config.work_unit_size;
    let mut total = 0u64;

    loop {
        // The buffer is padded so a supplemental fill always has room,
        // even when batch_size is not itself a work-unit multiple.
        let mut buf = vec![0u8; config.padded_batch_size()];
        let mut size = 0usize;
        let mut failure: Option<PipelineError> = None;
        let mut done = false;

        match read_once(&mut source, &mut buf[..batch_size]) {
            Ok(0) => done = true,
            Ok(n) => {
                size = n;
                if n % work != 0 {
                    let pad = work - n % work;
                    let (got, err) = fill_exact(&mut source, &mut buf[n..n + pad]);
                    size += got;
                    if let Some(e) = err {
                        failure = Some(PipelineError::Read(e));
                        done = true;
                    } else if got < pad {
                        // Stream ended inside the fill. Zero supplemental
                        // bytes means the source was exhausted exactly at
                        // the first read, which is an ordinary truncated
                        // final batch; a partial fill left us mid-unit.
                        done = true;
                        if got > 0 {
                            failure = Some(PipelineError::Read(io::Error::new(
                                io::ErrorKind::UnexpectedEof,
                                format!(
                                    "stream ended {} bytes short of a work-unit boundary",
                                    pad - got
                                ),
                            )));
                        }
                    }
                }
            }
            Err(e) => {
                failure = Some(PipelineError::Read(e));
                done = true;
            }
        }

        if size > 0 {
            total += size as u64;
            buf.truncate(size);
            if tx.send(Bytes::from(buf)).is_err() {
                // Coordinator went away; nothing left to deliver to
                debug!("input queue disconnected, read pump stopping");
                return Ok(total);
            }
        }

        if let Some(e) = failure {
            warn!("read pump terminating: {}", e);
            return Err(e);
        }
        if done {
            debug!(total_bytes = total, "source exhausted, read pump done");
            return Ok(total);
        }
    }
}

/// A single read, retried on `Interrupted`.
fn read_once<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match source.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Read until `buf` is full, end-of-stream, or a hard error. Returns the
/// byte count actually filled plus the error, if any, that cut it short;
/// a short count with no error means the stream ended.
fn fill_exact<R: Read>(source: &mut R, buf: &mut [u8]) -> (usize, Option<io::Error>) {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (filled, Some(e)),
        }
    }
    (filled, None)
}
