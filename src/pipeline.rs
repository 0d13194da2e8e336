/*!
 * Pipeline coordinator: wires the pumps together and runs the transform loop
 */

use std::any::Any;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use bytes::Bytes;
use crossbeam_channel::bounded;
use tracing::{debug, error};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::reader::read_pump;
use crate::report::PipelineReport;
use crate::writer::write_pump;

/// Run the three-stage pipeline to completion on the caller's thread.
///
/// The read and write pumps run as independent threads against bounded
/// queues; the coordinator loop here is the synchronous backbone the caller
/// blocks on. `factory` is invoked exactly once, after the pumps have
/// started, to obtain the batch transform and the prefetch hook. For each
/// batch, in order: the transform is applied, the output is enqueued for
/// writing, and then the prefetch hook is called with the (input, output)
/// pair for side effects.
///
/// A panic inside `factory` is contained and reported through the
/// [`PipelineReport`]; panics inside the returned closures are NOT
/// contained and unwind to the caller with the pipeline in an undefined
/// state. Read and write failures never abort the call either way: the
/// failing pump shuts its side of the pipeline down and the cause lands in
/// the report. The only `Err` this function returns is a rejected
/// configuration.
///
/// There is no cancellation or timeout; the pipeline stops when the source
/// is exhausted or a stage fails.
pub fn run_pipeline<R, W, F, P, X>(
    source: R,
    sink: W,
    factory: F,
    config: &PipelineConfig,
) -> Result<PipelineReport>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
    F: FnOnce() -> (P, X),
    P: FnMut(&[u8]) -> Vec<u8>,
    X: FnMut(&[u8], &[u8]),
{
    config.validate()?;

    let (in_tx, in_rx) = bounded::<Bytes>(config.input_queue_depth());
    let (out_tx, out_rx) = bounded::<Bytes>(config.output_queue_depth());

    let reader_config = config.clone();
    let read_handle = thread::spawn(move || read_pump(source, in_tx, reader_config));
    let write_handle = thread::spawn(move || write_pump(sink, out_rx));

    let mut report = PipelineReport::default();

    match panic::catch_unwind(AssertUnwindSafe(factory)) {
        Ok((mut process, mut prefetch)) => {
            for batch in in_rx.iter() {
                let output = Bytes::from(process(&batch));
                report.batches_processed += 1;
                report.bytes_in += batch.len() as u64;

                // A failed send means the write pump is gone; stop
                // producing instead of blocking against a dead consumer.
                if out_tx.send(output.clone()).is_err() {
                    debug!("output queue disconnected, coordinator stopping");
                    break;
                }
                report.bytes_out += output.len() as u64;
                prefetch(&batch, &output);
            }
        }
        Err(cause) => {
            let message = panic_message(cause);
            error!("batch factory panicked: {}", message);
            report.factory_error = Some(PipelineError::FactoryPanic(message));
        }
    }

    // Dropping our channel ends is the termination signal for both pumps,
    // whichever path got us here.
    drop(in_rx);
    drop(out_tx);

    match read_handle.join() {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => report.read_error = Some(e),
        Err(cause) => {
            report.read_error = Some(PipelineError::PumpPanic {
                stage: "read",
                message: panic_message(cause),
            });
        }
    }

    match write_handle.join() {
        Ok(Ok(bytes)) => report.bytes_written = bytes,
        Ok(Err(e)) => report.write_error = Some(e),
        Err(cause) => {
            report.write_error = Some(PipelineError::PumpPanic {
                stage: "write",
                message: panic_message(cause),
            });
        }
    }

    Ok(report)
}

fn panic_message(cause: Box<dyn Any + Send>) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
