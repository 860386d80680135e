//! Batched, optionally parallel iteration shared by the solver and the
//! accumulator.

use crate::config::QuadricConfig;
use qemcrate_core::{CancellationToken, Progress, Result};
use rayon::prelude::*;
use tracing::debug;

/// Progress reporting and cancellation for one pipeline run
#[derive(Debug, Default)]
pub struct StageControl {
    pub progress: Progress,
    pub cancellation: CancellationToken,
}

/// Compute `f(i)` for every `i in 0..count`, in order.
///
/// Work is split into batches of `config.batch_size`; cancellation is checked
/// before each batch and progress reported after it. Each output slot is
/// written by exactly one task.
pub(crate) fn map_batched<U, F>(
    count: usize,
    config: &QuadricConfig,
    control: &StageControl,
    message: &str,
    f: F,
) -> Result<Vec<U>>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    let batch_size = config.effective_batch_size();
    let mut output = Vec::with_capacity(count);

    let mut start = 0;
    while start < count {
        control.cancellation.check()?;
        let end = (start + batch_size).min(count);
        if config.parallel {
            output.par_extend((start..end).into_par_iter().map(&f));
        } else {
            output.extend((start..end).map(&f));
        }
        debug!("{}: {}/{}", message, end, count);
        control.progress.report(end, count, message);
        start = end;
    }

    Ok(output)
}
