use futures::stream::FuturesUnordered;
use futures::StreamExt;

use crate::task::{SubTask, TaskStatus};

use super::output::RunOutput;
use super::runner::SubTaskRunner;
use super::types::BatchSummary;

/// Execute one ready batch in waves of at most `max_parallel` sub-tasks
///
/// Members of a wave run concurrently; the next wave is launched only once
/// every member of the current one is terminal. Failures never cut a wave
/// short.
///
/// # Arguments
///
/// * `runner` - Shared unit-of-work runner
/// * `batch` - Sub-tasks of this batch, in input order
/// * `max_parallel` - Wave size (values below 1 are treated as 1)
pub async fn execute_batch(
    runner: &SubTaskRunner,
    mut batch: Vec<&mut SubTask>,
    max_parallel: usize,
    output: &RunOutput,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for wave in batch.chunks_mut(max_parallel.max(1)) {
        summary.wave_sizes.push(wave.len());

        let mut futs: FuturesUnordered<_> = wave
            .iter_mut()
            .map(|sub_task| async move {
                let sub_task: &mut SubTask = sub_task;
                output.emit_task_start(sub_task);
                runner.run(sub_task).await;
                output.emit_task_end(sub_task);
                sub_task.status
            })
            .collect();

        while let Some(status) = futs.next().await {
            if status == TaskStatus::Completed {
                summary.completed += 1;
            } else {
                summary.failed += 1;
            }
        }
    }

    summary
}
