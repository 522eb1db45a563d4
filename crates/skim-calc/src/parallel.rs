//! Row-partitioned parallel execution.
//!
//! Origin rows are split into one contiguous range per worker before launch.
//! Each worker receives the matching [`RowBlock`] of every output matrix, so
//! it owns those rows exclusively and writes without locks.  The pool's
//! completion of all ranges is the only synchronisation point.

use std::ops::Range;

use rayon::ThreadPool;
use rayon::prelude::*;

use skim_matrix::{FloatMatrix, RowBlock, partition_rows};

use crate::zones::ZoneId;
use crate::{SkimConfig, SkimResult};

pub(crate) fn build_pool(config: &SkimConfig) -> SkimResult<ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .thread_name(|i| format!("skim-worker-{i}"))
        .build()?)
}

/// Run `work(row, blocks)` for every row of `matrices`, which must all have
/// the same row count.  `blocks[k]` is the writable block of `matrices[k]`
/// holding `row`.  The first error aborts the run.
pub(crate) fn for_each_row<Z, F>(
    pool: &ThreadPool,
    matrices: Vec<&mut FloatMatrix<Z>>,
    work: F,
) -> SkimResult<()>
where
    Z: ZoneId,
    F: Fn(usize, &mut [RowBlock<'_>]) -> SkimResult<()> + Sync,
{
    let rows = matrices.first().map_or(0, |m| m.rows());
    let partition = partition_rows(rows, pool.current_num_threads());

    let mut per_worker: Vec<Vec<RowBlock<'_>>> =
        partition.iter().map(|_| Vec::with_capacity(matrices.len())).collect();
    for matrix in matrices {
        debug_assert_eq!(matrix.rows(), rows);
        for (worker, block) in matrix.row_blocks_mut(&partition).into_iter().enumerate() {
            per_worker[worker].push(block);
        }
    }

    let jobs: Vec<(Range<usize>, Vec<RowBlock<'_>>)> = partition.into_iter().zip(per_worker).collect();
    pool.install(|| {
        jobs.into_par_iter().try_for_each(|(range, mut blocks)| {
            log::debug!("worker takes origin rows {range:?}");
            for row in range {
                work(row, &mut blocks)?;
            }
            Ok(())
        })
    })
}
