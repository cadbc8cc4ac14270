//! Parallel batch compositing.
//!
//! Jobs share nothing but the read-only asset store, so they run on a rayon
//! pool without locking. One job failing never affects another.

use rayon::prelude::*;
use tracing::warn;

use crate::compose::Compositor;
use crate::error::{AdsynthError, Result};
use crate::types::{CompositeJob, EncodedAsset};

/// Build a pool with `threads` workers, or rayon's default when `None`.
pub fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(AdsynthError::Config {
            message: "thread count must be at least 1".to_string(),
            help: None,
        });
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| AdsynthError::Config {
        message: format!("failed to build thread pool: {e}"),
        help: None,
    })
}

/// Composite every job on `pool`, returning one result per job in input order.
pub fn composite_all(
    compositor: &Compositor<'_>,
    jobs: &[CompositeJob],
    pool: &rayon::ThreadPool,
) -> Vec<Result<EncodedAsset>> {
    pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let result = compositor.composite(job);
                if let Err(e) = &result {
                    warn!(template = %job.template.id, error = %e, "job failed");
                }
                result
            })
            .collect()
    })
}
