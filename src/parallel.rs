//! Thread pool construction shared by the training and evaluation passes.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{LexiclassError, Result};

/// Build a named rayon pool.
///
/// `thread_pool_size` of `None` uses one thread per CPU core.
pub(crate) fn build_thread_pool(thread_pool_size: Option<usize>, name: &str) -> Result<ThreadPool> {
    let num_threads = thread_pool_size.unwrap_or_else(num_cpus::get).max(1);
    let name = name.to_string();

    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(move |i| format!("{name}-{i}"))
        .build()
        .map_err(|e| LexiclassError::internal(format!("Failed to create thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_thread_pool() {
        let pool = build_thread_pool(Some(2), "test-pool").unwrap();
        assert_eq!(pool.current_num_threads(), 2);

        let pool = build_thread_pool(Some(0), "test-pool").unwrap();
        assert_eq!(pool.current_num_threads(), 1);
    }
}
