use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Per-path lock table.
///
/// Locks are created lazily on first access and live for the process
/// lifetime; an entry left behind by a deleted file is never touched
/// again until the path is recreated. Insertion is atomic with respect
/// to concurrent first access of the same path.
#[derive(Debug, Default)]
pub(crate) struct PathLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PathLocks {
    pub(crate) fn new() -> Self { Self::default() }

    pub(crate) fn get(&self, path: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(path.to_string())
            .or_default()
            .value()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_path_yields_the_same_lock() {
        let locks = PathLocks::new();
        let a = locks.get("dir/a");
        let b = locks.get("dir/a");
        assert!(Arc::ptr_eq(&a, &b));

        let other = locks.get("dir/b");
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
