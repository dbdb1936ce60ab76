use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One mutex per destination path, so concurrent materializations of the
/// same project queue up instead of racing each other's staging swap.
#[derive(Default)]
pub struct DestLocks {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `dest`. Hold its lock for the duration of the
    /// write; different destinations get independent mutexes.
    pub fn gate(&self, dest: &Path) -> Arc<Mutex<()>> {
        let mut map = match self.inner.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(dest.to_path_buf()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_destination_shares_a_gate() {
        let locks = DestLocks::new();
        let a = locks.gate(Path::new("/tmp/out/demo"));
        let b = locks.gate(Path::new("/tmp/out/demo"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_destinations_do_not_block_each_other() {
        let locks = DestLocks::new();
        let a = locks.gate(Path::new("/tmp/out/one"));
        let b = locks.gate(Path::new("/tmp/out/two"));
        assert!(!Arc::ptr_eq(&a, &b));

        let _held_a = a.lock().unwrap();
        // Still lockable while the other gate is held.
        let _held_b = b.try_lock().expect("independent gate should be free");
    }
}
