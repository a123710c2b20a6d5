//! Poison-recovering lock helpers.
//!
//! The only mutexes in this crate guard the color parse cache and the
//! logger's writer. Both hold data that stays valid if a thread panics
//! mid-update (a cache entry or a partially written log line), so every
//! lock goes through [`lock_recover`] instead of propagating poison.

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering from poison if necessary.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use color_detect::sync::lock_recover;
///
/// let mutex = Mutex::new(42);
/// let guard = lock_recover(&mutex);
/// assert_eq!(*guard, 42);
/// ```
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_recover_normal_operation() {
        let mutex = Mutex::new(42);
        assert_eq!(*lock_recover(&mutex), 42);
    }

    #[test]
    fn test_lock_recover_after_poison() {
        let mutex = Mutex::new(42);

        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = mutex.lock().unwrap();
            panic!("intentional panic to poison mutex");
        }));

        assert!(mutex.lock().is_err(), "Mutex should be poisoned");
        assert_eq!(*lock_recover(&mutex), 42);
    }

    #[test]
    fn test_concurrent_access_after_poison() {
        let mutex = Arc::new(Mutex::new(0));

        {
            let m = Arc::clone(&mutex);
            let _ = panic::catch_unwind(AssertUnwindSafe(move || {
                let _guard = m.lock().unwrap();
                panic!("poison it");
            }));
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&mutex);
                thread::spawn(move || {
                    *lock_recover(&m) += 1;
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(*lock_recover(&mutex), 4);
    }
}
