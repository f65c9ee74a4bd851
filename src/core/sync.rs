//! Synchronization utilities for robust lock handling
//!
//! Mutexes and condition variables in this crate never `unwrap()` a lock
//! result. Poisoning is converted into a domain error so that a panic on
//! one thread surfaces as a failed operation on the others instead of a
//! cascade of panics.

use std::sync::LockResult;

/// Convert a poisoned lock result into an application error
///
/// Works for anything that hands back a `LockResult`: `Mutex::lock`,
/// `Condvar::wait`, `Condvar::wait_timeout` and friends.
///
/// # Arguments
/// * `result` - The result from a lock or wait operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use trafficlight::core::sync::handle_mutex_poison;
/// use trafficlight::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| QueueError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poisoned| {
        error_constructor(format!(
            "lock poisoned by a thread that panicked while holding it ({})",
            poisoned
        ))
    })
}
