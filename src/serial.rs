use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// Per-instance operation lock that the owning thread may take again.
///
/// A decoder running under the lock can call back into the same template; the nested call
/// bumps the hold count instead of blocking. Other threads wait until the count drops to zero.
#[derive(Debug, Default)]
pub(crate) struct SerialLock {
    state: Mutex<Holder>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct Holder {
    owner: Option<ThreadId>,
    depth: usize,
}

impl SerialLock {
    pub(crate) fn lock(&self) -> SerialGuard<'_> {
        let me = thread::current().id();
        let mut state = self.state();
        while state.owner.is_some_and(|owner| owner != me) {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.owner = Some(me);
        state.depth += 1;
        SerialGuard { lock: self }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.state().depth
    }

    fn state(&self) -> MutexGuard<'_, Holder> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases one hold on drop, including while unwinding out of a panicking decoder.
pub(crate) struct SerialGuard<'a> {
    lock: &'a SerialLock,
}

impl Drop for SerialGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.lock.state();
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.lock.released.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[test]
    fn owner_can_lock_again() {
        let lock = SerialLock::default();
        let outer = lock.lock();
        {
            let _inner = lock.lock();
            assert_eq!(lock.depth(), 2);
        }
        assert_eq!(lock.depth(), 1);
        drop(outer);
        assert_eq!(lock.depth(), 0);
    }

    #[test]
    fn other_threads_wait_for_the_last_release() {
        let lock = SerialLock::default();
        let entered = AtomicBool::new(false);
        thread::scope(|scope| {
            let outer = lock.lock();
            let inner = lock.lock();
            let waiter = scope.spawn(|| {
                let _guard = lock.lock();
                entered.store(true, Ordering::SeqCst);
            });
            drop(inner);
            thread::sleep(Duration::from_millis(50));
            assert!(!entered.load(Ordering::SeqCst));
            drop(outer);
            waiter.join().unwrap();
        });
        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(lock.depth(), 0);
    }
}
