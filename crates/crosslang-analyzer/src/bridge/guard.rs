use std::sync::atomic::{AtomicBool, Ordering};

/// Keeps a resolution request from re-entering itself.
///
/// Matchers call back into navigation capabilities that may route to this
/// same engine. While a [`GuardToken`] is alive every other entry attempt is
/// refused, and the caller answers "no result" instead of queuing.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    busy: AtomicBool,
}

impl ReentrancyGuard {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    pub fn try_enter(&self) -> Option<GuardToken<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GuardToken {
                guard: self,
            })
    }

    pub fn is_held(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, on every exit path.
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/guard_tests.rs"]
mod tests;
