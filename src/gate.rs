//! Synchronization between the solver thread and its consumer.
//!
//! Pacing is a timed sleep; the solution pause is a signal wait. They are
//! separate primitives and never stand in for each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{Result, SolverError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One-way barrier the solver waits on before touching the board.
#[derive(Default)]
pub struct StartBarrier {
    open: Mutex<bool>,
    cond: Condvar,
}

impl StartBarrier {
    /// Returns false if the barrier was already open.
    pub fn open(&self) -> bool {
        let mut open = lock(&self.open);
        if *open {
            return false;
        }
        *open = true;
        self.cond.notify_all();
        true
    }

    pub fn is_open(&self) -> bool {
        *lock(&self.open)
    }

    pub fn wait(&self) {
        let open = lock(&self.open);
        let _open = self
            .cond
            .wait_while(open, |open| !*open)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

#[derive(Default)]
struct PauseState {
    raised: bool,
    interrupted: bool,
}

/// Flag plus monitor holding the solver after a complete solution.
///
/// Only the solver thread ever waits here.
#[derive(Default)]
pub struct SolutionGate {
    state: Mutex<PauseState>,
    cond: Condvar,
}

impl SolutionGate {
    pub fn raise(&self) {
        self.raise_with(|| {});
    }

    /// Runs `f` and raises the flag as one step under the monitor.
    pub fn raise_with(&self, f: impl FnOnce()) {
        let mut state = lock(&self.state);
        f();
        state.raised = true;
    }

    pub fn is_raised(&self) -> bool {
        lock(&self.state).raised
    }

    /// Lowers the flag and wakes the waiter. Returns whether it was raised.
    pub fn release(&self) -> bool {
        self.release_with(|| {})
    }

    /// Runs `f` and lowers the flag as one step, only if the flag is raised.
    /// Returns whether it was.
    pub fn release_with(&self, f: impl FnOnce()) -> bool {
        let mut state = lock(&self.state);
        if !state.raised {
            return false;
        }
        f();
        state.raised = false;
        self.cond.notify_all();
        true
    }

    /// Posts an interrupt for the next suspension point to consume.
    pub fn interrupt(&self) {
        lock(&self.state).interrupted = true;
        self.cond.notify_all();
    }

    /// Consumes a pending interrupt, if any.
    pub fn take_interrupt(&self) -> bool {
        std::mem::take(&mut lock(&self.state).interrupted)
    }

    /// Blocks while the flag is raised.
    ///
    /// An interrupt ends the wait early with [`SolverError::InterruptedWait`]
    /// and lowers the flag, so the caller can carry on.
    pub fn wait(&self) -> Result<()> {
        let state = lock(&self.state);
        let mut state = self
            .cond
            .wait_while(state, |s| s.raised && !s.interrupted)
            .unwrap_or_else(PoisonError::into_inner);
        if state.interrupted {
            state.interrupted = false;
            state.raised = false;
            return Err(SolverError::InterruptedWait);
        }
        Ok(())
    }
}

/// One-shot latch released when a run has explored its whole search tree.
#[derive(Default)]
pub struct CompletionLatch {
    done: Mutex<bool>,
    cond: Condvar,
}

impl CompletionLatch {
    pub fn count_down(&self) {
        *lock(&self.done) = true;
        self.cond.notify_all();
    }

    pub fn is_done(&self) -> bool {
        *lock(&self.done)
    }

    pub fn wait(&self) {
        let done = lock(&self.done);
        let _done = self
            .cond
            .wait_while(done, |done| !*done)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns true if the latch fired within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let done = lock(&self.done);
        let (done, _) = self
            .cond
            .wait_timeout_while(done, timeout, |done| !*done)
            .unwrap_or_else(PoisonError::into_inner);
        *done
    }
}

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Timed pause after each board mutation.
#[derive(Clone)]
pub struct Pacer {
    speed_ms: Arc<AtomicU64>,
    sleeper: Arc<dyn Sleeper>,
}

impl Pacer {
    pub fn new(speed_ms: u64, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            speed_ms: Arc::new(AtomicU64::new(speed_ms)),
            sleeper,
        }
    }

    pub fn speed(&self) -> u64 {
        self.speed_ms.load(Ordering::Relaxed)
    }

    pub fn set_speed(&self, speed_ms: u64) {
        self.speed_ms.store(speed_ms, Ordering::Relaxed);
    }

    /// Sleeps for the speed in effect right now.
    pub fn pause(&self) {
        let ms = self.speed();
        self.sleeper.sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn barrier_opens_once() {
        let barrier = Arc::new(StartBarrier::default());
        let waiter = {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || barrier.wait())
        };
        assert!(barrier.open());
        assert!(!barrier.open());
        waiter.join().unwrap();
        assert!(barrier.is_open());
    }

    #[test]
    fn release_before_wait_is_not_lost() {
        let gate = SolutionGate::default();
        gate.raise();
        assert!(gate.release());
        assert_eq!(gate.wait(), Ok(()));
        assert!(!gate.release());
    }

    #[test]
    fn release_wakes_waiter() {
        let gate = Arc::new(SolutionGate::default());
        gate.raise();
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait())
        };
        thread::sleep(Duration::from_millis(20));
        assert!(gate.release());
        assert_eq!(waiter.join().unwrap(), Ok(()));
    }

    #[test]
    fn interrupt_abandons_wait() {
        let gate = Arc::new(SolutionGate::default());
        gate.raise();
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait())
        };
        gate.interrupt();
        assert_eq!(waiter.join().unwrap(), Err(SolverError::InterruptedWait));
        assert!(!gate.is_raised());
        assert!(!gate.take_interrupt());
    }

    #[test]
    fn release_with_skips_a_lowered_gate() {
        let gate = SolutionGate::default();
        let mut ran = false;
        assert!(!gate.release_with(|| ran = true));
        assert!(!ran);

        gate.raise_with(|| ran = true);
        assert!(ran && gate.is_raised());
        let mut cleared = false;
        assert!(gate.release_with(|| cleared = true));
        assert!(cleared && !gate.is_raised());
    }

    #[test]
    fn interrupt_is_consumed_once() {
        let gate = SolutionGate::default();
        gate.interrupt();
        assert!(gate.take_interrupt());
        assert!(!gate.take_interrupt());
    }

    #[test]
    fn latch_reports_timeout_and_completion() {
        let latch = Arc::new(CompletionLatch::default());
        assert!(!latch.wait_timeout(Duration::from_millis(5)));
        let other = Arc::clone(&latch);
        thread::spawn(move || other.count_down());
        latch.wait();
        assert!(latch.is_done());
        assert!(latch.wait_timeout(Duration::ZERO));
    }

    struct Recording(Mutex<Vec<Duration>>);

    impl Sleeper for Recording {
        fn sleep(&self, duration: Duration) {
            self.0.lock().unwrap().push(duration);
        }
    }

    #[test]
    fn pacer_reads_speed_at_pause_time() {
        let sleeper = Arc::new(Recording(Mutex::new(Vec::new())));
        let pacer = Pacer::new(30, sleeper.clone());
        let shared = pacer.clone();
        pacer.pause();
        shared.set_speed(5);
        pacer.pause();
        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![Duration::from_millis(30), Duration::from_millis(5)]
        );
    }
}
