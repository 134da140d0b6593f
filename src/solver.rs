use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Receiver;
use log::info;

use crate::board::{Board, Snapshot};
use crate::engine::Engine;
use crate::error::{Result, SolverError};
use crate::events::Event;
use crate::gate::{CompletionLatch, Pacer, Sleeper, SolutionGate, StartBarrier, ThreadSleeper};

/// Run control for the animated search.
///
/// Owns the board and the coordination primitives. One run at a time; a run
/// cannot be cancelled once started.
pub struct Solver {
    board: Arc<Board>,
    gate: Arc<SolutionGate>,
    barrier: Arc<StartBarrier>,
    pacer: Pacer,
    running: Arc<AtomicBool>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_sleeper(Arc::new(ThreadSleeper))
    }
}

impl Solver {
    pub fn with_sleeper(sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            board: Arc::new(Board::default()),
            gate: Arc::new(SolutionGate::default()),
            barrier: Arc::new(StartBarrier::default()),
            pacer: Pacer::new(0, sleeper),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Lets the solver thread begin mutating the board. Only the first call
    /// has any effect.
    pub fn presentation_ready(&self) {
        if self.barrier.open() {
            info!("presentation ready, solver released");
        }
    }

    /// Resets the board and starts searching on a new thread.
    pub fn start_run(&self, size: usize, speed_ms: u64) -> Result<RunHandle> {
        if size == 0 {
            return Err(SolverError::InvalidSize);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SolverError::RunInProgress);
        }
        if let Err(e) = self.board.reset(size) {
            self.running.store(false, Ordering::SeqCst);
            return Err(e);
        }
        self.gate.release();
        self.gate.take_interrupt();
        self.pacer.set_speed(speed_ms);

        let (tx, rx) = crossbeam_channel::unbounded();
        let latch = Arc::new(CompletionLatch::default());
        let engine = Engine::new(
            Arc::clone(&self.board),
            Arc::clone(&self.gate),
            self.pacer.clone(),
            tx,
        );
        let barrier = Arc::clone(&self.barrier);
        let running = Arc::clone(&self.running);
        let done = Arc::clone(&latch);

        info!("starting run: size {size}, speed {speed_ms} ms");
        let thread = thread::Builder::new()
            .name(format!("n-queens-{size}"))
            .spawn(move || {
                barrier.wait();
                let solutions = engine.run();
                info!("run complete: {solutions} solution(s) for size {size}");
                running.store(false, Ordering::SeqCst);
                done.count_down();
                engine.send(Event::RunComplete { solutions });
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                SolverError::Spawn(e.to_string())
            })?;

        Ok(RunHandle {
            events: rx,
            latch,
            thread,
        })
    }

    pub fn set_speed(&self, speed_ms: u64) {
        self.pacer.set_speed(speed_ms);
    }

    pub fn speed(&self) -> u64 {
        self.pacer.speed()
    }

    /// Lets a solver held on a found solution continue. Returns false if no
    /// solution was pending.
    pub fn acknowledge_solution(&self) -> bool {
        let board = &self.board;
        self.gate.release_with(|| board.clear_solution_found())
    }

    /// Interrupts the solver at its next suspension point.
    pub fn interrupt(&self) {
        self.gate.interrupt();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn solution_count(&self) -> usize {
        self.board.solution_count()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }
}

/// Handle on one run: its event stream and its completion latch.
pub struct RunHandle {
    events: Receiver<Event>,
    latch: Arc<CompletionLatch>,
    thread: JoinHandle<()>,
}

impl RunHandle {
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    pub fn is_complete(&self) -> bool {
        self.latch.is_done()
    }

    pub fn wait(&self) {
        self.latch.wait();
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.latch.wait_timeout(timeout)
    }

    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}
