use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, trace, warn};

use crate::board::Board;
use crate::events::{Event, Move, Solution};
use crate::gate::{Pacer, SolutionGate};

/// Column-by-column backtracking search over a shared board.
///
/// Runs on the solver thread and blocks there: pacing after every mutation,
/// and on the solution gate after every complete placement.
pub(crate) struct Engine {
    board: Arc<Board>,
    gate: Arc<SolutionGate>,
    pacer: Pacer,
    events: Sender<Event>,
    consumer_gone: AtomicBool,
}

impl Engine {
    pub(crate) fn new(
        board: Arc<Board>,
        gate: Arc<SolutionGate>,
        pacer: Pacer,
        events: Sender<Event>,
    ) -> Self {
        Self {
            board,
            gate,
            pacer,
            events,
            consumer_gone: AtomicBool::new(false),
        }
    }

    /// Returns false once the consumer has dropped its receiver.
    pub(crate) fn send(&self, event: Event) -> bool {
        if self.events.send(event).is_ok() {
            return true;
        }
        if !self.consumer_gone.swap(true, Ordering::Relaxed) {
            warn!("event receiver dropped, animation is no longer observed");
        }
        false
    }

    /// Explores the whole tree and returns the final solution count.
    pub(crate) fn run(&self) -> usize {
        self.place_queens(0);
        self.board.solution_count()
    }

    fn place_queens(&self, col: usize) {
        let size = self.board.size();
        if col == size {
            self.record_solution(size);
            return;
        }

        for row in 0..size {
            if !self.board.is_safe(row, col) {
                continue;
            }
            self.board.place(row, col);
            self.changed(Move::Placed { row, col });
            self.place_queens(col + 1);

            self.board.remove(row, col);
            self.changed(Move::Removed { row, col });

            if self.gate.is_raised() {
                self.wait_for_ack();
            }
        }
    }

    fn record_solution(&self, size: usize) {
        let count = self.board.increment_solution_count();
        let rows = (0..size)
            .map(|c| self.board.queen_row_in_column(c).map_or(0, |r| r + 1))
            .collect();
        let solution = Solution { rows, count };
        debug!("solution #{count}: {solution}");

        let board = &self.board;
        self.gate.raise_with(|| board.mark_solution_found());
        if !self.send(Event::SolutionFound(solution)) {
            debug!("solution #{count} cannot be acknowledged, continuing");
            self.lower();
            return;
        }
        self.wait_for_ack();
    }

    fn wait_for_ack(&self) {
        if let Err(e) = self.gate.wait() {
            warn!("solution pause abandoned: {e}");
            self.board.clear_solution_found();
        }
    }

    fn lower(&self) {
        let board = &self.board;
        self.gate.release_with(|| board.clear_solution_found());
    }

    fn changed(&self, change: Move) {
        trace!("{change:?}");
        let snapshot = self.board.snapshot();
        self.send(Event::BoardChanged { snapshot, change });
        self.pacer.pause();
        if self.gate.take_interrupt() {
            warn!("pacing pause interrupted, resuming");
        }
    }
}
