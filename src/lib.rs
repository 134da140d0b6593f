//! Animated N-Queens backtracking.
//!
//! A [`Solver`] runs the search on its own thread over a shared [`Board`],
//! pausing after every placement and removal and holding on each complete
//! solution until the consumer acknowledges it. Progress arrives as
//! [`Event`]s on the run's channel.

pub mod board;
mod engine;
pub mod error;
pub mod events;
pub mod gate;
pub mod settings;
pub mod solver;

pub use board::{Board, Snapshot};
pub use error::{Result, SolverError};
pub use events::{Event, Move, Solution};
pub use gate::{Sleeper, ThreadSleeper};
pub use solver::{RunHandle, Solver};
