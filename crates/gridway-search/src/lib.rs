//! **gridway-search** — deterministic A* over gridway grids.
//!
//! This crate is the algorithm half of the *gridway* workspace:
//!
//! - **A\*** frontier expansion with an explicit, documented tie-break
//!   ([`search`], [`find_path`])
//! - **Path reconstruction** from the predecessor map ([`reconstruct`])
//! - **Step observation** — a synchronous per-expansion callback with
//!   cooperative cancellation ([`SearchObserver`])
//! - **Recording and replay** of a run's role changes ([`TraceRecorder`],
//!   [`SearchTrace`])
//!
//! The grid model (roles, adjacency refresh, corner-cut rule) lives in
//! `gridway-core`; the engine operates purely off the neighbour lists
//! cached there and rejects runs whose [`gridway_core::MoveMode`] does not
//! match the grid's last refresh.
//!
//! # Flow
//!
//! ```text
//! configure roles -> refresh_adjacency(mode) -> search -> reconstruct
//!                                              |            |
//!                                              +- on_step --+--> observer
//! ```

pub mod astar;
pub mod distance;
pub mod error;
pub mod observer;
pub mod path;
pub mod trace;

pub use astar::{SearchOutcome, find_path, search};
pub use distance::{estimate, euclidean, manhattan, step_cost};
pub use error::SearchError;
pub use observer::{NullObserver, SearchObserver};
pub use path::{PredecessorMap, reconstruct};
pub use trace::{SearchTrace, TraceFrame, TraceRecorder};
