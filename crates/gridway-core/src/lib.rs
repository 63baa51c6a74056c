//! **gridway-core** — Grid, cell-role and adjacency model for grid pathfinding.
//!
//! This crate provides the model half of the *gridway* workspace: the
//! [`Point`] geometry primitive, the exclusive [`Role`] tag carried by each
//! cell, the [`MoveMode`] selecting 4-way or 8-way movement, and the
//! [`Grid`] itself — a square role matrix with a rebuildable adjacency
//! cache, the diagonal corner-cut query, and pixel-geometry helpers for
//! presentation layers.
//!
//! Search algorithms live in the companion `gridway-search` crate and
//! operate purely on the adjacency lists cached here.

pub mod geom;
pub mod grid;
pub mod role;

pub use geom::Point;
pub use grid::{Grid, GridError, MoveMode};
pub use role::Role;
