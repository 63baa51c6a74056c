//! Distance functions and the mode-gated heuristic/step-cost pairing.

use gridway_core::{MoveMode, Point};

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// The admissible remaining-cost estimate for `mode`.
///
/// Cardinal movement pairs with Manhattan (unit orthogonal steps),
/// diagonal movement with Euclidean (straight-line diagonal steps of cost
/// √2). The pairing is fixed here so a crossed, inadmissible combination
/// cannot be expressed.
#[inline]
pub fn estimate(mode: MoveMode, from: Point, to: Point) -> f64 {
    match mode {
        MoveMode::Cardinal => manhattan(from, to) as f64,
        MoveMode::Diagonal => euclidean(from, to),
    }
}

/// The cost of one step from `from` to an adjacent `to` under `mode`.
#[inline]
pub fn step_cost(mode: MoveMode, from: Point, to: Point) -> f64 {
    match mode {
        MoveMode::Cardinal => 1.0,
        MoveMode::Diagonal => euclidean(from, to),
    }
}
