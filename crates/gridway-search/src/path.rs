//! Path reconstruction from a predecessor map.

use gridway_core::{Grid, Point, Role};

use crate::observer::SearchObserver;

/// Best-known predecessor per cell, produced by a successful search.
///
/// The start cell is never a key: walking predecessors backward from the
/// goal terminates there.
#[derive(Debug, Clone)]
pub struct PredecessorMap {
    size: i32,
    parent: Vec<usize>,
}

pub(crate) const NO_PARENT: usize = usize::MAX;

impl PredecessorMap {
    pub(crate) fn new(size: i32, parent: Vec<usize>) -> Self {
        Self { size, parent }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.size && p.y < self.size {
            Some((p.y * self.size + p.x) as usize)
        } else {
            None
        }
    }

    /// The recorded predecessor of `p`, or `None` if `p` has no entry
    /// (the start, an unreached cell, or out of bounds).
    pub fn pred(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        let pi = self.parent[i];
        if pi == NO_PARENT {
            return None;
        }
        Some(Point::new(pi as i32 % self.size, pi as i32 / self.size))
    }
}

/// Walk the predecessor map backward from the grid's end cell, marking
/// every interior cell [`Role::Path`] and invoking the observer once per
/// mark, in traversal (goal → start) order.
///
/// Returns the full path **in start → end order, both endpoints included**.
/// Start and End keep their own roles. Only meaningful after a search
/// returned [`Found`](crate::SearchOutcome::Found) on the same grid;
/// returns an empty path if the grid has no end set.
pub fn reconstruct<O: SearchObserver>(
    grid: &mut Grid,
    preds: &PredecessorMap,
    observer: &mut O,
) -> Vec<Point> {
    let Some(end) = grid.end() else {
        return Vec::new();
    };
    let start = grid.start();

    let mut path = vec![end];
    let mut cur = end;
    while let Some(prev) = preds.pred(cur) {
        cur = prev;
        path.push(cur);
        if Some(cur) != start {
            grid.mark(cur, Role::Path);
            observer.on_step(grid);
        }
    }
    path.reverse();
    path
}
