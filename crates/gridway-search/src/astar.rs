//! The A* search engine.
//!
//! One call to [`search`] runs A* to completion, exhaustion or
//! cancellation over a grid whose adjacency was refreshed for the same
//! [`MoveMode`]. All run state (scores, predecessors, open set) is owned by
//! the call; nothing is shared across runs, and identical inputs produce
//! identical expansions and identical paths.
//!
//! ## Determinism
//!
//! The open set is ordered by `(f, sequence)`: f ascending, ties broken by
//! a strictly increasing sequence number assigned at enqueue time and never
//! reused, so among equal-f cells the first-inserted wins. Combined with
//! the fixed neighbour iteration order cached on the grid, pop order, and
//! therefore the chosen path, is fully deterministic.
//!
//! Relaxing a cell that is already in the frontier updates its scores and
//! predecessor but not its queue priority; each cell has at most one live
//! heap entry, and pop order follows the f value it was enqueued with.

use std::collections::BinaryHeap;

use gridway_core::{Grid, MoveMode, Point, Role};

use crate::distance::{estimate, step_cost};
use crate::error::SearchError;
use crate::observer::SearchObserver;
use crate::path::{NO_PARENT, PredecessorMap, reconstruct};

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

/// Per-cell search state, flat-indexed by the grid layout.
#[derive(Clone)]
struct Node {
    g: f64,
    f: f64,
    parent: usize,
    in_open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            f: f64::INFINITY,
            parent: NO_PARENT,
            in_open: false,
        }
    }
}

/// A frontier entry: ordered by f ascending, then enqueue sequence
/// ascending, via a reversed `Ord` so `BinaryHeap` (a max-heap) pops the
/// minimum first.
#[derive(Clone, Copy)]
struct OpenEntry {
    f: f64,
    seq: u64,
    idx: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// How a search run ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// The goal was reached; the predecessor map is complete.
    Found(PredecessorMap),
    /// The frontier emptied without reaching the goal: no path exists for
    /// this grid and mode. A normal outcome, not a fault; rerunning on
    /// the same grid is pointless until a barrier changes.
    Exhausted,
    /// The observer requested cancellation between steps.
    Cancelled,
}

impl SearchOutcome {
    /// Whether the goal was reached.
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Run A* from the grid's start to its end under `mode`.
///
/// Rejects the run up front if the grid's adjacency cache was not
/// refreshed for `mode` ([`SearchError::ModeMismatch`]) or if either
/// endpoint is unset ([`SearchError::MissingEndpoints`]). Otherwise clears
/// stale search marks and expands the frontier, invoking
/// `observer.on_step` once after each expansion and polling
/// `observer.cancelled` at the top of every iteration.
///
/// Expanded cells are marked [`Role::Visited`], newly discovered ones
/// [`Role::Frontier`]; Start/End/Barrier roles are never overwritten.
pub fn search<O: SearchObserver>(
    grid: &mut Grid,
    mode: MoveMode,
    observer: &mut O,
) -> Result<SearchOutcome, SearchError> {
    if grid.adjacency_mode() != Some(mode) {
        return Err(SearchError::ModeMismatch {
            requested: mode,
            adjacency: grid.adjacency_mode(),
        });
    }
    let (Some(start), Some(end)) = (grid.start(), grid.end()) else {
        return Err(SearchError::MissingEndpoints);
    };

    grid.clear_marks();

    let size = grid.size();
    let len = (size * size) as usize;
    let idx = |p: Point| (p.y * size + p.x) as usize;
    let point = |i: usize| Point::new(i as i32 % size, i as i32 / size);
    let start_idx = idx(start);
    let end_idx = idx(end);

    log::debug!("A* {start} -> {end} on {size}x{size} grid, {mode}");

    let mut nodes = vec![Node::default(); len];
    if start_idx == end_idx {
        return Ok(SearchOutcome::Found(PredecessorMap::new(
            size,
            vec![NO_PARENT; len],
        )));
    }

    nodes[start_idx].g = 0.0;
    nodes[start_idx].f = estimate(mode, start, end);
    nodes[start_idx].in_open = true;

    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    open.push(OpenEntry {
        f: nodes[start_idx].f,
        seq: 0,
        idx: start_idx,
    });
    let mut seq: u64 = 0;
    let mut expansions: u64 = 0;
    let mut nbuf: Vec<Point> = Vec::with_capacity(8);

    let found = 'search: loop {
        if observer.cancelled() {
            log::debug!("A* cancelled after {expansions} expansions");
            return Ok(SearchOutcome::Cancelled);
        }

        let Some(current) = open.pop() else {
            break 'search false;
        };
        let ci = current.idx;
        nodes[ci].in_open = false;

        if ci == end_idx {
            break 'search true;
        }

        let cp = point(ci);
        let current_g = nodes[ci].g;
        log::trace!("expand {cp} g={current_g:.3}");

        nbuf.clear();
        nbuf.extend_from_slice(grid.neighbors(cp));

        for &np in &nbuf {
            if mode == MoveMode::Diagonal && grid.diagonal_blocked(cp, np) {
                continue;
            }
            let ni = idx(np);
            let tentative = current_g + step_cost(mode, cp, np);
            if tentative < nodes[ni].g {
                nodes[ni].g = tentative;
                nodes[ni].f = tentative + estimate(mode, np, end);
                nodes[ni].parent = ci;
                if !nodes[ni].in_open {
                    seq += 1;
                    open.push(OpenEntry {
                        f: nodes[ni].f,
                        seq,
                        idx: ni,
                    });
                    nodes[ni].in_open = true;
                    if np != start && np != end {
                        grid.mark(np, Role::Frontier);
                    }
                }
            }
        }

        expansions += 1;
        observer.on_step(grid);

        if ci != start_idx {
            grid.mark(cp, Role::Visited);
        }
    };

    if !found {
        log::debug!("A* exhausted after {expansions} expansions: no path");
        return Ok(SearchOutcome::Exhausted);
    }

    log::debug!("A* reached {end} after {expansions} expansions");
    let parents = nodes.into_iter().map(|n| n.parent).collect();
    Ok(SearchOutcome::Found(PredecessorMap::new(size, parents)))
}

/// Run [`search`] and, on success, [`reconstruct`] the path with the same
/// observer.
///
/// Returns `None` when the run ended in exhaustion or cancellation; use
/// [`search`] directly to distinguish the two.
pub fn find_path<O: SearchObserver>(
    grid: &mut Grid,
    mode: MoveMode,
    observer: &mut O,
) -> Result<Option<Vec<Point>>, SearchError> {
    match search(grid, mode, observer)? {
        SearchOutcome::Found(preds) => Ok(Some(reconstruct(grid, &preds, observer))),
        SearchOutcome::Exhausted | SearchOutcome::Cancelled => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::manhattan;
    use crate::observer::NullObserver;
    use crate::trace::TraceRecorder;
    use rand::rngs::StdRng;
    use rand::{Rng, RngExt, SeedableRng};

    struct Counting(usize);

    impl SearchObserver for Counting {
        fn on_step(&mut self, _grid: &Grid) {
            self.0 += 1;
        }
    }

    struct CancelAfter {
        steps: usize,
        seen: usize,
    }

    impl SearchObserver for CancelAfter {
        fn on_step(&mut self, _grid: &Grid) {
            self.seen += 1;
        }

        fn cancelled(&self) -> bool {
            self.seen >= self.steps
        }
    }

    fn open_grid(size: i32, start: Point, end: Point, mode: MoveMode) -> Grid {
        let mut g = Grid::new(size, size * 16);
        g.set_role(start, Role::Start).unwrap();
        g.set_role(end, Role::End).unwrap();
        g.refresh_adjacency(mode);
        g
    }

    fn ascii_grid(map: &str, mode: MoveMode) -> Grid {
        let mut g = Grid::from_ascii(map, 800).unwrap();
        g.refresh_adjacency(mode);
        g
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_missing_endpoints() {
        let mut g = Grid::new(5, 80);
        g.refresh_adjacency(MoveMode::Cardinal);
        let err = search(&mut g, MoveMode::Cardinal, &mut NullObserver).unwrap_err();
        assert_eq!(err, SearchError::MissingEndpoints);
    }

    #[test]
    fn rejects_unrefreshed_adjacency() {
        let mut g = Grid::new(5, 80);
        g.set_role(Point::new(0, 0), Role::Start).unwrap();
        g.set_role(Point::new(4, 4), Role::End).unwrap();
        let err = search(&mut g, MoveMode::Cardinal, &mut NullObserver).unwrap_err();
        assert_eq!(
            err,
            SearchError::ModeMismatch {
                requested: MoveMode::Cardinal,
                adjacency: None,
            }
        );
    }

    #[test]
    fn rejects_crossed_mode_pairing() {
        let mut g = open_grid(5, Point::new(0, 0), Point::new(4, 4), MoveMode::Cardinal);
        let err = search(&mut g, MoveMode::Diagonal, &mut NullObserver).unwrap_err();
        assert_eq!(
            err,
            SearchError::ModeMismatch {
                requested: MoveMode::Diagonal,
                adjacency: Some(MoveMode::Cardinal),
            }
        );
    }

    #[test]
    fn rejects_stale_adjacency_after_barrier_edit() {
        let mut g = open_grid(5, Point::new(0, 0), Point::new(4, 4), MoveMode::Cardinal);
        g.set_role(Point::new(2, 2), Role::Barrier).unwrap();
        let err = search(&mut g, MoveMode::Cardinal, &mut NullObserver).unwrap_err();
        assert!(matches!(err, SearchError::ModeMismatch { adjacency: None, .. }));
    }

    // -----------------------------------------------------------------------
    // Concrete scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn scenario_a_cardinal_open_grid() {
        // 5x5, no barriers: the path length equals the Manhattan distance
        // plus one (9 cells including both endpoints, 8 steps).
        let start = Point::new(0, 0);
        let end = Point::new(4, 4);
        let mut g = open_grid(5, start, end, MoveMode::Cardinal);
        let path = find_path(&mut g, MoveMode::Cardinal, &mut NullObserver)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], start);
        assert_eq!(path[8], end);
        assert_eq!(path.len() as i32, manhattan(start, end) + 1);
    }

    #[test]
    fn scenario_b_diagonal_open_grid() {
        // Same grid, 8-way: the unique optimum is the main diagonal.
        let mut g = open_grid(5, Point::new(0, 0), Point::new(4, 4), MoveMode::Diagonal);
        let path = find_path(&mut g, MoveMode::Diagonal, &mut NullObserver)
            .unwrap()
            .unwrap();
        let diagonal: Vec<Point> = (0..5).map(|i| Point::new(i, i)).collect();
        assert_eq!(path, diagonal);
    }

    #[test]
    fn scenario_c_full_wall_is_exhausted() {
        let map = "\
S....
.....
#####
.....
....E";
        for mode in [MoveMode::Cardinal, MoveMode::Diagonal] {
            let mut g = ascii_grid(map, mode);
            let outcome = search(&mut g, mode, &mut NullObserver).unwrap();
            assert!(matches!(outcome, SearchOutcome::Exhausted));
        }
    }

    #[test]
    fn enclosed_end_is_exhausted() {
        let map = "\
S....
.###.
.#E#.
.###.
.....";
        for mode in [MoveMode::Cardinal, MoveMode::Diagonal] {
            let mut g = ascii_grid(map, mode);
            let outcome = search(&mut g, mode, &mut NullObserver).unwrap();
            assert!(matches!(outcome, SearchOutcome::Exhausted));
        }
    }

    #[test]
    fn scenario_d_diagonal_wall_is_not_cut() {
        // An anti-diagonal barrier wall: every diagonal move across it has
        // both flanks blocked, so the path must route around the wall's
        // end rather than squeeze between the barrier corners.
        let map = "\
S....
...#.
..#..
.#...
....E";
        let mut g = ascii_grid(map, MoveMode::Diagonal);
        let path = find_path(&mut g, MoveMode::Diagonal, &mut NullObserver)
            .unwrap()
            .unwrap();
        assert_path_is_legal(&g, &path, MoveMode::Diagonal);
        // Strictly longer than the unobstructed diagonal.
        assert!(path.len() > 5);
    }

    #[test]
    fn degenerate_start_equals_end() {
        let mut g = Grid::new(3, 48);
        g.set_role(Point::new(1, 1), Role::Start).unwrap();
        g.set_role(Point::new(1, 1), Role::End).unwrap();
        g.refresh_adjacency(MoveMode::Cardinal);
        let outcome = search(&mut g, MoveMode::Cardinal, &mut NullObserver).unwrap();
        assert!(outcome.is_found());
    }

    // -----------------------------------------------------------------------
    // Determinism and tie-breaking
    // -----------------------------------------------------------------------

    #[test]
    fn tie_break_prefers_first_inserted() {
        // From (0,0) both (1,0) and (0,1) get f = 2; neighbour order
        // enqueues (1,0) first (up, right, down, left), so the chosen
        // 2x2 path goes right then down.
        let mut g = open_grid(2, Point::new(0, 0), Point::new(1, 1), MoveMode::Cardinal);
        let path = find_path(&mut g, MoveMode::Cardinal, &mut NullObserver)
            .unwrap()
            .unwrap();
        assert_eq!(
            path,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]
        );
    }

    #[test]
    fn observer_fires_once_per_expansion() {
        // 2x2 open grid expands start, (1,0) and (0,1) before popping the
        // goal: exactly three step notifications.
        let mut g = open_grid(2, Point::new(0, 0), Point::new(1, 1), MoveMode::Cardinal);
        let mut obs = Counting(0);
        let outcome = search(&mut g, MoveMode::Cardinal, &mut obs).unwrap();
        assert!(outcome.is_found());
        assert_eq!(obs.0, 3);
    }

    #[test]
    fn identical_runs_yield_identical_traces() {
        for mode in [MoveMode::Cardinal, MoveMode::Diagonal] {
            let (path_a, trace_a) = seeded_run(7, mode);
            let (path_b, trace_b) = seeded_run(7, mode);
            assert_eq!(path_a, path_b);
            assert_eq!(trace_a, trace_b);
        }
    }

    fn seeded_run(seed: u64, mode: MoveMode) -> (Option<Vec<Point>>, crate::trace::SearchTrace) {
        let mut g = random_grid(seed, 20, mode);
        let mut recorder = TraceRecorder::new(&g);
        let path = find_path(&mut g, mode, &mut recorder).unwrap();
        (path, recorder.into_trace())
    }

    fn random_grid(seed: u64, size: i32, mode: MoveMode) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut g = Grid::new(size, size * 16);
        for y in 0..size {
            for x in 0..size {
                if rng.random_range(0..100) < 30 {
                    g.set_role(Point::new(x, y), Role::Barrier).unwrap();
                }
            }
        }
        g.set_role(Point::new(0, 0), Role::Start).unwrap();
        g.set_role(Point::new(size - 1, size - 1), Role::End).unwrap();
        g.refresh_adjacency(mode);
        g
    }

    // -----------------------------------------------------------------------
    // Path legality properties
    // -----------------------------------------------------------------------

    fn assert_path_is_legal(grid: &Grid, path: &[Point], mode: MoveMode) {
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            // Consecutive cells are adjacent under the active policy.
            assert!(
                grid.neighbors(a).contains(&b),
                "{a} -> {b} is not an adjacency edge"
            );
            // Diagonal steps never cut a blocked corner.
            if mode == MoveMode::Diagonal {
                assert!(!grid.diagonal_blocked(a, b), "{a} -> {b} cuts a corner");
            }
        }
    }

    #[test]
    fn random_paths_are_contiguous_and_legal() {
        for seed in 0..20u64 {
            for mode in [MoveMode::Cardinal, MoveMode::Diagonal] {
                let mut g = random_grid(seed, 15, mode);
                if let Some(path) = find_path(&mut g, mode, &mut NullObserver).unwrap() {
                    assert_eq!(path[0], Point::new(0, 0));
                    assert_eq!(*path.last().unwrap(), Point::new(14, 14));
                    assert_path_is_legal(&g, &path, mode);
                }
            }
        }
    }

    #[test]
    fn barrier_free_cardinal_paths_match_manhattan() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            let size = 12;
            let start = Point::new(rng.random_range(0..size), rng.random_range(0..size));
            let end = Point::new(rng.random_range(0..size), rng.random_range(0..size));
            let mut g = Grid::new(size, size * 16);
            g.set_role(start, Role::Start).unwrap();
            g.set_role(end, Role::End).unwrap();
            g.refresh_adjacency(MoveMode::Cardinal);
            let path = find_path(&mut g, MoveMode::Cardinal, &mut NullObserver)
                .unwrap()
                .unwrap();
            assert_eq!(path.len() as i32, manhattan(start, end) + 1);
        }
    }

    // -----------------------------------------------------------------------
    // Role marking and cancellation
    // -----------------------------------------------------------------------

    #[test]
    fn marks_roles_and_preserves_endpoints() {
        let mut g = open_grid(3, Point::new(0, 0), Point::new(2, 2), MoveMode::Cardinal);
        let path = find_path(&mut g, MoveMode::Cardinal, &mut NullObserver)
            .unwrap()
            .unwrap();
        assert_eq!(g.role(Point::new(0, 0)), Some(Role::Start));
        assert_eq!(g.role(Point::new(2, 2)), Some(Role::End));
        for &p in &path[1..path.len() - 1] {
            assert_eq!(g.role(p), Some(Role::Path));
        }
    }

    #[test]
    fn rerun_clears_previous_marks() {
        let mut g = open_grid(4, Point::new(0, 0), Point::new(3, 3), MoveMode::Cardinal);
        find_path(&mut g, MoveMode::Cardinal, &mut NullObserver).unwrap();
        // Second run on the same grid starts from a clean slate and
        // produces the same path.
        let path = find_path(&mut g, MoveMode::Cardinal, &mut NullObserver)
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn cancellation_is_honored_between_steps() {
        let mut g = open_grid(25, Point::new(0, 0), Point::new(24, 24), MoveMode::Cardinal);
        let mut obs = CancelAfter { steps: 3, seen: 0 };
        let outcome = search(&mut g, MoveMode::Cardinal, &mut obs).unwrap();
        assert!(matches!(outcome, SearchOutcome::Cancelled));
        assert_eq!(obs.seen, 3);
    }
}
