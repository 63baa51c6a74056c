//! The [`Grid`] type — a square matrix of [`Role`]s with a rebuildable
//! adjacency cache.
//!
//! Barriers may change between searches, so adjacency is not a persistent
//! edge set: [`Grid::refresh_adjacency`] recomputes every cell's neighbour
//! list from the current barrier layout, and searches operate purely off
//! those cached lists. The diagonal corner-cut rule is the exception: it
//! depends on the moving pair, not on a single cell, so it is evaluated
//! against live roles at traversal time via [`Grid::diagonal_blocked`].

use std::fmt;

use crate::geom::Point;
use crate::role::Role;

// ---------------------------------------------------------------------------
// MoveMode
// ---------------------------------------------------------------------------

/// Movement mode: which adjacency policy (and, in the search crate, which
/// matching heuristic) a run uses.
///
/// The pairing is fixed by construction: cardinal movement pairs with the
/// Manhattan estimate, diagonal movement with the Euclidean one. Mixing
/// them would break admissibility, so no API exposes a crossed pairing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveMode {
    /// 4-way movement: up, right, down, left.
    Cardinal,
    /// 8-way movement including diagonals, with corner-cut blocking.
    Diagonal,
}

impl fmt::Display for MoveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveMode::Cardinal => write!(f, "cardinal (4-way)"),
            MoveMode::Diagonal => write!(f, "diagonal (8-way)"),
        }
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors reported by grid configuration and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A position outside `[0, size)` on either axis.
    OutOfBounds { pos: Point, size: i32 },
    /// ASCII input rows of unequal width, or a non-square layout.
    InconsistentSize(String),
    /// A character with no role mapping in ASCII input.
    InvalidGlyph { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos, size } => {
                write!(f, "position {pos} outside {size}x{size} grid")
            }
            Self::InconsistentSize(s) => write!(f, "grid is not square:\n{s}"),
            Self::InvalidGlyph { ch, pos } => {
                write!(f, "invalid glyph \u{201c}{ch}\u{201d} at {}", pos)
            }
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

const NO_NEIGHBORS: &[Point] = &[];

/// A square `size × size` matrix of [`Role`]s.
///
/// The grid owns all cells for its lifetime; cells are created once at
/// construction and only their roles mutate afterwards. Alongside the role
/// matrix it tracks the start/end positions, the per-cell neighbour lists
/// built by the last [`refresh_adjacency`](Grid::refresh_adjacency) pass,
/// and uniform pixel geometry for presentation layers.
#[derive(Debug, Clone)]
pub struct Grid {
    size: i32,
    cell_px: i32,
    cells: Vec<Role>,
    start: Option<Point>,
    end: Option<Point>,
    neighbors: Vec<Vec<Point>>,
    adjacency: Option<MoveMode>,
}

impl Grid {
    /// Create a `size × size` grid of `Empty` cells.
    ///
    /// `pixel_width` is the presentation width of the whole grid; each cell
    /// gets a uniform `pixel_width / size` square. Pixel geometry is a
    /// configuration value only; no search behaviour depends on it.
    pub fn new(size: i32, pixel_width: i32) -> Self {
        let size = size.max(0);
        let len = (size * size) as usize;
        Self {
            size,
            cell_px: if size > 0 { pixel_width / size } else { 0 },
            cells: vec![Role::Empty; len],
            start: None,
            end: None,
            neighbors: vec![Vec::new(); len],
            adjacency: None,
        }
    }

    /// Cells per side.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Pixel size of one cell.
    #[inline]
    pub fn cell_size(&self) -> i32 {
        self.cell_px
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.size && p.y < self.size
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y * self.size + p.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    fn point(&self, idx: usize) -> Point {
        Point::new(idx as i32 % self.size, idx as i32 / self.size)
    }

    /// The role at `p`, or `None` if out of bounds.
    #[inline]
    pub fn role(&self, p: Point) -> Option<Role> {
        self.idx(p).map(|i| self.cells[i])
    }

    /// The current start position, if one is set.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// The current end position, if one is set.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Set the role at `p`, overwriting whatever was there.
    ///
    /// The caller is responsible for Start/End uniqueness: assigning a
    /// second `Start` without clearing the first leaves the old cell's role
    /// untouched, and the tracked [`start`](Grid::start) position follows
    /// the most recent assignment. Mutations that change barrier-ness
    /// invalidate the adjacency cache.
    pub fn set_role(&mut self, p: Point, role: Role) -> Result<(), GridError> {
        match self.idx(p) {
            Some(i) => {
                self.apply_role(i, p, role);
                Ok(())
            }
            None => Err(GridError::OutOfBounds {
                pos: p,
                size: self.size,
            }),
        }
    }

    /// Infallible role assignment for presentation marking; does nothing
    /// out of bounds. Used by the search engine for Frontier/Visited/Path
    /// marks on positions it already knows to be valid.
    pub fn mark(&mut self, p: Point, role: Role) {
        if let Some(i) = self.idx(p) {
            self.apply_role(i, p, role);
        }
    }

    fn apply_role(&mut self, i: usize, p: Point, role: Role) {
        let old = self.cells[i];
        if old == role {
            return;
        }
        if old == Role::Start {
            self.start = None;
        }
        if old == Role::End {
            self.end = None;
        }
        match role {
            Role::Start => self.start = Some(p),
            Role::End => self.end = Some(p),
            _ => {}
        }
        // Only barrier changes affect adjacency; search marks never do.
        if (old == Role::Barrier) != (role == Role::Barrier) {
            self.adjacency = None;
        }
        self.cells[i] = role;
    }

    /// Reset every cell to `Empty` and unset start/end (full rebuild).
    pub fn clear(&mut self) {
        self.cells.fill(Role::Empty);
        self.start = None;
        self.end = None;
        self.adjacency = None;
        for list in &mut self.neighbors {
            list.clear();
        }
    }

    /// Reset transient search marks (Frontier/Visited/Path) to `Empty`,
    /// preserving Start, End and Barrier cells. The engine calls this at
    /// the start of every run so reruns begin from a clean slate.
    pub fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            if cell.is_search_mark() {
                *cell = Role::Empty;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Adjacency
    // -----------------------------------------------------------------------

    /// Recompute every cell's neighbour list from the current barrier
    /// layout, under the given movement mode.
    ///
    /// A neighbour is an in-bounds, non-barrier cell at one of the mode's
    /// offsets, enumerated in the fixed order documented on
    /// [`Point::neighbors_4`] / [`Point::neighbors_8`]. Must be called
    /// after any barrier mutation and before a search; the engine rejects
    /// runs whose mode does not match the last refresh.
    pub fn refresh_adjacency(&mut self, mode: MoveMode) {
        for i in 0..self.cells.len() {
            let p = self.point(i);
            let mut list = std::mem::take(&mut self.neighbors[i]);
            list.clear();
            let n4;
            let n8;
            let candidates: &[Point] = match mode {
                MoveMode::Cardinal => {
                    n4 = p.neighbors_4();
                    &n4
                }
                MoveMode::Diagonal => {
                    n8 = p.neighbors_8();
                    &n8
                }
            };
            for &np in candidates {
                if let Some(j) = self.idx(np) {
                    if !self.cells[j].is_barrier() {
                        list.push(np);
                    }
                }
            }
            self.neighbors[i] = list;
        }
        self.adjacency = Some(mode);
    }

    /// The mode of the last adjacency refresh, or `None` if the cache is
    /// stale (never refreshed, or invalidated by a barrier mutation).
    #[inline]
    pub fn adjacency_mode(&self) -> Option<MoveMode> {
        self.adjacency
    }

    /// The cached neighbour list of `p` (empty when out of bounds or
    /// before the first refresh).
    pub fn neighbors(&self, p: Point) -> &[Point] {
        match self.idx(p) {
            Some(i) => &self.neighbors[i],
            None => NO_NEIGHBORS,
        }
    }

    /// Corner-cut rule: whether the diagonal step `from → to` is blocked
    /// because **both** flanking orthogonal cells are barriers.
    ///
    /// Evaluated against live roles: the rule is relative to the moving
    /// pair, so it cannot be folded into the per-cell adjacency lists.
    /// Returns `false` for non-diagonal steps.
    pub fn diagonal_blocked(&self, from: Point, to: Point) -> bool {
        if !from.is_diagonal_to(to) {
            return false;
        }
        let flank_a = Point::new(from.x, to.y);
        let flank_b = Point::new(to.x, from.y);
        self.role(flank_a).is_some_and(Role::is_barrier)
            && self.role(flank_b).is_some_and(Role::is_barrier)
    }

    // -----------------------------------------------------------------------
    // Pixel geometry
    // -----------------------------------------------------------------------

    /// Top-left pixel of cell `p`.
    #[inline]
    pub fn pixel_origin(&self, p: Point) -> Point {
        Point::new(p.x * self.cell_px, p.y * self.cell_px)
    }

    /// The cell under pixel `(px, py)`, or `None` outside the grid.
    pub fn cell_at_pixel(&self, px: i32, py: i32) -> Option<Point> {
        if self.cell_px <= 0 || px < 0 || py < 0 {
            return None;
        }
        let p = Point::new(px / self.cell_px, py / self.cell_px);
        if self.contains(p) { Some(p) } else { None }
    }

    // -----------------------------------------------------------------------
    // ASCII fixtures
    // -----------------------------------------------------------------------

    /// Parse a grid from glyph rows (see [`Role::glyph`] for the mapping).
    ///
    /// The input must be square: equal-width rows, as many rows as columns.
    pub fn from_ascii(text: &str, pixel_width: i32) -> Result<Grid, GridError> {
        let lines: Vec<&str> = text.trim().lines().map(str::trim_end).collect();
        let size = lines.len();
        for line in &lines {
            if line.chars().count() != size {
                return Err(GridError::InconsistentSize(text.trim().to_string()));
            }
        }
        let mut grid = Grid::new(size as i32, pixel_width);
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let role = Role::from_glyph(ch).ok_or(GridError::InvalidGlyph { ch, pos: p })?;
                grid.set_role(p, role)?;
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    /// Render one glyph row per grid row (no trailing newline).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.size {
                write!(f, "{}", self.cells[(y * self.size + x) as usize].glyph())?;
            }
        }
        Ok(())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn role_and_mode_round_trip() {
        let json = serde_json::to_string(&Role::Frontier).unwrap();
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Frontier);

        let json = serde_json::to_string(&MoveMode::Diagonal).unwrap();
        let back: MoveMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MoveMode::Diagonal);
    }

    #[test]
    fn point_round_trip() {
        let p = Point::new(3, 7);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
