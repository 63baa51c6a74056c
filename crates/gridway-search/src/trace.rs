//! Step recording and replay.
//!
//! A [`TraceRecorder`] sits on the observer seam and captures one
//! [`TraceFrame`] (the set of role changes since the previous step) per
//! notification. The finished [`SearchTrace`] can be replayed onto a fresh
//! grid at whatever pace the host chooses, reproducing the run's frontier
//! growth and path marking step by step without re-searching.

use gridway_core::{Grid, GridError, Point, Role};

use crate::observer::SearchObserver;

/// The role changes of one step, relative to the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceFrame {
    pub cells: Vec<(Point, Role)>,
}

/// An ordered sequence of step frames recorded from one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchTrace {
    frames: Vec<TraceFrame>,
}

impl SearchTrace {
    /// The recorded frames, in step order.
    #[inline]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    /// Number of recorded steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Apply the frames in order to `grid`, invoking `sink` after each
    /// frame.
    ///
    /// The grid should be in the state the recording started from
    /// (typically a fresh parse of the same layout). Fails with
    /// [`GridError::OutOfBounds`] if a recorded cell does not fit.
    pub fn replay(
        &self,
        grid: &mut Grid,
        mut sink: impl FnMut(&Grid),
    ) -> Result<(), GridError> {
        for frame in &self.frames {
            for &(p, role) in &frame.cells {
                grid.set_role(p, role)?;
            }
            sink(grid);
        }
        Ok(())
    }
}

/// A [`SearchObserver`] that records per-step role diffs.
pub struct TraceRecorder {
    size: i32,
    prev: Vec<Role>,
    trace: SearchTrace,
}

impl TraceRecorder {
    /// Snapshot `grid`'s current roles as the baseline.
    pub fn new(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            prev: snapshot(grid),
            trace: SearchTrace::default(),
        }
    }

    /// Finish recording and return the trace.
    pub fn into_trace(self) -> SearchTrace {
        self.trace
    }
}

fn snapshot(grid: &Grid) -> Vec<Role> {
    let size = grid.size();
    let mut roles = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            roles.push(grid.role(Point::new(x, y)).unwrap_or_default());
        }
    }
    roles
}

impl SearchObserver for TraceRecorder {
    fn on_step(&mut self, grid: &Grid) {
        let mut cells = Vec::new();
        for y in 0..self.size {
            for x in 0..self.size {
                let p = Point::new(x, y);
                let Some(role) = grid.role(p) else { continue };
                let i = (y * self.size + x) as usize;
                if role != self.prev[i] {
                    self.prev[i] = role;
                    cells.push((p, role));
                }
            }
        }
        self.trace.frames.push(TraceFrame { cells });
    }
}
