//! The presentation-sink seam between the engine and its host.

use gridway_core::Grid;

/// Receives step notifications from a running search.
///
/// The engine invokes [`on_step`](SearchObserver::on_step) synchronously
/// after each frontier expansion and after each reconstructed path cell is
/// marked, and does not continue until the call returns. No payload is
/// passed beyond a borrow of the grid the search was given; the sink reads
/// current cell roles from it directly.
pub trait SearchObserver {
    /// Called after each expansion / path-marking step.
    fn on_step(&mut self, grid: &Grid);

    /// Polled at the top of every expansion-loop iteration; return `true`
    /// to end the run cooperatively. The engine has no other suspension
    /// point, so bounded-time search is layered on this hook rather than
    /// built into the loop.
    fn cancelled(&self) -> bool {
        false
    }
}

/// The no-op sink, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {
    fn on_step(&mut self, _grid: &Grid) {}
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_step(&mut self, grid: &Grid) {
        (**self).on_step(grid);
    }

    fn cancelled(&self) -> bool {
        (**self).cancelled()
    }
}
