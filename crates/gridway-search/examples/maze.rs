//! Search an ASCII maze, print the solved grid, then replay the recorded
//! run frame by frame.
//!
//! ```sh
//! cargo run --example maze
//! ```

use gridway_core::{Grid, MoveMode};
use gridway_search::{TraceRecorder, find_path};

const MAZE: &str = "\
S.........
.####.###.
.#....#.#.
.#.####.#.
.#.#..#.#.
.#.#.##.#.
.#.#....#.
.#.######.
.#.......E
.#########";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mode = MoveMode::Diagonal;
    let mut grid = Grid::from_ascii(MAZE, 800)?;
    grid.refresh_adjacency(mode);

    let mut recorder = TraceRecorder::new(&grid);
    match find_path(&mut grid, mode, &mut recorder)? {
        Some(path) => println!("found a {}-cell path:\n{grid}\n", path.len()),
        None => {
            println!("no path exists:\n{grid}");
            return Ok(());
        }
    }

    // Replay the recording onto a fresh copy of the maze.
    let trace = recorder.into_trace();
    let mut replay_grid = Grid::from_ascii(MAZE, 800)?;
    let mut step = 0usize;
    trace.replay(&mut replay_grid, |g| {
        step += 1;
        if step % 10 == 0 {
            println!("step {step}:\n{g}\n");
        }
    })?;
    println!("replayed {} steps:\n{replay_grid}", trace.len());

    Ok(())
}
