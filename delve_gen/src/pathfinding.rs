// A* pathfinding over the dense tile grid.
//
// Standard A* with a `BinaryHeap` (min-heap via reversed ordering). Per-cell
// search state (g score, cached heuristic, came-from, visited, closed) lives
// in flat `Vec`s indexed by `GridBounds::flat_index`, the same index the tile
// grid uses. A `GridPathfinder` owns those arrays and resets them at the
// start of each search, so one allocation serves every hallway of a pass.
//
// Moves are the six face-adjacent unit steps. The caller supplies the cost of
// entering each cell: a non-negative cost is traversable, a negative one is a
// wall. The start cell's own cost is never counted. The heuristic is the
// Manhattan distance, which is admissible as long as every traversable cost
// is at least 1 (config validation guarantees that for hallway carving).
//
// Stale heap entries are skipped lazily when popped (the `closed` check).
// A cell counts as discovered only through its explicit `visited` flag; a
// came-from index of 0 is a real cell.
//
// See also: `hallway.rs` which supplies the tile-based cost function,
// `types.rs` for `GridCoord::FACE_OFFSETS`.
//
// **Critical constraint: determinism.** Equal-priority heap entries pop in
// push order (an insertion sequence breaks ties), and neighbors are expanded
// in the fixed `FACE_OFFSETS` order.

use crate::types::{GridBounds, GridCoord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// The result of a successful search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPath {
    /// Cells from start to goal, both inclusive.
    pub cells: Vec<GridCoord>,
    /// Sum of the entry costs of every cell after the start.
    pub total_cost: i64,
}

/// Entry in the A* open set (min-heap via reversed ordering).
struct OpenEntry {
    index: usize,
    f_score: i64,
    sequence: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.sequence == other.sequence
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_score, then earliest push, is
        // "greatest".
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Reusable A* search state for one grid size.
pub struct GridPathfinder {
    bounds: GridBounds,
    g_score: Vec<i64>,
    h_score: Vec<i64>,
    came_from: Vec<usize>,
    visited: Vec<bool>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenEntry>,
}

impl GridPathfinder {
    pub fn new(bounds: GridBounds) -> Self {
        let n = bounds.volume();
        Self {
            bounds,
            g_score: vec![0; n],
            h_score: vec![0; n],
            came_from: vec![0; n],
            visited: vec![false; n],
            closed: vec![false; n],
            open: BinaryHeap::new(),
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn reset(&mut self) {
        self.g_score.fill(0);
        self.h_score.fill(0);
        self.came_from.fill(0);
        self.visited.fill(false);
        self.closed.fill(false);
        self.open.clear();
    }

    /// Find the cheapest path from `start` to `goal`.
    ///
    /// `cost(cell)` is the price of stepping into `cell`; negative means
    /// impassable. Returns `None` if either endpoint is out of bounds or no
    /// path exists. Never returns a partial path.
    pub fn find_path<F>(&mut self, start: GridCoord, goal: GridCoord, cost: F) -> Option<GridPath>
    where
        F: Fn(GridCoord) -> i32,
    {
        let si = self.bounds.flat_index(start)?;
        let gi = self.bounds.flat_index(goal)?;
        if si == gi {
            return Some(GridPath {
                cells: vec![start],
                total_cost: 0,
            });
        }

        self.reset();
        let mut sequence = 0u64;

        self.visited[si] = true;
        self.h_score[si] = heuristic(start, goal);
        self.open.push(OpenEntry {
            index: si,
            f_score: self.h_score[si],
            sequence,
        });

        while let Some(current) = self.open.pop() {
            let ci = current.index;

            if ci == gi {
                return Some(self.reconstruct_path(si, gi));
            }

            if self.closed[ci] {
                continue;
            }
            self.closed[ci] = true;

            let here = self.bounds.coord_of(ci);
            let current_g = self.g_score[ci];

            for offset in GridCoord::FACE_OFFSETS {
                let next = here + offset;
                let Some(ni) = self.bounds.flat_index(next) else {
                    continue;
                };
                if self.closed[ni] {
                    continue;
                }
                let step = cost(next);
                if step < 0 {
                    continue;
                }

                let tentative_g = current_g + i64::from(step);
                if !self.visited[ni] || tentative_g < self.g_score[ni] {
                    if !self.visited[ni] {
                        self.visited[ni] = true;
                        self.h_score[ni] = heuristic(next, goal);
                    }
                    self.g_score[ni] = tentative_g;
                    self.came_from[ni] = ci;
                    sequence += 1;
                    self.open.push(OpenEntry {
                        index: ni,
                        f_score: tentative_g + self.h_score[ni],
                        sequence,
                    });
                }
            }
        }

        None // No path found.
    }

    /// Walk came-from links back from the goal, then reverse.
    fn reconstruct_path(&self, start: usize, goal: usize) -> GridPath {
        let mut cells = Vec::new();
        let mut current = goal;
        loop {
            cells.push(self.bounds.coord_of(current));
            if current == start {
                break;
            }
            current = self.came_from[current];
        }
        cells.reverse();

        GridPath {
            cells,
            total_cost: self.g_score[goal],
        }
    }
}

/// Admissible heuristic for unit-cost-or-more steps: Manhattan distance.
fn heuristic(from: GridCoord, to: GridCoord) -> i64 {
    i64::from(from.manhattan_distance(to))
}
