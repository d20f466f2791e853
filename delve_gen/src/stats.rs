// Per-pass layout statistics.
//
// `LayoutStats` is the summary a data-gathering harness reads back after each
// generation: how many rooms made it, how loopy and how vertical the
// connection graph is, and how much hallway was carved. It is computed once
// at the end of a pass from the pass's own outputs and never feeds back into
// generation. Aggregation across runs is left to the caller.
//
// See also: `dungeon.rs` which fills it in.

use crate::graph::Edge;
use crate::grid::TileGrid;
use crate::hallway::Hallway;
use crate::types::{Point3, Room, Tile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutStats {
    pub target_rooms: u32,
    pub placed_rooms: usize,
    /// `placed_rooms / target_rooms`, in `[0, 1]`.
    pub success_rate: f64,
    /// Retained edges (tree plus loops).
    pub connection_count: usize,
    /// Independent cycles: `connections - rooms + 1`, floored at 0.
    pub loops: usize,
    /// Connections whose endpoints differ by at least one unit in y.
    pub level_connections: usize,
    /// Connections whose endpoints differ by at least two units in y.
    pub discontinuous_level_connections: usize,
    /// Root mean square of room floor heights (`position.y`).
    pub vertical_spread: f64,
    pub hallway_cells: usize,
    /// Connections the pathfinder found no route for.
    pub failed_paths: usize,
    /// Rooms the retained connections do not join to the first room.
    pub unreached_rooms: usize,
}

impl LayoutStats {
    pub fn compute(
        target_rooms: u32,
        rooms: &[Room],
        connections: &[Edge],
        hallways: &[Hallway],
        grid: &TileGrid,
    ) -> Self {
        let placed_rooms = rooms.len();
        let success_rate = if target_rooms == 0 {
            0.0
        } else {
            placed_rooms as f64 / f64::from(target_rooms)
        };

        let connection_count = connections.len();
        let loops = (connection_count + 1).saturating_sub(placed_rooms);

        let level_connections = connections.iter().filter(|e| e.rise() >= 1.0).count();
        let discontinuous_level_connections =
            connections.iter().filter(|e| e.rise() >= 2.0).count();

        let vertical_spread = if rooms.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = rooms
                .iter()
                .map(|r| f64::from(r.position.y).powi(2))
                .sum();
            (sum_sq / placed_rooms as f64).sqrt()
        };

        Self {
            target_rooms,
            placed_rooms,
            success_rate,
            connection_count,
            loops,
            level_connections,
            discontinuous_level_connections,
            vertical_spread,
            hallway_cells: grid.count(Tile::Hallway),
            failed_paths: hallways.iter().filter(|h| !h.is_carved()).count(),
            unreached_rooms: placed_rooms - reached_from_first(rooms, connections),
        }
    }
}

/// Number of rooms connected to the first room through `connections`.
fn reached_from_first(rooms: &[Room], connections: &[Edge]) -> usize {
    let Some(first) = rooms.first() else {
        return 0;
    };
    let centers: BTreeSet<Point3> = rooms.iter().map(Room::center).collect();
    let mut reached = BTreeSet::from([first.center()]);
    loop {
        let before = reached.len();
        for e in connections {
            if reached.contains(&e.a) != reached.contains(&e.b) {
                reached.insert(e.a);
                reached.insert(e.b);
            }
        }
        if reached.len() == before {
            break;
        }
    }
    reached.intersection(&centers).count()
}
