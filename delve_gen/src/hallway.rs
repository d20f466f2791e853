// Hallway carving along retained connections.
//
// Each connection edge joins two room centers. Both endpoints are mapped back
// to their rooms, and the pathfinder searches between the rooms' center cells
// with a tile-based cost: Empty and Hallway cells cost `hallway_cost`, Room
// cells cost `room_cost`. Nothing is impassable, so a hallway may cut through
// a third room when that is cheaper than walking around it. Only the Empty
// cells along a found path become Hallway; Room and existing Hallway cells are
// left as they are. Paths are searched in connection order, each against the
// grid as the previous one left it.
//
// A connection whose search fails is recorded with no path and the pass
// continues.
//
// See also: `pathfinding.rs` for the search, `config.rs` for
// `HallwayParams`, `dungeon.rs` which owns the pathfinder for a pass.

use crate::config::HallwayParams;
use crate::graph::Edge;
use crate::grid::TileGrid;
use crate::pathfinding::{GridPath, GridPathfinder};
use crate::types::{GridCoord, Point3, Room, RoomId, Tile};
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The carved route for one connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hallway {
    pub from: RoomId,
    pub to: RoomId,
    /// `None` when no route was found.
    pub path: Option<GridPath>,
}

impl Hallway {
    pub fn is_carved(&self) -> bool {
        self.path.is_some()
    }
}

/// Entry cost of `tile` under `params`.
pub fn tile_cost(tile: Tile, params: &HallwayParams) -> i32 {
    match tile {
        Tile::Empty | Tile::Hallway => params.hallway_cost,
        Tile::Room => params.room_cost,
    }
}

/// Carve one hallway per connection, in connection order.
///
/// Edges whose endpoints are not centers of `rooms` are skipped.
pub fn carve_hallways(
    grid: &mut TileGrid,
    rooms: &[Room],
    connections: &[Edge],
    params: &HallwayParams,
    pathfinder: &mut GridPathfinder,
) -> Vec<Hallway> {
    let by_center: FxHashMap<Point3, usize> = rooms
        .iter()
        .enumerate()
        .map(|(i, r)| (r.center(), i))
        .collect();

    let mut hallways = Vec::with_capacity(connections.len());
    for edge in connections {
        let (Some(&ia), Some(&ib)) = (by_center.get(&edge.a), by_center.get(&edge.b)) else {
            debug!("connection {} - {} does not join two rooms", edge.a, edge.b);
            continue;
        };
        let (from, to) = (&rooms[ia], &rooms[ib]);

        let path = {
            let grid: &TileGrid = grid;
            pathfinder.find_path(from.center_cell(), to.center_cell(), |cell| {
                tile_cost(grid.get(cell), params)
            })
        };

        match &path {
            Some(path) => carve(grid, &path.cells),
            None => debug!("no hallway route from room {} to room {}", from.id.0, to.id.0),
        }
        hallways.push(Hallway {
            from: from.id,
            to: to.id,
            path,
        });
    }
    hallways
}

/// Turn every Empty cell of `cells` into Hallway.
fn carve(grid: &mut TileGrid, cells: &[GridCoord]) {
    for &cell in cells {
        if grid.get(cell) == Tile::Empty {
            grid.set(cell, Tile::Hallway);
        }
    }
}
