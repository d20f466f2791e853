// One generation pass, start to finish.
//
// `Dungeon::generate()` validates the config and then runs the stages in
// strict sequence, each consuming the previous stage's full output:
//
//   1. place rooms into a fresh grid          (`placement.rs`)
//   2. build the Delaunay edge set            (`graph.rs`, `delaunay.rs`)
//   3. spanning tree from the first room, plus loop edges (`mst.rs`)
//   4. carve a hallway per retained edge      (`hallway.rs`, `pathfinding.rs`)
//   5. summarise                              (`stats.rs`)
//
// The grid, RNG and every intermediate collection are created inside the
// call, so nothing carries over between passes.
//
// **Critical constraint: determinism.** One `DelveRng` seeded from
// `config.seed` drives the whole pass: placement draws first, then loop-edge
// sampling. Two calls with equal configs produce equal dungeons.

use crate::config::DungeonConfig;
use crate::error::{GenError, GenResult};
use crate::graph::{self, Edge};
use crate::grid::TileGrid;
use crate::hallway::{self, Hallway};
use crate::mst;
use crate::pathfinding::GridPathfinder;
use crate::placement;
use crate::stats::LayoutStats;
use crate::types::{Point3, Room};
use delve_prng::DelveRng;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// The output of one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub seed: u64,
    pub rooms: Vec<Room>,
    pub grid: TileGrid,
    /// Spanning-tree edges in the order they were added, then loop edges.
    pub connections: Vec<Edge>,
    /// One record per connection, in connection order.
    pub hallways: Vec<Hallway>,
    pub stats: LayoutStats,
}

impl Dungeon {
    pub fn generate(config: &DungeonConfig) -> GenResult<Self> {
        config.validate()?;
        let mut rng = DelveRng::new(config.seed);
        let mut grid = TileGrid::new(config.bounds);

        let rooms = placement::place_rooms(&mut grid, &config.rooms, &mut rng);
        info!(
            "placed {}/{} rooms in {}",
            rooms.len(),
            config.rooms.target_count,
            config.bounds
        );
        let Some(first) = rooms.first() else {
            return Err(GenError::NoRoomsPlaced {
                target: config.rooms.target_count,
                attempts: config.rooms.attempts,
            });
        };

        let centers: Vec<Point3> = rooms.iter().map(Room::center).collect();
        let candidates = graph::build_room_graph(&centers)?;
        let connections = mst::select_connections(
            &candidates,
            first.center(),
            config.connections.edges_to_keep as usize,
            &mut rng,
        );
        info!(
            "kept {} of {} candidate connections",
            connections.len(),
            candidates.len()
        );

        let mut pathfinder = GridPathfinder::new(config.bounds);
        let hallways = hallway::carve_hallways(
            &mut grid,
            &rooms,
            &connections,
            &config.hallways,
            &mut pathfinder,
        );

        let stats = LayoutStats::compute(
            config.rooms.target_count,
            &rooms,
            &connections,
            &hallways,
            &grid,
        );
        if stats.unreached_rooms > 0 {
            warn!(
                "{} of {} rooms are not connected to the first room",
                stats.unreached_rooms, stats.placed_rooms
            );
        }
        info!(
            "carved {} hallway cells ({} routes failed)",
            stats.hallway_cells, stats.failed_paths
        );

        Ok(Self {
            seed: config.seed,
            rooms,
            grid,
            connections,
            hallways,
            stats,
        })
    }

    pub fn to_json(&self) -> GenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every horizontal layer, bottom up, as a titled ASCII map.
    pub fn render_slices(&self) -> String {
        let mut out = String::new();
        for y in 0..self.grid.bounds().y as i32 {
            out.push_str(&format!("y = {y}\n"));
            out.push_str(&self.grid.render_layer(y));
            out.push('\n');
        }
        out
    }
}
