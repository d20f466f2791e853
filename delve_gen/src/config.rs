// Data-driven generation configuration.
//
// Every tunable of a generation pass lives in `DungeonConfig`, loaded from
// JSON or built from a preset. The generator never uses magic numbers: room
// size ranges, placement attempts, loop-edge counts and hallway traversal
// costs are all read from here.
//
// Parameters are grouped into nested structs the way the stages consume them:
// `RoomParams` (placement), `ConnectionParams` (MST + loops) and
// `HallwayParams` (A* cost function). Named presets (`flat_demo()`, `tower()`)
// tune the same parameter set for different layouts.
//
// See also: `dungeon.rs` which validates the config and runs the pass,
// `placement.rs`, `mst.rs` and `hallway.rs` which read the sub-structs.
//
// **Critical constraint: determinism.** The same config (seed included)
// always produces the same dungeon.

use crate::error::{GenError, GenResult};
use crate::types::{GridBounds, GridCoord};
use serde::{Deserialize, Serialize};

/// Controls room placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomParams {
    /// Number of room slots to try. The placed count may be lower.
    pub target_count: u32,
    /// Size draws per room slot before the slot is given up.
    pub attempts: u32,
    /// Inclusive lower bound of the room extent per axis.
    pub min_size: GridCoord,
    /// Exclusive upper bound of the room extent per axis. Equal to `min_size`
    /// on an axis means every room has exactly that extent.
    pub max_size: GridCoord,
}

/// Controls which triangulation edges become hallways.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Extra non-tree edges kept on top of the minimum spanning tree to form
    /// loops.
    pub edges_to_keep: u32,
}

/// Per-cell entry costs for hallway pathfinding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HallwayParams {
    /// Cost of stepping into an Empty or Hallway cell.
    pub hallway_cost: i32,
    /// Cost of stepping into a Room cell. Higher than `hallway_cost` so paths
    /// prefer to go around rooms, but never impassable.
    pub room_cost: i32,
}

/// Complete configuration of one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonConfig {
    pub seed: u64,
    pub bounds: GridBounds,
    pub rooms: RoomParams,
    pub connections: ConnectionParams,
    pub hallways: HallwayParams,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bounds: GridBounds::new(32, 6, 32),
            rooms: RoomParams {
                target_count: 20,
                attempts: 10,
                min_size: GridCoord::new(3, 1, 3),
                max_size: GridCoord::new(7, 3, 7),
            },
            connections: ConnectionParams { edges_to_keep: 3 },
            hallways: HallwayParams {
                hallway_cost: 1,
                room_cost: 5,
            },
        }
    }
}

impl DungeonConfig {
    /// Small single-layer dungeon: 5 rooms on a 20x1x20 grid.
    pub fn flat_demo() -> Self {
        Self {
            seed: 0,
            bounds: GridBounds::new(20, 1, 20),
            rooms: RoomParams {
                target_count: 5,
                attempts: 10,
                min_size: GridCoord::new(2, 1, 2),
                max_size: GridCoord::new(4, 1, 4),
            },
            connections: ConnectionParams { edges_to_keep: 1 },
            ..Self::default()
        }
    }

    /// Narrow, tall footprint with many stacked levels.
    pub fn tower() -> Self {
        Self {
            seed: 0,
            bounds: GridBounds::new(12, 24, 12),
            rooms: RoomParams {
                target_count: 25,
                attempts: 15,
                min_size: GridCoord::new(2, 1, 2),
                max_size: GridCoord::new(5, 3, 5),
            },
            connections: ConnectionParams { edges_to_keep: 4 },
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> GenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations no pass could sensibly run with.
    pub fn validate(&self) -> GenResult<()> {
        let b = self.bounds;
        for (axis, extent) in [("x", b.x), ("y", b.y), ("z", b.z)] {
            if extent == 0 {
                return Err(GenError::invalid_config(format!(
                    "bounds.{axis} must be at least 1"
                )));
            }
            if extent > i32::MAX as u32 {
                return Err(GenError::invalid_config(format!(
                    "bounds.{axis} exceeds the addressable range"
                )));
            }
        }

        let rooms = &self.rooms;
        if rooms.target_count == 0 {
            return Err(GenError::invalid_config("rooms.target_count must be at least 1"));
        }
        if rooms.attempts == 0 {
            return Err(GenError::invalid_config("rooms.attempts must be at least 1"));
        }
        let axes = [
            ("x", rooms.min_size.x, rooms.max_size.x, b.x),
            ("y", rooms.min_size.y, rooms.max_size.y, b.y),
            ("z", rooms.min_size.z, rooms.max_size.z, b.z),
        ];
        for (axis, min, max, extent) in axes {
            if min < 1 {
                return Err(GenError::invalid_config(format!(
                    "rooms.min_size.{axis} must be at least 1, got {min}"
                )));
            }
            if max < min {
                return Err(GenError::invalid_config(format!(
                    "rooms.max_size.{axis} ({max}) is smaller than min_size ({min})"
                )));
            }
            if min as u32 > extent {
                return Err(GenError::invalid_config(format!(
                    "rooms.min_size.{axis} ({min}) does not fit in bounds ({extent})"
                )));
            }
            // `max_size` is exclusive, so the largest drawable extent is max - 1.
            if i64::from(max) > i64::from(extent) + 1 {
                return Err(GenError::invalid_config(format!(
                    "rooms.max_size.{axis} ({max}) exceeds bounds ({extent}) + 1"
                )));
            }
        }

        let h = &self.hallways;
        if h.hallway_cost < 1 || h.room_cost < 1 {
            return Err(GenError::invalid_config(
                "hallway costs must be at least 1 to keep the A* heuristic admissible",
            ));
        }
        Ok(())
    }
}
