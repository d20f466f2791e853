// Rejection-sampling room placement.
//
// For each of `target_count` room slots a min-corner position is drawn once,
// uniformly from `[0, bounds - min_size]` per axis. Up to `attempts` sizes are
// then drawn, uniformly from `[min_size, max_size)` per axis; the first size
// whose box lies inside the grid over only `Empty` cells wins, its cells are
// marked `Room`, and the slot is done. A slot whose attempts all fail is
// skipped silently, so the returned list can be shorter than the target.
// Callers must read the placed count from the result.
//
// See also: `grid.rs` for the box tests, `config.rs` for `RoomParams`,
// `dungeon.rs` which runs placement as the first stage of a pass.
//
// **Critical constraint: determinism.** RNG draws happen in a fixed order:
// position x, y, z once per slot, then size x, y, z per attempt. An axis whose
// size range is a single value consumes no draw.

use crate::config::RoomParams;
use crate::grid::TileGrid;
use crate::types::{GridCoord, Room, RoomId, Tile};
use delve_prng::DelveRng;
use log::debug;

/// Place up to `params.target_count` non-overlapping rooms into `grid`.
///
/// Rooms are returned in placement order with sequential `RoomId`s.
pub fn place_rooms(grid: &mut TileGrid, params: &RoomParams, rng: &mut DelveRng) -> Vec<Room> {
    let bounds = grid.bounds();
    let max_start = GridCoord::new(
        bounds.x as i32 - params.min_size.x,
        bounds.y as i32 - params.min_size.y,
        bounds.z as i32 - params.min_size.z,
    );
    if max_start.x < 0 || max_start.y < 0 || max_start.z < 0 {
        debug!("minimum room size {:?} does not fit in {bounds}", params.min_size);
        return Vec::new();
    }

    let mut rooms = Vec::with_capacity(params.target_count as usize);
    for slot in 0..params.target_count {
        let position = GridCoord::new(
            rng.range_i32_inclusive(0, max_start.x),
            rng.range_i32_inclusive(0, max_start.y),
            rng.range_i32_inclusive(0, max_start.z),
        );

        match try_place(grid, position, params, rng) {
            Some(size) => {
                grid.fill_box(position, size, Tile::Room);
                rooms.push(Room {
                    id: RoomId(rooms.len() as u32),
                    position,
                    size,
                });
            }
            None => debug!(
                "room slot {slot} at {position} skipped after {} attempts",
                params.attempts
            ),
        }
    }
    rooms
}

/// Draw sizes until one fits at `position`. Returns the accepted size.
fn try_place(
    grid: &TileGrid,
    position: GridCoord,
    params: &RoomParams,
    rng: &mut DelveRng,
) -> Option<GridCoord> {
    for _ in 0..params.attempts {
        let size = GridCoord::new(
            draw_extent(rng, params.min_size.x, params.max_size.x),
            draw_extent(rng, params.min_size.y, params.max_size.y),
            draw_extent(rng, params.min_size.z, params.max_size.z),
        );
        if grid.is_box_empty(position, size) {
            return Some(size);
        }
    }
    None
}

/// Uniform extent in `[min, max)`, or exactly `min` when the range is empty.
fn draw_extent(rng: &mut DelveRng, min: i32, max: i32) -> i32 {
    if max <= min {
        min
    } else {
        rng.range_i32(min, max)
    }
}
