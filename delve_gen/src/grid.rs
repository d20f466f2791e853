// Dense 3D tile grid for the dungeon.
//
// The grid is stored as a flat `Vec<Tile>` indexed by
// `x + y * size_x + z * size_x * size_y` (see `GridBounds::flat_index`),
// giving O(1) read/write access. Out-of-bounds reads return `Empty`;
// out-of-bounds writes are no-ops.
//
// One `TileGrid` is owned by a generation pass and handed by `&mut` to each
// stage in turn. Each stage writes only its own tile kind: room placement
// writes `Room` (`placement.rs`), hallway carving writes `Hallway`
// (`hallway.rs`). Nothing ever writes `Empty` back, so the grid only fills up.
//
// See also: `types.rs` for `GridBounds` and the index scheme, `dungeon.rs`
// which creates the grid fresh for every pass.

use crate::types::{GridBounds, GridCoord, Tile};
use serde::{Deserialize, Serialize};

/// Dense 3D tile grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    bounds: GridBounds,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with `Empty`.
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            tiles: vec![Tile::Empty; bounds.volume()],
        }
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        self.bounds.contains(coord)
    }

    /// Read a tile. Returns `Empty` for out-of-bounds coordinates.
    pub fn get(&self, coord: GridCoord) -> Tile {
        self.bounds
            .flat_index(coord)
            .map(|i| self.tiles[i])
            .unwrap_or(Tile::Empty)
    }

    /// Write a tile. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: GridCoord, tile: Tile) {
        if let Some(i) = self.bounds.flat_index(coord) {
            self.tiles[i] = tile;
        }
    }

    /// True if the box `[min, min + size)` lies fully inside the grid and every
    /// cell in it is `Empty`.
    pub fn is_box_empty(&self, min: GridCoord, size: GridCoord) -> bool {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return false;
        }
        let max = min + size;
        let last = GridCoord::new(max.x - 1, max.y - 1, max.z - 1);
        if !self.in_bounds(min) || !self.in_bounds(last) {
            return false;
        }
        for z in min.z..max.z {
            for y in min.y..max.y {
                for x in min.x..max.x {
                    if self.get(GridCoord::new(x, y, z)) != Tile::Empty {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Set every in-bounds cell of the box `[min, min + size)` to `tile`.
    pub fn fill_box(&mut self, min: GridCoord, size: GridCoord, tile: Tile) {
        let max = min + size;
        for z in min.z..max.z {
            for y in min.y..max.y {
                for x in min.x..max.x {
                    self.set(GridCoord::new(x, y, z), tile);
                }
            }
        }
    }

    /// Number of cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Coordinates of every cell holding `tile`, in flat-index order.
    pub fn cells_of(&self, tile: Tile) -> Vec<GridCoord> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == tile)
            .map(|(i, _)| self.bounds.coord_of(i))
            .collect()
    }

    /// Raw tile slice in flat-index order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Render one horizontal layer (fixed y) as text: `.` empty, `#` room,
    /// `+` hallway. Rows are z, columns are x.
    pub fn render_layer(&self, y: i32) -> String {
        let mut out = String::with_capacity((self.bounds.x as usize + 1) * self.bounds.z as usize);
        for z in 0..self.bounds.z as i32 {
            for x in 0..self.bounds.x as i32 {
                out.push(match self.get(GridCoord::new(x, y, z)) {
                    Tile::Empty => '.',
                    Tile::Room => '#',
                    Tile::Hallway => '+',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_empty() {
        let grid = TileGrid::new(GridBounds::new(4, 2, 3));
        assert_eq!(grid.tiles().len(), 24);
        assert_eq!(grid.count(Tile::Empty), 24);
    }

    #[test]
    fn set_and_get() {
        let mut grid = TileGrid::new(GridBounds::new(8, 8, 8));
        let coord = GridCoord::new(3, 5, 2);
        grid.set(coord, Tile::Room);
        assert_eq!(grid.get(coord), Tile::Room);
        assert_eq!(grid.get(GridCoord::new(3, 5, 3)), Tile::Empty);
    }

    #[test]
    fn out_of_bounds_read_returns_empty() {
        let grid = TileGrid::new(GridBounds::new(4, 4, 4));
        assert_eq!(grid.get(GridCoord::new(-1, 0, 0)), Tile::Empty);
        assert_eq!(grid.get(GridCoord::new(4, 0, 0)), Tile::Empty);
        assert_eq!(grid.get(GridCoord::new(100, 100, 100)), Tile::Empty);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut grid = TileGrid::new(GridBounds::new(4, 4, 4));
        grid.set(GridCoord::new(-1, 0, 0), Tile::Room);
        grid.set(GridCoord::new(100, 0, 0), Tile::Room);
        assert_eq!(grid.count(Tile::Room), 0);
    }

    #[test]
    fn default_grid_is_empty() {
        let grid = TileGrid::default();
        assert_eq!(grid.bounds().volume(), 0);
        assert_eq!(grid.get(GridCoord::new(0, 0, 0)), Tile::Empty);
    }

    #[test]
    fn box_checks_respect_bounds_and_occupancy() {
        let mut grid = TileGrid::new(GridBounds::new(10, 1, 10));
        let size = GridCoord::new(3, 1, 3);
        assert!(grid.is_box_empty(GridCoord::new(0, 0, 0), size));
        assert!(grid.is_box_empty(GridCoord::new(7, 0, 7), size));
        // Sticks out on +x.
        assert!(!grid.is_box_empty(GridCoord::new(8, 0, 0), size));
        // Sticks out on y.
        assert!(!grid.is_box_empty(GridCoord::new(0, 0, 0), GridCoord::new(1, 2, 1)));

        grid.fill_box(GridCoord::new(2, 0, 2), size, Tile::Room);
        assert_eq!(grid.count(Tile::Room), 9);
        assert!(!grid.is_box_empty(GridCoord::new(4, 0, 4), size));
        assert!(grid.is_box_empty(GridCoord::new(5, 0, 5), size));
    }

    #[test]
    fn zero_sized_box_is_never_placeable() {
        let grid = TileGrid::new(GridBounds::new(4, 4, 4));
        assert!(!grid.is_box_empty(GridCoord::new(0, 0, 0), GridCoord::new(0, 1, 1)));
    }

    #[test]
    fn cells_of_lists_in_flat_order() {
        let mut grid = TileGrid::new(GridBounds::new(3, 1, 3));
        grid.set(GridCoord::new(2, 0, 0), Tile::Hallway);
        grid.set(GridCoord::new(0, 0, 1), Tile::Hallway);
        assert_eq!(
            grid.cells_of(Tile::Hallway),
            vec![GridCoord::new(2, 0, 0), GridCoord::new(0, 0, 1)]
        );
    }

    #[test]
    fn render_layer_draws_tiles() {
        let mut grid = TileGrid::new(GridBounds::new(3, 1, 2));
        grid.set(GridCoord::new(0, 0, 0), Tile::Room);
        grid.set(GridCoord::new(1, 0, 0), Tile::Hallway);
        assert_eq!(grid.render_layer(0), "#+.\n...\n");
    }
}
