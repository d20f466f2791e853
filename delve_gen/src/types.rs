// Core types shared across the generator.
//
// Defines integer grid coordinates (`GridCoord`), grid extents and the flat
// index scheme (`GridBounds`), the float `Point3` used by the geometry stages,
// tile states, and the `Room` record. All types derive `Serialize` and
// `Deserialize` so a finished `Dungeon` can be exported as JSON.
//
// The flat index is `x + y * size_x + z * size_x * size_y`. Both the tile grid
// (`grid.rs`) and the pathfinder's per-cell state arrays (`pathfinding.rs`)
// use `GridBounds::flat_index`, so a cell has the same index everywhere.
//
// **Critical constraint: determinism.** `Point3` has a total order (via
// `f64::total_cmp`) so it can key `BTreeSet`/`BTreeMap` and every stage
// iterates in a reproducible order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Integer grid space
// ---------------------------------------------------------------------------

/// A cell position in the 3D tile grid.
///
/// Y is the vertical axis; a flat dungeon has `bounds.y == 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs()
            + (self.y - other.y).unsigned_abs()
            + (self.z - other.z).unsigned_abs()
    }

    /// The six face-adjacent unit offsets (±x, ±y, ±z).
    pub const FACE_OFFSETS: [GridCoord; 6] = [
        GridCoord::new(1, 0, 0),
        GridCoord::new(-1, 0, 0),
        GridCoord::new(0, 1, 0),
        GridCoord::new(0, -1, 0),
        GridCoord::new(0, 0, 1),
        GridCoord::new(0, 0, -1),
    ];
}

impl Add for GridCoord {
    type Output = GridCoord;

    fn add(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Extents of the tile grid. Every axis is at least 1 for a usable grid
/// (enforced by config validation, not here).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridBounds {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Total number of cells.
    pub fn volume(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Check whether a coordinate is inside the grid.
    pub fn contains(self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.x
            && (coord.y as u32) < self.y
            && (coord.z as u32) < self.z
    }

    /// Flat array index of a coordinate: `x + y * size_x + z * size_x * size_y`.
    /// Returns `None` if out of bounds.
    pub fn flat_index(self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let sx = self.x as usize;
        let sy = self.y as usize;
        Some(coord.x as usize + coord.y as usize * sx + coord.z as usize * sx * sy)
    }

    /// Inverse of `flat_index`. The index must be `< volume()`.
    pub fn coord_of(self, index: usize) -> GridCoord {
        let sx = self.x as usize;
        let sy = self.y as usize;
        let x = index % sx;
        let y = (index / sx) % sy;
        let z = index / (sx * sy);
        GridCoord::new(x as i32, y as i32, z as i32)
    }
}

impl fmt::Display for GridBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Room,
    Hallway,
}

// ---------------------------------------------------------------------------
// Float geometry space
// ---------------------------------------------------------------------------

/// A point in continuous 3D space, in grid units.
///
/// Equality, ordering and hashing are bitwise-total (`total_cmp`), which is
/// what the sets and lookups in the graph stages need: two points are the same
/// vertex only if they were produced from the same room.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length of the position vector.
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn distance_squared(self, other: Point3) -> f64 {
        (self - other).length_squared()
    }

    pub fn distance(self, other: Point3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn scale(self, k: f64) -> Point3 {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point3 {}

// Consistent with `Eq`: `total_cmp` equality is bit equality.
impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.z.to_bits().hash(state);
    }
}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// Index of a room in placement order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// An axis-aligned box of `Room` tiles. Immutable once placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Minimum corner.
    pub position: GridCoord,
    /// Extent per axis, each at least 1.
    pub size: GridCoord,
}

impl Room {
    /// One past the maximum corner on every axis.
    pub fn max_corner(&self) -> GridCoord {
        self.position + self.size
    }

    /// Geometric center, used as the room's triangulation vertex.
    pub fn center(&self) -> Point3 {
        Point3::new(
            self.position.x as f64 + self.size.x as f64 / 2.0,
            self.position.y as f64 + self.size.y as f64 / 2.0,
            self.position.z as f64 + self.size.z as f64 / 2.0,
        )
    }

    /// The grid cell hallways attach to. Always inside the room.
    pub fn center_cell(&self) -> GridCoord {
        GridCoord::new(
            self.position.x + self.size.x / 2,
            self.position.y + self.size.y / 2,
            self.position.z + self.size.z / 2,
        )
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        let max = self.max_corner();
        coord.x >= self.position.x
            && coord.y >= self.position.y
            && coord.z >= self.position.z
            && coord.x < max.x
            && coord.y < max.y
            && coord.z < max.z
    }

    /// Whether two rooms share at least one cell. Touching faces do not count.
    pub fn intersects(&self, other: &Room) -> bool {
        let a_max = self.max_corner();
        let b_max = other.max_corner();
        self.position.x < b_max.x
            && other.position.x < a_max.x
            && self.position.y < b_max.y
            && other.position.y < a_max.y
            && self.position.z < b_max.z
            && other.position.z < a_max.z
    }

    /// Every cell covered by the room, x fastest.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let max = self.max_corner();
        (self.position.z..max.z).flat_map(move |z| {
            (self.position.y..max.y)
                .flat_map(move |y| (self.position.x..max.x).map(move |x| GridCoord::new(x, y, z)))
        })
    }

    pub fn volume(&self) -> usize {
        self.size.x as usize * self.size.y as usize * self.size.z as usize
    }
}
