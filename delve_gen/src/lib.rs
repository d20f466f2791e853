// delve_gen — seeded 3D dungeon layout generation.
//
// Places non-overlapping box rooms on a voxel grid, connects their centers
// with a Delaunay graph, thins that graph to a minimum spanning tree plus a
// few loop edges, and carves grid-aligned hallways along the kept edges with
// A*. The crate has no rendering or engine dependencies; `delve_cli` is the
// thin binary on top of it.
//
// Module overview:
// - `dungeon.rs`:     `Dungeon::generate()`, one full pass in stage order.
// - `config.rs`:      DungeonConfig + nested stage params, presets, validation.
// - `types.rs`:       GridCoord, GridBounds, Tile, Point3, Room.
// - `grid.rs`:        Dense 3D tile grid (the layout's spatial truth).
// - `placement.rs`:   Rejection-sampling room placement.
// - `delaunay.rs`:    Bowyer–Watson tetrahedralisation, planar fallback.
// - `graph.rs`:       Edge type and the deduplicated room graph.
// - `mst.rs`:         Prim's spanning tree and reservoir-sampled loop edges.
// - `pathfinding.rs`: Dense-array A* over the grid.
// - `hallway.rs`:     Tile costs and hallway carving per connection.
// - `stats.rs`:       LayoutStats, the per-pass diagnostics.
// - `error.rs`:       GenError / GenResult.
// - `prng`:           Re-exported from `delve_prng`: xoshiro256++ PRNG with SplitMix64 seeding.
//
// **Critical constraint: determinism.** A pass is a pure function of its
// `DungeonConfig`. All randomness comes from one seeded `DelveRng`. No
// `HashMap` iteration, no system time, no OS entropy. Use `BTreeMap` and
// `BTreeSet` for anything that is iterated.

pub mod config;
pub mod delaunay;
pub mod dungeon;
pub mod error;
pub mod graph;
pub mod grid;
pub mod hallway;
pub mod mst;
pub mod pathfinding;
pub mod placement;
pub use delve_prng as prng;
pub mod stats;
pub mod types;

pub use config::DungeonConfig;
pub use dungeon::Dungeon;
pub use error::{GenError, GenResult};
