// CLI entry point for the Delve dungeon generator.
//
// Builds a `DungeonConfig` (a preset, or a JSON file, with individual
// overrides on top), runs one generation pass and prints the result. All
// generation logic lives in `delve_gen`; this binary only parses arguments,
// sets up logging and formats output.
//
// Usage:
//   delve [OPTIONS]
//     --config <FILE>          JSON config file (overrides --preset)
//     --preset <NAME>          default | flat-demo | tower (default: default)
//     --seed <N>               RNG seed
//     --rooms <N>              Target room count
//     --bounds <X,Y,Z>         Grid extents
//     --edges-to-keep <N>      Extra loop edges on top of the spanning tree
//     --attempts <N>           Size draws per room slot
//     --slices                 Print an ASCII map of every y-layer
//     --json                   Print the whole dungeon as JSON
//
// Log output goes to stderr and is controlled by `RUST_LOG`
// (e.g. `RUST_LOG=debug delve --preset tower`).

use clap::{Parser, ValueEnum};
use delve_gen::types::GridBounds;
use delve_gen::{Dungeon, DungeonConfig};
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Default,
    FlatDemo,
    Tower,
}

/// Generate a seeded 3D dungeon layout.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file; takes precedence over --preset
    #[arg(long)]
    config: Option<String>,

    /// Built-in config to start from
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Target room count
    #[arg(long)]
    rooms: Option<u32>,

    /// Grid extents as X,Y,Z
    #[arg(long, value_parser = parse_bounds)]
    bounds: Option<GridBounds>,

    /// Extra loop edges kept on top of the spanning tree
    #[arg(long)]
    edges_to_keep: Option<u32>,

    /// Size draws per room slot
    #[arg(long)]
    attempts: Option<u32>,

    /// Print an ASCII map of every y-layer
    #[arg(long)]
    slices: bool,

    /// Print the whole dungeon as JSON instead of a summary
    #[arg(long, conflicts_with = "slices")]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    info!("generating with seed {} in {}", config.seed, config.bounds);

    let dungeon = match Dungeon::generate(&config) {
        Ok(dungeon) => dungeon,
        Err(e) => {
            eprintln!("Generation failed: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match dungeon.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to export dungeon: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    print_summary(&dungeon);
    if args.slices {
        println!();
        print!("{}", dungeon.render_slices());
    }
}

/// Start from the config file or preset, then apply flag overrides.
fn build_config(args: &Args) -> Result<DungeonConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {path}: {e}"))?;
            DungeonConfig::from_json(&text)
                .map_err(|e| format!("Failed to parse config {path}: {e}"))?
        }
        None => match args.preset {
            Preset::Default => DungeonConfig::default(),
            Preset::FlatDemo => DungeonConfig::flat_demo(),
            Preset::Tower => DungeonConfig::tower(),
        },
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rooms) = args.rooms {
        config.rooms.target_count = rooms;
    }
    if let Some(bounds) = args.bounds {
        config.bounds = bounds;
    }
    if let Some(edges) = args.edges_to_keep {
        config.connections.edges_to_keep = edges;
    }
    if let Some(attempts) = args.attempts {
        config.rooms.attempts = attempts;
    }
    Ok(config)
}

fn parse_bounds(s: &str) -> Result<GridBounds, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z, got {s:?}"));
    };
    let axis = |v: &str| {
        v.parse::<u32>()
            .map_err(|e| format!("invalid extent {v:?}: {e}"))
    };
    Ok(GridBounds::new(axis(*x)?, axis(*y)?, axis(*z)?))
}

fn print_summary(dungeon: &Dungeon) {
    let s = &dungeon.stats;
    println!("seed {}  grid {}", dungeon.seed, dungeon.grid.bounds());
    println!(
        "rooms        {}/{} ({:.0}%)",
        s.placed_rooms,
        s.target_rooms,
        s.success_rate * 100.0
    );
    println!("connections  {} ({} loops)", s.connection_count, s.loops);
    println!(
        "levels       {} connections change level, {} skip a level, spread {:.2}",
        s.level_connections, s.discontinuous_level_connections, s.vertical_spread
    );
    println!(
        "hallways     {} cells, {} failed routes",
        s.hallway_cells, s.failed_paths
    );
    if s.unreached_rooms > 0 {
        println!("unreached    {} rooms", s.unreached_rooms);
    }
    for room in &dungeon.rooms {
        println!(
            "  room {:>3}  at {}  size {}x{}x{}",
            room.id.0, room.position, room.size.x, room.size.y, room.size.z
        );
    }
}
