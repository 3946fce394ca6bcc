use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use worldgrid_common::{EntityId, GridConfig, ObjectCategory};
use worldgrid_kernel::{EntityData, World};
use worldgrid_spatial::{
    Cell, CellContainer, CellCoord, ContainerVisitor, EntityMap, Map, ObjectVisitor, VisitSummary,
    compute_area, compute_cell_coord, is_valid_map_coord, octagon_shift, uses_octagon,
    visit_all_objects_at, visit_grid_objects_at, visit_world_objects_at,
};

#[derive(Parser)]
#[command(name = "worldgrid-cli", about = "CLI tool for worldgrid diagnostics")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Grid config file (.yaml, .yml or .json); classic layout if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the active grid constants
    Info,
    /// Show which cell and zone a world position falls in
    Cell {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
    },
    /// Show the cell area and traversal chosen for a query
    Area {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        radius: f32,
    },
    /// Populate a world and run one range query against it
    Query {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        radius: f32,
        /// Number of entities to spawn on a square lattice around the origin
        #[arg(short, long, default_value = "400")]
        entities: usize,
        /// Distance between neighbouring entities
        #[arg(short, long, default_value = "20")]
        spacing: f32,
        /// Object category to visit
        #[arg(long, value_enum, default_value = "all")]
        category: Category,
        /// Instantiate storage for empty cells touched by the query
        #[arg(long)]
        load: bool,
    },
    /// Draw the cells a query visits
    Render {
        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        radius: f32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Category {
    Grid,
    World,
    All,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GridConfig::load(path)?,
        None => GridConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("worldgrid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "grid: {} zones x {} cells per axis ({} cells), cell size {}",
                config.zones_per_axis,
                config.cells_per_zone,
                config.total_cells_per_axis(),
                config.cell_size
            );
            println!(
                "origin: {:?}, world extent [{}, {}), max search radius {}",
                config.origin,
                config.world_min(),
                config.world_max(),
                config.max_search_radius()
            );
        }
        Commands::Cell { x, y } => {
            let coord = compute_cell_coord(&config, x, y);
            let cell = Cell::new(coord, &config);
            println!("position ({x}, {y}) valid={}", is_valid_map_coord(&config, x, y));
            println!(
                "cell ({}, {}) valid={} id={:?}",
                coord.x,
                coord.y,
                cell.is_valid(&config),
                coord.id(&config)
            );
            println!(
                "zone ({}, {}) local ({}, {})",
                cell.zone_x(),
                cell.zone_y(),
                cell.cell_x(),
                cell.cell_y()
            );
        }
        Commands::Area { x, y, radius } => {
            let clamped = radius.min(config.max_search_radius());
            let area = compute_area(&config, x, y, clamped);
            println!(
                "area ({}, {})..=({}, {}) {}x{} cells, degenerate={}",
                area.low.x,
                area.low.y,
                area.high.x,
                area.high.y,
                area.width() + 1,
                area.height() + 1,
                area.is_degenerate()
            );
            if uses_octagon(&area) {
                println!("traversal: octagon, x_shift={}", octagon_shift(&area));
            } else if area.is_degenerate() || radius <= 0.0 {
                println!("traversal: single cell");
            } else {
                println!("traversal: rectangle");
            }
        }
        Commands::Query {
            x,
            y,
            radius,
            entities,
            spacing,
            category,
            load,
        } => {
            let world = lattice_world(entities, spacing);
            let mut map = EntityMap::new(config);
            let placed = map.rebuild(&world);
            tracing::info!(placed, cells = map.loaded_cell_count(), "map built");

            let mut counter = Counter::default();
            let center = Vec2::new(x, y);
            let dont_load = !load;
            let summary = match category {
                Category::Grid => {
                    visit_grid_objects_at(&mut map, center, &mut counter, radius, dont_load)
                }
                Category::World => {
                    visit_world_objects_at(&mut map, center, &mut counter, radius, dont_load)
                }
                Category::All => {
                    visit_all_objects_at(&mut map, center, &mut counter, radius, dont_load)
                }
            };
            print_summary(&summary);
            println!("found: {} grid, {} world", counter.grid, counter.world);
            let stats = map.stats();
            println!(
                "map: {} cells loaded, {} created, {} skipped",
                map.loaded_cell_count(),
                stats.cells_created,
                stats.cells_skipped
            );
        }
        Commands::Render { x, y, radius } => {
            let mut footprint = Footprint::new(config);
            let mut counter = Counter::default();
            let center = Vec2::new(x, y);
            let summary = visit_all_objects_at(&mut footprint, center, &mut counter, radius, true);
            print_summary(&summary);
            let area = compute_area(&config, x, y, radius.min(config.max_search_radius()));
            let standing = compute_cell_coord(&config, x, y);
            for row in (area.low.y..=area.high.y).rev() {
                let line: String = (area.low.x..=area.high.x)
                    .map(|col| {
                        let coord = CellCoord::new(col, row);
                        if coord == standing {
                            '@'
                        } else if footprint.visited.contains(&coord) {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect();
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &VisitSummary) {
    println!("traversal: {:?}, cells visited: {}", summary.kind, summary.cells_visited);
}

/// Square lattice of entities centered on the world origin; every fifth one a player.
fn lattice_world(count: usize, spacing: f32) -> World {
    let mut world = World::new();
    let side = (count as f32).sqrt().ceil().max(1.0) as usize;
    let offset = (side as f32 - 1.0) * spacing / 2.0;
    for i in 0..count {
        let pos = Vec2::new(
            (i % side) as f32 * spacing - offset,
            (i / side) as f32 * spacing - offset,
        );
        let category = if i % 5 == 0 {
            ObjectCategory::World
        } else {
            ObjectCategory::Grid
        };
        world.spawn(EntityData::new(pos, category));
    }
    world
}

#[derive(Default)]
struct Counter {
    grid: usize,
    world: usize,
}

impl<G, W> ObjectVisitor<G, W> for Counter {
    fn visit_grid_object(&mut self, _object: &G) {
        self.grid += 1;
    }

    fn visit_world_object(&mut self, _object: &W) {
        self.world += 1;
    }
}

/// Map that holds nothing and only remembers which cells were asked for.
struct Footprint {
    config: GridConfig,
    visited: HashSet<CellCoord>,
}

impl Footprint {
    fn new(config: GridConfig) -> Self {
        Self {
            config,
            visited: HashSet::new(),
        }
    }
}

impl Map for Footprint {
    type GridObject = EntityId;
    type WorldObject = EntityId;

    fn config(&self) -> &GridConfig {
        &self.config
    }

    fn visit_cell<C>(&mut self, cell: &Cell, visitor: &mut C)
    where
        C: ContainerVisitor<EntityId, EntityId> + ?Sized,
    {
        self.visited.insert(cell.coord());
        visitor.visit_container(&CellContainer::default());
    }
}
