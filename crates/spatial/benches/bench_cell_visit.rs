use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use worldgrid_common::{EntityId, GridConfig, ObjectCategory};
use worldgrid_kernel::{EntityData, World};
use worldgrid_spatial::{EntityMap, GridFn, visit_grid_objects, visit_grid_objects_at};

fn make_world(entity_count: usize, spacing: f32) -> World {
    let mut world = World::new();
    let side = (entity_count as f32).sqrt().ceil() as usize;
    for i in 0..entity_count {
        let x = (i % side) as f32 * spacing;
        let y = (i / side) as f32 * spacing;
        let category = if i % 10 == 0 {
            ObjectCategory::World
        } else {
            ObjectCategory::Grid
        };
        world.spawn(EntityData::new(Vec2::new(x, y), category).with_reach(1.5));
    }
    world
}

fn bench_rebuild(entity_count: usize, iterations: usize) {
    let world = make_world(entity_count, 4.0);
    let mut map = EntityMap::new(GridConfig::default());

    let start = Instant::now();
    for _ in 0..iterations {
        map.rebuild(black_box(&world));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  rebuild ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_point_query(entity_count: usize, radius: f32, iterations: usize) {
    let world = make_world(entity_count, 4.0);
    let mut map = EntityMap::new(GridConfig::default());
    map.rebuild(&world);

    let center = Vec2::new(20.0, 20.0);
    let start = Instant::now();
    let mut found = 0usize;
    for _ in 0..iterations {
        let summary = visit_grid_objects_at(
            &mut map,
            black_box(center),
            &mut GridFn(|_: &EntityId| found += 1),
            black_box(radius),
            true,
        );
        black_box(summary);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  point query ({entity_count} entities, r={radius}, {iterations} iters): {per_iter:?}/iter, found {}/iter",
        found / iterations
    );
}

fn bench_tick(entity_count: usize, radius: f32, ticks: usize) {
    let mut world = make_world(entity_count, 4.0);
    let mut map = EntityMap::new(GridConfig::default());
    map.rebuild(&world);

    let start = Instant::now();
    for _ in 0..ticks {
        // Every entity looks around once per tick.
        let mut seen = 0usize;
        for data in world.entities().values() {
            visit_grid_objects(&mut map, data, &mut GridFn(|_: &EntityId| seen += 1), radius, true);
        }
        black_box(seen);
        world.step();
        map.apply_events(&world.drain_events());
    }
    let elapsed = start.elapsed();
    let per_tick = elapsed / ticks as u32;
    println!("  tick ({entity_count} entities, r={radius}, {ticks} ticks): {per_tick:?}/tick, total {elapsed:?}");
}

fn main() {
    println!("=== Cell Visit Benchmarks ===\n");

    println!("Map rebuild:");
    bench_rebuild(100, 1000);
    bench_rebuild(1000, 100);
    bench_rebuild(10000, 10);

    println!("\nPoint query (rectangle vs octagon):");
    bench_point_query(10000, 50.0, 10000);
    bench_point_query(10000, 250.0, 10000);
    bench_point_query(10000, 533.0, 1000);

    println!("\nFull tick, every entity queries:");
    bench_tick(1000, 30.0, 10);
    bench_tick(10000, 30.0, 2);

    println!("\n=== Done ===");
}
