//! Criterion benchmarks for the placement grid.

use blueprint_core::geometry::{Position, Size};
use blueprint_core::id::EntityId;
use blueprint_spatial::{Footprint, PlacementGrid};
use criterion::{Criterion, criterion_group, criterion_main};
use slotmap::SlotMap;

fn footprint(x: i32, y: i32, size: Size) -> Footprint {
    Footprint::new(Position::new(f64::from(x), f64::from(y)), size)
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement_grid");
    group.sample_size(50);

    let mut arena = SlotMap::<EntityId, ()>::with_key();
    let ids: Vec<EntityId> = (0..400).map(|_| arena.insert(())).collect();

    // Place 400 3x3 machines in a 20x20 layout.
    group.bench_function("place_400_machines", |b| {
        b.iter(|| {
            let mut grid = PlacementGrid::new();
            for (i, &id) in ids.iter().enumerate() {
                let (x, y) = ((i % 20) as i32 * 3, (i / 20) as i32 * 3);
                grid.place(id, footprint(x, y, Size::new(3, 3))).unwrap();
            }
            grid
        });
    });

    // Overlap probes against a full layout.
    let mut grid = PlacementGrid::new();
    for (i, &id) in ids.iter().enumerate() {
        let (x, y) = ((i % 20) as i32 * 3, (i / 20) as i32 * 3);
        grid.place(id, footprint(x, y, Size::new(3, 3))).unwrap();
    }
    group.bench_function("overlap_probe_1x2", |b| {
        b.iter(|| {
            let mut hits = 0;
            for x in 0..60 {
                if grid.overlap(footprint(x, x, Size::new(1, 2))).is_some() {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
