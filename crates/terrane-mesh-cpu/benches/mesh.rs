use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use terrane_chunk::{BlockGrid, ColumnMap};
use terrane_mesh_cpu::{NeighborPlanes, build_chunk_mesh};
use terrane_world::{ChunkKey, Direction, NoiseField, WorldGenParams};

fn generated(key: ChunkKey, field: &NoiseField) -> BlockGrid {
    let (ox, oz) = key.origin();
    let mut cols = ColumnMap::default();
    for x in 0..16 {
        for z in 0..16 {
            let s = field.sample_column(ox + x as i32, oz + z as i32);
            cols.heights[x][z] = s.height;
            cols.biomes[x][z] = s.biome;
            if x == 8 && z == 8 {
                cols.chunk_biome = s.chunk_biome;
            }
        }
    }
    BlockGrid::filled(key, &cols)
}

fn bench_mesh_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_terrain");
    group.measurement_time(Duration::from_secs(5));
    let field = NoiseField::new(&WorldGenParams::default().with_seed(1337));
    let key = ChunkKey::encode(0, 0);
    let grid = generated(key, &field);
    group.bench_function("no_neighbors", |b| {
        b.iter(|| {
            let view = grid.view();
            black_box(build_chunk_mesh(&view, &NeighborPlanes::none()));
        })
    });

    let mut n = NeighborPlanes::none();
    let around: Vec<_> = Direction::ALL
        .iter()
        .map(|&d| (d, generated(key.neighbor(d), &field)))
        .collect();
    for (d, g) in &around {
        n.set(*d, g);
    }
    group.bench_function("linked", |b| {
        b.iter(|| {
            let view = grid.view();
            black_box(build_chunk_mesh(&view, &n));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_mesh_terrain);
criterion_main!(benches);
