use std::sync::{Arc, Barrier};
use std::thread;

use terrane_blocks::BlockType;
use terrane_chunk::{ChunkMesh, Elevation, MarchMode};
use terrane_geom::{IVec3, Vec3};
use terrane_runtime::{RenderSink, Terrain, TerrainError, ViewWindow};
use terrane_world::{ChunkKey, Direction, WorldGenParams};

fn quiet_terrain(seed: i32) -> Terrain {
    let mut p = WorldGenParams::default().with_seed(seed);
    p.village_chance = 0.0;
    Terrain::new(&p, 4)
}

#[derive(Default)]
struct Recorder {
    bound: Vec<(ChunkKey, usize)>,
    unbound: Vec<ChunkKey>,
}

impl RenderSink for Recorder {
    fn bind(&mut self, key: ChunkKey, mesh: &ChunkMesh) {
        self.bound.push((key, mesh.quad_count()));
    }

    fn unbind(&mut self, key: ChunkKey) {
        self.unbound.push(key);
    }
}

#[test]
fn deferred_edits_land_when_the_chunk_is_generated() {
    let t = quiet_terrain(5);
    t.set_block_at(5, 250, 7, BlockType::Glass);
    t.set_block_elevation(3, Elevation::Surface(0), 3, BlockType::Bookshelf);
    t.set_block_at(-1, 250, -1, BlockType::Lava);
    let s = t.stats();
    assert_eq!((s.deferred_chunks, s.deferred_edits), (2, 3));
    assert_eq!(
        t.get_block_at(5, 250, 7),
        Err(TerrainError::NotLoaded { x: 5, y: 250, z: 7 })
    );

    let grid = t.instantiate_chunk_at(0, 0);
    assert_eq!(t.get_block_at(5, 250, 7), Ok(BlockType::Glass));
    assert_eq!(grid.get_block(3, Elevation::Surface(0), 3), BlockType::Bookshelf);
    assert!(grid.data_generated());
    assert!(grid.surface_generated());
    assert_eq!(t.deferred_for(grid.key()), 0);
    assert_eq!(t.deferred_for(ChunkKey::encode(-16, -16)), 1);

    let other = t.instantiate_chunk_at(-1, -1);
    assert_eq!(other.key(), ChunkKey::encode(-16, -16));
    assert_eq!(t.get_block_at(-1, 250, -1), Ok(BlockType::Lava));
    assert_eq!(t.deferred_for(other.key()), 0);
}

#[test]
fn deferred_queue_shrinks_as_chunks_generate() {
    let t = quiet_terrain(12);
    t.set_block_at(1, 250, 1, BlockType::Glass);
    t.set_block_at(2, 251, 2, BlockType::Glass);
    t.set_block_at(-3, 250, 4, BlockType::Ice);
    assert_eq!(t.stats().deferred_edits, 3);

    let grid = t.instantiate_chunk_at(0, 0);
    assert_eq!(t.deferred_for(grid.key()), 0);
    // tree crowns may spill new edits into unloaded neighbors, never into
    // the chunk that was just flushed
    assert!(t.deferred_for(ChunkKey::encode(-16, 0)) >= 1);

    t.instantiate_chunk_at(-3, 4);
    assert_eq!(t.deferred_for(ChunkKey::encode(-16, 0)), 0);
    assert_eq!(t.get_block_at(-3, 250, 4), Ok(BlockType::Ice));
}

#[test]
fn racing_instantiations_share_one_grid() {
    for seed in 0..20 {
        let t = Arc::new(quiet_terrain(seed));
        t.set_block_at(5, 250, 7, BlockType::Glass);
        let start = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let t = Arc::clone(&t);
                let start = Arc::clone(&start);
                thread::spawn(move || {
                    start.wait();
                    t.instantiate_chunk_at(0, 0)
                })
            })
            .collect();
        let grids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(Arc::ptr_eq(&grids[0], &grids[1]), "seed {}", seed);
        assert!(Arc::ptr_eq(&grids[0], &t.chunk_at(0, 0).unwrap()));
        assert_eq!(grids[1].get_block_raw(5, 250, 7), BlockType::Glass);
        assert_eq!(t.get_block_at(5, 250, 7), Ok(BlockType::Glass));
        assert_eq!(t.deferred_for(grids[0].key()), 0);
        assert_eq!(t.stats().ready, 1);
    }
}

#[test]
fn writes_to_ready_chunks_are_direct() {
    let t = quiet_terrain(6);
    let grid = t.instantiate_chunk_at(0, 0);
    assert!(!grid.blocks_changed());
    t.set_block_at(2, 240, 2, BlockType::Ice);
    assert_eq!(t.get_block_at(2, 240, 2), Ok(BlockType::Ice));
    assert!(grid.blocks_changed());

    // resolves above the grid: dropped, nothing queued
    let queued = t.stats().deferred_edits;
    t.set_block_elevation(2, Elevation::Absolute(300), 2, BlockType::Ice);
    assert_eq!(t.stats().deferred_edits, queued);
}

#[test]
fn neighbors_link_both_ways_and_border_edits_dirty_both() {
    let t = quiet_terrain(7);
    let a = t.instantiate_chunk_at(0, 0);
    let b = t.instantiate_chunk_at(16, 0);
    assert!(a.is_linked(Direction::XPos));
    assert!(b.is_linked(Direction::XNeg));
    assert!(!a.is_linked(Direction::ZPos));

    a.take_changed();
    b.take_changed();
    t.set_block_at(5, 230, 5, BlockType::Stone);
    assert!(a.take_changed());
    assert!(!b.take_changed());

    t.set_block_at(15, 230, 5, BlockType::Stone);
    assert!(a.take_changed());
    assert!(b.take_changed());
}

#[test]
fn draw_binds_then_unbinds_in_the_ring() {
    let t = quiet_terrain(8);
    let grid = t.instantiate_chunk_at(0, 0);
    let key = grid.key();
    let near = ViewWindow::around(0.0, 0.0, 32);
    let mut sink = Recorder::default();

    let c = t.draw(&near, &mut sink);
    assert_eq!((c.bound, c.unbound), (1, 0));
    assert_eq!(sink.bound[0].0, key);
    assert!(sink.bound[0].1 > 0);
    assert!(grid.mesh_bound());
    assert_eq!(t.draw(&near, &mut sink).bound, 0);

    // (0, 0) sits in the column two chunks before this window's min x
    let shifted = ViewWindow::around(64.0, 0.0, 32);
    assert!(shifted.unload_ring().contains(&(0, 0)));
    let c = t.draw(&shifted, &mut sink);
    assert_eq!((c.bound, c.unbound), (0, 1));
    assert_eq!(sink.unbound, vec![key]);
    assert!(!grid.mesh_bound());

    assert_eq!(t.draw(&near, &mut sink).bound, 1);
    assert_eq!(sink.bound.len(), 2);
}

#[test]
fn remesh_clears_dirty_and_rebinds() {
    let t = quiet_terrain(9);
    let grid = t.instantiate_chunk_at(0, 0);
    let window = ViewWindow::around(0.0, 0.0, 32);
    let mut sink = Recorder::default();
    t.draw(&window, &mut sink);
    let before = grid.mesh().quad_count();

    t.set_block_at(8, 245, 8, BlockType::Cobblestone);
    assert_eq!(t.dirty_chunks_in(&window), vec![grid.key()]);
    assert!(t.dirty_chunks_in(&window).is_empty());

    assert_eq!(t.build_mesh(grid.key()), Some(before + 6));
    assert!(!grid.mesh_bound());
    assert_eq!(t.draw(&window, &mut sink).bound, 1);
    assert_eq!(sink.bound.last().map(|b| b.1), Some(before + 6));
}

#[test]
fn build_mesh_needs_a_ready_chunk() {
    let t = quiet_terrain(10);
    assert_eq!(t.build_mesh(ChunkKey::encode(0, 0)), None);
}

#[test]
fn march_hits_placed_block_and_skips_unloaded() {
    let t = quiet_terrain(11);
    t.instantiate_chunk_at(0, 0);
    t.set_block_at(4, 250, 4, BlockType::Stone);

    let hit = t
        .grid_march(Vec3::new(4.5, 252.5, 4.5), Vec3::new(0.0, -5.0, 0.0), MarchMode::NonEmpty)
        .unwrap();
    assert_eq!(hit.cell, IVec3::new(4, 250, 4));
    assert!((hit.distance - 1.5).abs() < 1e-4);

    let far = t.grid_march(
        Vec3::new(1000.5, 100.5, 1000.5),
        Vec3::new(0.0, -50.0, 0.0),
        MarchMode::NonEmpty,
    );
    assert!(far.is_none());

    assert!(t.ground_contact(&[Vec3::new(4.5, 251.0005, 4.5)], 0.1));
    assert!(!t.ground_contact(&[Vec3::new(6.5, 251.0005, 6.5)], 0.1));

    let v = t.sweep_axes(&[Vec3::new(4.5, 252.5, 4.5)], Vec3::new(0.0, -3.0, 0.0));
    assert!(v.y < 0.0 && v.y > -1.6);
}
