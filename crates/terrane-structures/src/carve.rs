use terrane_blocks::BlockType;
use terrane_chunk::Elevation;
use terrane_world::{Direction, WorldGenParams, hash01, hash01_3};

use crate::structure::{BlockSink, Structure, StructureKind};

const SALT_OAK_HEIGHT: u32 = 0x0003_0201;
const SALT_OAK_CORNER: u32 = 0x0403_0201;
const SALT_SPRUCE_HEIGHT: u32 = 0x0003_0202;
const SALT_SPRUCE_LAYER: u32 = 0x200A_180C;

const LIBRARY_BACK: i32 = 5;

/// Writes the voxel pattern of `s` into `sink`.
pub fn carve<S: BlockSink + ?Sized>(params: &WorldGenParams, s: &Structure, sink: &mut S) {
    match s.kind {
        StructureKind::OakTree { ground } => oak_tree(params, s.x, s.z, ground, sink),
        StructureKind::SpruceTree { ground } => spruce_tree(params, s.x, s.z, ground, sink),
        StructureKind::VillageCenter => {
            for dy in 0..3 {
                sink.set_block(s.x, Elevation::Surface(dy), s.z, BlockType::Stone);
            }
        }
        StructureKind::VillageRoad => {
            let (cx, cz) = s.orient.rotate_left().delta();
            for k in -1..=1 {
                sink.set_block(
                    s.x + k * cx,
                    Elevation::Surface(-1),
                    s.z + k * cz,
                    params.village_road,
                );
            }
        }
        StructureKind::House => house(s.x, s.z, s.orient, sink),
        StructureKind::Library => library(s.x, s.z, s.orient, sink),
    }
}

fn oak_tree<S: BlockSink + ?Sized>(p: &WorldGenParams, x: i32, z: i32, ground: i32, sink: &mut S) {
    let seed = p.seed;
    let leaves = p.tree_leaves;
    let height = 6 + (3.0 * hash01(seed, x, z, SALT_OAK_HEIGHT)) as i32;
    let top = ground + height;
    let mut leaf = |dx: i32, y: i32, dz: i32| {
        sink.set_block(x + dx, Elevation::Absolute(y), z + dz, leaves);
    };
    let corner = |dx: i32, y: i32, dz: i32| hash01_3(seed, x + dx, y, z + dz, SALT_OAK_CORNER) > 0.5;

    for dy in 0..4 {
        let y = top - dy;
        if dy < 2 {
            for (dx, dz) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
                leaf(dx, y, dz);
            }
            if dy == 1 {
                for (dx, dz) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
                    if corner(dx, y, dz) {
                        leaf(dx, y, dz);
                    }
                }
            }
        } else {
            for dx in -2..=2 {
                for dz in -1..=1 {
                    leaf(dx, y, dz);
                }
            }
            for dx in -1..=1 {
                leaf(dx, y, 2);
                leaf(dx, y, -2);
            }
            for (dx, dz) in [(2, 2), (2, -2), (-2, 2), (-2, -2)] {
                if corner(dx, y, dz) {
                    leaf(dx, y, dz);
                }
            }
        }
    }
    for y in ground..top {
        sink.set_block(x, Elevation::Absolute(y), z, p.tree_trunk);
    }
}

fn spruce_tree<S: BlockSink + ?Sized>(
    p: &WorldGenParams,
    x: i32,
    z: i32,
    ground: i32,
    sink: &mut S,
) {
    let seed = p.seed;
    let height = 5 + (7.0 * hash01(seed, x, z, SALT_SPRUCE_HEIGHT)) as i32;
    let top = ground + height;
    let mut radius: i32 = 1;
    for y in (ground + 2..top).rev() {
        let t = hash01_3(seed, x, y, z, SALT_SPRUCE_LAYER);
        let r = radius;
        radius = match r {
            0 => 1,
            1 if t < 0.3 => 0,
            1 => 2,
            2 if t < 0.7 => 1,
            2 => 3,
            _ => 2,
        };
        if r == 0 {
            continue;
        }
        for dx in -r..=r {
            for dz in -r..=r {
                let m = dx.abs() + dz.abs();
                let keep = if r == 1 { m == 1 } else { m != 2 * r };
                if keep {
                    sink.set_block(x + dx, Elevation::Absolute(y), z + dz, p.tree_leaves);
                }
            }
        }
    }
    for y in ground..top {
        sink.set_block(x, Elevation::Absolute(y), z, BlockType::SpruceLog);
    }
    sink.set_block(x, Elevation::Absolute(top), z, p.tree_leaves);
}

fn house<S: BlockSink + ?Sized>(x: i32, z: i32, orient: Direction, sink: &mut S) {
    let mut put = |dx: i32, dy: i32, dz: i32, t: BlockType| {
        sink.set_block(x + dx, Elevation::Surface(dy), z + dz, t);
    };
    for i in -1..=1 {
        for j in -1..=1 {
            put(i, -1, j, BlockType::OakPlanks);
        }
    }
    for i in [-2, 2] {
        for j in [-2, 2] {
            for y in -1..3 {
                put(i, y, j, BlockType::OakLog);
            }
        }
    }
    for i in -1..=1 {
        for y in -1..3 {
            put(i, y, 2, BlockType::Cobblestone);
            put(i, y, -2, BlockType::Cobblestone);
            put(2, y, i, BlockType::Cobblestone);
            put(-2, y, i, BlockType::Cobblestone);
        }
    }
    for (i, j) in [(2, 0), (-2, 0), (0, 2), (0, -2)] {
        put(i, 1, j, BlockType::Glass);
    }
    let (dx, dz) = orient.delta();
    put(2 * dx, 0, 2 * dz, BlockType::Empty);
    put(2 * dx, 1, 2 * dz, BlockType::Empty);

    for i in -3..=3 {
        put(i, 3, 3, BlockType::SprucePlanks);
        put(i, 3, -3, BlockType::SprucePlanks);
        put(3, 3, i, BlockType::SprucePlanks);
        put(-3, 3, i, BlockType::SprucePlanks);
    }
    for (r, y0) in [(2, 3), (1, 4)] {
        for i in -r..=r {
            for y in y0..y0 + 2 {
                put(i, y, r, BlockType::SprucePlanks);
                put(i, y, -r, BlockType::SprucePlanks);
                put(r, y, i, BlockType::SprucePlanks);
                put(-r, y, i, BlockType::SprucePlanks);
            }
        }
    }
    put(0, 5, 0, BlockType::SprucePlanks);
}

// Local frame: `u` runs toward the road, `v` along it.
fn library<S: BlockSink + ?Sized>(x: i32, z: i32, orient: Direction, sink: &mut S) {
    const DEPTH: i32 = 3;
    const WIDTH: i32 = 6;
    const WALL: i32 = 5;
    let (ux, uz) = orient.delta();
    let (vx, vz) = orient.rotate_left().delta();
    let (cx, cz) = (x - LIBRARY_BACK * ux, z - LIBRARY_BACK * uz);
    let mut put = |u: i32, dy: i32, v: i32, t: BlockType| {
        sink.set_block(
            cx + u * ux + v * vx,
            Elevation::Surface(dy),
            cz + u * uz + v * vz,
            t,
        );
    };

    for u in -DEPTH..=DEPTH {
        for v in -WIDTH..=WIDTH {
            put(u, -1, v, BlockType::OakPlanks);
            let edge_u = u.abs() == DEPTH;
            let edge_v = v.abs() == WIDTH;
            for y in 0..WALL {
                let t = match (edge_u, edge_v) {
                    (true, true) => BlockType::OakLog,
                    (true, false) if y == 2 && v % 2 == 0 => BlockType::Glass,
                    (false, true) if y == 2 && u == 0 => BlockType::Glass,
                    (true, _) | (_, true) => BlockType::Cobblestone,
                    _ if u.abs() == DEPTH - 1 && v != 0 && y < 2 => BlockType::Bookshelf,
                    _ => BlockType::Empty,
                };
                put(u, y, v, t);
            }
        }
    }
    for u in -DEPTH - 1..=DEPTH + 1 {
        for v in -WIDTH - 1..=WIDTH + 1 {
            put(u, WALL, v, BlockType::SprucePlanks);
        }
    }
    put(DEPTH, 0, 0, BlockType::Empty);
    put(DEPTH, 1, 0, BlockType::Empty);
}
