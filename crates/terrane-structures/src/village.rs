//! Village growth: an L-system over unit road segments, followed by
//! first-fit building placement along the finished roads.

use std::collections::VecDeque;

use terrane_world::{Direction, WorldGenParams, hash01};

use crate::structure::{Structure, StructureKind};

const SALT_BUILDING: u32 = 0x0007_5893;
const SALT_RULE: u32 = 0x0008_5833;
const SALT_TURN: u32 = 0x0009_1439;

/// Distance from the center to the four seed segments.
const SEED_OFFSET: i32 = 6;
/// Same-axis segments closer than this on both axes, but on a different
/// line, reject a newcomer.
pub const EXCLUSION: i32 = 10;
/// Arm length at which every segment stops.
pub const MAX_ARM: u32 = 200;
const ARM_TURN_COST: u32 = 20;
const YOUNG_ARM: u32 = 64;
const MIN_BRANCH_DEPTH: u32 = 16;
const SITE_OFFSET: i32 = 4;
const KEEP_SITE: f32 = 0.4;
const CENTER_HALF: i32 = 7;
const HITBOX_PAD: i32 = 2;

/// A road segment waiting to be expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub x: i32,
    pub z: i32,
    pub dir: Direction,
    /// Length of the arm this segment extends; turns cost extra.
    pub arm: u32,
    /// Straight steps since the last turn.
    pub depth: u32,
}

impl Segment {
    fn step(self) -> Segment {
        let (dx, dz) = self.dir.delta();
        Segment {
            x: self.x + dx,
            z: self.z + dz,
            arm: self.arm + 1,
            depth: self.depth + 1,
            ..self
        }
    }

    fn turned(self, dir: Direction) -> Segment {
        Segment {
            dir,
            arm: self.arm + ARM_TURN_COST,
            depth: 0,
            ..self
        }
    }
}

/// Axis-aligned footprint, as center and half extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub x: i32,
    pub z: i32,
    pub hx: i32,
    pub hz: i32,
}

impl Hitbox {
    #[inline]
    fn clashes(&self, x: i32, z: i32, hx: i32, hz: i32) -> bool {
        (x - self.x).abs() <= hx + self.hx && (z - self.z).abs() <= hz + self.hz
    }
}

#[derive(Clone, Debug, Default)]
pub struct VillagePlan {
    pub center: (i32, i32),
    /// Center monument, then road tiles in pop order, then buildings.
    pub structures: Vec<Structure>,
    /// Accepted segments running along X.
    pub xdir: Vec<(i32, i32)>,
    /// Accepted segments running along Z.
    pub zdir: Vec<(i32, i32)>,
    /// Footprints of the center and every accepted building, padded.
    pub hitboxes: Vec<Hitbox>,
    pub pops: usize,
    /// Growth was cut off by the segment cap.
    pub capped: bool,
}

impl VillagePlan {
    pub fn roads(&self) -> impl Iterator<Item = &Structure> {
        self.structures
            .iter()
            .filter(|s| s.kind == StructureKind::VillageRoad)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Structure> {
        self.structures.iter().filter(|s| s.is_building())
    }
}

enum Rule {
    Turn,
    Branch,
    Tee,
    Stop,
    Straight,
}

fn pick_rule(seg: &Segment, f: f32) -> Rule {
    if seg.arm >= MAX_ARM {
        return Rule::Stop;
    }
    let (mut p_turn, mut p_branch, mut p_tee) = (0.04f32, 0.04f32, 0.01f32);
    let mut p_stop = seg.arm as f32 * 0.000_05;
    if seg.arm < YOUNG_ARM {
        p_stop = 0.0;
        p_branch = 0.06;
    }
    if seg.depth < MIN_BRANCH_DEPTH {
        p_turn = 0.0;
        p_branch = 0.0;
        p_tee = 0.0;
    }
    if f < p_turn {
        Rule::Turn
    } else if f < p_turn + p_branch {
        Rule::Branch
    } else if f < p_turn + p_branch + p_tee {
        Rule::Tee
    } else if f < p_turn + p_branch + p_tee + p_stop {
        Rule::Stop
    } else {
        Rule::Straight
    }
}

/// True when `(x, z)` would sit beside an existing same-axis segment on a
/// different line.
fn crowded(existing: &[(i32, i32)], x: i32, z: i32, along_x: bool) -> bool {
    existing.iter().any(|&(ex, ez)| {
        let near = (x - ex).abs() < EXCLUSION && (z - ez).abs() < EXCLUSION;
        let other_line = if along_x { z != ez } else { x != ex };
        near && other_line
    })
}

/// Grows the road network and building list of a village centered at
/// `center`. Deterministic for a given seed and center.
pub fn grow_village(params: &WorldGenParams, center: (i32, i32)) -> VillagePlan {
    let seed = params.seed;
    let (cx, cz) = center;
    let mut plan = VillagePlan {
        center,
        ..VillagePlan::default()
    };
    plan.structures
        .push(Structure::new(StructureKind::VillageCenter, cx, cz));
    plan.hitboxes.push(Hitbox {
        x: cx,
        z: cz,
        hx: CENTER_HALF,
        hz: CENTER_HALF,
    });

    let mut queue: VecDeque<Segment> = Direction::ALL
        .iter()
        .map(|&dir| {
            let (dx, dz) = dir.delta();
            Segment {
                x: cx + dx * SEED_OFFSET,
                z: cz + dz * SEED_OFFSET,
                dir,
                arm: 0,
                depth: 0,
            }
        })
        .collect();

    while let Some(seg) = queue.pop_front() {
        if plan.pops >= params.village_max_segments {
            plan.capped = true;
            break;
        }
        plan.pops += 1;
        plan.structures.push(Structure::facing(
            StructureKind::VillageRoad,
            seg.x,
            seg.z,
            seg.dir,
        ));
        let f = hash01(seed, seg.x, seg.z, SALT_RULE);
        let side = if hash01(seed, seg.x, seg.z, SALT_TURN) < 0.5 {
            seg.dir.rotate_left()
        } else {
            seg.dir.rotate_right()
        };
        let next: Vec<Segment> = match pick_rule(&seg, f) {
            Rule::Turn => vec![seg.turned(side)],
            Rule::Branch => vec![seg.step(), seg.turned(side)],
            Rule::Tee => vec![
                seg.turned(seg.dir.rotate_left()),
                seg.turned(seg.dir.rotate_right()),
            ],
            Rule::Stop => Vec::new(),
            Rule::Straight => vec![seg.step()],
        };
        for cand in next {
            let along_x = cand.dir.runs_along_x();
            let list = if along_x {
                &mut plan.xdir
            } else {
                &mut plan.zdir
            };
            if crowded(list, cand.x, cand.z, along_x) {
                continue;
            }
            list.push((cand.x, cand.z));
            queue.push_back(cand);
        }
    }
    if plan.capped {
        log::warn!(
            "village at ({}, {}) hit the segment cap after {} pops",
            cx,
            cz,
            plan.pops
        );
    }

    place_buildings(params, &mut plan);
    log::info!(
        "village at ({}, {}) planned: pops={} roads_x={} roads_z={} buildings={}",
        cx,
        cz,
        plan.pops,
        plan.xdir.len(),
        plan.zdir.len(),
        plan.buildings().count()
    );
    plan
}

fn place_buildings(params: &WorldGenParams, plan: &mut VillagePlan) {
    let (cx, cz) = plan.center;
    let mut sites = Vec::with_capacity(2 * (plan.xdir.len() + plan.zdir.len()));
    for &(x, z) in &plan.xdir {
        sites.push((x, z + SITE_OFFSET, Direction::ZNeg));
        sites.push((x, z - SITE_OFFSET, Direction::ZPos));
    }
    for &(x, z) in &plan.zdir {
        sites.push((x + SITE_OFFSET, z, Direction::XNeg));
        sites.push((x - SITE_OFFSET, z, Direction::XPos));
    }

    for (x, z, orient) in sites {
        if hash01(params.seed, x, z, SALT_BUILDING) >= KEEP_SITE {
            continue;
        }
        let town_dist = (x - cx).abs().max((z - cz).abs());
        let (dx, dz) = orient.delta();
        let (kind, hx, hz, back) = if town_dist < params.library_radius {
            if orient.runs_along_x() {
                (StructureKind::Library, 5, 9, 5)
            } else {
                (StructureKind::Library, 9, 5, 5)
            }
        } else {
            (StructureKind::House, 4, 4, 3)
        };
        let (bx, bz) = (x - back * dx, z - back * dz);

        let on_x_road = plan
            .xdir
            .iter()
            .any(|&(rx, rz)| (bx - rx).abs() <= hx && (bz - rz).abs() <= hz + HITBOX_PAD);
        let on_z_road = plan
            .zdir
            .iter()
            .any(|&(rx, rz)| (bx - rx).abs() <= hx + HITBOX_PAD && (bz - rz).abs() <= hz);
        if on_x_road || on_z_road || plan.hitboxes.iter().any(|h| h.clashes(bx, bz, hx, hz)) {
            continue;
        }
        plan.structures.push(Structure::facing(kind, x, z, orient));
        plan.hitboxes.push(Hitbox {
            x: bx,
            z: bz,
            hx: hx + HITBOX_PAD,
            hz: hz + HITBOX_PAD,
        });
    }
}
