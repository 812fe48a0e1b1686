//! Voxel grid traversal along a ray, plus the probes physics builds on it.

use terrane_blocks::BlockType;
use terrane_geom::{IVec3, Vec3};

/// Which cells end a march.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarchMode {
    /// First cell that is not `Empty`.
    NonEmpty,
    /// First cell that is not transparent; empty and water are passed through.
    Opaque,
}

impl MarchMode {
    #[inline]
    fn stops_at(self, b: BlockType) -> bool {
        match self {
            MarchMode::NonEmpty => b.is_solid(),
            MarchMode::Opaque => !b.is_transparent(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarchHit {
    /// Distance along the ray to the boundary of the hit cell.
    pub distance: f32,
    pub cell: IVec3,
    /// Last cell visited before the hit.
    pub prev: IVec3,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

#[inline]
fn step_of(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Walks the cells crossed by `origin + t * ray.normalized()` for
/// `t <= |ray|`, returning the first cell after the origin cell that `mode`
/// stops at.
pub fn grid_march<F>(origin: Vec3, ray: Vec3, mode: MarchMode, mut sample: F) -> Option<MarchHit>
where
    F: FnMut(IVec3) -> BlockType,
{
    let max_dist = ray.length();
    if max_dist < 1e-6 {
        return None;
    }
    let d = ray * (1.0 / max_dist);

    let mut cell = origin.cell();
    let step = IVec3::new(step_of(d.x), step_of(d.y), step_of(d.z));

    let inv = [inv_or_max(d.x), inv_or_max(d.y), inv_or_max(d.z)];
    let steps = [step.x, step.y, step.z];
    let mut t_delta = [f32::MAX; 3];
    let mut t_max = [f32::MAX; 3];
    for a in 0..3 {
        if steps[a] == 0 {
            continue;
        }
        let o = origin.axis(a);
        let frac = o - o.floor();
        t_delta[a] = inv[a];
        t_max[a] = if steps[a] > 0 {
            (1.0 - frac) * inv[a]
        } else {
            frac * inv[a]
        };
    }

    let mut prev = cell;
    loop {
        let a = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        let t = t_max[a];
        if t > max_dist {
            return None;
        }
        prev = cell;
        match a {
            0 => cell.x += step.x,
            1 => cell.y += step.y,
            _ => cell.z += step.z,
        }
        t_max[a] += t_delta[a];
        if mode.stops_at(sample(cell)) {
            return Some(MarchHit {
                distance: t,
                cell,
                prev,
            });
        }
    }
}

/// Distances under this are treated as no movement.
pub const SNAP_EPSILON: f32 = 1e-3;
/// Gap kept between a moving box and the cell it runs into.
pub const SKIN: f32 = 1e-3;

/// Clamps `velocity` axis by axis so that none of the `corners` moves into a
/// solid cell. Each axis is probed independently from every corner and
/// limited to the smallest unblocked distance; components that end up within
/// [`SNAP_EPSILON`] of zero become zero.
pub fn sweep_axes<F>(corners: &[Vec3], velocity: Vec3, mut sample: F) -> Vec3
where
    F: FnMut(IVec3) -> BlockType,
{
    let mut out = [0.0f32; 3];
    for (a, slot) in out.iter_mut().enumerate() {
        let v = velocity.axis(a);
        if v == 0.0 {
            continue;
        }
        let ray = velocity.only_axis(a);
        let mut allowed = v.abs();
        for &c in corners {
            if let Some(hit) = grid_march(c, ray, MarchMode::NonEmpty, &mut sample) {
                allowed = allowed.min((hit.distance - SKIN).max(0.0));
            }
        }
        *slot = if allowed < SNAP_EPSILON {
            0.0
        } else {
            allowed * v.signum()
        };
    }
    Vec3::new(out[0], out[1], out[2])
}

/// True when a short downward probe from any of `feet` hits a solid cell.
pub fn ground_contact<F>(feet: &[Vec3], probe: f32, mut sample: F) -> bool
where
    F: FnMut(IVec3) -> BlockType,
{
    let ray = Vec3::DOWN * probe;
    feet.iter()
        .any(|&p| grid_march(p, ray, MarchMode::NonEmpty, &mut sample).is_some())
}
