use terrane_geom::Vec3;
use terrane_world::Direction;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Integer grid delta `(dx, dy, dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Horizontal neighbor that lies across this face, if any.
    #[inline]
    pub fn side(self) -> Option<Direction> {
        match self {
            Face::PosX => Some(Direction::XPos),
            Face::NegX => Some(Direction::XNeg),
            Face::PosZ => Some(Direction::ZPos),
            Face::NegZ => Some(Direction::ZNeg),
            Face::PosY | Face::NegY => None,
        }
    }

    /// Corners of the unit face between cell `(x, y, z)` and its neighbor
    /// across this face. Winding is left to the quad builder.
    pub fn corners(self, x: i32, y: i32, z: i32) -> [Vec3; 4] {
        let (dx, dy, dz) = self.delta();
        let o = Vec3::new(
            (x + dx.max(0)) as f32,
            (y + dy.max(0)) as f32,
            (z + dz.max(0)) as f32,
        );
        let offs: [(f32, f32, f32); 4] = match self {
            Face::PosX | Face::NegX => [(0., 0., 0.), (0., 1., 0.), (0., 1., 1.), (0., 0., 1.)],
            Face::PosY | Face::NegY => [(0., 0., 0.), (1., 0., 0.), (1., 0., 1.), (0., 0., 1.)],
            Face::PosZ | Face::NegZ => [(0., 0., 0.), (1., 0., 0.), (1., 1., 0.), (0., 1., 0.)],
        };
        offs.map(|(a, b, c)| o + Vec3::new(a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_lie_on_the_shared_plane() {
        for f in Face::ALL {
            let (dx, dy, dz) = f.delta();
            let plane = |c: Vec3| {
                if dx != 0 {
                    c.x
                } else if dy != 0 {
                    c.y
                } else {
                    c.z
                }
            };
            let expect = if dx + dy + dz > 0 { 4.0 } else { 3.0 };
            for c in f.corners(3, 3, 3) {
                assert_eq!(plane(c), expect, "{f:?}");
            }
        }
    }
}
