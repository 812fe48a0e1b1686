/// Horizontal edge length of a chunk.
pub const CHUNK_SIZE: i32 = 16;
/// Vertical extent of a chunk.
pub const CHUNK_HEIGHT: i32 = 256;
/// Edge length of a generation zone.
pub const ZONE_SIZE: i32 = 64;

// X in the high 32 bits, Z in the low 32 bits.
#[inline]
const fn pack(x: i32, z: i32) -> i64 {
    ((x as i64) << 32) | (z as u32 as i64)
}

#[inline]
const fn unpack(k: i64) -> (i32, i32) {
    ((k >> 32) as i32, k as i32)
}

#[inline]
fn align(v: i32, size: i32) -> i32 {
    v.div_euclid(size) * size
}

/// Packed chunk-origin key. Both components are multiples of [`CHUNK_SIZE`]
/// when built through [`ChunkKey::containing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(i64);

impl ChunkKey {
    /// Packs an arbitrary `(x, z)` pair without alignment.
    #[inline]
    pub const fn encode(x: i32, z: i32) -> Self {
        Self(pack(x, z))
    }

    #[inline]
    pub const fn decode(self) -> (i32, i32) {
        unpack(self.0)
    }

    #[inline]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Key of the chunk covering world column `(wx, wz)`.
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        Self::encode(align(wx, CHUNK_SIZE), align(wz, CHUNK_SIZE))
    }

    #[inline]
    pub fn origin(self) -> (i32, i32) {
        self.decode()
    }

    pub fn neighbor(self, dir: Direction) -> Self {
        let (x, z) = self.decode();
        let (dx, dz) = dir.delta();
        Self::encode(
            x.wrapping_add(dx * CHUNK_SIZE),
            z.wrapping_add(dz * CHUNK_SIZE),
        )
    }

    /// Local column offsets of `(wx, wz)` inside its covering chunk.
    #[inline]
    pub fn local(wx: i32, wz: i32) -> (usize, usize) {
        (
            wx.rem_euclid(CHUNK_SIZE) as usize,
            wz.rem_euclid(CHUNK_SIZE) as usize,
        )
    }
}

/// Packed zone-origin key, aligned to [`ZONE_SIZE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ZoneKey(i64);

impl ZoneKey {
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        Self(pack(align(wx, ZONE_SIZE), align(wz, ZONE_SIZE)))
    }

    #[inline]
    pub fn origin(self) -> (i32, i32) {
        unpack(self.0)
    }

    /// Origins of the 4x4 chunks inside this zone.
    pub fn chunk_origins(self) -> impl Iterator<Item = (i32, i32)> {
        let (x0, z0) = self.origin();
        (0..ZONE_SIZE / CHUNK_SIZE).flat_map(move |i| {
            (0..ZONE_SIZE / CHUNK_SIZE).map(move |j| (x0 + i * CHUNK_SIZE, z0 + j * CHUNK_SIZE))
        })
    }
}

/// Packed key of a coarse village-planning region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionKey(i64);

impl RegionKey {
    #[inline]
    pub fn containing(wx: i32, wz: i32, region_size: i32) -> Self {
        let size = region_size.max(CHUNK_SIZE);
        Self(pack(align(wx, size), align(wz, size)))
    }

    #[inline]
    pub fn origin(self) -> (i32, i32) {
        unpack(self.0)
    }
}

/// Horizontal neighbor direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    XPos = 0,
    XNeg = 1,
    ZPos = 2,
    ZNeg = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::XPos,
        Direction::XNeg,
        Direction::ZPos,
        Direction::ZNeg,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::XPos => (1, 0),
            Direction::XNeg => (-1, 0),
            Direction::ZPos => (0, 1),
            Direction::ZNeg => (0, -1),
        }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::XPos => Direction::XNeg,
            Direction::XNeg => Direction::XPos,
            Direction::ZPos => Direction::ZNeg,
            Direction::ZNeg => Direction::ZPos,
        }
    }

    /// 90 degree rotation `(x, z) -> (-z, x)`.
    #[inline]
    pub fn rotate_left(self) -> Direction {
        match self {
            Direction::XPos => Direction::ZPos,
            Direction::ZPos => Direction::XNeg,
            Direction::XNeg => Direction::ZNeg,
            Direction::ZNeg => Direction::XPos,
        }
    }

    #[inline]
    pub fn rotate_right(self) -> Direction {
        self.rotate_left().opposite()
    }

    #[inline]
    pub fn runs_along_x(self) -> bool {
        matches!(self, Direction::XPos | Direction::XNeg)
    }
}
