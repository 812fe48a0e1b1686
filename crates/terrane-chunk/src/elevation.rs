/// Vertical coordinate of a block write or read.
///
/// Structure patterns are authored relative to the ground of the column they
/// land in, which is not known until that column's chunk exists. `Surface(0)`
/// is the first cell above the ground, `Surface(-1)` the topmost ground block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Elevation {
    Absolute(i32),
    Surface(i32),
}

impl Elevation {
    /// Raw heights strictly inside this band are surface offsets.
    pub const SURFACE_BAND: (i32, i32) = (500, 1500);
    /// Raw height that encodes `Surface(0)`.
    pub const SURFACE_ORIGIN: i32 = 1000;

    /// Interprets a raw height under the legacy band convention.
    #[inline]
    pub fn from_raw(y: i32) -> Self {
        let (lo, hi) = Self::SURFACE_BAND;
        if y > lo && y < hi {
            Elevation::Surface(y - Self::SURFACE_ORIGIN)
        } else {
            Elevation::Absolute(y)
        }
    }

    /// Encodes back into the raw band convention.
    #[inline]
    pub fn to_raw(self) -> i32 {
        match self {
            Elevation::Absolute(y) => y,
            Elevation::Surface(dy) => dy + Self::SURFACE_ORIGIN,
        }
    }

    /// Absolute height given the column's stored surface height.
    #[inline]
    pub fn resolve(self, surface_height: i32) -> i32 {
        match self {
            Elevation::Absolute(y) => y,
            Elevation::Surface(dy) => surface_height + dy,
        }
    }

    #[inline]
    pub fn offset(self, dy: i32) -> Self {
        match self {
            Elevation::Absolute(y) => Elevation::Absolute(y + dy),
            Elevation::Surface(s) => Elevation::Surface(s + dy),
        }
    }
}
