use terrane_blocks::Biome;

/// Bedrock field value below which a column is ocean.
pub const OCEAN_THRESHOLD: f32 = 0.53;
/// Height of the ocean surface and of every ocean column.
pub const SEA_LEVEL: i32 = 64;
/// Height gained per unit of bedrock field above the ocean threshold.
pub const BEDROCK_SCALE: f32 = 64.0;
/// Beach band width per unit of beach field.
pub const BEACH_SCALE: f32 = 0.1;
/// Columns up to this height inside the beach band read as beach.
pub const BEACH_MAX_HEIGHT: i32 = SEA_LEVEL + 5;

const MAX_HEIGHT: i32 = 256;

/// Which side of the ocean/beach/land thresholds a bedrock value falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    DeepOcean,
    ShallowOcean,
    Beach,
    Land,
}

impl Band {
    pub fn classify(bedrock: f32, beach_width: f32) -> Band {
        if bedrock < OCEAN_THRESHOLD / 2.0 {
            Band::DeepOcean
        } else if bedrock < OCEAN_THRESHOLD {
            Band::ShallowOcean
        } else if bedrock < OCEAN_THRESHOLD + beach_width {
            Band::Beach
        } else {
            Band::Land
        }
    }

    #[inline]
    pub fn is_ocean(self) -> bool {
        matches!(self, Band::DeepOcean | Band::ShallowOcean)
    }
}

/// Terrain height of a column.
///
/// Across the beach band the land height is eased in quadratically from sea
/// level, so the result is continuous at both band edges and non-decreasing in
/// `bedrock` for non-negative `ground`.
pub fn column_height(bedrock: f32, beach_width: f32, ground: f32) -> i32 {
    let over = bedrock - OCEAN_THRESHOLD;
    let raw = match Band::classify(bedrock, beach_width) {
        Band::DeepOcean | Band::ShallowOcean => return SEA_LEVEL,
        Band::Beach => {
            let t = over / beach_width;
            SEA_LEVEL as f32 + t * t * (ground + over * BEDROCK_SCALE)
        }
        Band::Land => SEA_LEVEL as f32 + ground + over * BEDROCK_SCALE,
    };
    (raw as i32).clamp(0, MAX_HEIGHT)
}

/// Resolved height and classification of one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    pub height: i32,
    /// Biome used to pick the column's fill block.
    pub biome: Biome,
    /// Biome the column contributes when it is the chunk's center column.
    pub chunk_biome: Biome,
    pub band: Band,
}

/// Combines the three field values of a column into its height and biome.
pub fn resolve_column(
    bedrock: f32,
    beach_field: f32,
    ground_height: f32,
    ground_biome: Biome,
) -> ColumnSample {
    let beach_width = BEACH_SCALE * beach_field;
    let band = Band::classify(bedrock, beach_width);
    let height = column_height(bedrock, beach_width, ground_height);
    let (biome, chunk_biome) = match band {
        Band::DeepOcean | Band::ShallowOcean => (Biome::Ocean, Biome::Ocean),
        Band::Beach => {
            if height <= BEACH_MAX_HEIGHT && ground_biome != Biome::River {
                (Biome::Beach, Biome::Beach)
            } else {
                (ground_biome, Biome::Beach)
            }
        }
        Band::Land => (ground_biome, ground_biome),
    };
    ColumnSample {
        height,
        biome,
        chunk_biome,
        band,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocean_columns_sit_at_sea_level() {
        let s = resolve_column(0.1, 0.5, 30.0, Biome::Plains);
        assert_eq!(s.band, Band::DeepOcean);
        assert_eq!(s.height, SEA_LEVEL);
        assert_eq!(s.biome, Biome::Ocean);
        let s = resolve_column(0.5, 0.5, 30.0, Biome::Plains);
        assert_eq!(s.band, Band::ShallowOcean);
    }

    #[test]
    fn low_beach_reads_as_beach_unless_river() {
        let s = resolve_column(0.535, 1.0, 5.0, Biome::Plains);
        assert_eq!(s.band, Band::Beach);
        assert_eq!(s.biome, Biome::Beach);
        let r = resolve_column(0.535, 1.0, 5.0, Biome::River);
        assert_eq!(r.biome, Biome::River);
        assert_eq!(r.chunk_biome, Biome::Beach);
    }

    #[test]
    fn zero_width_beach_goes_straight_to_land() {
        let s = resolve_column(0.6, 0.0, 10.0, Biome::Desert);
        assert_eq!(s.band, Band::Land);
        assert_eq!(s.height, (64.0 + 10.0 + 0.07 * 64.0) as i32);
    }

    #[test]
    fn height_is_clamped() {
        assert_eq!(column_height(1.0, 0.0, 1000.0), 256);
    }
}
