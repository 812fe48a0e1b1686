use terrane_blocks::{Biome, BlockType};
use terrane_chunk::BlockGrid;
use terrane_world::{NoiseField, RegionKey, WorldGenParams, hash01, jitter2};

use crate::carve::carve;
use crate::structure::{BlockSink, Structure, StructureKind};
use crate::village::{VillagePlan, grow_village};

const SALT_TREE_SITE: u32 = 0x0022_F615;
const SALT_VILLAGE_ROLL: u32 = 0x0000_B15D;
const SALT_VILLAGE_SITE: u32 = 0x007D_0B1C;

/// Decides where structures go. Holds only worldgen parameters, so a single
/// planner is shared by every generation worker.
#[derive(Clone, Debug)]
pub struct StructurePlanner {
    params: WorldGenParams,
}

impl StructurePlanner {
    pub fn new(params: &WorldGenParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Structures that belong to a single freshly filled chunk.
    pub fn local_structures(&self, grid: &BlockGrid) -> Vec<Structure> {
        let mut out = Vec::new();
        match grid.biome() {
            Biome::Plains => {
                let (ox, oz) = grid.origin();
                let (jx, jz) = jitter2(self.params.seed, ox, oz, SALT_TREE_SITE);
                let lx = (14.0 * jx).clamp(0.0, 15.0) as usize;
                let lz = (14.0 * jz).clamp(0.0, 15.0) as usize;
                let ground = grid.height_at(lx, lz);
                if ground < self.params.tree_max_height
                    && grid.get(lx, ground - 1, lz) == BlockType::Grass
                {
                    out.push(Structure::new(
                        StructureKind::OakTree { ground },
                        ox + lx as i32,
                        oz + lz as i32,
                    ));
                }
            }
            // Other biomes have no local structures yet.
            _ => {}
        }
        out
    }

    #[inline]
    pub fn region_of(&self, wx: i32, wz: i32) -> RegionKey {
        RegionKey::containing(wx, wz, self.params.region_size)
    }

    /// Village center of `region`, if the region has one. Centers keep a
    /// quarter of the region size away from its edges and never sit in ocean.
    pub fn village_site(&self, region: RegionKey, field: &NoiseField) -> Option<(i32, i32)> {
        let seed = self.params.seed;
        let (ox, oz) = region.origin();
        if hash01(seed, ox, oz, SALT_VILLAGE_ROLL) >= self.params.village_chance {
            return None;
        }
        let size = self.params.region_size;
        let (jx, jz) = jitter2(seed, ox, oz, SALT_VILLAGE_SITE);
        let cx = ox + size / 4 + (jx * (size / 2) as f32) as i32;
        let cz = oz + size / 4 + (jz * (size / 2) as f32) as i32;
        if field.sample_column(cx, cz).band.is_ocean() {
            return None;
        }
        Some((cx, cz))
    }

    pub fn plan_village(&self, center: (i32, i32)) -> VillagePlan {
        grow_village(&self.params, center)
    }

    pub fn carve<S: BlockSink + ?Sized>(&self, s: &Structure, sink: &mut S) {
        carve(&self.params, s, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrane_chunk::ColumnMap;
    use terrane_world::ChunkKey;

    fn flat(biome: Biome, height: i32) -> BlockGrid {
        let mut cols = ColumnMap::default();
        for x in 0..16 {
            for z in 0..16 {
                cols.heights[x][z] = height;
                cols.biomes[x][z] = biome;
            }
        }
        cols.chunk_biome = biome;
        BlockGrid::filled(ChunkKey::encode(32, -48), &cols)
    }

    #[test]
    fn plains_chunk_gets_one_tree_inside_it() {
        let planner = StructurePlanner::new(&WorldGenParams::default());
        let s = planner.local_structures(&flat(Biome::Plains, 70));
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].kind, StructureKind::OakTree { ground: 70 });
        assert!((32..48).contains(&s[0].x) && (-48..-32).contains(&s[0].z));
    }

    #[test]
    fn no_trees_off_plains_or_above_cutoff() {
        let planner = StructurePlanner::new(&WorldGenParams::default());
        assert!(planner.local_structures(&flat(Biome::Desert, 70)).is_empty());
        assert!(planner.local_structures(&flat(Biome::Plains, 200)).is_empty());
    }

    #[test]
    fn village_site_respects_chance_and_region() {
        let mut p = WorldGenParams::default();
        p.village_chance = 0.0;
        let field = NoiseField::new(&p);
        let never = StructurePlanner::new(&p);
        assert!(never.village_site(never.region_of(0, 0), &field).is_none());

        p.village_chance = 1.0;
        let always = StructurePlanner::new(&p);
        for rx in -4..4 {
            let region = always.region_of(rx * 512, 0);
            if let Some((cx, cz)) = always.village_site(region, &field) {
                assert_eq!(always.region_of(cx, cz), region);
                assert!(!field.sample_column(cx, cz).band.is_ocean());
            }
        }
    }
}
