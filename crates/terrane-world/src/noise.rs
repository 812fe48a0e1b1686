use fastnoise_lite::{FastNoiseLite, NoiseType};
use terrane_blocks::Biome;

use crate::height::{ColumnSample, resolve_column};
use crate::worldgen::WorldGenParams;

#[inline]
fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

#[inline]
fn hash2(ix: i32, iz: i32, seed: u32) -> u32 {
    mix((ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d))
}

#[inline]
fn to01(h: u32) -> f32 {
    ((h & 0x00FF_FFFF) as f32) / 16_777_216.0
}

#[inline]
fn salted(world_seed: i32, salt: u32) -> u32 {
    ((world_seed as u32) ^ salt).wrapping_add(0x9E37_79B9)
}

/// Deterministic value in `[0, 1)` for a world column.
pub fn hash01(world_seed: i32, x: i32, z: i32, salt: u32) -> f32 {
    to01(hash2(x, z, salted(world_seed, salt)))
}

/// Deterministic value in `[0, 1)` for a world cell.
pub fn hash01_3(world_seed: i32, x: i32, y: i32, z: i32, salt: u32) -> f32 {
    let h = hash2(x, z, salted(world_seed, salt)) ^ (y as u32).wrapping_mul(0x1656_67b1);
    to01(mix(h))
}

/// Two independent values in `[0, 1)` for a world column.
pub fn jitter2(world_seed: i32, x: i32, z: i32, salt: u32) -> (f32, f32) {
    (
        hash01(world_seed, x, z, salt),
        hash01(world_seed, x, z, salt ^ 0x5bd1_e995),
    )
}

fn noise(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut n = FastNoiseLite::with_seed(seed);
    n.set_noise_type(Some(NoiseType::OpenSimplex2));
    n.set_frequency(Some(frequency));
    n
}

#[inline]
fn unit(v: f32) -> f32 {
    (v * 0.5 + 0.5).clamp(0.0, 1.0)
}

fn fractal2(n: &FastNoiseLite, x: f32, z: f32, octaves: i32) -> f32 {
    let mut amp = 1.0_f32;
    let mut freq = 1.0_f32;
    let mut sum = 0.0_f32;
    let mut max_amp = 0.0_f32;
    for _ in 0..octaves.max(1) {
        sum += n.get_noise_2d(x * freq, z * freq) * amp;
        max_amp += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    if max_amp > 0.0 { sum / max_amp } else { sum }
}

/// Climate classification of a non-river land column.
pub fn classify_climate(temperature: f32, moisture: f32) -> Biome {
    if temperature < 0.3 {
        if moisture > 0.5 { Biome::Taiga } else { Biome::Tundra }
    } else if temperature > 0.65 && moisture < 0.4 {
        Biome::Desert
    } else if moisture > 0.6 {
        Biome::Forest
    } else {
        Biome::Plains
    }
}

fn biome_relief(b: Biome) -> f32 {
    match b {
        Biome::Forest => 1.4,
        Biome::Tundra | Biome::Taiga => 1.2,
        Biome::Desert => 0.6,
        Biome::River => 0.0,
        _ => 1.0,
    }
}

/// The scalar fields that drive terrain shape, seeded from the world seed.
///
/// All samplers take `&self`, so one field can be shared by every
/// generation worker.
pub struct NoiseField {
    seed: i32,
    bedrock: FastNoiseLite,
    beach: FastNoiseLite,
    hills: FastNoiseLite,
    temperature: FastNoiseLite,
    moisture: FastNoiseLite,
    river: FastNoiseLite,
    hills_octaves: i32,
    hills_amplitude: f32,
    river_width: f32,
}

impl NoiseField {
    pub fn new(params: &WorldGenParams) -> Self {
        let seed = params.seed;
        Self {
            seed,
            bedrock: noise(seed, params.bedrock_frequency),
            beach: noise(seed ^ 0x0BEA_C400, params.beach_frequency),
            hills: noise(seed ^ 99_173, params.hills_frequency),
            temperature: noise(seed ^ 0x1203_5F31, params.temperature_frequency),
            moisture: noise(
                ((seed as u32) ^ 0x92E3_A1B2u32) as i32,
                params.moisture_frequency,
            ),
            river: noise(seed ^ 41_337, params.river_frequency),
            hills_octaves: params.hills_octaves,
            hills_amplitude: params.hills_amplitude,
            river_width: params.river_width,
        }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Continental field in `[0, 1]`; low values are ocean.
    pub fn bedrock(&self, x: i32, z: i32) -> f32 {
        unit(fractal2(&self.bedrock, x as f32, z as f32, 3))
    }

    /// Beach width field in `[0, 1]`.
    pub fn beach(&self, x: i32, z: i32) -> f32 {
        unit(self.beach.get_noise_2d(x as f32, z as f32))
    }

    /// Ground height above the continental base (never negative) and the
    /// climate biome of the column.
    pub fn ground(&self, x: i32, z: i32) -> (f32, Biome) {
        let (fx, fz) = (x as f32, z as f32);
        if self.river.get_noise_2d(fx, fz).abs() < self.river_width {
            return (0.0, Biome::River);
        }
        let t = unit(self.temperature.get_noise_2d(fx, fz));
        let m = unit(self.moisture.get_noise_2d(fx, fz));
        let biome = classify_climate(t, m);
        let hills = unit(fractal2(&self.hills, fx, fz, self.hills_octaves));
        (hills * self.hills_amplitude * biome_relief(biome), biome)
    }

    pub fn sample_column(&self, x: i32, z: i32) -> ColumnSample {
        let (g, biome) = self.ground(x, z);
        resolve_column(self.bedrock(x, z), self.beach(x, z), g, biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_deterministic_and_in_range() {
        for i in -50..50 {
            let a = hash01(42, i, i * 7, 3);
            assert_eq!(a, hash01(42, i, i * 7, 3));
            assert!((0.0..1.0).contains(&a));
            let (jx, jz) = jitter2(42, i, -i, 9);
            assert!((0.0..1.0).contains(&jx) && (0.0..1.0).contains(&jz));
            assert!((0.0..1.0).contains(&hash01_3(42, i, 70, -i, 4)));
        }
        assert_ne!(hash01(1, 5, 5, 0), hash01(2, 5, 5, 0));
    }

    #[test]
    fn climate_buckets() {
        assert_eq!(classify_climate(0.1, 0.2), Biome::Tundra);
        assert_eq!(classify_climate(0.1, 0.8), Biome::Taiga);
        assert_eq!(classify_climate(0.9, 0.1), Biome::Desert);
        assert_eq!(classify_climate(0.5, 0.9), Biome::Forest);
        assert_eq!(classify_climate(0.5, 0.5), Biome::Plains);
    }

    #[test]
    fn fields_stay_in_unit_range() {
        let f = NoiseField::new(&WorldGenParams::default());
        for x in (-2000..2000).step_by(97) {
            for z in (-2000..2000).step_by(89) {
                let b = f.bedrock(x, z);
                assert!((0.0..=1.0).contains(&b));
                assert!((0.0..=1.0).contains(&f.beach(x, z)));
                let (g, _) = f.ground(x, z);
                assert!(g >= 0.0);
                let s = f.sample_column(x, z);
                assert!((0..=256).contains(&s.height));
            }
        }
    }
}
