//! # Biome Tint
//!
//! Voxels carry a baked colour that the renderer multiplies into their
//! texture. The colour comes from a Voronoi cell field: every cell has one
//! feature point, the climate at that feature point picks a biome, and the
//! biome's palette colour tints the whole cell.
//!
//! Climate is two noise channels:
//! - Temperature
//! - Humidity

use strata_shared::Rgba8;

use crate::noise::{SimplexNoise, WorldSeed};

/// Biome types, chosen by climate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Biome {
    /// Temperate grassland.
    Plains = 0,
    /// Temperate and humid.
    Forest = 1,
    /// Hot and wet.
    Jungle = 2,
    /// Hot and dry.
    Desert = 3,
    /// Warm and dry.
    Savanna = 4,
    /// Cold and humid.
    Taiga = 5,
    /// Cold and dry.
    Tundra = 6,
    /// Very humid lowland.
    Swamp = 7,
}

impl Biome {
    /// Every biome in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::Plains,
        Self::Forest,
        Self::Jungle,
        Self::Desert,
        Self::Savanna,
        Self::Taiga,
        Self::Tundra,
        Self::Swamp,
    ];

    /// Palette colour baked into voxels of this biome.
    #[must_use]
    pub const fn tint(self) -> Rgba8 {
        match self {
            Self::Plains => Rgba8::new(145, 189, 89, 255),
            Self::Forest => Rgba8::new(104, 164, 64, 255),
            Self::Jungle => Rgba8::new(89, 201, 60, 255),
            Self::Desert => Rgba8::new(191, 183, 85, 255),
            Self::Savanna => Rgba8::new(174, 164, 42, 255),
            Self::Taiga => Rgba8::new(134, 183, 131, 255),
            Self::Tundra => Rgba8::new(128, 180, 151, 255),
            Self::Swamp => Rgba8::new(106, 112, 57, 255),
        }
    }

    /// Classifies climate values in `[-1, 1]`.
    #[must_use]
    pub fn from_climate(temperature: f64, humidity: f64) -> Self {
        match (temperature, humidity) {
            (t, h) if t < -0.3 && h > 0.0 => Self::Taiga,
            (t, _) if t < -0.3 => Self::Tundra,
            (t, h) if t > 0.4 && h > 0.3 => Self::Jungle,
            (t, h) if t > 0.4 && h < -0.2 => Self::Desert,
            (t, h) if t > 0.2 && h < 0.0 => Self::Savanna,
            (_, h) if h > 0.5 => Self::Swamp,
            (_, h) if h > 0.1 => Self::Forest,
            _ => Self::Plains,
        }
    }
}

/// Biome classifier over a Voronoi cell field.
pub struct BiomeClassifier {
    /// Temperature noise
    temperature_noise: SimplexNoise,
    /// Humidity noise
    humidity_noise: SimplexNoise,
    /// Seed for feature point placement
    feature_seed: u64,
    /// Cells per voxel (cell size is `1 / scale` voxels)
    scale: f64,
}

impl BiomeClassifier {
    /// Frequency of the temperature channel, in cells.
    const TEMPERATURE_SCALE: f64 = 0.35;
    /// Frequency of the humidity channel, in cells.
    const HUMIDITY_SCALE: f64 = 0.45;
    /// Fractal octaves of each climate channel.
    const CLIMATE_OCTAVES: u32 = 3;

    /// Creates a classifier from a world seed with cells `1 / scale` voxels wide.
    #[must_use]
    pub fn new(seed: WorldSeed, scale: f64) -> Self {
        Self {
            temperature_noise: SimplexNoise::new(seed.derive(11)),
            humidity_noise: SimplexNoise::new(seed.derive(12)),
            feature_seed: seed.derive(13).value(),
            scale,
        }
    }

    /// Returns the feature point of the cell closest to a world position,
    /// in cell space.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest_feature(&self, x: f64, z: f64) -> (f64, f64) {
        let px = x * self.scale;
        let pz = z * self.scale;
        let cell_x = px.floor() as i64;
        let cell_z = pz.floor() as i64;

        let mut best = (f64::MAX, 0.0, 0.0);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let (fx, fz) = self.feature_point(cell_x + dx, cell_z + dz);
                let distance = (fx - px) * (fx - px) + (fz - pz) * (fz - pz);
                if distance < best.0 {
                    best = (distance, fx, fz);
                }
            }
        }
        (best.1, best.2)
    }

    /// Climate at a cell-space point: `(temperature, humidity)`.
    #[must_use]
    pub fn climate(&self, cx: f64, cz: f64) -> (f64, f64) {
        let temperature = self.temperature_noise.fractal(
            cx,
            cz,
            Self::TEMPERATURE_SCALE,
            Self::CLIMATE_OCTAVES,
        );
        let humidity = self.humidity_noise.fractal(
            cx + 31.7,
            cz - 12.3,
            Self::HUMIDITY_SCALE,
            Self::CLIMATE_OCTAVES,
        );
        (temperature, humidity)
    }

    /// Biome of the cell containing a world column.
    #[must_use]
    pub fn classify(&self, x: f64, z: f64) -> Biome {
        let (fx, fz) = self.nearest_feature(x, z);
        let (temperature, humidity) = self.climate(fx, fz);
        Biome::from_climate(temperature, humidity)
    }

    /// Tint of the cell containing a world column.
    #[inline]
    #[must_use]
    pub fn tint(&self, x: f64, z: f64) -> Rgba8 {
        self.classify(x, z).tint()
    }

    /// Jittered feature point of a cell, in cell space.
    #[allow(clippy::cast_precision_loss)]
    fn feature_point(&self, cell_x: i64, cell_z: i64) -> (f64, f64) {
        let hash = hash_cell(self.feature_seed, cell_x, cell_z);
        let jitter_x = (hash & 0xFFFF) as f64 / 65536.0;
        let jitter_z = ((hash >> 16) & 0xFFFF) as f64 / 65536.0;
        (cell_x as f64 + jitter_x, cell_z as f64 + jitter_z)
    }
}

/// Integer hash of a cell coordinate (splitmix64 finaliser).
#[inline]
#[allow(clippy::cast_sign_loss)]
fn hash_cell(seed: u64, x: i64, z: i64) -> u64 {
    let mut h = seed
        ^ (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (z as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}
