//! # Simplex Noise
//!
//! Seeded 2D and 3D simplex noise plus the fractal and clamped helpers
//! terrain generation is written in.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, every sample is bit-identical on any
//! platform. The permutation table is shuffled with a fixed xorshift
//! stream derived from the seed.

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one noise channel.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x5354_5241_5441_0001)
    }
}

/// Shuffled permutation table shared by the 2D and 3D samplers.
struct PermutationTable {
    /// 256 entries, doubled so corner lookups never wrap.
    perm: [u8; 512],
}

impl PermutationTable {
    const GRAD2: [[i8; 2]; 8] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
    ];

    const GRAD3: [[i8; 3]; 12] = [
        [1, 1, 0], [-1, 1, 0], [1, -1, 0], [-1, -1, 0],
        [1, 0, 1], [-1, 0, 1], [1, 0, -1], [-1, 0, -1],
        [0, 1, 1], [0, -1, 1], [0, 1, -1], [0, -1, -1],
    ];

    #[allow(clippy::cast_possible_truncation)]
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64; a zero state would never move.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }

    #[inline]
    fn gradient2(hash: usize) -> [i8; 2] {
        Self::GRAD2[hash % 8]
    }

    #[inline]
    fn gradient3(hash: usize) -> [i8; 3] {
        Self::GRAD3[hash % 12]
    }
}

/// Seeded simplex noise generator.
///
/// Raw samples lie in `[-1, 1]`; the `clamped*` variants remap to `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
///
/// let cave = noise.clamped3(4.0, 20.0, 9.0, 0.15);
/// assert!((0.0..=1.0).contains(&cave));
/// ```
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for the 2D simplex grid, `(sqrt(3) - 1) / 2`.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor for the 2D simplex grid, `(3 - sqrt(3)) / 6`.
    const G2: f64 = 0.211_324_865_405_187;
    /// Skewing factor for the 3D simplex grid.
    const F3: f64 = 1.0 / 3.0;
    /// Unskewing factor for the 3D simplex grid.
    const G3: f64 = 1.0 / 6.0;

    /// Amplitude decay per octave.
    pub const PERSISTENCE: f64 = 0.5;
    /// Frequency growth per octave.
    pub const LACUNARITY: f64 = 2.0;

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise, in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::many_single_char_names)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1 as u8) + Self::G2;
        let y1 = y0 - f64::from(j1 as u8) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let p = &self.perm_table;

        let gi0 = p.get(ii + p.get(jj));
        let gi1 = p.get(ii + i1 + p.get(jj + j1));
        let gi2 = p.get(ii + 1 + p.get(jj + 1));

        let n0 = Self::contribution2(x0, y0, gi0);
        let n1 = Self::contribution2(x1, y1, gi1);
        let n2 = Self::contribution2(x2, y2, gi2);

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution2(x: f64, y: f64, hash: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient2(hash);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Samples 3D simplex noise, in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::many_single_char_names, clippy::similar_names)]
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let skew = (x + y + z) * Self::F3;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);
        let k = fast_floor(z + skew);

        let unskew = f64::from(i + j + k) * Self::G3;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);
        let z0 = z - (f64::from(k) - unskew);

        // Second and third corners of the simplex, by coordinate ordering.
        let (o1, o2): ([usize; 3], [usize; 3]) = if x0 >= y0 {
            if y0 >= z0 {
                ([1, 0, 0], [1, 1, 0])
            } else if x0 >= z0 {
                ([1, 0, 0], [1, 0, 1])
            } else {
                ([0, 0, 1], [1, 0, 1])
            }
        } else if y0 < z0 {
            ([0, 0, 1], [0, 1, 1])
        } else if x0 < z0 {
            ([0, 1, 0], [0, 1, 1])
        } else {
            ([0, 1, 0], [1, 1, 0])
        };

        let corner = |offset: [usize; 3], g: f64| {
            (
                x0 - offset[0] as f64 + g,
                y0 - offset[1] as f64 + g,
                z0 - offset[2] as f64 + g,
            )
        };
        let c0 = (x0, y0, z0);
        let c1 = corner(o1, Self::G3);
        let c2 = corner(o2, 2.0 * Self::G3);
        let c3 = corner([1, 1, 1], 3.0 * Self::G3);

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let kk = (k & 255) as usize;
        let p = &self.perm_table;
        let hash = |o: [usize; 3]| p.get(ii + o[0] + p.get(jj + o[1] + p.get(kk + o[2])));

        let n0 = Self::contribution3(c0, hash([0, 0, 0]));
        let n1 = Self::contribution3(c1, hash(o1));
        let n2 = Self::contribution3(c2, hash(o2));
        let n3 = Self::contribution3(c3, hash([1, 1, 1]));

        (32.0 * (n0 + n1 + n2 + n3)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution3((x, y, z): (f64, f64, f64), hash: usize) -> f64 {
        let t = 0.6 - x * x - y * y - z * z;
        if t < 0.0 {
            0.0
        } else {
            let g = PermutationTable::gradient3(hash);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(g[0]) + y * f64::from(g[1]) + z * f64::from(g[2]))
        }
    }

    /// Amplitude-normalised fractal noise, in `[-1, 1]`.
    ///
    /// Octave `n` samples at `frequency * 2^n` with amplitude `0.5^n`.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, frequency: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= Self::PERSISTENCE;
            frequency *= Self::LACUNARITY;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }

    /// 3D counterpart of [`SimplexNoise::fractal`].
    #[must_use]
    pub fn fractal3(&self, x: f64, y: f64, z: f64, frequency: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample3(x * frequency, y * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= Self::PERSISTENCE;
            frequency *= Self::LACUNARITY;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }

    /// Single-octave 2D sample at `scale`, remapped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn clamped(&self, x: f64, y: f64, scale: f64) -> f64 {
        (self.sample(x * scale, y * scale) + 1.0) * 0.5
    }

    /// Single-octave 3D sample at `scale`, remapped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn clamped3(&self, x: f64, y: f64, z: f64, scale: f64) -> f64 {
        (self.sample3(x * scale, y * scale, z * scale) + 1.0) * 0.5
    }
}

/// Floor to i32 without going through `f64::floor`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}
