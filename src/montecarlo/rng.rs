//! Random number sources for scenario generation
//!
//! Seeded runs use a linear congruential generator so results are
//! bit-reproducible across platforms; unseeded runs fall back to a
//! platform-seeded `SmallRng`. RNG state is always instance-scoped —
//! independent simulators never share a stream.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

/// Numerical Recipes LCG constants
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Weyl constant for deriving independent per-scenario substreams
const SUBSTREAM_MIX: u64 = 0x9E37_79B9;

/// Seeded linear congruential generator, modulus 2^32
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed ^ (seed >> 32)) as u32,
        }
    }

    /// Independent deterministic substream for one scenario index
    ///
    /// Parallel scenario evaluation must not share one sequential stream;
    /// mixing the seed with the index (plus warm-up steps) decorrelates
    /// neighbouring scenarios regardless of thread scheduling.
    pub fn substream(seed: u64, index: usize) -> Self {
        let mixed = seed
            .wrapping_add((index as u64 + 1).wrapping_mul(SUBSTREAM_MIX));
        let mut rng = Self::new(mixed);
        for _ in 0..3 {
            rng.next_u32();
        }
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform draw in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (u32::MAX as f64 + 1.0)
    }
}

/// Per-scenario random source: seeded LCG or platform fallback
pub enum ScenarioRng {
    Seeded(Lcg),
    Platform(SmallRng),
}

impl ScenarioRng {
    /// Substream for a scenario index, honoring an optional seed
    pub fn for_scenario(seed: Option<u64>, index: usize) -> Self {
        match seed {
            Some(seed) => ScenarioRng::Seeded(Lcg::substream(seed, index)),
            None => {
                let platform_seed = rand::rng().next_u64();
                ScenarioRng::Platform(SmallRng::seed_from_u64(platform_seed))
            }
        }
    }

    pub fn next_f64(&mut self) -> f64 {
        match self {
            ScenarioRng::Seeded(lcg) => lcg.next_f64(),
            ScenarioRng::Platform(rng) => rng.random::<f64>(),
        }
    }

    /// Standard normal draw via Box–Muller (consumes two uniforms)
    pub fn next_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(f64::EPSILON);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}
