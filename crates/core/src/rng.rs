use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform in `1..=faces`. A die with no faces rolls as a one-sided die.
    pub fn roll_die(&mut self, faces: u32) -> u32 {
        self.rng.gen_range(1..=faces.max(1))
    }
}
