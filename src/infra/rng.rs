use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::RandomSource;

/// Криптографически неважный, но честный системный RNG (`thread_rng`).
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и реплея.
/// Одинаковый seed – одинаковые колоды.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// RNG стола: системный или с фиксированным seed (из конфига сервиса).
#[derive(Clone, Debug)]
pub enum TableRng {
    System(SystemRng),
    Seeded(DeterministicRng),
}

impl TableRng {
    /// Seed стола выводится из seed сервиса и id стола, чтобы столы не делили колоды.
    pub fn for_table(seed: Option<u64>, table_id: u64) -> Self {
        match seed {
            Some(seed) => TableRng::Seeded(DeterministicRng::from_seed(
                seed ^ table_id.wrapping_mul(0x9E37_79B9_7F4A_7C15),
            )),
            None => TableRng::System(SystemRng),
        }
    }
}

impl RandomSource for TableRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        match self {
            TableRng::System(rng) => rng.shuffle(slice),
            TableRng::Seeded(rng) => rng.shuffle(slice),
        }
    }
}
