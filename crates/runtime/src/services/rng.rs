use combat_core::RngOracle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// [`RngOracle`] backed by `rand`'s standard generator.
#[derive(Clone, Debug)]
pub struct StdRngOracle {
    rng: StdRng,
}

impl StdRngOracle {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RngOracle for StdRngOracle {
    fn next_u32(&mut self) -> u32 {
        self.rng.r#gen()
    }

    fn next_f32(&mut self) -> f32 {
        self.rng.r#gen()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = StdRngOracle::seeded(7);
        let mut b = StdRngOracle::seeded(7);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = StdRngOracle::seeded(42);
        for _ in 0..256 {
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
            assert!(rng.pick(4) < 4);
        }
        assert_eq!(rng.pick(0), 0);
    }
}
