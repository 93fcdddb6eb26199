//! Deterministic randomness for generation runs.
//!
//! One caller-seeded master generator derives an independent stream per named
//! concern, so draws in one part of the pipeline never perturb another and a
//! fixed seed always reproduces the same plane.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Borrow the stream for a named concern, creating it on first use. A
    /// stream's seed depends only on the master seed and the order in which
    /// streams are first requested.
    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let master = &mut self.master;
        let inner = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()));
        StreamRng { inner }
    }
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl RngCore for StreamRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_replays_identically() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);
        let draws_a: Vec<u64> = (0..8).map(|_| a.stream("placement").next_u64()).collect();
        let draws_b: Vec<u64> = (0..8).map(|_| b.stream("placement").next_u64()).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn streams_are_independent() {
        let mut manager = RngManager::new(7);
        let first: u64 = manager.stream("placement").next_u64();
        // draining another stream must not disturb the first one's sequence
        let mut fresh = RngManager::new(7);
        let _ = fresh.stream("placement").next_u64();
        for _ in 0..32 {
            let _ = fresh.stream("other").next_u64();
        }
        let mut replay = RngManager::new(7);
        assert_eq!(replay.stream("placement").next_u64(), first);
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut manager = RngManager::new(1);
        let mut stream = manager.stream("placement");
        for _ in 0..100 {
            let value: f64 = stream.gen_range(2.3..3.7);
            assert!((2.3..3.7).contains(&value));
        }
    }
}
