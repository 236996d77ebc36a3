//! Per-ant random streams.

use rand::rngs::SmallRng;
use rand::SeedableRng;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// RNG for one ant, derived only from `(seed, iteration, ant)`.
///
/// Independent of the thread that runs the ant, so parallel and sequential
/// runs draw the same numbers.
pub(crate) fn ant_rng(seed: u64, iteration: usize, ant: usize) -> SmallRng {
    let mixed = splitmix64(splitmix64(splitmix64(seed) ^ iteration as u64) ^ ant as u64);
    SmallRng::seed_from_u64(mixed)
}
