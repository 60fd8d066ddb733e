use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Draw from a generator whose whole state is a single `u64` kept in the
/// match snapshot. The state advances on every call, so restoring a snapshot
/// replays the same sequence.
pub fn roll<T>(state: &mut u64, f: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut rng = StdRng::seed_from_u64(*state);
    let value = f(&mut rng);
    *state = rng.next_u64();
    value
}
