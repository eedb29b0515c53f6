//! Live randomness for real sessions.
//!
//! The rules only see [`RngOracle`]. Production turns draw from the OS-seeded
//! [`LiveRng`]; a configured seed switches every stream to a [`PcgRng`] keyed
//! by run, turn and purpose so a whole session replays exactly.

use game_core::{PcgRng, RngOracle, compute_seed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `rand`-backed oracle.
#[derive(Debug)]
pub struct LiveRng(StdRng);

impl LiveRng {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngOracle for LiveRng {
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.0.gen_range(0..bound)
    }
}

/// What a stream of draws is for; keeps seeded streams independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    Turn,
    Stats,
    Floor,
}

impl Stream {
    const fn context(self) -> u32 {
        match self {
            Self::Turn => 0,
            Self::Stats => 1,
            Self::Floor => 2,
        }
    }
}

/// Where per-request randomness comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RngSource {
    #[default]
    Live,
    Seeded(u64),
}

impl RngSource {
    /// Draws for one request. `key` names the run (or character) and `step`
    /// the turn within it.
    pub fn stream(self, purpose: Stream, key: u64, step: u64) -> Box<dyn RngOracle + Send> {
        match self {
            Self::Live => Box::new(LiveRng::from_entropy()),
            Self::Seeded(base) => Box::new(PcgRng::seeded(compute_seed(
                base,
                key,
                step,
                purpose.context(),
            ))),
        }
    }
}
