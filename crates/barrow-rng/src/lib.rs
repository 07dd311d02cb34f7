//! Seeded random streams for the barrow engine.
//!
//! Every source of randomness in the engine is a named stream backed by its
//! own ChaCha generator, so draws on one stream never shift the sequence of
//! another. Level generation gets a fresh stream derived from (seed, depth),
//! which makes level layout a pure function of the game seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Game random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
/// Note: RNG position is not serialized; a restored game continues from the
/// top of the sequence for the original seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1. A zero bound is a caller bug.
    pub fn rn2(&mut self, n: u32) -> u32 {
        assert!(n > 0, "rn2 called with bound 0");
        self.rng.gen_range(0..n)
    }

    /// Returns 1..=n. A zero bound is a caller bug.
    pub fn rnd(&mut self, n: u32) -> u32 {
        assert!(n > 0, "rnd called with bound 0");
        self.rng.gen_range(1..=n)
    }

    /// Returns base + rn2(spread), the classic rn1(spread, base) idiom.
    pub fn rn1(&mut self, spread: u32, base: i32) -> i32 {
        base + self.rn2(spread) as i32
    }

    /// Roll n dice with m sides and sum them. Zero dice roll to zero.
    pub fn dice(&mut self, n: u32, m: u32) -> u32 {
        (0..n).map(|_| self.rnd(m)).sum()
    }

    /// Luck-adjusted rn2: positive luck nudges the result toward 0.
    pub fn rnl(&mut self, n: u32, luck: i8) -> u32 {
        let mut result = self.rn2(n) as i32;
        if luck != 0 && self.rn2(37 + luck.unsigned_abs() as u32) != 0 {
            result -= luck as i32;
        }
        result.clamp(0, n as i32 - 1) as u32
    }

    /// Open-ended 1..cap escalation: keep bumping while rn2(x) lands on 0.
    /// Used for enchantment magnitudes; cap scales with experience.
    pub fn rne(&mut self, x: u32, cap: u32) -> u32 {
        let cap = cap.max(1);
        let mut tmp = 1;
        while tmp < cap && self.one_in(x) {
            tmp += 1;
        }
        tmp
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true with probability percent/100
    pub fn percent(&mut self, percent: u32) -> bool {
        self.rn2(100) < percent
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rn2(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Named persistent streams. Level generation is not listed here because it
/// is derived per depth, not advanced across the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Stream {
    /// General gameplay: combat rolls, monster spawns, item effects.
    Core,
    /// Armor over-enchantment explosions.
    ArmorEnchant,
    /// Potion mixing outcomes.
    Alchemy,
    /// How many items a scroll of identify reveals.
    IdentifyCount,
}

impl Stream {
    fn tag(self) -> u64 {
        match self {
            Stream::Core => 0x636f_7265,
            Stream::ArmorEnchant => 0x6172_6d6f,
            Stream::Alchemy => 0x616c_6368,
            Stream::IdentifyCount => 0x6964_656e,
        }
    }
}

const LEVEL_GEN_TAG: u64 = 0x6c65_766c;

/// splitmix64 finalizer, used to spread a (seed, tag) pair over the full
/// 64-bit space before seeding a stream.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn derive_seed(root: u64, tag: u64, salt: u64) -> u64 {
    mix(root ^ mix(tag).wrapping_add(salt))
}

/// The full set of random streams for one game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngPool {
    seed: u64,
    core: GameRng,
    armor_enchant: GameRng,
    alchemy: GameRng,
    identify_count: GameRng,
}

impl RngPool {
    /// Build all streams from one root seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            core: GameRng::new(derive_seed(seed, Stream::Core.tag(), 0)),
            armor_enchant: GameRng::new(derive_seed(seed, Stream::ArmorEnchant.tag(), 0)),
            alchemy: GameRng::new(derive_seed(seed, Stream::Alchemy.tag(), 0)),
            identify_count: GameRng::new(derive_seed(seed, Stream::IdentifyCount.tag(), 0)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Root seed for this session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Borrow a named persistent stream.
    pub fn stream(&mut self, id: Stream) -> &mut GameRng {
        match id {
            Stream::Core => &mut self.core,
            Stream::ArmorEnchant => &mut self.armor_enchant,
            Stream::Alchemy => &mut self.alchemy,
            Stream::IdentifyCount => &mut self.identify_count,
        }
    }

    /// Draw from a named stream: returns a value in 0..bound.
    pub fn draw(&mut self, id: Stream, bound: u32) -> u32 {
        self.stream(id).rn2(bound)
    }

    /// Shorthand for the gameplay stream.
    pub fn core(&mut self) -> &mut GameRng {
        &mut self.core
    }

    /// Fresh generation stream for one dungeon depth. Deriving rather than
    /// advancing a shared stream keeps level layout a function of
    /// (seed, depth) alone, untouched by play history.
    pub fn level_stream(&self, depth: u8) -> GameRng {
        GameRng::new(derive_seed(self.seed, LEVEL_GEN_TAG, depth as u64))
    }
}
