//! Effect kinds. Each kind is a [`Particle`] implementation; `EffectKind`
//! selects one at start time.

pub mod sakura;
pub mod snow;

use core::fmt;
use core::str::FromStr;

use crate::error::EffectError;
use crate::particle::{FrameContext, Particle};

pub use sakura::Sakura;
pub use snow::Snow;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Falling cherry petals
    Sakura,
    Snow,
}

impl EffectKind {
    pub const ALL: [EffectKind; 2] = [EffectKind::Sakura, EffectKind::Snow];

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Sakura => "sakura",
            EffectKind::Snow => "snow",
        }
    }

    pub fn population_cap(&self) -> usize {
        match self {
            EffectKind::Sakura => sakura::POPULATION_CAP,
            EffectKind::Snow => snow::POPULATION_CAP,
        }
    }

    pub fn max_spawn_delay_ms(&self) -> u64 {
        match self {
            EffectKind::Sakura => sakura::MAX_SPAWN_DELAY_MS,
            EffectKind::Snow => snow::MAX_SPAWN_DELAY_MS,
        }
    }

    /// Construct and reset one particle of this kind.
    pub fn spawn(&self, ctx: &mut FrameContext<'_>) -> Box<dyn Particle> {
        match self {
            EffectKind::Sakura => Box::new(Sakura::new(ctx)),
            EffectKind::Snow => Box::new(Snow::new(ctx)),
        }
    }

    /// Next kind in `ALL`, wrapping around.
    pub fn next(&self) -> EffectKind {
        let index = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sakura" | "petal" | "petal-fall" => Ok(EffectKind::Sakura),
            "snow" => Ok(EffectKind::Snow),
            _ => Err(EffectError::UnknownKind(s.to_string())),
        }
    }
}
