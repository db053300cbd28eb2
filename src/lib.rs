//! petalfall - looping decorative particle overlay
//!
//! A background thread ticks at a fixed interval while an effect is active,
//! advancing a bounded pool of particles (falling petals, snow) and drawing
//! them onto a host-provided surface. The host drives it through
//! [`EffectController`]: `start`, `stop`, `release`, `resize` and the surface
//! lifecycle hooks.

pub mod controller;
pub mod curve;
pub mod error;
pub mod kinds;
pub mod particle;
pub mod pool;
pub mod scheduler;
pub mod settings;
pub mod surface;

pub use controller::EffectController;
pub use error::{EffectError, SurfaceError};
pub use kinds::EffectKind;
pub use particle::{FrameContext, Particle, SpawnEnv};
pub use pool::ParticlePool;
pub use scheduler::FrameScheduler;
pub use settings::Settings;
pub use surface::{Bounds, Canvas, DrawTargetCanvas, Sprite, SpriteDraw, SurfaceProvider};
