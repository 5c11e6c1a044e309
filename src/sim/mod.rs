//! Frame-driven simulation module
//!
//! Everything that moves lives here. This module stays free of rendering and
//! platform code:
//! - One tick per rendered frame, delta time in seconds
//! - Seeded RNG only
//! - Phase changes only through `PhaseEvent`s applied at the start of a tick

pub mod burst;
pub mod camera;
pub mod fan;
pub mod particles;
pub mod phase;
pub mod preload;
pub mod state;
pub mod swarm;
pub mod tick;

pub use burst::BurstEffect;
pub use camera::{CameraRig, zoom_duration};
pub use fan::{FanCard, FanLayout, Pose, fan_target, stacked_pose};
pub use particles::{Forces, Particle, ParticlePool, integrate};
pub use phase::{PackIntents, Phase, PhaseEvent, PhaseSequencer, Transition};
pub use preload::{LoadOutcome, LoadTask, PreloadGate};
pub use state::{SceneFlags, Session};
pub use swarm::{AmbientSwarm, SwarmFactors, SwarmInstance, SwarmParticle};
pub use tick::{TickInput, tick};
