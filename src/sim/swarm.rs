//! Ambient background swarm
//!
//! Thousands of small shards drifting on closed-form trigonometric paths.
//! Each particle owns a clock `t` that advances by its own speed every tick;
//! position, scale and rotation are pure functions of that clock, the
//! particle's static factors, and a slowly-following pointer offset.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticlePool;
use crate::consts::SWARM_POINTER_SMOOTHING;

/// Static per-particle shape of the path (never touched after creation)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwarmFactors {
    /// Path amplitude
    pub factor: f32,
    /// Clock increment per tick
    pub speed: f32,
    /// Path center
    pub offset: Vec3,
}

/// Per-tick state of one shard, recomputed from its path clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmParticle {
    pub pos: Vec3,
    /// Path clock, advanced every tick and never reset
    pub clock: f32,
    pub scale: f32,
    /// Euler XYZ (radians)
    pub rotation: Vec3,
}

/// Render transform for one swarm shard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwarmInstance {
    pub pos: Vec3,
    pub scale: f32,
    /// Euler XYZ (radians)
    pub rotation: Vec3,
}

impl SwarmInstance {
    pub fn transform(&self) -> Mat4 {
        let rot = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rot, self.pos)
    }
}

/// The always-on background swarm
#[derive(Debug, Clone)]
pub struct AmbientSwarm {
    pool: ParticlePool<SwarmParticle>,
    factors: Vec<SwarmFactors>,
    /// Smoothed pointer offset per particle
    pointer: Vec<Vec2>,
}

impl AmbientSwarm {
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::with_rng(count, &mut Pcg32::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut pool = ParticlePool::new(count);
        let mut factors = Vec::with_capacity(count);
        pool.reset_with(|_| {
            let t = rng.random::<f32>() * 100.0;
            factors.push(SwarmFactors {
                factor: 20.0 + rng.random::<f32>() * 100.0,
                speed: 0.005 + rng.random::<f32>() / 500.0,
                offset: Vec3::new(
                    -50.0 + rng.random::<f32>() * 100.0,
                    -50.0 + rng.random::<f32>() * 100.0,
                    -100.0 + rng.random::<f32>() * 50.0,
                ),
            });
            SwarmParticle {
                clock: t,
                ..Default::default()
            }
        });
        let mut swarm = Self {
            pool,
            factors,
            pointer: vec![Vec2::ZERO; count],
        };
        swarm.place();
        swarm
    }

    /// Advance every particle one tick toward the raw pointer offset (pixels from center)
    pub fn update(&mut self, pointer: Vec2) {
        // Screen y grows downward
        let target = Vec2::new(pointer.x, -pointer.y);
        for ((p, f), m) in self
            .pool
            .iter_mut()
            .zip(&self.factors)
            .zip(self.pointer.iter_mut())
        {
            p.clock += f.speed / 2.0;
            *m += (target - *m) * SWARM_POINTER_SMOOTHING;
        }
        self.place();
    }

    /// Recompute positions, scales and rotations from the clocks
    fn place(&mut self) {
        for ((p, f), m) in self.pool.iter_mut().zip(&self.factors).zip(&self.pointer) {
            let (pos, s) = path_point(p.clock, f, *m);
            p.pos = pos;
            p.scale = s;
            p.rotation = Vec3::splat(s * 5.0);
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn factors(&self) -> &[SwarmFactors] {
        &self.factors
    }

    /// Smoothed pointer offset of one particle
    pub fn pointer_state(&self, id: usize) -> Option<Vec2> {
        self.pointer.get(id).copied()
    }

    pub fn particles(&self) -> &[SwarmParticle] {
        self.pool.as_slice()
    }

    pub fn instances(&self) -> impl Iterator<Item = SwarmInstance> + '_ {
        self.pool.iter().map(|p| SwarmInstance {
            pos: p.pos,
            scale: p.scale,
            rotation: p.rotation,
        })
    }
}

/// Position and scale on the path at clock `t`
fn path_point(t: f32, f: &SwarmFactors, m: Vec2) -> (Vec3, f32) {
    let a = t.cos() + t.sin() / 10.0;
    let b = t.sin() + (t * 2.0).cos() / 10.0;
    let s = t.cos();
    let wobble = t / 10.0 * f.factor;
    let pos = Vec3::new(
        m.x / 10.0 * a + f.offset.x + wobble.cos() + t.sin() * f.factor / 10.0,
        m.y / 10.0 * b + f.offset.y + wobble.sin() + (t * 2.0).cos() * f.factor / 10.0,
        m.y / 10.0 * b + f.offset.z + wobble.cos() + (t * 3.0).sin() * f.factor / 10.0,
    );
    (pos, s)
}
