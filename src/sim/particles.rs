//! Particle pool and force integrator
//!
//! Particles live in a fixed-size pool allocated once per effect. They are
//! never removed, only reset, so a tick never allocates.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{BURST_DAMPING, BURST_GRAVITY, BURST_TURBULENCE, BURST_WIND, BURST_WIND_OFFSETS};
use crate::noise;

/// Simulation state for one particle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Spin rate per axis (radians/sec)
    pub angular_vel: Vec3,
    /// Accumulated spin (radians)
    pub spin: Vec3,
    /// Seconds since the last reset
    pub age: f32,
}

/// Contiguous, fixed-capacity particle storage indexed by particle id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticlePool<P = Particle> {
    particles: Vec<P>,
}

impl<P: Clone + Default> ParticlePool<P> {
    pub fn new(count: usize) -> Self {
        Self {
            particles: vec![P::default(); count],
        }
    }
}

impl<P> ParticlePool<P> {

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&P> {
        self.particles.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, P> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[P] {
        &self.particles
    }

    /// Reset every particle in place
    pub fn reset_with(&mut self, mut init: impl FnMut(usize) -> P) {
        for (id, p) in self.particles.iter_mut().enumerate() {
            *p = init(id);
        }
    }
}

/// Forces applied for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    /// Wind acceleration (units/s²)
    pub wind: Vec3,
    /// Peak-to-peak turbulence kick per axis (velocity units, not scaled by dt)
    pub turbulence: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Velocity retained per tick
    pub damping: f32,
}

impl Forces {
    /// Burst forces at wind clock `wind_time`, scaled by `intensity`
    pub fn burst(wind_time: f32, intensity: f32) -> Self {
        let wind = Vec3::new(
            noise(wind_time + BURST_WIND_OFFSETS[0]) * intensity * BURST_WIND[0],
            noise(wind_time + BURST_WIND_OFFSETS[1]) * intensity * BURST_WIND[1],
            noise(wind_time + BURST_WIND_OFFSETS[2]) * intensity * BURST_WIND[2],
        );
        Self {
            wind,
            turbulence: BURST_TURBULENCE * intensity,
            gravity: BURST_GRAVITY * intensity,
            damping: BURST_DAMPING,
        }
    }
}

/// Advance one particle by `dt`: wind, turbulence, gravity, damping, then position.
pub fn integrate<R: Rng>(p: &mut Particle, forces: &Forces, rng: &mut R, dt: f32) {
    p.vel += forces.wind * dt;

    let kick = Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
    );
    p.vel += kick * forces.turbulence;

    p.vel.y -= forces.gravity * dt;
    p.vel *= forces.damping;

    p.pos += p.vel * dt;
    p.spin += p.angular_vel * dt;
    p.age += dt;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_damping_only_shrinks_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut p = Particle {
            vel: Vec3::new(1.2, 3.5, -0.7),
            ..Default::default()
        };
        let forces = Forces::burst(12.0, 0.0);
        assert_eq!(forces.wind, Vec3::ZERO);

        let mut last = p.vel.length();
        for _ in 0..200 {
            integrate(&mut p, &forces, &mut rng, 1.0 / 60.0);
            let speed = p.vel.length();
            assert!(speed < last);
            last = speed;
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut p = Particle::default();
        let forces = Forces {
            turbulence: 0.0,
            wind: Vec3::ZERO,
            ..Forces::burst(0.0, 1.0)
        };
        integrate(&mut p, &forces, &mut rng, 0.5);
        assert!((p.vel.y - (-1.0 * BURST_DAMPING)).abs() < 1e-6);
        assert!(p.pos.y < 0.0);
        assert_eq!(p.age, 0.5);
    }

    #[test]
    fn test_wind_axes_are_decorrelated() {
        let forces = Forces::burst(5.0, 1.0);
        assert!((forces.wind.x - noise(5.0) * 2.0).abs() < 1e-6);
        assert!((forces.wind.y - noise(105.0) * 1.5).abs() < 1e-6);
        assert!((forces.wind.z - noise(205.0) * 2.0).abs() < 1e-6);
        assert_ne!(forces.wind.x / 2.0, forces.wind.z / 2.0);
    }

    #[test]
    fn test_pool_reset_keeps_capacity() {
        let mut pool: ParticlePool = ParticlePool::new(8);
        pool.reset_with(|id| Particle {
            pos: Vec3::splat(id as f32),
            ..Default::default()
        });
        assert_eq!(pool.len(), 8);
        assert_eq!(pool.get(3).unwrap().pos, Vec3::splat(3.0));
        assert!(pool.get(8).is_none());
    }
}
