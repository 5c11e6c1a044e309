//! Burst debris fired when the pack is ripped
//!
//! A short-lived cloud of points thrown out of the pack. Forces scale with an
//! intensity tier picked from the effect's sub-state; the whole effect fades
//! out over [`BURST_DURATION`] and then stops simulating until reactivated.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::particles::{Forces, Particle, ParticlePool, integrate};
use crate::consts::{BURST_DURATION, INTENSITY_BURST, INTENSITY_SETTLED};

/// Burst particle effect with an injectable random source
#[derive(Debug, Clone)]
pub struct BurstEffect<R = Pcg32> {
    pool: ParticlePool,
    /// Per-particle RGB, drawn once
    colors: Vec<Vec3>,
    rng: R,
    active: bool,
    settled: bool,
    elapsed: f32,
    wind_time: f32,
    duration: f32,
}

impl BurstEffect<Pcg32> {
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::with_rng(count, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> BurstEffect<R> {
    pub fn with_rng(count: usize, mut rng: R) -> Self {
        let colors = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.random::<f32>() * 0.6 + 0.4,
                    rng.random::<f32>() * 0.6 + 0.4,
                    rng.random::<f32>() * 0.6 + 0.4,
                )
            })
            .collect();
        let mut effect = Self {
            pool: ParticlePool::new(count),
            colors,
            rng,
            active: false,
            settled: false,
            elapsed: 0.0,
            wind_time: 0.0,
            duration: BURST_DURATION,
        };
        effect.respawn();
        effect
    }

    /// Redraw every particle from the launch distribution
    fn respawn(&mut self) {
        let rng = &mut self.rng;
        self.pool.reset_with(|_| spawn_particle(&mut *rng));
    }

    /// Update the owning flags. Going inactive -> active restarts the burst.
    pub fn set_state(&mut self, active: bool, settled: bool) {
        if active && !self.active {
            self.elapsed = 0.0;
            self.wind_time = 0.0;
            self.respawn();
            log::debug!("Burst started with {} particles", self.pool.len());
        }
        self.active = active;
        self.settled = settled;
    }

    /// Force multiplier for the current sub-state, 0 once the burst has run out
    pub fn intensity(&self) -> f32 {
        if !self.is_active() {
            0.0
        } else if self.settled {
            INTENSITY_SETTLED
        } else {
            INTENSITY_BURST
        }
    }

    /// Advance the simulation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.wind_time += dt;

        let forces = Forces::burst(self.wind_time, self.intensity());
        for p in self.pool.iter_mut() {
            integrate(p, &forces, &mut self.rng, dt);
        }
        if self.elapsed >= self.duration {
            log::debug!("Burst finished");
        }
    }

    /// Owner wants the burst and its window has not run out
    pub fn is_active(&self) -> bool {
        self.active && self.elapsed < self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Linear fade from 1 to 0 over the burst
    pub fn opacity(&self) -> f32 {
        if self.active {
            (1.0 - self.elapsed / self.duration).max(0.0)
        } else {
            0.0
        }
    }

    /// Worth drawing at all
    pub fn visible(&self) -> bool {
        self.is_active()
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
}

/// Launch distribution: small cube in front of the pack, thrown upward
fn spawn_particle<R: Rng>(rng: &mut R) -> Particle {
    let mut r = || rng.random::<f32>();
    let pos = Vec3::new((r() - 0.5) * 0.3, (r() - 0.5) * 0.3, -0.5 + (r() - 0.5) * 0.1);
    let vel = Vec3::new((r() - 0.5) * 3.0, r() * 3.0 + 1.0, (r() - 0.5) * 3.0);
    let angular_vel = Vec3::new((r() - 0.5) * 4.0, (r() - 0.5) * 4.0, (r() - 0.5) * 4.0);
    Particle {
        pos,
        vel,
        angular_vel,
        spin: Vec3::ZERO,
        age: 0.0,
    }
}
