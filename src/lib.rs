//! Pack Rip - a scripted pack opening animation
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (phase machine, preload gate, particles, fan, camera)
//! - `settings`: Pack configuration and session settings
//! - `platform`: Browser glue (image preloading, JS bindings)

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{CardEntry, ConfigError, PackConfig, QualityPreset, SessionSettings};

/// Animation and simulation tuning constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Fan spread (degrees, total across all cards)
    pub const FAN_ANGLE_DEG: f32 = 45.0;
    /// Distance from fan pivot to card center
    pub const FAN_RADIUS: f32 = 0.5;
    /// Depth step between fanned cards
    pub const FAN_Z_STEP: f32 = 0.01;
    /// Depth step between stacked cards
    pub const STACK_Z_STEP: f32 = 0.001;
    /// Time for a card to travel from the stack to its fan slot (seconds)
    pub const FAN_DURATION: f32 = 1.0;
    /// Per-card stagger. Cards currently move together; only the camera timing uses this.
    pub const FAN_STAGGER: f32 = 0.25;

    /// Camera distance before the fan opens
    pub const CAMERA_START_DISTANCE: f32 = 4.0;
    /// Camera distance once the fan is open
    pub const CAMERA_END_DISTANCE: f32 = 3.75;
    /// Vertical field of view (degrees)
    pub const CAMERA_FOV_DEG: f32 = 25.0;
    /// Orbit azimuth limit either side of center (degrees)
    pub const ORBIT_AZIMUTH_LIMIT_DEG: f32 = 10.0;
    /// Orbit polar band (degrees from +Y)
    pub const ORBIT_POLAR_MIN_DEG: f32 = 80.0;
    pub const ORBIT_POLAR_MAX_DEG: f32 = 100.0;
    /// Orbit drag sensitivity
    pub const ORBIT_ROTATE_SPEED: f32 = 0.1;
    /// Fraction of orbit velocity shed per tick
    pub const ORBIT_DAMPING: f32 = 0.05;
    /// Scene pitch per pixel of vertical pointer offset (radians)
    pub const SWAY_PITCH_PER_PIXEL: f32 = 0.001;

    /// Burst effect lifetime from activation (seconds)
    pub const BURST_DURATION: f32 = 3.0;
    /// Default burst pool size
    pub const BURST_PARTICLES: usize = 150;
    /// Velocity retained per tick
    pub const BURST_DAMPING: f32 = 0.98;
    /// Wind coefficient per axis (x, y, z)
    pub const BURST_WIND: [f32; 3] = [2.0, 1.5, 2.0];
    /// Wind time offsets decorrelating the axes
    pub const BURST_WIND_OFFSETS: [f32; 3] = [0.0, 100.0, 200.0];
    /// Turbulence amplitude at full intensity
    pub const BURST_TURBULENCE: f32 = 0.1;
    /// Gravity at full intensity (units/s²)
    pub const BURST_GRAVITY: f32 = 2.0;
    /// Intensity while the burst is fresh
    pub const INTENSITY_BURST: f32 = 1.0;
    /// Intensity once the cards have fanned out
    pub const INTENSITY_SETTLED: f32 = 0.5;

    /// Pointer smoothing factor for the ambient swarm
    pub const SWARM_POINTER_SMOOTHING: f32 = 0.01;
    /// Swarm size on mobile-class devices
    pub const SWARM_COUNT_LOW: usize = 1500;
    /// Swarm size on desktop
    pub const SWARM_COUNT_HIGH: usize = 3000;
}

/// Ease-out cubic: `1 - (1 - x)^3`, input clamped to [0, 1]
#[inline]
pub fn ease_out_cubic(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(3)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cheap layered-sine noise used to drive the burst wind
#[inline]
pub fn noise(t: f32) -> f32 {
    (t * 0.5).sin() * 0.5 + (t * 0.3).sin() * 0.3 + (t * 0.1).sin() * 0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.5), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        // Ease-out runs ahead of linear
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_noise_is_bounded() {
        for i in 0..1000 {
            let n = noise(i as f32 * 0.37);
            assert!(n.abs() <= 1.0 + 1e-6);
        }
        assert_eq!(noise(0.0), 0.0);
    }
}
