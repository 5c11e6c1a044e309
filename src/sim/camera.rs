//! Camera zoom, orbit limits and pointer parallax
//!
//! Zoom is never user-driven: the distance follows the fan timeline. The user
//! may drag the orbit a little, inside a narrow azimuth/polar band.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{ease_out_cubic, lerp};

/// Total camera timeline for `card_count` cards.
///
/// Cards all move together, but the stagger still stretches this timeline.
pub fn zoom_duration(card_count: usize) -> f32 {
    FAN_STAGGER * card_count as f32 + FAN_DURATION
}

/// Camera state derived each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    /// Raw (un-eased) zoom progress in [0, 1]
    progress: f32,
    distance: f32,
    /// Orbit angles (radians); polar measured from +Y
    azimuth: f32,
    polar: f32,
    /// Pending orbit rotation, bled off by damping
    orbit_delta: Vec2,
    /// Pointer sway applied to the whole scene
    scene_rotation: Quat,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            distance: CAMERA_START_DISTANCE,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            orbit_delta: Vec2::ZERO,
            scene_rotation: Quat::IDENTITY,
        }
    }

    /// Recompute distance from the fan clock
    pub fn update_zoom(&mut self, fan_elapsed: f32, card_count: usize) {
        self.progress = (fan_elapsed / zoom_duration(card_count)).clamp(0.0, 1.0);
        self.distance = lerp(
            CAMERA_START_DISTANCE,
            CAMERA_END_DISTANCE,
            ease_out_cubic(self.progress),
        );
    }

    /// Set scene sway straight from the raw pointer offset (pixels), no smoothing
    pub fn apply_sway(&mut self, pointer: Vec2) {
        self.scene_rotation = Quat::from_rotation_x(pointer.y * SWAY_PITCH_PER_PIXEL);
    }

    /// Queue a user drag (pixels) on a viewport `viewport_height` pixels tall
    pub fn drag(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.orbit_delta -= delta * (TAU / viewport_height) * ORBIT_ROTATE_SPEED;
    }

    /// Bleed pending orbit rotation into the angles, clamped to the allowed band
    pub fn update_orbit(&mut self) {
        let (az, pol) = orbit_limits();
        self.azimuth = (self.azimuth + self.orbit_delta.x * ORBIT_DAMPING).clamp(az.0, az.1);
        self.polar = (self.polar + self.orbit_delta.y * ORBIT_DAMPING).clamp(pol.0, pol.1);
        self.orbit_delta *= 1.0 - ORBIT_DAMPING;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn scene_rotation(&self) -> Quat {
        self.scene_rotation
    }

    pub fn fov_y(&self) -> f32 {
        CAMERA_FOV_DEG.to_radians()
    }

    /// Eye position orbiting the origin
    pub fn position(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }
}

/// ((min, max) azimuth, (min, max) polar) in radians
fn orbit_limits() -> ((f32, f32), (f32, f32)) {
    let az = ORBIT_AZIMUTH_LIMIT_DEG.to_radians();
    (
        (-az, az),
        (ORBIT_POLAR_MIN_DEG.to_radians(), ORBIT_POLAR_MAX_DEG.to_radians()),
    )
}
