//! Card fan layout
//!
//! Cards start stacked at the origin and spread into a 45° arc once the fan
//! is activated. The target slot of each card depends only on its index and
//! the card count.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{FAN_ANGLE_DEG, FAN_DURATION, FAN_RADIUS, FAN_Z_STEP, STACK_Z_STEP};
use crate::ease_out_cubic;
use crate::settings::CardEntry;

/// Position plus roll about the depth axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Radians about +Z
    pub rotation: f32,
}

impl Pose {
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.rotation)
    }

    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation + (other.rotation - self.rotation) * t,
        }
    }
}

/// Slot of card `index` out of `total` in the spread fan
pub fn fan_target(index: usize, total: usize) -> Pose {
    let span = if total > 1 { (total - 1) as f32 } else { 1.0 };
    let offset = (index as f32 - (total as f32 - 1.0) / 2.0) / span;
    let angle = offset * FAN_ANGLE_DEG.to_radians();
    Pose {
        position: Vec3::new(
            angle.sin() * FAN_RADIUS,
            (angle.cos() - 1.0) * FAN_RADIUS,
            -(index as f32) * FAN_Z_STEP,
        ),
        rotation: angle,
    }
}

/// Slot of card `index` in the collapsed stack
pub fn stacked_pose(index: usize) -> Pose {
    Pose {
        position: Vec3::new(0.0, 0.0, -(index as f32) * STACK_Z_STEP),
        rotation: 0.0,
    }
}

/// One card's animation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanCard {
    pub index: usize,
    pub front_image: String,
    pub back_image: String,
    pub target: Pose,
    pub current: Pose,
}

/// Animates the whole card collection between stack and fan
#[derive(Debug, Clone)]
pub struct FanLayout {
    cards: Vec<FanCard>,
    active: bool,
    elapsed: f32,
    duration: f32,
}

impl FanLayout {
    pub fn new(entries: &[CardEntry]) -> Self {
        let total = entries.len();
        let cards = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| FanCard {
                index,
                front_image: entry.front_image.clone(),
                back_image: entry.back_image.clone(),
                target: fan_target(index, total),
                current: stacked_pose(index),
            })
            .collect();
        Self {
            cards,
            active: false,
            elapsed: 0.0,
            duration: FAN_DURATION,
        }
    }

    /// Entering the active state always restarts from the stack
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.elapsed = 0.0;
            log::debug!("Fanning {} cards", self.cards.len());
        }
        self.active = active;
    }

    pub fn update(&mut self, dt: f32) {
        if self.active {
            self.elapsed += dt;
        }
        let eased = self.progress();
        for card in &mut self.cards {
            card.current = if eased >= 1.0 {
                card.target
            } else {
                stacked_pose(card.index).lerp(&card.target, eased)
            };
        }
    }

    /// Eased progress in [0, 1]
    pub fn progress(&self) -> f32 {
        ease_out_cubic(self.elapsed / self.duration)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds spent fanning (camera timing reads this)
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[FanCard] {
        &self.cards
    }
}
