//! Pack configuration and session settings
//!
//! Fixed at session start, immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BURST_PARTICLES, SWARM_COUNT_HIGH, SWARM_COUNT_LOW};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty asset reference: {0}")]
    EmptyReference(&'static str),
    #[error("particle pool `{0}` must hold at least one particle")]
    ZeroParticles(&'static str),
}

/// One card: front and back image references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntry {
    pub front_image: String,
    pub back_image: String,
}

impl CardEntry {
    pub fn new(front_image: impl Into<String>, back_image: impl Into<String>) -> Self {
        Self {
            front_image: front_image.into(),
            back_image: back_image.into(),
        }
    }
}

/// What the pack contains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    /// Pack wrapper texture (optional)
    #[serde(default)]
    pub pack_texture: Option<String>,
    /// Cards revealed after the rip, in fan order
    #[serde(default)]
    pub cards: Vec<CardEntry>,
}

impl PackConfig {
    /// The stock three-card pack
    pub fn demo() -> Self {
        Self {
            pack_texture: Some("/pack-diffuse2.png".into()),
            cards: vec![
                CardEntry::new("/cards/acoustic-charity.webp", "/cards/card-back.png"),
                CardEntry::new("/cards/dadbod.avif", "/cards/card-back.png"),
                CardEntry::new("/cards/wossumnomicron-scaled.avif", "/cards/card-back.png"),
            ],
        }
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pack_texture.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyReference("packTexture"));
        }
        for card in &self.cards {
            if card.front_image.is_empty() {
                return Err(ConfigError::EmptyReference("frontImage"));
            }
            if card.back_image.is_empty() {
                return Err(ConfigError::EmptyReference("backImage"));
            }
        }
        Ok(())
    }

    /// Asset references to preload: pack texture first, then front/back per card
    pub fn load_tasks(&self) -> Vec<String> {
        let mut refs = Vec::with_capacity(self.expected_loads());
        if let Some(texture) = &self.pack_texture {
            refs.push(texture.clone());
        }
        for card in &self.cards {
            refs.push(card.front_image.clone());
            refs.push(card.back_image.clone());
        }
        refs
    }

    /// Number of settlements the preload gate waits for
    pub fn expected_loads(&self) -> usize {
        usize::from(self.pack_texture.is_some()) + self.cards.len() * 2
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    /// Mobile-class devices
    Low,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "mobile" => Some(QualityPreset::Low),
            "high" | "desktop" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Pick a preset from a browser user agent string
    pub fn for_user_agent(user_agent: &str) -> Self {
        const MOBILE: [&str; 4] = ["iPhone", "iPad", "iPod", "Android"];
        let ua = user_agent.to_lowercase();
        if MOBILE.iter().any(|m| ua.contains(&m.to_lowercase())) {
            QualityPreset::Low
        } else {
            QualityPreset::High
        }
    }

    /// Ambient swarm size for this preset
    pub fn swarm_count(&self) -> usize {
        match self {
            QualityPreset::Low => SWARM_COUNT_LOW,
            QualityPreset::High => SWARM_COUNT_HIGH,
        }
    }
}

/// Runtime knobs that are not part of the pack itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Seed for every random draw in the session
    pub seed: u64,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Burst pool size
    pub burst_particles: usize,
    /// Override for the swarm size (defaults to the preset's)
    pub swarm_particles: Option<usize>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            quality: QualityPreset::High,
            burst_particles: BURST_PARTICLES,
            swarm_particles: None,
        }
    }
}

impl SessionSettings {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Effective swarm size
    pub fn swarm_count(&self) -> usize {
        self.swarm_particles.unwrap_or_else(|| self.quality.swarm_count())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.burst_particles == 0 {
            return Err(ConfigError::ZeroParticles("burst"));
        }
        if self.swarm_count() == 0 {
            return Err(ConfigError::ZeroParticles("swarm"));
        }
        Ok(())
    }
}
