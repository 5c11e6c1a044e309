//! Session state
//!
//! Everything one pack opening owns. Created when the experience mounts,
//! dropped when it unmounts; nothing here outlives the session.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::burst::BurstEffect;
use super::camera::CameraRig;
use super::fan::FanLayout;
use super::phase::{PackIntents, Phase, PhaseEvent, PhaseSequencer};
use super::preload::{LoadOutcome, PreloadGate};
use super::swarm::AmbientSwarm;
use crate::settings::{ConfigError, PackConfig, SessionSettings};

/// Render/UI flags derived from the phase each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFlags {
    pub loading_visible: bool,
    pub rip_enabled: bool,
    pub fan_visible: bool,
    pub fan_active: bool,
    pub burst_active: bool,
    pub burst_settled: bool,
    pub pack: PackIntents,
}

/// One pack opening session
#[derive(Debug, Clone)]
pub struct Session {
    pub config: PackConfig,
    pub settings: SessionSettings,
    pub sequencer: PhaseSequencer,
    pub gate: PreloadGate,
    pub swarm: AmbientSwarm,
    pub burst: BurstEffect,
    pub fan: FanLayout,
    pub camera: CameraRig,
    /// Last raw pointer offset from the container center (pixels)
    pub pointer: Vec2,
    /// Seconds since mount
    pub time: f32,
    /// Ticks since mount
    pub frame: u64,
    /// Events delivered between ticks, applied at the start of the next one
    pending: VecDeque<PhaseEvent>,
}

impl Session {
    pub fn new(config: PackConfig, settings: SessionSettings) -> Result<Self, ConfigError> {
        config.validate()?;
        settings.validate()?;

        let gate = PreloadGate::new(config.load_tasks());
        let swarm = AmbientSwarm::seeded(settings.swarm_count(), settings.seed);
        let burst = BurstEffect::seeded(settings.burst_particles, settings.seed.wrapping_add(1));
        let fan = FanLayout::new(&config.cards);

        log::info!(
            "Session: {} cards, {} assets, {} swarm ({}) / {} burst particles, seed {}",
            config.cards.len(),
            gate.expected(),
            swarm.len(),
            settings.quality.as_str(),
            settings.burst_particles,
            settings.seed
        );

        Ok(Self {
            config,
            settings,
            sequencer: PhaseSequencer::new(),
            gate,
            swarm,
            burst,
            fan,
            camera: CameraRig::new(),
            pointer: Vec2::ZERO,
            time: 0.0,
            frame: 0,
            pending: VecDeque::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    /// Asset references in load order; the index is the id passed to [`settle_asset`](Self::settle_asset)
    pub fn asset_references(&self) -> impl Iterator<Item = &str> {
        self.gate.tasks().iter().map(|t| t.reference.as_str())
    }

    /// Record a load settlement. Safe to call from async completions;
    /// the phase only reacts on the next tick.
    pub fn settle_asset(&mut self, id: usize, outcome: LoadOutcome) {
        self.gate.settle(id, outcome);
    }

    /// Queue an event for the next tick
    pub fn push_event(&mut self, event: PhaseEvent) {
        self.pending.push_back(event);
    }

    /// Rip button press. Only a press made while `Ready` is queued; one made
    /// during any other phase is dropped even if that phase ends before the
    /// next tick.
    pub fn request_rip(&mut self) {
        if self.phase().rip_enabled() {
            self.push_event(PhaseEvent::RipRequested);
        } else {
            log::debug!("Rip ignored during {}", self.phase().as_str());
        }
    }

    pub fn notify_intro_complete(&mut self) {
        self.push_event(PhaseEvent::IntroComplete);
    }

    pub fn notify_rip_complete(&mut self) {
        self.push_event(PhaseEvent::RipComplete);
    }

    pub fn notify_outro_complete(&mut self) {
        self.push_event(PhaseEvent::OutroComplete);
    }

    /// Drain queued events
    pub(crate) fn take_pending(&mut self) -> VecDeque<PhaseEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn flags(&self) -> SceneFlags {
        let phase = self.phase();
        SceneFlags {
            loading_visible: self.sequencer.loading_visible(),
            rip_enabled: phase.rip_enabled(),
            fan_visible: phase.fan_visible(),
            fan_active: phase.fan_active(),
            burst_active: phase.burst_active(),
            burst_settled: phase.burst_settled(),
            pack: self.sequencer.pack_intents(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings(seed: u64) -> SessionSettings {
        SessionSettings {
            swarm_particles: Some(16),
            burst_particles: 8,
            ..SessionSettings::with_seed(seed)
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::new(PackConfig::demo(), small_settings(1)).unwrap();
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.gate.expected(), 7);
        assert_eq!(session.fan.len(), 3);
        assert_eq!(session.swarm.len(), 16);
        assert_eq!(session.burst.particles().len(), 8);
        assert_eq!(session.asset_references().count(), 7);

        let flags = session.flags();
        assert!(flags.loading_visible);
        assert!(!flags.fan_visible && !flags.pack.visible);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = SessionSettings {
            burst_particles: 0,
            ..small_settings(1)
        };
        assert!(Session::new(PackConfig::demo(), settings).is_err());
    }

    #[test]
    fn test_events_wait_for_tick() {
        let mut session = Session::new(PackConfig::default(), small_settings(2)).unwrap();
        session.notify_intro_complete();
        assert!(session.has_pending());
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.take_pending().len(), 1);
        assert!(!session.has_pending());
    }

    #[test]
    fn test_rip_outside_ready_is_dropped() {
        let mut session = Session::new(PackConfig::default(), small_settings(3)).unwrap();
        session.request_rip();
        assert!(!session.has_pending());
    }
}
