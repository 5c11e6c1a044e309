//! Phase sequencing for the pack opening
//!
//! The experience runs strictly forward:
//! `Loading -> Intro -> Ready -> Ripping -> Outro -> Cards`.
//! Every transition is driven by a [`PhaseEvent`] fed through [`Phase::next`],
//! the only place the ordering is encoded.

use serde::{Deserialize, Serialize};

/// Current stage of the experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the preload gate
    Loading,
    /// Pack plays its entrance animation
    Intro,
    /// Pack idle, rip button enabled
    Ready,
    /// Pack tears open, burst particles fly
    Ripping,
    /// Pack leaves the stage
    Outro,
    /// Cards fan out
    Cards,
}

impl Phase {
    /// All phases in order
    pub const ORDER: [Phase; 6] = [
        Phase::Loading,
        Phase::Intro,
        Phase::Ready,
        Phase::Ripping,
        Phase::Outro,
        Phase::Cards,
    ];

    /// Transition function. `None` means the event does not apply to this phase.
    pub fn next(self, event: PhaseEvent) -> Option<Phase> {
        match (self, event) {
            (Phase::Loading, PhaseEvent::AssetsReady) => Some(Phase::Intro),
            (Phase::Intro, PhaseEvent::IntroComplete) => Some(Phase::Ready),
            (Phase::Ready, PhaseEvent::RipRequested) => Some(Phase::Ripping),
            (Phase::Ripping, PhaseEvent::RipComplete) => Some(Phase::Outro),
            (Phase::Outro, PhaseEvent::OutroComplete) => Some(Phase::Cards),
            _ => None,
        }
    }

    /// Pack mesh is on stage
    pub fn pack_visible(self) -> bool {
        matches!(self, Phase::Intro | Phase::Ready | Phase::Ripping | Phase::Outro)
    }

    /// Card fan is on stage (stacked until `Cards`)
    pub fn fan_visible(self) -> bool {
        self != Phase::Loading
    }

    /// Card fan is spreading out
    pub fn fan_active(self) -> bool {
        self == Phase::Cards
    }

    /// Burst particles are live
    pub fn burst_active(self) -> bool {
        matches!(self, Phase::Ripping | Phase::Outro)
    }

    /// Cards have fanned (burst drops to its settled intensity)
    pub fn burst_settled(self) -> bool {
        self == Phase::Cards
    }

    /// Rip trigger is enabled
    pub fn rip_enabled(self) -> bool {
        self == Phase::Ready
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Intro => "intro",
            Phase::Ready => "ready",
            Phase::Ripping => "ripping",
            Phase::Outro => "outro",
            Phase::Cards => "cards",
        }
    }
}

/// Messages that drive phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// Preload gate settled every asset
    AssetsReady,
    /// Pack finished its intro animation
    IntroComplete,
    /// User pressed rip
    RipRequested,
    /// Pack finished tearing open
    RipComplete,
    /// Pack finished leaving
    OutroComplete,
}

/// A transition that was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
}

/// Intents for the external pack asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackIntents {
    pub visible: bool,
    pub play_intro: bool,
    pub play_rip: bool,
    pub play_outro: bool,
}

/// Owns the phase and applies events to it
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    phase: Phase,
    /// Set when the gate signalled, cleared never (drives the loading overlay)
    assets_ready: bool,
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequencer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            assets_ready: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Apply an event. Out-of-phase events are ignored.
    pub fn apply(&mut self, event: PhaseEvent) -> Option<Transition> {
        if event == PhaseEvent::AssetsReady {
            self.assets_ready = true;
        }
        match self.phase.next(event) {
            Some(to) => {
                let from = self.phase;
                self.phase = to;
                log::info!("Phase {} -> {}", from.as_str(), to.as_str());
                Some(Transition { from, to })
            }
            None => {
                log::debug!("Ignoring {:?} during {}", event, self.phase.as_str());
                None
            }
        }
    }

    pub fn request_rip(&mut self) -> Option<Transition> {
        self.apply(PhaseEvent::RipRequested)
    }

    pub fn notify_intro_complete(&mut self) -> Option<Transition> {
        self.apply(PhaseEvent::IntroComplete)
    }

    pub fn notify_rip_complete(&mut self) -> Option<Transition> {
        self.apply(PhaseEvent::RipComplete)
    }

    pub fn notify_outro_complete(&mut self) -> Option<Transition> {
        self.apply(PhaseEvent::OutroComplete)
    }

    pub fn on_assets_ready(&mut self) -> Option<Transition> {
        self.apply(PhaseEvent::AssetsReady)
    }

    /// Loading overlay stays up until the gate has signalled
    pub fn loading_visible(&self) -> bool {
        !self.assets_ready
    }

    pub fn pack_intents(&self) -> PackIntents {
        PackIntents {
            visible: self.phase.pack_visible(),
            play_intro: self.phase == Phase::Intro,
            play_rip: self.phase == Phase::Ripping,
            play_outro: self.phase == Phase::Outro,
        }
    }
}
