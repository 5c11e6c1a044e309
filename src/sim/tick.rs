//! Per-frame tick
//!
//! Applies everything that arrived since the last frame (gate signal, pack
//! completions, user rip), then advances every effect with the phase fixed
//! for the rest of the tick.

use glam::Vec2;

use super::phase::{PhaseEvent, Transition};
use super::state::Session;
use crate::consts::MAX_FRAME_DT;

/// Input gathered for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer offset from the container center (pixels), if it moved
    pub pointer: Option<Vec2>,
    /// Rip button pressed
    pub rip: bool,
    /// Orbit drag this frame (pixels)
    pub drag: Option<Vec2>,
    /// Viewport height for drag scaling (pixels)
    pub viewport_height: f32,
}

/// Advance the session by one frame of `dt` seconds.
///
/// Returns the phase transitions applied at the start of this tick.
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Vec<Transition> {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    let mut transitions = Vec::new();

    // A rip press counts only against the phase it was made in
    let rip = input.rip && session.phase().rip_enabled();

    // Gate signal first so a pack that loaded instantly can start its intro
    if session.gate.take_ready_signal() {
        transitions.extend(session.sequencer.on_assets_ready());
    }
    if rip {
        transitions.extend(session.sequencer.apply(PhaseEvent::RipRequested));
    }
    for event in session.take_pending() {
        transitions.extend(session.sequencer.apply(event));
    }

    // Phase is fixed from here on
    let flags = session.flags();
    session.fan.set_active(flags.fan_active);
    session.burst.set_state(flags.burst_active, flags.burst_settled);

    if let Some(pointer) = input.pointer {
        session.pointer = pointer;
    }
    let pointer = session.pointer;

    session.swarm.update(pointer);
    session.burst.update(dt);
    session.fan.update(dt);

    session.camera.update_zoom(session.fan.elapsed(), session.fan.len());
    session.camera.apply_sway(pointer);
    if let Some(delta) = input.drag {
        session.camera.drag(delta, input.viewport_height);
    }
    session.camera.update_orbit();

    session.time += dt;
    session.frame += 1;
    transitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{PackConfig, SessionSettings};
    use crate::sim::phase::Phase;
    use crate::sim::preload::LoadOutcome;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn session(config: PackConfig, seed: u64) -> Session {
        let settings = SessionSettings {
            swarm_particles: Some(32),
            burst_particles: 24,
            ..SessionSettings::with_seed(seed)
        };
        Session::new(config, settings).unwrap()
    }

    fn settle_all(session: &mut Session) {
        let n = session.gate.expected();
        for id in 0..n {
            let outcome = if id == 2 { LoadOutcome::Failed } else { LoadOutcome::Succeeded };
            session.settle_asset(id, outcome);
        }
    }

    #[test]
    fn test_empty_pack_leaves_loading_on_first_tick() {
        let mut s = session(PackConfig::default(), 1);
        assert_eq!(s.phase(), Phase::Loading);
        let t = tick(&mut s, &TickInput::default(), DT);
        assert_eq!(t.len(), 1);
        assert_eq!(s.phase(), Phase::Intro);
        assert!(!s.flags().loading_visible);
    }

    #[test]
    fn test_loading_waits_for_every_settlement() {
        let mut s = session(PackConfig::demo(), 2);
        for id in 0..6 {
            s.settle_asset(id, LoadOutcome::Failed);
            tick(&mut s, &TickInput::default(), DT);
            assert_eq!(s.phase(), Phase::Loading);
        }
        s.settle_asset(6, LoadOutcome::Succeeded);
        // Still loading until the tick observes the signal
        assert_eq!(s.phase(), Phase::Loading);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Intro);
    }

    #[test]
    fn test_full_sequence() {
        let mut s = session(PackConfig::demo(), 3);
        settle_all(&mut s);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Intro);

        // Rip during intro is ignored
        let rip = TickInput {
            rip: true,
            ..Default::default()
        };
        tick(&mut s, &rip, DT);
        assert_eq!(s.phase(), Phase::Intro);

        s.notify_intro_complete();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Ready);
        assert!(s.flags().rip_enabled);

        tick(&mut s, &rip, DT);
        assert_eq!(s.phase(), Phase::Ripping);
        assert!(s.burst.is_active());
        assert!(s.burst.visible());
        assert_eq!(s.burst.intensity(), 1.0);

        s.notify_rip_complete();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Outro);
        assert!(s.burst.is_active());

        // Fan stays stacked before Cards
        assert_eq!(s.fan.progress(), 0.0);
        assert_eq!(s.camera.distance(), 4.0);

        s.notify_outro_complete();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Cards);
        assert!(!s.burst.is_active());
        assert!(!s.flags().pack.visible);
        assert!(s.fan.is_active());

        for _ in 0..120 {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert_eq!(s.fan.progress(), 1.0);
        for card in s.fan.cards() {
            assert_eq!(card.current, card.target);
        }
        assert!((s.camera.distance() - 3.75).abs() < 1e-6);
    }

    #[test]
    fn test_stray_completions_are_benign() {
        let mut s = session(PackConfig::demo(), 4);
        settle_all(&mut s);
        s.notify_outro_complete();
        s.notify_rip_complete();
        let t = tick(&mut s, &TickInput::default(), DT);
        assert_eq!(t.len(), 1);
        assert_eq!(s.phase(), Phase::Intro);
        // A late duplicate settlement changes nothing
        s.settle_asset(0, LoadOutcome::Failed);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Intro);
    }

    #[test]
    fn test_rip_during_intro_not_replayed_after_intro_completes() {
        let mut s = session(PackConfig::default(), 5);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Intro);

        s.notify_intro_complete();
        let rip = TickInput {
            rip: true,
            ..Default::default()
        };
        let t = tick(&mut s, &rip, DT);
        assert_eq!(t.len(), 1);
        assert_eq!(s.phase(), Phase::Ready);

        s.notify_intro_complete();
        s.request_rip();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Ready);
    }

    #[test]
    fn test_completions_chain_in_one_tick() {
        let mut s = session(PackConfig::default(), 5);
        tick(&mut s, &TickInput::default(), DT);
        s.notify_intro_complete();
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.phase(), Phase::Ready);

        s.request_rip();
        s.notify_rip_complete();
        let t = tick(&mut s, &TickInput::default(), DT);
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].to, Phase::Ripping);
        assert_eq!(t[1].to, Phase::Outro);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut s = session(PackConfig::default(), 6);
        tick(&mut s, &TickInput::default(), 5.0);
        assert!((s.time - MAX_FRAME_DT).abs() < 1e-6);
        assert_eq!(s.frame, 1);
    }

    #[test]
    fn test_pointer_persists_between_ticks() {
        let mut s = session(PackConfig::default(), 7);
        let input = TickInput {
            pointer: Some(Vec2::new(40.0, -20.0)),
            ..Default::default()
        };
        tick(&mut s, &input, DT);
        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.pointer, Vec2::new(40.0, -20.0));
        let (_, angle) = s.camera.scene_rotation().to_axis_angle();
        assert!((angle - 0.02).abs() < 1e-5);
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        IntroDone,
        RipDone,
        OutroDone,
        RequestRip,
        Tick,
        TickWithRip,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::IntroDone),
            Just(Step::RipDone),
            Just(Step::OutroDone),
            Just(Step::RequestRip),
            Just(Step::Tick),
            Just(Step::TickWithRip),
        ]
    }

    proptest! {
        #[test]
        fn prop_rip_only_from_ready(steps in prop::collection::vec(step(), 0..80)) {
            let mut s = session(PackConfig::default(), 8);
            let mut rip_in_ready = false;
            for step in steps {
                let mut input = TickInput::default();
                match step {
                    Step::IntroDone => s.notify_intro_complete(),
                    Step::RipDone => s.notify_rip_complete(),
                    Step::OutroDone => s.notify_outro_complete(),
                    Step::RequestRip => {
                        rip_in_ready |= s.phase() == Phase::Ready;
                        s.request_rip();
                    }
                    Step::Tick => {}
                    Step::TickWithRip => {
                        rip_in_ready |= s.phase() == Phase::Ready;
                        input.rip = true;
                    }
                }
                if !matches!(step, Step::Tick | Step::TickWithRip) {
                    continue;
                }
                let t = tick(&mut s, &input, DT);
                let ripped = t.iter().any(|t| t.to == Phase::Ripping);
                prop_assert_eq!(ripped, rip_in_ready);
                rip_in_ready = false;
            }
        }
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let mut a = session(PackConfig::demo(), 99999);
        let mut b = session(PackConfig::demo(), 99999);
        for s in [&mut a, &mut b] {
            settle_all(s);
            tick(s, &TickInput::default(), DT);
            s.notify_intro_complete();
            tick(s, &TickInput::default(), DT);
            let rip = TickInput {
                rip: true,
                pointer: Some(Vec2::new(12.0, 8.0)),
                ..Default::default()
            };
            tick(s, &rip, DT);
            for _ in 0..90 {
                tick(s, &TickInput::default(), DT);
            }
        }
        assert_eq!(a.burst.particles(), b.burst.particles());
        assert_eq!(a.swarm.particles(), b.swarm.particles());
    }
}
