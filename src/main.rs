//! Pack Rip entry point
//!
//! On the web the JS shell drives `pack_rip::platform::web::PackRip`. Natively
//! this binary runs a headless scripted session and logs its timeline:
//!
//! ```text
//! pack-rip [config.json] [asset-root]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use pack_rip::platform::native::preload_from_dir;
    use pack_rip::sim::{LoadOutcome, PackIntents, Phase, Session, TickInput, tick, zoom_duration};
    use pack_rip::{ConfigError, PackConfig, SessionSettings};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: f32 = 30.0;
    /// How long the stand-in pack takes for each of its animations
    const INTRO_SECONDS: f32 = 1.5;
    const RIP_SECONDS: f32 = 1.0;
    const OUTRO_SECONDS: f32 = 0.8;
    /// User waits this long in Ready before ripping
    const RIP_DELAY: f32 = 0.5;

    /// Stand-in for the pack mesh: plays whichever animation it is asked to
    /// and reports completion after a fixed time.
    #[derive(Default)]
    struct ScriptedPack {
        playing: Option<(Phase, f32)>,
    }

    impl ScriptedPack {
        fn update(&mut self, intents: PackIntents, phase: Phase, session: &mut Session, dt: f32) {
            let wanted = intents.play_intro || intents.play_rip || intents.play_outro;
            match self.playing {
                Some((p, _)) if p == phase => {}
                _ if wanted => self.playing = Some((phase, 0.0)),
                _ => self.playing = None,
            }
            let Some((p, t)) = self.playing.as_mut() else {
                return;
            };
            *t += dt;
            let (length, done): (f32, fn(&mut Session)) = match p {
                Phase::Intro => (INTRO_SECONDS, Session::notify_intro_complete),
                Phase::Ripping => (RIP_SECONDS, Session::notify_rip_complete),
                Phase::Outro => (OUTRO_SECONDS, Session::notify_outro_complete),
                _ => return,
            };
            if *t >= length {
                done(session);
                self.playing = None;
            }
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => PackConfig::load(path)?,
            None => PackConfig::demo(),
        };
        let asset_root = args.next().map(PathBuf::from);

        let settings = SessionSettings::with_seed(0x5eed);
        let mut session = Session::new(config, settings)?;

        match &asset_root {
            Some(root) => {
                let failed = preload_from_dir(&mut session, root);
                log::info!("Preloaded from {} ({} failed)", root.display(), failed);
            }
            None => {
                for id in 0..session.gate.expected() {
                    session.settle_asset(id, LoadOutcome::Succeeded);
                }
            }
        }

        let mut pack = ScriptedPack::default();
        let mut ready_at = None;
        let settle_time = zoom_duration(session.fan.len());

        while session.time < MAX_SECONDS {
            let rip = match ready_at {
                Some(t) => session.phase() == Phase::Ready && session.time - t >= RIP_DELAY,
                None => false,
            };
            let input = TickInput {
                rip,
                ..Default::default()
            };

            for t in tick(&mut session, &input, FRAME_DT) {
                log::info!("[{:6.2}s] {:?} -> {:?}", session.time, t.from, t.to);
                if t.to == Phase::Ready {
                    ready_at = Some(session.time);
                }
            }

            let flags = session.flags();
            pack.update(flags.pack, session.phase(), &mut session, FRAME_DT);

            if session.phase() == Phase::Cards && session.fan.elapsed() >= settle_time {
                break;
            }
        }

        log::info!(
            "Finished in {:.2}s ({} frames), phase {}, camera distance {:.3}",
            session.time,
            session.frame,
            session.phase().as_str(),
            session.camera.distance()
        );
        for card in session.fan.cards() {
            log::info!(
                "Card {} ({}) at {:?}, roll {:.1} deg",
                card.index,
                card.front_image,
                card.current.position,
                card.current.rotation.to_degrees()
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pack Rip (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry points live in pack_rip::platform::web
}
