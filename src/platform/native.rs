//! Native asset preloading
//!
//! Resolves asset references against a directory. A missing or unreadable
//! file counts as a failed load, exactly like a broken image on the web.

use std::path::{Path, PathBuf};

use crate::sim::{LoadOutcome, Session};

/// Map a web-style reference (`/cards/a.png`) onto `root`
pub fn resolve(root: &Path, reference: &str) -> PathBuf {
    root.join(reference.trim_start_matches('/'))
}

/// Settle every asset of the session against `root`. Returns the failure count.
pub fn preload_from_dir(session: &mut Session, root: &Path) -> usize {
    let outcomes: Vec<LoadOutcome> = session
        .asset_references()
        .map(|reference| {
            let path = resolve(root, reference);
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => LoadOutcome::Succeeded,
                Ok(_) => {
                    log::warn!("{} is not a file", path.display());
                    LoadOutcome::Failed
                }
                Err(e) => {
                    log::warn!("{}: {}", path.display(), e);
                    LoadOutcome::Failed
                }
            }
        })
        .collect();

    let mut failed = 0;
    for (id, outcome) in outcomes.into_iter().enumerate() {
        if outcome == LoadOutcome::Failed {
            failed += 1;
        }
        session.settle_asset(id, outcome);
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CardEntry, PackConfig, SessionSettings};
    use crate::sim::{Phase, TickInput, tick};

    #[test]
    fn test_resolve_strips_leading_slash() {
        let root = Path::new("/srv/public");
        assert_eq!(resolve(root, "/cards/a.png"), PathBuf::from("/srv/public/cards/a.png"));
        assert_eq!(resolve(root, "b.png"), PathBuf::from("/srv/public/b.png"));
    }

    #[test]
    fn test_missing_files_still_open_the_gate() {
        let root = std::env::temp_dir().join(format!("pack-rip-test-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("front.png"), b"png").unwrap();

        let config = PackConfig {
            pack_texture: Some("/missing-pack.png".into()),
            cards: vec![CardEntry::new("/front.png", "/missing-back.png")],
        };
        let settings = SessionSettings {
            swarm_particles: Some(4),
            burst_particles: 4,
            ..SessionSettings::with_seed(1)
        };
        let mut session = Session::new(config, settings).unwrap();
        let failed = preload_from_dir(&mut session, &root);
        assert_eq!(failed, 2);
        assert!(session.gate.is_ready());

        tick(&mut session, &TickInput::default(), 1.0 / 60.0);
        assert_eq!(session.phase(), Phase::Intro);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
