//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Asset preloading (image elements on web, file checks natively)
//! - Exposing the session to the JS render shell

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Weak;

use crate::sim::{LoadOutcome, Session};

/// Deliver a load settlement from an async callback that may fire after the
/// session was unmounted. Returns whether the session was still alive.
pub fn settle_if_mounted(session: &Weak<RefCell<Session>>, id: usize, outcome: LoadOutcome) -> bool {
    match session.upgrade() {
        Some(session) => {
            session.borrow_mut().settle_asset(id, outcome);
            true
        }
        None => {
            log::debug!("Dropping load result {} for an unmounted session", id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::settings::{PackConfig, SessionSettings};

    fn mounted() -> Rc<RefCell<Session>> {
        let settings = SessionSettings {
            swarm_particles: Some(4),
            burst_particles: 4,
            ..SessionSettings::with_seed(1)
        };
        Rc::new(RefCell::new(Session::new(PackConfig::demo(), settings).unwrap()))
    }

    #[test]
    fn test_handlers_do_not_keep_session_alive() {
        let session = mounted();
        let handles: Vec<_> = (0..6).map(|_| Rc::downgrade(&session)).collect();
        assert_eq!(Rc::strong_count(&session), 1);

        assert!(settle_if_mounted(&handles[0], 0, LoadOutcome::Succeeded));
        assert_eq!(session.borrow().gate.observed(), 1);

        drop(session);
        assert!(handles[1].upgrade().is_none());
        assert!(!settle_if_mounted(&handles[1], 1, LoadOutcome::Failed));
    }
}
