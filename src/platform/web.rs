//! Browser bindings
//!
//! The JS shell owns the canvas, the meshes and the UI. It drives one
//! [`PackRip`] per mounted experience: forwards pointer/drag input and pack
//! animation completions, calls `tick` once per animation frame, and reads
//! poses and flags back out.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use super::settle_if_mounted;
use crate::settings::{PackConfig, QualityPreset, SessionSettings};
use crate::sim::{LoadOutcome, Session, TickInput, tick};

fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialised by a previous mount
    let _ = console_log::init_with_level(log::Level::Info);
}

fn user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}

/// One mounted pack opening
#[wasm_bindgen]
pub struct PackRip {
    session: Rc<RefCell<Session>>,
    input: TickInput,
}

#[wasm_bindgen]
impl PackRip {
    /// Build from a JSON pack config (`{ packTexture?, cards: [{ frontImage, backImage }] }`)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<PackRip, JsValue> {
        init_logging();
        let config = PackConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = SessionSettings {
            seed: js_sys::Date::now() as u64,
            quality: QualityPreset::for_user_agent(&user_agent()),
            ..SessionSettings::default()
        };
        let session = Session::new(config, settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session: Rc::new(RefCell::new(session)),
            input: TickInput::default(),
        })
    }

    /// Fire one image request per asset. Settlements land between frames.
    #[wasm_bindgen(js_name = startPreload)]
    pub fn start_preload(&self) {
        let references: Vec<String> = self
            .session
            .borrow()
            .asset_references()
            .map(str::to_owned)
            .collect();

        for (id, src) in references.into_iter().enumerate() {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(e) => {
                    log::warn!("Could not create image for {}: {:?}", src, e);
                    self.session.borrow_mut().settle_asset(id, LoadOutcome::Failed);
                    continue;
                }
            };

            // Handlers outlive the mount, so they must not keep the session alive
            let session = Rc::downgrade(&self.session);
            let onload = Closure::<dyn FnMut()>::new(move || {
                settle_if_mounted(&session, id, LoadOutcome::Succeeded);
            });
            let session = Rc::downgrade(&self.session);
            let onerror = Closure::<dyn FnMut()>::new(move || {
                settle_if_mounted(&session, id, LoadOutcome::Failed);
            });
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onload.forget();
            onerror.forget();

            img.set_src(&src);
        }
    }

    /// Advance one animation frame (`dt` in seconds)
    pub fn tick(&mut self, dt: f32) {
        let transitions = tick(&mut self.session.borrow_mut(), &self.input, dt);
        for t in transitions {
            log::debug!("{:?} -> {:?}", t.from, t.to);
        }
        // One-shot inputs
        self.input.rip = false;
        self.input.drag = None;
    }

    /// Pointer position relative to the container center (pixels)
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    /// Orbit drag in pixels on a viewport `height` pixels tall
    pub fn drag(&mut self, dx: f32, dy: f32, height: f32) {
        let delta = self.input.drag.unwrap_or(Vec2::ZERO) + Vec2::new(dx, dy);
        self.input.drag = Some(delta);
        self.input.viewport_height = height;
    }

    pub fn rip(&mut self) {
        self.input.rip = true;
    }

    #[wasm_bindgen(js_name = introComplete)]
    pub fn intro_complete(&self) {
        self.session.borrow_mut().notify_intro_complete();
    }

    #[wasm_bindgen(js_name = ripComplete)]
    pub fn rip_complete(&self) {
        self.session.borrow_mut().notify_rip_complete();
    }

    #[wasm_bindgen(js_name = outroComplete)]
    pub fn outro_complete(&self) {
        self.session.borrow_mut().notify_outro_complete();
    }

    pub fn phase(&self) -> String {
        self.session.borrow().phase().as_str().to_owned()
    }

    /// Scene flags as JSON
    pub fn flags(&self) -> String {
        serde_json::to_string(&self.session.borrow().flags()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = loadProgress)]
    pub fn load_progress(&self) -> f32 {
        self.session.borrow().gate.progress()
    }

    /// Per card: x, y, z, roll
    #[wasm_bindgen(js_name = cardPoses)]
    pub fn card_poses(&self) -> Vec<f32> {
        let session = self.session.borrow();
        let mut out = Vec::with_capacity(session.fan.len() * 4);
        for card in session.fan.cards() {
            let p = card.current;
            out.extend_from_slice(&[p.position.x, p.position.y, p.position.z, p.rotation]);
        }
        out
    }

    /// Per particle: x, y, z
    #[wasm_bindgen(js_name = burstPositions)]
    pub fn burst_positions(&self) -> Vec<f32> {
        let session = self.session.borrow();
        session
            .burst
            .particles()
            .iter()
            .flat_map(|p| p.pos.to_array())
            .collect()
    }

    /// Per particle: r, g, b
    #[wasm_bindgen(js_name = burstColors)]
    pub fn burst_colors(&self) -> Vec<f32> {
        let session = self.session.borrow();
        session.burst.colors().iter().flat_map(|c| c.to_array()).collect()
    }

    #[wasm_bindgen(js_name = burstOpacity)]
    pub fn burst_opacity(&self) -> f32 {
        self.session.borrow().burst.opacity()
    }

    #[wasm_bindgen(js_name = burstVisible)]
    pub fn burst_visible(&self) -> bool {
        self.session.borrow().burst.visible()
    }

    /// Column-major 4x4 per swarm shard
    #[wasm_bindgen(js_name = swarmMatrices)]
    pub fn swarm_matrices(&self) -> Vec<f32> {
        let session = self.session.borrow();
        let mut out = Vec::with_capacity(session.swarm.len() * 16);
        for inst in session.swarm.instances() {
            out.extend_from_slice(&inst.transform().to_cols_array());
        }
        out
    }

    /// Camera eye position: x, y, z
    #[wasm_bindgen(js_name = cameraPosition)]
    pub fn camera_position(&self) -> Vec<f32> {
        self.session.borrow().camera.position().to_array().to_vec()
    }

    /// Vertical field of view (radians)
    #[wasm_bindgen(js_name = fovY)]
    pub fn fov_y(&self) -> f32 {
        self.session.borrow().camera.fov_y()
    }

    /// Scene sway quaternion: x, y, z, w
    #[wasm_bindgen(js_name = sceneRotation)]
    pub fn scene_rotation(&self) -> Vec<f32> {
        self.session.borrow().camera.scene_rotation().to_array().to_vec()
    }
}
