use std::rc::Rc;

use js_sys::Function;
use serde::de::DeserializeOwned;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use pathways_dashboard_core::{Dashboard, DashboardAction, DashboardConfig};
use pathways_map_core::{svg, AnimationLoop, FrameSnapshot, MapConfig, MapScene, PathAnimator};

mod logging;
mod raf;

pub use logging::init_logging;
pub use raf::RafScheduler;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Decode an optional JS config object, falling back to defaults.
fn config_from_js<T: DeserializeOwned + Default>(value: JsValue, what: &str) -> Result<T, JsError> {
    if jsvalue_is_undefined_or_null(&value) {
        return Ok(T::default());
    }
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn to_js<T: serde::Serialize>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} serialize error: {e}")))
}

/// Animated stylized map driven by `requestAnimationFrame`.
///
/// Calling `free()` from JS stops the loop; no frame callback touches the
/// map afterwards.
#[wasm_bindgen]
pub struct StylizedMap {
    scene: MapScene,
    anim_loop: AnimationLoop<RafScheduler>,
}

#[wasm_bindgen]
impl StylizedMap {
    /// Build the map from a (partial) `MapConfig` object, or defaults for
    /// undefined/null. The loop does not run until `start()`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<StylizedMap, JsError> {
        console_error_panic_hook::set_once();

        let cfg: MapConfig = config_from_js(config, "map config")?;
        cfg.validate()
            .map_err(|e| JsError::new(&format!("map config error: {e}")))?;
        let scene =
            MapScene::build(&cfg).map_err(|e| JsError::new(&format!("scene error: {e}")))?;
        let path = cfg
            .route_path()
            .map_err(|e| JsError::new(&format!("route error: {e}")))?;
        let animator = PathAnimator::with_config(path, cfg.animator);
        let scheduler = Rc::new(RafScheduler::new()?);

        Ok(StylizedMap {
            scene,
            anim_loop: AnimationLoop::new(animator, scheduler),
        })
    }

    pub fn start(&self) {
        self.anim_loop.start();
    }

    pub fn stop(&self) {
        self.anim_loop.stop();
    }

    #[wasm_bindgen(js_name = is_running)]
    pub fn is_running(&self) -> bool {
        self.anim_loop.is_running()
    }

    /// Vehicle position in render space as `[x, y]`.
    pub fn position(&self) -> Vec<f64> {
        let p = self.anim_loop.current_position();
        vec![p.x, p.y]
    }

    #[wasm_bindgen(js_name = segment_index)]
    pub fn segment_index(&self) -> usize {
        self.anim_loop.segment_index()
    }

    pub fn progress(&self) -> f64 {
        self.anim_loop.progress()
    }

    /// Leg of the current segment (`drive`, `wait`, `walk`, `deliver`).
    pub fn leg(&self) -> String {
        self.anim_loop
            .with_animator(|a| a.current_leg().name().to_string())
    }

    /// Static layout: grid lines, building parts, pin, route, palette.
    pub fn scene(&self) -> Result<JsValue, JsError> {
        to_js(&self.scene, "scene")
    }

    /// Whole map as an SVG document, vehicle at its current position.
    pub fn svg(&self) -> String {
        svg::render(&self.scene, self.anim_loop.current_position())
    }

    /// Call `callback(segmentIndex, progress)` after every frame. The
    /// callback may call `stop()` on this map.
    #[wasm_bindgen(js_name = on_frame)]
    pub fn on_frame(&self, callback: Function) {
        self.anim_loop.on_frame(Box::new(move |frame: &FrameSnapshot| {
            let index = JsValue::from_f64(frame.segment_index() as f64);
            let progress = JsValue::from_f64(frame.progress());
            if let Err(err) = callback.call2(&JsValue::UNDEFINED, &index, &progress) {
                log::warn!("on_frame callback threw: {err:?}");
            }
        }));
    }
}

/// Mock driver metrics for the default (or a configured) delivery loop.
#[wasm_bindgen]
pub struct DriverDashboard {
    inner: Dashboard,
}

#[wasm_bindgen]
impl DriverDashboard {
    /// `map_config` supplies the route, `config` the metric constants.
    /// Both accept undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(map_config: JsValue, config: JsValue) -> Result<DriverDashboard, JsError> {
        console_error_panic_hook::set_once();

        let map_cfg: MapConfig = config_from_js(map_config, "map config")?;
        let cfg: DashboardConfig = config_from_js(config, "dashboard config")?;
        let path = map_cfg
            .route_path()
            .map_err(|e| JsError::new(&format!("route error: {e}")))?;
        let inner =
            Dashboard::new(path, cfg).map_err(|e| JsError::new(&format!("dashboard error: {e}")))?;
        Ok(DriverDashboard { inner })
    }

    /// Apply one action object, e.g. `{ type: "segment_entered", index: 3 }`.
    /// Returns the new state.
    pub fn dispatch(&mut self, action: JsValue) -> Result<JsValue, JsError> {
        let action: DashboardAction =
            swb::from_value(action).map_err(|e| JsError::new(&format!("action error: {e}")))?;
        to_js(self.inner.dispatch(action), "dashboard state")
    }

    /// Per-frame sync: advance the clock, then enter `segment_index` if the
    /// map moved on since the last call.
    pub fn advance(&mut self, elapsed_ms: f64, segment_index: usize) -> Result<JsValue, JsError> {
        self.inner
            .dispatch(DashboardAction::ClockAdvanced { elapsed_ms });
        if self.inner.state().segment_index != segment_index {
            self.inner.dispatch(DashboardAction::SegmentEntered {
                index: segment_index,
            });
        }
        to_js(self.inner.state(), "dashboard state")
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.inner.state(), "dashboard state")
    }

    pub fn status(&self) -> String {
        self.inner.state().status.clone()
    }

    #[wasm_bindgen(js_name = eta_text)]
    pub fn eta_text(&self) -> String {
        self.inner.state().eta_text()
    }

    #[wasm_bindgen(js_name = window_text)]
    pub fn window_text(&self) -> String {
        self.inner.state().window_text()
    }

    #[wasm_bindgen(js_name = cost_text)]
    pub fn cost_text(&self) -> String {
        self.inner.state().cost_text()
    }

    pub fn feed(&self) -> Vec<String> {
        self.inner.state().feed.clone()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
