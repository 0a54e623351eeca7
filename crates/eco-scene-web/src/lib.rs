//! Browser bindings for eco-scene.
//!
//! The page calls `scene_init` once, then drives the scene with
//! `scene_tick` from its animation loop and reads `scene_snapshot` whenever
//! a tick reports a change. Calls made before `scene_init` are no-ops that
//! return an empty value.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::SceneRunner;

thread_local! {
    static RUNNER: RefCell<Option<SceneRunner>> = const { RefCell::new(None) };
}

fn with_runner<T: Default>(f: impl FnOnce(&mut SceneRunner) -> T) -> T {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("eco-scene not initialized; call scene_init() first");
            T::default()
        }
    })
}

#[wasm_bindgen]
pub fn scene_init(config_json: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let mut runner = SceneRunner::new(config_json);
    runner.init();
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("eco-scene: initialized");
}

#[wasm_bindgen]
pub fn scene_shutdown() {
    RUNNER.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.shutdown();
        }
    });
}

#[wasm_bindgen]
pub fn scene_tick(dt: f32) -> bool {
    with_runner(|r| r.tick(dt))
}

#[wasm_bindgen]
pub fn scene_set_overrides(time: Option<String>, weather: Option<String>, season: Option<String>) {
    with_runner(|r| r.set_overrides(time.as_deref(), weather.as_deref(), season.as_deref()));
}

/// JS numbers arrive as f64; non-finite levels are treated as zero.
#[wasm_bindgen]
pub fn scene_set_level(level: f64) {
    let level = if level.is_finite() { level as i64 } else { 0 };
    with_runner(|r| r.set_level(level));
}

#[wasm_bindgen]
pub fn scene_apply_action(json: &str) -> bool {
    with_runner(|r| r.apply_action(json))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn scene_snapshot() -> String {
    with_runner(|r| r.snapshot_json().to_owned())
}

#[wasm_bindgen]
pub fn scene_widget(temperature: f32, weather: &str, time: Option<String>, season: Option<String>) -> String {
    with_runner(|r| r.widget_json(temperature, weather, time.as_deref(), season.as_deref()))
}

#[wasm_bindgen]
pub fn scene_elapsed() -> f32 {
    with_runner(|r| r.elapsed())
}

// ---- Vector accessors ----

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn scene_tessellate(t: f32) {
    with_runner(|r| r.tessellate(t));
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    RUNNER.with(|cell| match cell.borrow().as_ref() {
        Some(runner) => runner.vector_vertices_ptr(),
        None => std::ptr::null(),
    })
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count())
}
