use eco_scene::bridge::protocol::elements_json;
use eco_scene::{
    ActionResponse, EnvironmentOverrides, SceneConfig, SceneEnvironment, Season, TimeOfDay,
    Weather, WeatherWidget, WidgetTimeOfDay,
};
#[cfg(feature = "vectors")]
use eco_scene::VectorState;

/// Drives one `SceneEnvironment` for the host page.
///
/// The page owns a single `thread_local!` SceneRunner and talks to it through
/// the free functions in `lib.rs`, because wasm-bindgen cannot export generic
/// structs directly.
pub struct SceneRunner {
    scene: SceneEnvironment,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    /// Last snapshot handed out, kept so the page can re-read it without a rebuild.
    snapshot: String,
    dirty: bool,
}

impl SceneRunner {
    /// Build from a JSON config. A malformed document falls back to defaults.
    pub fn new(config_json: &str) -> Self {
        let config = if config_json.trim().is_empty() {
            SceneConfig::default()
        } else {
            SceneConfig::from_json(config_json).unwrap_or_else(|err| {
                log::warn!("{err}; using the default scene config");
                SceneConfig::default()
            })
        };
        Self {
            scene: SceneEnvironment::new(config),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            snapshot: String::new(),
            dirty: true,
        }
    }

    /// Mount the scene. Call once after construction.
    pub fn init(&mut self) {
        self.scene.mount();
        self.dirty = true;
    }

    pub fn shutdown(&mut self) {
        self.scene.unmount();
    }

    /// Manual overrides from the host. Empty or missing time and season
    /// mean "derive from the clock"; weather falls back to sunny.
    pub fn set_overrides(&mut self, time: Option<&str>, weather: Option<&str>, season: Option<&str>) {
        let overrides = EnvironmentOverrides {
            time_of_day: non_empty(time).map(TimeOfDay::parse_or_default),
            weather: non_empty(weather).map(Weather::parse_or_default),
            season: non_empty(season).map(Season::parse_or_default),
        };
        if self.scene.set_overrides(overrides) {
            self.dirty = true;
        }
    }

    pub fn set_level(&mut self, level: i64) {
        if self.scene.set_level(level) {
            self.dirty = true;
        }
    }

    /// Feed a completed eco action. Returns false if the payload was rejected.
    pub fn apply_action(&mut self, json: &str) -> bool {
        match ActionResponse::from_json(json) {
            Ok(response) => {
                if self.scene.apply_action(&response) {
                    self.dirty = true;
                }
                true
            }
            Err(err) => {
                log::error!("rejected action response: {err}");
                false
            }
        }
    }

    /// Advance the scene clock. Returns true when the frame was recomposed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let changed = self.scene.tick(dt);
        self.dirty |= changed;
        changed
    }

    /// Current snapshot JSON. Rebuilt only when something changed since the
    /// last call; `elapsed` in a cached snapshot is therefore stale.
    pub fn snapshot_json(&mut self) -> &str {
        if self.dirty {
            match self.scene.snapshot().to_json() {
                Ok(json) => {
                    self.snapshot = json;
                    self.dirty = false;
                }
                Err(err) => log::error!("snapshot failed: {err}"),
            }
        }
        &self.snapshot
    }

    /// Compose the compact weather card and return its elements as JSON.
    /// Empty strings for time or season mean "derive from the clock".
    pub fn widget_json(&mut self, temperature: f32, weather: &str, time: Option<&str>, season: Option<&str>) -> String {
        let mut widget = WeatherWidget::new()
            .with_temperature(temperature)
            .with_weather(Weather::parse_or_default(weather));
        if let Some(time) = non_empty(time) {
            widget = widget.with_time_of_day(WidgetTimeOfDay::parse_or_default(time));
        }
        if let Some(season) = non_empty(season) {
            widget = widget.with_season(Season::parse_or_default(season));
        }
        let card = self.scene.compose_widget(&widget);
        elements_json(&card).unwrap_or_else(|err| {
            log::error!("widget serialization failed: {err}");
            String::from("[]")
        })
    }

    pub fn elapsed(&self) -> f32 {
        self.scene.elapsed()
    }

    // ---- Vector accessors for direct buffer reads ----

    /// Tessellate the current frame at scene time `t`.
    #[cfg(feature = "vectors")]
    pub fn tessellate(&mut self, t: f32) {
        let viewport = self.scene.config().viewport();
        self.vectors.draw_scene(self.scene.frame(), viewport, t);
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.vertices().as_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
