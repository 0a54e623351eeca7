pub mod api;
pub mod core;
pub mod components;
pub mod environment;
pub mod systems;
pub mod bridge;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::{ContextProfile, SceneConfig};
pub use api::environment_scene::SceneEnvironment;
pub use api::types::{ActionResponse, ElementId, UserProgress};
pub use components::element::SceneElement;
pub use components::layer::SceneLayer;
pub use components::paint::{Color, GradientDirection, Paint, Palette};
pub use components::shape::{Icon, PathCommand, Shape, ShapePart, Space};
pub use core::clock::{Clock, FixedClock, SystemClock};
pub use core::scene::Scene;
pub use core::time::IntervalTimer;
pub use environment::{
    EnvironmentOverrides, EnvironmentResolver, Precipitation, ResolvedEnvironment, Season,
    TimeOfDay, Weather, WidgetTimeOfDay,
};
pub use error::SceneError;
pub use bridge::protocol::{elements_json, SceneSnapshot, PROTOCOL_VERSION};
pub use systems::background::{compose_backdrop, SeasonalDecoration, SunPlacement};
pub use systems::overlay::OverlayPanel;
pub use systems::particles::{DensityPolicy, ParticleDescriptor, ParticleField, ParticlePolicy};
pub use systems::tree::{GrowthLevel, TreeGrowth, TreeStatus};
pub use systems::widget::WeatherWidget;

#[cfg(feature = "vectors")]
pub use systems::vector::{ElementPose, VectorState, VectorVertex};

// Extensions: declarative animation descriptors
pub use extensions::{AnimatedProperty, Animation, Easing, Repeat};
