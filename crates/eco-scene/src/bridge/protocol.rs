//! JSON document handed to the host page on every snapshot.
//! Must stay in sync with the TypeScript `SceneSnapshot` type.
//!
//! ```text
//! {
//!   "version": 1,
//!   "environment": { "time_of_day": "day", "weather": "sunny", "season": "summer" },
//!   "overlay": ["Time: Day", "Weather: Sunny", "Season: Summer"],
//!   "tree": { "level": 3, "stage": 3, "headline": "Level 3", "status": "..." },
//!   "elapsed": 12.5,
//!   "elements": [ ...back to front... ]
//! }
//! ```
//!
//! Element animations are serialized as descriptors; the host plays them.
//! Each element carries `started_at`, the `elapsed` value at which it first
//! appeared; its animation clock is `elapsed - started_at`.
use serde::Serialize;

use crate::components::element::SceneElement;
use crate::core::scene::Scene;
use crate::environment::resolver::ResolvedEnvironment;
use crate::error::SceneError;
use crate::systems::overlay::OverlayPanel;
use crate::systems::tree::TreeStatus;

/// Protocol version written into every snapshot.
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot<'a> {
    pub version: u32,
    pub environment: ResolvedEnvironment,
    pub overlay: &'a [String],
    pub tree: TreeStatus,
    /// Seconds since mount.
    pub elapsed: f32,
    /// Draw order, back to front.
    pub elements: Vec<&'a SceneElement>,
}

impl<'a> SceneSnapshot<'a> {
    pub fn new(
        environment: ResolvedEnvironment,
        overlay: &'a OverlayPanel,
        tree: TreeStatus,
        elapsed: f32,
        frame: &'a Scene,
    ) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            environment,
            overlay: &overlay.lines,
            tree,
            elapsed,
            elements: frame.draw_order(),
        }
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Serialize a standalone scene (the weather card) as its draw-ordered elements.
pub fn elements_json(scene: &Scene) -> Result<String, SceneError> {
    Ok(serde_json::to_string(&scene.draw_order())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layer::SceneLayer;
    use crate::components::shape::Shape;
    use crate::systems::tree::GrowthLevel;

    #[test]
    fn snapshot_serializes_in_draw_order() {
        let mut frame = Scene::new();
        frame.spawn(SceneElement::new("ground", SceneLayer::Ground, Shape::Band { height: 96.0 }));
        frame.spawn(SceneElement::new("sky", SceneLayer::Sky, Shape::FullBleed).with_start(4.5));
        let env = ResolvedEnvironment::default();
        let overlay = OverlayPanel::new(&env);
        let snapshot = SceneSnapshot::new(env, &overlay, GrowthLevel::new(2).into(), 0.0, &frame);

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["environment"]["weather"], "sunny");
        assert_eq!(json["overlay"][2], "Season: Summer");
        assert_eq!(json["tree"]["headline"], "Level 2");
        assert_eq!(json["elements"][0]["tag"], "sky");
        assert_eq!(json["elements"][0]["started_at"], 4.5);
        assert_eq!(json["elements"][1]["started_at"], 0.0);
        assert_eq!(json["elements"][1]["shape"]["type"], "band");

        let bare: serde_json::Value = serde_json::from_str(&elements_json(&frame).unwrap()).unwrap();
        assert_eq!(bare.as_array().map(Vec::len), Some(2));
    }
}
