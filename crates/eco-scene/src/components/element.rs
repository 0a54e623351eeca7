use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::ElementId;
use crate::components::layer::SceneLayer;
use crate::components::paint::Paint;
use crate::components::shape::{Shape, Space};
use crate::extensions::animation::Animation;

/// One drawable item of the scene: geometry, paint, placement and the
/// animation descriptors the host runtime should play on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    /// Assigned by [`Scene::spawn`](crate::core::scene::Scene::spawn); unique per render generation.
    pub id: ElementId,
    /// Stable, human-readable name ("rain-12", "tree/stage5/leaf-2").
    pub tag: String,
    pub layer: SceneLayer,
    pub space: Space,
    /// Anchor position in `space` units.
    pub pos: Vec2,
    /// Extra pixel offset applied after `pos` (viewport space only).
    pub offset: Vec2,
    pub shape: Shape,
    pub paint: Paint,
    /// Base opacity; an `Opacity` animation multiplies into it.
    pub opacity: f32,
    pub animations: Vec<Animation>,
    /// Seconds after mount at which this element first appeared. Animation
    /// times are relative to it.
    #[serde(default)]
    pub started_at: f32,
}

impl SceneElement {
    /// Create an element at the origin of viewport space.
    pub fn new(tag: impl Into<String>, layer: SceneLayer, shape: Shape) -> Self {
        Self {
            id: ElementId::UNASSIGNED,
            tag: tag.into(),
            layer,
            space: Space::Viewport,
            pos: Vec2::ZERO,
            offset: Vec2::ZERO,
            shape,
            paint: Paint::default(),
            opacity: 1.0,
            animations: Vec::new(),
            started_at: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_space(mut self, space: Space) -> Self {
        self.space = space;
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_paint(mut self, paint: Paint) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    pub fn with_animations(mut self, animations: impl IntoIterator<Item = Animation>) -> Self {
        self.animations.extend(animations);
        self
    }

    pub fn with_start(mut self, started_at: f32) -> Self {
        self.started_at = started_at;
        self
    }

    /// Time since this element appeared, given seconds since mount.
    pub fn local_time(&self, elapsed: f32) -> f32 {
        elapsed - self.started_at
    }

    /// True if any attached animation loops forever.
    pub fn is_continuous(&self) -> bool {
        self.animations.iter().any(Animation::is_looping)
    }

    /// Drop one-shot animations, leaving the element at rest (loops are kept).
    pub fn settle(&mut self) {
        self.animations.retain(Animation::is_looping);
    }
}
