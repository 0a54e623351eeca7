//! Informational text drawn over the scene.

use glam::Vec2;
use serde::Serialize;

use crate::components::element::SceneElement;
use crate::components::layer::SceneLayer;
use crate::components::paint::{Paint, Palette};
use crate::components::shape::{Shape, Space};
use crate::core::scene::Scene;
use crate::environment::resolver::ResolvedEnvironment;
use crate::systems::tree::TreeStatus;

const LINE_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 20.0;
const PANEL_PADDING: f32 = 12.0;

/// The fixed corner panel reporting the resolved categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayPanel {
    pub lines: [String; 3],
}

impl OverlayPanel {
    pub fn new(env: &ResolvedEnvironment) -> Self {
        Self {
            lines: [
                format!("Time: {}", env.time_of_day.display_name()),
                format!("Weather: {}", env.weather.display_name()),
                format!("Season: {}", env.season.display_name()),
            ],
        }
    }

    /// Spawn the panel background and its lines in the top-right corner.
    pub fn compose(&self, scene: &mut Scene, palette: &Palette) {
        let height = PANEL_PADDING * 2.0 + LINE_HEIGHT * self.lines.len() as f32;
        let width = 160.0;
        scene.spawn(
            SceneElement::new("overlay/panel", SceneLayer::Overlay, Shape::Rect { width, height })
                .with_pos(Vec2::new(100.0, 0.0))
                .with_offset(Vec2::new(-width - 16.0, 16.0))
                .with_paint(Paint::solid(palette.panel)),
        );
        for (i, line) in self.lines.iter().enumerate() {
            scene.spawn(
                SceneElement::new(format!("overlay/line-{i}"), SceneLayer::Overlay, Shape::text(line.as_str(), LINE_SIZE))
                    .with_pos(Vec2::new(100.0, 0.0))
                    .with_offset(Vec2::new(
                        -width - 16.0 + PANEL_PADDING,
                        16.0 + PANEL_PADDING + LINE_HEIGHT * i as f32,
                    ))
                    .with_paint(Paint::solid(palette.text)),
            );
        }
    }
}

/// Headline and status label under the tree.
pub fn compose_tree_labels(scene: &mut Scene, status: &TreeStatus, palette: &Palette) {
    let below = Space::TREE_CANVAS.y;
    scene.spawn(
        SceneElement::new("tree/headline", SceneLayer::Overlay, Shape::text(status.headline.as_str(), 24.0))
            .with_space(Space::TreeCanvas)
            .with_pos(Vec2::new(Space::TREE_CANVAS.x * 0.5, below + 10.0))
            .with_paint(Paint::solid(palette.text)),
    );
    scene.spawn(
        SceneElement::new("tree/status", SceneLayer::Overlay, Shape::text(status.status, LINE_SIZE))
            .with_space(Space::TreeCanvas)
            .with_pos(Vec2::new(Space::TREE_CANVAS.x * 0.5, below + 40.0))
            .with_paint(Paint::solid(palette.text)),
    );
}
