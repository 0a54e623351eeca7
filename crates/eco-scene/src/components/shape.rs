use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::paint::Paint;

/// Coordinate space an element's position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Space {
    /// Percent of viewport width/height (0..100), origin top-left.
    #[default]
    Viewport,
    /// Tree canvas units on a 300 × 350 view box, centered in the viewport.
    TreeCanvas,
}

impl Space {
    /// Tree canvas view box size.
    pub const TREE_CANVAS: Vec2 = Vec2::new(300.0, 350.0);
}

/// One SVG-style path command, absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    CubicTo { c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32 },
    Close,
}

impl PathCommand {
    pub const fn move_to(x: f32, y: f32) -> Self {
        Self::MoveTo { x, y }
    }

    pub const fn line_to(x: f32, y: f32) -> Self {
        Self::LineTo { x, y }
    }

    pub const fn quad_to(cx: f32, cy: f32, x: f32, y: f32) -> Self {
        Self::QuadTo { cx, cy, x, y }
    }

    pub const fn cubic_to(c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> Self {
        Self::CubicTo { c1x, c1y, c2x, c2y, x, y }
    }

    /// SVG path-data fragment, e.g. `Q140 330 130 335`.
    pub fn to_svg(&self) -> String {
        match *self {
            Self::MoveTo { x, y } => format!("M{x} {y}"),
            Self::LineTo { x, y } => format!("L{x} {y}"),
            Self::QuadTo { cx, cy, x, y } => format!("Q{cx} {cy} {x} {y}"),
            Self::CubicTo { c1x, c1y, c2x, c2y, x, y } => {
                format!("C{c1x} {c1y} {c2x} {c2y} {x} {y}")
            }
            Self::Close => "Z".to_string(),
        }
    }
}

/// Icon glyph the host draws from its own icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Sun,
    Cloud,
    CloudRain,
    CloudSnow,
}

/// Sub-shape of a [`Shape::Compound`], positioned relative to the element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePart {
    pub offset: Vec2,
    pub shape: Shape,
    pub paint: Paint,
    pub opacity: f32,
}

impl ShapePart {
    pub fn new(offset: Vec2, shape: Shape, paint: Paint) -> Self {
        Self { offset, shape, paint, opacity: 1.0 }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Geometry of a scene element. Sizes are pixels in viewport space and
/// view box units in tree-canvas space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    /// Covers the whole viewport.
    FullBleed,
    /// Full-width band of fixed height whose bottom edge sits at the element position.
    Band { height: f32 },
    /// Axis-aligned rectangle, top-left at the element position.
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    Ellipse { rx: f32, ry: f32 },
    /// Path in local coordinates. `stroke_width = None` fills the outline.
    Path {
        commands: Vec<PathCommand>,
        stroke_width: Option<f32>,
    },
    Text { content: String, size: f32 },
    Icon { icon: Icon, size: f32 },
    /// Several parts animated as one unit.
    Compound { parts: Vec<ShapePart> },
}

impl Shape {
    pub fn stroke(commands: &[PathCommand], width: f32) -> Self {
        Shape::Path {
            commands: commands.to_vec(),
            stroke_width: Some(width),
        }
    }

    pub fn fill_path(commands: &[PathCommand]) -> Self {
        Shape::Path {
            commands: commands.to_vec(),
            stroke_width: None,
        }
    }

    pub fn text(content: impl Into<String>, size: f32) -> Self {
        Shape::Text {
            content: content.into(),
            size,
        }
    }

    /// SVG `d` attribute for path shapes.
    pub fn svg_path_data(&self) -> Option<String> {
        match self {
            Shape::Path { commands, .. } => Some(
                commands
                    .iter()
                    .map(PathCommand::to_svg)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_data_matches_commands() {
        let shape = Shape::stroke(
            &[PathCommand::move_to(150.0, 320.0), PathCommand::quad_to(140.0, 330.0, 130.0, 335.0)],
            2.0,
        );
        assert_eq!(shape.svg_path_data().unwrap(), "M150 320 Q140 330 130 335");
        assert!(Shape::Circle { radius: 1.0 }.svg_path_data().is_none());
    }

    #[test]
    fn shapes_serialize_with_type_tag() {
        let json = serde_json::to_string(&Shape::Ellipse { rx: 10.0, ry: 7.0 }).unwrap();
        assert!(json.contains(r#""type":"ellipse""#));
    }
}
