//! Lyon tessellation of a scene pose.
//!
//! Hosts that draw through the GPU instead of the DOM can ask for the
//! scene as it looks `t` seconds after mount: every element's animations
//! are sampled, the element is placed in viewport pixels and its shape is
//! tessellated into a flat triangle list of [`VectorVertex`].
//!
//! # Usage
//!
//! ```ignore
//! let mut vectors = VectorState::new();
//! vectors.draw_scene(env.frame(), config.viewport(), 1.5);
//! upload(vectors.vertex_bytes());
//! ```
//!
//! Text and icon glyphs are not tessellated; the host lays those out.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, vector, Angle, Point, Transform};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::components::element::SceneElement;
use crate::components::paint::{GradientDirection, Paint};
use crate::components::shape::{PathCommand, Shape, Space};
use crate::core::scene::Scene;
use crate::extensions::animation::{sample_property, AnimatedProperty};

const TOLERANCE: f32 = 0.5;

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24
}

/// Where and how one element is drawn at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementPose {
    /// Anchor in viewport pixels.
    pub origin: Vec2,
    pub scale: Vec2,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub opacity: f32,
    /// Drawn fraction of stroked paths.
    pub path_length: f32,
}

/// Top-left of the tree view box, centered in the viewport.
pub fn tree_canvas_origin(viewport: Vec2) -> Vec2 {
    (viewport - Space::TREE_CANVAS) * 0.5
}

/// Sample `element`'s animations `t` seconds after mount. Entrances run
/// from the element's own start time.
pub fn pose(element: &SceneElement, t: f32, viewport: Vec2) -> ElementPose {
    let anims = &element.animations;
    let local = element.local_time(t);
    let sample = |property, rest| sample_property(anims, property, local, rest);

    let travel = Vec2::new(
        sample(AnimatedProperty::TranslateX, 0.0) * viewport.x / 100.0
            + sample(AnimatedProperty::DriftX, 0.0),
        sample(AnimatedProperty::TranslateY, 0.0) * viewport.y / 100.0,
    );
    let anchor = match element.space {
        Space::Viewport => element.pos * viewport / 100.0 + element.offset,
        Space::TreeCanvas => tree_canvas_origin(viewport) + element.pos,
    };
    let scale = sample(AnimatedProperty::Scale, 1.0);

    ElementPose {
        origin: anchor + travel,
        scale: Vec2::new(scale, scale * sample(AnimatedProperty::ScaleY, 1.0)),
        rotation: sample(AnimatedProperty::Rotation, 0.0),
        opacity: element.opacity * sample(AnimatedProperty::Opacity, 1.0),
        path_length: sample(AnimatedProperty::PathLength, 1.0).clamp(0.0, 1.0),
    }
}

/// Vertex constructor for lyon tessellation. Colors are assigned after the
/// whole shape is known, so gradients can span its bounds.
struct PositionCtor;

impl FillVertexConstructor<VectorVertex> for PositionCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            ..Default::default()
        }
    }
}

impl StrokeVertexConstructor<VectorVertex> for PositionCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            ..Default::default()
        }
    }
}

/// State for tessellating scene poses.
///
/// Holds lyon tessellators and the output vertex buffer.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Flat float buffer, [`VectorVertex::FLOATS`] per vertex.
    pub fn vertices(&self) -> &[f32] {
        &self.buffer
    }

    /// The buffer as raw bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Replace the buffer with `scene` posed at `t`, back to front.
    pub fn draw_scene(&mut self, scene: &Scene, viewport: Vec2, t: f32) {
        self.clear();
        for element in scene.draw_order() {
            self.draw_element(element, viewport, t);
        }
    }

    /// Tessellate one element at time `t` and append it.
    pub fn draw_element(&mut self, element: &SceneElement, viewport: Vec2, t: f32) {
        let pose = pose(element, t, viewport);
        if pose.opacity <= 0.0 || pose.scale.x.abs() < f32::EPSILON || pose.scale.y.abs() < f32::EPSILON {
            return;
        }

        match &element.shape {
            Shape::FullBleed => {
                let path = rect_path(Vec2::ZERO, viewport);
                self.fill_path(&path, &element.paint, pose.opacity);
            }
            Shape::Band { height } => {
                let top = element.pos.y * viewport.y / 100.0 - height;
                let path = rect_path(Vec2::new(0.0, top), Vec2::new(viewport.x, *height));
                self.fill_path(&path, &element.paint, pose.opacity);
            }
            shape => {
                let transform = Transform::scale(pose.scale.x, pose.scale.y)
                    .then_rotate(Angle::degrees(pose.rotation))
                    .then_translate(vector(pose.origin.x, pose.origin.y));
                let stroke_scale = (pose.scale.x.abs() + pose.scale.y.abs()) * 0.5;
                self.draw_shape(shape, &element.paint, Vec2::ZERO, pose, &transform, stroke_scale);
            }
        }
    }

    fn draw_shape(
        &mut self,
        shape: &Shape,
        paint: &Paint,
        offset: Vec2,
        pose: ElementPose,
        transform: &Transform,
        stroke_scale: f32,
    ) {
        match shape {
            Shape::Rect { width, height } => {
                let path = rect_path(offset, Vec2::new(*width, *height));
                self.fill_path(&path.transformed(transform), paint, pose.opacity);
            }
            Shape::Circle { radius } if *radius > 0.0 => {
                let mut builder = Path::builder();
                builder.add_circle(point(offset.x, offset.y), *radius, Winding::Positive);
                self.fill_path(&builder.build().transformed(transform), paint, pose.opacity);
            }
            Shape::Ellipse { rx, ry } if *rx > 0.0 && *ry > 0.0 => {
                let mut builder = Path::builder();
                builder.add_ellipse(
                    point(offset.x, offset.y),
                    vector(*rx, *ry),
                    Angle::radians(0.0),
                    Winding::Positive,
                );
                self.fill_path(&builder.build().transformed(transform), paint, pose.opacity);
            }
            Shape::Path { commands, stroke_width } => {
                let path = command_path(commands, offset);
                match stroke_width {
                    Some(width) => {
                        let path = if pose.path_length < 1.0 {
                            trimmed(&path, pose.path_length)
                        } else {
                            path
                        };
                        let width = width * stroke_scale;
                        self.stroke_path(&path.transformed(transform), width, paint, pose.opacity);
                    }
                    None => self.fill_path(&path.transformed(transform), paint, pose.opacity),
                }
            }
            Shape::Compound { parts } => {
                for part in parts {
                    let part_pose = ElementPose {
                        opacity: pose.opacity * part.opacity,
                        ..pose
                    };
                    self.draw_shape(
                        &part.shape,
                        &part.paint,
                        offset + part.offset,
                        part_pose,
                        transform,
                        stroke_scale,
                    );
                }
            }
            // Glyphs, degenerate sizes and viewport-wide fills nested in a compound.
            _ => {}
        }
    }

    pub fn fill_path(&mut self, path: &Path, paint: &Paint, opacity: f32) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, PositionCtor),
        );

        match result {
            Ok(()) => self.flush_geometry(paint, opacity),
            Err(err) => {
                log::debug!("fill tessellation failed: {err:?}");
                self.discard_geometry();
            }
        }
    }

    pub fn stroke_path(&mut self, path: &Path, width: f32, paint: &Paint, opacity: f32) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, PositionCtor),
        );

        match result {
            Ok(()) => self.flush_geometry(paint, opacity),
            Err(err) => {
                log::debug!("stroke tessellation failed: {err:?}");
                self.discard_geometry();
            }
        }
    }

    /// Color the pending geometry and append it to the buffer as a triangle list.
    fn flush_geometry(&mut self, paint: &Paint, opacity: f32) {
        let (min, max) = self.geometry.vertices.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), v| {
                let p = Vec2::new(v.x, v.y);
                (min.min(p), max.max(p))
            },
        );
        let size = max - min;

        for idx in &self.geometry.indices {
            let Some(v) = self.geometry.vertices.get(*idx as usize) else {
                continue;
            };
            let color = paint.color_at(gradient_position(paint, Vec2::new(v.x, v.y), min, size));
            self.buffer
                .extend_from_slice(&[v.x, v.y, color.r, color.g, color.b, color.a * opacity]);
        }
        self.discard_geometry();
    }

    fn discard_geometry(&mut self) {
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized position of `p` along a gradient spanning `min .. min + size`.
fn gradient_position(paint: &Paint, p: Vec2, min: Vec2, size: Vec2) -> f32 {
    let along = |value: f32, start: f32, extent: f32| {
        if extent > 0.0 {
            (value - start) / extent
        } else {
            0.0
        }
    };
    let u = along(p.x, min.x, size.x);
    let v = along(p.y, min.y, size.y);
    match paint {
        Paint::Gradient { direction: GradientDirection::TopLeftToBottomRight, .. } => (u + v) * 0.5,
        _ => v,
    }
}

fn rect_path(pos: Vec2, size: Vec2) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(pos.x, pos.y));
    builder.line_to(point(pos.x + size.x, pos.y));
    builder.line_to(point(pos.x + size.x, pos.y + size.y));
    builder.line_to(point(pos.x, pos.y + size.y));
    builder.close();
    builder.build()
}

fn to_point(x: f32, y: f32, offset: Vec2) -> Point {
    point(x + offset.x, y + offset.y)
}

/// Build a lyon path from SVG-style commands. A drawing command with no
/// open subpath starts one at its own end point.
fn command_path(commands: &[PathCommand], offset: Vec2) -> Path {
    let mut builder = Path::builder();
    let mut open = false;

    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => {
                if open {
                    builder.end(false);
                }
                builder.begin(to_point(x, y, offset));
                open = true;
            }
            PathCommand::LineTo { x, y } => {
                if !open {
                    builder.begin(to_point(x, y, offset));
                    open = true;
                } else {
                    builder.line_to(to_point(x, y, offset));
                }
            }
            PathCommand::QuadTo { cx, cy, x, y } => {
                if !open {
                    builder.begin(to_point(x, y, offset));
                    open = true;
                } else {
                    builder.quadratic_bezier_to(to_point(cx, cy, offset), to_point(x, y, offset));
                }
            }
            PathCommand::CubicTo { c1x, c1y, c2x, c2y, x, y } => {
                if !open {
                    builder.begin(to_point(x, y, offset));
                    open = true;
                } else {
                    builder.cubic_bezier_to(
                        to_point(c1x, c1y, offset),
                        to_point(c2x, c2y, offset),
                        to_point(x, y, offset),
                    );
                }
            }
            PathCommand::Close => {
                if open {
                    builder.close();
                    open = false;
                }
            }
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}

/// The first `fraction` of a path's arc length, flattened to line segments.
fn trimmed(path: &Path, fraction: f32) -> Path {
    let total: f32 = path
        .iter()
        .flattened(TOLERANCE)
        .map(|event| match event {
            PathEvent::Line { from, to } => (to - from).length(),
            _ => 0.0,
        })
        .sum();
    let mut budget = total * fraction.clamp(0.0, 1.0);

    let mut builder = Path::builder();
    let mut open = false;
    for event in path.iter().flattened(TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                if budget <= 0.0 {
                    break;
                }
                builder.begin(at);
                open = true;
            }
            PathEvent::Line { from, to } => {
                let length = (to - from).length();
                if length >= budget {
                    if length > 0.0 {
                        builder.line_to(from.lerp(to, budget / length));
                    }
                    budget = 0.0;
                    break;
                }
                builder.line_to(to);
                budget -= length;
            }
            PathEvent::End { close, .. } => {
                builder.end(close);
                open = false;
            }
            _ => {}
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layer::SceneLayer;
    use crate::components::paint::Color;
    use crate::extensions::animation::Animation;
    use crate::extensions::easing::Easing;
    use std::mem::size_of;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 500.0);

    fn floats(state: &VectorState, vertex: usize) -> &[f32] {
        &state.vertices()[vertex * VectorVertex::FLOATS..(vertex + 1) * VectorVertex::FLOATS]
    }

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(size_of::<VectorVertex>(), 24);
        assert_eq!(VectorVertex::STRIDE_BYTES, 24);
    }

    #[test]
    fn full_bleed_covers_viewport_with_gradient() {
        let top = Color::rgb(1.0, 0.0, 0.0);
        let bottom = Color::rgb(0.0, 0.0, 1.0);
        let mut scene = Scene::new();
        scene.spawn(
            SceneElement::new("sky", SceneLayer::Sky, Shape::FullBleed)
                .with_paint(Paint::vertical([top, bottom])),
        );
        let mut state = VectorState::new();
        state.draw_scene(&scene, VIEWPORT, 0.0);
        assert_eq!(state.vertex_count(), 6);
        assert_eq!(state.vertex_bytes().len(), 6 * VectorVertex::STRIDE_BYTES);

        for i in 0..state.vertex_count() {
            let v = floats(&state, i);
            if v[1] == 0.0 {
                assert_eq!(v[2], 1.0);
            } else {
                assert_eq!(v[1], VIEWPORT.y);
                assert_eq!(v[4], 1.0);
            }
        }
    }

    #[test]
    fn pose_converts_percent_to_pixels() {
        let element = SceneElement::new("drop", SceneLayer::Precipitation, Shape::Rect { width: 2.0, height: 32.0 })
            .with_pos(Vec2::new(50.0, 10.0))
            .with_offset(Vec2::new(0.0, -4.0))
            .with_animation(
                Animation::tween(AnimatedProperty::TranslateY, 0.0, 100.0, 1.0).with_easing(Easing::Linear),
            );
        let at_rest = pose(&element, 0.0, VIEWPORT);
        assert_eq!(at_rest.origin, Vec2::new(500.0, 46.0));
        let halfway = pose(&element, 0.5, VIEWPORT);
        assert!((halfway.origin.y - 296.0).abs() < 1e-3);
    }

    #[test]
    fn tree_canvas_is_centered() {
        let element = SceneElement::new("trunk", SceneLayer::Tree, Shape::FullBleed)
            .with_space(Space::TreeCanvas)
            .with_pos(Vec2::new(150.0, 175.0));
        assert_eq!(pose(&element, 0.0, VIEWPORT).origin, VIEWPORT * 0.5);
    }

    #[test]
    fn delayed_fade_stays_hidden_until_it_runs() {
        let element = SceneElement::new("sun", SceneLayer::Celestial, Shape::Circle { radius: 10.0 })
            .with_opacity(0.8)
            .with_animation(Animation::fade_in(1.0, 2.0).with_delay(1.0).with_easing(Easing::Linear));
        assert_eq!(pose(&element, 0.5, VIEWPORT).opacity, 0.0);
        assert_eq!(pose(&element, 1.0, VIEWPORT).opacity, 0.0);
        assert!((pose(&element, 2.0, VIEWPORT).opacity - 0.4).abs() < 1e-5);
        assert!((pose(&element, 9.0, VIEWPORT).opacity - 0.8).abs() < 1e-5);
    }

    #[test]
    fn late_element_enters_from_its_own_start() {
        let element = SceneElement::new("leaf", SceneLayer::Tree, Shape::Circle { radius: 8.0 })
            .with_animation(Animation::grow_in(1.0).with_easing(Easing::Linear))
            .with_start(100.0);
        assert_eq!(pose(&element, 100.0, VIEWPORT).scale, Vec2::ZERO);
        assert!((pose(&element, 100.5, VIEWPORT).scale.x - 0.5).abs() < 1e-5);
        assert_eq!(pose(&element, 102.0, VIEWPORT).scale, Vec2::ONE);
    }

    #[test]
    fn zero_scale_draws_nothing() {
        let mut scene = Scene::new();
        scene.spawn(
            SceneElement::new("leaf", SceneLayer::Tree, Shape::Circle { radius: 8.0 })
                .with_animation(Animation::grow_in(1.0)),
        );
        let mut state = VectorState::new();
        state.draw_scene(&scene, VIEWPORT, 0.0);
        assert_eq!(state.vertex_count(), 0);
        state.draw_scene(&scene, VIEWPORT, 2.0);
        assert!(state.vertex_count() > 0);
    }

    #[test]
    fn partially_drawn_branch_is_shorter() {
        let path = command_path(
            &[PathCommand::move_to(0.0, 0.0), PathCommand::line_to(100.0, 0.0)],
            Vec2::ZERO,
        );
        let half = trimmed(&path, 0.5);
        let end = half
            .iter()
            .filter_map(|event| match event {
                PathEvent::Line { to, .. } => Some(to),
                _ => None,
            })
            .last()
            .unwrap();
        assert!((end.x - 50.0).abs() < 1e-3);
        assert_eq!(trimmed(&path, 0.0).iter().count(), 0);
    }

    #[test]
    fn compound_parts_are_all_drawn() {
        let one = Shape::Circle { radius: 5.0 };
        let mut single = VectorState::new();
        let mut scene = Scene::new();
        scene.spawn(SceneElement::new("one", SceneLayer::Clouds, one.clone()));
        single.draw_scene(&scene, VIEWPORT, 0.0);

        let parts = vec![
            crate::components::shape::ShapePart::new(Vec2::ZERO, one.clone(), Paint::default()),
            crate::components::shape::ShapePart::new(Vec2::new(20.0, 0.0), one, Paint::default()),
        ];
        let mut double = VectorState::new();
        let mut scene = Scene::new();
        scene.spawn(SceneElement::new("two", SceneLayer::Clouds, Shape::Compound { parts }));
        double.draw_scene(&scene, VIEWPORT, 0.0);

        assert_eq!(double.vertex_count(), single.vertex_count() * 2);
    }

    #[test]
    fn glyphs_are_left_to_the_host() {
        let mut scene = Scene::new();
        scene.spawn(SceneElement::new("label", SceneLayer::Overlay, Shape::text("22°C", 48.0)));
        let mut state = VectorState::new();
        state.draw_scene(&scene, VIEWPORT, 0.0);
        assert_eq!(state.vertex_count(), 0);
    }
}
