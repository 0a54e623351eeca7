//! Growth-stage tree.
//!
//! The tree at level L is the union of stages 1..=L of a fixed stage table;
//! each stage only adds parts, so a higher level is always a superset of a
//! lower one. Levels outside 1..=10 are clamped for rendering; the raw value
//! is kept for the headline.
//!
//! All geometry lives in a 300 × 350 view box ([`Space::TreeCanvas`]).

use glam::Vec2;
use serde::Serialize;

use crate::components::element::SceneElement;
use crate::components::layer::SceneLayer;
use crate::components::paint::{Color, Paint, Palette};
use crate::components::shape::{PathCommand, Shape, ShapePart, Space};
use crate::core::scene::Scene;
use crate::extensions::animation::{AnimatedProperty, Animation};
use crate::extensions::easing::Easing;

pub const MIN_STAGE: u8 = 1;
pub const MAX_STAGE: u8 = 10;

const BRANCH_BASE_SECS: f32 = 0.8;
const BRANCH_ORDER_SECS: f32 = 0.3;
const LEAF_BASE_DELAY: f32 = 0.5;
const LEAF_STAGGER: f32 = 0.15;
const LEAF_GROW_SECS: f32 = 0.5;
const GLOW_PULSE_SECS: f32 = 2.0;

/// A user level clamped to the renderable stage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthLevel {
    raw: i64,
    stage: u8,
}

impl GrowthLevel {
    pub fn new(raw: i64) -> Self {
        let stage = raw.clamp(MIN_STAGE as i64, MAX_STAGE as i64) as u8;
        Self { raw, stage }
    }

    /// The level as reported by the backend.
    pub fn raw(self) -> i64 {
        self.raw
    }

    /// Highest stage drawn, in 1..=10.
    pub fn stage(self) -> u8 {
        self.stage
    }

    /// "Level {raw}"; the headline shows the unclamped value.
    pub fn headline(self) -> String {
        format!("Level {}", self.raw)
    }

    pub fn status(self) -> &'static str {
        match self.stage {
            0..=2 => "Your eco-tree is sprouting 🌱",
            3..=5 => "Growing strong 🌿",
            6..=7 => "Flourishing beautifully 🌳",
            8..=9 => "Blooming with life 🌸",
            _ => "A magnificent eco-champion! 🌟",
        }
    }
}

impl Default for GrowthLevel {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Text shown with the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStatus {
    pub level: i64,
    pub stage: u8,
    pub headline: String,
    pub status: &'static str,
}

impl From<GrowthLevel> for TreeStatus {
    fn from(level: GrowthLevel) -> Self {
        Self {
            level: level.raw(),
            stage: level.stage(),
            headline: level.headline(),
            status: level.status(),
        }
    }
}

// ── Stage table ──────────────────────────────────────────────────────

/// Fill or stroke role, resolved against the palette at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tint {
    /// Bark at the given HSL lightness (percent).
    Bark(f32),
    Canopy,
    CanopyDense,
    Gold,
}

#[derive(Debug, Clone, Copy)]
enum PartSpec {
    /// Woody stroke; `order` 0 is the trunk, higher orders draw later.
    Branch {
        path: &'static [PathCommand],
        width: f32,
        tint: Tint,
        order: u8,
    },
    /// Filled leaf cluster.
    Leaf {
        center: (f32, f32),
        size: LeafSize,
        tint: Tint,
        opacity: f32,
    },
    /// Soft pulsing halo behind the canopy.
    Glow { center: (f32, f32), radius: f32 },
    Blossom { center: (f32, f32) },
    Fruit { center: (f32, f32) },
    /// Small filled silhouette.
    Bird { path: &'static [PathCommand] },
}

#[derive(Debug, Clone, Copy)]
enum LeafSize {
    Round(f32),
    Oval(f32, f32),
}

use PathCommand as P;

const fn branch(path: &'static [PathCommand], width: f32, lightness: f32, order: u8) -> PartSpec {
    PartSpec::Branch { path, width, tint: Tint::Bark(lightness), order }
}

const fn round_leaf(x: f32, y: f32, radius: f32, tint: Tint, opacity: f32) -> PartSpec {
    PartSpec::Leaf { center: (x, y), size: LeafSize::Round(radius), tint, opacity }
}

const fn oval_leaf(x: f32, y: f32) -> PartSpec {
    PartSpec::Leaf { center: (x, y), size: LeafSize::Oval(10.0, 7.0), tint: Tint::Canopy, opacity: 0.75 }
}

const TRUNK: &[PathCommand] = &[P::move_to(150.0, 320.0), P::cubic_to(145.0, 280.0, 148.0, 240.0, 150.0, 180.0)];
const ROOT_LEFT: &[PathCommand] = &[P::move_to(150.0, 320.0), P::quad_to(140.0, 330.0, 130.0, 335.0)];
const ROOT_RIGHT: &[PathCommand] = &[P::move_to(150.0, 320.0), P::quad_to(160.0, 330.0, 170.0, 335.0)];
const LIMB_LEFT: &[PathCommand] = &[P::move_to(150.0, 220.0), P::quad_to(130.0, 200.0, 120.0, 170.0)];
const LIMB_RIGHT: &[PathCommand] = &[P::move_to(150.0, 220.0), P::quad_to(170.0, 200.0, 180.0, 170.0)];
const BOUGH_LEFT: &[PathCommand] = &[P::move_to(120.0, 170.0), P::quad_to(100.0, 150.0, 90.0, 130.0)];
const BOUGH_RIGHT: &[PathCommand] = &[P::move_to(180.0, 170.0), P::quad_to(200.0, 150.0, 210.0, 130.0)];
const LEADER: &[PathCommand] = &[P::move_to(150.0, 180.0), P::cubic_to(150.0, 150.0, 148.0, 130.0, 150.0, 110.0)];
const SPRIG_LEFT: &[PathCommand] = &[P::move_to(90.0, 130.0), P::quad_to(75.0, 115.0, 65.0, 100.0)];
const SPRIG_RIGHT: &[PathCommand] = &[P::move_to(210.0, 130.0), P::quad_to(225.0, 115.0, 235.0, 100.0)];
const CROWN_LEFT: &[PathCommand] = &[P::move_to(150.0, 110.0), P::quad_to(130.0, 90.0, 120.0, 70.0)];
const CROWN_RIGHT: &[PathCommand] = &[P::move_to(150.0, 110.0), P::quad_to(170.0, 90.0, 180.0, 70.0)];
const TWIG_LEFT: &[PathCommand] = &[P::move_to(120.0, 70.0), P::quad_to(110.0, 55.0, 105.0, 45.0)];
const TWIG_RIGHT: &[PathCommand] = &[P::move_to(180.0, 70.0), P::quad_to(190.0, 55.0, 195.0, 45.0)];
const BIRD_LEFT: &[PathCommand] = &[
    P::move_to(70.0, 60.0),
    P::quad_to(65.0, 58.0, 60.0, 60.0),
    P::quad_to(65.0, 62.0, 70.0, 60.0),
];
const BIRD_RIGHT: &[PathCommand] = &[
    P::move_to(230.0, 60.0),
    P::quad_to(235.0, 58.0, 240.0, 60.0),
    P::quad_to(235.0, 62.0, 230.0, 60.0),
];

const STAGE_1: &[PartSpec] = &[branch(TRUNK, 12.0, 30.0, 0)];

const STAGE_2: &[PartSpec] = &[
    branch(ROOT_LEFT, 2.0, 35.0, 1),
    branch(ROOT_RIGHT, 2.0, 35.0, 1),
    branch(LIMB_LEFT, 7.0, 32.0, 1),
    branch(LIMB_RIGHT, 7.0, 32.0, 1),
];

const STAGE_3: &[PartSpec] = &[
    branch(BOUGH_LEFT, 5.0, 35.0, 2),
    branch(BOUGH_RIGHT, 5.0, 35.0, 2),
    branch(LEADER, 6.0, 32.0, 2),
];

const STAGE_4: &[PartSpec] = &[
    branch(SPRIG_LEFT, 3.0, 37.0, 3),
    branch(SPRIG_RIGHT, 3.0, 37.0, 3),
    branch(CROWN_LEFT, 4.0, 37.0, 3),
    branch(CROWN_RIGHT, 4.0, 37.0, 3),
];

const STAGE_5: &[PartSpec] = &[
    round_leaf(65.0, 95.0, 8.0, Tint::Canopy, 0.7),
    round_leaf(235.0, 95.0, 8.0, Tint::Canopy, 0.7),
    round_leaf(120.0, 65.0, 8.0, Tint::Canopy, 0.7),
    round_leaf(180.0, 65.0, 8.0, Tint::Canopy, 0.7),
];

const STAGE_6: &[PartSpec] = &[
    branch(TWIG_LEFT, 2.0, 40.0, 4),
    branch(TWIG_RIGHT, 2.0, 40.0, 4),
    oval_leaf(105.0, 40.0),
    oval_leaf(195.0, 40.0),
    oval_leaf(80.0, 120.0),
    oval_leaf(220.0, 120.0),
    oval_leaf(130.0, 55.0),
    oval_leaf(170.0, 55.0),
];

const STAGE_7: &[PartSpec] = &[
    round_leaf(95.0, 85.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(205.0, 85.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(110.0, 100.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(190.0, 100.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(140.0, 75.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(160.0, 75.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(150.0, 60.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(125.0, 90.0, 9.0, Tint::CanopyDense, 0.8),
    round_leaf(175.0, 90.0, 9.0, Tint::CanopyDense, 0.8),
];

const STAGE_8: &[PartSpec] = &[
    PartSpec::Glow { center: (150.0, 120.0), radius: 80.0 },
    PartSpec::Blossom { center: (100.0, 50.0) },
    PartSpec::Blossom { center: (200.0, 50.0) },
    PartSpec::Blossom { center: (150.0, 45.0) },
    PartSpec::Blossom { center: (125.0, 60.0) },
    PartSpec::Blossom { center: (175.0, 60.0) },
];

const STAGE_9: &[PartSpec] = &[
    PartSpec::Fruit { center: (90.0, 110.0) },
    PartSpec::Fruit { center: (210.0, 110.0) },
    PartSpec::Fruit { center: (115.0, 85.0) },
    PartSpec::Fruit { center: (185.0, 85.0) },
    PartSpec::Fruit { center: (145.0, 95.0) },
    PartSpec::Fruit { center: (155.0, 95.0) },
];

const STAGE_10: &[PartSpec] = &[
    round_leaf(75.0, 105.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(225.0, 105.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(100.0, 75.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(200.0, 75.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(135.0, 85.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(165.0, 85.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(150.0, 70.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(120.0, 95.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(180.0, 95.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(110.0, 110.0, 8.0, Tint::CanopyDense, 0.85),
    round_leaf(190.0, 110.0, 8.0, Tint::CanopyDense, 0.85),
    PartSpec::Bird { path: BIRD_LEFT },
    PartSpec::Bird { path: BIRD_RIGHT },
];

/// Parts introduced at each stage, index 0 = stage 1.
const STAGES: [&[PartSpec]; MAX_STAGE as usize] = [
    STAGE_1, STAGE_2, STAGE_3, STAGE_4, STAGE_5, STAGE_6, STAGE_7, STAGE_8, STAGE_9, STAGE_10,
];

fn stage_parts(stage: u8) -> &'static [PartSpec] {
    STAGES
        .get(usize::from(stage).saturating_sub(1))
        .copied()
        .unwrap_or_default()
}

// ── Element building ─────────────────────────────────────────────────

fn tint_color(tint: Tint, palette: &Palette) -> Color {
    match tint {
        Tint::Bark(lightness) => palette.bark(lightness),
        Tint::Canopy => palette.canopy,
        Tint::CanopyDense => palette.canopy_dense,
        Tint::Gold => palette.gold,
    }
}

fn kind_name(part: &PartSpec) -> &'static str {
    match part {
        PartSpec::Branch { .. } => "branch",
        PartSpec::Leaf { .. } => "leaf",
        PartSpec::Glow { .. } => "glow",
        PartSpec::Blossom { .. } => "blossom",
        PartSpec::Fruit { .. } => "fruit",
        PartSpec::Bird { .. } => "bird",
    }
}

/// Build one part. `leaf_index` counts leaf-like parts within the stage
/// and staggers their entrance.
fn build_part(
    stage: u8,
    index: usize,
    leaf_index: usize,
    part: &PartSpec,
    palette: &Palette,
) -> SceneElement {
    let tag = format!("tree/stage{stage}/{}-{index}", kind_name(part));
    let leaf_delay = LEAF_BASE_DELAY + leaf_index as f32 * LEAF_STAGGER;
    let leaf_entrance = [
        Animation::grow_in(LEAF_GROW_SECS).with_delay(leaf_delay),
        Animation::fade_in(1.0, LEAF_GROW_SECS).with_delay(leaf_delay),
    ];

    let element = match *part {
        PartSpec::Branch { path, width, tint, order } => {
            let duration = BRANCH_BASE_SECS + f32::from(order) * BRANCH_ORDER_SECS;
            SceneElement::new(tag, SceneLayer::Tree, Shape::stroke(path, width))
                .with_paint(Paint::solid(tint_color(tint, palette)))
                .with_animation(Animation::draw_path(duration).with_easing(Easing::EaseInOut))
                .with_animation(Animation::fade_in(1.0, duration))
        }
        PartSpec::Leaf { center, size, tint, opacity } => {
            let shape = match size {
                LeafSize::Round(radius) => Shape::Circle { radius },
                LeafSize::Oval(rx, ry) => Shape::Ellipse { rx, ry },
            };
            SceneElement::new(tag, SceneLayer::Tree, shape)
                .with_pos(Vec2::from(center))
                .with_paint(Paint::solid(tint_color(tint, palette)))
                .with_opacity(opacity)
                .with_animations(leaf_entrance)
        }
        PartSpec::Glow { center, radius } => {
            SceneElement::new(tag, SceneLayer::Halo, Shape::Circle { radius })
                .with_pos(Vec2::from(center))
                .with_paint(Paint::solid(palette.gold.with_alpha(0.2)))
                .with_animation(Animation::pulse(AnimatedProperty::Opacity, 0.3, 0.6, GLOW_PULSE_SECS))
        }
        PartSpec::Blossom { center } => {
            let parts = vec![
                ShapePart::new(Vec2::ZERO, Shape::Circle { radius: 6.0 }, Paint::solid(palette.apple_red))
                    .with_opacity(0.9),
                ShapePart::new(Vec2::ZERO, Shape::Circle { radius: 2.0 }, Paint::solid(palette.gold)),
            ];
            SceneElement::new(tag, SceneLayer::Tree, Shape::Compound { parts })
                .with_pos(Vec2::from(center))
                .with_animations(leaf_entrance)
        }
        PartSpec::Fruit { center } => {
            let parts = vec![
                ShapePart::new(Vec2::ZERO, Shape::Circle { radius: 7.0 }, Paint::solid(palette.apple_red)),
                ShapePart::new(
                    Vec2::new(-1.0, -1.0),
                    Shape::Ellipse { rx: 2.0, ry: 3.0 },
                    Paint::solid(palette.apple_red_dark),
                ),
            ];
            SceneElement::new(tag, SceneLayer::Tree, Shape::Compound { parts })
                .with_pos(Vec2::from(center))
                .with_animations(leaf_entrance)
        }
        PartSpec::Bird { path } => SceneElement::new(tag, SceneLayer::Tree, Shape::fill_path(path))
            .with_paint(Paint::solid(tint_color(Tint::Gold, palette)))
            .with_animations(leaf_entrance),
    };
    element.with_space(Space::TreeCanvas)
}

fn is_leaf_like(part: &PartSpec) -> bool {
    !matches!(part, PartSpec::Branch { .. } | PartSpec::Glow { .. })
}

/// Append the parts of one stage to `scene`.
pub fn compose_stage(scene: &mut Scene, stage: u8, palette: &Palette) {
    let mut leaf_index = 0;
    for (index, part) in stage_parts(stage).iter().enumerate() {
        scene.spawn(build_part(stage, index, leaf_index, part, palette));
        if is_leaf_like(part) {
            leaf_index += 1;
        }
    }
}

/// The full tree for `level`: stages 1..=stage in order.
pub fn compose_tree(scene: &mut Scene, level: GrowthLevel, palette: &Palette) {
    for stage in MIN_STAGE..=level.stage() {
        compose_stage(scene, stage, palette);
    }
}

/// Stage prefix shared by every tag a stage produces.
pub fn stage_prefix(stage: u8) -> String {
    format!("tree/stage{stage}/")
}

/// Stage number encoded in a tree element tag.
pub fn stage_of(tag: &str) -> Option<u8> {
    tag.strip_prefix("tree/stage")?.split('/').next()?.parse().ok()
}

// ── Growth tracking ──────────────────────────────────────────────────

/// Tracks which stages have already been shown so that a level change
/// only animates the stages it introduces.
#[derive(Debug, Clone, Default)]
pub struct TreeGrowth {
    level: GrowthLevel,
    /// Highest stage whose entrance has already played; 0 before first mount.
    settled: u8,
}

impl TreeGrowth {
    pub fn new(level: i64) -> Self {
        Self {
            level: GrowthLevel::new(level),
            settled: 0,
        }
    }

    pub fn level(&self) -> GrowthLevel {
        self.level
    }

    /// Change the level. Returns the stages that will animate in on the next
    /// compose (empty when shrinking or unchanged).
    pub fn set_level(&mut self, level: i64) -> std::ops::RangeInclusive<u8> {
        let previous = self.level.stage();
        self.level = GrowthLevel::new(level);
        if self.level.stage() != previous {
            log::info!("tree stage {} -> {} (level {})", previous, self.level.stage(), level);
        }
        self.settled = self.settled.min(self.level.stage());
        (self.settled + 1)..=self.level.stage()
    }

    /// Compose the tree; stages already shown lose their entrance animations.
    /// Marks every drawn stage as settled.
    pub fn compose(&mut self, scene: &mut Scene, palette: &Palette) {
        let mut tree = Scene::new();
        compose_tree(&mut tree, self.level, palette);
        for element in tree.iter_mut() {
            if stage_of(&element.tag).is_some_and(|stage| stage <= self.settled) {
                element.settle();
            }
        }
        scene.extend_from(&tree);
        self.settled = self.level.stage();
    }

    /// Replay every entrance on the next compose (a remount).
    pub fn replay(&mut self) {
        self.settled = 0;
    }

    pub fn settled(&self) -> u8 {
        self.settled
    }
}
