//! Backdrop composer: sky, celestial bodies, clouds, precipitation,
//! seasonal decoration and ground.
//!
//! Every layer rule is evaluated independently on each composition:
//!
//! | Layer          | Visible when                                   |
//! |----------------|------------------------------------------------|
//! | Sky            | always (gradient by time of day)               |
//! | Sun            | dawn, day or dusk, and not cloudy              |
//! | Moon + stars   | night                                          |
//! | Clouds         | cloudy or rainy (darker fill when rainy)       |
//! | Rain / snow    | rainy / snowy, never both                      |
//! | Decoration     | spring flowers, autumn leaves, winter frost    |
//! | Ground         | always (color by season, grass in spring)      |
//!
//! All categories are closed enums, so every combination has a defined
//! rendering; sky and ground are never skipped.
//!
//! Random layout (star field, flake speeds, leaf lanes, grass heights) is
//! drawn from a per-mount layout seed, one ChaCha stream per effect, so a
//! recomposition after a category change puts every surviving effect back
//! where it was.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::api::config::{ContextProfile, SceneConfig};
use crate::components::element::SceneElement;
use crate::components::layer::SceneLayer;
use crate::components::paint::{Color, Paint, Palette};
use crate::components::shape::{PathCommand, Shape, ShapePart};
use crate::core::scene::Scene;
use crate::environment::categories::{Precipitation, Season, TimeOfDay, Weather};
use crate::environment::resolver::ResolvedEnvironment;
use crate::extensions::animation::{AnimatedProperty, Animation};
use crate::extensions::easing::Easing;
use crate::systems::particles::ParticleDescriptor;

// ── Layout constants ─────────────────────────────────────────────────

/// Ground band height in pixels.
pub const GROUND_HEIGHT: f32 = 96.0;
const SPRING_FLOWERS: usize = 8;
const AUTUMN_LEAVES: usize = 15;
const GRASS_BLADES: usize = 20;

const SKY_FADE_SECS: f32 = 2.0;
const BODY_RISE_SECS: f32 = 2.0;
const SUN_PULSE_SECS: f32 = 4.0;
const RAIN_FALL_SECS: f32 = 1.0;
const FROST_FADE_SECS: f32 = 3.0;

/// Backdrop cloud: three overlapping ellipses `(cx, cy, rx, ry)` in a 120 × 50 box.
const CLOUD_ELLIPSES: [(f32, f32, f32, f32); 3] =
    [(30.0, 30.0, 25.0, 20.0), (60.0, 25.0, 30.0, 22.0), (85.0, 30.0, 25.0, 18.0)];

/// ChaCha stream per randomized effect. Streams never overlap, so adding
/// or removing one effect cannot shift another's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub(crate) enum LayoutStream {
    Stars = 1,
    Snow = 2,
    Leaves = 3,
    Grass = 4,
    WidgetStars = 5,
    WidgetSnow = 6,
    WidgetPetals = 7,
    WidgetLeaves = 8,
}

/// Fresh generator for one effect. Equal `(seed, stream)` pairs replay the
/// same sequence.
pub(crate) fn layout_rng(seed: u64, stream: LayoutStream) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream as u64);
    rng
}

// ── Layer rules ──────────────────────────────────────────────────────

/// Sun placement as CSS-style offsets from the top and right edges (percent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPlacement {
    pub top_pct: f32,
    pub right_pct: f32,
}

impl SunPlacement {
    /// Anchor in viewport percent (left/top).
    pub fn anchor(self) -> Vec2 {
        Vec2::new(100.0 - self.right_pct, self.top_pct)
    }
}

/// Dawn sits low on the left, dusk low on the right, day high.
pub fn sun_placement(time_of_day: TimeOfDay) -> SunPlacement {
    match time_of_day {
        TimeOfDay::Dawn => SunPlacement { top_pct: 20.0, right_pct: 70.0 },
        TimeOfDay::Dusk => SunPlacement { top_pct: 20.0, right_pct: 10.0 },
        TimeOfDay::Day | TimeOfDay::Night => SunPlacement { top_pct: 10.0, right_pct: 15.0 },
    }
}

pub fn sun_visible(env: &ResolvedEnvironment) -> bool {
    env.time_of_day != TimeOfDay::Night && env.weather != Weather::Cloudy
}

pub fn moon_visible(env: &ResolvedEnvironment) -> bool {
    env.time_of_day == TimeOfDay::Night
}

/// The one seasonal decoration set, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalDecoration {
    Flowers,
    FallingLeaves,
    Frost,
}

pub fn seasonal_decoration(season: Season) -> Option<SeasonalDecoration> {
    match season {
        Season::Spring => Some(SeasonalDecoration::Flowers),
        Season::Autumn => Some(SeasonalDecoration::FallingLeaves),
        Season::Winter => Some(SeasonalDecoration::Frost),
        Season::Summer => None,
    }
}

pub fn sky_paint(time_of_day: TimeOfDay, palette: &Palette) -> Paint {
    let stops = match time_of_day {
        TimeOfDay::Dawn => palette.sky_dawn,
        TimeOfDay::Day => palette.sky_day,
        TimeOfDay::Dusk => palette.sky_dusk,
        TimeOfDay::Night => palette.sky_night,
    };
    Paint::vertical(stops)
}

pub fn ground_color(season: Season, palette: &Palette) -> Color {
    match season {
        Season::Spring => palette.ground_spring,
        Season::Summer => palette.ground_summer,
        Season::Autumn => palette.ground_autumn,
        Season::Winter => palette.ground_winter,
    }
}

// ── Shared shape helpers ─────────────────────────────────────────────

/// Cloud made of overlapping ellipses, all in one fill.
pub(crate) fn cloud_shape(ellipses: &[(f32, f32, f32, f32)], fill: Color, opacity: f32) -> Shape {
    Shape::Compound {
        parts: ellipses
            .iter()
            .map(|&(cx, cy, rx, ry)| {
                ShapePart::new(Vec2::new(cx, cy), Shape::Ellipse { rx, ry }, Paint::solid(fill))
                    .with_opacity(opacity)
            })
            .collect(),
    }
}

/// Four-lobed leaf outline in a `size` × `size` box.
pub(crate) fn leaf_path(size: f32) -> Vec<PathCommand> {
    let k = size / 15.0;
    vec![
        PathCommand::move_to(7.5 * k, 0.0),
        PathCommand::quad_to(10.0 * k, 5.0 * k, 15.0 * k, 7.5 * k),
        PathCommand::quad_to(10.0 * k, 10.0 * k, 7.5 * k, 15.0 * k),
        PathCommand::quad_to(5.0 * k, 10.0 * k, 0.0, 7.5 * k),
        PathCommand::quad_to(5.0 * k, 5.0 * k, 7.5 * k, 0.0),
    ]
}

/// Endless linear fall over `distance` percent of the viewport height.
pub(crate) fn fall(distance: f32, duration: f32, delay: f32) -> Animation {
    Animation::tween(AnimatedProperty::TranslateY, 0.0, distance, duration)
        .with_easing(Easing::Linear)
        .with_delay(delay)
        .looping()
}

/// Out-and-back lateral sway sharing a fall's timing.
pub(crate) fn sway(amplitude: f32, duration: f32, delay: f32) -> Animation {
    Animation::keyframes(AnimatedProperty::DriftX, [0.0, amplitude, 0.0], duration)
        .with_easing(Easing::Linear)
        .with_delay(delay)
        .looping()
}

pub(crate) fn spin(keyframes: &[f32], duration: f32, delay: f32) -> Animation {
    Animation::keyframes(AnimatedProperty::Rotation, keyframes.to_vec(), duration)
        .with_easing(Easing::Linear)
        .with_delay(delay)
        .looping()
}

// ── Composition ──────────────────────────────────────────────────────

/// Compose the full backdrop for `env` into `scene`.
///
/// `particles` must be the set generated for `env.weather`; it is ignored
/// unless that weather precipitates. `layout_seed` fixes every other random
/// placement; keep it for the lifetime of a mount.
pub fn compose_backdrop(
    scene: &mut Scene,
    env: &ResolvedEnvironment,
    particles: &[ParticleDescriptor],
    config: &SceneConfig,
    layout_seed: u64,
) {
    let palette = &config.palette;
    let profile = &config.backdrop;

    sky(scene, env.time_of_day, palette);

    if sun_visible(env) {
        sun(scene, env.time_of_day, palette);
    }
    if moon_visible(env) {
        moon_and_stars(scene, profile, palette, &mut layout_rng(layout_seed, LayoutStream::Stars));
    }
    if env.weather.has_clouds() {
        clouds(scene, env.weather, profile, palette);
    }
    match env.weather.precipitation() {
        Some(Precipitation::Rain) => rain(scene, particles, palette),
        Some(Precipitation::Snow) => {
            snow(scene, particles, palette, &mut layout_rng(layout_seed, LayoutStream::Snow))
        }
        None => {}
    }
    match seasonal_decoration(env.season) {
        Some(SeasonalDecoration::Flowers) => spring_flowers(scene, palette),
        Some(SeasonalDecoration::FallingLeaves) => {
            autumn_leaves(scene, palette, &mut layout_rng(layout_seed, LayoutStream::Leaves))
        }
        Some(SeasonalDecoration::Frost) => frost(scene, palette),
        None => {}
    }
    ground(scene, env.season, palette, &mut layout_rng(layout_seed, LayoutStream::Grass));
}

fn sky(scene: &mut Scene, time_of_day: TimeOfDay, palette: &Palette) {
    scene.spawn(
        SceneElement::new("sky", SceneLayer::Sky, Shape::FullBleed)
            .with_paint(sky_paint(time_of_day, palette))
            .with_animation(Animation::fade_in(1.0, SKY_FADE_SECS)),
    );
}

fn sun(scene: &mut Scene, time_of_day: TimeOfDay, palette: &Palette) {
    scene.spawn(
        SceneElement::new("sun", SceneLayer::Celestial, Shape::Circle { radius: 48.0 })
            .with_pos(sun_placement(time_of_day).anchor())
            .with_paint(Paint::solid(palette.sun_glow))
            .with_opacity(0.8)
            .with_animation(Animation::grow_in(BODY_RISE_SECS))
            .with_animation(Animation::fade_in(1.0, BODY_RISE_SECS))
            .with_animation(
                Animation::pulse(AnimatedProperty::Scale, 1.0, 1.1, SUN_PULSE_SECS)
                    .with_delay(BODY_RISE_SECS),
            ),
    );
}

fn moon_and_stars<R: Rng + ?Sized>(
    scene: &mut Scene,
    profile: &ContextProfile,
    palette: &Palette,
    rng: &mut R,
) {
    scene.spawn(
        SceneElement::new("moon", SceneLayer::Celestial, Shape::Circle { radius: 32.0 })
            .with_pos(Vec2::new(80.0, 15.0))
            .with_paint(Paint::solid(palette.moon_glow))
            .with_opacity(0.9)
            .with_animation(Animation::grow_in(BODY_RISE_SECS))
            .with_animation(Animation::fade_in(1.0, BODY_RISE_SECS)),
    );

    for i in 0..profile.stars {
        let pos = Vec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..60.0));
        let duration = 2.0 + rng.gen_range(0.0..3.0);
        let delay = rng.gen_range(0.0..2.0);
        scene.spawn(
            SceneElement::new(format!("star-{i}"), SceneLayer::Celestial, Shape::Circle { radius: 2.0 })
                .with_pos(pos)
                .with_paint(Paint::solid(palette.star))
                .with_animation(
                    Animation::pulse(AnimatedProperty::Opacity, 0.2, 1.0, duration).with_delay(delay),
                ),
        );
    }
}

fn clouds(scene: &mut Scene, weather: Weather, profile: &ContextProfile, palette: &Palette) {
    let fill = if weather == Weather::Rainy {
        palette.cloud_dark
    } else {
        palette.cloud_light
    };

    for i in 0..profile.clouds {
        let lane = i as f32;
        scene.spawn(
            SceneElement::new(format!("cloud-{i}"), SceneLayer::Clouds, cloud_shape(&CLOUD_ELLIPSES, fill, 0.8))
                .with_pos(Vec2::new(-10.0, 10.0 + lane * 15.0))
                .with_animation(
                    Animation::tween(AnimatedProperty::TranslateX, 0.0, 110.0, 30.0 + lane * 10.0)
                        .with_easing(Easing::Linear)
                        .with_delay(lane * 5.0)
                        .looping(),
                ),
        );
    }
}

fn rain(scene: &mut Scene, particles: &[ParticleDescriptor], palette: &Palette) {
    for p in particles {
        scene.spawn(
            SceneElement::new(
                format!("rain-{}", p.id),
                SceneLayer::Precipitation,
                Shape::Rect { width: 2.0, height: 32.0 },
            )
            .with_pos(Vec2::new(p.x, -10.0))
            .with_paint(Paint::solid(palette.rain_drop))
            .with_opacity(0.6)
            .with_animation(fall(110.0, RAIN_FALL_SECS, p.delay)),
        );
    }
}

fn snow<R: Rng + ?Sized>(
    scene: &mut Scene,
    particles: &[ParticleDescriptor],
    palette: &Palette,
    rng: &mut R,
) {
    for p in particles {
        let duration = 8.0 + rng.gen_range(0.0..4.0);
        scene.spawn(
            SceneElement::new(format!("snow-{}", p.id), SceneLayer::Precipitation, Shape::Circle { radius: 4.0 })
                .with_pos(Vec2::new(p.x, -5.0))
                .with_paint(Paint::solid(palette.snow_flake))
                .with_animations([
                    fall(105.0, duration, p.delay),
                    sway((p.id as f32).sin() * 30.0, duration, p.delay),
                    spin(&[0.0, 360.0], duration, p.delay),
                ]),
        );
    }
}

fn spring_flowers(scene: &mut Scene, palette: &Palette) {
    let petal = Paint::solid(palette.spring_flower);
    let petals = [(10.0, 8.0), (6.0, 10.0), (14.0, 10.0), (8.0, 13.0), (12.0, 13.0)];

    for i in 0..SPRING_FLOWERS {
        let mut parts: Vec<ShapePart> = petals
            .iter()
            .map(|&(x, y)| ShapePart::new(Vec2::new(x, y), Shape::Circle { radius: 3.0 }, petal.clone()))
            .collect();
        parts.push(ShapePart::new(
            Vec2::new(10.0, 11.0),
            Shape::Circle { radius: 2.0 },
            Paint::solid(palette.sun_glow),
        ));
        parts.push(ShapePart::new(
            Vec2::ZERO,
            Shape::stroke(&[PathCommand::move_to(10.0, 13.0), PathCommand::line_to(10.0, 22.0)], 2.0),
            Paint::solid(palette.spring_green),
        ));

        let stagger = i as f32 * 0.2;
        scene.spawn(
            SceneElement::new(format!("flower-{i}"), SceneLayer::Seasonal, Shape::Compound { parts })
                .with_pos(Vec2::new(10.0 + i as f32 * 12.0, 100.0))
                .with_offset(Vec2::new(-10.0, -GROUND_HEIGHT - 25.0))
                .with_animation(Animation::grow_in(1.0).with_delay(stagger))
                .with_animation(Animation::fade_in(1.0, 1.0).with_delay(stagger)),
        );
    }
}

fn autumn_leaves<R: Rng + ?Sized>(scene: &mut Scene, palette: &Palette, rng: &mut R) {
    let outline = leaf_path(15.0);
    for i in 0..AUTUMN_LEAVES {
        let fill = if i % 2 == 0 { palette.autumn_leaf } else { palette.autumn_leaf_dark };
        let x = rng.gen_range(0.0..100.0);
        let duration = 10.0 + rng.gen_range(0.0..5.0);
        let delay = i as f32 * 0.8;
        scene.spawn(
            SceneElement::new(format!("leaf-{i}"), SceneLayer::Seasonal, Shape::fill_path(&outline))
                .with_pos(Vec2::new(x, -5.0))
                .with_paint(Paint::solid(fill))
                .with_animations([
                    fall(105.0, duration, delay),
                    sway((i as f32).sin() * 50.0, duration, delay),
                    spin(&[0.0, 360.0, 720.0], duration, delay),
                ]),
        );
    }
}

fn frost(scene: &mut Scene, palette: &Palette) {
    scene.spawn(
        SceneElement::new("frost", SceneLayer::Seasonal, Shape::FullBleed)
            .with_paint(Paint::vertical([
                Color::TRANSPARENT,
                palette.winter_frost.with_alpha(0.1),
                Color::TRANSPARENT,
            ]))
            .with_animation(Animation::fade_in(1.0, FROST_FADE_SECS)),
    );
}

fn ground<R: Rng + ?Sized>(scene: &mut Scene, season: Season, palette: &Palette, rng: &mut R) {
    scene.spawn(
        SceneElement::new("ground", SceneLayer::Ground, Shape::Band { height: GROUND_HEIGHT })
            .with_pos(Vec2::new(0.0, 100.0))
            .with_paint(Paint::solid(ground_color(season, palette))),
    );

    if season != Season::Spring {
        return;
    }
    for i in 0..GRASS_BLADES {
        let height = 10.0 + rng.gen_range(0.0..20.0);
        scene.spawn(
            SceneElement::new(format!("grass-{i}"), SceneLayer::Ground, Shape::Rect { width: 4.0, height })
                .with_pos(Vec2::new(i as f32 * 5.0, 100.0))
                .with_offset(Vec2::new(0.0, -height))
                .with_paint(Paint::solid(palette.spring_green))
                .with_animation(
                    Animation::pulse(AnimatedProperty::ScaleY, 1.0, 1.1, 2.0).with_delay(i as f32 * 0.1),
                ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::particles::{generate, DensityPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn env(time_of_day: TimeOfDay, weather: Weather, season: Season) -> ResolvedEnvironment {
        ResolvedEnvironment { time_of_day, weather, season }
    }

    fn compose(env: ResolvedEnvironment) -> Scene {
        compose_with_seed(env, 11)
    }

    fn compose_with_seed(env: ResolvedEnvironment, layout_seed: u64) -> Scene {
        let config = SceneConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let particles = generate(config.backdrop.density.policy_for(env.weather), &mut rng);
        let mut scene = Scene::new();
        compose_backdrop(&mut scene, &env, &particles, &config, layout_seed);
        scene
    }

    fn positions(scene: &Scene, prefix: &str) -> Vec<Vec2> {
        scene.find_all_by_prefix(prefix).iter().map(|e| e.pos).collect()
    }

    fn count(scene: &Scene, prefix: &str) -> usize {
        scene.find_all_by_prefix(prefix).len()
    }

    #[test]
    fn sky_and_ground_always_present() {
        for &t in TimeOfDay::ALL {
            for &w in Weather::ALL {
                for &s in Season::ALL {
                    let scene = compose(env(t, w, s));
                    assert!(scene.find_by_tag("sky").is_some(), "{t}/{w}/{s}");
                    assert!(scene.find_by_tag("ground").is_some(), "{t}/{w}/{s}");
                }
            }
        }
    }

    #[test]
    fn dawn_sun_sits_left() {
        let scene = compose(env(TimeOfDay::Dawn, Weather::Sunny, Season::Summer));
        let sun = scene.find_by_tag("sun").expect("sun at dawn");
        assert_eq!(sun_placement(TimeOfDay::Dawn).right_pct, 70.0);
        assert_eq!(sun.pos, Vec2::new(30.0, 20.0));
        assert!(scene.find_by_tag("moon").is_none());
        assert_eq!(count(&scene, "star-"), 0);
    }

    #[test]
    fn sun_placement_by_time() {
        assert_eq!(sun_placement(TimeOfDay::Dusk).right_pct, 10.0);
        assert_eq!(sun_placement(TimeOfDay::Day).top_pct, 10.0);
        assert_eq!(sun_placement(TimeOfDay::Day).right_pct, 15.0);
    }

    #[test]
    fn clouds_hide_the_sun_but_rain_does_not() {
        let cloudy = compose(env(TimeOfDay::Day, Weather::Cloudy, Season::Summer));
        assert!(cloudy.find_by_tag("sun").is_none());
        let rainy = compose(env(TimeOfDay::Day, Weather::Rainy, Season::Summer));
        assert!(rainy.find_by_tag("sun").is_some());
    }

    #[test]
    fn night_shows_moon_and_thirty_stars() {
        let scene = compose(env(TimeOfDay::Night, Weather::Sunny, Season::Summer));
        assert!(scene.find_by_tag("moon").is_some());
        assert!(scene.find_by_tag("sun").is_none());
        assert_eq!(count(&scene, "star-"), 30);
        for star in scene.find_all_by_prefix("star-") {
            assert!(star.pos.y < 60.0);
            assert!(star.is_continuous());
        }
    }

    #[test]
    fn rain_and_snow_are_exclusive() {
        let rainy = compose(env(TimeOfDay::Day, Weather::Rainy, Season::Summer));
        assert_eq!(count(&rainy, "rain-"), 50);
        assert_eq!(count(&rainy, "snow-"), 0);

        let snowy = compose(env(TimeOfDay::Day, Weather::Snowy, Season::Summer));
        assert_eq!(count(&snowy, "snow-"), 30);
        assert_eq!(count(&snowy, "rain-"), 0);

        let cloudy = compose(env(TimeOfDay::Day, Weather::Cloudy, Season::Summer));
        assert!(!cloudy.has_layer(SceneLayer::Precipitation));
        assert_eq!(count(&cloudy, "cloud-"), 5);
    }

    #[test]
    fn rain_clouds_are_darker() {
        let palette = Palette::default();
        let fill_of = |scene: &Scene| match &scene.find_by_tag("cloud-0").unwrap().shape {
            Shape::Compound { parts } => parts[0].paint.color_at(0.0),
            other => panic!("unexpected cloud shape {other:?}"),
        };
        let rainy = compose(env(TimeOfDay::Day, Weather::Rainy, Season::Summer));
        let cloudy = compose(env(TimeOfDay::Day, Weather::Cloudy, Season::Summer));
        assert_eq!(fill_of(&rainy), palette.cloud_dark);
        assert_eq!(fill_of(&cloudy), palette.cloud_light);
    }

    #[test]
    fn clouds_do_not_move_in_lockstep() {
        let scene = compose(env(TimeOfDay::Day, Weather::Cloudy, Season::Summer));
        let timings: Vec<(f32, f32)> = scene
            .find_all_by_prefix("cloud-")
            .iter()
            .map(|c| (c.animations[0].duration, c.animations[0].delay))
            .collect();
        for (i, a) in timings.iter().enumerate() {
            for b in &timings[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn rain_uses_descriptor_positions_and_delays() {
        let config = SceneConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let particles = generate(config.backdrop.density.rain, &mut rng);
        let mut scene = Scene::new();
        compose_backdrop(
            &mut scene,
            &env(TimeOfDay::Day, Weather::Rainy, Season::Summer),
            &particles,
            &config,
            3,
        );
        for p in &particles {
            let drop = scene.find_by_tag(&format!("rain-{}", p.id)).unwrap();
            assert_eq!(drop.pos.x, p.x);
            assert_eq!(drop.animations[0].delay, p.delay);
            assert_eq!(drop.animations[0].duration, RAIN_FALL_SECS);
        }
    }

    #[test]
    fn layout_survives_other_category_changes() {
        let clear = compose_with_seed(env(TimeOfDay::Night, Weather::Sunny, Season::Autumn), 7);
        let rainy = compose_with_seed(env(TimeOfDay::Night, Weather::Rainy, Season::Autumn), 7);
        assert_eq!(positions(&clear, "star-"), positions(&rainy, "star-"));
        assert_eq!(positions(&clear, "leaf-"), positions(&rainy, "leaf-"));
        for (a, b) in clear.find_all_by_prefix("star-").iter().zip(rainy.find_all_by_prefix("star-")) {
            assert_eq!(a.animations, b.animations);
        }

        let spring_day = compose_with_seed(env(TimeOfDay::Day, Weather::Sunny, Season::Spring), 7);
        let spring_snow = compose_with_seed(env(TimeOfDay::Day, Weather::Snowy, Season::Spring), 7);
        let heights = |scene: &Scene| -> Vec<Shape> {
            scene.find_all_by_prefix("grass-").iter().map(|g| g.shape.clone()).collect()
        };
        assert_eq!(heights(&spring_day), heights(&spring_snow));
    }

    #[test]
    fn layout_seed_moves_the_star_field() {
        let night = env(TimeOfDay::Night, Weather::Sunny, Season::Summer);
        assert_ne!(
            positions(&compose_with_seed(night, 1), "star-"),
            positions(&compose_with_seed(night, 2), "star-")
        );
    }

    #[test]
    fn winter_snow_scene() {
        let scene = compose(env(TimeOfDay::Day, Weather::Snowy, Season::Winter));
        let ground = scene.find_by_tag("ground").unwrap();
        assert_eq!(ground.paint, Paint::solid(Palette::default().ground_winter));
        assert!(scene.find_by_tag("frost").is_some());
        assert_eq!(count(&scene, "snow-"), 30);
        assert_eq!(count(&scene, "flower-"), 0);
        assert_eq!(count(&scene, "leaf-"), 0);
    }

    #[test]
    fn seasonal_decoration_sets() {
        let spring = compose(env(TimeOfDay::Day, Weather::Sunny, Season::Spring));
        assert_eq!(count(&spring, "flower-"), SPRING_FLOWERS);
        assert_eq!(count(&spring, "grass-"), GRASS_BLADES);
        assert!(spring.find_all_by_prefix("flower-").iter().all(|f| !f.is_continuous()));

        let autumn = compose(env(TimeOfDay::Day, Weather::Sunny, Season::Autumn));
        assert_eq!(count(&autumn, "leaf-"), AUTUMN_LEAVES);
        assert!(autumn.find_all_by_prefix("leaf-").iter().all(|l| l.is_continuous()));
        assert_eq!(count(&autumn, "grass-"), 0);

        let summer = compose(env(TimeOfDay::Day, Weather::Sunny, Season::Summer));
        assert!(!summer.has_layer(SceneLayer::Seasonal));
    }

    #[test]
    fn ground_colors_are_distinct() {
        let palette = Palette::default();
        let colors: Vec<Color> = Season::ALL.iter().map(|&s| ground_color(s, &palette)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_weather_string_renders_default_scene() {
        let weather = Weather::parse_or_default("sandstorm");
        let time = TimeOfDay::parse_or_default("");
        let scene = compose(env(time, weather, Season::Summer));
        assert!(!scene.has_layer(SceneLayer::Precipitation));
        assert!(!scene.has_layer(SceneLayer::Clouds));
        let sky = scene.find_by_tag("sky").unwrap();
        assert_eq!(sky.paint, sky_paint(TimeOfDay::Day, &Palette::default()));
    }

    #[test]
    fn density_is_configurable() {
        let mut config = SceneConfig::default();
        config.backdrop.density = DensityPolicy::widget();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let particles = generate(config.backdrop.density.policy_for(Weather::Rainy), &mut rng);
        assert_eq!(particles.len(), 15);
    }
}
