use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::api::config::SceneConfig;
use crate::api::types::{ActionResponse, UserProgress};
use crate::bridge::protocol::SceneSnapshot;
use crate::core::clock::{Clock, SystemClock};
use crate::core::scene::Scene;
use crate::core::time::IntervalTimer;
use crate::environment::resolver::{EnvironmentOverrides, EnvironmentResolver, ResolvedEnvironment};
use crate::systems::background::compose_backdrop;
use crate::systems::overlay::{compose_tree_labels, OverlayPanel};
use crate::systems::particles::ParticleField;
use crate::systems::tree::{TreeGrowth, TreeStatus};
use crate::systems::widget::WeatherWidget;

/// One full-viewport scene: the environment backdrop, the growth tree on
/// top of it and the overlay panel.
///
/// Environment and level are independent inputs. A change to either only
/// recomposes its own part; the other part keeps its elements and their
/// animation state.
pub struct SceneEnvironment<C: Clock = SystemClock, R: Rng = ChaCha8Rng> {
    config: SceneConfig,
    resolver: EnvironmentResolver<C>,
    rng: R,
    overrides: EnvironmentOverrides,
    env: ResolvedEnvironment,
    particles: ParticleField,
    /// Card precipitation, kept apart from the backdrop's denser set.
    widget_particles: ParticleField,
    /// Fixes star, flake, leaf and grass layout for one mount.
    layout_seed: u64,
    growth: TreeGrowth,
    progress: UserProgress,
    reresolve: Option<IntervalTimer>,
    backdrop: Scene,
    tree: Scene,
    frame: Scene,
    overlay: OverlayPanel,
    /// Seconds since the last mount.
    elapsed: f32,
    mounted: bool,
}

impl SceneEnvironment<SystemClock, ChaCha8Rng> {
    /// Wall clock, RNG seeded from `config.seed` or entropy.
    pub fn new(config: SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_parts(config, SystemClock, rng)
    }
}

impl<C: Clock, R: Rng> SceneEnvironment<C, R> {
    pub fn with_parts(config: SceneConfig, clock: C, rng: R) -> Self {
        let reresolve = config
            .reresolve_interval_secs
            .filter(|secs| *secs > 0.0)
            .map(IntervalTimer::new);
        let progress = UserProgress::default();
        let env = ResolvedEnvironment::default();
        Self {
            growth: TreeGrowth::new(progress.level),
            overlay: OverlayPanel::new(&env),
            config,
            resolver: EnvironmentResolver::new(clock),
            rng,
            overrides: EnvironmentOverrides::default(),
            env,
            particles: ParticleField::new(),
            widget_particles: ParticleField::new(),
            layout_seed: 0,
            progress,
            reresolve,
            backdrop: Scene::new(),
            tree: Scene::new(),
            frame: Scene::new(),
            elapsed: 0.0,
            mounted: false,
        }
    }

    // -- Lifecycle --

    /// Resolve, draw fresh particles and layout and compose everything.
    /// Every entrance animation plays again.
    pub fn mount(&mut self) {
        self.env = self.resolver.resolve(&self.overrides);
        self.particles
            .regenerate(self.env.weather, &self.config.backdrop.density, &mut self.rng);
        self.widget_particles.clear();
        self.layout_seed = self.rng.gen();
        self.growth.replay();
        self.backdrop.clear();
        self.tree.clear();
        if let Some(timer) = self.reresolve.as_mut() {
            timer.reset();
        }
        self.elapsed = 0.0;
        self.mounted = true;

        self.recompose_backdrop();
        self.recompose_tree();
        self.assemble();
        log::info!(
            "scene mounted: {} / {} / {}, tree stage {}",
            self.env.time_of_day,
            self.env.weather,
            self.env.season,
            self.growth.level().stage()
        );
    }

    /// Drop every generated element and particle set.
    pub fn unmount(&mut self) {
        self.particles.clear();
        self.widget_particles.clear();
        self.backdrop.clear();
        self.tree.clear();
        self.frame.clear();
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -- Inputs --

    /// Replace the manual overrides. Re-resolves immediately.
    /// Returns whether the backdrop changed.
    pub fn set_overrides(&mut self, overrides: EnvironmentOverrides) -> bool {
        if overrides == self.overrides {
            return false;
        }
        self.overrides = overrides;
        self.refresh_environment()
    }

    pub fn overrides(&self) -> &EnvironmentOverrides {
        &self.overrides
    }

    /// Feed a new progression level to the tree.
    /// Returns false when the level was already current.
    pub fn set_level(&mut self, level: i64) -> bool {
        if level == self.growth.level().raw() {
            return false;
        }
        self.progress.level = level;
        let revealed = self.growth.set_level(level);
        log::debug!("level {level}: revealing stages {revealed:?}");
        if self.mounted {
            self.recompose_tree();
            self.assemble();
        }
        true
    }

    /// Replace the user record. Returns whether anything in it changed.
    pub fn set_progress(&mut self, progress: UserProgress) -> bool {
        let level = progress.level;
        let changed = progress != self.progress;
        self.progress = progress;
        self.set_level(level) || changed
    }

    /// Fold a completed eco action into the user record.
    pub fn apply_action(&mut self, response: &ActionResponse) -> bool {
        let mut progress = self.progress.clone();
        progress.apply(response);
        self.set_progress(progress)
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    /// Advance the mount clock. Re-reads the wall clock on the configured
    /// cadence; returns whether the backdrop changed.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.mounted {
            return false;
        }
        self.elapsed += dt.max(0.0);
        let due = self
            .reresolve
            .as_mut()
            .is_some_and(|timer| timer.accumulate(dt) > 0);
        due && self.refresh_environment()
    }

    /// Resolve again and recompose the backdrop if any category moved.
    pub fn refresh_environment(&mut self) -> bool {
        let env = self.resolver.resolve(&self.overrides);
        if env == self.env {
            return false;
        }
        log::info!(
            "environment changed: {} / {} / {} -> {} / {} / {}",
            self.env.time_of_day,
            self.env.weather,
            self.env.season,
            env.time_of_day,
            env.weather,
            env.season
        );
        self.env = env;
        if !self.mounted {
            return false;
        }
        self.particles
            .sync(env.weather, &self.config.backdrop.density, &mut self.rng);
        self.recompose_backdrop();
        self.assemble();
        true
    }

    // -- Composition --

    // Elements already on screen keep their start time; new ones start now.

    fn recompose_backdrop(&mut self) {
        let previous = std::mem::take(&mut self.backdrop);
        compose_backdrop(
            &mut self.backdrop,
            &self.env,
            self.particles.descriptors(),
            &self.config,
            self.layout_seed,
        );
        self.backdrop.carry_start_times(&previous, self.elapsed);
        self.overlay = OverlayPanel::new(&self.env);
    }

    fn recompose_tree(&mut self) {
        let status = self.tree_status();
        let previous = std::mem::take(&mut self.tree);
        self.growth.compose(&mut self.tree, &self.config.palette);
        compose_tree_labels(&mut self.tree, &status, &self.config.palette);
        self.tree.carry_start_times(&previous, self.elapsed);
    }

    fn assemble(&mut self) {
        self.frame.clear();
        self.frame.extend_from(&self.backdrop);
        self.frame.extend_from(&self.tree);
        self.overlay.compose(&mut self.frame, &self.config.palette);
    }

    // -- Outputs --

    /// The composed scene, backdrop first.
    pub fn frame(&self) -> &Scene {
        &self.frame
    }

    pub fn environment(&self) -> ResolvedEnvironment {
        self.env
    }

    pub fn overlay(&self) -> &OverlayPanel {
        &self.overlay
    }

    pub fn tree_status(&self) -> TreeStatus {
        TreeStatus::from(self.growth.level())
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.resolver.clock_mut()
    }

    /// Compose the compact weather card with this scene's clock. Its
    /// particle set is regenerated only when the card's weather kind changes.
    pub fn compose_widget(&mut self, widget: &WeatherWidget) -> Scene {
        self.widget_particles
            .sync(widget.weather, &self.config.widget.density, &mut self.rng);
        let mut card = Scene::new();
        let now = self.resolver.clock().now();
        widget.compose(
            &mut card,
            now,
            &self.config,
            self.widget_particles.descriptors(),
            self.layout_seed,
        );
        card
    }

    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot::new(self.env, &self.overlay, self.tree_status(), self.elapsed, &self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layer::SceneLayer;
    use crate::core::clock::FixedClock;
    use crate::environment::categories::{Season, TimeOfDay, Weather};
    use crate::systems::tree::stage_of;

    type TestScene = SceneEnvironment<FixedClock, ChaCha8Rng>;

    fn scene_at(clock: FixedClock) -> TestScene {
        let mut scene = SceneEnvironment::with_parts(SceneConfig::default(), clock, ChaCha8Rng::seed_from_u64(42));
        scene.mount();
        scene
    }

    fn count(scene: &TestScene, prefix: &str) -> usize {
        scene.frame().find_all_by_prefix(prefix).len()
    }

    #[test]
    fn dawn_mount_shows_sun_and_overlay() {
        let scene = scene_at(FixedClock::at(2024, 7, 1, 6));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Dawn);
        assert!(scene.frame().find_by_tag("sun").is_some());
        assert!(scene.frame().find_by_tag("moon").is_none());
        assert_eq!(scene.overlay().lines[0], "Time: Dawn");
        assert_eq!(scene.overlay().lines[2], "Season: Summer");
    }

    #[test]
    fn frame_layers_are_back_to_front() {
        let scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        let order = scene.frame().draw_order();
        assert_eq!(order.first().unwrap().layer, SceneLayer::Sky);
        assert_eq!(order.last().unwrap().layer, SceneLayer::Overlay);
        assert!(scene.frame().has_layer(SceneLayer::Tree));
    }

    #[test]
    fn overrides_win_over_clock() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        let changed = scene.set_overrides(
            EnvironmentOverrides::new()
                .with_time_of_day(TimeOfDay::Night)
                .with_weather(Weather::Snowy)
                .with_season(Season::Winter),
        );
        assert!(changed);
        assert_eq!(count(&scene, "star-"), 30);
        assert_eq!(count(&scene, "snow-"), 30);
        assert!(scene.frame().find_by_tag("frost").is_some());
        assert_eq!(scene.overlay().lines[1], "Weather: Snowy");
    }

    #[test]
    fn same_weather_keeps_particles() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.set_overrides(EnvironmentOverrides::new().with_weather(Weather::Rainy));
        let generation = scene.particles().generation();
        let first = scene.particles().descriptors().to_vec();

        scene.set_overrides(
            EnvironmentOverrides::new()
                .with_weather(Weather::Rainy)
                .with_season(Season::Autumn),
        );
        assert_eq!(scene.particles().generation(), generation);
        assert_eq!(scene.particles().descriptors(), first.as_slice());

        scene.set_overrides(EnvironmentOverrides::new().with_weather(Weather::Snowy));
        assert_eq!(scene.particles().generation(), generation + 1);
    }

    #[test]
    fn level_change_leaves_backdrop_alone() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 22));
        let stars_before: Vec<_> = scene
            .frame()
            .find_all_by_prefix("star-")
            .iter()
            .map(|s| s.pos)
            .collect();
        scene.set_level(7);
        let stars_after: Vec<_> = scene
            .frame()
            .find_all_by_prefix("star-")
            .iter()
            .map(|s| s.pos)
            .collect();
        assert_eq!(stars_before, stars_after);
        assert_eq!(scene.tree_status().stage, 7);
    }

    #[test]
    fn weather_change_keeps_the_star_field() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 22));
        let stars = |scene: &TestScene| -> Vec<_> {
            scene.frame().find_all_by_prefix("star-").iter().map(|s| (s.pos, s.animations.clone())).collect()
        };
        let before = stars(&scene);
        assert_eq!(before.len(), 30);
        scene.tick(12.0);
        assert!(scene.set_overrides(EnvironmentOverrides::new().with_weather(Weather::Rainy)));
        assert_eq!(stars(&scene), before);
        for star in scene.frame().find_all_by_prefix("star-") {
            assert_eq!(star.started_at, 0.0);
        }
        for drop in scene.frame().find_all_by_prefix("rain-") {
            assert_eq!(drop.started_at, 12.0);
        }
    }

    #[test]
    fn late_stages_start_when_revealed() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.tick(100.0);
        assert!(scene.set_level(5));
        assert_eq!(scene.frame().find_by_tag("tree/stage1/branch-0").unwrap().started_at, 0.0);
        let revealed = scene.frame().find_all_by_prefix("tree/stage5/");
        assert!(!revealed.is_empty());
        assert!(revealed.iter().all(|e| e.started_at == 100.0));
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn late_stage_is_mid_entrance_right_after_reveal() {
        use crate::systems::vector::pose;

        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.tick(100.0);
        scene.set_level(5);
        let leaf = scene.frame().find_by_tag("tree/stage5/leaf-0").unwrap();
        let viewport = scene.config().viewport();
        let scale = pose(leaf, scene.elapsed(), viewport).scale;
        assert!(scale.x < 1.0, "{scale:?}");
    }

    #[test]
    fn repeated_level_reports_no_change() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        assert!(scene.set_level(3));
        assert!(!scene.set_level(3));
    }

    #[test]
    fn glow_sits_behind_the_canopy() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.set_level(10);
        let tags: Vec<&str> = scene.frame().draw_order().iter().map(|e| e.tag.as_str()).collect();
        let glow = tags.iter().position(|t| t.contains("glow")).unwrap();
        let first_leaf = tags.iter().position(|t| t.contains("/leaf-")).unwrap();
        assert!(glow < first_leaf);
    }

    #[test]
    fn new_stages_animate_and_old_ones_do_not_replay() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.set_level(4);
        for element in scene.frame().find_all_by_prefix("tree/stage") {
            let stage = stage_of(&element.tag).unwrap();
            assert_eq!(!element.animations.is_empty(), stage > 1, "{}", element.tag);
        }
    }

    #[test]
    fn level_zero_and_fifteen() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.set_level(0);
        assert_eq!(count(&scene, "tree/stage"), 1);
        assert_eq!(scene.tree_status().status, "Your eco-tree is sprouting 🌱");

        scene.set_level(15);
        assert_eq!(scene.tree_status().headline, "Level 15");
        assert_eq!(scene.tree_status().stage, 10);
        assert!(count(&scene, "tree/stage10/") > 0);
    }

    #[test]
    fn action_response_grows_the_tree() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.apply_action(&ActionResponse {
            new_rating: 1300.0,
            new_level: 5,
            new_league: "Silver".to_string(),
        });
        assert_eq!(scene.progress().league, "Silver");
        assert_eq!(scene.tree_status().stage, 5);
    }

    #[test]
    fn periodic_reresolution_follows_the_clock() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 17));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Day);

        scene.clock_mut().set(FixedClock::at(2024, 7, 1, 18).now());
        assert!(!scene.tick(30.0));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Day);
        assert!(scene.tick(30.0));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Dusk);
        assert_eq!(scene.overlay().lines[0], "Time: Dusk");
    }

    #[test]
    fn one_shot_resolution_when_interval_disabled() {
        let config = SceneConfig {
            reresolve_interval_secs: None,
            ..SceneConfig::default()
        };
        let mut scene = SceneEnvironment::with_parts(config, FixedClock::at(2024, 7, 1, 17), ChaCha8Rng::seed_from_u64(1));
        scene.mount();
        scene.clock_mut().set(FixedClock::at(2024, 7, 1, 23).now());
        assert!(!scene.tick(600.0));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Day);

        scene.mount();
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Night);
    }

    #[test]
    fn unmount_discards_particles() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 12));
        scene.set_overrides(EnvironmentOverrides::new().with_weather(Weather::Rainy));
        scene.unmount();
        assert!(scene.frame().is_empty());
        assert!(scene.particles().kind().is_none());
        assert!(!scene.tick(120.0));
    }

    #[test]
    fn widget_uses_its_own_buckets() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 18));
        assert_eq!(scene.environment().time_of_day, TimeOfDay::Dusk);
        let card = scene.compose_widget(&WeatherWidget::new().with_weather(Weather::Rainy));
        assert_eq!(card.find_all_by_prefix("widget/rain-").len(), 15);
        assert!(card.find_all_by_prefix("widget/star-").is_empty());
        assert!(card.find_by_tag("widget/temperature").is_some());
    }

    #[test]
    fn repeated_widget_keeps_its_particles() {
        let mut scene = scene_at(FixedClock::at(2024, 7, 1, 22));
        let rainy = WeatherWidget::new().with_weather(Weather::Rainy);
        let first = scene.compose_widget(&rainy);
        let second = scene.compose_widget(&rainy);
        assert_eq!(first, second);

        let backdrop = scene.particles().descriptors().to_vec();
        scene.compose_widget(&WeatherWidget::new().with_weather(Weather::Snowy));
        assert_eq!(scene.particles().descriptors(), backdrop.as_slice());
    }

    #[test]
    fn snapshot_reports_state() {
        let scene = scene_at(FixedClock::at(2024, 1, 15, 21));
        let snapshot = scene.snapshot();
        assert_eq!(snapshot.environment.season, Season::Winter);
        assert_eq!(snapshot.elements.len(), scene.frame().len());
        assert!(snapshot.to_json().unwrap().contains("\"Time: Night\""));
    }
}
