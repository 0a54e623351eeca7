//! Compact weather card.
//!
//! A second, smaller display context for the same categories: positions
//! are percent of the card rather than of the viewport, and the particle
//! density comes from [`SceneConfig::widget`]. Weather is never derived
//! here; it is whatever the host passes (sunny by default).
//!
//! The card owns no randomness. Precipitation comes in as descriptors and
//! every other placement is drawn from the caller's layout seed, so the
//! same inputs always compose the same card.

use chrono::NaiveDateTime;
use glam::Vec2;
use rand::Rng;

use crate::api::config::SceneConfig;
use crate::components::element::SceneElement;
use crate::components::layer::SceneLayer;
use crate::components::paint::{Color, Paint, Palette};
use crate::components::shape::{Icon, Shape};
use crate::core::scene::Scene;
use crate::environment::categories::{Precipitation, Season, Weather, WidgetTimeOfDay};
use crate::environment::resolver::resolve_widget;
use crate::extensions::animation::{AnimatedProperty, Animation};
use crate::extensions::easing::Easing;
use crate::systems::background::{cloud_shape, fall, layout_rng, leaf_path, spin, sway, LayoutStream};
use crate::systems::particles::ParticleDescriptor;

const CARD_FALL: f32 = 50.0;
const RAIN_FALL_SECS: f32 = 0.8;
const ICON_PULSE_SECS: f32 = 3.0;
const CARD_ENTRANCE_SECS: f32 = 0.5;
const SPRING_PETALS: usize = 3;
const AUTUMN_LEAVES: usize = 4;

/// Card cloud: three ellipses `(cx, cy, rx, ry)` in a 50 × 25 box.
const CLOUD_ELLIPSES: [(f32, f32, f32, f32); 3] =
    [(12.0, 15.0, 10.0, 8.0), (25.0, 12.0, 12.0, 9.0), (35.0, 15.0, 10.0, 7.0)];

/// Card inputs. Unset time and season are derived from the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherWidget {
    /// Degrees Celsius, shown verbatim.
    pub temperature: f32,
    pub weather: Weather,
    pub time_of_day: Option<WidgetTimeOfDay>,
    pub season: Option<Season>,
}

impl Default for WeatherWidget {
    fn default() -> Self {
        Self {
            temperature: 22.0,
            weather: Weather::Sunny,
            time_of_day: None,
            season: None,
        }
    }
}

impl WeatherWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: WidgetTimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn temperature_label(&self) -> String {
        format!("{}°C", self.temperature)
    }

    /// Capitalised weather name ("Rainy").
    pub fn description(&self) -> &'static str {
        self.weather.display_name()
    }

    /// Compose the card as seen at `now`.
    ///
    /// `particles` must be the set generated for `self.weather` with the
    /// widget density; it is ignored unless that weather precipitates.
    pub fn compose(
        &self,
        scene: &mut Scene,
        now: NaiveDateTime,
        config: &SceneConfig,
        particles: &[ParticleDescriptor],
        layout_seed: u64,
    ) {
        let (time_of_day, season) = resolve_widget(now, self.time_of_day, self.season);
        let palette = &config.palette;
        let profile = &config.widget;

        scene.spawn(
            SceneElement::new("widget/sky", SceneLayer::Sky, Shape::FullBleed)
                .with_paint(widget_sky_paint(time_of_day, palette))
                .with_animation(Animation::tween(AnimatedProperty::Scale, 0.9, 1.0, CARD_ENTRANCE_SECS))
                .with_animation(Animation::fade_in(1.0, CARD_ENTRANCE_SECS)),
        );

        match self.weather.precipitation() {
            Some(Precipitation::Rain) => {
                for p in particles {
                    scene.spawn(
                        SceneElement::new(
                            format!("widget/rain-{}", p.id),
                            SceneLayer::Precipitation,
                            Shape::Rect { width: 2.0, height: 16.0 },
                        )
                        .with_pos(Vec2::new(p.x, -10.0))
                        .with_paint(Paint::solid(palette.rain_drop))
                        .with_opacity(0.6)
                        .with_animation(fall(CARD_FALL, RAIN_FALL_SECS, p.delay)),
                    );
                }
            }
            Some(Precipitation::Snow) => {
                let rng = &mut layout_rng(layout_seed, LayoutStream::WidgetSnow);
                for p in particles {
                    let duration = 4.0 + rng.gen_range(0.0..2.0);
                    scene.spawn(
                        SceneElement::new(
                            format!("widget/snow-{}", p.id),
                            SceneLayer::Precipitation,
                            Shape::Circle { radius: 3.0 },
                        )
                        .with_pos(Vec2::new(p.x, -5.0))
                        .with_paint(Paint::solid(palette.snow_flake))
                        .with_animations([
                            fall(CARD_FALL, duration, p.delay),
                            sway((p.id as f32).sin() * 10.0, duration, p.delay),
                        ]),
                    );
                }
            }
            None => {}
        }

        if self.weather.has_clouds() {
            for i in 0..profile.clouds {
                let lane = i as f32;
                scene.spawn(
                    SceneElement::new(
                        format!("widget/cloud-{i}"),
                        SceneLayer::Clouds,
                        cloud_shape(&CLOUD_ELLIPSES, palette.cloud_light, 0.6),
                    )
                    .with_pos(Vec2::new(-20.0, 10.0 + lane * 20.0))
                    .with_animation(
                        Animation::tween(AnimatedProperty::TranslateX, 0.0, 140.0, 15.0 + lane * 5.0)
                            .with_easing(Easing::Linear)
                            .looping(),
                    ),
                );
            }
        }

        if time_of_day == WidgetTimeOfDay::Night {
            let rng = &mut layout_rng(layout_seed, LayoutStream::WidgetStars);
            for i in 0..profile.stars {
                let pos = Vec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..50.0));
                let duration = 1.5 + rng.gen_range(0.0..2.0);
                let delay = rng.gen_range(0.0..1.0);
                scene.spawn(
                    SceneElement::new(format!("widget/star-{i}"), SceneLayer::Celestial, Shape::Circle { radius: 2.0 })
                        .with_pos(pos)
                        .with_paint(Paint::solid(palette.star))
                        .with_animation(
                            Animation::pulse(AnimatedProperty::Opacity, 0.3, 1.0, duration).with_delay(delay),
                        ),
                );
            }
        }

        if season == Season::Spring && self.weather == Weather::Sunny {
            let rng = &mut layout_rng(layout_seed, LayoutStream::WidgetPetals);
            for i in 0..SPRING_PETALS {
                let x = rng.gen_range(0.0..100.0);
                let duration = 8.0 + rng.gen_range(0.0..3.0);
                let delay = rng.gen_range(0.0..2.0);
                scene.spawn(
                    SceneElement::new(format!("widget/petal-{i}"), SceneLayer::Seasonal, Shape::Circle { radius: 4.0 })
                        .with_pos(Vec2::new(x, -5.0))
                        .with_paint(Paint::solid(palette.spring_flower))
                        .with_opacity(0.7)
                        .with_animations([
                            fall(CARD_FALL, duration, delay),
                            sway((i as f32).sin() * 15.0, duration, delay),
                            spin(&[0.0, 360.0], duration, delay),
                        ]),
                );
            }
        }

        if season == Season::Autumn {
            let outline = leaf_path(8.0);
            let rng = &mut layout_rng(layout_seed, LayoutStream::WidgetLeaves);
            for i in 0..AUTUMN_LEAVES {
                let fill = if i % 2 == 0 { palette.autumn_leaf } else { palette.autumn_leaf_dark };
                let x = rng.gen_range(0.0..100.0);
                let duration = 6.0 + rng.gen_range(0.0..3.0);
                let delay = rng.gen_range(0.0..2.0);
                scene.spawn(
                    SceneElement::new(format!("widget/leaf-{i}"), SceneLayer::Seasonal, Shape::fill_path(&outline))
                        .with_pos(Vec2::new(x, -5.0))
                        .with_paint(Paint::solid(fill))
                        .with_animations([
                            fall(CARD_FALL, duration, delay),
                            sway((i as f32).sin() * 20.0, duration, delay),
                            spin(&[0.0, 180.0, 360.0], duration, delay),
                        ]),
                );
            }
        }

        scene.spawn(
            SceneElement::new(
                "widget/icon",
                SceneLayer::Overlay,
                Shape::Icon { icon: weather_icon(self.weather), size: 48.0 },
            )
            .with_pos(Vec2::new(50.0, 35.0))
            .with_paint(Paint::solid(seasonal_accent(season, palette)))
            .with_animation(Animation::pulse(AnimatedProperty::Scale, 1.0, 1.05, ICON_PULSE_SECS)),
        );
        scene.spawn(
            SceneElement::new("widget/temperature", SceneLayer::Overlay, Shape::text(self.temperature_label(), 48.0))
                .with_pos(Vec2::new(50.0, 65.0))
                .with_paint(Paint::solid(Color::WHITE))
                .with_animation(Animation::fade_in(1.0, 0.3).with_delay(0.2)),
        );
        scene.spawn(
            SceneElement::new("widget/description", SceneLayer::Overlay, Shape::text(self.description(), 14.0))
                .with_pos(Vec2::new(50.0, 85.0))
                .with_paint(Paint::solid(Color::WHITE))
                .with_opacity(0.9)
                .with_animation(Animation::fade_in(1.0, 0.3).with_delay(0.3)),
        );
    }
}

pub fn weather_icon(weather: Weather) -> Icon {
    match weather {
        Weather::Sunny => Icon::Sun,
        Weather::Cloudy => Icon::Cloud,
        Weather::Rainy => Icon::CloudRain,
        Weather::Snowy => Icon::CloudSnow,
    }
}

pub fn seasonal_accent(season: Season, palette: &Palette) -> Color {
    match season {
        Season::Spring => palette.spring_flower,
        Season::Summer => palette.sun_glow,
        Season::Autumn => palette.autumn_leaf,
        Season::Winter => palette.snow_flake,
    }
}

/// Card sky; runs corner to corner rather than top to bottom.
pub fn widget_sky_paint(time_of_day: WidgetTimeOfDay, palette: &Palette) -> Paint {
    let stops = match time_of_day {
        WidgetTimeOfDay::Morning => palette.sky_dawn,
        WidgetTimeOfDay::Day => palette.sky_day,
        WidgetTimeOfDay::Evening => palette.sky_dusk,
        WidgetTimeOfDay::Night => palette.sky_night,
    };
    Paint::diagonal(stops)
}
