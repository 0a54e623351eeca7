//! Environment resolution: wall-clock time plus manual overrides in,
//! concrete categories out.
//!
//! Overrides are total per axis. When an axis is overridden its clock
//! derivation is skipped entirely; there is no blending.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use super::categories::{Season, TimeOfDay, Weather, WidgetTimeOfDay};

/// Manual values supplied by the host. `None` means "derive" (time, season)
/// or "default" (weather).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentOverrides {
    pub time_of_day: Option<TimeOfDay>,
    pub weather: Option<Weather>,
    pub season: Option<Season>,
}

impl EnvironmentOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }
}

/// The three categories a scene is composed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedEnvironment {
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
    pub season: Season,
}

/// Resolve the backdrop environment at a given instant.
pub fn resolve(now: NaiveDateTime, overrides: &EnvironmentOverrides) -> ResolvedEnvironment {
    ResolvedEnvironment {
        time_of_day: overrides
            .time_of_day
            .unwrap_or_else(|| TimeOfDay::from_hour(now.hour())),
        weather: overrides.weather.unwrap_or_default(),
        season: overrides
            .season
            .unwrap_or_else(|| Season::from_month0(now.month0())),
    }
}

/// Resolve the widget's time bucket and season at a given instant.
pub fn resolve_widget(
    now: NaiveDateTime,
    time_of_day: Option<WidgetTimeOfDay>,
    season: Option<Season>,
) -> (WidgetTimeOfDay, Season) {
    (
        time_of_day.unwrap_or_else(|| WidgetTimeOfDay::from_hour(now.hour())),
        season.unwrap_or_else(|| Season::from_month0(now.month0())),
    )
}

/// Binds [`resolve`] to an injected clock.
#[derive(Debug, Clone)]
pub struct EnvironmentResolver<C: Clock> {
    clock: C,
}

impl<C: Clock> EnvironmentResolver<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Read the clock once and resolve.
    pub fn resolve(&self, overrides: &EnvironmentOverrides) -> ResolvedEnvironment {
        let env = resolve(self.clock.now(), overrides);
        log::debug!(
            "resolved environment: {} / {} / {}",
            env.time_of_day,
            env.weather,
            env.season
        );
        env
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
