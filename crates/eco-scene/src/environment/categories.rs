//! Discrete environment axes: time of day, weather and season.
//!
//! Every axis is a closed enum with a `Default` bucket. Untyped input from the
//! host goes through `FromStr` (strict) or `parse_or_default` (lenient, logs
//! and falls back), so an unknown string can never yield an empty scene.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Generates the string plumbing shared by every category enum.
macro_rules! category {
    ($ty:ident, $axis:literal, { $($variant:ident => $key:literal, $label:literal;)+ }) => {
        impl $ty {
            /// All buckets, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Lowercase key used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $key,)+
                }
            }

            /// Capitalised name for display.
            pub fn display_name(self) -> &'static str {
                match self {
                    $($ty::$variant => $label,)+
                }
            }

            /// Parse leniently: unknown input logs a warning and yields the default bucket.
            pub fn parse_or_default(raw: &str) -> Self {
                raw.parse().unwrap_or_else(|err: SceneError| {
                    log::warn!("{err}; falling back to {}", Self::default().as_str());
                    Self::default()
                })
            }
        }

        impl FromStr for $ty {
            type Err = SceneError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($key => Ok($ty::$variant),)+
                    _ => Err(SceneError::UnknownCategory {
                        axis: $axis,
                        value: raw.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Time-of-day bucket for the full-screen backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Dawn,
    #[default]
    Day,
    Dusk,
    Night,
}

category!(TimeOfDay, "time of day", {
    Dawn => "dawn", "Dawn";
    Day => "day", "Day";
    Dusk => "dusk", "Dusk";
    Night => "night", "Night";
});

impl TimeOfDay {
    /// Bucket an hour of the day (0..24). Dawn [5,7), day [7,18), dusk [18,20),
    /// night otherwise. Hours past 23 wrap.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=6 => TimeOfDay::Dawn,
            7..=17 => TimeOfDay::Day,
            18..=19 => TimeOfDay::Dusk,
            _ => TimeOfDay::Night,
        }
    }
}

/// Time-of-day bucket for the compact weather widget.
///
/// Kept separate from [`TimeOfDay`]: the widget uses wider daylight buckets
/// and different labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetTimeOfDay {
    Morning,
    #[default]
    Day,
    Evening,
    Night,
}

category!(WidgetTimeOfDay, "widget time of day", {
    Morning => "morning", "Morning";
    Day => "day", "Day";
    Evening => "evening", "Evening";
    Night => "night", "Night";
});

impl WidgetTimeOfDay {
    /// Morning [5,11), day [11,17), evening [17,20), night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=10 => WidgetTimeOfDay::Morning,
            11..=16 => WidgetTimeOfDay::Day,
            17..=19 => WidgetTimeOfDay::Evening,
            _ => WidgetTimeOfDay::Night,
        }
    }
}

/// Current weather. Never derived internally; supplied by the host or defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Snowy,
    Cloudy,
}

category!(Weather, "weather", {
    Sunny => "sunny", "Sunny";
    Rainy => "rainy", "Rainy";
    Snowy => "snowy", "Snowy";
    Cloudy => "cloudy", "Cloudy";
});

impl Weather {
    /// Cloud layer toggle: overcast or raining.
    pub fn has_clouds(self) -> bool {
        matches!(self, Weather::Cloudy | Weather::Rainy)
    }

    /// Which precipitation layer, if any. Rain and snow are mutually exclusive.
    pub fn precipitation(self) -> Option<Precipitation> {
        match self {
            Weather::Rainy => Some(Precipitation::Rain),
            Weather::Snowy => Some(Precipitation::Snow),
            Weather::Sunny | Weather::Cloudy => None,
        }
    }
}

/// The single active precipitation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precipitation {
    Rain,
    Snow,
}

/// Season bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    #[default]
    Summer,
    Autumn,
    Winter,
}

category!(Season, "season", {
    Spring => "spring", "Spring";
    Summer => "summer", "Summer";
    Autumn => "autumn", "Autumn";
    Winter => "winter", "Winter";
});

impl Season {
    /// Bucket a zero-based month (0 = January). 2–4 spring, 5–7 summer,
    /// 8–10 autumn, everything else winter.
    pub fn from_month0(month0: u32) -> Self {
        match month0 {
            2..=4 => Season::Spring,
            5..=7 => Season::Summer,
            8..=10 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}
