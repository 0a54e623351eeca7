// environment/mod.rs
//
// Categorical environment state: the axes themselves and how they are
// resolved from the clock and host overrides.

pub mod categories;
pub mod resolver;

pub use categories::{Precipitation, Season, TimeOfDay, Weather, WidgetTimeOfDay};
pub use resolver::{
    resolve, resolve_widget, EnvironmentOverrides, EnvironmentResolver, ResolvedEnvironment,
};
