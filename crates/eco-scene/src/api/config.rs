use serde::{Deserialize, Serialize};

use crate::components::paint::Palette;
use crate::error::SceneError;
use crate::systems::particles::DensityPolicy;

/// Upper bound on any per-effect element count read from a config.
pub const MAX_EFFECT_ELEMENTS: usize = 1000;

/// Element counts for one display context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextProfile {
    pub density: DensityPolicy,
    /// Twinkling stars at night.
    pub stars: usize,
    /// Drifting cloud shapes when overcast or raining.
    pub clouds: usize,
}

impl ContextProfile {
    pub const fn backdrop() -> Self {
        Self {
            density: DensityPolicy::backdrop(),
            stars: 30,
            clouds: 5,
        }
    }

    pub const fn widget() -> Self {
        Self {
            density: DensityPolicy::widget(),
            stars: 8,
            clouds: 2,
        }
    }

    fn validate(&self, context: &str) -> Result<(), SceneError> {
        for (effect, policy) in [("rain", self.density.rain), ("snow", self.density.snow)] {
            if !policy.max_delay.is_finite() || policy.max_delay < 0.0 {
                return Err(invalid(format!(
                    "{context}.density.{effect}.max_delay must be a finite, non-negative number of seconds, got {}",
                    policy.max_delay
                )));
            }
            check_count(context, effect, policy.count)?;
        }
        check_count(context, "stars", self.stars)?;
        check_count(context, "clouds", self.clouds)
    }
}

fn invalid(reason: String) -> SceneError {
    SceneError::InvalidConfig { reason }
}

fn check_count(context: &str, what: &str, count: usize) -> Result<(), SceneError> {
    if count > MAX_EFFECT_ELEMENTS {
        return Err(invalid(format!(
            "{context} {what} count {count} exceeds {MAX_EFFECT_ELEMENTS}"
        )));
    }
    Ok(())
}

/// Engine configuration, provided by the host page (all keys optional).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Viewport size in CSS pixels, used when tessellating a pose.
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Full-screen backdrop counts.
    pub backdrop: ContextProfile,
    /// Compact weather widget counts.
    pub widget: ContextProfile,
    /// Re-read the clock this often while mounted. `None` resolves only on
    /// mount and override changes.
    pub reresolve_interval_secs: Option<f32>,
    /// Seed for the particle RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            backdrop: ContextProfile::backdrop(),
            widget: ContextProfile::widget(),
            reresolve_interval_secs: Some(60.0),
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config document; missing keys take their defaults.
    /// Values that parse but cannot be used are rejected.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric value the composers feed to the RNG or the tessellator.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (name, size) in [("viewport_width", self.viewport_width), ("viewport_height", self.viewport_height)] {
            if !size.is_finite() || size <= 0.0 {
                return Err(invalid(format!("{name} must be a positive number, got {size}")));
            }
        }
        if let Some(secs) = self.reresolve_interval_secs {
            if !secs.is_finite() {
                return Err(invalid(format!("reresolve_interval_secs must be finite, got {secs}")));
            }
        }
        self.backdrop.validate("backdrop")?;
        self.widget.validate("widget")
    }

    pub fn viewport(&self) -> glam::Vec2 {
        glam::Vec2::new(self.viewport_width, self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn overrides_selected_keys() {
        let config = SceneConfig::from_json(
            r#"{ "reresolve_interval_secs": null, "seed": 9, "viewport_width": 640 }"#,
        )
        .unwrap();
        assert_eq!(config.reresolve_interval_secs, None);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.viewport_width, 640.0);
        assert_eq!(config.backdrop.stars, 30);
    }

    #[test]
    fn rejects_overflowing_delay() {
        let err = SceneConfig::from_json(
            r#"{ "backdrop": { "density": { "rain": { "count": 50, "max_delay": 1e39 },
                 "snow": { "count": 30, "max_delay": 5 } }, "stars": 30, "clouds": 5 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig { .. }));
        assert!(err.to_string().contains("backdrop.density.rain.max_delay"));
    }

    #[test]
    fn rejects_unusable_numbers() {
        assert!(SceneConfig::from_json(r#"{ "viewport_width": 0 }"#).is_err());
        assert!(SceneConfig::from_json(r#"{ "viewport_height": -10 }"#).is_err());
        assert!(SceneConfig::from_json(r#"{ "reresolve_interval_secs": 1e39 }"#).is_err());

        let mut config = SceneConfig::default();
        config.widget.stars = MAX_EFFECT_ELEMENTS + 1;
        assert!(config.validate().is_err());
        config.widget.stars = 8;
        config.widget.density.snow.max_delay = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SceneError::Json(_))
        ));
    }
}
