use serde::{Deserialize, Serialize};

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// CSS-style HSL: hue in degrees, saturation and lightness in percent.
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::rgb(r + m, g + m, b + m)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise interpolation, used for gradient vertices.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Direction a gradient runs in, first stop to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    #[default]
    TopToBottom,
    TopLeftToBottomRight,
}

/// How a shape is filled (or stroked, for stroked paths).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Paint {
    Solid { color: Color },
    /// Evenly spaced stops along `direction`.
    Gradient {
        stops: Vec<Color>,
        direction: GradientDirection,
    },
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Paint::Solid { color }
    }

    pub fn vertical(stops: impl Into<Vec<Color>>) -> Self {
        Paint::Gradient {
            stops: stops.into(),
            direction: GradientDirection::TopToBottom,
        }
    }

    pub fn diagonal(stops: impl Into<Vec<Color>>) -> Self {
        Paint::Gradient {
            stops: stops.into(),
            direction: GradientDirection::TopLeftToBottomRight,
        }
    }

    /// Color at normalized position `t` along the paint (constant for solids).
    pub fn color_at(&self, t: f32) -> Color {
        match self {
            Paint::Solid { color } => *color,
            Paint::Gradient { stops, .. } => match stops.len() {
                0 => Color::TRANSPARENT,
                1 => stops[0],
                n => {
                    let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
                    let i = (scaled as usize).min(n - 2);
                    stops[i].mix(stops[i + 1], scaled - i as f32)
                }
            },
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::solid(Color::WHITE)
    }
}

/// Named colors for every painted element in the scene.
///
/// Defaults follow the app's design tokens; a host can override any subset
/// through [`SceneConfig`](crate::api::config::SceneConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky_dawn: [Color; 2],
    pub sky_day: [Color; 2],
    pub sky_dusk: [Color; 2],
    pub sky_night: [Color; 2],
    pub sun_glow: Color,
    pub moon_glow: Color,
    pub star: Color,
    pub cloud_light: Color,
    pub cloud_dark: Color,
    pub rain_drop: Color,
    pub snow_flake: Color,
    pub winter_frost: Color,
    pub spring_flower: Color,
    pub spring_green: Color,
    pub autumn_leaf: Color,
    pub autumn_leaf_dark: Color,
    pub ground_spring: Color,
    pub ground_summer: Color,
    pub ground_autumn: Color,
    pub ground_winter: Color,
    /// Bark hue and saturation; lightness varies by branch order.
    pub bark_hue: f32,
    pub bark_saturation: f32,
    pub canopy: Color,
    pub canopy_dense: Color,
    pub apple_red: Color,
    pub apple_red_dark: Color,
    pub gold: Color,
    pub panel: Color,
    pub text: Color,
}

impl Palette {
    /// Bark at the given lightness (percent). Thinner branches are lighter.
    pub fn bark(&self, lightness: f32) -> Color {
        Color::hsl(self.bark_hue, self.bark_saturation, lightness)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_dawn: [Color::hsl(25.0, 90.0, 75.0), Color::hsl(200.0, 70.0, 80.0)],
            sky_day: [Color::hsl(200.0, 85.0, 60.0), Color::hsl(195.0, 80.0, 85.0)],
            sky_dusk: [Color::hsl(280.0, 45.0, 45.0), Color::hsl(20.0, 85.0, 65.0)],
            sky_night: [Color::hsl(230.0, 50.0, 10.0), Color::hsl(240.0, 40.0, 25.0)],
            sun_glow: Color::hsl(45.0, 100.0, 60.0),
            moon_glow: Color::hsl(50.0, 30.0, 90.0),
            star: Color::WHITE,
            cloud_light: Color::hsl(0.0, 0.0, 98.0),
            cloud_dark: Color::hsl(220.0, 10.0, 55.0),
            rain_drop: Color::hsl(205.0, 70.0, 65.0),
            snow_flake: Color::hsl(200.0, 30.0, 97.0),
            winter_frost: Color::hsl(195.0, 60.0, 90.0),
            spring_flower: Color::hsl(330.0, 80.0, 75.0),
            spring_green: Color::hsl(110.0, 55.0, 45.0),
            autumn_leaf: Color::hsl(25.0, 85.0, 50.0),
            autumn_leaf_dark: Color::hsl(10.0, 75.0, 38.0),
            ground_spring: Color::hsl(100.0, 45.0, 40.0),
            ground_summer: Color::hsl(85.0, 40.0, 35.0),
            ground_autumn: Color::hsl(30.0, 45.0, 32.0),
            ground_winter: Color::hsl(200.0, 20.0, 90.0),
            bark_hue: 30.0,
            bark_saturation: 30.0,
            canopy: Color::hsl(142.0, 70.0, 35.0),
            canopy_dense: Color::hsl(142.0, 76.0, 28.0),
            apple_red: Color::hsl(0.0, 75.0, 50.0),
            apple_red_dark: Color::hsl(0.0, 70.0, 35.0),
            gold: Color::hsl(45.0, 93.0, 47.0),
            panel: Color::hsl(0.0, 0.0, 100.0).with_alpha(0.8),
            text: Color::hsl(220.0, 20.0, 15.0),
        }
    }
}
