//! Procedural placement for precipitation particles.
//!
//! A particle here is only a descriptor (horizontal slot + phase delay); the
//! falling motion is an animation the host plays. Sets are regenerated
//! wholesale when the weather kind changes, never patched.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::environment::categories::Weather;

/// Placement and timing for one decorative particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleDescriptor {
    /// Ordinal within the current set.
    pub id: u32,
    /// Horizontal position, percent of width in [0, 100).
    pub x: f32,
    /// Animation phase delay in seconds, in [0, max_delay).
    pub delay: f32,
}

/// How many particles one effect gets and how far their phases spread.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticlePolicy {
    pub count: usize,
    pub max_delay: f32,
}

impl ParticlePolicy {
    pub const NONE: ParticlePolicy = ParticlePolicy { count: 0, max_delay: 0.0 };

    pub const fn new(count: usize, max_delay: f32) -> Self {
        Self { count, max_delay }
    }
}

/// Per-context particle density. The backdrop and the compact widget
/// use different instances of the same generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPolicy {
    pub rain: ParticlePolicy,
    pub snow: ParticlePolicy,
}

impl DensityPolicy {
    /// Full-screen backdrop: 50 drops or 30 flakes, phases over 5 s.
    pub const fn backdrop() -> Self {
        Self {
            rain: ParticlePolicy::new(50, 5.0),
            snow: ParticlePolicy::new(30, 5.0),
        }
    }

    /// Compact widget: 15 drops over 2 s, 10 flakes over 1 s.
    pub const fn widget() -> Self {
        Self {
            rain: ParticlePolicy::new(15, 2.0),
            snow: ParticlePolicy::new(10, 1.0),
        }
    }

    /// Policy for a weather kind; zero particles unless it precipitates.
    pub fn policy_for(&self, weather: Weather) -> ParticlePolicy {
        match weather {
            Weather::Rainy => self.rain,
            Weather::Snowy => self.snow,
            Weather::Sunny | Weather::Cloudy => ParticlePolicy::NONE,
        }
    }
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self::backdrop()
    }
}

/// Draw `policy.count` independent, uniformly placed descriptors.
/// A non-finite or non-positive `max_delay` puts every phase at zero.
pub fn generate<R: Rng + ?Sized>(policy: ParticlePolicy, rng: &mut R) -> Vec<ParticleDescriptor> {
    (0..policy.count)
        .map(|i| ParticleDescriptor {
            id: i as u32,
            x: rng.gen_range(0.0..100.0),
            delay: if policy.max_delay.is_finite() && policy.max_delay > 0.0 {
                rng.gen_range(0.0..policy.max_delay)
            } else {
                0.0
            },
        })
        .collect()
}

/// Particle set keyed on the weather kind that produced it.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    kind: Option<Weather>,
    descriptors: Vec<ParticleDescriptor>,
    generation: u64,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate iff `weather` differs from the kind of the current set.
    /// Returns whether a new set was drawn.
    pub fn sync<R: Rng + ?Sized>(
        &mut self,
        weather: Weather,
        density: &DensityPolicy,
        rng: &mut R,
    ) -> bool {
        if self.kind == Some(weather) {
            return false;
        }
        self.regenerate(weather, density, rng);
        true
    }

    /// Draw a fresh set unconditionally (a remount).
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        weather: Weather,
        density: &DensityPolicy,
        rng: &mut R,
    ) {
        self.descriptors = generate(density.policy_for(weather), rng);
        self.kind = Some(weather);
        self.generation += 1;
        log::debug!(
            "particle set #{} for {}: {} descriptors",
            self.generation,
            weather,
            self.descriptors.len()
        );
    }

    pub fn descriptors(&self) -> &[ParticleDescriptor] {
        &self.descriptors
    }

    pub fn kind(&self) -> Option<Weather> {
        self.kind
    }

    /// Incremented on every regeneration.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forget the current set (an unmount).
    pub fn clear(&mut self) {
        self.kind = None;
        self.descriptors.clear();
    }
}
