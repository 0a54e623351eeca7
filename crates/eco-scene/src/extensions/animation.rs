// extensions/animation.rs
//
// Declarative animation descriptors. The engine never drives frames; it
// attaches these to scene elements and lets the host runtime play them.
//
// Usage:
//   let fall = Animation::keyframes(AnimatedProperty::TranslateY, [0.0, 110.0], 1.0)
//       .with_easing(Easing::Linear)
//       .with_delay(0.4)
//       .looping();
//   let y = fall.sample(1.0); // Some(..) once the delay has elapsed

use serde::{Deserialize, Serialize};

use super::easing::{ease, Easing};

/// What property an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimatedProperty {
    /// Multiplier on the element's base opacity.
    Opacity,
    /// Uniform scale about the element anchor.
    Scale,
    /// Vertical-only scale (grass blades).
    ScaleY,
    /// Horizontal travel in percent of viewport width.
    TranslateX,
    /// Vertical travel in percent of viewport height.
    TranslateY,
    /// Horizontal sway in pixels.
    DriftX,
    /// Rotation in degrees.
    Rotation,
    /// Fraction of a stroked path that is drawn.
    PathLength,
}

/// What happens when the last keyframe is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repeat {
    /// Play once and hold the final keyframe.
    #[default]
    Once,
    /// Restart from the first keyframe forever.
    Infinite,
}

/// One timed transition over evenly spaced keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub property: AnimatedProperty,
    /// At least one value. Keyframes are spread evenly over `duration`.
    pub keyframes: Vec<f32>,
    /// Seconds per cycle.
    pub duration: f32,
    /// Seconds before the first cycle starts. Also the phase offset of a loop.
    pub delay: f32,
    pub repeat: Repeat,
    pub easing: Easing,
}

impl Animation {
    /// Animation through explicit keyframes.
    pub fn keyframes(
        property: AnimatedProperty,
        keyframes: impl Into<Vec<f32>>,
        duration: f32,
    ) -> Self {
        let mut keyframes = keyframes.into();
        if keyframes.is_empty() {
            keyframes.push(0.0);
        }
        Self {
            property,
            keyframes,
            duration,
            delay: 0.0,
            repeat: Repeat::Once,
            easing: Easing::default(),
        }
    }

    /// Two-keyframe transition.
    pub fn tween(property: AnimatedProperty, from: f32, to: f32, duration: f32) -> Self {
        Self::keyframes(property, [from, to], duration)
    }

    /// Fade from transparent to `to`.
    pub fn fade_in(to: f32, duration: f32) -> Self {
        Self::tween(AnimatedProperty::Opacity, 0.0, to, duration)
    }

    /// Grow from nothing to full size.
    pub fn grow_in(duration: f32) -> Self {
        Self::tween(AnimatedProperty::Scale, 0.0, 1.0, duration)
    }

    /// Draw a stroked path from start to end.
    pub fn draw_path(duration: f32) -> Self {
        Self::tween(AnimatedProperty::PathLength, 0.0, 1.0, duration)
    }

    /// Out-and-back oscillation `rest → peak → rest`, looping forever.
    pub fn pulse(property: AnimatedProperty, rest: f32, peak: f32, duration: f32) -> Self {
        Self::keyframes(property, [rest, peak, rest], duration).looping()
    }

    // -- Builder methods --

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn looping(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    pub fn is_looping(&self) -> bool {
        self.repeat == Repeat::Infinite
    }

    /// Value held after a one-shot animation completes.
    pub fn final_value(&self) -> f32 {
        self.keyframes.last().copied().unwrap_or_default()
    }

    /// Evaluate the animation `elapsed` seconds after its element appeared.
    /// During the delay a one-shot holds its first keyframe and a loop
    /// returns `None`.
    pub fn sample(&self, elapsed: f32) -> Option<f32> {
        if elapsed < self.delay {
            return match self.repeat {
                Repeat::Once => self.keyframes.first().copied(),
                Repeat::Infinite => None,
            };
        }
        let local = elapsed - self.delay;

        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            match self.repeat {
                Repeat::Once => (local / self.duration).min(1.0),
                Repeat::Infinite => (local % self.duration) / self.duration,
            }
        };

        let segments = self.keyframes.len().saturating_sub(1);
        if segments == 0 {
            return self.keyframes.first().copied();
        }

        let scaled = progress * segments as f32;
        let index = (scaled as usize).min(segments - 1);
        let t = scaled - index as f32;
        let from = self.keyframes.get(index).copied()?;
        let to = self.keyframes.get(index + 1).copied()?;
        Some(ease(from, to, t, self.easing))
    }
}

/// Sample every animation on `property`, last writer wins.
/// Falls back to `rest` when none has a value yet.
pub fn sample_property(
    animations: &[Animation],
    property: AnimatedProperty,
    elapsed: f32,
    rest: f32,
) -> f32 {
    animations
        .iter()
        .filter(|a| a.property == property)
        .fold(None, |acc, a| a.sample(elapsed).or(acc))
        .unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_holds_first_keyframe_during_delay() {
        let anim = Animation::fade_in(1.0, 2.0).with_delay(0.5);
        assert_eq!(anim.sample(-3.0), Some(0.0));
        assert_eq!(anim.sample(0.2), Some(0.0));
        assert_eq!(anim.sample(0.5), Some(0.0));
    }

    #[test]
    fn loop_waits_for_delay() {
        let pulse = Animation::pulse(AnimatedProperty::Opacity, 0.2, 1.0, 2.0).with_delay(1.0);
        assert_eq!(pulse.sample(0.5), None);
        assert_eq!(pulse.sample(1.0), Some(0.2));
    }

    #[test]
    fn once_holds_final_value() {
        let anim = Animation::fade_in(0.8, 2.0).with_easing(Easing::Linear);
        assert!((anim.sample(1.0).unwrap() - 0.4).abs() < 1e-5);
        assert!((anim.sample(10.0).unwrap() - 0.8).abs() < 1e-5);
        assert_eq!(anim.final_value(), 0.8);
    }

    #[test]
    fn loop_wraps_around() {
        let fall = Animation::tween(AnimatedProperty::TranslateY, 0.0, 100.0, 1.0)
            .with_easing(Easing::Linear)
            .looping();
        assert!((fall.sample(0.25).unwrap() - 25.0).abs() < 1e-3);
        assert!((fall.sample(1.25).unwrap() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn pulse_returns_to_rest() {
        let pulse = Animation::pulse(AnimatedProperty::Scale, 1.0, 1.1, 4.0);
        assert!(pulse.is_looping());
        assert!((pulse.sample(2.0).unwrap() - 1.1).abs() < 1e-5);
        assert!((pulse.sample(4.0).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn single_keyframe_is_constant() {
        let anim = Animation::keyframes(AnimatedProperty::Rotation, [45.0], 1.0);
        assert_eq!(anim.sample(0.3), Some(45.0));
        let empty = Animation::keyframes(AnimatedProperty::Rotation, Vec::new(), 1.0);
        assert_eq!(empty.sample(0.0), Some(0.0));
    }

    #[test]
    fn later_animation_overrides_earlier() {
        let anims = [
            Animation::grow_in(2.0).with_easing(Easing::Linear),
            Animation::pulse(AnimatedProperty::Scale, 1.0, 1.1, 4.0).with_delay(2.0),
        ];
        let early = sample_property(&anims, AnimatedProperty::Scale, 1.0, 1.0);
        assert!((early - 0.5).abs() < 1e-5);
        let late = sample_property(&anims, AnimatedProperty::Scale, 4.0, 1.0);
        assert!((late - 1.1).abs() < 1e-5);
        assert_eq!(sample_property(&anims, AnimatedProperty::Opacity, 1.0, 0.7), 0.7);
    }
}
