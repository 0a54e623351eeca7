// extensions/mod.rs
//
// Animation building blocks. Decoupled from the scene model: an element just
// carries a list of descriptors, and any runtime can interpret them.

pub mod animation;
pub mod easing;

pub use animation::{sample_property, AnimatedProperty, Animation, Repeat};
pub use easing::{ease, lerp, Easing};
