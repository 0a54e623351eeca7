pub mod background;
pub mod overlay;
pub mod particles;
pub mod tree;
pub mod widget;
#[cfg(feature = "vectors")]
pub mod vector;
