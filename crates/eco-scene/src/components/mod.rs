pub mod element;
pub mod layer;
pub mod paint;
pub mod shape;
