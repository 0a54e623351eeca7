pub mod clock;
pub mod scene;
pub mod time;
