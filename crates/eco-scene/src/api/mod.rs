pub mod config;
pub mod environment_scene;
pub mod types;
