pub mod analyzer;
pub mod classifier;
pub mod intent;
pub mod platform;
pub mod screen_model;
