pub mod artifact;
pub mod generator;
pub mod synthesizer;
