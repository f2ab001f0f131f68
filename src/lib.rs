pub mod browser;
pub mod cli;
pub mod error;
pub mod locator;
pub mod orchestrator;
pub mod registry;
pub mod screen;
pub mod synth;
pub mod trace;
