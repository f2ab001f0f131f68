pub mod resolver;
pub mod strategy;
