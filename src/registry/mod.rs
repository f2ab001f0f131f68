pub mod reconciler;
pub mod registry;
pub mod store;
