//! Reference host collection for the cycle selection policy
//! 
//! Provides shareable items with per-label selection flags and an observable
//! ordered collection with single selection per label. It implements the host
//! traits from `cycle-core`, so navigation and the selection policy can be
//! used on it directly.

pub mod collection;
pub mod config;
pub mod item;

#[cfg(test)]
mod scenarios;

// Re-exports
pub use collection::SelectableCollection;
pub use config::CollectionConfig;
pub use item::{Item, ItemId};
