//! Cyclic navigation and label-scoped auto-selection for ordered collections
//! 
//! This crate provides positional navigation relative to an item or a
//! selection, and a selection policy that keeps a collection's per-label
//! selection populated as items are added, reset and removed. The ordered
//! collection and the single-selection bookkeeping are supplied by the host
//! through the traits in [`navigation`] and [`events`].

pub mod error;
pub mod events;
pub mod navigation;
pub mod options;
pub mod policy;

// Re-export commonly used types
pub use error::{CycleError, Result};
pub use events::{
    CollectionEvent, CollectionSubscriber, DeselectCause, EventKind,
    ObservableCollection, Subscription, SubscriptionId,
};
pub use navigation::{
    bounded_offset, looped_offset, Navigable, Navigator, OrderedCollection,
    SelectionModel, SelectionNavigable, Traversal,
};
pub use options::{AutoSelectMode, CycleOptions, RawCycleOptions, RawOption, RawValue, RemovalRepairMode};
pub use policy::{SelectionPolicy, SelectionPolicyBuilder, SelectionPolicyHost};
