//! Collection lifecycle events and explicit subscriptions
//! 
//! Hosts announce mutations as [`CollectionEvent`]s. Subscribers are held
//! weakly and only receive the kinds they registered for; every
//! registration is an explicit [`Subscription`] that can be cancelled.

use std::sync::Weak;

use crate::navigation::SelectionModel;

mod registry;

pub use registry::SubscriberRegistry;

/// Why an item lost its selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeselectCause {
    /// The item was removed from the collection
    Removal,
    /// Deselected by an explicit call, or replaced by another selection
    Explicit,
}

/// Event categories used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Added,
    Removed,
    Reset,
    Selected,
    Deselected,
}

/// Lifecycle events emitted by an observable collection
#[derive(Debug, Clone)]
pub enum CollectionEvent<I> {
    /// One item was inserted.
    /// 
    /// A batch insert emits one event per item, in insertion order, after all
    /// of the batch is in the sequence. `remaining` counts the batch items
    /// still to be announced after this one.
    Added { item: I, index: usize, remaining: usize },
    /// One item was removed from `index`
    Removed { item: I, index: usize },
    /// The whole sequence was replaced
    Reset { items: Vec<I> },
    Selected { item: I, label: String },
    /// An item lost the selection under `label`; `former_index` is its
    /// position before any removal
    Deselected {
        item: I,
        label: String,
        former_index: usize,
        cause: DeselectCause,
    },
}

impl<I> CollectionEvent<I> {
    pub fn kind(&self) -> EventKind {
        match self {
            CollectionEvent::Added { .. } => EventKind::Added,
            CollectionEvent::Removed { .. } => EventKind::Removed,
            CollectionEvent::Reset { .. } => EventKind::Reset,
            CollectionEvent::Selected { .. } => EventKind::Selected,
            CollectionEvent::Deselected { .. } => EventKind::Deselected,
        }
    }
}

/// Trait for components that react to collection lifecycle events
pub trait CollectionSubscriber<I>: Send + Sync {
    /// Called synchronously while the host dispatches an event
    fn on_collection_event(&self, event: &CollectionEvent<I>);
}

/// Identifier of one registration with a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Handle to a registration; pass it back to cancel it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriptionId,
    kinds: Vec<EventKind>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
    
    /// Event kinds this registration receives
    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }
}

/// A selection model that announces its lifecycle events
pub trait ObservableCollection: SelectionModel {
    /// Register a subscriber for the given event kinds
    fn subscribe(
        &self,
        subscriber: Weak<dyn CollectionSubscriber<Self::Item>>,
        kinds: &[EventKind],
    ) -> Subscription;
    
    /// Cancel a registration; returns whether it was still active
    fn unsubscribe(&self, subscription: &Subscription) -> bool;
}
