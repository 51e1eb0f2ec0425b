//! Weak subscriber storage with per-kind filtering

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{CollectionEvent, CollectionSubscriber, EventKind, Subscription, SubscriptionId};

struct Registration<I> {
    id: SubscriptionId,
    kinds: Vec<EventKind>,
    subscriber: Weak<dyn CollectionSubscriber<I>>,
}

/// Subscriber list a host can embed to implement
/// [`ObservableCollection`](super::ObservableCollection)
/// 
/// No lock is held while subscribers run, so a subscriber may mutate the
/// host (and re-enter dispatch) from inside its callback.
pub struct SubscriberRegistry<I> {
    next_id: AtomicU64,
    registrations: RwLock<Vec<Registration<I>>>,
}

impl<I> SubscriberRegistry<I> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            registrations: RwLock::new(Vec::new()),
        }
    }
    
    /// Add a subscriber
    pub fn register(&self, subscriber: Weak<dyn CollectionSubscriber<I>>, kinds: &[EventKind]) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations.write().push(Registration {
            id,
            kinds: kinds.to_vec(),
            subscriber,
        });
        
        Subscription {
            id,
            kinds: kinds.to_vec(),
        }
    }
    
    /// Remove a subscriber; returns whether it was registered
    pub fn remove(&self, subscription: &Subscription) -> bool {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != subscription.id);
        registrations.len() != before
    }
    
    /// Whether any live subscriber wants events of this kind
    pub fn wants(&self, kind: EventKind) -> bool {
        self.registrations
            .read()
            .iter()
            .any(|registration| registration.kinds.contains(&kind) && registration.subscriber.strong_count() > 0)
    }
    
    /// Number of registrations, including ones whose subscriber was dropped
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    
    /// Deliver an event to every live subscriber registered for its kind
    pub fn dispatch(&self, event: &CollectionEvent<I>) {
        let kind = event.kind();
        let targets: Vec<Arc<dyn CollectionSubscriber<I>>> = {
            let mut registrations = self.registrations.write();
            
            // Remove any dead weak references
            registrations.retain(|registration| registration.subscriber.strong_count() > 0);
            
            registrations
                .iter()
                .filter(|registration| registration.kinds.contains(&kind))
                .filter_map(|registration| registration.subscriber.upgrade())
                .collect()
        };
        
        tracing::trace!("Dispatching {:?} to {} subscriber(s)", kind, targets.len());
        
        for subscriber in targets {
            subscriber.on_collection_event(event);
        }
    }
}

impl<I> Default for SubscriberRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}
