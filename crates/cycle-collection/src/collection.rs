//! Observable ordered collection with single selection per label

use std::sync::{Arc, Weak};

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use tracing::{debug, warn};

use cycle_core::{
    CollectionEvent, CollectionSubscriber, CycleError, DeselectCause, EventKind,
    ObservableCollection, OrderedCollection, RawCycleOptions, Result, SelectionModel,
    SelectionPolicy, SelectionPolicyHost, Subscription,
};
use cycle_core::events::SubscriberRegistry;

use crate::config::CollectionConfig;
use crate::item::Item;

/// An ordered sequence of shared items with one selected item per label
/// 
/// All methods take `&self`; no lock is held while events are dispatched, so
/// subscribers may call back into the collection.
pub struct SelectableCollection<T: Send + Sync + 'static> {
    default_label: String,
    ignored_labels: AHashSet<String>,
    items: RwLock<Vec<Item<T>>>,
    selection: RwLock<AHashMap<String, Item<T>>>,
    subscribers: SubscriberRegistry<Item<T>>,
    policy: RwLock<Option<Arc<SelectionPolicy<SelectableCollection<T>>>>>,
}

impl<T: Send + Sync + 'static> SelectableCollection<T> {
    /// Create an empty collection with the default configuration
    pub fn new() -> Arc<Self> {
        Self::with_config(CollectionConfig::default())
    }
    
    pub fn with_config(config: CollectionConfig) -> Arc<Self> {
        Arc::new(Self {
            default_label: config.default_label,
            ignored_labels: config.ignored_labels.into_iter().collect(),
            items: RwLock::new(Vec::new()),
            selection: RwLock::new(AHashMap::new()),
            subscribers: SubscriberRegistry::new(),
            policy: RwLock::new(None),
        })
    }
    
    /// Create a collection already holding `items`, without emitting events.
    /// 
    /// Pre-selected items are adopted as the selection for their labels.
    pub fn from_items(config: CollectionConfig, items: impl IntoIterator<Item = Item<T>>) -> Arc<Self> {
        let collection = Self::with_config(config);
        collection.replace_items(items.into_iter().collect());
        collection
    }
    
    /// Create a populated collection and apply a selection policy to it,
    /// running the initial selection pass over the same items.
    pub fn with_policy(
        config: CollectionConfig,
        items: Vec<Item<T>>,
        options: RawCycleOptions,
    ) -> Result<Arc<Self>> {
        let collection = Self::from_items(config, items.iter().cloned());
        SelectionPolicy::<Self>::builder(options)
            .initial_items(items)
            .apply(&collection)?;
        Ok(collection)
    }
    
    /// Snapshot of the sequence
    pub fn items(&self) -> Vec<Item<T>> {
        self.items.read().clone()
    }
    
    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
    
    pub fn contains(&self, item: &Item<T>) -> bool {
        self.items.read().contains(item)
    }
    
    /// Append one item; returns false if it was already a member
    pub fn add(&self, item: Item<T>) -> bool {
        self.add_all([item]) == 1
    }
    
    /// Append items as one batch and announce them one by one, in order.
    /// 
    /// Members already in the collection (or repeated in the batch) are
    /// skipped. Returns how many items were inserted.
    pub fn add_all(&self, items: impl IntoIterator<Item = Item<T>>) -> usize {
        let added: Vec<(Item<T>, usize)> = {
            let mut sequence = self.items.write();
            let mut added = Vec::new();
            for item in items {
                if sequence.contains(&item) {
                    warn!("Ignoring duplicate insert of item {}", item.id());
                    continue;
                }
                sequence.push(item.clone());
                added.push((item, sequence.len() - 1));
            }
            added
        };
        
        let total = added.len();
        for (position, (item, index)) in added.into_iter().enumerate() {
            self.adopt_preselected(&item);
            self.subscribers.dispatch(&CollectionEvent::Added {
                item,
                index,
                remaining: total - position - 1,
            });
        }
        total
    }
    
    /// Remove an item, returning its former position.
    /// 
    /// Every label it held is deselected with [`DeselectCause::Removal`].
    pub fn remove(&self, item: &Item<T>) -> Result<usize> {
        let index = {
            let mut sequence = self.items.write();
            let index = sequence
                .iter()
                .position(|member| member == item)
                .ok_or(CycleError::NotAMember)?;
            sequence.remove(index);
            index
        };
        
        let labels: Vec<String> = {
            let mut selection = self.selection.write();
            let labels: Vec<String> = selection
                .iter()
                .filter(|(_, selected)| *selected == item)
                .map(|(label, _)| label.clone())
                .collect();
            for label in &labels {
                selection.remove(label);
            }
            labels
        };
        
        self.subscribers.dispatch(&CollectionEvent::Removed {
            item: item.clone(),
            index,
        });
        
        for label in labels {
            item.release(&label);
            self.subscribers.dispatch(&CollectionEvent::Deselected {
                item: item.clone(),
                label,
                former_index: index,
                cause: DeselectCause::Removal,
            });
        }
        
        Ok(index)
    }
    
    /// Replace the whole sequence and announce it as a single event
    pub fn reset(&self, items: impl IntoIterator<Item = Item<T>>) {
        self.replace_items(items.into_iter().collect());
        
        if self.subscribers.wants(EventKind::Reset) {
            self.subscribers.dispatch(&CollectionEvent::Reset { items: self.items() });
        }
    }
    
    /// Clear the selection under `label`, returning the item that held it
    pub fn deselect(&self, label: &str) -> Option<Item<T>> {
        let previous = self.selection.write().remove(label)?;
        previous.release(label);
        self.announce_deselect(&previous, label);
        Some(previous)
    }
    
    /// Replace the sequence without events, keeping selection state coherent
    fn replace_items(&self, items: Vec<Item<T>>) {
        let mut unique: Vec<Item<T>> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        
        let mut selection = self.selection.write();
        let previous = std::mem::take(&mut *selection);
        
        // First flagged item per label wins; later ones lose a hand-set mark
        for item in &unique {
            for label in item.selected_labels() {
                if self.ignored_labels.contains(&label) {
                    continue;
                }
                if selection.contains_key(&label) {
                    item.clear_mark(&label);
                } else {
                    selection.insert(label, item.clone());
                }
            }
        }
        
        // Only changed entries touch the item holds
        for (label, item) in &previous {
            if selection.get(label) != Some(item) {
                item.release(label);
            }
        }
        for (label, item) in selection.iter() {
            if previous.get(label) != Some(item) {
                item.acquire(label);
            }
        }
        
        *self.items.write() = unique;
    }
    
    /// Make an inserted item that carries selection flags the selection for
    /// those labels
    fn adopt_preselected(&self, item: &Item<T>) {
        for label in item.selected_labels() {
            if self.ignored_labels.contains(&label) {
                continue;
            }
            if let Err(e) = self.select(item, &label) {
                warn!("Could not adopt pre-selected item under '{}': {}", label, e);
            }
        }
    }
    
    fn announce_deselect(&self, item: &Item<T>, label: &str) {
        match self.index_of(item) {
            Some(former_index) => self.subscribers.dispatch(&CollectionEvent::Deselected {
                item: item.clone(),
                label: label.to_string(),
                former_index,
                cause: DeselectCause::Explicit,
            }),
            None => debug!("Deselected item {} is no longer a member", item.id()),
        }
    }
}

impl<T: Send + Sync + 'static> OrderedCollection for SelectableCollection<T> {
    type Item = Item<T>;
    
    fn len(&self) -> usize {
        self.items.read().len()
    }
    
    fn at(&self, index: usize) -> Option<Item<T>> {
        self.items.read().get(index).cloned()
    }
    
    fn index_of(&self, item: &Item<T>) -> Option<usize> {
        self.items.read().iter().position(|member| member == item)
    }
}

impl<T: Send + Sync + 'static> SelectionModel for SelectableCollection<T> {
    fn default_label(&self) -> &str {
        &self.default_label
    }
    
    fn is_ignored_label(&self, label: &str) -> bool {
        self.ignored_labels.contains(label)
    }
    
    fn selected(&self, label: &str) -> Option<Item<T>> {
        self.selection.read().get(label).cloned()
    }
    
    fn is_selected(&self, item: &Item<T>, label: &str) -> bool {
        item.is_selected(label)
    }
    
    /// Select `item` under `label`, deselecting the previous holder.
    /// 
    /// Selecting the current holder again is a no-op. Ignored labels only set
    /// the item's flag. The previous holder keeps its flag while another
    /// collection still tracks it under the same label.
    fn select(&self, item: &Item<T>, label: &str) -> Result<()> {
        if !self.contains(item) {
            return Err(CycleError::NotAMember);
        }
        
        if self.is_ignored_label(label) {
            item.mark_selected(label);
            return Ok(());
        }
        
        let previous = {
            let mut selection = self.selection.write();
            if selection.get(label) == Some(item) {
                return Ok(());
            }
            let previous = selection.insert(label.to_string(), item.clone());
            item.acquire(label);
            previous
        };
        
        if let Some(previous) = previous {
            previous.release(label);
            self.announce_deselect(&previous, label);
        }
        
        self.subscribers.dispatch(&CollectionEvent::Selected {
            item: item.clone(),
            label: label.to_string(),
        });
        Ok(())
    }
}

impl<T: Send + Sync + 'static> ObservableCollection for SelectableCollection<T> {
    fn subscribe(
        &self,
        subscriber: Weak<dyn CollectionSubscriber<Item<T>>>,
        kinds: &[EventKind],
    ) -> Subscription {
        self.subscribers.register(subscriber, kinds)
    }
    
    fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.subscribers.remove(subscription)
    }
}

impl<T: Send + Sync + 'static> SelectionPolicyHost for SelectableCollection<T> {
    fn attach_policy(&self, policy: Arc<SelectionPolicy<Self>>) -> Option<Arc<SelectionPolicy<Self>>> {
        self.policy.write().replace(policy)
    }
    
    fn selection_policy(&self) -> Option<Arc<SelectionPolicy<Self>>> {
        self.policy.read().clone()
    }
}
