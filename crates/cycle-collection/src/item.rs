//! Shareable items carrying per-label selection flags

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use uuid::Uuid;

/// Stable identity of an item
pub type ItemId = Uuid;

/// Selection flags of one item
/// 
/// A label is set while the item is marked by hand (pre-selection) or while
/// at least one collection tracks it as that label's selection.
#[derive(Default)]
struct Flags {
    marks: AHashSet<String>,
    holders: AHashMap<String, usize>,
}

impl Flags {
    fn contains(&self, label: &str) -> bool {
        self.marks.contains(label) || self.holders.contains_key(label)
    }
}

struct ItemInner<T> {
    id: ItemId,
    value: T,
    flags: RwLock<Flags>,
}

/// Handle to an item
/// 
/// Clones share identity and selection flags, so one item can sit in several
/// collections at once. Items never store their position; ask a collection.
pub struct Item<T> {
    inner: Arc<ItemInner<T>>,
}

impl<T> Item<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ItemInner {
                id: Uuid::new_v4(),
                value,
                flags: RwLock::new(Flags::default()),
            }),
        }
    }
    
    pub fn id(&self) -> ItemId {
        self.inner.id
    }
    
    pub fn value(&self) -> &T {
        &self.inner.value
    }
    
    /// Whether the item carries the selection flag for `label`
    pub fn is_selected(&self, label: &str) -> bool {
        self.inner.flags.read().contains(label)
    }
    
    /// Labels the item is flagged as selected under
    pub fn selected_labels(&self) -> Vec<String> {
        let flags = self.inner.flags.read();
        let mut labels: Vec<String> = flags
            .marks
            .iter()
            .chain(flags.holders.keys())
            .cloned()
            .collect::<AHashSet<String>>()
            .into_iter()
            .collect();
        labels.sort();
        labels
    }
    
    /// Number of collections tracking this item as their selection for `label`
    pub fn holder_count(&self, label: &str) -> usize {
        self.inner.flags.read().holders.get(label).copied().unwrap_or(0)
    }
    
    /// Flag the item as selected under `label`; returns whether the flag was
    /// newly set.
    /// 
    /// Use this to pre-select an item before inserting it; a collection adopts
    /// the flag when the item's add event is processed.
    pub fn mark_selected(&self, label: &str) -> bool {
        let mut flags = self.inner.flags.write();
        let was_set = flags.contains(label);
        flags.marks.insert(label.to_string());
        !was_set
    }
    
    /// Drop a hand-set mark; holds by collections stay
    pub(crate) fn clear_mark(&self, label: &str) -> bool {
        self.inner.flags.write().marks.remove(label)
    }
    
    /// A collection starts tracking this item under `label`; a pending mark
    /// turns into that hold
    pub(crate) fn acquire(&self, label: &str) {
        let mut flags = self.inner.flags.write();
        flags.marks.remove(label);
        *flags.holders.entry(label.to_string()).or_insert(0) += 1;
    }
    
    /// A collection stops tracking this item under `label`; returns whether
    /// the flag is now clear
    pub(crate) fn release(&self, label: &str) -> bool {
        let mut flags = self.inner.flags.write();
        if let Some(count) = flags.holders.get_mut(label) {
            *count -= 1;
            if *count == 0 {
                flags.holders.remove(label);
            }
        }
        !flags.contains(label)
    }
}

impl<T> Clone for Item<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for Item<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl<T> Eq for Item<T> {}

impl<T> Hash for Item<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value)
            .field("selected", &self.selected_labels())
            .finish()
    }
}
