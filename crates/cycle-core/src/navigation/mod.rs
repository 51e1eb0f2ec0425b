//! Positional navigation over ordered collections
//! 
//! Positions are always looked up against an explicitly supplied collection,
//! so an item shared by several collections never carries "its" index.

use crate::error::Result;

mod navigator;
mod offset;
mod stepping;

pub use navigator::{Navigable, Navigator};
pub use offset::{bounded_offset, looped_offset};
pub use stepping::SelectionNavigable;

/// Traversal modes supported by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Wraps around the sequence boundary
    Looped,
    /// Yields no position past the sequence boundary
    Bounded,
}

impl Traversal {
    /// Resolve `reference + n` over a sequence of `len` items.
    /// 
    /// Looped traversal over an empty sequence is an error; bounded traversal
    /// simply has no position.
    pub fn resolve(self, reference: usize, n: isize, len: usize) -> Result<Option<usize>> {
        match self {
            Traversal::Looped => looped_offset(reference, n, len).map(Some),
            Traversal::Bounded => Ok(bounded_offset(reference, n, len)),
        }
    }
}

/// Read access to an ordered sequence of items
/// 
/// Implemented by the host collection. Positions are 0-based and recomputed
/// by the host after every mutation.
pub trait OrderedCollection {
    /// Handle to an item; cloning must be cheap and preserve identity
    type Item: Clone;
    
    /// Number of items in the sequence
    fn len(&self) -> usize;
    
    /// Whether the sequence is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    
    /// Item at a position
    fn at(&self, index: usize) -> Option<Self::Item>;
    
    /// Current position of an item, if it is a member
    fn index_of(&self, item: &Self::Item) -> Option<usize>;
}

/// The single-selection primitive supplied by the host
/// 
/// Tracks at most one selected item per label. The selection policy only
/// ever commits selections through [`SelectionModel::select`].
pub trait SelectionModel: OrderedCollection {
    /// Label used when options are given as a single scalar
    fn default_label(&self) -> &str;
    
    /// Whether selection tracking is suppressed for a label
    fn is_ignored_label(&self, label: &str) -> bool;
    
    /// Currently selected item under a label
    fn selected(&self, label: &str) -> Option<Self::Item>;
    
    /// Whether an item carries the selection flag for a label
    fn is_selected(&self, item: &Self::Item, label: &str) -> bool;
    
    /// Select an item under a label, emitting the host's selection events
    fn select(&self, item: &Self::Item, label: &str) -> Result<()>;
}
