//! Navigator view anchored at a reference position

use super::offset::{bounded_shift, looped_shift};
use super::{OrderedCollection, SelectionModel};
use crate::error::{CycleError, Result};

/// A reference position within one collection
/// 
/// Built from an item or from the collection's selection under a label.
/// Every target is looked up against the borrowed collection at call time.
pub struct Navigator<'a, C: OrderedCollection + ?Sized> {
    collection: &'a C,
    reference: usize,
}

impl<'a, C: OrderedCollection + ?Sized> Navigator<'a, C> {
    /// Anchor at an item's current position in `collection`.
    /// 
    /// Fails with [`CycleError::NotAMember`] if the item is not in it.
    pub fn from_item(collection: &'a C, item: &C::Item) -> Result<Self> {
        let reference = collection.index_of(item).ok_or(CycleError::NotAMember)?;
        Ok(Self { collection, reference })
    }
    
    /// Anchor at the item currently selected under `label`.
    /// 
    /// Fails with [`CycleError::NoSelection`] if nothing holds that label.
    pub fn from_selection(collection: &'a C, label: &str) -> Result<Self>
    where
        C: SelectionModel,
    {
        let selected = collection.selected(label).ok_or_else(|| CycleError::NoSelection {
            label: label.to_string(),
        })?;
        Self::from_item(collection, &selected)
    }
    
    /// Reference position
    pub fn index(&self) -> usize {
        self.reference
    }
    
    /// Position `n` steps ahead, wrapping around
    pub fn ahead_index(&self, n: isize) -> Result<usize> {
        looped_shift(self.reference, n as i128, self.collection.len())
    }
    
    /// Position `n` steps behind, wrapping around
    pub fn behind_index(&self, n: isize) -> Result<usize> {
        looped_shift(self.reference, -(n as i128), self.collection.len())
    }
    
    /// Position `n` steps ahead, if still inside the sequence
    pub fn ahead_index_no_loop(&self, n: isize) -> Option<usize> {
        bounded_shift(self.reference, n as i128, self.collection.len())
    }
    
    /// Position `n` steps behind, if still inside the sequence
    pub fn behind_index_no_loop(&self, n: isize) -> Option<usize> {
        bounded_shift(self.reference, -(n as i128), self.collection.len())
    }
    
    pub fn ahead(&self, n: isize) -> Result<C::Item> {
        let index = self.ahead_index(n)?;
        self.item_at(index)
    }
    
    pub fn behind(&self, n: isize) -> Result<C::Item> {
        let index = self.behind_index(n)?;
        self.item_at(index)
    }
    
    pub fn next(&self) -> Result<C::Item> {
        self.ahead(1)
    }
    
    pub fn prev(&self) -> Result<C::Item> {
        self.behind(1)
    }
    
    pub fn ahead_no_loop(&self, n: isize) -> Option<C::Item> {
        self.ahead_index_no_loop(n)
            .and_then(|index| self.collection.at(index))
    }
    
    pub fn behind_no_loop(&self, n: isize) -> Option<C::Item> {
        self.behind_index_no_loop(n)
            .and_then(|index| self.collection.at(index))
    }
    
    pub fn next_no_loop(&self) -> Option<C::Item> {
        self.ahead_no_loop(1)
    }
    
    pub fn prev_no_loop(&self) -> Option<C::Item> {
        self.behind_no_loop(1)
    }
    
    fn item_at(&self, index: usize) -> Result<C::Item> {
        self.collection.at(index).ok_or(CycleError::OutOfRange {
            index,
            len: self.collection.len(),
        })
    }
}

/// Navigation capability for any ordered collection
pub trait Navigable: OrderedCollection {
    /// Navigator anchored at `item`'s position in this collection
    fn navigate_from(&self, item: &Self::Item) -> Result<Navigator<'_, Self>> {
        Navigator::from_item(self, item)
    }
}

impl<C: OrderedCollection + ?Sized> Navigable for C {}
