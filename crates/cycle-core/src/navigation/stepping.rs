//! Selection-relative navigation and stepping

use super::{Navigator, SelectionModel};
use crate::error::{CycleError, Result};

/// Navigation relative to a collection's selection, plus commands that move
/// the selection itself
/// 
/// Looped steps always find an item once something is selected. The
/// `_no_loop` steps return `None` at the edges and leave the selection alone.
pub trait SelectionNavigable: SelectionModel {
    /// Navigator anchored at the item selected under `label`
    fn navigate_selected(&self, label: &str) -> Result<Navigator<'_, Self>> {
        Navigator::from_selection(self, label)
    }
    
    /// Select the item at `index` under `label`
    fn select_at(&self, index: usize, label: &str) -> Result<Self::Item> {
        let item = self.at(index).ok_or(CycleError::OutOfRange {
            index,
            len: self.len(),
        })?;
        self.select(&item, label)?;
        Ok(item)
    }
    
    fn select_ahead(&self, n: isize, label: &str) -> Result<Self::Item> {
        let item = self.navigate_selected(label)?.ahead(n)?;
        self.select(&item, label)?;
        Ok(item)
    }
    
    fn select_behind(&self, n: isize, label: &str) -> Result<Self::Item> {
        let item = self.navigate_selected(label)?.behind(n)?;
        self.select(&item, label)?;
        Ok(item)
    }
    
    fn select_next(&self, label: &str) -> Result<Self::Item> {
        self.select_ahead(1, label)
    }
    
    fn select_prev(&self, label: &str) -> Result<Self::Item> {
        self.select_behind(1, label)
    }
    
    fn select_ahead_no_loop(&self, n: isize, label: &str) -> Result<Option<Self::Item>> {
        let target = self.navigate_selected(label)?.ahead_no_loop(n);
        commit_optional(self, target, label)
    }
    
    fn select_behind_no_loop(&self, n: isize, label: &str) -> Result<Option<Self::Item>> {
        let target = self.navigate_selected(label)?.behind_no_loop(n);
        commit_optional(self, target, label)
    }
    
    fn select_next_no_loop(&self, label: &str) -> Result<Option<Self::Item>> {
        self.select_ahead_no_loop(1, label)
    }
    
    fn select_prev_no_loop(&self, label: &str) -> Result<Option<Self::Item>> {
        self.select_behind_no_loop(1, label)
    }
}

impl<C: SelectionModel + ?Sized> SelectionNavigable for C {}

fn commit_optional<C: SelectionModel + ?Sized>(
    collection: &C,
    target: Option<C::Item>,
    label: &str,
) -> Result<Option<C::Item>> {
    match target {
        Some(item) => {
            collection.select(&item, label)?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}
