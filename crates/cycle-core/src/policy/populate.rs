//! Auto-selection when a collection is populated

use tracing::{debug, warn};

use super::{SelectionPolicy, SelectionPolicyHost};
use crate::error::Result;
use crate::navigation::{OrderedCollection, SelectionModel};

/// The population step that triggered auto-selection
pub(crate) enum Population<'a, I> {
    /// Setup pass over the initial items handed to the policy
    Initial(&'a [I]),
    /// The whole sequence was replaced; other subscribers may already have
    /// changed it again, so candidates come from the live host
    Reset,
    /// One item of a (possibly larger) insert
    Added { remaining: usize },
}

impl<'a, I: Clone> Population<'a, I> {
    fn len<C: OrderedCollection<Item = I>>(&self, host: &C) -> usize {
        match self {
            Population::Initial(items) => items.len(),
            Population::Reset | Population::Added { .. } => host.len(),
        }
    }
    
    fn item<C: OrderedCollection<Item = I>>(&self, host: &C, index: usize) -> Option<I> {
        match self {
            Population::Initial(items) => items.get(index).cloned(),
            Population::Reset | Population::Added { .. } => host.at(index),
        }
    }
    
    /// More add events of the same batch are still to come
    fn batch_pending(&self) -> bool {
        matches!(self, Population::Added { remaining } if *remaining > 0)
    }
}

impl<C: SelectionPolicyHost> SelectionPolicy<C> {
    /// Fill every auto-select label that has no selection yet.
    /// 
    /// Precondition: add events of one batch arrive in insertion order. While
    /// a batch is pending, a label whose sequence already holds a pre-selected
    /// item is deferred to that item's own add event (skip flag), so the scan
    /// runs at most once per batch and label.
    /// 
    /// A failed commit is returned for the setup pass; event handlers have no
    /// caller to return it to and log it instead.
    pub(crate) fn auto_select(&self, host: &C, population: Population<'_, C::Item>) -> Result<()> {
        for (label, mode) in self.options.auto_select() {
            if host.selected(label).is_some() {
                if self.clear_skip_flag(label) {
                    debug!("Selection under '{}' filled by the batch, skip flag cleared", label);
                }
                continue;
            }
            
            if self.is_skipping(label) {
                if population.batch_pending() {
                    continue;
                }
                // Batch is over and the deferred item never claimed the label
                self.clear_skip_flag(label);
                debug!("Batch finished without a selection under '{}', evaluating afresh", label);
            }
            
            let Some(index) = mode.candidate_index(population.len(host)) else {
                continue;
            };
            
            if population.batch_pending() && has_preselected(host, label) {
                self.set_skip_flag(label);
                debug!("Deferring auto-select under '{}' to a pre-selected item in the batch", label);
                continue;
            }
            
            let Some(item) = population.item(host, index) else {
                continue;
            };
            
            match host.select(&item, label) {
                Ok(()) => debug!("Auto-selected position {} under '{}' ({:?})", index, label, mode),
                Err(e) if matches!(population, Population::Initial(_)) => return Err(e),
                Err(e) => warn!("Auto-select under '{}' failed: {}", label, e),
            }
        }
        Ok(())
    }
}

fn has_preselected<C: SelectionModel + ?Sized>(host: &C, label: &str) -> bool {
    (0..host.len())
        .filter_map(|index| host.at(index))
        .any(|item| host.is_selected(&item, label))
}
