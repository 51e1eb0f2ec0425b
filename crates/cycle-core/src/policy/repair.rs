//! Selection repair after the selected item is removed

use tracing::{debug, warn};

use super::{SelectionPolicy, SelectionPolicyHost};
use crate::events::DeselectCause;

impl<C: SelectionPolicyHost> SelectionPolicy<C> {
    /// Hand `label` to a neighbour of the removed item.
    /// 
    /// Explicit deselects are left alone, as are labels without a repair
    /// policy and collections that are now empty.
    pub(crate) fn repair_selection(&self, host: &C, label: &str, former_index: usize, cause: DeselectCause) {
        if cause != DeselectCause::Removal {
            return;
        }
        
        let Some(mode) = self.options.select_if_removed_for(label) else {
            return;
        };
        
        let Some(index) = mode.resolve(former_index, host.len()) else {
            return;
        };
        
        let Some(item) = host.at(index) else {
            return;
        };
        
        match host.select(&item, label) {
            Ok(()) => debug!(
                "Removed item at {} under '{}', selected position {} ({:?})",
                former_index, label, index, mode
            ),
            Err(e) => warn!("Selection repair under '{}' failed: {}", label, e),
        }
    }
}
