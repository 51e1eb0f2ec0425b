//! Collection configuration

use serde::{Deserialize, Serialize};

/// Label used when no default label is configured
pub const DEFAULT_LABEL: &str = "selected";

/// Labels a collection tracks selection for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Label that scalar policy options apply to
    pub default_label: String,
    /// Labels whose selection the collection does not track
    pub ignored_labels: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            default_label: DEFAULT_LABEL.to_string(),
            ignored_labels: Vec::new(),
        }
    }
}

impl CollectionConfig {
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }
    
    pub fn ignore_label(mut self, label: impl Into<String>) -> Self {
        self.ignored_labels.push(label.into());
        self
    }
}
