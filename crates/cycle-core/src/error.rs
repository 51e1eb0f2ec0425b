//! Error types shared by navigation and the selection policy

use thiserror::Error;

/// Errors raised by navigation and selection-policy setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Item is not a member of the collection")]
    NotAMember,
    
    #[error("No item is selected under label '{label}', nothing to navigate from")]
    NoSelection { label: String },
    
    #[error("Cannot navigate an empty collection")]
    EmptyCollection,
    
    #[error("Index {index} out of bounds (length: {len})")]
    OutOfRange { index: usize, len: usize },
    
    #[error("Invalid {option} value '{value}'{}", label_context(.label))]
    InvalidOption {
        option: &'static str,
        value: String,
        label: Option<String>,
    },
    
    #[error("Label '{label}' is used by {option} but ignored by the selection model")]
    IgnoredLabel { option: &'static str, label: String },
    
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    
    #[error("Configuration error: {0}")]
    Config(String),
}

fn label_context(label: &Option<String>) -> String {
    match label {
        Some(label) => format!(" (in the per-label map, for label '{}')", label),
        None => String::new(),
    }
}

impl From<serde_json::Error> for CycleError {
    fn from(error: serde_json::Error) -> Self {
        CycleError::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CycleError>;
