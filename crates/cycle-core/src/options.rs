//! Selection-policy options: raw setup values and their normalized form
//! 
//! Raw options accept either a single scalar (applied to the collection's
//! default label) or a map from label to value. Normalization validates every
//! value, expands scalars, prunes disabled entries and rejects ignored labels,
//! so presence in a normalized map means the policy is active for that label.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CycleError, Result};
use crate::navigation::{bounded_offset, looped_offset, SelectionModel, Traversal};

pub const AUTO_SELECT: &str = "autoSelect";
pub const SELECT_IF_REMOVED: &str = "selectIfRemoved";

/// A single raw option value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Index(i64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Index(index) => write!(f, "{}", index),
            RawValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Index(value)
    }
}

/// A raw option: one scalar for the default label, or one value per label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    Scalar(RawValue),
    PerLabel(IndexMap<String, RawValue>),
}

impl From<RawValue> for RawOption {
    fn from(value: RawValue) -> Self {
        RawOption::Scalar(value)
    }
}

impl From<&str> for RawOption {
    fn from(value: &str) -> Self {
        RawOption::Scalar(value.into())
    }
}

impl From<String> for RawOption {
    fn from(value: String) -> Self {
        RawOption::Scalar(value.into())
    }
}

impl From<i64> for RawOption {
    fn from(value: i64) -> Self {
        RawOption::Scalar(value.into())
    }
}

impl From<IndexMap<String, RawValue>> for RawOption {
    fn from(values: IndexMap<String, RawValue>) -> Self {
        RawOption::PerLabel(values)
    }
}

impl RawOption {
    fn set_label(self, label: &str, value: RawValue) -> Self {
        let mut map = match self {
            RawOption::PerLabel(map) => map,
            RawOption::Scalar(_) => IndexMap::new(),
        };
        map.insert(label.to_string(), value);
        RawOption::PerLabel(map)
    }
}

/// Options as supplied at setup time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCycleOptions {
    pub auto_select: Option<RawOption>,
    pub select_if_removed: Option<RawOption>,
}

impl RawCycleOptions {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Parse options from JSON text, e.g. `{"autoSelect": "first"}`
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
    
    pub fn auto_select(mut self, value: impl Into<RawOption>) -> Self {
        self.auto_select = Some(value.into());
        self
    }
    
    /// Set the auto-select value for one label.
    /// 
    /// A previously set scalar is replaced by the per-label map.
    pub fn auto_select_for(mut self, label: &str, value: impl Into<RawValue>) -> Self {
        let current = self.auto_select.take().unwrap_or(RawOption::PerLabel(IndexMap::new()));
        self.auto_select = Some(current.set_label(label, value.into()));
        self
    }
    
    pub fn select_if_removed(mut self, value: impl Into<RawOption>) -> Self {
        self.select_if_removed = Some(value.into());
        self
    }
    
    /// Set the removal-repair value for one label.
    /// 
    /// A previously set scalar is replaced by the per-label map.
    pub fn select_if_removed_for(mut self, label: &str, value: impl Into<RawValue>) -> Self {
        let current = self.select_if_removed.take().unwrap_or(RawOption::PerLabel(IndexMap::new()));
        self.select_if_removed = Some(current.set_label(label, value.into()));
        self
    }
}

/// A validated per-label option value
trait OptionMode: Sized + Copy {
    const OPTION: &'static str;
    
    fn parse(value: &RawValue, label: Option<&str>) -> Result<Self>;
    
    fn is_disabled(&self) -> bool;
}

fn invalid(option: &'static str, value: &RawValue, label: Option<&str>) -> CycleError {
    CycleError::InvalidOption {
        option,
        value: value.to_string(),
        label: label.map(str::to_string),
    }
}

/// Which item to select when a label has no selection after population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawValue", try_from = "RawValue")]
pub enum AutoSelectMode {
    None,
    First,
    Last,
    /// A configured position; out-of-range positions select nothing
    Index(i64),
}

impl AutoSelectMode {
    /// Candidate position within a sequence of `len` items
    pub fn candidate_index(&self, len: usize) -> Option<usize> {
        match *self {
            AutoSelectMode::None => None,
            AutoSelectMode::First => bounded_offset(0, 0, len),
            AutoSelectMode::Last => len.checked_sub(1),
            AutoSelectMode::Index(index) => {
                let index = isize::try_from(index).ok()?;
                bounded_offset(0, index, len)
            }
        }
    }
}

impl OptionMode for AutoSelectMode {
    const OPTION: &'static str = AUTO_SELECT;
    
    fn parse(value: &RawValue, label: Option<&str>) -> Result<Self> {
        match value {
            RawValue::Index(index) => Ok(AutoSelectMode::Index(*index)),
            RawValue::Text(text) => match text.as_str() {
                "none" => Ok(AutoSelectMode::None),
                "first" => Ok(AutoSelectMode::First),
                "last" => Ok(AutoSelectMode::Last),
                other => match other.parse::<i64>() {
                    // Only literals that print back identically, so "01" or "+2" are rejected
                    Ok(index) if index.to_string() == other => Ok(AutoSelectMode::Index(index)),
                    _ => Err(invalid(Self::OPTION, value, label)),
                },
            },
        }
    }
    
    fn is_disabled(&self) -> bool {
        matches!(self, AutoSelectMode::None)
    }
}

impl FromStr for AutoSelectMode {
    type Err = CycleError;
    
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&RawValue::from(s), None)
    }
}

impl TryFrom<RawValue> for AutoSelectMode {
    type Error = CycleError;
    
    fn try_from(value: RawValue) -> Result<Self> {
        Self::parse(&value, None)
    }
}

impl From<AutoSelectMode> for RawValue {
    fn from(mode: AutoSelectMode) -> Self {
        match mode {
            AutoSelectMode::None => RawValue::from("none"),
            AutoSelectMode::First => RawValue::from("first"),
            AutoSelectMode::Last => RawValue::from("last"),
            AutoSelectMode::Index(index) => RawValue::Index(index),
        }
    }
}

/// Which neighbour inherits a label when its selected item is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawValue", try_from = "RawValue")]
pub enum RemovalRepairMode {
    None,
    Prev,
    Next,
    PrevNoLoop,
    NextNoLoop,
}

impl RemovalRepairMode {
    /// Position to select after the item at `former_index` was removed,
    /// leaving `len` items.
    /// 
    /// "Next" keeps the former index (the item that shifted into that slot),
    /// "prev" steps back one. Looped modes wrap; no-loop modes clamp to the
    /// ends of the sequence.
    pub fn resolve(&self, former_index: usize, len: usize) -> Option<usize> {
        let (delta, traversal) = match self {
            RemovalRepairMode::None => return None,
            RemovalRepairMode::Prev => (-1, Traversal::Looped),
            RemovalRepairMode::Next => (0, Traversal::Looped),
            RemovalRepairMode::PrevNoLoop => (-1, Traversal::Bounded),
            RemovalRepairMode::NextNoLoop => (0, Traversal::Bounded),
        };
        
        if len == 0 {
            return None;
        }
        
        match traversal {
            Traversal::Looped => looped_offset(former_index, delta, len).ok(),
            Traversal::Bounded => {
                let target = former_index as i128 + delta as i128;
                Some(target.clamp(0, len as i128 - 1) as usize)
            }
        }
    }
}

impl OptionMode for RemovalRepairMode {
    const OPTION: &'static str = SELECT_IF_REMOVED;
    
    fn parse(value: &RawValue, label: Option<&str>) -> Result<Self> {
        let RawValue::Text(text) = value else {
            return Err(invalid(Self::OPTION, value, label));
        };
        match text.as_str() {
            "none" => Ok(RemovalRepairMode::None),
            "prev" => Ok(RemovalRepairMode::Prev),
            "next" => Ok(RemovalRepairMode::Next),
            "prevNoLoop" => Ok(RemovalRepairMode::PrevNoLoop),
            "nextNoLoop" => Ok(RemovalRepairMode::NextNoLoop),
            _ => Err(invalid(Self::OPTION, value, label)),
        }
    }
    
    fn is_disabled(&self) -> bool {
        matches!(self, RemovalRepairMode::None)
    }
}

impl FromStr for RemovalRepairMode {
    type Err = CycleError;
    
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(&RawValue::from(s), None)
    }
}

impl TryFrom<RawValue> for RemovalRepairMode {
    type Error = CycleError;
    
    fn try_from(value: RawValue) -> Result<Self> {
        Self::parse(&value, None)
    }
}

impl From<RemovalRepairMode> for RawValue {
    fn from(mode: RemovalRepairMode) -> Self {
        let text = match mode {
            RemovalRepairMode::None => "none",
            RemovalRepairMode::Prev => "prev",
            RemovalRepairMode::Next => "next",
            RemovalRepairMode::PrevNoLoop => "prevNoLoop",
            RemovalRepairMode::NextNoLoop => "nextNoLoop",
        };
        RawValue::from(text)
    }
}

/// Normalized, validated per-label policy configuration
/// 
/// Only serializable: the only way in is [`CycleOptions::normalize`], so a
/// present entry always means an active, non-ignored label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleOptions {
    auto_select: IndexMap<String, AutoSelectMode>,
    select_if_removed: IndexMap<String, RemovalRepairMode>,
}

impl CycleOptions {
    /// Validate and normalize raw options against a selection model.
    pub fn normalize<M: SelectionModel + ?Sized>(raw: &RawCycleOptions, model: &M) -> Result<Self> {
        Self::normalize_with(raw, model.default_label(), |label| model.is_ignored_label(label))
    }
    
    /// Validate and normalize raw options given a default label and an
    /// ignored-label predicate.
    pub fn normalize_with(
        raw: &RawCycleOptions,
        default_label: &str,
        is_ignored: impl Fn(&str) -> bool,
    ) -> Result<Self> {
        let auto_select = parse_option::<AutoSelectMode>(raw.auto_select.as_ref(), default_label)?;
        let select_if_removed = parse_option::<RemovalRepairMode>(raw.select_if_removed.as_ref(), default_label)?;
        
        let options = Self {
            auto_select: prune(auto_select),
            select_if_removed: prune(select_if_removed),
        };
        
        check_ignored(AUTO_SELECT, options.auto_select.keys(), &is_ignored)?;
        check_ignored(SELECT_IF_REMOVED, options.select_if_removed.keys(), &is_ignored)?;
        
        Ok(options)
    }
    
    /// Active auto-select policies, keyed by label
    pub fn auto_select(&self) -> &IndexMap<String, AutoSelectMode> {
        &self.auto_select
    }
    
    /// Active removal-repair policies, keyed by label
    pub fn select_if_removed(&self) -> &IndexMap<String, RemovalRepairMode> {
        &self.select_if_removed
    }
    
    pub fn auto_select_for(&self, label: &str) -> Option<AutoSelectMode> {
        self.auto_select.get(label).copied()
    }
    
    pub fn select_if_removed_for(&self, label: &str) -> Option<RemovalRepairMode> {
        self.select_if_removed.get(label).copied()
    }
    
    /// Whether any label has an active auto-select policy
    pub fn has_auto_select(&self) -> bool {
        !self.auto_select.is_empty()
    }
    
    /// Whether any label has an active removal-repair policy
    pub fn has_selection_repair(&self) -> bool {
        !self.select_if_removed.is_empty()
    }
}

fn parse_option<M: OptionMode>(raw: Option<&RawOption>, default_label: &str) -> Result<IndexMap<String, M>> {
    let mut parsed = IndexMap::new();
    match raw {
        None => {}
        Some(RawOption::Scalar(value)) => {
            parsed.insert(default_label.to_string(), M::parse(value, None)?);
        }
        Some(RawOption::PerLabel(values)) => {
            for (label, value) in values {
                parsed.insert(label.clone(), M::parse(value, Some(label))?);
            }
        }
    }
    Ok(parsed)
}

fn prune<M: OptionMode>(mut parsed: IndexMap<String, M>) -> IndexMap<String, M> {
    parsed.retain(|_, mode| !mode.is_disabled());
    parsed
}

fn check_ignored<'a>(
    option: &'static str,
    labels: impl Iterator<Item = &'a String>,
    is_ignored: &impl Fn(&str) -> bool,
) -> Result<()> {
    for label in labels {
        if is_ignored(label) {
            return Err(CycleError::IgnoredLabel {
                option,
                label: label.clone(),
            });
        }
    }
    Ok(())
}
