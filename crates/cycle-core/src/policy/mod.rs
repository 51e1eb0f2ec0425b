//! Label-scoped auto-selection and selection repair
//! 
//! A [`SelectionPolicy`] is applied to a host collection once. It validates
//! its options up front, subscribes only to the lifecycle events its active
//! labels need, and commits selections exclusively through the host's
//! [`SelectionModel::select`](crate::navigation::SelectionModel::select).

use std::sync::{Arc, Weak};

use ahash::AHashSet;
use parking_lot::Mutex;

use crate::error::{CycleError, Result};
use crate::events::{CollectionEvent, CollectionSubscriber, EventKind, ObservableCollection, Subscription};
use crate::options::{CycleOptions, RawCycleOptions};

mod populate;
mod repair;

use populate::Population;

/// Capability of a host collection to carry a selection policy
/// 
/// The host keeps the policy alive; the policy only holds the host weakly.
pub trait SelectionPolicyHost: ObservableCollection + Send + Sync + Sized + 'static {
    /// Store `policy`, returning the one it replaces
    fn attach_policy(&self, policy: Arc<SelectionPolicy<Self>>) -> Option<Arc<SelectionPolicy<Self>>>;
    
    /// The policy currently applied to this host
    fn selection_policy(&self) -> Option<Arc<SelectionPolicy<Self>>>;
    
    /// Normalized options of the applied policy
    fn cycle_options(&self) -> Option<CycleOptions> {
        self.selection_policy().map(|policy| policy.options().clone())
    }
}

/// Stateful auto-select / selection-repair orchestration for one collection
pub struct SelectionPolicy<C: SelectionPolicyHost> {
    host: Weak<C>,
    options: CycleOptions,
    /// Labels whose auto-selection is deferred to a later add event of the
    /// current batch
    skip_flags: Mutex<AHashSet<String>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl<C: SelectionPolicyHost> SelectionPolicy<C> {
    /// Start configuring a policy from raw options
    pub fn builder(options: RawCycleOptions) -> SelectionPolicyBuilder<C::Item> {
        SelectionPolicyBuilder::new(options)
    }
    
    /// Normalized options
    pub fn options(&self) -> &CycleOptions {
        &self.options
    }
    
    /// The host this policy was applied to, if it is still alive
    pub fn host(&self) -> Option<Arc<C>> {
        self.host.upgrade()
    }
    
    /// Active subscriptions created at setup
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.lock().clone()
    }
    
    /// Whether auto-selection for `label` is currently deferred
    pub fn is_skipping(&self, label: &str) -> bool {
        self.skip_flags.lock().contains(label)
    }
    
    /// Cancel every subscription made at setup; returns how many were active.
    /// 
    /// Normalized options stay readable, but no further events are handled.
    pub fn teardown(&self) -> usize {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        self.skip_flags.lock().clear();
        
        let Some(host) = self.host.upgrade() else {
            return 0;
        };
        
        let cancelled = subscriptions
            .iter()
            .filter(|subscription| host.unsubscribe(subscription))
            .count();
        tracing::debug!("Selection policy torn down, {} subscription(s) cancelled", cancelled);
        cancelled
    }
    
    fn set_skip_flag(&self, label: &str) {
        self.skip_flags.lock().insert(label.to_string());
    }
    
    fn clear_skip_flag(&self, label: &str) -> bool {
        self.skip_flags.lock().remove(label)
    }
}

impl<C: SelectionPolicyHost> CollectionSubscriber<C::Item> for SelectionPolicy<C> {
    fn on_collection_event(&self, event: &CollectionEvent<C::Item>) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        
        match event {
            CollectionEvent::Added { remaining, .. } => {
                let _ = self.auto_select(&host, Population::Added { remaining: *remaining });
            }
            CollectionEvent::Reset { .. } => {
                let _ = self.auto_select(&host, Population::Reset);
            }
            CollectionEvent::Deselected {
                label,
                former_index,
                cause,
                ..
            } => {
                self.repair_selection(&host, label, *former_index, *cause);
            }
            CollectionEvent::Removed { .. } | CollectionEvent::Selected { .. } => {}
        }
    }
}

/// Setup for a [`SelectionPolicy`]
/// 
/// Initial items are a required argument: applying without ever calling
/// [`initial_items`](Self::initial_items) or
/// [`without_initial_items`](Self::without_initial_items) fails.
pub struct SelectionPolicyBuilder<I> {
    options: RawCycleOptions,
    initial_items: Option<Vec<I>>,
}

impl<I: Clone> SelectionPolicyBuilder<I> {
    pub fn new(options: RawCycleOptions) -> Self {
        Self {
            options,
            initial_items: None,
        }
    }
    
    /// Items the host was populated with; the initial selection pass runs
    /// over them like a reset
    pub fn initial_items(mut self, items: impl IntoIterator<Item = I>) -> Self {
        self.initial_items = Some(items.into_iter().collect());
        self
    }
    
    /// Explicitly pass no initial items
    pub fn without_initial_items(mut self) -> Self {
        self.initial_items = Some(Vec::new());
        self
    }
    
    /// Validate options, run the initial selection pass and subscribe to the
    /// host.
    /// 
    /// Nothing is subscribed or attached if validation or the initial pass
    /// fails; a failing initial pass may already have committed selections
    /// for labels before the failing one. A policy already attached to the
    /// host is torn down and replaced.
    pub fn apply<C>(self, host: &Arc<C>) -> Result<Arc<SelectionPolicy<C>>>
    where
        C: SelectionPolicyHost<Item = I>,
    {
        let initial_items = self
            .initial_items
            .ok_or(CycleError::MissingArgument("initial items"))?;
        let options = CycleOptions::normalize(&self.options, &**host)?;
        
        let policy = Arc::new(SelectionPolicy {
            host: Arc::downgrade(host),
            options,
            skip_flags: Mutex::new(AHashSet::new()),
            subscriptions: Mutex::new(Vec::new()),
        });
        
        // Initial pass first, so a failed commit leaves no subscription behind
        policy.auto_select(host, Population::Initial(initial_items.as_slice()))?;
        
        let mut kinds = Vec::new();
        if policy.options.has_auto_select() {
            kinds.extend([EventKind::Added, EventKind::Reset]);
        }
        if policy.options.has_selection_repair() {
            kinds.push(EventKind::Deselected);
        }
        
        if !kinds.is_empty() {
            let subscriber: Arc<dyn CollectionSubscriber<I>> = policy.clone();
            let subscription = host.subscribe(Arc::downgrade(&subscriber), &kinds);
            policy.subscriptions.lock().push(subscription);
        }
        
        if let Some(previous) = host.attach_policy(policy.clone()) {
            previous.teardown();
        }
        
        tracing::debug!(
            "Selection policy applied: {} auto-select label(s), {} repair label(s), {} initial item(s)",
            policy.options.auto_select().len(),
            policy.options.select_if_removed().len(),
            initial_items.len()
        );
        
        Ok(policy)
    }
}
