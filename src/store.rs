//! View-scoped filter-state store.
//!
//! Every accepted update replaces the whole state, notifies subscribers and
//! then asks the navigation collaborator to reflect the new query string.

use super::{
    codec,
    definition::FilterSchema,
    errors::StoreError,
    result::StoreResult,
    state::FilterState,
};
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Receives the encoded query string after each state change.
pub trait NavigationSink: Send + Sync {
    fn push_query(&self, query: &str);
}

/// Navigation sink that ignores every push.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardNavigation;

impl NavigationSink for DiscardNavigation {
    fn push_query(&self, _query: &str) {}
}

pub type Subscriber = Arc<dyn Fn(&FilterState) + Send + Sync>;

pub struct FilterStore {
    schema: Arc<FilterSchema>,
    defaults: Arc<FilterState>,
    current: ArcSwap<FilterState>,
    subscribers: RwLock<Vec<Subscriber>>,
    navigation: Arc<dyn NavigationSink>,
    write_lock: RwLock<()>,
}

impl FilterStore {
    pub fn new(schema: Arc<FilterSchema>, navigation: Arc<dyn NavigationSink>) -> Self {
        let defaults = FilterState::defaults(&schema);
        Self {
            current: ArcSwap::from_pointee(FilterState::initialize(&defaults)),
            defaults: Arc::new(defaults),
            schema,
            subscribers: RwLock::new(Vec::new()),
            navigation,
            write_lock: RwLock::new(()),
        }
    }

    /// Store seeded with the defaults overlaid by `initial`, without
    /// publishing anything.
    pub fn with_initial(
        schema: Arc<FilterSchema>,
        navigation: Arc<dyn NavigationSink>,
        initial: &FilterState,
    ) -> StoreResult<Self> {
        let store = Self::new(schema, navigation);
        store.validate(initial)?;
        let seeded = store.current.load().update(initial);
        store.current.store(Arc::new(seeded));
        Ok(store)
    }

    pub fn schema(&self) -> &Arc<FilterSchema> {
        &self.schema
    }

    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    pub fn snapshot(&self) -> Arc<FilterState> {
        self.current.load_full()
    }

    pub fn query_string(&self) -> String {
        codec::encode(&self.current.load(), &self.schema)
    }

    pub fn subscribe<F>(&self, subscriber: F)
    where
        F: Fn(&FilterState) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Arc::new(subscriber));
    }

    fn validate(&self, partial: &FilterState) -> StoreResult<()> {
        for (key, value) in partial {
            let kind = self.schema.kind(key).ok_or_else(|| StoreError::UnknownKey {
                key: key.clone(),
            })?;
            if !value.matches_kind(kind) {
                return Err(StoreError::KindMismatch {
                    key: key.clone(),
                    expected: kind.to_string(),
                    found: value.kind_name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn update(&self, partial: &FilterState) -> StoreResult<Arc<FilterState>> {
        self.validate(partial)?;
        let next = {
            let _guard = self.write_lock.write();
            let next = Arc::new(self.current.load().update(partial));
            self.current.store(Arc::clone(&next));
            next
        };
        self.publish(&next);
        Ok(next)
    }

    pub fn reset(&self) -> Arc<FilterState> {
        let next = {
            let _guard = self.write_lock.write();
            let next = Arc::new(self.current.load().reset(&self.defaults));
            self.current.store(Arc::clone(&next));
            next
        };
        self.publish(&next);
        next
    }

    // Сначала подписчики, затем адресная строка.
    // Подписчики вызываются вне блокировки списка.
    fn publish(&self, state: &FilterState) {
        let subscribers: Vec<Subscriber> = self.subscribers.read().clone();
        for subscriber in &subscribers {
            subscriber(state);
        }
        let query = codec::encode(state, &self.schema);
        debug!(query = %query, "filter state changed");
        self.navigation.push_query(&query);
    }
}
