use super::{
    filter::EntityIndex,
    state::FilterState,
};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::debug;

/// Table-rendering collaborator that receives each filtered result set.
pub trait ResultSink<T>: Send + Sync {
    fn publish(&self, rows: &[Arc<T>]);
}

// FilterEngine - повторно применяет фильтры при каждом изменении состояния

pub struct FilterEngine<T>
where
    T: Send + Sync + 'static,
{
    index: ArcSwap<EntityIndex<T>>,
    last: ArcSwap<Vec<Arc<T>>>,
    sink: Option<Arc<dyn ResultSink<T>>>,
}

impl<T> FilterEngine<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(index: EntityIndex<T>, sink: Option<Arc<dyn ResultSink<T>>>) -> Self {
        Self {
            last: ArcSwap::from_pointee(index.items()),
            index: ArcSwap::from_pointee(index),
            sink,
        }
    }

    pub fn index(&self) -> Arc<EntityIndex<T>> {
        self.index.load_full()
    }

    // Индекс перестраивается целиком, частичных обновлений нет
    pub fn replace_index(&self, index: EntityIndex<T>) {
        self.index.store(Arc::new(index));
    }

    pub fn refresh(&self, state: &FilterState) -> Arc<Vec<Arc<T>>> {
        let rows = Arc::new(self.index.load().apply_filters(state));
        debug!(visible = rows.len(), "filters applied");
        self.last.store(Arc::clone(&rows));
        if let Some(sink) = &self.sink {
            sink.publish(&rows);
        }
        rows
    }

    pub fn results(&self) -> Arc<Vec<Arc<T>>> {
        self.last.load_full()
    }
}
