use super::{
    definition::{FilterDefinition, FilterSchema, FilterValue},
    errors::IndexError,
    index::{
        dimension::Dimension,
        field::{FieldOperation, FieldValue},
    },
    result::IndexResult,
    state::FilterState,
};
use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use roaring::RoaringBitmap;
use std::sync::Arc;
use tracing::{debug, warn};

const SMALL_DATASET_THRESHOLD: usize = 1000;
const PARALLEL_WRAP_THRESHOLD: usize = 10_000;

// EntityIndex - коллекция сущностей с измерением на каждый ключ фильтра

pub struct EntityIndex<T>
where
    T: Send + Sync + 'static,
{
    source: Arc<Vec<Arc<T>>>,
    schema: Arc<FilterSchema>,
    keys: Vec<String>,
    dimensions: DashMap<String, Arc<Dimension<T>>>,
    // применённые предикаты: ключ -> операция
    predicates: DashMap<String, FieldOperation>,
    visible: ArcSwap<Vec<usize>>,
    write_lock: RwLock<()>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionStats {
    pub key: String,
    pub unique_values: usize,
    pub filtered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    pub source_len: usize,
    pub visible_len: usize,
    pub dimensions: Vec<DimensionStats>,
}

impl<T> EntityIndex<T>
where
    T: Send + Sync + 'static,
{
    // Constructors

    pub fn build(items: Vec<T>, definition: &FilterDefinition<T>) -> IndexResult<Self> {
        let len = items.len();
        let arc_items: Vec<Arc<T>> = if len > PARALLEL_WRAP_THRESHOLD {
            items.into_par_iter().map(Arc::new).collect()
        } else {
            items.into_iter().map(Arc::new).collect()
        };
        Self::from_arc_items(arc_items, definition)
    }

    pub fn from_arc_items(items: Vec<Arc<T>>, definition: &FilterDefinition<T>) -> IndexResult<Self> {
        if u32::try_from(items.len()).is_err() {
            return Err(IndexError::TooLarge { len: items.len() });
        }
        let source = Arc::new(items);
        let dimensions = DashMap::with_capacity(definition.len());
        let mut keys = Vec::with_capacity(definition.len());
        for (spec, extractor) in definition.fields() {
            let dimension = Dimension::build(&spec.key, spec.kind, &source, Arc::clone(extractor));
            dimensions.insert(spec.key.clone(), Arc::new(dimension));
            keys.push(spec.key.clone());
        }
        debug!(entities = source.len(), dimensions = keys.len(), "entity index built");
        Ok(Self {
            visible: ArcSwap::from_pointee((0..source.len()).collect()),
            source,
            schema: Arc::clone(definition.schema()),
            keys,
            dimensions,
            predicates: DashMap::new(),
            write_lock: RwLock::new(()),
        })
    }

    // Core Access Methods

    pub fn source(&self) -> &Arc<Vec<Arc<T>>> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.load().len()
    }

    pub fn visible_indices(&self) -> Arc<Vec<usize>> {
        self.visible.load_full()
    }

    pub fn items(&self) -> Vec<Arc<T>> {
        self.visible.load()
            .iter()
            .filter_map(|&idx| self.source.get(idx).cloned())
            .collect()
    }

    pub fn dimension(&self, key: &str) -> IndexResult<Arc<Dimension<T>>> {
        self.dimensions.get(key)
            .map(|guard| Arc::clone(guard.value()))
            .ok_or_else(|| IndexError::NotFound { name: key.to_string() })
    }

    pub fn has_dimension(&self, key: &str) -> bool {
        self.dimensions.contains_key(key)
    }

    pub fn list_dimensions(&self) -> Vec<String> {
        self.keys.clone()
    }

    pub fn active_predicates(&self) -> Vec<String> {
        self.keys.iter()
            .filter(|key| self.predicates.contains_key(key.as_str()))
            .cloned()
            .collect()
    }

    // Predicate Methods

    pub fn clear_filters(&self) -> &Self {
        let _guard = self.write_lock.write();
        self.predicates.clear();
        self.visible.store(Arc::new((0..self.source.len()).collect()));
        self
    }

    /// Applies the predicate implied by every restricting value of `state`
    /// and returns the passing entities in build order.
    pub fn apply_filters(&self, state: &FilterState) -> Vec<Arc<T>> {
        let _guard = self.write_lock.write();
        self.predicates.clear();
        for (key, value) in state {
            if !self.restricts(key, value) {
                continue;
            }
            match self.dimensions.get(key.as_str()) {
                Some(dimension) => {
                    if let Some(operation) = dimension.operation_for(value) {
                        debug!(key = %key, operation = %operation, "predicate applied");
                        self.predicates.insert(key.clone(), operation);
                    }
                }
                None => warn!(key = %key, "filter key has no dimension, ignoring"),
            }
        }
        let indices = self.evaluate(None);
        let items = indices.iter()
            .filter_map(|&idx| self.source.get(idx).cloned())
            .collect();
        self.visible.store(Arc::new(indices));
        items
    }

    // Для маленьких коллекций сканирование дешевле пересечения bitmap
    fn evaluate(&self, skip: Option<&str>) -> Vec<usize> {
        let active: Vec<(Arc<Dimension<T>>, FieldOperation)> = self.keys.iter()
            .filter(|key| Some(key.as_str()) != skip)
            .filter_map(|key| {
                let operation = self.predicates.get(key.as_str())?.value().clone();
                let dimension = Arc::clone(self.dimensions.get(key.as_str())?.value());
                Some((dimension, operation))
            })
            .collect();
        if active.is_empty() {
            return (0..self.source.len()).collect();
        }
        if self.source.len() < SMALL_DATASET_THRESHOLD {
            return self.scan(&active);
        }
        self.evaluate_bitmap(&active)
            .iter()
            .map(|idx| idx as usize)
            .collect()
    }

    fn scan(&self, active: &[(Arc<Dimension<T>>, FieldOperation)]) -> Vec<usize> {
        let passes = |item: &Arc<T>| {
            active.iter().all(|(dimension, operation)| operation.evaluate(&dimension.projection(item)))
        };
        self.source.iter()
            .enumerate()
            .filter(|&(_, item)| passes(item))
            .map(|(idx, _)| idx)
            .collect()
    }

    // Пересечение (AND) bitmap всех активных измерений
    fn evaluate_bitmap(&self, active: &[(Arc<Dimension<T>>, FieldOperation)]) -> RoaringBitmap {
        let mut combined: Option<RoaringBitmap> = None;
        for (dimension, operation) in active {
            let bitmap = dimension.filter_operation(operation);
            combined = Some(match combined {
                None => bitmap,
                Some(existing) => existing & bitmap,
            });
            if combined.as_ref().is_some_and(RoaringBitmap::is_empty) {
                break;
            }
        }
        combined.unwrap_or_else(|| (0..self.source.len() as u32).collect())
    }

    /// Per-value counts of `key` over the entities that pass every other
    /// active predicate.
    pub fn facet_counts(&self, key: &str) -> IndexResult<Vec<(FieldValue, usize)>> {
        let dimension = self.dimension(key)?;
        let _guard = self.write_lock.read();
        let mut others = RoaringBitmap::new();
        others.extend(self.evaluate(Some(key)).into_iter().map(|idx| idx as u32));
        Ok(dimension.iter_values()
            .map(|(value, bitmap)| (value.clone(), bitmap.intersection_len(&others) as usize))
            .collect())
    }

    // Null и полный набор по умолчанию не ограничивают выборку
    fn restricts(&self, key: &str, value: &FilterValue) -> bool {
        match value {
            FilterValue::Null => false,
            FilterValue::Bool(_) => true,
            FilterValue::IntSet(_) | FilterValue::StrSet(_) => self.schema
                .field(key)
                .is_none_or(|spec| !value.set_eq(&spec.default)),
        }
    }

    /// True when `item` passes every restricting value in `state`.
    pub fn passes(&self, item: &T, state: &FilterState) -> bool {
        state.iter()
            .filter(|(key, value)| self.restricts(key, value))
            .all(|(key, value)| match self.dimensions.get(key.as_str()) {
                Some(dimension) => dimension.operation_for(value)
                    .is_none_or(|op| op.evaluate(&dimension.projection(item))),
                None => true,
            })
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            source_len: self.source.len(),
            visible_len: self.visible_len(),
            dimensions: self.keys.iter()
                .filter_map(|key| {
                    let dimension = self.dimensions.get(key.as_str())?;
                    Some(DimensionStats {
                        key: key.clone(),
                        unique_values: dimension.unique_values_count(),
                        filtered: self.predicates.contains_key(key.as_str()),
                    })
                })
                .collect(),
        }
    }
}
