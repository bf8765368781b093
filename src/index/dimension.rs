use super::{
    Extractor,
    field::{FieldOperation, FieldValue, Projection},
};
use crate::definition::{FilterValue, ValueKind};
use rayon::prelude::*;
use roaring::RoaringBitmap;
use std::{
    collections::{BTreeMap, btree_map},
    sync::Arc,
};

const PARALLEL_EXTRACT_THRESHOLD: usize = 10_000;
const PARALLEL_BITMAP_THRESHOLD: usize = 100;

// Dimension - одно измерение коллекции: значение -> позиции сущностей

pub struct Dimension<T> {
    key: String,
    kind: ValueKind,
    values: BTreeMap<FieldValue, RoaringBitmap>,
    size: usize,
    extractor: Extractor<T>,
}

impl<T> Dimension<T>
where
    T: Send + Sync,
{
    // Построить измерение из данных
    pub fn build(key: &str, kind: ValueKind, items: &[Arc<T>], extractor: Extractor<T>) -> Self {
        let size = items.len();

        let projections: Vec<(usize, Projection)> = if size > PARALLEL_EXTRACT_THRESHOLD {
            items
                .par_iter()
                .enumerate()
                .map(|(id, item)| (id, Self::project(kind, &extractor, item)))
                .collect()
        } else {
            items
                .iter()
                .enumerate()
                .map(|(id, item)| (id, Self::project(kind, &extractor, item)))
                .collect()
        };

        // Группировка позиций по значениям
        let mut values_indices = BTreeMap::<FieldValue, Vec<u32>>::new();
        for (id, projection) in projections {
            for value in projection {
                let positions = values_indices.entry(value).or_default();
                // одно значение может повториться в проекции
                if positions.last() != Some(&(id as u32)) {
                    positions.push(id as u32);
                }
            }
        }

        let values: BTreeMap<FieldValue, RoaringBitmap> = if values_indices.len() > PARALLEL_BITMAP_THRESHOLD {
            values_indices
                .into_par_iter()
                .map(|(value, positions)| (value, positions.into_iter().collect()))
                .collect()
        } else {
            values_indices
                .into_iter()
                .map(|(value, positions)| (value, positions.into_iter().collect()))
                .collect()
        };

        Self {
            key: key.to_string(),
            kind,
            values,
            size,
            extractor,
        }
    }

    // Для boolean-измерений отсутствующее значение считается false
    #[inline]
    fn project(kind: ValueKind, extractor: &Extractor<T>, item: &T) -> Projection {
        let projection = extractor(item);
        if projection.is_empty() && kind == ValueKind::BoolOrNull {
            return super::field::single(false);
        }
        projection
    }

    pub fn projection(&self, item: &T) -> Projection {
        Self::project(self.kind, &self.extractor, item)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn unique_values_count(&self) -> usize {
        self.values.len()
    }

    pub fn get_bitmap(&self, value: &FieldValue) -> Option<&RoaringBitmap> {
        self.values.get(value)
    }

    pub fn value_count(&self, value: &FieldValue) -> usize {
        self.values
            .get(value)
            .map(|bitmap| bitmap.len() as usize)
            .unwrap_or(0)
    }

    pub fn iter_values(&self) -> btree_map::Iter<'_, FieldValue, RoaringBitmap> {
        self.values.iter()
    }

    // ФИЛЬТРАЦИИ

    // field == value
    pub fn value_eq(&self, value: &FieldValue) -> RoaringBitmap {
        self.get_bitmap(value).cloned().unwrap_or_default()
    }

    // field IN (values...)
    pub fn value_in(&self, values: &[FieldValue]) -> RoaringBitmap {
        let mut result = RoaringBitmap::new();
        for value in values {
            if let Some(bitmap) = self.get_bitmap(value) {
                result |= bitmap;
            }
        }
        result
    }

    pub fn filter_operation(&self, operation: &FieldOperation) -> RoaringBitmap {
        match operation {
            FieldOperation::Eq(value) => self.value_eq(value),
            FieldOperation::In(values) => self.value_in(values),
        }
    }

    /// Predicate implied by a selected value; `None` for `Null`.
    pub fn operation_for(&self, value: &FilterValue) -> Option<FieldOperation> {
        match value {
            FilterValue::Null => None,
            FilterValue::Bool(b) => Some(FieldOperation::eq(*b)),
            FilterValue::IntSet(_) | FilterValue::StrSet(_) => {
                Some(FieldOperation::In(value.to_field_values()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::field::{many, optional, single};

    fn rows() -> Vec<Arc<(i64, Option<i64>, Vec<i64>)>> {
        vec![
            Arc::new((1, Some(10), vec![1, 2])),
            Arc::new((2, Some(20), vec![])),
            Arc::new((3, None, vec![2, 2])),
            Arc::new((4, Some(10), vec![3])),
        ]
    }

    #[test]
    fn test_build_groups_positions() {
        let dim = Dimension::build(
            "program",
            ValueKind::IntegerSet,
            &rows(),
            Arc::new(|r: &(i64, Option<i64>, Vec<i64>)| optional(r.1)),
        );
        assert_eq!(dim.len(), 4);
        assert_eq!(dim.unique_values_count(), 2);
        assert_eq!(dim.value_eq(&FieldValue::Int(10)).iter().collect::<Vec<_>>(), vec![0, 3]);
        // сущность без программы не попадает ни в одно значение
        assert_eq!(dim.value_in(&[FieldValue::Int(10), FieldValue::Int(20)]).len(), 3);
    }

    #[test]
    fn test_multi_valued_projection() {
        let dim = Dimension::build(
            "tags",
            ValueKind::IntegerSet,
            &rows(),
            Arc::new(|r: &(i64, Option<i64>, Vec<i64>)| many(r.2.iter().copied())),
        );
        assert_eq!(dim.value_count(&FieldValue::Int(2)), 2);
        assert_eq!(dim.value_in(&[FieldValue::Int(1), FieldValue::Int(3)]).iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_missing_bool_is_false() {
        let dim = Dimension::build(
            "legacy",
            ValueKind::BoolOrNull,
            &rows(),
            Arc::new(|r: &(i64, Option<i64>, Vec<i64>)| optional(r.1.map(|_| true))),
        );
        assert_eq!(dim.value_eq(&FieldValue::Bool(false)).iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(dim.projection(&rows()[2]).as_slice(), single(false).as_slice());
    }

    #[test]
    fn test_empty_in_selects_nothing() {
        let dim = Dimension::build(
            "id",
            ValueKind::IntegerSet,
            &rows(),
            Arc::new(|r: &(i64, Option<i64>, Vec<i64>)| single(r.0)),
        );
        let op = dim.operation_for(&FilterValue::IntSet(Vec::new())).unwrap();
        assert!(dim.filter_operation(&op).is_empty());
        assert!(dim.operation_for(&FilterValue::Null).is_none());
    }
}
