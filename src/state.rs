use super::definition::{FilterSchema, FilterValue};
use std::collections::{BTreeMap, btree_map};

/// Current selection across the filter keys of one view.
///
/// Values are immutable: every transition returns a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    // Копия значений по умолчанию, без общих ссылок с источником
    pub fn initialize(defaults: &FilterState) -> FilterState {
        defaults.clone()
    }

    pub fn defaults(schema: &FilterSchema) -> FilterState {
        schema.fields()
            .iter()
            .map(|f| (f.key.clone(), f.default.clone()))
            .collect()
    }

    // {...current, ...partial}
    pub fn update(&self, partial: &FilterState) -> FilterState {
        let mut values = self.values.clone();
        values.extend(partial.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        FilterState { values }
    }

    pub fn reset(&self, defaults: &FilterState) -> FilterState {
        self.update(defaults)
    }

    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FilterValue> {
        self.values.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, FilterValue)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FilterState {
    type Item = (&'a String, &'a FilterValue);
    type IntoIter = btree_map::Iter<'a, String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FilterState {
        FilterState::new()
            .with("status", FilterValue::StrSet(vec!["ACTIVE".into(), "COMPLETE".into()]))
            .with("legacy", FilterValue::Null)
    }

    #[test]
    fn test_update_merges_without_touching_current() {
        let current = FilterState::initialize(&defaults());
        let next = current.update(&FilterState::new().with("legacy", FilterValue::Bool(true)));
        assert_eq!(current.get("legacy"), Some(&FilterValue::Null));
        assert_eq!(next.get("legacy"), Some(&FilterValue::Bool(true)));
        assert_eq!(next.get("status"), current.get("status"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let defaults = defaults();
        let changed = FilterState::initialize(&defaults)
            .update(&FilterState::new().with("status", FilterValue::StrSet(Vec::new())));
        assert_eq!(changed.reset(&defaults), defaults);
    }
}
