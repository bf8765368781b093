//! Static per-entity filter schema: keys, value kinds, defaults and extractors.

use super::{
    errors::DefinitionError,
    index::{
        Extractor,
        field::{FieldValue, Projection},
    },
    result::DefinitionResult,
};
use std::{
    collections::HashSet,
    fmt::{self, Display},
    sync::Arc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    BoolOrNull,
    IntegerSet,
    StringSet,
}

impl ValueKind {
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::BoolOrNull)
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoolOrNull => write!(f, "boolean-or-null"),
            Self::IntegerSet => write!(f, "integer-set"),
            Self::StringSet => write!(f, "string-set"),
        }
    }
}

/// Selected value of one filter key.
///
/// `Null` means "no restriction". An empty set is a restriction that nothing
/// satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    IntSet(Vec<i64>),
    StrSet(Vec<String>),
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::IntSet(_) => "integer-set",
            Self::StrSet(_) => "string-set",
        }
    }

    // Null допустим только для boolean-ключей
    pub fn matches_kind(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::Null | Self::Bool(_), ValueKind::BoolOrNull)
                | (Self::IntSet(_), ValueKind::IntegerSet)
                | (Self::StrSet(_), ValueKind::StringSet)
        )
    }

    pub fn set_len(&self) -> Option<usize> {
        match self {
            Self::IntSet(values) => Some(values.len()),
            Self::StrSet(values) => Some(values.len()),
            _ => None,
        }
    }

    /// Equality that ignores the order and multiplicity of set members.
    pub fn set_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IntSet(a), Self::IntSet(b)) => {
                a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
            }
            (Self::StrSet(a), Self::StrSet(b)) => {
                a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
            }
            _ => self == other,
        }
    }

    pub fn contains(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::IntSet(values), FieldValue::Int(v)) => values.contains(v),
            (Self::StrSet(values), FieldValue::Str(v)) => values.contains(v),
            (Self::Bool(b), FieldValue::Bool(v)) => b == v,
            _ => false,
        }
    }

    pub fn to_field_values(&self) -> Vec<FieldValue> {
        match self {
            Self::Null => Vec::new(),
            Self::Bool(v) => vec![FieldValue::Bool(*v)],
            Self::IntSet(values) => values.iter().copied().map(FieldValue::Int).collect(),
            Self::StrSet(values) => values.iter().cloned().map(FieldValue::Str).collect(),
        }
    }

    /// Builds a set value of `kind` from field values, skipping members of
    /// the wrong family.
    pub fn from_field_values<'a, I>(kind: ValueKind, values: I) -> Self
    where
        I: IntoIterator<Item = &'a FieldValue>,
    {
        match kind {
            ValueKind::IntegerSet => Self::IntSet(values.into_iter().filter_map(FieldValue::as_int).collect()),
            ValueKind::StringSet => Self::StrSet(
                values.into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            ),
            ValueKind::BoolOrNull => values.into_iter()
                .find_map(FieldValue::as_bool)
                .map_or(Self::Null, Self::Bool),
        }
    }
}

/// How a boolean key is presented in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStyle {
    // отмечен -> true, снят -> null
    Checkbox,
    // да / нет / все
    Radio,
    // набор значений
    Checklist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: FieldValue,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub kind: ValueKind,
    pub style: ControlStyle,
    pub default: FilterValue,
    // Полный набор возможных значений для set-ключей
    pub options: Vec<FilterOption>,
}

impl FieldSpec {
    /// Set value holding every option, in option order.
    pub fn all_options(&self) -> FilterValue {
        FilterValue::from_field_values(self.kind, self.options.iter().map(|o| &o.value))
    }

    pub fn is_all_selected(&self, value: &FilterValue) -> bool {
        self.kind.is_set() && value.set_eq(&self.all_options())
    }
}

/// Key order, kinds and defaults of a definition, without the extractors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSchema {
    fields: Vec<FieldSpec>,
}

impl FilterSchema {
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn kind(&self, key: &str) -> Option<ValueKind> {
        self.field(key).map(|f| f.kind)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct FilterField<T> {
    pub spec: FieldSpec,
    pub extractor: Extractor<T>,
}

impl<T> Clone for FilterField<T> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            extractor: Arc::clone(&self.extractor),
        }
    }
}

pub struct FilterDefinition<T> {
    schema: Arc<FilterSchema>,
    extractors: Vec<Extractor<T>>,
}

impl<T> Clone for FilterDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            extractors: self.extractors.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDefinition")
            .field("keys", &self.schema.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> FilterDefinition<T>
where
    T: 'static,
{
    pub fn builder() -> FilterDefinitionBuilder<T> {
        FilterDefinitionBuilder::new()
    }

    pub fn schema(&self) -> &Arc<FilterSchema> {
        &self.schema
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &Extractor<T>)> {
        self.schema.fields.iter().zip(self.extractors.iter())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

// Builder

pub struct FilterDefinitionBuilder<T> {
    fields: Vec<FilterField<T>>,
}

impl<T> FilterDefinitionBuilder<T>
where
    T: 'static,
{
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec, extractor: Extractor<T>) -> Self {
        self.fields.push(FilterField { spec, extractor });
        self
    }

    fn set_field<F>(self, key: &str, label: &str, kind: ValueKind, options: Vec<FilterOption>, extractor: F) -> Self
    where
        F: Fn(&T) -> Projection + Send + Sync + 'static,
    {
        let mut spec = FieldSpec {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            style: ControlStyle::Checklist,
            default: FilterValue::Null,
            options,
        };
        spec.default = spec.all_options();
        self.field(spec, Arc::new(extractor))
    }

    /// String-set key whose default selects every option.
    pub fn string_set<F>(self, key: &str, label: &str, options: Vec<FilterOption>, extractor: F) -> Self
    where
        F: Fn(&T) -> Projection + Send + Sync + 'static,
    {
        self.set_field(key, label, ValueKind::StringSet, options, extractor)
    }

    /// Integer-set key whose default selects every option.
    pub fn integer_set<F>(self, key: &str, label: &str, options: Vec<FilterOption>, extractor: F) -> Self
    where
        F: Fn(&T) -> Projection + Send + Sync + 'static,
    {
        self.set_field(key, label, ValueKind::IntegerSet, options, extractor)
    }

    pub fn flag<F>(self, key: &str, label: &str, style: ControlStyle, default: Option<bool>, extractor: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let spec = FieldSpec {
            key: key.to_string(),
            label: label.to_string(),
            kind: ValueKind::BoolOrNull,
            style,
            default: default.map_or(FilterValue::Null, FilterValue::Bool),
            options: vec![
                FilterOption::new(true, "Yes"),
                FilterOption::new(false, "No"),
            ],
        };
        let extractor: Extractor<T> = Arc::new(move |item: &T| {
            super::index::field::single(extractor(item))
        });
        self.field(spec, extractor)
    }

    pub fn build(self) -> DefinitionResult<FilterDefinition<T>> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.spec.key.as_str()) {
                return Err(DefinitionError::DuplicateKey {
                    key: field.spec.key.clone(),
                });
            }
            if !field.spec.default.matches_kind(field.spec.kind) {
                return Err(DefinitionError::DefaultKind {
                    key: field.spec.key.clone(),
                    expected: field.spec.kind.to_string(),
                    found: field.spec.default.kind_name().to_string(),
                });
            }
        }
        let (fields, extractors) = self.fields
            .into_iter()
            .map(|f| (f.spec, f.extractor))
            .unzip();
        Ok(FilterDefinition {
            schema: Arc::new(FilterSchema { fields }),
            extractors,
        })
    }
}

impl<T> Default for FilterDefinitionBuilder<T>
where
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
