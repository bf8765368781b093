//! Sidebar controls derived from a schema and the current state, and the
//! partial states produced by interacting with them.

use crate::{
    definition::{ControlStyle, FieldSpec, FilterSchema, FilterValue, ValueKind},
    errors::StoreError,
    filter::EntityIndex,
    index::field::FieldValue,
    result::StoreResult,
    state::FilterState,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOption {
    pub value: FieldValue,
    pub label: String,
    pub checked: bool,
    // число сущностей с этим значением при остальных фильтрах
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxGroup {
    pub key: String,
    pub label: String,
    pub options: Vec<GroupOption>,
    pub all_checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioChoice {
    Yes,
    No,
    All,
}

impl RadioChoice {
    pub fn from_value(value: &FilterValue) -> Self {
        match value {
            FilterValue::Bool(true) => Self::Yes,
            FilterValue::Bool(false) => Self::No,
            _ => Self::All,
        }
    }

    pub fn to_value(self) -> FilterValue {
        match self {
            Self::Yes => FilterValue::Bool(true),
            Self::No => FilterValue::Bool(false),
            Self::All => FilterValue::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Radio {
    pub key: String,
    pub label: String,
    pub selected: RadioChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    CheckboxGroup(CheckboxGroup),
    Checkbox(Checkbox),
    Radio(Radio),
}

impl Control {
    pub fn key(&self) -> &str {
        match self {
            Self::CheckboxGroup(c) => &c.key,
            Self::Checkbox(c) => &c.key,
            Self::Radio(r) => &r.key,
        }
    }
}

fn current<'a>(spec: &'a FieldSpec, state: &'a FilterState) -> &'a FilterValue {
    state.get(&spec.key).unwrap_or(&spec.default)
}

/// One control per schema key, reflecting `state`. Option counts are filled
/// in when an index is given.
pub fn build_controls<T>(schema: &FilterSchema, state: &FilterState, index: Option<&EntityIndex<T>>) -> Vec<Control>
where
    T: Send + Sync + 'static,
{
    schema.fields()
        .iter()
        .map(|spec| {
            let value = current(spec, state);
            match (spec.kind, spec.style) {
                (ValueKind::BoolOrNull, ControlStyle::Radio) => Control::Radio(Radio {
                    key: spec.key.clone(),
                    label: spec.label.clone(),
                    selected: RadioChoice::from_value(value),
                }),
                (ValueKind::BoolOrNull, _) => Control::Checkbox(Checkbox {
                    key: spec.key.clone(),
                    label: spec.label.clone(),
                    checked: *value == FilterValue::Bool(true),
                }),
                _ => {
                    let counts: Option<HashMap<FieldValue, usize>> = index
                        .and_then(|index| index.facet_counts(&spec.key).ok())
                        .map(|counts| counts.into_iter().collect());
                    Control::CheckboxGroup(CheckboxGroup {
                        key: spec.key.clone(),
                        label: spec.label.clone(),
                        options: spec.options.iter()
                            .map(|option| GroupOption {
                                value: option.value.clone(),
                                label: option.label.clone(),
                                checked: value.contains(&option.value),
                                count: counts.as_ref().map(|c| c.get(&option.value).copied().unwrap_or(0)),
                            })
                            .collect(),
                        all_checked: spec.is_all_selected(value),
                    })
                }
            }
        })
        .collect()
}

fn only(key: &str, value: FilterValue) -> FilterState {
    FilterState::new().with(key, value)
}

fn require_set(spec: &FieldSpec) -> StoreResult<()> {
    if spec.kind.is_set() {
        Ok(())
    } else {
        Err(StoreError::KindMismatch {
            key: spec.key.clone(),
            expected: "a set key".to_string(),
            found: spec.kind.to_string(),
        })
    }
}

fn require_bool(spec: &FieldSpec) -> StoreResult<()> {
    if spec.kind.is_set() {
        Err(StoreError::KindMismatch {
            key: spec.key.clone(),
            expected: ValueKind::BoolOrNull.to_string(),
            found: spec.kind.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Adds `value` to the selection of a set key, or removes it if present.
pub fn toggle_option(spec: &FieldSpec, state: &FilterState, value: &FieldValue) -> StoreResult<FilterState> {
    require_set(spec)?;
    let selected = current(spec, state).to_field_values();
    let next: Vec<FieldValue> = if selected.contains(value) {
        selected.into_iter().filter(|v| v != value).collect()
    } else {
        selected.into_iter().chain(std::iter::once(value.clone())).collect()
    };
    Ok(only(&spec.key, FilterValue::from_field_values(spec.kind, next.iter())))
}

/// Fully selected -> empty; anything else -> every option.
pub fn toggle_all(spec: &FieldSpec, state: &FilterState) -> StoreResult<FilterState> {
    require_set(spec)?;
    let next = if spec.is_all_selected(current(spec, state)) {
        FilterValue::from_field_values(spec.kind, std::iter::empty())
    } else {
        spec.all_options()
    };
    Ok(only(&spec.key, next))
}

pub fn select_only(spec: &FieldSpec, value: &FieldValue) -> StoreResult<FilterState> {
    require_set(spec)?;
    Ok(only(&spec.key, FilterValue::from_field_values(spec.kind, std::iter::once(value))))
}

/// Checked -> null, anything else -> true.
pub fn toggle_flag(spec: &FieldSpec, state: &FilterState) -> StoreResult<FilterState> {
    require_bool(spec)?;
    let next = match current(spec, state) {
        FilterValue::Bool(true) => FilterValue::Null,
        _ => FilterValue::Bool(true),
    };
    Ok(only(&spec.key, next))
}

pub fn set_radio(spec: &FieldSpec, choice: RadioChoice) -> StoreResult<FilterState> {
    require_bool(spec)?;
    Ok(only(&spec.key, choice.to_value()))
}

/// A single user action on the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    ToggleOption { key: String, value: FieldValue },
    ToggleAll { key: String },
    SelectOnly { key: String, value: FieldValue },
    ToggleFlag { key: String },
    SetRadio { key: String, choice: RadioChoice },
    Reset,
}

impl Interaction {
    /// Partial state for this action; `None` for [`Interaction::Reset`].
    pub fn partial(&self, schema: &FilterSchema, state: &FilterState) -> StoreResult<Option<FilterState>> {
        let spec = |key: &str| schema.field(key).ok_or_else(|| StoreError::UnknownKey {
            key: key.to_string(),
        });
        let partial = match self {
            Self::ToggleOption { key, value } => toggle_option(spec(key)?, state, value)?,
            Self::ToggleAll { key } => toggle_all(spec(key)?, state)?,
            Self::SelectOnly { key, value } => select_only(spec(key)?, value)?,
            Self::ToggleFlag { key } => toggle_flag(spec(key)?, state)?,
            Self::SetRadio { key, choice } => set_radio(spec(key)?, *choice)?,
            Self::Reset => return Ok(None),
        };
        Ok(Some(partial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{FilterDefinition, FilterOption};
    use crate::index::field::single;

    struct Row;

    fn schema() -> FilterSchema {
        let def = FilterDefinition::<Row>::builder()
            .string_set(
                "status",
                "Status",
                vec![
                    FilterOption::new("ACTIVE", "Active"),
                    FilterOption::new("COMPLETE", "Complete"),
                    FilterOption::new("ON_HOLD", "On Hold"),
                ],
                |_| single("ACTIVE"),
            )
            .flag("myStudy", "My Studies", ControlStyle::Checkbox, None, |_| false)
            .flag("active", "Status", ControlStyle::Radio, Some(true), |_| true)
            .build()
            .unwrap();
        (**def.schema()).clone()
    }

    #[test]
    fn test_toggle_option_builds_new_selection() {
        let schema = schema();
        let spec = schema.field("status").unwrap();
        let state = FilterState::defaults(&schema);
        let partial = toggle_option(spec, &state, &FieldValue::from("COMPLETE")).unwrap();
        assert_eq!(
            partial.get("status"),
            Some(&FilterValue::StrSet(vec!["ACTIVE".into(), "ON_HOLD".into()]))
        );
        assert_eq!(partial.len(), 1);
        // исходное состояние не изменилось
        assert_eq!(state.get("status").and_then(FilterValue::set_len), Some(3));

        let state = state.update(&partial);
        let partial = toggle_option(spec, &state, &FieldValue::from("COMPLETE")).unwrap();
        assert_eq!(
            partial.get("status"),
            Some(&FilterValue::StrSet(vec!["ACTIVE".into(), "ON_HOLD".into(), "COMPLETE".into()]))
        );
    }

    #[test]
    fn test_toggle_all_cycles_between_empty_and_full() {
        let schema = schema();
        let spec = schema.field("status").unwrap();
        let state = FilterState::defaults(&schema);
        let cleared = state.update(&toggle_all(spec, &state).unwrap());
        assert_eq!(cleared.get("status"), Some(&FilterValue::StrSet(Vec::new())));
        let restored = cleared.update(&toggle_all(spec, &cleared).unwrap());
        assert_eq!(restored.get("status"), state.get("status"));
    }

    #[test]
    fn test_partial_selection_toggle_all_selects_everything() {
        let schema = schema();
        let spec = schema.field("status").unwrap();
        let state = FilterState::new().with("status", FilterValue::StrSet(vec!["ON_HOLD".into()]));
        let partial = toggle_all(spec, &state).unwrap();
        assert_eq!(partial.get("status"), Some(&spec.all_options()));
    }

    #[test]
    fn test_flag_and_radio() {
        let schema = schema();
        let state = FilterState::defaults(&schema);
        let checked = toggle_flag(schema.field("myStudy").unwrap(), &state).unwrap();
        assert_eq!(checked.get("myStudy"), Some(&FilterValue::Bool(true)));
        let state = state.update(&checked);
        let unchecked = toggle_flag(schema.field("myStudy").unwrap(), &state).unwrap();
        assert_eq!(unchecked.get("myStudy"), Some(&FilterValue::Null));

        let all = set_radio(schema.field("active").unwrap(), RadioChoice::All).unwrap();
        assert_eq!(all.get("active"), Some(&FilterValue::Null));
        assert!(set_radio(schema.field("status").unwrap(), RadioChoice::Yes).is_err());
    }

    #[test]
    fn test_controls_reflect_state() {
        let schema = schema();
        let state = FilterState::defaults(&schema)
            .with("status", FilterValue::StrSet(vec!["ACTIVE".into()]));
        let controls = build_controls::<Row>(&schema, &state, None);
        assert_eq!(controls.len(), 3);
        match &controls[0] {
            Control::CheckboxGroup(list) => {
                assert!(!list.all_checked);
                assert_eq!(list.options.iter().filter(|o| o.checked).count(), 1);
                assert!(list.options.iter().all(|o| o.count.is_none()));
            }
            other => panic!("unexpected control {other:?}"),
        }
        assert_eq!(controls[1], Control::Checkbox(Checkbox {
            key: "myStudy".into(),
            label: "My Studies".into(),
            checked: false,
        }));
        assert_eq!(controls[2].key(), "active");
        assert!(matches!(&controls[2], Control::Radio(r) if r.selected == RadioChoice::Yes));
    }

    #[test]
    fn test_interaction_unknown_key() {
        let schema = schema();
        let err = Interaction::ToggleAll { key: "nope".into() }
            .partial(&schema, &FilterState::new())
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownKey { key: "nope".into() });
        assert_eq!(Interaction::Reset.partial(&schema, &FilterState::new()).unwrap(), None);
    }
}
