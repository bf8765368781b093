//! Query-string codec: address-bar query <-> [`FilterState`].
//!
//! Set values are comma-joined, each token percent-encoded on its own.
//! A key is absent from the encoded string when its value equals the
//! default, so "everything selected" and "no restriction" share the same
//! (empty) encoding. Empty tokens are never encoded and never decoded, so
//! a string set holding only `""` encodes like the empty set.

use super::{
    definition::{FilterSchema, FilterValue, ValueKind},
    state::FilterState,
};
use std::collections::BTreeMap;
use tracing::debug;
use url::form_urlencoded;

const SET_SEPARATOR: char = ',';
const NULL_TOKEN: &str = "null";

/// Value decoded without a schema, by looking at its content only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Bool(bool),
    IntSet(Vec<i64>),
    StrSet(Vec<String>),
    Scalar(String),
}

fn pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
}

fn tokens(raw: &str) -> Vec<&str> {
    raw.split(SET_SEPARATOR)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Content-driven coercion of every parameter in `query`.
pub fn decode_raw(query: &str) -> BTreeMap<String, RawValue> {
    pairs(query)
        .map(|(key, raw)| {
            let value = match raw.as_str() {
                "true" => RawValue::Bool(true),
                "false" => RawValue::Bool(false),
                _ => {
                    let parts = tokens(&raw);
                    let ints: Option<Vec<i64>> = parts.iter().map(|t| t.parse().ok()).collect();
                    match ints {
                        Some(ints) if !ints.is_empty() => RawValue::IntSet(ints),
                        _ if parts.len() > 1 => RawValue::StrSet(parts.iter().map(|t| t.to_string()).collect()),
                        _ => RawValue::Scalar(raw.clone()),
                    }
                }
            };
            (key, value)
        })
        .collect()
}

fn decode_value(key: &str, kind: ValueKind, raw: &str) -> Option<FilterValue> {
    match kind {
        ValueKind::BoolOrNull => match raw {
            "true" => Some(FilterValue::Bool(true)),
            "false" => Some(FilterValue::Bool(false)),
            "" | NULL_TOKEN => Some(FilterValue::Null),
            other => {
                debug!(key, value = other, "dropping non-boolean query value");
                None
            }
        },
        ValueKind::IntegerSet => {
            let values = tokens(raw)
                .into_iter()
                .filter_map(|token| match token.trim().parse::<i64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        debug!(key, token, "dropping malformed integer token");
                        None
                    }
                })
                .collect();
            Some(FilterValue::IntSet(values))
        }
        ValueKind::StringSet => Some(FilterValue::StrSet(
            tokens(raw).into_iter().map(str::to_string).collect()
        )),
    }
}

/// Decodes the keys of `query` known to `schema`; everything else is dropped.
pub fn decode(query: &str, schema: &FilterSchema) -> FilterState {
    pairs(query)
        .filter_map(|(key, raw)| {
            let Some(kind) = schema.kind(&key) else {
                debug!(key = %key, "ignoring unknown query parameter");
                return None;
            };
            decode_value(&key, kind, &raw).map(|value| (key, value))
        })
        .collect()
}

fn encode_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Null => NULL_TOKEN.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::IntSet(values) => values.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        FilterValue::StrSet(values) => values.iter()
            .filter(|v| {
                if v.is_empty() {
                    debug!("dropping empty string token");
                }
                !v.is_empty()
            })
            .map(|v| urlencoding::encode(v).into_owned())
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Encodes the keys of `state` that differ from their schema default.
///
/// Keys follow schema order; the result carries no leading `?`.
pub fn encode(state: &FilterState, schema: &FilterSchema) -> String {
    schema.fields()
        .iter()
        .filter_map(|field| {
            let value = state.get(&field.key)?;
            if value.set_eq(&field.default) {
                return None;
            }
            Some(format!("{}={}", urlencoding::encode(&field.key), encode_value(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}
