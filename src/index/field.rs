use smallvec::SmallVec;
use std::fmt::{self, Display};

// Значение одного измерения сущности
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldValue {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Str(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Int(v) }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self { FieldValue::Int(i64::from(v)) }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self { FieldValue::Int(i64::from(v)) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Str(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Str(v.to_string()) }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Bool(v) }
}

// Проекция сущности на измерение: ноль, одно или несколько значений
pub type Projection = SmallVec<[FieldValue; 2]>;

pub fn single(value: impl Into<FieldValue>) -> Projection {
    let mut projection = Projection::new();
    projection.push(value.into());
    projection
}

pub fn optional<V: Into<FieldValue>>(value: Option<V>) -> Projection {
    value.map(single).unwrap_or_default()
}

pub fn many<I, V>(values: I) -> Projection
where
    I: IntoIterator<Item = V>,
    V: Into<FieldValue>,
{
    values.into_iter().map(Into::into).collect()
}

// Предикат измерения

#[derive(Clone, Debug, PartialEq)]
pub enum FieldOperation {
    // field == value
    Eq(FieldValue),

    // field IN (values...); пустой список не пропускает ничего
    In(Vec<FieldValue>),
}

impl FieldOperation {
    pub fn eq(value: impl Into<FieldValue>) -> Self {
        FieldOperation::Eq(value.into())
    }

    pub fn in_values<V>(values: Vec<V>) -> Self
    where
        V: Into<FieldValue>,
    {
        FieldOperation::In(values.into_iter().map(|v| v.into()).collect())
    }

    // Проекция проходит, если хотя бы одно её значение удовлетворяет операции
    #[inline(always)]
    pub fn evaluate(&self, projection: &[FieldValue]) -> bool {
        match self {
            FieldOperation::Eq(target) => projection.iter().any(|v| v == target),
            FieldOperation::In(targets) => {
                projection.iter().any(|v| targets.contains(v))
            },
        }
    }
}

impl Display for FieldOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOperation::Eq(v) => write!(f, "== {v}"),
            FieldOperation::In(values) => {
                let joined = values.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "IN ({joined})")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_matches_any_projected_value() {
        let op = FieldOperation::in_values(vec![10i64, 30]);
        assert!(op.evaluate(&many([20i64, 30])));
        assert!(!op.evaluate(&many([20i64])));
        assert!(!op.evaluate(&Projection::new()));
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let op = FieldOperation::In(Vec::new());
        assert!(!op.evaluate(&single("ACTIVE")));
    }

    #[test]
    fn test_eq_bool() {
        let op = FieldOperation::eq(true);
        assert!(op.evaluate(&single(true)));
        assert!(!op.evaluate(&single(false)));
        assert_eq!(op.to_string(), "== true");
    }

    #[test]
    fn test_optional_projection() {
        assert!(optional::<i64>(None).is_empty());
        assert_eq!(optional(Some(5i64)).as_slice(), &[FieldValue::Int(5)]);
    }
}
