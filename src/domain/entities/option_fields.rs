use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidateLength;

/// Tri-state field for PATCH/upsert bodies.
///
/// - `Unchanged` → key absent from the body
/// - `SetToNull` → key present with `null`
/// - `SetToValue` → key present with a value
///
/// Fields must carry `#[serde(default)]` so an absent key lands on `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<T> ValidateLength<u64> for OptionField<T>
where
    T: ValidateLength<u64>,
{
    fn length(&self) -> Option<u64> {
        match self {
            OptionField::SetToValue(value) => value.length(),
            _ => None,
        }
    }

    fn validate_length(&self, min: Option<u64>, max: Option<u64>, equal: Option<u64>) -> bool {
        match self {
            OptionField::SetToValue(value) => value.validate_length(min, max, equal),
            _ => true,
        }
    }
}

impl<T> OptionField<T> {
    /// Resolve against the stored value: `Unchanged` keeps `current`.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v),
        }
    }

    /// Split into `(touched, value)` for SQL that must distinguish
    /// "leave alone" from "set to NULL".
    pub fn into_touched(self) -> (bool, Option<T>) {
        match self {
            Self::Unchanged => (false, None),
            Self::SetToNull => (true, None),
            Self::SetToValue(v) => (true, Some(v)),
        }
    }
}

impl OptionField<String> {
    /// Trims the value; a blank string clears the field.
    pub fn normalized(self) -> Self {
        match self {
            Self::SetToValue(s) if s.trim().is_empty() => Self::SetToNull,
            Self::SetToValue(s) => Self::SetToValue(s.trim().to_string()),
            other => other,
        }
    }
}
