use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kinds a store slot can be declared with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    String,
    Number,
    Boolean,
}

impl StoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::String => "string",
            StoreType::Number => "number",
            StoreType::Boolean => "boolean",
        }
    }

    /// Value written by `register_to_world` for a slot that has never been defined.
    pub fn zero_value(&self) -> StoreValue {
        match self {
            StoreType::String => StoreValue::String(String::new()),
            StoreType::Number => StoreValue::Number(0.0),
            StoreType::Boolean => StoreValue::Boolean(false),
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive value as persisted in the world properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StoreValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl StoreValue {
    pub fn store_type(&self) -> StoreType {
        match self {
            StoreValue::String(_) => StoreType::String,
            StoreValue::Number(_) => StoreType::Number,
            StoreValue::Boolean(_) => StoreType::Boolean,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StoreValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce console text into a value of `ty`.
    ///
    /// Strings are taken verbatim, numbers must parse as `f64` and booleans are `true`
    /// only for a case-insensitive `"true"`; every other literal is `false`.
    pub fn parse_as(ty: StoreType, literal: &str) -> Option<Self> {
        match ty {
            StoreType::String => Some(StoreValue::String(literal.to_string())),
            StoreType::Number => literal
                .parse::<f64>()
                .ok()
                .filter(|n| !n.is_nan())
                .map(StoreValue::Number),
            StoreType::Boolean => Some(StoreValue::Boolean(literal.eq_ignore_ascii_case("true"))),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::String(s) => f.write_str(s),
            StoreValue::Number(n) => write!(f, "{}", n),
            StoreValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(s: &str) -> Self {
        StoreValue::String(s.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(s: String) -> Self {
        StoreValue::String(s)
    }
}

impl From<f64> for StoreValue {
    fn from(n: f64) -> Self {
        StoreValue::Number(n)
    }
}

impl From<i32> for StoreValue {
    fn from(n: i32) -> Self {
        StoreValue::Number(n as f64)
    }
}

impl From<bool> for StoreValue {
    fn from(b: bool) -> Self {
        StoreValue::Boolean(b)
    }
}

/// A registered slot: unique name plus its immutable declared type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub name: String,
    pub declared_type: StoreType,
}

impl StoreDescriptor {
    pub fn new(name: &str, declared_type: StoreType) -> Self {
        Self {
            name: name.to_string(),
            declared_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_match_declared_type() {
        for ty in [StoreType::String, StoreType::Number, StoreType::Boolean] {
            assert_eq!(ty.zero_value().store_type(), ty);
        }
        assert_eq!(StoreType::String.zero_value(), StoreValue::String(String::new()));
    }

    #[test]
    fn parse_literals() {
        assert_eq!(
            StoreValue::parse_as(StoreType::Number, "4.5"),
            Some(StoreValue::Number(4.5))
        );
        assert_eq!(StoreValue::parse_as(StoreType::Number, "four"), None);
        assert_eq!(StoreValue::parse_as(StoreType::Number, "NaN"), None);
        assert_eq!(
            StoreValue::parse_as(StoreType::Boolean, "TRUE"),
            Some(StoreValue::Boolean(true))
        );
        assert_eq!(
            StoreValue::parse_as(StoreType::Boolean, "yes"),
            Some(StoreValue::Boolean(false))
        );
    }

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(StoreValue::Number(6.0).to_string(), "6");
        assert_eq!(StoreValue::Number(1.5).to_string(), "1.5");
    }
}
