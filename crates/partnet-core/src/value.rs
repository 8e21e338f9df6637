//! Value types and values
//!
//! Aspects read and write typed values. The set of value types is closed;
//! every type has a default value, a compact rendering and a display color.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of a value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Integer,
    Double,
    String,
}

impl ValueType {
    pub const ALL: [ValueType; 4] = [
        ValueType::Boolean,
        ValueType::Integer,
        ValueType::Double,
        ValueType::String,
    ];

    /// Short type name, used in aspect names
    pub fn type_name(self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Double => "double",
            ValueType::String => "string",
        }
    }

    pub fn unlocalized_name(self) -> String {
        format!("valuetype.partnet.{}", self.type_name())
    }

    pub fn default_value(self) -> Value {
        match self {
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Integer => Value::Integer(0),
            ValueType::Double => Value::Double(0.0),
            ValueType::String => Value::String(String::new()),
        }
    }

    /// RGB display color
    pub fn display_color(self) -> u32 {
        match self {
            ValueType::Boolean => 0x2B_3A_F2,
            ValueType::Integer => 0xF2_3A_2B,
            ValueType::Double => 0xEB_B3_00,
            ValueType::String => 0x2B_F2_3A,
        }
    }

    /// Compact rendering of a value of this type
    pub fn to_compact_string(self, value: &Value) -> String {
        match value {
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format!("{:.2}", d),
            Value::String(s) if s.chars().count() > 16 => {
                let head: String = s.chars().take(15).collect();
                format!("{}…", head)
            }
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Orders value types by unlocalized name
pub struct ValueTypeComparator;

impl ValueTypeComparator {
    pub fn compare(a: ValueType, b: ValueType) -> Ordering {
        a.unlocalized_name().cmp(&b.unlocalized_name())
    }
}

/// A typed value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Boolean(bool),
    Integer(i32),
    Double(f64),
    String(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value_type().to_compact_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_match_type() {
        for value_type in ValueType::ALL {
            assert_eq!(value_type.default_value().value_type(), value_type);
        }
    }

    #[test]
    fn test_comparator_by_name() {
        let mut types = ValueType::ALL.to_vec();
        types.sort_by(|a, b| ValueTypeComparator::compare(*a, *b));
        assert_eq!(
            types,
            vec![ValueType::Boolean, ValueType::Double, ValueType::Integer, ValueType::String]
        );
    }

    #[test]
    fn test_compact_string_truncates() {
        let long = Value::String("abcdefghijklmnopqrstuvwxyz".to_string());
        assert_eq!(long.to_string(), "abcdefghijklmno…");
        assert_eq!(Value::Double(1.0).to_string(), "1.00");
    }
}
