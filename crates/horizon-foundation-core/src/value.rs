//! Dynamically typed values exchanged through the meta-object system.
//!
//! [`Value`] is what flows between controls and reflected objects: getter
//! results, setter arguments, table cells, callback payloads. Conversions to
//! and from concrete Rust types go through [`IntoValue`] and [`FromValue`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::meta::SharedObject;

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// No value. Displays as the empty string.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// A shared reflected object.
    Object(SharedObject),
}

impl Value {
    /// Check if this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the number as a float, for integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Borrow the shared object, if this is an object value.
    pub fn as_object(&self) -> Option<&SharedObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Natural ordering between two values.
    ///
    /// Numbers compare numerically (integers and floats with each other),
    /// text lexically, booleans with `false < true`. Any other pairing is
    /// incomparable and yields `None`.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(obj) => match obj.try_lock() {
                Some(guard) => write!(f, "<{}>", guard.meta_object().type_name),
                None => f.write_str("<object>"),
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Object(_) => write!(f, "Object({self})"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Conversion of a Rust value into a [`Value`].
pub trait IntoValue {
    /// Convert into a dynamic value.
    fn into_value(self) -> Value;
}

/// Conversion of a [`Value`] into a Rust value.
pub trait FromValue: Sized {
    /// Type name reported in mismatch errors.
    const TYPE_NAME: &'static str;

    /// Whether `value` can be converted without loss of meaning.
    fn accepts(value: &Value) -> bool;

    /// Convert, returning the original value on mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn accepts(_: &Value) -> bool {
        true
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn accepts(value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

macro_rules! int_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn accepts(value: &Value) -> bool {
                    matches!(value, Value::Int(i) if <$ty>::try_from(*i).is_ok())
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| Value::Int(i)),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

int_value!(i32, i64, u32, usize);

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

/// Saturates at `i64::MAX`.
impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::Int(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn accepts(value: &Value) -> bool {
        matches!(value, Value::Float(_) | Value::Int(_))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(other),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "String";

    fn accepts(value: &Value) -> bool {
        matches!(value, Value::Text(_))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl IntoValue for SharedObject {
    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

impl FromValue for SharedObject {
    const TYPE_NAME: &'static str = "SharedObject";

    fn accepts(value: &Value) -> bool {
        matches!(value, Value::Object(_))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(other),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TYPE_NAME: &'static str = "Option";

    fn accepts(value: &Value) -> bool {
        value.is_null() || T::accepts(value)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

macro_rules! value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.into_value()
                }
            }
        )*
    };
}

value_from!(bool, i32, i64, u32, usize, f64, String, &str, SharedObject);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Text("Ann".into()).to_string(), "Ann");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Bool(true)]).to_string(),
            "[1, true]"
        );
    }

    #[test]
    fn test_natural_cmp_numbers() {
        assert_eq!(Value::Int(1).natural_cmp(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(
            Value::Int(3).natural_cmp(&Value::Float(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Float(1.0).natural_cmp(&Value::Int(1)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_natural_cmp_incomparable() {
        assert_eq!(Value::Int(1).natural_cmp(&Value::Text("1".into())), None);
        assert_eq!(Value::Null.natural_cmp(&Value::Null), None);
        assert_eq!(Value::Float(f64::NAN).natural_cmp(&Value::Float(1.0)), None);
    }

    #[test]
    fn test_int_conversions() {
        assert_eq!(i32::from_value(Value::Int(7)), Ok(7));
        assert!(!u32::accepts(&Value::Int(-1)));
        assert!(i64::from_value(Value::Text("7".into())).is_err());
    }

    #[test]
    fn test_large_usize_saturates() {
        assert_eq!(42usize.into_value(), Value::Int(42));
        assert_eq!(usize::MAX.into_value(), Value::Int(i64::MAX));
        assert_eq!(u32::MAX.into_value(), Value::Int(i64::from(u32::MAX)));
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::Text("x".into())),
            Ok(Some("x".to_string()))
        );
        assert_eq!(None::<i32>.into_value(), Value::Null);
    }
}
