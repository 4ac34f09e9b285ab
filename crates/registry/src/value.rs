use serde::{Deserialize, Serialize};

/// A dynamically typed argument or return value.
///
/// The registry never inspects values; they pass through callables
/// untouched. The variants cover what host glue actually sends across
/// a method boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// No value (a method invoked for its side effects).
	Unit,
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
	/// String value.
	Str(String),
	/// Ordered list of values.
	List(Vec<Value>),
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the list contents if this is a `List` variant.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Unit => "unit",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "str",
			Value::List(_) => "list",
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::List(v)
	}
}

#[cfg(test)]
mod tests {
	use super::Value;

	#[test]
	fn accessors_match_variants() {
		assert_eq!(Value::Int(7).as_int(), Some(7));
		assert_eq!(Value::Int(7).as_bool(), None);
		assert_eq!(Value::Str("x".into()).as_str(), Some("x"));
		assert_eq!(Value::Bool(true).as_bool(), Some(true));
		assert_eq!(Value::Unit.type_name(), "unit");
	}

	#[test]
	fn from_impls_pick_the_right_variant() {
		assert_eq!(Value::from(3i64), Value::Int(3));
		assert_eq!(Value::from("hi"), Value::Str("hi".into()));
		assert_eq!(Value::from(vec![Value::Unit]), Value::List(vec![Value::Unit]));
	}
}
