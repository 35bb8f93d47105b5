//! Cell values.
//!
//! A cell in a [`Table`](crate::Table) is either *absent* (`None`, meaning the
//! value was not supplied and is not asserted), an explicit [`Value::Null`],
//! or a literal scalar.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::error::{DataSetError, DataSetResult};

/// Scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit SQL NULL.
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
}

impl Value {
	/// Returns true if this is an explicit null.
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the string content if this is a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the integer content if this is an integer value.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Textual rendering used for loose comparison and sorting.
	///
	/// Returns `None` for [`Value::Null`].
	pub fn as_text(&self) -> Option<Cow<'_, str>> {
		match self {
			Value::Null => None,
			Value::Bool(b) => Some(Cow::Owned(b.to_string())),
			Value::Int(i) => Some(Cow::Owned(i.to_string())),
			Value::Float(f) => Some(Cow::Owned(f.to_string())),
			Value::String(s) => Some(Cow::Borrowed(s)),
		}
	}

	fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(i) => Some(*i as f64),
			Value::Float(f) => Some(*f),
			Value::String(s) => s.trim().parse().ok(),
			_ => None,
		}
	}

	/// Compares two values the way a database comparison would.
	///
	/// Values of the same kind compare directly. Integers and floats compare
	/// numerically. A string compared with a number or boolean is parsed
	/// into the other kind first, so an expected `"10"` matches an actual
	/// `Int(10)`. `Null` only matches `Null`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_dataset::Value;
	///
	/// assert!(Value::from("10").matches(&Value::Int(10)));
	/// assert!(Value::Int(1).matches(&Value::Float(1.0)));
	/// assert!(!Value::Null.matches(&Value::from("")));
	/// ```
	pub fn matches(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Null, _) | (_, Value::Null) => false,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
				s.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" })
			}
			(Value::Bool(_), _) | (_, Value::Bool(_)) => false,
			_ => match (self.as_f64(), other.as_f64()) {
				(Some(a), Some(b)) => a == b,
				_ => false,
			},
		}
	}

	/// Converts a JSON scalar into a cell value.
	///
	/// Arrays and objects are rejected since a cell holds a single scalar.
	pub fn from_json(value: serde_json::Value) -> DataSetResult<Self> {
		match value {
			serde_json::Value::Null => Ok(Value::Null),
			serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Ok(Value::Int(i))
				} else if let Some(f) = n.as_f64() {
					Ok(Value::Float(f))
				} else {
					Err(DataSetError::InvalidFormat(format!(
						"Number {} cannot be represented",
						n
					)))
				}
			}
			serde_json::Value::String(s) => Ok(Value::String(s)),
			other => Err(DataSetError::InvalidFormat(format!(
				"Cell values must be scalars, got {}",
				other
			))),
		}
	}
}

/// Total order over optional cells used for row sorting.
///
/// Absent cells sort before `Null`, which sorts before any literal. Literals
/// that read as numbers, including numeric strings, sort numerically ahead
/// of the rest, which sort by text. Values that [`Value::matches`] treats as
/// equal therefore land in the same place whatever their kind.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use reinhardt_dataset::value::compare_cells;
/// use reinhardt_dataset::Value;
///
/// let nine = Value::Int(9);
/// let ten = Value::from("10");
/// assert_eq!(compare_cells(Some(&nine), Some(&ten)), Ordering::Less);
/// ```
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => compare_values(a, b),
	}
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
	match (a.as_text(), b.as_text()) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(ta), Some(tb)) => match (a.as_f64(), b.as_f64()) {
			(Some(x), Some(y)) => x.total_cmp(&y),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => ta.cmp(&tb),
		},
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Bool(b) => write!(f, "{}", b),
			Value::Int(i) => write!(f, "{}", i),
			Value::Float(v) => write!(f, "{}", v),
			Value::String(s) => write!(f, "\"{}\"", s),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i as i64)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}
