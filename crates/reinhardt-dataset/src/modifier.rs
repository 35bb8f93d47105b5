//! Dataset modifiers.
//!
//! Modifiers rewrite a loaded [`DataSet`] before it is used, for example to
//! turn a literal `[null]` marker into an explicit null.

use std::fmt;
use std::sync::Arc;

use crate::dataset::DataSet;
use crate::error::DataSetResult;
use crate::value::Value;

/// Rewrites a dataset.
pub trait DataSetModifier: Send + Sync {
	/// Returns the modified dataset.
	fn modify(&self, data_set: DataSet) -> DataSetResult<DataSet>;
}

impl<F> DataSetModifier for F
where
	F: Fn(DataSet) -> DataSetResult<DataSet> + Send + Sync,
{
	fn modify(&self, data_set: DataSet) -> DataSetResult<DataSet> {
		self(data_set)
	}
}

/// Replaces cell values.
///
/// Object replacements match a whole cell and take priority. Substring
/// replacements then apply, in registration order, to string cells that no
/// object replacement matched. Absent cells are never touched.
///
/// # Examples
///
/// ```
/// use reinhardt_dataset::{DataSet, DataSetModifier, ReplacementModifier, Table, Value};
///
/// let table = Table::builder("person")
/// 	.columns(["name", "nickname"])
/// 	.row([Value::from("[null]"), Value::from("the ${who}")])
/// 	.build()
/// 	.unwrap();
/// let modifier = ReplacementModifier::null_token("[null]").with_substring("${who}", "boss");
///
/// let modified = modifier.modify(DataSet::new(vec![table]).unwrap()).unwrap();
/// let person = modified.table("person").unwrap();
/// assert_eq!(person.value(0, "name").unwrap(), Some(&Value::Null));
/// assert_eq!(person.value(0, "nickname").unwrap(), Some(&Value::from("the boss")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReplacementModifier {
	objects: Vec<(Value, Value)>,
	substrings: Vec<(String, String)>,
}

impl ReplacementModifier {
	/// Creates a modifier with no replacements.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a modifier replacing the literal `token` with an explicit null.
	pub fn null_token(token: impl Into<String>) -> Self {
		Self::new().with_object(Value::String(token.into()), Value::Null)
	}

	/// Adds a whole-cell replacement.
	pub fn with_object(mut self, original: impl Into<Value>, replacement: impl Into<Value>) -> Self {
		self.objects.push((original.into(), replacement.into()));
		self
	}

	/// Adds a substring replacement.
	pub fn with_substring(
		mut self,
		original: impl Into<String>,
		replacement: impl Into<String>,
	) -> Self {
		self.substrings.push((original.into(), replacement.into()));
		self
	}

	fn replace(&self, value: &Value) -> Value {
		if let Some((_, replacement)) = self.objects.iter().find(|(original, _)| original == value) {
			return replacement.clone();
		}
		match value {
			Value::String(s) if !self.substrings.is_empty() => {
				let replaced = self
					.substrings
					.iter()
					.fold(s.clone(), |acc, (from, to)| acc.replace(from.as_str(), to));
				Value::String(replaced)
			}
			other => other.clone(),
		}
	}
}

impl DataSetModifier for ReplacementModifier {
	fn modify(&self, data_set: DataSet) -> DataSetResult<DataSet> {
		Ok(data_set.map_tables(|table| {
			table.map_cells(|_, _, cell| cell.map(|value| self.replace(value)))
		}))
	}
}

/// Ordered list of modifiers applied one after another.
#[derive(Clone, Default)]
pub struct ModifierChain {
	modifiers: Vec<Arc<dyn DataSetModifier>>,
}

impl ModifierChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a modifier.
	pub fn push(&mut self, modifier: Arc<dyn DataSetModifier>) {
		self.modifiers.push(modifier);
	}

	/// Appends a modifier, builder style.
	pub fn with(mut self, modifier: Arc<dyn DataSetModifier>) -> Self {
		self.push(modifier);
		self
	}

	/// Returns the number of modifiers.
	pub fn len(&self) -> usize {
		self.modifiers.len()
	}

	/// Returns true if the chain is empty.
	pub fn is_empty(&self) -> bool {
		self.modifiers.is_empty()
	}
}

impl fmt::Debug for ModifierChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModifierChain")
			.field("len", &self.modifiers.len())
			.finish()
	}
}

impl FromIterator<Arc<dyn DataSetModifier>> for ModifierChain {
	fn from_iter<I: IntoIterator<Item = Arc<dyn DataSetModifier>>>(iter: I) -> Self {
		Self {
			modifiers: iter.into_iter().collect(),
		}
	}
}

impl DataSetModifier for ModifierChain {
	fn modify(&self, data_set: DataSet) -> DataSetResult<DataSet> {
		self.modifiers
			.iter()
			.try_fold(data_set, |data_set, modifier| modifier.modify(data_set))
	}
}
