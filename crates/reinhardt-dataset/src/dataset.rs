//! Datasets: named collections of tables.

use crate::error::{DataSetError, DataSetResult};
use crate::table::Table;

/// An ordered collection of uniquely named tables.
///
/// Table names are compared case-insensitively unless the dataset was
/// created with [`DataSet::case_sensitive`].
///
/// # Examples
///
/// ```
/// use reinhardt_dataset::{DataSet, Table};
///
/// let person = Table::builder("person").column("id").row([1]).build().unwrap();
/// let data_set = DataSet::new(vec![person]).unwrap();
///
/// assert_eq!(data_set.table_names(), vec!["person"]);
/// assert!(data_set.table("PERSON").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
	tables: Vec<Table>,
	case_sensitive: bool,
}

impl DataSet {
	/// Creates a case-insensitive dataset.
	///
	/// # Errors
	///
	/// Returns [`DataSetError::DuplicateTable`] if two tables share a name.
	pub fn new(tables: Vec<Table>) -> DataSetResult<Self> {
		Self::with_case_sensitivity(tables, false)
	}

	/// Creates a dataset whose table names are matched case-sensitively.
	pub fn case_sensitive(tables: Vec<Table>) -> DataSetResult<Self> {
		Self::with_case_sensitivity(tables, true)
	}

	/// Creates a dataset with explicit table name case sensitivity.
	pub fn with_case_sensitivity(tables: Vec<Table>, case_sensitive: bool) -> DataSetResult<Self> {
		let mut data_set = Self {
			tables: Vec::with_capacity(tables.len()),
			case_sensitive,
		};
		for table in tables {
			if data_set.find_table(table.name()).is_some() {
				return Err(DataSetError::DuplicateTable(table.name().to_string()));
			}
			data_set.tables.push(table);
		}
		Ok(data_set)
	}

	/// Creates an empty dataset.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Returns true if table names are matched case-sensitively.
	pub fn is_case_sensitive(&self) -> bool {
		self.case_sensitive
	}

	fn names_equal(&self, a: &str, b: &str) -> bool {
		if self.case_sensitive {
			a == b
		} else {
			a.eq_ignore_ascii_case(b)
		}
	}

	/// Looks a table up by name.
	pub fn find_table(&self, name: &str) -> Option<&Table> {
		self.tables.iter().find(|t| self.names_equal(t.name(), name))
	}

	/// Returns the named table.
	///
	/// # Errors
	///
	/// Returns [`DataSetError::TableNotFound`] if no such table exists.
	pub fn table(&self, name: &str) -> DataSetResult<&Table> {
		self.find_table(name)
			.ok_or_else(|| DataSetError::TableNotFound(name.to_string()))
	}

	/// Returns the table names in order.
	pub fn table_names(&self) -> Vec<&str> {
		self.tables.iter().map(Table::name).collect()
	}

	/// Returns the tables in order.
	pub fn tables(&self) -> &[Table] {
		&self.tables
	}

	/// Returns the number of tables.
	pub fn len(&self) -> usize {
		self.tables.len()
	}

	/// Returns true if the dataset has no tables.
	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	/// Consumes the dataset, returning its tables.
	pub fn into_tables(self) -> Vec<Table> {
		self.tables
	}

	/// Returns a new dataset with every table passed through `f`.
	pub fn map_tables<F>(&self, f: F) -> DataSet
	where
		F: FnMut(&Table) -> Table,
	{
		DataSet {
			tables: self.tables.iter().map(f).collect(),
			case_sensitive: self.case_sensitive,
		}
	}

	/// Merges several datasets into one.
	///
	/// When `combine` is true, tables sharing a name are concatenated in
	/// order. Otherwise a shared name is an error.
	///
	/// # Arguments
	///
	/// * `sets` - Datasets in merge order
	/// * `combine` - Whether same-named tables are concatenated
	/// * `case_sensitive` - Table name case sensitivity of the result
	///
	/// # Errors
	///
	/// Returns [`DataSetError::DuplicateTable`] when `combine` is false and
	/// two datasets contain the same table.
	pub fn composite<I>(sets: I, combine: bool, case_sensitive: bool) -> DataSetResult<DataSet>
	where
		I: IntoIterator<Item = DataSet>,
	{
		let mut merged = DataSet {
			tables: Vec::new(),
			case_sensitive,
		};
		for set in sets {
			for table in set.tables {
				let existing = merged
					.tables
					.iter()
					.position(|t| merged.names_equal(t.name(), table.name()));
				match existing {
					Some(index) if combine => {
						merged.tables[index] = merged.tables[index].concat(&table);
					}
					Some(_) => {
						return Err(DataSetError::DuplicateTable(table.name().to_string()));
					}
					None => merged.tables.push(table),
				}
			}
		}
		Ok(merged)
	}
}
