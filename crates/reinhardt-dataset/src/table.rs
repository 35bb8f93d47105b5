//! Tables, columns and rows.

use std::cmp::Ordering;

use crate::error::{DataSetError, DataSetResult};
use crate::value::{Value, compare_cells};

/// Column metadata.
///
/// Column names are matched case-insensitively, since databases disagree on
/// the case they report identifiers in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
	name: String,
}

impl Column {
	/// Creates a column with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	/// Returns the column name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns true if `name` refers to this column.
	pub fn is_named(&self, name: &str) -> bool {
		self.name.eq_ignore_ascii_case(name)
	}
}

impl From<&str> for Column {
	fn from(name: &str) -> Self {
		Column::new(name)
	}
}

impl From<String> for Column {
	fn from(name: String) -> Self {
		Column::new(name)
	}
}

/// A row of cells aligned with the columns of its table.
///
/// `None` marks an absent cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
	cells: Vec<Option<Value>>,
}

impl Row {
	/// Returns the cell at `index`, `None` if absent or out of range.
	pub fn get(&self, index: usize) -> Option<&Value> {
		self.cells.get(index).and_then(Option::as_ref)
	}

	/// Returns all cells in column order.
	pub fn cells(&self) -> &[Option<Value>] {
		&self.cells
	}
}

/// A named table: ordered columns plus ordered rows.
///
/// # Examples
///
/// ```
/// use reinhardt_dataset::{Table, Value};
///
/// let table = Table::builder("person")
/// 	.columns(["id", "name"])
/// 	.row([Value::Int(1), Value::from("wang")])
/// 	.build()
/// 	.unwrap();
///
/// assert_eq!(table.row_count(), 1);
/// assert_eq!(table.value(0, "NAME").unwrap(), Some(&Value::from("wang")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
	name: String,
	columns: Vec<Column>,
	rows: Vec<Row>,
}

impl Table {
	/// Creates an empty table with the given columns.
	pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
		Self {
			name: name.into(),
			columns,
			rows: Vec::new(),
		}
	}

	/// Starts building a table.
	pub fn builder(name: impl Into<String>) -> TableBuilder {
		TableBuilder::new(name)
	}

	/// Returns the table name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the columns in declaration order.
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// Returns the column names in declaration order.
	pub fn column_names(&self) -> Vec<&str> {
		self.columns.iter().map(Column::name).collect()
	}

	/// Returns the position of the named column.
	pub fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.is_named(name))
	}

	/// Returns true if the table has the named column.
	pub fn has_column(&self, name: &str) -> bool {
		self.column_index(name).is_some()
	}

	/// Returns the rows in order.
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Returns the number of rows.
	pub fn row_count(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if the table has no rows.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Returns the cell at `row` in the named column.
	///
	/// `Ok(None)` means the cell is absent.
	///
	/// # Errors
	///
	/// Returns an error if the column does not exist or `row` is out of bounds.
	pub fn value(&self, row: usize, column: &str) -> DataSetResult<Option<&Value>> {
		let index = self
			.column_index(column)
			.ok_or_else(|| DataSetError::ColumnNotFound {
				table: self.name.clone(),
				column: column.to_string(),
			})?;
		let row = self.rows.get(row).ok_or(DataSetError::RowOutOfBounds {
			table: self.name.clone(),
			row,
			len: self.rows.len(),
		})?;
		Ok(row.get(index))
	}

	/// Returns a copy of this table under a different name.
	pub fn renamed(&self, name: impl Into<String>) -> Table {
		Table {
			name: name.into(),
			columns: self.columns.clone(),
			rows: self.rows.clone(),
		}
	}

	/// Returns a copy of this table without the named columns.
	pub fn without_columns<S: AsRef<str>>(&self, ignored: &[S]) -> Table {
		let keep: Vec<usize> = self
			.columns
			.iter()
			.enumerate()
			.filter(|(_, c)| !ignored.iter().any(|name| c.is_named(name.as_ref())))
			.map(|(i, _)| i)
			.collect();
		Table {
			name: self.name.clone(),
			columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
			rows: self
				.rows
				.iter()
				.map(|row| Row {
					cells: keep
						.iter()
						.map(|&i| row.cells.get(i).cloned().flatten())
						.collect(),
				})
				.collect(),
		}
	}

	/// Returns a copy of this table with rows sorted by the named columns.
	///
	/// Columns this table does not have are skipped. The sort is stable.
	pub fn sorted_by<S: AsRef<str>>(&self, columns: &[S]) -> Table {
		let indices: Vec<usize> = columns
			.iter()
			.filter_map(|name| self.column_index(name.as_ref()))
			.collect();
		let mut rows = self.rows.clone();
		rows.sort_by(|a, b| {
			indices
				.iter()
				.map(|&i| compare_cells(a.get(i), b.get(i)))
				.find(|ordering| *ordering != Ordering::Equal)
				.unwrap_or(Ordering::Equal)
		});
		Table {
			name: self.name.clone(),
			columns: self.columns.clone(),
			rows,
		}
	}

	/// Returns a copy of this table with every cell passed through `f`.
	///
	/// `f` receives the row index, the column and the current cell, and
	/// returns the new cell.
	pub fn map_cells<F>(&self, mut f: F) -> Table
	where
		F: FnMut(usize, &Column, Option<&Value>) -> Option<Value>,
	{
		let rows = self
			.rows
			.iter()
			.enumerate()
			.map(|(row_index, row)| Row {
				cells: self
					.columns
					.iter()
					.enumerate()
					.map(|(i, column)| f(row_index, column, row.get(i)))
					.collect(),
			})
			.collect();
		Table {
			name: self.name.clone(),
			columns: self.columns.clone(),
			rows,
		}
	}

	/// Appends the rows of `other` to this table.
	///
	/// Columns only `other` has are added; cells of columns a row's source
	/// table did not have become absent.
	pub fn concat(&self, other: &Table) -> Table {
		let mut columns = self.columns.clone();
		for column in &other.columns {
			if !columns.iter().any(|c| c.is_named(column.name())) {
				columns.push(column.clone());
			}
		}
		let realign = |table: &Table| -> Vec<Row> {
			let mapping: Vec<Option<usize>> = columns
				.iter()
				.map(|c| table.column_index(c.name()))
				.collect();
			table
				.rows
				.iter()
				.map(|row| Row {
					cells: mapping
						.iter()
						.map(|index| index.and_then(|i| row.get(i).cloned()))
						.collect(),
				})
				.collect()
		};
		let mut rows = realign(self);
		rows.extend(realign(other));
		Table {
			name: self.name.clone(),
			columns,
			rows,
		}
	}
}

/// Builder for [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
	name: String,
	columns: Vec<Column>,
	rows: Vec<Vec<(usize, Value)>>,
	error: Option<String>,
}

impl TableBuilder {
	/// Starts a table with no columns.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			columns: Vec::new(),
			rows: Vec::new(),
			error: None,
		}
	}

	fn ensure_column(&mut self, name: &str) -> usize {
		match self.columns.iter().position(|c| c.is_named(name)) {
			Some(index) => index,
			None => {
				self.columns.push(Column::new(name));
				self.columns.len() - 1
			}
		}
	}

	/// Declares a column.
	pub fn column(mut self, name: impl AsRef<str>) -> Self {
		self.ensure_column(name.as_ref());
		self
	}

	/// Declares several columns.
	pub fn columns<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for name in names {
			self.ensure_column(name.as_ref());
		}
		self
	}

	/// Adds a row given values in column order.
	///
	/// Fewer values than columns leave the trailing cells absent.
	pub fn row<I, V>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		let cells: Vec<(usize, Value)> = values
			.into_iter()
			.enumerate()
			.map(|(i, v)| (i, v.into()))
			.collect();
		if cells.len() > self.columns.len() && self.error.is_none() {
			self.error = Some(format!(
				"Row {} of table {} has {} values but only {} columns",
				self.rows.len(),
				self.name,
				cells.len(),
				self.columns.len()
			));
		}
		self.rows.push(cells);
		self
	}

	/// Adds a row given `(column, value)` pairs.
	///
	/// Unknown columns are added to the table; columns not named are absent.
	pub fn sparse_row<I, S, V>(mut self, cells: I) -> Self
	where
		I: IntoIterator<Item = (S, V)>,
		S: AsRef<str>,
		V: Into<Value>,
	{
		let cells: Vec<(usize, Value)> = cells
			.into_iter()
			.map(|(name, value)| (self.ensure_column(name.as_ref()), value.into()))
			.collect();
		self.rows.push(cells);
		self
	}

	/// Builds the table.
	///
	/// # Errors
	///
	/// Returns an error if a row had more values than declared columns.
	pub fn build(self) -> DataSetResult<Table> {
		if let Some(message) = self.error {
			return Err(DataSetError::InvalidFormat(message));
		}
		let width = self.columns.len();
		let rows = self
			.rows
			.into_iter()
			.map(|cells| {
				let mut row = vec![None; width];
				for (index, value) in cells {
					row[index] = Some(value);
				}
				Row { cells: row }
			})
			.collect();
		Ok(Table {
			name: self.name,
			columns: self.columns,
			rows,
		})
	}
}
