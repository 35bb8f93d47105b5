//! In-memory store for exercising fixtures without a database.
//!
//! [`InMemoryDatabase`] keeps tables as plain rows and applies operations
//! with primary-key semantics close to a relational store. It records every
//! executed operation and counts close calls so tests can observe what the
//! orchestrator did.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reinhardt_dataset::value::compare_cells;
use reinhardt_dataset::{DataSet, Table, Value};

use crate::connection::{ConnectionProvider, DatabaseConnection};
use crate::error::{FixtureError, FixtureResult};
use crate::operation::{NativeOperation, OperationKind};

type QueryFn = Arc<dyn Fn(&DataSet) -> FixtureResult<Table> + Send + Sync>;

/// An operation the store executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedOperation {
	/// Operation as received.
	pub operation: NativeOperation,
	/// Tables of the dataset it was applied to.
	pub tables: Vec<String>,
}

#[derive(Debug, Clone)]
struct StoredTable {
	name: String,
	columns: Vec<String>,
	primary_key: Vec<usize>,
	rows: Vec<Vec<Value>>,
}

impl StoredTable {
	fn column_index(&self, name: &str) -> Option<usize> {
		self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
	}

	fn to_table(&self) -> FixtureResult<Table> {
		let mut rows = self.rows.clone();
		if !self.primary_key.is_empty() {
			rows.sort_by(|a, b| {
				self.primary_key
					.iter()
					.map(|&i| compare_cells(a.get(i), b.get(i)))
					.find(|o| o.is_ne())
					.unwrap_or(std::cmp::Ordering::Equal)
			});
		}
		let mut builder = Table::builder(self.name.as_str()).columns(&self.columns);
		for row in rows {
			builder = builder.row(row);
		}
		Ok(builder.build()?)
	}
}

#[derive(Default)]
struct State {
	tables: Vec<StoredTable>,
	sequences: HashMap<String, i64>,
	queries: HashMap<String, QueryFn>,
	log: Vec<ExecutedOperation>,
	execute_failures: HashMap<OperationKind, String>,
	close_failure: Option<String>,
	close_count: usize,
}

impl State {
	fn snapshot(&self) -> FixtureResult<DataSet> {
		let tables = self
			.tables
			.iter()
			.map(StoredTable::to_table)
			.collect::<FixtureResult<Vec<_>>>()?;
		Ok(DataSet::new(tables)?)
	}
}

/// In-memory implementation of [`DatabaseConnection`].
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::testing::InMemoryDatabase;
/// use reinhardt_dataset::Value;
///
/// let database = InMemoryDatabase::new().with_table("person", &["id", "name"], &["id"]);
/// database.insert_row("person", &[("id", Value::Int(1)), ("name", Value::from("wang"))]).unwrap();
/// assert_eq!(database.row_count("person"), Some(1));
/// ```
#[derive(Default)]
pub struct InMemoryDatabase {
	state: Mutex<State>,
}

impl InMemoryDatabase {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Defines a table.
	///
	/// Primary key columns that are not among `columns` are ignored.
	pub fn with_table(self, name: &str, columns: &[&str], primary_key: &[&str]) -> Self {
		{
			let mut state = self.state.lock();
			let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
			let primary_key = primary_key
				.iter()
				.filter_map(|key| columns.iter().position(|c| c.eq_ignore_ascii_case(key)))
				.collect();
			state.tables.push(StoredTable {
				name: name.to_string(),
				columns,
				primary_key,
				rows: Vec::new(),
			});
		}
		self
	}

	/// Defines a sequence whose next value is `next`.
	pub fn with_sequence(self, name: &str, next: i64) -> Self {
		self.state.lock().sequences.insert(name.to_string(), next);
		self
	}

	/// Registers the result of a query.
	///
	/// `result` receives a snapshot of the store and returns the rows the
	/// query would produce.
	pub fn with_query<F>(self, query: &str, result: F) -> Self
	where
		F: Fn(&DataSet) -> FixtureResult<Table> + Send + Sync + 'static,
	{
		self.state
			.lock()
			.queries
			.insert(query.trim().to_string(), Arc::new(result));
		self
	}

	/// Makes every execution of `kind` fail with `message`.
	pub fn fail_on_execute(&self, kind: OperationKind, message: &str) {
		self.state
			.lock()
			.execute_failures
			.insert(kind, message.to_string());
	}

	/// Makes every close fail with `message`.
	pub fn fail_on_close(&self, message: &str) {
		self.state.lock().close_failure = Some(message.to_string());
	}

	/// Inserts one row, outside of any fixture operation.
	pub fn insert_row(&self, table: &str, cells: &[(&str, Value)]) -> FixtureResult<()> {
		let mut state = self.state.lock();
		let stored = find_table(&mut state.tables, table)?;
		let mut row = vec![Value::Null; stored.columns.len()];
		for (column, value) in cells {
			let index = column_of(stored, column)?;
			row[index] = value.clone();
		}
		stored.rows.push(row);
		Ok(())
	}

	/// Sets `column` to `value` in every row whose `key_column` matches `key`.
	///
	/// Returns the number of rows changed.
	pub fn set_value(
		&self,
		table: &str,
		(key_column, key): (&str, Value),
		column: &str,
		value: Value,
	) -> FixtureResult<usize> {
		let mut state = self.state.lock();
		let stored = find_table(&mut state.tables, table)?;
		let key_index = column_of(stored, key_column)?;
		let index = column_of(stored, column)?;
		let mut changed = 0;
		for row in stored.rows.iter_mut().filter(|row| row[key_index].matches(&key)) {
			row[index] = value.clone();
			changed += 1;
		}
		Ok(changed)
	}

	/// Returns the number of rows in `table`, if it exists.
	pub fn row_count(&self, table: &str) -> Option<usize> {
		let state = self.state.lock();
		state
			.tables
			.iter()
			.find(|t| t.name.eq_ignore_ascii_case(table))
			.map(|t| t.rows.len())
	}

	/// Returns the current contents of `table`.
	pub fn table(&self, name: &str) -> FixtureResult<Table> {
		let mut state = self.state.lock();
		find_table(&mut state.tables, name)?.to_table()
	}

	/// Returns every operation executed so far.
	pub fn operations(&self) -> Vec<ExecutedOperation> {
		self.state.lock().log.clone()
	}

	/// Returns how many times the connection was closed.
	pub fn close_count(&self) -> usize {
		self.state.lock().close_count
	}
}

impl fmt::Debug for InMemoryDatabase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("InMemoryDatabase")
			.field("tables", &state.tables.iter().map(|t| &t.name).collect::<Vec<_>>())
			.field("close_count", &state.close_count)
			.finish_non_exhaustive()
	}
}

fn find_table<'a>(tables: &'a mut [StoredTable], name: &str) -> FixtureResult<&'a mut StoredTable> {
	tables
		.iter_mut()
		.find(|t| t.name.eq_ignore_ascii_case(name))
		.ok_or_else(|| FixtureError::connection(format!("Table '{}' does not exist", name)))
}

fn column_of(table: &StoredTable, column: &str) -> FixtureResult<usize> {
	table.column_index(column).ok_or_else(|| {
		FixtureError::connection(format!(
			"Column '{}' does not exist in table '{}'",
			column, table.name
		))
	})
}

/// Dataset row mapped onto stored column positions.
type MappedRow = Vec<(usize, Value)>;

fn map_rows(stored: &StoredTable, table: &Table) -> FixtureResult<Vec<MappedRow>> {
	let positions = table
		.columns()
		.iter()
		.map(|c| column_of(stored, c.name()))
		.collect::<FixtureResult<Vec<_>>>()?;
	Ok(table
		.rows()
		.iter()
		.map(|row| {
			positions
				.iter()
				.enumerate()
				.filter_map(|(i, &position)| row.get(i).map(|v| (position, v.clone())))
				.collect()
		})
		.collect())
}

fn key_matches(stored: &StoredTable, existing: &[Value], row: &MappedRow) -> FixtureResult<bool> {
	if stored.primary_key.is_empty() {
		return Err(FixtureError::connection(format!(
			"Table '{}' has no primary key",
			stored.name
		)));
	}
	for &key in &stored.primary_key {
		let value = row
			.iter()
			.find(|(position, _)| *position == key)
			.map(|(_, value)| value)
			.ok_or_else(|| {
				FixtureError::connection(format!(
					"Row for table '{}' is missing primary key column '{}'",
					stored.name, stored.columns[key]
				))
			})?;
		if !existing[key].matches(value) {
			return Ok(false);
		}
	}
	Ok(true)
}

fn find_row(stored: &StoredTable, row: &MappedRow) -> FixtureResult<Option<usize>> {
	for (index, existing) in stored.rows.iter().enumerate() {
		if key_matches(stored, existing, row)? {
			return Ok(Some(index));
		}
	}
	Ok(None)
}

fn insert(stored: &mut StoredTable, row: MappedRow) -> FixtureResult<()> {
	if !stored.primary_key.is_empty() && find_row(stored, &row)?.is_some() {
		return Err(FixtureError::connection(format!(
			"Duplicate primary key in table '{}'",
			stored.name
		)));
	}
	let mut new_row = vec![Value::Null; stored.columns.len()];
	for (position, value) in row {
		new_row[position] = value;
	}
	stored.rows.push(new_row);
	Ok(())
}

fn update(stored: &mut StoredTable, index: usize, row: MappedRow) {
	for (position, value) in row {
		stored.rows[index][position] = value;
	}
}

fn apply(stored: &mut StoredTable, kind: OperationKind, rows: Vec<MappedRow>) -> FixtureResult<()> {
	match kind {
		OperationKind::Insert => {
			for row in rows {
				insert(stored, row)?;
			}
		}
		OperationKind::Update => {
			for row in rows {
				let index = find_row(stored, &row)?.ok_or_else(|| {
					FixtureError::connection(format!("No row to update in table '{}'", stored.name))
				})?;
				update(stored, index, row);
			}
		}
		OperationKind::Refresh => {
			for row in rows {
				match find_row(stored, &row)? {
					Some(index) => update(stored, index, row),
					None => insert(stored, row)?,
				}
			}
		}
		OperationKind::Delete => {
			for row in rows {
				while let Some(index) = find_row(stored, &row)? {
					stored.rows.remove(index);
				}
			}
		}
		OperationKind::DeleteAll | OperationKind::TruncateTable => stored.rows.clear(),
		OperationKind::CleanInsert => {
			stored.rows.clear();
			for row in rows {
				insert(stored, row)?;
			}
		}
	}
	Ok(())
}

#[async_trait]
impl DatabaseConnection for InMemoryDatabase {
	async fn execute(&self, operation: NativeOperation, data_set: &DataSet) -> FixtureResult<()> {
		let mut state = self.state.lock();
		if let Some(message) = state.execute_failures.get(&operation.kind) {
			return Err(FixtureError::connection(message.clone()));
		}
		let mut tables = state.tables.clone();
		for table in data_set.tables() {
			let stored = find_table(&mut tables, table.name())?;
			let rows = map_rows(stored, table)?;
			apply(stored, operation.kind, rows)?;
		}
		state.tables = tables;
		state.log.push(ExecutedOperation {
			operation,
			tables: data_set.table_names().iter().map(|t| t.to_string()).collect(),
		});
		Ok(())
	}

	async fn create_data_set(&self) -> FixtureResult<DataSet> {
		self.state.lock().snapshot()
	}

	async fn create_table(&self, name: &str) -> FixtureResult<Table> {
		self.table(name)
	}

	async fn create_query_table(&self, name: &str, query: &str) -> FixtureResult<Table> {
		let (result, snapshot) = {
			let state = self.state.lock();
			let result = state.queries.get(query.trim()).cloned().ok_or_else(|| {
				FixtureError::connection(format!("Unsupported query: {}", query))
			})?;
			(result, state.snapshot()?)
		};
		Ok(result(&snapshot)?.renamed(name))
	}

	async fn next_sequence_value(&self, sequence: &str) -> FixtureResult<i64> {
		let mut state = self.state.lock();
		let next = state.sequences.get_mut(sequence).ok_or_else(|| {
			FixtureError::connection(format!("Sequence '{}' does not exist", sequence))
		})?;
		let value = *next;
		*next += 1;
		Ok(value)
	}

	async fn close(&self) -> FixtureResult<()> {
		let mut state = self.state.lock();
		state.close_count += 1;
		match &state.close_failure {
			Some(message) => Err(FixtureError::connection(message.clone())),
			None => Ok(()),
		}
	}
}

/// Serves [`InMemoryDatabase`]s by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
	databases: HashMap<String, Arc<InMemoryDatabase>>,
}

impl InMemoryProvider {
	/// Creates a provider with no databases.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a database under `name`.
	pub fn with_database(mut self, name: &str, database: Arc<InMemoryDatabase>) -> Self {
		self.databases.insert(name.to_string(), database);
		self
	}
}

#[async_trait]
impl ConnectionProvider for InMemoryProvider {
	fn contains(&self, name: &str) -> bool {
		self.databases.contains_key(name)
	}

	async fn connect(&self, name: &str) -> FixtureResult<Arc<dyn DatabaseConnection>> {
		let database = self
			.databases
			.get(name)
			.ok_or_else(|| FixtureError::resolution(format!("No database named '{}'", name)))?;
		Ok(Arc::clone(database) as Arc<dyn DatabaseConnection>)
	}
}
