//! Error types for fixture orchestration.

use std::fmt;

use reinhardt_dataset::{DataSetError, Value};
use thiserror::Error;

/// Errors raised while preparing, verifying or cleaning up a test.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// Misuse of the fixture configuration, such as an unknown operation kind
	/// or a query expectation without a table name.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// A connection or dataset could not be located.
	#[error("Resolution error: {0}")]
	Resolution(String),

	/// One or more expectations did not match the database.
	#[error(transparent)]
	Assertion(#[from] AssertionFailure),

	/// The store driver reported a failure.
	#[error("Connection error: {0}")]
	Connection(String),

	/// Dataset loading or access failed.
	#[error(transparent)]
	DataSet(#[from] DataSetError),

	/// Settings could not be read.
	#[error("Settings error: {0}")]
	Settings(String),

	/// The test body failed. The body's own error is kept as the source.
	#[error("Test failed: {0}")]
	TestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FixtureError {
	/// Creates a configuration error.
	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}

	/// Creates a resolution error.
	pub fn resolution(message: impl Into<String>) -> Self {
		Self::Resolution(message.into())
	}

	/// Creates a store driver error.
	pub fn connection(message: impl Into<String>) -> Self {
		Self::Connection(message.into())
	}

	/// Returns the assertion failure, if this is one.
	pub fn as_assertion(&self) -> Option<&AssertionFailure> {
		match self {
			Self::Assertion(failure) => Some(failure),
			_ => None,
		}
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// What differed between the expected and actual data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MismatchKind {
	/// Different number of tables.
	#[error("expected {expected} tables but was {actual}")]
	TableCount {
		/// Expected table count.
		expected: usize,
		/// Actual table count.
		actual: usize,
	},

	/// Same number of tables, different names.
	#[error("expected tables {expected:?} but was {actual:?}")]
	TableNames {
		/// Expected table names, sorted.
		expected: Vec<String>,
		/// Actual table names, sorted.
		actual: Vec<String>,
	},

	/// An expected table is missing from the actual data.
	#[error("table does not exist")]
	MissingTable,

	/// Different number of rows.
	#[error("expected {expected} rows but was {actual}")]
	RowCount {
		/// Expected row count.
		expected: usize,
		/// Actual row count.
		actual: usize,
	},

	/// Different compared column sets.
	#[error("expected columns {expected:?} but was {actual:?}")]
	Columns {
		/// Expected column names, sorted.
		expected: Vec<String>,
		/// Actual column names, sorted.
		actual: Vec<String>,
	},

	/// A cell differs.
	#[error(
		"row {row}, column {column}: expected {} but was {}",
		display_cell(.expected),
		display_cell(.actual)
	)]
	Value {
		/// Row index.
		row: usize,
		/// Column name.
		column: String,
		/// Expected cell.
		expected: Option<Value>,
		/// Actual cell.
		actual: Option<Value>,
	},
}

fn display_cell(cell: &Option<Value>) -> String {
	match cell {
		Some(value) => value.to_string(),
		None => "<absent>".to_string(),
	}
}

/// A single comparison failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
	/// Table the mismatch was found in, if table-specific.
	pub table: Option<String>,
	/// What differed.
	pub kind: MismatchKind,
}

impl Mismatch {
	/// Creates a mismatch not tied to a table.
	pub fn data_set(kind: MismatchKind) -> Self {
		Self { table: None, kind }
	}

	/// Creates a mismatch in `table`.
	pub fn table(table: impl Into<String>, kind: MismatchKind) -> Self {
		Self {
			table: Some(table.into()),
			kind,
		}
	}
}

impl fmt::Display for Mismatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.table {
			Some(table) => write!(f, "table {}: {}", table, self.kind),
			None => write!(f, "{}", self.kind),
		}
	}
}

impl std::error::Error for Mismatch {}

/// A mismatch attributed to the expectation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationMismatch {
	/// Dataset locations of the expectation.
	pub locations: Vec<String>,
	/// Connection the expectation was checked against.
	pub connection: String,
	/// First mismatch found.
	pub mismatch: Mismatch,
}

/// Combined result of every failed expectation of a test.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssertionFailure {
	/// Failures in evaluation order.
	pub failures: Vec<ExpectationMismatch>,
}

impl AssertionFailure {
	/// Returns true if nothing failed.
	pub fn is_empty(&self) -> bool {
		self.failures.is_empty()
	}

	/// Records a failure.
	pub fn push(&mut self, failure: ExpectationMismatch) {
		self.failures.push(failure);
	}
}

impl fmt::Display for AssertionFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} database expectation(s) failed", self.failures.len())?;
		for failure in &self.failures {
			write!(
				f,
				"\n  {:?} on connection '{}': {}",
				failure.locations, failure.connection, failure.mismatch
			)?;
		}
		Ok(())
	}
}

impl std::error::Error for AssertionFailure {}
