//! The live-store boundary.
//!
//! Fixtures never talk to a database directly. They go through a
//! [`DatabaseConnection`] obtained by name from a [`ConnectionProvider`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reinhardt_dataset::{DataSet, Table};

use crate::error::FixtureResult;
use crate::operation::NativeOperation;

/// Operations a store must offer to fixtures.
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
	/// Applies `operation` to the rows of `data_set`.
	async fn execute(&self, operation: NativeOperation, data_set: &DataSet) -> FixtureResult<()>;

	/// Snapshots every table of the store.
	async fn create_data_set(&self) -> FixtureResult<DataSet>;

	/// Snapshots one table.
	async fn create_table(&self, name: &str) -> FixtureResult<Table>;

	/// Runs `query` and labels the result `name`.
	async fn create_query_table(&self, name: &str, query: &str) -> FixtureResult<Table>;

	/// Returns the next value of the named sequence.
	async fn next_sequence_value(&self, sequence: &str) -> FixtureResult<i64>;

	/// Releases the connection.
	async fn close(&self) -> FixtureResult<()>;
}

/// Supplies connections by name.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
	/// Returns true if a connection is registered under `name`.
	fn contains(&self, name: &str) -> bool;

	/// Opens the named connection.
	async fn connect(&self, name: &str) -> FixtureResult<Arc<dyn DatabaseConnection>>;
}

/// A named connection that is closed at most once.
pub struct ConnectionHandle {
	name: String,
	connection: Arc<dyn DatabaseConnection>,
	closed: AtomicBool,
}

impl ConnectionHandle {
	/// Wraps an open connection.
	pub fn new(name: impl Into<String>, connection: Arc<dyn DatabaseConnection>) -> Self {
		Self {
			name: name.into(),
			connection,
			closed: AtomicBool::new(false),
		}
	}

	/// Returns the connection name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the underlying connection.
	pub fn connection(&self) -> &dyn DatabaseConnection {
		self.connection.as_ref()
	}

	/// Returns true once [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	/// Closes the connection. Later calls do nothing.
	pub async fn close(&self) -> FixtureResult<()> {
		if self.closed.swap(true, Ordering::AcqRel) {
			return Ok(());
		}
		tracing::debug!(connection = %self.name, "closing database connection");
		self.connection.close().await
	}
}

impl fmt::Debug for ConnectionHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConnectionHandle")
			.field("name", &self.name)
			.field("closed", &self.is_closed())
			.finish()
	}
}
