//! Connection registry.
//!
//! Owns the connections opened for one test and closes them all at the end.

use std::sync::Arc;

use crate::connection::{ConnectionHandle, ConnectionProvider};
use crate::error::{FixtureError, FixtureResult};

/// Named connections of one test execution.
///
/// With exactly one connection, every name (including the blank default
/// name) resolves to it. With several, names must match exactly; a blank
/// name resolves to the declared default, if any.
#[derive(Debug, Clone)]
pub struct DatabaseConnections {
	handles: Vec<Arc<ConnectionHandle>>,
	default: Option<String>,
}

impl DatabaseConnections {
	/// Creates a registry from already opened handles.
	pub fn new(handles: Vec<ConnectionHandle>, default: Option<String>) -> Self {
		Self {
			handles: handles.into_iter().map(Arc::new).collect(),
			default,
		}
	}

	/// Opens every named connection.
	///
	/// If opening one fails, the connections opened so far are closed before
	/// the error is returned.
	///
	/// # Arguments
	///
	/// * `provider` - Source of connections
	/// * `names` - Connection names, in order
	/// * `default` - Name used for blank lookups when several are open
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Resolution`] if `names` is empty or the
	/// provider does not know a name, or the provider's error if it fails to
	/// connect.
	pub async fn open(
		provider: &dyn ConnectionProvider,
		names: &[String],
		default: Option<&str>,
	) -> FixtureResult<Self> {
		if names.is_empty() {
			return Err(FixtureError::resolution(
				"No database connection names were configured",
			));
		}
		let mut opened = Self {
			handles: Vec::with_capacity(names.len()),
			default: default.map(str::to_string),
		};
		for name in names {
			let connection = if provider.contains(name) {
				provider.connect(name).await
			} else {
				Err(FixtureError::resolution(format!(
					"Unable to find a database connection named '{}'",
					name
				)))
			};
			match connection {
				Ok(connection) => {
					tracing::debug!(connection = %name, "opened database connection");
					opened
						.handles
						.push(Arc::new(ConnectionHandle::new(name.as_str(), connection)));
				}
				Err(e) => {
					if let Err(close_error) = opened.close_all().await {
						tracing::warn!(error = %close_error, "failed to close connection after open failure");
					}
					return Err(e);
				}
			}
		}
		Ok(opened)
	}

	/// Looks a connection up by name.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Configuration`] if the name is unknown, or blank
	/// while several connections are open and no default is declared.
	pub fn get(&self, name: &str) -> FixtureResult<Arc<ConnectionHandle>> {
		if let [only] = self.handles.as_slice() {
			return Ok(Arc::clone(only));
		}
		let name = name.trim();
		let name = if name.is_empty() {
			self.default.as_deref().ok_or_else(|| {
				FixtureError::configuration(format!(
					"A connection name is required when several connections are configured: {:?}",
					self.names()
				))
			})?
		} else {
			name
		};
		self.handles
			.iter()
			.find(|handle| handle.name() == name)
			.cloned()
			.ok_or_else(|| {
				FixtureError::configuration(format!(
					"Unknown database connection '{}', available: {:?}",
					name,
					self.names()
				))
			})
	}

	/// Returns the connection names in open order.
	pub fn names(&self) -> Vec<&str> {
		self.handles.iter().map(|h| h.name()).collect()
	}

	/// Returns the number of connections.
	pub fn len(&self) -> usize {
		self.handles.len()
	}

	/// Returns true if no connection is open.
	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}

	/// Returns true once every connection has been closed.
	pub fn all_closed(&self) -> bool {
		self.handles.iter().all(|h| h.is_closed())
	}

	/// Closes every connection.
	///
	/// A failure does not stop the remaining connections from being closed.
	///
	/// # Errors
	///
	/// Returns the first close failure.
	pub async fn close_all(&self) -> FixtureResult<()> {
		let mut first_error = None;
		for handle in &self.handles {
			if let Err(e) = handle.close().await {
				tracing::warn!(connection = %handle.name(), error = %e, "failed to close database connection");
				if first_error.is_none() {
					first_error = Some(e);
				}
			}
		}
		match first_error {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}
}
