//! Operation executor.
//!
//! Applies setup and teardown directives to their connections in declaration
//! order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use reinhardt_dataset::DataSetLoader;

use crate::directive::OperationDirective;
use crate::error::{FixtureError, FixtureResult};
use crate::operation::{NativeOperation, OperationKind, OperationLookup};
use crate::registry::DatabaseConnections;
use crate::scope::TestScope;

/// Which side of the test body directives run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Before the test body.
	Setup,
	/// After the test body.
	Teardown,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Setup => write!(f, "setup"),
			Self::Teardown => write!(f, "teardown"),
		}
	}
}

/// Applies operation directives.
///
/// Within one call, a `CLEAN_INSERT` that directly follows another
/// `CLEAN_INSERT` on the same connection runs as `INSERT`, so rows inserted
/// by the first are not erased by the second.
///
/// A directive whose locations yield no dataset runs once against a snapshot
/// of the connection's current contents.
#[derive(Clone)]
pub struct OperationExecutor {
	loader: Arc<dyn DataSetLoader>,
	lookup: Arc<dyn OperationLookup>,
}

impl OperationExecutor {
	/// Creates an executor.
	pub fn new(loader: Arc<dyn DataSetLoader>, lookup: Arc<dyn OperationLookup>) -> Self {
		Self { loader, lookup }
	}

	/// Applies `directives` in order.
	///
	/// # Arguments
	///
	/// * `phase` - Setup or teardown, for logging
	/// * `scope` - Test scope dataset locations are resolved against
	/// * `connections` - Open connections of the test
	/// * `directives` - Directives in execution order
	///
	/// # Errors
	///
	/// Stops at the first failure. Returns [`FixtureError::Configuration`]
	/// for an unknown connection or an operation the lookup does not support,
	/// and the loader's or store's error otherwise.
	pub async fn apply(
		&self,
		phase: Phase,
		scope: &TestScope,
		connections: &DatabaseConnections,
		directives: &[OperationDirective],
	) -> FixtureResult<()> {
		let mut last_kinds: HashMap<String, OperationKind> = HashMap::new();

		for directive in directives {
			let handle = connections.get(&directive.connection)?;
			let connection = handle.connection();

			let mut executed = false;
			for location in &directive.locations {
				let kind = effective_kind(directive.kind, last_kinds.get(handle.name()));
				let native = self.native(kind)?;
				let Some(data_set) = self.loader.load_data_set(scope.resource_scope(), location)?
				else {
					if !location.trim().is_empty() {
						tracing::warn!(%phase, %location, "dataset location did not resolve");
					}
					continue;
				};
				tracing::debug!(
					%phase,
					operation = %native,
					connection = %handle.name(),
					%location,
					"executing fixture operation"
				);
				connection.execute(native, &data_set).await?;
				last_kinds.insert(handle.name().to_string(), directive.kind);
				executed = true;
			}

			if !executed {
				let kind = effective_kind(directive.kind, last_kinds.get(handle.name()));
				let native = self.native(kind)?;
				tracing::warn!(
					%phase,
					operation = %native,
					connection = %handle.name(),
					"no dataset resolved, using a snapshot of the current contents"
				);
				let snapshot = connection.create_data_set().await?;
				connection.execute(native, &snapshot).await?;
				last_kinds.insert(handle.name().to_string(), directive.kind);
			}
		}
		Ok(())
	}

	fn native(&self, kind: OperationKind) -> FixtureResult<NativeOperation> {
		self.lookup.lookup(kind).ok_or_else(|| {
			FixtureError::configuration(format!("The database operation {} is not supported", kind))
		})
	}
}

fn effective_kind(kind: OperationKind, last: Option<&OperationKind>) -> OperationKind {
	if kind == OperationKind::CleanInsert && last == Some(&OperationKind::CleanInsert) {
		tracing::debug!("downgrading consecutive CLEAN_INSERT to INSERT");
		OperationKind::Insert
	} else {
		kind
	}
}

impl fmt::Debug for OperationExecutor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OperationExecutor").finish_non_exhaustive()
	}
}
