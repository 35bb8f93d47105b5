//! Fixture orchestration around one test.
//!
//! A [`FixtureRunner`] drives every test through the same sequence:
//!
//! ```text
//! Idle -> Connected -> SetUp -> TestRunning -> Verifying -> TornDown -> Closed
//! ```
//!
//! [`FixtureRunner::before_test`] opens the connections and applies setup
//! directives; [`FixtureSession::after_test`] checks expectations, applies
//! teardown directives and closes every connection. [`FixtureRunner::run`]
//! wraps both around a test body.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use reinhardt_dataset::{DataSet, DataSetLoader, DataSetModifier, ModifierChain};
use thiserror::Error;

use crate::assertion::{AssertionLookup, DefaultAssertionLookup, resolve_sequences};
use crate::connection::ConnectionProvider;
use crate::directive::{DirectiveResolver, DirectiveSource, ExpectationDirective, ResolvedDirectives};
use crate::error::{AssertionFailure, ExpectationMismatch, FixtureError, FixtureResult};
use crate::executor::{OperationExecutor, Phase};
use crate::operation::OperationLookup;
use crate::registry::DatabaseConnections;
use crate::scope::TestScope;
use crate::settings::FixtureSettings;

/// Where a test is in its fixture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
	/// Nothing happened yet.
	Idle,
	/// Connections are open.
	Connected,
	/// Setup directives were applied.
	SetUp,
	/// The test body is running.
	TestRunning,
	/// Expectations are being checked.
	Verifying,
	/// Teardown directives were applied.
	TornDown,
	/// Every connection is closed.
	Closed,
}

#[derive(Debug, Error)]
#[error("test body panicked")]
struct BodyPanicked;

/// Runs fixtures around tests.
///
/// The runner holds no per-test state besides the directive cache, so one
/// instance can serve every test of a process.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_fixtures::prelude::*;
/// use reinhardt_fixtures::testing::{InMemoryDatabase, InMemoryProvider};
///
/// # async fn example() -> Result<(), FixtureError> {
/// let database = Arc::new(InMemoryDatabase::new().with_table("person", &["id"], &["id"]));
/// let provider = InMemoryProvider::new().with_database("dataSource", database);
/// let runner = FixtureRunner::builder(Arc::new(DirectiveRegistry::new()), Arc::new(provider)).build();
///
/// runner
/// 	.run(&TestScope::new("PersonTest", "lists_people"), |_connections| async {
/// 		Ok::<(), FixtureError>(())
/// 	})
/// 	.await?;
/// # Ok(())
/// # }
/// ```
pub struct FixtureRunner {
	settings: FixtureSettings,
	directives: DirectiveResolver,
	provider: Arc<dyn ConnectionProvider>,
	loader: Arc<dyn DataSetLoader>,
	executor: OperationExecutor,
	assertions: Arc<dyn AssertionLookup>,
}

impl FixtureRunner {
	/// Starts building a runner.
	///
	/// # Arguments
	///
	/// * `source` - Where test directives are declared
	/// * `provider` - Where connections come from
	pub fn builder(
		source: Arc<dyn DirectiveSource>,
		provider: Arc<dyn ConnectionProvider>,
	) -> FixtureRunnerBuilder {
		FixtureRunnerBuilder {
			source,
			provider,
			settings: FixtureSettings::default(),
			loader: None,
			operation_lookup: None,
			assertion_lookup: None,
		}
	}

	/// Returns the settings.
	pub fn settings(&self) -> &FixtureSettings {
		&self.settings
	}

	/// Opens the test's connections and applies its setup directives.
	///
	/// If setup fails, teardown directives are still applied and the
	/// connections are closed before the setup error is returned. A teardown
	/// failure at that point is logged and dropped.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Resolution`] if no connection can be found,
	/// or the first setup failure.
	pub async fn before_test(&self, scope: &TestScope) -> FixtureResult<FixtureSession<'_>> {
		let directives = self.directives.resolve(scope);
		let (names, default) = self.connection_names(&directives)?;
		let connections =
			DatabaseConnections::open(self.provider.as_ref(), &names, default.as_deref()).await?;

		let mut session = FixtureSession {
			runner: self,
			scope: scope.clone(),
			directives,
			connections,
			state: FixtureState::Idle,
		};
		session.transition(FixtureState::Connected);

		let setup = self
			.executor
			.apply(
				Phase::Setup,
				&session.scope,
				&session.connections,
				&session.directives.setup,
			)
			.await;
		if let Err(e) = setup {
			let teardown = self
				.executor
				.apply(
					Phase::Teardown,
					&session.scope,
					&session.connections,
					&session.directives.teardown,
				)
				.await;
			session.transition(FixtureState::TornDown);
			if let Err(teardown_error) = teardown {
				tracing::warn!(
					scope = %scope,
					error = %teardown_error,
					"unable to report teardown failure due to an earlier failure"
				);
			}
			if let Err(close_error) = session.connections.close_all().await {
				tracing::warn!(scope = %scope, error = %close_error, "failed to close connections after setup failure");
			}
			session.transition(FixtureState::Closed);
			return Err(e);
		}
		session.transition(FixtureState::SetUp);
		Ok(session)
	}

	/// Runs `body` between [`before_test`](Self::before_test) and
	/// [`after_test`](FixtureSession::after_test).
	///
	/// Connections are closed whatever the body does. A panic in the body is
	/// resumed once the connections are closed.
	///
	/// The body may fail with any error convertible into a boxed error, such
	/// as [`FixtureError`], `std::io::Error` or `anyhow::Error`.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::TestFailed`] carrying the body's error if the
	/// body failed, otherwise the first fixture failure.
	pub async fn run<F, Fut, E>(&self, scope: &TestScope, body: F) -> FixtureResult<()>
	where
		F: FnOnce(DatabaseConnections) -> Fut,
		Fut: Future<Output = Result<(), E>>,
		E: Into<Box<dyn std::error::Error + Send + Sync>>,
	{
		let mut session = self.before_test(scope).await?;
		session.transition(FixtureState::TestRunning);

		let connections = session.connections().clone();
		let outcome = AssertUnwindSafe(async move { body(connections).await })
			.catch_unwind()
			.await;

		match outcome {
			Ok(Ok(())) => session.after_test(None).await,
			Ok(Err(test_error)) => {
				let test_error: Box<dyn std::error::Error + Send + Sync> = test_error.into();
				let reported: &(dyn std::error::Error + 'static) = &*test_error;
				if let Err(e) = session.after_test(Some(reported)).await {
					tracing::warn!(scope = %scope, error = %e, "fixture failure after a failed test");
				}
				Err(FixtureError::TestFailed(test_error))
			}
			Err(panic) => {
				if let Err(e) = session.after_test(Some(&BodyPanicked)).await {
					tracing::warn!(scope = %scope, error = %e, "fixture failure after a panicking test");
				}
				std::panic::resume_unwind(panic)
			}
		}
	}

	fn connection_names(
		&self,
		directives: &ResolvedDirectives,
	) -> FixtureResult<(Vec<String>, Option<String>)> {
		let configuration = directives.configuration.as_ref();
		let default = configuration.and_then(|c| c.default_connection.clone());
		if let Some(configuration) = configuration
			&& !configuration.connections.is_empty()
		{
			return Ok((configuration.connections.clone(), default));
		}
		self.settings
			.default_connections
			.iter()
			.find(|name| self.provider.contains(name))
			.map(|name| (vec![name.clone()], default))
			.ok_or_else(|| {
				FixtureError::resolution(format!(
					"Unable to find a database connection, searched for {:?}",
					self.settings.default_connections
				))
			})
	}
}

impl fmt::Debug for FixtureRunner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixtureRunner")
			.field("settings", &self.settings)
			.field("directives", &self.directives)
			.finish_non_exhaustive()
	}
}

/// Builder for [`FixtureRunner`].
///
/// Collaborators that are not set explicitly are built from the settings.
pub struct FixtureRunnerBuilder {
	source: Arc<dyn DirectiveSource>,
	provider: Arc<dyn ConnectionProvider>,
	settings: FixtureSettings,
	loader: Option<Arc<dyn DataSetLoader>>,
	operation_lookup: Option<Arc<dyn OperationLookup>>,
	assertion_lookup: Option<Arc<dyn AssertionLookup>>,
}

impl FixtureRunnerBuilder {
	/// Sets the settings.
	pub fn settings(mut self, settings: FixtureSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the dataset loader.
	pub fn loader(mut self, loader: Arc<dyn DataSetLoader>) -> Self {
		self.loader = Some(loader);
		self
	}

	/// Sets the operation lookup.
	pub fn operation_lookup(mut self, lookup: Arc<dyn OperationLookup>) -> Self {
		self.operation_lookup = Some(lookup);
		self
	}

	/// Sets the assertion lookup.
	pub fn assertion_lookup(mut self, lookup: Arc<dyn AssertionLookup>) -> Self {
		self.assertion_lookup = Some(lookup);
		self
	}

	/// Builds the runner.
	pub fn build(self) -> FixtureRunner {
		let loader = self
			.loader
			.unwrap_or_else(|| self.settings.build_loader());
		let operation_lookup = self
			.operation_lookup
			.unwrap_or_else(|| self.settings.build_operation_lookup());
		FixtureRunner {
			executor: OperationExecutor::new(Arc::clone(&loader), operation_lookup),
			directives: DirectiveResolver::new(self.source),
			provider: self.provider,
			loader,
			assertions: self
				.assertion_lookup
				.unwrap_or_else(|| Arc::new(DefaultAssertionLookup)),
			settings: self.settings,
		}
	}
}

/// Fixture state of one running test.
///
/// Obtained from [`FixtureRunner::before_test`] and finished with
/// [`after_test`](Self::after_test).
pub struct FixtureSession<'a> {
	runner: &'a FixtureRunner,
	scope: TestScope,
	directives: Arc<ResolvedDirectives>,
	connections: DatabaseConnections,
	state: FixtureState,
}

impl FixtureSession<'_> {
	/// Returns the lifecycle state.
	pub fn state(&self) -> FixtureState {
		self.state
	}

	/// Returns the test scope.
	pub fn scope(&self) -> &TestScope {
		&self.scope
	}

	/// Returns the open connections.
	pub fn connections(&self) -> &DatabaseConnections {
		&self.connections
	}

	fn transition(&mut self, to: FixtureState) {
		tracing::debug!(scope = %self.scope, from = ?self.state, to = ?to, "fixture state change");
		self.state = to;
	}

	/// Checks expectations, applies teardown directives and closes every
	/// connection.
	///
	/// Expectations are skipped when the test failed. A teardown failure is
	/// logged and dropped when the test or an expectation already failed.
	/// Connections are closed in every case.
	///
	/// # Arguments
	///
	/// * `test_error` - The test body's failure, if any
	///
	/// # Errors
	///
	/// Returns the first failure the test outcome does not already explain:
	/// failed expectations, then a teardown failure, then a close failure.
	pub async fn after_test(
		mut self,
		test_error: Option<&(dyn std::error::Error + 'static)>,
	) -> FixtureResult<()> {
		self.transition(FixtureState::Verifying);
		let verification = match test_error {
			Some(e) => {
				tracing::debug!(scope = %self.scope, error = %e, "skipping expectations due to test failure");
				Ok(())
			}
			None => self.verify().await,
		};

		let teardown = self
			.runner
			.executor
			.apply(
				Phase::Teardown,
				&self.scope,
				&self.connections,
				&self.directives.teardown,
			)
			.await;
		self.transition(FixtureState::TornDown);

		let outcome = match (verification, teardown) {
			(Ok(()), Err(e)) if test_error.is_none() => Err(e),
			(verification, Err(e)) => {
				tracing::warn!(
					scope = %self.scope,
					error = %e,
					"unable to report teardown failure due to an earlier failure"
				);
				verification
			}
			(verification, Ok(())) => verification,
		};

		let closed = self.connections.close_all().await;
		self.transition(FixtureState::Closed);
		match (outcome, closed) {
			(Ok(()), Err(e)) => Err(e),
			(outcome, _) => outcome,
		}
	}

	async fn verify(&self) -> FixtureResult<()> {
		let modifiers: ModifierChain = self.directives.expectation_modifiers().into_iter().collect();
		let mut failure = AssertionFailure::default();

		for expectation in self.directives.effective_expectations() {
			if expectation.query.is_some() && expectation.table.is_none() {
				return Err(FixtureError::configuration(format!(
					"The table name must be specified when using a query, expectation {:?}",
					expectation.locations
				)));
			}
			let Some(expected) = self.load_expected(expectation)? else {
				tracing::debug!(scope = %self.scope, "skipping expectation without dataset locations");
				continue;
			};
			let expected = modifiers.modify(expected)?;

			let handle = self.connections.get(&expectation.connection)?;
			let connection = handle.connection();
			let expected = if expectation.resolve_sequences {
				resolve_sequences(expected, connection).await?
			} else {
				expected
			};

			tracing::debug!(
				scope = %self.scope,
				locations = ?expectation.locations,
				mode = ?expectation.mode,
				connection = %handle.name(),
				"verifying database expectation"
			);
			let assertion = self.runner.assertions.assertion(expectation.mode);
			let filters = &expectation.column_filters;
			let result = match (&expectation.table, &expectation.query) {
				(Some(table), Some(query)) => {
					let actual = connection.create_query_table(table, query).await?;
					assertion.assert_tables(expected.table(table)?, &actual, filters)
				}
				(Some(table), None) => {
					let actual = connection.create_table(table).await?;
					assertion.assert_tables(expected.table(table)?, &actual, filters)
				}
				(None, _) => {
					let actual = connection.create_data_set().await?;
					assertion.assert_data_sets(&expected, &actual, filters)
				}
			};
			if let Err(mismatch) = result {
				failure.push(ExpectationMismatch {
					locations: expectation.locations.clone(),
					connection: handle.name().to_string(),
					mismatch,
				});
			}
		}

		if failure.is_empty() {
			Ok(())
		} else {
			Err(failure.into())
		}
	}

	/// Loads the expected data; `None` if the expectation names no location.
	fn load_expected(&self, expectation: &ExpectationDirective) -> FixtureResult<Option<DataSet>> {
		if expectation.locations.iter().all(|l| l.trim().is_empty()) {
			return Ok(None);
		}
		let settings = &self.runner.settings;
		let loaded = self.runner.loader.load_composite(
			self.scope.resource_scope(),
			&expectation.locations,
			expectation.combine.unwrap_or(settings.combine),
			expectation
				.case_sensitive_table_names
				.unwrap_or(settings.case_sensitive_table_names),
		)?;
		loaded.map(Some).ok_or_else(|| {
			FixtureError::resolution(format!(
				"Unable to load dataset from {:?}",
				expectation.locations
			))
		})
	}
}

impl Drop for FixtureSession<'_> {
	fn drop(&mut self) {
		if self.state != FixtureState::Closed {
			tracing::warn!(
				scope = %self.scope,
				state = ?self.state,
				"fixture session dropped before after_test, connections were not closed"
			);
		}
	}
}

impl fmt::Debug for FixtureSession<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixtureSession")
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("connections", &self.connections)
			.finish_non_exhaustive()
	}
}
