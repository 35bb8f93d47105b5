//! Database fixtures around tests.
//!
//! This crate prepares a database before a test, checks it afterwards and
//! cleans it up, driven by declarative directives:
//!
//! - **Setup and teardown**: [`OperationDirective`]s apply datasets with an
//!   [`OperationKind`] such as `CLEAN_INSERT` or `DELETE_ALL`
//! - **Expectations**: [`ExpectationDirective`]s compare expected datasets
//!   with the database in one of three [`AssertionMode`]s
//! - **Orchestration**: [`FixtureRunner`] resolves directives, opens named
//!   connections, runs the lifecycle and always closes the connections
//!
//! The database itself sits behind the [`DatabaseConnection`] trait. The
//! [`testing`] module provides an in-memory implementation.
//!
//! # Features
//!
//! - `json` - JSON dataset support (enabled by default)
//! - `yaml` - YAML dataset support
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use reinhardt_fixtures::prelude::*;
//! use reinhardt_fixtures::testing::{InMemoryDatabase, InMemoryProvider};
//!
//! # async fn example() -> FixtureResult<()> {
//! let directives = DirectiveRegistry::new().with_method(
//! 	"orders::tests::PersonTest",
//! 	"renames_person",
//! 	DirectiveSet::new()
//! 		.setup(OperationDirective::new(OperationKind::CleanInsert, ["person.json"]))
//! 		.expect(
//! 			ExpectationDirective::new(["person-renamed.json"])
//! 				.with_table("person")
//! 				.with_mode(AssertionMode::NonStrict),
//! 		),
//! );
//! let database = Arc::new(InMemoryDatabase::new().with_table("person", &["id", "name"], &["id"]));
//! let provider = InMemoryProvider::new().with_database("dataSource", database);
//!
//! let runner = FixtureRunner::builder(Arc::new(directives), Arc::new(provider)).build();
//! runner
//! 	.run(
//! 		&TestScope::new("orders::tests::PersonTest", "renames_person"),
//! 		|connections| async move {
//! 			// exercise application code against `connections`
//! 			let _ = connections;
//! 			Ok::<(), FixtureError>(())
//! 		},
//! 	)
//! 	.await
//! # }
//! ```

pub mod assertion;
pub mod connection;
pub mod directive;
pub mod error;
pub mod executor;
pub mod operation;
pub mod prelude;
pub mod registry;
pub mod runner;
pub mod scope;
pub mod settings;
pub mod testing;

pub use assertion::{
	AssertionLookup, AssertionMode, DatabaseAssertion, DefaultAssertionLookup, NonStrictAssertion,
	NonStrictUnorderedAssertion, StrictAssertion, resolve_sequences,
};
pub use connection::{ConnectionHandle, ConnectionProvider, DatabaseConnection};
pub use directive::{
	DirectiveRegistry, DirectiveResolver, DirectiveSet, DirectiveSource, ExpectationDirective,
	OperationDirective, ResolvedDirectives,
};
pub use error::{
	AssertionFailure, ExpectationMismatch, FixtureError, FixtureResult, Mismatch, MismatchKind,
};
pub use executor::{OperationExecutor, Phase};
pub use operation::{
	DefaultOperationLookup, MsSqlOperationLookup, NativeOperation, OperationKind, OperationLookup,
};
pub use registry::DatabaseConnections;
pub use runner::{FixtureRunner, FixtureRunnerBuilder, FixtureSession, FixtureState};
pub use scope::TestScope;
pub use settings::{FixtureSettings, ScopeConfiguration};

pub use reinhardt_dataset;
