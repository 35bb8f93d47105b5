//! # Reinhardt DbUnit
//!
//! Declarative database fixtures for Rust tests.
//!
//! Tests declare which datasets to load before they run, which datasets the
//! database must match afterwards, and how to clean up. The fixture runner
//! resolves those declarations for each test, applies them to named database
//! connections and reports every difference it finds.
//!
//! ## Crates
//!
//! - [`dataset`] - Tabular dataset model, document formats, resource lookup
//!   and value replacement
//! - [`fixtures`] - Directives, database operations, assertions and the
//!   fixture lifecycle
//!
//! ## Feature Flags
//!
//! - `json` (default) - JSON dataset documents (via `serde_json`)
//! - `yaml` - YAML dataset documents (via `serde_yaml`)
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use reinhardt_dbunit::prelude::*;
//! use reinhardt_dbunit::fixtures::testing::{InMemoryDatabase, InMemoryProvider};
//!
//! # async fn example() -> FixtureResult<()> {
//! let directives = DirectiveRegistry::new().with_class(
//! 	"orders::tests::PersonTest",
//! 	DirectiveSet::new()
//! 		.setup(OperationDirective::new(OperationKind::CleanInsert, ["person.json"]))
//! 		.teardown(OperationDirective::new(OperationKind::DeleteAll, ["person.json"])),
//! );
//! let database = Arc::new(InMemoryDatabase::new().with_table("person", &["id", "name"], &["id"]));
//! let provider = InMemoryProvider::new().with_database("dataSource", database);
//! let runner = FixtureRunner::builder(Arc::new(directives), Arc::new(provider)).build();
//!
//! runner
//! 	.run(
//! 		&TestScope::new("orders::tests::PersonTest", "lists_people"),
//! 		|_connections| async { Ok::<(), FixtureError>(()) },
//! 	)
//! 	.await
//! # }
//! ```

pub use reinhardt_dataset as dataset;
pub use reinhardt_fixtures as fixtures;

pub mod prelude {
	//! Everything a fixture-driven test usually needs.

	pub use reinhardt_fixtures::prelude::*;
}
