//! A small people database and the datasets that describe it.

use std::sync::Arc;

use reinhardt_dataset::{ResourceDataSetLoader, StaticResolver};
use reinhardt_fixtures::prelude::*;
use reinhardt_fixtures::testing::{InMemoryDatabase, InMemoryProvider};

/// Declaring type of every test scope built here.
pub const CLASS: &str = "orders::tests::PersonTest";

/// Connection name the runner finds by default.
pub const DEFAULT_CONNECTION: &str = "dataSource";

const DOCUMENTS: &[(&str, &str)] = &[
	(
		"orders/tests/person.json",
		r#"{"person": [{"id": 1, "name": "wang", "email": "wang@example.com"}]}"#,
	),
	(
		"orders/tests/person-extra.json",
		r#"{"person": [{"id": 2, "name": "li", "email": "li@example.com"}]}"#,
	),
	(
		"orders/tests/person-expected.json",
		r#"{"person": [{"id": 1, "name": "wang", "email": "wang@example.com"}], "address": []}"#,
	),
	("orders/tests/person-names.json", r#"{"person": [{"name": "wang"}]}"#),
	("orders/tests/person-renamed.json", r#"{"person": [{"name": "wu"}]}"#),
	("orders/tests/person-nobody.json", r#"{"person": [{"name": "nobody"}]}"#),
	(
		"orders/tests/person-both.json",
		r#"{"person": [{"id": 2, "name": "li"}, {"id": 1, "name": "wang"}]}"#,
	),
	(
		"orders/tests/person-sequenced.json",
		r#"{"person": [
			{"id": "${PERSON_SEQ}", "name": "a"},
			{"id": "${PERSON_SEQ}", "name": "b"},
			{"id": "${PERSON_SEQ}", "name": "c"}
		]}"#,
	),
];

/// Creates the people database: `person(id, name, email)` and
/// `address(id, person_id)`, both keyed by `id`, plus `PERSON_SEQ` at 10.
pub fn database() -> Arc<InMemoryDatabase> {
	Arc::new(
		InMemoryDatabase::new()
			.with_table("person", &["id", "name", "email"], &["id"])
			.with_table("address", &["id", "person_id"], &["id"])
			.with_sequence("PERSON_SEQ", 10),
	)
}

/// Serves every dataset document of the people tests.
pub fn documents() -> StaticResolver {
	DOCUMENTS
		.iter()
		.fold(StaticResolver::new(), |resolver, (path, content)| {
			resolver.with_document(*path, *content)
		})
}

/// Builds a runner over `databases` reading datasets from [`documents`].
pub fn runner(
	directives: DirectiveRegistry,
	databases: &[(&str, &Arc<InMemoryDatabase>)],
) -> FixtureRunner {
	builder(directives, databases).build()
}

/// Same as [`runner`], left open for further configuration.
pub fn builder(
	directives: DirectiveRegistry,
	databases: &[(&str, &Arc<InMemoryDatabase>)],
) -> FixtureRunnerBuilder {
	let provider = databases
		.iter()
		.fold(InMemoryProvider::new(), |provider, (name, database)| {
			provider.with_database(name, Arc::clone(*database))
		});
	FixtureRunner::builder(Arc::new(directives), Arc::new(provider))
		.settings(FixtureSettings::default().with_default_connections([DEFAULT_CONNECTION]))
		.loader(Arc::new(ResourceDataSetLoader::new(documents())))
}

/// Scope of `method` on [`CLASS`].
pub fn scope(method: &str) -> TestScope {
	TestScope::new(CLASS, method)
}
