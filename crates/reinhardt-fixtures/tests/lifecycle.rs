//! Integration tests for the fixture lifecycle around a test body.

mod helpers;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use helpers::log_capture::LogCapture;
use helpers::people::{self, CLASS, DEFAULT_CONNECTION};
use reinhardt_fixtures::prelude::*;
use reinhardt_fixtures::testing::InMemoryDatabase;
use rstest::{fixture, rstest};
use serial_test::serial;

#[fixture]
fn database() -> Arc<InMemoryDatabase> {
	people::database()
}

fn setup(kind: OperationKind, location: &str) -> OperationDirective {
	OperationDirective::new(kind, [location])
}

fn person_table(location: &str, mode: AssertionMode) -> ExpectationDirective {
	ExpectationDirective::new([location])
		.with_table("person")
		.with_mode(mode)
}

async fn passing_body(_connections: DatabaseConnections) -> Result<(), FixtureError> {
	Ok(())
}

async fn failing_body(_connections: DatabaseConnections) -> Result<(), std::io::Error> {
	Err(std::io::Error::other("application bug"))
}

fn failure(result: FixtureResult<()>) -> AssertionFailure {
	match result {
		Err(FixtureError::Assertion(failure)) => failure,
		other => panic!("expected an assertion failure, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_class_and_method_clean_insert_keep_both_rows(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new()
		.with_class(
			CLASS,
			DirectiveSet::new().setup(setup(OperationKind::CleanInsert, "person.json")),
		)
		.with_method(
			CLASS,
			"adds_person",
			DirectiveSet::new().setup(setup(OperationKind::CleanInsert, "person-extra.json")),
		);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	runner
		.run(&people::scope("adds_person"), passing_body)
		.await
		.unwrap();

	// Assert
	let kinds: Vec<OperationKind> = database
		.operations()
		.iter()
		.map(|op| op.operation.kind)
		.collect();
	assert_eq!(kinds, vec![OperationKind::CleanInsert, OperationKind::Insert]);
	assert_eq!(database.row_count("person"), Some(2));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_non_strict_rename_scenario(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"renames_person",
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.expect(
				ExpectationDirective::new(["person-renamed.json"])
					.with_table("Person")
					.with_mode(AssertionMode::NonStrict),
			),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);
	let application = Arc::clone(&database);

	// Act
	let result = runner
		.run(&people::scope("renames_person"), move |_| async move {
			application.set_value("person", ("id", Value::Int(1)), "name", Value::from("wu"))?;
			Ok::<(), FixtureError>(())
		})
		.await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_non_strict_rename_scenario_detects_stale_row(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"forgets_rename",
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.expect(person_table("person-renamed.json", AssertionMode::NonStrict)),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("forgets_rename"), passing_body).await;

	// Assert
	let failure = failure(result);
	assert_eq!(failure.failures.len(), 1);
	assert_eq!(failure.failures[0].connection, DEFAULT_CONNECTION);
	assert_eq!(
		failure.failures[0].mismatch.kind,
		MismatchKind::Value {
			row: 0,
			column: "name".to_string(),
			expected: Some(Value::from("wu")),
			actual: Some(Value::from("wang")),
		}
	);
}

#[rstest]
#[case(true, 0)]
#[case(false, 1)]
#[tokio::test]
async fn test_method_expectation_override(
	database: Arc<InMemoryDatabase>,
	#[case] overrides: bool,
	#[case] expected_failures: usize,
) {
	// Arrange
	let directives = DirectiveRegistry::new()
		.with_class(
			CLASS,
			DirectiveSet::new()
				.setup(setup(OperationKind::CleanInsert, "person.json"))
				.expect(person_table("person-nobody.json", AssertionMode::NonStrict)),
		)
		.with_method(
			CLASS,
			"checks_names",
			DirectiveSet::new().expect(
				person_table("person-names.json", AssertionMode::NonStrict).with_override(overrides),
			),
		);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("checks_names"), passing_body).await;

	// Assert
	match expected_failures {
		0 => assert!(result.is_ok(), "{:?}", result),
		count => {
			let failure = failure(result);
			assert_eq!(failure.failures.len(), count);
			assert_eq!(failure.failures[0].locations, vec!["person-nobody.json"]);
		}
	}
}

#[rstest]
#[tokio::test]
async fn test_every_expectation_is_evaluated_method_first(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new()
		.with_class(
			CLASS,
			DirectiveSet::new()
				.setup(setup(OperationKind::CleanInsert, "person.json"))
				.expect(person_table("person-nobody.json", AssertionMode::NonStrict)),
		)
		.with_method(
			CLASS,
			"checks_everything",
			DirectiveSet::new()
				.expect(
					person_table("person-renamed.json", AssertionMode::NonStrict)
						.with_override(false),
				)
				.expect(
					person_table("person-names.json", AssertionMode::NonStrict)
						.with_override(false),
				),
		);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner
		.run(&people::scope("checks_everything"), passing_body)
		.await;

	// Assert
	let locations: Vec<Vec<String>> = failure(result)
		.failures
		.into_iter()
		.map(|f| f.locations)
		.collect();
	assert_eq!(
		locations,
		vec![
			vec!["person-renamed.json".to_string()],
			vec!["person-nobody.json".to_string()]
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_failed_test_skips_expectations_but_tears_down(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.teardown(setup(OperationKind::DeleteAll, "person.json"))
			.expect(person_table("person-nobody.json", AssertionMode::NonStrict)),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("fails"), failing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::TestFailed(error)) if error.to_string() == "application bug"),
		"{:?}",
		result
	);
	assert_eq!(database.row_count("person"), Some(0));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_expectation_failure_still_tears_down(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.teardown(setup(OperationKind::DeleteAll, "person.json"))
			.expect(person_table("person-nobody.json", AssertionMode::NonStrict)),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("passes"), passing_body).await;

	// Assert
	assert!(matches!(result, Err(FixtureError::Assertion(_))));
	assert_eq!(database.row_count("person"), Some(0));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_strict_data_set_expectation(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"keeps_everything",
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.expect(ExpectationDirective::new(["person-expected.json"])),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner
		.run(&people::scope("keeps_everything"), passing_body)
		.await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}

#[rstest]
#[case(AssertionMode::NonStrictUnordered, true)]
#[case(AssertionMode::NonStrict, false)]
#[tokio::test]
async fn test_row_order_depends_on_mode(
	database: Arc<InMemoryDatabase>,
	#[case] mode: AssertionMode,
	#[case] passes: bool,
) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"lists_people",
		DirectiveSet::new()
			.setup(OperationDirective::new(
				OperationKind::CleanInsert,
				["person.json", "person-extra.json"],
			))
			.expect(person_table("person-both.json", mode)),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("lists_people"), passing_body).await;

	// Assert
	assert_eq!(result.is_ok(), passes, "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_sequence_placeholders_resolve_before_comparison(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"creates_people",
		DirectiveSet::new().expect(
			person_table("person-sequenced.json", AssertionMode::NonStrict).with_sequences(),
		),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);
	let application = Arc::clone(&database);

	// Act
	let result = runner
		.run(&people::scope("creates_people"), move |_| async move {
			for (id, name) in [(8, "a"), (9, "b"), (10, "c")] {
				application.insert_row("person", &[("id", Value::Int(id)), ("name", Value::from(name))])?;
			}
			Ok::<(), FixtureError>(())
		})
		.await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_query_expectation(database: Arc<InMemoryDatabase>) {
	// Arrange
	let database = Arc::new(
		Arc::try_unwrap(database)
			.unwrap()
			.with_query("SELECT name FROM person", |snapshot| {
				let person = snapshot.table("person")?;
				let mut builder = Table::builder("result").column("name");
				for row in 0..person.row_count() {
					builder = builder.row([person.value(row, "name")?.cloned().unwrap_or(Value::Null)]);
				}
				Ok(builder.build()?)
			}),
	);
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"queries_names",
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.expect(
				ExpectationDirective::new(["person-names.json"])
					.with_table("person")
					.with_query("SELECT name FROM person"),
			),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("queries_names"), passing_body).await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_query_without_table_is_configuration_error(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"queries_badly",
		DirectiveSet::new().expect(
			ExpectationDirective::new(["person-names.json"]).with_query("SELECT name FROM person"),
		),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("queries_badly"), passing_body).await;

	// Assert
	assert!(matches!(result, Err(FixtureError::Configuration(_))), "{:?}", result);
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_unresolved_expectation_is_resolution_error(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"expects_missing",
		DirectiveSet::new().expect(ExpectationDirective::new(["missing.json"])),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner
		.run(&people::scope("expects_missing"), passing_body)
		.await;

	// Assert
	assert!(matches!(result, Err(FixtureError::Resolution(_))), "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_blank_connection_with_several_connections_is_configuration_error() {
	// Arrange
	let primary = people::database();
	let audit = people::database();
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.configure(ScopeConfiguration::new(["primary", "audit"]))
			.setup(setup(OperationKind::CleanInsert, "person.json").with_connection("audit"))
			.expect(person_table("person-names.json", AssertionMode::NonStrict)),
	);
	let runner = people::runner(directives, &[("primary", &primary), ("audit", &audit)]);

	// Act
	let result = runner.run(&people::scope("ambiguous"), passing_body).await;

	// Assert
	assert!(matches!(result, Err(FixtureError::Configuration(_))), "{:?}", result);
	assert_eq!(primary.row_count("person"), Some(0));
	assert_eq!(audit.row_count("person"), Some(1));
	assert_eq!(primary.close_count(), 1);
	assert_eq!(audit.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_declared_default_connection_serves_blank_names() {
	// Arrange
	let primary = people::database();
	let audit = people::database();
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.configure(ScopeConfiguration::new(["primary", "audit"]).with_default_connection("audit"))
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.expect(person_table("person-names.json", AssertionMode::NonStrict)),
	);
	let runner = people::runner(directives, &[("primary", &primary), ("audit", &audit)]);

	// Act
	let result = runner.run(&people::scope("defaulted"), passing_body).await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
	assert_eq!(audit.row_count("person"), Some(1));
	assert_eq!(primary.row_count("person"), Some(0));
}

#[rstest]
#[tokio::test]
async fn test_missing_connection_is_resolution_error(database: Arc<InMemoryDatabase>) {
	// Arrange
	let runner = people::runner(DirectiveRegistry::new(), &[("elsewhere", &database)]);

	// Act
	let result = runner.run(&people::scope("orphaned"), passing_body).await;

	// Assert
	match result {
		Err(FixtureError::Resolution(message)) => assert!(message.contains(DEFAULT_CONNECTION)),
		other => panic!("expected a resolution error, got {:?}", other),
	}
}

#[rstest]
#[tokio::test]
async fn test_setup_failure_skips_body_and_closes(database: Arc<InMemoryDatabase>) {
	// Arrange
	database.fail_on_execute(OperationKind::CleanInsert, "constraint violated");
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new().setup(setup(OperationKind::CleanInsert, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);
	let ran = Arc::new(AtomicBool::new(false));
	let body_ran = Arc::clone(&ran);

	// Act
	let result = runner
		.run(&people::scope("never_runs"), move |_| async move {
			body_ran.store(true, Ordering::SeqCst);
			Ok::<(), FixtureError>(())
		})
		.await;

	// Assert
	assert!(matches!(result, Err(FixtureError::Connection(_))), "{:?}", result);
	assert!(!ran.load(Ordering::SeqCst));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_setup_failure_still_tears_down(database: Arc<InMemoryDatabase>) {
	// Arrange
	database
		.insert_row("person", &[("id", Value::Int(5)), ("name", Value::from("zhao"))])
		.unwrap();
	database.fail_on_execute(OperationKind::CleanInsert, "constraint violated");
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.teardown(setup(OperationKind::DeleteAll, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("never_runs"), passing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::Connection(message)) if message == "constraint violated"),
		"{:?}",
		result
	);
	assert_eq!(database.row_count("person"), Some(0));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_teardown_failure_after_setup_failure_keeps_setup_error(
	database: Arc<InMemoryDatabase>,
) {
	// Arrange
	database.fail_on_execute(OperationKind::CleanInsert, "constraint violated");
	database.fail_on_execute(OperationKind::DeleteAll, "lock timeout");
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.teardown(setup(OperationKind::DeleteAll, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("never_runs"), passing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::Connection(message)) if message == "constraint violated"),
		"{:?}",
		result
	);
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_test_failure_keeps_body_error_as_source(database: Arc<InMemoryDatabase>) {
	// Arrange
	let runner = people::runner(DirectiveRegistry::new(), &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("fails"), failing_body).await;

	// Assert
	let Err(error) = result else {
		panic!("expected the test failure to be reported");
	};
	let source = std::error::Error::source(&error).expect("body error kept as source");
	let io_error = source
		.downcast_ref::<std::io::Error>()
		.expect("source is the body's io::Error");
	assert_eq!(io_error.kind(), std::io::ErrorKind::Other);
	assert_eq!(io_error.to_string(), "application bug");
}

#[rstest]
#[tokio::test]
async fn test_body_may_fail_with_anyhow(database: Arc<InMemoryDatabase>) {
	// Arrange
	let runner = people::runner(DirectiveRegistry::new(), &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner
		.run(&people::scope("fails"), |_| async {
			Err::<(), _>(anyhow::anyhow!("order total was {}", 42))
		})
		.await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::TestFailed(error)) if error.to_string() == "order total was 42"),
		"{:?}",
		result
	);
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_teardown_failure_fails_passing_test(database: Arc<InMemoryDatabase>) {
	// Arrange
	database.fail_on_execute(OperationKind::DeleteAll, "lock timeout");
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new().teardown(setup(OperationKind::DeleteAll, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("passes"), passing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::Connection(message)) if message == "lock timeout"),
		"{:?}",
		result
	);
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
#[serial(fixture_logs)]
async fn test_teardown_failure_after_test_failure_is_logged() {
	// Arrange
	let capture = LogCapture::default();
	let _guard = capture.install();
	let database = people::database();
	database.fail_on_execute(OperationKind::DeleteAll, "lock timeout");
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new().teardown(setup(OperationKind::DeleteAll, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("fails"), failing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::TestFailed(error)) if error.to_string() == "application bug"),
		"{:?}",
		result
	);
	assert!(
		capture.contains(tracing::Level::WARN, "unable to report teardown failure"),
		"Expected a teardown warning, but got: {:?}",
		capture.logs()
	);
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_close_failure_fails_passing_test(database: Arc<InMemoryDatabase>) {
	// Arrange
	database.fail_on_close("socket closed");
	let runner = people::runner(DirectiveRegistry::new(), &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("passes"), passing_body).await;

	// Assert
	assert!(
		matches!(&result, Err(FixtureError::Connection(message)) if message == "socket closed"),
		"{:?}",
		result
	);
}

#[rstest]
#[tokio::test]
async fn test_panicking_body_still_tears_down_and_closes(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new()
			.setup(setup(OperationKind::CleanInsert, "person.json"))
			.teardown(setup(OperationKind::DeleteAll, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);
	let scope = people::scope("panics");

	// Act
	let outcome = AssertUnwindSafe(runner.run(&scope, |_| async {
		if database.row_count("person") == Some(1) {
			panic!("application panicked");
		}
		Ok::<(), FixtureError>(())
	}))
	.catch_unwind()
	.await;

	// Assert
	assert!(outcome.is_err());
	assert_eq!(database.row_count("person"), Some(0));
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_session_reports_lifecycle_states(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new().with_class(
		CLASS,
		DirectiveSet::new().setup(setup(OperationKind::CleanInsert, "person.json")),
	);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let session = runner.before_test(&people::scope("manual")).await.unwrap();
	let state = session.state();
	let names: Vec<String> = session
		.connections()
		.names()
		.into_iter()
		.map(str::to_string)
		.collect();
	let result = session.after_test(None).await;

	// Assert
	assert_eq!(state, FixtureState::SetUp);
	assert_eq!(names, vec![DEFAULT_CONNECTION]);
	assert!(result.is_ok());
	assert_eq!(database.close_count(), 1);
}

#[rstest]
#[tokio::test]
async fn test_custom_assertion_lookup(database: Arc<InMemoryDatabase>) {
	// Arrange
	struct AcceptAll;

	impl DatabaseAssertion for AcceptAll {
		fn assert_data_sets(
			&self,
			_expected: &DataSet,
			_actual: &DataSet,
			_filters: &[Arc<dyn ColumnFilter>],
		) -> Result<(), Mismatch> {
			Ok(())
		}

		fn assert_tables(
			&self,
			_expected: &Table,
			_actual: &Table,
			_filters: &[Arc<dyn ColumnFilter>],
		) -> Result<(), Mismatch> {
			Ok(())
		}
	}

	impl AssertionLookup for AcceptAll {
		fn assertion(&self, _mode: AssertionMode) -> &dyn DatabaseAssertion {
			self
		}
	}

	let directives = DirectiveRegistry::new().with_method(
		CLASS,
		"anything_goes",
		DirectiveSet::new().expect(person_table("person-nobody.json", AssertionMode::Strict)),
	);
	let runner = people::builder(directives, &[(DEFAULT_CONNECTION, &database)])
		.assertion_lookup(Arc::new(AcceptAll))
		.build();

	// Act
	let result = runner.run(&people::scope("anything_goes"), passing_body).await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}

#[rstest]
#[tokio::test]
async fn test_expectation_modifiers_rewrite_expected_data(database: Arc<InMemoryDatabase>) {
	// Arrange
	let directives = DirectiveRegistry::new()
		.with_class(
			CLASS,
			DirectiveSet::new()
				.setup(setup(OperationKind::CleanInsert, "person.json"))
				.expect(
					person_table("person-nobody.json", AssertionMode::NonStrict)
						.with_modifier(Arc::new(ReplacementModifier::new().with_substring("nobody", "wa"))),
				),
		)
		.with_method(
			CLASS,
			"rewrites",
			DirectiveSet::new().expect(
				person_table("person-nobody.json", AssertionMode::NonStrict)
					.with_modifier(Arc::new(ReplacementModifier::new().with_substring("wa", "wang"))),
			),
		);
	let runner = people::runner(directives, &[(DEFAULT_CONNECTION, &database)]);

	// Act
	let result = runner.run(&people::scope("rewrites"), passing_body).await;

	// Assert
	assert!(result.is_ok(), "{:?}", result);
}
