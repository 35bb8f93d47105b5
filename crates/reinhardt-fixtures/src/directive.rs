//! Directives and their resolution.
//!
//! A directive is a data-only description of one setup, teardown or
//! expectation action. Directives are declared per test class and per test
//! method through a [`DirectiveSource`]; the [`DirectiveResolver`] merges the
//! two scopes for a test and caches the result.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use reinhardt_dataset::{ColumnFilter, DataSetModifier};

use crate::assertion::AssertionMode;
use crate::operation::OperationKind;
use crate::scope::TestScope;
use crate::settings::ScopeConfiguration;

fn to_strings<I, S>(items: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	items.into_iter().map(Into::into).collect()
}

/// A setup or teardown action.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::{OperationDirective, OperationKind};
///
/// let setup = OperationDirective::new(OperationKind::CleanInsert, ["person.json"]);
/// let teardown = OperationDirective::new(OperationKind::DeleteAll, ["person.json"])
/// 	.with_connection("audit");
/// assert_eq!(teardown.connection, "audit");
/// assert!(setup.connection.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDirective {
	/// Operation to apply.
	pub kind: OperationKind,
	/// Dataset locations, applied in order.
	pub locations: Vec<String>,
	/// Connection name; blank means the default connection.
	pub connection: String,
}

impl OperationDirective {
	/// Creates a directive on the default connection.
	pub fn new<I, S>(kind: OperationKind, locations: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			kind,
			locations: to_strings(locations),
			connection: String::new(),
		}
	}

	/// Targets a named connection.
	pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
		self.connection = connection.into();
		self
	}
}

/// An expectation checked after the test body.
#[derive(Clone)]
pub struct ExpectationDirective {
	/// Dataset locations of the expected data.
	pub locations: Vec<String>,
	/// Connection name; blank means the default connection.
	pub connection: String,
	/// Restricts the check to one table.
	pub table: Option<String>,
	/// Query producing the actual table. Requires `table`.
	pub query: Option<String>,
	/// Comparison mode.
	pub mode: AssertionMode,
	/// Whether this method-level expectation replaces class-level ones.
	pub overrides: bool,
	/// Modifiers applied to the expected data.
	pub modifiers: Vec<Arc<dyn DataSetModifier>>,
	/// Column filters for the comparison.
	pub column_filters: Vec<Arc<dyn ColumnFilter>>,
	/// Combine same-named tables of several locations; settings decide if unset.
	pub combine: Option<bool>,
	/// Case sensitivity of table names; settings decide if unset.
	pub case_sensitive_table_names: Option<bool>,
	/// Resolve `${name}` sequence placeholders before comparing.
	pub resolve_sequences: bool,
}

impl ExpectationDirective {
	/// Creates a strict, overriding expectation on the default connection.
	pub fn new<I, S>(locations: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			locations: to_strings(locations),
			connection: String::new(),
			table: None,
			query: None,
			mode: AssertionMode::default(),
			overrides: true,
			modifiers: Vec::new(),
			column_filters: Vec::new(),
			combine: None,
			case_sensitive_table_names: None,
			resolve_sequences: false,
		}
	}

	/// Targets a named connection.
	pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
		self.connection = connection.into();
		self
	}

	/// Restricts the check to `table`.
	pub fn with_table(mut self, table: impl Into<String>) -> Self {
		self.table = Some(table.into());
		self
	}

	/// Compares against the result of `query`.
	pub fn with_query(mut self, query: impl Into<String>) -> Self {
		self.query = Some(query.into());
		self
	}

	/// Sets the comparison mode.
	pub fn with_mode(mut self, mode: AssertionMode) -> Self {
		self.mode = mode;
		self
	}

	/// Sets whether class-level expectations are replaced.
	pub fn with_override(mut self, overrides: bool) -> Self {
		self.overrides = overrides;
		self
	}

	/// Appends a modifier.
	pub fn with_modifier(mut self, modifier: Arc<dyn DataSetModifier>) -> Self {
		self.modifiers.push(modifier);
		self
	}

	/// Appends a column filter.
	pub fn with_column_filter(mut self, filter: Arc<dyn ColumnFilter>) -> Self {
		self.column_filters.push(filter);
		self
	}

	/// Sets whether same-named tables are combined.
	pub fn with_combine(mut self, combine: bool) -> Self {
		self.combine = Some(combine);
		self
	}

	/// Sets table name case sensitivity.
	pub fn with_case_sensitive_table_names(mut self, case_sensitive: bool) -> Self {
		self.case_sensitive_table_names = Some(case_sensitive);
		self
	}

	/// Resolves sequence placeholders before comparing.
	pub fn with_sequences(mut self) -> Self {
		self.resolve_sequences = true;
		self
	}
}

impl fmt::Debug for ExpectationDirective {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExpectationDirective")
			.field("locations", &self.locations)
			.field("connection", &self.connection)
			.field("table", &self.table)
			.field("query", &self.query)
			.field("mode", &self.mode)
			.field("overrides", &self.overrides)
			.field("modifiers", &self.modifiers.len())
			.field("column_filters", &self.column_filters.len())
			.field("combine", &self.combine)
			.field("case_sensitive_table_names", &self.case_sensitive_table_names)
			.field("resolve_sequences", &self.resolve_sequences)
			.finish()
	}
}

/// Directives declared on one class or method.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSet {
	/// Setup directives in declaration order.
	pub setup: Vec<OperationDirective>,
	/// Teardown directives in declaration order.
	pub teardown: Vec<OperationDirective>,
	/// Expectations in declaration order.
	pub expectations: Vec<ExpectationDirective>,
	/// Connection configuration. Only read from class-level sets.
	pub configuration: Option<ScopeConfiguration>,
}

impl DirectiveSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a setup directive.
	pub fn setup(mut self, directive: OperationDirective) -> Self {
		self.setup.push(directive);
		self
	}

	/// Adds a teardown directive.
	pub fn teardown(mut self, directive: OperationDirective) -> Self {
		self.teardown.push(directive);
		self
	}

	/// Adds an expectation.
	pub fn expect(mut self, directive: ExpectationDirective) -> Self {
		self.expectations.push(directive);
		self
	}

	/// Sets the connection configuration.
	pub fn configure(mut self, configuration: ScopeConfiguration) -> Self {
		self.configuration = Some(configuration);
		self
	}
}

/// Supplies directives declared on classes and methods.
pub trait DirectiveSource: Send + Sync {
	/// Directives declared on `class`.
	fn class_directives(&self, class: &str) -> Option<&DirectiveSet>;

	/// Directives declared on `method` of `class`.
	fn method_directives(&self, class: &str, method: &str) -> Option<&DirectiveSet>;
}

/// Explicitly registered directives.
///
/// A class without directives of its own uses those of its nearest
/// registered ancestor, and so do its methods.
///
/// # Example
///
/// ```
/// use reinhardt_fixtures::{DirectiveRegistry, DirectiveSet, DirectiveSource, OperationDirective, OperationKind};
///
/// let registry = DirectiveRegistry::new()
/// 	.with_class(
/// 		"tests::BaseTest",
/// 		DirectiveSet::new().setup(OperationDirective::new(OperationKind::CleanInsert, ["base.json"])),
/// 	)
/// 	.with_parent("tests::ChildTest", "tests::BaseTest");
///
/// assert!(registry.class_directives("tests::ChildTest").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveRegistry {
	classes: HashMap<String, DirectiveSet>,
	methods: HashMap<(String, String), DirectiveSet>,
	parents: HashMap<String, String>,
}

impl DirectiveRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers class-level directives.
	pub fn with_class(mut self, class: impl Into<String>, directives: DirectiveSet) -> Self {
		self.classes.insert(class.into(), directives);
		self
	}

	/// Registers method-level directives.
	pub fn with_method(
		mut self,
		class: impl Into<String>,
		method: impl Into<String>,
		directives: DirectiveSet,
	) -> Self {
		self.methods.insert((class.into(), method.into()), directives);
		self
	}

	/// Declares `parent` as the superclass of `class`.
	pub fn with_parent(mut self, class: impl Into<String>, parent: impl Into<String>) -> Self {
		self.parents.insert(class.into(), parent.into());
		self
	}

	/// `class` followed by its ancestors, stopping at a cycle.
	fn lineage<'a>(&'a self, class: &'a str) -> Vec<&'a str> {
		let mut seen = HashSet::new();
		let mut lineage = Vec::new();
		let mut current = Some(class);
		while let Some(name) = current {
			if !seen.insert(name) {
				break;
			}
			lineage.push(name);
			current = self.parents.get(name).map(String::as_str);
		}
		lineage
	}
}

impl DirectiveSource for DirectiveRegistry {
	fn class_directives(&self, class: &str) -> Option<&DirectiveSet> {
		self.lineage(class)
			.into_iter()
			.find_map(|name| self.classes.get(name))
	}

	fn method_directives(&self, class: &str, method: &str) -> Option<&DirectiveSet> {
		self.lineage(class)
			.into_iter()
			.find_map(|name| self.methods.get(&(name.to_string(), method.to_string())))
	}
}

/// Directives that apply to one test.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDirectives {
	/// Setup directives, class scope first.
	pub setup: Vec<OperationDirective>,
	/// Teardown directives, class scope first.
	pub teardown: Vec<OperationDirective>,
	/// Class-level expectations.
	pub class_expectations: Vec<ExpectationDirective>,
	/// Method-level expectations.
	pub method_expectations: Vec<ExpectationDirective>,
	/// Class-level connection configuration.
	pub configuration: Option<ScopeConfiguration>,
}

impl ResolvedDirectives {
	/// Every declared expectation, class scope first.
	pub fn expectations(&self) -> impl Iterator<Item = &ExpectationDirective> {
		self.class_expectations
			.iter()
			.chain(&self.method_expectations)
	}

	/// Expectations to evaluate, in evaluation order.
	///
	/// If any method-level expectation overrides, only method-level
	/// expectations are returned. Otherwise method-level expectations come
	/// first, followed by class-level ones.
	pub fn effective_expectations(&self) -> Vec<&ExpectationDirective> {
		let overridden = self.method_expectations.iter().any(|e| e.overrides);
		let mut effective: Vec<&ExpectationDirective> = self.method_expectations.iter().collect();
		if !overridden {
			effective.extend(&self.class_expectations);
		}
		effective
	}

	/// Modifiers of every declared expectation, class scope first.
	pub fn expectation_modifiers(&self) -> Vec<Arc<dyn DataSetModifier>> {
		self.expectations()
			.flat_map(|e| e.modifiers.iter().cloned())
			.collect()
	}
}

/// Resolves and caches the directives of test scopes.
///
/// The cache is append-only: the first resolution of a scope is kept.
pub struct DirectiveResolver {
	source: Arc<dyn DirectiveSource>,
	cache: RwLock<HashMap<TestScope, Arc<ResolvedDirectives>>>,
}

impl DirectiveResolver {
	/// Creates a resolver reading from `source`.
	pub fn new(source: Arc<dyn DirectiveSource>) -> Self {
		Self {
			source,
			cache: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the directives of `scope`.
	pub fn resolve(&self, scope: &TestScope) -> Arc<ResolvedDirectives> {
		if let Some(resolved) = self.cache.read().get(scope) {
			return Arc::clone(resolved);
		}

		let class = self.source.class_directives(scope.class());
		let method = self.source.method_directives(scope.class(), scope.method());
		let mut resolved = ResolvedDirectives {
			configuration: class.and_then(|c| c.configuration.clone()),
			..Default::default()
		};
		for set in [class, method].into_iter().flatten() {
			resolved.setup.extend(set.setup.iter().cloned());
			resolved.teardown.extend(set.teardown.iter().cloned());
		}
		if let Some(class) = class {
			resolved.class_expectations = class.expectations.clone();
		}
		if let Some(method) = method {
			resolved.method_expectations = method.expectations.clone();
		}
		tracing::debug!(
			scope = %scope,
			setup = resolved.setup.len(),
			teardown = resolved.teardown.len(),
			expectations = resolved.class_expectations.len() + resolved.method_expectations.len(),
			"resolved fixture directives"
		);

		let resolved = Arc::new(resolved);
		Arc::clone(
			self.cache
				.write()
				.entry(scope.clone())
				.or_insert(resolved),
		)
	}

	/// Returns the number of cached scopes.
	pub fn cached(&self) -> usize {
		self.cache.read().len()
	}
}

impl fmt::Debug for DirectiveResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DirectiveResolver")
			.field("cached", &self.cached())
			.finish_non_exhaustive()
	}
}
