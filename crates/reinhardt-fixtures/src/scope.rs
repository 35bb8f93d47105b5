//! Test scope identity.

use std::fmt;

/// Identity of one test: its declaring type and its method.
///
/// `class` is the module path of the declaring type, for example
/// `orders::tests::PersonTest`. Relative dataset locations are resolved
/// next to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestScope {
	class: String,
	method: String,
}

impl TestScope {
	/// Creates a scope.
	pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			method: method.into(),
		}
	}

	/// Returns the declaring type.
	pub fn class(&self) -> &str {
		&self.class
	}

	/// Returns the method name.
	pub fn method(&self) -> &str {
		&self.method
	}

	/// Scope that dataset locations are resolved against.
	pub fn resource_scope(&self) -> &str {
		&self.class
	}
}

impl fmt::Display for TestScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{}", self.class, self.method)
	}
}
