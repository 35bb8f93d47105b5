//! Resource resolution.
//!
//! A [`ResourceResolver`] turns a `(scope, location)` pair into the bytes of
//! a dataset document, or reports that nothing was found. The scope is the
//! module path of the test's declaring type (for example
//! `orders::tests::PersonTest`); relative locations are looked up next to it
//! first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::DataSetResult;

/// Bytes of a resolved dataset document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
	/// Where the document was found.
	pub location: String,
	/// Raw document content.
	pub bytes: Vec<u8>,
}

/// Resolves dataset locations to document bytes.
pub trait ResourceResolver: Send + Sync {
	/// Returns the first existing resource for `location`, or `None`.
	fn resolve(&self, scope: &str, location: &str) -> DataSetResult<Option<Resource>>;
}

/// Directory of a scope: its module path with the last segment dropped.
///
/// ```
/// # use reinhardt_dataset::resource::scope_directory;
/// assert_eq!(scope_directory("orders::tests::PersonTest"), "orders/tests");
/// assert_eq!(scope_directory("PersonTest"), "");
/// ```
pub fn scope_directory(scope: &str) -> String {
	let segments: Vec<&str> = scope.split("::").filter(|s| !s.is_empty()).collect();
	match segments.split_last() {
		Some((_, parents)) => parents.join("/"),
		None => String::new(),
	}
}

/// Relative paths tried for `location`, in priority order.
///
/// A location starting with `/` is taken from the root only. Any other
/// location is tried in the scope's directory first, then at the root.
pub fn relative_candidates(scope: &str, location: &str) -> Vec<String> {
	if let Some(rooted) = location.strip_prefix('/') {
		return vec![rooted.to_string()];
	}
	let directory = scope_directory(scope);
	if directory.is_empty() {
		vec![location.to_string()]
	} else {
		vec![format!("{}/{}", directory, location), location.to_string()]
	}
}

/// Resolves locations against directories on disk.
///
/// # Example
///
/// ```no_run
/// use reinhardt_dataset::{FileSystemResolver, ResourceResolver};
///
/// let resolver = FileSystemResolver::new(["tests/fixtures"]);
/// let resource = resolver.resolve("orders::tests::PersonTest", "person.json").unwrap();
/// // tries tests/fixtures/orders/tests/person.json, then tests/fixtures/person.json
/// ```
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
	roots: Vec<PathBuf>,
}

impl FileSystemResolver {
	/// Creates a resolver searching the given roots in order.
	pub fn new<I, P>(roots: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		Self {
			roots: roots.into_iter().map(Into::into).collect(),
		}
	}

	/// Returns the resource roots.
	pub fn roots(&self) -> &[PathBuf] {
		&self.roots
	}

	/// Returns every path tried for `location`, in priority order.
	pub fn candidates(&self, scope: &str, location: &str) -> Vec<PathBuf> {
		let relative = relative_candidates(scope, location);
		relative
			.iter()
			.flat_map(|candidate| self.roots.iter().map(move |root| root.join(candidate)))
			.collect()
	}
}

impl Default for FileSystemResolver {
	fn default() -> Self {
		Self::new([Path::new("tests/fixtures")])
	}
}

impl ResourceResolver for FileSystemResolver {
	fn resolve(&self, scope: &str, location: &str) -> DataSetResult<Option<Resource>> {
		for path in self.candidates(scope, location) {
			if path.is_file() {
				let bytes = std::fs::read(&path)?;
				tracing::debug!(path = %path.display(), "resolved dataset resource");
				return Ok(Some(Resource {
					location: path.display().to_string(),
					bytes,
				}));
			}
		}
		Ok(None)
	}
}

/// Serves documents registered in memory, keyed by `/`-separated path.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
	documents: HashMap<String, Vec<u8>>,
}

impl StaticResolver {
	/// Creates an empty resolver.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a document.
	pub fn with_document(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
		self.documents.insert(path.into(), content.into());
		self
	}
}

impl ResourceResolver for StaticResolver {
	fn resolve(&self, scope: &str, location: &str) -> DataSetResult<Option<Resource>> {
		Ok(relative_candidates(scope, location)
			.into_iter()
			.find_map(|candidate| {
				self.documents.get(&candidate).map(|bytes| Resource {
					location: candidate,
					bytes: bytes.clone(),
				})
			}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("orders::tests::PersonTest", "person.json", vec!["orders/tests/person.json", "person.json"])]
	#[case("orders::tests::PersonTest", "/person.json", vec!["person.json"])]
	#[case("PersonTest", "data/person.json", vec!["data/person.json"])]
	fn test_relative_candidates(
		#[case] scope: &str,
		#[case] location: &str,
		#[case] expected: Vec<&str>,
	) {
		assert_eq!(relative_candidates(scope, location), expected);
	}

	#[rstest]
	fn test_file_system_candidates_try_scope_directory_in_every_root_first() {
		let resolver = FileSystemResolver::new(["a", "b"]);
		let candidates = resolver.candidates("m::T", "x.json");
		assert_eq!(
			candidates,
			vec![
				PathBuf::from("a/m/x.json"),
				PathBuf::from("b/m/x.json"),
				PathBuf::from("a/x.json"),
				PathBuf::from("b/x.json"),
			]
		);
	}

	#[rstest]
	fn test_static_resolver_prefers_scope_directory() {
		let resolver = StaticResolver::new()
			.with_document("m/x.json", "scoped")
			.with_document("x.json", "root");

		let scoped = resolver.resolve("m::T", "x.json").unwrap().unwrap();
		assert_eq!(scoped.bytes, b"scoped");

		let rooted = resolver.resolve("m::T", "/x.json").unwrap().unwrap();
		assert_eq!(rooted.bytes, b"root");

		assert!(resolver.resolve("m::T", "y.json").unwrap().is_none());
	}
}
