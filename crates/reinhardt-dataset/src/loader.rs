//! Dataset loading.
//!
//! A [`DataSetLoader`] turns a location string into a [`DataSet`]. A location
//! that cannot be found is not an error: the loader returns `Ok(None)` and
//! the caller decides what "no dataset" means.

use std::sync::Arc;

use crate::dataset::DataSet;
use crate::error::{DataSetError, DataSetResult};
use crate::format::DataSetFormat;
use crate::modifier::{DataSetModifier, ReplacementModifier};
use crate::parser::DataSetParser;
use crate::resource::{FileSystemResolver, ResourceResolver};

/// Loads datasets from locations.
pub trait DataSetLoader: Send + Sync {
	/// Loads the dataset at `location`, resolved relative to `scope`.
	///
	/// # Returns
	///
	/// `Ok(None)` if the location is blank or no resource exists for it.
	fn load_data_set(&self, scope: &str, location: &str) -> DataSetResult<Option<DataSet>>;

	/// Loads several locations and merges them into one dataset.
	///
	/// Unresolved locations are dropped. Returns `Ok(None)` only if every
	/// location was unresolved.
	///
	/// # Arguments
	///
	/// * `scope` - Scope the locations are relative to
	/// * `locations` - Locations in merge order
	/// * `combine` - Whether same-named tables are concatenated
	/// * `case_sensitive` - Table name case sensitivity of the result
	fn load_composite(
		&self,
		scope: &str,
		locations: &[String],
		combine: bool,
		case_sensitive: bool,
	) -> DataSetResult<Option<DataSet>> {
		let mut loaded = Vec::with_capacity(locations.len());
		for location in locations {
			if let Some(data_set) = self.load_data_set(scope, location)? {
				loaded.push(data_set);
			}
		}
		if loaded.is_empty() {
			return Ok(None);
		}
		DataSet::composite(loaded, combine, case_sensitive).map(Some)
	}
}

/// Loads documents through a [`ResourceResolver`].
///
/// The format is taken from the location's extension unless one is forced.
///
/// # Example
///
/// ```
/// use reinhardt_dataset::{DataSetLoader, ResourceDataSetLoader, StaticResolver};
///
/// let resolver = StaticResolver::new().with_document("person.json", r#"{"person": [{"id": 1}]}"#);
/// let loader = ResourceDataSetLoader::new(resolver);
///
/// let data_set = loader.load_data_set("PersonTest", "person.json").unwrap().unwrap();
/// assert_eq!(data_set.table("person").unwrap().row_count(), 1);
/// assert!(loader.load_data_set("PersonTest", "missing.json").unwrap().is_none());
/// assert!(loader.load_data_set("PersonTest", "  ").unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ResourceDataSetLoader<R> {
	resolver: R,
	format: Option<DataSetFormat>,
	parser: DataSetParser,
}

impl<R: ResourceResolver> ResourceDataSetLoader<R> {
	/// Creates a loader detecting formats by extension.
	pub fn new(resolver: R) -> Self {
		Self {
			resolver,
			format: None,
			parser: DataSetParser::new(),
		}
	}

	/// Forces every location to be parsed as `format`.
	pub fn with_format(mut self, format: DataSetFormat) -> Self {
		self.format = Some(format);
		self
	}

	/// Sets table name case sensitivity of loaded datasets.
	pub fn with_case_sensitive_table_names(mut self, case_sensitive: bool) -> Self {
		self.parser = self.parser.case_sensitive(case_sensitive);
		self
	}

	/// Returns the resolver.
	pub fn resolver(&self) -> &R {
		&self.resolver
	}
}

impl Default for ResourceDataSetLoader<FileSystemResolver> {
	fn default() -> Self {
		Self::new(FileSystemResolver::default())
	}
}

impl<R: ResourceResolver> DataSetLoader for ResourceDataSetLoader<R> {
	fn load_data_set(&self, scope: &str, location: &str) -> DataSetResult<Option<DataSet>> {
		let location = location.trim();
		if location.is_empty() {
			return Ok(None);
		}
		let format = match self.format {
			Some(format) => format,
			None => DataSetFormat::from_path(location).ok_or_else(|| {
				DataSetError::UnsupportedExtension(location.to_string())
			})?,
		};
		let Some(resource) = self.resolver.resolve(scope, location)? else {
			tracing::debug!(scope, location, "no dataset resource found");
			return Ok(None);
		};
		tracing::debug!(location = %resource.location, %format, "loading dataset");
		self.parser.parse_bytes(&resource.bytes, format).map(Some)
	}
}

/// Loader that passes every loaded dataset through a modifier.
///
/// By default the literal `[null]` becomes an explicit null.
pub struct ReplacementDataSetLoader {
	inner: Arc<dyn DataSetLoader>,
	modifier: Arc<dyn DataSetModifier>,
}

impl ReplacementDataSetLoader {
	/// Token replaced with null by [`ReplacementDataSetLoader::new`].
	pub const DEFAULT_NULL_TOKEN: &'static str = "[null]";

	/// Wraps `inner`, replacing `[null]` with an explicit null.
	pub fn new(inner: Arc<dyn DataSetLoader>) -> Self {
		Self::with_replacements(
			inner,
			ReplacementModifier::null_token(Self::DEFAULT_NULL_TOKEN),
		)
	}

	/// Wraps `inner` with custom replacements.
	pub fn with_replacements(inner: Arc<dyn DataSetLoader>, replacements: ReplacementModifier) -> Self {
		Self {
			inner,
			modifier: Arc::new(replacements),
		}
	}
}

impl std::fmt::Debug for ReplacementDataSetLoader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReplacementDataSetLoader").finish_non_exhaustive()
	}
}

impl DataSetLoader for ReplacementDataSetLoader {
	fn load_data_set(&self, scope: &str, location: &str) -> DataSetResult<Option<DataSet>> {
		self.inner
			.load_data_set(scope, location)?
			.map(|data_set| self.modifier.modify(data_set))
			.transpose()
	}
}
