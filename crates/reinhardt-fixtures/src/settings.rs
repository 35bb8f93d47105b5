//! Fixture settings.
//!
//! Settings are read from TOML and build the pluggable collaborators of a
//! [`FixtureRunner`](crate::runner::FixtureRunner).
//!
//! ```toml
//! default_connections = ["primary"]
//! data_set_format = "yaml"
//! operation_lookup = "mssql"
//! resource_roots = ["tests/fixtures", "tests/data"]
//! null_token = "[null]"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reinhardt_dataset::{
	DataSetFormat, DataSetLoader, FileSystemResolver, ReplacementDataSetLoader,
	ReplacementModifier, ResourceDataSetLoader,
};
use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, FixtureResult};
use crate::operation::{DefaultOperationLookup, MsSqlOperationLookup, OperationLookup};

/// Connection names tried when a scope declares none.
pub const DEFAULT_CONNECTION_NAMES: [&str; 2] = ["dbUnitDatabaseConnection", "dataSource"];

/// Directory searched for datasets when no roots are configured.
pub const DEFAULT_RESOURCE_ROOT: &str = "tests/fixtures";

/// How dataset documents are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSetFormatSetting {
	/// Detect the format from each location's extension.
	#[default]
	Auto,
	/// Parse every location as JSON.
	Json,
	/// Parse every location as YAML.
	Yaml,
}

impl DataSetFormatSetting {
	/// Returns the forced format, or `None` for detection.
	pub fn forced(&self) -> Option<DataSetFormat> {
		match self {
			Self::Auto => None,
			Self::Json => Some(DataSetFormat::Json),
			Self::Yaml => Some(DataSetFormat::Yaml),
		}
	}
}

/// Which operation lookup to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationLookupSetting {
	/// [`DefaultOperationLookup`].
	#[default]
	Default,
	/// [`MsSqlOperationLookup`].
	MsSql,
}

/// Engine-wide fixture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
	/// Connection names tried, in order, when a scope declares none.
	pub default_connections: Vec<String>,
	/// Dataset document format.
	pub data_set_format: DataSetFormatSetting,
	/// Operation lookup dialect.
	pub operation_lookup: OperationLookupSetting,
	/// Case sensitivity of table names when merging datasets.
	pub case_sensitive_table_names: bool,
	/// Combine same-named tables when merging datasets.
	pub combine: bool,
	/// Directories searched for dataset locations.
	pub resource_roots: Vec<PathBuf>,
	/// Literal loaded as an explicit null, if set.
	pub null_token: Option<String>,
}

impl Default for FixtureSettings {
	fn default() -> Self {
		Self {
			default_connections: DEFAULT_CONNECTION_NAMES.iter().map(|s| s.to_string()).collect(),
			data_set_format: DataSetFormatSetting::Auto,
			operation_lookup: OperationLookupSetting::Default,
			case_sensitive_table_names: false,
			combine: true,
			resource_roots: vec![PathBuf::from(DEFAULT_RESOURCE_ROOT)],
			null_token: None,
		}
	}
}

impl FixtureSettings {
	/// Sets the default connection names.
	pub fn with_default_connections<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.default_connections = names.into_iter().map(Into::into).collect();
		self
	}

	/// Sets the resource roots.
	pub fn with_resource_roots<I, P>(mut self, roots: I) -> Self
	where
		I: IntoIterator<Item = P>,
		P: Into<PathBuf>,
	{
		self.resource_roots = roots.into_iter().map(Into::into).collect();
		self
	}

	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Settings`] if the file cannot be read or parsed.
	pub fn from_file(path: impl AsRef<Path>) -> FixtureResult<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| {
			FixtureError::Settings(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&content)
	}

	/// Parse settings from a TOML string.
	pub fn from_toml_str(content: &str) -> FixtureResult<Self> {
		toml::from_str(content).map_err(|e| FixtureError::Settings(e.to_string()))
	}

	/// Builds the dataset loader these settings describe.
	pub fn build_loader(&self) -> Arc<dyn DataSetLoader> {
		let roots = if self.resource_roots.is_empty() {
			vec![PathBuf::from(DEFAULT_RESOURCE_ROOT)]
		} else {
			self.resource_roots.clone()
		};
		let mut loader = ResourceDataSetLoader::new(FileSystemResolver::new(roots))
			.with_case_sensitive_table_names(self.case_sensitive_table_names);
		if let Some(format) = self.data_set_format.forced() {
			loader = loader.with_format(format);
		}
		match &self.null_token {
			Some(token) => Arc::new(ReplacementDataSetLoader::with_replacements(
				Arc::new(loader),
				ReplacementModifier::null_token(token.as_str()),
			)),
			None => Arc::new(loader),
		}
	}

	/// Builds the operation lookup these settings describe.
	pub fn build_operation_lookup(&self) -> Arc<dyn OperationLookup> {
		match self.operation_lookup {
			OperationLookupSetting::Default => Arc::new(DefaultOperationLookup),
			OperationLookupSetting::MsSql => Arc::new(MsSqlOperationLookup),
		}
	}
}

/// Connection configuration declared on a test class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfiguration {
	/// Connection names to open, in order.
	pub connections: Vec<String>,
	/// Connection used by directives with a blank connection name.
	pub default_connection: Option<String>,
}

impl ScopeConfiguration {
	/// Declares the connections to open.
	pub fn new<I, S>(connections: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			connections: connections.into_iter().map(Into::into).collect(),
			default_connection: None,
		}
	}

	/// Declares the default connection.
	pub fn with_default_connection(mut self, name: impl Into<String>) -> Self {
		self.default_connection = Some(name.into());
		self
	}
}
