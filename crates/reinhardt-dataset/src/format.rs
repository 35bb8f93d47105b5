//! Dataset document formats.

use std::fmt;
use std::path::Path;

/// Supported dataset file formats.
///
/// Both formats describe the same flat document: a map from table name to an
/// array of row objects.
///
/// ```json
/// {
///   "person": [
///     { "id": 1, "name": "wang" },
///     { "id": 2, "name": "wu", "email": null }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DataSetFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires `yaml` feature).
	Yaml,
}

impl DataSetFormat {
	/// Determines the format from a file extension.
	///
	/// # Arguments
	///
	/// * `ext` - File extension (e.g., "json", "yaml", "yml")
	///
	/// # Returns
	///
	/// Returns `Some(DataSetFormat)` if the extension is recognized, `None` otherwise.
	///
	/// # Example
	///
	/// ```
	/// # use reinhardt_dataset::DataSetFormat;
	/// assert_eq!(DataSetFormat::from_extension("JSON"), Some(DataSetFormat::Json));
	/// assert_eq!(DataSetFormat::from_extension("yml"), Some(DataSetFormat::Yaml));
	/// assert_eq!(DataSetFormat::from_extension("xml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a path or location string.
	pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
		path.as_ref()
			.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns the default file extension for this format.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}
}

impl fmt::Display for DataSetFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}
