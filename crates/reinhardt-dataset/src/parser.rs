//! Dataset document parsing.
//!
//! This module turns flat table-keyed documents into [`DataSet`]s.

use indexmap::IndexMap;

use crate::dataset::DataSet;
use crate::error::{DataSetError, DataSetResult};
use crate::format::DataSetFormat;
use crate::table::Table;
use crate::value::Value;

type RawRow = IndexMap<String, serde_json::Value>;
type RawDocument = IndexMap<String, Vec<RawRow>>;

/// Parser for dataset documents.
///
/// Columns of a table are the union of the keys of its rows, in order of
/// first appearance. A key missing from a row leaves that cell absent; a key
/// mapped to `null` is an explicit null. A table mapped to an empty array has
/// no columns and no rows.
///
/// # Example
///
/// ```
/// use reinhardt_dataset::{DataSetFormat, DataSetParser, Value};
///
/// let data_set = DataSetParser::new()
/// 	.parse_str(r#"{"person": [{"id": 1}, {"id": 2, "name": null}]}"#, DataSetFormat::Json)
/// 	.unwrap();
///
/// let person = data_set.table("person").unwrap();
/// assert_eq!(person.column_names(), vec!["id", "name"]);
/// assert_eq!(person.value(0, "name").unwrap(), None);
/// assert_eq!(person.value(1, "name").unwrap(), Some(&Value::Null));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSetParser {
	case_sensitive: bool,
}

impl DataSetParser {
	/// Creates a parser producing case-insensitive datasets.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets table name case sensitivity of parsed datasets.
	pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
		self.case_sensitive = case_sensitive;
		self
	}

	/// Parses a document from bytes.
	///
	/// # Errors
	///
	/// Returns an error if the bytes are not UTF-8 or the document is invalid.
	pub fn parse_bytes(&self, bytes: &[u8], format: DataSetFormat) -> DataSetResult<DataSet> {
		let content = std::str::from_utf8(bytes)
			.map_err(|e| DataSetError::ParseError(format!("Dataset is not valid UTF-8: {}", e)))?;
		self.parse_str(content, format)
	}

	/// Parses a document from a string.
	///
	/// # Arguments
	///
	/// * `content` - String content to parse
	/// * `format` - Format of the content
	///
	/// # Returns
	///
	/// Returns the parsed dataset on success.
	pub fn parse_str(&self, content: &str, format: DataSetFormat) -> DataSetResult<DataSet> {
		let document = match format {
			DataSetFormat::Json => self.parse_json(content)?,
			DataSetFormat::Yaml => self.parse_yaml(content)?,
		};
		self.build(document)
	}

	#[cfg(feature = "json")]
	fn parse_json(&self, content: &str) -> DataSetResult<RawDocument> {
		serde_json::from_str(content).map_err(|e| {
			DataSetError::ParseError(format!(
				"Expected a map of table names to row arrays: {}",
				e
			))
		})
	}

	/// Stub for JSON parsing when the feature is not enabled.
	#[cfg(not(feature = "json"))]
	fn parse_json(&self, _content: &str) -> DataSetResult<RawDocument> {
		Err(DataSetError::UnsupportedExtension(
			"JSON support requires the 'json' feature".to_string(),
		))
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> DataSetResult<RawDocument> {
		if content.trim().is_empty() {
			return Ok(RawDocument::new());
		}
		Ok(serde_yaml::from_str(content)?)
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> DataSetResult<RawDocument> {
		Err(DataSetError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	fn build(&self, document: RawDocument) -> DataSetResult<DataSet> {
		let mut tables = Vec::with_capacity(document.len());
		for (name, rows) in document {
			let mut builder = Table::builder(name.as_str());
			for (index, row) in rows.into_iter().enumerate() {
				let mut cells = Vec::with_capacity(row.len());
				for (column, raw) in row {
					let value = Value::from_json(raw).map_err(|e| {
						DataSetError::InvalidFormat(format!(
							"Row {} of table {}, column {}: {}",
							index, name, column, e
						))
					})?;
					cells.push((column, value));
				}
				builder = builder.sparse_row(cells);
			}
			tables.push(builder.build()?);
		}
		DataSet::with_case_sensitivity(tables, self.case_sensitive)
	}
}
