//! Error types for the dataset module.
//!
//! This module defines the error types used throughout the reinhardt-dataset crate.

use thiserror::Error;

/// Errors that can occur while building, loading or querying datasets.
#[derive(Debug, Error)]
pub enum DataSetError {
	/// Table was not found in the dataset.
	#[error("Table not found: {0}")]
	TableNotFound(String),

	/// Two tables with the same name were merged without combining.
	#[error("Duplicate table: {0}")]
	DuplicateTable(String),

	/// Column was not found in a table.
	#[error("Column not found: {table}.{column}")]
	ColumnNotFound {
		/// Table that was searched.
		table: String,
		/// Column that is missing.
		column: String,
	},

	/// Row index is outside the table.
	#[error("Row {row} out of bounds for table {table} with {len} rows")]
	RowOutOfBounds {
		/// Table that was accessed.
		table: String,
		/// Requested row index.
		row: usize,
		/// Number of rows in the table.
		len: usize,
	},

	/// Error parsing dataset content.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// Dataset content does not follow the expected structure.
	#[error("Invalid dataset format: {0}")]
	InvalidFormat(String),

	/// Unsupported file extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// Column filter pattern could not be compiled.
	#[error("Invalid column pattern '{pattern}': {message}")]
	InvalidPattern {
		/// Pattern as written.
		pattern: String,
		/// Compiler message.
		message: String,
	},

	/// I/O operation failed.
	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	/// JSON deserialization error.
	#[error("JSON error: {0}")]
	JsonError(#[from] serde_json::Error),

	/// YAML deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for dataset operations.
pub type DataSetResult<T> = Result<T, DataSetError>;
