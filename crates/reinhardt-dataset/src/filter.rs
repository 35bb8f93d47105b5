//! Column filters.
//!
//! A [`ColumnFilter`] decides which columns of a table take part in a
//! comparison. Filters are applied to the *expected* side of an assertion.

use regex::{Regex, RegexBuilder};

use crate::error::{DataSetError, DataSetResult};
use crate::table::Column;

/// Decides whether a column is kept.
pub trait ColumnFilter: Send + Sync {
	/// Returns true if `column` of `table` should be kept.
	fn accept(&self, table: &str, column: &Column) -> bool;
}

impl<F> ColumnFilter for F
where
	F: Fn(&str, &Column) -> bool + Send + Sync,
{
	fn accept(&self, table: &str, column: &Column) -> bool {
		self(table, column)
	}
}

#[derive(Debug, Clone)]
struct Pattern {
	table: Option<Regex>,
	column: Regex,
}

impl Pattern {
	fn compile(source: &str) -> DataSetResult<Self> {
		let (table, column) = match source.split_once('.') {
			Some((table, column)) => (Some(wildcard(source, table)?), column),
			None => (None, source),
		};
		Ok(Self {
			table,
			column: wildcard(source, column)?,
		})
	}

	fn matches(&self, table: &str, column: &str) -> bool {
		self.table.as_ref().is_none_or(|t| t.is_match(table)) && self.column.is_match(column)
	}
}

fn wildcard(source: &str, pattern: &str) -> DataSetResult<Regex> {
	let mut expression = String::with_capacity(pattern.len() + 2);
	expression.push('^');
	for ch in pattern.chars() {
		match ch {
			'*' => expression.push_str(".*"),
			'?' => expression.push('.'),
			other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
		}
	}
	expression.push('$');
	RegexBuilder::new(&expression)
		.case_insensitive(true)
		.build()
		.map_err(|e| DataSetError::InvalidPattern {
			pattern: source.to_string(),
			message: e.to_string(),
		})
}

/// Include/exclude filter over wildcard column patterns.
///
/// `*` matches any run of characters and `?` a single one. A pattern of the
/// form `table.column` only applies to that table. A column is kept when it
/// matches an include pattern (or no include pattern was given) and matches
/// no exclude pattern.
///
/// # Examples
///
/// ```
/// use reinhardt_dataset::{Column, ColumnFilter, ColumnPatternFilter};
///
/// let filter = ColumnPatternFilter::new()
/// 	.exclude("*_at")
/// 	.unwrap()
/// 	.exclude("person.version")
/// 	.unwrap();
///
/// assert!(filter.accept("person", &Column::new("name")));
/// assert!(!filter.accept("person", &Column::new("created_at")));
/// assert!(!filter.accept("person", &Column::new("version")));
/// assert!(filter.accept("address", &Column::new("version")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnPatternFilter {
	includes: Vec<Pattern>,
	excludes: Vec<Pattern>,
}

impl ColumnPatternFilter {
	/// Creates a filter that accepts every column.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an include pattern.
	///
	/// # Errors
	///
	/// Returns [`DataSetError::InvalidPattern`] if the pattern cannot be compiled.
	pub fn include(mut self, pattern: &str) -> DataSetResult<Self> {
		self.includes.push(Pattern::compile(pattern)?);
		Ok(self)
	}

	/// Adds an exclude pattern.
	///
	/// # Errors
	///
	/// Returns [`DataSetError::InvalidPattern`] if the pattern cannot be compiled.
	pub fn exclude(mut self, pattern: &str) -> DataSetResult<Self> {
		self.excludes.push(Pattern::compile(pattern)?);
		Ok(self)
	}
}

impl ColumnFilter for ColumnPatternFilter {
	fn accept(&self, table: &str, column: &Column) -> bool {
		let included = self.includes.is_empty()
			|| self.includes.iter().any(|p| p.matches(table, column.name()));
		included && !self.excludes.iter().any(|p| p.matches(table, column.name()))
	}
}
