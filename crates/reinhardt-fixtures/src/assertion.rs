//! Assertion engine.
//!
//! Compares expected data with what the database actually holds. Three
//! strategies are provided, selected by [`AssertionMode`]:
//!
//! - [`StrictAssertion`]: every table and every column must match, row by row
//! - [`NonStrictAssertion`]: actual tables and columns the expected data does
//!   not mention are ignored
//! - [`NonStrictUnorderedAssertion`]: as non-strict, with both sides sorted by
//!   the expected columns first so row order does not matter
//!
//! An [`AssertionLookup`] maps a mode to its strategy, so callers can plug in
//! their own comparisons.

mod compare;
pub mod sequence;

use std::sync::Arc;

use reinhardt_dataset::{ColumnFilter, DataSet, Table};
use serde::{Deserialize, Serialize};

use crate::error::Mismatch;

use compare::{
	assert_same_tables, assert_tables_ignoring, columns_to_ignore, filtered_columns,
	paired_tables,
};

pub use sequence::resolve_sequences;

/// How expected and actual data are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssertionMode {
	/// Exact comparison.
	#[default]
	#[serde(alias = "DEFAULT")]
	Strict,
	/// Ignore unmentioned tables and columns.
	NonStrict,
	/// Ignore unmentioned tables and columns and row order.
	NonStrictUnordered,
}

/// A comparison strategy.
pub trait DatabaseAssertion: Send + Sync {
	/// Compares whole datasets.
	fn assert_data_sets(
		&self,
		expected: &DataSet,
		actual: &DataSet,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch>;

	/// Compares single tables.
	fn assert_tables(
		&self,
		expected: &Table,
		actual: &Table,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch>;
}

/// Exact comparison.
///
/// Column filters remove the columns they reject from both sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictAssertion;

impl DatabaseAssertion for StrictAssertion {
	fn assert_data_sets(
		&self,
		expected: &DataSet,
		actual: &DataSet,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		assert_same_tables(expected, actual)?;
		for (expected, actual) in paired_tables(expected, actual)? {
			self.assert_tables(expected, actual, filters)?;
		}
		Ok(())
	}

	fn assert_tables(
		&self,
		expected: &Table,
		actual: &Table,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		assert_tables_ignoring(expected, actual, &filtered_columns(expected, actual, filters))
	}
}

/// Comparison that ignores whatever the expected data leaves out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonStrictAssertion;

impl DatabaseAssertion for NonStrictAssertion {
	fn assert_data_sets(
		&self,
		expected: &DataSet,
		actual: &DataSet,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		for (expected, actual) in paired_tables(expected, actual)? {
			self.assert_tables(expected, actual, filters)?;
		}
		Ok(())
	}

	fn assert_tables(
		&self,
		expected: &Table,
		actual: &Table,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		assert_tables_ignoring(expected, actual, &columns_to_ignore(expected, actual, filters))
	}
}

/// Non-strict comparison that also ignores row order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonStrictUnorderedAssertion;

impl DatabaseAssertion for NonStrictUnorderedAssertion {
	fn assert_data_sets(
		&self,
		expected: &DataSet,
		actual: &DataSet,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		for (expected, actual) in paired_tables(expected, actual)? {
			self.assert_tables(expected, actual, filters)?;
		}
		Ok(())
	}

	fn assert_tables(
		&self,
		expected: &Table,
		actual: &Table,
		filters: &[Arc<dyn ColumnFilter>],
	) -> Result<(), Mismatch> {
		let order = expected.column_names();
		let ignored = columns_to_ignore(expected, actual, filters);
		assert_tables_ignoring(&expected.sorted_by(&order), &actual.sorted_by(&order), &ignored)
	}
}

/// Maps assertion modes to strategies.
pub trait AssertionLookup: Send + Sync {
	/// Returns the strategy for `mode`.
	fn assertion(&self, mode: AssertionMode) -> &dyn DatabaseAssertion;
}

/// Maps every mode to its built-in strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAssertionLookup;

impl AssertionLookup for DefaultAssertionLookup {
	fn assertion(&self, mode: AssertionMode) -> &dyn DatabaseAssertion {
		match mode {
			AssertionMode::Strict => &StrictAssertion,
			AssertionMode::NonStrict => &NonStrictAssertion,
			AssertionMode::NonStrictUnordered => &NonStrictUnorderedAssertion,
		}
	}
}
