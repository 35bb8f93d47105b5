//! Table comparison primitives shared by the assertion strategies.

use std::sync::Arc;

use reinhardt_dataset::{ColumnFilter, DataSet, Table};

use crate::error::{Mismatch, MismatchKind};

fn sorted_upper<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
	let mut names: Vec<String> = names.map(str::to_ascii_uppercase).collect();
	names.sort();
	names
}

/// Compares two tables after dropping `ignored` columns from both.
///
/// Rows are compared positionally. Absent expected cells are not compared.
pub(crate) fn assert_tables_ignoring(
	expected: &Table,
	actual: &Table,
	ignored: &[String],
) -> Result<(), Mismatch> {
	let expected = expected.without_columns(ignored);
	let actual = actual.without_columns(ignored);
	let name = expected.name();

	if expected.is_empty() && actual.is_empty() {
		return Ok(());
	}
	if expected.row_count() != actual.row_count() {
		return Err(Mismatch::table(
			name,
			MismatchKind::RowCount {
				expected: expected.row_count(),
				actual: actual.row_count(),
			},
		));
	}

	let expected_columns = sorted_upper(expected.columns().iter().map(|c| c.name()));
	let actual_columns = sorted_upper(actual.columns().iter().map(|c| c.name()));
	if expected_columns != actual_columns {
		return Err(Mismatch::table(
			name,
			MismatchKind::Columns {
				expected: expected_columns,
				actual: actual_columns,
			},
		));
	}

	for (row, expected_row) in expected.rows().iter().enumerate() {
		for (index, column) in expected.columns().iter().enumerate() {
			let Some(expected_value) = expected_row.get(index) else {
				continue;
			};
			let actual_value = actual
				.column_index(column.name())
				.and_then(|i| actual.rows()[row].get(i));
			let matched = actual_value.is_some_and(|actual| expected_value.matches(actual));
			if !matched {
				return Err(Mismatch::table(
					name,
					MismatchKind::Value {
						row,
						column: column.name().to_string(),
						expected: Some(expected_value.clone()),
						actual: actual_value.cloned(),
					},
				));
			}
		}
	}
	Ok(())
}

/// Checks that both datasets hold the same table names.
pub(crate) fn assert_same_tables(expected: &DataSet, actual: &DataSet) -> Result<(), Mismatch> {
	if expected.len() != actual.len() {
		return Err(Mismatch::data_set(MismatchKind::TableCount {
			expected: expected.len(),
			actual: actual.len(),
		}));
	}
	let expected_names = sorted_upper(expected.table_names().into_iter());
	let actual_names = sorted_upper(actual.table_names().into_iter());
	if expected_names != actual_names {
		return Err(Mismatch::data_set(MismatchKind::TableNames {
			expected: expected_names,
			actual: actual_names,
		}));
	}
	Ok(())
}

/// Expected tables paired with their actual counterparts, in name order.
pub(crate) fn paired_tables<'a>(
	expected: &'a DataSet,
	actual: &'a DataSet,
) -> Result<Vec<(&'a Table, &'a Table)>, Mismatch> {
	let mut tables: Vec<&Table> = expected.tables().iter().collect();
	tables.sort_by_key(|t| t.name().to_ascii_uppercase());
	tables
		.into_iter()
		.map(|table| {
			actual
				.find_table(table.name())
				.map(|actual| (table, actual))
				.ok_or_else(|| Mismatch::table(table.name(), MismatchKind::MissingTable))
		})
		.collect()
}

/// Actual columns left out of the comparison in non-strict modes.
///
/// Without filters these are the actual columns the expected table lacks.
/// With filters, each filter first narrows the expected columns, and the
/// actual columns missing from each narrowed set are unioned.
pub(crate) fn columns_to_ignore(
	expected: &Table,
	actual: &Table,
	filters: &[Arc<dyn ColumnFilter>],
) -> Vec<String> {
	let not_in = |keep: &dyn Fn(&str) -> bool| -> Vec<String> {
		actual
			.columns()
			.iter()
			.filter(|c| !keep(c.name()))
			.map(|c| c.name().to_string())
			.collect()
	};
	if filters.is_empty() {
		return not_in(&|name: &str| expected.has_column(name));
	}
	let mut ignored: Vec<String> = Vec::new();
	for filter in filters {
		let narrowed = not_in(&|name: &str| {
			expected
				.columns()
				.iter()
				.any(|c| c.is_named(name) && filter.accept(expected.name(), c))
		});
		for column in narrowed {
			if !ignored.iter().any(|c| c.eq_ignore_ascii_case(&column)) {
				ignored.push(column);
			}
		}
	}
	ignored
}

/// Columns any filter rejects, from either table.
pub(crate) fn filtered_columns(
	expected: &Table,
	actual: &Table,
	filters: &[Arc<dyn ColumnFilter>],
) -> Vec<String> {
	let mut rejected: Vec<String> = Vec::new();
	for column in expected.columns().iter().chain(actual.columns()) {
		let refused = filters.iter().any(|f| !f.accept(expected.name(), column));
		if refused && !rejected.iter().any(|c| column.is_named(c)) {
			rejected.push(column.name().to_string());
		}
	}
	rejected
}
