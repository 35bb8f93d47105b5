//! Sequence placeholder resolution.
//!
//! Expected data may refer to ids generated by a database sequence with
//! `${name}`. Before comparison every occurrence is replaced by an integer:
//! the store is asked once per name for the sequence's next value, and the
//! occurrences of that name receive consecutive values ending at it, in the
//! order they were first seen.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use reinhardt_dataset::{DataSet, Table, Value};

use crate::connection::DatabaseConnection;
use crate::error::FixtureResult;

static PLACEHOLDER: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

/// Position of one placeholder: table, row, column and match index in the cell.
type Occurrence = (usize, usize, String, usize);

fn scan(data_set: &DataSet) -> IndexMap<String, Vec<Occurrence>> {
	let mut occurrences: IndexMap<String, Vec<Occurrence>> = IndexMap::new();
	for (table_index, table) in data_set.tables().iter().enumerate() {
		for (row_index, row) in table.rows().iter().enumerate() {
			for (column_index, column) in table.columns().iter().enumerate() {
				let Some(Value::String(text)) = row.get(column_index) else {
					continue;
				};
				for (match_index, captures) in PLACEHOLDER.captures_iter(text).enumerate() {
					occurrences
						.entry(captures[1].to_string())
						.or_default()
						.push((table_index, row_index, column.name().to_string(), match_index));
				}
			}
		}
	}
	occurrences
}

fn substitute(
	table_index: usize,
	table: &Table,
	values: &HashMap<Occurrence, i64>,
) -> Table {
	table.map_cells(|row_index, column, cell| {
		let Some(Value::String(text)) = cell else {
			return cell.cloned();
		};
		let value_at = |match_index: usize| {
			values
				.get(&(table_index, row_index, column.name().to_string(), match_index))
				.copied()
		};
		if let Some(whole) = PLACEHOLDER.find(text)
			&& whole.start() == 0
			&& whole.end() == text.len()
			&& let Some(value) = value_at(0)
		{
			return Some(Value::Int(value));
		}
		let mut match_index = 0;
		let replaced = PLACEHOLDER.replace_all(text, |captures: &regex::Captures<'_>| {
			let replacement = value_at(match_index)
				.map(|value| value.to_string())
				.unwrap_or_else(|| captures[0].to_string());
			match_index += 1;
			replacement
		});
		Some(Value::String(replaced.into_owned()))
	})
}

/// Replaces every `${name}` placeholder of `data_set` with a sequence value.
///
/// # Example
///
/// Three occurrences of `${SEQ}` with a next value of 10 become 8, 9 and 10.
///
/// # Errors
///
/// Returns the store's error if a sequence cannot be queried.
pub async fn resolve_sequences(
	data_set: DataSet,
	connection: &dyn DatabaseConnection,
) -> FixtureResult<DataSet> {
	let occurrences = scan(&data_set);
	if occurrences.is_empty() {
		return Ok(data_set);
	}

	let mut values = HashMap::new();
	for (name, positions) in occurrences {
		let next = connection.next_sequence_value(&name).await?;
		let count = positions.len() as i64;
		tracing::debug!(sequence = %name, next, occurrences = count, "resolved sequence placeholder");
		for (offset, position) in positions.into_iter().enumerate() {
			values.insert(position, next - (count - 1 - offset as i64));
		}
	}

	let case_sensitive = data_set.is_case_sensitive();
	let tables = data_set
		.tables()
		.iter()
		.enumerate()
		.map(|(index, table)| substitute(index, table, &values))
		.collect();
	Ok(DataSet::with_case_sensitivity(tables, case_sensitive)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::InMemoryDatabase;
	use rstest::rstest;

	fn column(data_set: &DataSet, table: &str, column: &str) -> Vec<Option<Value>> {
		let table = data_set.table(table).unwrap();
		(0..table.row_count())
			.map(|row| table.value(row, column).unwrap().cloned())
			.collect()
	}

	#[rstest]
	#[tokio::test]
	async fn test_occurrences_end_at_next_value() {
		let database = InMemoryDatabase::new().with_sequence("SEQ", 10);
		let table = Table::builder("person")
			.columns(["id", "name"])
			.row([Value::from("${SEQ}"), Value::from("a")])
			.row([Value::from("${SEQ}"), Value::from("b")])
			.row([Value::from("${SEQ}"), Value::from("c")])
			.build()
			.unwrap();

		let resolved = resolve_sequences(DataSet::new(vec![table]).unwrap(), &database)
			.await
			.unwrap();

		assert_eq!(
			column(&resolved, "person", "id"),
			vec![
				Some(Value::Int(8)),
				Some(Value::Int(9)),
				Some(Value::Int(10))
			]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_names_shared_across_tables_form_one_group() {
		let database = InMemoryDatabase::new()
			.with_sequence("PERSON_SEQ", 5)
			.with_sequence("ADDRESS_SEQ", 100);
		let person = Table::builder("person")
			.column("id")
			.row(["${PERSON_SEQ}"])
			.build()
			.unwrap();
		let address = Table::builder("address")
			.columns(["id", "person_id"])
			.row(["${ADDRESS_SEQ}", "${PERSON_SEQ}"])
			.build()
			.unwrap();

		let resolved = resolve_sequences(DataSet::new(vec![person, address]).unwrap(), &database)
			.await
			.unwrap();

		assert_eq!(column(&resolved, "person", "id"), vec![Some(Value::Int(4))]);
		assert_eq!(column(&resolved, "address", "person_id"), vec![Some(Value::Int(5))]);
		assert_eq!(column(&resolved, "address", "id"), vec![Some(Value::Int(100))]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_embedded_placeholder_is_substituted_as_text() {
		let database = InMemoryDatabase::new().with_sequence("SEQ", 3);
		let table = Table::builder("person")
			.column("code")
			.row(["P-${SEQ}"])
			.build()
			.unwrap();

		let resolved = resolve_sequences(DataSet::new(vec![table]).unwrap(), &database)
			.await
			.unwrap();

		assert_eq!(column(&resolved, "person", "code"), vec![Some(Value::from("P-3"))]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_without_placeholders_store_is_not_queried() {
		let database = InMemoryDatabase::new();
		let table = Table::builder("person").column("id").row([1]).build().unwrap();
		let data_set = DataSet::new(vec![table]).unwrap();

		let resolved = resolve_sequences(data_set.clone(), &database).await.unwrap();

		assert_eq!(resolved, data_set);
	}
}
