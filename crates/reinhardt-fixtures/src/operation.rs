//! Operation kinds and their native counterparts.
//!
//! A directive names an [`OperationKind`]. An [`OperationLookup`] maps it to
//! the [`NativeOperation`] a store dialect understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FixtureError;

/// Operation applied to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
	/// Update existing rows by primary key.
	Update,
	/// Insert rows.
	Insert,
	/// Update rows that exist, insert the others.
	Refresh,
	/// Delete the dataset's rows by primary key.
	Delete,
	/// Delete every row of the dataset's tables.
	DeleteAll,
	/// Truncate the dataset's tables.
	#[serde(alias = "TRUNCATE")]
	TruncateTable,
	/// Delete every row of the dataset's tables, then insert.
	#[default]
	CleanInsert,
}

impl OperationKind {
	/// Every kind, in declaration order.
	pub const ALL: [OperationKind; 7] = [
		Self::Update,
		Self::Insert,
		Self::Refresh,
		Self::Delete,
		Self::DeleteAll,
		Self::TruncateTable,
		Self::CleanInsert,
	];

	/// Returns the canonical name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Update => "UPDATE",
			Self::Insert => "INSERT",
			Self::Refresh => "REFRESH",
			Self::Delete => "DELETE",
			Self::DeleteAll => "DELETE_ALL",
			Self::TruncateTable => "TRUNCATE_TABLE",
			Self::CleanInsert => "CLEAN_INSERT",
		}
	}
}

impl fmt::Display for OperationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OperationKind {
	type Err = FixtureError;

	/// Parses a kind, ignoring case and accepting `-` for `_`.
	///
	/// # Example
	///
	/// ```
	/// # use reinhardt_fixtures::OperationKind;
	/// assert_eq!("clean-insert".parse::<OperationKind>().unwrap(), OperationKind::CleanInsert);
	/// assert!("merge".parse::<OperationKind>().is_err());
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
		match normalized.as_str() {
			"UPDATE" => Ok(Self::Update),
			"INSERT" => Ok(Self::Insert),
			"REFRESH" => Ok(Self::Refresh),
			"DELETE" => Ok(Self::Delete),
			"DELETE_ALL" => Ok(Self::DeleteAll),
			"TRUNCATE" | "TRUNCATE_TABLE" => Ok(Self::TruncateTable),
			"CLEAN_INSERT" => Ok(Self::CleanInsert),
			_ => Err(FixtureError::configuration(format!(
				"Unknown operation kind '{}'",
				s
			))),
		}
	}
}

/// Operation as executed by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeOperation {
	/// Operation semantics.
	pub kind: OperationKind,
	/// Whether explicit values may be written to identity columns.
	pub identity_insert: bool,
}

impl NativeOperation {
	/// Plain operation.
	pub const fn plain(kind: OperationKind) -> Self {
		Self {
			kind,
			identity_insert: false,
		}
	}

	/// Operation that enables identity insert around its writes.
	pub const fn identity_insert(kind: OperationKind) -> Self {
		Self {
			kind,
			identity_insert: true,
		}
	}
}

impl fmt::Display for NativeOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.identity_insert {
			write!(f, "{} (identity insert)", self.kind)
		} else {
			write!(f, "{}", self.kind)
		}
	}
}

/// Maps operation kinds to native operations for one store dialect.
pub trait OperationLookup: Send + Sync {
	/// Returns the native operation, or `None` if the dialect lacks it.
	fn lookup(&self, kind: OperationKind) -> Option<NativeOperation>;
}

/// Maps every kind to its plain native operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOperationLookup;

impl OperationLookup for DefaultOperationLookup {
	fn lookup(&self, kind: OperationKind) -> Option<NativeOperation> {
		Some(NativeOperation::plain(kind))
	}
}

/// Microsoft SQL Server lookup.
///
/// Writes that may carry explicit identity values use identity insert.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsSqlOperationLookup;

impl OperationLookup for MsSqlOperationLookup {
	fn lookup(&self, kind: OperationKind) -> Option<NativeOperation> {
		Some(match kind {
			OperationKind::Insert | OperationKind::Refresh | OperationKind::CleanInsert => {
				NativeOperation::identity_insert(kind)
			}
			other => NativeOperation::plain(other),
		})
	}
}
