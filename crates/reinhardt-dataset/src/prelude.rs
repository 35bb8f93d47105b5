//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```
//! use reinhardt_dataset::prelude::*;
//!
//! let table = Table::builder("person").column("id").row([1]).build().unwrap();
//! let data_set = DataSet::new(vec![table]).unwrap();
//! assert_eq!(data_set.len(), 1);
//! ```

// Error types
pub use crate::error::{DataSetError, DataSetResult};

// Data model
pub use crate::dataset::DataSet;
pub use crate::table::{Column, Row, Table, TableBuilder};
pub use crate::value::Value;

// Loading
pub use crate::format::DataSetFormat;
pub use crate::loader::{DataSetLoader, ReplacementDataSetLoader, ResourceDataSetLoader};
pub use crate::parser::DataSetParser;
pub use crate::resource::{FileSystemResolver, ResourceResolver, StaticResolver};

// Rewriting and filtering
pub use crate::filter::{ColumnFilter, ColumnPatternFilter};
pub use crate::modifier::{DataSetModifier, ModifierChain, ReplacementModifier};
