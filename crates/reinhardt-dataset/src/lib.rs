//! Tabular datasets for database fixtures.
//!
//! This crate provides the data side of fixture management:
//!
//! - **Data model**: [`DataSet`]s of named [`Table`]s whose cells are absent,
//!   explicitly null, or a scalar [`Value`]
//! - **Loading**: [`DataSetLoader`]s that resolve location strings through a
//!   [`ResourceResolver`] and parse flat JSON/YAML documents
//! - **Rewriting**: [`DataSetModifier`]s such as [`ReplacementModifier`]
//! - **Filtering**: [`ColumnFilter`]s that narrow which columns are compared
//!
//! # Features
//!
//! - `json` - JSON dataset support (enabled by default)
//! - `yaml` - YAML dataset support
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! Create a dataset file next to your tests (`tests/fixtures/person.json`):
//!
//! ```json
//! {
//!   "person": [
//!     { "id": 1, "name": "wang" },
//!     { "id": 2, "name": "wu", "email": null }
//!   ]
//! }
//! ```
//!
//! Load it:
//!
//! ```no_run
//! use reinhardt_dataset::prelude::*;
//!
//! let loader = ResourceDataSetLoader::new(FileSystemResolver::new(["tests/fixtures"]));
//! let data_set = loader.load_data_set("orders::tests::PersonTest", "person.json")?;
//! # Ok::<(), DataSetError>(())
//! ```

pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod modifier;
pub mod parser;
pub mod prelude;
pub mod resource;
pub mod table;
pub mod value;

pub use dataset::DataSet;
pub use error::{DataSetError, DataSetResult};
pub use filter::{ColumnFilter, ColumnPatternFilter};
pub use format::DataSetFormat;
pub use loader::{DataSetLoader, ReplacementDataSetLoader, ResourceDataSetLoader};
pub use modifier::{DataSetModifier, ModifierChain, ReplacementModifier};
pub use parser::DataSetParser;
pub use resource::{FileSystemResolver, Resource, ResourceResolver, StaticResolver};
pub use table::{Column, Row, Table, TableBuilder};
pub use value::Value;
