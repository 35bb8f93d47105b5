//! Temporary dataset directory helper.
//!
//! Provides a scratch resource root that tests populate with dataset files.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory acting as a dataset resource root.
///
/// The directory is removed when the tree is dropped.
pub struct FixtureTree {
	dir: TempDir,
}

impl FixtureTree {
	/// Create an empty tree.
	///
	/// # Panics
	///
	/// Panics if the temporary directory cannot be created.
	pub fn new() -> Self {
		Self {
			dir: TempDir::new().expect("Failed to create temp dir"),
		}
	}

	/// Root directory of the tree.
	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	/// Write a file at `relative`, creating parent directories.
	///
	/// # Arguments
	///
	/// * `relative` - `/`-separated path below the root
	/// * `content` - File content
	///
	/// # Panics
	///
	/// Panics if the file cannot be written.
	pub fn write(&self, relative: &str, content: &str) -> PathBuf {
		let path = self.dir.path().join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.unwrap_or_else(|_| panic!("Failed to create directory: {:?}", parent));
		}
		std::fs::write(&path, content)
			.unwrap_or_else(|_| panic!("Failed to write test data: {:?}", path));
		path
	}
}
