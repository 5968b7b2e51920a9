//! Common test utilities for rust-apiscaffold tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use rust_apiscaffold::model::{Column, Database, Table, View};
use rust_apiscaffold::{scaffold_project, ScaffoldOptions, ScaffoldReport};

/// Test context with temporary directory for isolated test execution
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub project_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context by copying a fixture to a temp directory
    pub fn with_fixture(fixture_name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture_name);

        let project_dir = temp_dir.path().to_path_buf();
        copy_dir_recursive(&fixture_path, &project_dir).expect("Failed to copy fixture");

        Self {
            _temp_dir: temp_dir,
            project_dir,
        }
    }

    /// An empty context for tests that build their project in code
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let project_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            project_dir,
        }
    }

    pub fn project_path(&self) -> PathBuf {
        self.project_dir.join("project.scaffold.xml")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join("generated")
    }

    pub fn scaffold(&self, force: bool) -> anyhow::Result<ScaffoldReport> {
        scaffold_project(ScaffoldOptions {
            project_path: self.project_path(),
            output_path: None,
            force,
        })
    }

    /// Scaffold the project, panicking if generation fails
    pub fn scaffold_successfully(&self) -> ScaffoldReport {
        match self.scaffold(false) {
            Ok(report) => report,
            Err(e) => panic!("Scaffolding failed: {:?}", e),
        }
    }

    /// Read a generated file relative to the output directory
    pub fn generated(&self, relative: &str) -> String {
        let path = self.output_dir().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// All generated files, relative to the output directory, with `/` separators
    pub fn generated_files(&self) -> Vec<String> {
        let root = self.output_dir();
        let mut files: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(&root)
                    .expect("walked path is under the output directory")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// `dbo.Product` with an identity key, a unique name and a category lookup
pub fn product_database() -> Database {
    Database::new("Store")
        .with_table(
            Table::new("dbo", "Category")
                .with_column(Column::new("CategoryID", "int"))
                .with_column(Column::new("CategoryName", "nvarchar").with_length(50))
                .with_primary_key(&["CategoryID"])
                .with_identity("CategoryID"),
        )
        .with_table(
            Table::new("dbo", "Product")
                .with_column(Column::new("ProductID", "int"))
                .with_column(Column::new("ProductName", "nvarchar").with_length(100))
                .with_column(Column::new("CategoryID", "int").nullable())
                .with_column(Column::new("Price", "decimal").with_precision(8, 4))
                .with_primary_key(&["ProductID"])
                .with_identity("ProductID")
                .with_unique(&["ProductName"])
                .with_foreign_key(&["CategoryID"], "dbo.Category"),
        )
        .with_view(
            View::new("dbo", "ProductSummary")
                .with_column(Column::new("ProductName", "nvarchar").with_length(100))
                .with_column(Column::new("Total", "int")),
        )
}

/// Index of `needle` in `haystack`, panicking with context if absent
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in:\n{}", needle, haystack))
}
