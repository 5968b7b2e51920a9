//! Writes rendered definitions to disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::definition::ObjectDefinition;
use crate::error::ScaffoldError;

use super::{Renderer, ScaffoldEvent, ScaffoldHooks};

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Created, or replaced with different content
    Written,
    /// Existing file already had the rendered content
    Unchanged,
    /// Existing file kept because overwriting is off
    Skipped,
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub outcome: EmitOutcome,
    /// SHA-256 of the rendered text, uppercase hex
    pub checksum: String,
}

/// Renders definitions and writes them under an output directory
pub struct FileEmitter<'r> {
    renderer: &'r dyn Renderer,
    hooks: &'r ScaffoldHooks,
}

impl<'r> FileEmitter<'r> {
    pub fn new(renderer: &'r dyn Renderer, hooks: &'r ScaffoldHooks) -> Self {
        Self { renderer, hooks }
    }

    /// Relative path a definition is written to
    pub fn relative_path(&self, definition: &ObjectDefinition, subdirectory: &str) -> PathBuf {
        Path::new(subdirectory).join(self.renderer.file_name(definition))
    }

    /// Write a definition to `<output_dir>/<subdirectory>/<Name>.<ext>`.
    ///
    /// Without `force_overwrite` an existing file is never touched. With it,
    /// a file whose content already matches is left alone and any other
    /// content is replaced.
    pub fn emit(
        &self,
        definition: &ObjectDefinition,
        output_dir: &Path,
        subdirectory: &str,
        force_overwrite: bool,
    ) -> Result<EmittedFile> {
        let relative = self.relative_path(definition, subdirectory);
        let path = output_dir.join(&relative);
        let content = self.renderer.render(definition);
        let digest = checksum(content.as_bytes());

        self.hooks.fire_before(&ScaffoldEvent {
            definition,
            path: &relative,
            outcome: None,
        });

        let outcome = if path.exists() {
            if !force_overwrite {
                warn!("Skipping existing file: {}", path.display());
                EmitOutcome::Skipped
            } else {
                let existing = fs::read(&path).map_err(|e| ScaffoldError::FileWriteError {
                    path: path.clone(),
                    source: e,
                })?;
                if checksum(&existing) == digest {
                    info!("Unchanged: {}", path.display());
                    EmitOutcome::Unchanged
                } else {
                    write_file(&path, &content)?;
                    info!("Replaced: {}", path.display());
                    EmitOutcome::Written
                }
            }
        } else {
            write_file(&path, &content)?;
            info!("Created: {}", path.display());
            EmitOutcome::Written
        };

        self.hooks.fire_after(&ScaffoldEvent {
            definition,
            path: &relative,
            outcome: Some(outcome),
        });

        Ok(EmittedFile {
            path: relative,
            outcome,
            checksum: digest,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ScaffoldError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, content).map_err(|e| ScaffoldError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

pub(crate) fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode_upper(hasher.finalize())
}
