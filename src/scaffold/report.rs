//! Summary of a scaffolding run

use std::fmt;
use std::path::PathBuf;

use crate::render::{EmitOutcome, EmittedFile};

/// Every file a run considered, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub output_directory: PathBuf,
    pub files: Vec<EmittedFile>,
}

impl ScaffoldReport {
    pub fn new(output_directory: PathBuf) -> Self {
        Self {
            output_directory,
            files: Vec::new(),
        }
    }

    pub fn written(&self) -> impl Iterator<Item = &EmittedFile> {
        self.with_outcome(EmitOutcome::Written)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &EmittedFile> {
        self.with_outcome(EmitOutcome::Unchanged)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &EmittedFile> {
        self.with_outcome(EmitOutcome::Skipped)
    }

    fn with_outcome(&self, outcome: EmitOutcome) -> impl Iterator<Item = &EmittedFile> {
        self.files.iter().filter(move |f| f.outcome == outcome)
    }
}

impl fmt::Display for ScaffoldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Output: {}", self.output_directory.display())?;
        for file in &self.files {
            let marker = match file.outcome {
                EmitOutcome::Written => "+",
                EmitOutcome::Unchanged => "=",
                EmitOutcome::Skipped => "-",
            };
            writeln!(f, "  {} {}", marker, file.path.display())?;
        }
        write!(
            f,
            "{} written, {} unchanged, {} skipped",
            self.written().count(),
            self.unchanged().count(),
            self.skipped().count()
        )
    }
}
