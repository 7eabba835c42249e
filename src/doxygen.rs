//! Doxygen configuration emitter and runner.
//!
//! Writes a Doxyfile for the documented path and shells out to the `doxygen`
//! executable. This is a thin wrapper around an external tool; the splicing
//! core never depends on it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoxygenError {
    #[error("I/O error writing Doxygen configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch doxygen (is it installed?): {0}")]
    Launch(std::io::Error),

    #[error("doxygen exited with status {status}")]
    CommandFailed { status: std::process::ExitStatus },
}

/// Emits a Doxyfile and runs `doxygen` over a documented path.
pub struct DoxygenRunner {
    project_name: String,
    output_root: PathBuf,
}

impl DoxygenRunner {
    pub fn new(project_name: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            output_root: output_root.into(),
        }
    }

    /// The Doxyfile body for `input`, excluding the given directories.
    pub fn doxyfile_contents(&self, input: &Path, excluded_dirs: &[String]) -> String {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("docs");
        let html_dir = self.output_root.join(stem).join("html");
        let latex_dir = self.output_root.join(stem).join("latex");

        let mut contents = String::new();
        contents.push_str(&format!("PROJECT_NAME = \"{}\"\n", self.project_name));
        contents.push_str(&format!("INPUT = {}\n", input.display()));
        contents.push_str("RECURSIVE = YES\n");
        contents.push_str("GENERATE_HTML = YES\n");
        contents.push_str("GENERATE_LATEX = YES\n");
        contents.push_str(&format!("EXCLUDE = {}\n", excluded_dirs.join(" \\\n          ")));
        contents.push_str(&format!("HTML_OUTPUT = {}\n", html_dir.display()));
        contents.push_str(&format!("LATEX_OUTPUT = {}\n", latex_dir.display()));
        contents.push_str("EXTRACT_ALL = YES\n");
        contents.push_str("FILTER_PATTERNS = *.py=doxypypy\n");
        contents
    }

    /// Write the Doxyfile next to the output root and invoke `doxygen` on it.
    pub fn generate(&self, input: &Path, excluded_dirs: &[String]) -> Result<(), DoxygenError> {
        fs::create_dir_all(&self.output_root)?;
        let doxyfile = self.output_root.join("Doxyfile");
        fs::write(&doxyfile, self.doxyfile_contents(input, excluded_dirs))?;

        let status = Command::new("doxygen")
            .arg(&doxyfile)
            .status()
            .map_err(DoxygenError::Launch)?;

        if !status.success() {
            return Err(DoxygenError::CommandFailed { status });
        }
        Ok(())
    }
}
