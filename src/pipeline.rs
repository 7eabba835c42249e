//! Per-unit pipeline and directory traversal.
//!
//! One source unit flows through parse → select → splice-per-entity →
//! render → atomic overwrite. A unit that fails at any point is left
//! untouched on disk; a directory run reports the failure and moves on to
//! the next file.

use crate::config::RunConfig;
use crate::engine::{SpliceEngine, SpliceError, SpliceOutcome};
use crate::llm::DocGenerator;
use crate::syntax::{select_entities, ParseError, SyntaxTree};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("splicing failed in {path}: {source}")]
    Splice {
        path: PathBuf,
        #[source]
        source: SpliceError,
    },

    /// The stitched output no longer parses. The original file is left
    /// untouched when this happens.
    #[error("rendered output for {path} is not syntactically valid: {source}")]
    RenderInvalid {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of documenting one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "FileOutcome should be checked for how many entities were spliced"]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Entities selected for documentation.
    pub selected: usize,
    /// Entities whose slot was replaced.
    pub spliced: usize,
    /// Entities skipped because an enclosing entity was already rewritten.
    pub superseded: usize,
}

/// Aggregate counts for a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub selected: usize,
    pub spliced: usize,
    pub failed: usize,
}

/// Document a single source unit in place.
///
/// The file is read once, every selected entity is processed to completion in
/// source order, and the rendered unit overwrites the original atomically.
/// Nothing is written unless every entity succeeded and the rendered text
/// passes a final re-parse.
pub fn document_file<G: DocGenerator>(
    path: &Path,
    config: &RunConfig,
    generator: &G,
) -> Result<FileOutcome, PipelineError> {
    let original = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tree =
        SyntaxTree::parse(config.language, original.as_str()).map_err(|source| {
            PipelineError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let entities = select_entities(&tree);
    let mut outcome = FileOutcome {
        path: path.to_path_buf(),
        selected: entities.len(),
        spliced: 0,
        superseded: 0,
    };

    if entities.is_empty() {
        return Ok(outcome);
    }

    let engine = SpliceEngine::new(generator, config);
    for entity in &entities {
        match engine
            .splice_entity(&mut tree, entity)
            .map_err(|source| PipelineError::Splice {
                path: path.to_path_buf(),
                source,
            })? {
            SpliceOutcome::Spliced { .. } => outcome.spliced += 1,
            SpliceOutcome::Superseded => outcome.superseded += 1,
        }
    }

    let rendered = tree.render();

    // Final gate: never persist a unit that no longer parses.
    SyntaxTree::parse(config.language, rendered.as_str()).map_err(|source| {
        PipelineError::RenderInvalid {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if config.show_diff && rendered != original {
        display_diff(path, &original, &rendered);
    }

    if rendered != original {
        atomic_write(path, rendered.as_bytes()).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(outcome)
}

/// Recursively document every matching file under `root`.
///
/// Directories whose base name is in the ignore set are skipped entirely;
/// files are filtered by the language's extension. A failed unit is reported
/// and counted, then traversal continues with the next file.
pub fn document_dir<G: DocGenerator>(
    root: &Path,
    config: &RunConfig,
    generator: &G,
) -> Result<RunSummary, PipelineError> {
    let mut summary = RunSummary::default();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_ignored_directory(entry, &config.ignored_dirs));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_language = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == config.language.extension());
        if !matches_language {
            continue;
        }

        println!("{}", entry.path().display());
        match document_file(entry.path(), config, generator) {
            Ok(outcome) => {
                summary.files += 1;
                summary.selected += outcome.selected;
                summary.spliced += outcome.spliced;
            }
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn is_ignored_directory(entry: &walkdir::DirEntry, ignored: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| ignored.iter().any(|d| d == name))
}

/// Show a unified diff between the original and rewritten unit.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!(
        "{}",
        format!("+++ {} (documented)", file.display()).dimmed()
    );

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is unchanged.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    // Create tempfile in the same directory to stay on one filesystem
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Language;
    use crate::llm::GenerationError;

    /// Echoes the entity text back unchanged.
    struct EchoGenerator;

    impl DocGenerator for EchoGenerator {
        fn generate_docs(&self, code: &str) -> Result<String, GenerationError> {
            Ok(code.to_string())
        }
    }

    fn test_config() -> RunConfig {
        RunConfig::new(Language::Python, "test-key")
    }

    #[test]
    fn echo_run_leaves_unit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.py");
        let source = "def foo():\n    pass\n\nclass Bar:\n    def baz(self):\n        pass\n";
        fs::write(&file, source).unwrap();

        let outcome = document_file(&file, &test_config(), &EchoGenerator).unwrap();
        assert_eq!(outcome.selected, 2);
        assert_eq!(outcome.spliced, 2);
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn documenting_generator_rewrites_in_place() {
        struct DocAdder;
        impl DocGenerator for DocAdder {
            fn generate_docs(&self, code: &str) -> Result<String, GenerationError> {
                let (header, rest) = code.split_once('\n').unwrap();
                Ok(format!("{header}\n    \"\"\"Generated.\"\"\"\n{rest}"))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.py");
        fs::write(&file, "x = 1\n\ndef foo():\n    pass\n").unwrap();

        let outcome = document_file(&file, &test_config(), &DocAdder).unwrap();
        assert_eq!(outcome.spliced, 1);

        let rewritten = fs::read_to_string(&file).unwrap();
        assert!(rewritten.starts_with("x = 1\n"));
        assert!(rewritten.contains("\"\"\"Generated.\"\"\""));

        let reparsed = SyntaxTree::parse(Language::Python, rewritten).unwrap();
        assert_eq!(reparsed.statement_count(), 2);
    }

    #[test]
    fn unparseable_unit_is_fatal_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.py");
        let source = "def broken(:\n    pass\n";
        fs::write(&file, source).unwrap();

        let result = document_file(&file, &test_config(), &EchoGenerator);
        assert!(matches!(result, Err(PipelineError::Parse { .. })));
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn failed_entity_aborts_unit_without_partial_write() {
        struct AlwaysMalformed;
        impl DocGenerator for AlwaysMalformed {
            fn generate_docs(&self, _code: &str) -> Result<String, GenerationError> {
                Ok("not ( python".to_string())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.py");
        let source = "def foo():\n    pass\n";
        fs::write(&file, source).unwrap();

        let mut config = test_config();
        config.max_attempts = 2;
        let result = document_file(&file, &config, &AlwaysMalformed);
        assert!(matches!(result, Err(PipelineError::Splice { .. })));
        assert_eq!(fs::read_to_string(&file).unwrap(), source);
    }

    #[test]
    fn file_without_entities_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.py");
        fs::write(&file, "X = 1\nY = 2\n").unwrap();

        let outcome = document_file(&file, &test_config(), &EchoGenerator).unwrap();
        assert_eq!(outcome.selected, 0);
        assert_eq!(outcome.spliced, 0);
    }

    #[test]
    fn directory_walk_skips_ignored_dirs_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("__pycache__")).unwrap();
        fs::write(
            dir.path().join("__pycache__/cached.py"),
            "def hidden():\n    pass\n",
        )
        .unwrap();
        fs::write(dir.path().join("main.py"), "def foo():\n    pass\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not code").unwrap();

        let summary = document_dir(dir.path(), &test_config(), &EchoGenerator).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.failed, 0);

        // the ignored file was never touched or parsed
        assert_eq!(
            fs::read_to_string(dir.path().join("__pycache__/cached.py")).unwrap(),
            "def hidden():\n    pass\n"
        );
    }

    #[test]
    fn directory_walk_continues_past_failed_units() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_broken.py"), "def broken(:\n").unwrap();
        fs::write(dir.path().join("b_fine.py"), "def foo():\n    pass\n").unwrap();

        let summary = document_dir(dir.path(), &test_config(), &EchoGenerator).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.spliced, 1);
    }
}
