//! End-to-end pipeline tests against stub generators.
//!
//! Covers the full flow for one unit: parse, select, splice every entity,
//! render, overwrite — with generators that echo, document, or misbehave.

use docsplice::{
    document_dir, document_file, select_entities, DefKind, DocGenerator, GenerationError,
    Language, RunConfig, SyntaxTree,
};
use std::fs;
use tempfile::TempDir;

struct EchoGenerator;

impl DocGenerator for EchoGenerator {
    fn generate_docs(&self, code: &str) -> Result<String, GenerationError> {
        Ok(code.to_string())
    }
}

fn test_config() -> RunConfig {
    RunConfig::new(Language::Python, "test-key")
}

const SCENARIO: &str = "def foo():\n    pass\n\nclass Bar:\n    def baz(self):\n        pass\n";

#[test]
fn scenario_selects_foo_and_bar_but_not_baz() {
    let tree = SyntaxTree::parse(Language::Python, SCENARIO).unwrap();
    let entities = select_entities(&tree);

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].kind, DefKind::Function);
    assert_eq!(entities[0].name.as_deref(), Some("foo"));
    assert_eq!(entities[1].kind, DefKind::Class);
    assert_eq!(entities[1].name.as_deref(), Some("Bar"));
}

#[test]
fn scenario_echo_round_trip_preserves_both_statements() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("scenario.py");
    fs::write(&file, SCENARIO).unwrap();

    let outcome = document_file(&file, &test_config(), &EchoGenerator).unwrap();
    assert_eq!(outcome.selected, 2);
    assert_eq!(outcome.spliced, 2);

    let rewritten = fs::read_to_string(&file).unwrap();
    let tree = SyntaxTree::parse(Language::Python, rewritten).unwrap();
    let entities = select_entities(&tree);
    let names: Vec<_> = entities.iter().map(|e| e.name.clone().unwrap()).collect();
    assert_eq!(names, vec!["foo", "Bar"]);
}

#[test]
fn order_preservation_with_interleaved_statements() {
    struct DocAdder;
    impl DocGenerator for DocAdder {
        fn generate_docs(&self, code: &str) -> Result<String, GenerationError> {
            let (header, rest) = code.split_once('\n').unwrap();
            Ok(format!("{header}\n    \"\"\"Generated.\"\"\"\n{rest}"))
        }
    }

    let source = "\
import os

X = 1

def first():
    pass

# a comment between entities

class Second:
    pass

Y = 2

def third():
    pass
";
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("module.py");
    fs::write(&file, source).unwrap();

    let before = SyntaxTree::parse(Language::Python, source).unwrap();
    let outcome = document_file(&file, &test_config(), &DocAdder).unwrap();
    assert_eq!(outcome.spliced, 3);

    let rewritten = fs::read_to_string(&file).unwrap();
    let after = SyntaxTree::parse(Language::Python, rewritten.as_str()).unwrap();

    // same number of top-level slots, docs added, non-entities untouched
    assert_eq!(after.statement_count(), before.statement_count());
    assert!(rewritten.contains("import os\n"));
    assert!(rewritten.contains("X = 1\n"));
    assert!(rewritten.contains("# a comment between entities\n"));
    assert!(rewritten.contains("Y = 2\n"));
    assert_eq!(rewritten.matches("\"\"\"Generated.\"\"\"").count(), 3);

    // entity order unchanged
    let names: Vec<_> = select_entities(&after)
        .into_iter()
        .map(|e| e.name.unwrap())
        .collect();
    assert_eq!(names, vec!["first", "Second", "third"]);
}

#[test]
fn idempotent_reparse_of_rendered_tree() {
    let mut tree = SyntaxTree::parse(Language::Python, SCENARIO).unwrap();
    let entities = select_entities(&tree);
    for entity in &entities {
        let text = tree.node_text(entity.node);
        tree.splice(entity.node, &text);
    }

    let rendered = tree.render();
    let reparsed = SyntaxTree::parse(Language::Python, rendered).unwrap();
    assert_eq!(reparsed.statement_count(), tree.statement_count());
}

#[test]
fn rate_limited_unit_fails_without_touching_the_file() {
    struct AlwaysRateLimited;
    impl DocGenerator for AlwaysRateLimited {
        fn generate_docs(&self, _code: &str) -> Result<String, GenerationError> {
            Err(GenerationError::RateLimited)
        }
    }

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("unit.py");
    fs::write(&file, SCENARIO).unwrap();

    let mut config = test_config();
    config.rate_limit_cooldown = std::time::Duration::from_millis(1);
    let result = document_file(&file, &config, &AlwaysRateLimited);
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&file).unwrap(), SCENARIO);
}

#[test]
fn directory_run_documents_nested_files_and_honors_ignores() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("pkg/sub")).unwrap();
    fs::create_dir_all(dir.path().join("venv")).unwrap();
    fs::write(dir.path().join("pkg/a.py"), "def a():\n    pass\n").unwrap();
    fs::write(dir.path().join("pkg/sub/b.py"), "class B:\n    pass\n").unwrap();
    fs::write(dir.path().join("venv/skip.py"), "def skip():\n    pass\n").unwrap();

    let summary = document_dir(dir.path(), &test_config(), &EchoGenerator).unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.spliced, 2);
    assert_eq!(summary.failed, 0);
}
