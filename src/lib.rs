//! Docsplice: automated docstring injection for Python and Java sources
//!
//! A documentation generator built on statement-level syntax-tree splicing with
//! tree-sitter parsing and an LLM-backed text generation client.
//!
//! # Architecture
//!
//! A source unit is parsed once into a [`SyntaxTree`]: an arena of
//! statement-level nodes with an explicit, recomputed parent map. The
//! [`select_entities`] pass yields the documentable entities (classes at any
//! depth, top-level functions) in source order. For each entity the
//! [`SpliceEngine`] asks a [`DocGenerator`] for a documented rewrite, validates
//! the response by re-parsing it as a standalone unit, and splices the verified
//! text into the entity's slot. Everything that was not spliced is rendered
//! back byte-for-byte.
//!
//! # Safety
//!
//! - Replacements are re-parsed and shape-checked before they touch the tree
//! - A rewritten unit is re-parsed once more before it is persisted
//! - Atomic file writes (tempfile + fsync + rename)
//! - Malformed generator output is retried a bounded number of times
//!
//! # Example
//!
//! ```no_run
//! use docsplice::{document_file, Language, OpenAiClient, RunConfig};
//! use std::path::Path;
//!
//! let config = RunConfig::new(Language::Python, std::env::var("OPENAI_API_KEY").unwrap());
//! let client = OpenAiClient::new(&config).unwrap();
//!
//! match document_file(Path::new("app/models.py"), &config, &client) {
//!     Ok(outcome) => println!("documented {} entities", outcome.spliced),
//!     Err(e) => eprintln!("failed: {}", e),
//! }
//! ```

pub mod config;
pub mod doxygen;
pub mod engine;
pub mod lang;
pub mod llm;
pub mod pipeline;
pub mod pool;
pub mod syntax;
pub mod validate;

// Re-exports
pub use config::RunConfig;
pub use engine::{SpliceEngine, SpliceError, SpliceOutcome};
pub use lang::{DefKind, Language};
pub use llm::{DocGenerator, GenerationError, OpenAiClient};
pub use pipeline::{document_dir, document_file, FileOutcome, PipelineError, RunSummary};
pub use syntax::{
    select_entities, Entity, ErrorLocation, NodeId, NodeKind, ParseError, SourceParser, SyntaxTree,
};
pub use validate::{validate_replacement, ValidationError};
