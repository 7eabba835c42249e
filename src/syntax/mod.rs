//! Syntax-tree construction, entity selection, and rendering.
//!
//! The tree produced here is deliberately shallow: an arena of statement-level
//! nodes (module, class, function, other) over the original source text.
//! Classification queries run against an explicit parent map that is
//! recomputed at the end of every full parse; rendering stitches untouched
//! bytes back verbatim around spliced slots.

pub mod errors;
pub mod parser;
pub mod select;
pub mod tree;

pub use errors::{ErrorLocation, ParseError};
pub use parser::{collect_syntax_errors, SourceParser};
pub use select::{select_entities, Entity};
pub use tree::{NodeId, NodeKind, SyntaxTree};
