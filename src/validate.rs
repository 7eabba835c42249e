//! Validation of generated replacement text.
//!
//! # Hard Rules (Never Violate)
//!
//! 1. **Parse validation**: generated text must re-parse as a standalone unit
//!    with no ERROR nodes before it may touch the tree.
//! 2. **Single slot**: the replacement must contain exactly one top-level
//!    statement. A multi-statement response cannot occupy one sequence slot
//!    and is rejected rather than silently truncated.
//! 3. **Shape match**: the replacement must be the same kind of definition
//!    (class vs function) as the entity it replaces.

use crate::lang::{DefKind, Language};
use crate::syntax::{NodeKind, ParseError, SyntaxTree};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("replacement is empty")]
    Empty,

    #[error("replacement is not syntactically valid: {0}")]
    NotParseable(#[from] ParseError),

    #[error("replacement parsed into {count} top-level statements, expected exactly 1")]
    MultipleStatements { count: usize },

    #[error("replacement parsed as {found:?}, expected a {expected} definition")]
    KindMismatch { expected: DefKind, found: NodeKind },
}

/// Validate generated text as a drop-in replacement for one entity.
///
/// On success returns the parsed standalone tree, so callers can inspect the
/// unit without paying for a second parse.
pub fn validate_replacement(
    language: Language,
    text: &str,
    expected: DefKind,
) -> Result<SyntaxTree, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    let tree = SyntaxTree::parse(language, text)?;

    let body = tree.body();
    if body.len() != 1 {
        return Err(ValidationError::MultipleStatements { count: body.len() });
    }

    let found = tree.node_kind(body[0]);
    if found != NodeKind::from(expected) {
        return Err(ValidationError::KindMismatch { expected, found });
    }

    Ok(tree)
}
