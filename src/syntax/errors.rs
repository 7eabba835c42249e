use crate::lang::Language;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to set {language} grammar on parser")]
    LanguageSet { language: Language },

    #[error("tree-sitter failed to parse source")]
    ParseFailed,

    #[error("source has {} syntax error(s), first at {}", .errors.len(), .errors[0])]
    Syntax { errors: Vec<ErrorLocation> },
}

/// Location of an ERROR or MISSING node in the source.
#[derive(Debug, Clone)]
pub struct ErrorLocation {
    pub byte_start: usize,
    pub byte_end: usize,
    pub line: usize,
    pub column: usize,
    pub context: String,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {} ({})", self.line, self.column, self.context)
    }
}
