use crate::lang::Language;
use crate::syntax::errors::{ErrorLocation, ParseError};
use ast_grep_language::LanguageExt;
use tree_sitter::{Parser, Tree};

/// Tree-sitter parser wrapper bound to one target language.
pub struct SourceParser {
    parser: Parser,
    language: Language,
}

impl SourceParser {
    /// Create a parser for the given language.
    pub fn new(language: Language) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = language.support_lang().get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet { language })?;

        Ok(Self { parser, language })
    }

    /// Get the configured language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Parse source code into a raw tree-sitter Tree.
    ///
    /// Tree-sitter always produces a tree for UTF-8 input; syntax errors show
    /// up as ERROR/MISSING nodes and are surfaced by
    /// [`collect_syntax_errors`], not here.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)
    }
}

/// Collect every ERROR and MISSING node under `node`, with enough surrounding
/// text to make the diagnostic readable.
pub fn collect_syntax_errors(node: tree_sitter::Node<'_>, source: &str) -> Vec<ErrorLocation> {
    let mut errors = Vec::new();
    collect_recursive(node, source, &mut errors);
    errors
}

fn collect_recursive(node: tree_sitter::Node<'_>, source: &str, errors: &mut Vec<ErrorLocation>) {
    if node.is_error() || node.is_missing() {
        let start = node.start_position();
        let byte_start = node.start_byte();
        let byte_end = node.end_byte();

        // Up to 20 chars of context on either side of the error span
        let context_start = byte_start.saturating_sub(20);
        let context_end = (byte_end + 20).min(source.len());
        let context = source
            .get(context_start..context_end)
            .unwrap_or("")
            .replace('\n', "\\n");

        errors.push(ErrorLocation {
            byte_start,
            byte_end,
            line: start.row + 1,
            column: start.column + 1,
            context,
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_recursive(child, source, errors);
    }
}
