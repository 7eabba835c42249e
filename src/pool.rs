//! Thread-local parser pooling.
//!
//! Every retry attempt re-parses generated text, and a directory run parses
//! one tree per file plus one per replacement. Parsers are reused per thread
//! and per language instead of being rebuilt for each parse.

use crate::lang::Language;
use crate::syntax::{ParseError, SourceParser};
use std::cell::RefCell;

thread_local! {
    static PARSERS: RefCell<Vec<SourceParser>> = const { RefCell::new(Vec::new()) };
}

/// Execute a function with a pooled parser for `language`.
///
/// On first use per thread and language, creates a new parser. Subsequent
/// calls reuse the same instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use docsplice::{pool::with_parser, Language};
///
/// let tree = with_parser(Language::Python, |parser| parser.parse("x = 1\n"))??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(language: Language, f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    PARSERS.with(|cell| {
        let mut pool = cell.borrow_mut();
        let idx = match pool.iter().position(|p| p.language() == language) {
            Some(idx) => idx,
            None => {
                pool.push(SourceParser::new(language)?);
                pool.len() - 1
            }
        };
        Ok(f(&mut pool[idx]))
    })
}
