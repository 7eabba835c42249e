//! Prompt construction for documentation requests.

use crate::lang::Language;

/// Build the single instruction payload for one entity.
///
/// The directives mirror what the splice engine later enforces: the code must
/// come back unmodified with documentation added, and the response must be
/// code, because it is re-parsed as a standalone unit.
pub fn documentation_request(language: Language, code: &str) -> String {
    format!(
        "Your task is to write documentation for the given code block. \
         Add {style} describing what the function, class, or module does, \
         the parameters it accepts, what it returns, and which exceptions may \
         occur during execution. The code itself must not be modified; only \
         documentation may be added. For the following {language} code:\n\n\
         {code}\n\n\
         You must return the result as code. DO NOT delete a single line of code.",
        style = language.doc_style(),
        language = display_name(language),
    )
}

fn display_name(language: Language) -> &'static str {
    match language {
        Language::Python => "Python",
        Language::Java => "Java",
    }
}
