//! Target language support via ast-grep-language.
//!
//! We use the built-in `SupportLang` grammars from ast-grep-language instead of
//! depending on individual tree-sitter grammar crates. The [`Language`] enum
//! carries everything that differs between targets: file extension, the CST
//! node kinds that count as documentable definitions, and the docstring
//! conventions the generation prompt asks for.

use std::fmt;
use std::str::FromStr;

pub use ast_grep_language::SupportLang;

/// A source language the pipeline can document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Java,
}

/// Structural role of a documentable definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Class,
    Function,
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefKind::Class => write!(f, "class"),
            DefKind::Function => write!(f, "function"),
        }
    }
}

impl Language {
    /// The ast-grep language for this target.
    pub fn support_lang(&self) -> SupportLang {
        match self {
            Language::Python => SupportLang::Python,
            Language::Java => SupportLang::Java,
        }
    }

    /// File extension (without dot) used by directory traversal.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::Java => "java",
        }
    }

    /// Documentation convention named in the generation prompt.
    pub fn doc_style(&self) -> &'static str {
        match self {
            Language::Python => "docstrings complying with the PEP 257 standard",
            Language::Java => "Javadoc comments",
        }
    }

    /// Classify a CST node as a documentable definition.
    ///
    /// Returns the definition kind together with the node carrying the `name`
    /// field and the definition body. For Python decorated definitions that is
    /// the inner `function_definition`/`class_definition`; the caller should
    /// still take the span from the outer node so decorators travel with the
    /// entity.
    pub fn classify<'t>(
        &self,
        node: tree_sitter::Node<'t>,
    ) -> Option<(DefKind, tree_sitter::Node<'t>)> {
        match (self, node.kind()) {
            (Language::Python, "class_definition") => Some((DefKind::Class, node)),
            (Language::Python, "function_definition") => Some((DefKind::Function, node)),
            (Language::Python, "decorated_definition") => {
                let inner = node.child_by_field_name("definition")?;
                self.classify(inner).map(|(kind, _)| (kind, inner))
            }
            (
                Language::Java,
                "class_declaration" | "interface_declaration" | "enum_declaration"
                | "record_declaration",
            ) => Some((DefKind::Class, node)),
            (Language::Java, "method_declaration" | "constructor_declaration") => {
                Some((DefKind::Function, node))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            other => Err(format!(
                "unsupported language '{other}' (expected 'python' or 'java')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool;

    #[test]
    fn language_round_trip() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("Java".parse::<Language>(), Ok(Language::Java));
        assert!("cobol".parse::<Language>().is_err());
        assert_eq!(Language::Python.to_string(), "python");
    }

    #[test]
    fn extensions() {
        assert_eq!(Language::Python.extension(), "py");
        assert_eq!(Language::Java.extension(), "java");
    }

    #[test]
    fn classify_python_definitions() {
        let source = "def foo():\n    pass\n\nclass Bar:\n    pass\n\nx = 1\n";
        let tree = pool::with_parser(Language::Python, |p| p.parse(source))
            .unwrap()
            .unwrap();
        let root = tree.root_node();
        let mut cursor = root.walk();
        let kinds: Vec<_> = root
            .named_children(&mut cursor)
            .map(|child| Language::Python.classify(child).map(|(k, _)| k))
            .collect();
        assert_eq!(
            kinds,
            vec![Some(DefKind::Function), Some(DefKind::Class), None]
        );
    }

    #[test]
    fn classify_python_decorated_definition() {
        let source = "@app.route('/')\ndef index():\n    pass\n";
        let tree = pool::with_parser(Language::Python, |p| p.parse(source))
            .unwrap()
            .unwrap();
        let root = tree.root_node();
        let decorated = root.named_child(0).unwrap();
        assert_eq!(decorated.kind(), "decorated_definition");

        let (kind, inner) = Language::Python.classify(decorated).unwrap();
        assert_eq!(kind, DefKind::Function);
        assert_eq!(inner.kind(), "function_definition");
    }

    #[test]
    fn classify_java_definitions() {
        let source = "class Greeter {\n    void hello() {}\n}\n";
        let tree = pool::with_parser(Language::Java, |p| p.parse(source))
            .unwrap()
            .unwrap();
        let root = tree.root_node();
        let class = root.named_child(0).unwrap();
        assert_eq!(
            Language::Java.classify(class).map(|(k, _)| k),
            Some(DefKind::Class)
        );
    }
}
