//! Per-entity splice state machine.
//!
//! For each selected entity: request a documented rewrite, validate it by
//! re-parsing, and install it into the entity's slot. Malformed output is
//! retried a bounded number of times; a rate-limited request is retried
//! exactly once after a fixed cooldown.

use crate::config::RunConfig;
use crate::llm::{DocGenerator, GenerationError};
use crate::syntax::{Entity, SyntaxTree};
use crate::validate::validate_replacement;
use colored::Colorize;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Result of processing one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "SpliceOutcome should be checked for spliced/superseded"]
pub enum SpliceOutcome {
    /// The entity's slot was replaced with validated documented text.
    Spliced { attempts: usize },
    /// An enclosing entity was already replaced; this one is covered by its
    /// ancestor's regenerated text and was skipped.
    Superseded,
}

#[derive(Error, Debug)]
pub enum SpliceError {
    /// Two consecutive rate-limit responses for the same request. There is no
    /// way to resume partway through a module body, so this aborts the unit.
    #[error("rate limit hit twice in a row while documenting {entity}")]
    RateLimitExceeded { entity: String },

    /// The generator kept returning malformed output until the attempt
    /// ceiling was reached.
    #[error("generator returned malformed code for {entity} on all {attempts} attempts")]
    RetriesExhausted { entity: String, attempts: usize },

    /// Any other generation failure; not retried.
    #[error("generation request failed: {0}")]
    Generation(GenerationError),
}

/// Runs the request → validate → splice loop for entities of one unit.
pub struct SpliceEngine<'a, G: DocGenerator> {
    generator: &'a G,
    max_attempts: usize,
    cooldown: Duration,
}

impl<'a, G: DocGenerator> SpliceEngine<'a, G> {
    pub fn new(generator: &'a G, config: &RunConfig) -> Self {
        Self {
            generator,
            max_attempts: config.max_attempts.max(1),
            cooldown: config.rate_limit_cooldown,
        }
    }

    /// Process one entity to completion.
    ///
    /// The entity's current text is captured once; every retry resubmits the
    /// same original text. On success the validated replacement occupies
    /// exactly the entity's slot and all sibling statements keep their
    /// position and identity.
    pub fn splice_entity(
        &self,
        tree: &mut SyntaxTree,
        entity: &Entity,
    ) -> Result<SpliceOutcome, SpliceError> {
        if tree.ancestor_replaced(entity.node) {
            println!(
                "  {}",
                format!("{} already covered by an enclosing rewrite", entity.label()).dimmed()
            );
            return Ok(SpliceOutcome::Superseded);
        }

        let code = tree.node_text(entity.node);
        let label = entity.label();

        for attempt in 1..=self.max_attempts {
            println!(
                "  documenting {} (attempt {}/{})",
                label, attempt, self.max_attempts
            );

            let generated = self.request_with_cooldown(&code, &label)?;

            match validate_replacement(tree.language(), &generated, entity.kind) {
                Ok(_) => {
                    tree.splice(entity.node, &generated);
                    println!("  {} {} documented", "✓".green(), label);
                    return Ok(SpliceOutcome::Spliced { attempts: attempt });
                }
                Err(e) => {
                    eprintln!(
                        "  {} {} returned malformed output: {}",
                        "⊙".yellow(),
                        label,
                        e
                    );
                }
            }
        }

        Err(SpliceError::RetriesExhausted {
            entity: label,
            attempts: self.max_attempts,
        })
    }

    /// Submit one generation request, absorbing a single rate limit with a
    /// fixed blocking cooldown. A second consecutive rate limit is fatal; no
    /// third call is made.
    fn request_with_cooldown(&self, code: &str, label: &str) -> Result<String, SpliceError> {
        match self.generator.generate_docs(code) {
            Err(GenerationError::RateLimited) => {
                eprintln!(
                    "  {}",
                    format!(
                        "rate limit exceeded; waiting {}s before retrying",
                        self.cooldown.as_secs()
                    )
                    .yellow()
                );
                thread::sleep(self.cooldown);

                match self.generator.generate_docs(code) {
                    Err(GenerationError::RateLimited) => Err(SpliceError::RateLimitExceeded {
                        entity: label.to_string(),
                    }),
                    Err(other) => Err(SpliceError::Generation(other)),
                    Ok(text) => Ok(text),
                }
            }
            Err(other) => Err(SpliceError::Generation(other)),
            Ok(text) => Ok(text),
        }
    }
}
