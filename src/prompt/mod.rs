//! Prompt Assembly
//!
//! Builds the user prompt sent to every backend in the chain:
//!
//! 1. **Compiler output**: the captured diagnostic text, verbatim
//! 2. **Source context**: the mined window, when one was found
//! 3. **Extra context**: user-supplied files or notes, in the order given
//!
//! The system prompt comes from [`Mode`].

mod persona;

pub use persona::Mode;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Header of the user-supplied extra context section
pub const EXTRA_CONTEXT_HEADER: &str = "--- USER PROVIDED EXTRA CONTEXT ---";

/// A resolved `--extra-context` item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraContext {
    /// Existing regular file, inlined as content
    File { path: PathBuf, content: String },
    /// Anything else, inlined as-is
    Note(String),
}

impl ExtraContext {
    /// Classify an item as file content or a literal note
    ///
    /// File bytes that are not valid UTF-8 are decoded lossily. The stat and
    /// the read are not atomic; a file that disappears or turns unreadable in
    /// between simply becomes a note.
    pub fn resolve(item: &str) -> Self {
        let path = Path::new(item);
        let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);

        if is_file {
            match fs::read(path) {
                Ok(bytes) => {
                    return Self::File {
                        path: path.to_path_buf(),
                        content: String::from_utf8_lossy(&bytes).into_owned(),
                    };
                }
                Err(e) => debug!(item, error = %e, "Extra context file unreadable, using as note"),
            }
        }

        Self::Note(item.to_string())
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Self::File { path, content } => {
                out.push_str(&format!(
                    "\nFile: {}\n```\n{}\n```\n",
                    path.display(),
                    content
                ));
            }
            Self::Note(text) => {
                out.push_str(&format!("\nNote: {}\n", text));
            }
        }
    }
}

/// Prompt section types, rendered in insertion order
#[derive(Debug, Clone)]
enum PromptSection {
    Diagnostic(String),
    SourceContext(String),
    Extra(Vec<ExtraContext>),
}

/// Builder for the user prompt
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the captured compiler output
    pub fn diagnostic(mut self, text: &str) -> Self {
        self.sections
            .push(PromptSection::Diagnostic(text.to_string()));
        self
    }

    /// Add a mined context block; empty blocks are skipped
    pub fn source_context(mut self, block: &str) -> Self {
        if !block.is_empty() {
            self.sections
                .push(PromptSection::SourceContext(block.to_string()));
        }
        self
    }

    /// Add resolved extra context items; an empty list is skipped
    pub fn extra(mut self, items: Vec<ExtraContext>) -> Self {
        if !items.is_empty() {
            self.sections.push(PromptSection::Extra(items));
        }
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Diagnostic(text) => {
                    prompt.push_str("Compiler Output:\n");
                    prompt.push_str(&text);
                    prompt.push('\n');
                }
                PromptSection::SourceContext(block) => {
                    prompt.push_str("\nSource Code Context:\n");
                    prompt.push_str(&block);
                }
                PromptSection::Extra(items) => {
                    prompt.push_str("\n\n");
                    prompt.push_str(EXTRA_CONTEXT_HEADER);
                    prompt.push('\n');
                    for item in &items {
                        item.render_into(&mut prompt);
                    }
                }
            }
        }

        prompt
    }
}

/// Compose diagnostic text, context block, and extra items into the user prompt
pub fn assemble(diagnostic: &str, context_block: &str, extra_items: &[String]) -> String {
    let extras = extra_items
        .iter()
        .map(|item| ExtraContext::resolve(item))
        .collect();

    PromptBuilder::new()
        .diagnostic(diagnostic)
        .source_context(context_block)
        .extra(extras)
        .build()
}
