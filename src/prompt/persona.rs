//! System prompt personas selected with `--mode`

use serde::{Deserialize, Serialize};

/// Appended to every persona: ask for more context instead of guessing silently
const CONTEXT_PROTOCOL: &str = "
If, and only if, the provided context is insufficient to identify the root cause with high confidence:
1. Provide your best guess.
2. Explicitly list what extra information is missing (e.g., \"I need to see your go.mod\").
3. Advise the user to run this tool again using the '--extra-context' flag to provide that file or information.";

/// Explanation persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One or two sentence fix
    #[default]
    Direct,
    /// Root cause in technical detail
    Deep,
    /// Teach the concept behind the error
    Teacher,
}

impl Mode {
    pub fn system_prompt(&self) -> String {
        let persona = match self {
            Mode::Direct => {
                "You are a Build Tool. Fix this error in 1-2 sentences. No fluff. \
                 Use markdown code formatting for any code snippets. "
            }
            Mode::Deep => {
                "You are an expert in this area. Explain the root cause of this error in \
                 technical detail. Use markdown formatting with headers, bold text, code \
                 blocks, and lists. "
            }
            Mode::Teacher => {
                "You are a Mentor. Explain this error simply and teach the concept behind it. \
                 Use markdown formatting with headers, bold text, code blocks, and lists to \
                 make it easy to follow. "
            }
        };
        format!("{}{}", persona, CONTEXT_PROTOCOL)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Direct => write!(f, "direct"),
            Mode::Deep => write!(f, "deep"),
            Mode::Teacher => write!(f, "teacher"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Mode::Direct),
            "deep" => Ok(Mode::Deep),
            "teacher" => Ok(Mode::Teacher),
            _ => Err(format!(
                "Invalid mode '{}'. Valid values: direct, deep, teacher",
                s
            )),
        }
    }
}
