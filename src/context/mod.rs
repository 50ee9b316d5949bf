//! Source Context Mining
//!
//! Turns raw compiler output into a short, line-numbered excerpt of the file
//! the first error points at.
//!
//! ## Modules
//!
//! - `locator`: first `file:line:column:` match in diagnostic text
//! - `window`: bounded, streamed read of lines around a target

mod locator;
mod window;

pub use locator::{SourceLocation, locate};
pub use window::{SourceWindow, WindowLine, read_window, window_from_reader};

use tracing::debug;

use crate::constants::context::WINDOW_RADIUS;

/// Build the source context block for `diagnostic`
///
/// Returns an empty string when no location is found, and a bracketed
/// warning when the located file cannot be read. Never fails.
pub fn mine(diagnostic: &str) -> String {
    let Some(location) = locate(diagnostic) else {
        debug!("No source location in diagnostic output");
        return String::new();
    };

    debug!(file = %location.file, line = location.line, "Located first error");

    match read_window(&location.file, location.line, WINDOW_RADIUS) {
        Ok(window) => format!(
            "\n--- Source Context ({}) ---\n{}\n",
            location,
            window.render()
        ),
        Err(e) => {
            debug!(file = %location.file, error = %e, "Source file unreadable");
            format!(
                "[Context Miner Warning: Could not read file {}: {}]",
                location.file, e
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::context::MAX_LINE_BYTES;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, lines: usize) -> String {
        let path = dir.path().join(name);
        let body: String = (1..=lines).map(|n| format!("int x{} = {};\n", n, n)).collect();
        fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_no_location_yields_empty() {
        assert_eq!(mine(""), "");
        assert_eq!(mine("make: *** [all] Error 1\n"), "");
    }

    #[test]
    fn test_mine_formats_header_and_window() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "main.c", 20);
        let diagnostic = format!("{}:10:5: error: expected ';'\n", path);

        let block = mine(&diagnostic);

        assert!(block.starts_with(&format!("\n--- Source Context ({}:10) ---\n", path)));
        assert!(block.contains("-> 10 | int x10 = 10;\n"));
        assert!(block.contains("   5 | int x5 = 5;\n"));
        assert!(block.contains("   15 | int x15 = 15;\n"));
        assert!(!block.contains("| int x16"));
        assert!(!block.contains("| int x4 "));
        assert!(block.ends_with("\n\n"));
    }

    #[test]
    fn test_unreadable_file_yields_warning() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.c");
        let diagnostic = format!("{}:3:1: error: boom", missing.display());

        let block = mine(&diagnostic);

        assert!(block.starts_with("[Context Miner Warning: Could not read file "));
        assert!(block.contains("gone.c"));
        assert!(block.ends_with(']'));
    }

    #[test]
    fn test_minified_file_yields_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.min.js");
        let line = "a;".repeat(MAX_LINE_BYTES);
        fs::write(&path, format!("{}\nnext\n", line)).unwrap();
        let diagnostic = format!("{}:2:1: error: unexpected token", path.display());

        let block = mine(&diagnostic);

        assert!(block.starts_with("[Context Miner Warning: Could not read file "));
        assert!(block.contains("exceeds"));
    }

    #[test]
    fn test_mine_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_source(&dir, "lib.c", 8);
        let diagnostic = format!("{}:7:1: error: a\n{}:2:1: error: b\n", path, path);

        let first = mine(&diagnostic);
        let second = mine(&diagnostic);

        assert_eq!(first, second);
        assert!(first.contains("-> 7 |"));
        assert!(!first.contains("-> 2 |"));
    }
}
