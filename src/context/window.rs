//! Source Window Extractor
//!
//! Reads a bounded slice of a source file around a target line. The file is
//! streamed and reading stops past the window, so very large files cost no
//! more than the lines before the target.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::constants::context::{CONTEXT_MARKER, MAX_LINE_BYTES, TARGET_MARKER};

/// One numbered source line inside a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLine {
    /// 1-based line number
    pub number: usize,
    pub text: String,
    pub is_target: bool,
}

impl fmt::Display for WindowLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_target {
            TARGET_MARKER
        } else {
            CONTEXT_MARKER
        };
        write!(f, "{}{} | {}", marker, self.number, self.text)
    }
}

/// Lines surrounding a target line, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceWindow {
    pub lines: Vec<WindowLine>,
}

impl SourceWindow {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The marked line, if the target fell inside the file
    pub fn target(&self) -> Option<&WindowLine> {
        self.lines.iter().find(|line| line.is_target)
    }

    /// Render as `<marker><n> | <text>` records, one per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}

/// Read lines `[target - radius, target + radius]` from `path`
///
/// A target past end-of-file yields whatever part of the window exists.
pub fn read_window(path: impl AsRef<Path>, target: usize, radius: usize) -> io::Result<SourceWindow> {
    let file = File::open(path.as_ref())?;
    window_from_reader(BufReader::new(file), target, radius)
}

/// Same as [`read_window`] over any buffered reader
///
/// Every line up to the window end is read with a [`MAX_LINE_BYTES`] cap. A
/// longer line (minified bundles, device files without newlines) fails with
/// `InvalidData` instead of being buffered whole.
pub fn window_from_reader<R: BufRead>(
    mut reader: R,
    target: usize,
    radius: usize,
) -> io::Result<SourceWindow> {
    let start = target.saturating_sub(radius);
    let end = target.saturating_add(radius);
    let limit = MAX_LINE_BYTES as u64 + 1;
    let mut window = SourceWindow::default();
    let mut buf = Vec::new();
    let mut number = 0usize;

    while number < end {
        buf.clear();
        let n = (&mut reader).take(limit).read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        number += 1;

        let line = match buf.strip_suffix(b"\n") {
            Some(line) => line,
            None if n as u64 == limit => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {} exceeds {} bytes", number, MAX_LINE_BYTES),
                ));
            }
            None => &buf[..],
        };

        if number < start {
            continue;
        }

        let bytes = line.strip_suffix(b"\r").unwrap_or(line);
        window.lines.push(WindowLine {
            number,
            text: String::from_utf8_lossy(bytes).into_owned(),
            is_target: number == target,
        });
    }

    Ok(window)
}
