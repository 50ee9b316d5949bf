//! Error Locator
//!
//! Finds the first `file:line:column:` location in compiler output.
//! Only the first match is used: later diagnostics from the same run are
//! usually cascades of the first one.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// GCC/Clang/rustc-style location prefix: `main.cpp:10:5: error: ...`
///
/// Group 1 is the file, group 2 the line. The column is optional.
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:\n]+):(\d+):(?:\d+:?)?").expect("location pattern is valid")
});

/// A (file, line) pair identifying where a diagnostic originated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    /// 1-based line number
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Return the location reported on the first matching line, if any
pub fn locate(text: &str) -> Option<SourceLocation> {
    text.lines().find_map(parse_line)
}

fn parse_line(line: &str) -> Option<SourceLocation> {
    let caps = LOCATION_PATTERN.captures(line)?;
    let file = caps.get(1)?.as_str();
    // Overflowing or zero line numbers are not locations
    let number = caps.get(2)?.as_str().parse::<usize>().ok()?;
    if number == 0 {
        return None;
    }
    Some(SourceLocation::new(file, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcc_style_location() {
        let text = "main.cpp:10:5: error: expected ';' before '}' token";
        assert_eq!(locate(text), Some(SourceLocation::new("main.cpp", 10)));
    }

    #[test]
    fn test_location_without_column() {
        let text = "script.py:42: SyntaxWarning: invalid escape sequence";
        assert_eq!(locate(text), Some(SourceLocation::new("script.py", 42)));
    }

    #[test]
    fn test_go_style_location() {
        let text = "# example\n./main.go:7:2: undefined: fmt.Printn";
        assert_eq!(locate(text), Some(SourceLocation::new("./main.go", 7)));
    }

    #[test]
    fn test_first_match_wins() {
        let text = "\
main.c: In function 'main':
a.c:3:1: error: unknown type name 'foo'
note: something
b.c:9:4: error: cascading
c.c:12:1: error: more cascading";
        assert_eq!(locate(text), Some(SourceLocation::new("a.c", 3)));
    }

    #[test]
    fn test_first_of_two_matching_lines() {
        let text = "building...\nsrc/a.rs:2:1: first\nx\ny\nsrc/b.rs:5:1: second";
        assert_eq!(locate(text), Some(SourceLocation::new("src/a.rs", 2)));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(locate(""), None);
        assert_eq!(locate("error: linking failed\nld returned 1 exit status"), None);
        assert_eq!(locate("error[E0425]: cannot find value `x`"), None);
    }

    #[test]
    fn test_binary_garbage_does_not_match() {
        let text = String::from_utf8_lossy(&[0xff, 0xfe, 0x00, b':', b'1', 0x80]).into_owned();
        assert_eq!(locate(&text), None);
    }

    #[test]
    fn test_zero_line_is_skipped() {
        let text = "gen.c:0:0: warning: generated\nreal.c:4:2: error: boom";
        assert_eq!(locate(text), Some(SourceLocation::new("real.c", 4)));
    }

    #[test]
    fn test_overflowing_line_is_skipped() {
        let text = "a.c:99999999999999999999999999:1: error\nb.c:8:1: error";
        assert_eq!(locate(text), Some(SourceLocation::new("b.c", 8)));
    }

    #[test]
    fn test_display() {
        assert_eq!(SourceLocation::new("lib.rs", 3).to_string(), "lib.rs:3");
    }
}
