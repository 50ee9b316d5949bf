use console::style;

pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Suppress informational lines; warnings and errors still print
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        if let Some(line) = self.info_line(message) {
            println!("{}", line);
        }
    }

    /// Progress banner; suppressed like `info` when quiet
    pub fn banner(&self, message: &str) {
        if let Some(line) = self.banner_line(message) {
            println!("\n{}", line);
        }
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    fn info_line(&self, message: &str) -> Option<String> {
        (!self.quiet).then(|| format!("{} {}", style("ℹ").blue(), message))
    }

    fn banner_line(&self, message: &str) -> Option<String> {
        (!self.quiet).then(|| style(format!("--- {} ---", message)).cyan().bold().to_string())
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
