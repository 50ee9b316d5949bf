use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use error_explain::cli::commands::explain;
use error_explain::cli::{ExplainOptions, Output};
use error_explain::prompt::Mode;
use error_explain::runner::FAILURE_EXIT_CODE;

#[derive(Parser)]
#[command(name = "error-explain")]
#[command(
    version,
    about = "Run a build command and explain its first error with AI",
    override_usage = "error-explain [OPTIONS] -- <COMMAND>..."
)]
struct Cli {
    /// AI persona: direct, deep, teacher
    #[arg(long, short)]
    mode: Option<Mode>,

    /// File path or raw text added to the prompt (repeatable)
    #[arg(long = "extra-context", short = 'e', value_name = "PATH|TEXT")]
    extra_context: Vec<String>,

    /// Total seconds allowed for all AI backends together
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Load this config file instead of the global and project ones
    #[arg(long, short, env = "ERROR_EXPLAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Print the assembled prompts instead of calling any backend
    #[arg(long)]
    show_prompt: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// Build command to run
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31merror-explain encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(code) => exit_code(code),
        Err(e) => {
            Output::new().error(&format!("System Error: {:#}", e));
            exit_code(FAILURE_EXIT_CODE)
        }
    }
}

/// Map a child exit status onto the range a process can return
fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(FAILURE_EXIT_CODE as u8))
}

fn run_cli() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    if cli.command.is_empty() {
        println!("Usage: error-explain [OPTIONS] -- <COMMAND>...");
        return Ok(FAILURE_EXIT_CODE);
    }

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = ExplainOptions {
        command: cli.command,
        mode: cli.mode,
        extra_context: cli.extra_context,
        timeout_secs: cli.timeout,
        config: cli.config,
        show_prompt: cli.show_prompt,
        quiet: cli.quiet,
    };

    let rt = Runtime::new()?;
    let code = rt.block_on(explain::run(options))?;

    Ok(code)
}
