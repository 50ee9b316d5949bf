//! Explain Command
//!
//! Runs the wrapped command and, when it fails, explains the first error
//! through the configured backend chain. The wrapped command's exit code is
//! returned unchanged whatever happens during the explanation step.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::ai::{ChainStats, Deadline, FailoverChain};
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::context;
use crate::prompt::{self, Mode};
use crate::runner;
use crate::types::Result;

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct ExplainOptions {
    /// Command and its arguments
    pub command: Vec<String>,
    /// Persona override; the configured mode applies when unset
    pub mode: Option<Mode>,
    /// `--extra-context` items in the order given
    pub extra_context: Vec<String>,
    /// Deadline override in seconds
    pub timeout_secs: Option<u64>,
    /// Explicit config file, bypassing global and project layers
    pub config: Option<PathBuf>,
    /// Print the prompts instead of calling any backend
    pub show_prompt: bool,
    pub quiet: bool,
}

/// System and user prompt for one explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

impl Prompts {
    /// Mine `diagnostic` and assemble both prompts
    pub fn build(diagnostic: &str, mode: Mode, extra_context: &[String]) -> Self {
        let block = context::mine(diagnostic);
        Self {
            system: mode.system_prompt(),
            user: prompt::assemble(diagnostic, &block, extra_context),
        }
    }
}

/// Run the command and explain its failure; returns the command's exit code
pub async fn run(options: ExplainOptions) -> Result<i32> {
    let output = Output::new().quiet(options.quiet);
    let result = runner::run(&options.command).await?;

    if result.success() {
        debug!("Command succeeded, nothing to explain");
        return Ok(result.exit_code);
    }

    output.banner("🤖 [AI Thinking...]");

    let config = load_config(&options, &output);
    let mode = options.mode.unwrap_or(config.mode);
    let prompts = Prompts::build(&result.stderr, mode, &options.extra_context);

    if options.show_prompt {
        output.section("System Prompt");
        println!("{}", prompts.system);
        output.section("User Prompt");
        println!("{}", prompts.user);
        return Ok(result.exit_code);
    }

    let timeout = Duration::from_secs(options.timeout_secs.unwrap_or(config.timeout_secs));
    let explained = explain(&config, &prompts, Deadline::after(timeout), |var| {
        std::env::var(var).ok()
    })
    .await;

    match explained {
        Ok((text, stats)) => {
            println!("{}", text.trim_end());
            if let Some(backend) = &stats.successful_backend
                && !stats.failures.is_empty()
            {
                output.info(&format!(
                    "Answered by {} after {} failed backend(s)",
                    backend,
                    stats.failures.len()
                ));
            }
        }
        Err(e) => output.error(&format!("AI Failed: {}", e)),
    }

    Ok(result.exit_code)
}

/// Resolve credentials and drive the failover chain
///
/// `lookup` maps an environment variable name to its value.
pub async fn explain<F>(
    config: &Config,
    prompts: &Prompts,
    deadline: Deadline,
    lookup: F,
) -> Result<(String, ChainStats)>
where
    F: Fn(&str) -> Option<String>,
{
    let chain = FailoverChain::from_descriptors(&config.backends, lookup);
    info!(
        backends = ?chain.backend_names(),
        budget_secs = deadline.budget().as_secs(),
        "Explaining failure"
    );

    chain.execute(&prompts.system, &prompts.user, &deadline).await
}

/// Load configuration, falling back to built-in defaults on any error
fn load_config(options: &ExplainOptions, output: &Output) -> Config {
    let loaded = match &options.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };

    loaded.unwrap_or_else(|e| {
        output.warning(&format!("Config Warning: {}. Using defaults...", e));
        Config::default()
    })
}
