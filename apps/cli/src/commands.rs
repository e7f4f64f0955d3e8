//! CLI definition, tracing setup, and the run command.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use color_eyre::eyre::Result;
use rulemerge_core::confirm::Confirm;
use rulemerge_core::pipeline::{self, RunOptions};
use rulemerge_core::report::TracingReporter;
use rulemerge_shared::{AppConfig, load_config};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// rulemerge: merge Markdown rules and write them for every tool.
#[derive(Parser, Debug)]
#[command(
    name = "rulemerge",
    version,
    about = "Merge a directory of Markdown files into one document and write it to every configured target.",
    long_about = None,
    disable_help_flag = true,
)]
pub(crate) struct Cli {
    /// Directory containing the Markdown source files.
    #[arg(value_name = "SRC_DIR")]
    pub src_dir: Option<PathBuf>,

    /// Root directory the targets are written under.
    #[arg(value_name = "DEST_DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Targets to write (comma-separated), replacing the configured defaults.
    #[arg(long, value_name = "LIST")]
    pub formats: Option<String>,

    /// Overwrite existing files without asking.
    #[arg(long)]
    pub overwrite: bool,

    /// Configuration file (TOML, or JSON with a .json extension).
    #[arg(long, value_name = "FILE", env = "RULEMERGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    pub show_config: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print help and the available formats.
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Parse arguments, exiting with status 1 on any usage error.
pub(crate) fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "rulemerge=info",
        1 => "rulemerge=debug",
        _ => "rulemerge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI.
///
/// Fatal pipeline errors have already been reported by the pipeline and map
/// to a failing exit code; configuration errors are returned as `Err`.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    if cli.help {
        return cmd_help(&cli);
    }

    if cli.show_config {
        let loaded = load_config(cli.config.as_deref())?;
        info!(source = %loaded.source, "using configuration");
        print!("{}", toml::to_string_pretty(&loaded.config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(src_dir), Some(dest_dir)) = (cli.src_dir, cli.dest_dir) else {
        let _ = Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "both <SRC_DIR> and <DEST_DIR> are required",
            )
            .print();
        return Ok(ExitCode::FAILURE);
    };

    let loaded = load_config(cli.config.as_deref())?;
    info!(source = %loaded.source, "using configuration");

    let options = RunOptions {
        source_dir: src_dir,
        dest_dir,
        formats: cli.formats,
        overwrite: cli.overwrite,
    };

    let confirm = TerminalConfirm::new();
    match pipeline::run(&loaded.config, &options, &TracingReporter, &confirm) {
        Ok(summary) => {
            println!("{summary}");
            Ok(if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            debug!(error = %e, "run aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_help(cli: &Cli) -> Result<ExitCode> {
    println!("{}", Cli::command().render_help());

    match load_config(cli.config.as_deref()) {
        Ok(loaded) => println!("{}", format_list(&loaded.config)),
        Err(e) => eprintln!("Could not list formats: {e}"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Available target names, with defaults marked.
fn format_list(config: &AppConfig) -> String {
    let mut out = String::from("Available formats (* = default):");
    for name in config.target_names() {
        let marker = if config.is_default(name) { "*" } else { " " };
        out.push_str(&format!("\n  {marker} {name}"));
    }
    out
}

// ---------------------------------------------------------------------------
// Terminal confirmation
// ---------------------------------------------------------------------------

/// Asks on the terminal when stdin is interactive; otherwise always "no".
struct TerminalConfirm {
    interactive: bool,
}

impl TerminalConfirm {
    fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        if !self.interactive {
            debug!(question, "non-interactive, declining");
            return false;
        }

        inquire::Confirm::new(question)
            .with_default(false)
            .with_help_message("Press 'y' to overwrite, Enter to keep the existing file")
            .prompt()
            .unwrap_or_else(|e| {
                debug!(error = %e, "confirmation prompt failed, declining");
                false
            })
    }
}
