//! rulemerge CLI: merge a directory of Markdown rules into one document
//! and fan it out to every configured target location.

mod commands;

use std::process::ExitCode;

use color_eyre::eyre::Result;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = commands::parse_cli();
    commands::init_tracing(&cli);
    commands::run(cli)
}
