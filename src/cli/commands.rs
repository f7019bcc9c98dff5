//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{BuildReport, Script};
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::markup::{DisplayOptions, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Some(Commands::Show {
            script,
            no_attributes,
            export,
        }) => show(&settings, script, *no_attributes, *export),
        Some(Commands::Check { script }) => check(&settings, script),
        Some(Commands::Config) => print_config(&settings),
        Some(Commands::Completion { shell }) => completion(*shell),
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(settings))]
fn show(settings: &Settings, script: &Path, no_attributes: bool, export: bool) -> CliResult<()> {
    let markup = Script::load(script)?.run(settings)?;
    let options = DisplayOptions {
        show_attributes: settings.display.show_attributes && !no_attributes,
        ..settings.display.clone()
    };

    if markup.is_empty() {
        output::warning(&format!("{} adds no nodes", script.display()));
    }
    let tree = if export {
        let (document, root) = markup.export();
        document.subtree(root, &options)
    } else {
        markup.to_tree_string(&options)
    };
    output::info(&tree);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn check(settings: &Settings, script: &Path) -> CliResult<()> {
    let markup = Script::load(script)?.run(settings)?;
    let report = BuildReport::from_markup(&markup);

    output::header(&script.display());
    output::info(&report);
    output::success(&format!("{} nodes built", report.total()));
    Ok(())
}

fn print_config(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
