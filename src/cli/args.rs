//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build trees visually from build scripts of indented add calls
#[derive(Parser, Debug)]
#[command(name = "depthtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "DEPTHTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a script and print the tree as an outline
    Show {
        /// Build script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Hide attributes on element labels
        #[arg(long)]
        no_attributes: bool,
        /// Print the exported document, including its root node
        #[arg(long)]
        export: bool,
    },

    /// Build a script and report node counts
    Check {
        /// Build script (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Print effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
