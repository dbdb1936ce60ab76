use clap::{Parser, Subcommand};

use crate::cli::inspect::InspectArg;
use crate::cli::pack::PackArg;
use crate::cli::scaffold::ScaffoldArg;
use crate::cli::setup::SetupArg;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "fabriq",
    version = env!("CARGO_PKG_VERSION"),
    about,
    long_about = None,
    propagate_version = true
)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "p", name = "pack", about = "Parse a response and build a zip archive")]
    Pack(PackArg),
    #[command(
        alias = "sc",
        name = "scaffold",
        about = "Parse a response and write the project to disk"
    )]
    Scaffold(ScaffoldArg),
    #[command(
        alias = "i",
        name = "inspect",
        about = "Parse a response and report what it contains"
    )]
    Inspect(InspectArg),
    #[command(alias = "s", name = "setup", about = "Generate shell completions")]
    Setup(SetupArg),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn app_definition_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn subcommand_aliases_resolve() {
        for argv in [
            vec!["fabriq", "p", "--name", "demo"],
            vec!["fabriq", "sc", "--name", "demo", "--dest", "out"],
            vec!["fabriq", "i"],
            vec!["fabriq", "s", "bash"],
        ] {
            App::try_parse_from(&argv).unwrap_or_else(|e| panic!("{argv:?}: {e}"));
        }
    }
}
