use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::app::App;

#[derive(Args, Clone, Debug)]
pub struct SetupArg {
    #[arg(value_enum, help = "Shell to generate completions for")]
    shell: Shell,
}

pub fn run(arg: SetupArg) -> Result<()> {
    let mut cmd = App::command();
    generate(arg.shell, &mut cmd, "fabriq", &mut std::io::stdout());
    Ok(())
}
