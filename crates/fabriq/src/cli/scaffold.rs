use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use fabriq_fs::MaterializeOptions;

use crate::cli::read_input;

#[derive(Args, Clone, Debug)]
pub struct ScaffoldArg {
    #[arg(long, short = 'i', help = "Read the response from this file instead of stdin")]
    input: Option<PathBuf>,

    #[arg(
        long,
        short = 'n',
        default_value = "project",
        help = "Project name, used for the directory written under the destination"
    )]
    name: String,

    #[arg(
        long,
        short = 'd',
        default_value = ".",
        help = "Destination directory the project is written into"
    )]
    dest: PathBuf,

    #[arg(long, help = "Replace the project directory if it already exists")]
    force: bool,
}

pub fn run(arg: ScaffoldArg, cancel: Arc<AtomicBool>) -> Result<()> {
    let raw = read_input(arg.input.as_deref())?;
    let structure = fabriq_parse::parse_project(&raw, &arg.name)?;
    if structure.meta.strategy.is_lossy() {
        tracing::warn!("file names were guessed from fence languages; check the tree before using it");
    }

    let mut options = MaterializeOptions::default().cancel_flag(cancel);
    if arg.force {
        options = options.overwrite();
    }

    let report = fabriq_fs::materialize(&structure, &arg.dest, &options)
        .with_context(|| format!("failed to scaffold under '{}'", arg.dest.display()))?;
    tracing::info!(
        root = %report.root.display(),
        files = report.files_written,
        dirs = report.dirs_created,
        bytes = report.bytes_written,
        "project scaffolded"
    );
    Ok(())
}
