use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::spawn_blocking;

use crate::cli::app::{App, Commands};

pub mod app;
mod inspect;
mod pack;
mod scaffold;
mod setup;

pub async fn run(app: App, cancel: Arc<AtomicBool>) -> Result<()> {
    match app.cmd {
        Commands::Pack(arg) => spawn_blocking(move || pack::run(arg, cancel)).await?,
        Commands::Scaffold(arg) => spawn_blocking(move || scaffold::run(arg, cancel)).await?,
        Commands::Inspect(arg) => spawn_blocking(move || inspect::run(arg)).await?,
        Commands::Setup(arg) => setup::run(arg),
    }
}

/// Read the model response from a file, or from stdin when piped in.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read the response from stdin")?;
            Ok(raw)
        }
    }
}
