use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use fabriq_archive::{ArchiveReport, BuildOptions, CompressionLevel};

use crate::cli::read_input;

#[derive(Args, Clone, Debug)]
pub struct PackArg {
    #[arg(long, short = 'i', help = "Read the response from this file instead of stdin")]
    input: Option<PathBuf>,

    #[arg(
        long,
        short = 'n',
        default_value = "project",
        help = "Project name, used for the root directory and archive name"
    )]
    name: String,

    #[arg(long, short = 'o', help = "Archive path [default: <name>.zip]")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Level::Balanced, help = "Compression effort")]
    compression: Level,

    #[arg(long, help = "Keep entries at the archive top level, without the root directory")]
    flat: bool,

    #[arg(
        long,
        conflicts_with_all = ["input", "name"],
        help = "Archive an existing directory instead of parsing a response"
    )]
    from_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Level {
    Stored,
    Fast,
    Balanced,
    Best,
}

impl From<Level> for CompressionLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Stored => CompressionLevel::Stored,
            Level::Fast => CompressionLevel::Fast,
            Level::Balanced => CompressionLevel::Balanced,
            Level::Best => CompressionLevel::Best,
        }
    }
}

pub fn run(arg: PackArg, cancel: Arc<AtomicBool>) -> Result<()> {
    let mut options = BuildOptions::default()
        .compression(arg.compression.into())
        .cancel_flag(cancel);
    if arg.flat {
        options = options.flat();
    }

    if let Some(dir) = arg.from_dir {
        let output = arg.output.unwrap_or_else(|| {
            let stem = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "archive".to_string());
            PathBuf::from(format!("{stem}.zip"))
        });
        let report = fabriq_archive::zip_directory(&dir, &output, &options)
            .with_context(|| format!("failed to archive '{}'", dir.display()))?;
        summarize(&output, &report);
        return Ok(());
    }

    let raw = read_input(arg.input.as_deref())?;
    let structure = fabriq_parse::parse_project(&raw, &arg.name)?;
    if structure.meta.strategy.is_lossy() {
        tracing::warn!("file names were guessed from fence languages; check the archive contents");
    }

    let output = arg
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.zip", structure.root)));
    let report = fabriq_archive::zip_structure(&structure, &output, &options)
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    summarize(&output, &report);
    Ok(())
}

fn summarize(output: &std::path::Path, report: &ArchiveReport) {
    for skipped in &report.skipped {
        tracing::warn!(path = %skipped.path, reason = %skipped.reason, "entry skipped");
    }
    tracing::info!(
        archive = %output.display(),
        files = report.entry_count,
        dirs = report.dir_count,
        bytes = report.total_bytes,
        compressed = report.compressed_bytes,
        "archive written"
    );
}
