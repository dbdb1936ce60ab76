use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use fabriq_parse::{ProjectStructure, StrategyKind};

use crate::cli::read_input;

#[derive(Args, Clone, Debug)]
pub struct InspectArg {
    #[arg(long, short = 'i', help = "Read the response from this file instead of stdin")]
    input: Option<PathBuf>,

    #[arg(long, short = 'n', default_value = "project", help = "Project name for the root label")]
    name: String,

    #[arg(long, help = "Emit the summary as JSON")]
    json: bool,

    #[arg(
        long,
        conflicts_with = "json",
        help = "Print the parsed project in canonical marker form"
    )]
    canonical: bool,
}

#[derive(Serialize)]
struct Inspection<'a> {
    root: &'a str,
    strategy: StrategyKind,
    file_count: usize,
    total_bytes: u64,
    files: Vec<FileRow<'a>>,
}

#[derive(Serialize)]
struct FileRow<'a> {
    path: &'a str,
    bytes: usize,
}

pub fn run(arg: InspectArg) -> Result<()> {
    let raw = read_input(arg.input.as_deref())?;
    let structure = fabriq_parse::parse_project(&raw, &arg.name)?;

    if arg.canonical {
        print!("{}", structure.to_marker_text());
        return Ok(());
    }
    if arg.json {
        println!("{}", serde_json::to_string_pretty(&inspection(&structure))?);
        return Ok(());
    }

    println!(
        "{} ({} files, {} bytes, {} strategy)",
        structure.root, structure.meta.file_count, structure.meta.total_bytes, structure.meta.strategy
    );
    for file in &structure.files {
        println!("{:>10}  {}", file.content.len(), file.path);
    }
    if structure.meta.strategy.is_lossy() {
        tracing::warn!("file names were guessed from fence languages");
    }
    Ok(())
}

fn inspection(structure: &ProjectStructure) -> Inspection<'_> {
    Inspection {
        root: &structure.root,
        strategy: structure.meta.strategy,
        file_count: structure.meta.file_count,
        total_bytes: structure.meta.total_bytes,
        files: structure
            .files
            .iter()
            .map(|file| FileRow {
                path: &file.path,
                bytes: file.content.len(),
            })
            .collect(),
    }
}
