use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;
use std::sync::atomic::Ordering;

use time::OffsetDateTime;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use fabriq_parse::{validate_path, ProjectFile, ProjectStructure};

use crate::error::{Error, Result};
use crate::options::{BuildOptions, Progress};
use crate::report::{ArchiveReport, SkippedEntry};

/// Write a parsed structure as a zip archive into any seekable writer.
///
/// Directory entries are synthesized for every path segment so extractors
/// that do not create parents on demand still unpack cleanly. Entries that
/// fail individually are skipped and reported; a failure of the underlying
/// stream aborts the build.
pub fn build_from_structure<W: Write + Seek>(
    structure: &ProjectStructure,
    writer: W,
    options: &BuildOptions,
) -> Result<ArchiveReport> {
    if structure.is_empty() {
        return Err(Error::EmptyStructure);
    }

    let mut report = ArchiveReport::default();

    // Paths were validated at parse time; re-checking here keeps hand-built
    // structures from smuggling traversal into an archive.
    let mut entries: Vec<(String, &ProjectFile)> = Vec::with_capacity(structure.files.len());
    for file in &structure.files {
        match validate_path(&file.path) {
            Ok(path) => entries.push((path, file)),
            Err(err) => {
                tracing::warn!(path = %file.path, %err, "skipping invalid entry");
                report.skipped.push(SkippedEntry {
                    path: file.path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let prefix = if options.flat {
        None
    } else {
        Some(structure.root.as_str())
    };
    let entries_total = entries.len();
    let mut zip = ZipWriter::new(writer);
    // Ancestors are synthesized the first time a file needs them, so every
    // directory entry precedes its first file in stream order.
    let mut emitted_dirs: HashSet<String> = HashSet::new();

    for (path, file) in entries {
        check_cancel(options)?;
        let name = match prefix {
            Some(prefix) => format!("{prefix}/{path}"),
            None => path,
        };
        for dir in parent_chain(&name) {
            if !emitted_dirs.insert(dir.clone()) {
                continue;
            }
            match zip.add_directory(dir.as_str(), SimpleFileOptions::default()) {
                Ok(()) => report.dir_count += 1,
                Err(err) => {
                    tracing::warn!(%dir, %err, "skipping directory entry");
                    report.skipped.push(SkippedEntry {
                        path: dir,
                        reason: err.to_string(),
                    });
                }
            }
        }
        let entry_options = stamp(options.compression.file_options(), options.timestamp);
        if let Err(err) = zip.start_file(name.as_str(), entry_options) {
            tracing::warn!(path = %name, %err, "skipping archive entry");
            report.skipped.push(SkippedEntry {
                path: name,
                reason: err.to_string(),
            });
            continue;
        }
        zip.write_all(file.content.as_bytes())?;
        report.entry_count += 1;
        report.total_bytes += file.content.len() as u64;
        notify(
            options,
            &report,
            Some(entries_total),
            Some(name),
        );
    }

    if report.entry_count == 0 {
        return Err(Error::NoEntries);
    }
    finish(zip, report)
}

/// Walk an on-disk tree and write it as a zip archive.
///
/// Symlinks to files are archived as the file they point at; sockets,
/// dangling links and other oddities are skipped. Unreadable entries are
/// reported rather than aborting the walk.
pub fn build_from_directory<W: Write + Seek>(
    root: &Path,
    writer: W,
    options: &BuildOptions,
) -> Result<ArchiveReport> {
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let prefix: Option<String> = if options.flat {
        None
    } else {
        root.file_name().map(|n| n.to_string_lossy().into_owned())
    };

    let mut zip = ZipWriter::new(writer);
    let mut report = ArchiveReport::default();

    if let Some(prefix) = prefix.as_deref() {
        match zip.add_directory(prefix, SimpleFileOptions::default()) {
            Ok(()) => report.dir_count += 1,
            Err(err) => {
                tracing::warn!(dir = prefix, %err, "skipping directory entry");
                report.skipped.push(SkippedEntry {
                    path: prefix.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        check_cancel(options)?;
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                tracing::warn!(%path, %err, "skipping unreadable entry");
                report.skipped.push(SkippedEntry {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let name = entry_name(prefix.as_deref(), rel);

        if entry.file_type().is_dir() {
            match zip.add_directory(name.as_str(), SimpleFileOptions::default()) {
                Ok(()) => report.dir_count += 1,
                Err(err) => {
                    tracing::warn!(dir = %name, %err, "skipping directory entry");
                    report.skipped.push(SkippedEntry {
                        path: name,
                        reason: err.to_string(),
                    });
                }
            }
        } else if entry.path().is_file() {
            let mtime = options.timestamp.or_else(|| {
                entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .map(OffsetDateTime::from)
            });
            let mut file = match File::open(entry.path()) {
                Ok(file) => file,
                Err(err) => {
                    tracing::warn!(path = %name, %err, "skipping unreadable file");
                    report.skipped.push(SkippedEntry {
                        path: name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            let entry_options = stamp(options.compression.file_options(), mtime);
            if let Err(err) = zip.start_file(name.as_str(), entry_options) {
                tracing::warn!(path = %name, %err, "skipping archive entry");
                report.skipped.push(SkippedEntry {
                    path: name,
                    reason: err.to_string(),
                });
                continue;
            }
            let copied = io::copy(&mut file, &mut zip)?;
            report.entry_count += 1;
            report.total_bytes += copied;
            notify(options, &report, None, Some(name));
        } else {
            tracing::debug!(path = %name, "skipping special entry");
        }
    }

    if report.entry_count == 0 {
        return Err(Error::NoEntries);
    }
    finish(zip, report)
}

/// Build a structure's archive at `dest` on disk.
pub fn zip_structure(
    structure: &ProjectStructure,
    dest: &Path,
    options: &BuildOptions,
) -> Result<ArchiveReport> {
    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let report = build_from_structure(structure, &mut writer, options)?;
    writer.flush()?;
    Ok(report)
}

/// Archive an existing directory at `dest` on disk.
pub fn zip_directory(src: &Path, dest: &Path, options: &BuildOptions) -> Result<ArchiveReport> {
    let file = File::create(dest)?;
    let mut writer = BufWriter::new(file);
    let report = build_from_directory(src, &mut writer, options)?;
    writer.flush()?;
    Ok(report)
}

/// Every ancestor directory of an entry name, root first.
fn parent_chain(name: &str) -> Vec<String> {
    let segments: Vec<&str> = name.split('/').collect();
    let mut chain = Vec::with_capacity(segments.len().saturating_sub(1));
    let mut acc = String::new();
    for seg in &segments[..segments.len() - 1] {
        if !acc.is_empty() {
            acc.push('/');
        }
        acc.push_str(seg);
        chain.push(acc.clone());
    }
    chain
}

fn entry_name(prefix: Option<&str>, rel: &Path) -> String {
    let rel = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    match prefix {
        Some(prefix) => format!("{prefix}/{rel}"),
        None => rel,
    }
}

fn stamp(base: SimpleFileOptions, ts: Option<OffsetDateTime>) -> SimpleFileOptions {
    match ts.map(zip::DateTime::try_from) {
        Some(Ok(dt)) => base.last_modified_time(dt),
        Some(Err(err)) => {
            tracing::debug!(%err, "timestamp outside zip range; keeping default");
            base
        }
        None => base,
    }
}

fn check_cancel(options: &BuildOptions) -> Result<()> {
    if options
        .cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
    {
        return Err(Error::Cancelled);
    }
    Ok(())
}

fn notify(
    options: &BuildOptions,
    report: &ArchiveReport,
    entries_total: Option<usize>,
    current_file: Option<String>,
) {
    if let Some(callback) = &options.on_progress {
        callback(Progress {
            entries_done: report.entry_count,
            entries_total,
            bytes_written: report.total_bytes,
            current_file,
        });
    }
}

fn finish<W: Write + Seek>(zip: ZipWriter<W>, mut report: ArchiveReport) -> Result<ArchiveReport> {
    let mut inner = zip.finish().map_err(|source| Error::Finish { source })?;
    report.compressed_bytes = inner.stream_position()?;
    Ok(report)
}
