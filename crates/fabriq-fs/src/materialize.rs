use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fabriq_parse::{sanitize_root_label, validate_path, ProjectStructure};

use crate::error::{Error, Result};
use crate::lock::DestLocks;
use crate::stage::Staging;

#[derive(Clone, Default)]
pub struct MaterializeOptions {
    /// Replace an existing destination root instead of refusing.
    pub overwrite: bool,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl MaterializeOptions {
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

#[derive(Clone, Debug)]
pub struct MaterializeReport {
    /// Where the project landed: `<sandbox>/<root label>`.
    pub root: PathBuf,
    pub files_written: usize,
    pub dirs_created: usize,
    pub bytes_written: u64,
}

/// Write a parsed structure to disk under `sandbox`, all or nothing.
///
/// Files are staged into a temp directory inside the sandbox, every path is
/// validated again and resolved against the staging root, and only a fully
/// staged tree is swapped into place. Any failure before the swap leaves
/// the destination exactly as it was.
pub fn materialize(
    structure: &ProjectStructure,
    sandbox: &Path,
    options: &MaterializeOptions,
) -> Result<MaterializeReport> {
    if structure.is_empty() {
        return Err(Error::EmptyStructure);
    }
    std::fs::create_dir_all(sandbox)?;
    // Canonicalize up front so every containment check below compares real
    // paths, not whatever symlinks the caller handed us.
    let sandbox = sandbox.canonicalize()?;
    // The parser sanitizes root labels already; doing it again here means a
    // hand-built structure cannot point the swap at the sandbox itself or
    // anywhere above it.
    let dest = sandbox.join(sanitize_root_label(&structure.root));
    if dest.exists() && !options.overwrite {
        return Err(Error::DestinationExists { path: dest });
    }

    let staging = Staging::new(&sandbox)?;
    let staged_root = staging.path().canonicalize()?;

    let mut files_written = 0usize;
    let mut bytes_written = 0u64;
    let mut dirs = HashSet::new();

    for file in &structure.files {
        check_cancel(options)?;
        let path = validate_path(&file.path).map_err(|source| Error::InvalidPath {
            path: file.path.clone(),
            source,
        })?;
        let target = resolve_inside(&staged_root, &path)?;

        if let Some(parent) = target.parent() {
            if parent != staged_root {
                std::fs::create_dir_all(parent).map_err(|source| Error::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
                // The parents were just created, but resolve them anyway: a
                // symlink smuggled into the staged tree must not redirect
                // writes outside it.
                let real = parent.canonicalize().map_err(|source| Error::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
                if !real.starts_with(&staged_root) {
                    return Err(Error::SandboxEscape {
                        path: PathBuf::from(&path),
                    });
                }
            }
            track_dirs(&mut dirs, &staged_root, parent);
        }

        std::fs::write(&target, file.content.as_bytes()).map_err(|source| Error::Write {
            path: PathBuf::from(&path),
            source,
        })?;
        files_written += 1;
        bytes_written += file.content.len() as u64;
        tracing::debug!(%path, bytes = file.content.len(), "staged file");
    }

    let dirs_created = dirs.len();
    staging.commit(&dest)?;
    tracing::info!(
        dest = %dest.display(),
        files = files_written,
        bytes = bytes_written,
        "materialized project"
    );
    Ok(MaterializeReport {
        root: dest,
        files_written,
        dirs_created,
        bytes_written,
    })
}

/// [`materialize`], serialized per destination through `locks`.
pub fn materialize_locked(
    structure: &ProjectStructure,
    sandbox: &Path,
    options: &MaterializeOptions,
    locks: &DestLocks,
) -> Result<MaterializeReport> {
    // Resolve the sandbox before keying the gate, so every spelling of one
    // destination serializes on the same mutex.
    std::fs::create_dir_all(sandbox)?;
    let sandbox = sandbox.canonicalize()?;
    let gate = locks.gate(&sandbox.join(sanitize_root_label(&structure.root)));
    let _held = match gate.lock() {
        Ok(held) => held,
        Err(poisoned) => poisoned.into_inner(),
    };
    materialize(structure, &sandbox, options)
}

/// Join a validated relative path onto `root`, admitting only plain
/// segments. Anything that could change the anchor is an escape.
fn resolve_inside(root: &Path, rel: &str) -> Result<PathBuf> {
    let mut resolved = root.to_path_buf();
    for comp in Path::new(rel).components() {
        match comp {
            Component::Normal(seg) => resolved.push(seg),
            Component::CurDir => {}
            _ => {
                return Err(Error::SandboxEscape {
                    path: PathBuf::from(rel),
                });
            }
        }
    }
    if resolved.starts_with(root) {
        Ok(resolved)
    } else {
        Err(Error::SandboxEscape {
            path: PathBuf::from(rel),
        })
    }
}

fn track_dirs(dirs: &mut HashSet<PathBuf>, root: &Path, parent: &Path) {
    let mut cursor = parent;
    while cursor != root {
        if !dirs.insert(cursor.to_path_buf()) {
            break;
        }
        match cursor.parent() {
            Some(up) => cursor = up,
            None => break,
        }
    }
}

fn check_cancel(options: &MaterializeOptions) -> Result<()> {
    if options
        .cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
    {
        return Err(Error::Cancelled);
    }
    Ok(())
}
