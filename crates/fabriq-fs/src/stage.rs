use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A staging directory that disappears unless committed.
///
/// Everything is written under a hidden temp directory first; `commit`
/// publishes the whole tree with a single rename. If the `Staging` value is
/// dropped before that, whatever was staged is removed again.
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    /// Create a staging directory inside `parent`. Staying inside the
    /// destination's own filesystem keeps the final rename a rename.
    pub fn new(parent: &Path) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix(".fabriq-stage-")
            .tempdir_in(parent)?
            .keep();
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Replace `dest` with the staged tree. An existing destination is parked
    /// under a sibling name first and deleted only once the staged tree has
    /// landed, so a failed swap restores the previous tree instead of losing
    /// both. Once the rename lands the staging dir no longer exists, so the
    /// drop cleanup becomes a no-op.
    pub fn commit(self, dest: &Path) -> Result<()> {
        let parked = if dest.exists() {
            let aside = parked_name(dest);
            if aside.exists() {
                // Leftover from an interrupted earlier replacement.
                std::fs::remove_dir_all(&aside).map_err(|source| Error::Commit {
                    path: dest.to_path_buf(),
                    source,
                })?;
            }
            std::fs::rename(dest, &aside).map_err(|source| Error::Commit {
                path: dest.to_path_buf(),
                source,
            })?;
            Some(aside)
        } else {
            None
        };

        if let Err(source) = std::fs::rename(&self.root, dest) {
            if let Some(aside) = parked {
                let _ = std::fs::rename(&aside, dest);
            }
            return Err(Error::Commit {
                path: dest.to_path_buf(),
                source,
            });
        }
        if let Some(aside) = parked {
            let _ = std::fs::remove_dir_all(&aside);
        }
        Ok(())
    }
}

/// Sibling name an existing destination is parked under during the swap.
fn parked_name(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}-replaced"))
}

impl Drop for Staging {
    fn drop(&mut self) {
        if self.root.exists() {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staged_tree_commits_to_destination() -> Result<()> {
        let dir = tempdir()?;
        let staging = Staging::new(dir.path())?;
        std::fs::write(staging.path().join("file.txt"), b"data")?;

        let dest = dir.path().join("dest");
        staging.commit(&dest)?;
        assert_eq!(std::fs::read(dest.join("file.txt"))?, b"data");
        Ok(())
    }

    #[test]
    fn commit_replaces_existing_destination() -> Result<()> {
        let dir = tempdir()?;
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest)?;
        std::fs::write(dest.join("stale.txt"), b"old")?;

        let staging = Staging::new(dir.path())?;
        std::fs::write(staging.path().join("fresh.txt"), b"new")?;
        staging.commit(&dest)?;

        assert!(dest.join("fresh.txt").exists());
        assert!(!dest.join("stale.txt").exists());
        // Neither the staging dir nor the parked old tree sticks around.
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn commit_cleans_a_stale_parked_tree() -> Result<()> {
        let dir = tempdir()?;
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest)?;
        std::fs::write(dest.join("old.txt"), b"old")?;
        let stale = dir.path().join(".dest-replaced");
        std::fs::create_dir(&stale)?;
        std::fs::write(stale.join("ancient.txt"), b"older")?;

        let staging = Staging::new(dir.path())?;
        std::fs::write(staging.path().join("new.txt"), b"new")?;
        staging.commit(&dest)?;

        assert!(dest.join("new.txt").exists());
        assert!(!stale.exists());
        Ok(())
    }

    #[test]
    fn drop_cleans_up_uncommitted_staging() -> Result<()> {
        let dir = tempdir()?;
        let staged_path;
        {
            let staging = Staging::new(dir.path())?;
            std::fs::write(staging.path().join("file.txt"), b"data")?;
            staged_path = staging.path().to_path_buf();
            assert!(staged_path.exists());
        }
        assert!(!staged_path.exists());
        Ok(())
    }
}
