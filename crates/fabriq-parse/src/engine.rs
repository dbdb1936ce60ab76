use std::collections::HashSet;

use crate::error::{ParseError, Result};
use crate::path::{sanitize_root_label, validate_path};
use crate::strategy::{Candidate, Strategy};
use crate::structure::{ProjectFile, ProjectStructure, StrategyKind};

/// How much of a failed response to carry in the error for diagnosis.
const EXCERPT_LEN: usize = 120;

/// Parse an untrusted model response into a validated project structure.
///
/// Strategies run in [`Strategy::ORDER`]; the first that yields candidates
/// decides the result, and later strategies never get to contradict it.
/// Duplicate declared paths are a hard error rather than a silent
/// last-writer-wins, since two bodies for one path means the response is
/// incoherent.
pub fn parse_project(raw: &str, root_name: &str) -> Result<ProjectStructure> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let root = sanitize_root_label(root_name);

    for strategy in Strategy::ORDER {
        let candidates = strategy.attempt(raw);
        if candidates.is_empty() {
            continue;
        }
        tracing::debug!(
            strategy = %strategy.kind(),
            candidates = candidates.len(),
            "strategy matched"
        );
        return build_structure(root, candidates, strategy.kind(), raw);
    }

    Err(ParseError::NoFilesExtracted {
        excerpt: excerpt(raw),
    })
}

fn build_structure(
    root: String,
    candidates: Vec<Candidate>,
    kind: StrategyKind,
    raw: &str,
) -> Result<ProjectStructure> {
    let mut files = Vec::with_capacity(candidates.len());
    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    let mut duplicates = Vec::new();

    for candidate in candidates {
        // Strategies validate as they extract; this pass re-checks so no
        // code path can hand packaging an unvetted path.
        let path = match validate_path(&candidate.path) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(path = %candidate.path, %err, "dropping candidate");
                continue;
            }
        };
        if !seen.insert(path.clone()) {
            if duplicated.insert(path.clone()) {
                duplicates.push(path);
            }
            continue;
        }
        files.push(ProjectFile::new(path, candidate.content));
    }

    if !duplicates.is_empty() {
        return Err(ParseError::DuplicatePaths { paths: duplicates });
    }
    if files.is_empty() {
        return Err(ParseError::NoFilesExtracted {
            excerpt: excerpt(raw),
        });
    }
    if kind.is_lossy() {
        tracing::warn!(
            files = files.len(),
            "fell back to heuristic extraction; file names are guessed"
        );
    }
    Ok(ProjectStructure::new(root, files, kind))
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() <= EXCERPT_LEN {
        return trimmed.to_string();
    }
    let mut cut = EXCERPT_LEN;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &trimmed[..cut])
}
