use once_cell::sync::Lazy;
use regex::Regex;

use super::Candidate;
use crate::path::validate_path_strict;

/// Directory declaration: a column-zero line like `/src/` or `/src/util/`.
static DIR_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/(?:[A-Za-z0-9._\-]+/)*$").unwrap());

/// File header: a lone file name with an extension, optionally colon-suffixed.
static FILE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._\-]*\.[A-Za-z0-9]+):?$").unwrap());

/// Scanner state. The directory context lives outside the state because it
/// persists across file blocks until the next declaration replaces it.
enum State {
    /// No directory declared yet; file headers open blocks at the root.
    Idle,
    /// A directory declaration is in effect.
    InDirectory,
    /// Accumulating lines under an open file header.
    InFileContent(FileBlock),
}

struct FileBlock {
    name: String,
    lines: Vec<String>,
}

/// Extract files from the indented-outline layout: directory declarations at
/// column zero, file headers beneath them, content under each header.
///
/// A directory declaration replaces the whole context rather than nesting, so
/// `/src/` followed by `/src/util/` means two absolute positions, not
/// `src/src/util`. An open file runs until the next declaration or header;
/// every line in between is content, whatever its indentation.
pub fn extract(raw: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    let mut dir: Vec<String> = Vec::new();
    let mut state = State::Idle;

    for line in raw.lines() {
        state = match state {
            State::InFileContent(mut block) => {
                if is_structural(line) {
                    flush(block, &dir, &mut out);
                    transition(line, &mut dir)
                } else {
                    block.lines.push(line.to_string());
                    State::InFileContent(block)
                }
            }
            State::Idle | State::InDirectory => transition(line, &mut dir),
        };
    }
    if let State::InFileContent(block) = state {
        flush(block, &dir, &mut out);
    }
    out
}

/// Whether a line replaces the directory context or opens a new file, and
/// therefore ends any file content running above it.
fn is_structural(line: &str) -> bool {
    DIR_DECL.is_match(line) || FILE_HEADER.is_match(line.trim())
}

/// One step from a between-blocks state: a directory declaration replaces the
/// context, a file header opens a block, anything else is prose to skip.
fn transition(line: &str, dir: &mut Vec<String>) -> State {
    if DIR_DECL.is_match(line) {
        *dir = line
            .trim_matches('/')
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(str::to_string)
            .collect();
        return State::InDirectory;
    }
    if let Some(caps) = FILE_HEADER.captures(line.trim()) {
        return State::InFileContent(FileBlock {
            name: caps[1].to_string(),
            lines: Vec::new(),
        });
    }
    if dir.is_empty() {
        State::Idle
    } else {
        State::InDirectory
    }
}

fn flush(block: FileBlock, dir: &[String], out: &mut Vec<Candidate>) {
    let content = outdent(&block.lines);
    if content.trim().is_empty() {
        tracing::debug!(name = %block.name, "dropping indented file with blank body");
        return;
    }
    let joined = if dir.is_empty() {
        block.name
    } else {
        format!("{}/{}", dir.join("/"), block.name)
    };
    match validate_path_strict(&joined) {
        Ok(path) => out.push(Candidate::new(path, content)),
        Err(err) => tracing::debug!(path = %joined, %err, "dropping indented file"),
    }
}

/// Strip the shared leading indent and surrounding blank lines from a body.
fn outdent(lines: &[String]) -> String {
    let prefix = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .unwrap_or("");
    let stripped: Vec<&str> = lines
        .iter()
        .map(|l| l.strip_prefix(prefix).unwrap_or_else(|| l.trim_start()))
        .collect();

    let first = stripped.iter().position(|l| !l.trim().is_empty());
    let last = stripped.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => stripped[first..=last].join("\n"),
        _ => String::new(),
    }
}
