use once_cell::sync::Lazy;
use regex::Regex;

use super::Candidate;
use crate::path::validate_path_strict;

/// Header prefix for the explicit file-marker layout.
pub const FILE_MARKER: &str = ">>> FILE:";

static MARKER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*>{3}\s*FILE:\s*(.+?)\s*$").unwrap());

/// Extract files declared by `>>> FILE: path` header lines.
///
/// Body text is kept verbatim up to the next marker or end of input. A
/// marker with a path that fails strict validation poisons its whole block:
/// both the header and the body beneath it are discarded, so hostile paths
/// never ride along as content of a neighbor.
pub fn extract(raw: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    // None means "between files" or "inside a poisoned block".
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in raw.lines() {
        if let Some(caps) = MARKER_LINE.captures(line) {
            flush(&mut current, &mut out);
            let declared = &caps[1];
            match validate_path_strict(declared) {
                Ok(path) => current = Some((path, Vec::new())),
                Err(err) => {
                    tracing::debug!(path = declared, %err, "dropping marker block");
                    current = None;
                }
            }
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    flush(&mut current, &mut out);
    out
}

fn flush(current: &mut Option<(String, Vec<&str>)>, out: &mut Vec<Candidate>) {
    if let Some((path, body)) = current.take() {
        let content = body.join("\n");
        if content.trim().is_empty() {
            tracing::debug!(%path, "dropping marker file with blank body");
        } else {
            out.push(Candidate::new(path, content));
        }
    }
}
