use std::path::Path;

use crate::error::PathError;

/// Characters never allowed in a project-relative path.
const RESERVED: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Label used when sanitizing strips a root name down to nothing.
const DEFAULT_ROOT: &str = "project";

/// Validate and normalize an untrusted relative path.
///
/// Rules are applied in order, first failure wins: blank, `..` segment,
/// absolute prefix (slash or drive letter), reserved/control characters.
/// The surviving path is normalized to forward slashes with no repeated
/// separators and no leading `./`.
pub fn validate_path(raw: &str) -> Result<String, PathError> {
    validate(raw, false)
}

/// Like [`validate_path`], but additionally rejects paths whose final
/// segment carries no file extension. Strict strategies use this to refuse
/// prose lines masquerading as file names.
pub fn validate_path_strict(raw: &str) -> Result<String, PathError> {
    validate(raw, true)
}

fn validate(raw: &str, require_extension: bool) -> Result<String, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    // Check the raw segments so `..` is caught regardless of separator style
    // or position in the path.
    if trimmed.split(['/', '\\']).any(|seg| seg == "..") {
        return Err(PathError::Traversal(trimmed.to_string()));
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') || has_drive_prefix(trimmed) {
        return Err(PathError::Absolute(trimmed.to_string()));
    }
    if require_extension && !final_segment_has_extension(trimmed) {
        return Err(PathError::MissingExtension(trimmed.to_string()));
    }
    if trimmed.chars().any(|c| c.is_control() || RESERVED.contains(&c)) {
        return Err(PathError::IllegalChar(trimmed.to_string()));
    }

    let normalized = normalize(trimmed);
    if normalized.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(normalized)
}

/// Sanitize a caller-supplied project name into a safe root label.
///
/// Whitespace runs collapse to a single underscore, separators and reserved
/// characters are dropped, and a label that sanitizes to nothing falls back
/// to a fixed placeholder.
pub fn sanitize_root_label(raw: &str) -> String {
    let mut label = String::with_capacity(raw.len());
    let mut pending_gap = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_gap = !label.is_empty();
        } else if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
            if pending_gap {
                label.push('_');
                pending_gap = false;
            }
            label.push(c);
        }
        // Separators, control and reserved characters are dropped outright.
    }
    let label = label.trim_matches(|c| c == '.' || c == '_');
    if label.is_empty() {
        DEFAULT_ROOT.to_string()
    } else {
        label.to_string()
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn final_segment_has_extension(path: &str) -> bool {
    path.split(['/', '\\'])
        .filter(|seg| !seg.is_empty())
        .next_back()
        .is_some_and(|seg| Path::new(seg).extension().is_some())
}

fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for seg in path.split(['/', '\\']) {
        if seg.is_empty() || seg == "." {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(seg);
    }
    out
}
