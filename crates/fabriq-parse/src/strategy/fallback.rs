use super::fenced;
use super::Candidate;

/// Inputs shorter than this are treated as refusals or chatter rather than
/// wrapped wholesale into a file.
const MIN_RAW_LEN: usize = 80;

/// Name given to the whole response when nothing more structured exists.
const RAW_FALLBACK_NAME: &str = "response.txt";

/// Last-resort extraction. Unnamed code fences become numbered snippet
/// files with an extension guessed from the fence language; failing that,
/// a sufficiently long response is kept whole as a single text file.
pub fn extract(raw: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    for block in fenced::scan(raw) {
        let content = fenced::body_text(&block.body);
        if content.trim().is_empty() {
            continue;
        }
        let ext = block
            .info
            .split_whitespace()
            .next()
            .filter(|tok| !tok.contains('.'))
            .map_or("txt", extension_for);
        out.push(Candidate::new(
            format!("snippet_{}.{ext}", out.len() + 1),
            content,
        ));
    }

    if out.is_empty() {
        let trimmed = raw.trim();
        if trimmed.len() >= MIN_RAW_LEN {
            out.push(Candidate::new(RAW_FALLBACK_NAME, trimmed.to_string()));
        }
    }
    out
}

/// Map a fence language tag to a file extension.
fn extension_for(lang: &str) -> &'static str {
    match lang.to_ascii_lowercase().as_str() {
        "rust" => "rs",
        "kotlin" => "kt",
        "java" => "java",
        "python" => "py",
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "c" => "c",
        "cpp" | "c++" => "cpp",
        "csharp" | "cs" => "cs",
        "go" => "go",
        "ruby" | "rb" => "rb",
        "swift" => "swift",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "json" => "json",
        "yaml" | "yml" => "yml",
        "toml" => "toml",
        "xml" => "xml",
        "sql" => "sql",
        "bash" | "sh" | "shell" | "zsh" => "sh",
        "markdown" | "md" => "md",
        "gradle" => "gradle",
        "properties" => "properties",
        _ => "txt",
    }
}
