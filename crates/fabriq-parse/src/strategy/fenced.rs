use super::Candidate;
use crate::path::validate_path_strict;

/// One complete markdown code fence: its info string and verbatim body.
pub(super) struct FencedBlock {
    pub info: String,
    pub body: Vec<String>,
}

/// Collect every closed triple-backtick fence in the input. A fence left
/// open at end of input is dropped rather than guessed at.
pub(super) fn scan(raw: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<FencedBlock> = None;
    for line in raw.lines() {
        let trimmed = line.trim();
        match open.take() {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    open = Some(FencedBlock {
                        info: info.trim().to_string(),
                        body: Vec::new(),
                    });
                }
            }
            Some(mut block) => {
                if trimmed == "```" {
                    blocks.push(block);
                } else {
                    block.body.push(line.to_string());
                    open = Some(block);
                }
            }
        }
    }
    blocks
}

/// Extract files from fences whose info string names one: the first
/// whitespace-separated token containing a dot is taken as the path, so
/// both ```` ```rust src/main.rs ```` and ```` ```src/main.rs ```` work.
pub fn extract(raw: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    for block in scan(raw) {
        let Some(token) = filename_token(&block.info) else {
            continue;
        };
        let path = match validate_path_strict(token) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(path = token, %err, "dropping fenced block");
                continue;
            }
        };
        let content = body_text(&block.body);
        if content.trim().is_empty() {
            tracing::debug!(%path, "dropping fenced block with blank body");
            continue;
        }
        out.push(Candidate::new(path, content));
    }
    out
}

fn filename_token(info: &str) -> Option<&str> {
    info.split_whitespace()
        .map(|tok| tok.trim_matches(['`', '"', '\'', ',', '(', ')']))
        .find(|tok| tok.contains('.'))
}

/// Join the body, shaving at most one blank padding line off each end.
pub(super) fn body_text(body: &[String]) -> String {
    let mut lines: &[String] = body;
    if lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines = &lines[1..];
    }
    if lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines = &lines[..lines.len() - 1];
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_named_fences() {
        let raw = "Here you go:\n```rust src/main.rs\nfn main() {}\n```\nand the manifest:\n```toml Cargo.toml\n[package]\n```\n";
        let got = extract(raw);
        assert_eq!(
            got,
            vec![
                Candidate::new("src/main.rs", "fn main() {}"),
                Candidate::new("Cargo.toml", "[package]"),
            ]
        );
    }

    #[test]
    fn info_without_language_still_names_a_file() {
        let raw = "```src/App.kt\nclass App\n```\n";
        let got = extract(raw);
        assert_eq!(got, vec![Candidate::new("src/App.kt", "class App")]);
    }

    #[test]
    fn backticked_token_is_unwrapped() {
        let raw = "```python `app/main.py`\nprint(1)\n```\n";
        let got = extract(raw);
        assert_eq!(got[0].path, "app/main.py");
    }

    #[test]
    fn language_only_fence_is_not_a_file() {
        let raw = "```rust\nfn main() {}\n```\n";
        assert!(extract(raw).is_empty());
    }

    #[test]
    fn invalid_path_token_skips_the_block() {
        let raw = "```sh ../../evil.sh\nrm -rf /\n```\n```txt ok.txt\nfine\n```\n";
        let got = extract(raw);
        assert_eq!(got, vec![Candidate::new("ok.txt", "fine")]);
    }

    #[test]
    fn unclosed_fence_is_dropped() {
        let raw = "```rust src/main.rs\nfn main() {}\n";
        assert!(extract(raw).is_empty());
    }

    #[test]
    fn body_keeps_interior_blanks_but_sheds_padding() {
        let raw = "```py a.py\n\nx = 1\n\ny = 2\n\n```\n";
        let got = extract(raw);
        assert_eq!(got[0].content, "x = 1\n\ny = 2");
    }

    #[test]
    fn blank_fence_is_dropped() {
        let raw = "```txt empty.txt\n\n```\n";
        assert!(extract(raw).is_empty());
    }
}
