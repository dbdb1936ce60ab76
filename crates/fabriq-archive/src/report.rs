/// What a build wrote, what it skipped, and how well it compressed.
#[derive(Clone, Debug, Default)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub dir_count: usize,
    /// Uncompressed payload bytes.
    pub total_bytes: u64,
    /// Final size of the archive stream.
    pub compressed_bytes: u64,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Clone, Debug)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

impl ArchiveReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Compressed size as a fraction of the payload, when there is one.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            None
        } else {
            Some(self.compressed_bytes as f64 / self.total_bytes as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_has_no_skips() {
        let report = ArchiveReport {
            entry_count: 3,
            dir_count: 1,
            total_bytes: 2048,
            compressed_bytes: 512,
            skipped: Vec::new(),
        };
        assert!(report.is_clean());
        assert_eq!(report.compression_ratio(), Some(0.25));
    }

    #[test]
    fn skips_mark_report_dirty() {
        let report = ArchiveReport {
            skipped: vec![SkippedEntry {
                path: "a.txt".to_string(),
                reason: "unreadable".to_string(),
            }],
            ..ArchiveReport::default()
        };
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_payload_has_no_ratio() {
        assert_eq!(ArchiveReport::default().compression_ratio(), None);
    }
}
