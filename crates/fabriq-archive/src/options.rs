use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use time::OffsetDateTime;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

#[derive(Clone, Default)]
pub struct BuildOptions {
    pub compression: CompressionLevel,
    /// Skip the root-label prefix so entries sit at the archive top level.
    pub flat: bool,
    /// Fixed modification time stamped on every entry. Without one, entries
    /// built from a structure get the zip default and entries built from a
    /// directory keep their on-disk mtime.
    pub timestamp: Option<OffsetDateTime>,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl BuildOptions {
    pub fn compression(mut self, level: CompressionLevel) -> Self {
        self.compression = level;
        self
    }

    pub fn flat(mut self) -> Self {
        self.flat = true;
        self
    }

    pub fn timestamp(mut self, ts: OffsetDateTime) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub entries_done: usize,
    /// Known up front when building from a structure; a directory walk
    /// discovers entries as it goes.
    pub entries_total: Option<usize>,
    pub bytes_written: u64,
    pub current_file: Option<String>,
}

impl Progress {
    pub fn percentage(&self) -> Option<f32> {
        self.entries_total.map(|total| {
            if total == 0 {
                0.0
            } else {
                (self.entries_done as f32 / total as f32) * 100.0
            }
        })
    }
}

/// Deflate effort, or no compression at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    Stored,
    Fast,
    #[default]
    Balanced,
    Best,
}

impl CompressionLevel {
    pub(crate) fn file_options(self) -> SimpleFileOptions {
        let (method, level) = match self {
            Self::Stored => (CompressionMethod::Stored, None),
            Self::Fast => (CompressionMethod::Deflated, Some(1)),
            Self::Balanced => (CompressionMethod::Deflated, Some(6)),
            Self::Best => (CompressionMethod::Deflated, Some(9)),
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level)
    }
}
