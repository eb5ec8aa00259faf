//! Checks a file selection before it reaches the core.
//!
//! The analysis service takes one video per approach (north, south, west,
//! east), so a selection is exactly four readable video files.

use std::fs;
use std::path::{Path, PathBuf};

use analysis_core::SelectedFile;
use thiserror::Error;

pub const REQUIRED_VIDEOS: usize = 4;
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Wrong number of files: expected {expected} videos (north, south, west, east), got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("Invalid video format: {0}")]
    InvalidFormat(String),
    #[error("Cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

pub fn validate_selection(paths: &[PathBuf]) -> Result<Vec<SelectedFile>, SelectionError> {
    if paths.len() != REQUIRED_VIDEOS {
        return Err(SelectionError::WrongCount {
            expected: REQUIRED_VIDEOS,
            actual: paths.len(),
        });
    }

    if let Some(bad) = paths.iter().find(|path| !has_video_extension(path)) {
        return Err(SelectionError::InvalidFormat(bad.display().to_string()));
    }

    paths
        .iter()
        .map(|path| {
            let unreadable = |reason: String| SelectionError::Unreadable {
                path: path.display().to_string(),
                reason,
            };
            let meta = fs::metadata(path).map_err(|err| unreadable(err.to_string()))?;
            if !meta.is_file() {
                return Err(unreadable("not a regular file".to_string()));
            }
            Ok(SelectedFile::new(path.clone(), meta.len()))
        })
        .collect()
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
