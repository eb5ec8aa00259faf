use std::fmt;
use std::path::PathBuf;

/// Generation counter of a submission; bumped on every accepted submit.
pub type JobGeneration = u64;

/// A file chosen by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }

    /// File name without directories, for display.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Result payload returned by the analysis service, kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPayload(pub serde_json::Value);

impl AnalysisPayload {
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobErrorKind {
    /// The service refused the upload (4xx).
    Rejected,
    /// The service failed while processing (5xx).
    Processing,
    Timeout,
    Transport,
    /// A 2xx response whose body could not be understood.
    Malformed,
    /// Local files could not be read.
    Io,
}

/// Error descriptor of a failed job. Never stored in `result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    pub kind: JobErrorKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: JobErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    FilesSelected,
    Submitting,
    Succeeded,
    Failed,
}
