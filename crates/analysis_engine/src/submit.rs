use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::types::map_reqwest_kind;
use crate::{EngineConfig, EngineEvent, FailureKind, JobFailure, JobGeneration};

/// Share of the progress bar covered by the upload itself; the rest is
/// reached when the service answers.
const UPLOAD_PROGRESS_SHARE: u64 = 90;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Uploads `files` and returns the analysis payload.
    async fn submit(
        &self,
        generation: JobGeneration,
        files: &[PathBuf],
        sink: Arc<dyn ProgressSink>,
    ) -> Result<serde_json::Value, JobFailure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    client: reqwest::Client,
    url: Url,
    field: String,
    chunk_bytes: usize,
}

impl ReqwestSubmitter {
    pub fn new(config: &EngineConfig) -> Result<Self, JobFailure> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.submit_timeout)
            .build()
            .map_err(|err| JobFailure::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            url: config.upload_url(),
            field: config.upload_field.clone(),
            chunk_bytes: config.upload_chunk_bytes.max(1),
        })
    }

    fn build_form(
        &self,
        sources: Vec<Source>,
        tracker: &Arc<UploadTracker>,
    ) -> Result<Form, JobFailure> {
        let mut form = Form::new();
        for Source { path, file, len } in sources {
            let tracker = tracker.clone();
            // Bytes are counted as the transport pulls them off disk.
            let chunks = ReaderStream::with_capacity(file, self.chunk_bytes).inspect(move |chunk| {
                if let Ok(bytes) = chunk {
                    tracker.advance(bytes.len() as u64);
                }
            });
            let part = Part::stream_with_length(reqwest::Body::wrap_stream(chunks), len)
                .file_name(file_name(&path))
                .mime_str(mime_for(&path))
                .map_err(|err| JobFailure::new(FailureKind::Io, err.to_string()))?;
            form = form.part(self.field.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        generation: JobGeneration,
        files: &[PathBuf],
        sink: Arc<dyn ProgressSink>,
    ) -> Result<serde_json::Value, JobFailure> {
        if files.is_empty() {
            return Err(JobFailure::new(FailureKind::Io, "no files to upload"));
        }

        let sources = open_all(files).await?;
        let total: u64 = sources.iter().map(|source| source.len).sum();
        let tracker = Arc::new(UploadTracker::new(generation, total, sink));
        let form = self.build_form(sources, &tracker)?;

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(JobFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                error_message(&body).unwrap_or_else(|| status.to_string()),
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|err| JobFailure::new(FailureKind::Malformed, err.to_string()))
    }
}

/// Error body returned by the analysis service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match (parsed.error, parsed.detail) {
        (Some(error), Some(detail)) => Some(format!("{error}: {detail}")),
        (Some(message), None) | (None, Some(message)) => Some(message),
        (None, None) => None,
    }
}

/// Converts bytes handed to the transport into monotonic percentages.
struct UploadTracker {
    generation: JobGeneration,
    total: u64,
    sent: AtomicU64,
    last_percent: AtomicU8,
    sink: Arc<dyn ProgressSink>,
}

impl UploadTracker {
    fn new(generation: JobGeneration, total: u64, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            generation,
            total,
            sent: AtomicU64::new(0),
            last_percent: AtomicU8::new(0),
            sink,
        }
    }

    fn advance(&self, bytes: u64) {
        if self.total == 0 {
            return;
        }
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let percent = (sent.min(self.total) * UPLOAD_PROGRESS_SHARE / self.total) as u8;
        let previous = self.last_percent.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            self.sink.emit(EngineEvent::JobProgress {
                generation: self.generation,
                percent,
            });
        }
    }
}

/// An opened upload part whose length is known before the request starts.
struct Source {
    path: PathBuf,
    file: File,
    len: u64,
}

/// Opens every file up front so a missing one fails before any request.
async fn open_all(files: &[PathBuf]) -> Result<Vec<Source>, JobFailure> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let file = File::open(path).await.map_err(|err| io_failure(path, err))?;
        let metadata = file.metadata().await.map_err(|err| io_failure(path, err))?;
        sources.push(Source {
            path: path.clone(),
            file,
            len: metadata.len(),
        });
    }
    Ok(sources)
}

fn io_failure(path: &Path, err: std::io::Error) -> JobFailure {
    JobFailure::new(FailureKind::Io, format!("{}: {err}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

fn map_reqwest_error(err: reqwest::Error) -> JobFailure {
    JobFailure::new(map_reqwest_kind(&err), err.to_string())
}
