//! Transcript sources.
//!
//! The yt-dlp source downloads caption tracks as WebVTT and parses the
//! cues into timestamped segments.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use clipmine_models::{Transcript, TranscriptSegment};
use regex::Regex;
use tracing::{info, warn};

use crate::error::{WorkerError, WorkerResult};

static CUE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\d+:)?\d{2}:\d{2}\.\d{3})\s+-->\s+((?:\d+:)?\d{2}:\d{2}\.\d{3})")
        .expect("valid cue timing regex")
});

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Supplies the transcript for a media item.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, media_url: &str) -> WorkerResult<Transcript>;
}

/// Caption download through the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpTranscriptSource {
    work_dir: PathBuf,
    binary: String,
    timeout: Duration,
}

impl YtDlpTranscriptSource {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            binary: "yt-dlp".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Use a different executable (tests, pinned installs).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TranscriptSource for YtDlpTranscriptSource {
    async fn fetch(&self, media_url: &str) -> WorkerResult<Transcript> {
        info!("Fetching transcript for {} using yt-dlp", media_url);

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let scratch = tempfile::Builder::new()
            .prefix("captions-")
            .tempdir_in(&self.work_dir)?;

        let output_template = scratch.path().join("%(id)s").to_string_lossy().into_owned();
        let args = [
            "--write-auto-sub",
            "--write-sub",
            "--sub-lang",
            "en,en-US,en-GB",
            "--sub-format",
            "vtt",
            "--skip-download",
            "--no-simulate",
            "--print",
            "duration",
            "--no-playlist",
            "--output",
            output_template.as_str(),
            media_url,
        ];

        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.binary)
                .args(args)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            WorkerError::transcript_failed(format!("yt-dlp timed out after {:?}", self.timeout))
        })?
        .map_err(|e| WorkerError::transcript_failed(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WorkerError::transcript_failed(format!(
                "yt-dlp failed to download captions: {}",
                stderr.trim()
            )));
        }

        let duration = parse_reported_duration(&String::from_utf8_lossy(&output.stdout));
        if duration.is_none() {
            warn!("yt-dlp did not report a media duration");
        }

        let vtt_path = find_caption_file(scratch.path()).ok_or_else(|| {
            WorkerError::NoCaptions("no caption track was downloaded".to_string())
        })?;
        let content = tokio::fs::read_to_string(&vtt_path).await?;

        let segments = parse_vtt(&content);
        if segments.is_empty() {
            return Err(WorkerError::NoCaptions(
                "caption track contained no cues".to_string(),
            ));
        }

        info!(segments = segments.len(), "Parsed caption track");
        Ok(Transcript::new(segments, duration))
    }
}

/// Last numeric stdout line, as printed by `--print duration`.
fn parse_reported_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Pick the downloaded caption file, preferring English tracks.
fn find_caption_file(dir: &Path) -> Option<PathBuf> {
    let mut vtt_files: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("vtt"))
        .collect();

    vtt_files.sort_by_key(|path| {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        (!name.is_some_and(|n| n.contains(".en")), path.clone())
    });
    vtt_files.into_iter().next()
}

/// Parse a WebVTT cue timestamp (`MM:SS.mmm` or `H:MM:SS.mmm`).
fn parse_vtt_time(ts: &str) -> Option<f64> {
    let mut seconds = 0.0;
    for part in ts.split(':') {
        seconds = seconds * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(seconds)
}

fn clean_cue_line(line: &str) -> String {
    MARKUP_TAG
        .replace_all(line, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Parse WebVTT content into ordered transcript segments.
///
/// Auto-generated tracks repeat the previous line at the top of each
/// cue; a line identical to the last emitted line is dropped, and cues
/// left without text are skipped.
pub fn parse_vtt(content: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut last_line = String::new();
    let mut cue: Option<(f64, f64, Vec<String>)> = None;

    let mut flush = |cue: &mut Option<(f64, f64, Vec<String>)>| {
        if let Some((start, end, lines)) = cue.take() {
            if !lines.is_empty() {
                segments.push(TranscriptSegment::new(
                    lines.join(" "),
                    start,
                    (end - start).max(0.0),
                ));
            }
        }
    };

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            flush(&mut cue);
            continue;
        }

        if let Some(caps) = CUE_TIMING.captures(line) {
            flush(&mut cue);
            if let (Some(start), Some(end)) = (parse_vtt_time(&caps[1]), parse_vtt_time(&caps[2])) {
                cue = Some((start, end, Vec::new()));
            }
            continue;
        }

        // Header, NOTE blocks and cue identifiers sit outside a cue.
        let Some((_, _, lines)) = cue.as_mut() else {
            continue;
        };

        let text = clean_cue_line(line);
        if text.is_empty() || text == last_line {
            continue;
        }
        last_line = text.clone();
        lines.push(text);
    }
    flush(&mut cue);

    segments
}
