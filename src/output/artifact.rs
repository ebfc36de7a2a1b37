//! Artifact writer
//!
//! Every written document becomes one `.txt` file in a flat directory, named
//! `{target}_{path segments}_{millis}.txt`. Stamps are allocated under a lock
//! so they strictly increase across the whole run, and files are opened with
//! `create_new`, so an existing artifact is never overwritten.

use crate::config::CrawlTarget;
use crate::output::ExtractedDocument;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

/// Longest path component kept in a file name (in characters)
const MAX_PATH_COMPONENT_CHARS: usize = 120;

/// Attempts with a fresh stamp before giving up on `AlreadyExists`
const MAX_CREATE_ATTEMPTS: usize = 16;

/// Persists documents into the output directory
#[derive(Debug)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    last_stamp: Mutex<i64>,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            last_stamp: Mutex::new(0),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `document` for `url` and returns the new file's path
    pub fn write(
        &self,
        target: &CrawlTarget,
        url: &Url,
        document: &ExtractedDocument,
    ) -> io::Result<PathBuf> {
        let content = document.render();

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let file_name = artifact_file_name(&target.name, url, self.next_stamp());
            let path = self.output_dir.join(&file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_discard(&path, file, content.as_bytes())?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!("Artifact {} already exists, retrying", file_name);
                }
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("could not find a free artifact name for {}", url),
        ))
    }

    /// Current time in milliseconds, bumped past the previous stamp if needed
    fn next_stamp(&self) -> i64 {
        let mut last = self
            .last_stamp
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stamp = Utc::now().timestamp_millis().max(*last + 1);
        *last = stamp;
        stamp
    }
}

/// Writes `content` into the freshly created file at `path`
///
/// A failed write removes the file, so a truncated artifact is never left in
/// the output directory.
fn write_or_discard(path: &Path, mut sink: impl Write, content: &[u8]) -> io::Result<()> {
    let result = sink.write_all(content).and_then(|()| sink.flush());
    drop(sink);

    if let Err(e) = result {
        if let Err(remove_err) = std::fs::remove_file(path) {
            tracing::warn!(
                "Could not remove partial artifact {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e);
    }
    Ok(())
}

/// Builds `{sanitized target}_{path segments}_{stamp}.txt`
///
/// The root path yields an empty middle component, e.g. `Docs__1700000000000.txt`.
pub fn artifact_file_name(target_name: &str, url: &Url, stamp: i64) -> String {
    format!(
        "{}_{}_{}.txt",
        sanitize_target_name(target_name),
        path_component(url),
        stamp
    )
}

/// Replaces whitespace runs with `_` and anything else unsafe with `_`
pub fn sanitize_target_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    sanitize(&joined)
}

/// Non-empty path segments joined with `_`, sanitized and truncated
pub fn path_component(url: &Url) -> String {
    let joined = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    sanitize(&joined)
        .chars()
        .take(MAX_PATH_COMPONENT_CHARS)
        .collect()
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
