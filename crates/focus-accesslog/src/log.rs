// log.rs — The raw artifact access trace.
//
// Plain text, one `group:artifact:extension:version` line per lookup, in
// arrival order. Duplicates are the point: the file answers "how often was
// this looked up", not "what does the build need".
//
// Every append opens the file, issues a single write of the full line and
// closes it again. No handle is kept between calls, so several lookups (or
// several builds sharing one local repository) can append concurrently
// without a lock and without tearing lines.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use focus_core::ArtifactCoordinate;

use crate::error::AccessLogError;
use crate::manager::LocalRepository;

/// File name of the trace, placed in the local repository's base directory.
pub const ACCESS_LOG_FILE_NAME: &str = "artifact-request.log";

/// How often one coordinate was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCount {
    pub key: String,
    pub count: usize,
}

/// Append-only access trace backed by a text file.
#[derive(Debug, Clone)]
pub struct AccessLog {
    path: PathBuf,
}

impl AccessLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The trace for a local repository: `<basedir>/artifact-request.log`.
    pub fn for_repository(repository: &LocalRepository) -> Self {
        Self::new(repository.basedir.join(ACCESS_LOG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one lookup of `coordinate`.
    pub fn append(&self, coordinate: &ArtifactCoordinate) -> Result<(), AccessLogError> {
        let line = format!("{}\n", coordinate.access_key());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| self.io_error(source))
    }

    /// Every recorded lookup, oldest first. A missing file is empty.
    pub fn entries(&self) -> Result<Vec<String>, AccessLogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Lookup counts per coordinate, most requested first (ties by key).
    pub fn summary(&self) -> Result<Vec<AccessCount>, AccessLogError> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for entry in self.entries()? {
            *counts.entry(entry).or_default() += 1;
        }
        let mut summary: Vec<AccessCount> = counts
            .into_iter()
            .map(|(key, count)| AccessCount { key, count })
            .collect();
        summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        Ok(summary)
    }

    fn io_error(&self, source: io::Error) -> AccessLogError {
        AccessLogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
