// store.rs — BillStore: the persisted record of artifacts touched by a build.
//
// The bill is a plain text file: one canonical coordinate per line, UTF-8,
// sorted ascending, no duplicates, newline-terminated. Recording merges the
// new coordinates with whatever the file already holds and rewrites it in
// sorted order, so recording the same input again leaves the file as is.
//
// The rewrite goes through a sibling temp file plus rename so a reader never
// sees a half-written bill.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use focus_core::ArtifactCoordinate;

use crate::error::BillError;

/// File name of the bill, placed next to the build output directory.
pub const BILL_FILE_NAME: &str = "recording.txt";

/// Reads and writes one bill file.
#[derive(Debug, Clone)]
pub struct BillStore {
    path: PathBuf,
}

impl BillStore {
    /// A store backed by the given file (created on first record).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The bill for a build whose compiled output lands in `output_dir`:
    /// `<parent of output_dir>/recording.txt`.
    pub fn for_build_output(output_dir: &Path) -> Self {
        let base = output_dir.parent().unwrap_or(output_dir);
        Self::new(base.join(BILL_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `coordinates` into the bill and return the number of distinct
    /// entries it now holds.
    pub fn record<'a>(
        &self,
        coordinates: impl IntoIterator<Item = &'a ArtifactCoordinate>,
    ) -> Result<usize, BillError> {
        let mut entries: BTreeSet<String> = self.read_lines()?.into_iter().collect();
        entries.extend(coordinates.into_iter().map(ToString::to_string));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(parent, source))?;
        }

        let content = render(&entries);
        let tmp = self.path.with_extension("txt.tmp");
        fs::write(&tmp, content).map_err(|source| self.io_error(&tmp, source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(&self.path, source))?;

        tracing::info!(
            "Bill written (count={}): {}",
            entries.len(),
            self.path.display()
        );
        Ok(entries.len())
    }

    /// Entries as stored, deduplicated and sorted. A missing file is empty.
    pub fn read_lines(&self) -> Result<Vec<String>, BillError> {
        let entries: BTreeSet<String> = self
            .raw_lines()?
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(entries.into_iter().collect())
    }

    /// Lines exactly as they appear in the file, in file order.
    pub fn raw_lines(&self) -> Result<Vec<String>, BillError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(self.io_error(&self.path, source)),
        }
    }

    /// Parse every entry. Fails on the first malformed line.
    pub fn read(&self) -> Result<Vec<ArtifactCoordinate>, BillError> {
        self.read_lines()?
            .iter()
            .enumerate()
            .map(|(i, line)| {
                line.parse::<ArtifactCoordinate>()
                    .map_err(|source| BillError::BadEntry {
                        path: self.path.clone(),
                        line: i + 1,
                        source,
                    })
            })
            .collect()
    }

    /// SHA-256 (lowercase hex) of the canonical bill content.
    ///
    /// Two bills holding the same set of entries have the same digest no
    /// matter how their files were laid out.
    pub fn digest(&self) -> Result<String, BillError> {
        let entries: BTreeSet<String> = self.read_lines()?.into_iter().collect();
        let mut hasher = Sha256::new();
        hasher.update(render(&entries).as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn io_error(&self, path: &Path, source: io::Error) -> BillError {
        BillError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn render(entries: &BTreeSet<String>) -> String {
    let mut content = String::new();
    for entry in entries {
        content.push_str(entry);
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn coord(s: &str) -> ArtifactCoordinate {
        s.parse().unwrap()
    }

    #[test]
    fn duplicates_collapse_to_one_line() {
        let dir = tempdir().unwrap();
        let store = BillStore::new(dir.path().join(BILL_FILE_NAME));

        let lib = coord("com.acme:lib:jar:1.0");
        let other = coord("com.acme:other:jar:2.0");
        let total = store.record([&lib, &lib, &other]).unwrap();

        assert_eq!(total, 2);
        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "com.acme:lib:jar:1.0\ncom.acme:other:jar:2.0\n");
    }

    #[test]
    fn output_is_sorted_regardless_of_input_order() {
        let dir = tempdir().unwrap();
        let store = BillStore::new(dir.path().join(BILL_FILE_NAME));

        let a = coord("a.b:x:jar:1");
        let b = coord("a.b:y:pom:1");
        let c = coord("z.z:z:jar:9");
        store.record([&c, &a, &b, &a]).unwrap();

        assert_eq!(
            store.read_lines().unwrap(),
            vec!["a.b:x:jar:1", "a.b:y:pom:1", "z.z:z:jar:9"]
        );
    }

    #[test]
    fn recording_again_only_adds_new_entries() {
        let dir = tempdir().unwrap();
        let store = BillStore::new(dir.path().join(BILL_FILE_NAME));

        let lib = coord("com.acme:lib:jar:1.0");
        let new = coord("com.acme:new:jar:1.0");
        store.record([&lib]).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();

        store.record([&lib]).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), first);

        assert_eq!(store.record([&new, &lib]).unwrap(), 2);
        assert_eq!(
            store.raw_lines().unwrap(),
            vec!["com.acme:lib:jar:1.0", "com.acme:new:jar:1.0"]
        );
    }

    #[test]
    fn read_back_returns_what_was_written() {
        let dir = tempdir().unwrap();
        let store = BillStore::new(dir.path().join("nested").join(BILL_FILE_NAME));

        let written = vec![
            coord("org.x:a:jar:1"),
            coord("org.x:b:jar:tests:1"),
            coord("org.x:c:pom:2"),
        ];
        store.record(written.iter()).unwrap();

        let mut read = store.read().unwrap();
        read.sort_by_key(|c| c.to_string());
        assert_eq!(read, written);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = BillStore::new(dir.path().join(BILL_FILE_NAME));
        assert!(store.read_lines().unwrap().is_empty());
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn hand_edited_file_is_deduplicated_on_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(BILL_FILE_NAME);
        fs::write(&path, "b:b:jar:1\n\na:a:jar:1\nb:b:jar:1\n").unwrap();

        let store = BillStore::new(&path);
        assert_eq!(store.read_lines().unwrap(), vec!["a:a:jar:1", "b:b:jar:1"]);
    }

    #[test]
    fn malformed_line_is_reported_with_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(BILL_FILE_NAME);
        fs::write(&path, "a:a:jar:1\nnot-a-coordinate\n").unwrap();

        let err = BillStore::new(&path).read().unwrap_err();
        assert!(matches!(err, BillError::BadEntry { line: 2, .. }));
    }

    #[test]
    fn bill_sits_next_to_output_directory() {
        let store = BillStore::for_build_output(Path::new("/work/project/target/classes"));
        assert_eq!(store.path(), Path::new("/work/project/target/recording.txt"));
    }

    #[test]
    fn digest_ignores_file_layout() {
        let dir = tempdir().unwrap();
        let messy = dir.path().join("messy.txt");
        fs::write(&messy, "b:b:jar:1\na:a:jar:1\nb:b:jar:1\n").unwrap();

        let clean = BillStore::new(dir.path().join(BILL_FILE_NAME));
        clean
            .record([&coord("a:a:jar:1"), &coord("b:b:jar:1")])
            .unwrap();

        let digest = clean.digest().unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, BillStore::new(&messy).digest().unwrap());
    }
}
