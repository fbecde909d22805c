//! Append-only JSONL header log.
//!
//! Each line is one [`HeaderRow`]. The whole log is replayed into memory on
//! open; reads are served from memory and a `put` appends and syncs the line
//! before the header becomes visible.
//!
//! An unterminated last line is a crash mid-append, never acknowledged to the
//! caller, and is cut off on open. Any other unreadable or repeated row fails
//! the open with `ConstraintViolation`.
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use header_primitives::{BlockHash, BlockNumber, Head, Header, InvalidHeaderError};
use tracing::{debug, warn};

use super::HeaderStore;
use super::index::Index;
use super::row::HeaderRow;
use crate::error::StoreError;

struct Log {
    file: File,
    index: Index,
}

pub struct FileStore {
    path: PathBuf,
    log: RwLock<Log>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let p = path.as_ref().to_path_buf();
        if let Some(dir) = p.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&p)?;
        let Replay { index, torn_at } = replay(&p)?;
        if let Some(len) = torn_at {
            warn!(path = %p.display(), len, "truncating torn trailing header row");
            file.set_len(len)?;
            file.sync_all()?;
        }
        debug!(path = %p.display(), headers = index.len(), "opened header log");
        Ok(FileStore {
            path: p,
            log: RwLock::new(Log { file, index }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_row(log: &mut Log, row: &HeaderRow) -> Result<(), StoreError> {
        let mut line = row.encode()?;
        line.push(b'\n');
        log.file.write_all(&line)?;
        log.file.sync_data()?;
        Ok(())
    }
}

struct Replay {
    index: Index,
    /// Length to cut the file back to when its last line is unterminated.
    torn_at: Option<u64>,
}

fn corrupt_line(path: &Path, line_no: usize, reason: impl std::fmt::Display) -> StoreError {
    InvalidHeaderError::Malformed {
        field: "row",
        reason: format!("{} line {line_no}: {reason}", path.display()),
    }
    .into()
}

fn replay(path: &Path) -> Result<Replay, StoreError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut index = Index::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut offset = 0u64;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if buf.last() != Some(&b'\n') {
            return Ok(Replay {
                index,
                torn_at: Some(offset),
            });
        }
        offset += read as u64;

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let row = HeaderRow::decode(line).map_err(|e| corrupt_line(path, line_no, e))?;
        let header = Header::try_from(&row).map_err(|e| corrupt_line(path, line_no, e))?;
        if let Err(StoreError::DuplicateKey(hash)) = index.insert(header) {
            return Err(corrupt_line(path, line_no, format!("repeats header {hash:#x}")));
        }
    }

    Ok(Replay {
        index,
        torn_at: None,
    })
}

impl HeaderStore for FileStore {
    fn put(&self, header: &Header) -> Result<(), StoreError> {
        let mut guard = self.log.write()?;
        let log = &mut *guard;
        if log.index.contains(&header.hash) {
            return Err(StoreError::DuplicateKey(header.hash));
        }
        Self::append_row(log, &HeaderRow::from(header))?;
        log.index.insert(header.clone())?;
        debug!(hash = ?header.hash, number = header.number, "appended header");
        Ok(())
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Header, StoreError> {
        self.log.read()?.index.get(hash)
    }

    fn list_by_height(
        &self,
        number: BlockNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Header>, StoreError> {
        Ok(self.log.read()?.index.at_height(number, limit))
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        Ok(self.log.read()?.index.contains(hash))
    }

    fn head(&self) -> Result<Option<Head>, StoreError> {
        Ok(self.log.read()?.index.head())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::store::fixtures::sample_header;

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/headers.jsonl");
        let store = FileStore::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.head().unwrap(), None);
    }

    #[test]
    fn test_reopen_replays_log_in_commit_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.jsonl");
        {
            let store = FileStore::new(&path).unwrap();
            store.put(&sample_header(1, 9)).unwrap();
            store.put(&sample_header(2, 9)).unwrap();
            store.put(&sample_header(3, 8)).unwrap();
        }

        let store = FileStore::new(&path).unwrap();
        let forks = store.list_by_height(9, None).unwrap();
        assert_eq!(forks, vec![sample_header(1, 9), sample_header(2, 9)]);
        assert_eq!(store.head().unwrap().unwrap().hash, sample_header(2, 9).hash);
        assert!(matches!(
            store.put(&sample_header(3, 8)),
            Err(StoreError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_torn_trailing_line_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.jsonl");
        {
            let store = FileStore::new(&path).unwrap();
            store.put(&sample_header(1, 1)).unwrap();
        }
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"hash\":\"0xaa").unwrap();
        drop(file);

        let store = FileStore::new(&path).unwrap();
        assert!(store.exists(&sample_header(1, 1).hash).unwrap());
        store.put(&sample_header(2, 2)).unwrap();

        let reopened = FileStore::new(&path).unwrap();
        assert_eq!(
            reopened.get_by_hash(&sample_header(2, 2).hash).unwrap(),
            sample_header(2, 2)
        );
        let lines = fs::read_to_string(&path).unwrap();
        assert_eq!(lines.lines().count(), 2);
    }

    #[test]
    fn test_corrupt_middle_row_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.jsonl");
        {
            let store = FileStore::new(&path).unwrap();
            for seed in 1..=3 {
                store.put(&sample_header(seed, seed)).unwrap();
            }
        }
        let log = fs::read_to_string(&path).unwrap();
        let mut lines: Vec<String> = log.lines().map(str::to_owned).collect();
        let mut row: HeaderRow = serde_json::from_str(&lines[1]).unwrap();
        row.difficulty = "x".repeat(8);
        lines[1] = serde_json::to_string(&row).unwrap();
        let corrupted = lines.join("\n") + "\n";
        fs::write(&path, &corrupted).unwrap();

        let err = FileStore::new(&path).err().unwrap();
        assert!(matches!(
            &err,
            StoreError::ConstraintViolation(InvalidHeaderError::Malformed { field: "row", reason })
                if reason.contains("line 2")
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), corrupted);
    }

    #[test]
    fn test_repeated_hash_in_log_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.jsonl");
        {
            let store = FileStore::new(&path).unwrap();
            store.put(&sample_header(1, 1)).unwrap();
        }
        let line = fs::read_to_string(&path).unwrap();
        fs::write(&path, line.repeat(2)).unwrap();

        assert!(matches!(
            FileStore::new(&path),
            Err(StoreError::ConstraintViolation(_))
        ));
    }
}
