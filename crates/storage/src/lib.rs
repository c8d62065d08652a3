//! Storage layer: the CSV-backed show dataset.
//!
//! Holds the record model, the fixed column schema and the file store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod dataset;
pub mod models;

pub use dataset::{Dataset, COLUMNS};
pub use models::{ScoreError, Scores, ShowRecord, WatchStatus, SCORE_NAMES};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("invalid value {value:?} in column {column}")]
    InvalidValue { column: String, value: String },
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("could not persist {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Dataset persisted as a single CSV file. Every mutation rewrites the whole file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or empty file yields an empty dataset with the default schema.
    pub fn load(&self) -> Result<Dataset, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Dataset::default());
            }
            Err(e) => return Err(e.into()),
        };
        Dataset::read_csv(file)
    }

    pub fn append(&self, record: ShowRecord) -> Result<Dataset, StorageError> {
        let mut dataset = self.load()?;
        info!("appending '{}' to {}", record.title, self.path.display());
        dataset.push(record);
        self.persist(&dataset)?;
        Ok(dataset)
    }

    /// Wholesale import. The upload is parsed before anything is written, so a
    /// malformed file leaves the current dataset in place.
    pub fn replace(&self, bytes: &[u8]) -> Result<Dataset, StorageError> {
        let dataset = Dataset::read_csv(bytes)?;
        info!(
            "replacing {} with {} imported rows",
            self.path.display(),
            dataset.len()
        );
        self.persist(&dataset)?;
        Ok(dataset)
    }

    pub fn export(&self) -> Result<String, StorageError> {
        self.load()?.to_csv_string()
    }

    fn persist(&self, dataset: &Dataset) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        dataset.write_csv(tmp.as_file_mut())?;
        tmp.as_file_mut().flush()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        debug!("wrote {} rows to {}", dataset.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(title: &str, scores: [f64; 7]) -> ShowRecord {
        ShowRecord::new(title, Scores::new(scores).unwrap())
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("tv_tracker.csv"));
        let ds = store.load().unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.columns().len(), COLUMNS.len());
    }

    #[test]
    fn empty_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tv_tracker.csv");
        fs::write(&path, "").unwrap();
        assert!(RecordStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn appended_rows_survive_reload() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested").join("tv_tracker.csv"));
        let titles = ["Chuck", "Chuck", "Lost", "Fringe", "Dark"];
        for (i, title) in titles.iter().enumerate() {
            let mut rec = record(title, [i as f64; 7]);
            rec.genre = "Drama, Sci-Fi".into();
            rec.status = WatchStatus::Ongoing;
            let ds = store.append(rec).unwrap();
            assert_eq!(ds.len(), i + 1);
        }
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), titles.len());
        for (rec, (i, title)) in reloaded.records.iter().zip(titles.iter().enumerate()) {
            assert_eq!(rec.title, *title);
            assert_eq!(rec.genre, "Drama, Sci-Fi");
            assert_eq!(rec.status, WatchStatus::Ongoing);
            assert_eq!(rec.avg_score(), i as f64);
        }
    }

    #[test]
    fn padded_text_reloads_unchanged() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("tv_tracker.csv"));
        let mut rec = record(" Chuck", [8.0, 7.0, 9.0, 6.0, 8.0, 7.0, 9.0]);
        rec.genre = "Action, Comedy ".into();
        rec.notes = "  indented note ".into();
        rec.favorite_character = " Morgan".into();
        store.append(rec.clone()).unwrap();

        let back = store.load().unwrap();
        assert_eq!(back.records, vec![rec]);
    }

    #[test]
    fn chuck_row_is_persisted_with_average() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tv_tracker.csv");
        let store = RecordStore::new(&path);
        store
            .append(record("Chuck", [8.0, 7.0, 9.0, 6.0, 8.0, 7.0, 9.0]))
            .unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        let avg_idx = headers.iter().position(|h| h == "Avg Score").unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Chuck");
        assert_eq!(&rows[0][avg_idx], "7.71");
    }

    #[test]
    fn replace_discards_previous_rows() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("tv_tracker.csv"));
        store.append(record("Old Show", [5.0; 7])).unwrap();

        let upload = "Title,Story,Acting,Characters,Visuals,Pacing,Soundtrack,Rewatchability\n\
                      New A,1,1,1,1,1,1,1\n\
                      New B,2,2,2,2,2,2,2\n";
        let ds = store.replace(upload.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);

        let titles: Vec<String> = store.load().unwrap().records.into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["New A".to_string(), "New B".to_string()]);
    }

    #[test]
    fn malformed_upload_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("tv_tracker.csv"));
        store.append(record("Keep Me", [5.0; 7])).unwrap();

        let err = store.replace(b"Name,Rating\nFoo,3\n").unwrap_err();
        assert!(matches!(err, StorageError::MissingColumn(_)));
        assert_eq!(store.load().unwrap().records[0].title, "Keep Me");
    }

    #[test]
    fn export_matches_file_schema() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("tv_tracker.csv"));
        assert_eq!(store.export().unwrap().lines().count(), 1);
        store.append(record("Chuck", [8.0; 7])).unwrap();
        let text = store.export().unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text, fs::read_to_string(store.path()).unwrap());
    }
}
