use crate::models::{Scores, ShowRecord, WatchStatus, SCORE_NAMES};
use crate::StorageError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Write};

pub const COL_TITLE: &str = "Title";
pub const COL_GENRE: &str = "Genre";
pub const COL_STATUS: &str = "Status";
pub const COL_IMDB_RATING: &str = "IMDb Rating";
pub const COL_YEARS: &str = "Years Aired";
pub const COL_STREAMING: &str = "Streaming";
pub const COL_PRODUCTION: &str = "Production";
pub const COL_RELEASED: &str = "Released";
pub const COL_AVG: &str = "Avg Score";
pub const COL_DATE_WATCHED: &str = "Date Watched";
pub const COL_FAVORITE: &str = "Favorite Character";
pub const COL_NOTES: &str = "Notes";

/// Fixed column schema of the persisted file, in order.
pub const COLUMNS: [&str; 19] = [
    COL_TITLE,
    COL_GENRE,
    COL_STATUS,
    COL_IMDB_RATING,
    COL_YEARS,
    COL_STREAMING,
    COL_PRODUCTION,
    COL_RELEASED,
    SCORE_NAMES[0],
    SCORE_NAMES[1],
    SCORE_NAMES[2],
    SCORE_NAMES[3],
    SCORE_NAMES[4],
    SCORE_NAMES[5],
    SCORE_NAMES[6],
    COL_AVG,
    COL_DATE_WATCHED,
    COL_FAVORITE,
    COL_NOTES,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<ShowRecord>,
}

impl Dataset {
    pub fn new(records: Vec<ShowRecord>) -> Self {
        Self { records }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: ShowRecord) {
        self.records.push(record);
    }

    /// Records ordered by average score, highest first. Ties keep insertion order.
    pub fn sorted_by_score(&self) -> Vec<&ShowRecord> {
        let mut rows: Vec<&ShowRecord> = self.records.iter().collect();
        rows.sort_by(|a, b| {
            b.avg_score()
                .partial_cmp(&a.avg_score())
                .unwrap_or(Ordering::Equal)
        });
        rows
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self, StorageError> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Ok(Self::default());
        }
        let index = ColumnIndex::new(&headers)?;
        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            records.push(index.parse(&row)?);
        }
        Ok(Self { records })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), StorageError> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(COLUMNS)?;
        for record in &self.records {
            wtr.write_record(to_row(record))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String, StorageError> {
        let mut buf: Vec<u8> = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn format_score(value: f64) -> String {
    format!("{}", value)
}

fn to_row(record: &ShowRecord) -> Vec<String> {
    let mut row = vec![
        record.title.clone(),
        record.genre.clone(),
        record.status.to_string(),
        record.imdb_rating.clone(),
        record.years_aired.clone(),
        record.streaming.clone(),
        record.production.clone(),
        record.released.clone(),
    ];
    row.extend(record.scores.values().iter().map(|v| format_score(*v)));
    row.push(format_score(record.avg_score()));
    row.push(
        record
            .date_watched
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
    );
    row.push(record.favorite_character.clone());
    row.push(record.notes.clone());
    row
}

/// Header-name lookup so column order in imported files does not matter.
struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self, StorageError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_string(), i))
            .collect();
        for required in std::iter::once(COL_TITLE).chain(SCORE_NAMES) {
            if !positions.contains_key(required) {
                return Err(StorageError::MissingColumn(required.to_string()));
            }
        }
        Ok(Self { positions })
    }

    /// Cell as stored. Text columns keep their whitespace.
    fn get<'r>(&self, row: &'r StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|i| row.get(*i))
            .unwrap_or("")
    }

    /// Trimmed cell, for values that get parsed.
    fn value<'r>(&self, row: &'r StringRecord, column: &str) -> &'r str {
        self.get(row, column).trim()
    }

    fn text(&self, row: &StringRecord, column: &str) -> String {
        self.get(row, column).to_string()
    }

    fn parse(&self, row: &StringRecord) -> Result<ShowRecord, StorageError> {
        let mut values = [0.0; 7];
        for (slot, name) in values.iter_mut().zip(SCORE_NAMES) {
            let raw = self.value(row, name);
            *slot = raw.parse::<f64>().map_err(|_| StorageError::InvalidValue {
                column: name.to_string(),
                value: raw.to_string(),
            })?;
        }
        let scores = Scores::new(values)?;

        let status_raw = self.value(row, COL_STATUS);
        let status: WatchStatus = status_raw.parse().map_err(|_| StorageError::InvalidValue {
            column: COL_STATUS.to_string(),
            value: status_raw.to_string(),
        })?;

        let date_raw = self.value(row, COL_DATE_WATCHED);
        let date_watched = if date_raw.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(date_raw, DATE_FORMAT).map_err(|_| {
                    StorageError::InvalidValue {
                        column: COL_DATE_WATCHED.to_string(),
                        value: date_raw.to_string(),
                    }
                })?,
            )
        };

        let mut record = ShowRecord::new(self.text(row, COL_TITLE), scores);
        record.genre = self.text(row, COL_GENRE);
        record.status = status;
        record.imdb_rating = self.text(row, COL_IMDB_RATING);
        record.years_aired = self.text(row, COL_YEARS);
        record.streaming = self.text(row, COL_STREAMING);
        record.production = self.text(row, COL_PRODUCTION);
        record.released = self.text(row, COL_RELEASED);
        record.date_watched = date_watched;
        record.favorite_character = self.text(row, COL_FAVORITE);
        record.notes = self.text(row, COL_NOTES);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, score: f64) -> ShowRecord {
        ShowRecord::new(title, Scores::new([score; 7]).unwrap())
    }

    #[test]
    fn header_row_matches_schema() {
        let csv = Dataset::default().to_csv_string().unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Title,Genre,Status,IMDb Rating,Years Aired"));
        assert!(csv.trim_end().ends_with("Avg Score,Date Watched,Favorite Character,Notes"));
    }

    #[test]
    fn sorts_by_average_descending() {
        let ds = Dataset::new(vec![record("B", 5.0), record("A", 9.0), record("C", 7.5)]);
        let order: Vec<&str> = ds.sorted_by_score().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn reads_reordered_columns_and_recomputes_average() {
        let text = "Story,Acting,Characters,Visuals,Pacing,Soundtrack,Rewatchability,Title,Avg Score,Status\n\
                    8,7,9,6,8,7,9,Chuck,1.00,watching\n";
        let ds = Dataset::read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        let chuck = &ds.records[0];
        assert_eq!(chuck.title, "Chuck");
        assert_eq!(chuck.avg_score(), 7.71);
        assert_eq!(chuck.status, WatchStatus::InProgress);
        assert_eq!(chuck.genre, "");
    }

    #[test]
    fn missing_required_column_is_reported() {
        let text = "Title,Genre\nChuck,Action\n";
        match Dataset::read_csv(text.as_bytes()) {
            Err(StorageError::MissingColumn(col)) => assert_eq!(col, "Story"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn bad_score_cell_is_reported() {
        let text = "Title,Story,Acting,Characters,Visuals,Pacing,Soundtrack,Rewatchability\n\
                    Chuck,great,7,9,6,8,7,9\n";
        assert!(matches!(
            Dataset::read_csv(text.as_bytes()),
            Err(StorageError::InvalidValue { .. })
        ));
    }

    #[test]
    fn quoted_fields_survive_a_rewrite() {
        let mut rec = record("Chuck", 8.0);
        rec.genre = "Action, Comedy".into();
        rec.notes = "said \"hi\"\nthen left".into();
        rec.date_watched = NaiveDate::from_ymd_opt(2024, 5, 1);
        let ds = Dataset::new(vec![rec.clone()]);
        let text = ds.to_csv_string().unwrap();
        let back = Dataset::read_csv(text.as_bytes()).unwrap();
        assert_eq!(back.records, vec![rec]);
    }
}
