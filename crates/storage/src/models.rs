use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SCORE_NAMES: [&str; 7] = [
    "Story",
    "Acting",
    "Characters",
    "Visuals",
    "Pacing",
    "Soundtrack",
    "Rewatchability",
];

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("{name} score {value} is outside 0-10")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("expected 7 sub-scores, got {0}")]
    WrongCount(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchStatus {
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
    Ongoing,
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 4] = [
        WatchStatus::Completed,
        WatchStatus::InProgress,
        WatchStatus::Ongoing,
        WatchStatus::NotStarted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Completed => "Completed",
            WatchStatus::InProgress => "In Progress",
            WatchStatus::Ongoing => "Ongoing",
            WatchStatus::NotStarted => "Not Started",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match norm.as_str() {
            "completed" => Ok(WatchStatus::Completed),
            // older tracker files used "Watching"
            "inprogress" | "watching" => Ok(WatchStatus::InProgress),
            "ongoing" => Ok(WatchStatus::Ongoing),
            "notstarted" | "" => Ok(WatchStatus::NotStarted),
            _ => Err(format!(
                "unknown status '{}' (expected one of: {})",
                s.trim(),
                WatchStatus::ALL.map(|w| w.as_str()).join(", ")
            )),
        }
    }
}

/// The seven personal sub-scores, kept at one decimal of precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores([f64; 7]);

impl Scores {
    pub fn new(values: [f64; 7]) -> Result<Self, ScoreError> {
        let mut out = [0.0; 7];
        for (i, value) in values.into_iter().enumerate() {
            if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(ScoreError::OutOfRange {
                    name: SCORE_NAMES[i],
                    value,
                });
            }
            out[i] = round_to(value, 1);
        }
        Ok(Self(out))
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, ScoreError> {
        let arr: [f64; 7] = values
            .try_into()
            .map_err(|_| ScoreError::WrongCount(values.len()))?;
        Self::new(arr)
    }

    pub fn values(&self) -> &[f64; 7] {
        &self.0
    }

    /// Mean of the seven sub-scores, rounded to two decimals.
    pub fn average(&self) -> f64 {
        round_to(self.0.iter().sum::<f64>() / self.0.len() as f64, 2)
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        SCORE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One tracked title. `avg_score` is derived from `scores` and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowRecord {
    pub title: String,
    pub genre: String,
    pub status: WatchStatus,
    pub imdb_rating: String,
    pub years_aired: String,
    pub streaming: String,
    pub production: String,
    pub released: String,
    pub scores: Scores,
    avg_score: f64,
    pub date_watched: Option<NaiveDate>,
    pub favorite_character: String,
    pub notes: String,
}

impl ShowRecord {
    pub fn new(title: impl Into<String>, scores: Scores) -> Self {
        Self {
            title: title.into(),
            genre: String::new(),
            status: WatchStatus::default(),
            imdb_rating: String::new(),
            years_aired: String::new(),
            streaming: String::new(),
            production: String::new(),
            released: String::new(),
            avg_score: scores.average(),
            scores,
            date_watched: None,
            favorite_character: String::new(),
            notes: String::new(),
        }
    }

    pub fn avg_score(&self) -> f64 {
        self.avg_score
    }

    pub fn set_scores(&mut self, scores: Scores) {
        self.scores = scores;
        self.avg_score = scores.average();
    }
}
