use chrono::NaiveDate;
use providers::ShowDetails;
use storage::{ScoreError, Scores, ShowRecord, WatchStatus};

/// What the user supplies on top of the fetched attributes.
///
/// `Option<String>` fields override the pre-filled value when set and non-blank.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub scores: Vec<f64>,
    pub status: WatchStatus,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub streaming: Option<String>,
    pub production: Option<String>,
    pub date_watched: Option<NaiveDate>,
    pub favorite_character: String,
    pub notes: String,
}

fn pick(edited: &Option<String>, fetched: &str) -> String {
    edited
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fetched)
        .to_string()
}

/// Merge fetched attributes with the form. The average is computed here and
/// nowhere else.
pub fn merge(details: &ShowDetails, form: &EntryForm) -> Result<ShowRecord, ScoreError> {
    let scores = Scores::from_slice(&form.scores)?;
    let mut record = ShowRecord::new(pick(&form.title, &details.title), scores);
    record.genre = pick(&form.genre, &details.genre);
    record.status = form.status;
    record.imdb_rating = details.imdb_rating.clone();
    record.years_aired = details.years_aired.clone();
    record.streaming = pick(&form.streaming, &details.streaming);
    record.production = pick(&form.production, &details.production);
    record.released = details.released.clone();
    record.date_watched = form.date_watched;
    record.favorite_character = form.favorite_character.trim().to_string();
    record.notes = form.notes.trim().to_string();
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chuck() -> ShowDetails {
        ShowDetails {
            title: "Chuck".into(),
            genre: "Action, Comedy, Drama".into(),
            imdb_rating: "8.2".into(),
            years_aired: "2007–2012".into(),
            production: "Warner Bros.".into(),
            streaming: String::new(),
            released: "24 Sep 2007".into(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_carries_api_fields_and_average() {
        let form = EntryForm {
            scores: vec![8.0, 7.0, 9.0, 6.0, 8.0, 7.0, 9.0],
            status: WatchStatus::Completed,
            streaming: Some("Prime Video".into()),
            notes: "  Nerd Herd forever  ".into(),
            ..Default::default()
        };
        let rec = merge(&chuck(), &form).unwrap();
        assert_eq!(rec.title, "Chuck");
        assert_eq!(rec.genre, "Action, Comedy, Drama");
        assert_eq!(rec.imdb_rating, "8.2");
        assert_eq!(rec.years_aired, "2007–2012");
        assert_eq!(rec.production, "Warner Bros.");
        assert_eq!(rec.streaming, "Prime Video");
        assert_eq!(rec.status, WatchStatus::Completed);
        assert_eq!(rec.notes, "Nerd Herd forever");
        assert_eq!(rec.avg_score(), 7.71);
    }

    #[test]
    fn blank_overrides_keep_fetched_values() {
        let form = EntryForm {
            scores: vec![5.0; 7],
            title: Some("   ".into()),
            genre: Some("Spy".into()),
            ..Default::default()
        };
        let rec = merge(&chuck(), &form).unwrap();
        assert_eq!(rec.title, "Chuck");
        assert_eq!(rec.genre, "Spy");
        assert_eq!(rec.status, WatchStatus::NotStarted);
    }

    #[test]
    fn invalid_scores_are_rejected() {
        let too_few = EntryForm {
            scores: vec![5.0; 6],
            ..Default::default()
        };
        assert_eq!(merge(&chuck(), &too_few), Err(ScoreError::WrongCount(6)));

        let too_high = EntryForm {
            scores: vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 10.5],
            ..Default::default()
        };
        assert!(matches!(
            merge(&chuck(), &too_high),
            Err(ScoreError::OutOfRange { name: "Rewatchability", .. })
        ));
    }
}
