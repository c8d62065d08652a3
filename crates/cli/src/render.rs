use providers::{CandidateMatch, ShowDetails};
use storage::{Dataset, ShowRecord};

pub const NOT_FOUND: &str = "Show not found. Try refining your title.";

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

pub fn details(d: &ShowDetails) -> String {
    let mut out = format!("## {}\n", d.title);
    out.push_str(&format!("Years Aired: {}\n", or_na(&d.years_aired)));
    out.push_str(&format!("Genre: {}\n", or_na(&d.genre)));
    out.push_str(&format!("IMDb Rating: {}\n", or_na(&d.imdb_rating)));
    out.push_str(&format!("Production: {}\n", or_na(&d.production)));
    if !d.streaming.is_empty() {
        out.push_str(&format!("Streaming: {}\n", d.streaming));
    }
    out.push_str(&format!("Released: {}\n", or_na(&d.released)));
    if !d.poster.is_empty() {
        out.push_str(&format!("Poster: {}\n", d.poster));
    }
    out
}

pub fn candidates(list: &[CandidateMatch]) -> String {
    let mut out = String::new();
    for (i, c) in list.iter().enumerate() {
        if c.year.is_empty() {
            out.push_str(&format!("{:>3}. {}\n", i + 1, c.title));
        } else {
            out.push_str(&format!("{:>3}. {} ({})\n", i + 1, c.title, c.year));
        }
    }
    out
}

pub fn record(r: &ShowRecord) -> String {
    let scores = r
        .scores
        .named()
        .map(|(name, v)| format!("{} {}", name, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Saved '{}' [{}] avg {:.2} ({})\n",
        r.title, r.status, r.avg_score(), scores
    )
}

const TABLE_HEADERS: [&str; 6] = ["Title", "Status", "Genre", "IMDb", "Streaming", "Avg Score"];

fn table_row(r: &ShowRecord) -> [String; 6] {
    [
        r.title.clone(),
        r.status.to_string(),
        r.genre.clone(),
        r.imdb_rating.clone(),
        r.streaming.clone(),
        format!("{:.2}", r.avg_score()),
    ]
}

/// Watchlist table, best average first.
pub fn table(dataset: &Dataset, limit: Option<usize>) -> String {
    let rows: Vec<[String; 6]> = dataset
        .sorted_by_score()
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(table_row)
        .collect();

    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&TABLE_HEADERS.map(String::from)[..]));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(&row[..]));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::Scores;

    #[test]
    fn table_lists_best_first() {
        let mut low = ShowRecord::new("Lost", Scores::new([4.0; 7]).unwrap());
        low.genre = "Mystery".into();
        let high = ShowRecord::new("Chuck", Scores::new([9.0; 7]).unwrap());
        let ds = Dataset::new(vec![low, high]);

        let text = table(&ds, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Title"));
        assert!(lines[1].starts_with("Chuck"));
        assert!(lines[1].ends_with("9.00"));
        assert!(lines[2].starts_with("Lost"));

        assert_eq!(table(&ds, Some(1)).lines().count(), 2);
    }

    #[test]
    fn missing_details_print_as_na() {
        let d = ShowDetails {
            title: "Chuck".into(),
            genre: "Action".into(),
            ..Default::default()
        };
        let text = details(&d);
        assert!(text.contains("Genre: Action"));
        assert!(text.contains("Production: N/A"));
        assert!(!text.contains("Streaming"));
        assert!(!text.contains("Poster"));
    }

    #[test]
    fn poster_link_is_printed_when_known() {
        let d = ShowDetails {
            title: "Chuck".into(),
            poster: "https://img.example/chuck.jpg".into(),
            ..Default::default()
        };
        assert!(details(&d).ends_with("Poster: https://img.example/chuck.jpg\n"));
    }
}
