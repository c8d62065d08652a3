use crate::render;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracker_core::auth::SessionGate;
use tracker_core::entry::EntryForm;
use tracker_core::resolver::Resolution;
use tracker_core::tracker::{AddOutcome, Tracker};
use tracing::warn;

/// Fails unless the gate is disabled or `password` unlocks it.
pub fn check_gate(secret: &str, password: Option<&str>) -> Result<()> {
    let mut gate = SessionGate::new(secret);
    if gate.is_enabled() && !gate.unlock(password.unwrap_or_default()) {
        bail!("incorrect password");
    }
    Ok(())
}

pub async fn run_search<W: Write>(
    tracker: &Tracker,
    title: &str,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let resolution = tracker.search(title).await?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?;
        return Ok(());
    }
    match resolution {
        Resolution::Found { details } => write!(out, "{}", render::details(&details))?,
        Resolution::Candidates { candidates } => {
            writeln!(out, "Select a show (use `add --pick N`):")?;
            write!(out, "{}", render::candidates(&candidates))?;
        }
        Resolution::NotFound => writeln!(out, "{}", render::NOT_FOUND)?,
    }
    Ok(())
}

pub async fn run_add<W: Write>(
    tracker: &Tracker,
    title: &str,
    form: &EntryForm,
    pick: Option<usize>,
    json: bool,
    out: &mut W,
) -> Result<()> {
    // --pick is 1-based on the command line
    let index = match pick {
        Some(0) => bail!("--pick starts at 1"),
        Some(n) => Some(n - 1),
        None => None,
    };
    match tracker.add(title, form, index).await? {
        AddOutcome::Added { record, .. } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
            } else {
                write!(out, "{}", render::record(&record))?;
            }
        }
        AddOutcome::Candidates(candidates) => {
            writeln!(out, "Several shows match; re-run with --pick N:")?;
            write!(out, "{}", render::candidates(&candidates))?;
        }
        AddOutcome::NotFound => {
            warn!("nothing saved for '{}'", title);
            writeln!(out, "{}", render::NOT_FOUND)?;
        }
    }
    Ok(())
}

pub fn run_list<W: Write>(
    tracker: &Tracker,
    json: bool,
    limit: Option<usize>,
    out: &mut W,
) -> Result<()> {
    let dataset = tracker.dataset()?;
    if json {
        let rows: Vec<_> = dataset
            .sorted_by_score()
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }
    if dataset.is_empty() {
        writeln!(out, "Watchlist is empty.")?;
        return Ok(());
    }
    write!(out, "{}", render::table(&dataset, limit))?;
    Ok(())
}

pub fn run_import<W: Write>(tracker: &Tracker, file: &Path, out: &mut W) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let dataset = tracker.import(&bytes)?;
    writeln!(
        out,
        "Imported {} rows from {}",
        dataset.len(),
        file.display()
    )?;
    Ok(())
}

pub fn run_export<W: Write>(tracker: &Tracker, output: Option<&Path>, out: &mut W) -> Result<()> {
    let csv = tracker.export()?;
    match output {
        Some(path) => {
            fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
            writeln!(out, "Exported to {}", path.display())?;
        }
        None => write!(out, "{}", csv)?,
    }
    Ok(())
}
