//! Search resolver - id lookup, exact name lookup and the fuzzy region scan

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Region;
use crate::error::BrowseError;
use crate::source::{self, DataSource};
use crate::state::Record;

/// Names shorter than this try an exact lookup before scanning.
pub const FUZZY_MIN_LEN: usize = 3;
pub const HISTORY_LIMIT: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,
    pub records: Vec<Record>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryKind {
    NumericId(u32),
    ShortName(String),
    LongName(String),
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == ' ' || ch == '-'
}

/// Rejects empty queries and anything outside letters, digits, spaces and hyphens.
pub fn validate(query: &str) -> Result<(), BrowseError> {
    if query.trim().is_empty() || !query.chars().all(is_allowed) {
        return Err(BrowseError::Validation {
            query: query.to_string(),
        });
    }
    Ok(())
}

pub fn sanitize(query: &str) -> String {
    query
        .trim()
        .chars()
        .filter(|ch| is_allowed(*ch))
        .collect::<String>()
        .to_lowercase()
}

pub fn classify(query: &str) -> Result<QueryKind, BrowseError> {
    validate(query)?;
    let term = sanitize(query);
    if term.chars().all(|ch| ch.is_ascii_digit()) {
        // Too many digits to be an id is still just out of range.
        let id = term.parse().unwrap_or(u32::MAX);
        return Ok(QueryKind::NumericId(id));
    }
    if term.chars().count() >= FUZZY_MIN_LEN {
        Ok(QueryKind::LongName(term))
    } else {
        Ok(QueryKind::ShortName(term))
    }
}

/// The local fail-fast gates: syntax and numeric region bounds. Nothing here
/// touches the data source.
pub fn precheck(query: &str, region: Region) -> Result<QueryKind, BrowseError> {
    let kind = classify(query)?;
    if let QueryKind::NumericId(id) = kind {
        if !region.bounds().contains(id) {
            return Err(BrowseError::out_of_region(id, region));
        }
    }
    Ok(kind)
}

pub async fn resolve<S>(
    source: &S,
    query: &str,
    region: Region,
) -> Result<SearchOutcome, BrowseError>
where
    S: DataSource + ?Sized,
{
    let kind = precheck(query, region)?;
    debug!(?kind, region = region.key(), "resolving search");
    let records = match kind {
        QueryKind::NumericId(id) => {
            let record = source
                .fetch_by_id(id)
                .await
                .map_err(|error| BrowseError::from_source(error, query))?;
            vec![record]
        }
        QueryKind::LongName(term) => fuzzy_scan(source, &term, query, region).await?,
        QueryKind::ShortName(term) => match source.fetch_by_name(&term).await {
            Ok(record) => {
                if !region.bounds().contains(record.id) {
                    return Err(BrowseError::out_of_region(record.id, region));
                }
                vec![record]
            }
            Err(error) => {
                debug!(%error, %term, "exact lookup failed, scanning region");
                fuzzy_scan(source, &term, query, region).await?
            }
        },
    };
    Ok(SearchOutcome {
        query: query.to_string(),
        records,
    })
}

/// Scans every id of the region in ascending order and keeps the records
/// whose name contains `term`. Fetch failures are skipped.
pub async fn fuzzy_scan<S>(
    source: &S,
    term: &str,
    query: &str,
    region: Region,
) -> Result<Vec<Record>, BrowseError>
where
    S: DataSource + ?Sized,
{
    let term = term.to_lowercase();
    let ids: Vec<u32> = region.ids().collect();
    let mut matches = Vec::new();
    let mut failures = 0usize;
    let _ = source::fetch_in_order(source, &ids, |id, result| {
        match result {
            Ok(record) if record.name.to_lowercase().contains(&term) => matches.push(record),
            Ok(_) => {}
            Err(error) => {
                failures += 1;
                debug!(id, %error, "scan skipped id");
            }
        }
        ControlFlow::Continue(())
    })
    .await;
    info!(
        %term,
        region = region.key(),
        matches = matches.len(),
        failures,
        "fuzzy scan finished"
    );
    if matches.is_empty() {
        return Err(BrowseError::NotFound {
            query: query.to_string(),
        });
    }
    Ok(matches)
}

/// Moves `query` to the front of the history, keeping it short and unique.
pub fn remember(history: &mut Vec<String>, query: &str) {
    let query = query.trim();
    if query.is_empty() {
        return;
    }
    history.retain(|entry| !entry.eq_ignore_ascii_case(query));
    history.insert(0, query.to_string());
    history.truncate(HISTORY_LIMIT);
}
