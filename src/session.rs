//! Browsing session - pagination and listing/search mode for one region

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Region, RegionBounds};
use crate::error::BrowseError;
use crate::search::SearchOutcome;
use crate::source::{self, DataSource, SourceError};
use crate::state::Record;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseMode {
    #[default]
    Listing,
    Searching,
}

/// A page of ids to fetch, tagged with the generation that asked for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub generation: u64,
    pub region: Region,
    pub ids: Vec<u32>,
}

/// What `exit_search` needs the caller to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitSearch {
    /// Previously loaded records are shown again, nothing to fetch.
    Redisplay,
    Reload(PageRequest),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrowsingSession {
    region: Region,
    bounds: RegionBounds,
    offset: usize,
    page_size: usize,
    loaded: Vec<Record>,
    mode: BrowseMode,
    search: Option<SearchOutcome>,
    loading: bool,
    generation: u64,
}

impl Default for BrowsingSession {
    fn default() -> Self {
        Self::new(Region::default(), DEFAULT_PAGE_SIZE)
    }
}

impl BrowsingSession {
    pub fn new(region: Region, page_size: usize) -> Self {
        Self {
            region,
            bounds: region.bounds(),
            offset: 0,
            page_size: page_size.max(1),
            loaded: Vec::new(),
            mode: BrowseMode::Listing,
            search: None,
            loading: false,
            generation: 0,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn bounds(&self) -> RegionBounds {
        self.bounds
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn loaded(&self) -> &[Record] {
        &self.loaded
    }

    pub fn search(&self) -> Option<&SearchOutcome> {
        self.search.as_ref()
    }

    pub fn total(&self) -> usize {
        self.bounds.len()
    }

    pub fn has_more(&self) -> bool {
        self.offset < self.total()
    }

    /// The sequence currently on screen: search results or the listing.
    pub fn displayed(&self) -> &[Record] {
        match (self.mode, self.search.as_ref()) {
            (BrowseMode::Searching, Some(outcome)) => &outcome.records,
            _ => &self.loaded,
        }
    }

    /// Replaces the session with a fresh one for `region` and starts its first page.
    pub fn select_region(&mut self, region: Region) -> Option<PageRequest> {
        self.region = region;
        self.bounds = region.bounds();
        self.reset_listing();
        self.search = None;
        self.begin_next_page()
    }

    /// Claims the next page of ids, or `None` when a load is already in
    /// flight, the session is showing search results, or the region is
    /// exhausted.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.mode != BrowseMode::Listing || self.loading || !self.has_more() {
            return None;
        }
        let end = (self.offset + self.page_size).min(self.total());
        let ids = self
            .region
            .ids()
            .skip(self.offset)
            .take(end - self.offset)
            .collect();
        self.loading = true;
        Some(PageRequest {
            generation: self.generation,
            region: self.region,
            ids,
        })
    }

    /// Folds fetched records into the listing.
    ///
    /// Returns `None` when the request belongs to an older generation and was
    /// dropped, otherwise whether more pages remain.
    pub fn complete_page(&mut self, generation: u64, records: Vec<Record>) -> Option<bool> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale page");
            return None;
        }
        for record in records {
            if !record.is_well_formed() {
                debug!(id = record.id, "skipping malformed record");
                continue;
            }
            if !self.bounds.contains(record.id)
                || self.loaded.iter().any(|loaded| loaded.id == record.id)
            {
                continue;
            }
            self.loaded.push(record);
        }
        self.loaded.sort_by_key(|record| record.id);
        self.offset = (self.offset + self.page_size).min(self.total());
        self.loading = false;
        Some(self.has_more())
    }

    /// Releases the in-flight guard after a failed load. The offset stays put
    /// so the same page is retried next time.
    pub fn fail_page(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn enter_search(&mut self, outcome: SearchOutcome) {
        self.search = Some(outcome);
        self.mode = BrowseMode::Searching;
    }

    pub fn exit_search(&mut self) -> ExitSearch {
        self.mode = BrowseMode::Listing;
        self.search = None;
        if !self.loaded.is_empty() {
            return ExitSearch::Redisplay;
        }
        self.reset_listing();
        match self.begin_next_page() {
            Some(request) => ExitSearch::Reload(request),
            None => ExitSearch::Redisplay,
        }
    }

    /// Loads the next page against `source`, one id at a time.
    ///
    /// Returns whether more pages remain; a no-op returning the current
    /// answer when no page can be claimed.
    pub async fn load_next_page<S>(&mut self, source: &S) -> Result<bool, BrowseError>
    where
        S: DataSource + ?Sized,
    {
        let Some(request) = self.begin_next_page() else {
            return Ok(self.has_more());
        };
        match fetch_page(source, &request.ids).await {
            Ok(records) => Ok(self
                .complete_page(request.generation, records)
                .unwrap_or_else(|| self.has_more())),
            Err(error) => {
                self.fail_page(request.generation);
                Err(BrowseError::from_source(error, self.region.key()))
            }
        }
    }

    fn reset_listing(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.offset = 0;
        self.loaded.clear();
        self.mode = BrowseMode::Listing;
        self.loading = false;
    }
}

/// Fetches the records of one page sequentially.
///
/// Missing or unparseable records are left out; a transport failure aborts
/// the whole page.
pub async fn fetch_page<S>(source: &S, ids: &[u32]) -> Result<Vec<Record>, SourceError>
where
    S: DataSource + ?Sized,
{
    let mut records = Vec::with_capacity(ids.len());
    let mut aborted = None;
    let flow = source::fetch_in_order(source, ids, |id, result| match result {
        Ok(record) => {
            records.push(record);
            ControlFlow::Continue(())
        }
        Err(SourceError::Transport(detail)) => {
            warn!(id, %detail, "page load aborted");
            aborted = Some(SourceError::Transport(detail));
            ControlFlow::Break(())
        }
        Err(error) => {
            debug!(id, %error, "skipping record");
            ControlFlow::Continue(())
        }
    })
    .await;
    match (flow, aborted) {
        (ControlFlow::Break(()), Some(error)) => Err(error),
        _ => Ok(records),
    }
}
