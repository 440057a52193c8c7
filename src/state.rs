use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::catalog::Region;
use crate::evolution::EvolutionChain;
use crate::navigator::DetailNavigator;
use crate::session::{BrowseMode, BrowsingSession};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<BaseStat>,
    pub abilities: Vec<AbilityEntry>,
    pub moves: Vec<MoveEntry>,
    pub sprites: Sprites,
    pub species: Option<String>,
    pub height: u16,
    pub weight: u16,
}

impl Record {
    /// Basic shape check applied before a record joins the listing.
    pub fn is_well_formed(&self) -> bool {
        self.id > 0
            && !self.name.trim().is_empty()
            && !self.types.is_empty()
            && !self.stats.is_empty()
            && self.sprites.front_default.is_some()
    }

    pub fn stat(&self, name: &str) -> Option<u16> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }

    pub fn total_stats(&self) -> u32 {
        self.stats.iter().map(|stat| stat.value as u32).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub name: String,
    pub hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub name: String,
    pub learn_method: Option<String>,
    pub level: Option<u16>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub animated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    /// Bumped on every submit and reset; results for older tickets are dropped.
    pub ticket: u64,
    pub pending: bool,
    pub history: Vec<String>,
}

/// The record currently opened in the detail pane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub record: Record,
    pub navigator: DetailNavigator,
    pub evolution: Option<EvolutionChain>,
    pub evolution_loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FocusArea {
    DexList,
    Detail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,
    pub session: BrowsingSession,
    pub selected_index: usize,
    pub detail: Option<DetailView>,
    pub search: SearchState,
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(BrowsingSession::default())
    }
}

impl AppState {
    pub fn new(session: BrowsingSession) -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::DexList,
            session,
            selected_index: 0,
            detail: None,
            search: SearchState::default(),
            message: None,
        }
    }

    pub fn region(&self) -> Region {
        self.session.region()
    }

    pub fn displayed(&self) -> &[Record] {
        self.session.displayed()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.displayed().get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.displayed().len();
        if len == 0 {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn is_searching(&self) -> bool {
        self.session.mode() == BrowseMode::Searching
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Session")
                .entry("region", ron_string(&self.session.region()))
                .entry("mode", ron_string(&self.session.mode()))
                .entry("offset", ron_string(&self.session.offset()))
                .entry("loaded", ron_string(&self.session.loaded().len()))
                .entry("generation", ron_string(&self.session.generation()))
                .entry("loading", ron_string(&self.session.is_loading())),
            DebugSection::new("Search")
                .entry("query", ron_string(&self.search.query))
                .entry("active", ron_string(&self.search.active))
                .entry("ticket", ron_string(&self.search.ticket))
                .entry("pending", ron_string(&self.search.pending))
                .entry("history", ron_string(&self.search.history)),
            DebugSection::new("Detail")
                .entry("selected", ron_string(&self.selected_index))
                .entry(
                    "record",
                    ron_string(&self.detail.as_ref().map(|detail| detail.record.name.clone())),
                )
                .entry(
                    "evolution",
                    ron_string(
                        &self
                            .detail
                            .as_ref()
                            .and_then(|detail| detail.evolution.as_ref())
                            .map(|chain| chain.len()),
                    ),
                )
                .entry("focus", ron_string(&self.focus))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
