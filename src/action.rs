use serde::{Deserialize, Serialize};

use crate::catalog::Region;
use crate::error::BrowseError;
use crate::evolution::EvolutionChain;
use crate::search::SearchOutcome;
use crate::state::{FocusArea, Record};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    RegionSelect(Region),
    RegionNext,
    RegionPrev,

    PageLoadMore,
    PageDidLoad { generation: u64, records: Vec<Record> },
    PageDidError { generation: u64, error: BrowseError },

    FocusSet(FocusArea),

    SelectionMove(i16),
    DexSelect(usize),

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    SearchExit,
    SearchDidLoad { ticket: u64, outcome: SearchOutcome },
    SearchDidError { ticket: u64, error: BrowseError },

    DetailOpen,
    DetailClose,
    DetailNext,
    DetailPrev,

    EvolutionDidLoad { id: u32, chain: EvolutionChain },
    EvolutionDidError { id: u32, error: BrowseError },

    UiTerminalResize(u16, u16),
    Quit,
}
