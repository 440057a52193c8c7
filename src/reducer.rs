use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::catalog::Region;
use crate::effect::Effect;
use crate::navigator::{DetailNavigator, Direction};
use crate::search;
use crate::session::ExitSearch;
use crate::state::{AppState, DetailView, FocusArea, Record};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let region = state.region();
            select_region(state, region)
        }

        Action::RegionSelect(region) => select_region(state, region),
        Action::RegionNext => {
            let region = state.region().cycle(1);
            select_region(state, region)
        }
        Action::RegionPrev => {
            let region = state.region().cycle(-1);
            select_region(state, region)
        }

        Action::PageLoadMore => match state.session.begin_next_page() {
            Some(request) => DispatchResult::changed_with(Effect::LoadPage(request)),
            None => DispatchResult::unchanged(),
        },

        Action::PageDidLoad {
            generation,
            records,
        } => {
            if state.session.complete_page(generation, records).is_none() {
                return DispatchResult::unchanged();
            }
            let index = state.selected_index;
            state.set_selected_index(index);
            DispatchResult::changed()
        }

        Action::PageDidError { generation, error } => {
            if !state.session.fail_page(generation) {
                return DispatchResult::unchanged();
            }
            state.message = Some(error.to_string());
            DispatchResult::changed()
        }

        Action::FocusSet(area) => {
            if state.focus == area || (area == FocusArea::Detail && state.detail.is_none()) {
                return DispatchResult::unchanged();
            }
            state.focus = area;
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i64 + delta as i64).max(0) as usize;
            let moved = state.set_selected_index(index);
            let at_end = state.selected_index + 1 >= state.displayed().len();
            let effects: Vec<Effect> = if delta > 0 && at_end {
                state
                    .session
                    .begin_next_page()
                    .map(Effect::LoadPage)
                    .into_iter()
                    .collect()
            } else {
                Vec::new()
            };
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::DexSelect(index) => {
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let query = state.search.query.trim().to_string();
            state.search.active = false;
            let region = state.region();
            if let Err(error) = search::precheck(&query, region) {
                state.message = Some(error.to_string());
                return DispatchResult::changed();
            }
            state.search.ticket = state.search.ticket.wrapping_add(1);
            state.search.pending = true;
            state.message = Some(format!("Searching {} for \"{query}\"...", region.label()));
            DispatchResult::changed_with(Effect::Search {
                ticket: state.search.ticket,
                query,
                region,
            })
        }

        Action::SearchDidLoad { ticket, outcome } => {
            if ticket != state.search.ticket || !state.search.pending {
                return DispatchResult::unchanged();
            }
            state.search.pending = false;
            search::remember(&mut state.search.history, &outcome.query);
            state.message = Some(format!(
                "{} result(s) for \"{}\"",
                outcome.records.len(),
                outcome.query
            ));
            state.session.enter_search(outcome);
            state.selected_index = 0;
            state.detail = None;
            state.focus = FocusArea::DexList;
            DispatchResult::changed()
        }

        Action::SearchDidError { ticket, error } => {
            if ticket != state.search.ticket || !state.search.pending {
                return DispatchResult::unchanged();
            }
            state.search.pending = false;
            state.message = Some(error.to_string());
            DispatchResult::changed()
        }

        Action::SearchExit => {
            let was_pending = state.search.pending;
            invalidate_search(state);
            if !state.is_searching() && !was_pending {
                return DispatchResult::unchanged();
            }
            state.detail = None;
            state.focus = FocusArea::DexList;
            state.selected_index = 0;
            state.message = None;
            match state.session.exit_search() {
                ExitSearch::Redisplay => DispatchResult::changed(),
                ExitSearch::Reload(request) => {
                    DispatchResult::changed_with(Effect::LoadPage(request))
                }
            }
        }

        Action::DetailOpen => {
            let Some(record) = state.selected_record().cloned() else {
                return DispatchResult::unchanged();
            };
            open_detail(state, record)
        }

        Action::DetailClose => {
            if state.detail.take().is_none() {
                return DispatchResult::unchanged();
            }
            state.focus = FocusArea::DexList;
            DispatchResult::changed()
        }

        Action::DetailNext => navigate_detail(state, Direction::Next),
        Action::DetailPrev => navigate_detail(state, Direction::Prev),

        Action::EvolutionDidLoad { id, chain } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if detail.record.id != id {
                return DispatchResult::unchanged();
            }
            detail.evolution = Some(chain);
            detail.evolution_loading = false;
            DispatchResult::changed()
        }

        Action::EvolutionDidError { id, error } => {
            let Some(detail) = state.detail.as_mut() else {
                return DispatchResult::unchanged();
            };
            if detail.record.id != id {
                return DispatchResult::unchanged();
            }
            detail.evolution = None;
            detail.evolution_loading = false;
            state.message = Some(error.to_string());
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn select_region(state: &mut AppState, region: Region) -> DispatchResult<Effect> {
    invalidate_search(state);
    state.detail = None;
    state.focus = FocusArea::DexList;
    state.selected_index = 0;
    state.message = None;
    match state.session.select_region(region) {
        Some(request) => DispatchResult::changed_with(Effect::LoadPage(request)),
        None => DispatchResult::changed(),
    }
}

/// Closes the search prompt and orphans any search still in flight.
fn invalidate_search(state: &mut AppState) {
    state.search.active = false;
    state.search.query.clear();
    state.search.pending = false;
    state.search.ticket = state.search.ticket.wrapping_add(1);
}

fn open_detail(state: &mut AppState, record: Record) -> DispatchResult<Effect> {
    let navigator = DetailNavigator::open(state.session.displayed(), record.id);
    state.selected_index = navigator.index();
    state.detail = Some(DetailView {
        record: record.clone(),
        navigator,
        evolution: None,
        evolution_loading: true,
    });
    state.focus = FocusArea::Detail;
    DispatchResult::changed_with(Effect::ResolveEvolution { record })
}

fn navigate_detail(state: &mut AppState, direction: Direction) -> DispatchResult<Effect> {
    let records = state.session.displayed();
    let Some(detail) = state.detail.as_mut() else {
        return DispatchResult::unchanged();
    };
    let Some(next) = detail.navigator.navigate(records, direction).cloned() else {
        return DispatchResult::unchanged();
    };
    let index = detail.navigator.index();
    if next.id == detail.record.id {
        return DispatchResult::unchanged();
    }
    detail.record = next.clone();
    detail.evolution = None;
    detail.evolution_loading = true;
    state.selected_index = index;
    DispatchResult::changed_with(Effect::ResolveEvolution { record: next })
}
