use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::evolution::{ChainStatus, EvolutionChain};
use crate::session::BrowseMode;
use crate::state::{AppState, DetailView, FocusArea, Record};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DexComponentId {
    DexList,
    Detail,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexContext {
    DexList,
    Detail,
    Search,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            return Some(DexComponentId::Search);
        }
        match self.focus {
            FocusArea::DexList => Some(DexComponentId::DexList),
            FocusArea::Detail => Some(DexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::DexList => DexContext::DexList,
            DexComponentId::Detail => DexContext::Detail,
            DexComponentId::Search => DexContext::Search,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::DexList
    }
}

pub struct DexUi {
    dex_list: SelectList,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state, event_ctx);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(36), Constraint::Percentage(64)])
            .split(layout[1]);
        render_list(frame, body[0], state, event_ctx, &mut self.dex_list);
        render_detail(frame, body[1], state, event_ctx);
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Enter => vec![Action::DetailOpen],
                KeyCode::Char('m') => vec![Action::PageLoadMore],
                KeyCode::PageDown => vec![Action::SelectionMove(10)],
                KeyCode::PageUp => vec![Action::SelectionMove(-10)],
                _ => {
                    let items = dex_items(state);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: dex_list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::DexSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self
                        .dex_list
                        .handle_event(event, props)
                        .into_iter()
                        .collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => vec![Action::DetailPrev],
                KeyCode::Right | KeyCode::Char('l') => vec![Action::DetailNext],
                KeyCode::Esc | KeyCode::Backspace => vec![Action::DetailClose],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc => vec![Action::SearchCancel],
                KeyCode::Enter => vec![Action::SearchSubmit],
                KeyCode::Backspace => vec![Action::SearchBackspace],
                KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    if state.search.active {
        event_ctx.set_component_area(DexComponentId::Search, area);
    }
    let session = &state.session;
    let mode = match session.mode() {
        BrowseMode::Listing => "LIST",
        BrowseMode::Searching => "SEARCH",
    };
    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if let Some(outcome) = session.search().filter(|_| state.is_searching()) {
        format!("/{}", outcome.query)
    } else {
        "/".to_string()
    };
    let header_text = Text::from(vec![Line::from(vec![
        Span::styled(
            format!("{} DEX", state.region().label()),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("#{:03}-#{:03}", session.bounds().start, session.bounds().end),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::raw("  |  Loaded: "),
        Span::styled(
            format!("{}/{}", session.loaded().len(), session.total()),
            Style::default().fg(ACCENT_TEAL),
        ),
        Span::raw("  |  Mode: "),
        Span::styled(mode, Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
    ])]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .title("POKEDEX");
    frame.render_widget(
        Paragraph::new(header_text)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
    dex_list: &mut SelectList,
) {
    event_ctx.set_component_area(DexComponentId::DexList, area);
    let title = if state.is_searching() { "RESULTS" } else { "DEX" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::DexList));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = dex_items(state);
    if items.is_empty() {
        let message = if state.session.is_loading() {
            "Loading..."
        } else {
            "Nothing loaded."
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::DexList,
        style: dex_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, inner, props);
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    event_ctx.set_component_area(DexComponentId::Detail, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DATA")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Detail));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(detail) = state.detail.as_ref() else {
        let hint = match state.selected_record() {
            Some(record) => summary_text(record),
            None => Text::from("[select a pokemon]"),
        };
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(TEXT_DIM))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(detail_text(&detail.record)).wrap(Wrap { trim: true }),
        layout[0],
    );

    let evolution_block = Block::default()
        .borders(Borders::ALL)
        .title("EVOLUTION")
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(
        Paragraph::new(evolution_text(detail))
            .block(evolution_block)
            .wrap(Wrap { trim: true }),
        layout[1],
    );
}

fn summary_text(record: &Record) -> Text<'static> {
    Text::from(vec![
        Line::from(format!("#{:03} {}", record.id, format_name(&record.name))),
        Line::from(record.types.join(" / ").to_ascii_uppercase()),
        Line::from(""),
        Line::from("Enter to open"),
    ])
}

fn detail_text(record: &Record) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("#{:03} {}", record.id, format_name(&record.name)),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Type: "),
            Span::styled(
                record.types.join(" / ").to_ascii_uppercase(),
                Style::default().fg(ACCENT_GOLD),
            ),
        ]),
        Line::from(format!(
            "Height: {:.1} m  Weight: {:.1} kg",
            record.height as f32 / 10.0,
            record.weight as f32 / 10.0
        )),
        Line::from(""),
    ];
    lines.extend(record.stats.iter().map(|stat| {
        let bar = "#".repeat((stat.value as usize / 10).clamp(1, 20));
        Line::from(format!("{:>4} {:>3} {bar}", shorten_stat(&stat.name), stat.value))
    }));
    lines.push(Line::from(format!(" TOT {}", record.total_stats())));
    lines.push(Line::from(""));
    let abilities = record
        .abilities
        .iter()
        .map(|ability| {
            if ability.hidden {
                format!("{} (hidden)", format_name(&ability.name))
            } else {
                format_name(&ability.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(Line::from(format!("Abilities: {abilities}")));
    let level_up = record
        .moves
        .iter()
        .filter(|entry| entry.learn_method.as_deref() == Some("level-up"))
        .count();
    lines.push(Line::from(format!(
        "Moves: {} ({level_up} by level)",
        record.moves.len()
    )));
    if let Some(sprite) = record
        .sprites
        .animated
        .as_ref()
        .or(record.sprites.front_default.as_ref())
    {
        lines.push(Line::from(Span::styled(
            sprite.clone(),
            Style::default().fg(TEXT_DIM),
        )));
    }
    Text::from(lines)
}

fn evolution_text(detail: &DetailView) -> Text<'static> {
    if detail.evolution_loading {
        return Text::from("Evolution loading...");
    }
    let Some(chain) = detail.evolution.as_ref() else {
        return Text::from("No evolution data.");
    };
    match chain.status() {
        ChainStatus::NoData => Text::from("No evolution data."),
        ChainStatus::DoesNotEvolve => Text::from("Does not evolve."),
        ChainStatus::Evolves => Text::from(evolution_lines(chain)),
    }
}

fn evolution_lines(chain: &EvolutionChain) -> Vec<Line<'static>> {
    chain
        .nodes
        .iter()
        .map(|node| {
            let indent = "  ".repeat(node.depth);
            let arrow = if node.depth == 0 { "" } else { "> " };
            let text = format!(
                "{indent}{arrow}#{:03} {}",
                node.record.id,
                format_name(&node.record.name)
            );
            if node.is_current {
                Line::from(Span::styled(
                    text,
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.session.is_loading() {
            "Loading pokedex...".to_string()
        } else if state.search.pending {
            "Searching...".to_string()
        } else if !state.session.has_more() && !state.is_searching() {
            "All loaded".to_string()
        } else {
            "".to_string()
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, vec![StatusBarHint::new("q", "Quit")]);
    }

    let left = match state.focus {
        FocusArea::DexList => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("m", "More"),
        ],
        FocusArea::Detail => vec![
            StatusBarHint::new("h/l", "Prev/Next"),
            StatusBarHint::new("Esc", "Close"),
        ],
    };
    let mut center = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new("/", "Search"),
    ];
    if state.is_searching() {
        center.push(StatusBarHint::new("x", "Clear"));
    }
    center.extend([
        StatusBarHint::new("r/R", "Region"),
        StatusBarHint::new("q", "Quit"),
    ]);
    (left, center)
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .displayed()
        .iter()
        .map(|record| {
            Line::from(format!(
                "#{:03} {:<12} {}",
                record.id,
                format_name(&record.name),
                record.types.join("/")
            ))
        })
        .collect()
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}
