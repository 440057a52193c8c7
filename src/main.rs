use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use dexbrowser::action::Action;
use dexbrowser::api::PokeApi;
use dexbrowser::config::Config;
use dexbrowser::effect::Effect;
use dexbrowser::error::BrowseError;
use dexbrowser::reducer::reducer;
use dexbrowser::session::{self, BrowsingSession};
use dexbrowser::source::DataSource;
use dexbrowser::state::{AppState, FocusArea};
use dexbrowser::ui::{DexComponentId, DexContext, DexUi};
use dexbrowser::{evolution, logging, search};

#[derive(Parser, Debug)]
#[command(name = "dexbrowser")]
#[command(about = "Browse the regional pokedex from the terminal")]
struct Args {
    #[command(flatten)]
    config: Config,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = args.config;
    logging::init_logging(&config.log_path())?;
    info!(
        region = %config.region,
        page_size = config.page_size,
        api = %config.api_base,
        "starting"
    );

    let debug = DebugSession::new(args.debug);
    let (region, page_size) = (config.region, config.page_size);
    let state = debug
        .load_state_or_else_async(|| async move {
            Ok::<AppState, io::Error>(AppState::new(BrowsingSession::new(region, page_size)))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let source: Arc<dyn DataSource> = Arc::new(PokeApi::new(config.api_base));

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, source).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    info!("exiting");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    source: Arc<dyn DataSource>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::DexList, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char('/') => HandlerResponse::action(Action::SearchStart),
            KeyCode::Char('x') if state.is_searching() => {
                HandlerResponse::action(Action::SearchExit)
            }
            KeyCode::Char('r') => HandlerResponse::action(Action::RegionNext),
            KeyCode::Char('R') => HandlerResponse::action(Action::RegionPrev),
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match state.focus {
                    FocusArea::DexList => FocusArea::Detail,
                    FocusArea::Detail => FocusArea::DexList,
                };
                HandlerResponse::action(Action::FocusSet(next))
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx, &source),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, source: &Arc<dyn DataSource>) {
    match effect {
        Effect::LoadPage(request) => {
            let source = Arc::clone(source);
            ctx.tasks().spawn(TaskKey::new("page"), async move {
                let generation = request.generation;
                match session::fetch_page(source.as_ref(), &request.ids).await {
                    Ok(records) => Action::PageDidLoad {
                        generation,
                        records,
                    },
                    Err(error) => {
                        warn!(%error, region = %request.region, "page load failed");
                        Action::PageDidError {
                            generation,
                            error: BrowseError::from_source(error, request.region.key()),
                        }
                    }
                }
            });
        }
        Effect::Search {
            ticket,
            query,
            region,
        } => {
            let source = Arc::clone(source);
            ctx.tasks().spawn(TaskKey::new("search"), async move {
                match search::resolve(source.as_ref(), &query, region).await {
                    Ok(outcome) => Action::SearchDidLoad { ticket, outcome },
                    Err(error) => {
                        warn!(%error, %query, "search failed");
                        Action::SearchDidError { ticket, error }
                    }
                }
            });
        }
        Effect::ResolveEvolution { record } => {
            let source = Arc::clone(source);
            ctx.tasks().spawn(TaskKey::new("evolution"), async move {
                let id = record.id;
                match evolution::resolve(source.as_ref(), &record).await {
                    Ok(chain) => Action::EvolutionDidLoad { id, chain },
                    Err(error) => {
                        warn!(%error, id, "evolution chain failed");
                        Action::EvolutionDidError { id, error }
                    }
                }
            });
        }
    }
}
