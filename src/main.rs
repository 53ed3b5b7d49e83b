//! Pokemon team builder - terminal wizard over the PokeAPI catalog

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use teambuilder::action::Action;
use teambuilder::api::{CatalogClient, DEFAULT_ENDPOINT};
use teambuilder::effect::{initial_page_key, page_key, selection_scope_keys, Effect, CONFIRM_TASK};
use teambuilder::logging;
use teambuilder::reducer::reducer;
use teambuilder::state::{
    AppState, WizardConfig, DEFAULT_CONFIRM_DELAY_MS, DEFAULT_PAGE_SIZE, TICK_MS,
};
use teambuilder::ui::{WizardComponentId, WizardContext, WizardUi};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Build a team of seven Pokémon, step by step
#[derive(Parser, Debug)]
#[command(name = "teambuilder")]
#[command(about = "A Pokémon team builder wizard for the terminal")]
struct Args {
    /// PokeAPI GraphQL endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Pokemon fetched per page and stream (minimum 1)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Pause before the overview once the team is confirmed
    #[arg(long, default_value_t = DEFAULT_CONFIRM_DELAY_MS)]
    confirm_delay_ms: u64,

    /// Log file (defaults to teambuilder.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(Clone, Debug)]
struct RuntimeConfig {
    client: CatalogClient,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init(&log_path)?;

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let wizard_config = WizardConfig {
        page_size: args.page_size,
        confirm_delay_ms: args.confirm_delay_ms,
    };
    let config = RuntimeConfig {
        client: CatalogClient::new(args.endpoint),
    };
    tracing::info!(
        endpoint = config.client.endpoint(),
        page_size = wizard_config.page_size,
        "starting team builder"
    );

    let mut state = debug
        .load_state_or_else_async(|| {
            let wizard_config = wizard_config.clone();
            async move { Ok::<AppState, io::Error>(AppState::new(wizard_config)) }
        })
        .await
        .map_err(debug_error)?;
    state.config = wizard_config;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, config).await;

    // ===== Cleanup =====
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
    tracing::info!("team builder closed");
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
    config: RuntimeConfig,
) -> io::Result<DebugRunOutput<AppState>> {
    let config = Arc::new(config);
    let ui = Rc::new(RefCell::new(WizardUi::new()));
    let mut bus: EventBus<AppState, Action, WizardComponentId, WizardContext> = EventBus::new();
    let keybindings: Keybindings<WizardContext> = Keybindings::new();

    for id in WizardComponentId::SCREENS {
        let ui_screen = Rc::clone(&ui);
        bus.register(id, move |event, state| {
            ui_screen.borrow_mut().handle_event(&event.kind, state)
        });
    }

    bus.register_global(|event, _state| match &event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            HandlerResponse::action(Action::Quit)
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::TypesFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, config.clone()),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, config: Arc<RuntimeConfig>) {
    match effect {
        Effect::LoadTypes => {
            let client = config.client.clone();
            ctx.tasks().spawn(TaskKey::new("types"), async move {
                match client.fetch_types().await {
                    Ok(types) => {
                        tracing::info!(count = types.len(), "pokemon types loaded");
                        Action::TypesDidLoad(types)
                    }
                    Err(error) => Action::TypesDidError(error.to_string()),
                }
            });
        }
        Effect::FetchPage {
            stream,
            visit,
            query,
            initial,
        } => {
            let key = if initial {
                initial_page_key(stream, visit)
            } else {
                page_key(stream, visit, query.offset)
            };
            let client = config.client.clone();
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client.fetch_page(query).await {
                    Ok(items) => {
                        tracing::debug!(
                            stream = stream.key(),
                            offset = query.offset,
                            count = items.len(),
                            "page loaded"
                        );
                        Action::PageDidLoad {
                            stream,
                            visit,
                            items,
                        }
                    }
                    Err(error) => Action::PageDidError {
                        stream,
                        visit,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::ReleaseSelectionScope { visit } => {
            tracing::debug!(visit, "releasing selection tasks");
            for key in selection_scope_keys(visit) {
                ctx.tasks().cancel(&TaskKey::new(key));
            }
        }
        Effect::ConfirmTeam { visit, delay_ms } => {
            ctx.tasks().spawn(TaskKey::new(CONFIRM_TASK), async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Action::SelectionConfirmDidFinish { visit }
            });
        }
        Effect::RecordTeam(summary) => {
            tracing::info!(
                player = %summary.player_name,
                team = %summary.team_name,
                type_id = summary.type_id,
                members = ?summary.members,
                "team confirmed"
            );
        }
    }
}
