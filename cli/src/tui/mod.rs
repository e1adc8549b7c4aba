mod app;
mod events;
mod guard;
mod palette;
mod terminal;
mod ui;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::Terminal;
use task_console_core::api::{perform, Action, CliError, Outcome, TaskApi, Theme, TuiConfig};
use tokio::sync::mpsc;

pub use app::{InputMode, KeyOutcome, TuiApp};
pub use guard::{PanicHookGuard, RenderGuard, FAULT_MESSAGE};
pub use events::InputEvent;
pub use terminal::{check_tui_support, TerminalSession};

/// Runs the interactive console until the user quits. Requests still in
/// flight at that point are left to finish on their own.
pub async fn run_console<A>(api: Arc<A>, cfg: &TuiConfig, theme: Theme) -> Result<(), CliError>
where
    A: TaskApi + 'static,
{
    let mut app = TuiApp::new(cfg, theme);
    // Dropped in reverse order: the hook goes first, then the terminal is
    // restored. Both also run when a panic unwinds out of the loop.
    let mut session = TerminalSession::enter().map_err(CliError::Terminal)?;
    let _hook = PanicHookGuard::install();

    let (input_reader, input_rx) = events::InputReader::start();
    let result = run_console_on_terminal(
        session.terminal_mut(),
        &mut app,
        api,
        input_rx,
        cfg.tick_ms,
    )
    .await;
    input_reader.stop();
    result
}

pub async fn run_console_on_terminal<B, A>(
    terminal: &mut Terminal<B>,
    app: &mut TuiApp,
    api: Arc<A>,
    mut input_rx: mpsc::UnboundedReceiver<InputEvent>,
    tick_ms: u64,
) -> Result<(), CliError>
where
    B: Backend,
    A: TaskApi + 'static,
{
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut tick = tokio::time::interval(Duration::from_millis(tick_ms.max(16)));
    let mut guard = RenderGuard::default();

    // Initial mount load.
    dispatch(app, &api, &outcome_tx, Action::LoadAll);

    loop {
        let mut quit = false;
        tokio::select! {
            Some(event) = input_rx.recv() => {
                if let InputEvent::Key(key) = event {
                    if guard.is_tripped() {
                        // Nothing but quitting works once the view has faulted.
                        quit = app::is_interrupt(&key)
                            || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
                    } else {
                        match app.handle_key(key) {
                            KeyOutcome::Quit => quit = true,
                            KeyOutcome::Dispatch(action) => dispatch(app, &api, &outcome_tx, action),
                            KeyOutcome::None => {}
                        }
                    }
                }
            }
            Some(outcome) = outcome_rx.recv() => app.apply_outcome(outcome),
            _ = tick.tick() => {
                app.state.tick(Instant::now());
            }
        }

        if quit {
            tracing::debug!(
                target: "task_console.tui",
                in_flight = app.state.in_flight(),
                "console closing"
            );
            break;
        }

        guard
            .draw(terminal, |f| ui::draw(f, app))
            .map_err(|e| CliError::Terminal(e.to_string()))?;
    }

    Ok(())
}

/// Starts one operation. Each gets its own task; outcomes come back through
/// the channel in arrival order.
fn dispatch<A>(
    app: &mut TuiApp,
    api: &Arc<A>,
    outcome_tx: &mpsc::UnboundedSender<Outcome>,
    action: Action,
) where
    A: TaskApi + 'static,
{
    app.state.begin(&action);
    let api = Arc::clone(api);
    let tx = outcome_tx.clone();
    tokio::spawn(async move {
        let fallback = action.fallback();
        let op = action.name();
        let handle = tokio::spawn(async move { perform(api.as_ref(), action).await });
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(target: "task_console.tui", op = op, error = %e, "operation task failed");
                Outcome::failed(fallback.to_string())
            }
        };
        if tx.send(outcome).is_err() {
            tracing::debug!(target: "task_console.tui", op = op, "console gone, outcome dropped");
        }
    });
}
