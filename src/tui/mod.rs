// Module declarations
pub mod widgets;
pub mod components;

pub mod action;
pub mod component;
pub mod error;
pub mod keys;
pub mod layout;
pub mod reducer;
pub mod reducers;
pub mod regions;
pub mod renderer;
pub mod runtime;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use action::{Action, DismissReason};
pub use component::{Component, Effect, Element};
pub use error::{TuiError, TuiResult};
pub use keys::{key_to_action, mouse_to_action};
pub use reducer::reduce;
pub use renderer::Renderer;
pub use runtime::Runtime;
pub use state::AppState;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bridge::HostBridge;
use crate::config::Config;
use crate::types::Configuration;
use regions::MountedRegions;
use session::TerminalFocus;

/// Everything the terminal shell needs to host one widget
pub struct RunOptions {
    pub args: Configuration,
    pub config: Config,
    pub bridge: Arc<dyn HostBridge>,
    /// Width of the emulated host frame, `None` for the whole terminal
    pub frame_columns: Option<u16>,
    /// Host re-renders delivered while running
    pub updates: Option<mpsc::UnboundedReceiver<Configuration>>,
}

/// Main entry point for TUI mode
///
/// Returns the selection at the time the user quit.
pub async fn run(options: RunOptions) -> TuiResult<Option<NaiveDate>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, options).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: RunOptions,
) -> TuiResult<Option<NaiveDate>> {
    let RunOptions {
        args,
        config,
        bridge,
        frame_columns,
        mut updates,
    } = options;

    let today = chrono::Local::now().date_naive();
    let mut initial_state = AppState::new(args, config, today);
    initial_state.system.frame_columns = frame_columns;

    let focus = Arc::new(TerminalFocus::new());
    let mut runtime = Runtime::new(initial_state, bridge, focus.clone());
    let mut renderer = Renderer::new();

    runtime.dispatch(Action::Mount);

    // Main loop
    loop {
        if let Some(rx) = updates.as_mut() {
            while let Ok(args) = rx.try_recv() {
                runtime.dispatch(Action::ConfigurationReceived(args));
            }
        }

        // Process any actions from timers and the focus poll FIRST
        let actions_processed = runtime.process_actions();
        if actions_processed > 0 {
            debug!("LOOP: Processed {} actions", actions_processed);
        }

        if runtime.state().system.should_quit {
            info!("Quit requested, exiting");
            break;
        }

        // Render
        let mut regions = MountedRegions::default();
        terminal.draw(|f| {
            let element = runtime.build();
            let display = &runtime.state().system.settings.display;
            regions = renderer.render(&element, f.area(), f.buffer_mut(), display);
        })?;

        // Measure what was just drawn; redraw at once if it moved anything
        if runtime.after_layout(regions) || actions_processed > 0 {
            continue;
        }

        // Poll for terminal events
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key, runtime.state()),
            Event::Mouse(mouse) => mouse_to_action(mouse, runtime.state()),
            Event::FocusLost => {
                focus.set_focused(false);
                Some(Action::HostFocusLost(None))
            }
            Event::FocusGained => {
                focus.set_focused(true);
                None
            }
            Event::Resize(width, height) => Some(Action::ViewportResized { width, height }),
            _ => None,
        };
        if let Some(action) = action {
            runtime.dispatch(action);
        }
    }

    Ok(runtime.into_state().picker.selected)
}
