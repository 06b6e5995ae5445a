//! Terminal front-end (Ratatui + Crossterm).
//! - Talks to the store directly against the local database
//! - Refetches whenever the change feed reports a write for the signed-in user

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::auth::Authenticator;
use crate::store::Store;

pub mod api;
pub mod forms;
pub mod input;
pub mod state;
pub mod ui;
pub mod util;

const TICK_RATE: Duration = Duration::from_millis(200);

pub async fn run(store: Store, auth: Authenticator) -> Result<()> {
    let mut app = state::App::new(api::Client::new(store, auth));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = app.api.sign_out().await {
        tracing::warn!(error = %e, "sign-out on exit failed");
    }
    result
}

async fn event_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut state::App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let was_signed_in = app.signed_in();
                app.handle_key(key).await?;
                if !was_signed_in && app.signed_in() {
                    app.status = "Press ? for help | q to quit".into();
                    if let Err(e) = app.refresh().await {
                        app.status = format!("Refresh failed: {e}");
                    }
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick().await;
            last_tick = Instant::now();
        }

        if app.quit {
            return Ok(());
        }
    }
}
