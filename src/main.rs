use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

mod actions;
mod app;
mod tmux;

use actions::Action;
use app::App;
use tmux::{inside_tmux, Scanner, TmuxClient};

#[tokio::main]
async fn main() -> Result<()> {
    if !inside_tmux() {
        eprintln!("csm must be run inside a tmux session.");
        std::process::exit(1);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Create event channel
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

    // Initialize terminal
    let mut terminal = ratatui::init();

    // Spawn input handler
    let input_tx = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    match evt {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            let _ = input_tx.send(Action::KeyPress(key));
                        }
                        Event::Resize(..) => {
                            let _ = input_tx.send(Action::Resize);
                        }
                        _ => {}
                    }
                }
            }
        }
    });

    // Spawn the refresh loop. Scan and sleep run in sequence, so at most
    // one scan is ever in flight.
    let scan_tx = tx.clone();
    tokio::spawn(async move {
        let scanner = Scanner::new(TmuxClient::new());
        loop {
            let snapshot = scanner.scan().await;
            let _ = scan_tx.send(Action::SnapshotArrived(snapshot));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });

    // Create app state
    let mut app = App::new();

    // Main event loop
    let result = loop {
        // Render
        terminal.draw(|f| app.render(f))?;

        // Handle events from channel
        tokio::select! {
            Some(action) = rx.recv() => {
                match app.handle_action(action) {
                    Ok(should_quit) => {
                        if should_quit {
                            break Ok(());
                        }
                    }
                    Err(e) => {
                        break Err(e);
                    }
                }
            }
        }
    };

    // Restore terminal, then switch focus if a session was chosen
    ratatui::restore();
    if let Some(pane_id) = app.selected_pane_id.take() {
        TmuxClient::new().switch_client(&pane_id).await;
    }
    result
}
