//! DiagnOIA TUI - clinical priority dashboard and chat
//!
//! Two views:
//! - Patients ordered by clinical priority
//! - Chat with the assistant, answered from the knowledge graph

mod app;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use diagnoia_core::composer::Assistant;
use diagnoia_core::config::Config;
use diagnoia_core::graph::Neo4jClient;
use diagnoia_core::llm::OllamaClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use app::{Action, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs would draw over the alternate screen, so only when asked for
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let config = Config::load()?;
    let mode = config.assistant.response_mode()?;
    let graph = Neo4jClient::from_config(&config.graph)?;
    let model = OllamaClient::new(config.llm.clone())?;
    let assistant = Assistant::new(Arc::new(graph), Arc::new(model)).with_mode(mode);
    info!(mode = %mode, "Starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &assistant).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn refresh_ranking(app: &mut App, assistant: &Assistant) {
    let ranking = assistant
        .catalog()
        .priority_ranking()
        .await
        .map_err(|e| format!("Error [{}]: {}", e.code(), e));
    app.set_ranking(ranking);
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    assistant: &Assistant,
) -> anyhow::Result<()> {
    let mut app = App::new();
    refresh_ranking(&mut app, assistant).await;

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Refresh => refresh_ranking(&mut app, assistant).await,
            Action::Submit(question) => {
                // Show the pending question before blocking on the answer
                terminal.draw(|frame| ui::draw(frame, &app))?;
                let reply = assistant
                    .respond(&question)
                    .await
                    .map_err(|e| format!("Error [{}]: {}", e.code(), e));
                app.push_reply(reply);
            }
        }
    }
}
