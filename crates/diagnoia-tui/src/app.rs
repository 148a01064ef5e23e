//! Dashboard state and key handling

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use diagnoia_core::catalog::PriorityEntry;
use diagnoia_core::composer::Reply;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Priority,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Priority, Tab::Chat];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Priority => "Prioridad",
            Tab::Chat => "Chat",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Priority => 0,
            Tab::Chat => 1,
        }
    }

    fn next(&self) -> Tab {
        match self {
            Tab::Priority => Tab::Chat,
            Tab::Chat => Tab::Priority,
        }
    }
}

/// One question and what came back
#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub question: String,
    /// Reply text, or the collaborator error shown instead
    pub answer: Result<String, String>,
    pub at: DateTime<Local>,
}

/// What the event loop must do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    Submit(String),
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub tab: Tab,
    pub ranking: Vec<PriorityEntry>,
    pub ranking_error: Option<String>,
    pub input: String,
    pub history: Vec<ChatEntry>,
    /// Set while a question is being answered
    pub pending: Option<String>,
    pub table_offset: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            tab: Tab::Priority,
            ranking: Vec::new(),
            ranking_error: None,
            input: String::new(),
            history: Vec::new(),
            pending: None,
            table_offset: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = self.tab.next();
                return Action::None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Priority => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('r') => Action::Refresh,
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.table_offset + 1 < self.ranking.len() {
                        self.table_offset += 1;
                    }
                    Action::None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.table_offset = self.table_offset.saturating_sub(1);
                    Action::None
                }
                _ => Action::None,
            },
            Tab::Chat => match key.code {
                KeyCode::Enter => {
                    let question = self.input.trim().to_string();
                    if question.is_empty() || self.pending.is_some() {
                        return Action::None;
                    }
                    self.input.clear();
                    self.pending = Some(question.clone());
                    Action::Submit(question)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    Action::None
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    Action::None
                }
                _ => Action::None,
            },
        }
    }

    pub fn set_ranking(&mut self, ranking: Result<Vec<PriorityEntry>, String>) {
        match ranking {
            Ok(rows) => {
                self.ranking = rows;
                self.ranking_error = None;
            }
            Err(e) => self.ranking_error = Some(e),
        }
        self.table_offset = 0;
    }

    /// Append the answer to the pending question
    pub fn push_reply(&mut self, reply: Result<Reply, String>) {
        let Some(question) = self.pending.take() else {
            return;
        };
        self.history.push(ChatEntry {
            question,
            answer: reply.map(|r| r.text),
            at: Local::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_initial_state() {
        let app = App::new();
        assert_eq!(app.tab, Tab::Priority);
        assert!(app.history.is_empty());
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_tab_switches_views() {
        let mut app = App::new();
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Chat);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Priority);
    }

    #[test]
    fn test_priority_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(press(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.handle_key(press(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_chat_typing_does_not_trigger_shortcuts() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        type_text(&mut app, "qr");
        assert_eq!(app.input, "qr");
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.input, "q");
    }

    #[test]
    fn test_submit_and_reply() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        type_text(&mut app, "  Listar pacientes ");

        let action = app.handle_key(press(KeyCode::Enter));
        assert_eq!(action, Action::Submit("Listar pacientes".into()));
        assert!(app.input.is_empty());

        // One pending interaction at a time
        type_text(&mut app, "otra");
        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);

        app.push_reply(Err("Error [E300]: sin conexión".into()));
        assert!(app.pending.is_none());
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].question, "Listar pacientes");
        assert!(app.history[0].answer.is_err());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(press(KeyCode::Enter)), Action::None);
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_ranking_error_keeps_previous_rows() {
        let mut app = App::new();
        app.set_ranking(Ok(Vec::new()));
        app.set_ranking(Err("Neo4j unavailable".into()));
        assert_eq!(app.ranking_error.as_deref(), Some("Neo4j unavailable"));
    }
}
