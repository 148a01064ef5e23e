//! Dashboard rendering

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
};

use diagnoia_core::triage::Priority;

use crate::app::{App, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    let titles: Vec<&str> = Tab::ALL.iter().map(Tab::title).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("DiagnOIA - Sistema Clínico Inteligente"),
        );
    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Priority => draw_priority(frame, app, chunks[1]),
        Tab::Chat => draw_chat(frame, app, chunks[1]),
    }

    let help = match app.tab {
        Tab::Priority => "Tab: Chat | r: Actualizar | ↑/↓: Desplazar | q/Esc: Salir",
        Tab::Chat => "Tab: Prioridad | Enter: Enviar | Esc: Salir",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Urgente => Color::Red,
        Priority::Moderada => Color::Yellow,
        Priority::Baja => Color::Green,
        Priority::SinDiagnostico => Color::DarkGray,
    }
}

fn draw_priority(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Pacientes ordenados por prioridad clínica");

    if let Some(error) = &app.ranking_error {
        let text = Paragraph::new(format!("{}\n\nPresioná 'r' para reintentar.", error))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    if app.ranking.is_empty() {
        frame.render_widget(
            Paragraph::new("No hay pacientes registrados.").block(block),
            area,
        );
        return;
    }

    let header = Row::new(
        ["Orden", "Paciente", "Nombre", "Apellido", "Enfermedad", "Prioridad", "Acciones"]
            .into_iter()
            .map(Cell::from),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app.ranking.iter().skip(app.table_offset).map(|entry| {
        Row::new(vec![
            Cell::from(entry.rank.to_string()),
            Cell::from(entry.patient.id.clone()),
            Cell::from(entry.patient.given_name.clone()),
            Cell::from(entry.patient.family_name.clone()),
            Cell::from(entry.condition.clone().unwrap_or_default()),
            Cell::from(entry.priority.label())
                .style(Style::default().fg(priority_color(entry.priority))),
            Cell::from(entry.actions.join(", ")),
        ])
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn draw_chat(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();
    for entry in &app.history {
        lines.push(Line::from(vec![
            Span::styled("Usuario: ", label),
            Span::raw(entry.question.clone()),
            Span::styled(
                format!("  {}", entry.at.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(Span::styled("DiagnOIA:", label.fg(Color::Cyan))));
        match &entry.answer {
            Ok(text) => lines.extend(text.lines().map(|l| Line::from(l.to_string()))),
            Err(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))),
        }
        lines.push(Line::default());
    }
    if let Some(question) = &app.pending {
        lines.push(Line::from(vec![
            Span::styled("Usuario: ", label),
            Span::raw(question.clone()),
        ]));
        lines.push(Line::from(Span::styled(
            "DiagnOIA: consultando...",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let history = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let history_area = chunks[0];
    let scroll = bottom_scroll(&history, history_area);
    let history = history.scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Chat con el asistente clínico"),
    );
    frame.render_widget(history, history_area);

    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Escribí tu pregunta"),
    );
    frame.render_widget(input, chunks[1]);

    let typed = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
    let cursor_x = chunks[1]
        .x
        .saturating_add(1)
        .saturating_add(typed)
        .min(chunks[1].right().saturating_sub(2));
    frame.set_cursor_position((cursor_x, chunks[1].y + 1));
}

/// Scroll offset that keeps the last wrapped row in view inside a bordered `area`
fn bottom_scroll(paragraph: &Paragraph, area: Rect) -> u16 {
    let inner_width = area.width.saturating_sub(2);
    let visible = usize::from(area.height.saturating_sub(2));
    let rows = paragraph.line_count(inner_width);
    u16::try_from(rows.saturating_sub(visible)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::app::ChatEntry;

    fn long_answer(marker: &str) -> String {
        let mut words = vec!["palabra"; 60];
        words.push(marker);
        words.join(" ")
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..height {
            for x in 0..width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[test]
    fn test_chat_shows_latest_wrapped_reply() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        for n in 1..=3 {
            app.history.push(ChatEntry {
                question: format!("pregunta{}", n),
                answer: Ok(long_answer(&format!("FIN{}", n))),
                at: Local::now(),
            });
        }

        let screen = render(&app, 40, 30);
        assert!(screen.contains("FIN3"));
        assert!(!screen.contains("FIN1"));
    }

    #[test]
    fn test_short_history_is_not_scrolled() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        app.history.push(ChatEntry {
            question: "pregunta1".into(),
            answer: Ok("respuesta corta".into()),
            at: Local::now(),
        });

        let screen = render(&app, 60, 30);
        assert!(screen.contains("pregunta1"));
        assert!(screen.contains("respuesta corta"));
    }

    #[test]
    fn test_bottom_scroll_counts_rows() {
        let paragraph = Paragraph::new("uno\ndos\ntres\ncuatro").wrap(Wrap { trim: false });
        assert_eq!(bottom_scroll(&paragraph, Rect::new(0, 0, 20, 4)), 2);
        assert_eq!(bottom_scroll(&paragraph, Rect::new(0, 0, 20, 10)), 0);

        let wrapped = Paragraph::new("aa bb cc dd").wrap(Wrap { trim: false });
        assert!(bottom_scroll(&wrapped, Rect::new(0, 0, 7, 3)) > 0);
        assert_eq!(bottom_scroll(&wrapped, Rect::new(0, 0, 30, 3)), 0);
    }

    #[test]
    fn test_long_input_keeps_cursor_inside_box() {
        let mut app = App::new();
        app.tab = Tab::Chat;
        app.input = "x".repeat(500);
        render(&app, 40, 30);
    }
}
