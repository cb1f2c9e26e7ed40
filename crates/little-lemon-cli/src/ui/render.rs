use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use little_lemon_core::SnapshotOrigin;

use crate::app::{App, AppState};

use super::screens::{menu, profile};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Search box
            Constraint::Length(2), // Filter bar
            Constraint::Min(6),    // Menu list
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    menu::render_search_box(frame, app, chunks[1]);
    menu::render_filter_bar(frame, app, chunks[2]);
    menu::render_menu_list(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Onboarding => profile::render_onboarding(frame, app),
        AppState::EditingProfile => profile::render_profile(frame, app),
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Little Lemon";
    let subtitle = "  Chicago";
    let right = match app.profile {
        Some(ref profile) => format!("[p] {} | [?] Help", profile.initials()),
        None => "[?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(subtitle, styles::muted_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + subtitle.len() + right.len() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[/] search | [1-3] filter | [p]rofile | [q]uit";

    let (left_text, left_style) = if let Some(ref alert) = app.alert {
        (format!(" {} ", alert), styles::error_style())
    } else if let Some(ref msg) = app.status_message {
        (format!(" {} ", msg), styles::muted_style())
    } else {
        (format!(" {} ", menu_summary(app)), styles::muted_style())
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn menu_summary(app: &App) -> String {
    let count = app.search.displayed().len();
    let source = match app.menu_origin {
        Some(SnapshotOrigin::Cache) => "offline cache",
        Some(SnapshotOrigin::Remote) => "downloaded",
        Some(SnapshotOrigin::Stale) => "menu not downloaded",
        None => "loading",
    };
    format!("{} dishes ({})", count, source)
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(k, styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  Little Lemon", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Menu", styles::highlight_style())),
        key("  /         ", "Search dish names"),
        key("  1/2/3     ", "Toggle Starters/Mains/Desserts"),
        key("  ↑/↓ j/k   ", "Move through the list"),
        key("  PgUp/PgDn ", "Move a page"),
        key("  Esc       ", "Clear the search"),
        Line::from(""),
        Line::from(Span::styled(" Profile", styles::highlight_style())),
        key("  p         ", "Open your profile"),
        key("  Tab       ", "Next field"),
        key("  Space     ", "Toggle a notification"),
        key("  Del       ", "Remove the avatar"),
        Line::from(""),
        key("  q         ", "Quit"),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("  Little Lemon", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    use crate::app::tests::{ready_app, test_app, Offline};

    /// Draw one frame and return the screen as text, one line per row.
    pub(crate) fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_menu_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;
        app.status_message = None;

        let screen = draw(&app);
        assert!(screen.contains("Little Lemon"));
        assert!(screen.contains("[p] T | [?] Help"));
        assert!(screen.contains("[1] Starters"));
        assert!(screen.contains("Greek Salad"));
        assert!(screen.contains("$12.99"));
        assert!(screen.contains("The famous greek salad of crispy lettuce, peppers,..."));
        assert!(screen.contains("3 dishes (downloaded)"));
    }

    #[tokio::test]
    async fn test_alert_replaces_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;
        app.status_message = Some("Menu downloaded".to_string());
        app.alert = Some("Search failed: disk gone".to_string());

        let screen = draw(&app);
        assert!(screen.contains("Search failed: disk gone"));
        assert!(!screen.contains("Menu downloaded"));
    }

    #[tokio::test]
    async fn test_empty_offline_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));
        app.load_menu().await.unwrap();

        let screen = draw(&app);
        assert!(screen.contains("Could not download the menu"));
        assert!(screen.contains("No menu yet"));
    }

    #[test]
    fn test_quit_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));
        app.state = AppState::ConfirmingQuit;

        assert!(draw(&app).contains("Are you sure you want to quit?"));
    }

    #[test]
    fn test_centered_rect_fixed() {
        let area = centered_rect_fixed(40, 10, Rect::new(0, 0, 100, 30));
        assert_eq!(area, Rect::new(30, 10, 40, 10));

        let clipped = centered_rect_fixed(40, 10, Rect::new(0, 0, 20, 5));
        assert_eq!(clipped, Rect::new(0, 0, 20, 5));
    }
}
