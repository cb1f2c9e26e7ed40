use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use little_lemon_core::utils::{
    format_price, image_url, truncate_description, DESCRIPTION_PREVIEW_CHARS,
};
use little_lemon_core::{MenuItem, Section, SnapshotOrigin};

use crate::app::{App, AppState};
use crate::ui::styles;

pub fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);

    let line = if app.search_input.is_empty() && !searching {
        Line::from(Span::styled(
            " Press / to search dish names",
            styles::muted_style(),
        ))
    } else {
        let cursor = if searching { "▌" } else { "" };
        Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{}{}", app.search_input, cursor), styles::search_style()),
        ])
    };

    let block = Block::default()
        .title(" Search ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" ORDER FOR DELIVERY!  ", styles::highlight_style())];
    for (i, section) in Section::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = app.search.filters().is_selected(*section);
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, section.title()),
            styles::tab_style(selected),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

pub fn render_menu_list(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.search.displayed();

    let title = if app.search.text().is_empty() {
        format!(" Menu ({}) ", items.len())
    } else {
        format!(" Menu matching \"{}\" ({}) ", app.search.text(), items.len())
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(matches!(app.state, AppState::Normal)));

    if items.is_empty() {
        let message = match app.menu_origin {
            Some(SnapshotOrigin::Stale) if app.search.text().is_empty() => {
                " No menu yet. Connect to the internet and restart."
            }
            _ => " No dishes match",
        };
        let paragraph =
            Paragraph::new(Line::from(Span::styled(message, styles::muted_style()))).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let image_base = app.config.image_base_url();
    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.menu_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(dish_lines(item, image_base)).style(style)
        })
        .collect();

    let list = List::new(list_items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.menu_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Name and price, description preview, photo link.
fn dish_lines(item: &MenuItem, image_base: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!(" {}", item.name), styles::dish_name_style()),
            Span::raw("  "),
            Span::styled(format_price(item.price), styles::price_style()),
        ]),
        Line::from(Span::raw(format!(
            "   {}",
            truncate_description(&item.description, DESCRIPTION_PREVIEW_CHARS)
        ))),
        Line::from(Span::styled(
            format!("   {}", image_url(image_base, &item.image)),
            styles::muted_style(),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use crate::app::tests::ready_app;
    use crate::app::AppState;
    use crate::ui::render::tests::draw;
    use little_lemon_core::Section;

    #[tokio::test]
    async fn test_filter_and_search_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.on_filter_toggle(Section::Desserts);
        let outcome = app.next_outcome().await.unwrap();
        app.process_outcome(outcome);

        let screen = draw(&app);
        assert!(screen.contains("Lemon Dessert"));
        assert!(!screen.contains("Greek Salad"));
        assert!(screen.contains("Menu (1)"));

        app.state = AppState::Searching;
        app.search_push('X');
        let outcome = app.next_outcome().await.unwrap();
        app.process_outcome(outcome);

        let screen = draw(&app);
        assert!(screen.contains("X▌"));
        assert!(screen.contains("Menu matching \"X\" (0)"));
        assert!(screen.contains("No dishes match"));
    }
}
