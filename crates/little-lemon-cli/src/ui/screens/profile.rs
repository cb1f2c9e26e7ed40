use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use little_lemon_core::NotificationKind;

use crate::app::{App, OnboardingFocus, ProfileField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

const FIELD_WIDTH: usize = 24;

/// `Label: [value▌]` with the value padded to the field width.
fn field_line(label: &str, value: &str, focused: bool, placeholder: &str) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };
    let shown = if value.is_empty() && !focused {
        Span::styled(format!("{:<width$}", placeholder, width = FIELD_WIDTH), styles::muted_style())
    } else {
        Span::styled(
            format!("{:<width$}", format!("{}{}", value, cursor), width = FIELD_WIDTH),
            style,
        )
    };
    Line::from(vec![
        Span::styled(format!("  {:<12}[", label), styles::muted_style()),
        shown,
        Span::styled("]", styles::muted_style()),
    ])
}

fn button(label: &str, focused: bool, enabled: bool) -> Span<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Span::styled(text, styles::button_style(focused, enabled))
}

pub fn render_onboarding(frame: &mut Frame, app: &App) {
    let height = if app.onboarding_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(48, height, frame.area());
    frame.render_widget(Clear, area);

    let focus = app.onboarding_focus;
    let mut lines = vec![
        Line::from(Span::styled("  Little Lemon", styles::title_style())),
        Line::from(Span::styled(
            "  Let us get to know you",
            styles::highlight_style(),
        )),
        Line::from(""),
        field_line(
            "First name:",
            &app.onboarding_first_name,
            focus == OnboardingFocus::FirstName,
            "",
        ),
        field_line(
            "Email:",
            &app.onboarding_email,
            focus == OnboardingFocus::Email,
            "",
        ),
        Line::from(""),
        Line::from(vec![
            Span::raw("              ["),
            button(
                "Next",
                focus == OnboardingFocus::Button,
                app.can_submit_onboarding(),
            ),
            Span::raw("]"),
        ]),
    ];

    if let Some(ref error) = app.onboarding_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_profile(frame: &mut Frame, app: &App) {
    let height = if app.profile_error.is_some() { 24 } else { 22 };
    let area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, area);

    let draft = &app.profile_draft;
    let focus = app.profile_focus;
    let avatar_placeholder = format!("(none, shows {})", draft.initials());

    let mut lines = vec![
        Line::from(Span::styled(" Personal information", styles::title_style())),
        Line::from(""),
        field_line(
            "Avatar:",
            draft.image.as_deref().unwrap_or(""),
            focus == ProfileField::Avatar,
            &avatar_placeholder,
        ),
        field_line("First name:", &draft.first_name, focus == ProfileField::FirstName, ""),
        field_line("Last name:", &draft.last_name, focus == ProfileField::LastName, ""),
        field_line("Email:", &draft.email, focus == ProfileField::Email, ""),
        field_line(
            "Phone:",
            &draft.phone_number,
            focus == ProfileField::Phone,
            "(999) 999-9999",
        ),
        Line::from(""),
        Line::from(Span::styled(" Email notifications", styles::title_style())),
    ];

    for kind in NotificationKind::ALL {
        let focused = focus == ProfileField::Notification(kind);
        let mark = if draft.notifications.get(kind) { "[x]" } else { "[ ]" };
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{} {}", mark, kind.label()), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        button("Save changes", focus == ProfileField::Save, true),
        Span::raw(" "),
        button("Discard", focus == ProfileField::Discard, true),
    ]));
    lines.push(Line::from(vec![
        Span::raw("  "),
        button("Log out", focus == ProfileField::Logout, true),
    ]));

    if let Some(ref error) = app.profile_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Tab", styles::help_key_style()),
        Span::styled(" next  ", styles::muted_style()),
        Span::styled("Space", styles::help_key_style()),
        Span::styled(" toggle  ", styles::muted_style()),
        Span::styled("Del", styles::help_key_style()),
        Span::styled(" remove avatar  ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" discard", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(format!(" Profile: {} ", draft.full_name()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
