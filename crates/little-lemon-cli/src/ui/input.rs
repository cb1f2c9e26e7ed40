//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Search box edits
//! go through `App::search_push`/`search_pop`, which hand the text to the
//! debouncer; the query itself runs when the debounced text comes back.

use crossterm::event::{KeyCode, KeyEvent};

use little_lemon_core::Section;

use crate::app::{App, AppState, OnboardingFocus, ProfileField, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::Onboarding => return handle_onboarding_input(app, key),
        AppState::EditingProfile => {
            handle_profile_input(app, key);
            return false;
        }
        AppState::Searching => {
            handle_search_input(app, key);
            return false;
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return false;
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return true;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return false;
        }
        AppState::Quitting => return true,
        AppState::Normal => {}
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('/') => app.state = AppState::Searching,
        KeyCode::Char('p') => app.open_profile(),
        KeyCode::Char(c @ '1'..='3') => {
            let index = (c as usize) - ('1' as usize);
            app.on_filter_toggle(Section::ALL[index]);
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.menu_selection = 0,
        KeyCode::Esc => app.clear_search(),
        _ => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.clear_search();
        }
        KeyCode::Enter => {
            // Keep the search text active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Up => app.select_prev(1),
        KeyCode::Down => app.select_next(1),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_onboarding_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Nothing to show behind an unfinished onboarding
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => app.onboarding_focus = app.onboarding_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.onboarding_focus = app.onboarding_focus.prev(),
        KeyCode::Enter => {
            if app.onboarding_focus != OnboardingFocus::Button {
                app.onboarding_focus = app.onboarding_focus.next();
            } else if app.can_submit_onboarding() {
                app.submit_onboarding();
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.onboarding_field_mut() {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.onboarding_field_mut() {
                field.push(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_profile_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.discard_profile(),
        KeyCode::Down | KeyCode::Tab => app.profile_focus = app.profile_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.profile_focus = app.profile_focus.prev(),
        KeyCode::Enter => app.profile_activate(),
        KeyCode::Backspace => app.profile_backspace(),
        KeyCode::Delete if app.profile_focus == ProfileField::Avatar => app.remove_avatar(),
        KeyCode::Char(c) => app.profile_input(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use little_lemon_core::NotificationKind;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::app::tests::{ready_app, test_app, Offline};

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_issue_one_debounced_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;
        app.start_live_search();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);
        type_text(&mut app, "Lem");
        assert_eq!(app.search_input, "Lem");
        app.check_background_tasks().await;
        assert_eq!(app.search.text(), "");

        tokio::time::sleep(app.config.debounce() + Duration::from_millis(10)).await;
        app.check_background_tasks().await;
        assert_eq!(app.search.text(), "Lem");

        let outcome = app.next_outcome().await.unwrap();
        assert!(app.process_outcome(outcome));
        assert_eq!(app.search.displayed()[0].name, "Lemon Dessert");

        let another = tokio::time::timeout(Duration::from_secs(2), app.next_outcome()).await;
        assert!(another.is_err());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_input, "Lem");
    }

    #[tokio::test]
    async fn test_filter_keys_and_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        press(&mut app, KeyCode::Char('2'));
        assert!(app.search.filters().is_selected(Section::Mains));
        let outcome = app.next_outcome().await.unwrap();
        app.process_outcome(outcome);
        assert_eq!(app.search.displayed().len(), 1);

        press(&mut app, KeyCode::Char('2'));
        let outcome = app.next_outcome().await.unwrap();
        app.process_outcome(outcome);
        assert_eq!(app.search.displayed().len(), 3);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.menu_selection, 2);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.menu_selection, 0);
    }

    #[tokio::test]
    async fn test_escape_clears_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "Gr");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_input, "G");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.state, AppState::Normal);
        assert!(app.search_input.is_empty());
        assert_eq!(app.search.text(), "");
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_onboarding_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));
        app.start_onboarding();

        type_text(&mut app, "Tilly");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "tilly@littlelemon");
        press(&mut app, KeyCode::Tab);

        // Disabled until the email is complete
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Onboarding);

        press(&mut app, KeyCode::BackTab);
        type_text(&mut app, ".com");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::Normal);
        let saved = app.profiles.load().unwrap().unwrap();
        assert_eq!(saved.first_name, "Tilly");
        assert_eq!(saved.email, "tilly@littlelemon.com");
    }

    #[tokio::test]
    async fn test_profile_keys_edit_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.state, AppState::EditingProfile);

        // First name -> Last name
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Lemon");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.profiles.load().unwrap().unwrap().last_name, "");

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.profile_focus, ProfileField::Avatar);
        type_text(&mut app, "me.png");
        press(&mut app, KeyCode::Delete);
        assert!(app.profile_draft.image.is_none());

        app.profile_focus = ProfileField::Notification(NotificationKind::SpecialOffers);
        press(&mut app, KeyCode::Char(' '));
        app.profile_focus = ProfileField::Save;
        press(&mut app, KeyCode::Enter);

        let saved = app.profiles.load().unwrap().unwrap();
        assert!(!saved.notifications.special_offers);
        assert!(saved.image.is_none());
    }
}
