//! Application state for the Little Lemon terminal UI.
//!
//! `App` owns the process-wide menu store handle, the loader and query
//! engine built on it, the profile store, and the state of each screen.
//! Debounced search text, query results and the first-run persistence task
//! come back asynchronously and are picked up by `check_background_tasks`.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use little_lemon_core::profile::{is_valid_email, is_valid_name};
use little_lemon_core::search::spawn_query;
use little_lemon_core::utils::mask_phone;
use little_lemon_core::{
    ApplyResult, CacheLoader, Config, Debouncer, MenuClient, MenuSource, MenuStore,
    NotificationKind, PersistenceTask, Profile, ProfileChanges, ProfileStore, QueryEngine,
    QueryOutcome, SearchState, Section, SnapshotOrigin,
};

/// Rows moved by PageUp/PageDown in the menu list
pub const PAGE_SCROLL_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    Onboarding,
    EditingProfile,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingFocus {
    FirstName,
    Email,
    Button,
}

impl OnboardingFocus {
    pub fn next(self) -> Self {
        match self {
            OnboardingFocus::FirstName => OnboardingFocus::Email,
            OnboardingFocus::Email => OnboardingFocus::Button,
            OnboardingFocus::Button => OnboardingFocus::FirstName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            OnboardingFocus::FirstName => OnboardingFocus::Button,
            OnboardingFocus::Email => OnboardingFocus::FirstName,
            OnboardingFocus::Button => OnboardingFocus::Email,
        }
    }
}

/// Focusable rows of the profile screen, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Avatar,
    FirstName,
    LastName,
    Email,
    Phone,
    Notification(NotificationKind),
    Save,
    Discard,
    Logout,
}

impl ProfileField {
    pub const ALL: [ProfileField; 12] = [
        ProfileField::Avatar,
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Notification(NotificationKind::OrderStatuses),
        ProfileField::Notification(NotificationKind::PasswordChanges),
        ProfileField::Notification(NotificationKind::SpecialOffers),
        ProfileField::Notification(NotificationKind::Newsletter),
        ProfileField::Save,
        ProfileField::Discard,
        ProfileField::Logout,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct App {
    pub config: Config,
    pub store: MenuStore,
    pub loader: CacheLoader,
    pub engine: QueryEngine,
    pub profiles: ProfileStore,

    pub state: AppState,

    // Menu screen
    pub search: SearchState,
    pub search_input: String,
    pub menu_selection: usize,
    pub menu_origin: Option<SnapshotOrigin>,

    // Saved profile, if onboarded
    pub profile: Option<Profile>,

    // Onboarding form
    pub onboarding_first_name: String,
    pub onboarding_email: String,
    pub onboarding_focus: OnboardingFocus,
    pub onboarding_error: Option<String>,

    // Profile form; edits stay in the draft until saved
    pub profile_draft: Profile,
    pub profile_focus: ProfileField,
    pub profile_error: Option<String>,

    // Background task channels
    debouncer: Option<Debouncer<String>>,
    debounced_rx: Option<mpsc::UnboundedReceiver<String>>,
    query_rx: mpsc::UnboundedReceiver<QueryOutcome>,
    query_tx: mpsc::UnboundedSender<QueryOutcome>,
    persistence: Option<PersistenceTask>,

    pub status_message: Option<String>,
    /// Failures shown in the status bar until the next successful query.
    pub alert: Option<String>,
}

impl App {
    /// Open the store and wire up the services.
    pub async fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let db_path = config.database_path()?;
        debug!(?db_path, "Menu store location");
        let store = MenuStore::open(&db_path).await?;

        let client = MenuClient::new(config.menu_url(), config.request_timeout())?;
        let profiles = ProfileStore::new(config.profile_path()?);

        Ok(Self::with_services(config, store, Arc::new(client), profiles))
    }

    pub fn with_services(
        config: Config,
        store: MenuStore,
        source: Arc<dyn MenuSource>,
        profiles: ProfileStore,
    ) -> Self {
        let loader = CacheLoader::new(store.clone(), source);
        let engine = QueryEngine::new(store.clone());
        let (query_tx, query_rx) = mpsc::unbounded_channel();

        let profile = match profiles.load() {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Failed to read saved profile");
                None
            }
        };

        Self {
            config,
            store,
            loader,
            engine,
            profiles,
            state: AppState::Normal,
            search: SearchState::default(),
            search_input: String::new(),
            menu_selection: 0,
            menu_origin: None,
            profile,
            onboarding_first_name: String::new(),
            onboarding_email: String::new(),
            onboarding_focus: OnboardingFocus::FirstName,
            onboarding_error: None,
            profile_draft: Profile::default(),
            profile_focus: ProfileField::FirstName,
            profile_error: None,
            debouncer: None,
            debounced_rx: None,
            query_rx,
            query_tx,
            persistence: None,
            status_message: None,
            alert: None,
        }
    }

    /// Load the initial menu snapshot into the list.
    pub async fn load_menu(&mut self) -> Result<()> {
        let snapshot = self.loader.ensure_menu_loaded().await?;
        match snapshot.origin {
            SnapshotOrigin::Cache => {
                debug!(items = snapshot.items.len(), "Menu loaded from cache");
            }
            SnapshotOrigin::Remote => {
                self.status_message = Some("Menu downloaded".to_string());
            }
            SnapshotOrigin::Stale => {
                let reason = snapshot
                    .fetch_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                self.alert = Some(format!("Could not download the menu: {}", reason));
            }
        }
        self.menu_origin = Some(snapshot.origin);
        self.persistence = snapshot.persistence;
        self.search = SearchState::new(snapshot.items);
        self.menu_selection = 0;
        Ok(())
    }

    /// Route search box edits through a debouncer. Needs a running runtime.
    pub fn start_live_search(&mut self) {
        let (debouncer, rx) = Debouncer::new(self.config.debounce());
        self.debouncer = Some(debouncer);
        self.debounced_rx = Some(rx);
    }

    pub fn needs_onboarding(&self) -> bool {
        !self.profiles.is_onboarded()
    }

    // =========================================================================
    // Menu screen
    // =========================================================================

    pub fn search_push(&mut self, c: char) {
        self.search_input.push(c);
        self.search_edited();
    }

    pub fn search_pop(&mut self) {
        if self.search_input.pop().is_some() {
            self.search_edited();
        }
    }

    pub fn clear_search(&mut self) {
        if !self.search_input.is_empty() {
            self.search_input.clear();
            self.search_edited();
        }
    }

    fn search_edited(&mut self) {
        self.menu_selection = 0;
        if let Some(ref debouncer) = self.debouncer {
            debouncer.push(self.search_input.clone());
            return;
        }
        let text = self.search_input.clone();
        self.on_search_text(text);
    }

    /// Debounced search text arrived.
    pub fn on_search_text(&mut self, text: String) {
        self.search.set_text(text);
        self.issue_query();
    }

    pub fn on_filter_toggle(&mut self, section: Section) {
        self.search.toggle_filter(section);
        self.menu_selection = 0;
        self.issue_query();
    }

    fn issue_query(&mut self) {
        if let Some((ticket, query)) = self.search.begin_query() {
            debug!(?ticket, text = %query.text, "Issuing menu query");
            spawn_query(self.engine.clone(), ticket, query, self.query_tx.clone());
        }
    }

    /// Receive the next query outcome.
    pub async fn next_outcome(&mut self) -> Option<QueryOutcome> {
        self.query_rx.recv().await
    }

    /// Apply a query outcome. Returns true when the list changed.
    pub fn process_outcome(&mut self, outcome: QueryOutcome) -> bool {
        match self.search.apply(outcome) {
            ApplyResult::Applied(count) => {
                debug!(count, "Menu list updated");
                self.alert = None;
                self.menu_selection = self.menu_selection.min(count.saturating_sub(1));
                true
            }
            ApplyResult::Stale => false,
            ApplyResult::Failed(e) => {
                warn!(error = %e, "Menu query failed");
                self.alert = Some(format!("Search failed: {}", e));
                false
            }
        }
    }

    pub fn select_next(&mut self, step: usize) {
        let len = self.search.displayed().len();
        if len > 0 {
            self.menu_selection = (self.menu_selection + step).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.menu_selection = self.menu_selection.saturating_sub(step);
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Pick up debounced text, query results and the persistence task.
    pub async fn check_background_tasks(&mut self) {
        let mut latest_text = None;
        if let Some(ref mut rx) = self.debounced_rx {
            while let Ok(text) = rx.try_recv() {
                latest_text = Some(text);
            }
        }
        if let Some(text) = latest_text {
            self.on_search_text(text);
        }

        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.query_rx.try_recv() {
            outcomes.push(outcome);
        }
        for outcome in outcomes {
            self.process_outcome(outcome);
        }

        let finished = self
            .persistence
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if finished {
            if let Some(task) = self.persistence.take() {
                self.report_persistence(task).await;
            }
        }
    }

    /// Wait for a pending first-run write, e.g. before exit.
    pub async fn wait_for_cache(&mut self) {
        if let Some(task) = self.persistence.take() {
            info!("Waiting for menu cache write to finish");
            self.report_persistence(task).await;
        }
    }

    async fn report_persistence(&mut self, task: PersistenceTask) {
        match task.wait().await {
            Ok(rows) => info!(rows, "Menu saved for offline use"),
            Err(e) => {
                error!(error = %e, "Menu cache write failed");
                self.alert = Some("Menu could not be saved offline".to_string());
            }
        }
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status_message.take()
    }

    // =========================================================================
    // Onboarding
    // =========================================================================

    pub fn start_onboarding(&mut self) {
        self.onboarding_first_name.clear();
        self.onboarding_email.clear();
        self.onboarding_focus = OnboardingFocus::FirstName;
        self.onboarding_error = None;
        self.state = AppState::Onboarding;
    }

    /// The text field under focus, if any.
    pub fn onboarding_field_mut(&mut self) -> Option<&mut String> {
        match self.onboarding_focus {
            OnboardingFocus::FirstName => Some(&mut self.onboarding_first_name),
            OnboardingFocus::Email => Some(&mut self.onboarding_email),
            OnboardingFocus::Button => None,
        }
    }

    /// The Next button stays disabled until both fields are valid.
    pub fn can_submit_onboarding(&self) -> bool {
        is_valid_name(&self.onboarding_first_name) && is_valid_email(&self.onboarding_email)
    }

    pub fn submit_onboarding(&mut self) {
        match self.onboard(&self.onboarding_first_name, &self.onboarding_email) {
            Ok(profile) => {
                self.status_message = Some(format!("Welcome, {}!", profile.first_name));
                self.onboarding_error = None;
                self.profile = Some(profile);
                self.state = AppState::Normal;
            }
            Err(e) => self.onboarding_error = Some(e.to_string()),
        }
    }

    pub fn onboard(&self, first_name: &str, email: &str) -> Result<Profile> {
        let profile = Profile::onboard(first_name, email)?;
        self.profiles.save(&profile)?;
        info!("Onboarding complete");
        Ok(profile)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Open the profile screen on a copy of the saved profile.
    pub fn open_profile(&mut self) {
        match self.profiles.load() {
            Ok(Some(profile)) => {
                self.profile_draft = profile;
                self.profile_focus = ProfileField::FirstName;
                self.profile_error = None;
                self.state = AppState::EditingProfile;
            }
            Ok(None) => self.start_onboarding(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved profile");
                self.alert = Some(format!("Could not read profile: {}", e));
            }
        }
    }

    pub fn profile_input(&mut self, c: char) {
        let draft = &mut self.profile_draft;
        match self.profile_focus {
            ProfileField::FirstName => draft.first_name.push(c),
            ProfileField::LastName => draft.last_name.push(c),
            ProfileField::Email => draft.email.push(c),
            ProfileField::Phone => {
                let mut raw = draft.phone_number.clone();
                raw.push(c);
                draft.phone_number = mask_phone(&raw);
            }
            ProfileField::Avatar => draft.image.get_or_insert_with(String::new).push(c),
            ProfileField::Notification(kind) if c == ' ' => draft.notifications.toggle(kind),
            _ => {}
        }
    }

    pub fn profile_backspace(&mut self) {
        let draft = &mut self.profile_draft;
        match self.profile_focus {
            ProfileField::FirstName => {
                draft.first_name.pop();
            }
            ProfileField::LastName => {
                draft.last_name.pop();
            }
            ProfileField::Email => {
                draft.email.pop();
            }
            ProfileField::Phone => {
                let mut digits: String = draft
                    .phone_number
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                digits.pop();
                draft.phone_number = mask_phone(&digits);
            }
            ProfileField::Avatar => {
                if let Some(ref mut path) = draft.image {
                    path.pop();
                    if path.is_empty() {
                        draft.image = None;
                    }
                }
            }
            _ => {}
        }
    }

    pub fn remove_avatar(&mut self) {
        self.profile_draft.image = None;
    }

    /// Enter on the focused row.
    pub fn profile_activate(&mut self) {
        match self.profile_focus {
            ProfileField::Notification(kind) => self.profile_draft.notifications.toggle(kind),
            ProfileField::Save => self.save_profile(),
            ProfileField::Discard => self.discard_profile(),
            ProfileField::Logout => self.logout_from_profile(),
            _ => self.profile_focus = self.profile_focus.next(),
        }
    }

    pub fn save_profile(&mut self) {
        let changes = ProfileChanges {
            first_name: Some(self.profile_draft.first_name.clone()),
            last_name: Some(self.profile_draft.last_name.clone()),
            email: Some(self.profile_draft.email.clone()),
            phone_number: Some(self.profile_draft.phone_number.clone()),
            image: Some(self.profile_draft.image.clone()),
            notifications: NotificationKind::ALL
                .iter()
                .map(|kind| (*kind, self.profile_draft.notifications.get(*kind)))
                .collect(),
        };
        match self.profiles.update(changes) {
            Ok(profile) => {
                info!("Profile saved");
                self.profile = Some(profile);
                self.profile_error = None;
                self.status_message = Some("Profile saved".to_string());
                self.state = AppState::Normal;
            }
            Err(e) => self.profile_error = Some(e.to_string()),
        }
    }

    /// Drop the draft; the saved profile is untouched.
    pub fn discard_profile(&mut self) {
        self.profile_draft = self.profile.clone().unwrap_or_default();
        self.profile_error = None;
        self.status_message = Some("Changes discarded".to_string());
        self.state = AppState::Normal;
    }

    fn logout_from_profile(&mut self) {
        match self.logout() {
            Ok(()) => {
                self.profile = None;
                self.profile_draft = Profile::default();
                self.start_onboarding();
            }
            Err(e) => self.profile_error = Some(e.to_string()),
        }
    }

    /// Apply edits given on the command line.
    pub fn update_profile(&mut self, changes: ProfileChanges) -> Result<Profile> {
        let profile = self.profiles.update(changes)?;
        self.profile = Some(profile.clone());
        Ok(profile)
    }

    pub fn logout(&self) -> Result<()> {
        self.profiles.clear()?;
        info!("Profile cleared");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use little_lemon_core::{FetchError, MenuItem, QueryError, StoreError};
    use std::time::Duration;

    pub(crate) struct FixedMenu(pub Vec<MenuItem>);

    #[async_trait]
    impl MenuSource for FixedMenu {
        async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FetchError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) struct Offline;

    #[async_trait]
    impl MenuSource for Offline {
        async fn fetch_menu(&self) -> Result<Vec<MenuItem>, FetchError> {
            Err(FetchError::ServerError("maintenance".to_string()))
        }
    }

    pub(crate) fn item(name: &str, category: &str, price: f64) -> MenuItem {
        MenuItem {
            name: name.to_string(),
            category: category.to_string(),
            description: "The famous greek salad of crispy lettuce, peppers, olives and our Chicago style feta cheese".to_string(),
            price,
            image: "greekSalad.jpg".to_string(),
        }
    }

    pub(crate) fn test_app(dir: &tempfile::TempDir, source: Arc<dyn MenuSource>) -> App {
        let store = MenuStore::open_in_memory().unwrap();
        let profiles = ProfileStore::new(dir.path().join("profile.json"));
        App::with_services(Config::default(), store, source, profiles)
    }

    pub(crate) fn menu() -> Vec<MenuItem> {
        vec![
            item("Greek Salad", "starters", 12.99),
            item("Grilled Fish", "mains", 20.0),
            item("Lemon Dessert", "desserts", 6.99),
        ]
    }

    /// An app with the menu cached and a saved profile.
    pub(crate) async fn ready_app(dir: &tempfile::TempDir) -> App {
        let mut app = test_app(dir, Arc::new(FixedMenu(menu())));
        app.load_menu().await.unwrap();
        app.wait_for_cache().await;
        let profile = app.onboard("Tilly", "tilly@littlelemon.com").unwrap();
        app.profile = Some(profile);
        app
    }

    #[tokio::test]
    async fn test_first_run_downloads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(FixedMenu(menu())));

        app.load_menu().await.unwrap();
        assert_eq!(app.search.displayed().len(), 3);
        assert_eq!(app.menu_origin, Some(SnapshotOrigin::Remote));
        assert_eq!(app.take_status().as_deref(), Some("Menu downloaded"));

        app.wait_for_cache().await;
        assert_eq!(app.store.item_count().await.unwrap(), 3);
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_search_and_filter_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.search_push('G');
        app.search_push('r');
        // Without a debouncer every edit queries at once; only the newest applies.
        let first = app.next_outcome().await.unwrap();
        let second = app.next_outcome().await.unwrap();
        let applied = [app.process_outcome(first), app.process_outcome(second)];
        assert_eq!(applied.iter().filter(|a| **a).count(), 1);
        assert_eq!(app.search.text(), "Gr");
        assert_eq!(app.search.displayed().len(), 2);

        app.on_filter_toggle(Section::Mains);
        let outcome = app.next_outcome().await.unwrap();
        assert!(app.process_outcome(outcome));
        assert_eq!(app.search.displayed().len(), 1);
        assert_eq!(app.search.displayed()[0].name, "Grilled Fish");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_is_debounced() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;
        app.start_live_search();

        for c in "Lem".chars() {
            app.search_push(c);
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.check_background_tasks().await;
        }
        assert_eq!(app.search.text(), "");

        tokio::time::sleep(app.config.debounce()).await;
        app.check_background_tasks().await;
        assert_eq!(app.search.text(), "Lem");

        let outcome = app.next_outcome().await.unwrap();
        assert!(app.process_outcome(outcome));
        assert_eq!(app.search.displayed().len(), 1);
        assert_eq!(app.search.displayed()[0].name, "Lemon Dessert");
    }

    #[tokio::test]
    async fn test_failed_query_raises_alert() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.search.set_text("Gr");
        let (ticket, _) = app.search.begin_query().unwrap();
        let failed = QueryOutcome {
            ticket,
            result: Err(QueryError(StoreError::Io(std::io::Error::other("disk gone")))),
        };
        assert!(!app.process_outcome(failed));
        assert!(app.alert.as_deref().unwrap().starts_with("Search failed"));
        assert_eq!(app.search.displayed().len(), 3);

        // A successful retry clears it
        app.on_search_text("Gr".to_string());
        let outcome = app.next_outcome().await.unwrap();
        assert!(app.process_outcome(outcome));
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_offline_first_run_raises_alert() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));

        app.load_menu().await.unwrap();
        assert!(app.search.displayed().is_empty());
        assert_eq!(app.menu_origin, Some(SnapshotOrigin::Stale));
        assert!(app
            .alert
            .as_deref()
            .unwrap()
            .starts_with("Could not download the menu"));
    }

    #[test]
    fn test_list_selection_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));
        app.search = SearchState::new(menu());

        app.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(app.menu_selection, 2);
        app.select_prev(1);
        assert_eq!(app.menu_selection, 1);
        app.select_prev(PAGE_SCROLL_SIZE);
        assert_eq!(app.menu_selection, 0);
    }

    #[test]
    fn test_onboarding_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir, Arc::new(Offline));
        assert!(app.needs_onboarding());

        app.start_onboarding();
        app.onboarding_first_name = "Al".to_string();
        app.onboarding_email = "al@example.com".to_string();
        assert!(!app.can_submit_onboarding());
        app.submit_onboarding();
        assert_eq!(app.state, AppState::Onboarding);
        assert!(app.onboarding_error.is_some());

        app.onboarding_first_name = "Tilly".to_string();
        assert!(app.can_submit_onboarding());
        app.submit_onboarding();
        assert_eq!(app.state, AppState::Normal);
        assert!(!app.needs_onboarding());
        assert_eq!(app.profiles.load().unwrap(), app.profile);
    }

    #[tokio::test]
    async fn test_profile_edit_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.open_profile();
        assert_eq!(app.state, AppState::EditingProfile);

        app.profile_focus = ProfileField::LastName;
        "Lemon".chars().for_each(|c| app.profile_input(c));
        app.profile_focus = ProfileField::Phone;
        "3125550100".chars().for_each(|c| app.profile_input(c));
        app.profile_backspace();
        app.profile_input('9');
        app.profile_focus = ProfileField::Avatar;
        "me.png".chars().for_each(|c| app.profile_input(c));
        app.profile_focus = ProfileField::Notification(NotificationKind::Newsletter);
        app.profile_activate();

        app.profile_focus = ProfileField::Save;
        app.profile_activate();
        assert_eq!(app.state, AppState::Normal);

        let saved = app.profiles.load().unwrap().unwrap();
        assert_eq!(saved.last_name, "Lemon");
        assert_eq!(saved.phone_number, "(312) 555-0109");
        assert_eq!(saved.image.as_deref(), Some("me.png"));
        assert!(!saved.notifications.newsletter);
        assert!(saved.notifications.order_statuses);
        assert_eq!(app.profile, Some(saved));
    }

    #[tokio::test]
    async fn test_profile_discard_keeps_saved_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;
        let before = app.profiles.load().unwrap();

        app.open_profile();
        app.profile_focus = ProfileField::FirstName;
        app.profile_input('!');
        app.remove_avatar();
        app.profile_focus = ProfileField::Discard;
        app.profile_activate();

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.profiles.load().unwrap(), before);
        assert_eq!(app.profile_draft.first_name, "Tilly");
    }

    #[tokio::test]
    async fn test_invalid_profile_edit_stays_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.open_profile();
        app.profile_focus = ProfileField::Email;
        app.profile_draft.email = "not-an-email".to_string();
        app.save_profile();

        assert_eq!(app.state, AppState::EditingProfile);
        assert!(app.profile_error.is_some());
        assert_eq!(
            app.profiles.load().unwrap().unwrap().email,
            "tilly@littlelemon.com"
        );
    }

    #[tokio::test]
    async fn test_logout_returns_to_onboarding() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        app.open_profile();
        app.profile_focus = ProfileField::Logout;
        app.profile_activate();

        assert_eq!(app.state, AppState::Onboarding);
        assert!(app.needs_onboarding());
        assert!(app.profiles.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_from_command_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(&dir).await;

        let changes = ProfileChanges {
            phone_number: Some("312 555 0100".to_string()),
            notifications: vec![(NotificationKind::SpecialOffers, false)],
            ..ProfileChanges::default()
        };
        let profile = app.update_profile(changes).unwrap();
        assert_eq!(profile.phone_number, "(312) 555-0100");
        assert!(!profile.notifications.special_offers);

        app.logout().unwrap();
        assert!(app.update_profile(ProfileChanges::default()).is_err());
    }

    #[test]
    fn test_profile_field_cycle() {
        assert_eq!(ProfileField::Logout.next(), ProfileField::Avatar);
        assert_eq!(ProfileField::Avatar.prev(), ProfileField::Logout);
        assert_eq!(
            ProfileField::Phone.next(),
            ProfileField::Notification(NotificationKind::OrderStatuses)
        );
    }
}
