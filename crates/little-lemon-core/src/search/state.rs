use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{MenuItem, Section};
use crate::query::{FilterSelections, MenuQuery, QueryEngine, QueryError};

/// Identifies one issued query. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

/// A finished query, sent back from `spawn_query`.
#[derive(Debug)]
pub struct QueryOutcome {
    pub ticket: QueryTicket,
    pub result: Result<Vec<MenuItem>, QueryError>,
}

#[derive(Debug)]
pub enum ApplyResult {
    /// The displayed list was replaced; holds the new length.
    Applied(usize),
    /// A newer query was issued since; the result was ignored.
    Stale,
    /// The newest query failed. The displayed list is unchanged.
    Failed(QueryError),
}

/// Search box, filter bar and list state of the menu screen.
#[derive(Debug, Default)]
pub struct SearchState {
    text: String,
    filters: FilterSelections,
    displayed: Vec<MenuItem>,
    next_ticket: u64,
    latest: Option<QueryTicket>,
    last_issued: Option<MenuQuery>,
}

impl SearchState {
    pub fn new(initial: Vec<MenuItem>) -> Self {
        Self {
            displayed: initial,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filters(&self) -> &FilterSelections {
        &self.filters
    }

    pub fn displayed(&self) -> &[MenuItem] {
        &self.displayed
    }

    /// Record debounced search text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn toggle_filter(&mut self, section: Section) {
        self.filters.toggle_section(section);
    }

    /// Predicate for the current text and filters.
    pub fn current_query(&self) -> MenuQuery {
        MenuQuery::new(self.text.clone(), self.filters.active_categories())
    }

    /// Issue a ticket for the current predicate.
    ///
    /// Returns `None` when the predicate matches the last one issued, so
    /// repeated identical input does not re-query.
    pub fn begin_query(&mut self) -> Option<(QueryTicket, MenuQuery)> {
        let query = self.current_query();
        if self.last_issued.as_ref() == Some(&query) {
            return None;
        }

        self.next_ticket += 1;
        let ticket = QueryTicket(self.next_ticket);
        self.latest = Some(ticket);
        self.last_issued = Some(query.clone());
        Some((ticket, query))
    }

    /// Apply a finished query. Only the newest ticket can change the list.
    pub fn apply(&mut self, outcome: QueryOutcome) -> ApplyResult {
        if self.latest != Some(outcome.ticket) {
            debug!(ticket = ?outcome.ticket, latest = ?self.latest, "Dropping stale query result");
            return ApplyResult::Stale;
        }

        match outcome.result {
            Ok(items) => {
                self.displayed = items;
                ApplyResult::Applied(self.displayed.len())
            }
            Err(e) => {
                // Forget the failed predicate so the same input can retry.
                self.last_issued = None;
                ApplyResult::Failed(e)
            }
        }
    }
}

/// Run `query` on a task and report back on `tx`.
pub fn spawn_query(
    engine: QueryEngine,
    ticket: QueryTicket,
    query: MenuQuery,
    tx: mpsc::UnboundedSender<QueryOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = engine.run(query).await;
        if tx.send(QueryOutcome { ticket, result }).is_err() {
            warn!(?ticket, "Query result receiver closed");
        }
    })
}
