//! Menu query engine: search text plus category filters.
//!
//! Name matching is a case-sensitive substring test done with SQLite's
//! `instr()`. User text is always a bound parameter and `instr` has no
//! wildcard characters, so `%`, `_` or quotes in the search box match
//! themselves.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::cache::{MenuStore, StoreError};
use crate::models::{MenuItem, Section};

#[derive(Error, Debug)]
#[error("Menu query failed: {0}")]
pub struct QueryError(#[from] pub StoreError);

/// Search predicate derived from the search box and filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    pub text: String,
    /// Active categories. Empty matches every category.
    pub categories: BTreeSet<String>,
}

impl MenuQuery {
    pub fn new(text: impl Into<String>, categories: BTreeSet<String>) -> Self {
        Self {
            text: text.into(),
            categories,
        }
    }

    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// WHERE clause and its positional arguments.
    pub(crate) fn to_sql(&self) -> (String, Vec<String>) {
        let mut clause = String::from("WHERE 1=1");
        let mut args = Vec::new();

        if !self.text.is_empty() {
            args.push(self.text.clone());
            clause.push_str(&format!(" AND instr(name, ?{}) > 0", args.len()));
        }

        if !self.categories.is_empty() {
            let mut placeholders = Vec::with_capacity(self.categories.len());
            for category in &self.categories {
                args.push(category.clone());
                placeholders.push(format!("?{}", args.len()));
            }
            clause.push_str(&format!(" AND category IN ({})", placeholders.join(", ")));
        }

        (clause, args)
    }
}

/// Answers filtered queries against the local store.
#[derive(Clone)]
pub struct QueryEngine {
    store: MenuStore,
}

impl QueryEngine {
    pub fn new(store: MenuStore) -> Self {
        Self { store }
    }

    /// Items whose name contains `text` and whose category is in `active`.
    pub async fn query(
        &self,
        text: &str,
        active: &BTreeSet<String>,
    ) -> Result<Vec<MenuItem>, QueryError> {
        self.run(MenuQuery::new(text, active.clone())).await
    }

    pub async fn run(&self, query: MenuQuery) -> Result<Vec<MenuItem>, QueryError> {
        let text_len = query.text.len();
        let categories = query.categories.len();
        let items = self.store.filter(query).await?;
        debug!(text_len, categories, results = items.len(), "Menu query");
        Ok(items)
    }
}

/// Per-section toggle state of the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelections {
    selected: [bool; Section::COUNT],
}

impl FilterSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the toggle at `index`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(selected) = self.selected.get_mut(index) {
            *selected = !*selected;
        }
    }

    pub fn toggle_section(&mut self, section: Section) {
        if let Some(index) = Section::ALL.iter().position(|s| *s == section) {
            self.toggle(index);
        }
    }

    pub fn is_selected(&self, section: Section) -> bool {
        Section::ALL
            .iter()
            .position(|s| *s == section)
            .map(|i| self.selected[i])
            .unwrap_or(false)
    }

    /// Categories to query. With nothing selected every section is active.
    pub fn active_categories(&self) -> BTreeSet<String> {
        let none_selected = self.selected.iter().all(|s| !s);
        Section::ALL
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, selected)| none_selected || **selected)
            .map(|(section, _)| section.as_str().to_string())
            .collect()
    }
}
