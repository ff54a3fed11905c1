//! Incremental course search with a keyboard-driven highlight.
//!
//! `SuggestionEngine` is the state machine behind the search box:
//!
//! - **Idle**: no query text
//! - **Searching**: query text present, suggestions visible, nothing committed
//! - **Committed**: a course was picked, suggestions hidden
//!
//! Any edit to the query text moves back to Searching (or Idle) and drops the
//! committed course, even when the edit leaves the text unchanged.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{CatalogIndex, CourseRecord};

/// Maximum number of suggestions shown for a query.
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Committed,
}

/// Keys the search box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing happened; the caller should let the key through.
    Ignored,
    HighlightMoved(Option<usize>),
    Committed(CourseRecord),
}

/// Text in the search box plus the highlight cursor.
///
/// `highlight` is `None` or a valid index into the current suggestion list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub query_text: String,
    pub highlight: Option<usize>,
}

impl QueryState {
    /// The highlight as a signed index, `-1` meaning no highlight.
    pub fn highlight_index(&self) -> isize {
        self.highlight.map_or(-1, |i| i as isize)
    }
}

/// Case-insensitive substring match on course codes, catalog order, first
/// `MAX_SUGGESTIONS` hits. Blank queries match nothing.
pub fn suggest(catalog: &CatalogIndex, query: &str) -> Vec<CourseRecord> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|c| c.course_code.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    catalog: Arc<CatalogIndex>,
    state: QueryState,
    suggestions: Vec<CourseRecord>,
    committed: Option<CourseRecord>,
}

impl SuggestionEngine {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Swap in a newly loaded catalog. An open search is re-run against it;
    /// a committed course stays committed.
    pub fn set_catalog(&mut self, catalog: Arc<CatalogIndex>) {
        self.catalog = catalog;
        if self.committed.is_none() {
            self.recompute();
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogIndex> {
        &self.catalog
    }

    /// Replace the query text, drop any committed course and recompute the
    /// suggestions. The highlight is always cleared.
    pub fn update_query(&mut self, text: &str) -> &[CourseRecord] {
        self.state.query_text = text.to_string();
        if self.committed.take().is_some() {
            debug!("Query edited, dropping committed course");
        }
        self.recompute();
        &self.suggestions
    }

    fn recompute(&mut self) {
        self.suggestions = suggest(&self.catalog, &self.state.query_text);
        self.state.highlight = None;
    }

    /// Move the highlight one step, wrapping at both ends.
    pub fn move_highlight(&mut self, direction: Direction) -> Option<usize> {
        let len = self.suggestions.len();
        if len == 0 {
            return self.state.highlight;
        }
        let next = match (direction, self.state.highlight) {
            (Direction::Next, None) => 0,
            (Direction::Next, Some(i)) => (i + 1) % len,
            (Direction::Prev, None) | (Direction::Prev, Some(0)) => len - 1,
            (Direction::Prev, Some(i)) => i - 1,
        };
        self.state.highlight = Some(next);
        self.state.highlight
    }

    /// Pointer entered suggestion `index`.
    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.state.highlight = Some(index);
        }
    }

    /// Commit the highlighted suggestion, if any.
    pub fn confirm_selection(&mut self) -> Option<CourseRecord> {
        let course = self
            .state
            .highlight
            .and_then(|i| self.suggestions.get(i))
            .cloned()?;
        self.select_directly(course.clone());
        Some(course)
    }

    /// Commit `course`: the query shows its code and suggestions close.
    pub fn select_directly(&mut self, course: CourseRecord) {
        debug!("Committed course {}", course.course_code);
        self.state.query_text = course.course_code.clone();
        self.state.highlight = None;
        self.suggestions.clear();
        self.committed = Some(course);
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if self.suggestions.is_empty() {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::ArrowDown => KeyOutcome::HighlightMoved(self.move_highlight(Direction::Next)),
            Key::ArrowUp => KeyOutcome::HighlightMoved(self.move_highlight(Direction::Prev)),
            Key::Enter => match self.confirm_selection() {
                Some(course) => KeyOutcome::Committed(course),
                None => KeyOutcome::Ignored,
            },
            Key::Other => KeyOutcome::Ignored,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        if self.committed.is_some() {
            SearchPhase::Committed
        } else if self.state.query_text.trim().is_empty() {
            SearchPhase::Idle
        } else {
            SearchPhase::Searching
        }
    }

    /// Suggestions to display. Empty unless Searching.
    pub fn suggestions(&self) -> &[CourseRecord] {
        &self.suggestions
    }

    pub fn committed(&self) -> Option<&CourseRecord> {
        self.committed.as_ref()
    }

    pub fn query(&self) -> &QueryState {
        &self.state
    }
}
