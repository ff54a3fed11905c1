//! One user's search box and the course view under it.
//!
//! Every commit and every query edit bumps a generation counter. Lookups are
//! tagged with the generation they were started under, and results arriving
//! after the selection has moved on are dropped instead of overwriting the
//! current view.

use std::sync::Arc;

use tracing::{debug, info};

use crate::aggregator::{InstructorCard, RatingAggregator};
use crate::catalog::{CatalogIndex, CourseRecord};
use crate::instructor::{resolve, InstructorDisplayMode};
use crate::planetterp::RatingSource;
use crate::search::{Direction, Key, KeyOutcome, SearchPhase, SuggestionEngine};
use crate::view::{CourseView, InstructorPanel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionToken(u64);

/// Work to do after a course is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: SelectionToken,
    pub course: CourseRecord,
    pub mode: InstructorDisplayMode,
}

impl LookupRequest {
    /// Fetch every card for this request.
    pub async fn run<S: RatingSource>(&self, aggregator: &RatingAggregator<S>) -> InstructorPanel {
        aggregator
            .build_panel(&self.course.course_code, &self.mode)
            .await
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    engine: SuggestionEngine,
    generation: u64,
    view: Option<CourseView>,
}

impl SearchSession {
    pub fn new(catalog: Arc<CatalogIndex>) -> Self {
        Self {
            engine: SuggestionEngine::new(catalog),
            ..Self::default()
        }
    }

    pub fn set_catalog(&mut self, catalog: Arc<CatalogIndex>) {
        self.engine.set_catalog(catalog);
    }

    pub fn engine(&self) -> &SuggestionEngine {
        &self.engine
    }

    pub fn phase(&self) -> SearchPhase {
        self.engine.phase()
    }

    pub fn suggestions(&self) -> &[CourseRecord] {
        self.engine.suggestions()
    }

    /// The committed course's view, if any.
    pub fn view(&self) -> Option<&CourseView> {
        self.view.as_ref()
    }

    pub fn current_token(&self) -> SelectionToken {
        SelectionToken(self.generation)
    }

    pub fn is_current(&self, token: SelectionToken) -> bool {
        token == self.current_token() && self.view.is_some()
    }

    /// Typing: re-opens search and clears whatever was committed.
    pub fn update_query(&mut self, text: &str) -> &[CourseRecord] {
        self.generation += 1;
        if self.view.take().is_some() {
            debug!("Query edited, clearing course view");
        }
        self.engine.update_query(text)
    }

    pub fn move_highlight(&mut self, direction: Direction) -> Option<usize> {
        self.engine.move_highlight(direction)
    }

    pub fn hover(&mut self, index: usize) {
        self.engine.hover(index);
    }

    /// Keyboard input. Returns a lookup when Enter commits a course.
    pub fn handle_key(&mut self, key: Key) -> Option<LookupRequest> {
        match self.engine.handle_key(key) {
            KeyOutcome::Committed(course) => Some(self.begin_lookup(course)),
            KeyOutcome::HighlightMoved(_) | KeyOutcome::Ignored => None,
        }
    }

    /// Commit the highlighted suggestion, if any.
    pub fn confirm_selection(&mut self) -> Option<LookupRequest> {
        let course = self.engine.confirm_selection()?;
        Some(self.begin_lookup(course))
    }

    /// Pointer selection of a suggestion.
    pub fn select_directly(&mut self, course: CourseRecord) -> LookupRequest {
        self.engine.select_directly(course.clone());
        self.begin_lookup(course)
    }

    fn begin_lookup(&mut self, course: CourseRecord) -> LookupRequest {
        self.generation += 1;
        let mode = resolve(&course.instructor_strings);
        info!("Looking up {} ({:?})", course.course_code, mode);
        self.view = Some(CourseView {
            course: course.clone(),
            mode: mode.clone(),
            panel: InstructorPanel::loading(&mode),
        });
        LookupRequest {
            token: self.current_token(),
            course,
            mode,
        }
    }

    /// Install a finished panel. Returns false and drops it if stale.
    pub fn apply_panel(&mut self, token: SelectionToken, panel: InstructorPanel) -> bool {
        if !self.is_current(token) {
            debug!("Dropping stale lookup result {:?}", token);
            return false;
        }
        if let Some(view) = self.view.as_mut() {
            view.panel = panel;
        }
        true
    }

    /// Settle one card as soon as it arrives. Returns false if stale or the
    /// slot does not exist.
    pub fn apply_card(&mut self, token: SelectionToken, slot: usize, card: InstructorCard) -> bool {
        if !self.is_current(token) {
            debug!("Dropping stale card for '{}' {:?}", card.name, token);
            return false;
        }
        self.view
            .as_mut()
            .map_or(false, |view| view.panel.settle(slot, card))
    }
}
