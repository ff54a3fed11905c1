use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use drterp::catalog::load_from_path;
use drterp::planetterp::validation::{validate_grades, validate_profile};
use drterp::planetterp::{GradeEntry, InstructorProfile, RatingSource};
use drterp::search::MAX_SUGGESTIONS;
use drterp::view::{CardState, InstructorPanel, NO_INSTRUCTORS_MESSAGE};
use drterp::{
    DrTerpError, InstructorDisplayMode, Key, RatingAggregator, Result, SearchPhase, SearchSession,
};

const PAGES: &str = "https://planetterp.com/professor";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_json(name: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture");
    serde_json::from_str(&raw).expect("Fixture is not JSON")
}

/// Serves fixture payloads through the same validation the real client uses.
struct FixtureSource {
    profiles: HashMap<&'static str, &'static str>,
    grades: HashMap<&'static str, &'static str>,
}

impl FixtureSource {
    fn new() -> Self {
        Self {
            profiles: HashMap::from([("Jane Doe", "professor_doe.json")]),
            grades: HashMap::from([
                ("Jane Doe", "grades_cmsc131_doe.json"),
                ("John Roe", "grades_single_object.json"),
            ]),
        }
    }
}

impl RatingSource for FixtureSource {
    async fn fetch_profile(&self, name: &str) -> Result<InstructorProfile> {
        let file = self
            .profiles
            .get(name)
            .ok_or_else(|| DrTerpError::ProfileUnavailable {
                name: name.to_string(),
                reason: "HTTP error: 404".to_string(),
            })?;
        validate_profile(fixture_json(file)).map_err(|reason| DrTerpError::ProfileUnavailable {
            name: name.to_string(),
            reason,
        })
    }

    async fn fetch_grades(&self, course: &str, professor: &str) -> Result<Vec<GradeEntry>> {
        match self.grades.get(professor) {
            Some(file) => validate_grades(fixture_json(file)).map_err(|reason| {
                DrTerpError::GradesUnavailable {
                    course: course.to_string(),
                    professor: professor.to_string(),
                    reason,
                }
            }),
            None => Ok(Vec::new()),
        }
    }
}

fn session() -> SearchSession {
    let index = load_from_path(&fixture_path("catalog.json")).expect("Failed to load catalog");
    SearchSession::new(Arc::new(index))
}

#[test]
fn test_catalog_fixture_flattens_in_order() {
    let index = load_from_path(&fixture_path("catalog.json")).unwrap();
    let codes: Vec<&str> = index.iter().map(|c| c.course_code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["AAAS100", "AAAS200", "CMSC131", "CMSC132", "CMSC216"]
    );
}

#[test]
fn test_search_is_bounded_and_substring_only() {
    let mut s = session();
    let results = s.update_query("cmsc1");
    assert!(results.len() <= MAX_SUGGESTIONS);
    let codes: Vec<&str> = results.iter().map(|c| c.course_code.as_str()).collect();
    assert_eq!(codes, vec!["CMSC131", "CMSC132"]);
    assert_eq!(s.phase(), SearchPhase::Searching);
}

#[tokio::test]
async fn test_tba_course_shows_no_professors_message() {
    let mut s = session();
    s.update_query("AAAS200");
    assert!(s.handle_key(Key::ArrowDown).is_none());
    let req = s.handle_key(Key::Enter).expect("Enter should commit");
    assert_eq!(req.mode, InstructorDisplayMode::None);

    let agg = RatingAggregator::new(FixtureSource::new());
    let panel = req.run(&agg).await;
    assert!(s.apply_panel(req.token, panel));

    let view = s.view().unwrap();
    assert_eq!(view.panel, InstructorPanel::NoInstructors);
    let text = view.render(PAGES);
    assert!(text.contains(NO_INSTRUCTORS_MESSAGE));
    assert!(!text.contains("GPA"));
}

#[tokio::test]
async fn test_dual_course_end_to_end() {
    let mut s = session();
    s.update_query("131");
    let course = s.suggestions()[0].clone();
    let req = s.select_directly(course);
    assert_eq!(s.engine().query().query_text, "CMSC131");
    assert!(s.suggestions().is_empty());

    let loading = s.view().unwrap().render(PAGES);
    assert!(!loading.contains("GPA:"), "no GPA before the fetches settle");

    let agg = RatingAggregator::new(FixtureSource::new());
    let panel = req.run(&agg).await;
    assert!(s.apply_panel(req.token, panel));

    let view = s.view().unwrap();
    match &view.panel {
        InstructorPanel::Dual(CardState::Ready(a), CardState::Ready(b)) => {
            assert_eq!(a.gpa.to_string(), "3.50");
            assert_eq!(a.profile.as_ref().unwrap().review_count, Some(2));
            // No profile for the second instructor: name-only card.
            assert!(b.profile.is_none());
            assert_eq!(b.gpa.to_string(), "3.00");
        }
        other => panic!("expected settled dual panel, got {:?}", other),
    }

    let text = view.render(PAGES);
    assert!(text.contains("Jane Doe & John Roe"));
    assert!(text.contains("Jane Doe <https://planetterp.com/professor/doe_jane>"));
    assert!(text.contains("Rating: 4.50"));
    assert!(text.contains("2 reviews"));
    assert!(text.contains("Avg. CMSC131 GPA: 3.50"));
    assert!(text.contains("Avg. CMSC131 GPA: 3.00"));
    assert!(text.ends_with("* FTC: First Time Teaching"));
}

#[tokio::test]
async fn test_multiple_course_gets_one_card_each() {
    let mut s = session();
    s.update_query("CMSC132");
    let req = s.select_directly(s.suggestions()[0].clone());
    assert_eq!(
        req.mode,
        InstructorDisplayMode::Multiple(vec!["Ann Poe".to_string(), "John Roe".to_string()])
    );

    let agg = RatingAggregator::new(FixtureSource::new());
    let panel = req.run(&agg).await;
    assert!(s.apply_panel(req.token, panel));

    let cards = s.view().unwrap().panel.cards();
    assert_eq!(cards.len(), 2);
    let ann = cards[0].card().unwrap();
    assert_eq!(ann.gpa.to_string(), "FTC", "no grade history means first time teaching");
}

#[test]
fn test_editing_after_commit_clears_selection() {
    let mut s = session();
    s.update_query("CMSC216");
    let req = s.select_directly(s.suggestions()[0].clone());
    assert_eq!(req.mode, InstructorDisplayMode::Single("Ann Poe".to_string()));
    assert_eq!(s.phase(), SearchPhase::Committed);

    s.update_query("CMSC21");
    assert_eq!(s.phase(), SearchPhase::Searching);
    assert!(s.view().is_none());
    assert_eq!(s.suggestions().len(), 1);
    assert!(s.engine().committed().is_none());
}

#[test]
fn test_missing_catalog_degrades_to_empty_search() {
    let loaded = load_from_path(&fixture_path("does_not_exist.json"));
    assert!(matches!(loaded, Err(DrTerpError::CatalogUnavailable(_))));

    let mut s = SearchSession::new(Arc::new(loaded.unwrap_or_default()));
    assert!(s.update_query("CMSC").is_empty());
}
