//! Per-instructor rating aggregation.
//!
//! For each instructor the profile and grades requests are issued together
//! and joined. Instructors of one course are fetched concurrently and never
//! affect each other: a failure on one side degrades that card only.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::gpa::{compute_gpa, GpaStatistic};
use crate::instructor::InstructorDisplayMode;
use crate::planetterp::{InstructorProfile, RatingSource};
use crate::view::{CardState, InstructorPanel};

/// Settled data for one instructor card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorCard {
    /// Name as written in the catalog; shown when the profile is missing.
    pub name: String,
    pub course: String,
    pub profile: Option<InstructorProfile>,
    /// FTC when there is no grade history or the grades request failed.
    pub gpa: GpaStatistic,
    pub grade_records: usize,
}

impl InstructorCard {
    pub fn display_name(&self) -> &str {
        self.profile.as_ref().map_or(self.name.as_str(), |p| p.name.as_str())
    }
}

pub struct RatingAggregator<S> {
    source: S,
}

impl<S: RatingSource> RatingAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch profile and grades for one instructor and fold them into a card.
    /// Never fails; missing pieces degrade the card.
    pub async fn fetch_card(&self, course: &str, name: &str) -> InstructorCard {
        let (profile, grades) = tokio::join!(
            self.source.fetch_profile(name),
            self.source.fetch_grades(course, name)
        );

        let profile = match profile {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("{}; showing name only", e);
                None
            }
        };

        let (gpa, grade_records) = match grades {
            Ok(entries) => (compute_gpa(&entries), entries.len()),
            Err(e) => {
                warn!("{}; showing {}", e, GpaStatistic::FirstTimeTeaching);
                (GpaStatistic::FirstTimeTeaching, 0)
            }
        };

        info!(
            "Card ready for '{}' in {}: gpa={} from {} records",
            name, course, gpa, grade_records
        );

        InstructorCard {
            name: name.to_string(),
            course: course.to_string(),
            profile,
            gpa,
            grade_records,
        }
    }

    /// Fetch both halves of a jointly taught section concurrently. Each side
    /// keeps its own statistic.
    pub async fn fetch_dual(
        &self,
        course: &str,
        first: &str,
        second: &str,
    ) -> (InstructorCard, InstructorCard) {
        tokio::join!(
            self.fetch_card(course, first),
            self.fetch_card(course, second)
        )
    }

    /// Fetch independent cards concurrently, preserving input order.
    pub async fn fetch_all(&self, course: &str, names: &[String]) -> Vec<InstructorCard> {
        join_all(names.iter().map(|name| self.fetch_card(course, name))).await
    }

    /// Settle every card a display mode calls for.
    pub async fn build_panel(&self, course: &str, mode: &InstructorDisplayMode) -> InstructorPanel {
        match mode {
            InstructorDisplayMode::None => InstructorPanel::NoInstructors,
            InstructorDisplayMode::Single(name) => {
                InstructorPanel::Single(CardState::Ready(self.fetch_card(course, name).await))
            }
            InstructorDisplayMode::Dual(a, b) => {
                let (first, second) = self.fetch_dual(course, a, b).await;
                InstructorPanel::Dual(CardState::Ready(first), CardState::Ready(second))
            }
            InstructorDisplayMode::Multiple(names) => InstructorPanel::Multiple(
                self.fetch_all(course, names)
                    .await
                    .into_iter()
                    .map(CardState::Ready)
                    .collect(),
            ),
        }
    }
}
