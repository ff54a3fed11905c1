//! Display-ready state for a committed course, plus its plain-text rendering.

use serde::Serialize;

use crate::aggregator::InstructorCard;
use crate::catalog::CourseRecord;
use crate::instructor::InstructorDisplayMode;

pub const NO_INSTRUCTORS_MESSAGE: &str =
    "Sorry, no professors have been assigned to this course yet. Come back later!";
pub const FTC_LEGEND: &str = "* FTC: First Time Teaching";

/// A card is `Loading` until both its profile and grades requests settle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CardState {
    Loading { name: String },
    Ready(InstructorCard),
}

impl CardState {
    pub fn card(&self) -> Option<&InstructorCard> {
        match self {
            CardState::Ready(card) => Some(card),
            CardState::Loading { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CardState::Loading { .. })
    }

    /// Lines of text for this card. No GPA appears while loading.
    pub fn render_lines(&self, course_code: &str, profile_page_base: &str) -> Vec<String> {
        match self {
            CardState::Loading { name } => vec![
                name.clone(),
                "Loading rating…".to_string(),
                "Loading grades…".to_string(),
            ],
            CardState::Ready(card) => {
                let mut lines = Vec::new();
                match &card.profile {
                    Some(profile) => {
                        lines.push(format!(
                            "{} <{}/{}>",
                            profile.name,
                            profile_page_base.trim_end_matches('/'),
                            profile.slug
                        ));
                        lines.push(match profile.average_rating {
                            Some(r) => format!("Rating: {:.2}", r),
                            None => "Rating: N/A".to_string(),
                        });
                    }
                    None => lines.push(card.name.clone()),
                }
                lines.push(format!("Avg. {} GPA: {}", course_code, card.gpa));
                if let Some(count) = card.profile.as_ref().and_then(|p| p.review_count) {
                    lines.push(format!(
                        "{} review{}",
                        count,
                        if count == 1 { "" } else { "s" }
                    ));
                }
                lines
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InstructorPanel {
    NoInstructors,
    Single(CardState),
    Dual(CardState, CardState),
    Multiple(Vec<CardState>),
}

impl InstructorPanel {
    /// Placeholder panel shown while the cards for `mode` are being fetched.
    pub fn loading(mode: &InstructorDisplayMode) -> Self {
        let loading = |name: &str| CardState::Loading {
            name: name.to_string(),
        };
        match mode {
            InstructorDisplayMode::None => InstructorPanel::NoInstructors,
            InstructorDisplayMode::Single(name) => InstructorPanel::Single(loading(name)),
            InstructorDisplayMode::Dual(a, b) => InstructorPanel::Dual(loading(a), loading(b)),
            InstructorDisplayMode::Multiple(names) => {
                InstructorPanel::Multiple(names.iter().map(|n| loading(n)).collect())
            }
        }
    }

    pub fn cards(&self) -> Vec<&CardState> {
        match self {
            InstructorPanel::NoInstructors => Vec::new(),
            InstructorPanel::Single(card) => vec![card],
            InstructorPanel::Dual(a, b) => vec![a, b],
            InstructorPanel::Multiple(cards) => cards.iter().collect(),
        }
    }

    fn card_slot(&mut self, slot: usize) -> Option<&mut CardState> {
        match (self, slot) {
            (InstructorPanel::Single(card), 0) => Some(card),
            (InstructorPanel::Dual(a, _), 0) => Some(a),
            (InstructorPanel::Dual(_, b), 1) => Some(b),
            (InstructorPanel::Multiple(cards), i) => cards.get_mut(i),
            _ => None,
        }
    }

    /// Settle the card at `slot`. Returns false for an out-of-range slot.
    pub fn settle(&mut self, slot: usize, card: InstructorCard) -> bool {
        match self.card_slot(slot) {
            Some(state) => {
                *state = CardState::Ready(card);
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.cards().iter().any(|c| c.is_loading())
    }

    pub fn render_lines(&self, course_code: &str, profile_page_base: &str) -> Vec<String> {
        match self {
            InstructorPanel::NoInstructors => vec![NO_INSTRUCTORS_MESSAGE.to_string()],
            InstructorPanel::Dual(a, b) => {
                let name = |c: &CardState| match c {
                    CardState::Loading { name } => name.clone(),
                    CardState::Ready(card) => card.name.clone(),
                };
                let mut lines = vec![format!("{} & {}", name(a), name(b))];
                for card in [a, b] {
                    lines.push(String::new());
                    lines.extend(card.render_lines(course_code, profile_page_base));
                }
                lines
            }
            _ => {
                let mut lines = Vec::new();
                for (i, card) in self.cards().into_iter().enumerate() {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.extend(card.render_lines(course_code, profile_page_base));
                }
                lines
            }
        }
    }
}

/// Everything shown below the search box once a course is committed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
    pub course: CourseRecord,
    pub mode: InstructorDisplayMode,
    pub panel: InstructorPanel,
}

impl CourseView {
    pub fn render(&self, profile_page_base: &str) -> String {
        let mut lines = vec![
            self.course.course_code.clone(),
            self.course.description.clone(),
            String::new(),
        ];
        lines.extend(
            self.panel
                .render_lines(&self.course.course_code, profile_page_base),
        );
        lines.push(String::new());
        lines.push(FTC_LEGEND.to_string());
        lines.join("\n")
    }
}
