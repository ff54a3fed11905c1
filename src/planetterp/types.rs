use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructorCategory {
    Professor,
    Ta,
}

/// Unknown values are treated as professors.
impl FromStr for InstructorCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ta") {
            Ok(InstructorCategory::Ta)
        } else {
            Ok(InstructorCategory::Professor)
        }
    }
}

/// Professor endpoint payload, as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessorPayload {
    pub name: String,
    pub slug: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<Vec<serde_json::Value>>,
}

/// A professor or TA as shown on an instructor card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorProfile {
    pub name: String,
    pub slug: String,
    pub category: InstructorCategory,
    pub courses: Vec<String>,
    /// `None` when the instructor has no reviews yet.
    pub average_rating: Option<f64>,
    /// Present only when the API returned the review list.
    pub review_count: Option<usize>,
}

impl From<ProfessorPayload> for InstructorProfile {
    fn from(p: ProfessorPayload) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            category: p
                .kind
                .as_deref()
                .and_then(|k| k.parse().ok())
                .unwrap_or(InstructorCategory::Professor),
            courses: p.courses,
            average_rating: p.average_rating.filter(|r| r.is_finite()),
            review_count: p.reviews.map(|r| r.len()),
        }
    }
}

/// One letter-grade category of a grade distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradeBucket {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    W,
    Other,
}

impl GradeBucket {
    pub const ALL: [GradeBucket; 15] = [
        GradeBucket::APlus,
        GradeBucket::A,
        GradeBucket::AMinus,
        GradeBucket::BPlus,
        GradeBucket::B,
        GradeBucket::BMinus,
        GradeBucket::CPlus,
        GradeBucket::C,
        GradeBucket::CMinus,
        GradeBucket::DPlus,
        GradeBucket::D,
        GradeBucket::DMinus,
        GradeBucket::F,
        GradeBucket::W,
        GradeBucket::Other,
    ];

    /// Field name in the grades payload.
    pub fn key(self) -> &'static str {
        match self {
            GradeBucket::APlus => "A+",
            GradeBucket::A => "A",
            GradeBucket::AMinus => "A-",
            GradeBucket::BPlus => "B+",
            GradeBucket::B => "B",
            GradeBucket::BMinus => "B-",
            GradeBucket::CPlus => "C+",
            GradeBucket::C => "C",
            GradeBucket::CMinus => "C-",
            GradeBucket::DPlus => "D+",
            GradeBucket::D => "D",
            GradeBucket::DMinus => "D-",
            GradeBucket::F => "F",
            GradeBucket::W => "W",
            GradeBucket::Other => "Other",
        }
    }

    /// Points on the 4.0 scale. F, W and Other earn nothing.
    pub fn grade_points(self) -> f64 {
        match self {
            GradeBucket::APlus | GradeBucket::A => 4.0,
            GradeBucket::AMinus => 3.7,
            GradeBucket::BPlus => 3.3,
            GradeBucket::B => 3.0,
            GradeBucket::BMinus => 2.7,
            GradeBucket::CPlus => 2.3,
            GradeBucket::C => 2.0,
            GradeBucket::CMinus => 1.7,
            GradeBucket::DPlus => 1.3,
            GradeBucket::D => 1.0,
            GradeBucket::DMinus => 0.7,
            GradeBucket::F | GradeBucket::W | GradeBucket::Other => 0.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Grade distribution of one section in one semester.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GradeRecord {
    pub course: String,
    pub professor: String,
    pub semester: String,
    pub section: String,
    counts: [u64; 15],
}

impl GradeRecord {
    pub fn new(course: &str, professor: &str, semester: &str, section: &str) -> Self {
        Self {
            course: course.to_string(),
            professor: professor.to_string(),
            semester: semester.to_string(),
            section: section.to_string(),
            counts: [0; 15],
        }
    }

    pub fn count(&self, bucket: GradeBucket) -> u64 {
        self.counts[bucket.index()]
    }

    pub fn set_count(&mut self, bucket: GradeBucket, count: u64) {
        self.counts[bucket.index()] = count;
    }

    pub fn with_count(mut self, bucket: GradeBucket, count: u64) -> Self {
        self.set_count(bucket, count);
        self
    }

    /// Students across all 15 buckets, including F, W and Other.
    /// Saturates instead of overflowing on hand-built records.
    pub fn total_students(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(*c))
    }
}

/// A validated grades element. Malformed elements are kept so they still
/// count toward the number of records being averaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeEntry {
    Record(GradeRecord),
    Malformed(String),
}
