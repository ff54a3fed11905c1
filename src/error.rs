use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrTerpError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Profile unavailable for '{name}': {reason}")]
    ProfileUnavailable { name: String, reason: String },

    #[error("Grades unavailable for '{professor}' in {course}: {reason}")]
    GradesUnavailable {
        course: String,
        professor: String,
        reason: String,
    },

    #[error("Malformed grade record: {0}")]
    MalformedGradeRecord(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<DrTerpError> for String {
    fn from(err: DrTerpError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, DrTerpError>;
