use serde::Serialize;

/// Placeholder the catalog uses for sections without an instructor.
pub const TBA_PLACEHOLDER: &str = "Instructor: TBA";

/// How a course's instructors should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InstructorDisplayMode {
    None,
    Single(String),
    /// Two instructors credited jointly, encoded upstream as one `"A, B"` string.
    Dual(String, String),
    /// Several independent entries, one card each.
    Multiple(Vec<String>),
}

impl InstructorDisplayMode {
    /// Instructor names in display order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            InstructorDisplayMode::None => Vec::new(),
            InstructorDisplayMode::Single(name) => vec![name.as_str()],
            InstructorDisplayMode::Dual(a, b) => vec![a.as_str(), b.as_str()],
            InstructorDisplayMode::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Classify a course's raw instructor strings.
///
/// Only a lone remaining entry is split on commas. When several entries
/// remain, each is its own instructor even if it contains a comma.
pub fn resolve<S: AsRef<str>>(instructor_strings: &[S]) -> InstructorDisplayMode {
    let raw: Vec<&str> = instructor_strings
        .iter()
        .map(|s| s.as_ref())
        .filter(|p| *p != TBA_PLACEHOLDER)
        .collect();

    match raw.as_slice() {
        [] => InstructorDisplayMode::None,
        [single] if single.contains(',') => {
            let parts: Vec<String> = single
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            match <[String; 2]>::try_from(parts) {
                Ok([a, b]) => InstructorDisplayMode::Dual(a, b),
                Err(parts) => from_entries(parts),
            }
        }
        entries => from_entries(entries.iter().map(|s| s.to_string()).collect()),
    }
}

fn from_entries(mut entries: Vec<String>) -> InstructorDisplayMode {
    match entries.len() {
        0 => InstructorDisplayMode::None,
        1 => InstructorDisplayMode::Single(entries.remove(0)),
        _ => InstructorDisplayMode::Multiple(entries),
    }
}
