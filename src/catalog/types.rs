use serde::{Deserialize, Serialize};

/// Catalog document as published: departments, each with its courses.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    pub depts: Vec<DepartmentJson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentJson {
    pub code: String,
    #[serde(default)]
    pub courses: Vec<CourseJson>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseJson {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub professors: Vec<String>,
}

/// One course in the flattened catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub department_code: String,
    /// Course code such as `CMSC131`. This is what searches match against.
    pub course_code: String,
    pub description: String,
    /// Raw instructor strings in catalog order, including placeholders.
    pub instructor_strings: Vec<String>,
}

/// Flattened catalog, in document order. Rebuilt wholesale on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogIndex {
    courses: Vec<CourseRecord>,
}

impl CatalogIndex {
    pub fn from_document(doc: CatalogDocument) -> Self {
        let courses = doc
            .depts
            .into_iter()
            .flat_map(|dept| {
                let code = dept.code;
                dept.courses.into_iter().map(move |course| CourseRecord {
                    department_code: code.clone(),
                    course_code: course.name,
                    description: course.description,
                    instructor_strings: course.professors,
                })
            })
            .collect();
        Self { courses }
    }

    pub fn from_records(courses: Vec<CourseRecord>) -> Self {
        Self { courses }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseRecord> {
        self.courses.iter()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
