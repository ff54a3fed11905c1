//! Client for the PlanetTerp professor and grades API.

pub mod types;
pub mod validation;

use std::future::Future;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DrTerpError, Result};
use crate::http_client::{build_url, ApiHttpClient};

pub use types::{GradeBucket, GradeEntry, GradeRecord, InstructorCategory, InstructorProfile};

/// Remote source of instructor profiles and grade distributions.
///
/// The aggregator only talks to this trait so it can run against an
/// in-memory source in tests.
pub trait RatingSource {
    /// Fetch the profile (with review count) for `name`.
    fn fetch_profile(&self, name: &str) -> impl Future<Output = Result<InstructorProfile>> + Send;

    /// Fetch every grade record of `professor` teaching `course`. An empty
    /// list means there is no grade history.
    fn fetch_grades(
        &self,
        course: &str,
        professor: &str,
    ) -> impl Future<Output = Result<Vec<GradeEntry>>> + Send;
}

pub struct PlanetTerpClient {
    http: ApiHttpClient,
    api_base: String,
}

impl PlanetTerpClient {
    pub fn new(http: ApiHttpClient, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ApiHttpClient::new(config)?, &config.api_base))
    }

    pub fn http(&self) -> &ApiHttpClient {
        &self.http
    }

    pub fn profile_url(&self, name: &str) -> String {
        build_url(
            &self.api_base,
            "professor",
            &[("name", name), ("reviews", "true")],
        )
    }

    pub fn grades_url(&self, course: &str, professor: &str) -> String {
        build_url(
            &self.api_base,
            "grades",
            &[("course", course), ("professor", professor)],
        )
    }
}

impl RatingSource for PlanetTerpClient {
    async fn fetch_profile(&self, name: &str) -> Result<InstructorProfile> {
        let unavailable = |reason: String| DrTerpError::ProfileUnavailable {
            name: name.to_string(),
            reason,
        };

        let value = self
            .http
            .get_json(&self.profile_url(name))
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let profile = validation::validate_profile(value).map_err(|reason| {
            warn!("Rejected profile payload for '{}': {}", name, reason);
            unavailable(reason)
        })?;
        info!(
            "Profile for '{}': slug={}, rating={:?}, reviews={:?}",
            name, profile.slug, profile.average_rating, profile.review_count
        );
        Ok(profile)
    }

    async fn fetch_grades(&self, course: &str, professor: &str) -> Result<Vec<GradeEntry>> {
        let unavailable = |reason: String| DrTerpError::GradesUnavailable {
            course: course.to_string(),
            professor: professor.to_string(),
            reason,
        };

        let value = self
            .http
            .get_json(&self.grades_url(course, professor))
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let entries = validation::validate_grades(value).map_err(|reason| {
            warn!(
                "Rejected grades payload for '{}' in {}: {}",
                professor, course, reason
            );
            unavailable(reason)
        })?;
        info!(
            "Fetched {} grade records for '{}' in {}",
            entries.len(),
            professor,
            course
        );
        Ok(entries)
    }
}
