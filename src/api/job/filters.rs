use serde::Deserialize;
use validator::Validate;

use super::models::Category;
#[cfg(test)]
use super::models::JobPosting;

/// Query-string filters for the job listing. All present filters must match.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct JobPostingFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    pub category: Option<Category>,
    /// Exact match on the location's country
    pub country: Option<String>,
    /// Exact match on the location's city
    pub city: Option<String>,
    /// Minimum salary, inclusive
    #[validate(range(min = 0.0, message = "Salary filter must not be negative"))]
    pub salary: Option<f64>,
}

#[cfg(test)]
fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// In-process evaluation with the same semantics as the SQL built by `PgStore`
#[cfg(test)]
impl JobPostingFilter {
    pub fn matches(&self, job: &JobPosting) -> bool {
        self.title.as_deref().map_or(true, |t| icontains(&job.title, t))
            && self
                .description
                .as_deref()
                .map_or(true, |d| icontains(&job.description, d))
            && self.category.map_or(true, |c| job.category == c)
            && self
                .country
                .as_deref()
                .map_or(true, |c| job.location.country == c)
            && self.city.as_deref().map_or(true, |c| job.location.city == c)
            && self.salary.map_or(true, |min| job.salary >= min)
    }
}
