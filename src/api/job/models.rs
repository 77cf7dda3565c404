use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Raised when a stored enum column holds a value outside the closed set
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(Category, "category", {
    Tech => "tech",
    Healthcare => "healthcare",
    Finance => "finance",
    Education => "education",
    Other => "other",
});

text_enum!(JobType, "job_type", {
    FullTime => "full_time",
    PartTime => "part_time",
    Contract => "contract",
    Remote => "remote",
});

/// Natural key of a location. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub country: String,
    pub city: String,
    pub address: String,
}

/// A normalized, deduplicated place a job is located at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn key(&self) -> LocationKey {
        LocationKey {
            country: self.country.clone(),
            city: self.city.clone(),
            address: self.address.clone(),
        }
    }
}

/// A stored job posting, always attached to exactly one location
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: f64,
    pub category: Category,
    pub job_type: JobType,
    pub location: Location,
    /// Principal that created the posting. Set once, never changed.
    pub employer: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a posting
#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    pub salary: f64,
    pub category: Category,
    pub job_type: JobType,
    pub location_id: Uuid,
    pub employer: Uuid,
    pub is_active: bool,
}
