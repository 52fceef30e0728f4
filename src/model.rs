//! The harvested record model
//!
//! A [`Job`] is the canonical unit of output. The listing walker fills the
//! card-level fields; [`description`](Job::description) and
//! [`criteria`](Job::criteria) are only populated by detail-page enrichment.
//! Absent optional fields are omitted when serialized.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The company a job is posted by, as shown on its card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Whether the company advertises itself as actively hiring; `None`
    /// when the card carries no benefits block to derive this from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actively_hiring: Option<bool>,
}

/// Where a job is located
///
/// Only `full_location` is ever extracted; the split fields stay empty
/// unless a consumer parses them out later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub full_location: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    pub fn new(full_location: impl Into<String>) -> Self {
        Self {
            full_location: full_location.into(),
            city: None,
            region: None,
            country: None,
        }
    }
}

/// One harvested job posting
///
/// Invariant: `url`, `title`, `company.name` and `location.full_location`
/// are always present once a `Job` exists. An extraction that cannot fill
/// them drops the whole card instead of producing a partial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub url: String,
    pub title: String,
    pub company: Company,
    pub location: Location,

    /// Opaque timestamp string from the card; not required to be well-formed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<String>,

    /// Filled from the detail page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Label/value pairs from the detail page's criteria list
    #[serde(default)]
    pub criteria: BTreeMap<String, String>,
}
