//! Field extraction for job cards and detail pages
//!
//! Optional fields go through [`isolate`], so a missing or malformed node
//! degrades to an absent value plus a log line instead of killing the
//! record. A required field that cannot be extracted drops the whole card;
//! the walker's cursor still advances past it.

use crate::browser::{BrowserError, DomNode};
use crate::model::{Company, Job, Location};
use scraper::{Html, Selector};
use thiserror::Error;

const LOCATION_BLOCK: &str = ".job-search-card__location";
const LOGO_MEDIA: &str = ".search-entity-media";
const BENEFITS_TEXT: &str = ".result-benefits__text";
const POSTED_DATE: &str = ".job-search-card__listdate--new";
const DESCRIPTION_BLOCK: &str = "div.show-more-less-html__markup";
const CRITERIA_ITEM: &str = "li.description__job-criteria-item";

/// Why a single field could not be extracted
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("attribute `{0}` is missing")]
    MissingAttribute(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Severity {
    Warn,
    Debug,
}

/// Runs one optional field extraction, turning any failure into `None`
/// plus a diagnostic at the given severity.
fn isolate<T>(field: &str, severity: Severity, result: Result<T, ExtractError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            match severity {
                Severity::Warn => tracing::warn!("could not extract {field}: {e}"),
                Severity::Debug => tracing::debug!("could not extract {field}: {e}"),
            }
            None
        }
    }
}

/// Maps one listing card to a [`Job`].
///
/// Returns `None` when a required field (link, title, company, location)
/// cannot be extracted; the card is dropped with a diagnostic.
pub fn extract_job<N: DomNode>(card: &N) -> Option<Job> {
    match try_extract_job(card) {
        Ok(job) => Some(job),
        Err(e) => {
            tracing::warn!("dropping job card: {e}");
            None
        }
    }
}

fn try_extract_job<N: DomNode>(card: &N) -> Result<Job, ExtractError> {
    let url = job_link(card)?;
    let title = card.find_one("h3")?.text()?.trim().to_string();
    let company = extract_company(card)?;
    let location = extract_location(card)?;
    let posted_time = isolate("posted time", Severity::Debug, posted_time(card));

    Ok(Job {
        url,
        title,
        company,
        location,
        posted_time,
        description: None,
        tags: Default::default(),
        criteria: Default::default(),
    })
}

/// The card's first anchor carries the detail-page link.
fn job_link<N: DomNode>(card: &N) -> Result<String, ExtractError> {
    card.find_one("a")?
        .attr("href")?
        .ok_or(ExtractError::MissingAttribute("href"))
}

/// Name and link come from the second heading's anchor and are required;
/// logo and the actively-hiring flag degrade independently.
fn extract_company<N: DomNode>(card: &N) -> Result<Company, ExtractError> {
    let link = card.find_one("h4")?.find_one("a")?;
    let name = link.text()?.trim().to_string();
    let url = link.attr("href")?;

    let logo = isolate("company logo", Severity::Debug, company_logo(card));

    // tri-state: no benefits block means we simply don't know
    let actively_hiring = match card.find_one(BENEFITS_TEXT) {
        Ok(block) => isolate(
            "benefits text",
            Severity::Debug,
            block.text().map_err(ExtractError::from),
        )
        .map(|text| {
            text.trim_matches(|c| c == ' ' || c == '"')
                .eq_ignore_ascii_case("actively hiring")
        }),
        Err(_) => None,
    };

    Ok(Company {
        name,
        url,
        logo,
        actively_hiring,
    })
}

fn company_logo<N: DomNode>(card: &N) -> Result<String, ExtractError> {
    card.find_one(LOGO_MEDIA)?
        .find_one("a")?
        .attr("data-ghost-url")?
        .ok_or(ExtractError::MissingAttribute("data-ghost-url"))
}

fn extract_location<N: DomNode>(card: &N) -> Result<Location, ExtractError> {
    let full = card.find_one(LOCATION_BLOCK)?.text()?.trim().to_string();
    Ok(Location::new(full))
}

fn posted_time<N: DomNode>(card: &N) -> Result<String, ExtractError> {
    card.find_one(POSTED_DATE)?
        .attr("datetime")?
        .ok_or(ExtractError::MissingAttribute("datetime"))
}

/// Fills `description` and `criteria` from a fetched detail document.
///
/// Both are non-fatal: whatever cannot be extracted stays absent.
pub fn apply_details(job: &mut Job, html: &str) {
    let document = Html::parse_document(html);

    if let Some(description) = isolate(
        "description",
        Severity::Warn,
        extract_description(&document),
    ) {
        job.description = Some(description);
    }
    for (label, value) in extract_criteria(&document) {
        job.criteria.insert(label, value);
    }
}

fn extract_description(document: &Html) -> Result<String, ExtractError> {
    let selector = Selector::parse(DESCRIPTION_BLOCK).map_err(|_| BrowserError::NotFound {
        selector: DESCRIPTION_BLOCK.to_string(),
    })?;
    let block = document
        .select(&selector)
        .next()
        .ok_or(BrowserError::NotFound {
            selector: DESCRIPTION_BLOCK.to_string(),
        })?;
    Ok(block.text().collect::<String>().trim().to_string())
}

/// Criteria rows pair a heading label with a span value. A row missing
/// either contributes nothing; that is the page's way of padding the list.
fn extract_criteria(document: &Html) -> Vec<(String, String)> {
    let Ok(item_selector) = Selector::parse(CRITERIA_ITEM) else {
        return Vec::new();
    };
    let Ok(label_selector) = Selector::parse("h3") else {
        return Vec::new();
    };
    let Ok(value_selector) = Selector::parse("span") else {
        return Vec::new();
    };

    document
        .select(&item_selector)
        .filter_map(|item| {
            let label = item.select(&label_selector).next()?;
            let value = item.select(&value_selector).next()?;
            Some((
                label.text().collect::<String>().trim().to_string(),
                value.text().collect::<String>().trim().to_string(),
            ))
        })
        .collect()
}
