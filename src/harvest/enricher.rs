//! Detail-page enrichment

use crate::harvest::extract;
use crate::harvest::fetcher::{FetchError, RetryingFetcher};
use crate::model::Job;
use std::sync::Arc;

/// Fills a record's detail fields through a shared [`RetryingFetcher`].
///
/// Clones share the fetcher, so any number of enrichments may run
/// concurrently; they only meet each other at the gate inside the fetcher.
#[derive(Clone)]
pub struct DetailEnricher {
    fetcher: Arc<RetryingFetcher>,
}

impl DetailEnricher {
    pub fn new(fetcher: Arc<RetryingFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches the record's detail page and fills `description` and
    /// `criteria` in place.
    ///
    /// Fetch failures propagate untouched so the caller can decide what a
    /// half-harvested record is worth; extraction failures degrade to
    /// absent fields.
    pub async fn enrich(&self, job: &mut Job) -> Result<(), FetchError> {
        let body = self.fetcher.fetch(&job.url).await?;
        extract::apply_details(job, &body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::rate_gate::RateGate;
    use crate::model::{Company, Location};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job_for(url: String) -> Job {
        Job {
            url,
            title: "title".to_string(),
            company: Company {
                name: "company".to_string(),
                url: None,
                logo: None,
                actively_hiring: None,
            },
            location: Location::new("Garmisch"),
            posted_time: None,
            description: None,
            tags: Default::default(),
            criteria: Default::default(),
        }
    }

    fn test_enricher() -> DetailEnricher {
        let gate = RateGate::with_hold(32, Duration::from_millis(5));
        DetailEnricher::new(Arc::new(RetryingFetcher::new(gate, 5).unwrap()))
    }

    const DETAIL_PAGE: &str = r#"<html><body>
        <div class="show-more-less-html__markup">Bake bread at scale.</div>
        <li class="description__job-criteria-item">
          <h3>Seniority level</h3><span>Mid-Senior</span>
        </li>
    </body></html>"#;

    #[tokio::test]
    async fn fills_description_and_criteria() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
            .mount(&server)
            .await;

        let mut job = job_for(format!("{}/view/1", server.uri()));
        test_enricher().enrich(&mut job).await.unwrap();

        assert_eq!(job.description.as_deref(), Some("Bake bread at scale."));
        assert_eq!(
            job.criteria.get("Seniority level").map(String::as_str),
            Some("Mid-Senior")
        );
    }

    #[tokio::test]
    async fn fetch_failures_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/view/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut job = job_for(format!("{}/view/2", server.uri()));
        let err = test_enricher().enrich(&mut job).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(job.description, None);
    }
}
