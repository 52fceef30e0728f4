//! Pipeline composition
//!
//! One run owns one fetcher, and therefore one gate. The walker feeds
//! records through a channel from its blocking thread; enrichment runs
//! concurrently up to a bound; the sink receives records in listing order
//! no matter in which order enrichments complete.

use crate::browser::BrowserSession;
use crate::config::FetcherConfig;
use crate::harvest::enricher::DetailEnricher;
use crate::harvest::fetcher::RetryingFetcher;
use crate::harvest::rate_gate::RateGate;
use crate::harvest::walker::ListingWalker;
use crate::model::Job;
use crate::sink::Sink;
use crate::Result;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub harvested: usize,
    pub enriched: usize,
    pub failed_enrichments: usize,
}

/// Composes the listing walk, optional enrichment, and a sink into one run.
pub struct Pipeline {
    fetcher: Arc<RetryingFetcher>,
    enrich: bool,
    max_inflight: usize,
}

impl Pipeline {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let gate = RateGate::new(config.requests_per_second);
        let fetcher = RetryingFetcher::new(gate, config.max_retries)?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            enrich: config.enrich,
            max_inflight: config.max_inflight.max(1),
        })
    }

    /// Drains the walker into the sink, enriching along the way when
    /// enabled.
    ///
    /// A record whose enrichment fails is forwarded unenriched; the
    /// listing-level fields are still worth keeping. Walker errors abort
    /// the run.
    pub async fn run<B, S>(&self, walker: ListingWalker<B>, sink: &mut S) -> Result<RunStats>
    where
        B: BrowserSession + Send + 'static,
        S: Sink,
    {
        let (tx, mut rx) = mpsc::channel::<Result<Job>>(64);
        let producer = tokio::task::spawn_blocking(move || {
            for item in walker {
                // a dropped receiver means the consumer is done with us
                if tx.blocking_send(item).is_err() {
                    break;
                }
            }
        });

        let enricher = DetailEnricher::new(Arc::clone(&self.fetcher));
        let mut stats = RunStats::default();
        let mut inflight: VecDeque<JoinHandle<(Job, bool)>> = VecDeque::new();

        while let Some(item) = rx.recv().await {
            let job = item?;
            stats.harvested += 1;

            if !self.enrich {
                sink.write(&job)?;
                continue;
            }

            let enricher = enricher.clone();
            inflight.push_back(tokio::spawn(async move {
                let mut job = job;
                match enricher.enrich(&mut job).await {
                    Ok(()) => (job, true),
                    Err(e) => {
                        tracing::warn!("enrichment failed for {}: {e}", job.url);
                        (job, false)
                    }
                }
            }));

            if inflight.len() >= self.max_inflight {
                if let Some(handle) = inflight.pop_front() {
                    complete(handle, sink, &mut stats).await?;
                }
            }
        }

        for handle in inflight {
            complete(handle, sink, &mut stats).await?;
        }

        producer.await?;
        sink.finish()?;

        tracing::info!(
            "run finished: {} harvested, {} enriched, {} enrichment failures",
            stats.harvested,
            stats.enriched,
            stats.failed_enrichments
        );
        Ok(stats)
    }
}

async fn complete<S: Sink>(
    handle: JoinHandle<(Job, bool)>,
    sink: &mut S,
    stats: &mut RunStats,
) -> Result<()> {
    let (job, enriched) = handle.await?;
    if enriched {
        stats.enriched += 1;
    } else {
        stats.failed_enrichments += 1;
    }
    sink.write(&job)?;
    Ok(())
}
