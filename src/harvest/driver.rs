//! Enumeration driver - the main harvest loop
//!
//! Walks every configured code range in order, validates each candidate,
//! normalizes the accepted ones and merges them into the catalog cache.
//! Codes already cached from an earlier run are not probed again; cached
//! coupons past their end date are evicted instead.

use crate::api::ApiClient;
use crate::clock;
use crate::config::{CodeRange, PacingConfig};
use crate::coupon::{normalize_with_exclusions, CandidateOutcome, CouponRecord, Validator};
use crate::output::Catalog;
use crate::KcouperError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::Instrument;

/// Counters collected over one harvest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Candidates sent through the validator
    pub probed: u64,
    /// Candidates normalized into a record
    pub accepted: u64,
    /// Candidates dropped without an error
    pub discarded: u64,
    /// Candidates dropped because of a per-candidate error
    pub failed: u64,
    /// Cached coupons kept without probing
    pub retained: u64,
    /// Cached coupons removed as expired
    pub expired: u64,
}

/// Harvests coupons for one shop on one day
pub struct Harvester<'a> {
    validator: Validator<'a>,
    pacing: PacingConfig,
    exclude_names: &'a [String],
    today: NaiveDate,
}

impl<'a> Harvester<'a> {
    /// Creates a harvester
    ///
    /// `today` is the UTC+8 civil date used both for the order date in
    /// requests and for expiring cached coupons.
    pub fn new(
        client: &'a ApiClient,
        shop_code: &'a str,
        today: NaiveDate,
        pacing: PacingConfig,
        exclude_names: &'a [String],
    ) -> Self {
        Self {
            validator: Validator::new(client, shop_code, today),
            pacing,
            exclude_names,
            today,
        }
    }

    /// Runs the harvest and returns the merged catalog
    ///
    /// With `existing`, the run is incremental: its records seed the cache.
    ///
    /// # Errors
    ///
    /// Only run-level failures are returned (retry exhaustion, undecodable
    /// responses), wrapped in `KcouperError::Aborted` together with the
    /// catalog merged up to the failing candidate. Per-candidate failures are
    /// logged and skipped.
    pub async fn run(
        &self,
        ranges: &[CodeRange],
        existing: Option<Catalog>,
    ) -> Result<Catalog, KcouperError> {
        self.run_with_stats(ranges, existing)
            .await
            .map(|(catalog, _)| catalog)
    }

    /// Same as [`Harvester::run`], also returning the run counters
    pub async fn run_with_stats(
        &self,
        ranges: &[CodeRange],
        existing: Option<Catalog>,
    ) -> Result<(Catalog, HarvestStats), KcouperError> {
        let mut cache = existing.map(Catalog::into_records).unwrap_or_default();
        let mut stats = HarvestStats::default();
        let start_time = std::time::Instant::now();

        tracing::info!(
            "Harvesting {} range(s), {} cached coupon(s)",
            ranges.len(),
            cache.len()
        );

        for (index, range) in ranges.iter().enumerate() {
            let result = self
                .harvest_range(*range, &mut cache, &mut stats)
                .instrument(tracing::info_span!("range", range = %range))
                .await;
            if let Err(source) = result {
                tracing::error!(
                    "Harvest aborted in range {} with {} coupon(s) merged",
                    range,
                    cache.len()
                );
                return Err(KcouperError::Aborted {
                    partial: Box::new(Catalog::from_records(cache, clock::now())),
                    source: Box::new(source),
                });
            }

            if index + 1 < ranges.len() {
                tokio::time::sleep(self.pacing.range_delay()).await;
            }
        }

        let catalog = Catalog::from_records(cache, clock::now());
        tracing::info!(
            "Harvest completed in {:?}: {} coupons ({:?})",
            start_time.elapsed(),
            catalog.count(),
            stats
        );
        Ok((catalog, stats))
    }

    async fn harvest_range(
        &self,
        range: CodeRange,
        cache: &mut BTreeMap<u32, CouponRecord>,
        stats: &mut HarvestStats,
    ) -> Result<(), KcouperError> {
        for code in range.codes() {
            if let Some(cached) = cache.get(&code) {
                if cached.is_expired(self.today) {
                    cache.remove(&code);
                    stats.expired += 1;
                    tracing::info!("removing expired coupon {}", code);
                } else {
                    stats.retained += 1;
                    tracing::info!("skipping existing coupon {}", code);
                }
                continue;
            }

            tracing::info!("getting coupon {}...", code);
            stats.probed += 1;
            match self.probe(code).await {
                Ok(Some(record)) => {
                    tracing::info!(
                        "coupon {} accepted: {} (price {})",
                        code,
                        record.name,
                        record.price
                    );
                    cache.insert(code, record);
                    stats.accepted += 1;
                    tokio::time::sleep(self.pacing.candidate_delay()).await;
                }
                Ok(None) => stats.discarded += 1,
                Err(e) if e.is_candidate_local() => {
                    stats.failed += 1;
                    tracing::error!("coupon {} skipped: {}", code, e);
                }
                Err(e) => {
                    tracing::error!("aborting harvest at coupon {}: {}", code, e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Validates one candidate and normalizes it when valid
    async fn probe(&self, code: u32) -> Result<Option<CouponRecord>, KcouperError> {
        match self.validator.validate(code).await? {
            CandidateOutcome::Valid(candidate) => {
                let record =
                    normalize_with_exclusions(&candidate.detail, code, self.exclude_names)?;
                Ok(Some(record))
            }
            CandidateOutcome::Discarded(reason) => {
                tracing::debug!("coupon {} discarded: {}", code, reason);
                Ok(None)
            }
        }
    }
}
