//! Existence checker - watches code ranges for newly issued vouchers
//!
//! Runs only the voucher lookup stage. Unlike the harvester, a voucher that
//! exists is the alarm condition: it is recorded, the rest of its range is
//! skipped, and the remaining ranges are still scanned.

use crate::api::ApiClient;
use crate::config::{CodeRange, PacingConfig};
use crate::coupon::{Validator, VoucherLookup};
use crate::KcouperError;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::Instrument;

/// A voucher found in a watched range
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub code: u32,
    pub range: CodeRange,
    /// `Data` of the voucher lookup response
    pub data: Value,
}

/// Outcome of a check run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub detections: Vec<Detection>,
    /// Number of lookups issued
    pub probed: u64,
}

impl CheckReport {
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}

/// Scans ranges with voucher lookups only
pub struct Checker<'a> {
    validator: Validator<'a>,
    pacing: PacingConfig,
}

impl<'a> Checker<'a> {
    pub fn new(
        client: &'a ApiClient,
        shop_code: &'a str,
        today: NaiveDate,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            validator: Validator::new(client, shop_code, today),
            pacing,
        }
    }

    /// Scans every range and reports the vouchers found
    ///
    /// # Errors
    ///
    /// Only run-level failures are returned; lookup errors for a single code
    /// are logged and the scan continues.
    pub async fn run(&self, ranges: &[CodeRange]) -> Result<CheckReport, KcouperError> {
        let mut report = CheckReport::default();

        for (index, range) in ranges.iter().enumerate() {
            self.check_range(*range, &mut report)
                .instrument(tracing::info_span!("check", range = %range))
                .await?;

            if index + 1 < ranges.len() {
                tokio::time::sleep(self.pacing.range_delay()).await;
            }
        }

        if report.has_detections() {
            tracing::error!(
                "{} voucher(s) exist in watched ranges: {:?}",
                report.detections.len(),
                report.detections.iter().map(|d| d.code).collect::<Vec<_>>()
            );
        } else {
            tracing::info!("No vouchers found after {} lookups", report.probed);
        }
        Ok(report)
    }

    async fn check_range(
        &self,
        range: CodeRange,
        report: &mut CheckReport,
    ) -> Result<(), KcouperError> {
        for code in range.codes() {
            tracing::info!("getting coupon {}...", code);
            report.probed += 1;

            match self.validator.lookup_voucher(code).await {
                Ok(VoucherLookup::Invalid) => {
                    tracing::debug!("coupon code({}) is invalid", code);
                }
                Ok(VoucherLookup::Rejected { message }) => {
                    tracing::debug!("get voucher info response error, {}", message);
                }
                Ok(VoucherLookup::Found { data, .. }) => {
                    tracing::error!("voucher exist: code: {}, data: {}", code, data);
                    report.detections.push(Detection { code, range, data });
                    return Ok(());
                }
                Err(e) if e.is_candidate_local() => {
                    tracing::error!("coupon {} lookup failed: {}", code, e);
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.pacing.candidate_delay()).await;
        }
        Ok(())
    }
}
