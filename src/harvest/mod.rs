//! Code-range enumeration
//!
//! - `Harvester`: validates and normalizes every candidate into the catalog
//! - `Checker`: lookup-only scan that flags vouchers appearing in watched ranges
//!
//! Both walk ranges strictly sequentially over one shared [`ApiClient`]
//! session, pausing between candidates and between ranges.
//!
//! [`ApiClient`]: crate::api::ApiClient

mod checker;
mod driver;

pub use checker::{CheckReport, Checker, Detection};
pub use driver::{HarvestStats, Harvester};
