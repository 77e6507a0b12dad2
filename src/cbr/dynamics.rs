use std::collections::HashMap;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::cbr::catalog::CatalogEntry;
use crate::cbr::model::ExchangeRateRecord;
use crate::cbr::xml::{opt_int, opt_text, DynamicsDocument};
use crate::cbr::RateService;
use crate::helpers::time::{from_upstream_date, to_upstream_date, today_moscow, upstream_epoch};

impl RateService {
    /// Per-code rate dynamics over a date range, merged into one list.
    ///
    /// The upstream has no batch endpoint: one request goes out per internal
    /// code, all of them concurrently. `join_all` hands results back in input
    /// order, so the merged list is deterministic regardless of network
    /// completion order. The boundary caps explicit code lists at 15; the
    /// all-codes default fans out over the whole catalog uncapped.
    ///
    /// A branch that fails, returns non-200 or names a code the catalog does
    /// not know contributes nothing; siblings are unaffected and the call
    /// itself never errors.
    pub async fn dynamics(
        &self,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        cb_codes: Option<Vec<String>>,
    ) -> Vec<ExchangeRateRecord> {
        let catalog = self.catalog().await;
        let lookup = catalog.lookup();

        let codes = match cb_codes {
            Some(codes) if !codes.is_empty() => codes,
            _ => catalog.cb_codes(),
        };

        let start = to_upstream_date(date_from.unwrap_or_else(upstream_epoch));
        let end = to_upstream_date(date_to.unwrap_or_else(today_moscow));

        let branches = codes
            .iter()
            .map(|code| self.fetch_code_dynamics(code, &start, &end, &lookup));

        let mut records = Vec::new();
        for branch in join_all(branches).await {
            records.extend(branch);
        }
        debug!("dynamics merged {} records for {} codes", records.len(), codes.len());
        records
    }

    /// One fan-out branch: fetch, parse, enrich from the shared read-only
    /// lookup. Records for codes missing from the catalog are dropped unless
    /// the unlisted-codes policy says to keep them with null enrichment.
    async fn fetch_code_dynamics(
        &self,
        cb_code: &str,
        start: &str,
        end: &str,
        lookup: &HashMap<String, CatalogEntry>,
    ) -> Vec<ExchangeRateRecord> {
        let url = format!(
            "{}?date_req1={}&date_req2={}&VAL_NM_RQ={}",
            self.cfg.dynamics_url, start, end, cb_code
        );

        let Some(body) = self.client.fetch_text(&url).await else {
            return Vec::new();
        };

        let document: DynamicsDocument = match serde_xml_rs::from_str(&body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("dynamics document for {} did not parse: {}", cb_code, e);
                return Vec::new();
            }
        };

        document
            .records
            .into_iter()
            .filter_map(|record| {
                let code = opt_text(record.id)?;
                let entry = match lookup.get(&code) {
                    Some(entry) => Some(entry),
                    None if self.cfg.include_unlisted_codes => None,
                    // Not in the catalog: a recoverable skip, not a fault.
                    None => return None,
                };

                let date = opt_text(record.date)
                    .and_then(|d| from_upstream_date(&d))
                    .map(|d| d.to_string())?;

                Some(ExchangeRateRecord {
                    date,
                    cb_code: code,
                    iso_id: entry.and_then(|e| e.iso_id),
                    iso_code: entry.and_then(|e| e.iso_code.clone()),
                    name_ru: entry.and_then(|e| e.name_ru.clone()),
                    nominal: opt_int(record.nominal),
                    value: opt_text(record.value),
                    unit_rate: opt_text(record.vunit_rate),
                })
            })
            .collect()
    }
}
