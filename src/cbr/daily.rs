use chrono::NaiveDate;
use tracing::warn;

use crate::cbr::model::ExchangeRateRecord;
use crate::cbr::xml::{opt_int, opt_text, DailyDocument};
use crate::cbr::RateService;
use crate::helpers::time::{from_upstream_date, to_upstream_date};

impl RateService {
    /// One day's full rate table. Without `date` the upstream answers with the
    /// latest registered quotes; either way every record is stamped with the
    /// canonical date embedded in the response, not the requested one.
    /// The daily table carries its enrichment inline, so no catalog fetch.
    pub async fn daily(
        &self,
        date: Option<NaiveDate>,
        iso_code_filter: Option<&str>,
    ) -> Vec<ExchangeRateRecord> {
        let url = match date {
            Some(d) => format!("{}?date_req={}", self.cfg.daily_url, to_upstream_date(d)),
            None => self.cfg.daily_url.clone(),
        };

        let Some(body) = self.client.fetch_text(&url).await else {
            return Vec::new();
        };

        let document: DailyDocument = match serde_xml_rs::from_str(&body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("daily document did not parse: {}", e);
                return Vec::new();
            }
        };

        let stamped_date = opt_text(document.date)
            .and_then(|d| from_upstream_date(&d))
            .map(|d| d.to_string())
            .unwrap_or_default();

        let mut records: Vec<ExchangeRateRecord> = document
            .valutes
            .into_iter()
            .map(|valute| ExchangeRateRecord {
                date: stamped_date.clone(),
                cb_code: valute.id,
                iso_id: opt_int(valute.num_code),
                iso_code: opt_text(valute.char_code),
                name_ru: opt_text(valute.name),
                nominal: opt_int(valute.nominal),
                value: opt_text(valute.value),
                unit_rate: opt_text(valute.vunit_rate),
            })
            .collect();

        if let Some(filter) = iso_code_filter {
            records.retain(|r| r.iso_code.as_deref() == Some(filter));
        }

        records
    }
}
