use std::collections::HashMap;

use tracing::warn;

use crate::cbr::model::CurrencyCode;
use crate::cbr::xml::{opt_int, opt_text, CatalogDocument};
use crate::cbr::RateService;

/// Enrichment subset the dynamics aggregator stitches onto per-day records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub iso_id: Option<i64>,
    pub iso_code: Option<String>,
    pub name_ru: Option<String>,
    pub name_eng: Option<String>,
}

/// The full currency-code catalog, resolved with a single upstream fetch.
/// Both views (full records, enrichment lookup) come out of that one fetch;
/// document order is preserved.
#[derive(Debug, Clone, Default)]
pub struct CodeCatalog {
    entries: Vec<CurrencyCode>,
}

impl CodeCatalog {
    pub fn from_entries(entries: Vec<CurrencyCode>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> &[CurrencyCode] {
        &self.entries
    }

    pub fn into_codes(self) -> Vec<CurrencyCode> {
        self.entries
    }

    /// Internal codes in catalog order; the dynamics default when the caller
    /// names none.
    pub fn cb_codes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.cb_code.clone()).collect()
    }

    pub fn lookup(&self) -> HashMap<String, CatalogEntry> {
        self.entries
            .iter()
            .map(|e| {
                (
                    e.cb_code.clone(),
                    CatalogEntry {
                        iso_id: e.iso_id,
                        iso_code: e.iso_code.clone(),
                        name_ru: e.name_ru.clone(),
                        name_eng: e.name_eng.clone(),
                    },
                )
            })
            .collect()
    }
}

impl RateService {
    /// Fetch and shape the full catalog. "No data" (failed fetch, unparseable
    /// document) resolves to an empty catalog, not an error.
    pub async fn catalog(&self) -> CodeCatalog {
        let Some(body) = self.client.fetch_text(&self.cfg.catalog_url).await else {
            return CodeCatalog::default();
        };

        let document: CatalogDocument = match serde_xml_rs::from_str(&body) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("catalog document did not parse: {}", e);
                return CodeCatalog::default();
            }
        };

        let entries = document
            .items
            .into_iter()
            .map(|item| CurrencyCode {
                cb_code: item.id,
                iso_id: opt_int(item.iso_num_code),
                iso_code: opt_text(item.iso_char_code),
                name_ru: opt_text(item.name),
                name_eng: opt_text(item.eng_name),
                nominal: opt_int(item.nominal),
            })
            .collect();

        CodeCatalog::from_entries(entries)
    }
}
