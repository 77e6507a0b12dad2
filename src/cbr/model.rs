use serde::{Deserialize, Serialize};

/// One catalog entry, as served by `/currency/code-reference`.
/// `cb_code` is the upstream-assigned internal identifier, distinct from the
/// ISO currency code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyCode {
    pub cb_code: String,
    pub iso_id: Option<i64>,
    pub iso_code: Option<String>,
    pub name_ru: Option<String>,
    pub name_eng: Option<String>,
    pub nominal: Option<i64>,
}

/// One quoted day for one currency. `value` and `unit_rate` carry the
/// upstream decimal text verbatim (comma separator included); they are never
/// round-tripped through binary floating point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExchangeRateRecord {
    pub date: String,
    pub cb_code: String,
    pub iso_id: Option<i64>,
    pub iso_code: Option<String>,
    pub name_ru: Option<String>,
    pub nominal: Option<i64>,
    pub value: Option<String>,
    pub unit_rate: Option<String>,
}

/// `{total, items}` envelope every list endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}
