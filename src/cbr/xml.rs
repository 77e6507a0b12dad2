use serde::Deserialize;

/// Upstream XML shapes. All child elements are optional text: the upstream is
/// inconsistent about absent element vs empty text, and both must collapse to
/// an unset field rather than a parse error.
///
/// Full catalog, `XML_valFull.asp`:
/// `<Valuta><Item ID="R01235"><Name>..</Name><EngName>..</EngName>
///  <Nominal>..</Nominal><ISO_Num_Code>..</ISO_Num_Code>
///  <ISO_Char_Code>..</ISO_Char_Code></Item>..</Valuta>`
#[derive(Debug, Deserialize)]
pub struct CatalogDocument {
    #[serde(rename = "Item", default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ISO_Num_Code")]
    pub iso_num_code: Option<String>,
    #[serde(rename = "ISO_Char_Code")]
    pub iso_char_code: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "EngName")]
    pub eng_name: Option<String>,
    #[serde(rename = "Nominal")]
    pub nominal: Option<String>,
}

/// Daily table, `XML_daily.asp`. The root `Date` attribute is upstream's own
/// canonical quote date, returned even when "latest" was requested.
#[derive(Debug, Deserialize)]
pub struct DailyDocument {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Valute", default)]
    pub valutes: Vec<DailyValute>,
}

#[derive(Debug, Deserialize)]
pub struct DailyValute {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "NumCode")]
    pub num_code: Option<String>,
    #[serde(rename = "CharCode")]
    pub char_code: Option<String>,
    #[serde(rename = "Nominal")]
    pub nominal: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "VunitRate")]
    pub vunit_rate: Option<String>,
}

/// Per-code dynamics, `XML_dynamic.asp`: one `Record` per calendar day.
#[derive(Debug, Deserialize)]
pub struct DynamicsDocument {
    #[serde(rename = "Record", default)]
    pub records: Vec<DynamicsRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DynamicsRecord {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Nominal")]
    pub nominal: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "VunitRate")]
    pub vunit_rate: Option<String>,
}

/// Collapses the upstream's two null representations (absent element, empty
/// text) into `None`. Every fetch path shapes its fields through here.
pub fn opt_text(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Optional text -> optional integer. Unparseable text counts as unset,
/// never as zero.
pub fn opt_int(value: Option<String>) -> Option<i64> {
    opt_text(value).and_then(|s| s.parse().ok())
}
