// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use reqwest::Client;

use crate::config::settings::{
    AuthConfig, LogFormat, LoggingConfig, MetricsConfig, RetryConfig, ServerConfig,
    ServiceConfig, UpstreamConfig,
};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Upstream config pointing every endpoint at a mock server, with retry
/// backoff short enough for tests.
pub fn upstream_config(base_url: &str) -> UpstreamConfig {
    UpstreamConfig {
        catalog_url: format!("{}/scripts/XML_valFull.asp", base_url),
        daily_url: format!("{}/scripts/XML_daily.asp", base_url),
        dynamics_url: format!("{}/scripts/XML_dynamic.asp", base_url),
        retry: Some(RetryConfig {
            attempts: Some(3),
            backoff_ms: Some(20),
        }),
        request_timeout_secs: 5,
        include_unlisted_codes: false,
    }
}

pub fn service_config(upstream: UpstreamConfig) -> ServiceConfig {
    ServiceConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: "0".to_string(),
            api_prefix: "/api/v1".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 1,
            store_path: None,
        },
        upstream,
        metrics: MetricsConfig {
            path: "/metrics".to_string(),
            is_enabled: true,
        },
        logging: Some(LoggingConfig::new("warn".to_owned(), LogFormat::Compact)),
        files: Default::default(),
    }
}

/// Catalog with USD, EUR and one entry whose ISO fields are absent.
pub const CATALOG_XML: &str = r#"<Valuta name="Foreign Currency Market Lib">
<Item ID="R01235">
    <Name>Доллар США</Name>
    <EngName>US Dollar</EngName>
    <Nominal>1</Nominal>
    <ISO_Num_Code>840</ISO_Num_Code>
    <ISO_Char_Code>USD</ISO_Char_Code>
</Item>
<Item ID="R01239">
    <Name>Евро</Name>
    <EngName>Euro</EngName>
    <Nominal>1</Nominal>
    <ISO_Num_Code>978</ISO_Num_Code>
    <ISO_Char_Code>EUR</ISO_Char_Code>
</Item>
<Item ID="R09999">
    <Name>Прочая валюта</Name>
    <EngName></EngName>
    <Nominal>100</Nominal>
    <ISO_Num_Code></ISO_Num_Code>
    <ISO_Char_Code></ISO_Char_Code>
</Item>
</Valuta>"#;

/// Daily table for 2024-01-01 with USD, EUR and CNY.
pub const DAILY_XML: &str = r#"<ValCurs Date="01.01.2024" name="Foreign Currency Market">
<Valute ID="R01235">
    <NumCode>840</NumCode>
    <CharCode>USD</CharCode>
    <Nominal>1</Nominal>
    <Name>Доллар США</Name>
    <Value>89,6883</Value>
    <VunitRate>89,6883</VunitRate>
</Valute>
<Valute ID="R01239">
    <NumCode>978</NumCode>
    <CharCode>EUR</CharCode>
    <Nominal>1</Nominal>
    <Name>Евро</Name>
    <Value>99,1919</Value>
    <VunitRate>99,1919</VunitRate>
</Valute>
<Valute ID="R01375">
    <NumCode>156</NumCode>
    <CharCode>CNY</CharCode>
    <Nominal>1</Nominal>
    <Name>Китайский юань</Name>
    <Value>12,5762</Value>
    <VunitRate>12,5762</VunitRate>
</Valute>
</ValCurs>"#;

/// Two USD quote days, 2024-01-01 and 2024-01-02.
pub const DYNAMICS_USD_XML: &str = r#"<ValCurs ID="R01235" DateRange1="01.01.2024" DateRange2="02.01.2024" name="Foreign Currency Market Dynamic">
<Record Date="01.01.2024" Id="R01235">
    <Nominal>1</Nominal>
    <Value>89,6883</Value>
    <VunitRate>89,6883</VunitRate>
</Record>
<Record Date="02.01.2024" Id="R01235">
    <Nominal>1</Nominal>
    <Value>90,1000</Value>
    <VunitRate>90,1</VunitRate>
</Record>
</ValCurs>"#;

/// One EUR quote day, 2024-01-01.
pub const DYNAMICS_EUR_XML: &str = r#"<ValCurs ID="R01239" DateRange1="01.01.2024" DateRange2="02.01.2024" name="Foreign Currency Market Dynamic">
<Record Date="01.01.2024" Id="R01239">
    <Nominal>1</Nominal>
    <Value>99,1919</Value>
    <VunitRate>99,1919</VunitRate>
</Record>
</ValCurs>"#;

/// Quote day for a code the catalog does not list.
pub const DYNAMICS_UNLISTED_XML: &str = r#"<ValCurs ID="R00000" DateRange1="01.01.2024" DateRange2="02.01.2024" name="Foreign Currency Market Dynamic">
<Record Date="01.01.2024" Id="R00000">
    <Nominal>1</Nominal>
    <Value>1,0000</Value>
    <VunitRate>1</VunitRate>
</Record>
</ValCurs>"#;
