pub mod client;
pub mod xml;
pub mod model;
pub mod catalog;
pub mod daily;
pub mod dynamics;

use anyhow::Result;

use crate::config::settings::UpstreamConfig;
use client::CbrClient;

/// Facade over the three upstream endpoints. Built once at startup from the
/// upstream config and shared read-only behind the router state.
#[derive(Debug, Clone)]
pub struct RateService {
    pub(crate) client: CbrClient,
    pub(crate) cfg: UpstreamConfig,
}

impl RateService {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        Ok(Self {
            client: CbrClient::new(cfg)?,
            cfg: cfg.clone(),
        })
    }
}
