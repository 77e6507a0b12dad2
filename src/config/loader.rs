use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use tracing::error;

use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};

/// Load and validate config from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig> {
    let content = fs::read_to_string(&path)
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.as_ref().display(), e))?;
    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let mut config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if config.logging.is_none() {
        config.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ServiceConfig) -> Result<()> {
    if config.auth.jwt_secret.trim().is_empty() {
        bail!("auth.jwt_secret must not be empty");
    }
    if config.server.port.parse::<u16>().is_err() {
        bail!("server.port '{}' is not a valid port", config.server.port);
    }
    if let Some(retry) = &config.upstream.retry {
        if retry.attempts == Some(0) {
            bail!("upstream.retry.attempts must be >= 1");
        }
    }
    Ok(())
}

/// Substitute `${VAR}` / `${VAR:default}` placeholders from the environment.
fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const MINIMAL: &str = r#"
server:
  host: 127.0.0.1
  port: "8080"
auth:
  jwt_secret: ${CBR_GW_SECRET:dev-secret}
"#;

    #[test]
    #[serial]
    fn parses_minimal_config_with_defaults() {
        let cfg = parse_config(&expand_env_vars(MINIMAL)).unwrap();
        assert_eq!(cfg.auth.jwt_secret, "dev-secret");
        assert_eq!(cfg.auth.token_ttl_days, 365);
        assert_eq!(cfg.server.api_prefix, "/api/v1");
        assert!(cfg.upstream.catalog_url.contains("XML_valFull.asp"));
        assert_eq!(cfg.logging.unwrap().format, LogFormat::Compact);
        assert!(!cfg.metrics.is_enabled);
    }

    #[test]
    #[serial]
    fn env_var_overrides_default() {
        std::env::set_var("CBR_GW_SECRET", "from-env");
        let cfg = parse_config(&expand_env_vars(MINIMAL)).unwrap();
        std::env::remove_var("CBR_GW_SECRET");
        assert_eq!(cfg.auth.jwt_secret, "from-env");
    }

    #[test]
    fn rejects_bad_port() {
        let yaml = MINIMAL.replace("\"8080\"", "\"notaport\"");
        assert!(parse_config(&yaml).is_err());
    }
}
