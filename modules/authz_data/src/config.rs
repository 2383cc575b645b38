use std::time::Duration;

use keyset_core::LimitCfg;
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// `modules.authz_data` section of the application config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthzDataConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// Deadline for one list scan; `null` disables it.
    #[serde(default = "default_query_timeout", with = "humantime_serde")]
    pub query_timeout: Option<Duration>,
}

impl Default for AuthzDataConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_page_size() -> u64 {
    25
}

fn default_max_page_size() -> u64 {
    1000
}

fn default_query_timeout() -> Option<Duration> {
    Some(Duration::from_secs(5))
}

impl AuthzDataConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_page_size == 0 {
            anyhow::bail!("max_page_size must be at least 1");
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "default_page_size must be between 1 and max_page_size ({})",
                self.max_page_size
            );
        }
        Ok(())
    }

    pub fn limits(&self) -> LimitCfg {
        LimitCfg {
            default: self.default_page_size,
            max: self.max_page_size,
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            limits: self.limits(),
            query_timeout: self.query_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let cfg: AuthzDataConfig =
            serde_json::from_value(serde_json::json!({ "max_page_size": 200 })).unwrap();
        assert_eq!(cfg.default_page_size, 25);
        assert_eq!(cfg.limits().max, 200);
        assert_eq!(cfg.query_timeout, Some(Duration::from_secs(5)));
        cfg.validate().unwrap();
    }

    #[test]
    fn humantime_timeouts_and_null() {
        let cfg: AuthzDataConfig =
            serde_json::from_value(serde_json::json!({ "query_timeout": "750ms" })).unwrap();
        assert_eq!(cfg.query_timeout, Some(Duration::from_millis(750)));

        let cfg: AuthzDataConfig =
            serde_json::from_value(serde_json::json!({ "query_timeout": null })).unwrap();
        assert_eq!(cfg.service_config().query_timeout, None);
    }

    #[test]
    fn inconsistent_limits_are_rejected() {
        let cfg = AuthzDataConfig {
            default_page_size: 50,
            max_page_size: 10,
            ..AuthzDataConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(serde_json::from_value::<AuthzDataConfig>(serde_json::json!({ "page": 1 })).is_err());
    }
}
