//! Configuration loading and management

use crate::core::discount::{DiscountSchedule, DiscountTier};
use crate::core::error::ConfigError;
use crate::core::quantity::OrderMode;
use serde::{Deserialize, Serialize};

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "127.0.0.1:3000")
    pub bind: String,

    /// Versioned prefix for every business route
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// Ordering policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrderingConfig {
    /// Where orders are allowed to draw from
    pub order_mode: OrderMode,

    /// Per customer, per stock, per day unit limit used when a stock has none
    pub default_daily_limit: Option<u32>,
}

/// Discount tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountConfig {
    pub tiers: Vec<DiscountTier>,
}

impl Default for DiscountConfig {
    fn default() -> Self {
        Self {
            tiers: DiscountSchedule::default_tiers(),
        }
    }
}

/// Event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Buffer size of the broadcast channel
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OmisConfig {
    pub server: ServerConfig,
    pub ordering: OrderingConfig,
    pub discount: DiscountConfig,
    pub events: EventsConfig,
}

impl OmisConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileNotFound {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.server.api_prefix.starts_with('/') || self.server.api_prefix.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "server.api_prefix".to_string(),
                message: "must start with '/' and not end with '/'".to_string(),
            });
        }
        if self.events.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "events.capacity".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        self.discount_schedule()?;
        Ok(())
    }

    /// Build the validated discount schedule
    pub fn discount_schedule(&self) -> Result<DiscountSchedule, ConfigError> {
        DiscountSchedule::new(self.discount.tiers.clone())
    }

    /// Merge several configurations
    ///
    /// Sections are taken from the last configuration that changes them from
    /// the defaults, so an override file only needs the keys it changes.
    pub fn merge(configs: Vec<OmisConfig>) -> Self {
        let defaults = OmisConfig::default();
        let mut merged = OmisConfig::default();

        for config in configs {
            if config.server.bind != defaults.server.bind {
                merged.server.bind = config.server.bind;
            }
            if config.server.api_prefix != defaults.server.api_prefix {
                merged.server.api_prefix = config.server.api_prefix;
            }
            if config.ordering.order_mode != defaults.ordering.order_mode {
                merged.ordering.order_mode = config.ordering.order_mode;
            }
            if config.ordering.default_daily_limit.is_some() {
                merged.ordering.default_daily_limit = config.ordering.default_daily_limit;
            }
            if config.discount != defaults.discount {
                merged.discount = config.discount;
            }
            if config.events != defaults.events {
                merged.events = config.events;
            }
        }

        merged
    }

    /// Configuration used by tests and when no file is given
    pub fn default_config() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OmisConfig::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.api_prefix, "/api/v1");
        assert_eq!(config.ordering.order_mode, OrderMode::StockAndNextDay);
        assert_eq!(config.discount.tiers.len(), 6);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = OmisConfig::from_yaml_str(
            r#"
ordering:
  order_mode: stock
  default_daily_limit: 40
"#,
        )
        .unwrap();

        assert_eq!(config.ordering.order_mode, OrderMode::Stock);
        assert_eq!(config.ordering.default_daily_limit, Some(40));
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.events.capacity, 1024);
    }

    #[test]
    fn test_yaml_serialization() {
        let config = OmisConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = OmisConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_mode_is_parse_error() {
        let err = OmisConfig::from_yaml_str("ordering:\n  order_mode: whenever\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { file: None, .. }));
    }

    #[test]
    fn test_bad_tiers_rejected() {
        let err = OmisConfig::from_yaml_str(
            r#"
discount:
  tiers:
    - { minimum_amount: 100, discount_percentage: 1 }
    - { minimum_amount: 50, discount_percentage: 2 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bad_prefix_rejected() {
        let err = OmisConfig::from_yaml_str("server:\n  api_prefix: api/\n").unwrap_err();
        assert!(err.to_string().contains("server.api_prefix"));
    }
}
