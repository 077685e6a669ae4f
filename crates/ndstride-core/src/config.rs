//! Config - Engine Configuration
//!
//! Holds the process-wide settings of the array engine: the default order
//! for new arrays, the SIMD register width used to size loop lanes, and the
//! switch for vectorized kernels. Settings can come from defaults, a TOML
//! document or environment variables.
//!
//! # Key Features
//! - Serde-backed `EngineConfig` with per-field defaults
//! - TOML parsing and rendering
//! - `NDSTRIDE_*` environment overrides
//! - Global current configuration behind a `parking_lot` lock, replaceable
//!   at runtime or loaded from the environment
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use std::sync::OnceLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::order::Order;

/// Environment variable overriding `default_order`.
pub const ENV_DEFAULT_ORDER: &str = "NDSTRIDE_DEFAULT_ORDER";
/// Environment variable overriding `simd_register_bits`.
pub const ENV_SIMD_BITS: &str = "NDSTRIDE_SIMD_BITS";
/// Environment variable overriding `vectorize`.
pub const ENV_VECTORIZE: &str = "NDSTRIDE_VECTORIZE";

// =============================================================================
// Engine Configuration
// =============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Order used when callers do not ask for one.
    #[serde(default = "default_order")]
    pub default_order: Order,

    /// Width in bits of one SIMD register.
    #[serde(default = "default_simd_register_bits")]
    pub simd_register_bits: usize,

    /// Whether kernels use the lane-chunked path.
    #[serde(default = "default_vectorize")]
    pub vectorize: bool,
}

fn default_order() -> Order {
    Order::C
}

fn default_simd_register_bits() -> usize {
    256
}

fn default_vectorize() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_order: default_order(),
            simd_register_bits: default_simd_register_bits(),
            vectorize: default_vectorize(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// # Arguments
    /// * `content` - TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Builds a configuration from defaults overridden by `NDSTRIDE_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_DEFAULT_ORDER) {
            config.default_order = value.parse()?;
        }
        if let Ok(value) = std::env::var(ENV_SIMD_BITS) {
            config.simd_register_bits = value
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{ENV_SIMD_BITS} is not a number: '{value}'")))?;
        }
        if let Ok(value) = std::env::var(ENV_VECTORIZE) {
            config.vectorize = match value.trim() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::config(format!(
                        "{ENV_VECTORIZE} is not a boolean: '{other}'"
                    )))
                }
            };
        }

        config.validate()?;
        tracing::debug!(?config, "engine configuration loaded from environment");
        Ok(config)
    }

    /// Checks the configuration for invalid values.
    pub fn validate(&self) -> Result<()> {
        if self.default_order == Order::S {
            return Err(Error::config("default order must be C or F"));
        }
        if self.simd_register_bits == 0 || self.simd_register_bits % 8 != 0 {
            return Err(Error::config(format!(
                "simd_register_bits must be a positive multiple of 8, got {}",
                self.simd_register_bits
            )));
        }
        Ok(())
    }

    /// Number of lanes for an element of `elem_size` bytes, at least one.
    #[must_use]
    pub fn lanes_for(&self, elem_size: usize) -> usize {
        if !self.vectorize || elem_size == 0 {
            return 1;
        }
        (self.simd_register_bits / (8 * elem_size)).max(1)
    }
}

// =============================================================================
// Global Configuration
// =============================================================================

static CURRENT: OnceLock<RwLock<EngineConfig>> = OnceLock::new();

fn global() -> &'static RwLock<EngineConfig> {
    CURRENT.get_or_init(|| RwLock::new(EngineConfig::default()))
}

/// Returns a copy of the current engine configuration.
#[must_use]
pub fn current() -> EngineConfig {
    *global().read()
}

/// Replaces the current engine configuration after validating it.
pub fn set_current(config: EngineConfig) -> Result<()> {
    config.validate()?;
    *global().write() = config;
    Ok(())
}

/// Loads the configuration from `NDSTRIDE_*` environment variables and
/// makes it current. The current configuration is left untouched on error.
pub fn init_from_env() -> Result<EngineConfig> {
    let config = EngineConfig::from_env()?;
    set_current(config)?;
    tracing::info!(
        default_order = %config.default_order,
        simd_register_bits = config.simd_register_bits,
        vectorize = config.vectorize,
        "engine configuration installed"
    );
    Ok(config)
}

/// Restores the default engine configuration.
pub fn reset() {
    *global().write() = EngineConfig::default();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_order, Order::C);
        assert_eq!(config.simd_register_bits, 256);
        assert!(config.vectorize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lanes() {
        let config = EngineConfig::default();
        assert_eq!(config.lanes_for(8), 4);
        assert_eq!(config.lanes_for(4), 8);
        assert_eq!(config.lanes_for(1), 32);

        let scalar = EngineConfig {
            vectorize: false,
            ..EngineConfig::default()
        };
        assert_eq!(scalar.lanes_for(8), 1);

        let narrow = EngineConfig {
            simd_register_bits: 32,
            ..EngineConfig::default()
        };
        assert_eq!(narrow.lanes_for(8), 1);
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str("default_order = \"F\"\nsimd_register_bits = 512\n")
            .unwrap();
        assert_eq!(config.default_order, Order::F);
        assert_eq!(config.simd_register_bits, 512);
        assert!(config.vectorize);
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig {
            default_order: Order::F,
            simd_register_bits: 128,
            vectorize: false,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(EngineConfig::from_toml_str("simd_register_bits = 12").is_err());
        assert!(EngineConfig::from_toml_str("simd_register_bits = 0").is_err());
        assert!(EngineConfig::from_toml_str("default_order = \"S\"").is_err());
        assert!(EngineConfig::from_toml_str("default_order = 3").is_err());
    }

    #[test]
    fn test_set_current_rejects_invalid() {
        let bad = EngineConfig {
            simd_register_bits: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(set_current(bad), Err(Error::Config { .. })));
        assert!(current().validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        // only test in this crate touching the NDSTRIDE_* variables
        let clear = || {
            for key in [ENV_DEFAULT_ORDER, ENV_SIMD_BITS, ENV_VECTORIZE] {
                std::env::remove_var(key);
            }
        };
        clear();
        assert_eq!(EngineConfig::from_env().unwrap(), EngineConfig::default());

        std::env::set_var(ENV_DEFAULT_ORDER, "f");
        std::env::set_var(ENV_SIMD_BITS, " 128 ");
        std::env::set_var(ENV_VECTORIZE, "off");
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.default_order, Order::F);
        assert_eq!(config.simd_register_bits, 128);
        assert!(!config.vectorize);

        std::env::set_var(ENV_VECTORIZE, "yes");
        assert!(EngineConfig::from_env().unwrap().vectorize);

        let rejected = [
            (ENV_DEFAULT_ORDER, "Z"),
            (ENV_DEFAULT_ORDER, "S"),
            (ENV_SIMD_BITS, "wide"),
            (ENV_SIMD_BITS, "12"),
            (ENV_VECTORIZE, "maybe"),
        ];
        for (key, value) in rejected {
            clear();
            std::env::set_var(key, value);
            assert!(
                matches!(EngineConfig::from_env(), Err(Error::Config { .. })),
                "{key}={value} should be rejected"
            );
        }
        clear();
    }
}
