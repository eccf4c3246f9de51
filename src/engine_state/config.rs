//! # Configuration Module
//!
//! Tunables for the wire engine: how long idle expanded shapes stay cached, how
//! often the background sweep runs, and the dimensions of the standard flat wire.
//! Every field has a default, so an empty JSON object is a complete configuration.
//!
//! ```
//! use wire_engine::engine_state::config::WireEngineConfig;
//!
//! let config = WireEngineConfig::from_json_str(r#"{ "cache": { "idle_expiry_secs": 30 } }"#).unwrap();
//! assert_eq!(config.cache.idle_expiry_secs, 30);
//! assert_eq!(config.geometry.width, 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::error::WireError;

/// Number of subdivisions per block edge used by every wire shape.
pub const SHAPE_RESOLUTION: u8 = 16;

/// Top-level configuration for a [`WireEngine`](super::WireEngine).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireEngineConfig {
    /// Expanded-shape cache settings.
    pub cache: CacheConfig,
    /// Dimensions of the standard wire primitives.
    pub geometry: WireGeometry,
}

/// Settings for the encoding-keyed shape cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries not accessed for this many seconds are evicted.
    pub idle_expiry_secs: u64,
    /// How often the background sweep looks for idle entries.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            idle_expiry_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

impl CacheConfig {
    /// `idle_expiry_secs` as a `Duration`.
    pub fn idle_expiry(&self) -> Duration {
        Duration::from_secs(self.idle_expiry_secs)
    }

    /// `sweep_interval_secs` as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// A zero sweep interval would keep the sweeper spinning.
    pub fn validate(&self) -> Result<(), WireError> {
        if self.sweep_interval_secs == 0 {
            return Err(WireError::InvalidCacheConfig(
                "sweep_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cross-section of a flat wire, measured in 1/16ths of a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireGeometry {
    /// Width of the wire strip. Must be even so the strip stays centred.
    pub width: u8,
    /// Height of the wire above the face it is attached to.
    pub thickness: u8,
}

impl Default for WireGeometry {
    fn default() -> Self {
        WireGeometry {
            width: 2,
            thickness: 2,
        }
    }
}

impl WireGeometry {
    /// Checks that the strip fits inside a cell without touching the opposite face.
    pub fn validate(&self) -> Result<(), WireError> {
        if self.width < 2 || self.width > SHAPE_RESOLUTION - 2 || self.width % 2 != 0 {
            return Err(WireError::InvalidGeometry(format!(
                "width {} must be even and within 2..={}",
                self.width,
                SHAPE_RESOLUTION - 2
            )));
        }
        if self.thickness == 0 || self.thickness >= SHAPE_RESOLUTION / 2 {
            return Err(WireError::InvalidGeometry(format!(
                "thickness {} must be within 1..={}",
                self.thickness,
                SHAPE_RESOLUTION / 2 - 1
            )));
        }
        Ok(())
    }

    /// Lower bound of the centred strip along an axis perpendicular to the wire.
    pub fn band_min(&self) -> u8 {
        (SHAPE_RESOLUTION - self.width) / 2
    }

    /// Upper bound (exclusive) of the centred strip.
    pub fn band_max(&self) -> u8 {
        self.band_min() + self.width
    }
}

impl WireEngineConfig {
    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, WireError> {
        let config: WireEngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WireError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| WireError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded wire engine config from {:?}", path);
        Ok(config)
    }

    /// Checks the cache settings, then the geometry.
    pub fn validate(&self) -> Result<(), WireError> {
        self.cache.validate()?;
        self.geometry.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = WireEngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WireEngineConfig::default());
        assert_eq!(config.cache.idle_expiry(), Duration::from_secs(300));
    }

    #[test]
    fn rejects_odd_width() {
        let result = WireEngineConfig::from_json_str(r#"{ "geometry": { "width": 3 } }"#);
        assert!(matches!(result, Err(WireError::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_thickness_reaching_the_centre() {
        let geometry = WireGeometry {
            width: 2,
            thickness: 8,
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn rejects_a_zero_sweep_interval() {
        let result = WireEngineConfig::from_json_str(r#"{ "cache": { "sweep_interval_secs": 0 } }"#);
        assert!(matches!(result, Err(WireError::InvalidCacheConfig(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = WireEngineConfig::from_json_str("{ cache: ");
        assert!(matches!(result, Err(WireError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = WireEngineConfig::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(WireError::ConfigIo { .. })));
    }

    #[test]
    fn band_is_centred() {
        let geometry = WireGeometry {
            width: 4,
            thickness: 1,
        };
        assert_eq!(geometry.band_min(), 6);
        assert_eq!(geometry.band_max(), 10);
    }
}
