//! Index configuration.

use crate::models::types::{Result, TransitError};
use crate::spatial::location::GeoReference;

/// Depth used when no configuration is given
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Deepest tree [`IndexConfig::validate`] accepts
///
/// Empty subtrees are not materialised, so build cost grows with
/// `stops * max_depth` rather than `2^max_depth`.
pub const MAX_SUPPORTED_DEPTH: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexConfig {
    /// Depth at which splitting stops; the root is depth 0
    pub max_depth: usize,
    /// Origin of the planar projection
    pub reference: GeoReference,
}

impl IndexConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_reference(mut self, reference: GeoReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(TransitError::InvalidConfig(format!(
                "max_depth {} exceeds {}",
                self.max_depth, MAX_SUPPORTED_DEPTH
            )));
        }
        if !self.reference.lat.is_finite() || !self.reference.lon.is_finite() {
            return Err(TransitError::InvalidConfig(format!(
                "reference point must be finite ({}, {})",
                self.reference.lat, self.reference.lon
            )));
        }
        Ok(())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reference: GeoReference::MADISON_CAPITOL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.reference, GeoReference::MADISON_CAPITOL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = IndexConfig::default()
            .with_max_depth(1)
            .with_reference(GeoReference::new(40.7505, -73.9935));
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.reference.lat, 40.7505);
    }

    #[test]
    fn test_validation() {
        let too_deep = IndexConfig::default().with_max_depth(MAX_SUPPORTED_DEPTH + 1);
        assert!(matches!(too_deep.validate(), Err(TransitError::InvalidConfig(_))));

        let bad_reference = IndexConfig::default().with_reference(GeoReference::new(f64::NAN, 0.0));
        assert!(bad_reference.validate().is_err());

        assert!(IndexConfig::default().with_max_depth(0).validate().is_ok());
    }
}
