//! Engine configuration

use crate::constants::engine::{
    DEFAULT_HIERARCHY, DEFAULT_MAX_SEGMENT_LENGTH, DEFAULT_ORDERS, DEFAULT_PRECISION,
    DEFAULT_REMOVAL_TOLERANCE, MAX_ORDER,
};
use crate::error::DegloopError;

/// Parameters steering one orchestrator run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum length for cycle participation and dead-end removal
    pub max_segment_length: f64,
    /// A removal candidate longer than this is never deleted
    pub removal_length_tolerance: f64,
    /// Decimal places for endpoint canonicalization
    pub precision: u32,
    /// Cycle orders to process, ascending subset of 1..=4
    pub orders: Vec<usize>,
    /// Ordered category priority table, most important first
    pub hierarchy: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_segment_length: DEFAULT_MAX_SEGMENT_LENGTH,
            removal_length_tolerance: DEFAULT_REMOVAL_TOLERANCE,
            precision: DEFAULT_PRECISION,
            orders: DEFAULT_ORDERS.to_vec(),
            hierarchy: DEFAULT_HIERARCHY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`]; every field falls back to its default
#[derive(Default)]
pub struct EngineConfigBuilder {
    max_segment_length: Option<f64>,
    removal_length_tolerance: Option<f64>,
    precision: Option<u32>,
    orders: Option<Vec<usize>>,
    hierarchy: Option<Vec<String>>,
}

impl EngineConfigBuilder {
    pub fn with_max_segment_length(mut self, value: f64) -> Self {
        self.max_segment_length = Some(value);
        self
    }

    pub fn with_removal_length_tolerance(mut self, value: f64) -> Self {
        self.removal_length_tolerance = Some(value);
        self
    }

    pub fn with_precision(mut self, value: u32) -> Self {
        self.precision = Some(value);
        self
    }

    pub fn with_orders(mut self, orders: Vec<usize>) -> Self {
        self.orders = Some(orders);
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: Vec<String>) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }
}

impl crate::common::ConfigBuilder for EngineConfigBuilder {
    type Config = EngineConfig;

    fn build(self) -> Result<Self::Config, DegloopError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            max_segment_length: self.max_segment_length.unwrap_or(defaults.max_segment_length),
            removal_length_tolerance: self
                .removal_length_tolerance
                .unwrap_or(defaults.removal_length_tolerance),
            precision: self.precision.unwrap_or(defaults.precision),
            orders: self
                .orders
                .filter(|o| !o.is_empty())
                .unwrap_or(defaults.orders),
            hierarchy: self
                .hierarchy
                .filter(|h| !h.is_empty())
                .unwrap_or(defaults.hierarchy),
        };

        if !(config.max_segment_length > 0.0) {
            return Err(DegloopError::ConfigurationError {
                message: "max_segment_length must be a positive number".to_string(),
            });
        }
        if !(config.removal_length_tolerance > 0.0) {
            return Err(DegloopError::ConfigurationError {
                message: "removal_length_tolerance must be a positive number".to_string(),
            });
        }
        if config.orders.iter().any(|&o| o == 0 || o > MAX_ORDER) {
            return Err(DegloopError::ConfigurationError {
                message: format!("cycle orders must lie in 1..={MAX_ORDER}"),
            });
        }
        if config.orders.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DegloopError::ConfigurationError {
                message: "cycle orders must be strictly ascending".to_string(),
            });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ConfigBuilder;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_segment_length, 500.0);
        assert_eq!(config.removal_length_tolerance, 1000.0);
        assert_eq!(config.precision, 3);
        assert_eq!(config.orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .with_max_segment_length(250.0)
            .with_orders(vec![1, 2, 3, 4])
            .build()
            .unwrap();
        assert_eq!(config.max_segment_length, 250.0);
        assert_eq!(config.orders, vec![1, 2, 3, 4]);
        assert_eq!(config.precision, 3);
    }

    #[test]
    fn test_rejects_non_positive_lengths() {
        assert!(
            EngineConfig::builder()
                .with_max_segment_length(0.0)
                .build()
                .is_err()
        );
        assert!(
            EngineConfig::builder()
                .with_removal_length_tolerance(-1.0)
                .build()
                .is_err()
        );
        assert!(
            EngineConfig::builder()
                .with_max_segment_length(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_rejects_bad_orders() {
        assert!(EngineConfig::builder().with_orders(vec![0]).build().is_err());
        assert!(EngineConfig::builder().with_orders(vec![5]).build().is_err());
        assert!(
            EngineConfig::builder()
                .with_orders(vec![2, 1])
                .build()
                .is_err()
        );
        assert!(
            EngineConfig::builder()
                .with_orders(vec![2, 2])
                .build()
                .is_err()
        );
        assert!(
            EngineConfig::builder()
                .with_orders(vec![2, 4])
                .build()
                .is_ok()
        );
    }
}
