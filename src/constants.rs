//! Configuration constants for degloop
//!
//! This module contains all configurable constants used throughout the
//! application. These values can be overridden through command-line flags or
//! environment variables.

use std::time::Duration;

/// Engine defaults
pub mod engine {
    /// Maximum length a segment may have and still participate in loop
    /// collapsing (also gates short dead-end removal in the pre-pass)
    pub const DEFAULT_MAX_SEGMENT_LENGTH: f64 = 500.0;

    /// A removal candidate longer than this is never deleted
    pub const DEFAULT_REMOVAL_TOLERANCE: f64 = 1000.0;

    /// Decimal places used when canonicalizing endpoint coordinates
    pub const DEFAULT_PRECISION: u32 = 3;

    /// Cycle orders processed by default, in sequence
    pub const DEFAULT_ORDERS: &[usize] = &[1, 2, 3];

    /// Largest cycle order the detector will search for
    pub const MAX_ORDER: usize = 4;

    /// Ordered category priority table, most important first. Categories not
    /// in the table rank after every listed one.
    pub const DEFAULT_HIERARCHY: &[&str] = &[
        "motorway",
        "national",
        "county",
        "municipal",
        "private",
        "forest-track",
        "recreational-trail",
    ];
}

/// Progress bar configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Spinner frames for the collapsing-triangle animation
    pub const SPINNER_FRAMES: &[&str] = &[
        "🔺 ", // Standing triangle
        "🔺◢", // Leaning right
        "🔺◣", // Leaning left
        "🔺▽", // Flipped
        "🔺▿", // Shrinking
        "🔺·", // Almost gone
    ];
}

/// Output formatting configuration
pub mod output {
    /// Default output format when not specified
    pub const DEFAULT_FORMAT: &str = "human";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_constants() {
        assert_eq!(engine::DEFAULT_MAX_SEGMENT_LENGTH, 500.0);
        assert_eq!(engine::DEFAULT_REMOVAL_TOLERANCE, 1000.0);
        assert_eq!(engine::DEFAULT_PRECISION, 3);
        assert_eq!(engine::DEFAULT_ORDERS, &[1, 2, 3]);
        assert!(engine::DEFAULT_HIERARCHY.contains(&"county"));
    }

    #[test]
    fn test_progress_constants() {
        assert_eq!(progress::TICK_INTERVAL, Duration::from_millis(100));
        assert_eq!(progress::SPINNER_FRAMES.len(), 6);
    }
}
