//! Serde-backed configuration.
//!
//! [`InteractionConfig`] bundles the settings a host typically loads from a
//! data file: the solver's argument generation flag and the proximity
//! scanner's reach. Every field has a default, so an empty object is a valid
//! config; unknown fields are rejected to catch typos.
//!
//! # Example
//!
//! ```
//! use interplay_core::config::InteractionConfig;
//!
//! let config = InteractionConfig::from_json_str(
//!     r#"{ "solver": { "generate_args": true }, "scanner": { "range": 5.0 } }"#,
//! )
//! .unwrap();
//!
//! assert!(config.solver.generate_args);
//! assert_eq!(config.scanner.max_candidates, 3);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InteractionError, Result};
use crate::solver::SolverConfig;
use crate::supplier::ScannerConfig;

/// Top-level interaction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Settings for every interactor's solver.
    pub solver: SolverConfig,
    /// Settings for the proximity scanner.
    pub scanner: ScannerConfig,
}

impl InteractionConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Config`] if the JSON is malformed or has
    /// unknown fields, and [`InteractionError::InvalidConfig`] if a value is
    /// out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Config`] if serialisation fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks values serde cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::InvalidConfig`] naming the bad field.
    pub fn validate(&self) -> Result<()> {
        let range = self.scanner.range;
        if !range.is_finite() || range < 0.0 {
            return Err(InteractionError::InvalidConfig(format!(
                "scanner.range must be a finite, non-negative distance, got {range}"
            )));
        }
        Ok(())
    }
}
