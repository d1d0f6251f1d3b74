//! Checker configuration.

use crate::error::ConfigError;
use std::path::PathBuf;

/// File read when no trace path is given.
pub const DEFAULT_TRACE_FILE: &str = "h2o.out";

/// Configuration for checking a trace file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CheckerConfig {
    /// Number of molecules the trace is expected to build.
    pub molecules: u32,

    /// Path to the trace file (default: `h2o.out`).
    pub trace_path: PathBuf,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            molecules: 0,
            trace_path: PathBuf::from(DEFAULT_TRACE_FILE),
        }
    }
}

impl CheckerConfig {
    pub fn builder() -> CheckerConfigBuilder {
        CheckerConfigBuilder::default()
    }

    /// Reject configurations no trace can satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.molecules == 0 {
            return Err(ConfigError::NoMolecules);
        }
        Ok(())
    }
}

/// Builder for [`CheckerConfig`]. The molecule count is required.
#[derive(Debug, Default)]
pub struct CheckerConfigBuilder {
    molecules: Option<u32>,
    trace_path: Option<PathBuf>,
}

impl CheckerConfigBuilder {
    pub fn molecules(mut self, molecules: u32) -> Self {
        self.molecules = Some(molecules);
        self
    }

    pub fn trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_path = Some(path.into());
        self
    }

    /// Finish the configuration, rejecting a missing or zero molecule count.
    pub fn build(self) -> Result<CheckerConfig, ConfigError> {
        let molecules = self.molecules.ok_or(ConfigError::MissingRequiredField {
            builder: "CheckerConfigBuilder",
            field: "molecules",
        })?;
        let config = CheckerConfig {
            molecules,
            trace_path: self
                .trace_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACE_FILE)),
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<u32> for CheckerConfig {
    fn from(molecules: u32) -> Self {
        Self {
            molecules,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_default_path() {
        let config = CheckerConfig::builder().molecules(3).build().unwrap();
        assert_eq!(config.molecules, 3);
        assert_eq!(config.trace_path, PathBuf::from("h2o.out"));
    }

    #[test]
    fn builder_missing_required_field() {
        let err = CheckerConfig::builder()
            .trace_path("trace.out")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequiredField {
                builder: "CheckerConfigBuilder",
                field: "molecules"
            }
        );
        assert!(err.to_string().contains("molecules"));
    }

    #[test]
    fn builder_rejects_zero_molecules() {
        assert_eq!(
            CheckerConfig::builder().molecules(0).build(),
            Err(ConfigError::NoMolecules)
        );
    }

    #[test]
    fn zero_molecules_rejected() {
        assert_eq!(CheckerConfig::from(0).validate(), Err(ConfigError::NoMolecules));
        assert!(CheckerConfig::from(1).validate().is_ok());
    }
}
