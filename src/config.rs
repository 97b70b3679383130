use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    CacheConfig, IndicatorEngine, IndicatorSettings, PortfolioConfig, Result, ScorerConfig,
    SignalScorer, ValidationPolicy,
};

/// Every tunable in one TOML document.
///
/// All sections and keys are optional; anything omitted keeps its default.
///
/// ```toml
/// [indicators]
/// sma_fast = 20
///
/// [scorer]
/// oversold = 25.0
/// undefined_momentum = "penalize"
///
/// [validation]
/// inconsistent_bars = "reject"
///
/// [cache]
/// capacity = 16
/// time_to_live_secs = 900
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub indicators: IndicatorSettings,
    pub scorer: ScorerConfig,
    pub validation: ValidationPolicy,
    pub cache: CacheConfig,
    pub portfolio: PortfolioConfig,
}

impl Settings {
    /// # Errors
    ///
    /// [`Error::Config`](crate::Error::Config) on malformed TOML, unknown
    /// enum values or zero window lengths.
    /// [`Error::InvalidThresholds`](crate::Error::InvalidThresholds) when the
    /// RSI bands are not finite or not in ascending order.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.scorer.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) when the file cannot be read, or see
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Self::from_toml_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), indicators = %settings.indicators, "loaded settings");
        Ok(settings)
    }

    /// Engine configured with these indicator and validation settings.
    #[must_use]
    pub fn engine(&self) -> IndicatorEngine {
        IndicatorEngine::new(self.indicators).with_validation(self.validation)
    }

    #[must_use]
    pub fn scorer(&self) -> SignalScorer {
        SignalScorer::new(self.scorer)
    }
}
