//! Lab configuration.
//!
//! [`LabConfig`] collects the knobs a viewer sets once per session: how the
//! grid is sampled, the display height, the footprint and the control ranges
//! for raw slider input. Every section has `#[serde(default)]`, so a partial
//! JSON document only overrides what it names:
//!
//! ```
//! use greeksurf::config::LabConfig;
//!
//! let config = LabConfig::from_json(r#"{ "display": { "target_height": 0.2 } }"#).unwrap();
//! assert_eq!(config.display.target_height, 0.2);
//! assert_eq!(config.grid.spot_steps, 40);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::lab::SurfaceRequest;
use crate::mesh::{Footprint, HeightNormalizer, DEFAULT_TARGET_HEIGHT};
use crate::surface::builder::{
    DEFAULT_SPOT_MAX_FACTOR, DEFAULT_SPOT_MIN_FACTOR, DEFAULT_STEPS, DEFAULT_TIME_MAX,
    DEFAULT_TIME_MIN,
};
use crate::surface::GridBuilder;
use crate::types::{OptionParameters, SurfaceMetric};

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub grid: GridConfig,
    pub display: DisplayConfig,
    pub footprint: Footprint,
    pub bounds: ControlBounds,
}

impl LabConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::Config`] if the text is not valid JSON for
    /// this shape or if a value fails validation.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| GreekSurfError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            spot_steps = config.grid.spot_steps,
            time_steps = config.grid.time_steps,
            target_height = config.display.target_height,
            "lab config loaded"
        );

        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GreekSurfError::Config {
            message: e.to_string(),
        })
    }

    /// A request for `params` and `metric` using the configured steps and
    /// the default one-year horizon.
    pub fn request(&self, params: OptionParameters, metric: SurfaceMetric) -> SurfaceRequest {
        SurfaceRequest {
            params,
            metric,
            spot_steps: self.grid.spot_steps,
            time_steps: self.grid.time_steps,
            time_max: DEFAULT_TIME_MAX,
        }
    }

    /// # Errors
    /// Returns [`GreekSurfError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.display.normalizer()?;
        self.bounds.validate()?;
        Ok(())
    }
}

/// How the (spot, time) grid is laid out. The steps are defaults for
/// requests built with [`LabConfig::request`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub spot_min_factor: f64,
    pub spot_max_factor: f64,
    pub time_min: f64,
    pub spot_steps: usize,
    pub time_steps: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spot_min_factor: DEFAULT_SPOT_MIN_FACTOR,
            spot_max_factor: DEFAULT_SPOT_MAX_FACTOR,
            time_min: DEFAULT_TIME_MIN,
            spot_steps: DEFAULT_STEPS,
            time_steps: DEFAULT_STEPS,
        }
    }
}

impl GridConfig {
    /// A builder carrying this section's ranges with the request's steps,
    /// metric and upper time bound.
    pub fn builder(&self, request: &SurfaceRequest) -> GridBuilder {
        GridBuilder::new()
            .spot_range(self.spot_min_factor, self.spot_max_factor)
            .time_range(self.time_min, request.time_max)
            .steps(request.spot_steps, request.time_steps)
            .metric(request.metric)
    }

    fn validate(&self) -> Result<()> {
        let factors_ok = self.spot_min_factor.is_finite()
            && self.spot_max_factor.is_finite()
            && self.spot_min_factor > 0.0
            && self.spot_min_factor < self.spot_max_factor;
        if !factors_ok {
            return Err(config_error(format!(
                "grid spot factors must satisfy 0 < min < max, got [{}, {}]",
                self.spot_min_factor, self.spot_max_factor
            )));
        }
        if !self.time_min.is_finite() || self.time_min <= 0.0 {
            return Err(config_error(format!(
                "grid time_min must be positive, got {}",
                self.time_min
            )));
        }
        if self.spot_steps == 0 || self.time_steps == 0 {
            return Err(config_error("grid steps must be at least 1"));
        }
        Ok(())
    }
}

/// Display scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Height of the largest magnitude after normalization.
    pub target_height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_TARGET_HEIGHT,
        }
    }
}

impl DisplayConfig {
    /// # Errors
    /// Returns [`GreekSurfError::Config`] unless the target height is
    /// positive and finite.
    pub fn normalizer(&self) -> Result<HeightNormalizer> {
        HeightNormalizer::new(self.target_height).map_err(|e| config_error(e.to_string()))
    }
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the interval. NaN passes through and is rejected
    /// later by parameter validation.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max) {
            return Err(config_error(format!(
                "{name} bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Ranges of the interactive controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBounds {
    pub spot: Bounds,
    pub volatility: Bounds,
    pub time_max: Bounds,
}

impl Default for ControlBounds {
    fn default() -> Self {
        Self {
            spot: Bounds::new(50.0, 150.0),
            volatility: Bounds::new(0.05, 0.8),
            time_max: Bounds::new(0.1, 2.0),
        }
    }
}

impl ControlBounds {
    /// Clamp spot, volatility and `time_max` of a raw request into range.
    /// Steps are left alone; zero steps are still rejected at generation.
    pub fn clamp(&self, request: &SurfaceRequest) -> SurfaceRequest {
        let mut clamped = *request;
        clamped.params.spot = self.spot.clamp(request.params.spot);
        clamped.params.volatility = self.volatility.clamp(request.params.volatility);
        clamped.time_max = self.time_max.clamp(request.time_max);
        clamped
    }

    fn validate(&self) -> Result<()> {
        self.spot.validate("spot")?;
        self.volatility.validate("volatility")?;
        self.time_max.validate("time_max")?;
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> GreekSurfError {
    GreekSurfError::Config {
        message: message.into(),
    }
}
