//! Core domain types for option surfaces.
//!
//! [`OptionParameters`] is an immutable value: grid evaluation derives a new
//! instance per point with [`with_spot`](OptionParameters::with_spot) and
//! [`with_time`](OptionParameters::with_time) instead of mutating a template.
//!
//! # Why no `Eq`?
//! These types wrap `f64`, which does not implement `Eq` because `NaN`
//! breaks reflexivity. We derive `PartialEq` only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::validate::{validate_finite, validate_positive};

/// Option type: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy at strike price.
    #[default]
    Call,
    /// Right to sell at strike price.
    Put,
}

/// Inputs to the Black-Scholes model for a single European option.
///
/// # Examples
/// ```
/// use greeksurf::types::{OptionParameters, OptionType};
///
/// let base = OptionParameters::new(100.0, 100.0, 0.5, 0.2, 0.01, 0.0, OptionType::Call);
/// let point = base.with_spot(120.0).with_time(0.25);
/// assert_eq!(point.strike, 100.0);
/// assert_eq!(point.spot, 120.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParameters {
    /// Underlying price S.
    pub spot: f64,
    /// Strike price K.
    pub strike: f64,
    /// Time to expiry T in years.
    pub time: f64,
    /// Annualized volatility σ.
    pub volatility: f64,
    /// Continuously compounded risk-free rate r.
    pub rate: f64,
    /// Continuous dividend yield q.
    pub dividend: f64,
    /// Call or put.
    pub option_type: OptionType,
}

impl OptionParameters {
    pub fn new(
        spot: f64,
        strike: f64,
        time: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time,
            volatility,
            rate,
            dividend,
            option_type,
        }
    }

    /// Copy of these parameters with a different spot.
    #[must_use]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Copy of these parameters with a different time to expiry.
    #[must_use]
    pub fn with_time(self, time: f64) -> Self {
        Self { time, ..self }
    }

    /// Copy of these parameters with a different option type.
    #[must_use]
    pub fn with_option_type(self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self
        }
    }

    /// Check that the parameters are inside the Black-Scholes domain.
    ///
    /// # Errors
    /// Returns [`GreekSurfError::InvalidParameter`] if spot, strike, time or
    /// volatility is not positive and finite, or if rate or dividend is not
    /// finite.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.spot, "spot")?;
        validate_positive(self.strike, "strike")?;
        validate_positive(self.time, "time")?;
        validate_positive(self.volatility, "volatility")?;
        validate_finite(self.rate, "rate")?;
        validate_finite(self.dividend, "dividend")?;
        Ok(())
    }

    /// Check the parameters that stay fixed across a grid.
    ///
    /// Spot and time are overridden per grid point, so only the shared
    /// inputs are validated here.
    pub(crate) fn validate_template(&self) -> Result<()> {
        validate_positive(self.spot, "spot")?;
        validate_positive(self.strike, "strike")?;
        validate_positive(self.volatility, "volatility")?;
        validate_finite(self.rate, "rate")?;
        validate_finite(self.dividend, "dividend")?;
        Ok(())
    }
}

impl Default for OptionParameters {
    /// At-the-money call used by the lab's initial controls.
    fn default() -> Self {
        Self::new(100.0, 100.0, 0.5, 0.2, 0.01, 0.0, OptionType::Call)
    }
}

/// Quantity plotted as the surface height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceMetric {
    /// Option value.
    #[default]
    Price,
    /// ∂V/∂S.
    Delta,
    /// ∂²V/∂S².
    Gamma,
    /// ∂V/∂σ.
    Vega,
    /// Calendar decay −∂V/∂T.
    Theta,
    /// ∂V/∂r.
    Rho,
}

impl SurfaceMetric {
    /// All metrics in display order.
    pub const ALL: [SurfaceMetric; 6] = [
        SurfaceMetric::Price,
        SurfaceMetric::Delta,
        SurfaceMetric::Gamma,
        SurfaceMetric::Vega,
        SurfaceMetric::Theta,
        SurfaceMetric::Rho,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceMetric::Price => "price",
            SurfaceMetric::Delta => "delta",
            SurfaceMetric::Gamma => "gamma",
            SurfaceMetric::Vega => "vega",
            SurfaceMetric::Theta => "theta",
            SurfaceMetric::Rho => "rho",
        }
    }
}

impl fmt::Display for SurfaceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceMetric {
    type Err = GreekSurfError;

    fn from_str(s: &str) -> Result<Self> {
        SurfaceMetric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GreekSurfError::invalid_input(format!("unknown surface metric '{s}'")))
    }
}

/// First and second order sensitivities of an option price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// ∂V/∂S.
    pub delta: f64,
    /// ∂²V/∂S².
    pub gamma: f64,
    /// ∂V/∂σ, per unit of volatility.
    pub vega: f64,
    /// −∂V/∂T, per year.
    pub theta: f64,
    /// ∂V/∂r, per unit of rate.
    pub rho: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_leave_template_untouched() {
        let base = OptionParameters::default();
        let point = base.with_spot(75.0).with_time(1.5);
        assert_eq!(base.spot, 100.0);
        assert_eq!(base.time, 0.5);
        assert_eq!(point.spot, 75.0);
        assert_eq!(point.time, 1.5);
        assert_eq!(point.volatility, base.volatility);
    }

    #[test]
    fn validate_rejects_each_bad_field() {
        let base = OptionParameters::default();
        assert!(base.validate().is_ok());
        assert!(base.with_spot(0.0).validate().is_err());
        assert!(base.with_time(0.0).validate().is_err());
        assert!(
            OptionParameters {
                volatility: -0.1,
                ..base
            }
            .validate()
            .is_err()
        );
        assert!(
            OptionParameters {
                strike: f64::NAN,
                ..base
            }
            .validate()
            .is_err()
        );
        assert!(
            OptionParameters {
                rate: f64::INFINITY,
                ..base
            }
            .validate()
            .is_err()
        );
        // Negative rates are valid.
        assert!(
            OptionParameters {
                rate: -0.005,
                ..base
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn template_validation_ignores_time() {
        let base = OptionParameters::default().with_time(0.0);
        assert!(base.validate().is_err());
        assert!(base.validate_template().is_ok());
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("Delta".parse::<SurfaceMetric>().unwrap(), SurfaceMetric::Delta);
        assert_eq!(" gamma ".parse::<SurfaceMetric>().unwrap(), SurfaceMetric::Gamma);
        assert!("vanna".parse::<SurfaceMetric>().is_err());
        for m in SurfaceMetric::ALL {
            assert_eq!(m.to_string().parse::<SurfaceMetric>().unwrap(), m);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SurfaceMetric::Theta).unwrap();
        assert_eq!(json, "\"theta\"");
        let t: OptionType = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(t, OptionType::Put);
    }
}
