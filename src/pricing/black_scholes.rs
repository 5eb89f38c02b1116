//! Black-Scholes-Merton pricing with continuous dividend yield.
//!
//! ```text
//! d1 = (ln(S/K) + (r − q + ½σ²)T) / (σ√T)
//! d2 = d1 − σ√T
//! C  = S·e^(−qT)·N(d1) − K·e^(−rT)·N(d2)
//! P  = K·e^(−rT)·N(−d2) − S·e^(−qT)·N(−d1)
//! ```
//!
//! # References
//! - Hull, J. "Options, Futures, and Other Derivatives", ch. 15 and 19

use crate::pricing::normal::{norm_cdf, norm_pdf};
use crate::types::{Greeks, OptionParameters, OptionType, SurfaceMetric};

/// A single Black-Scholes evaluation.
///
/// All intermediate terms are computed once in [`new`](Self::new); price and
/// each Greek are then cheap reads.
///
/// # Examples
/// ```
/// use greeksurf::pricing::BlackScholes;
/// use greeksurf::types::{OptionParameters, OptionType};
///
/// let params = OptionParameters::new(100.0, 100.0, 1.0, 0.2, 0.05, 0.0, OptionType::Call);
/// let bs = BlackScholes::new(&params);
/// assert!((bs.price() - 10.4506).abs() < 1e-4);
/// assert!(bs.gamma() > 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    option_type: OptionType,
    spot: f64,
    strike: f64,
    time: f64,
    volatility: f64,
    rate: f64,
    dividend: f64,
    sqrt_t: f64,
    d1: f64,
    d2: f64,
    /// e^(−qT)
    div_factor: f64,
    /// e^(−rT)
    discount: f64,
    /// φ(d1)
    pdf_d1: f64,
    /// N(d1), N(d2) for calls; N(−d1), N(−d2) for puts.
    n_d1: f64,
    n_d2: f64,
}

impl BlackScholes {
    /// Evaluate the shared terms for a parameter set. Performs no validation.
    pub fn new(params: &OptionParameters) -> Self {
        let &OptionParameters {
            spot,
            strike,
            time,
            volatility,
            rate,
            dividend,
            option_type,
        } = params;

        let sqrt_t = time.sqrt();
        let vol_sqrt_t = volatility * sqrt_t;
        let d1 = ((spot / strike).ln() + (rate - dividend + 0.5 * volatility * volatility) * time)
            / vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;

        let (n_d1, n_d2) = match option_type {
            OptionType::Call => (norm_cdf(d1), norm_cdf(d2)),
            OptionType::Put => (norm_cdf(-d1), norm_cdf(-d2)),
        };

        Self {
            option_type,
            spot,
            strike,
            time,
            volatility,
            rate,
            dividend,
            sqrt_t,
            d1,
            d2,
            div_factor: (-dividend * time).exp(),
            discount: (-rate * time).exp(),
            pdf_d1: norm_pdf(d1),
            n_d1,
            n_d2,
        }
    }

    pub fn d1(&self) -> f64 {
        self.d1
    }

    pub fn d2(&self) -> f64 {
        self.d2
    }

    /// Option value.
    pub fn price(&self) -> f64 {
        let fwd_leg = self.spot * self.div_factor * self.n_d1;
        let strike_leg = self.strike * self.discount * self.n_d2;
        match self.option_type {
            OptionType::Call => fwd_leg - strike_leg,
            OptionType::Put => strike_leg - fwd_leg,
        }
    }

    /// ∂V/∂S: e^(−qT)·N(d1) for calls, e^(−qT)·(N(d1) − 1) for puts.
    pub fn delta(&self) -> f64 {
        match self.option_type {
            OptionType::Call => self.div_factor * self.n_d1,
            // N(d1) − 1 = −N(−d1)
            OptionType::Put => -self.div_factor * self.n_d1,
        }
    }

    /// ∂²V/∂S², identical for calls and puts.
    pub fn gamma(&self) -> f64 {
        self.div_factor * self.pdf_d1 / (self.spot * self.volatility * self.sqrt_t)
    }

    /// ∂V/∂σ per unit of volatility, identical for calls and puts.
    pub fn vega(&self) -> f64 {
        self.spot * self.div_factor * self.pdf_d1 * self.sqrt_t
    }

    /// Time decay −∂V/∂T per year.
    pub fn theta(&self) -> f64 {
        let decay = -self.spot * self.div_factor * self.pdf_d1 * self.volatility / (2.0 * self.sqrt_t);
        let carry_strike = self.rate * self.strike * self.discount * self.n_d2;
        let carry_spot = self.dividend * self.spot * self.div_factor * self.n_d1;
        match self.option_type {
            OptionType::Call => decay - carry_strike + carry_spot,
            OptionType::Put => decay + carry_strike - carry_spot,
        }
    }

    /// ∂V/∂r per unit of rate.
    pub fn rho(&self) -> f64 {
        let leg = self.strike * self.time * self.discount * self.n_d2;
        match self.option_type {
            OptionType::Call => leg,
            OptionType::Put => -leg,
        }
    }

    pub fn greeks(&self) -> Greeks {
        Greeks {
            delta: self.delta(),
            gamma: self.gamma(),
            vega: self.vega(),
            theta: self.theta(),
            rho: self.rho(),
        }
    }

    /// Value of the requested surface metric.
    pub fn metric(&self, metric: SurfaceMetric) -> f64 {
        match metric {
            SurfaceMetric::Price => self.price(),
            SurfaceMetric::Delta => self.delta(),
            SurfaceMetric::Gamma => self.gamma(),
            SurfaceMetric::Vega => self.vega(),
            SurfaceMetric::Theta => self.theta(),
            SurfaceMetric::Rho => self.rho(),
        }
    }
}
