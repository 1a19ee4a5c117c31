//! Rolling volatility computation.
//!
//! Computes the sample standard deviation of simple returns over a rolling
//! window. Each window is evaluated from scratch rather than with running
//! sums so that a flat window yields exactly zero.

use statrs::statistics::Statistics;
use std::collections::VecDeque;
use volscope_core::{Error, Result};

/// Sample standard deviation (n - 1 denominator).
///
/// Returns None for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

/// Fractional change between consecutive closes.
///
/// The first element is None. A zero previous close or a return that
/// overflows is corrupt input.
pub fn simple_returns(closes: &[f64]) -> Result<Vec<Option<f64>>> {
    let mut returns = Vec::with_capacity(closes.len());
    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            returns.push(None);
            continue;
        }
        let prev = closes[i - 1];
        if prev == 0.0 {
            return Err(Error::degenerate(format!(
                "zero close at index {} used as return divisor",
                i - 1
            )));
        }
        let ret = close / prev - 1.0;
        if !ret.is_finite() {
            return Err(Error::degenerate(format!(
                "non-finite return at index {} ({} after {})",
                i, close, prev
            )));
        }
        returns.push(Some(ret));
    }
    Ok(returns)
}

/// Rolling volatility calculator over simple returns.
pub struct RollingVolatility {
    /// Window size in returns.
    window: usize,
    /// Most recent returns.
    returns: VecDeque<f64>,
}

impl RollingVolatility {
    /// Create a new rolling volatility calculator.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            returns: VecDeque::with_capacity(window),
        }
    }

    /// Add a return observation.
    ///
    /// Returns the current volatility once the window is full.
    pub fn add_return(&mut self, ret: f64) -> Option<f64> {
        if self.returns.len() >= self.window {
            self.returns.pop_front();
        }
        self.returns.push_back(ret);
        self.volatility()
    }

    /// Current volatility, defined only once `window` returns are held.
    pub fn volatility(&self) -> Option<f64> {
        if !self.is_ready() || self.returns.len() < 2 {
            return None;
        }
        Some(self.returns.iter().std_dev())
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.returns.len() >= self.window
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_not_ready() {
        let vol = RollingVolatility::new(30);
        assert!(!vol.is_ready());
        assert!(vol.volatility().is_none());
    }

    #[test]
    fn test_flat_window_is_exactly_zero() {
        let mut vol = RollingVolatility::new(5);
        for _ in 0..10 {
            vol.add_return(0.0);
        }
        assert_eq!(vol.volatility(), Some(0.0));
    }

    #[test]
    fn test_rolling_window() {
        let mut vol = RollingVolatility::new(3);
        assert!(vol.add_return(0.01).is_none());
        assert!(vol.add_return(0.02).is_none());
        assert!(vol.add_return(0.03).is_some());
        let sigma = vol.add_return(0.04).unwrap();
        assert_relative_eq!(sigma, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_known_volatility() {
        let mut vol = RollingVolatility::new(3);

        // Returns: 0.01, 0.02, 0.03
        // Mean: 0.02, sample var: (0.0001 + 0 + 0.0001) / 2 = 0.0001
        vol.add_return(0.01);
        vol.add_return(0.02);
        let sigma = vol.add_return(0.03).unwrap();
        assert_relative_eq!(sigma, 0.01, epsilon = 1e-12);

        // Window slides to 0.02, 0.03, 0.05: mean 0.1/3
        let sigma = vol.add_return(0.05).unwrap();
        let expected = sample_std(&[0.02, 0.03, 0.05]).unwrap();
        assert_relative_eq!(sigma, expected, epsilon = 1e-15);
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        // mean 5, squared deviations sum 32, / 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sample_std(&values).unwrap(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_simple_returns() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(returns[0], None);
        assert_relative_eq!(returns[1].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[2].unwrap(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_overflowing_return_is_fatal() {
        let err = simple_returns(&[100.0, 1e-300, 1e10]).unwrap_err();
        assert!(matches!(err, Error::DegenerateArithmetic(_)));
    }

    #[test]
    fn test_zero_divisor_is_fatal() {
        let err = simple_returns(&[100.0, 0.0, 5.0]).unwrap_err();
        assert!(matches!(err, Error::DegenerateArithmetic(_)));
    }
}
