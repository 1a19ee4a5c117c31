//! Exponential moving average.

/// EMA seeded with the first observation (no warm-up period).
///
/// `ema[0] = x[0]`, `ema[i] = x[i] * alpha + ema[i-1] * (1 - alpha)` with
/// `alpha = 2 / (span + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    /// Create an EMA with the given span.
    pub fn new(span: usize) -> Self {
        Self {
            alpha: Self::alpha_for(span),
            value: None,
        }
    }

    /// Smoothing factor for a span.
    #[inline]
    pub fn alpha_for(span: usize) -> f64 {
        2.0 / (span as f64 + 1.0)
    }

    /// Feed one observation and return the updated average.
    pub fn update(&mut self, x: f64) -> f64 {
        let next = match self.value {
            None => x,
            Some(prev) => x * self.alpha + prev * (1.0 - self.alpha),
        };
        self.value = Some(next);
        next
    }

    /// EMA of a whole series.
    pub fn series(values: &[f64], span: usize) -> Vec<f64> {
        let mut ema = Self::new(span);
        values.iter().map(|&x| ema.update(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_seeded_with_first_value() {
        let values = Ema::series(&[5.0, 5.0, 5.0], 10);
        assert_eq!(values, vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_recurrence() {
        let closes = [100.0, 102.0, 101.0, 105.0, 104.5];
        let span = 3;
        let alpha = Ema::alpha_for(span);
        assert_relative_eq!(alpha, 0.5);

        let ema = Ema::series(&closes, span);
        assert_eq!(ema[0], closes[0]);
        for i in 1..closes.len() {
            assert_eq!(ema[i], closes[i] * alpha + ema[i - 1] * (1.0 - alpha));
        }
        // 100 -> 101 -> 101 -> 103 -> 103.75
        assert_relative_eq!(ema[4], 103.75, epsilon = 1e-12);
    }

    #[test]
    fn test_empty() {
        assert!(Ema::series(&[], 10).is_empty());
        let mut ema = Ema::new(10);
        assert_eq!(ema.update(42.0), 42.0);
    }
}
