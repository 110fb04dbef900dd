//! Moving average calculation implementations
//!
//! Contains streaming and batch forms of:
//! - Simple Moving Average (SMA), trailing window
//! - Exponential Moving Average (EMA), seeded with the first raw value

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Whether a full window has been seen
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.period
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_ready() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Exponential Moving Average (EMA) implementation
///
/// Uses the smoothing constant `k = 2 / (period + 1)`. The first update seeds
/// the average with the raw value, so a value is available immediately.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    period: usize,
    multiplier: f64,
    current_ema: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create a new Exponential Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            current_ema: None,
        })
    }

    /// Update the EMA with a new value and return the smoothed value
    pub fn update(&mut self, value: f64) -> f64 {
        let next = match self.current_ema {
            None => value,
            // EMA = value * k + EMA(previous) * (1 - k)
            Some(current) => value * self.multiplier + current * (1.0 - self.multiplier),
        };
        self.current_ema = Some(next);
        next
    }

    /// Get the current EMA value
    pub fn value(&self) -> Result<f64> {
        self.current_ema.ok_or_else(|| {
            MathError::InsufficientData("No data available for EMA calculation".to_string())
        })
    }

    /// Smoothing constant `k`
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the EMA, clearing all values
    pub fn reset(&mut self) {
        self.current_ema = None;
    }
}

/// Trailing simple moving averages over `window` values
///
/// Produces `len - window + 1` averages. An empty vector is returned when the
/// sample is shorter than the window or the window is zero.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let mut sma = match SimpleMovingAverage::new(window) {
        Ok(sma) => sma,
        Err(_) => return Vec::new(),
    };
    if values.len() < window {
        return Vec::new();
    }

    let mut averages = Vec::with_capacity(values.len() - window + 1);
    for &value in values {
        sma.update(value);
        if let Ok(avg) = sma.value() {
            averages.push(avg);
        }
    }
    averages
}

/// Exponential moving average of every prefix of `values`
///
/// The output has the same length as the input. A zero period is treated as
/// a period of one, which reproduces the input.
pub fn exponential_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let mut ema = match ExponentialMovingAverage::new(period.max(1)) {
        Ok(ema) => ema,
        Err(_) => return Vec::new(),
    };

    values.iter().map(|&value| ema.update(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);
        assert!(sma.value().is_err());

        sma.update(6.0);
        assert_eq!(sma.value().unwrap(), 4.0); // (2 + 4 + 6) / 3 = 4

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0); // (4 + 6 + 8) / 3 = 6
    }

    #[test]
    fn test_zero_period_is_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
        assert!(ExponentialMovingAverage::new(0).is_err());
    }

    #[test]
    fn test_ema_seeds_with_first_value() {
        let mut ema = ExponentialMovingAverage::new(3).unwrap();
        assert!(ema.value().is_err());

        assert_eq!(ema.update(10.0), 10.0);
        // k = 0.5: 20 * 0.5 + 10 * 0.5
        assert_relative_eq!(ema.update(20.0), 15.0);
        assert_relative_eq!(ema.value().unwrap(), 15.0);

        ema.reset();
        assert!(ema.value().is_err());
    }

    #[test]
    fn test_moving_average_batch() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        let ma = moving_average(&data, 3);

        assert_eq!(ma.len(), data.len() - 2);
        assert_relative_eq!(ma[0], 20.0);
        assert_relative_eq!(ma[4], 60.0);

        assert!(moving_average(&data, 10).is_empty());
        assert!(moving_average(&data, 0).is_empty());
        assert_eq!(moving_average(&data, 7).len(), 1);
    }

    #[test]
    fn test_ema_batch_keeps_length() {
        let data = [100.0, 110.0, 120.0, 130.0];
        let ema = exponential_moving_average(&data, 3);

        assert_eq!(ema.len(), data.len());
        assert_eq!(ema[0], 100.0);
        assert_relative_eq!(ema[1], 105.0);
        assert_relative_eq!(ema[2], 112.5);
        assert_relative_eq!(ema[3], 121.25);

        assert!(exponential_moving_average(&[], 7).is_empty());
        assert_eq!(exponential_moving_average(&data, 0), data.to_vec());
    }
}
