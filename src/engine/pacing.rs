use std::time::Duration;

use rand::Rng;

use crate::error::ValidationError;

/// Inclusive bounds for the pause a worker takes between two requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min: Duration,
    max: Duration,
}

impl ThinkTime {
    pub const NONE: ThinkTime = ThinkTime {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// # Errors
    ///
    /// Returns an error when `min > max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::ThinkTimeInverted {
                min: min.as_secs_f64(),
                max: max.as_secs_f64(),
            });
        }
        Ok(Self { min, max })
    }

    /// Builds bounds from fractional seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when a bound is negative, not finite, too large for a
    /// [`Duration`], or when `min > max`.
    pub fn from_secs_f64(min: f64, max: f64) -> Result<Self, ValidationError> {
        let min_duration = Duration::try_from_secs_f64(min)
            .map_err(|_err| ValidationError::ThinkTimeOutOfRange { value: min })?;
        let max_duration = Duration::try_from_secs_f64(max)
            .map_err(|_err| ValidationError::ThinkTimeOutOfRange { value: max })?;
        Self::new(min_duration, max_duration)
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draws a pause uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        rng.gen_range(self.min..=self.max)
    }
}
