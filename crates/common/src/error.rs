use std::time::Duration;

use glam::DVec3;

/// Failures reported by world-state, camera and pacing setters.
///
/// Setters validate before touching shared state, so an `Err` always means the
/// previous value is still in place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("name must not be empty")]
    InvalidName,
    #[error("no body named {0:?}")]
    NotFound(String),
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },
    #[error("camera is not locked to a body")]
    NotLocked,
    #[error("initialization failed: {0}")]
    InitFailure(String),
}

impl SimError {
    pub fn out_of_range(what: &'static str, value: impl Into<f64>) -> Self {
        Self::OutOfRange {
            what,
            value: value.into(),
        }
    }
}

/// Reject NaN and infinities.
pub fn require_finite(what: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::out_of_range(what, value))
    }
}

/// Reject any component that is NaN or infinite.
pub fn require_finite_vec(what: &'static str, value: DVec3) -> Result<DVec3, SimError> {
    match value.to_array().into_iter().find(|c| !c.is_finite()) {
        Some(bad) => Err(SimError::out_of_range(what, bad)),
        None => Ok(value),
    }
}

/// Reject anything that is not strictly positive and finite.
pub fn require_positive(what: &'static str, value: f64) -> Result<f64, SimError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::out_of_range(what, value))
    }
}

/// Reject negatives, NaN and infinity; zero is allowed.
pub fn require_non_negative(what: &'static str, value: f64) -> Result<f64, SimError> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::out_of_range(what, value))
    }
}

/// A positive, finite rate whose period `1 / rate` fits in a [`Duration`].
pub fn require_rate(what: &'static str, per_second: f64) -> Result<f64, SimError> {
    let rate = require_positive(what, per_second)?;
    match Duration::try_from_secs_f64(rate.recip()) {
        Ok(_) => Ok(rate),
        Err(_) => Err(SimError::out_of_range(what, rate)),
    }
}

/// Reject values outside the closed unit interval.
pub fn require_unit(what: &'static str, value: f32) -> Result<f32, SimError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SimError::out_of_range(what, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_nan() {
        assert!(require_positive("tick speed", 0.0).is_err());
        assert!(require_positive("tick speed", -3.0).is_err());
        assert!(require_positive("tick speed", f64::NAN).is_err());
        assert_eq!(require_positive("tick speed", 2.5), Ok(2.5));
    }

    #[test]
    fn validators_reject_non_finite() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(require_finite("gravity scaling", bad).is_err());
            assert!(require_positive("tick speed", bad).is_err());
            assert!(require_non_negative("distance", bad).is_err());
        }
        assert_eq!(require_finite("gravity scaling", -2.0), Ok(-2.0));
        assert!(require_finite_vec("velocity", DVec3::new(0.0, f64::NAN, 0.0)).is_err());
        assert!(require_finite_vec("velocity", DVec3::new(1.0, -2.0, 3.0)).is_ok());
    }

    #[test]
    fn rate_period_must_fit_a_duration() {
        assert_eq!(require_rate("tick speed", 60.0), Ok(60.0));
        assert!(require_rate("tick speed", 1e-300).is_err());
        assert!(require_rate("tick speed", f64::INFINITY).is_err());
        assert!(require_rate("tick speed", 0.0).is_err());
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(require_non_negative("distance", 0.0), Ok(0.0));
        assert!(require_non_negative("distance", -0.1).is_err());
    }

    #[test]
    fn unit_interval_is_closed() {
        assert_eq!(require_unit("luminosity", 0.0), Ok(0.0));
        assert_eq!(require_unit("luminosity", 1.0), Ok(1.0));
        assert!(require_unit("luminosity", 1.01).is_err());
        assert!(require_unit("red", -0.5).is_err());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = SimError::out_of_range("time scaling", -1.0);
        assert_eq!(err.to_string(), "time scaling out of range: -1");
        assert_eq!(
            SimError::NotFound("earth".into()).to_string(),
            "no body named \"earth\""
        );
    }
}
