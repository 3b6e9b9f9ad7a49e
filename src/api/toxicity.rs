use serde::Serialize;
use thiserror::Error;

/// Error type for toxicity operations
#[derive(Debug, Error)]
pub enum ToxicityError {
    /// Returned when a loss percentage is out of the valid range (0-100)
    #[error("Loss percentage must be between 0 and 100 (got {0})")]
    PercentOutOfRange(f64),
}

/// Fraction of connections a toxic applies to, between 0.0 and 1.0.
///
/// Toxiproxy rolls against this value when a connection is opened, so
/// 1.0 means the toxic always applies and 0.0 means it never does.
/// Values can only be built through [`Toxicity::ALWAYS`] and
/// [`Toxicity::from_percent`], so every toxicity sent is in range.
///
/// # Example
///
/// ```
/// use netsim::api::toxicity::Toxicity;
///
/// let t = Toxicity::from_percent(25.0).unwrap();
/// assert_eq!(t.value(), 0.25);
///
/// assert!(Toxicity::from_percent(101.0).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Toxicity(f64);

impl Toxicity {
    /// A toxic that applies to every connection.
    pub const ALWAYS: Toxicity = Toxicity(1.0);

    /// Converts a user-facing percentage (0-100) into a toxicity.
    ///
    /// The result is exactly `percent / 100.0`. NaN and values outside
    /// 0-100 are rejected.
    pub fn from_percent(percent: f64) -> Result<Self, ToxicityError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(ToxicityError::PercentOutOfRange(percent));
        }

        Ok(Toxicity(percent / 100.0))
    }

    /// Returns the underlying fraction.
    pub fn value(&self) -> f64 {
        self.0
    }
}
