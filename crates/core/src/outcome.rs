//! Simulated outcome samples.

/// One outcome sample produced by the simulation phase.
///
/// Boolean outcomes contribute 1 or 0 to a node's reward sum; scalar
/// outcomes contribute their raw value.
///
/// # Example
/// ```
/// use pitwall_core::Outcome;
///
/// assert_eq!(Outcome::from(true).value(), 1.0);
/// assert_eq!(Outcome::from(0.25).value(), 0.25);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Reward(f64),
}

impl Outcome {
    /// Scalar contribution to a node's reward sum.
    pub fn value(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Reward(r) => r,
        }
    }

    /// Check if this is a winning outcome.
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }
}

impl From<bool> for Outcome {
    fn from(win: bool) -> Self {
        if win {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl From<f64> for Outcome {
    fn from(reward: f64) -> Self {
        Outcome::Reward(reward)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Reward(r) => write!(f, "{:.3}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_contributions() {
        assert_eq!(Outcome::Win.value(), 1.0);
        assert_eq!(Outcome::Loss.value(), 0.0);
        assert!(Outcome::from(true).is_win());
        assert!(!Outcome::from(false).is_win());
    }

    #[test]
    fn test_scalar_contribution() {
        assert_eq!(Outcome::from(-3.5).value(), -3.5);
        assert!(!Outcome::Reward(1.0).is_win());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::Win.to_string(), "win");
        assert_eq!(Outcome::Reward(0.5).to_string(), "0.500");
    }
}
