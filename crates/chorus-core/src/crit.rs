use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Criticality scalar. Smaller is better; zero means no local tension.
///
/// Wraps `f64` with the IEEE total order so floating-point criticalities
/// satisfy the `Ord` bound on [`Agent::Crit`](crate::Agent).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Crit(pub f64);

impl Crit {
    pub const ZERO: Crit = Crit(0.0);

    pub fn new(value: f64) -> Self {
        debug_assert!(value.is_finite(), "criticality must be finite");
        Crit(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

// Equality must stay consistent with the total order, so both go through
// total_cmp rather than the partial f64 operators.
impl PartialEq for Crit {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Crit {}

impl PartialOrd for Crit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Crit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Crit {
    fn from(value: f64) -> Self {
        Crit::new(value)
    }
}

impl fmt::Display for Crit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_on_plain_values() {
        assert!(Crit::new(0.1) < Crit::new(0.2));
        assert!(Crit::new(0.2) > Crit::ZERO);
        assert_eq!(Crit::new(0.5), Crit::new(0.5));
    }

    #[test]
    fn zero_detection() {
        assert!(Crit::ZERO.is_zero());
        assert!(!Crit::new(1e-9).is_zero());
    }
}
