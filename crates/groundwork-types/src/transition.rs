//! Probabilistic transition outcomes.

use serde::{Deserialize, Serialize};

use crate::state::State;

/// One possible outcome of applying an action: the resulting state and
/// the probability of reaching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionProbability {
    /// The state reached.
    pub state: State,
    /// Probability of reaching `state`, in `[0, 1]`.
    pub probability: f64,
}

impl TransitionProbability {
    /// Create a new outcome.
    pub const fn new(state: State, probability: f64) -> Self {
        Self { state, probability }
    }

    /// A deterministic outcome (probability 1).
    pub const fn certain(state: State) -> Self {
        Self::new(state, 1.0)
    }
}

/// Sum of the probabilities in a distribution.
///
/// A well-formed distribution sums to 1 within floating-point tolerance.
pub fn distribution_total(outcomes: &[TransitionProbability]) -> f64 {
    outcomes.iter().map(|tp| tp.probability).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ObjectInstance;

    #[test]
    fn total_of_split_distribution() {
        let a = State::new().with_object(ObjectInstance::new("agent0", "agent").with("x", 0));
        let b = State::new().with_object(ObjectInstance::new("agent0", "agent").with("x", 1));
        let outcomes = vec![
            TransitionProbability::new(a, 0.25),
            TransitionProbability::new(b, 0.75),
        ];
        assert!((distribution_total(&outcomes) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_distribution_totals_zero() {
        assert!(distribution_total(&[]).abs() < f64::EPSILON);
    }
}
