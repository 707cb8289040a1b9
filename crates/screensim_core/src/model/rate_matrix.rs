//! Transition-rate matrix of a continuous-time Markov chain
//!
//! Entry (i, j) is the instantaneous hazard of moving from state i to state
//! j. The diagonal carries no meaning and is skipped everywhere, so matrices
//! written in generator form (negative diagonal) are accepted as-is.

use serde::{Deserialize, Serialize};

use super::ids::StateId;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMatrix {
    size: usize,
    /// Row-major, `size * size` entries
    rates: Vec<f64>,
}

impl RateMatrix {
    /// Largest state space addressable by a `StateId`
    pub const MAX_STATES: usize = u16::MAX as usize + 1;

    /// Build a matrix from rows, rejecting non-square input, any negative
    /// or non-finite off-diagonal rate, and rows whose total overflows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::EmptyMatrix);
        }
        if size > Self::MAX_STATES {
            return Err(ConfigError::TooManyStates {
                states: size,
                max: Self::MAX_STATES,
            });
        }

        let mut rates = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ConfigError::NonSquareMatrix {
                    row: i,
                    len: row.len(),
                    expected: size,
                });
            }
            for (j, &rate) in row.iter().enumerate() {
                if i != j && !(rate.is_finite() && rate >= 0.0) {
                    return Err(ConfigError::InvalidRate {
                        from: StateId(i as u16),
                        to: StateId(j as u16),
                        rate,
                    });
                }
            }
            let total: f64 = row
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, r)| r)
                .sum();
            if !total.is_finite() {
                return Err(ConfigError::InfiniteTotalRate {
                    state: StateId(i as u16),
                    total,
                });
            }
            rates.extend(row);
        }

        Ok(Self { size, rates })
    }

    /// Wrap rows without any validation, for exercising engine checks that
    /// valid matrices never reach.
    #[cfg(test)]
    pub(crate) fn from_rows_unchecked(rows: Vec<Vec<f64>>) -> Self {
        let size = rows.len();
        Self {
            size,
            rates: rows.into_iter().flatten().collect(),
        }
    }

    /// An all-zero matrix; every state is absorbing.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            rates: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Outgoing rates of `state`, diagonal included
    pub fn row(&self, state: StateId) -> &[f64] {
        let start = state.index() * self.size;
        &self.rates[start..start + self.size]
    }

    pub fn rate(&self, from: StateId, to: StateId) -> f64 {
        self.rates[from.index() * self.size + to.index()]
    }

    /// Sum of off-diagonal rates leaving `state`
    pub fn total_rate(&self, state: StateId) -> f64 {
        self.row(state)
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != state.index())
            .map(|(_, r)| r)
            .sum()
    }

    /// A state is absorbing exactly when nothing leaves it.
    pub fn is_absorbing(&self, state: StateId) -> bool {
        self.total_rate(state) == 0.0
    }

    /// First off-diagonal nonzero entry leaving `state`, if any
    pub fn first_exit(&self, state: StateId) -> Option<(StateId, f64)> {
        self.row(state)
            .iter()
            .enumerate()
            .find(|&(j, &r)| j != state.index() && r != 0.0)
            .map(|(j, &r)| (StateId(j as u16), r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_square() {
        let err = RateMatrix::from_rows(vec![vec![0.0, 1.0], vec![0.0]]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonSquareMatrix {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_rejects_negative_rate() {
        let err = RateMatrix::from_rows(vec![vec![0.0, -0.5], vec![0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate { rate, .. } if rate == -0.5));
    }

    #[test]
    fn test_rejects_nan_rate() {
        let err = RateMatrix::from_rows(vec![vec![0.0, f64::NAN], vec![0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate { .. }));
    }

    #[test]
    fn test_rejects_row_total_overflow() {
        let err = RateMatrix::from_rows(vec![
            vec![0.0, f64::MAX, f64::MAX],
            vec![0.0; 3],
            vec![0.0; 3],
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InfiniteTotalRate {
                state: StateId(0),
                total: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_large_finite_row_total_accepted() {
        let m = RateMatrix::from_rows(vec![vec![0.0, f64::MAX / 2.0], vec![0.0; 2]]).unwrap();
        assert!(m.total_rate(StateId(0)).is_finite());
    }

    #[test]
    fn test_rejects_more_states_than_ids() {
        // Row lengths are never inspected once the size is out of range
        let rows = vec![Vec::new(); RateMatrix::MAX_STATES + 1];
        let err = RateMatrix::from_rows(rows).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooManyStates {
                states: RateMatrix::MAX_STATES + 1,
                max: RateMatrix::MAX_STATES
            }
        );
    }

    #[test]
    fn test_diagonal_is_ignored() {
        let m = RateMatrix::from_rows(vec![vec![-0.3, 0.1, 0.2], vec![0.0; 3], vec![0.0; 3]])
            .unwrap();
        assert!((m.total_rate(StateId(0)) - 0.3).abs() < 1e-12);
        assert!(m.is_absorbing(StateId(1)));
        assert_eq!(m.first_exit(StateId(0)), Some((StateId(1), 0.1)));
        assert_eq!(m.first_exit(StateId(2)), None);
    }
}
