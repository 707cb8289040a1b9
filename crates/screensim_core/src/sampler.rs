//! Exact-event ("Gillespie") sampling for a continuous-time Markov chain.
//!
//! From the current state the holding time is exponential with the total
//! outgoing rate, and the destination is drawn with probability
//! proportional to each outgoing rate.

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::model::{RateMatrix, StateId};

/// Outcome of one sampling step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextEvent {
    /// Nothing leaves the current state
    Absorbing,
    /// The next state change happens `dt` after now
    Transition { dt: f64, to: StateId },
}

/// Next-event sampler over a borrowed rate matrix
#[derive(Debug, Clone, Copy)]
pub struct Gillespie<'a> {
    matrix: &'a RateMatrix,
}

impl<'a> Gillespie<'a> {
    pub fn new(matrix: &'a RateMatrix) -> Self {
        Self { matrix }
    }

    /// Draw the waiting time and destination of the next transition out of
    /// `current`. Both draws come from `rng`, so a given stream always
    /// reproduces the same trajectory.
    pub fn next_event<R: Rng + ?Sized>(&self, current: StateId, rng: &mut R) -> NextEvent {
        let row = self.matrix.row(current);
        let total = self.matrix.total_rate(current);
        if total <= 0.0 {
            return NextEvent::Absorbing;
        }

        let Ok(holding) = Exp::new(total) else {
            return NextEvent::Absorbing;
        };
        let dt = holding.sample(rng);
        let to = choose_destination(row, current.index(), total, rng.random::<f64>());

        NextEvent::Transition { dt, to }
    }
}

/// Categorical draw by a single cumulative scan.
///
/// `u01` in `[0, 1)` is scaled to `[0, total)`; candidate `j` owns the
/// half-open slice `[cumsum_{j-1}, cumsum_j)`, so the slices partition the
/// range without gaps or overlaps. Should rounding leave the scaled value at
/// or past the final partial sum, the last candidate wins.
fn choose_destination(row: &[f64], current: usize, total: f64, u01: f64) -> StateId {
    let u = u01 * total;
    let mut cumsum = 0.0;
    let mut last = current;
    for (j, &rate) in row.iter().enumerate() {
        if j == current || rate == 0.0 {
            continue;
        }
        cumsum += rate;
        last = j;
        if u < cumsum {
            return StateId(j as u16);
        }
    }
    StateId(last as u16)
}
