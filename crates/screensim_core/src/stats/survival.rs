//! Population survival sample path ("number alive" step function).

use serde::{Deserialize, Serialize};

/// Non-increasing, right-continuous count of individuals still alive.
///
/// Only observed deaths move the curve; right-censored individuals stay in
/// the count through the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCurve {
    initial_size: usize,
    horizon: f64,
    /// `(time, alive from this time on)`, strictly increasing in time
    steps: Vec<(f64, usize)>,
}

impl SurvivalCurve {
    #[must_use]
    pub fn new(initial_size: usize, horizon: f64, death_times: &[f64]) -> Self {
        let mut times = death_times.to_vec();
        times.sort_by(f64::total_cmp);

        let mut steps: Vec<(f64, usize)> = Vec::with_capacity(times.len());
        let mut alive = initial_size;
        for t in times {
            alive = alive.saturating_sub(1);
            match steps.last_mut() {
                // Simultaneous deaths collapse into a single drop
                Some((last_t, count)) if *last_t == t => *count = alive,
                _ => steps.push((t, alive)),
            }
        }

        Self {
            initial_size,
            horizon,
            steps,
        }
    }

    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn steps(&self) -> &[(f64, usize)] {
        &self.steps
    }

    /// Number alive at time `t` (deaths at exactly `t` already counted)
    pub fn alive_at(&self, t: f64) -> usize {
        let idx = self.steps.partition_point(|&(step_t, _)| step_t <= t);
        if idx == 0 {
            self.initial_size
        } else {
            self.steps[idx - 1].1
        }
    }

    pub fn final_count(&self) -> usize {
        self.steps.last().map_or(self.initial_size, |&(_, n)| n)
    }

    /// Curve sampled at `0, step, 2*step, ...` up to and including the horizon
    pub fn sample(&self, step: f64) -> Vec<(f64, usize)> {
        if step.is_nan() || step <= 0.0 {
            return vec![(0.0, self.alive_at(0.0))];
        }
        let marks = (self.horizon / step).floor() as usize;
        let mut out: Vec<(f64, usize)> = (0..=marks)
            .map(|k| {
                let t = k as f64 * step;
                (t, self.alive_at(t))
            })
            .collect();
        if out.last().is_some_and(|&(t, _)| t < self.horizon) {
            out.push((self.horizon, self.alive_at(self.horizon)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_population_and_decrements() {
        let curve = SurvivalCurve::new(5, 10.0, &[3.0, 1.0, 7.5]);
        assert_eq!(curve.alive_at(0.0), 5);
        assert_eq!(curve.alive_at(0.999), 5);
        assert_eq!(curve.alive_at(1.0), 4);
        assert_eq!(curve.alive_at(3.0), 3);
        assert_eq!(curve.alive_at(10.0), 2);
        assert_eq!(curve.final_count(), 2);
    }

    #[test]
    fn test_ties_merge_into_one_step() {
        let curve = SurvivalCurve::new(4, 5.0, &[2.0, 2.0, 4.0]);
        assert_eq!(curve.steps(), &[(2.0, 2), (4.0, 1)]);
    }

    #[test]
    fn test_no_deaths_is_flat() {
        let curve = SurvivalCurve::new(100, 20.0, &[]);
        assert!(curve.steps().is_empty());
        assert_eq!(curve.alive_at(20.0), 100);
        assert!(curve.sample(5.0).iter().all(|&(_, n)| n == 100));
    }

    #[test]
    fn test_sample_includes_horizon() {
        let curve = SurvivalCurve::new(3, 2.5, &[0.5]);
        let points = curve.sample(1.0);
        assert_eq!(points, vec![(0.0, 3), (1.0, 2), (2.0, 2), (2.5, 2)]);
    }
}
