//! Summary statistics with confidence and prediction intervals.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Which uncertainty interval to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalKind {
    /// t-based interval for the mean
    Confidence,
    /// Percentile interval of the observations themselves
    Prediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Two-sided Student t critical value for `alpha` with `df` degrees of freedom
fn t_critical(alpha: f64, df: f64) -> Option<f64> {
    if df.is_nan() || df <= 0.0 || alpha <= 0.0 || alpha >= 1.0 {
        return None;
    }
    StudentsT::new(0.0, 1.0, df)
        .ok()
        .map(|t| t.inverse_cdf(1.0 - alpha / 2.0))
}

/// Linear interpolation between closest ranks of already sorted data
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Descriptive statistics of one outcome series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStat {
    pub name: String,
    pub n: usize,
    pub mean: f64,
    /// Sample variance (n - 1 denominator); zero for a single observation
    pub variance: f64,
    pub st_dev: f64,
    pub st_err: f64,
    pub min: f64,
    pub max: f64,
    /// Observations in ascending order; percentiles are read from here
    #[serde(rename = "observations")]
    sorted: Vec<f64>,
}

impl SummaryStat {
    /// Summarise `data`. An empty series yields NaN moments.
    pub fn new(name: impl Into<String>, data: &[f64]) -> Self {
        let n = data.len();
        let n_f = n as f64;
        let mean = if n == 0 {
            f64::NAN
        } else {
            data.iter().sum::<f64>() / n_f
        };
        let variance = match n {
            0 => f64::NAN,
            1 => 0.0,
            _ => data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n_f - 1.0),
        };
        let st_dev = variance.sqrt();

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            name: name.into(),
            n,
            mean,
            variance,
            st_dev,
            st_err: st_dev / n_f.sqrt(),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            sorted,
        }
    }

    /// Like `new`, but `None` for an empty series
    pub fn try_new(name: impl Into<String>, data: &[f64]) -> Option<Self> {
        (!data.is_empty()).then(|| Self::new(name, data))
    }

    pub fn percentile(&self, q: f64) -> f64 {
        percentile_sorted(&self.sorted, q)
    }

    pub fn median(&self) -> f64 {
        self.percentile(0.5)
    }

    /// `(1 - alpha)` t-interval for the mean
    pub fn confidence_interval(&self, alpha: f64) -> Interval {
        if self.n < 2 || self.st_err == 0.0 {
            return Interval::point(self.mean);
        }
        match t_critical(alpha, (self.n - 1) as f64) {
            Some(t) => Interval {
                lower: self.mean - t * self.st_err,
                upper: self.mean + t * self.st_err,
            },
            None => Interval::point(self.mean),
        }
    }

    /// Central `(1 - alpha)` percentile interval of the observations
    pub fn prediction_interval(&self, alpha: f64) -> Interval {
        Interval {
            lower: self.percentile(alpha / 2.0),
            upper: self.percentile(1.0 - alpha / 2.0),
        }
    }

    pub fn interval(&self, kind: IntervalKind, alpha: f64) -> Interval {
        match kind {
            IntervalKind::Confidence => self.confidence_interval(alpha),
            IntervalKind::Prediction => self.prediction_interval(alpha),
        }
    }
}

/// Difference between two outcome series, `x - y_ref`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DifferenceStat {
    /// Independent samples (e.g. cohorts simulated with disjoint seeds)
    Independent {
        name: String,
        mean: f64,
        st_err: f64,
        /// Welch–Satterthwaite degrees of freedom
        df: f64,
    },
    /// Element-wise differences of matched samples
    Paired(SummaryStat),
}

impl DifferenceStat {
    pub fn independent(name: impl Into<String>, x: &[f64], y_ref: &[f64]) -> Self {
        let sx = SummaryStat::new("x", x);
        let sy = SummaryStat::new("y", y_ref);
        let vx = sx.variance / sx.n as f64;
        let vy = sy.variance / sy.n as f64;
        let se2 = vx + vy;

        let df = if se2 > 0.0 && sx.n > 1 && sy.n > 1 {
            se2.powi(2) / (vx.powi(2) / (sx.n - 1) as f64 + vy.powi(2) / (sy.n - 1) as f64)
        } else {
            0.0
        };

        DifferenceStat::Independent {
            name: name.into(),
            mean: sx.mean - sy.mean,
            st_err: se2.sqrt(),
            df,
        }
    }

    /// `None` when the series are not the same length
    pub fn paired(name: impl Into<String>, x: &[f64], y_ref: &[f64]) -> Option<Self> {
        if x.len() != y_ref.len() {
            return None;
        }
        let diffs: Vec<f64> = x.iter().zip(y_ref).map(|(a, b)| a - b).collect();
        Some(DifferenceStat::Paired(SummaryStat::new(name, &diffs)))
    }

    pub fn name(&self) -> &str {
        match self {
            DifferenceStat::Independent { name, .. } => name,
            DifferenceStat::Paired(stat) => &stat.name,
        }
    }

    pub fn mean(&self) -> f64 {
        match self {
            DifferenceStat::Independent { mean, .. } => *mean,
            DifferenceStat::Paired(stat) => stat.mean,
        }
    }

    /// Independent differences have no prediction interval; the confidence
    /// interval is returned for either kind.
    pub fn interval(&self, kind: IntervalKind, alpha: f64) -> Interval {
        match self {
            DifferenceStat::Independent {
                mean, st_err, df, ..
            } => match t_critical(alpha, *df) {
                Some(t) if *st_err > 0.0 => Interval {
                    lower: mean - t * st_err,
                    upper: mean + t * st_err,
                },
                _ => Interval::point(*mean),
            },
            DifferenceStat::Paired(stat) => stat.interval(kind, alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments() {
        let s = SummaryStat::new("x", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.n, 8);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.variance - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert!((s.median() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_interval_matches_t_table() {
        // n = 10, sd = 1 => half width = t(0.975, 9) / sqrt(10) = 2.2622 / 3.1623
        let data: Vec<f64> = (0..10).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let s = SummaryStat::new("x", &data);
        let ci = s.confidence_interval(0.05);
        let half = (ci.upper - ci.lower) / 2.0;
        let expected = 2.262_157 * s.st_dev / 10f64.sqrt();
        assert!((half - expected).abs() < 1e-4, "half width {half}, expected {expected}");
        assert!(ci.contains(s.mean));
    }

    #[test]
    fn test_prediction_interval_uses_percentiles() {
        let data: Vec<f64> = (0..=100).map(f64::from).collect();
        let s = SummaryStat::new("x", &data);
        let pi = s.prediction_interval(0.05);
        assert!((pi.lower - 2.5).abs() < 1e-12);
        assert!((pi.upper - 97.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_observation_interval_is_a_point() {
        let s = SummaryStat::new("x", &[3.0]);
        let ci = s.confidence_interval(0.05);
        assert_eq!((ci.lower, ci.upper), (3.0, 3.0));
    }

    #[test]
    fn test_percentiles_survive_json() {
        let s = SummaryStat::new("x", &[4.0, 1.0, 3.0, 2.0]);
        let json = serde_json::to_string(&s).unwrap();
        let back: SummaryStat = serde_json::from_str(&json).unwrap();

        assert_eq!(back.median(), s.median());
        assert_eq!(back.prediction_interval(0.1), s.prediction_interval(0.1));
        assert!(!back.median().is_nan());
    }

    #[test]
    fn test_try_new_empty() {
        assert!(SummaryStat::try_new("x", &[]).is_none());
        assert!(SummaryStat::new("x", &[]).mean.is_nan());
    }

    #[test]
    fn test_paired_difference() {
        let d = DifferenceStat::paired("d", &[3.0, 5.0, 7.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((d.mean() - 3.0).abs() < 1e-12);
        assert!(DifferenceStat::paired("d", &[1.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_independent_difference() {
        let x = [10.0, 12.0, 11.0, 13.0, 9.0];
        let y = [5.0, 6.0, 4.0, 5.0, 5.0];
        let d = DifferenceStat::independent("d", &x, &y);
        assert!((d.mean() - 6.0).abs() < 1e-12);
        let ci = d.interval(IntervalKind::Confidence, 0.05);
        assert!(ci.lower > 0.0 && ci.upper > ci.lower);
    }
}
