//! Text and JSON reports
//!
//! Everything here only reads simulation outcomes. Estimates are printed
//! as `mean (lower, upper)`: confidence intervals for a single cohort,
//! prediction intervals across cohorts.

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use serde::Serialize;

use screensim_core::stats::{DifferenceStat, Interval, IntervalKind, SummaryStat};

use crate::format::{
    format_currency, format_currency_short, format_estimate, format_number, format_percentage,
};
use crate::run::StrategyRun;

/// Widest histogram bar, in characters
const HISTOGRAM_WIDTH: usize = 40;

// =============================================================================
// Summary model (shared by text and JSON output)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Estimate {
    fn from_stat(stat: &SummaryStat, kind: IntervalKind, alpha: f64) -> Self {
        Self::new(stat.mean, stat.interval(kind, alpha))
    }

    fn from_difference(diff: &DifferenceStat, kind: IntervalKind, alpha: f64) -> Self {
        Self::new(diff.mean(), diff.interval(kind, alpha))
    }

    fn new(mean: f64, interval: Interval) -> Self {
        Self {
            mean,
            lower: interval.lower,
            upper: interval.upper,
        }
    }

    fn interval(&self) -> Interval {
        Interval {
            lower: self.lower,
            upper: self.upper,
        }
    }

    fn render(&self, formatter: impl Fn(f64) -> String) -> String {
        format_estimate(self.mean, self.interval(), formatter)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventEstimate {
    pub name: String,
    pub per_individual: Estimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcrossCohorts {
    pub cohorts: usize,
    pub mean_survival_time: Estimate,
    pub mean_cost: Estimate,
    pub mean_utility: Estimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub key: String,
    pub name: String,
    pub population_size: usize,
    pub horizon: f64,
    pub deaths: usize,
    pub censored: usize,
    pub survival_time: Estimate,
    pub survival_time_among_deaths: Option<Estimate>,
    pub cost: Estimate,
    pub utility: Estimate,
    pub events: Vec<EventEstimate>,
    pub across_cohorts: Option<AcrossCohorts>,
}

/// `strategy - baseline`
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub strategy: String,
    pub baseline: String,
    pub interval: &'static str,
    pub survival_time: Estimate,
    pub cost: Estimate,
    pub utility: Estimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub alpha: f64,
    pub strategies: Vec<StrategySummary>,
    pub comparisons: Vec<Comparison>,
}

impl RunSummary {
    pub fn new(runs: &[StrategyRun], alpha: f64) -> Self {
        let strategies = runs.iter().map(|r| summarize(r, alpha)).collect();
        let comparisons = match runs.split_first() {
            Some((baseline, others)) => others
                .iter()
                .map(|other| compare(baseline, other, alpha))
                .collect(),
            None => Vec::new(),
        };
        Self {
            alpha,
            strategies,
            comparisons,
        }
    }
}

fn summarize(run: &StrategyRun, alpha: f64) -> StrategySummary {
    let cohort = run.first_cohort();
    let ci = IntervalKind::Confidence;

    let events = cohort
        .stat_event_counts
        .iter()
        .map(|stat| EventEstimate {
            name: stat.name.clone(),
            per_individual: Estimate::from_stat(stat, ci, alpha),
        })
        .collect();

    let across_cohorts = run.summary.as_ref().map(|s| {
        let pi = IntervalKind::Prediction;
        AcrossCohorts {
            cohorts: s.len(),
            mean_survival_time: Estimate::from_stat(&s.stat_mean_survival_time, pi, alpha),
            mean_cost: Estimate::from_stat(&s.stat_mean_cost, pi, alpha),
            mean_utility: Estimate::from_stat(&s.stat_mean_utility, pi, alpha),
        }
    });

    StrategySummary {
        key: run.strategy.key().to_string(),
        name: run.strategy.name().to_string(),
        population_size: cohort.population_size,
        horizon: cohort.horizon,
        deaths: cohort.deaths(),
        censored: cohort.censored(),
        survival_time: Estimate::from_stat(&cohort.stat_survival_time, ci, alpha),
        survival_time_among_deaths: cohort
            .stat_observed_survival_time
            .as_ref()
            .map(|s| Estimate::from_stat(s, ci, alpha)),
        cost: Estimate::from_stat(&cohort.stat_cost, ci, alpha),
        utility: Estimate::from_stat(&cohort.stat_utility, ci, alpha),
        events,
        across_cohorts,
    }
}

/// Multi-cohort runs pair cohort `k` of both strategies and report a
/// prediction interval; single cohorts compare individuals as independent
/// samples with a confidence interval.
fn compare(baseline: &StrategyRun, other: &StrategyRun, alpha: f64) -> Comparison {
    let paired = match (&baseline.summary, &other.summary) {
        (Some(b), Some(o)) => Some((
            DifferenceStat::paired("survival", &o.mean_survival_times, &b.mean_survival_times),
            DifferenceStat::paired("cost", &o.mean_costs, &b.mean_costs),
            DifferenceStat::paired("utility", &o.mean_utilities, &b.mean_utilities),
        )),
        _ => None,
    };

    let (kind, survival, cost, utility) = match paired {
        Some((Some(s), Some(c), Some(u))) => (IntervalKind::Prediction, s, c, u),
        _ => {
            let b = baseline.first_cohort();
            let o = other.first_cohort();
            (
                IntervalKind::Confidence,
                DifferenceStat::independent(
                    "survival",
                    &o.survival_values(),
                    &b.survival_values(),
                ),
                DifferenceStat::independent("cost", &o.costs, &b.costs),
                DifferenceStat::independent("utility", &o.utilities, &b.utilities),
            )
        }
    };

    Comparison {
        strategy: other.strategy.name().to_string(),
        baseline: baseline.strategy.name().to_string(),
        interval: match kind {
            IntervalKind::Confidence => "confidence",
            IntervalKind::Prediction => "prediction",
        },
        survival_time: Estimate::from_difference(&survival, kind, alpha),
        cost: Estimate::from_difference(&cost, kind, alpha),
        utility: Estimate::from_difference(&utility, kind, alpha),
    }
}

// =============================================================================
// Text report
// =============================================================================

/// Render the full text report
pub fn render_text(runs: &[StrategyRun], alpha: f64, survival_step: f64) -> String {
    let summary = RunSummary::new(runs, alpha);
    let level = format_percentage(1.0 - alpha);
    let years = |v: f64| format_number(v, 2);
    let qalys = |v: f64| format_number(v, 3);

    let mut out = String::new();

    for s in &summary.strategies {
        let _ = writeln!(out, "== {} ==", s.name);
        let _ = writeln!(
            out,
            "{} individuals over {} years: {} deaths, {} alive at horizon",
            s.population_size,
            format_number(s.horizon, 0),
            s.deaths,
            s.censored
        );
        let _ = writeln!(out, "Estimates with {level} confidence intervals:");
        let _ = writeln!(
            out,
            "  Survival time (years):        {}",
            s.survival_time.render(years)
        );
        if let Some(deaths) = &s.survival_time_among_deaths {
            let _ = writeln!(
                out,
                "  Survival among deaths:        {}",
                deaths.render(years)
            );
        }
        let _ = writeln!(
            out,
            "  Discounted cost:              {}",
            s.cost.render(format_currency)
        );
        let _ = writeln!(
            out,
            "  Discounted utility (QALYs):   {}",
            s.utility.render(qalys)
        );
        for event in &s.events {
            let _ = writeln!(
                out,
                "  Events '{}' per individual: {}",
                event.name,
                event.per_individual.render(qalys)
            );
        }
        if let Some(across) = &s.across_cohorts {
            let _ = writeln!(
                out,
                "Across {} cohorts, {level} prediction intervals:",
                across.cohorts
            );
            let _ = writeln!(
                out,
                "  Mean survival time (years):   {}",
                across.mean_survival_time.render(years)
            );
            let _ = writeln!(
                out,
                "  Mean discounted cost:         {}",
                across.mean_cost.render(format_currency_short)
            );
            let _ = writeln!(
                out,
                "  Mean discounted utility:      {}",
                across.mean_utility.render(qalys)
            );
        }
        out.push('\n');
    }

    if !summary.comparisons.is_empty() {
        let _ = writeln!(out, "== Comparative outcomes ==");
        for c in &summary.comparisons {
            let _ = writeln!(
                out,
                "{} vs {} ({level} {} interval):",
                c.strategy, c.baseline, c.interval
            );
            let _ = writeln!(
                out,
                "  Incremental survival (years): {}",
                c.survival_time.render(years)
            );
            let _ = writeln!(
                out,
                "  Incremental cost:             {}",
                c.cost.render(format_currency)
            );
            let _ = writeln!(
                out,
                "  Incremental utility (QALYs):  {}",
                c.utility.render(qalys)
            );
        }
        out.push('\n');
    }

    out.push_str(&render_survival_table(runs, survival_step));
    out.push('\n');

    for run in runs {
        out.push_str(&render_event_histograms(run));
    }

    out
}

/// Number alive at regular marks, one column per strategy
pub fn render_survival_table(runs: &[StrategyRun], step: f64) -> String {
    let mut out = String::new();
    let Some(first) = runs.first() else {
        return out;
    };

    let _ = writeln!(out, "== Number alive ==");
    let _ = write!(out, "{:>8}", "Year");
    for run in runs {
        let _ = write!(out, " {:>20}", run.strategy.name());
    }
    out.push('\n');

    for (t, _) in first.first_cohort().survival_curve.sample(step) {
        let _ = write!(out, "{:>8}", format_number(t, 1));
        for run in runs {
            let _ = write!(
                out,
                " {:>20}",
                run.first_cohort().survival_curve.alive_at(t)
            );
        }
        out.push('\n');
    }
    out
}

/// Distribution of per-individual counts of each tracked event
pub fn render_event_histograms(run: &StrategyRun) -> String {
    let cohort = run.first_cohort();
    let mut out = String::new();

    for (name, counts) in cohort.event_names.iter().zip(&cohort.event_counts) {
        let histogram = count_histogram(counts);
        let peak = histogram.iter().copied().max().unwrap_or(0);

        let _ = writeln!(out, "== {}: '{}' per individual ==", run.strategy.name(), name);
        for (k, &n) in histogram.iter().enumerate() {
            let width = if peak == 0 {
                0
            } else {
                (n * HISTOGRAM_WIDTH).div_ceil(peak)
            };
            let bar = "#".repeat(width);
            let _ = writeln!(out, "{k:>4} | {bar:<pad$} {n}", pad = HISTOGRAM_WIDTH);
        }
        out.push('\n');
    }
    out
}

/// `histogram[k]` = individuals with exactly `k` events
fn count_histogram(counts: &[u32]) -> Vec<usize> {
    let max = counts.iter().copied().max().unwrap_or(0) as usize;
    let mut histogram = vec![0; max + 1];
    for &c in counts {
        histogram[c as usize] += 1;
    }
    histogram
}

// =============================================================================
// JSON
// =============================================================================

pub fn write_json(path: &Path, runs: &[StrategyRun], alpha: f64) -> color_eyre::Result<()> {
    let summary = RunSummary::new(runs, alpha);
    let json = serde_json::to_string_pretty(&summary)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json).wrap_err_with(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote JSON summary");
    Ok(())
}
