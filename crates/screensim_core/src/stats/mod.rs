//! Outcome statistics: summaries with uncertainty intervals, differences
//! between strategies, and the population survival curve.

mod summary;
mod survival;

pub use summary::{DifferenceStat, Interval, IntervalKind, SummaryStat};
pub use survival::SurvivalCurve;
