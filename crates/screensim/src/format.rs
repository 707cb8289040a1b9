//! Number formatting for text reports

use screensim_core::stats::Interval;

/// Group the integer part of `value` with thousands separators
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let abs_value = value.abs();
    let mut dollars = abs_value.trunc() as u64;
    let mut cents = ((abs_value - dollars as f64) * 100.0).round() as u64;
    if cents == 100 {
        dollars += 1;
        cents = 0;
    }

    let sign = if value < 0.0 && (dollars > 0 || cents > 0) {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{cents:02}", group_thousands(dollars))
}

/// Format a currency value without cents (shorter format for tight columns)
pub fn format_currency_short(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

/// Format a plain number with a fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "n/a".to_string()
    }
}

/// Format an estimate as `mean (lower, upper)`
pub fn format_estimate(
    mean: f64,
    interval: Interval,
    formatter: impl Fn(f64) -> String,
) -> String {
    format!(
        "{} ({}, {})",
        formatter(mean),
        formatter(interval.lower),
        formatter(interval.upper)
    )
}

/// Format a percentage value
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-1_000_000.004), "-$1,000,000.00");
        assert_eq!(format_currency(9.999), "$10.00");
        assert_eq!(format_currency(f64::NAN), "n/a");
    }

    #[test]
    fn test_format_currency_short() {
        assert_eq!(format_currency_short(12_345.6), "$12,346");
        assert_eq!(format_currency_short(-999.4), "-$999");
        assert_eq!(format_currency_short(-0.2), "$0");
    }

    #[test]
    fn test_format_estimate() {
        let interval = Interval {
            lower: 9.5,
            upper: 10.25,
        };
        assert_eq!(
            format_estimate(9.876, interval, |v| format_number(v, 2)),
            "9.88 (9.50, 10.25)"
        );
        assert_eq!(
            format_estimate(1500.0, interval, format_currency_short),
            "$1,500 ($10, $10)"
        );
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0067), "0.7%");
        assert_eq!(format_number(f64::INFINITY, 1), "n/a");
    }
}
