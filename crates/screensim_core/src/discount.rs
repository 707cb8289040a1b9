//! Continuous-time discounting of reward streams.

/// Present value of a constant payment rate over `[t0, t1)` under continuous
/// compounding at `rate`.
///
/// `payment * (e^(-r*t0) - e^(-r*t1)) / r`, which reduces exactly to
/// `payment * (t1 - t0)` when `rate == 0`.
#[inline]
pub fn pv_continuous_payment(payment: f64, rate: f64, t0: f64, t1: f64) -> f64 {
    if rate == 0.0 {
        return payment * (t1 - t0);
    }
    // e^(-r*t0) * (1 - e^(-r*(t1-t0))), written with expm1 to keep
    // precision for small r*(t1-t0)
    payment * (-rate * t0).exp() * -(-rate * (t1 - t0)).exp_m1() / rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_exact() {
        assert_eq!(pv_continuous_payment(100.0, 0.0, 2.5, 7.25), 100.0 * (7.25 - 2.5));
        assert_eq!(pv_continuous_payment(0.75, 0.0, 0.0, 10.0), 7.5);
    }

    #[test]
    fn test_matches_closed_form() {
        let (p, r, t0, t1): (f64, f64, f64, f64) = (1000.0, 0.03, 1.0, 4.0);
        let expected = p * ((-r * t0).exp() - (-r * t1).exp()) / r;
        let actual = pv_continuous_payment(p, r, t0, t1);
        assert!((actual - expected).abs() < 1e-9, "{actual} vs {expected}");
    }

    #[test]
    fn test_small_rate_approaches_undiscounted() {
        let pv = pv_continuous_payment(50.0, 1e-12, 0.0, 3.0);
        assert!((pv - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_intervals_are_additive() {
        let whole = pv_continuous_payment(10.0, 0.05, 0.0, 6.0);
        let split =
            pv_continuous_payment(10.0, 0.05, 0.0, 2.0) + pv_continuous_payment(10.0, 0.05, 2.0, 6.0);
        assert!((whole - split).abs() < 1e-9);
    }

    #[test]
    fn test_empty_interval_is_zero() {
        assert_eq!(pv_continuous_payment(10.0, 0.03, 5.0, 5.0), 0.0);
    }
}
