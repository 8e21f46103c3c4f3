use crate::config::SolverConfig;
use log::debug;

/// Net present value of `cash_flows` at `rate`, discounting element `k`
/// by `(1 + rate)^k`.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    let mut discount = 1.0;
    let mut total = 0.0;
    for cf in cash_flows {
        total += cf / discount;
        discount *= base;
    }
    total
}

/// First derivative of [`npv`] with respect to the rate.
fn npv_derivative(rate: f64, cash_flows: &[f64]) -> f64 {
    let base = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, cf)| -(k as f64) * cf / base.powi(k as i32 + 1))
        .sum()
}

/// Finds the internal rate of return of a yearly cash-flow series.
///
/// Newton-Raphson from the configured guess, falling back to bisection
/// over `[lower_bound, upper_bound]` when Newton leaves the domain,
/// stalls on a flat derivative or exhausts its budget. A rate is only
/// returned when `|NPV|` at that rate is within `tolerance` times the
/// sum of absolute cash flows.
///
/// # Examples
///
/// ```
/// use pv_irr_engine::irr::solver::IrrSolver;
///
/// let solver = IrrSolver::default();
/// let irr = solver.solve(&[-100.0, 110.0]).unwrap();
/// assert!((irr - 0.10).abs() < 1e-9);
///
/// // No sign change: no rate can zero the NPV.
/// assert_eq!(solver.solve(&[0.0, 1000.0, 1000.0]), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IrrSolver {
    config: SolverConfig,
}

impl IrrSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve for the rate zeroing the NPV of `cash_flows`.
    ///
    /// Returns `None` for fewer than two flows, non-finite input, a
    /// series without both a positive and a negative flow, or when no
    /// root is found within the iteration budget.
    pub fn solve(&self, cash_flows: &[f64]) -> Option<f64> {
        if cash_flows.len() < 2 || cash_flows.iter().any(|cf| !cf.is_finite()) {
            return None;
        }
        let has_positive = cash_flows.iter().any(|&cf| cf > 0.0);
        let has_negative = cash_flows.iter().any(|&cf| cf < 0.0);
        if !(has_positive && has_negative) {
            return None;
        }

        let scale = cash_flows.iter().map(|cf| cf.abs()).sum::<f64>().max(1.0);
        let accept = |rate: f64| {
            let value = npv(rate, cash_flows);
            value.is_finite() && value.abs() <= self.config.tolerance * scale
        };

        if let Some(rate) = self.newton(cash_flows).filter(|&r| accept(r)) {
            return Some(rate);
        }
        debug!("newton did not converge, falling back to bisection");
        self.bisect(cash_flows).filter(|&r| accept(r))
    }

    fn newton(&self, cash_flows: &[f64]) -> Option<f64> {
        let mut rate = self.config.initial_guess;
        for _ in 0..self.config.max_iterations {
            let value = npv(rate, cash_flows);
            let slope = npv_derivative(rate, cash_flows);
            if !value.is_finite() || !slope.is_finite() || slope == 0.0 {
                return None;
            }
            let next = rate - value / slope;
            if !next.is_finite() || next <= -1.0 {
                return None;
            }
            if (next - rate).abs() < 1e-12 * (1.0 + rate.abs()) {
                return Some(next);
            }
            rate = next;
        }
        None
    }

    /// Bisection over the first sign-changing subinterval of the
    /// configured bounds, scanned from the lowest rate upwards.
    fn bisect(&self, cash_flows: &[f64]) -> Option<f64> {
        const SCAN_STEPS: u32 = 400;

        let SolverConfig {
            lower_bound,
            upper_bound,
            ..
        } = self.config;
        let step = (upper_bound - lower_bound) / f64::from(SCAN_STEPS);

        let mut lo = lower_bound;
        let mut f_lo = npv(lo, cash_flows);
        let mut bracket = None;
        for i in 1..=SCAN_STEPS {
            let hi = lower_bound + step * f64::from(i);
            let f_hi = npv(hi, cash_flows);
            if f_lo == 0.0 {
                return Some(lo);
            }
            if f_lo.is_finite() && f_hi.is_finite() && f_lo.signum() != f_hi.signum() {
                bracket = Some((lo, f_lo, hi));
                break;
            }
            lo = hi;
            f_lo = f_hi;
        }

        let (mut lo, mut f_lo, mut hi) = bracket?;
        for _ in 0..self.config.max_iterations {
            let mid = 0.5 * (lo + hi);
            let f_mid = npv(mid, cash_flows);
            if f_mid == 0.0 || (hi - lo) < f64::EPSILON * (1.0 + mid.abs()) {
                return Some(mid);
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        Some(0.5 * (lo + hi))
    }
}

/// Solve with the default [`SolverConfig`].
pub fn solve_irr(cash_flows: &[f64]) -> Option<f64> {
    IrrSolver::default().solve(cash_flows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_period() {
        let irr = solve_irr(&[-1000.0, 1100.0]).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_level_annuity() {
        // 5-year annuity of 250 on 1000 yields ~7.93%
        let flows = [-1000.0, 250.0, 250.0, 250.0, 250.0, 250.0];
        let irr = solve_irr(&flows).unwrap();
        assert_relative_eq!(irr, 0.079_308, epsilon = 1e-5);
        assert!(npv(irr, &flows).abs() < 1e-6);
    }

    #[test]
    fn test_negative_rate() {
        let flows = [-1000.0, 300.0, 300.0, 300.0];
        let irr = solve_irr(&flows).unwrap();
        assert!(irr < 0.0);
        assert!(npv(irr, &flows).abs() < 1e-6);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(solve_irr(&[0.0, 1000.0, 1000.0]), None);
        assert_eq!(solve_irr(&[-10.0, -20.0]), None);
        assert_eq!(solve_irr(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_too_short() {
        assert_eq!(solve_irr(&[]), None);
        assert_eq!(solve_irr(&[-100.0]), None);
    }

    #[test]
    fn test_non_finite_input() {
        assert_eq!(solve_irr(&[-100.0, f64::NAN]), None);
        assert_eq!(solve_irr(&[-100.0, f64::INFINITY]), None);
    }

    #[test]
    fn test_bisection_fallback() {
        // A guess far from the root with a tiny iteration budget forces
        // the bisection path.
        let solver = IrrSolver::new(SolverConfig {
            initial_guess: 9.0,
            max_iterations: 3,
            ..SolverConfig::default()
        });
        let flows = [-1000.0, 250.0, 250.0, 250.0, 250.0, 250.0];
        assert_eq!(solver.solve(&flows), None);

        let solver = IrrSolver::new(SolverConfig {
            initial_guess: 9.0,
            ..SolverConfig::default()
        });
        let irr = solver.solve(&flows).unwrap();
        assert_relative_eq!(irr, 0.079_308, epsilon = 1e-5);
    }

    #[test]
    fn test_root_outside_bounds() {
        // True IRR is 1900%, above the default 1000% ceiling.
        let flows = [-1.0, 20.0];
        let solver = IrrSolver::new(SolverConfig {
            initial_guess: 0.1,
            max_iterations: 5,
            ..SolverConfig::default()
        });
        assert_eq!(solver.solve(&flows), None);
    }

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        assert_relative_eq!(npv(0.0, &[-100.0, 30.0, 80.0]), 10.0);
    }
}
