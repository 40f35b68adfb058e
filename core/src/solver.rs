//! Sale-price solver for a single marketplace.
//!
//! Fixed fee and shipping are step functions of the sale price, so the
//! price that covers them cannot be written in closed form. The solver
//! iterates `p' = (cost + profit + fee(p) + shipping(p)) / denominator`
//! from the fee-free estimate until two estimates agree within
//! CONVERGENCE_TOLERANCE, or MAX_ITERATIONS is hit.
//!
//! Hitting the cap is not an error: the last estimate is used and the
//! solution is flagged `converged: false`.

use crate::types::MIN_COST_BASE;

pub const MAX_ITERATIONS: u32 = 20;
pub const CONVERGENCE_TOLERANCE: f64 = 0.001;

/// The price-dependent part of a marketplace's charges.
pub trait FeeModel {
    fn fixed_fee(&self, sale_price: f64) -> f64;

    fn shipping_cost(&self, sale_price: f64, weight_g: f64) -> f64;

    /// False for commission-only marketplaces, which skip iteration.
    fn is_price_dependent(&self) -> bool;
}

/// Everything about one product/marketplace pair the solver needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBasis {
    /// Product cost + packaging cost.
    pub cost_base:     f64,
    pub target_profit: f64,
    /// 1 - tax fraction - commission fraction. Must be > MIN_DENOMINATOR.
    pub denominator:   f64,
    pub weight_g:      f64,
}

impl CostBasis {
    fn cost_plus_profit(&self) -> f64 {
        self.cost_base + self.target_profit
    }

    fn margin_pct(&self, profit: f64) -> f64 {
        if self.cost_base > MIN_COST_BASE {
            profit / self.cost_base * 100.0
        } else {
            0.0
        }
    }
}

/// Unrounded solver output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub sale_price:      f64,
    pub fixed_fee:       f64,
    pub shipping_cost:   f64,
    pub real_profit:     f64,
    pub real_margin_pct: f64,
    pub converged:       bool,
    pub iterations:      u32,
}

/// Commission-only pricing: one division, no iteration.
pub fn solve_flat(basis: &CostBasis) -> Solution {
    let sale_price = basis.cost_plus_profit() / basis.denominator;
    let real_profit = sale_price * basis.denominator - basis.cost_base;
    Solution {
        sale_price,
        fixed_fee: 0.0,
        shipping_cost: 0.0,
        real_profit,
        real_margin_pct: basis.margin_pct(real_profit),
        converged: true,
        iterations: 0,
    }
}

/// Fixed-point iteration against `fees`.
pub fn solve_iterative<F: FeeModel + ?Sized>(basis: &CostBasis, fees: &F) -> Solution {
    let mut estimate = basis.cost_plus_profit() / basis.denominator;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let fee = fees.fixed_fee(estimate);
        let shipping = fees.shipping_cost(estimate, basis.weight_g);
        let next = (basis.cost_plus_profit() + fee + shipping) / basis.denominator;
        log::debug!(
            "solver: iter={iterations} price={estimate:.4} fee={fee:.2} shipping={shipping:.2} -> {next:.4}"
        );
        let delta = (next - estimate).abs();
        estimate = next;
        if delta < CONVERGENCE_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "solver: no convergence after {MAX_ITERATIONS} iterations (cost_base={:.2}), using last estimate {estimate:.4}",
            basis.cost_base
        );
    }

    // Fees are re-evaluated at the adopted price so profit is consistent
    // with what the marketplace will actually charge.
    let fixed_fee = fees.fixed_fee(estimate);
    let shipping_cost = fees.shipping_cost(estimate, basis.weight_g);
    let real_profit = estimate * basis.denominator - fixed_fee - shipping_cost - basis.cost_base;

    Solution {
        sale_price: estimate,
        fixed_fee,
        shipping_cost,
        real_profit,
        real_margin_pct: basis.margin_pct(real_profit),
        converged,
        iterations,
    }
}

/// Dispatch on whether the marketplace has price-dependent fees.
pub fn solve<F: FeeModel + ?Sized>(basis: &CostBasis, fees: Option<&F>) -> Solution {
    match fees {
        Some(fees) if fees.is_price_dependent() => solve_iterative(basis, fees),
        _ => solve_flat(basis),
    }
}
