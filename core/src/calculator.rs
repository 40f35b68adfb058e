//! Multi-marketplace price calculation.
//!
//! RULES:
//!   - Scalar inputs are validated once; a bad scalar rejects the whole
//!     call and no marketplace is priced.
//!   - Each commission entry is priced independently. A bad commission
//!     or an infeasible denominator only fails that entry.
//!   - Errors are returned as data, never panics.

use crate::{
    error::{InputError, QuoteError},
    marketplace::MarketplaceBook,
    solver::{solve, CostBasis, Solution},
    types::{round2, MarketplaceName, MIN_DENOMINATOR},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub product_cost:      f64,
    pub packaging_cost:    f64,
    pub target_margin_pct: f64,
    pub tax_pct:           f64,
    pub weight_g:          f64,
    /// Marketplace name -> commission percentage.
    pub commissions:       BTreeMap<MarketplaceName, f64>,
}

impl PricingInput {
    pub fn validate(&self) -> Result<(), InputError> {
        let scalars = [
            ("product_cost", self.product_cost),
            ("packaging_cost", self.packaging_cost),
            ("target_margin_pct", self.target_margin_pct),
            ("tax_pct", self.tax_pct),
            ("weight_g", self.weight_g),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(InputError::NonNumeric(field));
            }
        }
        for (field, value) in scalars {
            if value < 0.0 {
                return Err(InputError::Negative(field));
            }
        }
        // Each scalar can be finite while their sum or product is not.
        if !self.cost_base().is_finite() {
            return Err(InputError::NonNumeric("cost_base"));
        }
        if !self.target_profit().is_finite() {
            return Err(InputError::NonNumeric("target_profit"));
        }
        Ok(())
    }

    pub fn cost_base(&self) -> f64 {
        self.product_cost + self.packaging_cost
    }

    pub fn target_profit(&self) -> f64 {
        self.cost_base() * (self.target_margin_pct / 100.0)
    }
}

/// A priced marketplace, money values rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub sale_price:      f64,
    pub real_profit:     f64,
    pub real_margin_pct: f64,
    pub fixed_fee:       f64,
    pub shipping_cost:   f64,
    /// False when the solver stopped at its iteration cap.
    pub converged:       bool,
    pub iterations:      u32,
}

impl From<Solution> for Quote {
    fn from(s: Solution) -> Self {
        Self {
            sale_price:      round2(s.sale_price),
            real_profit:     round2(s.real_profit),
            real_margin_pct: round2(s.real_margin_pct),
            fixed_fee:       round2(s.fixed_fee),
            shipping_cost:   round2(s.shipping_cost),
            converged:       s.converged,
            iterations:      s.iterations,
        }
    }
}

pub type MarketplaceOutcome = Result<Quote, QuoteError>;

#[derive(Debug, Clone, PartialEq)]
pub enum PricingOutcome {
    /// A scalar input was unusable; nothing was priced.
    Rejected(InputError),
    /// One entry per commission, sorted by marketplace name.
    Priced(BTreeMap<MarketplaceName, MarketplaceOutcome>),
}

impl PricingOutcome {
    pub fn get(&self, marketplace: &str) -> Option<&MarketplaceOutcome> {
        match self {
            PricingOutcome::Priced(results) => results.get(marketplace),
            PricingOutcome::Rejected(_) => None,
        }
    }

    /// Sale price of the first marketplace (by name) that priced
    /// successfully. Used to fill a single "listing price" column.
    pub fn first_sale_price(&self) -> Option<f64> {
        match self {
            PricingOutcome::Priced(results) => results
                .values()
                .find_map(|r| r.as_ref().ok().map(|q| q.sale_price)),
            PricingOutcome::Rejected(_) => None,
        }
    }

    /// `{"error": ...}` for a rejected call, otherwise one object per
    /// marketplace holding either the quote fields or `{"error": ...}`.
    pub fn to_json(&self) -> Value {
        match self {
            PricingOutcome::Rejected(e) => json!({ "error": e.to_string() }),
            PricingOutcome::Priced(results) => {
                let map = results
                    .iter()
                    .map(|(name, outcome)| {
                        let value = match outcome {
                            Ok(quote) => json!(quote),
                            Err(e) => json!({ "error": e.to_string() }),
                        };
                        (name.clone(), value)
                    })
                    .collect::<serde_json::Map<_, _>>();
                Value::Object(map)
            }
        }
    }
}

/// Price one commission entry.
pub fn quote_marketplace(
    name: &str,
    commission_pct: f64,
    input: &PricingInput,
    book: &MarketplaceBook,
) -> MarketplaceOutcome {
    if !commission_pct.is_finite() || commission_pct < 0.0 {
        return Err(QuoteError::InvalidCommission { value: commission_pct });
    }

    let denominator = 1.0 - input.tax_pct / 100.0 - commission_pct / 100.0;
    if denominator <= MIN_DENOMINATOR {
        return Err(QuoteError::Infeasible { denominator });
    }

    let basis = CostBasis {
        cost_base: input.cost_base(),
        target_profit: input.target_profit(),
        denominator,
        weight_g: input.weight_g,
    };

    let solution = solve(&basis, book.rules_for(name));
    if !solution.sale_price.is_finite() || !solution.real_profit.is_finite() {
        return Err(QuoteError::Unpriceable { denominator });
    }
    Ok(solution.into())
}

/// Price every marketplace in `input.commissions` against `book`.
pub fn calculate_prices(input: &PricingInput, book: &MarketplaceBook) -> PricingOutcome {
    if let Err(e) = input.validate() {
        log::warn!("calculator: input rejected: {e}");
        return PricingOutcome::Rejected(e);
    }

    let results = input
        .commissions
        .iter()
        .map(|(name, &commission_pct)| {
            let outcome = quote_marketplace(name, commission_pct, input, book);
            match &outcome {
                Ok(q) => log::debug!(
                    "calculator: {name} price={:.2} profit={:.2} margin={:.2}% converged={}",
                    q.sale_price, q.real_profit, q.real_margin_pct, q.converged
                ),
                Err(e) => log::warn!("calculator: {name}: {e}"),
            }
            (name.clone(), outcome)
        })
        .collect();

    PricingOutcome::Priced(results)
}
