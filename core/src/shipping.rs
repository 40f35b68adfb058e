//! Shipping cost by sale-price threshold and weight tier.

use crate::fee_table::FeeTierTable;
use serde::{Deserialize, Serialize};

/// Price at which a marketplace starts charging shipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceThreshold {
    pub floor:     f64,
    /// When true a price equal to `floor` already pays shipping.
    pub inclusive: bool,
}

impl PriceThreshold {
    pub const fn above(floor: f64) -> Self {
        Self { floor, inclusive: false }
    }

    pub const fn at_or_above(floor: f64) -> Self {
        Self { floor, inclusive: true }
    }

    pub fn applies(&self, sale_price: f64) -> bool {
        if self.inclusive {
            sale_price >= self.floor
        } else {
            sale_price > self.floor
        }
    }
}

/// Shipping cost for one sale. Zero below the threshold, and zero when
/// no table (or a table without real tiers) is configured.
pub fn shipping_cost(
    threshold: PriceThreshold,
    sale_price: f64,
    weight_g: f64,
    table: Option<&FeeTierTable>,
) -> f64 {
    if !threshold.applies(sale_price) {
        return 0.0;
    }
    match table {
        Some(table) => table.prepare().cost_for(weight_g),
        None => 0.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShippingRule {
    pub threshold: PriceThreshold,
    pub table:     Option<FeeTierTable>,
}

impl ShippingRule {
    pub fn new(threshold: PriceThreshold, table: Option<FeeTierTable>) -> Self {
        Self { threshold, table }
    }

    pub fn cost(&self, sale_price: f64, weight_g: f64) -> f64 {
        shipping_cost(self.threshold, sale_price, weight_g, self.table.as_ref())
    }
}
