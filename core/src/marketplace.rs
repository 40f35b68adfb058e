//! Per-marketplace fee rules and the book that holds them.
//!
//! The book is a plain value owned by the caller. Editing a tier table
//! means building a new book (or mutating your own copy); the engine
//! never keeps configuration between calls.

use crate::{
    fee_table::{FeeTierRule, FeeTierTable},
    fixed_fee::FixedFeeSchedule,
    shipping::{PriceThreshold, ShippingRule},
    solver::FeeModel,
};
use std::collections::BTreeMap;

pub const MERCADO_LIVRE: &str = "Mercado Livre";
pub const AMAZON: &str = "Amazon";
pub const SHOPEE: &str = "Shopee";
pub const SHEIN: &str = "Shein";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketplaceRules {
    pub fixed_fee: Option<FixedFeeSchedule>,
    pub shipping:  Option<ShippingRule>,
}

impl MarketplaceRules {
    pub fn tier_table(&self) -> Option<&FeeTierTable> {
        self.shipping.as_ref().and_then(|s| s.table.as_ref())
    }
}

impl FeeModel for MarketplaceRules {
    fn fixed_fee(&self, sale_price: f64) -> f64 {
        self.fixed_fee
            .as_ref()
            .map(|schedule| schedule.fee(sale_price))
            .unwrap_or(0.0)
    }

    fn shipping_cost(&self, sale_price: f64, weight_g: f64) -> f64 {
        self.shipping
            .as_ref()
            .map(|rule| rule.cost(sale_price, weight_g))
            .unwrap_or(0.0)
    }

    fn is_price_dependent(&self) -> bool {
        self.fixed_fee.is_some() || self.shipping.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketplaceBook {
    rules: BTreeMap<String, MarketplaceRules>,
}

impl MarketplaceBook {
    /// Mercado Livre and Amazon with their default shipping tables.
    /// Every other marketplace is commission-only.
    pub fn builtin() -> Self {
        let mut book = Self::default();
        for name in [MERCADO_LIVRE, AMAZON] {
            if let Some(rules) = builtin_rules(name) {
                book.insert(name, rules);
            }
        }
        book
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: MarketplaceRules) {
        self.rules.insert(name.into(), rules);
    }

    /// Rules for `name`, or None for a commission-only marketplace.
    pub fn rules_for(&self, name: &str) -> Option<&MarketplaceRules> {
        self.rules.get(name)
    }

    pub fn tier_table(&self, name: &str) -> Option<&FeeTierTable> {
        self.rules.get(name).and_then(MarketplaceRules::tier_table)
    }

    /// Replace one marketplace's shipping table. Returns false when the
    /// marketplace has no shipping rule to attach a table to.
    pub fn set_tier_table(&mut self, name: &str, table: FeeTierTable) -> bool {
        match self.rules.get_mut(name).and_then(|r| r.shipping.as_mut()) {
            Some(shipping) => {
                shipping.table = Some(table);
                true
            }
            None => {
                log::warn!("book: {name} has no shipping rule, tier table ignored");
                false
            }
        }
    }

    pub fn with_tier_table(mut self, name: &str, table: FeeTierTable) -> Self {
        self.set_tier_table(name, table);
        self
    }

    /// Drop the shipping table entirely; shipping then costs nothing.
    pub fn clear_tier_table(&mut self, name: &str) -> bool {
        match self.rules.get_mut(name).and_then(|r| r.shipping.as_mut()) {
            Some(shipping) => {
                shipping.table = None;
                true
            }
            None => false,
        }
    }

    /// Restore the built-in table for `name`. Returns false for
    /// marketplaces without a built-in table.
    pub fn reset_tier_table(&mut self, name: &str) -> bool {
        match default_tier_table(name) {
            Some(table) => self.set_tier_table(name, table),
            None => false,
        }
    }
}

fn builtin_rules(name: &str) -> Option<MarketplaceRules> {
    let (fixed_fee, threshold) = match name {
        MERCADO_LIVRE => (FixedFeeSchedule::mercado_livre(), PriceThreshold::above(79.00)),
        AMAZON        => (FixedFeeSchedule::amazon(), PriceThreshold::at_or_above(79.00)),
        _ => return None,
    };
    Some(MarketplaceRules {
        fixed_fee: Some(fixed_fee),
        shipping:  Some(ShippingRule::new(threshold, default_tier_table(name))),
    })
}

/// Built-in shipping table for `name`, if it has one.
pub fn default_tier_table(name: &str) -> Option<FeeTierTable> {
    let rules = match name {
        MERCADO_LIVRE => vec![
            FeeTierRule::new(300.0, 19.95),
            FeeTierRule::new(500.0, 21.45),
            FeeTierRule::new(1000.0, 22.45),
            FeeTierRule::new(2000.0, 23.45),
            FeeTierRule::new(3000.0, 24.95),
            FeeTierRule::new(4000.0, 26.95),
            FeeTierRule::new(5000.0, 28.45),
        ],
        AMAZON => vec![
            FeeTierRule::new(249.0, 15.94),
            FeeTierRule::new(499.0, 16.94),
            FeeTierRule::new(999.0, 17.94),
            FeeTierRule::new(1990.0, 18.44),
            FeeTierRule::new(2990.0, 21.69),
            FeeTierRule::new(3990.0, 22.94),
            FeeTierRule::new(4990.0, 28.44),
            FeeTierRule::new(5990.0, 31.30),
            FeeTierRule::new(6990.0, 33.13),
            FeeTierRule::new(7990.0, 33.94),
            FeeTierRule::new(8990.0, 40.29),
            FeeTierRule::new(9990.0, 46.65),
            FeeTierRule::extra_unit(3.50),
        ],
        _ => return None,
    };
    Some(FeeTierTable::new(rules))
}

/// Commission percentages the calculator starts from.
pub fn default_commissions() -> BTreeMap<String, f64> {
    [
        (SHOPEE, 20.0),
        (SHEIN, 16.0),
        (MERCADO_LIVRE, 17.0),
        (AMAZON, 15.0),
    ]
    .into_iter()
    .map(|(name, pct)| (name.to_string(), pct))
    .collect()
}
