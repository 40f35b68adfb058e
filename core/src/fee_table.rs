//! Weight-tiered shipping tables.
//!
//! A table is an unordered list of (weight ceiling, cost) rules. One rule
//! may carry the sentinel ceiling -1: its cost is charged per extra
//! 1000 g beyond the heaviest real tier. Tables are sorted on a local
//! copy before every use; caller order is never trusted.

use crate::bands::{bucket_lookup, sort_bands, Band};
use serde::{Deserialize, Serialize};

/// Ceiling value marking the extra-unit rule.
pub const EXTRA_UNIT_SENTINEL: f64 = -1.0;

/// Per-extra-unit cost when a table has no sentinel rule.
pub const DEFAULT_EXTRA_UNIT_COST: f64 = 3.50;

/// Weight of one extra unit, in grams.
pub const EXTRA_UNIT_GRAMS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeTierRule {
    pub weight_ceiling_g: f64,
    pub cost:             f64,
}

impl FeeTierRule {
    pub const fn new(weight_ceiling_g: f64, cost: f64) -> Self {
        Self { weight_ceiling_g, cost }
    }

    pub const fn extra_unit(cost: f64) -> Self {
        Self { weight_ceiling_g: EXTRA_UNIT_SENTINEL, cost }
    }

    pub fn is_extra_unit(&self) -> bool {
        self.weight_ceiling_g == EXTRA_UNIT_SENTINEL
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTierTable {
    rules: Vec<FeeTierRule>,
}

impl FeeTierTable {
    pub fn new(rules: Vec<FeeTierRule>) -> Self {
        Self { rules }
    }

    /// Rules in the order the caller supplied them.
    pub fn rules(&self) -> &[FeeTierRule] {
        &self.rules
    }

    /// Structural checks for tables coming from an editor or a file.
    /// The lookup itself tolerates anything; this is for callers that
    /// want to refuse bad input before storing it.
    pub fn validate(&self) -> Result<(), String> {
        let mut sentinels = 0;
        for rule in &self.rules {
            if !rule.weight_ceiling_g.is_finite() || !rule.cost.is_finite() {
                return Err(format!(
                    "non-numeric rule ({}, {})",
                    rule.weight_ceiling_g, rule.cost
                ));
            }
            if rule.cost < 0.0 {
                return Err(format!("negative cost {:.2}", rule.cost));
            }
            if rule.is_extra_unit() {
                sentinels += 1;
            } else if rule.weight_ceiling_g < 0.0 {
                return Err(format!("negative weight ceiling {}", rule.weight_ceiling_g));
            }
        }
        if sentinels > 1 {
            return Err(format!("{sentinels} extra-unit rules, at most one allowed"));
        }
        Ok(())
    }

    /// Sorted copy of the real tiers plus the resolved extra-unit cost.
    pub fn prepare(&self) -> PreparedTiers {
        let extra_unit_cost = self
            .rules
            .iter()
            .find(|r| r.is_extra_unit())
            .map(|r| r.cost)
            .unwrap_or(DEFAULT_EXTRA_UNIT_COST);

        let mut tiers: Vec<Band> = self
            .rules
            .iter()
            .filter(|r| !r.is_extra_unit())
            .map(|r| Band::new(r.weight_ceiling_g, r.cost))
            .collect();
        sort_bands(&mut tiers);

        PreparedTiers { tiers, extra_unit_cost }
    }
}

/// A table ready for lookups: real tiers ascending, sentinel resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTiers {
    tiers:           Vec<Band>,
    extra_unit_cost: f64,
}

impl PreparedTiers {
    pub fn extra_unit_cost(&self) -> f64 {
        self.extra_unit_cost
    }

    /// Cost for a parcel of `weight_g`. Beyond the heaviest tier every
    /// started 1000 g counts as a whole extra unit. A table with no real
    /// tiers costs nothing.
    pub fn cost_for(&self, weight_g: f64) -> f64 {
        if let Some(tier) = bucket_lookup(&self.tiers, weight_g) {
            return tier.value;
        }
        let Some(last) = self.tiers.last() else {
            return 0.0;
        };
        let extra_units = ((weight_g - last.upper) / EXTRA_UNIT_GRAMS).ceil();
        let cost = last.value + extra_units * self.extra_unit_cost;
        log::debug!(
            "shipping: {weight_g}g exceeds last tier ({}g), {extra_units} extra unit(s) -> {cost:.2}",
            last.upper
        );
        cost
    }
}
