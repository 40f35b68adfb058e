//! Loosely-typed pricing requests, as they arrive from spreadsheets,
//! forms or the IPC loop.
//!
//! Scalars may be absent, null or non-numeric; those become a global
//! `InputError`. Commission values that are not numbers are carried
//! through as NaN so that only their own marketplace fails.

use crate::{calculator::PricingInput, error::InputError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub product_cost:      Value,
    #[serde(default)]
    pub packaging_cost:    Value,
    #[serde(default)]
    pub target_margin_pct: Value,
    #[serde(default)]
    pub tax_pct:           Value,
    #[serde(default)]
    pub weight_g:          Value,
    /// None means "use the caller's default commissions".
    #[serde(default)]
    pub commissions:       Option<BTreeMap<String, Value>>,
}

impl PricingRequest {
    pub fn into_input(
        self,
        default_commissions: &BTreeMap<String, f64>,
    ) -> Result<PricingInput, InputError> {
        let commissions = match self.commissions {
            Some(map) => map
                .into_iter()
                .map(|(name, v)| (name, v.as_f64().unwrap_or(f64::NAN)))
                .collect(),
            None => default_commissions.clone(),
        };

        Ok(PricingInput {
            product_cost:      scalar("product_cost", &self.product_cost)?,
            packaging_cost:    scalar("packaging_cost", &self.packaging_cost)?,
            target_margin_pct: scalar("target_margin_pct", &self.target_margin_pct)?,
            tax_pct:           scalar("tax_pct", &self.tax_pct)?,
            weight_g:          scalar("weight_g", &self.weight_g)?,
            commissions,
        })
    }
}

fn scalar(field: &'static str, value: &Value) -> Result<f64, InputError> {
    match value {
        Value::Null => Err(InputError::Missing(field)),
        other => other.as_f64().ok_or(InputError::NonNumeric(field)),
    }
}
