//! Fixed per-sale fee charged by price band.
//!
//! Above the top band the fixed fee no longer applies and the
//! marketplace charges shipping instead.

use crate::bands::{bucket_lookup, sort_bands, Band};

#[derive(Debug, Clone, PartialEq)]
pub struct FixedFeeSchedule {
    bands: Vec<Band>,
}

impl FixedFeeSchedule {
    /// Build a schedule from `(upper_bound, fee)` bands in any order.
    pub fn new(mut bands: Vec<Band>) -> Self {
        sort_bands(&mut bands);
        Self { bands }
    }

    /// Fee for a sale at `sale_price`; 0 above every band.
    pub fn fee(&self, sale_price: f64) -> f64 {
        bucket_lookup(&self.bands, sale_price)
            .map(|band| band.value)
            .unwrap_or(0.0)
    }

    pub fn mercado_livre() -> Self {
        Self::new(vec![
            Band::new(29.00, 3.00),
            Band::new(50.00, 3.50),
            Band::new(79.00, 4.00),
        ])
    }

    pub fn amazon() -> Self {
        Self::new(vec![
            Band::new(30.00, 4.50),
            Band::new(78.99, 8.00),
        ])
    }
}
