//! Step-function lookup shared by fixed-fee price bands and shipping
//! weight tiers.
//!
//! RULE: a key sitting exactly on a band's upper bound belongs to that
//! band (`<=`), never to the next one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub upper: f64,
    pub value: f64,
}

impl Band {
    pub const fn new(upper: f64, value: f64) -> Self {
        Self { upper, value }
    }
}

/// Sort bands ascending by upper bound, in place.
pub fn sort_bands(bands: &mut [Band]) {
    bands.sort_by(|a, b| a.upper.total_cmp(&b.upper));
}

/// First band whose upper bound is >= `key`, or None when `key` is above
/// every band. `bands` must already be ascending.
pub fn bucket_lookup(bands: &[Band], key: f64) -> Option<&Band> {
    bands.iter().find(|band| key <= band.upper)
}
