//! Shared primitive types and numeric constants used across the engine.

/// Marketplace display name, e.g. "Mercado Livre".
pub type MarketplaceName = String;

/// Denominators at or below this are treated as collapsed.
pub const MIN_DENOMINATOR: f64 = 1e-6;

/// Cost bases at or below this report a 0% margin.
pub const MIN_COST_BASE: f64 = 1e-6;

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
