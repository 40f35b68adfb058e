//! Decoding loosely-typed requests into validated inputs.

use pricer_core::{
    calculator::calculate_prices,
    error::{InputError, QuoteError},
    marketplace::{default_commissions, MarketplaceBook, SHEIN, SHOPEE},
    request::PricingRequest,
};
use serde_json::json;

fn decode(value: serde_json::Value) -> PricingRequest {
    serde_json::from_value(value).unwrap()
}

#[test]
fn complete_request_uses_given_commissions() {
    let req = decode(json!({
        "product_cost": 100,
        "packaging_cost": 0,
        "target_margin_pct": 30,
        "tax_pct": 7,
        "weight_g": 250,
        "commissions": { "Shopee": 20 }
    }));
    let input = req.into_input(&default_commissions()).unwrap();
    assert_eq!(input.commissions.len(), 1);
    assert_eq!(input.product_cost, 100.0);

    let outcome = calculate_prices(&input, &MarketplaceBook::builtin());
    assert_eq!(outcome.get(SHOPEE).unwrap().as_ref().unwrap().sale_price, 178.08);
}

#[test]
fn absent_commissions_fall_back_to_defaults() {
    let req = decode(json!({
        "product_cost": 10, "packaging_cost": 1, "target_margin_pct": 20,
        "tax_pct": 5, "weight_g": 100
    }));
    let input = req.into_input(&default_commissions()).unwrap();
    assert_eq!(input.commissions, default_commissions());
}

#[test]
fn null_or_missing_scalar_is_missing() {
    let req = decode(json!({
        "product_cost": null, "packaging_cost": 1, "target_margin_pct": 20,
        "tax_pct": 5, "weight_g": 100
    }));
    assert_eq!(
        req.into_input(&default_commissions()).unwrap_err(),
        InputError::Missing("product_cost")
    );

    let req = decode(json!({
        "product_cost": 10, "packaging_cost": 1, "target_margin_pct": 20, "tax_pct": 5
    }));
    assert_eq!(
        req.into_input(&default_commissions()).unwrap_err(),
        InputError::Missing("weight_g")
    );
}

#[test]
fn text_scalar_is_non_numeric() {
    let req = decode(json!({
        "product_cost": 10, "packaging_cost": "1,50", "target_margin_pct": 20,
        "tax_pct": 5, "weight_g": 100
    }));
    assert_eq!(
        req.into_input(&default_commissions()).unwrap_err(),
        InputError::NonNumeric("packaging_cost")
    );
}

#[test]
fn text_commission_fails_only_its_marketplace() {
    let req = decode(json!({
        "product_cost": 10, "packaging_cost": 0, "target_margin_pct": 20,
        "tax_pct": 5, "weight_g": 100,
        "commissions": { "Shopee": "twenty", "Shein": 16 }
    }));
    let input = req.into_input(&default_commissions()).unwrap();
    let outcome = calculate_prices(&input, &MarketplaceBook::builtin());

    assert!(matches!(
        outcome.get(SHOPEE),
        Some(Err(QuoteError::InvalidCommission { .. }))
    ));
    assert!(outcome.get(SHEIN).unwrap().is_ok());
}
