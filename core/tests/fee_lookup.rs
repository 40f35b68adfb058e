//! Fixed-fee bands and shipping tier lookups.

use pricer_core::{
    fee_table::{FeeTierRule, FeeTierTable, DEFAULT_EXTRA_UNIT_COST},
    fixed_fee::FixedFeeSchedule,
    marketplace::{default_tier_table, AMAZON, MERCADO_LIVRE},
    shipping::{shipping_cost, PriceThreshold},
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn mercado_livre_fixed_fee_band_edges() {
    let ml = FixedFeeSchedule::mercado_livre();
    for price in [0.0, 10.0, 28.99, 29.00] {
        assert_eq!(ml.fee(price), 3.00, "price {price} should pay 3.00");
    }
    assert_eq!(ml.fee(29.01), 3.50);
    assert_eq!(ml.fee(50.00), 3.50);
    assert_eq!(ml.fee(50.01), 4.00);
    assert_eq!(ml.fee(79.00), 4.00);
    assert_eq!(ml.fee(79.01), 0.00, "above the top band the fixed fee stops");
}

#[test]
fn amazon_fixed_fee_band_edges() {
    let amazon = FixedFeeSchedule::amazon();
    assert_eq!(amazon.fee(30.00), 4.50);
    assert_eq!(amazon.fee(30.01), 8.00);
    assert_eq!(amazon.fee(78.99), 8.00);
    assert_eq!(amazon.fee(79.00), 0.00);
}

#[test]
fn shipping_threshold_inclusiveness_differs_per_marketplace() {
    let ml_table = default_tier_table(MERCADO_LIVRE).unwrap();
    let amazon_table = default_tier_table(AMAZON).unwrap();

    // Mercado Livre only charges strictly above 79.
    assert_eq!(shipping_cost(PriceThreshold::above(79.0), 79.00, 300.0, Some(&ml_table)), 0.0);
    assert_eq!(shipping_cost(PriceThreshold::above(79.0), 79.01, 300.0, Some(&ml_table)), 19.95);

    // Amazon already charges at 79.
    assert_eq!(shipping_cost(PriceThreshold::at_or_above(79.0), 78.99, 249.0, Some(&amazon_table)), 0.0);
    assert_eq!(shipping_cost(PriceThreshold::at_or_above(79.0), 79.00, 249.0, Some(&amazon_table)), 15.94);
}

#[test]
fn weight_on_ceiling_uses_that_tier() {
    let table = default_tier_table(MERCADO_LIVRE).unwrap().prepare();
    assert_eq!(table.cost_for(300.0), 19.95);
    assert_eq!(table.cost_for(300.5), 21.45);
    assert_eq!(table.cost_for(5000.0), 28.45);
    assert_eq!(table.cost_for(0.0), 19.95);
}

#[test]
fn extrapolation_rounds_partial_units_up() {
    let amazon = default_tier_table(AMAZON).unwrap().prepare();
    assert_eq!(amazon.extra_unit_cost(), 3.50);
    assert!(close(amazon.cost_for(9990.0), 46.65));
    assert!(close(amazon.cost_for(10_990.0), 50.15), "one whole extra unit");
    assert!(close(amazon.cost_for(10_991.0), 53.65), "1001 g over counts as two units");
    assert!(close(amazon.cost_for(12_000.0), 57.15));
}

#[test]
fn extrapolation_without_sentinel_uses_default_cost() {
    let ml = default_tier_table(MERCADO_LIVRE).unwrap().prepare();
    assert_eq!(ml.extra_unit_cost(), DEFAULT_EXTRA_UNIT_COST);
    assert!(close(ml.cost_for(5001.0), 28.45 + DEFAULT_EXTRA_UNIT_COST));
}

#[test]
fn sentinel_overrides_extra_unit_cost() {
    let table = FeeTierTable::new(vec![
        FeeTierRule::extra_unit(2.0),
        FeeTierRule::new(1000.0, 10.0),
    ]);
    let prepared = table.prepare();
    assert_eq!(prepared.extra_unit_cost(), 2.0);
    assert!(close(prepared.cost_for(2500.0), 14.0), "ceil(1.5) = 2 extra units");
}

#[test]
fn caller_order_is_not_trusted() {
    let sorted = default_tier_table(AMAZON).unwrap();
    let mut rules = sorted.rules().to_vec();
    rules.reverse();
    let shuffled = FeeTierTable::new(rules);

    for weight in [0.0, 249.0, 250.0, 1990.0, 5000.0, 9990.0, 15_500.0] {
        assert!(
            close(shuffled.prepare().cost_for(weight), sorted.prepare().cost_for(weight)),
            "weight {weight} priced differently after reordering"
        );
    }
    // The caller's table is left as given.
    assert!(shuffled.rules()[0].is_extra_unit());
}

#[test]
fn missing_or_empty_table_ships_free() {
    let threshold = PriceThreshold::above(79.0);
    assert_eq!(shipping_cost(threshold, 500.0, 800.0, None), 0.0);
    assert_eq!(shipping_cost(threshold, 500.0, 800.0, Some(&FeeTierTable::default())), 0.0);

    let sentinel_only = FeeTierTable::new(vec![FeeTierRule::extra_unit(5.0)]);
    assert_eq!(shipping_cost(threshold, 500.0, 20_000.0, Some(&sentinel_only)), 0.0);
}

#[test]
fn validate_rejects_malformed_tables() {
    assert!(default_tier_table(AMAZON).unwrap().validate().is_ok());
    assert!(FeeTierTable::default().validate().is_ok());

    let two_sentinels = FeeTierTable::new(vec![
        FeeTierRule::extra_unit(1.0),
        FeeTierRule::extra_unit(2.0),
    ]);
    assert!(two_sentinels.validate().is_err());

    let negative_cost = FeeTierTable::new(vec![FeeTierRule::new(500.0, -1.0)]);
    assert!(negative_cost.validate().is_err());

    let negative_ceiling = FeeTierTable::new(vec![FeeTierRule::new(-5.0, 1.0)]);
    assert!(negative_ceiling.validate().is_err());

    let nan = FeeTierTable::new(vec![FeeTierRule::new(f64::NAN, 1.0)]);
    assert!(nan.validate().is_err());
}
