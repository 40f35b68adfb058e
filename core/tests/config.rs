//! Loading configuration from the data/ directory.

use pricer_core::{
    config::PricerConfig,
    marketplace::{default_commissions, MarketplaceBook},
};
use std::fs;

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("pricer-config-{name}-{}", std::process::id()));
    fs::create_dir_all(dir.join("marketplaces")).unwrap();
    dir
}

#[test]
fn shipped_data_matches_builtins() {
    let config = PricerConfig::load(&data_dir()).unwrap();
    assert_eq!(config.book, MarketplaceBook::builtin());
    assert_eq!(config.commissions, default_commissions());
    assert_eq!(config.defaults, PricerConfig::default_test().defaults);
}

#[test]
fn missing_directory_names_the_path() {
    let err = PricerConfig::load("/nonexistent/pricer-data").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Cannot read"), "unexpected error: {msg}");
    assert!(msg.contains("fee_tables.json"), "unexpected error: {msg}");
}

#[test]
fn invalid_table_in_file_is_an_error() {
    let dir = scratch_dir("invalid");
    fs::write(
        dir.join("marketplaces/fee_tables.json"),
        r#"{ "tables": { "Amazon": [
            { "weight_ceiling_g": 500, "cost": -3.0 }
        ] } }"#,
    )
    .unwrap();
    fs::copy(
        format!("{}/marketplaces/commissions.json", data_dir()),
        dir.join("marketplaces/commissions.json"),
    )
    .unwrap();

    let err = PricerConfig::load(dir.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Amazon"), "unexpected error: {err}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn defaults_section_is_optional() {
    let dir = scratch_dir("nodefaults");
    fs::write(dir.join("marketplaces/fee_tables.json"), r#"{ "tables": {} }"#).unwrap();
    fs::write(
        dir.join("marketplaces/commissions.json"),
        r#"{ "commissions": { "Shopee": 18.5 } }"#,
    )
    .unwrap();

    let config = PricerConfig::load(dir.to_str().unwrap()).unwrap();
    assert_eq!(config.commissions.len(), 1);
    assert_eq!(config.commissions["Shopee"], 18.5);
    assert_eq!(config.defaults.margin_pct, 30.0);
    assert_eq!(config.book, MarketplaceBook::builtin(), "empty tables keep built-ins");
    let _ = fs::remove_dir_all(&dir);
}
