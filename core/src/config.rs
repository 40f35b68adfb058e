use crate::{
    fee_table::FeeTierTable,
    marketplace::{default_commissions, MarketplaceBook},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Defaults for the scalar inputs a caller does not supply per product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingDefaults {
    pub margin_pct:     f64,
    pub packaging_cost: f64,
    pub tax_pct:        f64,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            margin_pct:     30.0,
            packaging_cost: 0.0,
            tax_pct:        7.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FeeTablesFile {
    tables: BTreeMap<String, FeeTierTable>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommissionsFile {
    commissions: BTreeMap<String, f64>,
    #[serde(default)]
    defaults:    PricingDefaults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricerConfig {
    pub book:        MarketplaceBook,
    pub commissions: BTreeMap<String, f64>,
    pub defaults:    PricingDefaults,
}

impl PricerConfig {
    /// Load from the data/ directory.
    /// In tests, use PricerConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let tables_path = format!("{data_dir}/marketplaces/fee_tables.json");
        let tables_content = std::fs::read_to_string(&tables_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {tables_path}: {e}"))?;
        let tables_file: FeeTablesFile = serde_json::from_str(&tables_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {tables_path}: {e}"))?;

        let mut book = MarketplaceBook::builtin();
        for (name, table) in tables_file.tables {
            if let Err(reason) = table.validate() {
                anyhow::bail!("{tables_path}: table for {name} is invalid: {reason}");
            }
            if !book.set_tier_table(&name, table) {
                log::warn!("config: {tables_path} has a table for {name}, which charges no shipping");
            }
        }

        let commissions_path = format!("{data_dir}/marketplaces/commissions.json");
        let commissions_content = std::fs::read_to_string(&commissions_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {commissions_path}: {e}"))?;
        let commissions_file: CommissionsFile = serde_json::from_str(&commissions_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {commissions_path}: {e}"))?;

        log::info!(
            "config: loaded {} marketplace commissions from {data_dir}",
            commissions_file.commissions.len()
        );

        Ok(Self {
            book,
            commissions: commissions_file.commissions,
            defaults: commissions_file.defaults,
        })
    }

    /// Built-in tables and commissions, no files involved.
    pub fn default_test() -> Self {
        Self {
            book:        MarketplaceBook::builtin(),
            commissions: default_commissions(),
            defaults:    PricingDefaults::default(),
        }
    }
}
