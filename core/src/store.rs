//! SQLite persistence for edited shipping tables.
//!
//! RULE: Only store.rs talks to the database.
//! Only fee tables are stored here; computed prices never are.

use crate::{
    error::{PricerError, PricerResult},
    fee_table::{FeeTierRule, FeeTierTable},
    marketplace::MarketplaceBook,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

pub struct FeeTableStore {
    conn: Connection,
}

impl FeeTableStore {
    /// Open (or create) the fee-table database at `path`.
    pub fn open(path: &str) -> PricerResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PricerResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PricerResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_fee_tables.sql"))?;
        Ok(())
    }

    /// Replace the stored table for `marketplace`. Rule order is kept as
    /// given; lookups sort on their own.
    pub fn save_table(&self, marketplace: &str, table: &FeeTierTable) -> PricerResult<()> {
        table.validate().map_err(|reason| PricerError::InvalidTable {
            marketplace: marketplace.to_string(),
            reason,
        })?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM fee_tier_rule WHERE marketplace = ?1",
            params![marketplace],
        )?;
        tx.execute(
            "INSERT INTO fee_table (marketplace, updated_at) VALUES (?1, ?2)
             ON CONFLICT(marketplace) DO UPDATE SET updated_at = excluded.updated_at",
            params![marketplace, Utc::now().to_rfc3339()],
        )?;
        for (position, rule) in table.rules().iter().enumerate() {
            tx.execute(
                "INSERT INTO fee_tier_rule (marketplace, position, weight_ceiling_g, cost)
                 VALUES (?1, ?2, ?3, ?4)",
                params![marketplace, position as i64, rule.weight_ceiling_g, rule.cost],
            )?;
        }
        tx.commit()?;

        log::info!("store: saved {} rule(s) for {marketplace}", table.rules().len());
        Ok(())
    }

    /// Stored table for `marketplace`, or None if it was never edited.
    pub fn load_table(&self, marketplace: &str) -> PricerResult<Option<FeeTierTable>> {
        if self.table_updated_at(marketplace)?.is_none() {
            return Ok(None);
        }
        let mut stmt = self.conn.prepare(
            "SELECT weight_ceiling_g, cost FROM fee_tier_rule
             WHERE marketplace = ?1
             ORDER BY position ASC"
        )?;
        let rules = stmt.query_map(params![marketplace], |row| {
            Ok(FeeTierRule::new(row.get(0)?, row.get(1)?))
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(Some(FeeTierTable::new(rules)))
    }

    pub fn table_updated_at(&self, marketplace: &str) -> PricerResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT updated_at FROM fee_table WHERE marketplace = ?1",
            params![marketplace],
            |row| row.get(0),
        ).optional()?;

        raw.map(|value| {
            DateTime::parse_from_rfc3339(&value)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| PricerError::BadTimestamp { value })
        })
        .transpose()
    }

    /// Forget the edited table for `marketplace`. Returns whether
    /// anything was stored.
    pub fn reset_table(&self, marketplace: &str) -> PricerResult<bool> {
        // Rules go with the parent row (ON DELETE CASCADE).
        let removed = self.conn.execute(
            "DELETE FROM fee_table WHERE marketplace = ?1",
            params![marketplace],
        )?;

        if removed > 0 {
            log::info!("store: reset table for {marketplace}");
        }
        Ok(removed > 0)
    }

    /// Names of marketplaces with an edited table, sorted.
    pub fn stored_marketplaces(&self) -> PricerResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT marketplace FROM fee_table ORDER BY marketplace ASC"
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Install every stored table into `book`. Returns how many were
    /// applied; tables for marketplaces without shipping are skipped.
    pub fn apply_overrides(&self, book: &mut MarketplaceBook) -> PricerResult<usize> {
        let mut applied = 0;
        for name in self.stored_marketplaces()? {
            if let Some(table) = self.load_table(&name)? {
                if book.set_tier_table(&name, table) {
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }
}
