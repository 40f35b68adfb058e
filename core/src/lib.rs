//! Marketplace sale-price engine.
//!
//! Given product cost, packaging, tax, weight and a target margin, find
//! the price each marketplace must list at once its commission, fixed
//! fee and shipping are taken out.

pub mod bands;
pub mod calculator;
pub mod config;
pub mod error;
pub mod fee_table;
pub mod fixed_fee;
pub mod marketplace;
pub mod request;
pub mod shipping;
pub mod solver;
pub mod store;
pub mod types;
