//! Derived views over scenario time-series tables.
//!
//! This crate turns a loaded `TimeSeriesTable` into the analytical forms
//! the comparison views consume: annual totals, monthly distribution
//! samples, demand composition percentages, and the per-basin stress index.

pub mod aggregate;
pub mod stress;
