//! Snapshot persistence for Tenki
//!
//! Append-only SQLite store of merged forecast batches, versioned by fetch
//! time, plus a cache of the flattened region catalogue.

pub mod store;

pub use store::ForecastStore;
