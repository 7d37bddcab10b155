//! Builder patterns for binding types
//!
//! This module provides fluent builder APIs for constructing receipts, logs
//! and network records with sensible defaults in tests.

pub mod network_record;
pub mod transaction_receipt;

// Re-export builders for convenience
pub use network_record::NetworkRecordBuilder;
pub use transaction_receipt::{LogBuilder, TransactionReceiptBuilder};
