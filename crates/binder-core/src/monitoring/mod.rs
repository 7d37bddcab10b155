//! Confirmation tracking for submitted transactions.
//!
//! This module provides the receipt polling loop shared by operation
//! submissions and deployments, with configurable timeouts and polling
//! intervals.

pub mod transaction;

pub use transaction::{BindingSettings, TransactionMonitor, TransactionOutcome, TransactionResult};
