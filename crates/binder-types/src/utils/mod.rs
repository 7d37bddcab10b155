//! Utility functions for common type conversions and transformations.
//!
//! This module provides helper functions for converting between hex strings
//! and the fixed-size types used throughout the binding runtime.

pub mod conversion;
pub mod formatting;

#[cfg(any(test, feature = "testing"))]
pub mod tests;

pub use conversion::{keccak_topic, parse_address, parse_h256};
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
