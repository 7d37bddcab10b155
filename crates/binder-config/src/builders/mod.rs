//! Builders for configuration types.

pub mod config;
