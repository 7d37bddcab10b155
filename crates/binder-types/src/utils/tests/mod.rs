//! Test helpers shared by the binding crates.

pub mod builders;
