//! Runtime binding engine for compiled contract artifacts.
//!
//! A [`Contract`] handle wraps one artifact and produces [`BoundInstance`]s,
//! either by deploying new contracts or by attaching to existing addresses.
//! Each bound instance exposes one [`Operation`] per interface function,
//! routed as a read-only call or as a confirmed transaction, and one
//! [`EventHandle`] per event.

pub mod binding;
pub mod codec;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod linker;
pub mod monitoring;
pub mod network;
pub mod params;

pub use binding::{BoundInstance, EventHandle, EventWatch, Interface, Operation};
pub use contract::Contract;
pub use dispatch::Invocation;
pub use error::ContractError;
pub use events::{AbiEventDecoder, DecodedEvent, EventDecoder};
pub use monitoring::{BindingSettings, TransactionMonitor, TransactionOutcome, TransactionResult};
pub use params::{normalize, NormalizedCall};
