#![deny(missing_docs)]

//! Kaspa SDK - Complete SDK.
//!
//! Re-exports all Kaspa SDK components for convenient single-crate usage.

pub use kas_primitives as primitives;
pub use kas_script as script;
pub use kas_transaction as transaction;
pub use kas_wallet as wallet;
pub use kas_rpc as rpc;

pub mod logging;
