#![deny(missing_docs)]

//! # kas-rpc
//!
//! Node-facing protocol for the Kaspa SDK: endpoint discovery through a
//! resolver list, a JSON wRPC websocket client for the four node operations
//! the wallet needs, and a read-only KRC-20 indexer client.
//!
//! # Example
//!
//! ```no_run
//! use kas_rpc::{KaspadWrpcClient, NodeApi, Resolver, WrpcConfig};
//! use kas_script::NetworkId;
//!
//! # async fn example() -> Result<(), kas_rpc::RpcError> {
//! let client = KaspadWrpcClient::with_resolver(
//!     WrpcConfig {
//!         network_id: NetworkId::testnet10(),
//!         ..Default::default()
//!     },
//!     Resolver::default(),
//! );
//! client.connect().await?;
//! let estimate = client.get_fee_estimate().await?;
//! println!("priority feerate: {}", estimate.priority_bucket.feerate);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod krc20;
pub mod resolver;
pub mod types;
pub mod wrpc;

#[cfg(test)]
mod tests;

pub use error::RpcError;
pub use krc20::Krc20RpcClient;
pub use resolver::{parse_resolver_urls, Resolver};
pub use types::{
    FeeEstimate, FeerateBucket, Krc20Config, ResolverConfig, TokenBalance, TokenInfo, WrpcConfig,
};
pub use wrpc::{KaspadWrpcClient, NodeApi};
