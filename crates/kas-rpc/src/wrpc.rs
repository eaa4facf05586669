//! JSON wRPC client for a Kaspa node.
//!
//! Requests are `{"id", "method", "params"}` frames over a websocket. A
//! reader task matches responses to in-flight calls by id; a writer task
//! owns the sink. Calls time out individually and are never retried.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use kas_primitives::chainhash::Hash;
use kas_script::Address;
use kas_transaction::{ClientUtxoEntry, SubmittableTransaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::RpcError;
use crate::resolver::Resolver;
use crate::types::{
    FeeEstimate, GetBalanceByAddressRequest, GetBalanceByAddressResponse,
    GetFeeEstimateResponse, GetUtxosByAddressesRequest, GetUtxosByAddressesResponse, RpcRequest,
    RpcResponse, SubmitTransactionRequest, SubmitTransactionResponse, WrpcConfig,
};

/// The node operations the wallet layer depends on.
pub trait NodeApi {
    /// Submit a signed transaction and return the id the node assigned.
    fn submit_transaction(
        &self,
        tx: &SubmittableTransaction,
    ) -> impl Future<Output = Result<Hash, RpcError>> + Send;

    /// Fetch the unspent outputs of a set of addresses.
    fn get_utxos_by_addresses(
        &self,
        addresses: &[Address],
    ) -> impl Future<Output = Result<Vec<ClientUtxoEntry>, RpcError>> + Send;

    /// Fetch the current fee-rate buckets.
    fn get_fee_estimate(&self) -> impl Future<Output = Result<FeeEstimate, RpcError>> + Send;

    /// Fetch the balance of one address in sompi.
    fn get_balance_by_address(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<u64, RpcError>> + Send;
}

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<serde_json::Value, RpcError>>>>>;

struct Connection {
    outgoing: mpsc::UnboundedSender<Message>,
    pending: Pending,
    reader: JoinHandle<()>,
}

/// WebSocket JSON-RPC client for a Kaspa node.
pub struct KaspadWrpcClient {
    config: WrpcConfig,
    resolver: Option<Resolver>,
    connection: Mutex<Option<Connection>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for KaspadWrpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaspadWrpcClient")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl KaspadWrpcClient {
    /// Create a client for the node at `config.url`.
    pub fn new(config: WrpcConfig) -> Self {
        Self {
            config,
            resolver: None,
            connection: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client that discovers its node through `resolver` when
    /// `config.url` is unset.
    pub fn with_resolver(config: WrpcConfig, resolver: Resolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::new(config)
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &WrpcConfig {
        &self.config
    }

    /// Whether a connection is open.
    pub async fn is_connected(&self) -> bool {
        self.connection
            .lock()
            .await
            .as_ref()
            .is_some_and(|c| !c.reader.is_finished())
    }

    /// Open the websocket, resolving the node URL first if needed.
    ///
    /// Does nothing when already connected. The connection slot is only
    /// locked to install the new socket, so calls made while resolving fail
    /// with `NotConnected` instead of waiting.
    pub async fn connect(&self) -> Result<(), RpcError> {
        if self.is_connected().await {
            return Ok(());
        }

        let url = match (&self.config.url, &self.resolver) {
            (Some(url), _) => url.clone(),
            (None, Some(resolver)) => resolver.get_url(&self.config.network_id).await?,
            (None, None) => {
                return Err(RpcError::InvalidResponse(
                    "no node url or resolver configured".to_string(),
                ))
            }
        };

        let conn = self.open(&url).await?;
        let mut guard = self.connection.lock().await;
        if guard.as_ref().is_some_and(|c| !c.reader.is_finished()) {
            // A concurrent connect won; keep its socket.
            let _ = conn.outgoing.send(Message::Close(None));
            conn.reader.abort();
            return Ok(());
        }
        *guard = Some(conn);
        Ok(())
    }

    async fn open(&self, url: &str) -> Result<Connection, RpcError> {
        info!(%url, network = %self.config.network_id, "connecting to node");
        let (stream, _) = tokio::time::timeout(self.config.timeout, connect_async(url))
            .await
            .map_err(|_| RpcError::Timeout)??;
        let (mut sink, mut source) = stream.split();
        let (outgoing, mut queue) = mpsc::unbounded_channel::<Message>();
        let pending: Pending = Arc::default();

        tokio::spawn(async move {
            while let Some(msg) = queue.recv().await {
                if let Err(e) = sink.send(msg).await {
                    warn!(error = %e, "wrpc write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_pending = pending.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => dispatch(&reader_pending, &text).await,
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "wrpc read failed");
                        break;
                    }
                }
            }
            // Dropping the senders fails every in-flight call.
            reader_pending.lock().await.clear();
            debug!("wrpc connection closed");
        });

        Ok(Connection {
            outgoing,
            pending,
            reader,
        })
    }

    /// Close the websocket. In-flight calls fail with `NotConnected`.
    pub async fn disconnect(&self) -> Result<(), RpcError> {
        if let Some(conn) = self.connection.lock().await.take() {
            let _ = conn.outgoing.send(Message::Close(None));
            conn.reader.abort();
            conn.pending.lock().await.clear();
            info!("disconnected from node");
        }
        Ok(())
    }

    /// Perform one call and deserialize its result.
    ///
    /// # Arguments
    /// * `method` - wRPC method name.
    /// * `params` - Method parameters.
    pub async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, RpcError> {
        let (outgoing, pending) = {
            let guard = self.connection.lock().await;
            let conn = guard.as_ref().ok_or(RpcError::NotConnected)?;
            (conn.outgoing.clone(), conn.pending.clone())
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = serde_json::to_string(&RpcRequest { id, method, params })?;
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert(id, tx);

        debug!(id, method, "wrpc call");
        if outgoing.send(Message::Text(frame)).is_err() {
            pending.lock().await.remove(&id);
            return Err(RpcError::NotConnected);
        }

        let value = match tokio::time::timeout(self.config.timeout, rx).await {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => return Err(RpcError::NotConnected),
            Err(_) => {
                pending.lock().await.remove(&id);
                warn!(id, method, "wrpc call timed out");
                return Err(RpcError::Timeout);
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the unspent outputs of a single address.
    pub async fn get_utxos_by_address(
        &self,
        address: &Address,
    ) -> Result<Vec<ClientUtxoEntry>, RpcError> {
        self.get_utxos_by_addresses(std::slice::from_ref(address)).await
    }
}

impl NodeApi for KaspadWrpcClient {
    async fn submit_transaction(&self, tx: &SubmittableTransaction) -> Result<Hash, RpcError> {
        let request = SubmitTransactionRequest {
            transaction: tx.clone(),
            allow_orphan: false,
        };
        let response: SubmitTransactionResponse = self.call("submitTransaction", request).await?;
        let id = Hash::from_hex(&response.transaction_id)?;
        info!(transaction_id = %id, "transaction submitted");
        Ok(id)
    }

    async fn get_utxos_by_addresses(
        &self,
        addresses: &[Address],
    ) -> Result<Vec<ClientUtxoEntry>, RpcError> {
        let request = GetUtxosByAddressesRequest {
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
        };
        let response: GetUtxosByAddressesResponse =
            self.call("getUtxosByAddresses", request).await?;
        response
            .entries
            .into_iter()
            .map(ClientUtxoEntry::try_from)
            .collect()
    }

    async fn get_fee_estimate(&self) -> Result<FeeEstimate, RpcError> {
        let response: GetFeeEstimateResponse =
            self.call("getFeeEstimate", serde_json::json!({})).await?;
        Ok(response.estimate)
    }

    async fn get_balance_by_address(&self, address: &Address) -> Result<u64, RpcError> {
        let request = GetBalanceByAddressRequest {
            address: address.to_string(),
        };
        let response: GetBalanceByAddressResponse =
            self.call("getBalanceByAddress", request).await?;
        Ok(response.balance)
    }
}

async fn dispatch(pending: &Pending, text: &str) {
    let response: RpcResponse = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable wrpc frame");
            return;
        }
    };
    let Some(id) = response.id else {
        debug!("ignoring wrpc notification");
        return;
    };
    let Some(tx) = pending.lock().await.remove(&id) else {
        debug!(id, "response for unknown request");
        return;
    };
    let result = match response.error {
        Some(err) => Err(RpcError::Rpc(err.message)),
        None => Ok(response.params),
    };
    let _ = tx.send(result);
}
