//! Tests for the resolver, the wRPC client and the KRC-20 indexer client.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use kas_primitives::chainhash::Hash;
use kas_script::{Address, NetworkId, Prefix, ScriptPublicKey, Version};
use kas_transaction::{SubmittableTransaction, Transaction};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::RpcError;
use crate::krc20::Krc20RpcClient;
use crate::resolver::{parse_resolver_urls, Resolver, DEFAULT_RESOLVERS};
use crate::types::{Krc20Config, ResolverConfig, WrpcConfig};
use crate::wrpc::{KaspadWrpcClient, NodeApi};

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

fn test_address() -> Address {
    Address::new(Prefix::Testnet, Version::PubKey, &[7u8; 32]).unwrap()
}

fn resolver_config() -> ResolverConfig {
    ResolverConfig {
        tls: false,
        timeout: Duration::from_secs(2),
    }
}

fn wrpc_config(url: &str) -> WrpcConfig {
    WrpcConfig {
        url: Some(url.to_string()),
        network_id: NetworkId::testnet10(),
        timeout: Duration::from_secs(2),
    }
}

/// Start a local websocket node. The handler maps `(method, params)` to a
/// response frame without its id; `Value::Null` means "never answer".
async fn spawn_node<F>(handler: F) -> String
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else { continue };
                    let request: Value = serde_json::from_str(&text).unwrap();
                    let mut reply = handler(request["method"].as_str().unwrap(), &request["params"]);
                    if reply.is_null() {
                        continue;
                    }
                    reply["id"] = request["id"].clone();
                    ws.send(Message::Text(reply.to_string())).await.unwrap();
                }
            });
        }
    });

    format!("ws://{}", addr)
}

// -----------------------------------------------------------------------
// Resolver
// -----------------------------------------------------------------------

#[test]
fn test_parse_resolver_toml() {
    let toml = r#"
        [[resolver]]
        address = "https://one.example"

        [[resolver]]
        address = "https://disabled.example"
        enable = false

        [[group]]
        template = "https://*.kaspa.red"
        nodes = ["john", "mike"]

        [[group]]
        template = "https://*.off.example"
        nodes = ["a"]
        enable = false
    "#;
    let urls = parse_resolver_urls(toml).unwrap();
    assert_eq!(
        urls,
        vec![
            "https://one.example",
            "https://john.kaspa.red",
            "https://mike.kaspa.red",
        ]
    );
}

#[test]
fn test_default_resolver_list() {
    let urls = parse_resolver_urls(DEFAULT_RESOLVERS).unwrap();
    assert_eq!(urls.len(), 8);
    assert!(urls.contains(&"https://john.kaspa.red".to_string()));
    assert!(urls.iter().all(|u| u.starts_with("https://")));
    assert_eq!(Resolver::default().urls(), urls.as_slice());
}

#[test]
fn test_malformed_resolver_toml() {
    let result = parse_resolver_urls("[[group]]\ntemplate = 5");
    assert!(matches!(result, Err(RpcError::Config(_))));
}

#[test]
fn test_endpoint_path() {
    let tls = Resolver::new(vec![], ResolverConfig::default());
    assert_eq!(
        tls.endpoint_path(&NetworkId::mainnet()).unwrap(),
        "/v2/kaspa/mainnet/tls/wrpc/json"
    );
    let any = Resolver::new(vec![], resolver_config());
    assert_eq!(
        any.endpoint_path(&NetworkId::testnet10()).unwrap(),
        "/v2/kaspa/testnet-10/any/wrpc/json"
    );
    let bare_testnet: NetworkId = "testnet".parse().unwrap();
    assert!(matches!(
        any.endpoint_path(&bare_testnet),
        Err(RpcError::InvalidNetworkId(_))
    ));
}

#[tokio::test]
async fn test_resolver_falls_through_to_working_candidate() {
    let broken = MockServer::start().await;
    let working = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/kaspa/testnet-10/any/wrpc/json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&broken)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/kaspa/testnet-10/any/wrpc/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "abc",
            "url": "wss://node.example/kaspa/testnet-10/wrpc/json"
        })))
        .mount(&working)
        .await;

    let resolver = Resolver::new(vec![broken.uri(), working.uri()], resolver_config());
    let url = resolver.get_url(&NetworkId::testnet10()).await.unwrap();
    assert_eq!(url, "wss://node.example/kaspa/testnet-10/wrpc/json");
}

#[tokio::test]
async fn test_resolver_exhausted_lists_every_failure() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&broken)
        .await;

    let resolver = Resolver::new(
        vec![broken.uri(), "http://127.0.0.1:1".to_string()],
        resolver_config(),
    );
    let err = resolver.get_url(&NetworkId::testnet10()).await.unwrap_err();
    match &err {
        RpcError::ResolverExhausted(failures) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].0, broken.uri());
            assert!(failures[0].1.contains("500"));
            assert_eq!(failures[1].0, "http://127.0.0.1:1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("127.0.0.1:1"));
}

#[tokio::test]
async fn test_resolver_with_no_candidates() {
    let resolver = Resolver::new(vec![], resolver_config());
    let err = resolver.get_url(&NetworkId::mainnet()).await.unwrap_err();
    assert!(matches!(&err, RpcError::ResolverExhausted(f) if f.is_empty()));
}

// -----------------------------------------------------------------------
// wRPC client
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_call_without_connect() {
    let client = KaspadWrpcClient::new(wrpc_config("ws://127.0.0.1:1"));
    let result = client.get_balance_by_address(&test_address()).await;
    assert!(matches!(result, Err(RpcError::NotConnected)));
}

#[tokio::test]
async fn test_submit_transaction() {
    let url = spawn_node(|method, params| {
        assert_eq!(method, "submitTransaction");
        assert_eq!(params["allowOrphan"], false);
        let id = params["transaction"]["id"].clone();
        json!({ "params": { "transactionId": id } })
    })
    .await;

    let client = KaspadWrpcClient::new(wrpc_config(&url));
    client.connect().await.unwrap();
    assert!(client.is_connected().await);

    let tx = Transaction::new_native(vec![], vec![]);
    let id = client
        .submit_transaction(&SubmittableTransaction::from(&tx))
        .await
        .unwrap();
    assert_eq!(id, tx.id());
    client.disconnect().await.unwrap();
    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn test_get_utxos_by_addresses() {
    let address = test_address();
    let script_hex = format!("20{}ac", "07".repeat(32));
    let expected_address = address.to_string();
    let reply_script = script_hex.clone();

    let url = spawn_node(move |method, params| {
        assert_eq!(method, "getUtxosByAddresses");
        assert_eq!(params["addresses"][0], expected_address.as_str());
        json!({ "params": { "entries": [
            {
                "address": expected_address,
                "outpoint": { "transactionId": "11".repeat(32), "index": 2 },
                "utxoEntry": {
                    "amount": "150000",
                    "scriptPublicKey": format!("0000{}", reply_script),
                    "blockDaaScore": 42,
                    "isCoinbase": false
                }
            },
            {
                "outpoint": { "transactionId": "22".repeat(32), "index": 0 },
                "utxoEntry": {
                    "amount": 7,
                    "scriptPublicKey": { "version": 0, "script": reply_script },
                    "blockDaaScore": "43",
                    "isCoinbase": true
                }
            }
        ]}})
    })
    .await;

    let client = KaspadWrpcClient::new(wrpc_config(&url));
    client.connect().await.unwrap();
    let utxos = client.get_utxos_by_address(&address).await.unwrap();

    assert_eq!(utxos.len(), 2);
    assert_eq!(utxos[0].address.as_ref(), Some(&address));
    assert_eq!(utxos[0].outpoint.transaction_id, Hash::new([0x11; 32]));
    assert_eq!(utxos[0].outpoint.index, 2);
    assert_eq!(utxos[0].amount(), 150_000);
    assert_eq!(
        utxos[0].script_public_key(),
        &ScriptPublicKey::from_hex(&script_hex).unwrap()
    );
    assert_eq!(utxos[0].entry.block_daa_score, 42);
    assert_eq!(utxos[1].address, None);
    assert_eq!(utxos[1].amount(), 7);
    assert!(utxos[1].entry.is_coinbase);
    assert_eq!(utxos[1].entry.block_daa_score, 43);
}

#[tokio::test]
async fn test_get_fee_estimate_and_balance() {
    let url = spawn_node(|method, _| match method {
        "getFeeEstimate" => json!({ "params": { "estimate": {
            "priorityBucket": { "feerate": 2.5, "estimatedSeconds": 0.9 },
            "normalBuckets": [{ "feerate": 1.0, "estimatedSeconds": 10.0 }],
            "lowBuckets": []
        }}}),
        "getBalanceByAddress" => json!({ "params": { "balance": 123456789 } }),
        other => panic!("unexpected method {other}"),
    })
    .await;

    let client = KaspadWrpcClient::new(wrpc_config(&url));
    client.connect().await.unwrap();

    let estimate = client.get_fee_estimate().await.unwrap();
    assert_eq!(estimate.priority_bucket.feerate, 2.5);
    assert_eq!(estimate.normal_buckets.len(), 1);

    let balance = client.get_balance_by_address(&test_address()).await.unwrap();
    assert_eq!(balance, 123_456_789);
}

#[tokio::test]
async fn test_rejected_submission_surfaces_message() {
    let url = spawn_node(|_, _| {
        json!({ "error": { "message": "transaction is an orphan" } })
    })
    .await;

    let client = KaspadWrpcClient::new(wrpc_config(&url));
    client.connect().await.unwrap();
    let tx = Transaction::new_native(vec![], vec![]);
    let err = client
        .submit_transaction(&SubmittableTransaction::from(&tx))
        .await
        .unwrap_err();
    match err {
        RpcError::Rpc(message) => assert!(message.contains("orphan")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_call_times_out() {
    let url = spawn_node(|_, _| Value::Null).await;

    let mut config = wrpc_config(&url);
    config.timeout = Duration::from_millis(200);
    let client = KaspadWrpcClient::new(config);
    client.connect().await.unwrap();

    let result = client.get_fee_estimate().await;
    assert!(matches!(result, Err(RpcError::Timeout)));
}

#[tokio::test]
async fn test_connect_through_resolver() {
    let node_url = spawn_node(|_, _| json!({ "params": { "balance": "5" } })).await;

    let resolver_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/kaspa/testnet-10/any/wrpc/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "url": node_url })))
        .mount(&resolver_server)
        .await;

    let config = WrpcConfig {
        url: None,
        ..wrpc_config("")
    };
    let resolver = Resolver::new(vec![resolver_server.uri()], resolver_config());
    let client = KaspadWrpcClient::with_resolver(config, resolver);
    client.connect().await.unwrap();
    assert_eq!(client.get_balance_by_address(&test_address()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_calls_fail_fast_while_resolving() {
    let node_url = spawn_node(|_, _| json!({ "params": { "balance": "5" } })).await;

    let resolver_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/kaspa/testnet-10/any/wrpc/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "url": node_url }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&resolver_server)
        .await;

    let config = WrpcConfig {
        url: None,
        ..wrpc_config("")
    };
    let resolver = Resolver::new(vec![resolver_server.uri()], resolver_config());
    let client = KaspadWrpcClient::with_resolver(config, resolver);

    let (connected, early) = tokio::join!(client.connect(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::time::timeout(
            Duration::from_millis(200),
            client.get_balance_by_address(&test_address()),
        )
        .await
    });
    connected.unwrap();
    assert!(matches!(early, Ok(Err(RpcError::NotConnected))));
    assert_eq!(client.get_balance_by_address(&test_address()).await.unwrap(), 5);

    // A second connect keeps the open socket.
    client.connect().await.unwrap();
    assert!(client.is_connected().await);
}

// -----------------------------------------------------------------------
// KRC-20 indexer
// -----------------------------------------------------------------------

fn krc20_client(server: &MockServer) -> Krc20RpcClient {
    Krc20RpcClient::new(Krc20Config {
        base_url: format!("{}/v1", server.uri()),
    })
}

#[test]
fn test_krc20_config_per_network() {
    assert_eq!(
        Krc20Config::for_network(&NetworkId::mainnet()).base_url,
        "https://api.kasplex.org/v1"
    );
    assert_eq!(
        Krc20Config::for_network(&NetworkId::testnet10()).base_url,
        "https://tn10api.kasplex.org/v1"
    );
}

#[tokio::test]
async fn test_get_token_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/krc20/token/KASP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "successful",
            "result": [{
                "tick": "KASP",
                "max": "2100000000000000",
                "lim": "100000000000",
                "pre": "0",
                "dec": "8",
                "minted": "1000",
                "state": "deployed",
                "holderTotal": "12",
                "opScoreAdd": "9000"
            }]
        })))
        .mount(&server)
        .await;

    let info = krc20_client(&server).get_token_info("kasp").await.unwrap().unwrap();
    assert_eq!(info.tick, "KASP");
    assert_eq!(info.dec, "8");
    assert_eq!(info.holder_total, "12");
    assert_eq!(info.transfer_total, "");
}

#[tokio::test]
async fn test_get_token_list_and_balance() {
    let server = MockServer::start().await;
    let address = test_address().to_string();

    Mock::given(method("GET"))
        .and(path(format!("/v1/krc20/address/{address}/tokenlist")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "successful",
            "result": [
                { "tick": "KASP", "balance": "500", "locked": "0", "dec": "8" },
                { "tick": "NACHO", "balance": "1", "locked": "0", "dec": "8" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/krc20/address/{address}/token/KASP")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "successful",
            "result": [{ "tick": "KASP", "balance": "500", "locked": "20", "dec": "8" }]
        })))
        .mount(&server)
        .await;

    let client = krc20_client(&server);
    let list = client.get_token_list(&address).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].tick, "NACHO");

    let balance = client.get_token_balance(&address, "kasp").await.unwrap().unwrap();
    assert_eq!(balance.balance, "500");
    assert_eq!(balance.locked, "20");
}

#[tokio::test]
async fn test_indexer_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/krc20/token/NOPE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "tick not found",
            "result": []
        })))
        .mount(&server)
        .await;

    let err = krc20_client(&server).get_token_info("nope").await.unwrap_err();
    assert!(matches!(err, RpcError::Indexer(ref m) if m == "tick not found"));
}

#[tokio::test]
async fn test_indexer_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = krc20_client(&server).get_token_list("x").await.unwrap_err();
    assert!(matches!(err, RpcError::ServerError { status_code: 502, .. }));
}
